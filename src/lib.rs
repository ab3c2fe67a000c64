//! Parley Gateway - voice assistant backend for browser clients
//!
//! This library bridges a browser client to three external services
//! (speech transcription, LLM chat, and speech synthesis) plus a set of
//! tool lookups: weather, news, web search, system stats, clock.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                 Browser client                       │
//! │   REST: /session, /api/voice   WS: /ws/{session}    │
//! └────────────────────┬────────────────────────────────┘
//!                      │
//! ┌────────────────────▼────────────────────────────────┐
//! │                Parley Gateway                        │
//! │  Session Registry │ Intent Router │ Tools │ STT/TTS │
//! └────────────────────┬────────────────────────────────┘
//!                      │
//! ┌────────────────────▼────────────────────────────────┐
//! │              External services                       │
//! │  AssemblyAI │ Gemini (chat + TTS) │ OpenWeather │   │
//! │  Tavily                                              │
//! └─────────────────────────────────────────────────────┘
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod intent;
pub mod llm;
pub mod persona;
pub mod session;
pub mod tools;
pub mod voice;

pub use config::Config;
pub use error::{Error, Result};
pub use intent::Intent;
pub use llm::GeminiClient;
pub use persona::Persona;
pub use session::{Session, SessionKeys, SessionRegistry};
pub use tools::{ToolResult, ToolStatus};
pub use voice::{Synthesizer, Transcriber};
