//! Error types for the Parley gateway

use thiserror::Error;

/// Result type alias for Parley operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the Parley gateway
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Session registry error (unknown id, capacity reached)
    #[error("session error: {0}")]
    Session(String),

    /// Session registry is at capacity
    #[error("session limit reached ({0} active)")]
    SessionLimit(usize),

    /// Persona not found
    #[error("persona not found: {0}")]
    PersonaNotFound(String),

    /// Speech-to-text error
    #[error("STT error: {0}")]
    Stt(String),

    /// Transcription poll exceeded its attempt budget
    #[error("STT timed out after {attempts} polls")]
    SttTimeout {
        /// Number of polls issued before giving up
        attempts: u32,
    },

    /// Text-to-speech error
    #[error("TTS error: {0}")]
    Tts(String),

    /// LLM chat completion error
    #[error("LLM error: {0}")]
    Llm(String),

    /// Tool adapter error
    #[error("tool error: {0}")]
    Tool(String),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP error
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
}
