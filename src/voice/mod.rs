//! Voice processing: speech-to-text and text-to-speech adapters

pub mod stt;
pub mod tts;

pub use stt::Transcriber;
pub use tts::Synthesizer;
