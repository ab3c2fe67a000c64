//! Configuration management for the Parley gateway
//!
//! Sources, later ones winning: built-in defaults, the TOML config file,
//! environment variables, CLI flags (applied by the binary).

pub mod file;

use std::path::PathBuf;
use std::time::Duration;

use crate::session::DEFAULT_CAPACITY;
use crate::voice::stt::{DEFAULT_MAX_POLL_ATTEMPTS, DEFAULT_POLL_INTERVAL};
use crate::{llm, voice};

/// Default API server port
pub const DEFAULT_PORT: u16 = 8789;

/// Parley gateway configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Port to listen on
    pub port: u16,

    /// Static files directory (web UI); served when present
    pub static_dir: Option<PathBuf>,

    /// Cap on concurrently live sessions
    pub max_sessions: usize,

    /// Chat model identifier
    pub llm_model: String,

    /// TTS voice name
    pub tts_voice: String,

    /// Wait between transcription status polls
    pub stt_poll_interval: Duration,

    /// Max transcription status polls before giving up
    pub stt_max_poll_attempts: u32,

    /// Server-level API keys
    pub api_keys: ApiKeys,
}

/// Server-level API keys for external services
///
/// These power the REST transcribe/synthesize endpoints. Conversation-side
/// credentials (chat, weather, search) are stored per session instead,
/// submitted by the client over the credential route.
#[derive(Debug, Clone, Default)]
pub struct ApiKeys {
    /// `AssemblyAI` API key (transcription)
    pub assemblyai: Option<String>,

    /// Google Gemini API key (speech synthesis)
    pub gemini: Option<String>,

    /// `OpenWeather` API key (weather tool fallback)
    pub openweather: Option<String>,

    /// Tavily API key (search/news tool fallback)
    pub tavily: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            static_dir: None,
            max_sessions: DEFAULT_CAPACITY,
            llm_model: llm::DEFAULT_MODEL.to_string(),
            tts_voice: voice::tts::DEFAULT_VOICE.to_string(),
            stt_poll_interval: DEFAULT_POLL_INTERVAL,
            stt_max_poll_attempts: DEFAULT_MAX_POLL_ATTEMPTS,
            api_keys: ApiKeys::default(),
        }
    }
}

impl Config {
    /// Load configuration from the config file and environment
    #[must_use]
    pub fn load() -> Self {
        let file = file::load_config_file();
        Self::from_file(file).with_env_overrides()
    }

    fn from_file(file: file::ParleyConfigFile) -> Self {
        let defaults = Self::default();
        Self {
            port: file.server.port.unwrap_or(defaults.port),
            static_dir: file.server.static_dir.map(PathBuf::from),
            max_sessions: file.server.max_sessions.unwrap_or(defaults.max_sessions),
            llm_model: file.llm.model.unwrap_or(defaults.llm_model),
            tts_voice: file.voice.tts_voice.unwrap_or(defaults.tts_voice),
            stt_poll_interval: file
                .voice
                .stt_poll_interval_secs
                .map_or(defaults.stt_poll_interval, Duration::from_secs),
            stt_max_poll_attempts: file
                .voice
                .stt_max_poll_attempts
                .unwrap_or(defaults.stt_max_poll_attempts),
            api_keys: ApiKeys {
                assemblyai: file.api_keys.assemblyai,
                gemini: file.api_keys.gemini,
                openweather: file.api_keys.openweather,
                tavily: file.api_keys.tavily,
            },
        }
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(port) = std::env::var("PARLEY_PORT") {
            match port.parse() {
                Ok(port) => self.port = port,
                Err(e) => tracing::warn!(value = %port, error = %e, "ignoring bad PARLEY_PORT"),
            }
        }
        if let Ok(dir) = std::env::var("PARLEY_STATIC_DIR") {
            self.static_dir = Some(PathBuf::from(dir));
        }
        if let Ok(model) = std::env::var("PARLEY_LLM_MODEL") {
            self.llm_model = model;
        }

        self.api_keys.assemblyai = env_key("ASSEMBLYAI_API_KEY").or(self.api_keys.assemblyai);
        self.api_keys.gemini = env_key("GEMINI_API_KEY").or(self.api_keys.gemini);
        self.api_keys.openweather = env_key("OPENWEATHER_API_KEY").or(self.api_keys.openweather);
        self.api_keys.tavily = env_key("TAVILY_API_KEY").or(self.api_keys.tavily);

        self
    }
}

fn env_key(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = Config::default();
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.max_sessions, DEFAULT_CAPACITY);
        assert!(config.api_keys.gemini.is_none());
    }

    #[test]
    fn file_values_override_defaults() {
        let file: file::ParleyConfigFile = toml::from_str(
            r#"
            [server]
            port = 9000
            max_sessions = 8

            [voice]
            stt_poll_interval_secs = 5
            "#,
        )
        .unwrap();

        let config = Config::from_file(file);
        assert_eq!(config.port, 9000);
        assert_eq!(config.max_sessions, 8);
        assert_eq!(config.stt_poll_interval, Duration::from_secs(5));
        assert_eq!(config.llm_model, llm::DEFAULT_MODEL);
    }
}
