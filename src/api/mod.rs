//! HTTP API server for the Parley gateway

pub mod health;
pub mod session;
pub mod voice;
pub mod websocket;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::config::{ApiKeys, Config};
use crate::session::SessionRegistry;
use crate::Result;

/// Shared state for API handlers
pub struct ApiState {
    /// Live sessions keyed by id
    pub registry: SessionRegistry,
    /// Shared HTTP client for all external calls
    pub http: reqwest::Client,
    /// Chat model identifier
    pub llm_model: String,
    /// TTS voice name
    pub tts_voice: String,
    /// Wait between transcription status polls
    pub stt_poll_interval: Duration,
    /// Max transcription status polls before giving up
    pub stt_max_poll_attempts: u32,
    /// Server-level API keys (REST voice endpoints)
    pub api_keys: ApiKeys,
}

impl ApiState {
    /// Build API state from configuration
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            registry: SessionRegistry::new(config.max_sessions),
            http: reqwest::Client::new(),
            llm_model: config.llm_model.clone(),
            tts_voice: config.tts_voice.clone(),
            stt_poll_interval: config.stt_poll_interval,
            stt_max_poll_attempts: config.stt_max_poll_attempts,
            api_keys: config.api_keys.clone(),
        }
    }
}

/// API server
pub struct ApiServer {
    state: Arc<ApiState>,
    port: u16,
    static_dir: Option<PathBuf>,
}

impl ApiServer {
    /// Create a server from configuration
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            state: Arc::new(ApiState::new(config)),
            port: config.port,
            static_dir: config.static_dir.clone(),
        }
    }

    /// Shared state handle (for embedding or tests)
    #[must_use]
    pub fn state(&self) -> Arc<ApiState> {
        Arc::clone(&self.state)
    }

    /// Build the router with all routes
    fn router(&self) -> Router {
        let mut router = Router::new()
            .merge(session::router(self.state.clone()))
            .nest("/api/voice", voice::router(self.state.clone()))
            .nest("/ws", websocket::router(self.state.clone()))
            .merge(health::router())
            .merge(health::ready_router(self.state.clone()));

        // Serve the web client if configured
        if let Some(static_dir) = &self.static_dir {
            let index_file = static_dir.join("index.html");
            let serve_dir = ServeDir::new(static_dir).not_found_service(ServeFile::new(&index_file));

            router = router.fallback_service(serve_dir);
            tracing::info!(path = %static_dir.display(), "serving static files");
        }

        // CORS layer for cross-origin requests from the browser client
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        router.layer(cors).layer(TraceLayer::new_for_http())
    }

    /// Run the API server
    ///
    /// # Errors
    ///
    /// Returns error if the server fails to bind or run.
    pub async fn run(self) -> Result<()> {
        let addr = format!("0.0.0.0:{}", self.port);
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| crate::Error::Config(format!("failed to bind API server: {e}")))?;

        tracing::info!(port = self.port, "API server listening");

        axum::serve(listener, self.router())
            .await
            .map_err(|e| crate::Error::Config(format!("API server error: {e}")))?;

        Ok(())
    }
}
