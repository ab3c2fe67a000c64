//! Session lifecycle endpoints
//!
//! Clients create a session over REST, optionally submit provider
//! credentials for it, then open the WebSocket under the returned id.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::ApiState;
use crate::persona::Persona;
use crate::Error;

/// Build session lifecycle router
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        // Browser clients fetch /session with a plain GET; accept both.
        .route("/session", get(create_session).post(create_session))
        .route("/session/{id}/api-keys", post(submit_api_keys))
        .route("/session/{id}/status", get(session_status))
        .with_state(state)
}

/// New session response
#[derive(Debug, Serialize)]
pub struct CreateSessionResponse {
    pub session_id: String,
    pub persona: Persona,
    pub greeting: String,
}

/// Create a session and return its id
async fn create_session(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<CreateSessionResponse>, SessionError> {
    let handle = state.registry.create(Persona::default()).await?;
    let session = handle.lock().await;

    Ok(Json(CreateSessionResponse {
        session_id: session.id.clone(),
        persona: session.persona,
        greeting: session.persona.greeting().to_string(),
    }))
}

/// Credential submission body; absent or empty fields leave stored keys alone
#[derive(Debug, Deserialize)]
pub struct ApiKeysRequest {
    #[serde(default)]
    pub gemini: Option<String>,
    #[serde(default)]
    pub openweather: Option<String>,
    #[serde(default)]
    pub tavily: Option<String>,
    #[serde(default)]
    pub assemblyai: Option<String>,
}

/// Credential submission response
#[derive(Debug, Serialize)]
pub struct ApiKeysResponse {
    pub configured_keys: Vec<&'static str>,
}

/// Store per-session provider credentials
async fn submit_api_keys(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
    Json(request): Json<ApiKeysRequest>,
) -> Result<Json<ApiKeysResponse>, SessionError> {
    let handle = state
        .registry
        .get(&id)
        .await
        .ok_or(SessionError::NotFound)?;
    let mut session = handle.lock().await;

    let store = |slot: &mut Option<String>, value: Option<String>| {
        if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
            *slot = Some(value);
        }
    };
    store(&mut session.keys.gemini, request.gemini);
    store(&mut session.keys.openweather, request.openweather);
    store(&mut session.keys.tavily, request.tavily);
    store(&mut session.keys.assemblyai, request.assemblyai);

    let configured = session.keys.configured();
    tracing::info!(session_id = %id, providers = ?configured, "credentials updated");

    Ok(Json(ApiKeysResponse {
        configured_keys: configured,
    }))
}

/// Feature availability derived from stored credentials
#[derive(Debug, Serialize)]
pub struct AvailableFeatures {
    pub ai_chat: bool,
    pub weather: bool,
    pub web_search: bool,
    pub transcription: bool,
}

/// Session status response
#[derive(Debug, Serialize)]
pub struct SessionStatusResponse {
    pub session_id: String,
    pub persona: Persona,
    pub message_count: u32,
    pub available_features: AvailableFeatures,
}

/// Report session status and feature availability
async fn session_status(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
) -> Result<Json<SessionStatusResponse>, SessionError> {
    let handle = state
        .registry
        .get(&id)
        .await
        .ok_or(SessionError::NotFound)?;
    let session = handle.lock().await;

    Ok(Json(SessionStatusResponse {
        session_id: session.id.clone(),
        persona: session.persona,
        message_count: session.message_count,
        available_features: AvailableFeatures {
            ai_chat: session.keys.gemini.is_some(),
            weather: session.keys.openweather.is_some(),
            web_search: session.keys.tavily.is_some(),
            transcription: session.keys.assemblyai.is_some(),
        },
    }))
}

/// Session API errors
#[derive(Debug)]
pub enum SessionError {
    NotFound,
    AtCapacity(usize),
}

impl From<Error> for SessionError {
    fn from(e: Error) -> Self {
        match e {
            Error::SessionLimit(live) => Self::AtCapacity(live),
            _ => Self::NotFound,
        }
    }
}

impl IntoResponse for SessionError {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct ErrorResponse {
            error: ErrorBody,
        }

        #[derive(Serialize)]
        struct ErrorBody {
            code: &'static str,
            message: String,
        }

        let (status, code, message) = match self {
            Self::NotFound => (
                StatusCode::NOT_FOUND,
                "session_not_found",
                "No session with that id.".to_string(),
            ),
            Self::AtCapacity(live) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "session_limit",
                format!("Session limit reached ({live} active). Try again later."),
            ),
        };

        (
            status,
            Json(ErrorResponse {
                error: ErrorBody { code, message },
            }),
        )
            .into_response()
    }
}
