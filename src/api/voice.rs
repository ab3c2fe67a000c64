//! Voice API endpoints for speech-to-text and text-to-speech
//!
//! These run on the gateway's own credentials (config/env), not per-session
//! keys: the browser calls them before a session pipeline is involved.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::ApiState;
use crate::voice::{Transcriber, Synthesizer};
use crate::Error;

/// Build voice router
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/transcribe", post(transcribe))
        .route("/synthesize", post(synthesize))
        .route("/capabilities", axum::routing::get(capabilities))
        .with_state(state)
}

/// Voice capabilities response
#[derive(Debug, Serialize)]
pub struct VoiceCapabilities {
    pub stt_available: bool,
    pub tts_available: bool,
}

/// Get voice capabilities
async fn capabilities(State(state): State<Arc<ApiState>>) -> Json<VoiceCapabilities> {
    Json(VoiceCapabilities {
        stt_available: state.api_keys.assemblyai.is_some(),
        tts_available: state.api_keys.gemini.is_some(),
    })
}

/// Transcription response
#[derive(Debug, Serialize)]
pub struct TranscribeResponse {
    pub text: String,
}

/// Transcribe audio to text
///
/// Accepts raw audio bytes in the request body.
async fn transcribe(
    State(state): State<Arc<ApiState>>,
    body: Bytes,
) -> Result<Json<TranscribeResponse>, VoiceError> {
    let api_key = state
        .api_keys
        .assemblyai
        .clone()
        .ok_or(VoiceError::NotConfigured("STT not configured (no AssemblyAI key)"))?;

    if body.is_empty() {
        return Err(VoiceError::BadRequest("Empty audio data"));
    }

    let transcriber = Transcriber::new(state.http.clone(), api_key)
        .map_err(|e| VoiceError::TranscriptionFailed(e.to_string()))?
        .with_polling(state.stt_poll_interval, state.stt_max_poll_attempts);

    let text = transcriber.transcribe(&body).await.map_err(|e| match e {
        Error::SttTimeout { attempts } => VoiceError::TranscriptionTimeout(attempts),
        other => VoiceError::TranscriptionFailed(other.to_string()),
    })?;

    Ok(Json(TranscribeResponse { text }))
}

/// Synthesis request
#[derive(Debug, Deserialize)]
pub struct SynthesizeRequest {
    pub text: String,
}

/// Synthesize text to speech
///
/// Returns raw audio bytes.
async fn synthesize(
    State(state): State<Arc<ApiState>>,
    Json(request): Json<SynthesizeRequest>,
) -> Result<Response, VoiceError> {
    let api_key = state
        .api_keys
        .gemini
        .clone()
        .ok_or(VoiceError::NotConfigured("TTS not configured (no Gemini key)"))?;

    if request.text.is_empty() {
        return Err(VoiceError::BadRequest("Empty text"));
    }

    let synthesizer = Synthesizer::new(state.http.clone(), api_key)
        .map_err(|e| VoiceError::SynthesisFailed(e.to_string()))?
        .with_voice(state.tts_voice.clone());

    let audio = synthesizer
        .synthesize(&request.text)
        .await
        .map_err(|e| VoiceError::SynthesisFailed(e.to_string()))?;

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "audio/wav")],
        audio,
    )
        .into_response())
}

/// Voice API errors
#[derive(Debug)]
pub enum VoiceError {
    NotConfigured(&'static str),
    BadRequest(&'static str),
    TranscriptionFailed(String),
    TranscriptionTimeout(u32),
    SynthesisFailed(String),
}

impl IntoResponse for VoiceError {
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
            Self::NotConfigured(msg) => {
                (StatusCode::SERVICE_UNAVAILABLE, "not_configured", msg.to_string())
            }
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.to_string()),
            Self::TranscriptionFailed(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "transcription_failed", msg)
            }
            Self::TranscriptionTimeout(attempts) => (
                StatusCode::GATEWAY_TIMEOUT,
                "transcription_timeout",
                format!("Transcription did not complete within {attempts} polls."),
            ),
            Self::SynthesisFailed(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "synthesis_failed", msg)
            }
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
