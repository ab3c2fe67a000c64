//! WebSocket transport handler for the conversational pipeline
//!
//! One sequential handler per connection: inbound messages are processed one
//! at a time, and the loop suspends while a tool or chat call is outstanding.
//! Each pipeline run emits a fixed event sequence: `ack_transcript`, the
//! echoed `final` transcript, the `llm_response`, then an `audio_end` marker
//! telling the client to fall back to local speech synthesis. No processing
//! error closes the connection; the session is torn down only on disconnect.

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket},
        Path, State, WebSocketUpgrade,
    },
    response::IntoResponse,
    routing::get,
    Router,
};
use futures::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use super::ApiState;
use crate::intent::Intent;
use crate::llm::{self, GeminiClient};
use crate::persona::Persona;
use crate::session::{SessionHandle, SessionKeys, Turn};
use crate::tools;

/// Shortest transcript accepted by the pipeline, in characters
pub const MIN_TRANSCRIPT_LEN: usize = 3;

/// Incoming WebSocket message from client
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WsIncoming {
    /// Switch the session persona
    Persona { persona: String },
    /// A finished utterance to run through the pipeline
    UserTranscript { text: String },
}

/// Outgoing WebSocket message to client
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WsOutgoing {
    /// Transcript received, pipeline starting
    AckTranscript,
    /// Echo of the transcript being answered
    Final { text: String },
    /// The assistant reply for this turn
    LlmResponse {
        text: String,
        persona: String,
        message_count: u32,
        has_functions: bool,
        function_used: Option<String>,
        api_keys_status: ApiKeysStatus,
    },
    /// No server audio follows; the client should synthesize locally
    AudioEnd { source: String, message: String },
    /// Persona switch acknowledged
    PersonaAck { persona: String },
    /// Error occurred; the connection stays open
    Error { message: String },
}

/// Which conversation-side providers have a credential stored
#[derive(Debug, Serialize)]
pub struct ApiKeysStatus {
    pub gemini: bool,
    pub openweather: bool,
    pub tavily: bool,
}

impl ApiKeysStatus {
    fn from_keys(keys: &SessionKeys) -> Self {
        Self {
            gemini: keys.gemini.is_some(),
            openweather: keys.openweather.is_some(),
            tavily: keys.tavily.is_some(),
        }
    }
}

/// Build WebSocket router
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/{session_id}", get(ws_upgrade))
        .with_state(state)
}

/// Handle WebSocket upgrade request
async fn ws_upgrade(
    State(state): State<Arc<ApiState>>,
    Path(session_id): Path<String>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state, session_id))
}

/// Handle one WebSocket connection, connect to disconnect
async fn handle_socket(socket: WebSocket, state: Arc<ApiState>, session_id: String) {
    let (mut sender, mut receiver) = socket.split();

    let Some(session) = state.registry.get(&session_id).await else {
        tracing::warn!(session_id = %session_id, "WebSocket for unknown session");
        let error = WsOutgoing::Error {
            message: "Unknown session. Create one via POST /session first.".to_string(),
        };
        if let Ok(msg) = serde_json::to_string(&error) {
            let _ = sender.send(Message::Text(msg.into())).await;
        }
        return;
    };

    tracing::info!(session_id = %session_id, "WebSocket connected");

    // Outbound events flow through a channel so the pipeline never touches
    // the raw sink directly.
    let (tx, mut rx) = mpsc::channel::<WsOutgoing>(32);
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if let Ok(text) = serde_json::to_string(&msg) {
                if sender.send(Message::Text(text.into())).await.is_err() {
                    break;
                }
            }
        }
    });

    // Sequential receive loop: one inbound message at a time
    while let Some(Ok(msg)) = receiver.next().await {
        match msg {
            Message::Text(text) => {
                if let Err(e) = handle_message(&text, &state, &session, &tx).await {
                    tracing::error!(session_id = %session_id, error = %e, "message handling failed");
                    let error = WsOutgoing::Error {
                        message: "Something went wrong processing that. Please try again."
                            .to_string(),
                    };
                    if tx.send(error).await.is_err() {
                        break;
                    }
                }
            }
            Message::Close(_) => {
                tracing::info!(session_id = %session_id, "WebSocket closed by client");
                break;
            }
            _ => {}
        }
    }

    // Per-session cleanup: all state goes with the connection
    state.registry.remove(&session_id).await;
    drop(tx);
    send_task.abort();
    tracing::info!(session_id = %session_id, "WebSocket disconnected");
}

/// Handle a single incoming message
async fn handle_message(
    text: &str,
    state: &Arc<ApiState>,
    session: &SessionHandle,
    tx: &mpsc::Sender<WsOutgoing>,
) -> crate::Result<()> {
    let Ok(incoming) = serde_json::from_str::<WsIncoming>(text) else {
        send(tx, WsOutgoing::Error {
            message: "Unrecognized message.".to_string(),
        })
        .await?;
        return Ok(());
    };

    match incoming {
        WsIncoming::Persona { persona } => match Persona::parse(&persona) {
            Ok(persona) => {
                session.lock().await.set_persona(persona);
                send(tx, WsOutgoing::PersonaAck {
                    persona: persona.id().to_string(),
                })
                .await?;
            }
            Err(e) => {
                tracing::warn!(error = %e, "persona switch rejected");
                send(tx, WsOutgoing::Error {
                    message: format!("Unknown persona \"{persona}\"."),
                })
                .await?;
            }
        },
        WsIncoming::UserTranscript { text } => {
            let text = text.trim();
            if text.chars().count() < MIN_TRANSCRIPT_LEN {
                send(tx, WsOutgoing::Error {
                    message: format!(
                        "I didn't catch that. Transcripts need at least \
                         {MIN_TRANSCRIPT_LEN} characters."
                    ),
                })
                .await?;
                return Ok(());
            }
            run_pipeline(state, session, text, tx).await?;
        }
    }

    Ok(())
}

/// Run one pipeline turn: classify, answer, record, emit the event sequence
async fn run_pipeline(
    state: &Arc<ApiState>,
    session: &SessionHandle,
    transcript: &str,
    tx: &mpsc::Sender<WsOutgoing>,
) -> crate::Result<()> {
    send(tx, WsOutgoing::AckTranscript).await?;

    // Record the user turn and snapshot what the adapters need, so no lock
    // is held across the external call.
    let (keys, history) = {
        let mut session = session.lock().await;
        session.push_user(transcript);
        (session.keys.clone(), session.history.clone())
    };

    send(tx, WsOutgoing::Final {
        text: transcript.to_string(),
    })
    .await?;

    let intent = Intent::classify(transcript);
    tracing::debug!(?intent, "transcript classified");

    let reply = match intent {
        Intent::Chat => chat_reply(state, &keys, &history).await,
        tool => {
            let result = tools::run_tool(tool, transcript, &keys, &state.http).await;
            tracing::debug!(
                source = result.source,
                status = ?result.status,
                "tool result"
            );
            result.reply
        }
    };

    let (persona, message_count, keys_status) = {
        let mut session = session.lock().await;
        session.push_assistant(reply.clone());
        (
            session.persona,
            session.message_count,
            ApiKeysStatus::from_keys(&session.keys),
        )
    };

    let function_used = intent.function_name().map(str::to_string);
    send(tx, WsOutgoing::LlmResponse {
        text: reply,
        persona: persona.id().to_string(),
        message_count,
        has_functions: function_used.is_some(),
        function_used,
        api_keys_status: keys_status,
    })
    .await?;

    send(tx, WsOutgoing::AudioEnd {
        source: "browser_tts".to_string(),
        message: "Synthesize the reply with local speech synthesis.".to_string(),
    })
    .await?;

    Ok(())
}

/// Produce a chat reply from the full session history
///
/// Never fails: a missing credential becomes a configure-me prompt and a
/// failed call becomes the canned apology.
async fn chat_reply(state: &Arc<ApiState>, keys: &SessionKeys, history: &[Turn]) -> String {
    let Some(api_key) = keys.gemini.clone() else {
        return llm::CONFIGURE_KEY_PROMPT.to_string();
    };

    let client = match GeminiClient::new(state.http.clone(), api_key, state.llm_model.clone()) {
        Ok(client) => client,
        Err(e) => {
            tracing::error!(error = %e, "chat client setup failed");
            return llm::APOLOGY.to_string();
        }
    };

    match client.generate(history).await {
        Ok(text) => text,
        Err(e) => {
            tracing::error!(error = %e, "chat completion failed");
            llm::APOLOGY.to_string()
        }
    }
}

async fn send(tx: &mpsc::Sender<WsOutgoing>, msg: WsOutgoing) -> crate::Result<()> {
    tx.send(msg)
        .await
        .map_err(|_| crate::Error::Session("client channel closed".to_string()))
}
