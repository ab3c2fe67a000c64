//! In-memory session registry
//!
//! Sessions live for exactly one client connection: created on demand,
//! mutated only by their own connection handler, removed in their entirety on
//! disconnect. The registry is the only structure shared across connections
//! and is only ever inserted into, looked up, or removed from by session id.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::persona::Persona;
use crate::{Error, Result};

/// Default cap on live sessions
pub const DEFAULT_CAPACITY: usize = 256;

/// Speaker of a conversation turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One (role, text) entry in a session's history
#[derive(Debug, Clone, Serialize)]
pub struct Turn {
    pub role: Role,
    pub text: String,
}

/// Per-session provider credentials, submitted over the REST credential route
///
/// A `None` entry means the matching adapter runs in demo mode.
#[derive(Debug, Clone, Default)]
pub struct SessionKeys {
    /// Google Gemini key (chat + TTS)
    pub gemini: Option<String>,
    /// OpenWeather key (weather tool)
    pub openweather: Option<String>,
    /// Tavily key (news + web search tools)
    pub tavily: Option<String>,
    /// AssemblyAI key (transcription)
    pub assemblyai: Option<String>,
}

impl SessionKeys {
    /// Names of the providers that have a credential stored
    #[must_use]
    pub fn configured(&self) -> Vec<&'static str> {
        let mut keys = Vec::new();
        if self.gemini.is_some() {
            keys.push("gemini");
        }
        if self.openweather.is_some() {
            keys.push("openweather");
        }
        if self.tavily.is_some() {
            keys.push("tavily");
        }
        if self.assemblyai.is_some() {
            keys.push("assemblyai");
        }
        keys
    }
}

/// One client's conversation state, connect to disconnect
#[derive(Debug)]
pub struct Session {
    pub id: String,
    /// Append-only, strict chronological order. Seeded with the persona
    /// system prompt and greeting, so length is `2 * message_count + 2`.
    pub history: Vec<Turn>,
    pub persona: Persona,
    pub keys: SessionKeys,
    /// Completed user/assistant exchanges
    pub message_count: u32,
    pub created_at: DateTime<Utc>,
}

impl Session {
    fn new(persona: Persona) -> Self {
        let history = vec![
            Turn {
                role: Role::System,
                text: persona.system_prompt().to_string(),
            },
            Turn {
                role: Role::Assistant,
                text: persona.greeting().to_string(),
            },
        ];
        Self {
            id: Uuid::new_v4().to_string(),
            history,
            persona,
            keys: SessionKeys::default(),
            message_count: 0,
            created_at: Utc::now(),
        }
    }

    /// Append a user turn
    pub fn push_user(&mut self, text: impl Into<String>) {
        self.history.push(Turn {
            role: Role::User,
            text: text.into(),
        });
    }

    /// Append an assistant turn and count the completed exchange
    pub fn push_assistant(&mut self, text: impl Into<String>) {
        self.history.push(Turn {
            role: Role::Assistant,
            text: text.into(),
        });
        self.message_count += 1;
    }

    /// Switch persona for subsequent turns
    ///
    /// Already-recorded history is left untouched; only the prompt used for
    /// future chat turns changes.
    pub fn set_persona(&mut self, persona: Persona) {
        self.persona = persona;
    }
}

/// Shared handle to one session's state
pub type SessionHandle = Arc<Mutex<Session>>;

/// Size-bounded registry of live sessions keyed by id
#[derive(Debug)]
pub struct SessionRegistry {
    inner: RwLock<HashMap<String, SessionHandle>>,
    capacity: usize,
}

impl SessionRegistry {
    /// Create a registry holding at most `capacity` live sessions
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
            capacity,
        }
    }

    /// Create a session and return its shared handle
    ///
    /// # Errors
    ///
    /// Returns [`Error::SessionLimit`] when the registry is at capacity.
    pub async fn create(&self, persona: Persona) -> Result<SessionHandle> {
        let mut sessions = self.inner.write().await;
        if sessions.len() >= self.capacity {
            return Err(Error::SessionLimit(sessions.len()));
        }
        let session = Session::new(persona);
        let id = session.id.clone();
        let handle = Arc::new(Mutex::new(session));
        sessions.insert(id.clone(), Arc::clone(&handle));
        tracing::info!(session_id = %id, live = sessions.len(), "session created");
        Ok(handle)
    }

    /// Look up a session by id
    pub async fn get(&self, id: &str) -> Option<SessionHandle> {
        self.inner.read().await.get(id).cloned()
    }

    /// Remove a session, dropping all its state
    pub async fn remove(&self, id: &str) {
        if self.inner.write().await.remove(id).is_some() {
            tracing::info!(session_id = %id, "session removed");
        }
    }

    /// Number of live sessions
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    /// Whether no sessions are live
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn new_session_is_seeded_with_system_and_greeting() {
        let registry = SessionRegistry::default();
        let handle = registry.create(Persona::Default).await.unwrap();
        let session = handle.lock().await;

        assert_eq!(session.history.len(), 2);
        assert_eq!(session.history[0].role, Role::System);
        assert_eq!(session.history[1].role, Role::Assistant);
        assert_eq!(session.message_count, 0);
    }

    #[tokio::test]
    async fn history_grows_by_two_per_exchange() {
        let registry = SessionRegistry::default();
        let handle = registry.create(Persona::Default).await.unwrap();
        let mut session = handle.lock().await;

        for n in 1..=3 {
            session.push_user(format!("question {n}"));
            session.push_assistant(format!("answer {n}"));
            assert_eq!(session.history.len(), 2 * n + 2);
            assert_eq!(session.message_count, u32::try_from(n).unwrap());
        }

        // Order is strictly chronological
        assert_eq!(session.history[2].text, "question 1");
        assert_eq!(session.history[3].text, "answer 1");
        assert_eq!(session.history[4].text, "question 2");
    }

    #[tokio::test]
    async fn remove_drops_all_state() {
        let registry = SessionRegistry::default();
        let handle = registry.create(Persona::Default).await.unwrap();
        let id = handle.lock().await.id.clone();

        assert!(registry.get(&id).await.is_some());
        registry.remove(&id).await;
        assert!(registry.get(&id).await.is_none());
        assert!(registry.is_empty().await);
    }

    #[tokio::test]
    async fn create_fails_at_capacity() {
        let registry = SessionRegistry::new(2);
        registry.create(Persona::Default).await.unwrap();
        registry.create(Persona::Default).await.unwrap();

        let err = registry.create(Persona::Default).await.unwrap_err();
        assert!(matches!(err, Error::SessionLimit(2)));
        assert_eq!(registry.len().await, 2);
    }

    #[tokio::test]
    async fn configured_keys_reflect_stored_credentials() {
        let mut keys = SessionKeys::default();
        assert!(keys.configured().is_empty());

        keys.gemini = Some("g-key".to_string());
        keys.tavily = Some("t-key".to_string());
        assert_eq!(keys.configured(), vec!["gemini", "tavily"]);
    }
}
