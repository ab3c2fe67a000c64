//! Tool adapters for non-conversational capabilities
//!
//! One adapter per capability: weather, news, web search, system stats, and
//! clock. Each takes the transcript (or a parameter extracted from it) plus
//! the session's stored credentials and normalizes its output into a
//! [`ToolResult`]. Adapters never raise past their boundary: a missing
//! credential or a failed external call degrades to deterministic placeholder
//! data tagged [`ToolStatus::Demo`].

pub mod clock;
pub mod news;
pub mod search;
pub mod system;
pub mod weather;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::intent::{self, Intent};
use crate::session::SessionKeys;

/// Outcome classification of a tool invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolStatus {
    /// Live data from the external service
    Success,
    /// Placeholder data; no credential configured or the call failed
    Demo,
    /// The adapter could not produce data at all
    Error,
}

/// Reply fragment produced by one tool invocation
///
/// Ephemeral: produced and consumed within a single turn.
#[derive(Debug, Clone, Serialize)]
pub struct ToolResult {
    pub status: ToolStatus,
    /// Text spoken back to the user
    pub reply: String,
    /// Label of the producing service ("openweather", "tavily", ...)
    pub source: &'static str,
    pub timestamp: DateTime<Utc>,
}

impl ToolResult {
    pub(crate) fn success(reply: impl Into<String>, source: &'static str) -> Self {
        Self {
            status: ToolStatus::Success,
            reply: reply.into(),
            source,
            timestamp: Utc::now(),
        }
    }

    pub(crate) fn demo(reply: impl Into<String>, source: &'static str) -> Self {
        Self {
            status: ToolStatus::Demo,
            reply: reply.into(),
            source,
            timestamp: Utc::now(),
        }
    }
}

/// Dispatch a classified transcript to its tool adapter
///
/// `intent` must be a tool category; callers route [`Intent::Chat`] to the
/// chat adapter instead.
pub async fn run_tool(
    intent: Intent,
    transcript: &str,
    keys: &SessionKeys,
    client: &reqwest::Client,
) -> ToolResult {
    match intent {
        Intent::Weather => {
            let location = intent::extract_location(transcript);
            weather::current(location.as_deref(), keys, client).await
        }
        Intent::News => news::headlines(transcript, keys, client).await,
        Intent::Search => search::web(transcript, keys, client).await,
        Intent::System => system::report(),
        Intent::Time => clock::now(),
        // Chat is routed to the chat adapter before dispatch
        Intent::Chat => clock::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn tool_dispatch_never_errors_without_credentials() {
        let keys = SessionKeys::default();
        let client = reqwest::Client::new();

        for (intent, transcript) in [
            (Intent::Weather, "what's the weather in Paris?"),
            (Intent::News, "any news today?"),
            (Intent::Search, "search for rust tutorials"),
        ] {
            let result = run_tool(intent, transcript, &keys, &client).await;
            assert_eq!(result.status, ToolStatus::Demo, "{intent:?}");
            assert!(!result.reply.is_empty());
        }

        // Local tools need no credentials at all
        for intent in [Intent::System, Intent::Time] {
            let result = run_tool(intent, "", &keys, &client).await;
            assert_eq!(result.status, ToolStatus::Success, "{intent:?}");
        }
    }
}
