//! Chat adapter for the Google Gemini `generateContent` API
//!
//! Handles the fallback strategy: the full session history is forwarded on
//! every call, and a failed call becomes a canned apology at the pipeline
//! level rather than an error to the client.

use serde::{Deserialize, Serialize};

use crate::session::{Role, Turn};
use crate::{Error, Result};

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Default chat model
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash-latest";

/// Reply when no Gemini credential is configured for the session
pub const CONFIGURE_KEY_PROMPT: &str =
    "I don't have an AI key configured yet. Open the settings panel and add a \
     Gemini API key to enable free-form chat.";

/// Reply when the chat call fails; no retry is attempted
pub const APOLOGY: &str =
    "Sorry, I'm having trouble thinking right now. Please try again in a moment.";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

/// Gemini chat completion client
#[derive(Debug)]
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

impl GeminiClient {
    /// Create a client for the given per-session key
    ///
    /// # Errors
    ///
    /// Returns error if the key is empty.
    pub fn new(client: reqwest::Client, api_key: String, model: String) -> Result<Self> {
        if api_key.is_empty() {
            return Err(Error::Config("Gemini API key required for chat".to_string()));
        }
        Ok(Self {
            client,
            api_key,
            model,
        })
    }

    /// Generate a reply from the accumulated session history
    ///
    /// System turns become the `systemInstruction`; user and assistant turns
    /// map to `user`/`model` contents in order.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the response carries no text.
    pub async fn generate(&self, history: &[Turn]) -> Result<String> {
        let system_text = history
            .iter()
            .find(|t| t.role == Role::System)
            .map(|t| t.text.as_str());

        let contents: Vec<Content<'_>> = history
            .iter()
            .filter_map(|turn| {
                let role = match turn.role {
                    Role::User => "user",
                    Role::Assistant => "model",
                    Role::System => return None,
                };
                Some(Content {
                    role: Some(role),
                    parts: vec![Part { text: &turn.text }],
                })
            })
            .collect();

        let request = GenerateRequest {
            contents,
            system_instruction: system_text.map(|text| Content {
                role: None,
                parts: vec![Part { text }],
            }),
        };

        let url = format!(
            "{API_BASE}/{}:generateContent?key={}",
            self.model, self.api_key
        );

        tracing::debug!(model = %self.model, turns = history.len(), "requesting chat completion");

        let response = self.client.post(&url).json(&request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "Gemini API error");
            return Err(Error::Llm(format!("Gemini API error {status}: {body}")));
        }

        let parsed: GenerateResponse = response.json().await.map_err(|e| {
            tracing::error!(error = %e, "failed to parse Gemini response");
            e
        })?;

        let text = parsed
            .candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .map(|p| p.text.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| Error::Llm("Gemini response carried no text".to_string()))?;

        Ok(text)
    }
}
