//! Speech-to-text via the AssemblyAI transcription API
//!
//! The API is asynchronous: upload the audio, create a transcript job, then
//! poll until it completes. The poll is bounded; exhausting the attempt
//! budget yields [`Error::SttTimeout`] rather than waiting forever.

use std::time::Duration;

use crate::{Error, Result};

const API_BASE: &str = "https://api.assemblyai.com/v2";

/// Default wait between status polls
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Default cap on status polls before giving up
pub const DEFAULT_MAX_POLL_ATTEMPTS: u32 = 60;

#[derive(Debug, serde::Deserialize)]
struct UploadResponse {
    upload_url: String,
}

#[derive(Debug, serde::Serialize)]
struct TranscriptRequest<'a> {
    audio_url: &'a str,
}

#[derive(Debug, serde::Deserialize)]
struct TranscriptJob {
    id: String,
}

#[derive(Debug, serde::Deserialize)]
struct TranscriptStatus {
    status: String,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Transcribes speech to text
#[derive(Debug)]
pub struct Transcriber {
    client: reqwest::Client,
    api_key: String,
    poll_interval: Duration,
    max_poll_attempts: u32,
}

impl Transcriber {
    /// Create a new transcriber
    ///
    /// # Errors
    ///
    /// Returns error if the API key is empty.
    pub fn new(client: reqwest::Client, api_key: String) -> Result<Self> {
        if api_key.is_empty() {
            return Err(Error::Config(
                "AssemblyAI API key required for transcription".to_string(),
            ));
        }
        Ok(Self {
            client,
            api_key,
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_poll_attempts: DEFAULT_MAX_POLL_ATTEMPTS,
        })
    }

    /// Override the poll cadence and attempt budget
    #[must_use]
    pub const fn with_polling(mut self, interval: Duration, max_attempts: u32) -> Self {
        self.poll_interval = interval;
        self.max_poll_attempts = max_attempts;
        self
    }

    /// Transcribe audio bytes to text
    ///
    /// # Errors
    ///
    /// Returns [`Error::Stt`] if any API step fails or the job reports an
    /// error, and [`Error::SttTimeout`] if the job does not complete within
    /// the attempt budget.
    pub async fn transcribe(&self, audio: &[u8]) -> Result<String> {
        tracing::debug!(audio_bytes = audio.len(), "starting transcription");

        let upload_url = self.upload(audio).await?;
        let job_id = self.create_job(&upload_url).await?;
        tracing::debug!(job_id = %job_id, "transcription job created");

        self.poll(&job_id).await
    }

    async fn upload(&self, audio: &[u8]) -> Result<String> {
        let response = self
            .client
            .post(format!("{API_BASE}/upload"))
            .header("authorization", &self.api_key)
            .body(audio.to_vec())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "audio upload failed");
            return Err(Error::Stt(format!("upload error {status}: {body}")));
        }

        let parsed: UploadResponse = response.json().await?;
        Ok(parsed.upload_url)
    }

    async fn create_job(&self, audio_url: &str) -> Result<String> {
        let response = self
            .client
            .post(format!("{API_BASE}/transcript"))
            .header("authorization", &self.api_key)
            .json(&TranscriptRequest { audio_url })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "transcript request failed");
            return Err(Error::Stt(format!("transcript error {status}: {body}")));
        }

        let job: TranscriptJob = response.json().await?;
        Ok(job.id)
    }

    async fn poll(&self, job_id: &str) -> Result<String> {
        for attempt in 1..=self.max_poll_attempts {
            let response = self
                .client
                .get(format!("{API_BASE}/transcript/{job_id}"))
                .header("authorization", &self.api_key)
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(Error::Stt(format!("status check error {status}: {body}")));
            }

            let job: TranscriptStatus = response.json().await?;
            match job.status.as_str() {
                "completed" => {
                    let text = job.text.unwrap_or_default();
                    tracing::info!(job_id = %job_id, attempt, "transcription complete");
                    return Ok(text);
                }
                "error" => {
                    let detail = job.error.unwrap_or_else(|| "unknown".to_string());
                    return Err(Error::Stt(format!("transcription failed: {detail}")));
                }
                other => {
                    tracing::trace!(job_id = %job_id, attempt, status = other, "still processing");
                }
            }

            tokio::time::sleep(self.poll_interval).await;
        }

        Err(Error::SttTimeout {
            attempts: self.max_poll_attempts,
        })
    }
}
