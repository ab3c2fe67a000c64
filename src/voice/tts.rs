//! Text-to-speech via the Gemini TTS API
//!
//! The speech endpoint is the same `generateContent` shape as chat, with
//! `responseModalities: ["AUDIO"]` and a prebuilt voice; the audio comes back
//! base64-encoded inside the candidate parts.

use base64::Engine as _;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Default TTS model
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-preview-tts";

/// Default prebuilt voice
pub const DEFAULT_VOICE: &str = "Kore";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SpeechRequest<'a> {
    contents: Vec<SpeechContent<'a>>,
    generation_config: GenerationConfig<'a>,
    model: &'a str,
}

#[derive(Debug, Serialize)]
struct SpeechContent<'a> {
    parts: Vec<SpeechPart<'a>>,
}

#[derive(Debug, Serialize)]
struct SpeechPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    response_modalities: [&'static str; 1],
    speech_config: SpeechConfig<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SpeechConfig<'a> {
    voice_config: VoiceConfig<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VoiceConfig<'a> {
    prebuilt_voice_config: PrebuiltVoiceConfig<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PrebuiltVoiceConfig<'a> {
    voice_name: &'a str,
}

#[derive(Debug, Deserialize)]
struct SpeechResponse {
    #[serde(default)]
    candidates: Vec<SpeechCandidate>,
}

#[derive(Debug, Deserialize)]
struct SpeechCandidate {
    content: SpeechCandidateContent,
}

#[derive(Debug, Deserialize)]
struct SpeechCandidateContent {
    #[serde(default)]
    parts: Vec<SpeechCandidatePart>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SpeechCandidatePart {
    inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
struct InlineData {
    data: String,
}

/// Synthesizes speech from text
#[derive(Debug)]
pub struct Synthesizer {
    client: reqwest::Client,
    api_key: String,
    model: String,
    voice: String,
}

impl Synthesizer {
    /// Create a new synthesizer
    ///
    /// # Errors
    ///
    /// Returns error if the API key is empty.
    pub fn new(client: reqwest::Client, api_key: String) -> Result<Self> {
        if api_key.is_empty() {
            return Err(Error::Config(
                "Gemini API key required for speech synthesis".to_string(),
            ));
        }
        Ok(Self {
            client,
            api_key,
            model: DEFAULT_MODEL.to_string(),
            voice: DEFAULT_VOICE.to_string(),
        })
    }

    /// Override the voice name
    #[must_use]
    pub fn with_voice(mut self, voice: String) -> Self {
        self.voice = voice;
        self
    }

    /// Synthesize text to audio bytes
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the response carries no audio.
    pub async fn synthesize(&self, text: &str) -> Result<Vec<u8>> {
        let request = SpeechRequest {
            contents: vec![SpeechContent {
                parts: vec![SpeechPart { text }],
            }],
            generation_config: GenerationConfig {
                response_modalities: ["AUDIO"],
                speech_config: SpeechConfig {
                    voice_config: VoiceConfig {
                        prebuilt_voice_config: PrebuiltVoiceConfig {
                            voice_name: &self.voice,
                        },
                    },
                },
            },
            model: &self.model,
        };

        let url = format!(
            "{API_BASE}/{}:generateContent?key={}",
            self.model, self.api_key
        );

        let response = self.client.post(&url).json(&request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "TTS API error");
            return Err(Error::Tts(format!("TTS API error {status}: {body}")));
        }

        let parsed: SpeechResponse = response.json().await.map_err(|e| {
            tracing::error!(error = %e, "failed to parse TTS response");
            e
        })?;

        let encoded = parsed
            .candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .and_then(|p| p.inline_data.as_ref())
            .map(|d| d.data.as_str())
            .ok_or_else(|| Error::Tts("TTS response carried no audio".to_string()))?;

        let audio = base64::engine::general_purpose::STANDARD
            .decode(encoded)
            .map_err(|e| Error::Tts(format!("audio payload was not valid base64: {e}")))?;

        tracing::debug!(audio_bytes = audio.len(), "synthesis complete");
        Ok(audio)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_key_is_rejected() {
        let err = Synthesizer::new(reqwest::Client::new(), String::new()).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn request_carries_audio_modality_and_voice() {
        let request = SpeechRequest {
            contents: vec![SpeechContent {
                parts: vec![SpeechPart { text: "hello" }],
            }],
            generation_config: GenerationConfig {
                response_modalities: ["AUDIO"],
                speech_config: SpeechConfig {
                    voice_config: VoiceConfig {
                        prebuilt_voice_config: PrebuiltVoiceConfig { voice_name: "Kore" },
                    },
                },
            },
            model: DEFAULT_MODEL,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["generationConfig"]["responseModalities"][0], "AUDIO");
        assert_eq!(
            json["generationConfig"]["speechConfig"]["voiceConfig"]["prebuiltVoiceConfig"]
                ["voiceName"],
            "Kore"
        );
    }

    #[test]
    fn parses_inline_audio_payload() {
        let json = r#"{
            "candidates": [{
                "content": {"parts": [{"inlineData": {"data": "aGVsbG8="}}]}
            }]
        }"#;
        let parsed: SpeechResponse = serde_json::from_str(json).unwrap();
        let encoded = parsed.candidates[0].content.parts[0]
            .inline_data
            .as_ref()
            .unwrap();
        assert_eq!(
            base64::engine::general_purpose::STANDARD
                .decode(&encoded.data)
                .unwrap(),
            b"hello"
        );
    }
}
