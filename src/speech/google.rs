//! Google Cloud Speech-to-Text (v1 `speech:recognize`) client.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use futures::future::{BoxFuture, FutureExt};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::{AudioFormat, SpeechError, Transcriber, Transcription};
use crate::config::Settings;

/// HTTP client for synchronous recognition of short recordings.
pub struct GoogleSpeechClient {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
    language: String,
}

impl GoogleSpeechClient {
    pub fn from_settings(settings: &Settings) -> Result<Self, SpeechError> {
        let client = Client::builder()
            .user_agent("query-assistant/0.1")
            .timeout(settings.speech_timeout())
            .build()
            .map_err(|e| SpeechError::Unexpected(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: settings.speech_api_url.clone(),
            api_key: settings.speech_api_key.clone(),
            language: settings.speech_language.clone(),
        })
    }

    async fn recognize(&self, audio: &[u8]) -> Result<String, SpeechError> {
        let api_key = self.api_key.as_deref().ok_or(SpeechError::NotConfigured)?;
        let format = AudioFormat::detect(audio).ok_or(SpeechError::UnsupportedFormat)?;

        let body = RecognizeRequest {
            config: RecognitionConfig {
                language_code: &self.language,
            },
            audio: RecognitionAudio {
                content: BASE64.encode(audio),
            },
        };
        let resp = self
            .client
            .post(&self.endpoint)
            .query(&[("key", api_key)])
            .json(&body)
            .send()
            .await
            .map_err(|e| SpeechError::Service(e.to_string()))?;
        let status = resp.status();
        if !status.is_success() {
            let detail = resp.text().await.unwrap_or_default();
            return Err(SpeechError::Service(format!("{status}: {}", detail.trim())));
        }
        let payload: RecognizeResponse = resp
            .json()
            .await
            .map_err(|e| SpeechError::Unexpected(e.to_string()))?;

        let transcript = best_transcript(&payload).ok_or(SpeechError::Unintelligible)?;
        info!(?format, chars = transcript.len(), "transcribed audio");
        Ok(transcript)
    }
}

impl Transcriber for GoogleSpeechClient {
    fn transcribe<'a>(&'a self, audio: &'a [u8]) -> BoxFuture<'a, Transcription> {
        async move {
            let result = self.recognize(audio).await;
            if let Err(err) = &result {
                warn!(%err, bytes = audio.len(), "transcription failed");
            }
            Transcription::from(result)
        }
        .boxed()
    }
}

/// Concatenate the top alternative of every result segment.
fn best_transcript(payload: &RecognizeResponse) -> Option<String> {
    let text = payload
        .results
        .iter()
        .filter_map(|r| r.alternatives.first())
        .map(|alt| alt.transcript.trim())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    (!text.is_empty()).then_some(text)
}

#[derive(Debug, Serialize)]
struct RecognizeRequest<'a> {
    config: RecognitionConfig<'a>,
    audio: RecognitionAudio,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RecognitionConfig<'a> {
    language_code: &'a str,
}

#[derive(Debug, Serialize)]
struct RecognitionAudio {
    content: String,
}

#[derive(Debug, Default, Deserialize)]
struct RecognizeResponse {
    #[serde(default)]
    results: Vec<RecognitionResult>,
}

#[derive(Debug, Deserialize)]
struct RecognitionResult {
    #[serde(default)]
    alternatives: Vec<RecognitionAlternative>,
}

#[derive(Debug, Deserialize)]
struct RecognitionAlternative {
    #[serde(default)]
    transcript: String,
}
