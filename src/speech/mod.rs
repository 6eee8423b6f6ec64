//! Speech-to-text collaborators.

pub mod google;

use futures::future::BoxFuture;
use serde::Serialize;
use thiserror::Error;

pub use google::GoogleSpeechClient;

#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("Speech recognition is not configured")]
    NotConfigured,

    #[error("Unsupported audio format; expected WAV or FLAC")]
    UnsupportedFormat,

    #[error("Could not understand the audio")]
    Unintelligible,

    #[error("Speech recognition service error: {0}")]
    Service(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Outcome of a transcription attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transcription {
    pub success: bool,
    pub text: Option<String>,
    pub error: Option<String>,
}

impl Transcription {
    pub fn recognized(text: impl Into<String>) -> Self {
        Self {
            success: true,
            text: Some(text.into()),
            error: None,
        }
    }

    pub fn failed(error: &SpeechError) -> Self {
        Self {
            success: false,
            text: None,
            error: Some(error.to_string()),
        }
    }
}

impl From<Result<String, SpeechError>> for Transcription {
    fn from(result: Result<String, SpeechError>) -> Self {
        match result {
            Ok(text) => Self::recognized(text),
            Err(err) => Self::failed(&err),
        }
    }
}

/// Turns recorded audio into text.
pub trait Transcriber: Send + Sync {
    fn transcribe<'a>(&'a self, audio: &'a [u8]) -> BoxFuture<'a, Transcription>;
}

/// Container formats the recogniser accepts without explicit encoding hints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    Wav,
    Flac,
}

impl AudioFormat {
    /// Sniff the container from its magic bytes.
    pub fn detect(audio: &[u8]) -> Option<Self> {
        if audio.len() >= 12 && &audio[0..4] == b"RIFF" && &audio[8..12] == b"WAVE" {
            Some(Self::Wav)
        } else if audio.starts_with(b"fLaC") {
            Some(Self::Flac)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_containers() {
        let mut wav = b"RIFF".to_vec();
        wav.extend_from_slice(&[0, 0, 0, 0]);
        wav.extend_from_slice(b"WAVEfmt ");
        assert_eq!(AudioFormat::detect(&wav), Some(AudioFormat::Wav));
        assert_eq!(AudioFormat::detect(b"fLaC\0\0\0\x22"), Some(AudioFormat::Flac));
        assert_eq!(AudioFormat::detect(b"ID3\x03"), None);
        assert_eq!(AudioFormat::detect(b""), None);
    }

    #[test]
    fn failed_transcription_carries_message() {
        let outcome: Transcription = Err(SpeechError::Unintelligible).into();
        assert!(!outcome.success);
        assert_eq!(outcome.error.as_deref(), Some("Could not understand the audio"));
    }
}
