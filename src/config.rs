//! Runtime configuration utilities for query-assistant.

use std::{
    env,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context;
use serde::Deserialize;

const GOOGLE_SPEECH_URL: &str = "https://speech.googleapis.com/v1/speech:recognize";

/// Application configuration resolved from `.env` and defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// SQLite database file holding the sample dataset.
    pub database_path: PathBuf,
    /// Folder for the persisted intent classifier.
    pub models_dir: PathBuf,
    /// Optional newline separated stopword list replacing the built-in one.
    pub stopwords_path: Option<PathBuf>,
    /// Speech recognition endpoint.
    pub speech_api_url: String,
    /// API key for the speech endpoint; transcription is disabled without it.
    pub speech_api_key: Option<String>,
    /// BCP-47 language tag sent with audio.
    pub speech_language: String,
    /// Upper bound on a single transcription request.
    pub speech_timeout_secs: u64,
}

impl Settings {
    /// Load configuration from environment with reasonable defaults.
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let database_path = env::var("DATABASE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./data/query_assistant.db"));
        let models_dir = env::var("MODELS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./models"));
        let stopwords_path = env::var("STOPWORDS_PATH").ok().map(PathBuf::from);
        let speech_api_url =
            env::var("SPEECH_API_URL").unwrap_or_else(|_| GOOGLE_SPEECH_URL.to_string());
        let speech_api_key = env::var("SPEECH_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty());
        let speech_language = env::var("SPEECH_LANGUAGE").unwrap_or_else(|_| "en-US".to_string());
        let speech_timeout_secs = env::var("SPEECH_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(30);

        if let Some(parent) = database_path.parent() {
            std::fs::create_dir_all(parent).context("creating database dir")?;
        }
        std::fs::create_dir_all(&models_dir).context("creating models dir")?;

        Ok(Self {
            database_path,
            models_dir,
            stopwords_path,
            speech_api_url,
            speech_api_key,
            speech_language,
            speech_timeout_secs,
        })
    }

    /// Settings rooted in a single directory, with speech disabled.
    ///
    /// Used by tests and ad-hoc tooling that should not touch the working
    /// directory or the environment.
    pub fn rooted<P: AsRef<Path>>(root: P) -> Self {
        let root = root.as_ref();
        Self {
            database_path: root.join("query_assistant.db"),
            models_dir: root.join("models"),
            stopwords_path: None,
            speech_api_url: GOOGLE_SPEECH_URL.to_string(),
            speech_api_key: None,
            speech_language: "en-US".to_string(),
            speech_timeout_secs: 30,
        }
    }

    /// Location of the persisted classifier artifact.
    pub fn classifier_path(&self) -> PathBuf {
        self.models_dir.join("intent_classifier.json")
    }

    pub fn speech_timeout(&self) -> Duration {
        Duration::from_secs(self.speech_timeout_secs)
    }
}
