//! Natural language to SQL orchestration layer.

pub mod corpus;
pub mod entities;
pub mod features;
pub mod intent;
pub mod normalize;

use std::sync::Arc;

use anyhow::Result;
use once_cell::sync::OnceCell;
use serde::Serialize;
use tracing::info;

use crate::{config::Settings, sql};

use corpus::IntentLabel;
use entities::EntitySet;
use intent::{Classification, IntentClassifier};
use normalize::TextNormalizer;

static SHARED: OnceCell<Arc<QueryEngine>> = OnceCell::new();

/// Result of translating one question.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Translation {
    pub intent: IntentLabel,
    pub confidence: Option<f64>,
    pub entities: EntitySet,
    pub sql: String,
}

/// Immutable question-to-SQL engine; safe to share across request handlers.
#[derive(Debug, Clone)]
pub struct QueryEngine {
    classifier: IntentClassifier,
}

impl QueryEngine {
    pub fn new(classifier: IntentClassifier) -> Self {
        Self { classifier }
    }

    /// Load the persisted classifier or train one.
    pub fn load_or_train(settings: &Settings) -> Result<Self> {
        let normalizer = TextNormalizer::from_settings(settings);
        let classifier = IntentClassifier::load_or_train(settings, normalizer)?;
        Ok(Self::new(classifier))
    }

    /// Process-wide engine, initialised at most once.
    ///
    /// Later calls return the first engine regardless of `settings`.
    pub fn shared(settings: &Settings) -> Result<Arc<Self>> {
        SHARED
            .get_or_try_init(|| {
                info!("initialising shared query engine");
                Self::load_or_train(settings).map(Arc::new)
            })
            .cloned()
    }

    pub fn classifier(&self) -> &IntentClassifier {
        &self.classifier
    }

    pub fn classify(&self, text: &str) -> Classification {
        self.classifier.classify(text)
    }

    pub fn classify_intent(&self, text: &str) -> IntentLabel {
        self.classifier.classify_intent(text)
    }

    /// Classify, extract entities and synthesise SQL in one pass.
    pub fn translate(&self, text: &str) -> Translation {
        let classification = self.classify(text);
        let lowered = text.to_lowercase();
        let entities = entities::extract_entities(&lowered);
        let intent = classification.label();
        let sql = sql::build_sql(intent, &lowered, &entities);
        Translation {
            intent,
            confidence: classification.confidence(),
            entities,
            sql,
        }
    }

    pub fn text_to_sql(&self, text: &str) -> String {
        self.translate(text).sql
    }
}
