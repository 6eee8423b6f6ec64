//! Intent classification: TF-IDF features and a multinomial logistic model.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use linfa::{dataset::DatasetBase, prelude::Fit};
use linfa_logistic::MultiLogisticRegression;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    config::Settings,
    nlp::{
        corpus::{self, IntentLabel},
        features::{TfidfVectorizer, VectorizerConfig},
        normalize::TextNormalizer,
    },
};

/// Predictions at or below this probability are reported as unknown.
pub const CONFIDENCE_FLOOR: f64 = 0.30;

const ARTIFACT_VERSION: u32 = 2;
const REGULARISATION: f64 = 1e-3;
const MAX_ITERATIONS: u64 = 500;

/// Outcome of classifying one question.
#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    Confident { label: IntentLabel, confidence: f64 },
    Unknown { reason: UnknownReason },
}

/// Why a question could not be assigned a trained intent.
#[derive(Debug, Clone, PartialEq)]
pub enum UnknownReason {
    /// Nothing in the text overlaps the training vocabulary.
    NoFeatures,
    /// The best label did not clear [`CONFIDENCE_FLOOR`].
    LowConfidence { best: IntentLabel, confidence: f64 },
    /// The model produced non-finite scores.
    InvalidScores,
}

impl Classification {
    pub fn label(&self) -> IntentLabel {
        match self {
            Self::Confident { label, .. } => *label,
            Self::Unknown { .. } => IntentLabel::Unknown,
        }
    }

    pub fn confidence(&self) -> Option<f64> {
        match self {
            Self::Confident { confidence, .. } => Some(*confidence),
            Self::Unknown {
                reason: UnknownReason::LowConfidence { confidence, .. },
            } => Some(*confidence),
            Self::Unknown { .. } => None,
        }
    }
}

/// Failures reading or writing the persisted classifier.
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("artifact io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("artifact is not valid json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("artifact version {found} does not match expected {expected}")]
    Version { found: u32, expected: u32 },

    #[error("artifact shapes are inconsistent: {0}")]
    Inconsistent(String),

    #[error("artifact was trained with a different text normaliser")]
    NormalizerMismatch,
}

/// Linear scores per class, softmax-normalised at inference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct LinearModel {
    classes: Vec<IntentLabel>,
    /// `(n_features, n_classes)`
    weights: Array2<f64>,
    intercept: Array1<f64>,
}

/// Everything needed to classify without retraining.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentArtifact {
    version: u32,
    /// [`TextNormalizer::fingerprint`] of the normaliser used for training.
    normalizer: String,
    vectorizer: TfidfVectorizer,
    model: LinearModel,
}

impl IntentArtifact {
    pub fn vectorizer(&self) -> &TfidfVectorizer {
        &self.vectorizer
    }

    /// Check versions and shapes, and that `normalizer` reproduces the
    /// training-time token stream.
    fn validate(&self, normalizer: &TextNormalizer) -> Result<(), ArtifactError> {
        if self.version != ARTIFACT_VERSION {
            return Err(ArtifactError::Version {
                found: self.version,
                expected: ARTIFACT_VERSION,
            });
        }
        if self.normalizer != normalizer.fingerprint() {
            return Err(ArtifactError::NormalizerMismatch);
        }
        if !self.vectorizer.is_consistent() {
            return Err(ArtifactError::Inconsistent("vocabulary/idf mismatch".into()));
        }
        let (rows, cols) = self.model.weights.dim();
        if rows != self.vectorizer.n_features() {
            return Err(ArtifactError::Inconsistent(format!(
                "{rows} weight rows for {} features",
                self.vectorizer.n_features()
            )));
        }
        if cols == 0 || cols != self.model.classes.len() || cols != self.model.intercept.len() {
            return Err(ArtifactError::Inconsistent(format!(
                "{cols} weight columns, {} classes, {} intercepts",
                self.model.classes.len(),
                self.model.intercept.len()
            )));
        }
        if self.model.classes.contains(&IntentLabel::Unknown) {
            return Err(ArtifactError::Inconsistent("unknown is not a trainable class".into()));
        }
        Ok(())
    }
}

/// Closed-world intent classifier over the built-in corpus.
#[derive(Debug, Clone)]
pub struct IntentClassifier {
    normalizer: TextNormalizer,
    artifact: IntentArtifact,
}

impl IntentClassifier {
    /// Fit the vectoriser and model from the intent pattern corpus.
    pub fn train(normalizer: TextNormalizer) -> Result<Self> {
        let (documents, labels): (Vec<String>, Vec<IntentLabel>) = corpus::examples()
            .map(|(label, phrase)| (normalizer.normalize(phrase), label))
            .unzip();

        let vectorizer = TfidfVectorizer::fit(&documents, VectorizerConfig::default());
        let x = vectorizer.transform_batch(&documents);
        let y = Array1::from(labels);
        let dataset = DatasetBase::new(x, y);

        let fitted = MultiLogisticRegression::default()
            .alpha(REGULARISATION)
            .max_iterations(MAX_ITERATIONS)
            .fit(&dataset)
            .context("fitting intent model")?;

        let artifact = IntentArtifact {
            version: ARTIFACT_VERSION,
            normalizer: normalizer.fingerprint(),
            vectorizer,
            model: LinearModel {
                classes: fitted.classes().to_vec(),
                weights: fitted.params().to_owned(),
                intercept: fitted.intercept().to_owned(),
            },
        };
        artifact
            .validate(&normalizer)
            .context("freshly trained intent model is inconsistent")?;
        info!(
            examples = documents.len(),
            features = artifact.vectorizer.n_features(),
            "trained intent classifier"
        );
        Ok(Self {
            normalizer,
            artifact,
        })
    }

    /// Read a persisted artifact.
    pub fn load(path: &Path, normalizer: TextNormalizer) -> Result<Self, ArtifactError> {
        let bytes = fs::read(path)?;
        let artifact: IntentArtifact = serde_json::from_slice(&bytes)?;
        artifact.validate(&normalizer)?;
        Ok(Self {
            normalizer,
            artifact,
        })
    }

    /// Persist the artifact, replacing any previous file atomically.
    pub fn save(&self, path: &Path) -> Result<(), ArtifactError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp: PathBuf = path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(&self.artifact)?)?;
        fs::rename(&tmp, path)?;
        info!(path = %path.display(), "saved intent classifier");
        Ok(())
    }

    /// Reuse the persisted classifier when it loads; otherwise train and
    /// persist a new one. Persisting is best-effort.
    pub fn load_or_train(settings: &Settings, normalizer: TextNormalizer) -> Result<Self> {
        let path = settings.classifier_path();
        if path.exists() {
            match Self::load(&path, normalizer.clone()) {
                Ok(classifier) => {
                    info!(path = %path.display(), "loaded intent classifier");
                    return Ok(classifier);
                }
                Err(err) => {
                    warn!(path = %path.display(), %err, "discarding classifier artifact; retraining")
                }
            }
        }
        let classifier = Self::train(normalizer)?;
        if let Err(err) = classifier.save(&path) {
            warn!(path = %path.display(), %err, "could not persist intent classifier");
        }
        Ok(classifier)
    }

    pub fn artifact(&self) -> &IntentArtifact {
        &self.artifact
    }

    pub fn normalizer(&self) -> &TextNormalizer {
        &self.normalizer
    }

    /// Class probabilities for `text`, or `None` when it has no known features.
    pub fn probabilities(&self, text: &str) -> Option<Vec<(IntentLabel, f64)>> {
        let normalized = self.normalizer.normalize(text);
        let features = self.artifact.vectorizer.transform(&normalized)?;
        let model = &self.artifact.model;
        let scores = features.dot(&model.weights) + &model.intercept;
        let max = scores.fold(f64::NEG_INFINITY, |acc, &s| acc.max(s));
        let exps = scores.mapv(|s| (s - max).exp());
        let total = exps.sum();
        Some(
            model
                .classes
                .iter()
                .copied()
                .zip(exps.iter().map(|e| e / total))
                .collect(),
        )
    }

    pub fn classify(&self, text: &str) -> Classification {
        let Some(probabilities) = self.probabilities(text) else {
            return Classification::Unknown {
                reason: UnknownReason::NoFeatures,
            };
        };
        if probabilities.iter().any(|(_, p)| !p.is_finite()) {
            return Classification::Unknown {
                reason: UnknownReason::InvalidScores,
            };
        }
        let (best, confidence) = probabilities.iter().fold(
            (IntentLabel::Unknown, f64::NEG_INFINITY),
            |acc, &(label, p)| if p > acc.1 { (label, p) } else { acc },
        );
        let outcome = if confidence > CONFIDENCE_FLOOR {
            Classification::Confident {
                label: best,
                confidence,
            }
        } else {
            Classification::Unknown {
                reason: UnknownReason::LowConfidence { best, confidence },
            }
        };
        debug!(?outcome, "classified intent");
        outcome
    }

    pub fn classify_intent(&self, text: &str) -> IntentLabel {
        self.classify(text).label()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probabilities_sum_to_one() {
        let classifier = IntentClassifier::train(TextNormalizer::new()).unwrap();
        let probs = classifier.probabilities("average salary").unwrap();
        assert_eq!(probs.len(), 5);
        let total: f64 = probs.iter().map(|(_, p)| p).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn out_of_vocabulary_text_is_unknown() {
        let classifier = IntentClassifier::train(TextNormalizer::new()).unwrap();
        assert_eq!(
            classifier.classify("the weather tomorrow?"),
            Classification::Unknown {
                reason: UnknownReason::NoFeatures
            }
        );
    }

    #[test]
    fn tampered_shapes_are_rejected() {
        let classifier = IntentClassifier::train(TextNormalizer::new()).unwrap();
        let mut artifact = classifier.artifact().clone();
        artifact.model.intercept = Array1::zeros(2);
        assert!(matches!(
            artifact.validate(classifier.normalizer()),
            Err(ArtifactError::Inconsistent(_))
        ));

        let mut artifact = classifier.artifact().clone();
        artifact.version = 99;
        assert!(matches!(
            artifact.validate(classifier.normalizer()),
            Err(ArtifactError::Version { found: 99, .. })
        ));
    }

    #[test]
    fn artifact_from_another_normaliser_is_rejected() {
        let classifier = IntentClassifier::train(TextNormalizer::degraded()).unwrap();
        assert!(matches!(
            classifier.artifact().validate(&TextNormalizer::new()),
            Err(ArtifactError::NormalizerMismatch)
        ));
        assert!(classifier.artifact().validate(&TextNormalizer::degraded()).is_ok());
    }

    #[test]
    fn weak_evidence_falls_below_the_floor() {
        let classifier = IntentClassifier::train(TextNormalizer::new()).unwrap();
        match classifier.classify("employee name") {
            Classification::Unknown {
                reason: UnknownReason::LowConfidence { confidence, .. },
            } => assert!(confidence <= CONFIDENCE_FLOOR),
            other => panic!("expected a low-confidence outcome, got {other:?}"),
        }
        assert_eq!(classifier.classify_intent("employee name"), IntentLabel::Unknown);
    }
}
