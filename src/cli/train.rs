//! CLI entry-point for retraining the intent classifier.

use anyhow::{Context, Result};
use tracing::{info, instrument};

use crate::{
    config::Settings,
    nlp::{intent::IntentClassifier, normalize::TextNormalizer},
};

#[instrument(skip(settings))]
pub async fn run(settings: Settings) -> Result<()> {
    let normalizer = TextNormalizer::from_settings(&settings);
    let classifier = IntentClassifier::train(normalizer)?;
    let path = settings.classifier_path();
    classifier
        .save(&path)
        .with_context(|| format!("writing {}", path.display()))?;
    info!(
        features = classifier.artifact().vectorizer().n_features(),
        path = %path.display(),
        "intent classifier retrained"
    );
    println!("saved {}", path.display());
    Ok(())
}
