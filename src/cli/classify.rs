//! CLI entry-point for inspecting intent predictions.

use anyhow::Result;
use clap::Args as ClapArgs;
use tracing::instrument;

use crate::{config::Settings, nlp::QueryEngine};

#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// Question in plain English.
    #[arg(required = true, num_args = 1..)]
    pub text: Vec<String>,
}

#[instrument(skip(settings))]
pub async fn run(args: Args, settings: Settings) -> Result<()> {
    let question = args.text.join(" ");
    let engine = QueryEngine::load_or_train(&settings)?;
    let classification = engine.classify(&question);

    println!("intent: {}", classification.label());
    match classification.confidence() {
        Some(confidence) => println!("confidence: {confidence:.3}"),
        None => println!("confidence: n/a"),
    }
    if let Some(mut probabilities) = engine.classifier().probabilities(&question) {
        probabilities.sort_by(|a, b| b.1.total_cmp(&a.1));
        for (label, p) in probabilities {
            println!("  {label:<24} {p:.3}");
        }
    }
    Ok(())
}
