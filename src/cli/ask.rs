//! CLI entry-point for translating a single question.

use anyhow::{Context, Result};
use clap::Args as ClapArgs;
use serde_json::json;
use tracing::instrument;

use crate::{config::Settings, data::SqliteStore, nlp::QueryEngine};

#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// Question in plain English.
    #[arg(required = true, num_args = 1..)]
    pub text: Vec<String>,
    /// Run the generated SQL against the database and include the rows.
    #[arg(long)]
    pub execute: bool,
}

#[instrument(skip(settings))]
pub async fn run(args: Args, settings: Settings) -> Result<()> {
    let question = args.text.join(" ");
    let engine = QueryEngine::load_or_train(&settings)?;
    let translation = engine.translate(&question);

    let mut output = json!({
        "question": question,
        "intent": translation.intent,
        "confidence": translation.confidence,
        "entities": translation.entities,
        "sql": translation.sql,
    });
    if args.execute {
        let path = settings.database_path.clone();
        let sql = translation.sql.clone();
        let result = tokio::task::spawn_blocking(move || {
            SqliteStore::open(&path).map(|store| store.execute(&sql))
        })
        .await?
        .context("opening database")?;
        output["result"] = serde_json::to_value(result)?;
    }
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
