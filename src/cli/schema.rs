//! CLI entry-point for printing database metadata.

use anyhow::{Context, Result};
use tracing::instrument;

use crate::{config::Settings, data::SqliteStore};

#[instrument(skip(settings))]
pub async fn run(settings: Settings) -> Result<()> {
    let path = settings.database_path.clone();
    let schema = tokio::task::spawn_blocking(move || SqliteStore::open(&path)?.schema())
        .await?
        .context("reading schema")?;
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}
