//! Command-line interface wiring for query-assistant.

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::config::Settings;

pub mod ask;
pub mod classify;
pub mod schema;
pub mod serve;
pub mod train;

/// Top-level CLI definition.
#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Ask questions about the employee database in plain English",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Parse CLI arguments from the environment.
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Dispatch the selected sub-command.
    pub async fn dispatch(self, settings: Settings) -> Result<()> {
        match self.command {
            Commands::Serve(args) => serve::run(args, settings).await,
            Commands::Ask(args) => ask::run(args, settings).await,
            Commands::Classify(args) => classify::run(args, settings).await,
            Commands::Train => train::run(settings).await,
            Commands::Schema => schema::run(settings).await,
        }
    }
}

/// Supported sub-commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Serve the JSON API.
    Serve(serve::Args),
    /// Translate a question to SQL, optionally running it.
    Ask(ask::Args),
    /// Show the intent and class probabilities for a question.
    Classify(classify::Args),
    /// Retrain the intent classifier and overwrite the saved model.
    Train,
    /// Print table and column metadata for the sample database.
    Schema,
}
