//! Prediction Market Terminal CLI
//!
//! Merges scraped listing files, flags duplicates, and answers questions over
//! the deduplicated listings with embedding retrieval plus OpenAI synthesis.

mod cli;
mod commands;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::cli::{Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env.local file
    if let Err(e) = dotenvy::from_filename(".env.local") {
        // Not an error if the file doesn't exist
        if !matches!(e, dotenvy::Error::Io(_)) {
            eprintln!("Warning: Failed to load .env.local: {}", e);
        }
    }

    // Initialize logging (stderr, so command output stays clean)
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,terminal_cli=debug")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Merge(args) => commands::merge(args),
        Command::Dedup(args) => commands::dedup(args),
        Command::Ask(args) => commands::ask(args).await,
        Command::Chat(args) => commands::chat(args).await,
    }
}
