//! Ragindex CLI
//!
//! Incremental semantic indexing for local documents and code.

use anyhow::Result;
use clap::Parser;
use ragindex_core::{Database, RagIndexError};

mod app;
mod commands;
mod progress;

use app::{Cli, Commands};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::INFO
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        let code = e
            .downcast_ref::<RagIndexError>()
            .map(RagIndexError::exit_code)
            .unwrap_or(ragindex_core::error::exit_codes::GENERAL_ERROR);
        std::process::exit(code);
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Chunk(args) => commands::chunk::run(args, cli.format),
        Commands::Index(args) => commands::index::run(args, &open_db()?, cli.format, cli.verbose).await,
        Commands::Search(args) => commands::search::run(args, &open_db()?, cli.format).await,
        Commands::Status(args) => commands::status::run(args, &open_db()?, cli.format),
        Commands::Remove(args) => commands::remove::run(args, &open_db()?),
    }
}

/// Open the database (RAGINDEX_DB if set, otherwise the default cache path)
fn open_db() -> Result<Database> {
    let db = Database::open(Database::default_path())?;
    db.initialize()?;
    Ok(db)
}
