//! Index command

use super::{resolve_collection, token_counter};
use crate::app::{IndexArgs, OutputFormat};
use crate::progress::ProgressReporter;
use anyhow::Result;
use ragindex_core::{scan_documents, Config, Database, HttpEmbedder, IndexEvent, Indexer, IndexerConfig};

pub async fn run(args: IndexArgs, db: &Database, format: OutputFormat, verbose: bool) -> Result<()> {
    let collection = resolve_collection(&args.target)?;
    let config = Config::load()?;
    let indexer_config = IndexerConfig {
        chunking: collection.chunking_config(),
        batching: config.batching,
    };

    let scope = collection.scope();
    let documents = scan_documents(&collection.base_path, &collection.scan_options())?;
    eprintln!(
        "Scanning {}: {} document(s)",
        collection.base_path.display(),
        documents.len()
    );

    let embedder = HttpEmbedder::new(config.embedding_service)?;
    let indexer = Indexer::new(
        indexer_config,
        token_counter(args.heuristic)?,
        &embedder,
        db,
    )?;

    let reporter = ProgressReporter::new(verbose);
    let progress = move |event: &IndexEvent| reporter.report(event);
    let report = indexer.run(&scope, &documents, Some(&progress)).await?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Cli => {
            if report.is_noop() && report.unchanged > 0 {
                println!("Index up to date ({} documents)", report.unchanged);
                return Ok(());
            }
            println!("Indexing complete:");
            println!("  Unchanged:   {}", report.unchanged);
            println!("  New:         {}", report.embedded);
            println!("  Changed:     {}", report.reembedded);
            println!("  Skipped:     {}", report.skipped);
            println!("  Deleted:     {} stale chunks", report.deleted_records);
            println!(
                "  Embedded:    {} chunks in {} batch(es)",
                report.total_chunks, report.batches
            );
        }
    }
    Ok(())
}
