//! Search command

use super::resolve_collection;
use crate::app::{OutputFormat, SearchArgs};
use anyhow::Result;
use ragindex_core::{format_results, scan_documents, search, Config, Database, HttpEmbedder};

pub async fn run(args: SearchArgs, db: &Database, format: OutputFormat) -> Result<()> {
    let collection = resolve_collection(&args.target)?;
    let query = args.query.join(" ");
    let top_k = args.top_k.unwrap_or(collection.top_k);

    // Only documents that still exist are searchable
    let active: Vec<String> = scan_documents(&collection.base_path, &collection.scan_options())?
        .into_keys()
        .collect();

    let config = Config::load()?;
    let embedder = HttpEmbedder::new(config.embedding_service)?;
    let results = search(db, &embedder, &collection.scope(), &query, &active, top_k).await?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&results)?);
        }
        OutputFormat::Cli => {
            if results.is_empty() {
                println!("No results found");
            } else {
                println!("{}", format_results(&results, args.template.as_deref())?);
            }
        }
    }
    Ok(())
}
