//! Status command

use crate::app::{OutputFormat, StatusArgs};
use anyhow::Result;
use ragindex_core::Database;

pub fn run(args: StatusArgs, db: &Database, format: OutputFormat) -> Result<()> {
    let mut stats = db.scope_stats()?;
    if let Some(scope) = &args.scope {
        stats.retain(|s| &s.scope == scope);
    }

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        OutputFormat::Cli => {
            if stats.is_empty() {
                println!("No indexed documents");
                return Ok(());
            }
            for s in &stats {
                println!("{}", s.scope);
                println!("  Documents:     {}", s.documents);
                println!("  Chunks:        {}", s.chunks);
            }
        }
    }
    Ok(())
}
