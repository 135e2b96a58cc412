//! Remove command

use crate::app::RemoveArgs;
use anyhow::Result;
use ragindex_core::{ChunkStore, Database, RagIndexError};

pub fn run(args: RemoveArgs, db: &Database) -> Result<()> {
    let deleted = db.delete_chunks(&args.scope, &args.path)?;
    if deleted == 0 {
        return Err(RagIndexError::NotFound(format!(
            "No records for {} in {}",
            args.path, args.scope
        ))
        .into());
    }
    println!("Removed {} chunk(s) for {}", deleted, args.path);
    Ok(())
}
