//! Chunk command: preview chunk boundaries for one file

use super::token_counter;
use crate::app::{ChunkArgs, OutputFormat};
use anyhow::{Context, Result};
use ragindex_core::{ChunkingConfig, DocumentChunker};

pub fn run(args: ChunkArgs, format: OutputFormat) -> Result<()> {
    let content = std::fs::read_to_string(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;

    let counter = token_counter(args.heuristic)?;
    let chunker = DocumentChunker::new(counter, ChunkingConfig::new(args.min, args.max, args.hard))?;
    let chunks = chunker.chunk_document(&content, &args.file);

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&chunks)?);
        }
        OutputFormat::Cli => {
            println!(
                "{}: {} chunk(s) [{} tokens]",
                args.file.display(),
                chunks.len(),
                chunker.counter().name()
            );
            for chunk in &chunks {
                println!();
                println!(
                    "--- chunk {} (chars {}..{}, {} tokens) ---",
                    chunk.chunk_index, chunk.start_char, chunk.end_char, chunk.token_count
                );
                println!("{}", chunk.content);
            }
        }
    }
    Ok(())
}
