//! Boundary to the persistent vector index

use super::chunker::Chunk;
use crate::error::{RagIndexError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Metadata persisted with every chunk record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    pub file_path: String,
    /// Content hash of the whole document when it was indexed
    pub file_hash: String,
    pub chunk_index: usize,
    pub token_count: usize,
    pub start_char: usize,
    pub end_char: usize,
    pub chunk_hash: String,
}

impl ChunkMetadata {
    pub fn new(file_path: &str, file_hash: &str, chunk: &Chunk) -> Self {
        Self {
            file_path: file_path.to_string(),
            file_hash: file_hash.to_string(),
            chunk_index: chunk.chunk_index,
            token_count: chunk.token_count,
            start_char: chunk.start_char,
            end_char: chunk.end_char,
            chunk_hash: chunk.chunk_hash.clone(),
        }
    }
}

/// A stored chunk returned by a similarity query
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredChunk {
    pub content: String,
    pub score: f32,
    pub metadata: ChunkMetadata,
}

/// Operations the indexing pipeline and search need from the vector index
///
/// A scope partitions the index (one per collection); paths are unique
/// within a scope.
pub trait ChunkStore {
    /// Persist all chunks of one document along with its content hash
    ///
    /// `chunks` and `embeddings` must have equal length. Storing zero chunks
    /// is a no-op and records no hash.
    fn store_chunks(
        &self,
        scope: &str,
        path: &str,
        content_hash: &str,
        chunks: &[Chunk],
        embeddings: &[Vec<f32>],
    ) -> Result<()>;

    /// Delete every record of a document, returning how many were removed
    fn delete_chunks(&self, scope: &str, path: &str) -> Result<usize>;

    /// Content hash recorded for each stored document in `scope`
    fn recorded_hashes(&self, scope: &str) -> Result<HashMap<String, String>>;

    /// Highest-scoring chunks among `allowed_paths`, best first
    fn query_similar(
        &self,
        scope: &str,
        query_vector: &[f32],
        allowed_paths: &[String],
        top_k: usize,
    ) -> Result<Vec<ScoredChunk>>;
}

/// Reject a store call whose chunks and embeddings are not aligned
pub fn check_aligned(path: &str, chunks: &[Chunk], embeddings: &[Vec<f32>]) -> Result<()> {
    if chunks.len() != embeddings.len() {
        return Err(RagIndexError::Validation(format!(
            "{}: {} chunks but {} embeddings",
            path,
            chunks.len(),
            embeddings.len()
        )));
    }
    Ok(())
}
