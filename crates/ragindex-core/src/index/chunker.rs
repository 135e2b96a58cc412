//! Document chunking for embedding

use super::assembler::ChunkAssembler;
use super::segmenter::{ContentType, Segmenter};
use super::tokens::TokenCounter;
use crate::config::ChunkingConfig;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// A bounded unit of a document, ready for embedding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Trimmed chunk text
    pub content: String,
    /// Character offset of `content` in the document
    pub start_char: usize,
    /// Character offset one past the end of `content`
    pub end_char: usize,
    /// Token count of `content`
    pub token_count: usize,
    /// 0-based, sequential within the document
    pub chunk_index: usize,
    /// blake3 fingerprint of `content`
    pub chunk_hash: String,
}

impl Chunk {
    pub fn new(
        content: String,
        start_char: usize,
        end_char: usize,
        token_count: usize,
        chunk_index: usize,
    ) -> Self {
        let chunk_hash = compute_chunk_hash(&content);
        Self {
            content,
            start_char,
            end_char,
            token_count,
            chunk_index,
            chunk_hash,
        }
    }
}

/// Compute blake3 hash for a chunk's text
pub fn compute_chunk_hash(text: &str) -> String {
    let hash = blake3::hash(text.as_bytes());
    hash.to_hex()[..32].to_string()
}

/// Segments and assembles whole documents with one set of bounds
#[derive(Clone)]
pub struct DocumentChunker {
    counter: Arc<dyn TokenCounter>,
    config: ChunkingConfig,
}

impl DocumentChunker {
    /// Fails with a configuration error when the bounds are not ordered
    pub fn new(counter: Arc<dyn TokenCounter>, config: ChunkingConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { counter, config })
    }

    pub fn config(&self) -> &ChunkingConfig {
        &self.config
    }

    pub fn counter(&self) -> &dyn TokenCounter {
        self.counter.as_ref()
    }

    /// Chunk a document, classifying it by the extension of `path`
    ///
    /// Zero chunks means there is nothing to index for this document.
    pub fn chunk_document(&self, content: &str, path: &Path) -> Vec<Chunk> {
        self.chunk_as(content, ContentType::from_path(path))
    }

    pub fn chunk_as(&self, content: &str, content_type: ContentType) -> Vec<Chunk> {
        let counter = self.counter.as_ref();
        let segments = Segmenter::new(counter, self.config).segment(content, content_type);
        let chunks = ChunkAssembler::new(counter, self.config).assemble(content, &segments);
        debug!(
            content_type = content_type.as_str(),
            segments = segments.len(),
            chunks = chunks.len(),
            "chunked document"
        );
        chunks
    }
}
