//! Ragindex Core Library
//!
//! Incremental retrieval index for text and code collections.
//!
//! # Features
//! - Boundary-aware chunking under soft and hard token bounds
//! - Content-hash change detection so unchanged documents are never re-embedded
//! - Token-aware, rate-limited embedding batches
//! - SQLite vector store with cosine similarity search

pub mod config;
pub mod db;
pub mod error;
pub mod index;
pub mod llm;
pub mod search;

pub use config::{
    BatchConfig, ChunkingConfig, CollectionConfig, Config, EmbeddingServiceConfig, IndexerConfig,
};
pub use db::{Database, ScopeStats};
pub use error::{Error, RagIndexError, Result};
pub use index::{
    hash_content, reconcile, scan_documents, Chunk, ChunkStore, ContentType, DocumentChunker,
    HeuristicCounter, IndexEvent, IndexReport, Indexer, ScanOptions, TiktokenCounter,
    TokenCounter,
};
pub use llm::{EmbedPurpose, Embedder, HttpEmbedder};
pub use search::{format_results, search, SearchResult};

/// Default cache directory name
pub const CACHE_DIR_NAME: &str = "ragindex";

/// Default config directory name
pub const CONFIG_DIR_NAME: &str = "ragindex";
