//! Indexing pipeline
//!
//! Token counting, boundary-aware chunking, change detection, batch
//! scheduling and the run that ties them to an embedder and a store.

mod assembler;
mod chunker;
mod pipeline;
mod progress;
mod reconciler;
mod scanner;
mod scheduler;
mod segmenter;
mod tokens;
mod writer;

pub use assembler::ChunkAssembler;
pub use chunker::*;
pub use pipeline::{IndexReport, Indexer};
pub use progress::{IndexEvent, ProgressFn};
pub use reconciler::{hash_content, reconcile, Reconciliation};
pub use scanner::{scan_documents, ScanOptions};
pub use scheduler::{plan_batches, Batch, BatchScheduler};
pub use segmenter::{BoundaryStrategy, ContentType, Segment, Segmenter};
pub use tokens::{HeuristicCounter, TiktokenCounter, TokenCounter};
pub use writer::{check_aligned, ChunkMetadata, ChunkStore, ScoredChunk};
