//! Incremental indexing run
//!
//! Reconciles a scan against recorded hashes, chunks what changed, embeds
//! all new chunks through one global batch sequence and stores each document
//! as soon as every one of its chunks has an embedding.

use super::chunker::{Chunk, DocumentChunker};
use super::progress::{emit, IndexEvent, ProgressFn};
use super::reconciler::reconcile;
use super::scheduler::BatchScheduler;
use super::tokens::TokenCounter;
use super::writer::ChunkStore;
use crate::config::{BatchConfig, IndexerConfig};
use crate::error::{RagIndexError, Result};
use crate::llm::Embedder;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// Summary of one indexing run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IndexReport {
    pub unchanged: usize,
    /// New documents stored
    pub embedded: usize,
    /// Changed documents stored again
    pub reembedded: usize,
    /// Documents that produced no chunks
    pub skipped: usize,
    /// Stale records removed for changed documents
    pub deleted_records: usize,
    pub total_chunks: usize,
    pub batches: usize,
    /// Documents stored by this run, in completion order
    pub stored: Vec<String>,
}

impl IndexReport {
    pub fn is_noop(&self) -> bool {
        self.stored.is_empty() && self.skipped == 0 && self.deleted_records == 0
    }
}

/// A document whose chunks are waiting for embeddings
struct PendingDocument<'d> {
    path: &'d str,
    hash: &'d str,
    is_new: bool,
    chunks: Vec<Chunk>,
    embeddings: Vec<Vec<f32>>,
}

/// Drives reconcile, chunk, embed and store for one scope at a time
pub struct Indexer<'a> {
    chunker: DocumentChunker,
    batching: BatchConfig,
    embedder: &'a dyn Embedder,
    store: &'a dyn ChunkStore,
}

impl<'a> Indexer<'a> {
    /// Fails with a configuration error when any limit is invalid
    pub fn new(
        config: IndexerConfig,
        counter: Arc<dyn TokenCounter>,
        embedder: &'a dyn Embedder,
        store: &'a dyn ChunkStore,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            chunker: DocumentChunker::new(counter, config.chunking)?,
            batching: config.batching,
            embedder,
            store,
        })
    }

    pub fn chunker(&self) -> &DocumentChunker {
        &self.chunker
    }

    /// Bring `scope` up to date with `documents` (relative path -> content)
    ///
    /// On an embedding or storage failure the remaining batches are not sent
    /// and the error is wrapped in [`RagIndexError::RunAborted`], listing the
    /// documents that were fully stored before the failure.
    pub async fn run(
        &self,
        scope: &str,
        documents: &BTreeMap<String, String>,
        progress: Option<&ProgressFn<'_>>,
    ) -> Result<IndexReport> {
        let prior = self.store.recorded_hashes(scope)?;
        let plan = reconcile(documents, &prior);

        emit(
            progress,
            IndexEvent::Reconciled {
                total: plan.total(),
                unchanged: plan.unchanged.len(),
                new: plan.to_embed.len(),
                changed: plan.to_reembed.len(),
            },
        );
        info!(
            scope,
            unchanged = plan.unchanged.len(),
            new = plan.to_embed.len(),
            changed = plan.to_reembed.len(),
            "reconciled documents"
        );

        let mut report = IndexReport {
            unchanged: plan.unchanged.len(),
            ..Default::default()
        };
        if plan.is_up_to_date() {
            return Ok(report);
        }

        // Old records of a changed document go before any new ones are written
        for path in &plan.to_reembed {
            let deleted = self.store.delete_chunks(scope, path)?;
            report.deleted_records += deleted;
            emit(
                progress,
                IndexEvent::StaleRecordsDeleted {
                    path: path.clone(),
                    deleted,
                },
            );
        }

        let mut pending = Vec::new();
        for path in plan.needing_work() {
            let (Some(content), Some(hash)) = (documents.get(path), plan.hashes.get(path)) else {
                continue;
            };

            let chunks = self.chunker.chunk_document(content, Path::new(path));
            if chunks.is_empty() {
                warn!(path = %path, "document produced no chunks, skipping");
                report.skipped += 1;
                emit(progress, IndexEvent::DocumentSkipped { path: path.clone() });
                continue;
            }

            emit(
                progress,
                IndexEvent::DocumentChunked {
                    path: path.clone(),
                    chunks: chunks.len(),
                },
            );
            pending.push(PendingDocument {
                path,
                hash,
                is_new: plan.to_embed.contains(path),
                embeddings: Vec::with_capacity(chunks.len()),
                chunks,
            });
        }

        // Flatten in document order; `owners[i]` is the document of text i
        let mut texts = Vec::new();
        let mut token_counts = Vec::new();
        let mut owners = Vec::new();
        for (doc, pending_doc) in pending.iter().enumerate() {
            for chunk in &pending_doc.chunks {
                texts.push(chunk.content.clone());
                token_counts.push(chunk.token_count);
                owners.push(doc);
            }
        }
        report.total_chunks = texts.len();

        let mut stored = Vec::new();
        let mut embedded = 0;
        let mut reembedded = 0;
        let scheduler = BatchScheduler::new(self.embedder, self.batching);
        let outcome = scheduler
            .run(&texts, &token_counts, progress, |batch, embeddings| {
                for (i, embedding) in batch.items.clone().zip(embeddings) {
                    let doc = &mut pending[owners[i]];
                    doc.embeddings.push(embedding);
                    if doc.embeddings.len() < doc.chunks.len() {
                        continue;
                    }

                    let embeddings = std::mem::take(&mut doc.embeddings);
                    self.store
                        .store_chunks(scope, doc.path, doc.hash, &doc.chunks, &embeddings)?;
                    if doc.is_new {
                        embedded += 1;
                    } else {
                        reembedded += 1;
                    }
                    stored.push(doc.path.to_string());
                    emit(
                        progress,
                        IndexEvent::DocumentStored {
                            path: doc.path.to_string(),
                            chunks: doc.chunks.len(),
                        },
                    );
                }
                Ok(())
            })
            .await;

        match outcome {
            Ok(batches) => report.batches = batches,
            Err(e) => {
                emit(
                    progress,
                    IndexEvent::Failed {
                        message: e.to_string(),
                        completed: stored.clone(),
                    },
                );
                warn!(scope, completed = stored.len(), error = %e, "indexing run aborted");
                return Err(RagIndexError::RunAborted {
                    completed: stored,
                    source: Box::new(e),
                });
            }
        }

        report.embedded = embedded;
        report.reembedded = reembedded;
        report.stored = stored;
        info!(
            scope,
            embedded = report.embedded,
            reembedded = report.reembedded,
            skipped = report.skipped,
            chunks = report.total_chunks,
            batches = report.batches,
            "indexing run complete"
        );
        Ok(report)
    }
}
