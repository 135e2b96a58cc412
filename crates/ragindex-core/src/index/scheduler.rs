//! Token-aware embedding batches
//!
//! Chunks from every document share one global sequence of batches. Each
//! batch respects both the item cap and the token cap; requests go out one
//! at a time with a cooldown in between.

use super::progress::{emit, IndexEvent, ProgressFn};
use crate::config::BatchConfig;
use crate::error::{RagIndexError, Result};
use crate::llm::{EmbedPurpose, Embedder};
use std::ops::Range;
use tracing::debug;

/// A contiguous run of the input sequence sent as one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    /// 1-based position in the run
    pub number: usize,
    /// Indices into the scheduled input
    pub items: Range<usize>,
    pub token_count: usize,
}

impl Batch {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Group items, given their token counts in order, into batches
///
/// A single item larger than `max_tokens_per_batch` still gets its own
/// batch instead of being dropped.
pub fn plan_batches(token_counts: &[usize], config: &BatchConfig) -> Vec<Batch> {
    let mut batches = Vec::new();
    let mut start = 0;
    let mut tokens = 0;

    for (i, &count) in token_counts.iter().enumerate() {
        let len = i - start;
        let would_exceed_items = len >= config.max_items_per_batch;
        let would_exceed_tokens = tokens + count > config.max_tokens_per_batch;

        if len > 0 && (would_exceed_items || would_exceed_tokens) {
            batches.push(Batch {
                number: batches.len() + 1,
                items: start..i,
                token_count: tokens,
            });
            start = i;
            tokens = 0;
        }
        tokens += count;
    }

    if start < token_counts.len() {
        batches.push(Batch {
            number: batches.len() + 1,
            items: start..token_counts.len(),
            token_count: tokens,
        });
    }

    batches
}

/// Issues planned batches to an embedder, strictly sequentially
pub struct BatchScheduler<'e> {
    embedder: &'e dyn Embedder,
    config: BatchConfig,
}

impl<'e> BatchScheduler<'e> {
    pub fn new(embedder: &'e dyn Embedder, config: BatchConfig) -> Self {
        Self { embedder, config }
    }

    /// Embed `texts` batch by batch, handing each result to `on_batch`
    ///
    /// The first failing request, or a result whose length differs from the
    /// batch, stops the run; later batches are never sent.
    pub async fn run<F>(
        &self,
        texts: &[String],
        token_counts: &[usize],
        progress: Option<&ProgressFn<'_>>,
        mut on_batch: F,
    ) -> Result<usize>
    where
        F: FnMut(&Batch, Vec<Vec<f32>>) -> Result<()>,
    {
        let batches = plan_batches(token_counts, &self.config);
        let total = batches.len();
        let cooldown = self.config.cooldown();

        for batch in &batches {
            if batch.number > 1 && !cooldown.is_zero() {
                debug!(secs = cooldown.as_secs_f64(), "cooling down before next batch");
                tokio::time::sleep(cooldown).await;
            }

            emit(
                progress,
                IndexEvent::BatchStarted {
                    number: batch.number,
                    total,
                    items: batch.len(),
                    tokens: batch.token_count,
                },
            );

            let embeddings = self
                .embedder
                .embed_batch(&texts[batch.items.clone()], EmbedPurpose::Document)
                .await?;

            if embeddings.len() != batch.len() {
                return Err(RagIndexError::Embedding(format!(
                    "batch {} returned {} embeddings for {} texts",
                    batch.number,
                    embeddings.len(),
                    batch.len()
                )));
            }

            on_batch(batch, embeddings)?;
            emit(
                progress,
                IndexEvent::BatchCompleted {
                    number: batch.number,
                    total,
                },
            );
        }

        Ok(total)
    }
}
