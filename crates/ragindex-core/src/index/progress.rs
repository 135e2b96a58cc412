//! Structured progress events for an indexing run
//!
//! The pipeline never writes to the terminal; callers subscribe with a
//! callback and decide how to render each event.

use std::fmt;

/// Callback receiving progress events
pub type ProgressFn<'a> = dyn Fn(&IndexEvent) + Send + Sync + 'a;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexEvent {
    /// Scan compared with recorded hashes
    Reconciled {
        total: usize,
        unchanged: usize,
        new: usize,
        changed: usize,
    },
    /// Records of a changed document removed before re-embedding
    StaleRecordsDeleted { path: String, deleted: usize },
    DocumentChunked { path: String, chunks: usize },
    /// Document produced no chunks, nothing to index
    DocumentSkipped { path: String },
    BatchStarted {
        number: usize,
        total: usize,
        items: usize,
        tokens: usize,
    },
    BatchCompleted { number: usize, total: usize },
    DocumentStored { path: String, chunks: usize },
    Failed {
        message: String,
        completed: Vec<String>,
    },
}

impl fmt::Display for IndexEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reconciled {
                total,
                unchanged,
                new,
                changed,
            } => write!(
                f,
                "{}/{} unchanged, {} new, {} changed",
                unchanged, total, new, changed
            ),
            Self::StaleRecordsDeleted { path, deleted } => {
                write!(f, "deleted {} old chunks for {}", deleted, path)
            }
            Self::DocumentChunked { path, chunks } => write!(f, "{}: {} chunks", path, chunks),
            Self::DocumentSkipped { path } => {
                write!(f, "{}: 0 chunks (skipping - too small)", path)
            }
            Self::BatchStarted {
                number,
                total,
                items,
                tokens,
            } => write!(
                f,
                "batch {}/{}: {} chunks ({} tokens)",
                number, total, items, tokens
            ),
            Self::BatchCompleted { number, total } => {
                write!(f, "batch {}/{} complete", number, total)
            }
            Self::DocumentStored { path, chunks } => {
                write!(f, "stored {} chunks for {}", chunks, path)
            }
            Self::Failed { message, completed } => write!(
                f,
                "failed after {} completed document(s): {}",
                completed.len(),
                message
            ),
        }
    }
}

/// Deliver an event to an optional subscriber
pub(crate) fn emit(progress: Option<&ProgressFn<'_>>, event: IndexEvent) {
    if let Some(cb) = progress {
        cb(&event);
    }
}
