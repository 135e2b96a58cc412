//! Semantic search over indexed chunks
//!
//! Embeds the query, asks the store for the closest chunks among the
//! currently active documents, and renders results for prompting.

mod template;

pub use template::render_template;

use crate::error::{RagIndexError, Result};
use crate::index::{ChunkMetadata, ChunkStore};
use crate::llm::{EmbedPurpose, Embedder};
use serde::Serialize;
use tracing::debug;

/// Search result for one chunk
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    pub content: String,
    /// Cosine similarity, higher is closer
    pub score: f32,
    pub chunk_index: usize,
    pub metadata: ChunkMetadata,
}

impl SearchResult {
    pub fn file_path(&self) -> &str {
        &self.metadata.file_path
    }

    /// Render with `template`, or as a markdown section when `None`
    ///
    /// Templates may use `{file_path}`, `{score}`, `{content}` and
    /// `{chunk_index}`; `{score:.N}` sets the precision.
    pub fn render(&self, template: Option<&str>) -> Result<String> {
        match template {
            None => Ok(format!(
                "## {} (relevance: {:.2})\n{}\n\n---",
                self.file_path(),
                self.score,
                self.content
            )),
            Some(t) => render_template(t, self),
        }
    }
}

/// Render every result and join them with a blank line
pub fn format_results(results: &[SearchResult], template: Option<&str>) -> Result<String> {
    let rendered = results
        .iter()
        .map(|r| r.render(template))
        .collect::<Result<Vec<_>>>()?;
    Ok(rendered.join("\n\n"))
}

/// Find the `top_k` chunks closest to `query` among `allowed_paths`
///
/// No allowed paths means nothing is searchable; the embedder is not called.
pub async fn search(
    store: &dyn ChunkStore,
    embedder: &dyn Embedder,
    scope: &str,
    query: &str,
    allowed_paths: &[String],
    top_k: usize,
) -> Result<Vec<SearchResult>> {
    if query.trim().is_empty() {
        return Err(RagIndexError::InvalidInput("Empty search query".to_string()));
    }
    if allowed_paths.is_empty() || top_k == 0 {
        return Ok(Vec::new());
    }

    let query_vector = embedder.embed(query, EmbedPurpose::Query).await?;
    let results: Vec<SearchResult> = store
        .query_similar(scope, &query_vector, allowed_paths, top_k)?
        .into_iter()
        .map(|scored| SearchResult {
            content: scored.content,
            score: scored.score,
            chunk_index: scored.metadata.chunk_index,
            metadata: scored.metadata,
        })
        .collect();

    debug!(scope, results = results.len(), top_k, "search complete");
    Ok(results)
}
