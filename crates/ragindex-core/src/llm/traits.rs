//! Embedding provider trait definitions

use crate::error::{RagIndexError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// What an embedding will be used for; providers may embed the two differently
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbedPurpose {
    Document,
    Query,
}

impl EmbedPurpose {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Document => "document",
            Self::Query => "query",
        }
    }
}

/// Embedding generation trait
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Generate embeddings for a batch, positionally aligned with `texts`
    async fn embed_batch(&self, texts: &[String], purpose: EmbedPurpose) -> Result<Vec<Vec<f32>>>;

    /// Generate embedding for single text
    async fn embed(&self, text: &str, purpose: EmbedPurpose) -> Result<Vec<f32>> {
        self.embed_batch(&[text.to_string()], purpose)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| RagIndexError::Embedding("No embedding returned".to_string()))
    }

    /// Get model name
    fn model_name(&self) -> &str;
}
