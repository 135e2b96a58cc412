//! HTTP embedder for Voyage/OpenAI-compatible `/embeddings` endpoints

use super::{EmbedPurpose, Embedder};
use crate::config::EmbeddingServiceConfig;
use crate::error::{RagIndexError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::debug;

#[derive(Serialize)]
struct EmbedRequest<'a> {
    input: &'a [String],
    model: &'a str,
    input_type: &'static str,
}

#[derive(Deserialize)]
struct EmbedResponse {
    data: Vec<EmbedData>,
}

#[derive(Deserialize)]
struct EmbedData {
    embedding: Vec<f32>,
    #[serde(default)]
    index: Option<usize>,
}

/// Embedder backed by a remote embeddings API
pub struct HttpEmbedder {
    http_client: reqwest::Client,
    config: EmbeddingServiceConfig,
    api_key: String,
}

impl HttpEmbedder {
    /// Create from configuration; an API key is required
    pub fn new(config: EmbeddingServiceConfig) -> Result<Self> {
        let api_key = config.api_key.clone().ok_or_else(|| {
            RagIndexError::Config(
                "No embedding API key. Set RAGINDEX_API_KEY or VOYAGE_API_KEY".to_string(),
            )
        })?;

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http_client,
            config,
            api_key,
        })
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self> {
        Self::new(EmbeddingServiceConfig::default())
    }

    fn endpoint(&self) -> String {
        format!("{}/embeddings", self.config.url.trim_end_matches('/'))
    }
}

#[async_trait]
impl Embedder for HttpEmbedder {
    async fn embed_batch(&self, texts: &[String], purpose: EmbedPurpose) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Err(RagIndexError::InvalidInput(
                "Cannot embed an empty batch".to_string(),
            ));
        }

        let request = EmbedRequest {
            input: texts,
            model: &self.config.model,
            input_type: purpose.as_str(),
        };

        let start = Instant::now();
        let response = self
            .http_client
            .post(self.endpoint())
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(RagIndexError::Embedding(format!(
                "Embedding service error (HTTP {}): {}",
                status, body
            )));
        }

        let mut embed_response: EmbedResponse = response.json().await?;
        if embed_response.data.len() != texts.len() {
            return Err(RagIndexError::Embedding(format!(
                "Expected {} embeddings, service returned {}",
                texts.len(),
                embed_response.data.len()
            )));
        }

        // Keep results aligned with input when the service reports indices
        if embed_response.data.iter().all(|d| d.index.is_some()) {
            embed_response.data.sort_by_key(|d| d.index);
        }

        debug!(
            count = texts.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            model = %self.config.model,
            "embedding request complete"
        );

        Ok(embed_response
            .data
            .into_iter()
            .map(|d| d.embedding)
            .collect())
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}
