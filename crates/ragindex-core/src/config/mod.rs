//! Configuration management

mod collection;

pub use collection::CollectionConfig;

use crate::error::{RagIndexError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Embedding service configuration
    #[serde(default)]
    pub embedding_service: EmbeddingServiceConfig,

    /// Embedding request batching limits
    #[serde(default)]
    pub batching: BatchConfig,
}

impl Config {
    /// Load config from default path
    pub fn load() -> Result<Self> {
        let path = Self::default_path();
        if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            let config: Config = serde_yaml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Save config to default path
    pub fn save(&self) -> Result<()> {
        let path = Self::default_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get default config path
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(crate::CONFIG_DIR_NAME)
            .join("config.yml")
    }
}

/// Embedding provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingServiceConfig {
    /// Base URL of the embeddings API (`/embeddings` is appended)
    #[serde(default = "default_embedding_url")]
    pub url: String,

    /// Model name for embeddings
    #[serde(default = "default_embedding_model")]
    pub model: String,

    /// API key; never written back to disk
    #[serde(default = "default_api_key", skip_serializing)]
    pub api_key: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for EmbeddingServiceConfig {
    fn default() -> Self {
        Self {
            url: default_embedding_url(),
            model: default_embedding_model(),
            api_key: default_api_key(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_embedding_url() -> String {
    std::env::var("RAGINDEX_EMBEDDING_URL")
        .unwrap_or_else(|_| "https://api.voyageai.com/v1".to_string())
}

fn default_embedding_model() -> String {
    std::env::var("RAGINDEX_EMBEDDING_MODEL").unwrap_or_else(|_| "voyage-3-large".to_string())
}

fn default_api_key() -> Option<String> {
    std::env::var("RAGINDEX_API_KEY")
        .or_else(|_| std::env::var("VOYAGE_API_KEY"))
        .ok()
}

fn default_timeout() -> u64 {
    60
}

/// Token bounds for chunk assembly
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Preferred minimum chunk size
    pub target_min_tokens: usize,
    /// Preferred maximum chunk size (soft limit for segments)
    pub target_max_tokens: usize,
    /// Absolute maximum; a buffer is never grown past it
    pub hard_max_tokens: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            target_min_tokens: 400,
            target_max_tokens: 600,
            hard_max_tokens: 1000,
        }
    }
}

impl ChunkingConfig {
    pub fn new(target_min_tokens: usize, target_max_tokens: usize, hard_max_tokens: usize) -> Self {
        Self {
            target_min_tokens,
            target_max_tokens,
            hard_max_tokens,
        }
    }

    /// Require positive bounds with `target_min < target_max < hard_max`
    pub fn validate(&self) -> Result<()> {
        if self.target_min_tokens == 0 {
            return Err(RagIndexError::Config(
                "target_min_tokens must be positive".to_string(),
            ));
        }
        if self.target_min_tokens >= self.target_max_tokens {
            return Err(RagIndexError::Config(format!(
                "target_min_tokens ({}) must be less than target_max_tokens ({})",
                self.target_min_tokens, self.target_max_tokens
            )));
        }
        if self.target_max_tokens >= self.hard_max_tokens {
            return Err(RagIndexError::Config(format!(
                "target_max_tokens ({}) must be less than hard_max_tokens ({})",
                self.target_max_tokens, self.hard_max_tokens
            )));
        }
        Ok(())
    }
}

/// Limits for embedding request batches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchConfig {
    #[serde(default = "default_max_items")]
    pub max_items_per_batch: usize,
    #[serde(default = "default_max_tokens")]
    pub max_tokens_per_batch: usize,
    /// Wait between consecutive requests; zero disables the cooldown
    #[serde(default = "default_cooldown")]
    pub inter_batch_cooldown_secs: u64,
}

fn default_max_items() -> usize {
    128
}

fn default_max_tokens() -> usize {
    60_000
}

fn default_cooldown() -> u64 {
    3
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_items_per_batch: default_max_items(),
            max_tokens_per_batch: default_max_tokens(),
            inter_batch_cooldown_secs: default_cooldown(),
        }
    }
}

impl BatchConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_items_per_batch == 0 {
            return Err(RagIndexError::Config(
                "max_items_per_batch must be positive".to_string(),
            ));
        }
        if self.max_tokens_per_batch == 0 {
            return Err(RagIndexError::Config(
                "max_tokens_per_batch must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn cooldown(&self) -> Duration {
        Duration::from_secs(self.inter_batch_cooldown_secs)
    }
}

/// Everything the indexing pipeline needs besides its collaborators
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexerConfig {
    pub chunking: ChunkingConfig,
    pub batching: BatchConfig,
}

impl IndexerConfig {
    pub fn validate(&self) -> Result<()> {
        self.chunking.validate()?;
        self.batching.validate()
    }
}
