//! YAML collection definitions
//!
//! A collection names a base directory, the patterns selecting documents
//! under it, and the chunking bounds used when indexing them:
//!
//! ```yaml
//! name: "My Documentation"
//! description: "Project docs and guides"
//! base_path: "/path/to/project"
//! whitelist_paths:
//!   - "docs/**"
//!   - "**/*.md"
//! blacklist_paths:
//!   - "**/archive/**"
//! chunk_min_tokens: 400
//! chunk_max_tokens: 600
//! top_k: 5
//! ```

use super::ChunkingConfig;
use crate::error::{RagIndexError, Result};
use crate::index::ScanOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Per-collection configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionConfig {
    pub name: String,
    pub description: String,
    pub base_path: PathBuf,

    /// Glob patterns to include, relative to `base_path`
    pub whitelist_paths: Vec<String>,

    /// Glob patterns to exclude, relative to `base_path`
    #[serde(default)]
    pub blacklist_paths: Vec<String>,

    #[serde(default = "default_chunk_min_tokens")]
    pub chunk_min_tokens: usize,

    #[serde(default = "default_chunk_max_tokens")]
    pub chunk_max_tokens: usize,

    #[serde(default = "default_hard_max_tokens")]
    pub hard_max_tokens: usize,

    /// Default number of search results
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Files larger than this many bytes are skipped
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
}

fn default_chunk_min_tokens() -> usize {
    400
}

fn default_chunk_max_tokens() -> usize {
    600
}

fn default_hard_max_tokens() -> usize {
    1000
}

fn default_top_k() -> usize {
    5
}

fn default_max_file_size() -> u64 {
    1_000_000
}

impl CollectionConfig {
    /// Build a collection in code, with default bounds
    pub fn new(name: impl Into<String>, base_path: impl Into<PathBuf>, whitelist: Vec<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            base_path: base_path.into(),
            whitelist_paths: whitelist,
            blacklist_paths: Vec::new(),
            chunk_min_tokens: default_chunk_min_tokens(),
            chunk_max_tokens: default_chunk_max_tokens(),
            hard_max_tokens: default_hard_max_tokens(),
            top_k: default_top_k(),
            max_file_size: default_max_file_size(),
        }
    }

    /// Load collection configuration from a YAML file
    pub fn from_yaml(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(RagIndexError::NotFound(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        let content = std::fs::read_to_string(path)?;
        let config: CollectionConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Save collection configuration to a YAML file
    pub fn to_yaml(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn chunking_config(&self) -> ChunkingConfig {
        ChunkingConfig::new(
            self.chunk_min_tokens,
            self.chunk_max_tokens,
            self.hard_max_tokens,
        )
    }

    /// File selection for scanning `base_path`
    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            max_file_size: self.max_file_size,
            ..ScanOptions::new(self.whitelist_paths.clone(), self.blacklist_paths.clone())
        }
    }

    /// Scope under which this collection's records are stored
    pub fn scope(&self) -> String {
        let resolved = std::fs::canonicalize(&self.base_path).unwrap_or_else(|_| self.base_path.clone());
        resolved.to_string_lossy().to_string()
    }
}
