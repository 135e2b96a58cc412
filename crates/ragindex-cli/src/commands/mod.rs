//! CLI command handlers

pub mod chunk;
pub mod index;
pub mod remove;
pub mod search;
pub mod status;

use crate::app::TargetArgs;
use anyhow::{bail, Result};
use ragindex_core::{CollectionConfig, HeuristicCounter, TiktokenCounter, TokenCounter};
use std::sync::Arc;

/// Load a collection file, or describe a directory as an ad-hoc collection
pub fn resolve_collection(target: &TargetArgs) -> Result<CollectionConfig> {
    let path = &target.target;
    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yml") | Some("yaml")
    );

    if is_yaml {
        return Ok(CollectionConfig::from_yaml(path)?);
    }
    if !path.is_dir() {
        bail!(ragindex_core::RagIndexError::NotFound(format!(
            "Not a collection file or directory: {}",
            path.display()
        )));
    }

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "collection".to_string());
    let include = if target.include.is_empty() {
        vec!["**/*".to_string()]
    } else {
        target.include.clone()
    };
    let mut collection = CollectionConfig::new(name, path.clone(), include);
    collection.blacklist_paths = target.exclude.clone();
    Ok(collection)
}

pub fn token_counter(heuristic: bool) -> Result<Arc<dyn TokenCounter>> {
    if heuristic {
        Ok(Arc::new(HeuristicCounter))
    } else {
        Ok(Arc::new(TiktokenCounter::new()?))
    }
}
