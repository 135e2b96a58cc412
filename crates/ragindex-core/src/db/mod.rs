//! Database layer for ragindex
//!
//! SQLite-backed vector index: chunk records with embeddings and
//! metadata, keyed by scope, path and chunk index.

mod chunks;
mod schema;
pub mod vectors;

pub use chunks::ScopeStats;
pub use schema::Database;
use std::path::PathBuf;

/// Environment variable overriding the database location
pub const DB_PATH_ENV: &str = "RAGINDEX_DB";

impl Database {
    /// Get the default database path
    pub fn default_path() -> PathBuf {
        if let Ok(path) = std::env::var(DB_PATH_ENV) {
            return PathBuf::from(path);
        }
        dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(crate::CACHE_DIR_NAME)
            .join("index.sqlite")
    }
}
