//! Error types for ragindex

use thiserror::Error;

/// Result type alias using RagIndexError
pub type Result<T> = std::result::Result<T, RagIndexError>;

/// Error type alias for convenience
pub type Error = RagIndexError;

/// Exit codes for CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL_ERROR: i32 = 1;
    pub const NOT_FOUND: i32 = 2;
    pub const INVALID_INPUT: i32 = 3;
}

/// Main error type for ragindex
#[derive(Debug, Error)]
pub enum RagIndexError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Walk directory error: {0}")]
    WalkDir(#[from] walkdir::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Tokenizer error: {0}")]
    Tokenizer(String),

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Indexing run aborted after {} completed document(s): {source}", completed.len())]
    RunAborted {
        completed: Vec<String>,
        #[source]
        source: Box<RagIndexError>,
    },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    #[error("Glob pattern error: {0}")]
    GlobPattern(#[from] glob::PatternError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl RagIndexError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NotFound(_) => exit_codes::NOT_FOUND,
            Self::Config(_) | Self::InvalidInput(_) | Self::Validation(_) => {
                exit_codes::INVALID_INPUT
            }
            Self::RunAborted { source, .. } => source.exit_code(),
            _ => exit_codes::GENERAL_ERROR,
        }
    }

    /// Documents that were fully stored before a run failed
    pub fn completed_documents(&self) -> &[String] {
        match self {
            Self::RunAborted { completed, .. } => completed,
            _ => &[],
        }
    }
}
