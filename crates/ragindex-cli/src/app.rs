//! CLI argument definitions

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ragindex")]
#[command(
    author,
    version,
    about = "Incremental semantic index for local documents and code"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "cli")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Index a collection, embedding only new and changed documents
    Index(IndexArgs),

    /// Semantic search over an indexed collection
    Search(SearchArgs),

    /// Preview how a file would be chunked, without embedding
    Chunk(ChunkArgs),

    /// Show indexed documents and chunks per scope
    Status(StatusArgs),

    /// Remove one document's records from the index
    Remove(RemoveArgs),
}

/// A collection YAML file, or a directory selected with include/exclude globs
#[derive(Args, Clone)]
pub struct TargetArgs {
    /// Collection file (.yml/.yaml) or directory
    pub target: PathBuf,

    /// Glob patterns to include when TARGET is a directory
    #[arg(long = "include", short = 'i')]
    pub include: Vec<String>,

    /// Glob patterns to exclude when TARGET is a directory
    #[arg(long = "exclude", short = 'x')]
    pub exclude: Vec<String>,
}

#[derive(Args)]
pub struct IndexArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Count tokens by whitespace instead of cl100k_base
    #[arg(long)]
    pub heuristic: bool,
}

#[derive(Args)]
pub struct SearchArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Search query
    #[arg(required = true, num_args = 1..)]
    pub query: Vec<String>,

    /// Number of results (defaults to the collection's top_k)
    #[arg(short = 'n', long)]
    pub top_k: Option<usize>,

    /// Result template, e.g. "{file_path}: {content}"
    #[arg(long)]
    pub template: Option<String>,
}

#[derive(Args)]
pub struct ChunkArgs {
    /// File to chunk
    pub file: PathBuf,

    /// Preferred minimum chunk size in tokens
    #[arg(long, default_value = "400")]
    pub min: usize,

    /// Preferred maximum chunk size in tokens
    #[arg(long, default_value = "600")]
    pub max: usize,

    /// Absolute maximum chunk size in tokens
    #[arg(long, default_value = "1000")]
    pub hard: usize,

    /// Count tokens by whitespace instead of cl100k_base
    #[arg(long)]
    pub heuristic: bool,
}

#[derive(Args)]
pub struct StatusArgs {
    /// Only show this scope
    pub scope: Option<String>,
}

#[derive(Args)]
pub struct RemoveArgs {
    /// Scope (canonical collection base path)
    pub scope: String,

    /// Document path relative to the collection base
    pub path: String,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Cli,
    Json,
}
