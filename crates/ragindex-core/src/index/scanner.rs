//! File-system document source

use crate::error::Result;
use glob::Pattern;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

/// Directories to exclude from scanning
const EXCLUDE_DIRS: &[&str] = &[
    "node_modules",
    ".git",
    ".cache",
    "vendor",
    "dist",
    "build",
    "__pycache__",
    ".venv",
    "target",
];

/// Scan options
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Glob patterns relative to the root; a file must match at least one.
    /// A pattern ending in `/` matches every file below that directory.
    pub include: Vec<String>,
    /// Glob patterns relative to the root; matching files are dropped
    pub exclude: Vec<String>,
    pub follow_symlinks: bool,
    pub exclude_dirs: Vec<String>,
    pub exclude_hidden: bool,
    /// Files larger than this many bytes are skipped
    pub max_file_size: u64,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            include: vec!["**/*".to_string()],
            exclude: Vec::new(),
            follow_symlinks: true,
            exclude_dirs: EXCLUDE_DIRS.iter().map(|s| s.to_string()).collect(),
            exclude_hidden: true,
            max_file_size: 1_000_000,
        }
    }
}

impl ScanOptions {
    pub fn new(include: Vec<String>, exclude: Vec<String>) -> Self {
        Self {
            include,
            exclude,
            ..Default::default()
        }
    }
}

/// Read every matching text file under `root` into `relative path -> content`
///
/// Paths use `/` separators. Files that are not valid UTF-8 are skipped.
pub fn scan_documents(root: &Path, options: &ScanOptions) -> Result<BTreeMap<String, String>> {
    let include = compile(&options.include)?;
    let exclude = compile(&options.exclude)?;
    let mut documents = BTreeMap::new();

    let walker = WalkDir::new(root)
        .follow_links(options.follow_symlinks)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !should_skip(e, options));

    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let relative = path
            .strip_prefix(root)
            .unwrap_or(path)
            .to_string_lossy()
            .replace('\\', "/");

        if !include.iter().any(|p| p.matches(&relative)) {
            continue;
        }
        if exclude.iter().any(|p| p.matches(&relative)) {
            continue;
        }

        let size = entry.metadata()?.len();
        if size > options.max_file_size {
            debug!(path = %relative, size, "skipping oversized file");
            continue;
        }

        match std::fs::read_to_string(path) {
            Ok(content) => {
                documents.insert(relative, content);
            }
            Err(e) if e.kind() == std::io::ErrorKind::InvalidData => {
                debug!(path = %relative, "skipping non-UTF-8 file");
            }
            Err(e) => return Err(e.into()),
        }
    }

    Ok(documents)
}

fn compile(patterns: &[String]) -> Result<Vec<Pattern>> {
    patterns
        .iter()
        .map(|p| Pattern::new(&expand_dir_pattern(p)).map_err(Into::into))
        .collect()
}

/// `docs/` becomes `docs/**/*`
fn expand_dir_pattern(pattern: &str) -> String {
    match pattern.strip_suffix('/') {
        Some(dir) if !dir.is_empty() => format!("{}/**/*", dir.trim_end_matches('/')),
        Some(_) => "**/*".to_string(),
        None => pattern.to_string(),
    }
}

fn should_skip(entry: &DirEntry, options: &ScanOptions) -> bool {
    let name = entry.file_name().to_string_lossy();

    if options.exclude_hidden && name.starts_with('.') {
        return true;
    }

    if entry.file_type().is_dir() && options.exclude_dirs.iter().any(|d| name == *d) {
        return true;
    }

    false
}
