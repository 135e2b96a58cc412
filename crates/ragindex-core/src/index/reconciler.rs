//! Change detection between scans
//!
//! Classifies the documents of the current scan against the content hashes
//! recorded by the last successful run. Paths that were recorded but are no
//! longer present are left alone here.

use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Hash content using SHA-256 (64 hex chars)
pub fn hash_content(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Outcome of comparing a scan with recorded hashes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciliation {
    /// Hash matches the recorded one
    pub unchanged: BTreeSet<String>,
    /// No recorded hash: embed for the first time
    pub to_embed: BTreeSet<String>,
    /// Recorded hash differs: delete old records, then embed again
    pub to_reembed: BTreeSet<String>,
    /// Current hash of every scanned document
    pub hashes: BTreeMap<String, String>,
}

impl Reconciliation {
    /// New documents first, then changed ones, each in path order
    pub fn needing_work(&self) -> impl Iterator<Item = &String> {
        self.to_embed.iter().chain(self.to_reembed.iter())
    }

    pub fn is_up_to_date(&self) -> bool {
        self.to_embed.is_empty() && self.to_reembed.is_empty()
    }

    pub fn total(&self) -> usize {
        self.unchanged.len() + self.to_embed.len() + self.to_reembed.len()
    }
}

/// Partition `current` (path -> content) against `prior` (path -> hash)
pub fn reconcile(
    current: &BTreeMap<String, String>,
    prior: &HashMap<String, String>,
) -> Reconciliation {
    let mut result = Reconciliation::default();

    for (path, content) in current {
        let hash = hash_content(content);
        match prior.get(path) {
            None => {
                result.to_embed.insert(path.clone());
            }
            Some(recorded) if *recorded != hash => {
                result.to_reembed.insert(path.clone());
            }
            Some(_) => {
                result.unchanged.insert(path.clone());
            }
        }
        result.hashes.insert(path.clone(), hash);
    }

    result
}
