//! Token counting
//!
//! Counts are not additive across concatenation: BPE tokenizers can merge
//! tokens across a boundary, so callers recount joined text instead of
//! summing the parts.

use crate::error::{RagIndexError, Result};
use tiktoken_rs::CoreBPE;

/// Deterministic `text -> token count` function
pub trait TokenCounter: Send + Sync {
    fn count(&self, text: &str) -> usize;

    /// Tokenizer name, for logs and stored metadata
    fn name(&self) -> &str;
}

/// BPE counter using the `cl100k_base` encoding (GPT-4 tokenizer)
pub struct TiktokenCounter {
    bpe: CoreBPE,
}

impl TiktokenCounter {
    pub fn new() -> Result<Self> {
        let bpe = tiktoken_rs::cl100k_base()
            .map_err(|e| RagIndexError::Tokenizer(format!("failed to load cl100k_base: {}", e)))?;
        Ok(Self { bpe })
    }
}

impl TokenCounter for TiktokenCounter {
    fn count(&self, text: &str) -> usize {
        if text.is_empty() {
            return 0;
        }
        self.bpe.encode_ordinary(text).len()
    }

    fn name(&self) -> &str {
        "cl100k_base"
    }
}

/// Whitespace word counter, for offline previews and tests
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicCounter;

impl TokenCounter for HeuristicCounter {
    fn count(&self, text: &str) -> usize {
        text.split_whitespace().count()
    }

    fn name(&self) -> &str {
        "whitespace"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tiktoken_counts_tokens() {
        let counter = TiktokenCounter::new().unwrap();
        let count = counter.count("Hello, world!");
        assert!(count > 0);
        assert_eq!(counter.count(""), 0);
    }

    #[test]
    fn test_tiktoken_is_deterministic() {
        let counter = TiktokenCounter::new().unwrap();
        let text = "fn main() { println!(\"hi\"); }";
        assert_eq!(counter.count(text), counter.count(text));
    }

    #[test]
    fn test_heuristic_counts_words() {
        let counter = HeuristicCounter;
        assert_eq!(counter.count("This is a test."), 4);
        assert_eq!(counter.count("   \n\t "), 0);
        assert_eq!(counter.count("one\ntwo  three"), 3);
    }
}
