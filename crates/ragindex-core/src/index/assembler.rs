//! Greedy chunk assembly
//!
//! A single left-to-right pass merges segments into chunks. A segment is
//! never split: a buffer is closed before it would grow past `hard_max`, or
//! as soon as it has reached `target_min`. Packing is not optimal, but the
//! result is deterministic and bounded.

use super::chunker::Chunk;
use super::segmenter::Segment;
use super::tokens::TokenCounter;
use crate::config::ChunkingConfig;
use std::ops::Range;
use tracing::debug;

/// Merges a document's segments into chunks
pub struct ChunkAssembler<'c> {
    counter: &'c dyn TokenCounter,
    config: ChunkingConfig,
}

impl<'c> ChunkAssembler<'c> {
    pub fn new(counter: &'c dyn TokenCounter, config: ChunkingConfig) -> Self {
        Self { counter, config }
    }

    /// Assemble chunks from segments of `content`, in document order
    pub fn assemble(&self, content: &str, segments: &[Segment<'_>]) -> Vec<Chunk> {
        let mut acc = Accumulator::new(content, self.counter);
        let substantive = segments.iter().filter(|s| !s.text.trim().is_empty()).count();

        for segment in segments {
            let Some(buffer) = acc.buffer.clone() else {
                acc.open(segment);
                continue;
            };

            let segment_tokens = self.counter.count(segment.text);
            let combined_tokens = self.counter.count(&content[buffer.start..segment.end()]);

            if combined_tokens > self.config.hard_max_tokens {
                acc.close();
                acc.open(segment);
            } else if acc.buffer_tokens >= self.config.target_min_tokens && segment_tokens > 0 {
                acc.close();
                acc.open(segment);
            } else {
                acc.extend(segment, combined_tokens);
            }
        }

        // A document that is one segment below target_min is too small to index
        if substantive == 1
            && acc.chunks.is_empty()
            && acc.buffer_tokens < self.config.target_min_tokens
        {
            debug!(
                tokens = acc.buffer_tokens,
                target_min = self.config.target_min_tokens,
                "document below minimum chunk size"
            );
            return Vec::new();
        }
        acc.close();
        acc.chunks
    }
}

/// Running buffer for one document, owned by a single `assemble` call
struct Accumulator<'a, 'c> {
    content: &'a str,
    counter: &'c dyn TokenCounter,
    /// Byte range of the source currently buffered
    buffer: Option<Range<usize>>,
    buffer_tokens: usize,
    chunks: Vec<Chunk>,
    cursor: CharCursor,
}

impl<'a, 'c> Accumulator<'a, 'c> {
    fn new(content: &'a str, counter: &'c dyn TokenCounter) -> Self {
        Self {
            content,
            counter,
            buffer: None,
            buffer_tokens: 0,
            chunks: Vec::new(),
            cursor: CharCursor::default(),
        }
    }

    fn open(&mut self, segment: &Segment<'_>) {
        self.buffer = Some(segment.offset..segment.end());
        self.buffer_tokens = self.counter.count(segment.text);
    }

    fn extend(&mut self, segment: &Segment<'_>, combined_tokens: usize) {
        if let Some(buffer) = self.buffer.as_mut() {
            buffer.end = segment.end();
        }
        self.buffer_tokens = combined_tokens;
    }

    /// Finalize the buffer as the next chunk; whitespace-only buffers vanish
    fn close(&mut self) {
        let Some(range) = self.buffer.take() else {
            return;
        };
        self.buffer_tokens = 0;

        let raw = &self.content[range.clone()];
        let text = raw.trim();
        if text.is_empty() {
            return;
        }
        let start = range.start + (raw.len() - raw.trim_start().len());
        let end = start + text.len();

        let start_char = self.cursor.advance(self.content, start);
        let end_char = self.cursor.advance(self.content, end);
        let token_count = self.counter.count(text);
        let chunk_index = self.chunks.len();

        self.chunks.push(Chunk::new(
            text.to_string(),
            start_char,
            end_char,
            token_count,
            chunk_index,
        ));
    }
}

/// Converts increasing byte offsets to character offsets in one pass
#[derive(Debug, Default)]
struct CharCursor {
    byte: usize,
    char: usize,
}

impl CharCursor {
    fn advance(&mut self, content: &str, byte: usize) -> usize {
        debug_assert!(byte >= self.byte);
        self.char += content[self.byte..byte].chars().count();
        self.byte = byte;
        self.char
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::segmenter::{ContentType, Segmenter};
    use crate::index::tokens::HeuristicCounter;

    fn assemble(content: &str, config: ChunkingConfig) -> Vec<Chunk> {
        let counter = HeuristicCounter;
        let segments = Segmenter::new(&counter, config).segment(content, ContentType::Text);
        ChunkAssembler::new(&counter, config).assemble(content, &segments)
    }

    fn seg(content: &str, text: &'static str) -> Segment<'static> {
        let offset = content.find(text).unwrap();
        Segment { text, offset }
    }

    #[test]
    fn test_closes_buffer_once_target_min_reached() {
        let content = "a b\n\nc d\n\ne f\n\ng";
        let chunks = assemble(content, ChunkingConfig::new(2, 3, 10));
        let texts: Vec<_> = chunks.iter().map(|c| c.content.as_str()).collect();
        assert_eq!(texts, vec!["a b", "c d", "e f", "g"]);
    }

    #[test]
    fn test_accumulates_until_target_min() {
        let content = "a\n\nb\n\nc\n\nd\n\ne";
        let chunks = assemble(content, ChunkingConfig::new(3, 4, 10));
        let texts: Vec<_> = chunks.iter().map(|c| c.content.as_str()).collect();
        assert_eq!(texts, vec!["a\n\nb\n\nc", "d\n\ne"]);
        assert_eq!(chunks[0].token_count, 3);
        assert_eq!(chunks[1].token_count, 2);
    }

    #[test]
    fn test_hard_max_closes_before_overflow() {
        let content = "one two\n\nthree four five six seven";
        // Buffer of 2 never reaches target_min of 3, but adding 5 more exceeds hard max 6
        let chunks = assemble(content, ChunkingConfig::new(3, 5, 6));
        let texts: Vec<_> = chunks.iter().map(|c| c.content.as_str()).collect();
        assert_eq!(texts, vec!["one two", "three four five six seven"]);
        assert!(chunks.iter().all(|c| c.token_count <= 6));
    }

    #[test]
    fn test_oversized_single_segment_is_kept_whole() {
        let content = "w1 w2 w3 w4 w5 w6 w7 w8";
        let counter = HeuristicCounter;
        let config = ChunkingConfig::new(2, 3, 4);
        let segments = vec![Segment { text: content, offset: 0 }];
        let chunks = ChunkAssembler::new(&counter, config).assemble(content, &segments);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].token_count, 8);
    }

    #[test]
    fn test_single_small_segment_yields_nothing() {
        assert!(assemble("Short.", ChunkingConfig::new(100, 200, 300)).is_empty());
    }

    #[test]
    fn test_small_multi_paragraph_document_is_one_chunk() {
        let content = "# Setup\n\nRun the installer with the admin token.\n\nThen restart the service.";
        let chunks = assemble(content, ChunkingConfig::new(100, 200, 300));
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].content, content);
        assert_eq!(chunks[0].start_char, 0);
        assert_eq!(chunks[0].end_char, content.chars().count());
    }

    #[test]
    fn test_whitespace_only_document_yields_nothing() {
        assert!(assemble("  \n\n\t\n", ChunkingConfig::new(2, 3, 10)).is_empty());
    }

    #[test]
    fn test_trailing_remainder_after_chunks_is_kept() {
        let content = "a b c\n\nd";
        let chunks = assemble(content, ChunkingConfig::new(3, 4, 10));
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[1].content, "d");
        assert_eq!(chunks[1].chunk_index, 1);
    }

    #[test]
    fn test_offsets_are_character_offsets() {
        let content = "  héllo wörld\n\n🎉 party time  ";
        let counter = HeuristicCounter;
        let config = ChunkingConfig::new(2, 3, 10);
        let segments = vec![seg(content, "héllo wörld"), seg(content, "🎉 party time")];
        let chunks = ChunkAssembler::new(&counter, config).assemble(content, &segments);

        assert_eq!(chunks.len(), 2);
        let chars: Vec<char> = content.chars().collect();
        for chunk in &chunks {
            let slice: String = chars[chunk.start_char..chunk.end_char].iter().collect();
            assert_eq!(slice, chunk.content);
        }
        assert_eq!(chunks[0].start_char, 2);
        assert_eq!(chunks[0].end_char, 13);
        assert_eq!(chunks[1].start_char, 15);
    }

    #[test]
    fn test_merged_chunk_keeps_source_separators() {
        let content = "alpha\n\nbeta\n\ngamma delta";
        let chunks = assemble(content, ChunkingConfig::new(2, 3, 10));
        assert_eq!(chunks[0].content, "alpha\n\nbeta");
        assert_eq!(chunks[1].content, "gamma delta");
    }
}
