//! Boundary-aware segmentation
//!
//! Splits a document into ordered, non-overlapping segments along code
//! constructs, paragraphs, or sentences. Segments borrow from the document
//! and remember their byte offset, so the assembler can measure and slice
//! the original text between any two segment boundaries.

use super::tokens::TokenCounter;
use crate::config::ChunkingConfig;
use lazy_static::lazy_static;
use regex::Regex;
use std::path::Path;
use tracing::debug;

lazy_static! {
    static ref DEFINITION_RE: Regex = Regex::new(r"\n(?:async\s+)?(?:def|class)\s+\w+").unwrap();
    static ref FUNCTION_RE: Regex = Regex::new(r"\n(?:async\s+)?function\s+\w+").unwrap();
    static ref CLASS_RE: Regex = Regex::new(r"\nclass\s+\w+").unwrap();
    static ref VISIBILITY_RE: Regex = Regex::new(r"\n(?:public|private|protected)\s+").unwrap();
    static ref BLANK_LINE_RE: Regex = Regex::new(r"\n\s*\n").unwrap();
    static ref SENTENCE_END_RE: Regex = Regex::new(r"[.!?](?:\s+[A-Z]|\n)").unwrap();
}

/// File extensions treated as source code
const CODE_EXTENSIONS: &[&str] = &[
    "py", "js", "ts", "jsx", "tsx", "java", "c", "cpp", "h", "cs", "php", "rb", "go", "rs",
    "swift", "kt", "sh", "sql",
];

/// A contiguous slice of a document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment<'a> {
    pub text: &'a str,
    /// Byte offset of `text` within the document
    pub offset: usize,
}

impl<'a> Segment<'a> {
    /// Byte offset one past the end of the segment
    pub fn end(&self) -> usize {
        self.offset + self.text.len()
    }

    /// Trim `content[start..end]`, returning `None` when only whitespace remains
    fn trimmed(content: &'a str, start: usize, end: usize) -> Option<Self> {
        let slice = &content[start..end];
        let text = slice.trim();
        if text.is_empty() {
            return None;
        }
        let leading = slice.len() - slice.trim_start().len();
        Some(Self {
            text,
            offset: start + leading,
        })
    }
}

/// Coarse content classification driving the segmentation path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    Code,
    Text,
}

impl ContentType {
    /// Classify by file extension; anything unrecognized is text
    pub fn from_path(path: &Path) -> Self {
        let is_code = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|ext| CODE_EXTENSIONS.contains(&ext))
            .unwrap_or(false);
        if is_code {
            Self::Code
        } else {
            Self::Text
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Code => "code",
            Self::Text => "text",
        }
    }
}

/// One way of finding boundaries in a document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryStrategy {
    /// Python `def` / `class`, optionally `async`
    Definition,
    /// JavaScript `function`, optionally `async`
    Function,
    /// `class` declarations
    Class,
    /// `public` / `private` / `protected` declarations
    Visibility,
    /// Blank-line separated paragraphs
    Paragraph,
}

impl BoundaryStrategy {
    /// Structural strategies tried on code, in priority order
    pub const CODE: [BoundaryStrategy; 4] = [
        Self::Definition,
        Self::Function,
        Self::Class,
        Self::Visibility,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Definition => "definition",
            Self::Function => "function",
            Self::Class => "class",
            Self::Visibility => "visibility",
            Self::Paragraph => "paragraph",
        }
    }

    /// Split `content`, or `None` when this strategy finds no usable boundary
    ///
    /// Structural strategies only succeed with more than one non-empty piece;
    /// the paragraph strategy succeeds with any non-empty piece.
    pub fn split<'a>(&self, content: &'a str) -> Option<Vec<Segment<'a>>> {
        match self {
            Self::Paragraph => {
                let segments = split_around(content, &BLANK_LINE_RE);
                (!segments.is_empty()).then_some(segments)
            }
            structural => {
                // Cut right after the newline so the declaration line starts a piece
                let points = structural.pattern().find_iter(content).map(|m| m.start() + 1);
                let segments = split_at(content, points);
                (segments.len() > 1).then_some(segments)
            }
        }
    }

    fn pattern(&self) -> &'static Regex {
        match self {
            Self::Definition => &DEFINITION_RE,
            Self::Function => &FUNCTION_RE,
            Self::Class => &CLASS_RE,
            Self::Visibility => &VISIBILITY_RE,
            Self::Paragraph => &BLANK_LINE_RE,
        }
    }
}

/// Split at the given byte positions, keeping trimmed non-empty pieces
fn split_at<'a>(content: &'a str, points: impl Iterator<Item = usize>) -> Vec<Segment<'a>> {
    let mut segments = Vec::new();
    let mut start = 0;
    for point in points {
        segments.extend(Segment::trimmed(content, start, point));
        start = point;
    }
    segments.extend(Segment::trimmed(content, start, content.len()));
    segments
}

/// Split around every match of `separator`, dropping the separators
fn split_around<'a>(content: &'a str, separator: &Regex) -> Vec<Segment<'a>> {
    let mut segments = Vec::new();
    let mut start = 0;
    for m in separator.find_iter(content) {
        segments.extend(Segment::trimmed(content, start, m.start()));
        start = m.end();
    }
    segments.extend(Segment::trimmed(content, start, content.len()));
    segments
}

/// Re-base segments found inside `parent` onto the document
fn rebase<'a>(parent: Segment<'a>, pieces: Vec<Segment<'a>>) -> impl Iterator<Item = Segment<'a>> {
    pieces.into_iter().map(move |s| Segment {
        text: s.text,
        offset: parent.offset + s.offset,
    })
}

fn split_lines(segment: Segment<'_>) -> Vec<Segment<'_>> {
    let points = segment.text.match_indices('\n').map(|(i, _)| i + 1);
    rebase(segment, split_at(segment.text, points)).collect()
}

/// Sentences end at `.`, `!` or `?` followed by whitespace and a capital, or by a line break
fn split_sentences(segment: Segment<'_>) -> Vec<Segment<'_>> {
    let points = SENTENCE_END_RE.find_iter(segment.text).map(|m| m.start() + 1);
    rebase(segment, split_at(segment.text, points)).collect()
}

/// Produces segments sized with respect to the chunking bounds
pub struct Segmenter<'c> {
    counter: &'c dyn TokenCounter,
    config: ChunkingConfig,
}

impl<'c> Segmenter<'c> {
    pub fn new(counter: &'c dyn TokenCounter, config: ChunkingConfig) -> Self {
        Self { counter, config }
    }

    /// Segment a document; the same input always yields the same segments
    pub fn segment<'a>(&self, content: &'a str, content_type: ContentType) -> Vec<Segment<'a>> {
        if content.is_empty() {
            return Vec::new();
        }
        let segments = match content_type {
            ContentType::Code => self.segment_code(content),
            ContentType::Text => self.segment_text(content),
        };
        if segments.is_empty() {
            return vec![Segment { text: content, offset: 0 }];
        }
        segments
    }

    fn segment_code<'a>(&self, content: &'a str) -> Vec<Segment<'a>> {
        let (strategy, initial) = BoundaryStrategy::CODE
            .iter()
            .chain(std::iter::once(&BoundaryStrategy::Paragraph))
            .find_map(|s| s.split(content).map(|segments| (*s, segments)))
            .unwrap_or((BoundaryStrategy::Paragraph, Vec::new()));

        debug!(
            strategy = strategy.as_str(),
            segments = initial.len(),
            "split code on structural boundaries"
        );

        let mut refined = Vec::with_capacity(initial.len());
        for segment in initial {
            if self.counter.count(segment.text) > self.config.hard_max_tokens {
                let lines = split_lines(segment);
                if lines.is_empty() {
                    refined.push(segment);
                } else {
                    refined.extend(lines);
                }
            } else {
                refined.push(segment);
            }
        }
        refined
    }

    fn segment_text<'a>(&self, content: &'a str) -> Vec<Segment<'a>> {
        let paragraphs = BoundaryStrategy::Paragraph
            .split(content)
            .unwrap_or_default();

        let mut segments = Vec::with_capacity(paragraphs.len());
        for paragraph in paragraphs {
            let tokens = self.counter.count(paragraph.text);
            if tokens > self.config.hard_max_tokens {
                let sentences = split_sentences(paragraph);
                debug!(
                    tokens,
                    sentences = sentences.len(),
                    "split oversized paragraph into sentences"
                );
                if sentences.is_empty() {
                    segments.push(paragraph);
                } else {
                    segments.extend(sentences);
                }
            } else {
                segments.push(paragraph);
            }
        }
        segments
    }
}
