//! Splitting knowledge-base text into retrievable chunks.
//!
//! This module turns a raw knowledge document into an ordered sequence of
//! [`Chunk`]s suitable for embedding and similarity search. Two strategies
//! are provided:
//!
//! - [`SlidingWindowChunker`]: a fixed-width character window with overlap,
//!   the right default for free-form prose.
//! - [`SectionChunker`]: splits on blank-line boundaries (falling back to
//!   single lines when the document has too few sections), the right choice
//!   for FAQ-style documents with paragraph or Q/A structure.
//!
//! Both strategies are deterministic: the same input and parameters always
//! produce a byte-identical chunk sequence. Chunk identity is positional:
//! a chunk's `sequence` is its rank in the output, and the embedding index
//! addresses chunk text by that same position.
//!
//! # Usage
//!
//! ```
//! use grounded_context::text::SlidingWindowChunker;
//!
//! let chunker = SlidingWindowChunker::new(700, 120);
//! let chunks = chunker.chunks("OPENING HOURS\n- Mon-Sun: 9am-9pm\n");
//! assert_eq!(chunks[0].sequence, 0);
//! ```

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// A retrievable unit of knowledge-base text.
///
/// Chunks are created once at index-build time and never mutated; replacing
/// knowledge means rebuilding the whole sequence. Identity is positional
/// (`sequence`), not content-derived.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// The rank of this chunk within the chunk sequence (0-indexed).
    pub sequence: usize,
    /// The text content of this chunk.
    pub text: String,
}

/// Normalize line endings and whitespace before chunking.
///
/// Converts CRLF/CR to LF, collapses runs of three or more newlines down to
/// a single blank line, and trims leading/trailing whitespace. No
/// locale-dependent transformations are applied, so the result is stable
/// across environments.
pub fn clean_text(raw: &str) -> String {
    static BLANK_RUNS: OnceLock<Regex> = OnceLock::new();
    let blank_runs = BLANK_RUNS.get_or_init(|| {
        Regex::new(r"\n{3,}").expect("blank-run pattern is a valid regex")
    });

    let unified = raw.replace("\r\n", "\n").replace('\r', "\n");
    blank_runs.replace_all(&unified, "\n\n").trim().to_string()
}

/// Fixed-width sliding window chunker.
///
/// Windows are measured in characters (not bytes) so multi-byte UTF-8 text
/// never splits mid-character. The window advances by `size - overlap`
/// characters per step, never less than one, so the loop always terminates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlidingWindowChunker {
    size: usize,
    overlap: usize,
}

impl Default for SlidingWindowChunker {
    fn default() -> Self {
        // Matches the index defaults used by grounded-retriever.
        Self::new(700, 120)
    }
}

impl SlidingWindowChunker {
    /// Create a chunker with the given window size and overlap, both in
    /// characters. A window size of zero is bumped to one.
    pub fn new(size: usize, overlap: usize) -> Self {
        Self {
            size: size.max(1),
            overlap,
        }
    }

    /// Split `raw` into overlapping chunks.
    ///
    /// The text is normalized with [`clean_text`] first. Each window is
    /// trimmed and empty windows are dropped, so the returned sequence may
    /// be shorter than the number of window positions.
    pub fn chunks(&self, raw: &str) -> Vec<Chunk> {
        let text = clean_text(raw);
        if text.is_empty() {
            return Vec::new();
        }

        // Byte offsets of every char boundary, plus the end of the text,
        // so windows can be sliced without splitting UTF-8 sequences.
        let mut boundaries: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
        boundaries.push(text.len());
        let n = boundaries.len() - 1;

        let mut chunks = Vec::new();
        let mut start = 0usize;
        while start < n {
            let end = (start + self.size).min(n);
            let window = text[boundaries[start]..boundaries[end]].trim();
            if !window.is_empty() {
                chunks.push(Chunk {
                    sequence: chunks.len(),
                    text: window.to_string(),
                });
            }
            if end == n {
                break;
            }
            // Step back by the overlap, but always advance at least one
            // character so the window cannot stall.
            start = end.saturating_sub(self.overlap).max(start + 1);
        }

        chunks
    }
}

/// Structure-aware chunker for documents with paragraph or Q/A structure.
///
/// Splits on blank-line boundaries first. If that yields fewer than
/// `min_sections` parts the document is too monolithic for section
/// splitting, so it falls back to single-line splitting. Parts shorter
/// than `min_chunk_len` characters are dropped as noise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionChunker {
    min_sections: usize,
    min_chunk_len: usize,
}

impl Default for SectionChunker {
    fn default() -> Self {
        Self::new(6, 20)
    }
}

impl SectionChunker {
    /// Create a chunker with the given minimum viable section count and
    /// minimum chunk length (in characters).
    pub fn new(min_sections: usize, min_chunk_len: usize) -> Self {
        Self {
            min_sections,
            min_chunk_len,
        }
    }

    /// Split `raw` on structural boundaries.
    pub fn chunks(&self, raw: &str) -> Vec<Chunk> {
        let text = clean_text(raw);
        if text.is_empty() {
            return Vec::new();
        }

        let mut parts: Vec<&str> = text
            .split("\n\n")
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect();

        if parts.len() < self.min_sections {
            parts = text
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .collect();
        }

        parts
            .into_iter()
            .filter(|part| part.chars().count() >= self.min_chunk_len)
            .enumerate()
            .map(|(sequence, part)| Chunk {
                sequence,
                text: part.to_string(),
            })
            .collect()
    }
}

/// Chunking strategy selection, serializable so it can live in config files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum ChunkingStrategy {
    /// Fixed-width sliding window over characters.
    SlidingWindow(SlidingWindowChunker),
    /// Blank-line/section splitting with a line-based fallback.
    Sections(SectionChunker),
}

impl Default for ChunkingStrategy {
    fn default() -> Self {
        ChunkingStrategy::SlidingWindow(SlidingWindowChunker::default())
    }
}

impl ChunkingStrategy {
    /// Apply the selected strategy to `raw`.
    pub fn chunks(&self, raw: &str) -> Vec<Chunk> {
        match self {
            ChunkingStrategy::SlidingWindow(chunker) => chunker.chunks(raw),
            ChunkingStrategy::Sections(chunker) => chunker.chunks(raw),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_text_normalizes_line_endings_and_blank_runs() {
        let raw = "a\r\nb\r\rc\n\n\n\n\nd\n";
        let cleaned = clean_text(raw);
        assert_eq!(cleaned, "a\nb\n\nc\n\nd");
    }

    #[test]
    fn sliding_window_is_idempotent() {
        let text = (0..50).map(|i| format!("Sentence number {i}. ")).collect::<String>();
        let chunker = SlidingWindowChunker::new(120, 30);
        let first = chunker.chunks(&text);
        let second = chunker.chunks(&text);
        assert!(!first.is_empty());
        assert_eq!(first, second);
    }

    #[test]
    fn sliding_window_respects_size_and_overlap() {
        let text = "abcdefghij".repeat(20);
        let chunker = SlidingWindowChunker::new(50, 10);
        let chunks = chunker.chunks(&text);
        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.text.chars().count() <= 50);
        }
        // Consecutive windows share their overlap region.
        assert!(chunks[0].text.ends_with(&chunks[1].text[..10]));
    }

    #[test]
    fn sliding_window_always_advances_with_degenerate_overlap() {
        let text = "abcdef".repeat(100);
        // Overlap >= size would stall a naive implementation.
        let chunker = SlidingWindowChunker::new(10, 10);
        let chunks = chunker.chunks(&text);
        assert!(!chunks.is_empty());
    }

    #[test]
    fn sliding_window_handles_multibyte_text() {
        let text = "Jollof rice — ₦3,500 per portion. ".repeat(40);
        let chunker = SlidingWindowChunker::new(80, 20);
        let chunks = chunker.chunks(&text);
        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.text.chars().count() <= 80);
        }
    }

    #[test]
    fn empty_input_yields_no_chunks() {
        assert!(SlidingWindowChunker::default().chunks("").is_empty());
        assert!(SectionChunker::default().chunks("  \n\n  ").is_empty());
    }

    #[test]
    fn section_chunker_splits_on_blank_lines() {
        let text = (0..8)
            .map(|i| format!("This is section number {i} with enough text."))
            .collect::<Vec<_>>()
            .join("\n\n");
        let chunks = SectionChunker::default().chunks(&text);
        assert_eq!(chunks.len(), 8);
        assert_eq!(chunks[3].sequence, 3);
        assert!(chunks[3].text.contains("section number 3"));
    }

    #[test]
    fn section_chunker_falls_back_to_lines_and_drops_short_parts() {
        // Only two blank-line sections: below the minimum viable count, so
        // the chunker should fall back to line splitting, and the short
        // header lines should be dropped by the noise filter.
        let text = "MENU\n- Jollof rice with grilled chicken\n- Fried rice with beef sauce\n\nHOURS\n- Open every day from nine to nine\n";
        let chunks = SectionChunker::default().chunks(text);
        let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        assert!(!texts.iter().any(|t| *t == "MENU" || *t == "HOURS"));
        assert_eq!(chunks.len(), 3);
        for chunk in &chunks {
            assert!(chunk.text.chars().count() >= 20);
        }
    }

    #[test]
    fn chunk_sequences_are_contiguous_from_zero() {
        let text = "word ".repeat(500);
        let chunks = SlidingWindowChunker::new(100, 20).chunks(&text);
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.sequence, i);
        }
    }
}
