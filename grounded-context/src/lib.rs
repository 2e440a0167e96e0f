pub mod text;

pub use text::{Chunk, ChunkingStrategy, SectionChunker, SlidingWindowChunker, clean_text};
