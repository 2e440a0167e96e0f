//! Error types for index building, persistence, and retrieval.
//!
//! Errors split into two families. Fatal startup conditions
//! ([`RetrieverError::KnowledgeBaseEmpty`], [`RetrieverError::IndexNotBuilt`],
//! [`RetrieverError::CorruptIndex`]) mean the service must not accept
//! traffic. Per-request failures (embedding errors surfacing through
//! [`RetrieverError::Embed`]) are caught at the request boundary by the
//! pipeline and folded into a refusal, never a crash.

use std::path::PathBuf;

/// Result type for retrieval operations.
pub type Result<T> = std::result::Result<T, RetrieverError>;

#[derive(Debug, thiserror::Error)]
pub enum RetrieverError {
    /// The knowledge base produced no chunks; there is nothing to index.
    #[error("Knowledge base produced no chunks; cannot build an index from empty text")]
    KnowledgeBaseEmpty,

    /// One or both index artifacts are missing on disk.
    #[error(
        "Index not built: missing artifacts in {dir}. Build it first with `grounded-retriever index`"
    )]
    IndexNotBuilt { dir: PathBuf },

    /// The persisted artifacts exist but disagree with each other.
    #[error("Corrupt index: {message}")]
    CorruptIndex { message: String },

    /// A vector's dimension does not match the index dimension.
    #[error("Embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// IO errors reading or writing index artifacts
    #[error("IO error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// Manifest serialization errors
    #[error("Manifest error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },

    /// Errors from the embedding collaborator
    #[error("Embedding error: {source}")]
    Embed {
        #[from]
        source: grounded_embed::EmbedError,
    },
}

impl RetrieverError {
    /// Create a corrupt-index error with a custom message.
    pub fn corrupt<S: Into<String>>(message: S) -> Self {
        Self::CorruptIndex {
            message: message.into(),
        }
    }
}
