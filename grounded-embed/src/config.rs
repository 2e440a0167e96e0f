//! Configuration for embedding models

use crate::error::{EmbedError, Result};
use fastembed::EmbeddingModel;
use serde::{Deserialize, Serialize};

/// Configuration for an embedding provider.
///
/// The model is identified by name and must be one of the built-in
/// fastembed models this crate knows how to load. The default is
/// `all-MiniLM-L6-v2`, a small sentence-transformer well suited to
/// short FAQ-style knowledge bases.
///
/// Retrieval quality depends on embedding-space symmetry: queries must be
/// embedded by the same model, with the same normalization, as the indexed
/// chunks. Persist the model name alongside the index and reuse it at load
/// time rather than constructing configs ad hoc.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbedConfig {
    /// Name of the embedding model (e.g., "all-MiniLM-L6-v2")
    pub model_name: String,
    /// Whether to print a progress bar while the model downloads
    #[serde(default)]
    pub show_download_progress: bool,
}

impl Default for EmbedConfig {
    fn default() -> Self {
        Self::minilm_l6()
    }
}

impl EmbedConfig {
    /// Create a configuration for an arbitrary model name.
    pub fn new<S: Into<String>>(model_name: S) -> Self {
        Self {
            model_name: model_name.into(),
            show_download_progress: false,
        }
    }

    /// Configuration for the all-MiniLM-L6-v2 sentence transformer
    /// (384 dimensions).
    pub fn minilm_l6() -> Self {
        Self::new("all-MiniLM-L6-v2")
    }

    /// Enable or disable the download progress bar.
    pub fn with_show_download_progress(mut self, show: bool) -> Self {
        self.show_download_progress = show;
        self
    }

    /// The configured model name.
    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// Resolve the configured name to a fastembed built-in model.
    pub fn embedding_model(&self) -> Result<EmbeddingModel> {
        match self.model_name.as_str() {
            "all-MiniLM-L6-v2" => Ok(EmbeddingModel::AllMiniLML6V2),
            "bge-small-en-v1.5" => Ok(EmbeddingModel::BGESmallENV15),
            other => Err(EmbedError::invalid_config(format!(
                "Unknown embedding model: {other}"
            ))),
        }
    }
}
