//! # grounded-embed
//!
//! Text embedding for the Grounded retrieval pipeline, built on local ONNX
//! models via FastEmbed. The embedding model is treated as an opaque,
//! deterministic collaborator: `embed(texts) -> vectors`, always
//! L2-normalized so that inner product equals cosine similarity.
//!
//! ## Architecture
//!
//! - [`config`]: model selection and provider configuration
//! - [`provider`]: the [`EmbeddingProvider`] trait, the FastEmbed
//!   implementation, and vector normalization
//! - [`testing`]: a deterministic feature-hashing provider for tests
//! - [`error`]: error types and result handling
//!
//! ## Quick Start
//!
//! ```no_run
//! use grounded_embed::{EmbedConfig, EmbeddingProvider, FastEmbedProvider};
//!
//! # async fn example() -> grounded_embed::Result<()> {
//! let provider = FastEmbedProvider::create(EmbedConfig::minilm_l6()).await?;
//!
//! let texts = vec!["We deliver within Abuja.".to_string()];
//! let result = provider.embed_texts(&texts).await?;
//! println!("{} embeddings of dimension {}", result.len(), result.dimension);
//! # Ok(())
//! # }
//! ```
//!
//! Models are cached globally, so constructing multiple providers with the
//! same configuration reuses a single loaded model. Normalization uses a
//! small epsilon so degenerate all-zero embeddings never divide by zero.

pub mod config;
pub mod error;
pub mod provider;
pub mod testing;

// Re-export main types for easy access
pub use config::EmbedConfig;
pub use error::{EmbedError, Result};
pub use provider::{
    EmbeddingProvider, EmbeddingResult, FastEmbedProvider, NORM_EPSILON, l2_normalize,
};
pub use testing::HashEmbedder;
