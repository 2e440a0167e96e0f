//! grounded-retriever: Evidence retrieval over a fixed knowledge base
//!
//! This crate owns the middle of the Grounded pipeline: it builds a flat
//! inner-product index from a chunked knowledge document, persists and
//! loads it as a wholesale snapshot, answers top-k similarity queries, and
//! decides via the confidence gate whether retrieval produced enough
//! evidence to attempt an answer at all.
//!
//! ## Key Modules
//!
//! - **[`retrieval`]**: index building, snapshot persistence, query-time
//!   retrieval, and the confidence gate
//! - **[`error`]**: fatal startup conditions vs per-request failures
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use grounded_retriever::retrieval::{ConfidenceGate, GateOutcome, IndexStore, Retriever};
//! use grounded_embed::{EmbedConfig, FastEmbedProvider};
//! use std::sync::Arc;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let provider = Arc::new(FastEmbedProvider::create(EmbedConfig::minilm_l6()).await?);
//! let store = IndexStore::new(".grounded");
//! let retriever = Retriever::from_store(&store, provider)?;
//!
//! let (results, best_score) = retriever.retrieve("do you deliver?", 4).await?;
//! let gate = ConfidenceGate::new(0.28);
//! if let GateOutcome::Proceed = gate.decide(best_score, results.len()) {
//!     // hand the evidence to answer synthesis
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! KB text → Chunker → Embeddings → VectorIndex + chunks.json snapshot
//!                                        ↓
//! question → embed → search → ConfidenceGate → proceed / refuse
//! ```

pub mod error;
pub mod retrieval;

pub use error::{Result, RetrieverError};
