//! Query-time retrieval over a loaded index.

use crate::error::{Result, RetrieverError};
use crate::retrieval::store::IndexStore;
use crate::retrieval::vector_index::VectorIndex;
use grounded_context::Chunk;
use grounded_embed::EmbeddingProvider;
use serde::Serialize;
use std::sync::Arc;

/// One retrieved neighbor for a query. Ephemeral: produced per query,
/// never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RetrievalResult {
    /// Positional chunk id, e.g. `chunk_3`.
    pub id: String,
    /// The chunk text.
    pub text: String,
    /// Cosine-like similarity in `[-1, 1]`.
    pub score: f32,
    /// Position in the returned order, 0-based.
    pub rank: usize,
}

/// Render a chunk position as its opaque id.
pub fn chunk_id(position: usize) -> String {
    format!("chunk_{position}")
}

/// Read-only retrieval facade over an index, its parallel chunk sequence,
/// and the embedding collaborator.
///
/// Constructed once at service start and shared across requests; nothing
/// here mutates after construction, so concurrent reads need no locking.
pub struct Retriever {
    index: VectorIndex,
    chunks: Vec<Chunk>,
    provider: Arc<dyn EmbeddingProvider>,
}

impl Retriever {
    /// Assemble a retriever from an already-built index and chunk sequence.
    pub fn new(
        index: VectorIndex,
        chunks: Vec<Chunk>,
        provider: Arc<dyn EmbeddingProvider>,
    ) -> Result<Self> {
        if index.len() != chunks.len() {
            return Err(RetrieverError::corrupt(format!(
                "index holds {} vectors but chunk sequence holds {}",
                index.len(),
                chunks.len()
            )));
        }
        Ok(Self {
            index,
            chunks,
            provider,
        })
    }

    /// Load a persisted snapshot and wrap it. Fails fast when artifacts
    /// are missing or inconsistent.
    pub fn from_store(store: &IndexStore, provider: Arc<dyn EmbeddingProvider>) -> Result<Self> {
        let (index, chunks) = store.load()?;
        Self::new(index, chunks, provider)
    }

    /// Number of chunks behind this retriever.
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Embed `question` and return the top `k` chunks with the best score.
    ///
    /// An empty (after trimming) question short-circuits to an empty result
    /// with score 0.0 without calling the embedding collaborator. The best
    /// score is the rank-0 score, or 0.0 when nothing was retrieved.
    pub async fn retrieve(
        &self,
        question: &str,
        k: usize,
    ) -> Result<(Vec<RetrievalResult>, f32)> {
        let question = question.trim();
        if question.is_empty() {
            return Ok((Vec::new(), 0.0));
        }

        let embedding = self.provider.embed_text(question).await?;
        let hits = self.index.search(&embedding, k)?;

        let results: Vec<RetrievalResult> = hits
            .into_iter()
            .enumerate()
            .map(|(rank, (position, score))| RetrievalResult {
                id: chunk_id(position),
                text: self.chunks[position].text.clone(),
                score,
                rank,
            })
            .collect();

        let best_score = results.first().map(|r| r.score).unwrap_or(0.0);
        tracing::debug!(
            "Retrieved {} chunks for question, best score {:.4}",
            results.len(),
            best_score
        );
        Ok((results, best_score))
    }
}
