//! One-shot batch index building.
//!
//! Building is an offline/startup operation: clean and chunk the knowledge
//! text, embed every chunk, and assemble the flat index. There is no
//! incremental update path; adding knowledge means rebuilding and replacing
//! the snapshot wholesale.

use crate::error::{Result, RetrieverError};
use crate::retrieval::store::IndexStore;
use crate::retrieval::vector_index::VectorIndex;
use grounded_context::{Chunk, ChunkingStrategy};
use grounded_embed::EmbeddingProvider;

/// Builds a [`VectorIndex`] and its parallel chunk sequence from raw
/// knowledge text.
#[derive(Debug, Clone, Default)]
pub struct IndexBuilder {
    strategy: ChunkingStrategy,
}

impl IndexBuilder {
    /// Create a builder with the given chunking strategy.
    pub fn new(strategy: ChunkingStrategy) -> Self {
        Self { strategy }
    }

    /// Chunk and embed `raw_text` into an index.
    ///
    /// Fails with [`RetrieverError::KnowledgeBaseEmpty`] when chunking
    /// yields nothing; this is fatal to index building, not a per-request
    /// condition.
    pub async fn build(
        &self,
        provider: &dyn EmbeddingProvider,
        raw_text: &str,
    ) -> Result<(VectorIndex, Vec<Chunk>)> {
        let chunks = self.strategy.chunks(raw_text);
        if chunks.is_empty() {
            return Err(RetrieverError::KnowledgeBaseEmpty);
        }
        tracing::info!("Created {} chunks from knowledge text", chunks.len());

        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let result = provider.embed_texts(&texts).await?;
        if result.len() != chunks.len() {
            return Err(RetrieverError::corrupt(format!(
                "embedding collaborator returned {} vectors for {} chunks",
                result.len(),
                chunks.len()
            )));
        }

        let index = VectorIndex::from_embeddings(&result.embeddings)?;
        tracing::info!(
            "Built index: {} vectors of dimension {}",
            index.len(),
            index.dimension()
        );
        Ok((index, chunks))
    }

    /// Build and persist a snapshot in one step.
    pub async fn build_and_save(
        &self,
        provider: &dyn EmbeddingProvider,
        raw_text: &str,
        store: &IndexStore,
    ) -> Result<(VectorIndex, Vec<Chunk>)> {
        let (index, chunks) = self.build(provider, raw_text).await?;
        store.save(&index, &chunks)?;
        Ok((index, chunks))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grounded_embed::HashEmbedder;

    #[tokio::test]
    async fn empty_knowledge_base_is_fatal() {
        let builder = IndexBuilder::default();
        let err = builder
            .build(&HashEmbedder::default(), "   \n\n  ")
            .await
            .unwrap_err();
        assert!(matches!(err, RetrieverError::KnowledgeBaseEmpty));
    }

    #[tokio::test]
    async fn build_produces_parallel_index_and_chunks() {
        let builder = IndexBuilder::default();
        let text = "We are a small restaurant in Abuja.\n\nWe deliver within Abuja only, via our own dispatch riders.";
        let (index, chunks) = builder
            .build(&HashEmbedder::default(), text)
            .await
            .unwrap();
        assert_eq!(index.len(), chunks.len());
        assert_eq!(index.dimension(), 64);
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.sequence, i);
        }
    }

    #[tokio::test]
    async fn build_is_deterministic() {
        let builder = IndexBuilder::default();
        let embedder = HashEmbedder::default();
        let text = "MENU\n- Jollof rice\n- Fried rice\n\nOPENING HOURS\n- Mon-Sun: 9am-9pm";
        let (index_a, chunks_a) = builder.build(&embedder, text).await.unwrap();
        let (index_b, chunks_b) = builder.build(&embedder, text).await.unwrap();
        assert_eq!(index_a, index_b);
        assert_eq!(chunks_a, chunks_b);
    }
}
