//! Deterministic embedding provider for tests.
//!
//! Downloading a real ONNX model inside unit tests is slow and flaky, so
//! downstream crates test retrieval behavior against [`HashEmbedder`]: a
//! feature-hashing embedder that maps word tokens and character trigrams
//! into a fixed number of signed buckets, then L2-normalizes. It is fully
//! deterministic, requires no model files, and gives texts that share
//! vocabulary a higher cosine similarity than unrelated texts, enough
//! structure to exercise ranking, thresholds, and persistence.

use crate::error::Result;
use crate::provider::{EmbeddingProvider, EmbeddingResult, l2_normalize};
use async_trait::async_trait;
use fnv::FnvHasher;
use std::hash::Hasher;

/// Feature-hashing embedding provider with a fixed dimension.
#[derive(Debug, Clone)]
pub struct HashEmbedder {
    dimension: usize,
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self::new(64)
    }
}

impl HashEmbedder {
    /// Create an embedder producing vectors of the given dimension.
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(2),
        }
    }

    fn bucket(&self, feature: &[u8]) -> (usize, f32) {
        let mut hasher = FnvHasher::default();
        hasher.write(feature);
        let hash = hasher.finish();
        let index = (hash % self.dimension as u64) as usize;
        // One hash bit decides the sign, which keeps unrelated features
        // from accumulating into a uniformly positive vector.
        let sign = if hash & (1 << 63) == 0 { 1.0 } else { -1.0 };
        (index, sign)
    }

    fn embed_one(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimension];
        let lowered = text.to_lowercase();

        for token in lowered.split_whitespace() {
            let token: String = token.chars().filter(|c| c.is_alphanumeric()).collect();
            if token.is_empty() {
                continue;
            }

            let (index, sign) = self.bucket(token.as_bytes());
            vector[index] += sign;

            let chars: Vec<char> = token.chars().collect();
            for trigram in chars.windows(3) {
                let feature: String = trigram.iter().collect();
                let (index, sign) = self.bucket(feature.as_bytes());
                vector[index] += 0.5 * sign;
            }
        }

        l2_normalize(&mut vector);
        vector
    }
}

#[async_trait]
impl EmbeddingProvider for HashEmbedder {
    async fn embed_text(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.embed_one(text))
    }

    async fn embed_texts(&self, texts: &[String]) -> Result<EmbeddingResult> {
        let embeddings = texts.iter().map(|t| self.embed_one(t)).collect();
        Ok(EmbeddingResult::new(embeddings))
    }

    fn embedding_dimension(&self) -> usize {
        self.dimension
    }

    fn provider_name(&self) -> &str {
        "hash-embedder"
    }
}
