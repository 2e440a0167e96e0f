//! Flat inner-product vector index.
//!
//! Vectors are stored densely in chunk order, so a vector's position in the
//! index is the positional id of the chunk it embeds. Search is an exact
//! scan ranked by inner product; since every stored vector and every query
//! vector is L2-normalized upstream, inner product equals cosine similarity
//! and scores land in `[-1, 1]`.
//!
//! The index is built once from a chunk sequence and never mutated in
//! place. Rebuilding means replacing it wholesale, which keeps concurrent
//! reads lock-free.

use crate::error::{Result, RetrieverError};

/// Sentinel position for unfilled result slots during top-k selection.
/// Filtered out before results are returned; callers never see it.
const NO_MATCH: i64 = -1;

/// An ordered, read-only collection of unit-norm embedding vectors.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorIndex {
    dimension: usize,
    // Row-major: vector i occupies [i * dimension, (i + 1) * dimension).
    vectors: Vec<f32>,
}

impl VectorIndex {
    /// Build an index from per-chunk embeddings, in chunk order.
    ///
    /// Fails with [`RetrieverError::KnowledgeBaseEmpty`] when there are no
    /// embeddings and [`RetrieverError::DimensionMismatch`] when the rows
    /// disagree on dimension.
    pub fn from_embeddings(embeddings: &[Vec<f32>]) -> Result<Self> {
        let dimension = embeddings
            .first()
            .map(|e| e.len())
            .ok_or(RetrieverError::KnowledgeBaseEmpty)?;

        let mut vectors = Vec::with_capacity(embeddings.len() * dimension);
        for embedding in embeddings {
            if embedding.len() != dimension {
                return Err(RetrieverError::DimensionMismatch {
                    expected: dimension,
                    actual: embedding.len(),
                });
            }
            vectors.extend_from_slice(embedding);
        }

        Ok(Self { dimension, vectors })
    }

    /// Reassemble an index from its persisted flat representation.
    pub fn from_flat(dimension: usize, vectors: Vec<f32>) -> Result<Self> {
        if dimension == 0 || vectors.len() % dimension != 0 {
            return Err(RetrieverError::corrupt(format!(
                "flat vector payload of {} floats is not a multiple of dimension {}",
                vectors.len(),
                dimension
            )));
        }
        Ok(Self { dimension, vectors })
    }

    /// Number of vectors in the index.
    pub fn len(&self) -> usize {
        self.vectors.len() / self.dimension
    }

    /// Returns `true` if the index holds no vectors.
    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Dimension of the stored vectors.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// The flat row-major vector payload, for persistence.
    pub fn as_flat(&self) -> &[f32] {
        &self.vectors
    }

    fn row(&self, position: usize) -> &[f32] {
        &self.vectors[position * self.dimension..(position + 1) * self.dimension]
    }

    /// Return up to `k` `(position, score)` neighbors of `query`, ranked by
    /// descending inner product. Ties keep index build order (stable).
    /// Fewer than `k` pairs are returned when the index holds fewer vectors.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<(usize, f32)>> {
        if query.len() != self.dimension {
            return Err(RetrieverError::DimensionMismatch {
                expected: self.dimension,
                actual: query.len(),
            });
        }
        if k == 0 {
            return Ok(Vec::new());
        }

        // Fixed-size selection buffer seeded with sentinel slots. Strict
        // comparisons keep equal-scored candidates in build order.
        let mut top: Vec<(i64, f32)> = vec![(NO_MATCH, f32::NEG_INFINITY); k];

        for position in 0..self.len() {
            let score = dot(query, self.row(position));
            let worst = top[k - 1].1;
            if score > worst {
                top[k - 1] = (position as i64, score);
                let mut slot = k - 1;
                while slot > 0 && top[slot].1 > top[slot - 1].1 {
                    top.swap(slot, slot - 1);
                    slot -= 1;
                }
            }
        }

        // Unfilled sentinel slots must never surface to callers.
        Ok(top
            .into_iter()
            .filter(|(position, _)| *position != NO_MATCH)
            .map(|(position, score)| (position as usize, score))
            .collect())
    }
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}
