//! Wholesale snapshot persistence for the index and its chunk manifest.
//!
//! Two co-located artifacts are written together and loaded together:
//!
//! - `vectors.bin`: a small header (dimension and count as little-endian
//!   u32) followed by the flat f32 vector payload.
//! - `chunks.json`: the parallel chunk-text manifest,
//!   `{"chunks": ["...", ...]}`, order = positional id.
//!
//! Loading requires both artifacts to exist and agree on count. A missing
//! artifact is [`RetrieverError::IndexNotBuilt`]; artifacts that disagree
//! are [`RetrieverError::CorruptIndex`]. Both are fatal startup conditions:
//! the service must not accept traffic without a consistent index.

use crate::error::{Result, RetrieverError};
use crate::retrieval::vector_index::VectorIndex;
use grounded_context::Chunk;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// File name of the vector payload inside the index directory.
pub const VECTORS_FILE: &str = "vectors.bin";
/// File name of the chunk-text manifest inside the index directory.
pub const CHUNKS_FILE: &str = "chunks.json";

const HEADER_LEN: usize = 8;

#[derive(Debug, Serialize, Deserialize)]
struct ChunkManifest {
    chunks: Vec<String>,
}

/// Handle to an on-disk index snapshot directory.
#[derive(Debug, Clone)]
pub struct IndexStore {
    dir: PathBuf,
}

impl IndexStore {
    /// Create a store rooted at `dir`. The directory is created on save,
    /// not here.
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory this store reads and writes.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the vector payload artifact.
    pub fn vectors_path(&self) -> PathBuf {
        self.dir.join(VECTORS_FILE)
    }

    /// Path of the chunk manifest artifact.
    pub fn chunks_path(&self) -> PathBuf {
        self.dir.join(CHUNKS_FILE)
    }

    /// Returns `true` when both artifacts are present.
    pub fn exists(&self) -> bool {
        self.vectors_path().exists() && self.chunks_path().exists()
    }

    /// Persist the index and its parallel chunk sequence as one snapshot.
    pub fn save(&self, index: &VectorIndex, chunks: &[Chunk]) -> Result<()> {
        if index.len() != chunks.len() {
            return Err(RetrieverError::corrupt(format!(
                "refusing to save inconsistent snapshot: {} vectors, {} chunks",
                index.len(),
                chunks.len()
            )));
        }

        fs::create_dir_all(&self.dir)?;

        let flat = index.as_flat();
        let mut payload = Vec::with_capacity(HEADER_LEN + flat.len() * 4);
        payload.extend_from_slice(&(index.dimension() as u32).to_le_bytes());
        payload.extend_from_slice(&(index.len() as u32).to_le_bytes());
        payload.extend_from_slice(bytemuck::cast_slice(flat));
        fs::write(self.vectors_path(), payload)?;

        let manifest = ChunkManifest {
            chunks: chunks.iter().map(|c| c.text.clone()).collect(),
        };
        fs::write(self.chunks_path(), serde_json::to_string_pretty(&manifest)?)?;

        tracing::info!(
            "Saved index snapshot: {} vectors of dimension {} in {}",
            index.len(),
            index.dimension(),
            self.dir.display()
        );
        Ok(())
    }

    /// Load a snapshot, validating that the two artifacts are mutually
    /// consistent.
    pub fn load(&self) -> Result<(VectorIndex, Vec<Chunk>)> {
        if !self.exists() {
            return Err(RetrieverError::IndexNotBuilt {
                dir: self.dir.clone(),
            });
        }

        let raw = fs::read(self.vectors_path())?;
        if raw.len() < HEADER_LEN {
            return Err(RetrieverError::corrupt("vector payload shorter than header"));
        }
        let dimension = u32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]) as usize;
        let count = u32::from_le_bytes([raw[4], raw[5], raw[6], raw[7]]) as usize;

        let body = &raw[HEADER_LEN..];
        if body.len() != dimension * count * 4 {
            return Err(RetrieverError::corrupt(format!(
                "vector payload holds {} bytes, expected {} for {}x{} f32",
                body.len(),
                dimension * count * 4,
                count,
                dimension
            )));
        }
        // pod_collect_to_vec copies, so alignment of the file buffer does
        // not matter.
        let flat: Vec<f32> = bytemuck::pod_collect_to_vec(body);
        let index = VectorIndex::from_flat(dimension, flat)?;

        let manifest: ChunkManifest = serde_json::from_str(&fs::read_to_string(self.chunks_path())?)?;
        if manifest.chunks.len() != count {
            return Err(RetrieverError::corrupt(format!(
                "manifest holds {} chunks but index holds {} vectors",
                manifest.chunks.len(),
                count
            )));
        }

        let chunks = manifest
            .chunks
            .into_iter()
            .enumerate()
            .map(|(sequence, text)| Chunk { sequence, text })
            .collect();

        tracing::info!(
            "Loaded index snapshot: {} vectors of dimension {} from {}",
            count,
            dimension,
            self.dir.display()
        );
        Ok((index, chunks))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grounded_embed::l2_normalize;

    fn fixture() -> (VectorIndex, Vec<Chunk>) {
        let mut a = vec![1.0, 2.0, 3.0];
        let mut b = vec![-1.0, 0.5, 0.25];
        l2_normalize(&mut a);
        l2_normalize(&mut b);
        let index = VectorIndex::from_embeddings(&[a, b]).unwrap();
        let chunks = vec![
            Chunk {
                sequence: 0,
                text: "We deliver within Abuja only.".to_string(),
            },
            Chunk {
                sequence: 1,
                text: "OPENING HOURS\n- Mon-Sun: 9am-9pm".to_string(),
            },
        ];
        (index, chunks)
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = IndexStore::new(dir.path());
        let (index, chunks) = fixture();

        store.save(&index, &chunks).unwrap();
        assert!(store.exists());

        let (loaded_index, loaded_chunks) = store.load().unwrap();
        assert_eq!(loaded_index, index);
        assert_eq!(loaded_chunks, chunks);
    }

    #[test]
    fn load_without_artifacts_is_index_not_built() {
        let dir = tempfile::tempdir().unwrap();
        let store = IndexStore::new(dir.path().join("nope"));
        let err = store.load().unwrap_err();
        assert!(matches!(err, RetrieverError::IndexNotBuilt { .. }));
    }

    #[test]
    fn load_with_one_artifact_missing_is_index_not_built() {
        let dir = tempfile::tempdir().unwrap();
        let store = IndexStore::new(dir.path());
        let (index, chunks) = fixture();
        store.save(&index, &chunks).unwrap();

        fs::remove_file(store.chunks_path()).unwrap();
        let err = store.load().unwrap_err();
        assert!(matches!(err, RetrieverError::IndexNotBuilt { .. }));
    }

    #[test]
    fn mismatched_manifest_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let store = IndexStore::new(dir.path());
        let (index, chunks) = fixture();
        store.save(&index, &chunks).unwrap();

        fs::write(store.chunks_path(), r#"{"chunks": ["only one"]}"#).unwrap();
        let err = store.load().unwrap_err();
        assert!(matches!(err, RetrieverError::CorruptIndex { .. }));
    }

    #[test]
    fn inconsistent_snapshot_is_refused_at_save() {
        let dir = tempfile::tempdir().unwrap();
        let store = IndexStore::new(dir.path());
        let (index, mut chunks) = fixture();
        chunks.pop();
        assert!(store.save(&index, &chunks).is_err());
    }
}
