pub mod gate;
pub mod indexer;
pub mod retriever;
pub mod store;
pub mod vector_index;

pub use gate::{ConfidenceGate, GateOutcome, GateRefusal};
pub use indexer::IndexBuilder;
pub use retriever::{RetrievalResult, Retriever, chunk_id};
pub use store::IndexStore;
pub use vector_index::VectorIndex;
