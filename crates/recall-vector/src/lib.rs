//! # recall-vector
//!
//! Exact cosine search over a row-major `f32` matrix.
//!
//! The store holds an immutable [`VectorSnapshot`] behind
//! `RwLock<Arc<_>>`. Builds and snapshot loads assemble a complete new
//! snapshot off-lock and swap it in; a failed build leaves the previous
//! one serving queries.

pub mod index;
pub mod persistence;
pub mod similarity;
pub mod snapshot;
pub mod store;
pub mod types;

pub use index::IVectorIndex;
pub use similarity::cosine_similarity;
pub use snapshot::VectorSnapshot;
pub use store::VectorStore;
pub use types::{SearchOptions, StoredDocument, VectorMatch, VectorStoreStats};
