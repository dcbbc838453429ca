//! # recall-embeddings
//!
//! Turns a list of texts into a list of vectors with as few executor
//! invocations as possible.
//!
//! ## Architecture
//!
//! ```text
//! EmbeddingPipeline
//! ├── text normalization + cache keys (recall-core)
//! ├── EmbeddingCache (bounded, insertion-order eviction)
//! ├── batching (fixed-size or token-budgeted)
//! └── BatchCoordinator
//!     ├── timeout per attempt
//!     ├── restart + retry on timeout / unavailable
//!     └── IEmbeddingExecutor
//!         ├── InProcessExecutor
//!         └── ChannelExecutor (tokio worker, correlation ids)
//! ```

pub mod batching;
pub mod cache;
pub mod coordinator;
pub mod engine;
pub mod executor;
pub mod providers;
pub mod stats;

pub use cache::EmbeddingCache;
pub use coordinator::BatchCoordinator;
pub use engine::{EmbedOptions, EmbeddingPipeline};
pub use executor::{CancellationFlag, ChannelExecutor, IEmbeddingExecutor, InProcessExecutor};
pub use providers::HashingEmbedder;
pub use stats::EmbeddingStats;
