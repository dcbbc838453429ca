//! # recall-retrieval
//!
//! Query-time half of the hybrid retrieval engine.
//!
//! ```text
//! query ─┬─ embed ─ vector search ─┐
//!        └──────── BM25 search ─────┴─ fuse ─ group_by_parent ─ assemble_context
//! ```
//!
//! [`HybridRetriever`] wires the pieces together; each stage is also usable
//! on its own.

pub mod context;
pub mod corpus;
pub mod engine;
pub mod fusion;
pub mod grouping;
pub mod parent_lookup;

pub use context::{assemble_context, AssembledContext, ContextAssembler, ContextOptions};
pub use corpus::CorpusSnapshot;
pub use engine::{HybridRetriever, IndexReport, QueryOptions, RetrievalOutcome};
pub use fusion::{fuse, FusionOptions};
pub use grouping::group_by_parent;
pub use parent_lookup::CachedParentLookup;
