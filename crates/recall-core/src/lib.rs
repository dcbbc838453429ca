//! # recall-core
//!
//! Foundation crate for the Recall hybrid retrieval engine.
//! Defines shared types, traits, errors, config, and text normalization.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod text;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::RecallConfig;
pub use errors::{RecallError, RecallResult};
pub use models::{Document, Metadata, RetrievalMode, SearchHit};
