//! # recall-observability
//!
//! Structured tracing for the retrieval engine: subscriber setup, span
//! macros per operation, and named log events.

pub mod tracing_setup;

pub use tracing_setup::{init_tracing, init_tracing_with_filter};
