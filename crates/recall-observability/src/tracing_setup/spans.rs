//! Span definitions per operation: embedding, indexing, retrieval.
//!
//! Each span carries its identifying fields via the `tracing` crate.

/// Create an embedding span.
#[macro_export]
macro_rules! embedding_span {
    ($executor:expr, $texts:expr) => {
        tracing::info_span!("recall.embedding", executor = %$executor, texts = $texts)
    };
}

/// Create an indexing span.
#[macro_export]
macro_rules! index_span {
    ($documents:expr) => {
        tracing::info_span!("recall.index", documents = $documents)
    };
}

/// Create a retrieval span.
#[macro_export]
macro_rules! retrieval_span {
    ($query:expr, $vector_weight:expr) => {
        tracing::info_span!("recall.retrieval", query = %$query, vector_weight = $vector_weight)
    };
}

/// Span names as constants for programmatic use.
pub mod names {
    pub const EMBEDDING: &str = "recall.embedding";
    pub const INDEX: &str = "recall.index";
    pub const RETRIEVAL: &str = "recall.retrieval";
}
