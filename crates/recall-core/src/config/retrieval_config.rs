use serde::{Deserialize, Serialize};

use super::defaults;

/// Retrieval, fusion, grouping, and context assembly configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Weight of the vector list in rank fusion (BM25 gets `1 - w`).
    pub vector_weight: f64,
    /// RRF k-value for rank fusion.
    pub rrf_k: u32,
    /// Final number of results (or parent groups) returned.
    pub top_k: usize,
    /// Candidate pool fetched from each retriever before fusion.
    pub retrieval_k: usize,
    /// Chunks kept per parent when grouping.
    pub max_chunks_per_parent: usize,
    /// Minimum cosine similarity for vector candidates.
    pub similarity_threshold: f32,
    /// Default token budget for assembled context.
    pub token_budget: usize,
    /// Group chunk hits under their parent document.
    pub group_by_parent: bool,
    /// Metadata fields rendered into the assembled context.
    pub context_metadata_fields: Vec<String>,
    /// Share of the remaining budget above which a chunk gets split.
    pub split_threshold: f64,
    /// Overlap between split pieces, as a share of the piece size.
    pub split_overlap: f64,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            vector_weight: defaults::DEFAULT_VECTOR_WEIGHT,
            rrf_k: defaults::DEFAULT_RRF_K,
            top_k: defaults::DEFAULT_TOP_K,
            retrieval_k: defaults::DEFAULT_RETRIEVAL_K,
            max_chunks_per_parent: defaults::DEFAULT_MAX_CHUNKS_PER_PARENT,
            similarity_threshold: defaults::DEFAULT_SIMILARITY_THRESHOLD,
            token_budget: defaults::DEFAULT_TOKEN_BUDGET,
            group_by_parent: defaults::DEFAULT_GROUP_BY_PARENT,
            context_metadata_fields: Vec::new(),
            split_threshold: defaults::DEFAULT_SPLIT_THRESHOLD,
            split_overlap: defaults::DEFAULT_SPLIT_OVERLAP,
        }
    }
}
