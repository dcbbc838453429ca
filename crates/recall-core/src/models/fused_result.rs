use serde::{Deserialize, Serialize};

use super::Metadata;
use crate::constants::{CHUNK_INDEX_KEY, PARENT_ID_KEY};

/// A candidate after rank fusion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FusedResult {
    pub id: String,
    /// Fused score (higher = more relevant). For short-circuited fusion this
    /// is the source retriever's native score.
    pub score: f64,
    pub vector_rank: Option<usize>,
    pub vector_score: Option<f32>,
    pub bm25_rank: Option<usize>,
    pub bm25_score: Option<f32>,
    #[serde(default)]
    pub metadata: Metadata,
    pub text: String,
}

impl FusedResult {
    /// Parent document id from metadata, if this is a chunk.
    pub fn parent_id(&self) -> Option<&str> {
        self.metadata.get(PARENT_ID_KEY).and_then(|v| v.as_str())
    }

    /// Position of this chunk within its parent, if recorded.
    pub fn chunk_index(&self) -> Option<u64> {
        self.metadata.get(CHUNK_INDEX_KEY).and_then(|v| v.as_u64())
    }

    /// Where this result came from: "vector", "bm25", or "hybrid".
    pub fn source(&self) -> &'static str {
        match (self.vector_rank.is_some(), self.bm25_rank.is_some()) {
            (true, true) => "hybrid",
            (true, false) => "vector",
            (false, true) => "bm25",
            (false, false) => "unknown",
        }
    }
}
