use serde::{Deserialize, Serialize};

use super::Metadata;

/// One entry of a single retriever's ranked list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: String,
    /// Retriever-native score (cosine or BM25).
    pub score: f32,
    /// 0-based position in the retriever's list.
    pub rank: usize,
    pub text: String,
    #[serde(default)]
    pub metadata: Metadata,
}
