use serde::{Deserialize, Serialize};

use super::{FusedResult, Metadata};

/// Chunk hits aggregated under their parent document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParentGroup {
    pub parent_id: String,
    /// Retained chunks in reading order.
    pub chunks: Vec<FusedResult>,
    pub max_score: f64,
    pub avg_score: f64,
    /// Full parent text, or the retained chunks joined when the parent
    /// could not be resolved.
    pub text: String,
    pub metadata: Metadata,
    /// Whether `text`/`metadata` came from the parent lookup.
    pub resolved: bool,
}
