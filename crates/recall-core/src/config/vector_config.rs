use serde::{Deserialize, Serialize};

use super::defaults;

/// What to do when a loaded snapshot's row length disagrees with the
/// configured dimension. Older row-array snapshots are the usual source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegacyDimensionPolicy {
    /// Take the dimension from the data and overwrite the configured one.
    Adopt,
    /// Reject the snapshot with a dimension mismatch.
    Strict,
}

impl Default for LegacyDimensionPolicy {
    fn default() -> Self {
        Self::Adopt
    }
}

/// Vector store configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorStoreConfig {
    /// Row dimension every stored and query vector must have.
    pub dimension: usize,
    /// Handling of snapshots whose dimension differs from `dimension`.
    pub legacy_dimension_policy: LegacyDimensionPolicy,
}

impl Default for VectorStoreConfig {
    fn default() -> Self {
        Self {
            dimension: defaults::DEFAULT_EMBEDDING_DIMENSIONS,
            legacy_dimension_policy: LegacyDimensionPolicy::default(),
        }
    }
}
