use serde::{Deserialize, Serialize};

use super::defaults;

/// How pending embedding items are grouped into executor batches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchingMode {
    /// Sort by normalized length, then slice into `batch_size` groups.
    FixedSize,
    /// Pack in input order until `tokens_per_batch` would be exceeded.
    TokenBudget,
}

/// Embedding subsystem configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Output vector dimensions produced by the executor.
    pub dimensions: usize,
    /// Items per batch in fixed-size mode.
    pub batch_size: usize,
    /// Max sequence length passed to the executor; also caps token estimates.
    pub max_length: usize,
    /// Estimated tokens per batch in token-budget mode.
    pub tokens_per_batch: Option<usize>,
    /// Batching strategy. `TokenBudget` requires `tokens_per_batch`.
    pub batching: BatchingMode,
    /// Max cached vectors before insertion-order eviction kicks in.
    pub cache_capacity: usize,
    /// Round-trip deadline for a single batch attempt (milliseconds).
    pub batch_timeout_ms: u64,
    /// Attempts per batch, including the first.
    pub max_attempts: u32,
    /// Pooling strategy forwarded to the executor ("mean", "cls").
    pub pooling: String,
    /// Ask the executor for L2-normalized output.
    pub normalize: bool,
    /// Prefix prepended to query-mode texts.
    pub query_prefix: String,
    /// Prefix prepended to passage-mode texts.
    pub passage_prefix: String,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            dimensions: defaults::DEFAULT_EMBEDDING_DIMENSIONS,
            batch_size: defaults::DEFAULT_EMBEDDING_BATCH_SIZE,
            max_length: defaults::DEFAULT_MAX_LENGTH,
            tokens_per_batch: None,
            batching: BatchingMode::FixedSize,
            cache_capacity: defaults::DEFAULT_CACHE_CAPACITY,
            batch_timeout_ms: defaults::DEFAULT_BATCH_TIMEOUT_MS,
            max_attempts: defaults::DEFAULT_MAX_ATTEMPTS,
            pooling: defaults::DEFAULT_POOLING.to_string(),
            normalize: defaults::DEFAULT_NORMALIZE,
            query_prefix: defaults::DEFAULT_QUERY_PREFIX.to_string(),
            passage_prefix: defaults::DEFAULT_PASSAGE_PREFIX.to_string(),
        }
    }
}
