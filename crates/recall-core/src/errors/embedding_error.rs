/// Embedding pipeline and executor errors.
#[derive(Debug, thiserror::Error)]
pub enum EmbeddingError {
    #[error("batch {correlation_id} timed out after {timeout_ms}ms")]
    Timeout {
        correlation_id: String,
        timeout_ms: u64,
    },

    #[error("executor unavailable: {executor}")]
    ExecutorUnavailable { executor: String },

    #[error("executor failed: {reason}")]
    ExecutorFailed { reason: String },

    #[error("executor returned {actual} vectors for {expected} texts")]
    ResultCountMismatch { expected: usize, actual: usize },

    #[error("batch failed after {attempts} attempts: {reason}")]
    RetriesExhausted { attempts: u32, reason: String },

    #[error("embedding cancelled after {completed_batches} of {total_batches} batches")]
    Cancelled {
        completed_batches: usize,
        total_batches: usize,
    },
}
