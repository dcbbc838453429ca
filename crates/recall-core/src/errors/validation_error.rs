/// Input validation errors. Always fatal to the call, never retried.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("length mismatch: {left} has {left_len} entries, {right} has {right_len}")]
    LengthMismatch {
        left: &'static str,
        left_len: usize,
        right: &'static str,
        right_len: usize,
    },

    #[error("cannot build an index over an empty corpus")]
    EmptyCorpus,

    #[error("invalid config: {reason}")]
    InvalidConfig { reason: String },
}
