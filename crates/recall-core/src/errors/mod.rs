mod config_error;
mod embedding_error;
mod snapshot_error;
mod validation_error;

pub use config_error::ConfigError;
pub use embedding_error::EmbeddingError;
pub use snapshot_error::SnapshotError;
pub use validation_error::ValidationError;

/// Workspace-wide error type. Each subsystem contributes its own enum.
#[derive(Debug, thiserror::Error)]
pub enum RecallError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Embedding(#[from] EmbeddingError),

    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl RecallError {
    /// Whether a batch attempt that failed with this error may be retried
    /// after restarting the executor.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            RecallError::Embedding(
                EmbeddingError::Timeout { .. } | EmbeddingError::ExecutorUnavailable { .. }
            )
        )
    }
}

pub type RecallResult<T> = Result<T, RecallError>;
