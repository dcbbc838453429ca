//! Drives one batch at a time through an executor.
//!
//! Each attempt gets a fresh correlation id and its own deadline. Timeouts
//! and unavailability restart the executor and retry the same batch until
//! `max_attempts` is used up; any other failure aborts immediately.

use std::sync::Arc;
use std::time::Duration;

use recall_core::config::EmbeddingConfig;
use recall_core::errors::{EmbeddingError, RecallResult, ValidationError};
use recall_core::models::EmbedParams;
use recall_observability::tracing_setup::events;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::executor::{BatchRequest, CancellationFlag, ExecutorFailure, IEmbeddingExecutor};
use crate::stats::StatsCounters;

/// Where a batch sits within the current `embed` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchPosition {
    pub index: usize,
    pub total: usize,
}

/// Submits batches, enforces deadlines, and restarts the executor on
/// retryable failures.
pub struct BatchCoordinator {
    executor: Box<dyn IEmbeddingExecutor>,
    timeout: Duration,
    max_attempts: u32,
    params: EmbedParams,
    dimensions: usize,
    stats: Arc<StatsCounters>,
}

impl BatchCoordinator {
    pub(crate) fn new(
        executor: Box<dyn IEmbeddingExecutor>,
        config: &EmbeddingConfig,
        stats: Arc<StatsCounters>,
    ) -> Self {
        Self {
            executor,
            timeout: Duration::from_millis(config.batch_timeout_ms),
            max_attempts: config.max_attempts.max(1),
            params: EmbedParams::from(config),
            dimensions: config.dimensions,
            stats,
        }
    }

    pub fn executor_name(&self) -> &str {
        self.executor.name()
    }

    /// Embed one batch of prepared texts, retrying as configured.
    ///
    /// On success the result has exactly one vector per text, each of the
    /// configured dimension.
    pub async fn run_batch(
        &self,
        texts: &[String],
        position: BatchPosition,
        cancel: &CancellationFlag,
    ) -> RecallResult<Vec<Vec<f32>>> {
        let mut last_reason = String::new();

        for attempt in 1..=self.max_attempts {
            let correlation_id = Uuid::new_v4();
            StatsCounters::bump(&self.stats.executor_requests, 1);
            debug!(
                %correlation_id,
                batch = position.index,
                of = position.total,
                size = texts.len(),
                attempt,
                "dispatching batch"
            );

            let ticket = self.executor.submit(BatchRequest {
                correlation_id,
                texts: texts.to_vec(),
                params: self.params.clone(),
                cancel: cancel.clone(),
            });

            let failure = match ticket.wait(self.timeout).await {
                Ok(vectors) => return self.validate(texts.len(), vectors),
                Err(failure) => failure,
            };

            match failure {
                ExecutorFailure::Cancelled => {
                    return Err(EmbeddingError::Cancelled {
                        completed_batches: position.index,
                        total_batches: position.total,
                    }
                    .into());
                }
                ExecutorFailure::Failed(reason) => {
                    warn!(%correlation_id, %reason, "batch failed, not retrying");
                    return Err(EmbeddingError::ExecutorFailed { reason }.into());
                }
                retryable => {
                    last_reason = match retryable {
                        ExecutorFailure::Timeout => EmbeddingError::Timeout {
                            correlation_id: correlation_id.to_string(),
                            timeout_ms: self.timeout.as_millis() as u64,
                        }
                        .to_string(),
                        other => other.to_string(),
                    };
                    warn!(%correlation_id, attempt, reason = %last_reason, "batch attempt failed");

                    // Restart even after the last attempt so the next call
                    // starts from a healthy executor.
                    let restarted = self.restart(&correlation_id, &last_reason);
                    if attempt < self.max_attempts {
                        restarted?;
                        StatsCounters::bump(&self.stats.retries, 1);
                    }
                }
            }
        }

        Err(EmbeddingError::RetriesExhausted {
            attempts: self.max_attempts,
            reason: last_reason,
        }
        .into())
    }

    fn restart(&self, correlation_id: &Uuid, reason: &str) -> RecallResult<()> {
        StatsCounters::bump(&self.stats.restarts, 1);
        match self.executor.restart() {
            Ok(()) => {
                events::executor_restarted(
                    self.executor.name(),
                    &correlation_id.to_string(),
                    reason,
                );
                Ok(())
            }
            Err(e) => {
                warn!(executor = %self.executor.name(), error = %e, "executor restart failed");
                Err(e)
            }
        }
    }

    fn validate(&self, expected: usize, vectors: Vec<Vec<f32>>) -> RecallResult<Vec<Vec<f32>>> {
        if vectors.len() != expected {
            return Err(EmbeddingError::ResultCountMismatch {
                expected,
                actual: vectors.len(),
            }
            .into());
        }
        if let Some(bad) = vectors.iter().find(|v| v.len() != self.dimensions) {
            return Err(ValidationError::DimensionMismatch {
                expected: self.dimensions,
                actual: bad.len(),
            }
            .into());
        }
        Ok(vectors)
    }
}
