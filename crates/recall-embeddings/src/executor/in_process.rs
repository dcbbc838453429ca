//! Inline executor: the model runs on the caller's thread during `submit`.

use std::sync::Arc;

use recall_core::errors::RecallResult;
use recall_core::traits::IEmbeddingModel;

use super::{BatchRequest, BatchTicket, ExecutorFailure, IEmbeddingExecutor};

/// Runs the model synchronously and returns an already-answered ticket.
pub struct InProcessExecutor {
    model: Arc<dyn IEmbeddingModel>,
}

impl InProcessExecutor {
    pub fn new(model: Arc<dyn IEmbeddingModel>) -> Self {
        Self { model }
    }
}

impl IEmbeddingExecutor for InProcessExecutor {
    fn submit(&self, request: BatchRequest) -> BatchTicket {
        if request.cancel.is_cancelled() {
            return BatchTicket::ready(request.correlation_id, Err(ExecutorFailure::Cancelled));
        }
        let reply = self
            .model
            .embed_batch(&request.texts, &request.params)
            .map_err(|e| {
                if e.is_retryable() {
                    ExecutorFailure::Unavailable(e.to_string())
                } else {
                    ExecutorFailure::Failed(e.to_string())
                }
            });
        BatchTicket::ready(request.correlation_id, reply)
    }

    fn restart(&self) -> RecallResult<()> {
        // Nothing to tear down; the model is stateless between calls.
        Ok(())
    }

    fn dimensions(&self) -> usize {
        self.model.dimensions()
    }

    fn name(&self) -> &str {
        self.model.name()
    }
}
