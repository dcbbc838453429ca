//! Message-passing executor backed by a tokio worker task.
//!
//! Requests travel over a bounded mpsc channel as envelopes carrying the
//! correlation id and a oneshot reply sender. The worker runs the model on
//! the blocking pool, one batch at a time. Restarting aborts the worker and
//! spawns a fresh one with a newly built model; anything still queued is
//! dropped, which its waiting ticket observes as `Unavailable`.

use std::sync::{Arc, Mutex};

use recall_core::errors::{EmbeddingError, RecallResult};
use recall_core::traits::IEmbeddingModel;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::{BatchReply, BatchRequest, BatchTicket, ExecutorFailure, IEmbeddingExecutor};

/// Builds a fresh model each time the worker is (re)started.
pub type ModelFactory = Arc<dyn Fn() -> RecallResult<Arc<dyn IEmbeddingModel>> + Send + Sync>;

/// Queue depth between submitters and the worker. Batches are issued one at
/// a time, so this only needs headroom for abandoned requests.
const QUEUE_DEPTH: usize = 16;

struct Envelope {
    request: BatchRequest,
    reply: oneshot::Sender<BatchReply>,
}

struct Worker {
    sender: mpsc::Sender<Envelope>,
    task: JoinHandle<()>,
    generation: u64,
}

/// Executor that hands batches to a worker task by message passing.
///
/// Must be created inside a tokio runtime.
pub struct ChannelExecutor {
    name: String,
    dimensions: usize,
    factory: ModelFactory,
    worker: Mutex<Option<Worker>>,
}

impl ChannelExecutor {
    /// Start the worker with a model from `factory`.
    pub fn spawn(name: impl Into<String>, factory: ModelFactory) -> RecallResult<Self> {
        let model = factory()?;
        let dimensions = model.dimensions();
        let executor = Self {
            name: name.into(),
            dimensions,
            factory,
            worker: Mutex::new(None),
        };
        executor.install_worker(model, 0);
        info!(executor = %executor.name, dims = dimensions, "channel executor started");
        Ok(executor)
    }

    /// Generation counter of the live worker; bumps on every restart.
    pub fn generation(&self) -> u64 {
        self.lock_worker()
            .as_ref()
            .map(|w| w.generation)
            .unwrap_or(0)
    }

    fn install_worker(&self, model: Arc<dyn IEmbeddingModel>, generation: u64) {
        let (sender, receiver) = mpsc::channel(QUEUE_DEPTH);
        let task = tokio::spawn(run_worker(model, receiver));
        let mut slot = self.lock_worker();
        if let Some(old) = slot.take() {
            old.task.abort();
        }
        *slot = Some(Worker {
            sender,
            task,
            generation,
        });
    }

    fn lock_worker(&self) -> std::sync::MutexGuard<'_, Option<Worker>> {
        self.worker.lock().unwrap_or_else(|e| e.into_inner())
    }
}

async fn run_worker(model: Arc<dyn IEmbeddingModel>, mut receiver: mpsc::Receiver<Envelope>) {
    while let Some(Envelope { request, reply }) = receiver.recv().await {
        if request.cancel.is_cancelled() {
            debug!(correlation_id = %request.correlation_id, "skipping cancelled batch");
            let _ = reply.send(Err(ExecutorFailure::Cancelled));
            continue;
        }

        let model = Arc::clone(&model);
        let correlation_id = request.correlation_id;
        let outcome = tokio::task::spawn_blocking(move || {
            model.embed_batch(&request.texts, &request.params)
        })
        .await;

        let answer = match outcome {
            Ok(Ok(vectors)) => Ok(vectors),
            Ok(Err(e)) if e.is_retryable() => Err(ExecutorFailure::Unavailable(e.to_string())),
            Ok(Err(e)) => Err(ExecutorFailure::Failed(e.to_string())),
            Err(join) => Err(ExecutorFailure::Unavailable(format!("worker crashed: {join}"))),
        };

        // The submitter may have timed out and gone away.
        if reply.send(answer).is_err() {
            debug!(%correlation_id, "reply dropped, submitter no longer waiting");
        }
    }
}

impl IEmbeddingExecutor for ChannelExecutor {
    fn submit(&self, request: BatchRequest) -> BatchTicket {
        let (ticket, reply) = BatchTicket::pending(request.correlation_id);
        let sender = match self.lock_worker().as_ref() {
            Some(worker) => worker.sender.clone(),
            None => {
                let _ = reply.send(Err(ExecutorFailure::Unavailable(
                    "no worker running".to_string(),
                )));
                return ticket;
            }
        };

        if let Err(e) = sender.try_send(Envelope { request, reply }) {
            let (reason, envelope) = match e {
                mpsc::error::TrySendError::Full(env) => ("worker queue full", env),
                mpsc::error::TrySendError::Closed(env) => ("worker channel closed", env),
            };
            warn!(executor = %self.name, reason, "batch not delivered");
            let _ = envelope
                .reply
                .send(Err(ExecutorFailure::Unavailable(reason.to_string())));
        }
        ticket
    }

    fn restart(&self) -> RecallResult<()> {
        let model = (self.factory)().map_err(|e| EmbeddingError::ExecutorUnavailable {
            executor: format!("{}: reinitialization failed: {e}", self.name),
        })?;
        let generation = self.generation() + 1;
        self.install_worker(model, generation);
        info!(executor = %self.name, generation, "channel executor restarted");
        Ok(())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl Drop for ChannelExecutor {
    fn drop(&mut self) {
        if let Some(worker) = self.lock_worker().take() {
            worker.task.abort();
        }
    }
}
