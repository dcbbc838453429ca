//! Embedding executors: where batches actually get computed.
//!
//! Every batch attempt is a [`BatchRequest`] with its own correlation id.
//! Submitting returns a [`BatchTicket`] that resolves once the executor
//! answers, fails, or the caller's deadline passes. Executors are free to
//! compute inline ([`InProcessExecutor`]) or on a worker task reached by
//! message passing ([`ChannelExecutor`]).

pub mod channel;
pub mod in_process;

pub use channel::ChannelExecutor;
pub use in_process::InProcessExecutor;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use recall_core::errors::RecallResult;
use recall_core::models::EmbedParams;
use tokio::sync::oneshot;
use uuid::Uuid;

/// Cooperative cancellation shared between a caller and in-flight work.
///
/// Checked at batch boundaries only; a batch the executor has already
/// picked up runs to completion.
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// One attempt at embedding one batch.
#[derive(Debug, Clone)]
pub struct BatchRequest {
    pub correlation_id: Uuid,
    pub texts: Vec<String>,
    pub params: EmbedParams,
    pub cancel: CancellationFlag,
}

/// Why a batch attempt did not produce vectors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutorFailure {
    /// No reply before the deadline.
    Timeout,
    /// The executor is gone or refused the request.
    Unavailable(String),
    /// The executor ran the batch and reported an error.
    Failed(String),
    /// The request was cancelled before the executor picked it up.
    Cancelled,
}

impl ExecutorFailure {
    /// Timeouts and unavailability are cured by restarting the executor.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ExecutorFailure::Timeout | ExecutorFailure::Unavailable(_))
    }
}

impl std::fmt::Display for ExecutorFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExecutorFailure::Timeout => f.write_str("timed out"),
            ExecutorFailure::Unavailable(reason) => write!(f, "unavailable: {reason}"),
            ExecutorFailure::Failed(reason) => write!(f, "failed: {reason}"),
            ExecutorFailure::Cancelled => f.write_str("cancelled"),
        }
    }
}

/// What an executor sends back for a request.
pub type BatchReply = Result<Vec<Vec<f32>>, ExecutorFailure>;

/// Handle for a submitted batch, keyed by its correlation id.
#[derive(Debug)]
pub struct BatchTicket {
    pub correlation_id: Uuid,
    receiver: oneshot::Receiver<BatchReply>,
}

impl BatchTicket {
    /// A pending ticket plus the sender the executor answers through.
    pub fn pending(correlation_id: Uuid) -> (Self, oneshot::Sender<BatchReply>) {
        let (tx, rx) = oneshot::channel();
        (
            Self {
                correlation_id,
                receiver: rx,
            },
            tx,
        )
    }

    /// A ticket that is already answered (inline executors).
    pub fn ready(correlation_id: Uuid, reply: BatchReply) -> Self {
        let (ticket, tx) = Self::pending(correlation_id);
        // The receiver is alive in `ticket`, so this cannot fail.
        let _ = tx.send(reply);
        ticket
    }

    /// Wait for the reply, at most `timeout`.
    ///
    /// A dropped sender means the executor died with the request in hand
    /// and is reported as `Unavailable`.
    pub async fn wait(self, timeout: Duration) -> BatchReply {
        match tokio::time::timeout(timeout, self.receiver).await {
            Err(_) => Err(ExecutorFailure::Timeout),
            Ok(Err(_)) => Err(ExecutorFailure::Unavailable(
                "executor dropped the request".to_string(),
            )),
            Ok(Ok(reply)) => reply,
        }
    }
}

/// A pluggable batch executor.
///
/// `submit` never blocks on the computation itself; the returned ticket
/// carries the result.
pub trait IEmbeddingExecutor: Send + Sync {
    /// Hand a batch to the executor.
    fn submit(&self, request: BatchRequest) -> BatchTicket;

    /// Terminate and reinitialize. Pending requests are abandoned.
    fn restart(&self) -> RecallResult<()>;

    /// Dimensionality of the vectors this executor produces.
    fn dimensions(&self) -> usize;

    /// Human-readable executor name.
    fn name(&self) -> &str;
}
