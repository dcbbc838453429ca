//! Pipeline counters.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Point-in-time view of an [`EmbeddingPipeline`](crate::EmbeddingPipeline)'s
/// counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EmbeddingStats {
    /// Batch attempts handed to the executor, retries included.
    pub executor_requests: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub retries: u64,
    pub restarts: u64,
}

#[derive(Debug, Default)]
pub(crate) struct StatsCounters {
    pub executor_requests: AtomicU64,
    pub cache_hits: AtomicU64,
    pub cache_misses: AtomicU64,
    pub retries: AtomicU64,
    pub restarts: AtomicU64,
}

impl StatsCounters {
    pub fn bump(counter: &AtomicU64, by: u64) {
        counter.fetch_add(by, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> EmbeddingStats {
        EmbeddingStats {
            executor_requests: self.executor_requests.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            cache_misses: self.cache_misses.load(Ordering::Relaxed),
            retries: self.retries.load(Ordering::Relaxed),
            restarts: self.restarts.load(Ordering::Relaxed),
        }
    }
}
