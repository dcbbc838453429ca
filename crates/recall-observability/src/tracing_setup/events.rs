//! Structured log events for key engine operations.
//!
//! Each function emits a `tracing` event with structured fields.

/// Log a completed snapshot swap.
pub fn snapshot_swapped(component: &str, documents: usize) {
    tracing::info!(
        event = "snapshot_swapped",
        component = %component,
        documents = documents,
        "snapshot swapped"
    );
}

/// Log an executor restart.
pub fn executor_restarted(executor: &str, correlation_id: &str, reason: &str) {
    tracing::warn!(
        event = "executor_restarted",
        executor = %executor,
        correlation_id = %correlation_id,
        reason = %reason,
        "executor restarted"
    );
}

/// Log cache eviction.
pub fn cache_evicted(evicted: usize, remaining: usize) {
    tracing::debug!(
        event = "cache_evicted",
        evicted = evicted,
        remaining = remaining,
        "embedding cache evicted oldest entries"
    );
}

/// Log a completed retrieval.
pub fn retrieval_completed(results: usize, tokens: usize, limited: bool) {
    tracing::info!(
        event = "retrieval_completed",
        results = results,
        tokens = tokens,
        limited = limited,
        "retrieval complete"
    );
}
