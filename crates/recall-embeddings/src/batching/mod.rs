//! Adaptive batch building.
//!
//! Two strategies:
//! - **Fixed-size**: sort by normalized length, then slice. Similar-length
//!   texts land together, which keeps padding and peak memory predictable.
//! - **Token-budget**: pack greedily in input order until the next item
//!   would push the batch over budget.

pub mod token_estimate;

pub use token_estimate::estimate_tokens;

use recall_core::config::{BatchingMode, EmbeddingConfig};

/// One text waiting to be embedded. Lives for a single `embed` call.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchItem {
    /// Position in the caller's input.
    pub index: usize,
    pub normalized: String,
    /// Mode-prefixed text sent to the executor.
    pub prepared: String,
    pub cache_key: String,
    /// Only filled in for token-budget batching.
    pub estimated_tokens: Option<usize>,
}

impl BatchItem {
    fn char_len(&self) -> usize {
        self.normalized.chars().count()
    }

    fn tokens(&self, max_length: usize) -> usize {
        self.estimated_tokens
            .unwrap_or_else(|| estimate_tokens(&self.prepared, max_length))
    }
}

/// Split pending items into executor batches according to `config`.
///
/// Token-budget mode without a usable budget falls back to fixed-size.
pub fn plan_batches(items: Vec<BatchItem>, config: &EmbeddingConfig) -> Vec<Vec<BatchItem>> {
    if items.is_empty() {
        return Vec::new();
    }
    match (config.batching, config.tokens_per_batch) {
        (BatchingMode::TokenBudget, Some(budget)) if budget > 0 => {
            by_token_budget(items, budget, config.max_length)
        }
        _ => by_fixed_size(items, config.batch_size),
    }
}

/// Sort ascending by normalized length (stable), then slice into groups of
/// `batch_size`.
pub fn by_fixed_size(mut items: Vec<BatchItem>, batch_size: usize) -> Vec<Vec<BatchItem>> {
    let batch_size = batch_size.max(1);
    items.sort_by_key(BatchItem::char_len);

    let mut batches = Vec::with_capacity(items.len().div_ceil(batch_size));
    let mut iter = items.into_iter().peekable();
    while iter.peek().is_some() {
        batches.push(iter.by_ref().take(batch_size).collect());
    }
    batches
}

/// Greedy in-order packing. An item larger than the whole budget still gets
/// a batch of its own rather than being rejected.
pub fn by_token_budget(
    items: Vec<BatchItem>,
    budget: usize,
    max_length: usize,
) -> Vec<Vec<BatchItem>> {
    let mut batches = Vec::new();
    let mut current: Vec<BatchItem> = Vec::new();
    let mut current_tokens = 0usize;

    for mut item in items {
        let tokens = item.tokens(max_length);
        item.estimated_tokens = Some(tokens);

        if !current.is_empty() && current_tokens + tokens > budget {
            batches.push(std::mem::take(&mut current));
            current_tokens = 0;
        }
        current_tokens += tokens;
        current.push(item);
    }
    if !current.is_empty() {
        batches.push(current);
    }
    batches
}
