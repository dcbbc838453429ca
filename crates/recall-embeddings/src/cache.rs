//! Bounded embedding cache with insertion-order eviction.
//!
//! On overflow the oldest tenth of entries (by insertion, not by access) is
//! dropped in one sweep before the new entry goes in. Lookups never reorder
//! entries, so a frequently read vector is evicted just as early as an
//! unread one.

use std::collections::{HashMap, VecDeque};

use recall_observability::tracing_setup::events;

/// One tenth of the entries go per eviction sweep.
const EVICTION_DIVISOR: usize = 10;

/// In-memory `cache key → vector` store.
///
/// Keys come from [`recall_core::text::cache_key`]. Values are handed out
/// as copies; nothing outside the cache holds a reference into it.
#[derive(Debug)]
pub struct EmbeddingCache {
    entries: HashMap<String, Vec<f32>>,
    /// Keys in insertion order, oldest at the front.
    order: VecDeque<String>,
    capacity: usize,
}

impl EmbeddingCache {
    /// Create a cache holding at most `capacity` vectors. A capacity of zero
    /// disables caching.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::with_capacity(capacity.min(4096)),
            order: VecDeque::with_capacity(capacity.min(4096)),
            capacity,
        }
    }

    /// Copy of the cached vector for `key`.
    pub fn get(&self, key: &str) -> Option<Vec<f32>> {
        self.entries.get(key).cloned()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Insert a vector. Overwriting an existing key keeps its original
    /// insertion position.
    pub fn insert(&mut self, key: String, vector: Vec<f32>) {
        if self.capacity == 0 {
            return;
        }
        if let Some(slot) = self.entries.get_mut(&key) {
            *slot = vector;
            return;
        }
        if self.entries.len() >= self.capacity {
            self.evict_oldest();
        }
        self.order.push_back(key.clone());
        self.entries.insert(key, vector);
    }

    /// Drop the oldest 10% of entries (at least one).
    fn evict_oldest(&mut self) {
        let target = (self.entries.len() / EVICTION_DIVISOR).max(1);
        let mut evicted = 0;
        while evicted < target {
            let Some(key) = self.order.pop_front() else {
                break;
            };
            if self.entries.remove(&key).is_some() {
                evicted += 1;
            }
        }
        events::cache_evicted(evicted, self.entries.len());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Remove all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }
}
