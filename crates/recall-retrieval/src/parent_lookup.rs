//! Memoizing parent-document lookup backed by moka.

use std::time::Duration;

use moka::sync::Cache;
use recall_core::models::ParentDocument;
use recall_core::traits::IParentLookup;

/// Wraps another lookup and remembers its answers, misses included.
pub struct CachedParentLookup<L> {
    inner: L,
    cache: Cache<String, Option<ParentDocument>>,
}

impl<L: IParentLookup> CachedParentLookup<L> {
    pub fn new(inner: L, max_entries: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_entries)
            .time_to_idle(Duration::from_secs(600))
            .build();
        Self { inner, cache }
    }

    /// Forget everything; the next lookup of any parent goes to `inner`.
    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }

    pub fn invalidate(&self, parent_id: &str) {
        self.cache.invalidate(parent_id);
    }

    pub fn inner(&self) -> &L {
        &self.inner
    }
}

impl<L: IParentLookup> IParentLookup for CachedParentLookup<L> {
    fn lookup(&self, parent_id: &str) -> Option<ParentDocument> {
        self.cache
            .get_with(parent_id.to_string(), || self.inner.lookup(parent_id))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use recall_core::models::Metadata;

    use super::*;

    struct Counting {
        calls: AtomicUsize,
    }

    impl IParentLookup for Counting {
        fn lookup(&self, parent_id: &str) -> Option<ParentDocument> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            (parent_id == "known").then(|| ParentDocument {
                id: parent_id.to_string(),
                text: "parent".to_string(),
                metadata: Metadata::new(),
            })
        }
    }

    fn lookup() -> CachedParentLookup<Counting> {
        CachedParentLookup::new(
            Counting {
                calls: AtomicUsize::new(0),
            },
            100,
        )
    }

    #[test]
    fn hits_and_misses_are_memoized() {
        let cached = lookup();
        assert!(cached.lookup("known").is_some());
        assert!(cached.lookup("known").is_some());
        assert!(cached.lookup("unknown").is_none());
        assert!(cached.lookup("unknown").is_none());
        assert_eq!(cached.inner().calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn invalidate_forces_reload() {
        let cached = lookup();
        cached.lookup("known");
        cached.invalidate("known");
        cached.lookup("known");
        assert_eq!(cached.inner().calls.load(Ordering::SeqCst), 2);
    }
}
