//! Bm25Index: owns the current BM25 snapshot.

use std::sync::{Arc, RwLock};

use recall_core::config::Bm25Config;
use recall_core::errors::RecallResult;
use recall_observability::tracing_setup::events;
use tracing::{debug, info};

use crate::postings::Bm25Snapshot;
use crate::scorer::{self, Bm25Match};

/// BM25 search engine with wholesale rebuilds.
///
/// Queries run against whichever snapshot was current when they started.
pub struct Bm25Index {
    params: Bm25Config,
    snapshot: RwLock<Arc<Bm25Snapshot>>,
}

impl Bm25Index {
    pub fn new(params: Bm25Config) -> Self {
        info!(k1 = params.k1, b = params.b, "Bm25Index initialized");
        Self {
            params,
            snapshot: RwLock::new(Arc::new(Bm25Snapshot::default())),
        }
    }

    pub fn snapshot(&self) -> Arc<Bm25Snapshot> {
        let guard = self.snapshot.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&guard)
    }

    fn swap(&self, next: Bm25Snapshot) {
        let documents = next.doc_count();
        let next = Arc::new(next);
        *self.snapshot.write().unwrap_or_else(|e| e.into_inner()) = next;
        events::snapshot_swapped("bm25_index", documents);
    }

    /// Index `documents` (named by `ids`), replacing the whole corpus.
    ///
    /// Fails with `LengthMismatch` or `EmptyCorpus`; the previous corpus
    /// stays searchable on failure.
    pub fn build(&self, documents: &[String], ids: &[String]) -> RecallResult<()> {
        let next = Bm25Snapshot::build(documents, ids)?;
        debug!(
            documents = next.doc_count(),
            vocabulary = next.vocabulary_size(),
            avgdl = next.avgdl(),
            "bm25 snapshot built"
        );
        self.swap(next);
        Ok(())
    }

    /// Top `k` documents for `query`; `k == 0` means every match.
    pub fn search(&self, query: &str, k: usize) -> Vec<Bm25Match> {
        scorer::score(&self.snapshot(), query, k, self.params)
    }

    pub fn doc_count(&self) -> usize {
        self.snapshot().doc_count()
    }

    pub fn vocabulary_size(&self) -> usize {
        self.snapshot().vocabulary_size()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot().is_empty()
    }

    /// Drop the corpus.
    pub fn clear(&self) {
        self.swap(Bm25Snapshot::default());
    }

    pub fn params(&self) -> Bm25Config {
        self.params
    }
}

impl Default for Bm25Index {
    fn default() -> Self {
        Self::new(Bm25Config::default())
    }
}
