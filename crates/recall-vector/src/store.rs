//! VectorStore: exact cosine search with atomic snapshot replacement.

use std::sync::{Arc, RwLock};

use recall_core::config::VectorStoreConfig;
use recall_core::errors::{RecallResult, ValidationError};
use recall_core::models::Metadata;
use recall_observability::tracing_setup::events;
use tracing::{debug, info};

use crate::index::IVectorIndex;
use crate::persistence;
use crate::snapshot::VectorSnapshot;
use crate::types::{SearchOptions, StoredDocument, VectorMatch, VectorStoreStats};

/// Dense vector store.
///
/// Readers clone the current snapshot `Arc` under a short read lock and
/// search without holding the lock. Writers build the replacement
/// snapshot first and only take the write lock to swap it in.
pub struct VectorStore {
    config: VectorStoreConfig,
    snapshot: RwLock<Arc<VectorSnapshot>>,
}

impl VectorStore {
    pub fn new(config: VectorStoreConfig) -> Self {
        info!(
            dimension = config.dimension,
            policy = ?config.legacy_dimension_policy,
            "VectorStore initialized"
        );
        let snapshot = RwLock::new(Arc::new(VectorSnapshot::empty(config.dimension)));
        Self { config, snapshot }
    }

    /// Current snapshot. Stays valid even if a rebuild swaps in a new one.
    pub fn snapshot(&self) -> Arc<VectorSnapshot> {
        let guard = self.snapshot.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&guard)
    }

    fn swap(&self, next: VectorSnapshot) {
        let documents = next.len();
        let next = Arc::new(next);
        let mut guard = self.snapshot.write().unwrap_or_else(|e| e.into_inner());
        *guard = next;
        drop(guard);
        events::snapshot_swapped("vector_store", documents);
    }

    /// Replace the contents with `vectors`. On error the previous snapshot
    /// keeps serving.
    pub fn build(&self, vectors: &[Vec<f32>], ids: &[String], metadata: &[Metadata]) -> RecallResult<()> {
        let next = VectorSnapshot::from_rows(self.dimension(), vectors, ids, metadata)?;
        debug!(rows = next.len(), bytes = next.matrix_bytes(), "vector snapshot built");
        self.swap(next);
        Ok(())
    }

    /// Exact cosine top-k. Ties go to the earlier-inserted row.
    pub fn search(
        &self,
        query: &[f32],
        k: usize,
        options: &SearchOptions<'_>,
    ) -> RecallResult<Vec<VectorMatch>> {
        let snapshot = self.snapshot();
        if query.len() != snapshot.dimension() {
            return Err(ValidationError::DimensionMismatch {
                expected: snapshot.dimension(),
                actual: query.len(),
            }
            .into());
        }
        Ok(snapshot.search(query, k, options))
    }

    pub fn get_document(&self, id: &str) -> Option<StoredDocument> {
        self.snapshot().document(id)
    }

    pub fn get_all_ids(&self) -> Vec<String> {
        self.snapshot().ids().to_vec()
    }

    pub fn get_stats(&self) -> VectorStoreStats {
        let snapshot = self.snapshot();
        VectorStoreStats {
            count: snapshot.len(),
            dimension: snapshot.dimension(),
            matrix_bytes: snapshot.matrix_bytes(),
            built_at: snapshot.built_at(),
        }
    }

    /// Install an empty snapshot, keeping the current dimension.
    pub fn clear(&self) {
        self.swap(VectorSnapshot::empty(self.dimension()));
    }

    /// Current row dimension. May differ from the configured one after
    /// loading a snapshot under the `Adopt` policy.
    pub fn dimension(&self) -> usize {
        self.snapshot().dimension()
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn serialize(&self) -> RecallResult<String> {
        persistence::encode(&self.snapshot())
    }

    /// Replace the contents from a serialized snapshot (current or legacy
    /// format). On error the previous snapshot keeps serving.
    pub fn deserialize(&self, json: &str) -> RecallResult<()> {
        let next = persistence::decode(
            json,
            self.dimension(),
            self.config.legacy_dimension_policy,
        )?;
        info!(rows = next.len(), dimension = next.dimension(), "vector snapshot loaded");
        self.swap(next);
        Ok(())
    }

    pub fn config(&self) -> &VectorStoreConfig {
        &self.config
    }
}

impl IVectorIndex for VectorStore {
    fn build(&self, vectors: &[Vec<f32>], ids: &[String], metadata: &[Metadata]) -> RecallResult<()> {
        VectorStore::build(self, vectors, ids, metadata)
    }

    fn search(
        &self,
        query: &[f32],
        k: usize,
        options: &SearchOptions<'_>,
    ) -> RecallResult<Vec<VectorMatch>> {
        VectorStore::search(self, query, k, options)
    }

    fn len(&self) -> usize {
        VectorStore::len(self)
    }

    fn dimension(&self) -> usize {
        VectorStore::dimension(self)
    }
}
