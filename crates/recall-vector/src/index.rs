use recall_core::errors::RecallResult;
use recall_core::models::Metadata;

use crate::types::{SearchOptions, VectorMatch};

/// Search surface of a vector index.
///
/// [`VectorStore`](crate::VectorStore) is exact; an approximate index can
/// implement the same trait.
pub trait IVectorIndex: Send + Sync {
    /// Replace the index contents. All-or-nothing.
    fn build(&self, vectors: &[Vec<f32>], ids: &[String], metadata: &[Metadata]) -> RecallResult<()>;

    /// Top `k` rows by similarity to `query`; `k == 0` means all.
    fn search(
        &self,
        query: &[f32],
        k: usize,
        options: &SearchOptions<'_>,
    ) -> RecallResult<Vec<VectorMatch>>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn dimension(&self) -> usize;
}
