use chrono::{DateTime, Utc};
use recall_core::models::Metadata;
use serde::{Deserialize, Serialize};

/// Metadata predicate applied before ranking.
pub type MetadataFilter<'a> = &'a (dyn Fn(&Metadata) -> bool + Send + Sync);

/// Knobs for [`VectorStore::search`](crate::VectorStore::search).
#[derive(Clone, Copy, Default)]
pub struct SearchOptions<'a> {
    /// Rows whose metadata fails this predicate are skipped.
    pub filter: Option<MetadataFilter<'a>>,
    /// Rows scoring below this are skipped.
    pub min_score: Option<f32>,
    /// Attach row metadata to each match.
    pub include_metadata: bool,
}

impl<'a> SearchOptions<'a> {
    pub fn with_metadata() -> Self {
        Self {
            include_metadata: true,
            ..Default::default()
        }
    }

    pub fn min_score(mut self, min_score: f32) -> Self {
        self.min_score = Some(min_score);
        self
    }

    pub fn filter(mut self, filter: MetadataFilter<'a>) -> Self {
        self.filter = Some(filter);
        self
    }
}

impl std::fmt::Debug for SearchOptions<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchOptions")
            .field("filter", &self.filter.map(|_| "<fn>"))
            .field("min_score", &self.min_score)
            .field("include_metadata", &self.include_metadata)
            .finish()
    }
}

/// One search result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorMatch {
    pub id: String,
    /// Row position in the snapshot (insertion order).
    pub index: usize,
    pub score: f32,
    /// 0-based position in the result list.
    pub rank: usize,
    pub metadata: Option<Metadata>,
}

/// A stored row, copied out of the snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    pub id: String,
    pub index: usize,
    pub vector: Vec<f32>,
    pub norm: f32,
    pub metadata: Metadata,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VectorStoreStats {
    pub count: usize,
    pub dimension: usize,
    /// Bytes held by the float matrix.
    pub matrix_bytes: usize,
    pub built_at: Option<DateTime<Utc>>,
}
