//! The indexed corpus as one immutable unit.
//!
//! Vector rows, BM25 postings, and the document table are built together
//! and replaced together, so a query never pairs one generation's vector
//! ids with another generation's postings or texts.

use std::collections::HashMap;

use recall_core::config::Bm25Config;
use recall_core::errors::{RecallResult, ValidationError};
use recall_core::models::{Document, Metadata};
use recall_lexical::scorer::{self, Bm25Match};
use recall_lexical::Bm25Snapshot;
use recall_vector::{SearchOptions, VectorMatch, VectorSnapshot};

#[derive(Debug, Clone)]
pub struct CorpusSnapshot {
    vectors: VectorSnapshot,
    bm25: Bm25Snapshot,
    documents: HashMap<String, Document>,
}

impl CorpusSnapshot {
    pub fn empty(dimension: usize) -> Self {
        Self {
            vectors: VectorSnapshot::empty(dimension),
            bm25: Bm25Snapshot::default(),
            documents: HashMap::new(),
        }
    }

    /// Build every part from `documents` and their passage `vectors`.
    /// `vectors[i]` belongs to `documents[i]`.
    pub fn build(dimension: usize, documents: &[Document], vectors: &[Vec<f32>]) -> RecallResult<Self> {
        if documents.is_empty() {
            return Err(ValidationError::EmptyCorpus.into());
        }
        let ids: Vec<String> = documents.iter().map(|d| d.id.clone()).collect();
        let texts: Vec<String> = documents.iter().map(|d| d.text.clone()).collect();
        let metadata: Vec<Metadata> = documents.iter().map(|d| d.metadata.clone()).collect();

        let vectors = VectorSnapshot::from_rows(dimension, vectors, &ids, &metadata)?;
        let bm25 = Bm25Snapshot::build(&texts, &ids)?;
        let documents = documents
            .iter()
            .map(|d| (d.id.clone(), d.clone()))
            .collect();

        Ok(Self {
            vectors,
            bm25,
            documents,
        })
    }

    /// Cosine search. Rejects a query of the wrong dimension.
    pub fn search_vectors(
        &self,
        query: &[f32],
        k: usize,
        options: &SearchOptions<'_>,
    ) -> RecallResult<Vec<VectorMatch>> {
        if query.len() != self.vectors.dimension() {
            return Err(ValidationError::DimensionMismatch {
                expected: self.vectors.dimension(),
                actual: query.len(),
            }
            .into());
        }
        Ok(self.vectors.search(query, k, options))
    }

    pub fn search_bm25(&self, query: &str, k: usize, params: Bm25Config) -> Vec<Bm25Match> {
        scorer::score(&self.bm25, query, k, params)
    }

    pub fn get_document(&self, id: &str) -> Option<&Document> {
        self.documents.get(id)
    }

    pub fn vectors(&self) -> &VectorSnapshot {
        &self.vectors
    }

    pub fn bm25(&self) -> &Bm25Snapshot {
        &self.bm25
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn docs() -> Vec<Document> {
        vec![
            Document::new("a", "red apple"),
            Document::new("b", "green pear"),
        ]
    }

    #[test]
    fn parts_share_one_id_space() {
        let corpus = CorpusSnapshot::build(2, &docs(), &[vec![1.0, 0.0], vec![0.0, 1.0]]).unwrap();
        assert_eq!(corpus.len(), 2);
        assert_eq!(corpus.vectors().ids(), &["a".to_string(), "b".to_string()]);
        assert_eq!(corpus.bm25().doc_count(), 2);
        assert_eq!(corpus.get_document("b").unwrap().text, "green pear");

        let hits = corpus.search_bm25("apple", 0, Bm25Config::default());
        assert_eq!(hits[0].id, "a");
        let hits = corpus
            .search_vectors(&[0.0, 1.0], 1, &SearchOptions::default())
            .unwrap();
        assert_eq!(hits[0].id, "b");
    }

    #[test]
    fn wrong_row_dimension_fails_the_whole_build() {
        let err = CorpusSnapshot::build(2, &docs(), &[vec![1.0, 0.0], vec![1.0]]).unwrap_err();
        assert!(matches!(
            err,
            recall_core::RecallError::Validation(ValidationError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn wrong_query_dimension_is_rejected() {
        let corpus = CorpusSnapshot::empty(3);
        assert!(corpus.is_empty());
        assert!(corpus
            .search_vectors(&[1.0], 5, &SearchOptions::default())
            .is_err());
    }
}
