//! Immutable vector snapshot: the unit of atomic replacement.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use recall_core::errors::{RecallResult, SnapshotError, ValidationError};
use recall_core::models::Metadata;

use crate::similarity::{clamped_norm, cosine_with_norms, l2_norm};
use crate::types::{SearchOptions, StoredDocument, VectorMatch};

/// N rows of dimension D in one contiguous row-major buffer, plus per-row
/// norms, ids, and metadata.
///
/// `matrix.len() == N * D`; `norms`, `ids`, `metadata` all have length N.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorSnapshot {
    dimension: usize,
    matrix: Vec<f32>,
    norms: Vec<f32>,
    ids: Vec<String>,
    metadata: Vec<Metadata>,
    /// First row index per id.
    positions: HashMap<String, usize>,
    built_at: Option<DateTime<Utc>>,
}

impl VectorSnapshot {
    pub fn empty(dimension: usize) -> Self {
        Self {
            dimension,
            matrix: Vec::new(),
            norms: Vec::new(),
            ids: Vec::new(),
            metadata: Vec::new(),
            positions: HashMap::new(),
            built_at: None,
        }
    }

    /// Build from individual rows, validating counts and dimensions.
    pub fn from_rows(
        dimension: usize,
        vectors: &[Vec<f32>],
        ids: &[String],
        metadata: &[Metadata],
    ) -> RecallResult<Self> {
        if vectors.len() != ids.len() {
            return Err(ValidationError::LengthMismatch {
                left: "vectors",
                left_len: vectors.len(),
                right: "ids",
                right_len: ids.len(),
            }
            .into());
        }
        if metadata.len() != ids.len() {
            return Err(ValidationError::LengthMismatch {
                left: "metadata",
                left_len: metadata.len(),
                right: "ids",
                right_len: ids.len(),
            }
            .into());
        }
        if let Some(bad) = vectors.iter().find(|v| v.len() != dimension) {
            return Err(ValidationError::DimensionMismatch {
                expected: dimension,
                actual: bad.len(),
            }
            .into());
        }

        let mut matrix = Vec::with_capacity(vectors.len() * dimension);
        let mut norms = Vec::with_capacity(vectors.len());
        for row in vectors {
            matrix.extend_from_slice(row);
            norms.push(clamped_norm(row));
        }

        Ok(Self::assemble(
            dimension,
            matrix,
            norms,
            ids.to_vec(),
            metadata.to_vec(),
            Some(Utc::now()),
        ))
    }

    /// Build from already-flattened buffers, as read from a serialized
    /// snapshot. Inconsistent lengths mean the data is corrupt.
    pub fn from_parts(
        dimension: usize,
        matrix: Vec<f32>,
        norms: Option<Vec<f32>>,
        ids: Vec<String>,
        metadata: Vec<Metadata>,
        built_at: Option<DateTime<Utc>>,
    ) -> RecallResult<Self> {
        let n = ids.len();
        if n.checked_mul(dimension) != Some(matrix.len()) {
            return Err(SnapshotError::CorruptSnapshot {
                details: format!(
                    "matrix holds {} floats, expected {n} rows x {dimension}",
                    matrix.len()
                ),
            }
            .into());
        }
        if metadata.len() != n {
            return Err(SnapshotError::CorruptSnapshot {
                details: format!("{} metadata records for {n} ids", metadata.len()),
            }
            .into());
        }
        let norms = match norms {
            Some(norms) if norms.len() == n => norms,
            Some(norms) => {
                return Err(SnapshotError::CorruptSnapshot {
                    details: format!("{} norms for {n} ids", norms.len()),
                }
                .into());
            }
            None if dimension == 0 => vec![clamped_norm(&[]); n],
            None => matrix.chunks_exact(dimension).map(clamped_norm).collect(),
        };
        Ok(Self::assemble(dimension, matrix, norms, ids, metadata, built_at))
    }

    fn assemble(
        dimension: usize,
        matrix: Vec<f32>,
        norms: Vec<f32>,
        ids: Vec<String>,
        metadata: Vec<Metadata>,
        built_at: Option<DateTime<Utc>>,
    ) -> Self {
        let mut positions = HashMap::with_capacity(ids.len());
        for (i, id) in ids.iter().enumerate() {
            positions.entry(id.clone()).or_insert(i);
        }
        Self {
            dimension,
            matrix,
            norms,
            ids,
            metadata,
            positions,
            built_at,
        }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn matrix(&self) -> &[f32] {
        &self.matrix
    }

    pub fn norms(&self) -> &[f32] {
        &self.norms
    }

    pub fn metadata(&self) -> &[Metadata] {
        &self.metadata
    }

    pub fn built_at(&self) -> Option<DateTime<Utc>> {
        self.built_at
    }

    pub fn row(&self, index: usize) -> &[f32] {
        let start = index * self.dimension;
        &self.matrix[start..start + self.dimension]
    }

    pub fn document(&self, id: &str) -> Option<StoredDocument> {
        let &index = self.positions.get(id)?;
        Some(StoredDocument {
            id: self.ids[index].clone(),
            index,
            vector: self.row(index).to_vec(),
            norm: self.norms[index],
            metadata: self.metadata[index].clone(),
        })
    }

    /// Exact top-k by cosine. `k == 0` returns every eligible row.
    ///
    /// The caller checks the query dimension.
    pub fn search(&self, query: &[f32], k: usize, options: &SearchOptions<'_>) -> Vec<VectorMatch> {
        let query_norm = l2_norm(query);
        let mut scored: Vec<(usize, f32)> = (0..self.len())
            .filter(|&i| options.filter.map_or(true, |keep| keep(&self.metadata[i])))
            .map(|i| (i, cosine_with_norms(query, query_norm, self.row(i), self.norms[i])))
            .filter(|&(_, score)| options.min_score.map_or(true, |min| score >= min))
            .collect();

        scored.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        if k > 0 {
            scored.truncate(k);
        }

        scored
            .into_iter()
            .enumerate()
            .map(|(rank, (index, score))| VectorMatch {
                id: self.ids[index].clone(),
                index,
                score,
                rank,
                metadata: options
                    .include_metadata
                    .then(|| self.metadata[index].clone()),
            })
            .collect()
    }

    /// Bytes held by the matrix buffer.
    pub fn matrix_bytes(&self) -> usize {
        self.matrix.len() * std::mem::size_of::<f32>()
    }
}
