//! Weighted reciprocal rank fusion.
//!
//! score(d) = w / (k + r_v + 1) + (1 - w) / (k + r_b + 1)
//!
//! where `r_v` and `r_b` are 0-based ranks in the vector and BM25 lists and
//! a missing rank contributes nothing. Rank fusion needs no score
//! normalization across the two retrievers.

use std::collections::HashMap;

use recall_core::config::defaults;
use recall_core::models::{FusedResult, SearchHit};

/// Fusion parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FusionOptions {
    /// Smoothing constant. Higher values flatten the rank curve.
    pub k: u32,
    /// Vector list weight; BM25 gets `1 - vector_weight`.
    pub vector_weight: f64,
    /// Results kept after fusion. 0 keeps all.
    pub top_k: usize,
}

impl Default for FusionOptions {
    fn default() -> Self {
        Self {
            k: defaults::DEFAULT_RRF_K,
            vector_weight: defaults::DEFAULT_VECTOR_WEIGHT,
            top_k: defaults::DEFAULT_TOP_K,
        }
    }
}

/// Contribution of a vector-list rank.
pub fn vector_contribution(vector_weight: f64, k: u32, rank: usize) -> f64 {
    vector_weight / (k as f64 + rank as f64 + 1.0)
}

/// Contribution of a BM25-list rank.
pub fn bm25_contribution(vector_weight: f64, k: u32, rank: usize) -> f64 {
    (1.0 - vector_weight) / (k as f64 + rank as f64 + 1.0)
}

/// Fuse the two ranked lists.
///
/// With `vector_weight >= 1` the vector list comes back as is and BM25 is
/// ignored. With `vector_weight <= 0` and a non-empty BM25 list the BM25
/// list comes back as is. Neither short-circuit truncates. Otherwise
/// results are sorted by fused score; ties keep first-appearance order,
/// vector list first.
pub fn fuse(vector_results: &[SearchHit], bm25_results: &[SearchHit], options: FusionOptions) -> Vec<FusedResult> {
    if options.vector_weight >= 1.0 {
        return vector_results
            .iter()
            .enumerate()
            .map(|(rank, hit)| passthrough(hit, Some(rank), None))
            .collect();
    }
    if options.vector_weight <= 0.0 && !bm25_results.is_empty() {
        return bm25_results
            .iter()
            .enumerate()
            .map(|(rank, hit)| passthrough(hit, None, Some(rank)))
            .collect();
    }

    let mut fused: Vec<FusedResult> = Vec::with_capacity(vector_results.len() + bm25_results.len());
    let mut position: HashMap<&str, usize> = HashMap::new();

    for (rank, hit) in vector_results.iter().enumerate() {
        if position.contains_key(hit.id.as_str()) {
            continue;
        }
        position.insert(hit.id.as_str(), fused.len());
        let mut entry = passthrough(hit, Some(rank), None);
        entry.score = vector_contribution(options.vector_weight, options.k, rank);
        fused.push(entry);
    }

    for (rank, hit) in bm25_results.iter().enumerate() {
        let contribution = bm25_contribution(options.vector_weight, options.k, rank);
        match position.get(hit.id.as_str()) {
            Some(&i) => {
                let entry = &mut fused[i];
                if entry.bm25_rank.is_some() {
                    continue;
                }
                entry.bm25_rank = Some(rank);
                entry.bm25_score = Some(hit.score);
                entry.score += contribution;
                if entry.metadata.is_empty() {
                    entry.metadata = hit.metadata.clone();
                }
                if entry.text.is_empty() {
                    entry.text = hit.text.clone();
                }
            }
            None => {
                position.insert(hit.id.as_str(), fused.len());
                let mut entry = passthrough(hit, None, Some(rank));
                entry.score = contribution;
                fused.push(entry);
            }
        }
    }

    // Stable sort: equal scores stay in first-appearance order.
    fused.sort_by(|a, b| b.score.total_cmp(&a.score));
    if options.top_k > 0 {
        fused.truncate(options.top_k);
    }
    fused
}

fn passthrough(hit: &SearchHit, vector_rank: Option<usize>, bm25_rank: Option<usize>) -> FusedResult {
    FusedResult {
        id: hit.id.clone(),
        score: hit.score as f64,
        vector_rank,
        vector_score: vector_rank.map(|_| hit.score),
        bm25_rank,
        bm25_score: bm25_rank.map(|_| hit.score),
        metadata: hit.metadata.clone(),
        text: hit.text.clone(),
    }
}
