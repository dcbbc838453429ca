//! BM25 Okapi scoring.

use std::collections::{HashMap, HashSet};

use recall_core::config::Bm25Config;
use serde::{Deserialize, Serialize};

use crate::postings::Bm25Snapshot;
use crate::tokenizer::tokenize;

/// One BM25 result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bm25Match {
    pub id: String,
    pub doc_index: usize,
    pub score: f32,
    /// 0-based position in the result list.
    pub rank: usize,
}

/// `ln((N - df + 0.5) / (df + 0.5) + 1)`. Always positive.
pub fn idf(doc_count: usize, df: usize) -> f32 {
    let n = doc_count as f32;
    let df = df as f32;
    ((n - df + 0.5) / (df + 0.5) + 1.0).ln()
}

/// Score `query` against `snapshot`. Only documents containing at least one
/// query term are returned. `k == 0` returns all of them.
pub fn score(snapshot: &Bm25Snapshot, query: &str, k: usize, params: Bm25Config) -> Vec<Bm25Match> {
    if snapshot.is_empty() {
        return Vec::new();
    }
    let Bm25Config { k1, b } = params;
    let avgdl = snapshot.avgdl();
    let n = snapshot.doc_count();

    let mut seen = HashSet::new();
    let mut scores: HashMap<usize, f32> = HashMap::new();

    for term in tokenize(query) {
        if !seen.insert(term.clone()) {
            continue;
        }
        let Some(postings) = snapshot.postings(&term) else {
            continue;
        };
        if postings.is_empty() {
            continue;
        }
        let term_idf = idf(n, postings.len());

        for posting in postings {
            let tf = posting.term_frequency as f32;
            let dl = snapshot.doc_length(posting.doc_index) as f32;
            let tf_norm = (tf * (k1 + 1.0)) / (tf + k1 * (1.0 - b + b * dl / avgdl));
            *scores.entry(posting.doc_index).or_insert(0.0) += term_idf * tf_norm;
        }
    }

    let mut ranked: Vec<(usize, f32)> = scores.into_iter().collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    if k > 0 {
        ranked.truncate(k);
    }

    ranked
        .into_iter()
        .enumerate()
        .map(|(rank, (doc_index, score))| Bm25Match {
            id: snapshot.id(doc_index).unwrap_or_default().to_string(),
            doc_index,
            score,
            rank,
        })
        .collect()
}
