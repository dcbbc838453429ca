//! Parent/chunk grouping.
//!
//! Chunk hits that share a `parent_id` collapse into one [`ParentGroup`].
//! A hit without a parent id is its own parent.

use std::collections::HashMap;

use recall_core::models::{FusedResult, ParentGroup};
use recall_core::traits::IParentLookup;
use tracing::debug;

/// Group `results` by parent.
///
/// Per group: keep the `max_chunks_per_parent` best-scoring chunks, then
/// put them back in reading order (`chunk_index`, falling back to input
/// order for chunks without one). Group score is the best chunk score.
/// Parent text and metadata come from `lookup` when it knows the parent;
/// otherwise the retained chunk texts are joined with blank lines and the
/// best chunk's metadata is used.
///
/// Groups are sorted by score and truncated to `top_k` (0 keeps all).
pub fn group_by_parent(
    results: &[FusedResult],
    top_k: usize,
    max_chunks_per_parent: usize,
    lookup: Option<&dyn IParentLookup>,
) -> Vec<ParentGroup> {
    let max_chunks = max_chunks_per_parent.max(1);

    // parent id -> (input position, result), groups in first-appearance order
    let mut order: Vec<String> = Vec::new();
    let mut members: HashMap<String, Vec<(usize, &FusedResult)>> = HashMap::new();
    for (position, result) in results.iter().enumerate() {
        let parent = result.parent_id().unwrap_or(&result.id).to_string();
        members
            .entry(parent.clone())
            .or_insert_with(|| {
                order.push(parent);
                Vec::new()
            })
            .push((position, result));
    }

    let mut groups: Vec<ParentGroup> = order
        .into_iter()
        .filter_map(|parent_id| {
            let chunks = members.remove(&parent_id)?;
            Some(build_group(parent_id, chunks, max_chunks, lookup))
        })
        .collect();

    groups.sort_by(|a, b| b.max_score.total_cmp(&a.max_score));
    if top_k > 0 {
        groups.truncate(top_k);
    }
    debug!(groups = groups.len(), input = results.len(), "grouped results by parent");
    groups
}

fn build_group(
    parent_id: String,
    mut chunks: Vec<(usize, &FusedResult)>,
    max_chunks: usize,
    lookup: Option<&dyn IParentLookup>,
) -> ParentGroup {
    // Best first (stable, so equal scores keep input order).
    chunks.sort_by(|a, b| b.1.score.total_cmp(&a.1.score));
    chunks.truncate(max_chunks);

    let max_score = chunks.first().map(|(_, c)| c.score).unwrap_or(0.0);
    let avg_score = if chunks.is_empty() {
        0.0
    } else {
        chunks.iter().map(|(_, c)| c.score).sum::<f64>() / chunks.len() as f64
    };
    let best_metadata = chunks
        .first()
        .map(|(_, c)| c.metadata.clone())
        .unwrap_or_default();

    // Reading order; chunks without a position go last, in input order.
    chunks.sort_by_key(|(position, c)| (c.chunk_index().unwrap_or(u64::MAX), *position));
    let retained: Vec<FusedResult> = chunks.into_iter().map(|(_, c)| c.clone()).collect();

    let (text, metadata, resolved) = match lookup.and_then(|l| l.lookup(&parent_id)) {
        Some(parent) => (parent.text, parent.metadata, true),
        None => {
            let joined = retained
                .iter()
                .map(|c| c.text.as_str())
                .collect::<Vec<_>>()
                .join("\n\n");
            (joined, best_metadata, false)
        }
    };

    ParentGroup {
        parent_id,
        chunks: retained,
        max_score,
        avg_score,
        text,
        metadata,
        resolved,
    }
}
