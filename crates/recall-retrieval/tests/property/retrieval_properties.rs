//! Property tests for fusion, grouping, and context packing.

use proptest::prelude::*;
use recall_core::models::{FusedResult, Metadata, SearchHit};
use recall_retrieval::context::estimate_tokens;
use recall_retrieval::fusion::{bm25_contribution, vector_contribution};
use recall_retrieval::{assemble_context, fuse, group_by_parent, FusionOptions};
use serde_json::json;

fn hits(prefix: &str, n: usize) -> Vec<SearchHit> {
    (0..n)
        .map(|rank| SearchHit {
            id: format!("{prefix}{rank}"),
            score: 1.0 / (rank as f32 + 1.0),
            rank,
            text: format!("text of {prefix}{rank}"),
            metadata: Metadata::new(),
        })
        .collect()
}

fn chunk(id: usize, parent: usize, score: f64, text: String) -> FusedResult {
    let mut metadata = Metadata::new();
    metadata.insert("parent_id".into(), json!(format!("p{parent}")));
    metadata.insert("chunk_index".into(), json!(id));
    FusedResult {
        id: format!("c{id}"),
        score,
        vector_rank: Some(id),
        vector_score: None,
        bm25_rank: None,
        bm25_score: None,
        metadata,
        text,
    }
}

proptest! {
    #[test]
    fn contributions_move_with_the_weight(
        w1 in 0.0f64..1.0,
        w2 in 0.0f64..1.0,
        k in 1u32..200,
        rank in 0usize..100,
    ) {
        let (lo, hi) = if w1 <= w2 { (w1, w2) } else { (w2, w1) };
        prop_assert!(vector_contribution(lo, k, rank) <= vector_contribution(hi, k, rank));
        prop_assert!(bm25_contribution(lo, k, rank) >= bm25_contribution(hi, k, rank));
    }

    #[test]
    fn vector_only_item_gains_with_vector_weight(
        w1 in 0.01f64..0.99,
        w2 in 0.01f64..0.99,
        n_vec in 1usize..20,
        n_bm25 in 1usize..20,
    ) {
        let (lo, hi) = if w1 <= w2 { (w1, w2) } else { (w2, w1) };
        let vector = hits("v", n_vec);
        let bm25 = hits("b", n_bm25);
        let score_at = |w: f64| {
            fuse(&vector, &bm25, FusionOptions { k: 60, vector_weight: w, top_k: 0 })
                .into_iter()
                .find(|r| r.id == "v0")
                .map(|r| r.score)
                .unwrap_or(0.0)
        };
        prop_assert!(score_at(lo) <= score_at(hi));
    }

    #[test]
    fn fused_results_are_sorted_and_bounded(
        w in 0.01f64..0.99,
        n_vec in 0usize..30,
        n_bm25 in 0usize..30,
        top_k in 1usize..25,
    ) {
        let fused = fuse(&hits("v", n_vec), &hits("b", n_bm25), FusionOptions { k: 60, vector_weight: w, top_k });
        prop_assert!(fused.len() <= top_k);
        prop_assert!(fused.windows(2).all(|p| p[0].score >= p[1].score));
    }

    #[test]
    fn groups_respect_both_limits(
        parents in prop::collection::vec(0usize..6, 1..40),
        top_k in 1usize..6,
        max_chunks in 1usize..4,
    ) {
        let results: Vec<FusedResult> = parents
            .iter()
            .enumerate()
            .map(|(i, &p)| chunk(i, p, 1.0 / (i as f64 + 1.0), format!("chunk {i}")))
            .collect();
        let groups = group_by_parent(&results, top_k, max_chunks, None);
        prop_assert!(groups.len() <= top_k);
        for group in &groups {
            prop_assert!(!group.chunks.is_empty());
            prop_assert!(group.chunks.len() <= max_chunks);
            prop_assert!(group.chunks.iter().all(|c| c.parent_id() == Some(group.parent_id.as_str())));
        }
        prop_assert!(groups.windows(2).all(|p| p[0].max_score >= p[1].max_score));
    }

    #[test]
    fn context_never_exceeds_its_budget(
        texts in prop::collection::vec("[a-z ]{0,200}", 0..15),
        budget in 0usize..400,
    ) {
        let candidates: Vec<FusedResult> = texts
            .into_iter()
            .enumerate()
            .map(|(i, text)| chunk(i, i, 1.0, text))
            .collect();
        let ctx = assemble_context(&candidates, budget);
        prop_assert!(ctx.estimated_tokens <= budget);
        prop_assert_eq!(ctx.estimated_tokens, estimate_tokens(&ctx.text));
        prop_assert_eq!(ctx.limited, ctx.included < candidates.len());
    }
}
