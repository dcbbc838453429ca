//! Property tests for cosine similarity and exact search.

use proptest::prelude::*;
use recall_core::config::VectorStoreConfig;
use recall_core::models::Metadata;
use recall_vector::{cosine_similarity, SearchOptions, VectorStore};

fn vector(dim: usize) -> impl Strategy<Value = Vec<f32>> {
    prop::collection::vec(-100.0f32..100.0, dim)
}

proptest! {
    #[test]
    fn cosine_is_symmetric(a in vector(16), b in vector(16)) {
        prop_assert_eq!(cosine_similarity(&a, &b), cosine_similarity(&b, &a));
    }

    #[test]
    fn cosine_with_self_is_one(a in vector(16)) {
        prop_assume!(a.iter().any(|x| x.abs() > 1e-3));
        prop_assert!((cosine_similarity(&a, &a) - 1.0).abs() < 1e-4);
    }

    #[test]
    fn cosine_is_bounded(a in vector(8), b in vector(8)) {
        let s = cosine_similarity(&a, &b);
        prop_assert!((-1.0001..=1.0001).contains(&s));
    }

    #[test]
    fn search_results_are_sorted_and_bounded(
        rows in prop::collection::vec(vector(4), 1..30),
        query in vector(4),
        k in 0usize..40,
    ) {
        let store = VectorStore::new(VectorStoreConfig { dimension: 4, ..Default::default() });
        let ids: Vec<String> = (0..rows.len()).map(|i| format!("r{i}")).collect();
        store.build(&rows, &ids, &vec![Metadata::new(); rows.len()]).unwrap();

        let hits = store.search(&query, k, &SearchOptions::default()).unwrap();
        let expected_len = if k == 0 { rows.len() } else { k.min(rows.len()) };
        prop_assert_eq!(hits.len(), expected_len);
        for pair in hits.windows(2) {
            let order = pair[0].score.total_cmp(&pair[1].score);
            prop_assert!(order.is_gt() || (order.is_eq() && pair[0].index < pair[1].index));
        }
    }
}
