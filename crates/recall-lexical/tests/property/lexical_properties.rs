//! Property tests for BM25 search.

use std::collections::HashSet;

use proptest::prelude::*;
use recall_lexical::{tokenize, Bm25Index};

const VOCAB: &[&str] = &[
    "apple", "banana", "cherry", "delta", "echo", "fox", "golf", "hotel", "india", "juliet",
];

fn document() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(VOCAB), 0..12).prop_map(|w| w.join(" "))
}

proptest! {
    #[test]
    fn documents_without_query_terms_never_match(
        docs in prop::collection::vec(document(), 1..20),
        query in document(),
    ) {
        let ids: Vec<String> = (0..docs.len()).map(|i| format!("d{i}")).collect();
        let index = Bm25Index::default();
        index.build(&docs, &ids).unwrap();

        let query_terms: HashSet<String> = tokenize(&query).into_iter().collect();
        for hit in index.search(&query, 0) {
            let doc_terms: HashSet<String> = tokenize(&docs[hit.doc_index]).into_iter().collect();
            prop_assert!(!doc_terms.is_disjoint(&query_terms),
                "doc {} shares no term with query {:?}", hit.doc_index, query);
            prop_assert!(hit.score > 0.0);
        }
    }

    #[test]
    fn results_sorted_descending_with_index_tiebreak(
        docs in prop::collection::vec(document(), 1..20),
        query in document(),
    ) {
        let ids: Vec<String> = (0..docs.len()).map(|i| format!("d{i}")).collect();
        let index = Bm25Index::default();
        index.build(&docs, &ids).unwrap();

        let hits = index.search(&query, 0);
        for pair in hits.windows(2) {
            let order = pair[0].score.total_cmp(&pair[1].score);
            prop_assert!(order.is_gt() || (order.is_eq() && pair[0].doc_index < pair[1].doc_index));
        }
    }
}
