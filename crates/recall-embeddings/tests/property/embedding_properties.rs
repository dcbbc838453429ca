//! Property tests for batching and token estimation.

use proptest::prelude::*;
use recall_embeddings::batching::{by_token_budget, estimate_tokens, BatchItem};

fn items(texts: &[String]) -> Vec<BatchItem> {
    texts
        .iter()
        .enumerate()
        .map(|(index, text)| BatchItem {
            index,
            normalized: text.clone(),
            prepared: text.clone(),
            cache_key: format!("k{index}"),
            estimated_tokens: None,
        })
        .collect()
}

proptest! {
    #[test]
    fn token_batches_respect_budget(
        texts in prop::collection::vec("[a-z ]{1,300}", 1..40),
        budget in 1usize..200,
    ) {
        let batches = by_token_budget(items(&texts), budget, 512);
        for batch in &batches {
            let total: usize = batch.iter().map(|i| i.estimated_tokens.unwrap_or(0)).sum();
            prop_assert!(total <= budget || batch.len() == 1,
                "batch of {} items totals {} > budget {}", batch.len(), total, budget);
        }
    }

    #[test]
    fn token_batches_keep_every_item_in_order(
        texts in prop::collection::vec("[a-z ]{1,120}", 0..40),
        budget in 1usize..100,
    ) {
        let batches = by_token_budget(items(&texts), budget, 512);
        let order: Vec<usize> = batches.iter().flatten().map(|i| i.index).collect();
        prop_assert_eq!(order, (0..texts.len()).collect::<Vec<_>>());
    }

    #[test]
    fn token_estimate_never_exceeds_max_length(text in ".{0,2000}", max_length in 1usize..1024) {
        prop_assert!(estimate_tokens(&text, max_length) <= max_length);
    }
}
