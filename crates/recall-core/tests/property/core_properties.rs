//! Property tests for text normalization and cache keys.

use proptest::prelude::*;
use recall_core::models::RetrievalMode;
use recall_core::text::{cache_key, is_blank, normalize};

fn words() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-z0-9]{1,8}", 1..10)
}

proptest! {
    #[test]
    fn normalize_is_idempotent(text in any::<String>()) {
        let once = normalize(&text);
        prop_assert_eq!(normalize(&once), once);
    }

    #[test]
    fn blank_exactly_when_nothing_survives_normalization(text in any::<String>()) {
        prop_assert_eq!(is_blank(&text), normalize(&text).is_empty());
    }

    #[test]
    fn cache_key_ignores_whitespace_layout(
        words in words(),
        separator in "[ \t\n]{1,4}",
        lead in "[ \t\n]{0,3}",
        trail in "[ \t\n]{0,3}",
    ) {
        let plain = words.join(" ");
        let spaced = format!("{lead}{}{trail}", words.join(&separator));
        prop_assert_eq!(
            cache_key(RetrievalMode::Passage, &normalize(&plain)),
            cache_key(RetrievalMode::Passage, &normalize(&spaced))
        );
    }

    #[test]
    fn cache_key_separates_modes(words in words()) {
        let text = normalize(&words.join(" "));
        prop_assert_ne!(
            cache_key(RetrievalMode::Query, &text),
            cache_key(RetrievalMode::Passage, &text)
        );
    }
}
