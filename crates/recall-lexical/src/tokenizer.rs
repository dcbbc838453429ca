//! BM25 tokenizer.
//!
//! Lowercases, replaces every character that is neither a word character
//! nor whitespace with a space, then splits on whitespace. Stop words are
//! kept.

use std::sync::LazyLock;

use regex::Regex;

static NON_WORD: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"[^\w\s]").ok());

/// Split `text` into lowercase terms.
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    let cleaned = match NON_WORD.as_ref() {
        Some(re) => re.replace_all(&lowered, " ").into_owned(),
        None => lowered
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '_' || c.is_whitespace() { c } else { ' ' })
            .collect(),
    };
    cleaned.split_whitespace().map(str::to_string).collect()
}
