//! Text canonicalization and cache-key derivation.
//!
//! Two inputs that differ only in surrounding or repeated whitespace (or
//! stray control characters) normalize to the same string and therefore
//! share an embedding cache entry.

use crate::models::RetrievalMode;

/// Canonicalize text: drop control characters, collapse whitespace runs to a
/// single space, and trim both ends.
pub fn normalize(text: &str) -> String {
    text.split_whitespace()
        .map(|word| word.chars().filter(|c| !c.is_control()).collect::<String>())
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Whether the text has no embeddable content once normalized.
pub fn is_blank(text: &str) -> bool {
    text.chars().all(|c| c.is_whitespace() || c.is_control())
}

/// Stable cache key for `(mode, normalized text)`.
///
/// `normalized` must already have gone through [`normalize`].
pub fn cache_key(mode: RetrievalMode, normalized: &str) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(mode.as_str().as_bytes());
    hasher.update(&[0x1f]);
    hasher.update(normalized.as_bytes());
    hasher.finalize().to_hex().to_string()
}
