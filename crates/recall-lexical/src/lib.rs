//! # recall-lexical
//!
//! BM25 Okapi search over an inverted index.
//!
//! - [`tokenizer`]: lowercase, punctuation to whitespace, split. No stop words.
//! - [`postings`]: immutable per-corpus snapshot (postings + lengths).
//! - [`scorer`]: BM25 accumulation over unique query terms.
//! - [`Bm25Index`]: owns the current snapshot and swaps it atomically.

pub mod index;
pub mod postings;
pub mod scorer;
pub mod tokenizer;

pub use index::Bm25Index;
pub use postings::{Bm25Snapshot, Posting};
pub use scorer::Bm25Match;
pub use tokenizer::tokenize;
