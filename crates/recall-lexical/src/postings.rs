//! Inverted index snapshot for one corpus.

use std::collections::HashMap;

use recall_core::errors::{RecallResult, ValidationError};
use serde::{Deserialize, Serialize};

use crate::tokenizer::tokenize;

/// One document's entry in a term's postings list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Posting {
    pub doc_index: usize,
    pub term_frequency: u32,
}

/// Postings, document lengths, and ids for a whole corpus. Immutable once
/// built; a rebuild produces a new snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Bm25Snapshot {
    /// term → postings in ascending `doc_index` order
    postings: HashMap<String, Vec<Posting>>,
    doc_lengths: Vec<u32>,
    ids: Vec<String>,
    avgdl: f32,
}

impl Bm25Snapshot {
    /// Tokenize and index `documents`. `ids[i]` names `documents[i]`.
    pub fn build(documents: &[String], ids: &[String]) -> RecallResult<Self> {
        if documents.len() != ids.len() {
            return Err(ValidationError::LengthMismatch {
                left: "documents",
                left_len: documents.len(),
                right: "ids",
                right_len: ids.len(),
            }
            .into());
        }
        if documents.is_empty() {
            return Err(ValidationError::EmptyCorpus.into());
        }

        let mut postings: HashMap<String, Vec<Posting>> = HashMap::new();
        let mut doc_lengths = Vec::with_capacity(documents.len());
        let mut total_length: u64 = 0;

        for (doc_index, text) in documents.iter().enumerate() {
            let tokens = tokenize(text);
            doc_lengths.push(tokens.len() as u32);
            total_length += tokens.len() as u64;

            let mut tf: HashMap<String, u32> = HashMap::new();
            for token in tokens {
                *tf.entry(token).or_insert(0) += 1;
            }
            // Documents are visited in order, so each list stays sorted.
            for (term, term_frequency) in tf {
                postings.entry(term).or_default().push(Posting {
                    doc_index,
                    term_frequency,
                });
            }
        }

        let avgdl = (total_length as f32 / documents.len() as f32).max(1.0);

        Ok(Self {
            postings,
            doc_lengths,
            ids: ids.to_vec(),
            avgdl,
        })
    }

    pub fn postings(&self, term: &str) -> Option<&[Posting]> {
        self.postings.get(term).map(Vec::as_slice)
    }

    pub fn doc_length(&self, doc_index: usize) -> u32 {
        self.doc_lengths.get(doc_index).copied().unwrap_or(0)
    }

    pub fn doc_count(&self) -> usize {
        self.ids.len()
    }

    pub fn vocabulary_size(&self) -> usize {
        self.postings.len()
    }

    /// Average document length, never below 1.
    pub fn avgdl(&self) -> f32 {
        self.avgdl
    }

    pub fn id(&self, doc_index: usize) -> Option<&str> {
        self.ids.get(doc_index).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
