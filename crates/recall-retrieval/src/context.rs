//! Token-budgeted context assembly.
//!
//! Candidates are appended greedily, each as a block:
//!
//! ```text
//! [1] doc-id
//! source: handbook
//! <text>
//! ```
//!
//! Blocks are separated by a blank line. The running token estimate over
//! the whole assembled text must stay within budget; the first block that
//! would exceed it stops packing and marks the context as limited.

use recall_core::config::{defaults, RetrievalConfig};
use recall_core::models::{FusedResult, Metadata, ParentGroup};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

const BLOCK_SEPARATOR: &str = "\n\n";

/// `ceil(chars / 3.5 * 1.1)`, computed exactly as `ceil(chars * 11 / 35)`.
pub fn estimate_tokens(text: &str) -> usize {
    tokens_for_chars(text.chars().count())
}

fn tokens_for_chars(chars: usize) -> usize {
    (chars * 11).div_ceil(35)
}

/// Largest char count whose estimate stays within `tokens`.
fn chars_for_tokens(tokens: usize) -> usize {
    tokens * 35 / 11
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContextOptions {
    pub token_budget: usize,
    /// Metadata fields rendered under each block header, in this order.
    pub metadata_fields: Vec<String>,
    /// A grouped chunk estimated above this share of the remaining budget
    /// is split into pieces.
    pub split_threshold: f64,
    /// Overlap between consecutive pieces, as a share of piece length.
    pub split_overlap: f64,
}

impl Default for ContextOptions {
    fn default() -> Self {
        Self {
            token_budget: defaults::DEFAULT_TOKEN_BUDGET,
            metadata_fields: Vec::new(),
            split_threshold: defaults::DEFAULT_SPLIT_THRESHOLD,
            split_overlap: defaults::DEFAULT_SPLIT_OVERLAP,
        }
    }
}

impl From<&RetrievalConfig> for ContextOptions {
    fn from(config: &RetrievalConfig) -> Self {
        Self {
            token_budget: config.token_budget,
            metadata_fields: config.context_metadata_fields.clone(),
            split_threshold: config.split_threshold,
            split_overlap: config.split_overlap,
        }
    }
}

/// Packed context plus accounting.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AssembledContext {
    pub text: String,
    pub estimated_tokens: usize,
    pub token_budget: usize,
    /// Candidates (results or groups) offered.
    pub candidates: usize,
    /// Candidates with at least some text included.
    pub included: usize,
    /// Text pieces included: whole candidates or split chunk pieces.
    pub pieces: usize,
    /// Ids of included candidates (parent ids for groups).
    pub sources: Vec<String>,
    /// Something was left out for lack of budget.
    pub limited: bool,
}

/// Accumulates blocks under a token budget.
struct Packer {
    budget: usize,
    text: String,
    chars: usize,
}

#[derive(Clone, Copy)]
struct Checkpoint {
    bytes: usize,
    chars: usize,
}

impl Packer {
    fn new(budget: usize) -> Self {
        Self {
            budget,
            text: String::new(),
            chars: 0,
        }
    }

    fn tokens(&self) -> usize {
        tokens_for_chars(self.chars)
    }

    fn remaining(&self) -> usize {
        self.budget.saturating_sub(self.tokens())
    }

    /// Append `block` if the total estimate stays within budget.
    fn try_push(&mut self, block: &str) -> bool {
        let separator = if self.text.is_empty() { 0 } else { BLOCK_SEPARATOR.len() };
        let total = self.chars + separator + block.chars().count();
        if tokens_for_chars(total) > self.budget {
            return false;
        }
        if separator > 0 {
            self.text.push_str(BLOCK_SEPARATOR);
        }
        self.text.push_str(block);
        self.chars = total;
        true
    }

    fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            bytes: self.text.len(),
            chars: self.chars,
        }
    }

    fn rollback(&mut self, to: Checkpoint) {
        self.text.truncate(to.bytes);
        self.chars = to.chars;
    }
}

/// Packs fused results or parent groups into a bounded context.
#[derive(Debug, Clone, Default)]
pub struct ContextAssembler {
    options: ContextOptions,
}

impl ContextAssembler {
    pub fn new(options: ContextOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ContextOptions {
        &self.options
    }

    /// Greedy packing of flat results, in the given order.
    pub fn assemble(&self, candidates: &[FusedResult]) -> AssembledContext {
        let mut packer = Packer::new(self.options.token_budget);
        let mut out = AssembledContext {
            token_budget: self.options.token_budget,
            candidates: candidates.len(),
            ..Default::default()
        };

        for candidate in candidates {
            let mut block = self.header(out.included + 1, &candidate.id, &candidate.metadata);
            block.push('\n');
            block.push_str(&candidate.text);
            if !packer.try_push(&block) {
                out.limited = true;
                break;
            }
            out.included += 1;
            out.pieces += 1;
            out.sources.push(candidate.id.clone());
        }

        self.finish(packer, out)
    }

    /// Packing of parent groups. Each group contributes a header and its
    /// retained chunks in reading order. A chunk estimated above
    /// `split_threshold` of the remaining budget is split into overlapping
    /// pieces; only the pieces that fit are kept.
    pub fn assemble_groups(&self, groups: &[ParentGroup]) -> AssembledContext {
        let mut packer = Packer::new(self.options.token_budget);
        let mut out = AssembledContext {
            token_budget: self.options.token_budget,
            candidates: groups.len(),
            ..Default::default()
        };

        'groups: for group in groups {
            let before_group = packer.checkpoint();
            let header = self.header(out.included + 1, &group.parent_id, &group.metadata);
            if !packer.try_push(&header) {
                out.limited = true;
                break;
            }

            let mut pieces = 0usize;
            let mut exhausted = false;
            for chunk in &group.chunks {
                let remaining = packer.remaining();
                let share = self.options.split_threshold * remaining as f64;

                if estimate_tokens(&chunk.text) as f64 > share {
                    let piece_chars = chars_for_tokens(share.floor() as usize);
                    if piece_chars == 0 {
                        exhausted = true;
                        break;
                    }
                    let overlap = (piece_chars as f64 * self.options.split_overlap).floor() as usize;
                    for piece in split_with_overlap(&chunk.text, piece_chars, overlap) {
                        if !packer.try_push(&piece) {
                            exhausted = true;
                            break;
                        }
                        pieces += 1;
                    }
                    if exhausted {
                        break;
                    }
                } else if packer.try_push(&chunk.text) {
                    pieces += 1;
                } else {
                    exhausted = true;
                    break;
                }
            }

            if pieces == 0 {
                // Header alone carries no evidence.
                packer.rollback(before_group);
            } else {
                out.included += 1;
                out.pieces += pieces;
                out.sources.push(group.parent_id.clone());
            }
            if exhausted {
                out.limited = true;
                break 'groups;
            }
        }

        self.finish(packer, out)
    }

    fn header(&self, number: usize, id: &str, metadata: &Metadata) -> String {
        let mut header = format!("[{number}] {id}");
        for field in &self.options.metadata_fields {
            if let Some(value) = metadata.get(field) {
                header.push('\n');
                header.push_str(field);
                header.push_str(": ");
                match value {
                    Value::String(s) => header.push_str(s),
                    other => header.push_str(&other.to_string()),
                }
            }
        }
        header
    }

    fn finish(&self, packer: Packer, mut out: AssembledContext) -> AssembledContext {
        out.estimated_tokens = packer.tokens();
        out.text = packer.text;
        debug!(
            included = out.included,
            candidates = out.candidates,
            tokens = out.estimated_tokens,
            budget = out.token_budget,
            limited = out.limited,
            "context assembled"
        );
        out
    }
}

/// Pack `candidates` into `token_budget` with default formatting.
pub fn assemble_context(candidates: &[FusedResult], token_budget: usize) -> AssembledContext {
    ContextAssembler::new(ContextOptions {
        token_budget,
        ..Default::default()
    })
    .assemble(candidates)
}

/// Split into windows of `piece_chars` characters, each starting `overlap`
/// characters before the previous one ended.
fn split_with_overlap(text: &str, piece_chars: usize, overlap: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let step = piece_chars.saturating_sub(overlap).max(1);
    let mut pieces = Vec::new();
    let mut start = 0;
    while start < chars.len() {
        let end = (start + piece_chars).min(chars.len());
        pieces.push(chars[start..end].iter().collect());
        if end == chars.len() {
            break;
        }
        start += step;
    }
    pieces
}
