/// Recall system version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Current on-disk vector snapshot format version.
pub const SNAPSHOT_FORMAT_VERSION: u32 = 2;

/// Lower clamp for stored row norms so zero vectors never divide by zero.
pub const NORM_EPSILON: f32 = 1e-12;

/// Texts shorter than this (in chars) use the chars-only token estimate.
pub const SHORT_TEXT_CHARS: usize = 100;

/// Metadata key holding a chunk's parent document id.
pub const PARENT_ID_KEY: &str = "parent_id";

/// Metadata key holding a chunk's position within its parent.
pub const CHUNK_INDEX_KEY: &str = "chunk_index";
