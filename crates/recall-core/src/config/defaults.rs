// Single source of truth for all default values.

// --- Embeddings ---
pub const DEFAULT_EMBEDDING_DIMENSIONS: usize = 384;
pub const DEFAULT_EMBEDDING_BATCH_SIZE: usize = 32;
pub const DEFAULT_MAX_LENGTH: usize = 512;
pub const DEFAULT_CACHE_CAPACITY: usize = 10_000;
pub const DEFAULT_BATCH_TIMEOUT_MS: u64 = 45_000;
pub const DEFAULT_MAX_ATTEMPTS: u32 = 2;
pub const DEFAULT_POOLING: &str = "mean";
pub const DEFAULT_NORMALIZE: bool = true;
pub const DEFAULT_QUERY_PREFIX: &str = "query: ";
pub const DEFAULT_PASSAGE_PREFIX: &str = "passage: ";

// --- BM25 ---
pub const DEFAULT_BM25_K1: f32 = 1.5;
pub const DEFAULT_BM25_B: f32 = 0.75;

// --- Retrieval ---
pub const DEFAULT_VECTOR_WEIGHT: f64 = 0.5;
pub const DEFAULT_RRF_K: u32 = 60;
pub const DEFAULT_TOP_K: usize = 5;
pub const DEFAULT_RETRIEVAL_K: usize = 20;
pub const DEFAULT_MAX_CHUNKS_PER_PARENT: usize = 3;
pub const DEFAULT_SIMILARITY_THRESHOLD: f32 = 0.0;
pub const DEFAULT_TOKEN_BUDGET: usize = 2_000;
pub const DEFAULT_GROUP_BY_PARENT: bool = false;
pub const DEFAULT_SPLIT_THRESHOLD: f64 = 0.30;
pub const DEFAULT_SPLIT_OVERLAP: f64 = 0.15;
