pub mod bm25_config;
pub mod defaults;
pub mod embedding_config;
pub mod retrieval_config;
pub mod vector_config;

use std::path::Path;

use serde::{Deserialize, Serialize};

pub use bm25_config::Bm25Config;
pub use embedding_config::{BatchingMode, EmbeddingConfig};
pub use retrieval_config::RetrievalConfig;
pub use vector_config::{LegacyDimensionPolicy, VectorStoreConfig};

use crate::errors::{ConfigError, RecallResult, ValidationError};

/// Top-level configuration, one section per subsystem.
///
/// Every field has a default, so a TOML file only needs the keys it
/// overrides:
///
/// ```toml
/// [embedding]
/// dimensions = 768
/// batching = "token_budget"
/// tokens_per_batch = 4096
///
/// [vector]
/// dimension = 768
///
/// [retrieval]
/// vector_weight = 0.7
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RecallConfig {
    pub embedding: EmbeddingConfig,
    pub vector: VectorStoreConfig,
    pub bm25: Bm25Config,
    pub retrieval: RetrievalConfig,
}

impl RecallConfig {
    /// Parse a config from a TOML string.
    pub fn from_toml(input: &str) -> RecallResult<Self> {
        let config: Self = toml::from_str(input).map_err(|e| ConfigError::Parse {
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a config file.
    pub fn load(path: impl AsRef<Path>) -> RecallResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml(&raw)
    }

    /// Reject settings the engine cannot run with.
    pub fn validate(&self) -> RecallResult<()> {
        let invalid = |reason: &str| -> RecallResult<()> {
            Err(ValidationError::InvalidConfig {
                reason: reason.to_string(),
            }
            .into())
        };

        if self.embedding.dimensions == 0 {
            return invalid("embedding.dimensions must be > 0");
        }
        if self.embedding.batch_size == 0 {
            return invalid("embedding.batch_size must be > 0");
        }
        if self.embedding.max_attempts == 0 {
            return invalid("embedding.max_attempts must be >= 1");
        }
        if self.embedding.batching == BatchingMode::TokenBudget
            && self.embedding.tokens_per_batch.unwrap_or(0) == 0
        {
            return invalid("embedding.tokens_per_batch is required for token_budget batching");
        }
        if self.vector.dimension != self.embedding.dimensions {
            return invalid("vector.dimension must equal embedding.dimensions");
        }
        if !(0.0..=1.0).contains(&self.bm25.b) || self.bm25.k1 < 0.0 {
            return invalid("bm25.k1 must be >= 0 and bm25.b within [0, 1]");
        }
        if !(0.0..1.0).contains(&self.retrieval.split_overlap) {
            return invalid("retrieval.split_overlap must be within [0, 1)");
        }
        if self.retrieval.split_threshold <= 0.0 || self.retrieval.split_threshold > 1.0 {
            return invalid("retrieval.split_threshold must be within (0, 1]");
        }
        Ok(())
    }
}
