use serde::{Deserialize, Serialize};

use crate::config::EmbeddingConfig;

/// Parameters forwarded with every batch to the embedding executor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedParams {
    pub max_length: usize,
    pub pooling: String,
    pub normalize: bool,
}

impl From<&EmbeddingConfig> for EmbedParams {
    fn from(config: &EmbeddingConfig) -> Self {
        Self {
            max_length: config.max_length,
            pooling: config.pooling.clone(),
            normalize: config.normalize,
        }
    }
}
