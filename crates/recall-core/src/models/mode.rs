use serde::{Deserialize, Serialize};

/// Which side of an asymmetric retrieval model a text is embedded for.
///
/// The mode is part of the cache key, so the same text embedded as a query
/// and as a passage occupies two cache entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetrievalMode {
    Query,
    #[default]
    Passage,
    /// No prefix; for symmetric models.
    Raw,
}

impl RetrievalMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RetrievalMode::Query => "query",
            RetrievalMode::Passage => "passage",
            RetrievalMode::Raw => "raw",
        }
    }
}

impl std::fmt::Display for RetrievalMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
