use serde::{Deserialize, Serialize};

/// Free-form metadata attached to documents and search results.
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// A unit of indexable text: a whole document or one of its chunks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub metadata: Metadata,
}

impl Document {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            metadata: Metadata::new(),
        }
    }

    /// Builder-style metadata insert.
    pub fn with_meta(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.metadata.insert(key.to_string(), value.into());
        self
    }
}

/// Full parent document resolved for a group of chunk hits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParentDocument {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub metadata: Metadata,
}
