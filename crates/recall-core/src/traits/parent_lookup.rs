use std::collections::HashMap;

use crate::models::ParentDocument;

/// Resolves a parent document for grouped chunk results.
pub trait IParentLookup: Send + Sync {
    /// Full parent record, or `None` if it is not available.
    fn lookup(&self, parent_id: &str) -> Option<ParentDocument>;
}

impl IParentLookup for HashMap<String, ParentDocument> {
    fn lookup(&self, parent_id: &str) -> Option<ParentDocument> {
        self.get(parent_id).cloned()
    }
}
