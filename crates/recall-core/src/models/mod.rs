pub mod document;
pub mod embed_params;
pub mod fused_result;
pub mod mode;
pub mod parent_group;
pub mod search_hit;

pub use document::{Document, Metadata, ParentDocument};
pub use embed_params::EmbedParams;
pub use fused_result::FusedResult;
pub use mode::RetrievalMode;
pub use parent_group::ParentGroup;
pub use search_hit::SearchHit;
