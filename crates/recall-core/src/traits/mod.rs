pub mod embedding;
pub mod parent_lookup;

pub use embedding::IEmbeddingModel;
pub use parent_lookup::IParentLookup;
