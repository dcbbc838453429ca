use crate::errors::RecallResult;
use crate::models::EmbedParams;

/// A model that turns a batch of prepared texts into vectors.
///
/// Implementations run synchronously; executors decide whether that happens
/// inline or on a worker.
pub trait IEmbeddingModel: Send + Sync {
    /// Embed a batch. Output must have one vector per input, in order.
    fn embed_batch(&self, texts: &[String], params: &EmbedParams) -> RecallResult<Vec<Vec<f32>>>;

    /// The dimensionality of vectors produced by this model.
    fn dimensions(&self) -> usize;

    /// Human-readable model name.
    fn name(&self) -> &str;
}
