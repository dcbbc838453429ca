//! Feature-hashing embedding model.
//!
//! Deterministic dense vectors from hashed term frequencies. No model files,
//! no network; good enough for tests and offline indexing where lexical
//! overlap is an acceptable proxy for similarity.

use std::collections::HashMap;

use recall_core::errors::RecallResult;
use recall_core::models::EmbedParams;
use recall_core::traits::IEmbeddingModel;

/// Hashes terms into `dimensions` buckets weighted by term frequency.
#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dimensions: usize,
}

impl HashingEmbedder {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions: dimensions.max(1),
        }
    }

    /// FNV-1a bucket for a term.
    fn bucket(term: &str, dims: usize) -> usize {
        let mut h: u64 = 0xcbf29ce484222325;
        for b in term.as_bytes() {
            h ^= *b as u64;
            h = h.wrapping_mul(0x100000001b3);
        }
        (h % dims as u64) as usize
    }

    fn terms(text: &str) -> Vec<String> {
        text.split(|c: char| !c.is_alphanumeric() && c != '_')
            .filter(|s| !s.is_empty())
            .map(|s| s.to_lowercase())
            .collect()
    }

    fn vectorize(&self, text: &str, params: &EmbedParams) -> Vec<f32> {
        let mut terms = Self::terms(text);
        terms.truncate(params.max_length.max(1));
        let mut vector = vec![0.0f32; self.dimensions];
        if terms.is_empty() {
            return vector;
        }

        let mut tf: HashMap<&str, f32> = HashMap::new();
        for term in &terms {
            *tf.entry(term.as_str()).or_default() += 1.0;
        }

        let total = terms.len() as f32;
        for (term, count) in tf {
            // Longer terms carry more signal than short function words.
            let weight = 1.0 + (term.len() as f32).ln();
            vector[Self::bucket(term, self.dimensions)] += (count / total) * weight;
        }

        if params.normalize {
            let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
            if norm > f32::EPSILON {
                vector.iter_mut().for_each(|v| *v /= norm);
            }
        }
        vector
    }
}

impl IEmbeddingModel for HashingEmbedder {
    fn embed_batch(&self, texts: &[String], params: &EmbedParams) -> RecallResult<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.vectorize(t, params)).collect())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        "hashing-embedder"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(normalize: bool) -> EmbedParams {
        EmbedParams {
            max_length: 512,
            pooling: "mean".to_string(),
            normalize,
        }
    }

    fn embed_one(model: &HashingEmbedder, text: &str, normalize: bool) -> Vec<f32> {
        model
            .embed_batch(&[text.to_string()], &params(normalize))
            .unwrap()
            .remove(0)
    }

    #[test]
    fn empty_text_is_zero_vector() {
        let model = HashingEmbedder::new(64);
        let v = embed_one(&model, "", true);
        assert_eq!(v.len(), 64);
        assert!(v.iter().all(|&x| x == 0.0));
    }

    #[test]
    fn normalized_output_has_unit_norm() {
        let model = HashingEmbedder::new(256);
        let v = embed_one(&model, "rust systems programming language", true);
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5, "expected unit norm, got {norm}");
    }

    #[test]
    fn raw_output_is_not_rescaled() {
        let model = HashingEmbedder::new(256);
        let v = embed_one(&model, "alpha", false);
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - (1.0 + 5f32.ln())).abs() < 1e-5);
    }

    #[test]
    fn deterministic_across_calls() {
        let model = HashingEmbedder::new(128);
        assert_eq!(
            embed_one(&model, "same input", true),
            embed_one(&model, "same input", true)
        );
    }

    #[test]
    fn batch_preserves_order() {
        let model = HashingEmbedder::new(128);
        let texts = vec!["first text".to_string(), "second".to_string()];
        let batch = model.embed_batch(&texts, &params(true)).unwrap();
        assert_eq!(batch[0], embed_one(&model, "first text", true));
        assert_eq!(batch[1], embed_one(&model, "second", true));
    }

    #[test]
    fn zero_dimensions_clamped_to_one() {
        assert_eq!(HashingEmbedder::new(0).dimensions(), 1);
    }
}
