//! Cosine similarity.

use recall_core::constants::NORM_EPSILON;

/// L2 norm of `v`.
pub fn l2_norm(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum::<f32>().sqrt()
}

/// Row norm as stored in a snapshot: clamped so division never sees zero.
pub fn clamped_norm(v: &[f32]) -> f32 {
    l2_norm(v).max(NORM_EPSILON)
}

pub fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// `dot(a, b) / (‖a‖·‖b‖)`. Returns 0 when either vector has no magnitude
/// or the lengths differ.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }
    cosine_with_norms(a, l2_norm(a), b, l2_norm(b))
}

/// Cosine with precomputed norms.
pub fn cosine_with_norms(a: &[f32], norm_a: f32, b: &[f32], norm_b: f32) -> f32 {
    let denom = norm_a * norm_b;
    if denom <= 0.0 || !denom.is_finite() {
        return 0.0;
    }
    dot(a, b) / denom
}
