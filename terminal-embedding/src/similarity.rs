//! Distance and similarity calculations

use std::fmt;
use std::str::FromStr;

use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};

/// Distance metric used by a vector index (smaller is closer)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceMetric {
    /// Straight-line (L2) distance
    #[default]
    Euclidean,
    /// `1 - cosine_similarity`, in the range 0.0 - 2.0
    Cosine,
}

impl DistanceMetric {
    /// Distance between two vectors of equal dimension.
    ///
    /// Callers validate dimensions first; the index never mixes lengths.
    pub fn distance(&self, a: &[f32], b: &[f32]) -> f32 {
        match self {
            DistanceMetric::Euclidean => euclidean_distance(a, b),
            DistanceMetric::Cosine => (1.0 - cosine_similarity(a, b)) as f32,
        }
    }
}

impl fmt::Display for DistanceMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DistanceMetric::Euclidean => write!(f, "euclidean"),
            DistanceMetric::Cosine => write!(f, "cosine"),
        }
    }
}

impl FromStr for DistanceMetric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "euclidean" | "l2" => Ok(DistanceMetric::Euclidean),
            "cosine" | "cos" => Ok(DistanceMetric::Cosine),
            _ => Err(format!("Unknown distance metric: {}", s)),
        }
    }
}

/// Euclidean (L2) distance between two embeddings
pub fn euclidean_distance(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len(), "Embeddings must have same dimension");

    let a_view = ArrayView1::from(a);
    let b_view = ArrayView1::from(b);
    let diff = &a_view - &b_view;
    diff.dot(&diff).sqrt()
}

/// Calculate cosine similarity between two embeddings
///
/// Returns a value between -1.0 (opposite) and 1.0 (identical direction)
///
/// Formula: cos(θ) = (A · B) / (||A|| ||B||)
/// where:
/// - A · B is the dot product
/// - ||A|| and ||B|| are the magnitudes (L2 norms)
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    debug_assert_eq!(a.len(), b.len(), "Embeddings must have same dimension");

    let a_view = ArrayView1::from(a);
    let b_view = ArrayView1::from(b);

    let dot_product = a_view.dot(&b_view);
    let norm_a = a_view.dot(&a_view).sqrt();
    let norm_b = b_view.dot(&b_view).sqrt();

    // Avoid division by zero
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    (dot_product / (norm_a * norm_b)) as f64
}

/// Scale a vector to unit length in place (zero vectors are left as-is)
pub fn l2_normalize(v: &mut [f32]) {
    let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > f32::EPSILON {
        v.iter_mut().for_each(|x| *x /= norm);
    }
}
