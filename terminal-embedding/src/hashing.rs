//! Offline feature-hashing embedder
//!
//! Produces bag-of-words vectors without any model download or network call.
//! Vectors are lexical rather than semantic, but they are stable across runs
//! and platforms, which is what the pipeline needs when no API key is set.

use std::hash::Hasher;

use async_trait::async_trait;
use fnv::FnvHasher;

use crate::{
    error::{EmbeddingError, Result},
    provider::EmbeddingProvider,
    similarity::l2_normalize,
    types::EmbeddingVector,
};

/// Same width as all-MiniLM-L6-v2, so indexes are interchangeable in size
pub const DEFAULT_HASHING_DIMENSION: usize = 384;

/// Deterministic token-hashing embedder
#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dimension: usize,
    model: String,
}

impl HashingEmbedder {
    pub fn new(dimension: usize) -> Result<Self> {
        if dimension == 0 {
            return Err(EmbeddingError::Config(
                "Hashing embedder dimension must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            dimension,
            model: format!("fnv-hashing-{}", dimension),
        })
    }

    /// Embed one text synchronously
    pub fn embed_text(&self, text: &str) -> EmbeddingVector {
        let mut vector = vec![0.0f32; self.dimension];

        for token in tokenize(text) {
            let mut hasher = FnvHasher::default();
            hasher.write(token.as_bytes());
            let hash = hasher.finish();

            let bucket = (hash % self.dimension as u64) as usize;
            // Top bit picks the sign so colliding tokens tend to cancel
            let sign = if hash >> 63 == 0 { 1.0 } else { -1.0 };
            vector[bucket] += sign;
        }

        l2_normalize(&mut vector);
        vector
    }
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self {
            dimension: DEFAULT_HASHING_DIMENSION,
            model: format!("fnv-hashing-{}", DEFAULT_HASHING_DIMENSION),
        }
    }
}

#[async_trait]
impl EmbeddingProvider for HashingEmbedder {
    fn model(&self) -> &str {
        &self.model
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed(&self, texts: &[String]) -> Result<Vec<EmbeddingVector>> {
        Ok(texts.iter().map(|t| self.embed_text(t)).collect())
    }
}

/// Lower-cased alphanumeric runs
fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
}
