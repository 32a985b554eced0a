//! Embedding provider capability

use async_trait::async_trait;

use crate::{error::Result, types::EmbeddingVector};

/// Maps text to fixed-dimension vectors.
///
/// Implementations must return exactly one vector per input text, all of
/// [`dimension`](Self::dimension) length, and must be deterministic for equal
/// input within one instance. Calls may be slow and are not assumed to be
/// re-entrant: batch texts into one call instead of issuing calls in parallel.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Model identifier, for logging
    fn model(&self) -> &str;

    /// Length of every vector this provider produces
    fn dimension(&self) -> usize;

    /// Embed a batch of texts, one vector per text in input order
    async fn embed(&self, texts: &[String]) -> Result<Vec<EmbeddingVector>>;

    /// Embed a single text
    async fn embed_one(&self, text: &str) -> Result<EmbeddingVector> {
        let mut vectors = self.embed(&[text.to_string()]).await?;
        match vectors.pop() {
            Some(vector) if vectors.is_empty() => Ok(vector),
            _ => Err(crate::error::EmbeddingError::provider(
                "Provider did not return exactly one embedding for a single text",
            )),
        }
    }
}

#[async_trait]
impl<P: EmbeddingProvider + ?Sized> EmbeddingProvider for Box<P> {
    fn model(&self) -> &str {
        (**self).model()
    }

    fn dimension(&self) -> usize {
        (**self).dimension()
    }

    async fn embed(&self, texts: &[String]) -> Result<Vec<EmbeddingVector>> {
        (**self).embed(texts).await
    }
}
