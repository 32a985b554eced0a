//! Error types for embedding and retrieval operations

use thiserror::Error;

pub type Result<T> = std::result::Result<T, EmbeddingError>;

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("OpenAI API error: {0}")]
    OpenAI(#[from] async_openai::error::OpenAIError),

    #[error("Embedding provider failure: {0}")]
    Provider(String),

    #[error("Invalid embedding dimension: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Mismatched index input: {vectors} vectors but {identifiers} identifiers")]
    CountMismatch { vectors: usize, identifiers: usize },

    #[error("Invalid k: {0} (must be at least 1)")]
    InvalidK(usize),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl EmbeddingError {
    pub fn provider(msg: impl Into<String>) -> Self {
        EmbeddingError::Provider(msg.into())
    }

    /// Whether the failure came from the embedding backend rather than the index
    pub fn is_provider_failure(&self) -> bool {
        matches!(self, EmbeddingError::OpenAI(_) | EmbeddingError::Provider(_))
    }
}
