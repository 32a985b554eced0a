//! Core types for embeddings

use serde::{Deserialize, Serialize};

use terminal_core::MarketDocument;

/// Embedding vector (dimension is fixed per provider)
pub type EmbeddingVector = Vec<f32>;

/// One nearest-neighbor result from a vector index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit<I> {
    /// Identifier supplied when the vector was inserted
    pub id: I,
    /// Distance from the query under the index metric (smaller is closer)
    pub distance: f32,
}

/// A document returned by the retrieval engine, in rank order
#[derive(Debug, Clone, Serialize)]
pub struct RetrievedDocument<D> {
    /// 1-based rank
    pub rank: usize,
    /// Distance from the query embedding
    pub distance: f32,
    pub document: D,
}

/// Anything with text that can be embedded and indexed
pub trait Embeddable {
    fn embedding_text(&self) -> &str;
}

impl Embeddable for String {
    fn embedding_text(&self) -> &str {
        self
    }
}

impl Embeddable for &str {
    fn embedding_text(&self) -> &str {
        self
    }
}

impl Embeddable for MarketDocument {
    fn embedding_text(&self) -> &str {
        &self.text
    }
}
