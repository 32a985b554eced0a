//! Embedding and Semantic Retrieval for Prediction Markets
//!
//! This crate turns deduplicated market listings into vectors, indexes them,
//! and answers free-text queries with the closest listings.
//!
//! ## Features
//! - Pluggable embedding providers (OpenAI, offline feature hashing)
//! - Euclidean and cosine distance metrics
//! - Exact k-nearest-neighbor index with stable tie-breaking
//! - Retrieval engine mapping neighbors back to the original listings

pub mod client;
pub mod error;
pub mod hashing;
pub mod index;
pub mod provider;
pub mod retrieval;
pub mod similarity;
pub mod types;

pub use client::EmbeddingClient;
pub use error::{EmbeddingError, Result};
pub use hashing::{HashingEmbedder, DEFAULT_HASHING_DIMENSION};
pub use index::VectorIndex;
pub use provider::EmbeddingProvider;
pub use retrieval::{RetrievalConfig, RetrievalEngine};
pub use similarity::{cosine_similarity, euclidean_distance, DistanceMetric};
pub use types::{Embeddable, EmbeddingVector, RetrievedDocument, SearchHit};
