//! OpenAI embedding client

use async_openai::{
    config::OpenAIConfig,
    types::embeddings::{CreateEmbeddingRequest, EmbeddingInput},
    Client,
};
use async_trait::async_trait;
use tracing::{debug, info, instrument};

use crate::{
    error::{EmbeddingError, Result},
    provider::EmbeddingProvider,
    types::EmbeddingVector,
};

const DEFAULT_MODEL: &str = "text-embedding-3-small";
const DEFAULT_DIMENSION: usize = 1536;

/// OpenAI embedding client
pub struct EmbeddingClient {
    client: Client<OpenAIConfig>,
    model: String,
    dimension: usize,
}

impl EmbeddingClient {
    /// Create a new embedding client
    ///
    /// Uses text-embedding-3-small model (1536 dimensions)
    pub fn new(api_key: String) -> Self {
        let config = OpenAIConfig::new().with_api_key(api_key);
        Self {
            client: Client::with_config(config),
            model: DEFAULT_MODEL.to_string(),
            dimension: DEFAULT_DIMENSION,
        }
    }

    /// Use a different embedding model with its output dimension
    pub fn with_model(mut self, model: &str, dimension: usize) -> Self {
        self.model = model.to_string();
        self.dimension = dimension;
        self
    }

    /// Low-level batch embedding generation
    #[instrument(skip(self, texts), fields(batch = texts.len()))]
    async fn generate_embeddings(&self, texts: &[String]) -> Result<Vec<EmbeddingVector>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let request = CreateEmbeddingRequest {
            model: self.model.clone(),
            input: EmbeddingInput::StringArray(texts.to_vec()),
            encoding_format: None,
            dimensions: None,
            user: None,
        };

        debug!("Requesting {} embeddings from {}", texts.len(), self.model);
        let response = self.client.embeddings().create(request).await?;

        if response.data.len() != texts.len() {
            return Err(EmbeddingError::provider(format!(
                "Expected {} embeddings from API, got {}",
                texts.len(),
                response.data.len()
            )));
        }

        // The API reports each vector's input position; do not rely on response order
        let mut data = response.data;
        data.sort_by_key(|d| d.index);

        let mut embeddings = Vec::with_capacity(data.len());
        for item in data {
            // Validate dimension
            if item.embedding.len() != self.dimension {
                return Err(EmbeddingError::DimensionMismatch {
                    expected: self.dimension,
                    actual: item.embedding.len(),
                });
            }
            embeddings.push(item.embedding);
        }

        info!(
            "Generated {} embeddings: dimension={}, model={}",
            embeddings.len(),
            self.dimension,
            self.model
        );

        Ok(embeddings)
    }
}

#[async_trait]
impl EmbeddingProvider for EmbeddingClient {
    fn model(&self) -> &str {
        &self.model
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed(&self, texts: &[String]) -> Result<Vec<EmbeddingVector>> {
        self.generate_embeddings(texts).await
    }
}
