//! Query-time retrieval over an embedded document set

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::{
    error::{EmbeddingError, Result},
    index::VectorIndex,
    provider::EmbeddingProvider,
    similarity::DistanceMetric,
    types::{Embeddable, RetrievedDocument},
};

/// Configuration for the retrieval engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Number of documents returned by [`RetrievalEngine::retrieve_top`]
    pub top_k: usize,
    /// Distance metric of the underlying index
    pub metric: DistanceMetric,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: 5,
            metric: DistanceMetric::Euclidean,
        }
    }
}

/// Embeds queries and resolves their nearest neighbors back to documents.
///
/// The index is built once and only read afterwards, so a built engine can
/// serve any number of queries. Rebuild a new engine to change the corpus.
pub struct RetrievalEngine<P, D> {
    provider: P,
    index: VectorIndex<usize>,
    documents: Vec<D>,
    config: RetrievalConfig,
}

impl<P, D> RetrievalEngine<P, D>
where
    P: EmbeddingProvider,
    D: Embeddable,
{
    /// Embed every document in a single provider call and index the result.
    ///
    /// Identifiers are document positions.
    #[instrument(skip_all, fields(documents = documents.len(), model = provider.model()))]
    pub async fn build(provider: P, documents: Vec<D>, config: RetrievalConfig) -> Result<Self> {
        let texts: Vec<String> = documents
            .iter()
            .map(|d| d.embedding_text().to_string())
            .collect();

        let vectors = if texts.is_empty() {
            Vec::new()
        } else {
            provider.embed(&texts).await?
        };
        if vectors.len() != texts.len() {
            return Err(EmbeddingError::provider(format!(
                "Provider returned {} embeddings for {} documents",
                vectors.len(),
                texts.len()
            )));
        }

        let ids: Vec<usize> = (0..documents.len()).collect();
        let index = VectorIndex::build_with_metric(vectors, ids, config.metric)?;

        info!(
            "Retrieval index ready: {} documents, dimension={:?}, metric={}",
            index.len(),
            index.dimension(),
            index.metric()
        );

        Ok(Self {
            provider,
            index,
            documents,
            config,
        })
    }

    /// Assemble an engine from a prebuilt index whose identifiers are positions in `documents`
    pub fn from_parts(
        provider: P,
        index: VectorIndex<usize>,
        documents: Vec<D>,
        config: RetrievalConfig,
    ) -> Self {
        Self {
            provider,
            index,
            documents,
            config,
        }
    }

    /// The `k` documents closest to `query`, best first.
    ///
    /// `k == 0` is rejected before the provider or the index is touched. Hits
    /// whose identifier has no document are skipped.
    #[instrument(skip(self))]
    pub async fn retrieve(&self, query: &str, k: usize) -> Result<Vec<RetrievedDocument<&D>>> {
        if k == 0 {
            return Err(EmbeddingError::InvalidK(k));
        }

        let query_vector = self.provider.embed_one(query).await?;
        let hits = self.index.search(&query_vector, k)?;
        debug!("Index returned {} hits", hits.len());

        let mut results = Vec::with_capacity(hits.len());
        for hit in hits {
            let Some(document) = self.documents.get(hit.id) else {
                warn!("No document for index identifier {}, skipping", hit.id);
                continue;
            };
            results.push(RetrievedDocument {
                rank: results.len() + 1,
                distance: hit.distance,
                document,
            });
        }

        Ok(results)
    }

    /// Retrieve with the configured `top_k`
    pub async fn retrieve_top(&self, query: &str) -> Result<Vec<RetrievedDocument<&D>>> {
        self.retrieve(query, self.config.top_k).await
    }

    /// Ranked document texts, ready to hand to an answer synthesizer
    pub async fn retrieve_texts(&self, query: &str, k: usize) -> Result<Vec<String>> {
        Ok(self
            .retrieve(query, k)
            .await?
            .into_iter()
            .map(|r| r.document.embedding_text().to_string())
            .collect())
    }
}

impl<P, D> RetrievalEngine<P, D> {
    pub fn documents(&self) -> &[D] {
        &self.documents
    }

    pub fn index(&self) -> &VectorIndex<usize> {
        &self.index
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn config(&self) -> &RetrievalConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}
