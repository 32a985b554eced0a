//! Exact nearest-neighbor vector index
//!
//! Vectors are stored contiguously and searched with a linear scan that keeps
//! the best `k` candidates in a bounded max-heap. The scan is exact, which is
//! what small listing corpora need; a graph index can replace it behind the
//! same `build`/`search` surface if the corpus grows.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use tracing::debug;

use crate::{
    error::{EmbeddingError, Result},
    similarity::DistanceMetric,
    types::{EmbeddingVector, SearchHit},
};

/// Append-only index of `(identifier, vector)` pairs
#[derive(Debug, Clone)]
pub struct VectorIndex<I> {
    metric: DistanceMetric,
    /// Fixed by the first vector (or up front via `with_dimension`)
    dimension: Option<usize>,
    ids: Vec<I>,
    /// Row-major storage, `ids.len() * dimension` values
    data: Vec<f32>,
}

impl<I: Clone> VectorIndex<I> {
    /// Create an empty index whose dimension is fixed by the first insertion
    pub fn new(metric: DistanceMetric) -> Self {
        Self {
            metric,
            dimension: None,
            ids: Vec::new(),
            data: Vec::new(),
        }
    }

    /// Create an empty index that only accepts vectors of `dimension` length
    pub fn with_dimension(dimension: usize, metric: DistanceMetric) -> Result<Self> {
        if dimension == 0 {
            return Err(EmbeddingError::Config(
                "Index dimension must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            dimension: Some(dimension),
            ..Self::new(metric)
        })
    }

    /// Build a Euclidean index from parallel vectors and identifiers
    pub fn build(vectors: Vec<EmbeddingVector>, ids: Vec<I>) -> Result<Self> {
        Self::build_with_metric(vectors, ids, DistanceMetric::Euclidean)
    }

    /// Build an index from parallel vectors and identifiers.
    ///
    /// Fails without building anything if the two lengths differ or the
    /// vectors do not all share one dimension.
    pub fn build_with_metric(
        vectors: Vec<EmbeddingVector>,
        ids: Vec<I>,
        metric: DistanceMetric,
    ) -> Result<Self> {
        if vectors.len() != ids.len() {
            return Err(EmbeddingError::CountMismatch {
                vectors: vectors.len(),
                identifiers: ids.len(),
            });
        }

        let mut index = match vectors.first() {
            Some(first) => Self::with_dimension(first.len(), metric)?,
            None => Self::new(metric),
        };
        for vector in &vectors {
            index.check_dimension(vector.len())?;
        }

        index.data.reserve(vectors.iter().map(Vec::len).sum());
        for vector in vectors {
            index.data.extend_from_slice(&vector);
        }
        index.ids = ids;

        debug!(
            "Built vector index: {} vectors, dimension={:?}, metric={}",
            index.len(),
            index.dimension,
            index.metric
        );
        Ok(index)
    }

    /// Append one vector. A rejected vector leaves the index unchanged.
    pub fn insert(&mut self, id: I, vector: &[f32]) -> Result<()> {
        match self.dimension {
            Some(_) => self.check_dimension(vector.len())?,
            None if vector.is_empty() => {
                return Err(EmbeddingError::Config(
                    "Cannot index an empty embedding vector".to_string(),
                ));
            }
            None => self.dimension = Some(vector.len()),
        }
        self.data.extend_from_slice(vector);
        self.ids.push(id);
        Ok(())
    }

    /// Up to `k` nearest entries, closest first.
    ///
    /// Equal distances are ordered by insertion, earliest first. An empty index
    /// yields no hits; `k == 0` and a query of the wrong dimension are errors.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<SearchHit<I>>> {
        if k == 0 {
            return Err(EmbeddingError::InvalidK(k));
        }
        if let Some(dimension) = self.dimension {
            self.check_dimension(query.len())?;
            if self.is_empty() {
                return Ok(Vec::new());
            }

            let mut best: BinaryHeap<Candidate> = BinaryHeap::with_capacity(k + 1);
            for (position, row) in self.data.chunks_exact(dimension).enumerate() {
                let candidate = Candidate {
                    distance: self.metric.distance(query, row),
                    position,
                };
                if best.len() < k {
                    best.push(candidate);
                } else if best.peek().is_some_and(|worst| candidate < *worst) {
                    best.pop();
                    best.push(candidate);
                }
            }

            debug!("Searched {} vectors, returning {}", self.len(), best.len());

            Ok(best
                .into_sorted_vec()
                .into_iter()
                .map(|c| SearchHit {
                    id: self.ids[c.position].clone(),
                    distance: c.distance,
                })
                .collect())
        } else {
            Ok(Vec::new())
        }
    }

    fn check_dimension(&self, actual: usize) -> Result<()> {
        match self.dimension {
            Some(expected) if expected != actual => {
                Err(EmbeddingError::DimensionMismatch { expected, actual })
            }
            _ => Ok(()),
        }
    }
}

impl<I> VectorIndex<I> {
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn dimension(&self) -> Option<usize> {
        self.dimension
    }

    pub fn metric(&self) -> DistanceMetric {
        self.metric
    }

    /// Identifiers in insertion order
    pub fn ids(&self) -> &[I] {
        &self.ids
    }
}

/// Heap entry ordered by distance, then insertion position
#[derive(Debug, Clone, Copy)]
struct Candidate {
    distance: f32,
    position: usize,
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.distance
            .total_cmp(&other.distance)
            .then(self.position.cmp(&other.position))
    }
}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> VectorIndex<&'static str> {
        VectorIndex::build(
            vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![0.9, 0.1]],
            vec!["east", "north", "mostly-east"],
        )
        .unwrap()
    }

    fn ids<I: Clone>(hits: &[SearchHit<I>]) -> Vec<I> {
        hits.iter().map(|h| h.id.clone()).collect()
    }

    #[test]
    fn test_knn_order() {
        let hits = sample().search(&[1.0, 0.0], 2).unwrap();
        assert_eq!(ids(&hits), vec!["east", "mostly-east"]);
        assert_eq!(hits[0].distance, 0.0);
        assert!(hits[1].distance < 1.0);
    }

    #[test]
    fn test_k_larger_than_index() {
        let index = VectorIndex::build(vec![vec![0.0, 0.0], vec![1.0, 1.0]], vec![1, 2]).unwrap();
        let hits = index.search(&[0.0, 0.0], 5).unwrap();
        assert_eq!(ids(&hits), vec![1, 2]);
    }

    #[test]
    fn test_empty_index_returns_nothing() {
        let index: VectorIndex<usize> = VectorIndex::build(Vec::new(), Vec::new()).unwrap();
        assert!(index.is_empty());
        assert_eq!(index.dimension(), None);
        assert!(index.search(&[0.3, 0.7, 0.1], 1).unwrap().is_empty());
        assert!(index.search(&[], 10).unwrap().is_empty());
    }

    #[test]
    fn test_zero_k_rejected() {
        let err = sample().search(&[1.0, 0.0], 0).unwrap_err();
        assert!(matches!(err, EmbeddingError::InvalidK(0)));

        let empty: VectorIndex<usize> = VectorIndex::new(DistanceMetric::Euclidean);
        assert!(matches!(empty.search(&[1.0], 0), Err(EmbeddingError::InvalidK(0))));
    }

    #[test]
    fn test_query_dimension_mismatch() {
        let err = sample().search(&[1.0, 0.0, 0.0], 1).unwrap_err();
        assert!(matches!(
            err,
            EmbeddingError::DimensionMismatch { expected: 2, actual: 3 }
        ));
    }

    #[test]
    fn test_build_rejects_ragged_vectors() {
        let err = VectorIndex::build(vec![vec![1.0, 0.0], vec![1.0]], vec![0, 1]).unwrap_err();
        assert!(matches!(
            err,
            EmbeddingError::DimensionMismatch { expected: 2, actual: 1 }
        ));
    }

    #[test]
    fn test_build_rejects_count_mismatch() {
        let err = VectorIndex::build(vec![vec![1.0, 0.0]], vec![0, 1]).unwrap_err();
        assert!(matches!(
            err,
            EmbeddingError::CountMismatch { vectors: 1, identifiers: 2 }
        ));
    }

    #[test]
    fn test_build_rejects_zero_length_vectors() {
        let err = VectorIndex::build(vec![vec![], vec![]], vec![0, 1]).unwrap_err();
        assert!(matches!(err, EmbeddingError::Config(_)));

        let mut index = VectorIndex::new(DistanceMetric::Euclidean);
        assert!(matches!(index.insert(0, &[]), Err(EmbeddingError::Config(_))));
        assert!(index.is_empty());
        assert_eq!(index.dimension(), None);
    }

    #[test]
    fn test_ties_broken_by_insertion_order() {
        let index = VectorIndex::build(
            vec![vec![0.0, 1.0], vec![1.0, 0.0], vec![0.0, -1.0], vec![-1.0, 0.0]],
            vec!["a", "b", "c", "d"],
        )
        .unwrap();
        let hits = index.search(&[0.0, 0.0], 4).unwrap();
        assert_eq!(ids(&hits), vec!["a", "b", "c", "d"]);

        let top_two = index.search(&[0.0, 0.0], 2).unwrap();
        assert_eq!(ids(&top_two), vec!["a", "b"]);
    }

    #[test]
    fn test_rejected_insert_leaves_index_intact() {
        let mut index = sample();
        let err = index.insert("bad", &[1.0, 2.0, 3.0]).unwrap_err();
        assert!(matches!(err, EmbeddingError::DimensionMismatch { .. }));
        assert_eq!(index.len(), 3);
        assert_eq!(index.search(&[0.0, 1.0], 1).unwrap()[0].id, "north");
    }

    #[test]
    fn test_insert_fixes_dimension() {
        let mut index = VectorIndex::new(DistanceMetric::Euclidean);
        index.insert(7u32, &[0.5, 0.5, 0.5]).unwrap();
        assert_eq!(index.dimension(), Some(3));
        assert!(index.insert(8u32, &[0.5]).is_err());
        assert!(index.insert(9u32, &[]).is_err());
    }

    #[test]
    fn test_with_dimension_checks_queries_on_empty_index() {
        let index: VectorIndex<usize> =
            VectorIndex::with_dimension(4, DistanceMetric::Euclidean).unwrap();
        assert!(index.search(&[0.0; 4], 3).unwrap().is_empty());
        assert!(index.search(&[0.0; 2], 3).is_err());
        assert!(VectorIndex::<usize>::with_dimension(0, DistanceMetric::Cosine).is_err());
    }

    #[test]
    fn test_cosine_metric_ignores_magnitude() {
        let index = VectorIndex::build_with_metric(
            vec![vec![10.0, 0.0], vec![0.5, 0.5]],
            vec!["far-but-aligned", "near-but-diagonal"],
            DistanceMetric::Cosine,
        )
        .unwrap();
        let hits = index.search(&[1.0, 0.0], 1).unwrap();
        assert_eq!(hits[0].id, "far-but-aligned");
    }
}
