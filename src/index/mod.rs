//! Flat nearest-neighbour index over corpus embeddings
//!
//! Vectors are stored in corpus order: vector `i` is the embedding of corpus
//! record `i`. The index also carries a watermark, the number of corpus
//! records it reflects, which is persisted in the same file as the vectors so
//! the two can never drift apart on disk.

pub mod builder;

use std::cmp::Ordering;
use std::path::Path;

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

pub use builder::build_or_update;
pub use builder::BuildOptions;
pub use builder::BuildReport;

use crate::errors::OwlError;
use crate::errors::Result;
use crate::storage;

/// On-disk format version of the index file
pub const INDEX_FORMAT_VERSION: u32 = 1;

/// Distance used to rank neighbours; smaller is more similar
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceMetric {
    /// Euclidean distance
    #[default]
    L2,
    /// Squared Euclidean distance (what flat L2 indexes commonly report)
    SquaredL2,
}

impl DistanceMetric {
    pub fn distance(self, a: &[f32], b: &[f32]) -> f32 {
        let squared: f32 = a
            .iter()
            .zip(b)
            .map(|(x, y)| {
                let d = x - y;
                d * d
            })
            .sum();
        match self {
            Self::L2 => squared.sqrt(),
            Self::SquaredL2 => squared,
        }
    }
}

/// Neighbours of a query in ascending distance order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchHits {
    pub distances: Vec<f32>,
    pub ids: Vec<usize>,
}

impl SearchHits {
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingIndex {
    version: u32,
    dimension: usize,
    metric: DistanceMetric,
    watermark: usize,
    updated_at: DateTime<Utc>,
    vectors: Vec<Vec<f32>>,
}

impl EmbeddingIndex {
    /// Create an empty index
    pub fn new(dimension: usize, metric: DistanceMetric) -> Self {
        Self {
            version: INDEX_FORMAT_VERSION,
            dimension,
            metric,
            watermark: 0,
            updated_at: Utc::now(),
            vectors: Vec::new(),
        }
    }

    /// Load a persisted index; `None` when no index has been built yet
    pub fn load(path: &Path) -> Result<Option<Self>> {
        let Some(index) = storage::load_json::<Self>(path)? else {
            return Ok(None);
        };
        index.check_consistency()?;
        Ok(Some(index))
    }

    /// Persist vectors and watermark in one atomic write
    pub fn save(&self, path: &Path) -> Result<()> {
        storage::save_json(path, self)
    }

    fn check_consistency(&self) -> Result<()> {
        if self.version != INDEX_FORMAT_VERSION {
            return Err(OwlError::StorageError(format!(
                "Unsupported index format version {}",
                self.version
            )));
        }
        if self.watermark != self.vectors.len() {
            return Err(OwlError::StorageError(format!(
                "Index watermark {} does not match its {} vectors",
                self.watermark,
                self.vectors.len()
            )));
        }
        if let Some(bad) = self.vectors.iter().find(|v| v.len() != self.dimension) {
            return Err(OwlError::StorageError(format!(
                "Index holds a vector of length {} but its dimension is {}",
                bad.len(),
                self.dimension
            )));
        }
        Ok(())
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn metric(&self) -> DistanceMetric {
        self.metric
    }

    /// Number of corpus records reflected in the index
    pub fn watermark(&self) -> usize {
        self.watermark
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    pub fn vectors(&self) -> &[Vec<f32>] {
        &self.vectors
    }

    /// Append vectors for the next corpus records, advancing the watermark
    ///
    /// Either every vector is appended or none is.
    pub fn append(&mut self, vectors: Vec<Vec<f32>>) -> Result<()> {
        if let Some(bad) = vectors.iter().find(|v| v.len() != self.dimension) {
            return Err(OwlError::DimensionMismatch {
                expected: self.dimension,
                actual: bad.len(),
            });
        }
        self.watermark += vectors.len();
        self.vectors.extend(vectors);
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Up to `k` nearest neighbours of `query`, nearest first
    ///
    /// Equal distances are ordered by id so results are deterministic.
    pub fn search(&self, query: &[f32], k: usize) -> Result<SearchHits> {
        if query.len() != self.dimension {
            return Err(OwlError::DimensionMismatch {
                expected: self.dimension,
                actual: query.len(),
            });
        }

        let mut scored: Vec<(usize, f32)> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(id, v)| (id, self.metric.distance(query, v)))
            .collect();
        scored.sort_by(|a, b| match a.1.total_cmp(&b.1) {
            Ordering::Equal => a.0.cmp(&b.0),
            other => other,
        });
        scored.truncate(k);

        Ok(SearchHits {
            distances: scored.iter().map(|(_, d)| *d).collect(),
            ids: scored.iter().map(|(id, _)| *id).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index_with(vectors: Vec<Vec<f32>>) -> EmbeddingIndex {
        let mut index = EmbeddingIndex::new(2, DistanceMetric::L2);
        index.append(vectors).unwrap();
        index
    }

    #[test]
    fn test_metric_distances() {
        let a = [0.0, 0.0];
        let b = [3.0, 4.0];
        assert!((DistanceMetric::L2.distance(&a, &b) - 5.0).abs() < 1e-6);
        assert!((DistanceMetric::SquaredL2.distance(&a, &b) - 25.0).abs() < 1e-6);
    }

    #[test]
    fn test_search_orders_by_ascending_distance() {
        let index = index_with(vec![vec![5.0, 0.0], vec![1.0, 0.0], vec![2.0, 0.0]]);
        let hits = index.search(&[0.0, 0.0], 10).unwrap();
        assert_eq!(hits.ids, vec![1, 2, 0]);
        assert_eq!(hits.distances, vec![1.0, 2.0, 5.0]);
    }

    #[test]
    fn test_search_truncates_to_k() {
        let index = index_with(vec![vec![1.0, 0.0], vec![2.0, 0.0], vec![3.0, 0.0]]);
        let hits = index.search(&[0.0, 0.0], 2).unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits.ids, vec![0, 1]);
    }

    #[test]
    fn test_ties_break_by_id() {
        let index = index_with(vec![vec![0.0, 1.0], vec![1.0, 0.0], vec![0.0, -1.0]]);
        let hits = index.search(&[0.0, 0.0], 3).unwrap();
        assert_eq!(hits.ids, vec![0, 1, 2]);
    }

    #[test]
    fn test_search_empty_index() {
        let index = EmbeddingIndex::new(2, DistanceMetric::L2);
        assert!(index.search(&[0.0, 0.0], 5).unwrap().is_empty());
    }

    #[test]
    fn test_query_dimension_mismatch() {
        let index = index_with(vec![vec![1.0, 0.0]]);
        let err = index.search(&[1.0, 0.0, 0.0], 1).unwrap_err();
        assert!(matches!(
            err,
            OwlError::DimensionMismatch {
                expected: 2,
                actual: 3
            }
        ));
    }

    #[test]
    fn test_append_rejects_wrong_dimension_atomically() {
        let mut index = index_with(vec![vec![1.0, 0.0]]);
        let err = index.append(vec![vec![2.0, 0.0], vec![3.0]]).unwrap_err();
        assert!(matches!(err, OwlError::DimensionMismatch { .. }));
        assert_eq!(index.len(), 1);
        assert_eq!(index.watermark(), 1);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.json");
        let index = index_with(vec![vec![0.1, -0.25], vec![1.0e-7, 3.402_823e38]]);

        index.save(&path).unwrap();
        let loaded = EmbeddingIndex::load(&path).unwrap().unwrap();

        assert_eq!(loaded, index);
        assert_eq!(loaded.watermark(), 2);
    }

    #[test]
    fn test_load_rejects_inconsistent_watermark() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.json");
        let mut value = serde_json::to_value(index_with(vec![vec![1.0, 0.0]])).unwrap();
        value["watermark"] = serde_json::json!(5);
        std::fs::write(&path, value.to_string()).unwrap();

        assert!(matches!(
            EmbeddingIndex::load(&path).unwrap_err(),
            OwlError::StorageError(_)
        ));
    }
}
