//! Query-time retrieval with adaptive result counts

use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;
use tracing::debug;
use tracing::warn;

use super::ContextAssembler;
use crate::config::AppConfig;
use crate::embeddings::Embedder;
use crate::errors::OwlError;
use crate::errors::Result;
use crate::index::EmbeddingIndex;
use crate::models::CorpusRecord;

/// What to do when even the nearest neighbour is past the threshold
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdmissionPolicy {
    /// Admit nothing; the caller gets [`ContextOutcome::NoMatch`]
    #[default]
    ZeroAllowed,
    /// Always admit the nearest neighbour when the index returned one
    AtLeastOne,
}

/// Number of leading neighbours to keep
///
/// `distances` must be ascending. The first distance strictly greater than
/// `threshold` (or NaN) cuts the list; everything before it is admitted.
pub fn admitted_count(distances: &[f32], threshold: f32, policy: AdmissionPolicy) -> usize {
    let cutoff = distances
        .iter()
        .position(|d| d.is_nan() || *d > threshold)
        .unwrap_or(distances.len());

    match policy {
        AdmissionPolicy::ZeroAllowed => cutoff,
        AdmissionPolicy::AtLeastOne if distances.is_empty() => 0,
        AdmissionPolicy::AtLeastOne => cutoff.max(1),
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetrievalSettings {
    pub max_k: usize,
    pub threshold: f32,
    pub policy: AdmissionPolicy,
}

impl RetrievalSettings {
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            max_k: config.retrieval.max_k,
            threshold: config.retrieval.threshold,
            policy: config.retrieval.policy,
        }
    }
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self {
            max_k: crate::config::default_max_k(),
            threshold: crate::config::default_threshold(),
            policy: AdmissionPolicy::default(),
        }
    }
}

/// A corpus record admitted for a query
#[derive(Debug, Clone, PartialEq)]
pub struct RetrievedPassage {
    pub id: usize,
    pub distance: f32,
    pub record: CorpusRecord,
}

/// Context for a question, or the signal that nothing relevant was found
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContextOutcome {
    Context(String),
    NoMatch,
}

/// Embeds questions and selects relevant corpus passages
pub struct Retriever {
    index: EmbeddingIndex,
    records: Vec<CorpusRecord>,
    embedder: Arc<dyn Embedder>,
    settings: RetrievalSettings,
    assembler: ContextAssembler,
}

impl Retriever {
    /// Create a retriever over an index and the corpus it was built from
    ///
    /// Fails when the index claims more records than the corpus holds.
    pub fn new(
        index: EmbeddingIndex,
        records: Vec<CorpusRecord>,
        embedder: Arc<dyn Embedder>,
        settings: RetrievalSettings,
    ) -> Result<Self> {
        if index.watermark() > records.len() {
            return Err(OwlError::IndexOutOfSync {
                watermark: index.watermark(),
                corpus_len: records.len(),
            });
        }
        if index.watermark() < records.len() {
            warn!(
                "Index covers {} of {} corpus records; run the index command to catch up",
                index.watermark(),
                records.len()
            );
        }

        Ok(Self {
            index,
            records,
            embedder,
            settings,
            assembler: ContextAssembler::default(),
        })
    }

    pub fn settings(&self) -> RetrievalSettings {
        self.settings
    }

    pub fn index(&self) -> &EmbeddingIndex {
        &self.index
    }

    /// Admitted passages for `question`, nearest first
    pub async fn retrieve(&self, question: &str) -> Result<Vec<RetrievedPassage>> {
        let query = self.embedder.embed(question).await?;
        if query.len() != self.index.dimension() {
            return Err(OwlError::DimensionMismatch {
                expected: self.index.dimension(),
                actual: query.len(),
            });
        }

        let hits = self.index.search(&query, self.settings.max_k)?;
        let admitted = admitted_count(&hits.distances, self.settings.threshold, self.settings.policy);
        debug!(
            "Query matched {} neighbour(s), admitted {} (threshold {})",
            hits.len(),
            admitted,
            self.settings.threshold
        );

        hits.ids
            .iter()
            .zip(&hits.distances)
            .take(admitted)
            .map(|(&id, &distance)| {
                let record = self.records.get(id).cloned().ok_or(OwlError::IndexOutOfSync {
                    watermark: self.index.watermark(),
                    corpus_len: self.records.len(),
                })?;
                Ok(RetrievedPassage {
                    id,
                    distance,
                    record,
                })
            })
            .collect()
    }

    /// Context string for `question`, or `NoMatch` when nothing is admitted
    pub async fn answer_context(&self, question: &str) -> Result<ContextOutcome> {
        let passages = self.retrieve(question).await?;
        Ok(self.context_for(&passages))
    }

    /// Context for passages that were already retrieved
    pub fn context_for(&self, passages: &[RetrievedPassage]) -> ContextOutcome {
        if passages.is_empty() {
            return ContextOutcome::NoMatch;
        }
        ContextOutcome::Context(self.assembler.assemble(passages))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use async_trait::async_trait;

    use super::*;
    use crate::index::DistanceMetric;

    // ====== Adaptive Count Tests ======

    #[test]
    fn test_all_distances_above_threshold_admit_zero() {
        assert_eq!(admitted_count(&[0.9, 1.2, 1.5], 0.5, AdmissionPolicy::ZeroAllowed), 0);
    }

    #[test]
    fn test_all_distances_below_threshold_admit_all() {
        assert_eq!(admitted_count(&[0.1, 0.2, 0.3], 0.5, AdmissionPolicy::ZeroAllowed), 3);
    }

    #[test]
    fn test_mixed_distances_stop_at_first_exceeding() {
        assert_eq!(
            admitted_count(&[0.1, 0.4, 0.6, 0.9], 0.5, AdmissionPolicy::ZeroAllowed),
            2
        );
    }

    #[test]
    fn test_distance_equal_to_threshold_is_admitted() {
        assert_eq!(admitted_count(&[0.5, 0.6], 0.5, AdmissionPolicy::ZeroAllowed), 1);
    }

    #[test]
    fn test_at_least_one_policy_clamps() {
        assert_eq!(admitted_count(&[0.9, 1.2], 0.5, AdmissionPolicy::AtLeastOne), 1);
        assert_eq!(admitted_count(&[0.1, 0.9], 0.5, AdmissionPolicy::AtLeastOne), 1);
        assert_eq!(admitted_count(&[], 0.5, AdmissionPolicy::AtLeastOne), 0);
    }

    #[test]
    fn test_nan_distance_cuts_the_list() {
        assert_eq!(admitted_count(&[0.1, f32::NAN, 0.2], 0.5, AdmissionPolicy::ZeroAllowed), 1);
    }

    #[test]
    fn test_admitted_count_is_monotonic_in_threshold() {
        let distances = [0.05, 0.2, 0.2, 0.45, 0.7, 1.1, 1.8];
        let thresholds: Vec<f32> = (0..=40).map(|i| i as f32 * 0.05).collect();
        for policy in [AdmissionPolicy::ZeroAllowed, AdmissionPolicy::AtLeastOne] {
            let counts: Vec<usize> = thresholds
                .iter()
                .map(|t| admitted_count(&distances, *t, policy))
                .collect();
            assert!(counts.windows(2).all(|w| w[0] <= w[1]), "{policy:?}: {counts:?}");
        }
    }

    // ====== Retriever Tests ======

    /// Looks up fixed vectors by text
    struct TableEmbedder(HashMap<String, Vec<f32>>);

    #[async_trait]
    impl Embedder for TableEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>> {
            self.0
                .get(text)
                .cloned()
                .ok_or_else(|| OwlError::EmbeddingError(format!("unknown text {text}")))
        }
    }

    fn retriever(max_k: usize) -> Retriever {
        let mut index = EmbeddingIndex::new(1, DistanceMetric::L2);
        index
            .append(vec![vec![0.3], vec![0.1], vec![0.2], vec![5.0]])
            .unwrap();
        let records = vec![
            CorpusRecord::new("https://site/c", "third"),
            CorpusRecord::new("https://site/a", "first"),
            CorpusRecord::new("https://site/b", "second"),
            CorpusRecord::new("https://site/far", "far away"),
        ];
        let embedder = TableEmbedder(HashMap::from([
            ("near".to_string(), vec![0.0]),
            ("lost".to_string(), vec![100.0]),
            ("wide".to_string(), vec![0.0, 0.0]),
        ]));
        Retriever::new(
            index,
            records,
            Arc::new(embedder),
            RetrievalSettings {
                max_k,
                threshold: 0.5,
                policy: AdmissionPolicy::ZeroAllowed,
            },
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_context_is_nearest_first() {
        let outcome = retriever(3).answer_context("near").await.unwrap();
        assert_eq!(
            outcome,
            ContextOutcome::Context("first\nsecond\nthird".to_string())
        );
    }

    #[tokio::test]
    async fn test_context_for_reuses_retrieved_passages() {
        let retriever = retriever(2);
        let passages = retriever.retrieve("near").await.unwrap();
        assert_eq!(
            retriever.context_for(&passages),
            ContextOutcome::Context("first\nsecond".to_string())
        );
        assert_eq!(retriever.context_for(&[]), ContextOutcome::NoMatch);
    }

    #[tokio::test]
    async fn test_far_neighbours_are_excluded() {
        let passages = retriever(10).retrieve("near").await.unwrap();
        let ids: Vec<usize> = passages.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2, 0]);
    }

    #[tokio::test]
    async fn test_no_relevant_neighbour_is_no_match() {
        let outcome = retriever(10).answer_context("lost").await.unwrap();
        assert_eq!(outcome, ContextOutcome::NoMatch);
    }

    #[tokio::test]
    async fn test_query_dimension_mismatch_is_fatal() {
        let err = retriever(10).answer_context("wide").await.unwrap_err();
        assert!(matches!(
            err,
            OwlError::DimensionMismatch {
                expected: 1,
                actual: 2
            }
        ));
    }

    #[tokio::test]
    async fn test_embedding_failure_propagates() {
        let err = retriever(10).answer_context("unknown").await.unwrap_err();
        assert!(matches!(err, OwlError::EmbeddingError(_)));
    }

    #[test]
    fn test_index_ahead_of_corpus_is_rejected() {
        let mut index = EmbeddingIndex::new(1, DistanceMetric::L2);
        index.append(vec![vec![0.1], vec![0.2]]).unwrap();
        let result = Retriever::new(
            index,
            vec![CorpusRecord::new("https://site/a", "only")],
            Arc::new(TableEmbedder(HashMap::new())),
            RetrievalSettings::default(),
        );
        assert!(matches!(result, Err(OwlError::IndexOutOfSync { .. })));
    }
}
