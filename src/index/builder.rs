//! Incremental index build driven by the stored watermark

use std::path::Path;

use futures::stream::StreamExt;
use futures::stream::TryStreamExt;
use futures::stream::{
    self,
};
use tracing::info;
use tracing::warn;

use super::DistanceMetric;
use super::EmbeddingIndex;
use crate::embeddings::Embedder;
use crate::errors::OwlError;
use crate::errors::Result;
use crate::models::CorpusRecord;

/// Parameters for creating or extending the index
#[derive(Debug, Clone, Copy)]
pub struct BuildOptions {
    /// Dimension for a freshly created index
    pub dimension: usize,
    /// Metric for a freshly created index; an existing index keeps its own
    pub metric: DistanceMetric,
    /// Embedding requests in flight at once
    pub parallel_requests: usize,
}

impl BuildOptions {
    pub fn from_app_config(config: &crate::config::AppConfig) -> Self {
        Self {
            dimension: config.embeddings.dimension,
            metric: config.retrieval.metric,
            parallel_requests: config.embeddings.parallel_requests,
        }
    }
}

/// What a build did
#[derive(Debug)]
pub struct BuildReport {
    pub index: EmbeddingIndex,
    /// Records embedded by this build
    pub embedded: usize,
    /// Whether the index was created rather than extended
    pub created: bool,
}

/// Bring the index at `path` up to date with `records`
///
/// Only records past the stored watermark are embedded. Any embedding failure
/// aborts the build before anything is written, so the persisted index is
/// either the previous one or the fully extended one.
pub async fn build_or_update<E>(
    path: &Path,
    records: &[CorpusRecord],
    embedder: &E,
    options: BuildOptions,
) -> Result<BuildReport>
where
    E: Embedder + ?Sized,
{
    let (mut index, created) = match EmbeddingIndex::load(path)? {
        Some(index) => (index, false),
        None => (EmbeddingIndex::new(options.dimension, options.metric), true),
    };

    if !created && index.metric() != options.metric {
        warn!(
            "Configured metric {:?} differs from the stored index metric {:?}; keeping the stored one",
            options.metric,
            index.metric()
        );
    }

    let watermark = index.watermark();
    if watermark > records.len() {
        return Err(OwlError::IndexOutOfSync {
            watermark,
            corpus_len: records.len(),
        });
    }

    let pending = &records[watermark..];
    if pending.is_empty() && !created {
        info!("No new data to update the index.");
        return Ok(BuildReport {
            index,
            embedded: 0,
            created,
        });
    }

    info!(
        "Embedding {} record(s) starting at position {}",
        pending.len(),
        watermark
    );
    let vectors = embed_in_order(pending, embedder, options.parallel_requests).await?;
    let embedded = vectors.len();
    index.append(vectors)?;
    index.save(path)?;

    if created {
        info!("New index built with {} vector(s)", index.len());
    } else {
        info!("Index updated with {} new vector(s), {} total", embedded, index.len());
    }

    Ok(BuildReport {
        index,
        embedded,
        created,
    })
}

/// Embed every record, keeping output order equal to input order
async fn embed_in_order<E>(
    records: &[CorpusRecord],
    embedder: &E,
    parallel_requests: usize,
) -> Result<Vec<Vec<f32>>>
where
    E: Embedder + ?Sized,
{
    stream::iter(records)
        .map(|record| embedder.embed(&record.content))
        .buffered(parallel_requests.max(1))
        .try_collect()
        .await
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;
    use std::sync::atomic::Ordering;

    use async_trait::async_trait;

    use super::*;

    /// Embeds text as `[len, first byte]`, optionally failing on a marker
    struct FakeEmbedder {
        calls: AtomicUsize,
        fail_on: Option<&'static str>,
    }

    impl FakeEmbedder {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail_on: None,
            }
        }

        fn failing_on(marker: &'static str) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail_on: Some(marker),
            }
        }
    }

    #[async_trait]
    impl Embedder for FakeEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_on == Some(text) {
                return Err(OwlError::EmbeddingError("boom".to_string()));
            }
            Ok(vec![text.len() as f32, f32::from(text.as_bytes()[0])])
        }
    }

    fn options() -> BuildOptions {
        BuildOptions {
            dimension: 2,
            metric: DistanceMetric::L2,
            parallel_requests: 4,
        }
    }

    fn records(texts: &[&str]) -> Vec<CorpusRecord> {
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| CorpusRecord::new(format!("https://site/{i}"), *t))
            .collect()
    }

    #[tokio::test]
    async fn test_fresh_build_embeds_everything_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.json");
        let embedder = FakeEmbedder::new();
        let corpus = records(&["a", "bb", "ccc"]);

        let report = build_or_update(&path, &corpus, &embedder, options()).await.unwrap();

        assert!(report.created);
        assert_eq!(report.embedded, 3);
        assert_eq!(report.index.len(), corpus.len());
        assert_eq!(report.index.vectors()[2], vec![3.0, f32::from(b'c')]);
        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_update_embeds_only_tail() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.json");
        let embedder = FakeEmbedder::new();
        let mut corpus = records(&["a", "bb"]);
        build_or_update(&path, &corpus, &embedder, options()).await.unwrap();

        corpus.extend(records(&["x", "y", "zzz"]).into_iter().skip(2));
        let report = build_or_update(&path, &corpus, &embedder, options()).await.unwrap();

        assert!(!report.created);
        assert_eq!(report.embedded, 1);
        assert_eq!(embedder.calls.load(Ordering::SeqCst), 3);
        assert_eq!(report.index.len(), corpus.len());
        assert_eq!(report.index.watermark(), 3);
    }

    #[tokio::test]
    async fn test_up_to_date_index_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.json");
        let embedder = FakeEmbedder::new();
        let corpus = records(&["a"]);
        build_or_update(&path, &corpus, &embedder, options()).await.unwrap();
        let before = std::fs::read_to_string(&path).unwrap();

        let report = build_or_update(&path, &corpus, &embedder, options()).await.unwrap();

        assert_eq!(report.embedded, 0);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
    }

    #[tokio::test]
    async fn test_failed_embedding_persists_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.json");
        let corpus = records(&["a", "bb"]);
        build_or_update(&path, &corpus, &FakeEmbedder::new(), options())
            .await
            .unwrap();
        let before = std::fs::read_to_string(&path).unwrap();

        let mut grown = corpus.clone();
        grown.extend(records(&["", "", "ok", "bad"]).into_iter().skip(2));
        let err = build_or_update(&path, &grown, &FakeEmbedder::failing_on("bad"), options())
            .await
            .unwrap_err();

        assert!(matches!(err, OwlError::EmbeddingError(_)));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
    }

    #[tokio::test]
    async fn test_fresh_build_failure_writes_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.json");
        let corpus = records(&["a", "bad"]);

        let result = build_or_update(&path, &corpus, &FakeEmbedder::failing_on("bad"), options()).await;

        assert!(result.is_err());
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_watermark_beyond_corpus_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.json");
        let embedder = FakeEmbedder::new();
        build_or_update(&path, &records(&["a", "b", "c"]), &embedder, options())
            .await
            .unwrap();

        let err = build_or_update(&path, &records(&["a"]), &embedder, options())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            OwlError::IndexOutOfSync {
                watermark: 3,
                corpus_len: 1
            }
        ));
    }

    #[tokio::test]
    async fn test_wrong_embedding_dimension_aborts_build() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.json");
        let mut opts = options();
        opts.dimension = 3;

        let err = build_or_update(&path, &records(&["a"]), &FakeEmbedder::new(), opts)
            .await
            .unwrap_err();

        assert!(matches!(err, OwlError::DimensionMismatch { .. }));
        assert!(!path.exists());
    }
}
