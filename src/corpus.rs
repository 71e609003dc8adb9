//! Append-only store of scraped pages

use std::collections::HashSet;
use std::path::PathBuf;

use tracing::info;

use crate::errors::Result;
use crate::models::CorpusRecord;
use crate::storage;

/// Result of an append
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppendOutcome {
    /// Records actually appended
    pub added: usize,
    /// Records skipped because their source id was already stored
    pub skipped: usize,
    /// Corpus size after the append
    pub total: usize,
}

/// Persisted, insertion-ordered corpus deduplicated by `source_id`
///
/// A record's position is its document id in the embedding index.
pub struct CorpusStore {
    path: PathBuf,
    records: Vec<CorpusRecord>,
    known: HashSet<String>,
}

impl CorpusStore {
    /// Open the store at `path`; a missing file is an empty corpus
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let records: Vec<CorpusRecord> = storage::load_json(&path)?.unwrap_or_default();
        let known = records.iter().map(|r| r.source_id.clone()).collect();
        Ok(Self {
            path,
            records,
            known,
        })
    }

    /// All records in insertion order
    pub fn load(&self) -> &[CorpusRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: usize) -> Option<&CorpusRecord> {
        self.records.get(id)
    }

    pub fn contains(&self, source_id: &str) -> bool {
        self.known.contains(source_id)
    }

    /// Append records whose `source_id` is not stored yet and persist the corpus
    ///
    /// Nothing is written when every record is a duplicate.
    pub fn append_new(&mut self, records: Vec<CorpusRecord>) -> Result<AppendOutcome> {
        let incoming = records.len();
        let mut fresh = Vec::new();
        for record in records {
            if self.known.contains(&record.source_id) {
                continue;
            }
            self.known.insert(record.source_id.clone());
            fresh.push(record);
        }

        let added = fresh.len();
        if added == 0 {
            info!("No new data found.");
            return Ok(AppendOutcome {
                added: 0,
                skipped: incoming,
                total: self.records.len(),
            });
        }

        let mut next = self.records.clone();
        next.extend(fresh.iter().cloned());
        if let Err(e) = storage::save_json(&self.path, &next) {
            for record in &fresh {
                self.known.remove(&record.source_id);
            }
            return Err(e);
        }
        self.records = next;

        info!(
            "Appended {} new record(s) to corpus ({} total)",
            added,
            self.records.len()
        );
        Ok(AppendOutcome {
            added,
            skipped: incoming - added,
            total: self.records.len(),
        })
    }
}
