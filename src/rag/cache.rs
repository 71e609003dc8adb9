//! Persistent question → answer cache
//!
//! Keys are the literal question strings, compared case-sensitively with no
//! normalization. Entries never expire; the whole mapping is rewritten on
//! every insert.

use std::collections::BTreeMap;
use std::path::PathBuf;

use tracing::debug;

use crate::errors::Result;
use crate::storage;

#[derive(Debug, Default)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

pub struct ResponseCache {
    path: PathBuf,
    entries: BTreeMap<String, String>,
    stats: CacheStats,
}

impl ResponseCache {
    /// Open the cache at `path`; a missing file is an empty cache
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = storage::load_json(&path)?.unwrap_or_default();
        Ok(Self {
            path,
            entries,
            stats: CacheStats::default(),
        })
    }

    pub fn get(&mut self, question: &str) -> Option<&str> {
        if let Some(answer) = self.entries.get(question) {
            self.stats.hits += 1;
            debug!("Response cache hit");
            Some(answer.as_str())
        } else {
            self.stats.misses += 1;
            None
        }
    }

    /// Store an answer and persist the full mapping immediately
    pub fn put(&mut self, question: impl Into<String>, answer: impl Into<String>) -> Result<()> {
        let question = question.into();
        let previous = self.entries.insert(question.clone(), answer.into());
        if let Err(e) = storage::save_json(&self.path, &self.entries) {
            match previous {
                Some(old) => self.entries.insert(question, old),
                None => self.entries.remove(&question),
            };
            return Err(e);
        }
        debug!("Cached answer ({} entries)", self.entries.len());
        Ok(())
    }

    pub fn entries(&self) -> &BTreeMap<String, String> {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }
}
