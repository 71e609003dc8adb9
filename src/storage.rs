//! Crash-safe JSON persistence
//!
//! Every persisted file is replaced as a whole through a [`WriteTransaction`]:
//! the new contents go to a temporary file in the same directory, are flushed
//! to disk, and only then atomically renamed over the target. A transaction
//! dropped without `commit` leaves the previous file untouched.

use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::errors::OwlError;
use crate::errors::Result;

/// Scoped write of a single file
pub struct WriteTransaction {
    target: PathBuf,
    staged: NamedTempFile,
}

impl WriteTransaction {
    /// Begin a write to `target`, creating its parent directory if needed
    pub fn begin(target: impl Into<PathBuf>) -> Result<Self> {
        let target = target.into();
        let parent = match target.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&parent)?;
        let staged = NamedTempFile::new_in(&parent)?;
        Ok(Self { target, staged })
    }

    /// Serialize `value` as pretty JSON into the staged file
    pub fn write_json<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        serde_json::to_writer_pretty(self.staged.as_file_mut(), value)?;
        Ok(())
    }

    /// Append raw bytes to the staged file
    pub fn write_all(&mut self, bytes: &[u8]) -> Result<()> {
        self.staged.as_file_mut().write_all(bytes)?;
        Ok(())
    }

    /// Flush the staged file and atomically replace the target
    pub fn commit(self) -> Result<()> {
        let Self { target, staged } = self;
        staged.as_file().sync_all()?;
        staged.persist(&target).map_err(|e| {
            OwlError::StorageError(format!("Failed to replace {}: {}", target.display(), e.error))
        })?;
        debug!("Committed {}", target.display());
        Ok(())
    }
}

/// Write `value` to `path` as pretty JSON in one transaction
pub fn save_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let mut tx = WriteTransaction::begin(path)?;
    tx.write_json(value)?;
    tx.commit()
}

/// Read JSON from `path`, returning `None` when the file does not exist
///
/// Malformed contents are rejected with a [`OwlError::StorageError`] naming the file.
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let value = serde_json::from_slice(&bytes).map_err(|e| {
        OwlError::StorageError(format!("Malformed state in {}: {e}", path.display()))
    })?;
    Ok(Some(value))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    #[test]
    fn test_missing_file_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let loaded: Option<Vec<String>> = load_json(&dir.path().join("absent.json")).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("map.json");
        let mut map = BTreeMap::new();
        map.insert("a".to_string(), 1u32);
        map.insert("b".to_string(), 2u32);

        save_json(&path, &map).unwrap();
        let loaded: BTreeMap<String, u32> = load_json(&path).unwrap().unwrap();
        assert_eq!(loaded, map);
    }

    #[test]
    fn test_dropped_transaction_keeps_previous_state() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        save_json(&path, &vec![1, 2, 3]).unwrap();

        {
            let mut tx = WriteTransaction::begin(&path).unwrap();
            tx.write_all(b"[4, 5").unwrap();
            // dropped without commit
        }

        let loaded: Vec<i32> = load_json(&path).unwrap().unwrap();
        assert_eq!(loaded, vec![1, 2, 3]);
        // The staged temp file is cleaned up as well
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_malformed_state_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{\"not\": \"a list\"}").unwrap();

        let err = load_json::<Vec<String>>(&path).unwrap_err();
        assert!(matches!(err, OwlError::StorageError(_)));
    }
}
