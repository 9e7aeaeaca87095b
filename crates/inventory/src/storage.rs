//! Persistence boundary for the inventory file.
//!
//! Backends move whole-file text in and out; parsing stays with the store so
//! that shape checks happen in one place. Each call opens and closes its
//! resource, no handle is held between calls.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::RwLock;

use thiserror::Error;

/// Storage operation error.
///
/// These are **infrastructure errors** as opposed to domain errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Whole-file text persistence for inventory records.
pub trait InventoryStorage {
    /// Read the persisted text. `Ok(None)` means nothing has been persisted yet.
    fn read(&self) -> Result<Option<String>, StorageError>;

    /// Replace the persisted text (truncate-then-write).
    fn write(&self, contents: &str) -> Result<(), StorageError>;

    /// Human-readable location, used in logs.
    fn location(&self) -> String;
}

impl<S> InventoryStorage for Rc<S>
where
    S: InventoryStorage + ?Sized,
{
    fn read(&self) -> Result<Option<String>, StorageError> {
        (**self).read()
    }

    fn write(&self, contents: &str) -> Result<(), StorageError> {
        (**self).write(contents)
    }

    fn location(&self) -> String {
        (**self).location()
    }
}

/// File on disk, opened and closed on every call.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl InventoryStorage for FileStorage {
    fn read(&self) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Read {
                path: self.path.clone(),
                source,
            }),
        }
    }

    fn write(&self, contents: &str) -> Result<(), StorageError> {
        let to_write_err = |source| StorageError::Write {
            path: self.path.clone(),
            source,
        };
        let mut file = fs::File::create(&self.path).map_err(to_write_err)?;
        file.write_all(contents.as_bytes()).map_err(to_write_err)?;
        file.flush().map_err(to_write_err)
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    contents: Option<String>,
    writes: usize,
    fail_writes: bool,
}

/// In-memory storage.
///
/// Intended for tests/dev. Counts writes and can be told to fail them so
/// callers can observe persist-per-mutation and rollback behaviour.
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    state: RwLock<MemoryState>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_contents(contents: impl Into<String>) -> Self {
        Self {
            state: RwLock::new(MemoryState {
                contents: Some(contents.into()),
                ..MemoryState::default()
            }),
        }
    }

    /// Currently persisted text, if any.
    pub fn contents(&self) -> Option<String> {
        self.state.read().ok().and_then(|s| s.contents.clone())
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> usize {
        self.state.read().map(|s| s.writes).unwrap_or(0)
    }

    pub fn set_fail_writes(&self, fail: bool) {
        if let Ok(mut state) = self.state.write() {
            state.fail_writes = fail;
        }
    }
}

impl InventoryStorage for InMemoryStorage {
    fn read(&self) -> Result<Option<String>, StorageError> {
        let state = self
            .state
            .read()
            .map_err(|_| StorageError::Unavailable("lock poisoned".to_string()))?;
        Ok(state.contents.clone())
    }

    fn write(&self, contents: &str) -> Result<(), StorageError> {
        let mut state = self
            .state
            .write()
            .map_err(|_| StorageError::Unavailable("lock poisoned".to_string()))?;
        if state.fail_writes {
            return Err(StorageError::Unavailable("writes disabled".to_string()));
        }
        state.contents = Some(contents.to_string());
        state.writes += 1;
        Ok(())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_reads_as_nothing_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("inventory.txt"));
        assert!(storage.read().unwrap().is_none());
    }

    #[test]
    fn file_write_truncates_previous_contents() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("inventory.txt"));

        storage.write("1 Pen 2.00 10\n2 Ink 1.00 3\n").unwrap();
        storage.write("1 Pen 2.00 9\n").unwrap();

        assert_eq!(storage.read().unwrap().as_deref(), Some("1 Pen 2.00 9\n"));
    }

    #[test]
    fn write_into_missing_directory_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope").join("inventory.txt");
        let err = FileStorage::new(&path).write("x").unwrap_err();
        match err {
            StorageError::Write { path: p, .. } => assert_eq!(p, path),
            other => panic!("expected write error, got {other:?}"),
        }
    }

    #[test]
    fn in_memory_counts_and_fails_writes() {
        let storage = InMemoryStorage::new();
        storage.write("a").unwrap();
        storage.set_fail_writes(true);
        assert!(storage.write("b").is_err());

        assert_eq!(storage.write_count(), 1);
        assert_eq!(storage.contents().as_deref(), Some("a"));
    }
}
