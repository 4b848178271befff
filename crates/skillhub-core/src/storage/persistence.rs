//! JSON file persistence
//!
//! Each key is stored as `{data_dir}/{key}.json`. Writes are atomic
//! (write to temp file, sync, rename) so a crash never leaves a half-written
//! mapping behind.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use super::error::{IoOperation, StorageError, StorageResult};
use super::Storage;

/// File-backed storage rooted at a data directory
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    dir: PathBuf,
}

impl JsonFileStorage {
    /// Open storage in `dir`, creating the directory if needed
    pub fn open(dir: &Path) -> StorageResult<Self> {
        fs::create_dir_all(dir).map_err(|source| StorageError::CreateDirectory {
            path: dir.to_path_buf(),
            source,
        })?;
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    /// Path of the file backing `key`
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl Storage for JsonFileStorage {
    fn read(&self, key: &str) -> StorageResult<Option<String>> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(content) => {
                debug!(key, bytes = content.len(), "read entry");
                Ok(Some(content))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::from_io(IoOperation::Read, e, path)),
        }
    }

    fn write(&self, key: &str, value: &str) -> StorageResult<()> {
        let path = self.path_for(key);
        atomic_write(&path, value.as_bytes())?;
        debug!(key, bytes = value.len(), "wrote entry");
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::from_io(IoOperation::Remove, e, path)),
        }
    }
}

/// Write data to a file atomically
///
/// 1. Write to a temporary file in the same directory
/// 2. Sync the file to disk
/// 3. Rename the temp file to the target path
pub(crate) fn atomic_write(path: &Path, data: &[u8]) -> StorageResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| StorageError::CreateDirectory {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let temp_path = path.with_extension("tmp");

    let write_err = |e| StorageError::from_io(IoOperation::Write, e, temp_path.clone());

    let mut file = File::create(&temp_path).map_err(write_err)?;
    file.write_all(data).map_err(write_err)?;
    file.sync_all().map_err(write_err)?;

    fs::rename(&temp_path, path).map_err(|source| StorageError::AtomicWriteFailed {
        from: temp_path.clone(),
        to: path.to_path_buf(),
        source,
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_and_read() {
        let temp_dir = TempDir::new().unwrap();
        let storage = JsonFileStorage::open(temp_dir.path()).unwrap();

        assert!(storage.read("skillhub_users").unwrap().is_none());

        storage.write("skillhub_users", "{}").unwrap();
        assert_eq!(storage.read("skillhub_users").unwrap().as_deref(), Some("{}"));
        assert!(storage.path_for("skillhub_users").exists());
    }

    #[test]
    fn test_overwrite_replaces_value() {
        let temp_dir = TempDir::new().unwrap();
        let storage = JsonFileStorage::open(temp_dir.path()).unwrap();

        storage.write("k", "first").unwrap();
        storage.write("k", "second").unwrap();
        assert_eq!(storage.read("k").unwrap().as_deref(), Some("second"));
        assert!(!storage.path_for("k").with_extension("tmp").exists());
    }

    #[test]
    fn test_remove_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let storage = JsonFileStorage::open(temp_dir.path()).unwrap();

        storage.write("k", "v").unwrap();
        storage.remove("k").unwrap();
        storage.remove("k").unwrap();
        assert!(storage.read("k").unwrap().is_none());
    }

    #[test]
    fn test_open_creates_nested_dir() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("a").join("b");

        let storage = JsonFileStorage::open(&nested).unwrap();
        storage.write("k", "v").unwrap();
        assert!(nested.join("k.json").exists());
    }

    #[test]
    fn test_two_handles_last_write_wins() {
        let temp_dir = TempDir::new().unwrap();
        let first = JsonFileStorage::open(temp_dir.path()).unwrap();
        let second = JsonFileStorage::open(temp_dir.path()).unwrap();

        first.write("k", "from-first").unwrap();
        second.write("k", "from-second").unwrap();

        assert_eq!(first.read("k").unwrap().as_deref(), Some("from-second"));
    }
}
