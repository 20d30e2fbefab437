use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tempfile::NamedTempFile;

use super::{StatTable, StoreError};

/// Exclusive hold on a backend's storage, released on drop.
#[derive(Debug, Default)]
pub struct StoreLock {
    file: Option<File>,
}

impl Drop for StoreLock {
    fn drop(&mut self) {
        if let Some(file) = &self.file {
            let _ = FileExt::unlock(file);
        }
    }
}

/// Storage for the whole statistics table.
pub trait StatsBackend: Send + Sync {
    /// Load the current table. Missing storage yields an empty table.
    fn load(&self) -> Result<StatTable, StoreError>;

    /// Replace the stored table.
    fn save(&self, table: &StatTable) -> Result<(), StoreError>;

    /// Drop any cached view so the next load reads the underlying storage.
    fn invalidate(&self) {}

    /// Block until no other writer holds the storage.
    ///
    /// Backends without shared storage have nothing to lock.
    fn lock(&self) -> Result<StoreLock, StoreError> {
        Ok(StoreLock::default())
    }
}

/// Durable storage in a single JSON file.
///
/// Every save writes its own temp file next to the target and renames it into
/// place, so readers never see a half-written table. Writers coordinate through an
/// advisory lock on `<file>.lock`, which also holds across processes.
#[derive(Debug, Clone)]
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn dir(&self) -> &Path {
        self.path
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
    }

    fn lock_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".lock");
        self.path.with_file_name(name)
    }
}

impl StatsBackend for FileBackend {
    fn load(&self) -> Result<StatTable, StoreError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(StatTable::new()),
            Err(e) => return Err(self.io_error(e)),
        };

        if content.trim().is_empty() {
            return Ok(StatTable::new());
        }

        serde_json::from_str(&content).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    fn save(&self, table: &StatTable) -> Result<(), StoreError> {
        fs::create_dir_all(self.dir()).map_err(|e| self.io_error(e))?;

        let json = serde_json::to_string_pretty(table).map_err(StoreError::Serialize)?;

        let mut temp = NamedTempFile::new_in(self.dir()).map_err(|e| self.io_error(e))?;
        temp.write_all(json.as_bytes()).map_err(|e| self.io_error(e))?;
        temp.as_file().sync_all().map_err(|e| self.io_error(e))?;
        temp.persist(&self.path).map_err(|e| self.io_error(e.error))?;

        log::debug!(
            "Saved {} statistics entries to {}",
            table.len(),
            self.path.display()
        );

        Ok(())
    }

    fn lock(&self) -> Result<StoreLock, StoreError> {
        let lock_path = self.lock_path();
        let lock_error = |source| StoreError::Io {
            path: lock_path.clone(),
            source,
        };

        fs::create_dir_all(self.dir()).map_err(lock_error)?;
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(lock_error)?;
        file.lock_exclusive().map_err(lock_error)?;

        Ok(StoreLock { file: Some(file) })
    }
}
