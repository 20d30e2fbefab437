use std::sync::Mutex;

use super::{StatEntry, StatTable, StatsBackend, StoreError};
use crate::fingerprint::ParameterSet;

/// Read-modify-write access to the statistics table.
///
/// Increments are serialized twice: by a mutex between threads sharing this
/// repository, and by the backend's storage lock between repositories or processes
/// sharing the same file. Each increment reloads the table under the lock, so a
/// cached view never hides another writer's counts. Reads may still be served
/// from a cache until its TTL elapses.
#[derive(Debug)]
pub struct StatisticsRepository<B> {
    backend: B,
    write_lock: Mutex<()>,
}

impl<B: StatsBackend> StatisticsRepository<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            write_lock: Mutex::new(()),
        }
    }

    /// Count one more request for `params` and return its new count.
    pub fn increment(&self, params: &ParameterSet) -> Result<u64, StoreError> {
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let _lock = self.backend.lock()?;

        self.backend.invalidate();
        let mut table = self.backend.load()?;
        let count = table.increment(params);
        self.backend.save(&table)?;

        Ok(count)
    }

    /// Most requested parameter set, or `None` if nothing was recorded yet.
    pub fn most_frequent(&self) -> Result<Option<StatEntry>, StoreError> {
        Ok(self.backend.load()?.most_frequent().cloned())
    }

    /// Snapshot of the whole table.
    pub fn table(&self) -> Result<StatTable, StoreError> {
        self.backend.load()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::{CachedBackend, FileBackend};
    use std::fs;
    use std::path::Path;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn repository(path: &Path) -> StatisticsRepository<CachedBackend<FileBackend>> {
        StatisticsRepository::new(CachedBackend::new(FileBackend::new(path)))
    }

    fn fizzbuzz() -> ParameterSet {
        ParameterSet::new(3, 5, 15, "fizz", "buzz")
    }

    fn foobar() -> ParameterSet {
        ParameterSet::new(2, 7, 20, "foo", "bar")
    }

    #[test]
    fn test_increment_creates_new_entry() {
        let temp_dir = TempDir::new().unwrap();
        let repo = repository(&temp_dir.path().join("stats.json"));

        repo.increment(&fizzbuzz()).unwrap();

        let stats = repo.most_frequent().unwrap().unwrap();
        assert_eq!(stats.count, 1);
        assert_eq!(stats.parameters, fizzbuzz());
    }

    #[test]
    fn test_increment_n_times() {
        let temp_dir = TempDir::new().unwrap();
        let repo = repository(&temp_dir.path().join("stats.json"));

        for expected in 1..=3 {
            assert_eq!(repo.increment(&fizzbuzz()).unwrap(), expected);
        }

        assert_eq!(repo.most_frequent().unwrap().unwrap().count, 3);
    }

    #[test]
    fn test_most_frequent_empty() {
        let temp_dir = TempDir::new().unwrap();
        let repo = repository(&temp_dir.path().join("stats.json"));

        assert!(repo.most_frequent().unwrap().is_none());
    }

    #[test]
    fn test_most_frequent_highest_count() {
        let temp_dir = TempDir::new().unwrap();
        let repo = repository(&temp_dir.path().join("stats.json"));

        for _ in 0..4 {
            repo.increment(&fizzbuzz()).unwrap();
        }
        for _ in 0..2 {
            repo.increment(&foobar()).unwrap();
        }

        let stats = repo.most_frequent().unwrap().unwrap();
        assert_eq!(stats.count, 4);
        assert_eq!(stats.parameters, fizzbuzz());
    }

    #[test]
    fn test_persists_to_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("stats.json");
        let repo = repository(&path);

        repo.increment(&fizzbuzz()).unwrap();

        let data: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert!(data.as_object().is_some_and(|o| !o.is_empty()));
    }

    #[test]
    fn test_loads_from_file_after_recreation() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("stats.json");

        let repo = repository(&path);
        repo.increment(&fizzbuzz()).unwrap();
        repo.increment(&fizzbuzz()).unwrap();
        repo.increment(&foobar()).unwrap();

        let reopened = repository(&path);

        assert_eq!(reopened.table().unwrap(), repo.table().unwrap());
        let stats = reopened.most_frequent().unwrap().unwrap();
        assert_eq!(stats.count, 2);
        assert_eq!(stats.parameters, fizzbuzz());
    }

    #[test]
    fn test_handles_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("dir").join("stats.json");
        let repo = repository(&path);

        repo.increment(&fizzbuzz()).unwrap();

        assert!(path.exists());
    }

    #[test]
    fn test_different_parameters_tracked_separately() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("stats.json");
        let repo = repository(&path);

        repo.increment(&fizzbuzz()).unwrap();
        repo.increment(&foobar()).unwrap();

        let data: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(data.as_object().map(|o| o.len()), Some(2));
    }

    #[test]
    fn test_storage_failure_is_surfaced() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("blocker");
        fs::write(&blocker, "").unwrap();
        let repo = repository(&blocker.join("stats.json"));

        assert!(repo.increment(&fizzbuzz()).is_err());
    }

    #[test]
    fn test_concurrent_increments_are_not_lost() {
        let temp_dir = TempDir::new().unwrap();
        let repo = Arc::new(repository(&temp_dir.path().join("stats.json")));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let repo = Arc::clone(&repo);
                std::thread::spawn(move || {
                    for _ in 0..10 {
                        repo.increment(&fizzbuzz()).unwrap();
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(repo.most_frequent().unwrap().unwrap().count, 80);
    }

    #[test]
    fn test_independent_repositories_share_one_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("stats.json");

        // Separate repositories have separate mutexes and caches, like separate processes.
        let handles: Vec<_> = [fizzbuzz(), foobar()]
            .into_iter()
            .map(|params| {
                let repo = repository(&path);
                std::thread::spawn(move || {
                    for _ in 0..200 {
                        repo.increment(&params).unwrap();
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        let table = FileBackend::new(&path).load().unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(&fizzbuzz()).unwrap().count, 200);
        assert_eq!(table.get(&foobar()).unwrap().count, 200);
    }

    #[test]
    fn test_increment_sees_writes_from_another_repository() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("stats.json");
        let first = repository(&path);
        let second = repository(&path);

        assert_eq!(first.increment(&fizzbuzz()).unwrap(), 1);
        assert_eq!(second.increment(&fizzbuzz()).unwrap(), 2);
        second.increment(&foobar()).unwrap();
        assert_eq!(first.increment(&fizzbuzz()).unwrap(), 3);

        let table = FileBackend::new(&path).load().unwrap();
        assert_eq!(table.get(&fizzbuzz()).unwrap().count, 3);
        assert_eq!(table.get(&foobar()).unwrap().count, 1);
    }
}
