use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use super::{StatTable, StatsBackend, StoreError, StoreLock};

/// How long a loaded table is served from memory.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(3600);

#[derive(Debug)]
struct CachedTable {
    table: StatTable,
    loaded_at: Instant,
}

impl CachedTable {
    fn new(table: StatTable) -> Self {
        Self {
            table,
            loaded_at: Instant::now(),
        }
    }

    fn is_expired(&self, ttl: Duration) -> bool {
        self.loaded_at.elapsed() >= ttl
    }
}

/// Time-bounded, write-through view over another backend.
///
/// Loads are served from memory until the TTL elapses. Saves go to the inner
/// backend first; the cached value is then dropped and refilled from the saved
/// table.
#[derive(Debug)]
pub struct CachedBackend<B> {
    inner: B,
    ttl: Duration,
    slot: Mutex<Option<CachedTable>>,
}

impl<B: StatsBackend> CachedBackend<B> {
    pub fn new(inner: B) -> Self {
        Self::with_ttl(inner, DEFAULT_CACHE_TTL)
    }

    pub fn with_ttl(inner: B, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            slot: Mutex::new(None),
        }
    }

    /// Whether a fresh table is currently held in memory.
    pub fn is_warm(&self) -> bool {
        self.slot()
            .as_ref()
            .is_some_and(|cached| !cached.is_expired(self.ttl))
    }

    fn slot(&self) -> MutexGuard<'_, Option<CachedTable>> {
        // The slot only ever holds a complete table, so a poisoned lock is still usable.
        self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<B: StatsBackend> StatsBackend for CachedBackend<B> {
    fn load(&self) -> Result<StatTable, StoreError> {
        let mut slot = self.slot();

        if let Some(cached) = slot.as_ref().filter(|c| !c.is_expired(self.ttl)) {
            return Ok(cached.table.clone());
        }

        log::debug!("Statistics cache miss, loading from storage");
        let table = self.inner.load()?;
        *slot = Some(CachedTable::new(table.clone()));

        Ok(table)
    }

    fn save(&self, table: &StatTable) -> Result<(), StoreError> {
        let mut slot = self.slot();
        *slot = None;

        self.inner.save(table)?;
        *slot = Some(CachedTable::new(table.clone()));

        Ok(())
    }

    fn invalidate(&self) {
        *self.slot() = None;
        self.inner.invalidate();
    }

    fn lock(&self) -> Result<StoreLock, StoreError> {
        self.inner.lock()
    }
}
