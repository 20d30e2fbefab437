//! Request statistics
//!
//! Counts how often each distinct parameter set was requested. The table maps a
//! [`fingerprint`](crate::fingerprint::fingerprint) to its [`StatEntry`] and is
//! persisted as a single pretty-printed JSON object.
//!
//! Entries are created on first occurrence, only ever incremented, and never
//! evicted.

mod backend;
mod cache;
mod repository;

pub use backend::{FileBackend, StatsBackend, StoreLock};
pub use cache::{CachedBackend, DEFAULT_CACHE_TTL};
pub use repository::StatisticsRepository;

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::fingerprint::{fingerprint, ParameterSet};

/// Error type for statistics storage operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Corrupt statistics file {}: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize statistics: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// Occurrence count of one parameter set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatEntry {
    pub parameters: ParameterSet,
    pub count: u64,
}

/// Fingerprint to entry mapping, iterated in ascending fingerprint order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatTable(BTreeMap<String, StatEntry>);

impl StatTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one more occurrence of `params` and return the new count.
    ///
    /// The parameters are stored verbatim when the entry is first created.
    pub fn increment(&mut self, params: &ParameterSet) -> u64 {
        let entry = self
            .0
            .entry(fingerprint(params))
            .or_insert_with(|| StatEntry {
                parameters: params.clone(),
                count: 0,
            });

        entry.count += 1;
        entry.count
    }

    /// Entry with the highest count.
    ///
    /// Ties go to the entry met first in iteration order, i.e. the one with the
    /// smallest fingerprint.
    pub fn most_frequent(&self) -> Option<&StatEntry> {
        self.0.values().fold(None::<&StatEntry>, |best, entry| match best {
            Some(current) if entry.count <= current.count => Some(current),
            _ => Some(entry),
        })
    }

    pub fn get(&self, params: &ParameterSet) -> Option<&StatEntry> {
        self.0.get(&fingerprint(params))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &StatEntry)> {
        self.0.iter().map(|(key, entry)| (key.as_str(), entry))
    }
}
