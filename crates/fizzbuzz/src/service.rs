//! Services gluing the core together for one request cycle.
//!
//! Generation and statistics recording are independent: [`GenerationService`] never
//! records, [`StatisticsService`] never generates, and [`FizzBuzzService`] runs both.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use fizzbuzz_core::fingerprint::ParameterSet;
use fizzbuzz_core::rule::MultipleRule;
use fizzbuzz_core::sequence::{generate, FizzBuzzResult};
use fizzbuzz_core::stats::{CachedBackend, FileBackend, StatEntry, StatTable, StatisticsRepository};

use crate::error::Error;

pub type Repository = StatisticsRepository<CachedBackend<FileBackend>>;

#[derive(Debug, Clone, Copy, Default)]
pub struct GenerationService;

impl GenerationService {
    /// Generate the sequence for `1..=limit`, replacing multiples of `int1` with
    /// `str1` and multiples of `int2` with `str2`, in that order.
    pub fn process(
        &self,
        int1: u64,
        int2: u64,
        limit: u64,
        str1: &str,
        str2: &str,
    ) -> FizzBuzzResult {
        let rules = [MultipleRule::new(int1, str1), MultipleRule::new(int2, str2)];

        FizzBuzzResult::new(generate(&rules, limit))
    }

    pub fn process_params(&self, params: &ParameterSet) -> FizzBuzzResult {
        self.process(
            params.int1,
            params.int2,
            params.limit,
            &params.str1,
            &params.str2,
        )
    }
}

/// Tracks and retrieves request statistics.
#[derive(Debug, Clone)]
pub struct StatisticsService {
    repository: Arc<Repository>,
}

impl StatisticsService {
    pub fn new(repository: Repository) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Open the statistics stored at `path`, cached in memory for `ttl`.
    pub fn open(path: impl Into<PathBuf>, ttl: Duration) -> Self {
        let backend = CachedBackend::with_ttl(FileBackend::new(path), ttl);
        Self::new(StatisticsRepository::new(backend))
    }

    /// Record one request and return how many times it has been seen.
    pub fn record_request(&self, params: &ParameterSet) -> Result<u64, Error> {
        let count = self.repository.increment(params)?;
        log::debug!("Recorded request {} (count {count})", params.fingerprint());
        Ok(count)
    }

    pub fn most_frequent_request(&self) -> Result<Option<StatEntry>, Error> {
        Ok(self.repository.most_frequent()?)
    }

    pub fn table(&self) -> Result<StatTable, Error> {
        Ok(self.repository.table()?)
    }
}

/// Generation followed by statistics recording.
#[derive(Debug, Clone)]
pub struct FizzBuzzService {
    generation: GenerationService,
    statistics: StatisticsService,
}

impl FizzBuzzService {
    pub fn new(statistics: StatisticsService) -> Self {
        Self {
            generation: GenerationService,
            statistics,
        }
    }

    pub fn statistics(&self) -> &StatisticsService {
        &self.statistics
    }

    /// Generate the sequence for `params` and count the request.
    ///
    /// Nothing is recorded if generation is never reached; a storage failure
    /// fails the whole call.
    pub fn process_and_record(&self, params: &ParameterSet) -> Result<FizzBuzzResult, Error> {
        let result = self.generation.process_params(params);
        self.statistics.record_request(params)?;
        Ok(result)
    }
}
