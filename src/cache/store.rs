//! Cache Store Module
//!
//! Main cache engine combining HashMap storage with LRU tracking and TTL
//! staleness, behind a single lock so it can be shared between request
//! workers and the reclaimer.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use tracing::error;

use crate::cache::record::CacheRecord;
use crate::cache::{CacheStats, LruTracker};
use crate::error::{IndexError, Result};
use crate::models::Response;

// == Store State ==
/// Everything guarded by the store lock.
#[derive(Debug, Default)]
struct StoreState {
    /// Normalized path -> cached record
    records: HashMap<String, CacheRecord>,
    /// LRU access tracker
    lru: LruTracker,
    /// Performance statistics
    stats: CacheStats,
}

impl StoreState {
    fn remove(&mut self, key: &str) {
        self.records.remove(key);
        self.lru.remove(key);
    }

    /// Drops every stale record except `keep`.
    fn purge_stale(&mut self, now: Instant, ttl: Duration, keep: Option<&str>) -> usize {
        let stale: Vec<String> = self
            .records
            .iter()
            .filter(|(key, record)| Some(key.as_str()) != keep && record.is_stale_at(now, ttl))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &stale {
            self.remove(key);
        }

        self.stats.record_expirations(stale.len());
        self.stats.set_total_entries(self.records.len());
        stale.len()
    }
}

// == Cache Store ==
/// Bounded response cache with TTL staleness and LRU eviction.
///
/// All operations take `&self`; share the store as `Arc<CacheStore>`.
#[derive(Debug)]
pub struct CacheStore {
    state: Mutex<StoreState>,
    /// Age at which a record must be revalidated
    ttl: Duration,
    /// Maximum number of records, 0 = unbounded
    max_size: usize,
}

impl CacheStore {
    // == Constructor ==
    /// Creates a new CacheStore.
    ///
    /// # Arguments
    /// * `ttl` - Age at which records go stale (zero = always stale)
    /// * `max_size` - Maximum number of records (zero = unbounded)
    pub fn new(ttl: Duration, max_size: usize) -> Self {
        Self {
            state: Mutex::new(StoreState::default()),
            ttl,
            max_size,
        }
    }

    // Poisoned locks are recovered; no critical section panics midway.
    fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // == Get ==
    /// Retrieves the live response cached under `key`.
    ///
    /// Absent and stale records both come back as `None`. A stale record is
    /// dropped on the spot and counted as a miss.
    pub fn get(&self, key: &str) -> Option<Arc<Response>> {
        let mut state = self.lock();

        let stale = match state.records.get(key) {
            Some(record) => record.is_stale(self.ttl),
            None => {
                state.stats.record_miss();
                return None;
            }
        };

        if stale {
            state.remove(key);
            state.stats.record_expirations(1);
            state.stats.record_miss();
            let len = state.records.len();
            state.stats.set_total_entries(len);
            return None;
        }

        let response = state.records.get(key).map(|record| Arc::clone(&record.response));
        state.lru.touch(key);
        state.stats.record_hit();
        response
    }

    // == Put ==
    /// Stores a response under `key`, replacing any previous record.
    ///
    /// When the bound is exceeded, stale records are purged first and then
    /// the least recently used ones are evicted. The bound holds when this
    /// returns `Ok`.
    pub fn put(&self, key: impl Into<String>, response: Arc<Response>) -> Result<()> {
        let key = key.into();
        let mut state = self.lock();

        state.records.insert(key.clone(), CacheRecord::new(response));
        state.lru.touch(&key);

        if self.max_size > 0 && state.records.len() > self.max_size {
            state.purge_stale(Instant::now(), self.ttl, Some(key.as_str()));

            while state.records.len() > self.max_size {
                match state.lru.evict_oldest() {
                    Some(evicted) => {
                        state.records.remove(&evicted);
                        state.stats.record_eviction();
                    }
                    None => break,
                }
            }
        }

        let len = state.records.len();
        state.stats.set_total_entries(len);

        if self.max_size > 0 && len > self.max_size {
            error!(
                "Cache bound violated: {} records held, max_size={}",
                len, self.max_size
            );
            return Err(IndexError::CacheInvariant(format!(
                "{} records held after eviction, max_size={}",
                len, self.max_size
            )));
        }

        Ok(())
    }

    // == Purge Stale ==
    /// Removes all stale records from the cache.
    ///
    /// Returns the number of records removed.
    pub fn purge_stale(&self) -> usize {
        self.lock().purge_stale(Instant::now(), self.ttl, None)
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let state = self.lock();
        let mut stats = state.stats.clone();
        stats.set_total_entries(state.records.len());
        stats
    }

    /// Returns the current number of records, stale ones included.
    pub fn len(&self) -> usize {
        self.lock().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().records.is_empty()
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }
}
