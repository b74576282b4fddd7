//! Index Module
//!
//! The façade tying path resolution, the metadata cache and the filesystem
//! reader together. Each query either serves a live cached response or
//! revalidates against the filesystem and refreshes the cache.

mod builder;
mod reader;
mod resolver;

pub use builder::{dir_response, file_response};
pub use reader::FilesystemReader;
pub use resolver::{NormalizedPath, PathResolver};

use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::cache::{CacheStats, CacheStore};
use crate::config::IndexConfig;
use crate::error::{IndexError, Result};
use crate::models::Response;
use crate::tasks::spawn_reclaim_task;

// == Index ==
/// Cached, root-confined view of filesystem metadata.
///
/// Queries are synchronous and may block on filesystem calls; async callers
/// should go through `spawn_blocking`. Every per-query failure is reported as
/// `None`.
#[derive(Debug)]
pub struct Index {
    resolver: PathResolver,
    reader: FilesystemReader,
    cache: Arc<CacheStore>,
    /// Background stale-record reclaimer, if started
    reclaimer: Mutex<Option<JoinHandle<()>>>,
}

impl Index {
    // == Constructor ==
    /// Creates an index over `config.root`.
    ///
    /// Fails with `IndexError::Config` if the root does not exist or is not
    /// a directory.
    pub fn new(config: IndexConfig) -> Result<Self> {
        let root = config.root.canonicalize().map_err(|e| {
            IndexError::Config(format!("root {}: {}", config.root.display(), e))
        })?;

        if !root.is_dir() {
            return Err(IndexError::Config(format!(
                "root {} is not a directory",
                root.display()
            )));
        }

        info!(
            "Index created: root={}, ttl={:?}, max_size={}",
            root.display(),
            config.ttl,
            config.max_size
        );

        Ok(Self {
            resolver: PathResolver::new(root),
            reader: FilesystemReader::new(),
            cache: Arc::new(CacheStore::new(config.ttl, config.max_size)),
            reclaimer: Mutex::new(None),
        })
    }

    // == Query ==
    /// Returns the response for a logical path, or `None` if it cannot be
    /// served.
    ///
    /// Escapes, missing paths and filesystem errors all come back as `None`;
    /// they are only told apart in the logs.
    pub fn query(&self, path: &str) -> Option<Arc<Response>> {
        let normalized = match self.resolver.normalize(path) {
            Ok(normalized) => normalized,
            Err(e) => {
                warn!("Rejected query {:?}: {}", path, e);
                return None;
            }
        };

        if let Some(cached) = self.cache.get(&normalized.key) {
            debug!("Cache hit for {:?}", normalized.key);
            return Some(cached);
        }

        match self.revalidate(&normalized) {
            Ok(response) => Some(response),
            Err(e) => {
                log_query_failure(path, &e);
                None
            }
        }
    }

    // == Query Bytes ==
    /// Same as [`Index::query`], with the response encoded as compact JSON.
    pub fn query_bytes(&self, path: &str) -> Option<Vec<u8>> {
        let response = self.query(path)?;
        match response.to_bytes() {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                log_query_failure(path, &IndexError::from(e));
                None
            }
        }
    }

    /// Reads the path from the filesystem and refreshes its cache record.
    fn revalidate(&self, normalized: &NormalizedPath) -> Result<Arc<Response>> {
        let path = self.resolver.confine(normalized)?;
        let entry = self.reader.stat(&path)?;

        let response = if entry.is_dir() {
            dir_response(self.reader.list_children(&path)?)
        } else {
            file_response(entry)
        };
        let response = Arc::new(response);

        // The response is still valid for this caller even if caching failed
        if let Err(e) = self.cache.put(normalized.key.clone(), Arc::clone(&response)) {
            error!("Failed to cache {:?}: {}", normalized.key, e);
        }

        debug!("Revalidated {:?} from {}", normalized.key, path.display());
        Ok(response)
    }

    // == Reclaimer ==
    /// Starts the background reclaimer on the current Tokio runtime.
    ///
    /// Does nothing if a reclaimer is already running or `interval` is zero.
    /// Must be called from within a Tokio runtime.
    pub fn spawn_reclaimer(&self, interval: Duration) {
        if interval.is_zero() {
            warn!("Reclaimer interval is zero, not starting it");
            return;
        }

        let mut slot = self.reclaimer.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.as_ref().is_some_and(|handle| !handle.is_finished()) {
            return;
        }
        *slot = Some(spawn_reclaim_task(Arc::clone(&self.cache), interval));
    }

    // == Close ==
    /// Stops owned background work and waits for it to finish.
    ///
    /// The cache stays usable afterwards; nothing on disk is touched.
    pub async fn close(&self) -> Result<()> {
        let handle = self
            .reclaimer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        let mut result = Ok(());
        if let Some(handle) = handle {
            handle.abort();
            match handle.await {
                Ok(()) => {}
                Err(e) if e.is_cancelled() => {}
                Err(e) => {
                    result = Err(IndexError::Shutdown(format!("reclaimer task failed: {}", e)));
                }
            }
        }

        let stats = self.cache.stats();
        info!(
            "Index closed: hits={}, misses={}, hit_rate={:.2}, expirations={}, evictions={}, entries={}",
            stats.hits,
            stats.misses,
            stats.hit_rate(),
            stats.expirations,
            stats.evictions,
            stats.total_entries
        );
        result
    }

    // == Accessors ==
    /// Canonical root every query is confined to.
    pub fn root(&self) -> &Path {
        self.resolver.root()
    }

    pub fn ttl(&self) -> Duration {
        self.cache.ttl()
    }

    pub fn max_size(&self) -> usize {
        self.cache.max_size()
    }

    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.cache.stats()
    }
}

impl Drop for Index {
    fn drop(&mut self) {
        let slot = self
            .reclaimer
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = slot.take() {
            handle.abort();
        }
    }
}

fn log_query_failure(path: &str, err: &IndexError) {
    match err {
        IndexError::NotFound(_) => debug!("Query {:?}: {}", path, err),
        IndexError::OutOfScope(_) => warn!("Query {:?} escapes root: {}", path, err),
        IndexError::Io { .. } => warn!("Query {:?} failed: {}", path, err),
        _ => error!("Query {:?} failed: {}", path, err),
    }
}
