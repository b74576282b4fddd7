//! Stale Record Reclaimer
//!
//! Background task that periodically purges stale cache records so memory
//! is given back without waiting for the size bound or the next access.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::CacheStore;

/// Spawns a background task that periodically purges stale cache records.
///
/// The task runs in an infinite loop, sleeping for `interval` between runs.
/// Each run holds the store lock for a single purge and never across an
/// await point, so aborting the task cannot leave the store mid-update.
///
/// # Arguments
/// * `cache` - Shared reference to the cache store
/// * `interval` - Time between purges, must be non-zero
///
/// # Returns
/// A JoinHandle for the spawned task; `Index::close` aborts and joins it.
pub fn spawn_reclaim_task(cache: Arc<CacheStore>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!("Starting cache reclaimer with interval of {:?}", interval);

        loop {
            tokio::time::sleep(interval).await;

            let removed = cache.purge_stale();

            if removed > 0 {
                info!("Cache reclaimer: removed {} stale records", removed);
            } else {
                debug!("Cache reclaimer: no stale records found");
            }
        }
    })
}
