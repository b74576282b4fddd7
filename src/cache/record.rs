//! Cache Record Module
//!
//! Defines the structure for individual cache records with TTL support.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::models::Response;

// == Cache Record ==
/// A cached response and the moment it was inserted.
///
/// Records never leave the store; callers only see the shared response.
#[derive(Debug, Clone)]
pub(crate) struct CacheRecord {
    /// The cached response
    pub response: Arc<Response>,
    /// Insertion timestamp (monotonic)
    pub inserted_at: Instant,
}

impl CacheRecord {
    // == Constructor ==
    /// Creates a record stamped with the current instant.
    pub fn new(response: Arc<Response>) -> Self {
        Self {
            response,
            inserted_at: Instant::now(),
        }
    }

    // == Is Stale ==
    /// Checks if the record is stale at `now`.
    ///
    /// Boundary condition: a record is stale once its age is greater than or
    /// equal to the TTL, so a zero TTL makes every record stale as soon as it
    /// is inserted.
    pub fn is_stale_at(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.inserted_at) >= ttl
    }

    /// Checks if the record is stale right now.
    pub fn is_stale(&self, ttl: Duration) -> bool {
        self.is_stale_at(Instant::now(), ttl)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    fn record() -> CacheRecord {
        CacheRecord::new(Arc::new(Response::File { size: 1, mtime: 0 }))
    }

    #[test]
    fn test_zero_ttl_is_immediately_stale() {
        assert!(record().is_stale(Duration::ZERO));
    }

    #[test]
    fn test_fresh_record_with_ttl() {
        assert!(!record().is_stale(Duration::from_secs(60)));
    }

    #[test]
    fn test_record_goes_stale() {
        let rec = record();
        let ttl = Duration::from_millis(100);
        assert!(!rec.is_stale(ttl));

        sleep(Duration::from_millis(150));

        assert!(rec.is_stale(ttl));
    }

    #[test]
    fn test_staleness_boundary_condition() {
        let rec = record();
        let ttl = Duration::from_secs(5);

        // Stale exactly when the age reaches the TTL
        assert!(!rec.is_stale_at(rec.inserted_at + ttl - Duration::from_nanos(1), ttl));
        assert!(rec.is_stale_at(rec.inserted_at + ttl, ttl));
    }
}
