//! Cache Module
//!
//! Provides the bounded response cache with TTL staleness and LRU eviction.

mod lru;
mod record;
mod stats;
mod store;


// Re-export public types
pub use lru::LruTracker;
pub use stats::CacheStats;
pub use store::CacheStore;
