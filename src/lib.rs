//! autoindex - A lightweight directory index server
//!
//! Serves directory listings and file metadata under a root directory as
//! JSON, through a TTL and LRU bounded cache.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod index;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use config::{Config, IndexConfig, LogLevel};
pub use error::IndexError;
pub use index::Index;
pub use models::{Entry, EntryKind, Response};
