//! Data models for the directory index
//!
//! Entry and Response records shared by the index engine, the cache and the
//! HTTP layer. Their serde shape is the wire format.

pub mod entry;
pub mod response;

// Re-export commonly used types
pub use entry::{Entry, EntryKind};
pub use response::Response;
