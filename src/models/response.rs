//! Query response model
//!
//! Defines the structure returned for one index query, and its wire shape:
//!
//! ```text
//! {"type":"dir","contents":[{"name":..,"type":..,"size":..,"mtime":..}, ...]}
//! {"type":"file","size":N,"mtime":N}
//! ```

use serde::{Deserialize, Serialize};

use super::{Entry, EntryKind};

/// Result of one query: a directory listing or single-file metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Response {
    /// Immediate children of a directory, unordered, no recursion
    Dir { contents: Vec<Entry> },
    /// Metadata of a file; an entry without its name
    File { size: u64, mtime: i64 },
}

impl Response {
    /// Returns the kind of object this response describes.
    pub fn kind(&self) -> EntryKind {
        match self {
            Response::Dir { .. } => EntryKind::Dir,
            Response::File { .. } => EntryKind::File,
        }
    }

    /// Returns the listing for a directory response.
    pub fn contents(&self) -> Option<&[Entry]> {
        match self {
            Response::Dir { contents } => Some(contents.as_slice()),
            Response::File { .. } => None,
        }
    }

    /// Encodes the response as compact JSON.
    pub fn to_bytes(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }
}
