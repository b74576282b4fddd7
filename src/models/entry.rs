//! Entry model
//!
//! Metadata for one filesystem object as it appears in a directory listing.

use serde::{Deserialize, Serialize};

/// Kind of a filesystem object, serialized as `"file"` or `"dir"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Dir,
}

/// One listing item.
///
/// # Fields
/// - `name`: single path segment, unique within its listing
/// - `kind`: file or directory
/// - `size`: byte length, present only for regular files
/// - `mtime`: modification time in whole seconds since the Unix epoch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    pub mtime: i64,
}

impl Entry {
    /// Creates a file entry.
    pub fn file(name: impl Into<String>, size: u64, mtime: i64) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::File,
            size: Some(size),
            mtime,
        }
    }

    /// Creates a directory entry.
    pub fn dir(name: impl Into<String>, mtime: i64) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::Dir,
            size: None,
            mtime,
        }
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Dir
    }
}
