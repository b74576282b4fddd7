//! Filesystem Reader
//!
//! Reads metadata for a single path and the immediate children of a
//! directory. The filesystem is only ever read.

use std::fs::{self, Metadata};
use std::io;
use std::path::Path;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::error::{IndexError, Result};
use crate::models::{Entry, EntryKind};

/// Stateless metadata reader.
#[derive(Debug, Clone, Copy, Default)]
pub struct FilesystemReader;

impl FilesystemReader {
    pub fn new() -> Self {
        Self
    }

    // == Stat ==
    /// Reads the metadata of `path`, following symbolic links.
    ///
    /// The entry is named after the last path component (empty for `/`).
    pub fn stat(&self, path: &Path) -> Result<Entry> {
        let metadata = fs::metadata(path).map_err(|e| IndexError::from_io(path, e))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        entry_from_metadata(name, &metadata).map_err(|e| IndexError::from_io(path, e))
    }

    // == List Children ==
    /// Lists the immediate children of the directory at `path`.
    ///
    /// Children are described by their own metadata: a symbolic link is
    /// reported as a file with the link's own size and mtime, not its
    /// target's. Children removed while the
    /// listing is in progress are skipped.
    pub fn list_children(&self, path: &Path) -> Result<Vec<Entry>> {
        let dir = fs::read_dir(path).map_err(|e| IndexError::from_io(path, e))?;
        let mut entries = Vec::new();

        for child in dir {
            let child = child.map_err(|e| IndexError::from_io(path, e))?;

            let name = match child.file_name().into_string() {
                Ok(name) => name,
                Err(raw) => {
                    warn!("Skipping non UTF-8 entry {:?} in {}", raw, path.display());
                    continue;
                }
            };

            let metadata = match child.metadata() {
                Ok(metadata) => metadata,
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    debug!("Entry {} vanished while listing {}", name, path.display());
                    continue;
                }
                Err(e) => return Err(IndexError::from_io(child.path(), e)),
            };

            let entry = entry_from_metadata(name, &metadata)
                .map_err(|e| IndexError::from_io(child.path(), e))?;
            entries.push(entry);
        }

        Ok(entries)
    }
}

/// Builds an entry from metadata; everything but a directory carries a size.
fn entry_from_metadata(name: String, metadata: &Metadata) -> io::Result<Entry> {
    let kind = if metadata.is_dir() {
        EntryKind::Dir
    } else {
        EntryKind::File
    };
    let size = (!metadata.is_dir()).then(|| metadata.len());
    let mtime = DateTime::<Utc>::from(metadata.modified()?).timestamp();

    Ok(Entry {
        name,
        kind,
        size,
        mtime,
    })
}
