//! Error types for the directory index
//!
//! Provides unified error handling using thiserror.

use std::path::PathBuf;

use thiserror::Error;

// == Index Error Enum ==
/// Unified error type for the index engine.
///
/// Only [`IndexError::Config`] ever reaches a caller distinctly: every
/// per-query failure is collapsed to "not found" at the `Index` boundary.
#[derive(Error, Debug)]
pub enum IndexError {
    /// Invalid engine configuration (root missing or not a directory)
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Query path resolves outside the configured root
    #[error("Path out of scope: {0}")]
    OutOfScope(String),

    /// Path does not exist
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    /// Filesystem failure other than not-found
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Response could not be encoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Cache bound could not be restored after an insert
    #[error("Cache invariant violated: {0}")]
    CacheInvariant(String),

    /// A subcomponent failed while shutting down
    #[error("Shutdown error: {0}")]
    Shutdown(String),
}

impl IndexError {
    /// Classifies an IO error raised while touching `path`.
    ///
    /// `NotFound` keeps its own variant so the façade can tell a vanished
    /// path apart from a failing one when logging.
    pub fn from_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            IndexError::NotFound(path)
        } else {
            IndexError::Io { path, source }
        }
    }
}

// == Result Type Alias ==
/// Convenience Result type for the index engine.
pub type Result<T> = std::result::Result<T, IndexError>;
