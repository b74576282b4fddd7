//! Path Resolver
//!
//! Maps logical query paths onto absolute paths confined under the index
//! root. Resolution happens in two steps:
//!
//! 1. [`PathResolver::normalize`] is purely lexical. It produces the cache
//!    key and never touches the filesystem, so cache hits stay free of IO.
//! 2. [`PathResolver::confine`] canonicalizes the joined path and checks the
//!    result is still under the canonical root, which catches escapes
//!    through symbolic links that no string check can see.

use std::path::{Component, Path, PathBuf};

use crate::error::{IndexError, Result};

/// A lexically normalized query path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedPath {
    /// Cache key: segments joined by `/`, empty for the root
    pub key: String,
    /// Root joined with the segments, not yet canonicalized
    pub path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct PathResolver {
    root: PathBuf,
}

impl PathResolver {
    /// Creates a resolver for `root`, which must already be canonical.
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    // == Normalize ==
    /// Lexically normalizes a query path.
    ///
    /// A single leading `/` is stripped and empty input is the root. `.` and
    /// empty segments are dropped, `..` pops one segment. Popping past the
    /// root is rejected with `OutOfScope`.
    pub fn normalize(&self, query: &str) -> Result<NormalizedPath> {
        let relative = query.strip_prefix('/').unwrap_or(query);
        let mut segments: Vec<&str> = Vec::new();

        for component in Path::new(relative).components() {
            match component {
                Component::Normal(segment) => match segment.to_str() {
                    Some(segment) => segments.push(segment),
                    None => return Err(IndexError::OutOfScope(query.to_string())),
                },
                Component::ParentDir => {
                    if segments.pop().is_none() {
                        return Err(IndexError::OutOfScope(query.to_string()));
                    }
                }
                // "//a" joins like "/a": an extra separator never re-roots
                Component::CurDir | Component::RootDir => {}
                Component::Prefix(_) => return Err(IndexError::OutOfScope(query.to_string())),
            }
        }

        let path = segments
            .iter()
            .fold(self.root.clone(), |path, segment| path.join(segment));

        Ok(NormalizedPath {
            key: segments.join("/"),
            path,
        })
    }

    // == Confine ==
    /// Resolves symbolic links and verifies the target stays under the root.
    ///
    /// Returns the canonical path on success, `NotFound` if the path (or a
    /// link along it) does not exist, and `OutOfScope` if it escapes.
    pub fn confine(&self, normalized: &NormalizedPath) -> Result<PathBuf> {
        let canonical = normalized
            .path
            .canonicalize()
            .map_err(|e| IndexError::from_io(&normalized.path, e))?;

        if !canonical.starts_with(&self.root) {
            return Err(IndexError::OutOfScope(format!(
                "{} resolves to {}",
                normalized.key,
                canonical.display()
            )));
        }

        Ok(canonical)
    }

    /// Normalizes and confines in one step.
    #[cfg(test)]
    pub fn resolve(&self, query: &str) -> Result<PathBuf> {
        let normalized = self.normalize(query)?;
        self.confine(&normalized)
    }
}
