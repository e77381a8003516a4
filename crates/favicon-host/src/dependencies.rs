//! File dependencies of a compilation
//!
//! Any path recorded here makes a watcher rerun the whole compilation when
//! that file changes.

use indexmap::IndexSet;
use parking_lot::RwLock;
use std::path::{Path, PathBuf};

/// Set of absolute input paths
#[derive(Debug, Default)]
pub struct FileDependencies {
    paths: RwLock<IndexSet<PathBuf>>,
}

impl FileDependencies {
    /// Create empty set
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a dependency
    ///
    /// Returns `false` if it was already recorded.
    pub fn add(&self, path: impl Into<PathBuf>) -> bool {
        let path = path.into();
        self.paths.write().insert(path)
    }

    /// Check if a path is recorded
    #[inline]
    #[must_use]
    pub fn contains(&self, path: &Path) -> bool {
        self.paths.read().contains(path)
    }

    /// Number of recorded paths
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.read().len()
    }

    /// Check if empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.read().is_empty()
    }

    /// Recorded paths in insertion order
    #[must_use]
    pub fn to_vec(&self) -> Vec<PathBuf> {
        self.paths.read().iter().cloned().collect()
    }
}
