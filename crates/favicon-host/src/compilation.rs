//! One run of the build pipeline
//!
//! A [`Compilation`] is created fresh for every run and owns that run's asset
//! table, file dependencies and abort signal.

use crate::assets::AssetTable;
use crate::dependencies::FileDependencies;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use uuid::Uuid;

/// Compilation identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CompilationId(Uuid);

impl CompilationId {
    /// Generate new ID
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CompilationId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for CompilationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Liveness signal for a compilation
///
/// Cloned handles share state; a watcher keeps one to abort a stale run while
/// taps poll [`AbortSignal::is_aborted`].
#[derive(Debug, Clone, Default)]
pub struct AbortSignal(Arc<AtomicBool>);

impl AbortSignal {
    /// Create live signal
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Abort every holder of this signal
    #[inline]
    pub fn abort(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Check if aborted
    #[inline]
    #[must_use]
    pub fn is_aborted(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Per-run compilation state
#[derive(Debug)]
pub struct Compilation {
    id: CompilationId,
    assets: AssetTable,
    file_dependencies: FileDependencies,
    signal: AbortSignal,
}

impl Compilation {
    /// Create empty compilation
    #[inline]
    #[must_use]
    pub fn new(signal: AbortSignal) -> Self {
        Self {
            id: CompilationId::new(),
            assets: AssetTable::new(),
            file_dependencies: FileDependencies::new(),
            signal,
        }
    }

    /// Compilation ID
    #[inline]
    #[must_use]
    pub fn id(&self) -> CompilationId {
        self.id
    }

    /// Asset table
    #[inline]
    #[must_use]
    pub fn assets(&self) -> &AssetTable {
        &self.assets
    }

    /// File dependencies
    #[inline]
    #[must_use]
    pub fn file_dependencies(&self) -> &FileDependencies {
        &self.file_dependencies
    }

    /// Abort signal of this run
    #[inline]
    #[must_use]
    pub fn abort_signal(&self) -> &AbortSignal {
        &self.signal
    }

    /// Whether a change to `path` invalidates this compilation
    #[inline]
    #[must_use]
    pub fn depends_on(&self, path: &Path) -> bool {
        self.file_dependencies.contains(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn abort_signal_is_shared_between_clones() {
        let signal = AbortSignal::new();
        let held = signal.clone();
        assert!(!held.is_aborted());
        signal.abort();
        assert!(held.is_aborted());
    }

    #[test]
    fn compilations_start_empty_with_unique_ids() {
        let a = Compilation::new(AbortSignal::new());
        let b = Compilation::new(AbortSignal::new());
        assert_ne!(a.id(), b.id());
        assert!(a.assets().is_empty());
        assert!(a.file_dependencies().is_empty());
        assert!(!a.abort_signal().is_aborted());
    }

    #[test]
    fn depends_on_tracks_file_dependencies() {
        let compilation = Compilation::new(AbortSignal::new());
        let logo = std::env::temp_dir().join("logo.svg");
        compilation.file_dependencies().add(logo.clone());
        assert!(compilation.depends_on(&logo));
    }
}
