//! Compilation asset table
//!
//! The table maps output-relative paths to asset sources. It is owned by the
//! compilation; plugins append through [`AssetTable::emit_asset`], which is
//! insert-or-overwrite (last write wins).

use favicon_artifact::{ArtifactContents, ContentHash, OutputPath};
use indexmap::IndexMap;
use parking_lot::RwLock;
use std::sync::Arc;

/// Raw asset contents as stored in the table
///
/// Cheap to clone (contents are shared).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetSource(Arc<ArtifactContents>);

impl AssetSource {
    /// Wrap raw contents, no re-encoding
    #[inline]
    #[must_use]
    pub fn raw(contents: impl Into<ArtifactContents>) -> Self {
        Self(Arc::new(contents.into()))
    }

    /// Raw bytes
    #[inline]
    #[must_use]
    pub fn source(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Size in bytes
    #[inline]
    #[must_use]
    pub fn size(&self) -> usize {
        self.0.len()
    }

    /// Underlying contents
    #[inline]
    #[must_use]
    pub fn contents(&self) -> &ArtifactContents {
        &self.0
    }

    /// Digest of the raw bytes
    #[inline]
    #[must_use]
    pub fn hash(&self) -> ContentHash {
        self.0.hash()
    }
}

/// Shared asset table of one compilation
///
/// Insertion order is kept so assets are written to disk in emission order.
#[derive(Debug, Default)]
pub struct AssetTable {
    entries: RwLock<IndexMap<OutputPath, AssetSource>>,
}

impl AssetTable {
    /// Create empty table
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite an asset
    ///
    /// Returns the source previously stored at `path`, if any. An overwritten
    /// entry keeps its original position.
    pub fn emit_asset(&self, path: OutputPath, source: AssetSource) -> Option<AssetSource> {
        tracing::trace!(asset = %path, size = source.size(), "emit asset");
        self.entries.write().insert(path, source)
    }

    /// Look up an asset
    #[inline]
    #[must_use]
    pub fn get(&self, path: &str) -> Option<AssetSource> {
        self.entries.read().get(path).cloned()
    }

    /// Check if an asset exists
    #[inline]
    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.entries.read().contains_key(path)
    }

    /// Number of assets
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Check if table is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Asset keys in insertion order
    #[must_use]
    pub fn keys(&self) -> Vec<OutputPath> {
        self.entries.read().keys().cloned().collect()
    }

    /// Snapshot of all entries in insertion order
    #[must_use]
    pub fn snapshot(&self) -> Vec<(OutputPath, AssetSource)> {
        self.entries
            .read()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Total size of all assets in bytes
    #[must_use]
    pub fn total_size(&self) -> usize {
        self.entries.read().values().map(AssetSource::size).sum()
    }
}
