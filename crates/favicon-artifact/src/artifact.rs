//! Generated artifacts and generation results
//!
//! [`GeneratedArtifact`] is a named blob destined to become one output file.
//! [`GenerationResult`] groups everything a single generator invocation
//! produced: images, auxiliary files and the HTML snippets referencing them.

use crate::contents::ArtifactContents;
use serde::{Deserialize, Serialize};

/// A named artifact produced by the favicon generator
///
/// # Invariants
/// - Immutable after construction
/// - `name` is relative to the configured output directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedArtifact {
    name: String,
    contents: ArtifactContents,
}

impl GeneratedArtifact {
    /// Create new artifact
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>, contents: impl Into<ArtifactContents>) -> Self {
        Self {
            name: name.into(),
            contents: contents.into(),
        }
    }

    /// Relative file name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw contents
    #[inline]
    #[must_use]
    pub fn contents(&self) -> &ArtifactContents {
        &self.contents
    }

    /// Split into name and contents (consumes self)
    #[inline]
    #[must_use]
    pub fn into_parts(self) -> (String, ArtifactContents) {
        (self.name, self.contents)
    }
}

/// Output of one generator invocation
///
/// Created fresh for every compilation and dropped once its artifacts are
/// copied into the host asset table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResult {
    /// Raster/vector icons, in generator order
    #[serde(default)]
    pub images: Vec<GeneratedArtifact>,
    /// Manifests and other auxiliary files, in generator order
    #[serde(default)]
    pub files: Vec<GeneratedArtifact>,
    /// HTML snippets referencing the artifacts
    #[serde(default)]
    pub html: Vec<String>,
}

impl GenerationResult {
    /// Create empty result
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an image
    #[inline]
    #[must_use]
    pub fn with_image(mut self, artifact: GeneratedArtifact) -> Self {
        self.images.push(artifact);
        self
    }

    /// Add an auxiliary file
    #[inline]
    #[must_use]
    pub fn with_file(mut self, artifact: GeneratedArtifact) -> Self {
        self.files.push(artifact);
        self
    }

    /// Add an HTML snippet
    #[inline]
    #[must_use]
    pub fn with_html(mut self, line: impl Into<String>) -> Self {
        self.html.push(line.into());
        self
    }

    /// Images followed by files, each in generator order
    pub fn artifacts(&self) -> impl Iterator<Item = &GeneratedArtifact> {
        self.images.iter().chain(&self.files)
    }

    /// Number of assets an emission of this result produces
    /// (every image and file plus the HTML partial)
    #[inline]
    #[must_use]
    pub fn asset_count(&self) -> usize {
        self.images.len() + self.files.len() + 1
    }

    /// HTML snippets joined with `\n`, verbatim
    #[inline]
    #[must_use]
    pub fn partial_html(&self) -> String {
        self.html.join("\n")
    }

    /// Parse the generator wire format
    ///
    /// # Errors
    /// Returns error if `json` is not a valid generation result
    pub fn from_json(json: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(json)
    }
}
