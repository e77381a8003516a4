//! Favicon Artifacts
//!
//! Data model shared by the host pipeline and the favicon plugin.
//!
//! # Core Concepts
//!
//! - [`GeneratedArtifact`]: Named binary or text blob produced by the generator
//! - [`GenerationResult`]: Images, files and HTML snippets from one invocation
//! - [`ArtifactContents`]: Binary-safe artifact payload
//! - [`OutputPath`]: Forward-slash asset key relative to the output root
//! - [`ContentHash`]: 32-byte Blake3 digest of asset contents
//!
//! # Example
//!
//! ```rust
//! use favicon_artifact::{GeneratedArtifact, GenerationResult, OutputPath};
//!
//! let result = GenerationResult::new()
//!     .with_image(GeneratedArtifact::new("icon-32.png", vec![0x89, b'P', b'N', b'G']))
//!     .with_html("<link rel=\"icon\" href=\"/static/assets/icon-32.png\">");
//!
//! let key = OutputPath::join("assets", result.images[0].name()).unwrap();
//! assert_eq!(key.as_str(), "assets/icon-32.png");
//! assert_eq!(result.asset_count(), 2);
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
mod artifact;
mod contents;
mod hash;
mod path;

// Re-exports
pub use artifact::{GeneratedArtifact, GenerationResult};
pub use contents::ArtifactContents;
pub use hash::{ContentHash, HashError};
pub use path::{OutputPath, PathError};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod integration_tests {
    use super::*;

    #[test]
    fn result_artifacts_map_to_output_keys() {
        let result = GenerationResult::new()
            .with_image(GeneratedArtifact::new("android-chrome-192x192.png", vec![1u8]))
            .with_file(GeneratedArtifact::new("browserconfig.xml", "<browserconfig/>"));

        let keys: Vec<String> = result
            .artifacts()
            .map(|a| OutputPath::join("assets", a.name()).unwrap().to_string())
            .collect();

        assert_eq!(
            keys,
            vec!["assets/android-chrome-192x192.png", "assets/browserconfig.xml"]
        );
    }

    #[test]
    fn contents_hash_matches_artifact_bytes() {
        let artifact = GeneratedArtifact::new("favicon.ico", vec![0u8, 0, 1, 0]);
        assert_eq!(
            artifact.contents().hash(),
            ContentHash::compute(&[0u8, 0, 1, 0])
        );
    }
}
