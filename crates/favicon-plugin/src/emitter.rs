//! Asset emission
//!
//! Writes one generation result into the compilation's asset table: every
//! image, then every file, each under the output directory, then the HTML
//! partial at the output root.

use crate::config::PluginConfig;
use crate::error::PluginError;
use favicon_artifact::{ArtifactContents, ContentHash, GenerationResult, OutputPath};
use favicon_host::{AssetSource, AssetTable};
use std::collections::HashSet;

/// Outcome of one emission
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmitSummary {
    /// Paths written, in write order
    pub emitted: Vec<OutputPath>,
    /// Content digest of each write, parallel to `emitted`
    pub digests: Vec<ContentHash>,
    /// Total bytes written
    pub bytes: u64,
    /// Writes that overwrote an earlier write of the same batch
    pub collisions: usize,
}

/// Copies generated artifacts into the asset table
#[derive(Debug, Clone)]
pub struct AssetEmitter {
    output_directory: String,
    partial_output_name: String,
    strict: bool,
}

impl AssetEmitter {
    /// Create emitter
    #[inline]
    #[must_use]
    pub fn new(
        output_directory: impl Into<String>,
        partial_output_name: impl Into<String>,
        strict: bool,
    ) -> Self {
        Self {
            output_directory: output_directory.into(),
            partial_output_name: partial_output_name.into(),
            strict,
        }
    }

    /// Create emitter from plugin configuration
    #[inline]
    #[must_use]
    pub fn from_config(config: &PluginConfig) -> Self {
        Self::new(
            config.output_directory.clone(),
            config.partial_output_name.clone(),
            config.strict_output_paths,
        )
    }

    /// Emit `result` into `assets`
    ///
    /// Collisions are only detected within this batch; entries already in the
    /// table are overwritten without notice. Outside strict mode the last
    /// write wins and a warning is logged.
    ///
    /// # Errors
    /// - [`PluginError::InvalidOutputPath`] if a name normalizes to nothing
    /// - [`PluginError::EmissionCollision`] in strict mode; nothing is written
    pub fn emit(
        &self,
        assets: &AssetTable,
        result: GenerationResult,
    ) -> Result<EmitSummary, PluginError> {
        let batch = self.plan(result)?;

        let mut seen = HashSet::with_capacity(batch.len());
        let mut collisions = 0;
        for (path, _) in &batch {
            if !seen.insert(path) {
                if self.strict {
                    return Err(PluginError::EmissionCollision { path: path.clone() });
                }
                tracing::warn!(asset = %path, "output path collision, last write wins");
                collisions += 1;
            }
        }

        let mut summary = EmitSummary {
            emitted: Vec::with_capacity(batch.len()),
            digests: Vec::with_capacity(batch.len()),
            bytes: 0,
            collisions,
        };
        for (path, contents) in batch {
            let source = AssetSource::raw(contents);
            let hash = source.hash();
            summary.bytes += source.size() as u64;
            tracing::debug!(asset = %path, size = source.size(), hash = %hash.short(), "emitting asset");
            assets.emit_asset(path.clone(), source);
            summary.emitted.push(path);
            summary.digests.push(hash);
        }

        tracing::info!(
            assets = summary.emitted.len(),
            bytes = summary.bytes,
            collisions = summary.collisions,
            "favicons emitted"
        );
        Ok(summary)
    }

    fn plan(
        &self,
        result: GenerationResult,
    ) -> Result<Vec<(OutputPath, ArtifactContents)>, PluginError> {
        let mut batch = Vec::with_capacity(result.asset_count());
        let partial = ArtifactContents::Text(result.partial_html());

        for artifact in result.images.into_iter().chain(result.files) {
            let (name, contents) = artifact.into_parts();
            batch.push((OutputPath::join(&self.output_directory, &name)?, contents));
        }
        batch.push((OutputPath::new(&self.partial_output_name)?, partial));

        Ok(batch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use favicon_artifact::GeneratedArtifact;

    fn result() -> GenerationResult {
        GenerationResult::new()
            .with_image(GeneratedArtifact::new("icon-32.png", vec![0x89u8, b'P', b'N', b'G']))
            .with_image(GeneratedArtifact::new("icon-16.png", vec![1u8]))
            .with_file(GeneratedArtifact::new("manifest.webmanifest", "{}"))
            .with_html("<link rel=\"icon\" href=\"/static/assets/icon-32.png\">")
            .with_html("<link rel=\"manifest\" href=\"/static/assets/manifest.webmanifest\">")
    }

    #[test]
    fn emits_images_files_then_partial() {
        let table = AssetTable::new();
        let summary = AssetEmitter::new("assets", "favicons.partial.html", false)
            .emit(&table, result())
            .unwrap();

        let keys: Vec<String> = summary.emitted.iter().map(ToString::to_string).collect();
        assert_eq!(
            keys,
            vec![
                "assets/icon-32.png",
                "assets/icon-16.png",
                "assets/manifest.webmanifest",
                "favicons.partial.html",
            ]
        );
        assert_eq!(table.len(), 4);
        assert_eq!(summary.collisions, 0);
        assert_eq!(summary.bytes as usize, table.total_size());
    }

    #[test]
    fn digests_identify_written_contents() {
        let table = AssetTable::new();
        let summary = AssetEmitter::new("assets", "favicons.partial.html", false)
            .emit(&table, result())
            .unwrap();

        assert_eq!(summary.digests.len(), summary.emitted.len());
        assert_eq!(
            summary.digests[0],
            ContentHash::compute(&[0x89u8, b'P', b'N', b'G'])
        );
        for (path, digest) in summary.emitted.iter().zip(&summary.digests) {
            assert_eq!(table.get(path.as_str()).unwrap().hash(), *digest);
        }
    }

    #[test]
    fn contents_are_stored_raw() {
        let table = AssetTable::new();
        AssetEmitter::new("assets", "favicons.partial.html", false)
            .emit(&table, result())
            .unwrap();

        let png = table.get("assets/icon-32.png").unwrap();
        assert_eq!(png.source(), &[0x89u8, b'P', b'N', b'G']);

        let partial = table.get("favicons.partial.html").unwrap();
        assert_eq!(
            partial.source(),
            "<link rel=\"icon\" href=\"/static/assets/icon-32.png\">\n<link rel=\"manifest\" href=\"/static/assets/manifest.webmanifest\">".as_bytes()
        );
    }

    #[test]
    fn empty_html_yields_empty_partial() {
        let table = AssetTable::new();
        AssetEmitter::new("assets", "favicons.partial.html", false)
            .emit(&table, GenerationResult::new())
            .unwrap();

        assert_eq!(table.len(), 1);
        assert!(table.get("favicons.partial.html").unwrap().source().is_empty());
    }

    #[test]
    fn separators_are_normalized() {
        let table = AssetTable::new();
        let summary = AssetEmitter::new("static\\assets/", "partials/head.html", false)
            .emit(
                &table,
                GenerationResult::new().with_image(GeneratedArtifact::new("./a.png", vec![1u8])),
            )
            .unwrap();

        assert_eq!(summary.emitted[0].as_str(), "static/assets/a.png");
        assert_eq!(summary.emitted[1].as_str(), "partials/head.html");
    }

    #[test]
    fn collision_last_write_wins() {
        let table = AssetTable::new();
        let result = GenerationResult::new()
            .with_image(GeneratedArtifact::new("icon.png", vec![1u8]))
            .with_file(GeneratedArtifact::new("icon.png", vec![2u8]));

        let summary = AssetEmitter::new("assets", "favicons.partial.html", false)
            .emit(&table, result)
            .unwrap();

        assert_eq!(summary.collisions, 1);
        assert_eq!(table.len(), 2);
        assert_eq!(table.get("assets/icon.png").unwrap().source(), &[2u8]);
    }

    #[test]
    fn partial_colliding_with_artifact_is_a_collision() {
        let table = AssetTable::new();
        let result = GenerationResult::new()
            .with_file(GeneratedArtifact::new("favicons.partial.html", "stale"))
            .with_html("<link>");

        let summary = AssetEmitter::new("", "favicons.partial.html", false)
            .emit(&table, result)
            .unwrap();

        assert_eq!(summary.collisions, 1);
        assert_eq!(table.get("favicons.partial.html").unwrap().source(), b"<link>");
    }

    #[test]
    fn strict_mode_rejects_batch_before_writing() {
        let table = AssetTable::new();
        let result = GenerationResult::new()
            .with_image(GeneratedArtifact::new("icon.png", vec![1u8]))
            .with_image(GeneratedArtifact::new("icon.png", vec![2u8]));

        let err = AssetEmitter::new("assets", "favicons.partial.html", true)
            .emit(&table, result)
            .unwrap_err();

        match err {
            PluginError::EmissionCollision { path } => assert_eq!(path.as_str(), "assets/icon.png"),
            other => panic!("unexpected error: {other}"),
        }
        assert!(table.is_empty());
    }

    #[test]
    fn existing_table_entries_are_not_collisions() {
        let table = AssetTable::new();
        table.emit_asset(
            OutputPath::new("assets/icon-32.png").unwrap(),
            AssetSource::raw("from another plugin"),
        );

        let summary = AssetEmitter::new("assets", "favicons.partial.html", true)
            .emit(&table, result())
            .unwrap();

        assert_eq!(summary.collisions, 0);
        assert_eq!(
            table.get("assets/icon-32.png").unwrap().source(),
            &[0x89u8, b'P', b'N', b'G']
        );
    }

    #[test]
    fn empty_artifact_name_is_rejected() {
        let table = AssetTable::new();
        let result = GenerationResult::new().with_image(GeneratedArtifact::new(".", vec![1u8]));

        let err = AssetEmitter::new("", "favicons.partial.html", false)
            .emit(&table, result)
            .unwrap_err();
        assert!(matches!(err, PluginError::InvalidOutputPath(_)));
        assert!(table.is_empty());
    }
}
