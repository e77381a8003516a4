//! Testing utilities for the favicon workspace
//!
//! Stub generators, fixture results and compiler setup.

#![allow(missing_docs)]

use favicon_artifact::{GeneratedArtifact, GenerationResult};
use favicon_host::Compiler;
use favicon_plugin::{
    FaviconGenerator, FaviconsPartialPlugin, GenerationError, GeneratorOptions, PluginConfig,
};
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Bytes of the fixture icon (PNG signature)
pub const ICON_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

/// HTML line of the fixture result
pub const ICON_HTML: &str = "<link rel=\"icon\" href=\"/static/assets/icon-32.png\">";

/// Single 32px icon, no files, one HTML line
pub fn icon_result() -> GenerationResult {
    GenerationResult::new()
        .with_image(GeneratedArtifact::new("icon-32.png", ICON_BYTES))
        .with_html(ICON_HTML)
}

/// Icons, a manifest and several HTML lines
pub fn full_result() -> GenerationResult {
    GenerationResult::new()
        .with_image(GeneratedArtifact::new("favicon-16x16.png", vec![1u8, 6]))
        .with_image(GeneratedArtifact::new("favicon-32x32.png", vec![3u8, 2]))
        .with_image(GeneratedArtifact::new("apple-touch-icon.png", vec![1u8, 8, 0]))
        .with_file(GeneratedArtifact::new("manifest.webmanifest", "{\"name\":\"Siren\"}"))
        .with_file(GeneratedArtifact::new("browserconfig.xml", "<browserconfig/>"))
        .with_html("<link rel=\"icon\" type=\"image/png\" sizes=\"16x16\" href=\"/static/assets/favicon-16x16.png\">")
        .with_html("<link rel=\"icon\" type=\"image/png\" sizes=\"32x32\" href=\"/static/assets/favicon-32x32.png\">")
        .with_html("<link rel=\"manifest\" href=\"/static/assets/manifest.webmanifest\">")
}

/// One recorded generator call
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorCall {
    pub logo: PathBuf,
    pub options: GeneratorOptions,
}

/// Generator returning a fixed result and recording every call
#[derive(Debug, Default)]
pub struct StubGenerator {
    result: GenerationResult,
    calls: Mutex<Vec<GeneratorCall>>,
}

impl StubGenerator {
    pub fn new(result: GenerationResult) -> Self {
        Self {
            result,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<GeneratorCall> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

#[async_trait::async_trait]
impl FaviconGenerator for StubGenerator {
    async fn generate(
        &self,
        logo: &Path,
        options: &GeneratorOptions,
    ) -> Result<GenerationResult, GenerationError> {
        self.calls.lock().push(GeneratorCall {
            logo: logo.to_path_buf(),
            options: options.clone(),
        });
        Ok(self.result.clone())
    }
}

/// Error raised by [`FailingGenerator`]
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct StubError(pub String);

/// Generator that always fails with a fixed message, counting calls
#[derive(Debug)]
pub struct FailingGenerator {
    message: String,
    calls: AtomicUsize,
}

impl FailingGenerator {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for FailingGenerator {
    fn default() -> Self {
        Self::new("bad image")
    }
}

#[async_trait::async_trait]
impl FaviconGenerator for FailingGenerator {
    async fn generate(
        &self,
        _logo: &Path,
        _options: &GeneratorOptions,
    ) -> Result<GenerationResult, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(GenerationError::other(StubError(self.message.clone())))
    }
}

/// Generator that sleeps before returning its result
///
/// Calls are counted when they start, so a call cut short by a timeout
/// still counts.
#[derive(Debug)]
pub struct SlowGenerator {
    delay: Duration,
    result: GenerationResult,
    calls: AtomicUsize,
}

impl SlowGenerator {
    pub fn new(delay: Duration, result: GenerationResult) -> Self {
        Self {
            delay,
            result,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl FaviconGenerator for SlowGenerator {
    async fn generate(
        &self,
        _logo: &Path,
        _options: &GeneratorOptions,
    ) -> Result<GenerationResult, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        Ok(self.result.clone())
    }
}

/// Compiler rooted at `/project` with the plugin applied
pub fn setup_test_compiler(
    config: PluginConfig,
    generator: Arc<dyn FaviconGenerator>,
) -> (Compiler, FaviconsPartialPlugin) {
    let plugin = FaviconsPartialPlugin::new(config, generator).unwrap();
    let compiler = Compiler::new("/project", "/project/static").with_plugin(&plugin);
    (compiler, plugin)
}
