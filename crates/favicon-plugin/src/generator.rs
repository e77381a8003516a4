//! Artifact generator adapter
//!
//! The generator is an external collaborator bound through the
//! [`FaviconGenerator`] trait. [`GeneratorAdapter`] builds the option map,
//! invokes the generator exactly once per run and applies the optional
//! deadline.

use crate::config::{GeneratorOptions, PluginConfig};
use crate::error::{GenerationError, PluginError};
use favicon_artifact::GenerationResult;
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Favicon generator
///
/// Produces the image files, auxiliary files and HTML snippets for one logo.
/// Implementations must be safe to call from concurrent compilations.
#[async_trait::async_trait]
pub trait FaviconGenerator: Send + Sync {
    /// Generate favicons for `logo` (absolute path)
    async fn generate(
        &self,
        logo: &Path,
        options: &GeneratorOptions,
    ) -> Result<GenerationResult, GenerationError>;
}

/// Invokes the generator with the plugin's options
#[derive(Clone)]
pub struct GeneratorAdapter {
    generator: Arc<dyn FaviconGenerator>,
    options: GeneratorOptions,
    timeout: Option<Duration>,
}

impl GeneratorAdapter {
    /// Create adapter
    ///
    /// `path` is set to `public_path` first and every entry of
    /// `generator_options` is laid over it, so a user `path` key wins.
    #[must_use]
    pub fn new(
        generator: Arc<dyn FaviconGenerator>,
        public_path: &str,
        generator_options: &GeneratorOptions,
        timeout: Option<Duration>,
    ) -> Self {
        let mut options = GeneratorOptions::new();
        options.insert("path".to_string(), Value::String(public_path.to_string()));
        for (key, value) in generator_options {
            options.insert(key.clone(), value.clone());
        }

        Self {
            generator,
            options,
            timeout,
        }
    }

    /// Create adapter from plugin configuration
    #[must_use]
    pub fn from_config(generator: Arc<dyn FaviconGenerator>, config: &PluginConfig) -> Self {
        Self::new(
            generator,
            &config.public_path,
            &config.generator_options,
            config.generation_timeout(),
        )
    }

    /// Options passed to the generator
    #[inline]
    #[must_use]
    pub fn options(&self) -> &GeneratorOptions {
        &self.options
    }

    /// Configured deadline
    #[inline]
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Invoke the generator once
    ///
    /// # Errors
    /// - [`PluginError::Configuration`] if the logo cannot be read
    /// - [`PluginError::Generation`] with the generator's error, unchanged
    /// - [`PluginError::Timeout`] if the deadline passes first
    pub async fn generate(&self, logo: &Path) -> Result<GenerationResult, PluginError> {
        tracing::info!(logo = %logo.display(), "generating favicons");

        let call = self.generator.generate(logo, &self.options);
        let result = match self.timeout {
            Some(timeout) => tokio::time::timeout(timeout, call).await.map_err(|_| {
                PluginError::Timeout {
                    timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
                }
            })?,
            None => call.await,
        }?;

        tracing::info!(
            images = result.images.len(),
            files = result.files.len(),
            html = result.html.len(),
            "favicons generated"
        );
        Ok(result)
    }
}

impl std::fmt::Debug for GeneratorAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeneratorAdapter")
            .field("options", &self.options)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
