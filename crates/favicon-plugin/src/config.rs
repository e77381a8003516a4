//! Plugin configuration
//!
//! [`PluginConfig`] is built once from user options merged over defaults and
//! is immutable afterwards. Keys use the camelCase names build configs are
//! written with (`logoPath`, `outputDirectory`, ...).

use crate::error::ConfigurationError;
use favicon_artifact::OutputPath;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Options passed through verbatim to the generator
pub type GeneratorOptions = Map<String, Value>;

/// Default output directory for generated artifacts
pub const DEFAULT_OUTPUT_DIRECTORY: &str = "assets";
/// Default URL prefix used inside the generated HTML
pub const DEFAULT_PUBLIC_PATH: &str = "/static/assets";
/// Default file name of the HTML partial
pub const DEFAULT_PARTIAL_OUTPUT_NAME: &str = "favicons.partial.html";

/// Favicon plugin configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PluginConfig {
    /// Source image, relative to the compiler context
    pub logo_path: PathBuf,
    /// Directory under the output root receiving images and files
    pub output_directory: String,
    /// URL prefix the generator uses in HTML
    pub public_path: String,
    /// Output file name of the HTML partial
    pub partial_output_name: String,
    /// Generator options; replaces the defaults wholesale when given
    pub generator_options: GeneratorOptions,
    /// Deadline for one generator call; none waits indefinitely
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_timeout_ms: Option<u64>,
    /// Reject runs whose artifacts collide on an output path
    pub strict_output_paths: bool,
}

impl PluginConfig {
    /// Create configuration for `logo_path` with defaults elsewhere
    #[inline]
    #[must_use]
    pub fn new(logo_path: impl Into<PathBuf>) -> Self {
        Self {
            logo_path: logo_path.into(),
            ..Self::default()
        }
    }

    /// Merge user options over defaults
    ///
    /// # Errors
    /// Returns error if `options` has the wrong shape or fails validation
    pub fn from_options(options: Value) -> Result<Self, ConfigurationError> {
        let config: Self = serde_json::from_value(options)?;
        config.validate()?;
        Ok(config)
    }

    /// Load options from a `.json`, `.yaml`/`.yml` or `.toml` file
    ///
    /// # Errors
    /// Returns error if the file cannot be read or parsed, or fails validation
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigurationError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigurationError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        let config: Self = match extension.as_deref() {
            Some("json") => serde_json::from_str(&text)
                .map_err(|e| ConfigurationError::parse_error(path, e))?,
            Some("yaml" | "yml") => serde_yaml::from_str(&text)
                .map_err(|e| ConfigurationError::parse_error(path, e))?,
            Some("toml") => {
                toml::from_str(&text).map_err(|e| ConfigurationError::parse_error(path, e))?
            }
            _ => return Err(ConfigurationError::UnsupportedFormat(path.to_path_buf())),
        };

        config.validate()?;
        tracing::debug!(path = %path.display(), logo = %config.logo_path.display(), "loaded plugin config");
        Ok(config)
    }

    /// Check required options
    ///
    /// The logo is not checked for existence here; a missing file surfaces
    /// when the generator tries to read it.
    ///
    /// # Errors
    /// - [`ConfigurationError::MissingLogoPath`] if `logo_path` is empty
    /// - [`ConfigurationError::InvalidPartialName`] if the partial name is empty
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.logo_path.as_os_str().is_empty() {
            return Err(ConfigurationError::MissingLogoPath);
        }
        if OutputPath::new(&self.partial_output_name).is_err() {
            return Err(ConfigurationError::InvalidPartialName(
                self.partial_output_name.clone(),
            ));
        }
        Ok(())
    }

    /// With output directory
    #[inline]
    #[must_use]
    pub fn with_output_directory(mut self, dir: impl Into<String>) -> Self {
        self.output_directory = dir.into();
        self
    }

    /// With public path
    #[inline]
    #[must_use]
    pub fn with_public_path(mut self, public_path: impl Into<String>) -> Self {
        self.public_path = public_path.into();
        self
    }

    /// With partial output name
    #[inline]
    #[must_use]
    pub fn with_partial_output_name(mut self, name: impl Into<String>) -> Self {
        self.partial_output_name = name.into();
        self
    }

    /// Replace generator options
    #[inline]
    #[must_use]
    pub fn with_generator_options(mut self, options: GeneratorOptions) -> Self {
        self.generator_options = options;
        self
    }

    /// Set a single generator option
    #[inline]
    #[must_use]
    pub fn with_generator_option(mut self, key: impl Into<String>, value: Value) -> Self {
        self.generator_options.insert(key.into(), value);
        self
    }

    /// With generation deadline
    #[inline]
    #[must_use]
    pub fn with_generation_timeout(mut self, timeout: Duration) -> Self {
        self.generation_timeout_ms = Some(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX));
        self
    }

    /// With strict output path checking
    #[inline]
    #[must_use]
    pub fn with_strict_output_paths(mut self, strict: bool) -> Self {
        self.strict_output_paths = strict;
        self
    }

    /// Generation deadline, if any
    #[inline]
    #[must_use]
    pub fn generation_timeout(&self) -> Option<Duration> {
        self.generation_timeout_ms.map(Duration::from_millis)
    }
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            logo_path: PathBuf::new(),
            output_directory: DEFAULT_OUTPUT_DIRECTORY.to_string(),
            public_path: DEFAULT_PUBLIC_PATH.to_string(),
            partial_output_name: DEFAULT_PARTIAL_OUTPUT_NAME.to_string(),
            generator_options: default_generator_options(),
            generation_timeout_ms: None,
            strict_output_paths: false,
        }
    }
}

/// Generator options used when the user supplies none
#[must_use]
pub fn default_generator_options() -> GeneratorOptions {
    let Value::Object(options) = json!({
        "appName": "",
        "appDescription": "",
        "developerName": "",
        "background": "#ddd",
        "theme_color": "#000",
        "icons": { "coast": false, "yandex": false },
    }) else {
        unreachable!("json! object literal")
    };
    options
}
