//! Error types for the favicon plugin
//!
//! Provides error handling for:
//! - Plugin configuration (missing or unreadable logo, bad config files)
//! - Generator failures
//! - Output path collisions in strict mode
//! - Timeouts and aborted compilations

use crate::state::StateError;
use favicon_artifact::{OutputPath, PathError};
use favicon_host::BoxError;
use std::path::PathBuf;

/// Main plugin error type
///
/// Every variant is fatal to the compilation it occurs in; the plugin never
/// retries and never rolls back assets already emitted.
#[derive(Debug, thiserror::Error)]
pub enum PluginError {
    /// Configuration or logo problem
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// The generator failed
    #[error("generation failed: {0}")]
    Generation(GenerationError),

    /// Two artifacts map to the same output path (strict mode only)
    #[error("output path collision: {path}")]
    EmissionCollision { path: OutputPath },

    /// An artifact name does not form a usable output path
    #[error("invalid output path: {0}")]
    InvalidOutputPath(#[from] PathError),

    /// Generator exceeded the configured deadline
    #[error("generation timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// The compilation was aborted by the host
    #[error("compilation aborted")]
    Aborted,

    /// Illegal run state transition
    #[error("state error: {0}")]
    State(#[from] StateError),
}

impl PluginError {
    /// Check if the error fails the compilation
    ///
    /// Always true: the plugin has no recoverable errors. Collisions outside
    /// strict mode are logged and never surface as errors.
    #[inline]
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        true
    }

    /// Check if the error stems from configuration
    #[inline]
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_) | Self::InvalidOutputPath(_))
    }

    /// Check if the generator itself failed
    #[inline]
    #[must_use]
    pub fn is_generation(&self) -> bool {
        matches!(self, Self::Generation(_) | Self::Timeout { .. })
    }
}

// An unreadable logo is a configuration problem even though the generator
// is the one that notices it.
impl From<GenerationError> for PluginError {
    fn from(error: GenerationError) -> Self {
        match error {
            GenerationError::LogoUnreadable { path, source } => {
                Self::Configuration(ConfigurationError::LogoUnreadable { path, source })
            }
            other => Self::Generation(other),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    /// `logoPath` not set
    #[error("logoPath is required")]
    MissingLogoPath,

    /// Logo cannot be read
    #[error("logo {path} is unreadable: {source}")]
    LogoUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// `partialOutputName` does not name a file
    #[error("partialOutputName '{0}' is not a valid output path")]
    InvalidPartialName(String),

    /// IO error reading a config file
    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file could not be parsed
    #[error("cannot parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    /// Config value could not be deserialized
    #[error("invalid plugin options: {0}")]
    InvalidOptions(#[from] serde_json::Error),

    /// Unknown config file extension
    #[error("unsupported config format: {0} (expected .json, .yaml, .yml or .toml)")]
    UnsupportedFormat(PathBuf),
}

impl ConfigurationError {
    /// Create parse error for path
    pub fn parse_error(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.to_string(),
        }
    }
}

/// Errors raised by a favicon generator
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// Logo missing or unreadable
    #[error("cannot read logo {path}: {source}")]
    LogoUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Generator process could not be started
    #[error("cannot start generator '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Generator process exited unsuccessfully
    #[error("generator exited with {status}: {stderr}")]
    Failed { status: String, stderr: String },

    /// Request could not be encoded, e.g. a non-UTF-8 logo path
    #[error("cannot encode generator request: {0}")]
    InvalidRequest(#[source] serde_json::Error),

    /// Generator output is not a valid generation result
    #[error("invalid generator output: {0}")]
    InvalidOutput(#[from] serde_json::Error),

    /// IO error talking to the generator
    #[error("generator io error: {0}")]
    Io(#[from] std::io::Error),

    /// Any other generator failure, passed through unchanged
    #[error("{0}")]
    Other(BoxError),
}

impl GenerationError {
    /// Wrap an arbitrary generator error
    #[inline]
    pub fn other(error: impl Into<BoxError>) -> Self {
        Self::Other(error.into())
    }
}
