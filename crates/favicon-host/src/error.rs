//! Error types for the host pipeline
//!
//! Provides error handling for:
//! - Failed process-assets taps
//! - Failed or aborted compilations
//! - Writing the asset table to disk

use crate::compilation::Compilation;
use favicon_artifact::OutputPath;
use std::path::PathBuf;

/// Boxed error returned by a tap
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A tap rejected its task
///
/// Carries the tap's own error unchanged so callers can downcast it.
#[derive(Debug, thiserror::Error)]
#[error("{tap} failed: {source}")]
pub struct HookError {
    /// Name the tap registered under
    pub tap: String,
    /// Error returned by the tap
    #[source]
    pub source: BoxError,
}

impl HookError {
    /// Wrap a tap error
    #[inline]
    pub fn new(tap: impl Into<String>, source: BoxError) -> Self {
        Self {
            tap: tap.into(),
            source,
        }
    }

    /// Downcast the tap's error
    #[inline]
    #[must_use]
    pub fn downcast_ref<E: std::error::Error + 'static>(&self) -> Option<&E> {
        self.source.downcast_ref::<E>()
    }
}

/// A compilation did not complete
///
/// The compilation is handed back so its asset table and file dependencies
/// stay inspectable; assets written before the failure are still there but
/// must not be relied upon.
#[derive(Debug, thiserror::Error)]
pub enum CompilationError {
    /// One or more taps failed
    #[error("compilation failed with {} error(s)", errors.len())]
    Failed {
        /// Every tap failure, in completion order
        errors: Vec<HookError>,
        /// The failed compilation
        compilation: Box<Compilation>,
    },

    /// The run was aborted through its signal
    #[error("compilation aborted")]
    Aborted {
        /// The aborted compilation
        compilation: Box<Compilation>,
    },
}

impl CompilationError {
    /// The compilation this error belongs to
    #[inline]
    #[must_use]
    pub fn compilation(&self) -> &Compilation {
        match self {
            Self::Failed { compilation, .. } | Self::Aborted { compilation } => compilation,
        }
    }

    /// Tap failures (empty when aborted)
    #[inline]
    #[must_use]
    pub fn errors(&self) -> &[HookError] {
        match self {
            Self::Failed { errors, .. } => errors,
            Self::Aborted { .. } => &[],
        }
    }
}

/// Errors while writing assets to the output directory
#[derive(Debug, thiserror::Error)]
pub enum EmitError {
    /// Asset key climbs above the output root
    #[error("asset '{0}' escapes the output directory")]
    EscapesOutputRoot(OutputPath),

    /// IO error during write
    #[error("io error writing {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl EmitError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
