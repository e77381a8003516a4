//! Dependency tracking for the logo file

use crate::config::PluginConfig;
use favicon_host::Compilation;
use std::path::{Component, Path, PathBuf};

/// Records the logo as a file dependency of each compilation
///
/// Tracking happens before the generator runs, so a watcher reruns the build
/// when the logo changes even if the previous generation failed.
#[derive(Debug, Clone)]
pub struct DependencyTracker {
    context: PathBuf,
}

impl DependencyTracker {
    /// Create tracker resolving against the compiler `context`
    #[inline]
    #[must_use]
    pub fn new(context: impl Into<PathBuf>) -> Self {
        Self {
            context: context.into(),
        }
    }

    /// Resolve `logo_path` against the context
    ///
    /// Absolute paths are kept. A relative context is anchored at the
    /// process working directory, so the result is always absolute. `.` and
    /// `..` are folded lexically; the file does not need to exist.
    #[must_use]
    pub fn resolve(&self, logo_path: &Path) -> PathBuf {
        let joined = self.context.join(logo_path);
        if joined.is_absolute() {
            return normalize(&joined);
        }
        match std::env::current_dir() {
            Ok(cwd) => normalize(&cwd.join(joined)),
            Err(e) => {
                tracing::warn!(error = %e, logo = %joined.display(), "cannot read working directory, logo path stays relative");
                normalize(&joined)
            }
        }
    }

    /// Add the resolved logo path to the compilation's file dependencies
    ///
    /// Returns the absolute path for handing to the generator.
    pub fn track(&self, compilation: &Compilation, config: &PluginConfig) -> PathBuf {
        let logo = self.resolve(&config.logo_path);
        if compilation.file_dependencies().add(logo.clone()) {
            tracing::debug!(compilation = %compilation.id(), logo = %logo.display(), "tracked logo dependency");
        }
        logo
    }
}

fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // `..` at the root stays at the root
                if !matches!(
                    out.components().next_back(),
                    None | Some(Component::RootDir | Component::Prefix(_))
                ) {
                    out.pop();
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
