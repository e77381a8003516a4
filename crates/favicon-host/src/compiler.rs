//! Compiler and plugin contract
//!
//! The [`Compiler`] owns the build context, output directory and hooks.
//! Plugins register taps once in [`Plugin::apply`]; every call to
//! [`Compiler::run`] then creates a fresh [`Compilation`] and drives the
//! process-assets stages over it.

use crate::compilation::{AbortSignal, Compilation};
use crate::error::{CompilationError, EmitError, HookError};
use crate::hooks::ProcessAssetsHook;
use futures::future::join_all;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Build extension
///
/// `apply` runs once per compiler and registers whatever taps the plugin needs.
pub trait Plugin: Send + Sync {
    /// Plugin name
    fn name(&self) -> &'static str;

    /// Register the plugin's taps on `compiler`
    fn apply(&self, compiler: &mut Compiler);
}

/// Compiler-level hooks
#[derive(Debug, Default)]
pub struct CompilerHooks {
    /// Process-assets phase of each compilation
    pub process_assets: ProcessAssetsHook,
}

/// Compiler identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CompilerId(Uuid);

/// Host compiler
#[derive(Debug)]
pub struct Compiler {
    id: CompilerId,
    context: PathBuf,
    output_path: PathBuf,
    /// Hooks extensions tap into
    pub hooks: CompilerHooks,
}

impl Compiler {
    /// Create compiler rooted at `context`, writing to `output_path`
    #[must_use]
    pub fn new(context: impl Into<PathBuf>, output_path: impl Into<PathBuf>) -> Self {
        Self {
            id: CompilerId(Uuid::new_v4()),
            context: context.into(),
            output_path: output_path.into(),
            hooks: CompilerHooks::default(),
        }
    }

    /// Apply a plugin (builder style)
    #[must_use]
    pub fn with_plugin(mut self, plugin: &dyn Plugin) -> Self {
        self.apply_plugin(plugin);
        self
    }

    /// Apply a plugin
    pub fn apply_plugin(&mut self, plugin: &dyn Plugin) {
        tracing::debug!(plugin = plugin.name(), "applying plugin");
        plugin.apply(self);
    }

    /// Compiler ID
    #[inline]
    #[must_use]
    pub fn id(&self) -> CompilerId {
        self.id
    }

    /// Root context directory relative inputs resolve against
    #[inline]
    #[must_use]
    pub fn context(&self) -> &Path {
        &self.context
    }

    /// Bundle output root
    #[inline]
    #[must_use]
    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Run one compilation with a fresh abort signal
    ///
    /// # Errors
    /// Returns [`CompilationError::Failed`] if any tap fails
    pub async fn run(&self) -> Result<Compilation, CompilationError> {
        self.run_with_signal(AbortSignal::new()).await
    }

    /// Run one compilation
    ///
    /// Stages run in order. Taps sharing a stage run concurrently and are all
    /// awaited; if any of them fails, later stages are skipped.
    ///
    /// # Errors
    /// - [`CompilationError::Aborted`] if `signal` is aborted between stages
    /// - [`CompilationError::Failed`] with every tap error of the failing stage
    pub async fn run_with_signal(
        &self,
        signal: AbortSignal,
    ) -> Result<Compilation, CompilationError> {
        let compilation = Compilation::new(signal);
        tracing::info!(compilation = %compilation.id(), "compilation started");

        for (stage, taps) in self.hooks.process_assets.stages() {
            if compilation.abort_signal().is_aborted() {
                tracing::warn!(compilation = %compilation.id(), "compilation aborted");
                return Err(CompilationError::Aborted {
                    compilation: Box::new(compilation),
                });
            }

            tracing::debug!(stage = stage.value(), taps = taps.len(), "process_assets stage");
            let results = join_all(taps.iter().map(|registered| {
                let compilation = &compilation;
                async move {
                    registered
                        .tap
                        .process_assets(compilation)
                        .await
                        .map_err(|e| HookError::new(registered.name.clone(), e))
                }
            }))
            .await;

            let errors: Vec<HookError> = results.into_iter().filter_map(Result::err).collect();
            if !errors.is_empty() {
                for error in &errors {
                    tracing::error!(tap = %error.tap, "{}", error.source);
                }
                return Err(CompilationError::Failed {
                    errors,
                    compilation: Box::new(compilation),
                });
            }
        }

        tracing::info!(
            compilation = %compilation.id(),
            assets = compilation.assets().len(),
            "compilation finished"
        );
        Ok(compilation)
    }

    /// Write every asset of `compilation` under the output root
    ///
    /// Returns the written file paths in emission order.
    ///
    /// # Errors
    /// - [`EmitError::EscapesOutputRoot`] for keys starting with `..`
    /// - [`EmitError::Io`] if a directory or file cannot be written
    pub async fn emit(&self, compilation: &Compilation) -> Result<Vec<PathBuf>, EmitError> {
        let mut written = Vec::new();

        for (key, source) in compilation.assets().snapshot() {
            if key.escapes_root() {
                return Err(EmitError::EscapesOutputRoot(key));
            }

            let target = key.to_native(&self.output_path);
            if let Some(parent) = target.parent() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| EmitError::io_error(parent, e))?;
            }
            tokio::fs::write(&target, source.source())
                .await
                .map_err(|e| EmitError::io_error(&target, e))?;

            tracing::debug!(asset = %key, path = %target.display(), hash = %source.hash().short(), "wrote asset");
            written.push(target);
        }

        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::AssetSource;
    use crate::error::BoxError;
    use crate::hooks::{ProcessAssetsStage, ProcessAssetsTap, TapOptions};
    use favicon_artifact::OutputPath;
    use parking_lot::Mutex;
    use std::sync::Arc;

    struct EmitTap {
        path: &'static str,
        body: &'static str,
        log: Arc<Mutex<Vec<&'static str>>>,
    }

    #[async_trait::async_trait]
    impl ProcessAssetsTap for EmitTap {
        async fn process_assets(&self, compilation: &Compilation) -> Result<(), BoxError> {
            self.log.lock().push(self.path);
            compilation
                .assets()
                .emit_asset(OutputPath::new(self.path)?, AssetSource::raw(self.body));
            Ok(())
        }
    }

    #[derive(Debug, thiserror::Error)]
    #[error("tap exploded")]
    struct Explode;

    struct FailingTap;

    #[async_trait::async_trait]
    impl ProcessAssetsTap for FailingTap {
        async fn process_assets(&self, _compilation: &Compilation) -> Result<(), BoxError> {
            Err(Box::new(Explode))
        }
    }

    struct NamedPlugin;

    impl Plugin for NamedPlugin {
        fn name(&self) -> &'static str {
            "NamedPlugin"
        }

        fn apply(&self, compiler: &mut Compiler) {
            compiler.hooks.process_assets.tap_promise(
                TapOptions::new(self.name(), ProcessAssetsStage::Additions),
                Arc::new(EmitTap {
                    path: "named.txt",
                    body: "named",
                    log: Arc::default(),
                }),
            );
        }
    }

    fn tap(
        compiler: &mut Compiler,
        name: &str,
        stage: ProcessAssetsStage,
        tap: impl ProcessAssetsTap + 'static,
    ) {
        compiler
            .hooks
            .process_assets
            .tap_promise(TapOptions::new(name, stage), Arc::new(tap));
    }

    #[tokio::test]
    async fn stages_run_in_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut compiler = Compiler::new("/project", "/project/static");
        tap(
            &mut compiler,
            "report",
            ProcessAssetsStage::Report,
            EmitTap { path: "report.json", body: "{}", log: log.clone() },
        );
        tap(
            &mut compiler,
            "additions",
            ProcessAssetsStage::Additions,
            EmitTap { path: "extra.txt", body: "x", log: log.clone() },
        );

        let compilation = compiler.run().await.unwrap();
        assert_eq!(*log.lock(), vec!["extra.txt", "report.json"]);
        assert_eq!(compilation.assets().len(), 2);
    }

    #[tokio::test]
    async fn each_run_gets_a_fresh_compilation() {
        let compiler = Compiler::new("/project", "/out").with_plugin(&NamedPlugin);

        let first = compiler.run().await.unwrap();
        let second = compiler.run().await.unwrap();

        assert_ne!(first.id(), second.id());
        assert_eq!(first.assets().len(), 1);
        assert_eq!(second.assets().len(), 1);
    }

    #[tokio::test]
    async fn failing_tap_fails_compilation_and_skips_later_stages() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut compiler = Compiler::new("/project", "/out");
        tap(&mut compiler, "boom", ProcessAssetsStage::Additions, FailingTap);
        tap(
            &mut compiler,
            "sibling",
            ProcessAssetsStage::Additions,
            EmitTap { path: "sibling.txt", body: "s", log: log.clone() },
        );
        tap(
            &mut compiler,
            "later",
            ProcessAssetsStage::Report,
            EmitTap { path: "later.txt", body: "l", log: log.clone() },
        );

        let err = compiler.run().await.unwrap_err();
        assert_eq!(err.errors().len(), 1);
        assert_eq!(err.errors()[0].tap, "boom");
        assert!(err.errors()[0].downcast_ref::<Explode>().is_some());

        // Sibling on the same stage still completed, later stage never ran
        assert!(err.compilation().assets().contains("sibling.txt"));
        assert!(!err.compilation().assets().contains("later.txt"));
    }

    #[tokio::test]
    async fn aborted_signal_stops_before_first_stage() {
        let compiler = Compiler::new("/project", "/out").with_plugin(&NamedPlugin);
        let signal = AbortSignal::new();
        signal.abort();

        let err = compiler.run_with_signal(signal).await.unwrap_err();
        assert!(matches!(err, CompilationError::Aborted { .. }));
        assert!(err.compilation().assets().is_empty());
    }

    #[tokio::test]
    async fn emit_writes_assets_under_output_root() {
        let dir = tempfile::tempdir().unwrap();
        let compiler = Compiler::new(dir.path(), dir.path().join("static"));
        let compilation = Compilation::new(AbortSignal::new());
        compilation.assets().emit_asset(
            OutputPath::new("assets/icon.png").unwrap(),
            AssetSource::raw(vec![0x89u8, b'P']),
        );
        compilation.assets().emit_asset(
            OutputPath::new("favicons.partial.html").unwrap(),
            AssetSource::raw("<link>"),
        );

        let written = compiler.emit(&compilation).await.unwrap();
        assert_eq!(written.len(), 2);
        let png = std::fs::read(dir.path().join("static/assets/icon.png")).unwrap();
        assert_eq!(png, vec![0x89u8, b'P']);
        let html = std::fs::read_to_string(dir.path().join("static/favicons.partial.html")).unwrap();
        assert_eq!(html, "<link>");
    }

    #[tokio::test]
    async fn emit_rejects_keys_outside_output_root() {
        let dir = tempfile::tempdir().unwrap();
        let compiler = Compiler::new(dir.path(), dir.path().join("static"));
        let compilation = Compilation::new(AbortSignal::new());
        compilation.assets().emit_asset(
            OutputPath::new("../escape.txt").unwrap(),
            AssetSource::raw("x"),
        );

        let err = compiler.emit(&compilation).await.unwrap_err();
        assert!(matches!(err, EmitError::EscapesOutputRoot(_)));
    }
}
