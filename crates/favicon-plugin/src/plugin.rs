//! Lifecycle binding
//!
//! [`FaviconsPartialPlugin`] taps the host's process-assets hook once per
//! compiler. On every compilation the tap records the logo dependency, runs
//! the generator and emits the result.

use crate::config::PluginConfig;
use crate::emitter::{AssetEmitter, EmitSummary};
use crate::error::{ConfigurationError, PluginError};
use crate::generator::{FaviconGenerator, GeneratorAdapter};
use crate::state::{RunState, RunStateMachine};
use crate::tracker::DependencyTracker;
use favicon_host::{
    BoxError, Compilation, Compiler, CompilerId, Plugin, ProcessAssetsStage, ProcessAssetsTap,
    TapOptions,
};
use parking_lot::Mutex;
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

/// Name the plugin taps the host under
pub const PLUGIN_NAME: &str = "FaviconsPartialPlugin";

/// Stage the plugin runs at
pub const PLUGIN_STAGE: ProcessAssetsStage = ProcessAssetsStage::Additions;

/// Favicon plugin
///
/// # Example
///
/// ```rust,ignore
/// let plugin = FaviconsPartialPlugin::new(
///     PluginConfig::new("frontend/logo.svg"),
///     Arc::new(CommandGenerator::new("favicons-cli")),
/// )?;
/// let compiler = Compiler::new("/project", "/project/static").with_plugin(&plugin);
/// ```
pub struct FaviconsPartialPlugin {
    config: Arc<PluginConfig>,
    generator: Arc<dyn FaviconGenerator>,
    registered: Mutex<HashSet<CompilerId>>,
}

impl FaviconsPartialPlugin {
    /// Create plugin
    ///
    /// # Errors
    /// Returns error if `config` fails validation
    pub fn new(
        config: PluginConfig,
        generator: Arc<dyn FaviconGenerator>,
    ) -> Result<Self, ConfigurationError> {
        config.validate()?;
        Ok(Self {
            config: Arc::new(config),
            generator,
            registered: Mutex::new(HashSet::new()),
        })
    }

    /// Plugin configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &PluginConfig {
        &self.config
    }
}

impl std::fmt::Debug for FaviconsPartialPlugin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FaviconsPartialPlugin")
            .field("config", &self.config)
            .field("registered", &self.registered.lock().len())
            .finish_non_exhaustive()
    }
}

impl Plugin for FaviconsPartialPlugin {
    fn name(&self) -> &'static str {
        PLUGIN_NAME
    }

    fn apply(&self, compiler: &mut Compiler) {
        if !self.registered.lock().insert(compiler.id()) {
            tracing::debug!(plugin = PLUGIN_NAME, "already applied to this compiler");
            return;
        }

        let tap = FaviconsTap {
            config: Arc::clone(&self.config),
            tracker: DependencyTracker::new(compiler.context()),
            adapter: GeneratorAdapter::from_config(Arc::clone(&self.generator), &self.config),
            emitter: AssetEmitter::from_config(&self.config),
        };

        compiler
            .hooks
            .process_assets
            .tap_promise(TapOptions::new(PLUGIN_NAME, PLUGIN_STAGE), Arc::new(tap));
    }
}

struct FaviconsTap {
    config: Arc<PluginConfig>,
    tracker: DependencyTracker,
    adapter: GeneratorAdapter,
    emitter: AssetEmitter,
}

impl FaviconsTap {
    async fn run(&self, compilation: &Compilation) -> Result<EmitSummary, PluginError> {
        let mut state = RunStateMachine::new(compilation.id());

        let logo = self.tracker.track(compilation, &self.config);
        state.advance(RunState::DependencyRecorded)?;

        let result = self.generate_and_emit(compilation, &logo, &mut state).await;
        if result.is_err() {
            state.fail();
        }
        result
    }

    async fn generate_and_emit(
        &self,
        compilation: &Compilation,
        logo: &Path,
        state: &mut RunStateMachine,
    ) -> Result<EmitSummary, PluginError> {
        if compilation.abort_signal().is_aborted() {
            return Err(PluginError::Aborted);
        }

        state.advance(RunState::Generating)?;
        let result = self.adapter.generate(logo).await?;

        // The host may have started a newer compilation while we waited
        if compilation.abort_signal().is_aborted() {
            tracing::warn!(compilation = %compilation.id(), "compilation aborted, dropping favicons");
            return Err(PluginError::Aborted);
        }

        state.advance(RunState::Emitting)?;
        let summary = self.emitter.emit(compilation.assets(), result)?;
        state.advance(RunState::Done)?;
        Ok(summary)
    }
}

#[async_trait::async_trait]
impl ProcessAssetsTap for FaviconsTap {
    async fn process_assets(&self, compilation: &Compilation) -> Result<(), BoxError> {
        self.run(compilation).await?;
        Ok(())
    }
}
