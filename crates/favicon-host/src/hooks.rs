//! Process-assets hook
//!
//! Extensions register async taps at a named stage of the process-assets
//! phase. The compiler runs stages in order and awaits every tap of a stage
//! before moving on.

use crate::compilation::Compilation;
use crate::error::BoxError;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Ordered stages of the process-assets phase
///
/// Numeric values follow the conventional bundler stage constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ProcessAssetsStage {
    /// Add additional assets from other sources
    Additional,
    /// Basic preprocessing of assets
    PreProcess,
    /// Derive new assets from existing ones
    Derived,
    /// Add assets after primary modules are emitted
    Additions,
    /// Optimize existing assets
    Optimize,
    /// Reduce asset size
    OptimizeSize,
    /// Summarize the asset list
    Summarize,
    /// Create reports
    Report,
}

impl ProcessAssetsStage {
    /// Conventional numeric stage value
    #[inline]
    #[must_use]
    pub const fn value(self) -> i32 {
        match self {
            Self::Additional => -2000,
            Self::PreProcess => -1000,
            Self::Derived => -200,
            Self::Additions => -100,
            Self::Optimize => 100,
            Self::OptimizeSize => 400,
            Self::Summarize => 1000,
            Self::Report => 5000,
        }
    }
}

/// Name and stage of a tap
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TapOptions {
    /// Tap name, used in logs and errors
    pub name: String,
    /// Stage to run at
    pub stage: ProcessAssetsStage,
}

impl TapOptions {
    /// Create tap options
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>, stage: ProcessAssetsStage) -> Self {
        Self {
            name: name.into(),
            stage,
        }
    }
}

/// Async callback run once per compilation
///
/// The host holds the stage pending until the returned future settles; an
/// `Err` marks the compilation failed.
#[async_trait::async_trait]
pub trait ProcessAssetsTap: Send + Sync {
    /// Process the compilation's assets
    async fn process_assets(&self, compilation: &Compilation) -> Result<(), BoxError>;
}

/// A registered tap
#[derive(Clone)]
pub(crate) struct RegisteredTap {
    pub(crate) name: String,
    pub(crate) tap: Arc<dyn ProcessAssetsTap>,
}

/// Taps grouped by stage
#[derive(Clone, Default)]
pub struct ProcessAssetsHook {
    stages: BTreeMap<ProcessAssetsStage, Vec<RegisteredTap>>,
}

impl ProcessAssetsHook {
    /// Create hook with no taps
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an async tap
    pub fn tap_promise(&mut self, options: TapOptions, tap: Arc<dyn ProcessAssetsTap>) {
        tracing::debug!(tap = %options.name, stage = options.stage.value(), "tap process_assets");
        self.stages
            .entry(options.stage)
            .or_default()
            .push(RegisteredTap {
                name: options.name,
                tap,
            });
    }

    /// Check if a tap with this name is registered
    #[must_use]
    pub fn is_tapped(&self, name: &str) -> bool {
        self.stages.values().flatten().any(|t| t.name == name)
    }

    /// Total number of taps
    #[must_use]
    pub fn len(&self) -> usize {
        self.stages.values().map(Vec::len).sum()
    }

    /// Check if no taps are registered
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Tap names at a stage, in registration order
    #[must_use]
    pub fn names_at(&self, stage: ProcessAssetsStage) -> Vec<&str> {
        self.stages
            .get(&stage)
            .map(|taps| taps.iter().map(|t| t.name.as_str()).collect())
            .unwrap_or_default()
    }

    /// Stages in execution order
    pub(crate) fn stages(
        &self,
    ) -> impl Iterator<Item = (&ProcessAssetsStage, &Vec<RegisteredTap>)> {
        self.stages.iter()
    }
}

impl std::fmt::Debug for ProcessAssetsHook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let stages: Vec<_> = self
            .stages
            .iter()
            .map(|(stage, taps)| (stage, taps.iter().map(|t| t.name.as_str()).collect::<Vec<_>>()))
            .collect();
        f.debug_struct("ProcessAssetsHook")
            .field("stages", &stages)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Noop;

    #[async_trait::async_trait]
    impl ProcessAssetsTap for Noop {
        async fn process_assets(&self, _compilation: &Compilation) -> Result<(), BoxError> {
            Ok(())
        }
    }

    #[test]
    fn stages_are_ordered_by_value() {
        let ordered = [
            ProcessAssetsStage::Additional,
            ProcessAssetsStage::PreProcess,
            ProcessAssetsStage::Derived,
            ProcessAssetsStage::Additions,
            ProcessAssetsStage::Optimize,
            ProcessAssetsStage::OptimizeSize,
            ProcessAssetsStage::Summarize,
            ProcessAssetsStage::Report,
        ];
        for pair in ordered.windows(2) {
            assert!(pair[0] < pair[1]);
            assert!(pair[0].value() < pair[1].value());
        }
    }

    #[test]
    fn tap_promise_registers_by_stage() {
        let mut hook = ProcessAssetsHook::new();
        hook.tap_promise(
            TapOptions::new("report", ProcessAssetsStage::Report),
            Arc::new(Noop),
        );
        hook.tap_promise(
            TapOptions::new("favicons", ProcessAssetsStage::Additions),
            Arc::new(Noop),
        );

        assert_eq!(hook.len(), 2);
        assert!(hook.is_tapped("favicons"));
        assert!(!hook.is_tapped("minify"));
        assert_eq!(hook.names_at(ProcessAssetsStage::Additions), vec!["favicons"]);

        let order: Vec<_> = hook.stages().map(|(stage, _)| *stage).collect();
        assert_eq!(
            order,
            vec![ProcessAssetsStage::Additions, ProcessAssetsStage::Report]
        );
    }
}
