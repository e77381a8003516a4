//! Per-compilation run state
//!
//! `Idle → DependencyRecorded → Generating → Emitting → Done`, with `Failed`
//! reachable once the run has started. Nothing persists across runs; every
//! compilation starts at `Idle`.

use favicon_host::CompilationId;

/// State of one plugin run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunState {
    /// Not started
    Idle,
    /// Logo recorded as a file dependency
    DependencyRecorded,
    /// Waiting on the generator
    Generating,
    /// Writing into the asset table
    Emitting,
    /// All assets emitted
    Done,
    /// Run failed; the compilation is reported failed
    Failed,
}

impl RunState {
    /// Check if no further transition is possible
    #[inline]
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }
}

/// Illegal transition
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("illegal run state transition: {from:?} -> {to:?}")]
pub struct StateError {
    pub from: RunState,
    pub to: RunState,
}

/// States reachable from `from`
#[must_use]
pub fn allowed_transitions(from: RunState) -> &'static [RunState] {
    use RunState::*;
    match from {
        Idle => &[DependencyRecorded],
        DependencyRecorded => &[Generating, Failed],
        Generating => &[Emitting, Failed],
        Emitting => &[Done, Failed],
        Done | Failed => &[],
    }
}

/// Validate a state transition
///
/// # Errors
/// Returns [`StateError`] if `to` is not reachable from `from`
pub fn validate_transition(from: RunState, to: RunState) -> Result<(), StateError> {
    if allowed_transitions(from).contains(&to) {
        Ok(())
    } else {
        Err(StateError { from, to })
    }
}

/// Tracks the state of one run and logs each transition
#[derive(Debug)]
pub struct RunStateMachine {
    compilation: CompilationId,
    state: RunState,
}

impl RunStateMachine {
    /// Start a run at `Idle`
    #[inline]
    #[must_use]
    pub fn new(compilation: CompilationId) -> Self {
        Self {
            compilation,
            state: RunState::Idle,
        }
    }

    /// Current state
    #[inline]
    #[must_use]
    pub fn state(&self) -> RunState {
        self.state
    }

    /// Move to `to`
    ///
    /// # Errors
    /// Returns [`StateError`] on an illegal transition; the state is unchanged
    pub fn advance(&mut self, to: RunState) -> Result<(), StateError> {
        validate_transition(self.state, to)?;
        tracing::debug!(compilation = %self.compilation, from = ?self.state, to = ?to, "run state");
        self.state = to;
        Ok(())
    }

    /// Mark the run failed
    ///
    /// No-op if the run already reached a terminal state.
    pub fn fail(&mut self) {
        if !self.state.is_terminal() {
            tracing::debug!(compilation = %self.compilation, from = ?self.state, "run failed");
            self.state = RunState::Failed;
        }
    }
}
