//! Two-state lifecycle shared by the periodic engines.

use std::fmt;

/// Lifecycle of a periodic engine: `Stopped → Running → Stopped`.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
pub enum EngineState {
    #[default]
    Stopped,
    Running,
}

impl EngineState {
    #[inline]
    pub fn is_running(self) -> bool {
        matches!(self, EngineState::Running)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EngineState::Stopped => "stopped",
            EngineState::Running => "running",
        }
    }
}

impl fmt::Display for EngineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A startable, stoppable component driven by its own worker thread.
///
/// # Contract
///
/// - `start` on a running engine is a logic error and must be reported
///   (typically as [`DtnError::AlreadyRunning`][crate::DtnError]).
/// - `stop` is idempotent.  When it returns, none of the engine's scheduled
///   actions will fire again.
pub trait Engine: Send {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Short human-readable name used in logs.
    fn name(&self) -> &'static str;

    fn start(&mut self) -> Result<(), Self::Error>;

    fn stop(&mut self) -> Result<(), Self::Error>;

    fn state(&self) -> EngineState;
}
