//! Sweep observer trait for progress reporting and event logging.

use crate::{RunParams, RunReport, SweepReport};

/// Callbacks invoked by [`Coordinator::run`][crate::Coordinator::run] around
/// each sweep combination.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
pub trait ExperimentObserver {
    /// Called before a combination is constructed.
    fn on_run_start(&mut self, _params: &RunParams) {}

    /// Called after a combination's engines have stopped, or after its
    /// construction failed.
    fn on_run_end(&mut self, _report: &RunReport) {}

    /// Called once after the last attempted combination.
    fn on_sweep_end(&mut self, _report: &SweepReport) {}
}

/// An [`ExperimentObserver`] that does nothing.
pub struct NoopObserver;

impl ExperimentObserver for NoopObserver {}
