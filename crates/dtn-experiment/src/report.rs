//! Per-run and per-sweep results.

use std::fmt;
use std::time::Duration;

use crate::RunParams;

/// How one sweep combination ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RunOutcome {
    /// Ran for the full duration.
    Completed,
    /// Construction or startup failed; carries the error message.
    Failed(String),
    /// The shutdown signal ended the run early.  No later run starts.
    Interrupted,
}

impl RunOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Failed(_) => "failed",
            Self::Interrupted => "interrupted",
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Failed(reason) => write!(f, "failed: {reason}"),
            other => f.write_str(other.as_str()),
        }
    }
}

#[derive(Clone, Debug)]
pub struct RunReport {
    pub params:      RunParams,
    pub outcome:     RunOutcome,
    /// Messages written to the run's store.
    pub messages:    u64,
    /// Join and leave transitions, including the teardown leave.
    pub transitions: u64,
    pub elapsed:     Duration,
}

#[derive(Clone, Debug, Default)]
pub struct SweepReport {
    /// One entry per combination that was attempted, in run order.
    pub runs: Vec<RunReport>,
}

impl SweepReport {
    pub fn completed(&self) -> usize {
        self.runs.iter().filter(|r| r.outcome == RunOutcome::Completed).count()
    }

    pub fn failed(&self) -> usize {
        self.runs.iter().filter(|r| r.outcome.is_failed()).count()
    }

    pub fn interrupted(&self) -> bool {
        self.runs.iter().any(|r| r.outcome == RunOutcome::Interrupted)
    }

    /// Messages generated over the whole sweep.
    pub fn messages(&self) -> u64 {
        self.runs.iter().map(|r| r.messages).sum()
    }
}
