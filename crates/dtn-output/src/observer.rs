//! `EventLogObserver` — bridges `ExperimentObserver` to the event log and
//! the CSV summary.

use std::sync::Arc;

use dtn_experiment::{ExperimentObserver, RunParams, RunReport, SweepReport};

use crate::{CsvSummaryWriter, EventLog, OutputError, OutputResult};

/// An [`ExperimentObserver`] that marks each run's start in the event log
/// and writes one summary row per run.
///
/// Errors from the writers are stored internally because observer methods
/// have no return value.  After `coordinator.run()` returns, check for
/// errors with [`take_error`][Self::take_error].
pub struct EventLogObserver {
    events:     Arc<EventLog>,
    summary:    CsvSummaryWriter,
    last_error: Option<OutputError>,
}

impl EventLogObserver {
    pub fn new(events: Arc<EventLog>, summary: CsvSummaryWriter) -> Self {
        Self { events, summary, last_error: None }
    }

    /// Take the stored write error (if any) after the sweep.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    pub fn events(&self) -> &Arc<EventLog> {
        &self.events
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            log::warn!("experiment output error: {e}");
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl ExperimentObserver for EventLogObserver {
    fn on_run_start(&mut self, params: &RunParams) {
        let result = self.events.record_start(params.batch_size, params.sending_freq);
        self.store_err(result);
    }

    fn on_run_end(&mut self, report: &RunReport) {
        let result = self.summary.write_run(report);
        self.store_err(result);
    }

    fn on_sweep_end(&mut self, _report: &SweepReport) {
        let result = self.summary.finish();
        self.store_err(result);
    }
}
