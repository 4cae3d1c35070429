//! CSV summary: one row per sweep combination.

use std::fs::File;
use std::path::Path;

use csv::Writer;
use dtn_experiment::RunReport;

use crate::OutputResult;

pub const SUMMARY_FILE: &str = "runs.csv";

/// Writes run reports to a CSV file.
pub struct CsvSummaryWriter {
    writer:   Writer<File>,
    finished: bool,
}

impl CsvSummaryWriter {
    /// Create (truncating) `path` and write the header row.
    pub fn new(path: &Path) -> OutputResult<Self> {
        let mut writer = Writer::from_path(path)?;
        writer.write_record([
            "run_id",
            "batch_size",
            "sending_freq",
            "outcome",
            "messages",
            "transitions",
            "elapsed_secs",
        ])?;
        Ok(Self { writer, finished: false })
    }

    /// Append one row and flush it, so an interrupted sweep keeps its rows.
    pub fn write_run(&mut self, report: &RunReport) -> OutputResult<()> {
        self.writer.write_record(&[
            report.params.run_id.to_string(),
            report.params.batch_size.to_string(),
            report.params.sending_freq.to_string(),
            report.outcome.as_str().to_owned(),
            report.messages.to_string(),
            report.transitions.to_string(),
            format!("{:.3}", report.elapsed.as_secs_f64()),
        ])?;
        self.writer.flush()?;
        Ok(())
    }

    /// Flush the underlying file.  Idempotent.
    pub fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.writer.flush()?;
        Ok(())
    }
}
