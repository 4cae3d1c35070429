//! Line-oriented experiment event log.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::OutputResult;

/// Default file name, next to the binary's working directory.
pub const EVENT_LOG_FILE: &str = "network_events.log";

/// Append-only log of experiment events.
///
/// Shared by `Arc` between the observer and the transport; every record is
/// flushed before the call returns.
pub struct EventLog {
    path:   PathBuf,
    writer: Mutex<BufWriter<File>>,
}

impl EventLog {
    /// Open (or create) `path` for appending.
    pub fn open(path: &Path) -> OutputResult<Self> {
        let file = OpenOptions::new().append(true).create(true).open(path)?;
        log::debug!("event log at {}", path.display());
        Ok(Self {
            path:   path.to_path_buf(),
            writer: Mutex::new(BufWriter::new(file)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `start-<batch_size>-<sending_freq>`: a sweep combination began.
    pub fn record_start(&self, batch_size: u32, sending_freq: u32) -> OutputResult<()> {
        self.record(&format!("start-{batch_size}-{sending_freq}"))
    }

    /// `snt <n>`: `n` messages were sent in one batch.  Called by the
    /// transport, which shares this log.
    pub fn record_sent(&self, count: u64) -> OutputResult<()> {
        self.record(&format!("snt {count}"))
    }

    /// `rcv`: one message was received.  Called by the transport.
    pub fn record_received(&self) -> OutputResult<()> {
        self.record("rcv")
    }

    /// Write `(<unix secs>) <event>`.  `event` must not contain a newline.
    pub fn record(&self, event: &str) -> OutputResult<()> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs_f64();
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        writeln!(writer, "({now:.3}) {event}")?;
        writer.flush()?;
        Ok(())
    }
}
