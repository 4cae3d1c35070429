//! `dtn-output` — experiment output for the dtn_field runner.
//!
//! | Type                 | File                 | Contents                                  |
//! |----------------------|----------------------|-------------------------------------------|
//! | [`EventLog`]         | `network_events.log` | `(<unix secs>) <event> [count]` lines     |
//! | [`CsvSummaryWriter`] | `runs.csv`           | one row per sweep combination             |
//!
//! Both are driven by [`EventLogObserver`], which implements
//! `dtn_experiment::ExperimentObserver`.  [`EventLogTransport`] stands in
//! for the external transport and marks its start and stop in the same log.
//!
//! # Event log format
//!
//! Offline tooling counts sends and receives between two timestamps, so the
//! event names are fixed:
//!
//! ```text
//! (1589452800.125) start-10-30     run with batch size 10, sending frequency 30 s
//! (1589452815.500) snt 10          a batch of 10 messages went out
//! (1589452816.020) rcv             one message arrived
//! ```
//!
//! `snt` and `rcv` are written by the transport; this crate only provides
//! the writers.  Tokens the offline tooling does not know, such as
//! `transport-start-10-30`, are ignored by it.
//!
//! # Usage
//!
//! ```rust,ignore
//! use dtn_output::{CsvSummaryWriter, EventLog, EventLogObserver};
//!
//! let log = Arc::new(EventLog::open(Path::new("network_events.log"))?);
//! let summary = CsvSummaryWriter::new(Path::new("runs.csv"))?;
//! let mut obs = EventLogObserver::new(Arc::clone(&log), summary);
//! coordinator.run(&mut obs);
//! obs.take_error().map(|e| eprintln!("output error: {e}"));
//! ```

pub mod error;
pub mod event_log;
pub mod observer;
pub mod summary;
pub mod transport;


pub use error::{OutputError, OutputResult};
pub use event_log::{EVENT_LOG_FILE, EventLog};
pub use observer::EventLogObserver;
pub use summary::{CsvSummaryWriter, SUMMARY_FILE};
pub use transport::EventLogTransport;
