//! `EventLogTransport` — placeholder transport that only marks its
//! lifecycle in the event log.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use dtn_mobility::{MobilityError, MobilityResult, Transport};

use crate::EventLog;

/// Stand-in for the DTN transport, which runs as a separate service.
///
/// Writes `transport-start-<label>` and `transport-stop-<label>` so network
/// transitions line up with the transport's own `snt`/`rcv` records.
/// Repeated starts or stops write nothing.
pub struct EventLogTransport {
    label:   String,
    events:  Arc<EventLog>,
    running: AtomicBool,
}

impl EventLogTransport {
    /// Label `<batch_size>-<sending_freq>`, matching the `start-` record.
    pub fn new(events: Arc<EventLog>, batch_size: u32, sending_freq: u32) -> Self {
        Self {
            label: format!("{batch_size}-{sending_freq}"),
            events,
            running: AtomicBool::new(false),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    fn mark(&self, what: &str) -> MobilityResult<()> {
        self.events
            .record(&format!("transport-{what}-{}", self.label))
            .map_err(|e| MobilityError::Transport(e.to_string()))
    }
}

impl Transport for EventLogTransport {
    fn start(&self) -> MobilityResult<()> {
        if self.running.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        self.mark("start")
    }

    fn stop(&self) -> MobilityResult<()> {
        if !self.running.swap(false, Ordering::SeqCst) {
            return Ok(());
        }
        self.mark("stop")
    }
}
