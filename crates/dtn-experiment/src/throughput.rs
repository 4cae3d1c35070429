//! `ThroughputRun` — one transport run on a fixed ad-hoc network.
//!
//! No mobility schedule and no message generation: the device joins one
//! network, lets it settle, then runs the transport for a fixed time with a
//! single batch size and sending frequency.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dtn_core::DeviceId;
use dtn_mobility::{NetworkMembership, Transport};
use log::{info, warn};

use crate::{ExperimentError, ExperimentResult, RunOutcome, ShutdownSignal};

/// Network every device joins for throughput measurements.
pub const THROUGHPUT_ESSID: &str = "test";
/// Pause between joining the network and starting the transport.
pub const SETTLE_TIME: Duration = Duration::from_secs(5);
pub const THROUGHPUT_DURATION: Duration = Duration::from_secs(5 * 60);

// ── Config ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct ThroughputConfig {
    pub device:       DeviceId,
    pub batch_size:   u32,
    /// Seconds between batches.
    pub sending_freq: u32,
    pub essid:        String,
    pub settle:       Duration,
    pub duration:     Duration,
}

impl ThroughputConfig {
    /// Defaults for everything but the run parameters.
    pub fn new(device: DeviceId, batch_size: u32, sending_freq: u32) -> Self {
        Self {
            device,
            batch_size,
            sending_freq,
            essid:    THROUGHPUT_ESSID.to_owned(),
            settle:   SETTLE_TIME,
            duration: THROUGHPUT_DURATION,
        }
    }

    pub fn validate(&self) -> ExperimentResult<()> {
        if self.device.as_str().is_empty() {
            return Err(ExperimentError::Config("device id is empty".into()));
        }
        if self.batch_size == 0 || self.sending_freq == 0 {
            return Err(ExperimentError::Config(format!(
                "batch size and sending frequency must be positive, got {} and {}",
                self.batch_size, self.sending_freq
            )));
        }
        if self.essid.is_empty() {
            return Err(ExperimentError::Config("network name is empty".into()));
        }
        if self.duration.is_zero() {
            return Err(ExperimentError::Config("run duration is zero".into()));
        }
        Ok(())
    }

    /// `throughput_bs_<batch_size>_sf_<sending_freq>_cr`, the identifier
    /// handed to the transport.
    pub fn experiment_id(&self) -> String {
        format!("throughput_bs_{}_sf_{}_cr", self.batch_size, self.sending_freq)
    }
}

// ── Report ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct ThroughputReport {
    pub experiment_id: String,
    /// `false` if the join command failed; the run still goes ahead.
    pub joined:        bool,
    /// `true` once the transport was started.
    pub transported:   bool,
    pub outcome:       RunOutcome,
    pub elapsed:       Duration,
}

// ── Run ───────────────────────────────────────────────────────────────────────

pub struct ThroughputRun<T: Transport, M: NetworkMembership> {
    config:     ThroughputConfig,
    transport:  Arc<T>,
    membership: M,
    shutdown:   ShutdownSignal,
}

impl<T: Transport, M: NetworkMembership> ThroughputRun<T, M> {
    /// # Errors
    ///
    /// [`ExperimentError::Config`] if `config` does not validate.
    pub fn new(config: ThroughputConfig, transport: Arc<T>, membership: M) -> ExperimentResult<Self> {
        config.validate()?;
        Ok(Self { config, transport, membership, shutdown: ShutdownSignal::new() })
    }

    pub fn with_shutdown(mut self, shutdown: ShutdownSignal) -> Self {
        self.shutdown = shutdown;
        self
    }

    pub fn config(&self) -> &ThroughputConfig {
        &self.config
    }

    pub fn shutdown_signal(&self) -> &ShutdownSignal {
        &self.shutdown
    }

    /// Join, settle, then run the transport for the configured duration.
    ///
    /// The device stays on the network afterwards.  A trigger during the
    /// settle pause ends the run before the transport starts; a trigger
    /// while transporting stops the transport early.
    ///
    /// # Errors
    ///
    /// [`ExperimentError::Mobility`] if the transport fails to start or stop.
    pub fn run(&self) -> ExperimentResult<ThroughputReport> {
        let started = Instant::now();
        let experiment_id = self.config.experiment_id();
        info!("throughput run {experiment_id} for {} on '{}'", self.config.device, self.config.essid);

        let joined = match self.membership.join(&self.config.essid) {
            Ok(()) => true,
            Err(e) => {
                warn!("joining '{}' failed: {e}", self.config.essid);
                false
            }
        };

        let report = |transported, outcome| ThroughputReport {
            experiment_id: experiment_id.clone(),
            joined,
            transported,
            outcome,
            elapsed: started.elapsed(),
        };

        if self.shutdown.wait_timeout(self.config.settle) {
            info!("throughput run {experiment_id} interrupted before the transport started");
            return Ok(report(false, RunOutcome::Interrupted));
        }

        self.transport.start()?;
        let interrupted = self.shutdown.wait_timeout(self.config.duration);
        self.transport.stop()?;

        let outcome = if interrupted { RunOutcome::Interrupted } else { RunOutcome::Completed };
        info!("throughput run {experiment_id} {outcome}");
        Ok(report(true, outcome))
    }
}
