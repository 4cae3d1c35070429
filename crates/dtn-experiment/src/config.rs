//! Experiment configuration.

use std::time::Duration;

use dtn_core::{DeviceId, ExperimentClock};

use crate::{ExperimentError, ExperimentResult, Sweep};

/// Everything a [`Coordinator`][crate::Coordinator] needs besides its
/// factories.
///
/// The field binary fills this from compiled-in constants; tests shrink the
/// durations.
#[derive(Clone, Debug)]
pub struct ExperimentConfig {
    /// Device the sweep runs on.  Prefixes every message identifier.
    pub device: DeviceId,

    /// Batch sizes × sending frequencies to run.
    pub sweep: Sweep,

    /// Mean seconds between two generated messages.
    pub creation_rate_secs: f64,

    /// Wall-clock length of each sweep combination.
    pub run_duration: Duration,

    /// Wireless interface handed to each transport.
    pub interface: String,

    /// Maps mobility schedule hours to real time.
    pub clock: ExperimentClock,

    /// Seed for message interval jitter.  `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl ExperimentConfig {
    /// Check the values a coordinator cannot work with.
    pub fn validate(&self) -> ExperimentResult<()> {
        if self.device.as_str().is_empty() {
            return Err(ExperimentError::Config("device id is empty".into()));
        }
        if self.sweep.is_empty() {
            return Err(ExperimentError::Config(format!(
                "sweep has no combinations ({} batch sizes, {} sending frequencies)",
                self.sweep.batch_sizes.len(),
                self.sweep.sending_freqs.len()
            )));
        }
        if !(self.creation_rate_secs.is_finite() && self.creation_rate_secs > 0.0) {
            return Err(ExperimentError::Config(format!(
                "creation rate must be positive, got {}",
                self.creation_rate_secs
            )));
        }
        if self.run_duration.is_zero() {
            return Err(ExperimentError::Config("run duration is zero".into()));
        }
        if self.clock.hour.is_zero() {
            return Err(ExperimentError::Config("clock hour is zero".into()));
        }
        Ok(())
    }

    /// Total wall-clock time of an uninterrupted sweep.
    pub fn sweep_duration(&self) -> Duration {
        self.run_duration.saturating_mul(self.sweep.len() as u32)
    }
}
