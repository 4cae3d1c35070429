//! Experiment time model.
//!
//! # Design
//!
//! Mobility schedules are written in hours from the experiment's reference
//! point ("midnight").  `ExperimentClock` maps those offsets to wall-clock
//! durations:
//!
//!   real_delay = offset_hours * hour
//!
//! In the field `hour` is 3,600 s.  Tests compress it to a few milliseconds
//! so a full day of transitions fits in well under a second; the engines are
//! agnostic.

use std::fmt;
use std::time::{Duration, Instant};

/// Length of one mobility cycle, in schedule hours.
pub const HOURS_PER_DAY: f64 = 24.0;

/// Converts schedule hours into real durations and instants.
///
/// `ExperimentClock` is cheap to copy and holds no heap data.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ExperimentClock {
    /// How much real time one schedule hour represents.  Default: 3600 s.
    pub hour: Duration,
}

impl ExperimentClock {
    pub fn new(hour: Duration) -> Self {
        Self { hour }
    }

    /// A clock where one schedule hour lasts `millis` milliseconds.
    pub fn compressed_millis(millis: u64) -> Self {
        Self::new(Duration::from_millis(millis))
    }

    /// Real duration of `hours` schedule hours.  Negative or non-finite
    /// inputs clamp to zero.
    pub fn hours(&self, hours: f64) -> Duration {
        if hours.is_finite() && hours > 0.0 {
            self.hour.mul_f64(hours)
        } else {
            Duration::ZERO
        }
    }

    /// Real duration of one full mobility cycle.
    #[inline]
    pub fn day(&self) -> Duration {
        self.hours(HOURS_PER_DAY)
    }

    /// The instant `hours` after `origin`.
    #[inline]
    pub fn at(&self, origin: Instant, hours: f64) -> Instant {
        origin + self.hours(hours)
    }
}

impl Default for ExperimentClock {
    fn default() -> Self {
        Self::new(Duration::from_secs(3_600))
    }
}

impl fmt::Display for ExperimentClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "1h = {:?}", self.hour)
    }
}
