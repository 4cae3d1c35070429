//! Mobility schedule types: `MobilityWindow` and `MobilitySchedule`.
//!
//! # Cycle model
//!
//! A device's schedule is a set of windows on a 24-hour cycle.  Offsets are
//! hours from the experiment's reference point, in `[0, 24)`.  A window with
//! `end < begin` wraps across the reference point: the device is already at
//! that location when the experiment starts, leaves at `end`, and rejoins at
//! `begin` for the rest of the cycle.
//!
//! ```text
//!  0        2              5                      24
//!  |==A=====|              |==========A===========|     { A, begin: 5, end: 2 }
//! ```
//!
//! # Validation
//!
//! `MobilitySchedule::new` rejects anything the engine could not execute
//! unambiguously: offsets outside the cycle, empty windows, blank locations,
//! and windows that overlap on the cycle.  Windows that merely touch
//! (`w1.end == w2.begin`) are fine; the leave runs before the join.  Input
//! order does not matter; windows are stored sorted by `begin`.

use dtn_core::HOURS_PER_DAY;

use crate::{ScheduleError, ScheduleResult};

// ── MobilityWindow ────────────────────────────────────────────────────────────

/// One interval during which the device belongs to `location`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MobilityWindow {
    /// Ad-hoc network name (ESSID) to join.
    pub location: String,
    /// Hour offset at which the device joins.
    pub begin: f64,
    /// Hour offset at which the device leaves.
    pub end: f64,
}

impl MobilityWindow {
    pub fn new(location: impl Into<String>, begin: f64, end: f64) -> Self {
        Self { location: location.into(), begin, end }
    }

    /// `true` if the window spans the cycle's reference point.
    #[inline]
    pub fn wraps(&self) -> bool {
        self.end < self.begin
    }

    /// `true` if the device is already inside this window at the reference
    /// point and must join immediately.  A window ending exactly at 0 wraps
    /// but is not occupied at the start.
    #[inline]
    pub fn occupied_at_start(&self) -> bool {
        self.wraps() && self.end > 0.0
    }

    /// `true` if `hour` (taken modulo one cycle) falls inside the window.
    pub fn contains(&self, hour: f64) -> bool {
        let h = hour.rem_euclid(HOURS_PER_DAY);
        if self.wraps() {
            h >= self.begin || h < self.end
        } else {
            h >= self.begin && h < self.end
        }
    }

    /// The window as one or two half-open segments within `[0, 24)`.
    fn segments(&self) -> impl Iterator<Item = (f64, f64)> {
        let (first, second) = if self.wraps() {
            ((self.begin, HOURS_PER_DAY), Some((0.0, self.end)))
        } else {
            ((self.begin, self.end), None)
        };
        std::iter::once(first)
            .chain(second)
            .filter(|(a, b)| b > a)
    }

    fn overlaps(&self, other: &MobilityWindow) -> bool {
        self.segments()
            .any(|(a1, b1)| other.segments().any(|(a2, b2)| a1 < b2 && a2 < b1))
    }

    fn validate(&self) -> ScheduleResult<()> {
        if self.location.trim().is_empty() {
            return Err(ScheduleError::InvalidSchedule("window with empty location".into()));
        }
        for (name, value) in [("begin", self.begin), ("end", self.end)] {
            if !(value.is_finite() && (0.0..HOURS_PER_DAY).contains(&value)) {
                return Err(ScheduleError::InvalidSchedule(format!(
                    "{name} {value} of window {:?} is outside [0, {HOURS_PER_DAY})",
                    self.location
                )));
            }
        }
        if self.begin == self.end {
            return Err(ScheduleError::InvalidSchedule(format!(
                "window {:?} begins and ends at {}",
                self.location, self.begin
            )));
        }
        Ok(())
    }
}

// ── MobilitySchedule ──────────────────────────────────────────────────────────

/// A validated daily mobility schedule for one device.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MobilitySchedule {
    /// Windows, sorted ascending by `begin`.
    windows: Vec<MobilityWindow>,
}

impl MobilitySchedule {
    /// Validate and sort `windows`.
    ///
    /// # Errors
    ///
    /// [`ScheduleError::InvalidSchedule`] if the list is empty, any window is
    /// malformed, or two windows overlap.
    pub fn new(mut windows: Vec<MobilityWindow>) -> ScheduleResult<Self> {
        if windows.is_empty() {
            return Err(ScheduleError::InvalidSchedule("schedule has no windows".into()));
        }
        for w in &windows {
            w.validate()?;
        }
        windows.sort_by(|a, b| a.begin.total_cmp(&b.begin));

        for (i, a) in windows.iter().enumerate() {
            if let Some(b) = windows[i + 1..].iter().find(|b| a.overlaps(b)) {
                return Err(ScheduleError::InvalidSchedule(format!(
                    "window {:?} [{}, {}) overlaps {:?} [{}, {})",
                    a.location, a.begin, a.end, b.location, b.begin, b.end
                )));
            }
        }
        Ok(Self { windows })
    }

    /// Read-only slice of all windows (sorted by `begin`).
    pub fn windows(&self) -> &[MobilityWindow] {
        &self.windows
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    /// The location the device should be at `hour`, or `None` between windows.
    pub fn location_at(&self, hour: f64) -> Option<&str> {
        self.windows
            .iter()
            .find(|w| w.contains(hour))
            .map(|w| w.location.as_str())
    }

    /// Location occupied at the reference point, if a window wraps over it.
    pub fn initial_location(&self) -> Option<&str> {
        self.windows
            .iter()
            .find(|w| w.occupied_at_start())
            .map(|w| w.location.as_str())
    }
}
