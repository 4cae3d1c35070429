//! Mobility schedule loaders (YAML and CSV).
//!
//! # YAML format
//!
//! The per-device layout used in the field: a sequence of windows, hours
//! from the experiment's reference point.  Fractional hours are allowed.
//!
//! ```yaml
//! - location: library
//!   begin: 8
//!   end: 12
//! - location: cafeteria
//!   begin: 12
//!   end: 13.5
//! - location: dorm
//!   begin: 18
//!   end: 7
//! ```
//!
//! # CSV format
//!
//! The same windows, one row each:
//!
//! ```csv
//! location,begin,end
//! library,8,12
//! cafeteria,12,13.5
//! dorm,18,7
//! ```
//!
//! In both examples the last window wraps: the device starts the experiment
//! in `dorm`.  Parsed windows go through [`MobilitySchedule::new`], so an
//! unreadable file, a malformed entry, and a semantically invalid schedule
//! all fail the same way, before any engine is constructed.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use crate::window::{MobilitySchedule, MobilityWindow};
use crate::ScheduleError;

// ── Record ────────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct WindowRecord {
    location: String,
    begin:    f64,
    end:      f64,
}

impl From<WindowRecord> for MobilityWindow {
    fn from(row: WindowRecord) -> Self {
        MobilityWindow::new(row.location, row.begin, row.end)
    }
}

fn open(path: &Path) -> Result<File, ScheduleError> {
    File::open(path).map_err(|source| ScheduleError::Unreadable {
        path: path.to_path_buf(),
        source,
    })
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a schedule, picking the format from the file extension: `.yaml` or
/// `.yml` is YAML, anything else is CSV.
pub fn load_schedule(path: &Path) -> Result<MobilitySchedule, ScheduleError> {
    let is_yaml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

    let schedule = if is_yaml {
        load_schedule_yaml_reader(open(path)?)?
    } else {
        load_schedule_reader(open(path)?)?
    };
    log::debug!("loaded {} mobility windows from {}", schedule.len(), path.display());
    Ok(schedule)
}

/// Load and validate a device's mobility schedule from a YAML file.
pub fn load_schedule_yaml(path: &Path) -> Result<MobilitySchedule, ScheduleError> {
    load_schedule_yaml_reader(open(path)?)
}

/// Like [`load_schedule_yaml`] but accepts any `Read` source.
pub fn load_schedule_yaml_reader<R: Read>(reader: R) -> Result<MobilitySchedule, ScheduleError> {
    let rows: Vec<WindowRecord> =
        serde_yaml::from_reader(reader).map_err(|e| ScheduleError::InvalidSchedule(e.to_string()))?;
    MobilitySchedule::new(rows.into_iter().map(MobilityWindow::from).collect())
}

/// Load and validate a device's mobility schedule from a CSV file.
pub fn load_schedule_csv(path: &Path) -> Result<MobilitySchedule, ScheduleError> {
    load_schedule_reader(open(path)?)
}

/// Like [`load_schedule_csv`] but accepts any `Read` source.
///
/// Useful for testing (pass a `std::io::Cursor`) or embedding a schedule in
/// a binary.  Whitespace around fields is trimmed.
pub fn load_schedule_reader<R: Read>(reader: R) -> Result<MobilitySchedule, ScheduleError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let windows = csv_reader
        .deserialize::<WindowRecord>()
        .map(|result| {
            let row = result.map_err(|e| ScheduleError::InvalidSchedule(e.to_string()))?;
            Ok(MobilityWindow::from(row))
        })
        .collect::<Result<Vec<_>, ScheduleError>>()?;

    MobilitySchedule::new(windows)
}
