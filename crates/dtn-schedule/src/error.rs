use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("invalid schedule: {0}")]
    InvalidSchedule(String),

    #[error("invalid schedule: cannot read {path:?}: {source}")]
    Unreadable {
        path:   PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid delay {0}s: must be finite and non-negative")]
    InvalidDelay(f64),
}

pub type ScheduleResult<T> = Result<T, ScheduleError>;
