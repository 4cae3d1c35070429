use dtn_core::DtnError;
use dtn_schedule::ScheduleError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrafficError {
    #[error(transparent)]
    Lifecycle(#[from] DtnError),

    #[error("scheduling error: {0}")]
    Schedule(#[from] ScheduleError),

    #[error("creation rate must be a positive number of seconds, got {0}")]
    InvalidRate(f64),

    #[error("message store error: {0}")]
    Store(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type TrafficResult<T> = Result<T, TrafficError>;
