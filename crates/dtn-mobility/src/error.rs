use dtn_core::DtnError;
use dtn_schedule::ScheduleError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MobilityError {
    #[error(transparent)]
    Lifecycle(#[from] DtnError),

    #[error(transparent)]
    Schedule(#[from] ScheduleError),

    /// The OS network membership command failed to run or exited non-zero.
    #[error("`{command}` failed: {reason}")]
    Command {
        command: String,
        reason:  String,
    },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type MobilityResult<T> = Result<T, MobilityError>;
