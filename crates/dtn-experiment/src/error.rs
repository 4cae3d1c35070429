use dtn_core::RunId;
use dtn_mobility::MobilityError;
use dtn_schedule::ScheduleError;
use dtn_traffic::TrafficError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExperimentError {
    #[error("experiment configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Schedule(#[from] ScheduleError),

    #[error("traffic error: {0}")]
    Traffic(#[from] TrafficError),

    #[error("mobility error: {0}")]
    Mobility(#[from] MobilityError),

    /// Building or starting one sweep combination failed.  The sweep moves
    /// on to the next combination.
    #[error("run {run} could not be set up: {source}")]
    Construction {
        run:    RunId,
        #[source]
        source: Box<ExperimentError>,
    },
}

pub type ExperimentResult<T> = Result<T, ExperimentError>;
