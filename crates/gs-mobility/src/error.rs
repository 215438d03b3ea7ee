use thiserror::Error;

use gs_schedule::ScheduleError;
use gs_spatial::SpatialError;

#[derive(Debug, Error)]
pub enum MobilityError {
    /// Routing or noisy-point sampling failed.
    #[error(transparent)]
    Spatial(#[from] SpatialError),

    #[error(transparent)]
    Schedule(#[from] ScheduleError),

    #[error("day plan references stop {stop} of a {len}-stop itinerary")]
    StopOutOfRange { stop: usize, len: usize },
}

pub type MobilityResult<T> = Result<T, MobilityError>;
