use thiserror::Error;

use gs_spatial::SpatialError;

#[derive(Debug, Error)]
pub enum ScheduleError {
    /// Distinct event stops could not be collected within the draw budget.
    #[error("insufficient candidates for {what} after {attempts} attempts")]
    InsufficientCandidates { what: &'static str, attempts: u32 },

    #[error("itinerary has no stops")]
    EmptyItinerary,

    #[error("weekday itinerary lacks a work stop")]
    MissingWorkStop,

    #[error(transparent)]
    Spatial(#[from] SpatialError),
}

pub type ScheduleResult<T> = Result<T, ScheduleError>;
