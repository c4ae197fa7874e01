use ev_behavior::BehaviorError;
use ev_schedule::ScheduleError;
use ev_spatial::{BuildingKind, SpatialError};
use thiserror::Error;

/// Setup-time failures.  Nothing that happens to an individual agent during
/// a tick is an error; those cases are recovered in place.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("scenario configuration error: {0}")]
    Config(String),

    #[error("no buildings of kind {0}")]
    EmptyBuildingCategory(BuildingKind),

    #[error(transparent)]
    Spatial(#[from] SpatialError),

    #[error(transparent)]
    Schedule(#[from] ScheduleError),

    #[error(transparent)]
    Behavior(#[from] BehaviorError),
}

pub type SimResult<T> = Result<T, SimError>;
