use thiserror::Error;

use ev_spatial::BuildingKind;

#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("schedule parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("schedule {0:?} has no start activity (every activity has an incoming transition)")]
    NoStartActivity(String),

    #[error("schedule {0:?} has more than one start activity: {1:?}")]
    AmbiguousStartActivity(String, Vec<String>),

    #[error("unknown activity {0:?}")]
    UnknownActivity(String),

    #[error("no {0} building available for the start activity")]
    Unresolvable(BuildingKind),
}

pub type ScheduleResult<T> = Result<T, ScheduleError>;
