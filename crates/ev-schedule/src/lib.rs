//! `ev-schedule`: daily activity graphs and schedule fast-forwarding.
//!
//! # Crate layout
//!
//! | Module           | Contents                                                  |
//! |------------------|-----------------------------------------------------------|
//! | [`graph`]        | `ScheduleGraph`, `Activity`, `Timing`, `Transition`       |
//! | [`templates`]    | built-in child / working adult / retired adult graphs     |
//! | [`fast_forward`] | `initial_state`, `InitialState`, `Located`, `Travel`      |
//! | [`loader`]       | `load_graph_csv`, `load_graph_reader`                     |
//! | [`error`]        | `ScheduleError`, `ScheduleResult<T>`                      |
//!
//! Places are [`ev_spatial::BuildingKind`]s; turning a place into an actual
//! building is the caller's job, supplied to [`initial_state`] as a closure.

pub mod error;
pub mod fast_forward;
pub mod graph;
pub mod loader;
pub mod templates;

#[cfg(test)]
mod tests;

pub use error::{ScheduleError, ScheduleResult};
pub use fast_forward::{initial_state, InitialState, Located, Travel, MAX_HOPS};
pub use graph::{Activity, ScheduleGraph, Timing, Transition};
pub use loader::{load_graph_csv, load_graph_reader};
