//! `ev-core`: foundational types for the `evacsim` evacuation simulator.
//!
//! This crate is a dependency of every other `ev-*` crate.  It has no `ev-*`
//! dependencies and only a handful of external ones (`rand`, `rand_distr`,
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                                   |
//! |-----------------|------------------------------------------------------------|
//! | [`ids`]         | `AgentId`, `NodeId`, `EdgeId`, `ActivityId`, `BuildingId`, `SensorId` |
//! | [`geo`]         | `Point` in projected metres                                |
//! | [`time`]        | `Tick`, `TimeOfDay`, `SimClock`, `SimConfig`               |
//! | [`rng`]         | `AgentRng` (per-agent), `SimRng` (global)                  |
//! | [`transport`]   | `TravelMode` enum                                          |
//! | [`error`]       | `CoreError`, `CoreResult`                                  |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;
pub mod time;
pub mod transport;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use geo::Point;
pub use ids::{ActivityId, AgentId, BuildingId, EdgeId, NodeId, SensorId};
pub use rng::{AgentRng, SimRng};
pub use time::{SimClock, SimConfig, Tick, TimeOfDay};
pub use transport::TravelMode;
