//! `ev-mobility`: speeds, separation, and the per-edge movement rule.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                      |
//! |-------------|---------------------------------------------------------------|
//! | [`speed`]   | `effective_speed`, `separation_m`, speed and gap constants    |
//! | [`advance`] | `advance_on_edge`, `EdgeAdvance`, `nearest_ahead`             |
//!
//! # Movement model
//!
//! Each tick gives a moving agent a time budget (10 s by default).  The
//! agent spends it edge by edge: [`advance_on_edge`] moves it along the
//! current edge, and if the end node is reached with budget left over the
//! caller steps onto the next edge and calls it again.  Speed is looked up
//! per edge, so a car slows as it turns into a 20 mph street.
//!
//! The functions here are pure.  Which agents share an edge is the
//! occupancy index's business, in `ev-sim`.

pub mod advance;
pub mod speed;


pub use advance::{advance_on_edge, nearest_ahead, EdgeAdvance};
pub use speed::{
    effective_speed, separation_m, CAR_SEPARATION_M, PEDESTRIAN_SEPARATION_M, VEHICLE_SPEED_CAP_MPS,
};
