//! `ev-behavior`: hazard-response rules for evacuees.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                        |
//! |---------------|-----------------------------------------------------------------|
//! | [`intent`]    | `Intent`, `EvacuationTarget`, `DiversionOption`                 |
//! | [`context`]   | `SimContext<'a>`: read-only tick snapshot shared by all agents |
//! | [`model`]     | `BehaviorModel` trait, `StandardBehavior`                       |
//! | [`sampling`]  | `BehaviourMix`, response delay and car-use draws                |
//! | [`error`]     | `BehaviorError`, `BehaviorResult<T>`                            |
//!
//! Decisions are pure: a model reads an `Evacuee` and the context and
//! returns a closed enum.  `ev-sim` applies the result, matching
//! exhaustively on it.

pub mod context;
pub mod error;
pub mod intent;
pub mod model;
pub mod sampling;

#[cfg(test)]
mod tests;

pub use context::SimContext;
pub use error::{BehaviorError, BehaviorResult};
pub use intent::{DiversionOption, EvacuationTarget, Intent};
pub use model::{BehaviorModel, StandardBehavior, CURIOUS_RADIUS_M, CURIOUS_SPEED_FACTOR};
pub use sampling::{draws_car, response_delay_secs, BehaviourMix, RESPONSE_DELAY_SD_SECS};
