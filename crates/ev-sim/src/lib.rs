//! `ev-sim`: world state, hazard trigger, and the tick loop for evacsim.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                          |
//! |---------------|-------------------------------------------------------------------|
//! | [`world`]     | `World`: networks, safe networks, buildings, zone                 |
//! | [`occupancy`] | `Occupancy`, `EdgeKey`: who is on which directed segment          |
//! | [`sensor`]    | `TrafficSensor`, `SensorRegistry`                                 |
//! | [`model`]     | `Model` tick loop, `Schedules`, `Hazard`                          |
//! | [`builder`]   | `ModelBuilder`: validation, population, schedule fast-forward     |
//! | [`config`]    | `ScenarioConfig`, `CategorySpec` (serde)                          |
//! | [`observer`]  | `SimObserver`, `TickSummary`, `AgentSnapshot`                     |
//! | [`export`]    | `ScenarioExport` for rendering                                    |
//! | [`error`]     | `SimError`, `SimResult<T>`                                        |
//!
//! # Tick loop
//!
//! ```text
//! for tick in 1..=total_steps:
//!   ① clock     : advance by tick_duration_secs (10 s by default)
//!   ② hazard    : once now ≥ hazard_start: declare zone, exits, safe
//!                 networks; flag every agent inside the disk
//!   ③ shuffle   : activation order, from the model's seeded RNG
//!   ④ agents    : prepare (BehaviorModel::prepare) then move, in order
//!   ⑤ summary   : TickSummary to the observer; snapshots every N ticks
//! ```
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use ev_sim::{ModelBuilder, NoopObserver, ScenarioConfig};
//!
//! let mut model = ModelBuilder::standard(ScenarioConfig::default(), walk, drive, buildings)
//!     .build()?;
//! let last = model.run(&mut NoopObserver);
//! println!("{} of {} evacuated", last.number_evacuated, last.number_requiring_evacuation);
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod export;
pub mod model;
pub mod observer;
pub mod occupancy;
pub mod sensor;
pub mod world;

mod step;


pub use builder::ModelBuilder;
pub use config::{CategorySpec, ScenarioConfig};
pub use error::{SimError, SimResult};
pub use export::ScenarioExport;
pub use model::{Hazard, Model, Schedules};
pub use observer::{AgentSnapshot, NoopObserver, SimObserver, TickSummary};
pub use occupancy::{EdgeKey, Occupancy};
pub use sensor::{SensorRecord, SensorRegistry, TrafficSensor};
pub use world::{World, RANDOM_HOME_ATTEMPTS};
