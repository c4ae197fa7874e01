//! `ev-spatial`: road graphs, routing, the evacuation zone, and buildings.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                          |
//! |---------------|-------------------------------------------------------------------|
//! | [`network`]   | `RoadNetwork` (CSR + R-tree), `RoadNetworkBuilder`, `RoadSpec`    |
//! | [`router`]    | `Router` trait, `DijkstraRouter`, `Route`                         |
//! | [`zone`]      | `Region` trait, `Disk`, `EvacuationZone`, `Exit`                  |
//! | [`building`]  | `Building`, `BuildingKind`, footprint sampling                    |
//! | [`error`]     | `SpatialError`, `SpatialResult<T>`                                |
//!
//! One `RoadNetwork` exists per travel mode.  Once a hazard is declared a
//! second, "safe" instance per mode is rebuilt from scratch with the zone's
//! nodes removed ([`RoadNetwork::build_safe`]); the live instance is never
//! edited in place.

pub mod building;
pub mod error;
pub mod network;
pub mod router;
pub mod zone;


pub use building::{Building, BuildingKind};
pub use error::{SpatialError, SpatialResult};
pub use network::{parse_speed_limit, RoadNetwork, RoadNetworkBuilder, RoadSpec, DEFAULT_SPEED_LIMIT_MPS};
pub use router::{DijkstraRouter, Route, Router};
pub use zone::{Disk, EvacuationZone, Exit, Region};
