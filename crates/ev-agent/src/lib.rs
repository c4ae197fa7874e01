//! `ev-agent`: evacuee records and population storage.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                  |
//! |-----------------|-----------------------------------------------------------|
//! | [`kind`]        | `Category`, `Behaviour`, `Status`, `NetworkKind`          |
//! | [`route`]       | `RouteProgress`                                           |
//! | [`evacuee`]     | `Evacuee`, `Destination`                                  |
//! | [`population`]  | `Population`, `PopulationBuilder`, `AgentRngs`            |
//!
//! This crate holds state only.  The rules that change it live in
//! `ev-behavior`, `ev-mobility`, and the step functions of `ev-sim`.

pub mod evacuee;
pub mod kind;
pub mod population;
pub mod route;


pub use evacuee::{Destination, Evacuee};
pub use kind::{Behaviour, Category, NetworkKind, Status};
pub use population::{AgentRngs, Population, PopulationBuilder};
pub use route::RouteProgress;
