//! `mtsim-actor` — vehicle state, per-actor decision state, and the
//! owned/shadow containers that hold them.
//!
//! # Crate layout
//!
//! | Module      | Contents                                              |
//! |-------------|---------------------------------------------------------|
//! | [`vehicle`] | `VehicleState` (the provider-protocol wire type)        |
//! | [`actor`]   | `TrafficActor`, `Personality`, `CutinState`             |
//! | [`world`]   | `ActorWorld` (owned/shadow `IndexMap` containers), `Shadow` |

pub mod actor;
pub mod vehicle;
pub mod world;

#[cfg(test)]
mod tests;

pub use actor::{CutinState, Personality, TrafficActor};
pub use vehicle::VehicleState;
pub use world::{ActorWorld, Shadow};
