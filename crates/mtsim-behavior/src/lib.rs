//! `mtsim-behavior` — the per-vehicle driving model: route-length caching,
//! spatial neighbor queries, lane selection, and longitudinal/lateral
//! control.
//!
//! # Crate layout
//!
//! | Module           | Contents                                                          |
//! |------------------|--------------------------------------------------------------------|
//! | [`route_length`] | `RouteLengthIndex` — remaining path length per (route, lane, position) |
//! | [`spatial_cache`]| `SpatialLaneCache` — per-tick leader/follower queries              |
//! | [`lane_window`]  | `LaneWindow`, the crossing-time model                              |
//! | [`selection`]    | Per-tick lane selection (cut-in logic included)                    |
//! | [`longitudinal`] | Target-speed and acceleration control, `time_to_cover`              |
//! | [`lateral`]      | Steering and pose integration                                      |
//! | [`relocalize`]   | Post-step re-localization and endless-traffic reroute               |
//! | [`context`]      | `DecisionContext` — the read-only per-tick bundle                   |
//! | [`decide`]       | Combines the above into one actor's phase-1 `Decision`              |
//! | [`error`]        | `BehaviorError`, `BehaviorResult<T>`                                |
//!
//! # Two-pass tick
//!
//! Phase 1 (this crate): for every owned actor, [`decide::decide`] reads the
//! shared [`context::DecisionContext`] and produces a [`decide::Decision`]
//! without mutating anything. Phase 2 (the provider crate): commit each
//! `Decision` into its actor's `VehicleState`, then run
//! [`relocalize::relocalize`] against the newly-committed pose. This split
//! means iteration order over actors never affects the result (§5).

pub mod context;
pub mod decide;
pub mod error;
pub mod lane_window;
pub mod lateral;
pub mod longitudinal;
pub mod relocalize;
pub mod route_length;
pub mod selection;
pub mod spatial_cache;

#[cfg(test)]
mod tests;

pub use context::DecisionContext;
pub use decide::{decide as decide_tick, Decision};
pub use error::{BehaviorError, BehaviorResult};
pub use lane_window::LaneWindow;
pub use relocalize::{relocalize, reroute, Relocalized, RerouteOutcome};
pub use route_length::RouteLengthIndex;
pub use spatial_cache::SpatialLaneCache;
