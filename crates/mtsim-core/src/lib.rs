//! `mtsim-core` — foundational types for the local micro-traffic simulator.
//!
//! This crate is a dependency of every other `mtsim-*` crate. It intentionally
//! has no `mtsim-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module    | Contents                                               |
//! |-----------|---------------------------------------------------------|
//! | [`ids`]   | `ActorId`, `LaneId`, `RoadId`, `RouteKey`, `FlowId`, `VTypeId` |
//! | [`geo`]   | `Point2`, `Vec2`, angle helpers, `OrientedBox`          |
//! | [`rng`]   | `ActorRng` (per-actor), `SimRng` (process-local)        |
//! | [`role`]  | `Role` enum                                             |
//! | [`error`] | `CoreError`, `CoreResult`                               |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                              |
//! |---------|------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.  |

pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;
pub mod role;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use geo::{angle_diff, normalize_angle, unit_vector, OrientedBox, Point2, Vec2};
pub use ids::{ActorId, FlowId, LaneId, RoadId, RouteKey, VTypeId};
pub use rng::{ActorRng, SimRng};
pub use role::Role;
