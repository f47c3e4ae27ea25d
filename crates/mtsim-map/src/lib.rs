//! `mtsim-map` — the road-map/lane-geometry collaborator contract.
//!
//! The real lane-geometry library is an external collaborator (see the
//! crate-level docs in the workspace root); this crate defines the
//! [`RoadMap`]/[`Lane`]/[`Road`] traits that contract implies, plus
//! [`StaticRoadMap`] as a minimal in-memory implementation for tests and
//! small scenarios.
//!
//! # Crate layout
//!
//! | Module        | Contents                                         |
//! |---------------|----------------------------------------------------|
//! | [`map`]       | `RoadMap`, `Lane`, `Road` traits                   |
//! | [`route`]     | `Route` (ordered road-id sequence)                 |
//! | [`static_map`] | `StaticRoadMap`, `StaticRoadMapBuilder`           |
//! | [`error`]     | `MapError`, `MapResult<T>`                         |

pub mod error;
pub mod map;
pub mod route;
pub mod static_map;


pub use error::{MapError, MapResult};
pub use map::{Lane, Road, RoadMap};
pub use route::Route;
pub use static_map::{LaneRecord, RoadRecord, StaticRoadMap, StaticRoadMapBuilder};
