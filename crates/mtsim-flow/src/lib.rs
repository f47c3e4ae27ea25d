//! `mtsim-flow` — declarative traffic-flow specs, XML loading, and spawning.
//!
//! # Crate layout
//!
//! | Module    | Contents                                              |
//! |-----------|--------------------------------------------------------|
//! | [`spec`]  | `FlowSpec`, `VTypeSpec`, `RouteSpec`, `OffsetSpec`, `SpeedSpec` |
//! | [`loader`]| `load_flow_file`, `load_flow_str`, `FlowFile`          |
//! | [`flow`]  | `Flow` — turns a `FlowSpec` into concrete actors        |
//! | [`error`] | `FlowError`, `FlowResult<T>`                            |

pub mod error;
pub mod flow;
pub mod loader;
pub mod spec;

#[cfg(test)]
mod tests;

pub use error::{FlowError, FlowResult};
pub use flow::Flow;
pub use loader::{load_flow_file, load_flow_str, FlowFile};
pub use spec::{FlowSpec, OffsetSpec, RouteSpec, SpeedSpec, VTypeSpec};
