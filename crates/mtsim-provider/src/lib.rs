//! `mtsim-provider` — the tick loop orchestrator for the micro-traffic
//! simulator.
//!
//! # Two-phase tick
//!
//! ```text
//! Provider::step(dt, sim_time, observer):
//!   ① Expire   — drop reserved boxes for actors now in shadow state.
//!   ② Spawn    — each flow attempts a spawn against reserved + existing boxes.
//!   ③ Rebuild  — SpatialLaneCache rebuilt from the current owned+shadow set.
//!   ④ Decide   — mtsim_behavior::decide for every owned actor (pure, no
//!                mutation — order-independent by construction).
//!   ⑤ Apply    — commit each Decision, then relocalize; reroute or tear down
//!                actors that reached their destination.
//! ```
//!
//! # Crate layout
//!
//! | Module       | Contents                                               |
//! |--------------|----------------------------------------------------------|
//! | [`scenario`] | `ProviderConfig`, `Scenario<M>` — setup inputs          |
//! | [`provider`] | `Provider<M>`, `ProviderState` — the orchestrator        |
//! | [`observer`] | `ProviderObserver`, `NoopObserver`, `TracingObserver`    |
//! | [`error`]    | `ProviderError`, `ProviderResult<T>`                     |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use mtsim_provider::{NoopObserver, Provider, ProviderConfig, Scenario};
//!
//! let scenario = Scenario { map, flow_file, config: ProviderConfig::default(), source: "traffic".into() };
//! let (mut provider, mut state) = Provider::setup(scenario)?;
//! for tick in 0..n_ticks {
//!     state = provider.step(0.1, tick as f64 * 0.1, &mut NoopObserver);
//! }
//! ```

pub mod error;
pub mod observer;
pub mod provider;
pub mod scenario;

#[cfg(test)]
mod tests;

pub use error::{ProviderError, ProviderResult};
pub use observer::{NoopObserver, ProviderObserver, TracingObserver};
pub use provider::{Provider, ProviderState};
pub use scenario::{ProviderConfig, Scenario};
