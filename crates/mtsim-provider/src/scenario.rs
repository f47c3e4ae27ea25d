//! `ProviderConfig`/`Scenario` — everything [`crate::Provider::setup`] needs
//! to bind a run.

use mtsim_actor::Personality;
use mtsim_flow::FlowFile;
use mtsim_map::RoadMap;

/// Top-level provider configuration, constructed once by the host.
#[derive(Clone, Debug)]
pub struct ProviderConfig {
    /// Fixed timestep passed to every `step` call; not a measured wall-clock
    /// interval (§5).
    pub dt: f64,

    /// Seeds the process-local [`mtsim_core::SimRng`] and every actor's
    /// per-actor RNG (mixed with the actor id; see `mtsim_core::rng`).
    pub seed: u64,

    /// When `true`, actors that reach their destination attempt the
    /// endless-traffic reroute (§4.9) instead of being torn down.
    pub endless_traffic: bool,

    /// Personality assigned to hand-off-in vehicles, which arrive with no
    /// `vType` template of their own.
    pub default_personality: Personality,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self { dt: 0.1, seed: 0, endless_traffic: false, default_personality: Personality::default() }
    }
}

/// Static inputs bound once at `setup`.
pub struct Scenario<M: RoadMap> {
    pub map: M,
    pub flow_file: FlowFile,
    pub config: ProviderConfig,
    /// This provider's `source` label, stamped onto every vehicle it owns.
    pub source: String,
}
