//! Provider observer trait for progress reporting and data collection.

use mtsim_actor::VehicleState;
use mtsim_core::ActorId;

/// Callbacks invoked by [`Provider::step`][crate::Provider::step] at key
/// points in the tick.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
pub trait ProviderObserver {
    /// Called once per tick, before spawning and decisions.
    fn on_tick_start(&mut self, _sim_time: f64) {}

    /// Called for every actor the tick's flows spawned.
    fn on_spawn(&mut self, _id: ActorId) {}

    /// Called for every owned actor torn down this tick (reached a
    /// non-endless destination, a blocked reroute, or a map inconsistency).
    fn on_remove(&mut self, _id: ActorId) {}

    /// Called at the end of each tick with the emitted snapshot.
    fn on_tick_end(&mut self, _sim_time: f64, _state: &[VehicleState]) {}
}

/// A [`ProviderObserver`] that does nothing.
pub struct NoopObserver;

impl ProviderObserver for NoopObserver {}

/// Forwards every callback to a [`tracing`] event, following the teacher's
/// `SimObserver` + `NoopObserver` pattern but logging instead of collecting.
pub struct TracingObserver;

impl ProviderObserver for TracingObserver {
    fn on_spawn(&mut self, id: ActorId) {
        tracing::debug!(actor = %id, "spawned");
    }

    fn on_remove(&mut self, id: ActorId) {
        tracing::debug!(actor = %id, "removed");
    }

    fn on_tick_end(&mut self, sim_time: f64, state: &[VehicleState]) {
        tracing::trace!(sim_time, owned = state.len(), "tick complete");
    }
}
