//! Owned/shadow vehicle containers.
//!
//! Modeled as two parallel ordered maps keyed by actor id rather than as
//! Structure-of-Arrays, because determinism requires insertion-order
//! iteration (tie-break for equal lane offsets, and the union walked when
//! rebuilding the spatial lane cache) and the set of live actors changes
//! every tick as vehicles spawn, arrive, and hand off — `IndexMap` gives
//! O(1) lookup by id while preserving insertion order, which a `Vec`-backed
//! SoA store cannot do without a parallel id→index map of its own.

use indexmap::IndexMap;

use mtsim_core::ActorId;
use mtsim_map::Route;

use crate::actor::TrafficActor;
use crate::vehicle::VehicleState;

/// A read-only externally observed vehicle, visible for neighbor queries
/// only. `route_override` is set when the provider was told to plan a route
/// for a vehicle it doesn't own (rare; mostly `None`).
#[derive(Clone, Debug)]
pub struct Shadow {
    pub state: VehicleState,
    pub route_override: Option<Route>,
}

/// Owned actors plus externally observed shadows, kept disjoint by
/// construction: every mutating method maintains the invariant that an id
/// present in `owned` is absent from `shadow` and vice versa.
#[derive(Default)]
pub struct ActorWorld {
    owned: IndexMap<ActorId, TrafficActor>,
    shadow: IndexMap<ActorId, Shadow>,
}

impl ActorWorld {
    pub fn new() -> Self {
        Self { owned: IndexMap::new(), shadow: IndexMap::new() }
    }

    // ── Owned ─────────────────────────────────────────────────────────────

    pub fn insert_owned(&mut self, actor: TrafficActor) {
        let id = actor.id();
        self.shadow.shift_remove(&id);
        self.owned.insert(id, actor);
    }

    pub fn remove_owned(&mut self, id: ActorId) -> Option<TrafficActor> {
        self.owned.shift_remove(&id)
    }

    pub fn owned(&self, id: ActorId) -> Option<&TrafficActor> {
        self.owned.get(&id)
    }

    pub fn owned_mut(&mut self, id: ActorId) -> Option<&mut TrafficActor> {
        self.owned.get_mut(&id)
    }

    pub fn owned_ids(&self) -> impl Iterator<Item = ActorId> + '_ {
        self.owned.keys().copied()
    }

    pub fn iter_owned(&self) -> impl Iterator<Item = &TrafficActor> {
        self.owned.values()
    }

    pub fn owned_count(&self) -> usize {
        self.owned.len()
    }

    pub fn manages(&self, id: ActorId) -> bool {
        self.owned.contains_key(&id)
    }

    // ── Shadow ────────────────────────────────────────────────────────────

    pub fn insert_shadow(&mut self, id: ActorId, state: VehicleState, route_override: Option<Route>) {
        debug_assert!(!self.owned.contains_key(&id), "shadow id must not already be owned");
        self.shadow.insert(id, Shadow { state, route_override });
    }

    pub fn clear_shadow(&mut self) {
        self.shadow.clear();
    }

    pub fn shadow(&self, id: ActorId) -> Option<&Shadow> {
        self.shadow.get(&id)
    }

    pub fn shadow_ids(&self) -> impl Iterator<Item = ActorId> + '_ {
        self.shadow.keys().copied()
    }

    pub fn iter_shadow(&self) -> impl Iterator<Item = &Shadow> {
        self.shadow.values()
    }

    pub fn shadow_count(&self) -> usize {
        self.shadow.len()
    }

    // ── Union queries ─────────────────────────────────────────────────────

    /// All vehicle states, owned first then shadow, in insertion order —
    /// the canonical iteration order for building the spatial lane cache.
    pub fn all_states(&self) -> impl Iterator<Item = &VehicleState> {
        self.owned
            .values()
            .map(|a| &a.state)
            .chain(self.shadow.values().map(|s| &s.state))
    }

    /// `true` iff every owned id is absent from the shadow set (and vice
    /// versa) — the ownership testable property.
    pub fn ownership_disjoint(&self) -> bool {
        self.owned.keys().all(|id| !self.shadow.contains_key(id))
    }
}
