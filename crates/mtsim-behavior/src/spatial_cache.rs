//! `SpatialLaneCache` — per-tick, per-lane sorted offset lists for O(log n)
//! leader/follower queries.
//!
//! Rebuilt from scratch at the start of every tick from the union of owned
//! and shadow vehicle states; never updated incrementally. Two parallel
//! sorted vectors per lane: `back` holds each vehicle's rear-bumper offset
//! (queried to find a leader — the nearest vehicle whose rear lies ahead of
//! mine), `front` holds each vehicle's front-bumper offset (queried to find
//! a follower). Entries are pushed in iteration order over
//! [`ActorWorld::all_states`][mtsim_actor::ActorWorld::all_states], so ties
//! at equal offsets sort stably by insertion order, with actor id as a final
//! tiebreak.

use std::collections::HashMap;

use mtsim_actor::{ActorWorld, VehicleState};
use mtsim_core::{ActorId, LaneId};
use mtsim_map::RoadMap;

use crate::route_length::RouteLengthIndex;

#[derive(Clone, Copy, Debug)]
struct Entry {
    offset: f64,
    actor: ActorId,
}

/// Per-lane sorted offset lists, rebuilt every tick.
#[derive(Default)]
pub struct SpatialLaneCache {
    front: HashMap<LaneId, Vec<Entry>>,
    back: HashMap<LaneId, Vec<Entry>>,
    states: HashMap<ActorId, VehicleState>,
    lanes_of: HashMap<ActorId, LaneId>,
}

impl SpatialLaneCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from the union of owned and shadow vehicles. `lane_offset_of`
    /// supplies each actor's current (lane, arc-length offset) pair.
    pub fn rebuild(
        &mut self,
        world: &ActorWorld,
        lane_offset_of: impl Fn(ActorId) -> Option<(LaneId, f64)>,
    ) {
        self.front.clear();
        self.back.clear();
        self.states.clear();
        self.lanes_of.clear();

        for state in world.all_states() {
            let Some((lane, offset)) = lane_offset_of(state.id) else { continue };
            let half = state.length * 0.5;
            self.front.entry(lane).or_default().push(Entry { offset: offset + half, actor: state.id });
            self.back.entry(lane).or_default().push(Entry { offset: offset - half, actor: state.id });
            self.states.insert(state.id, state.clone());
            self.lanes_of.insert(state.id, lane);
        }

        for v in self.front.values_mut() {
            v.sort_by(|a, b| a.offset.partial_cmp(&b.offset).unwrap().then(a.actor.cmp(&b.actor)));
        }
        for v in self.back.values_mut() {
            v.sort_by(|a, b| a.offset.partial_cmp(&b.offset).unwrap().then(a.actor.cmp(&b.actor)));
        }
    }

    /// `true` iff every entry in the cache corresponds to a live actor and
    /// every live actor with a resolvable lane has exactly one entry —
    /// the cache-consistency testable property.
    pub fn covers_exactly(&self, expected: &[ActorId]) -> bool {
        let mut seen: Vec<ActorId> = self.states.keys().copied().collect();
        seen.sort();
        let mut want = expected.to_vec();
        want.sort();
        want.dedup();
        seen == want
    }

    /// Find the nearest leader ahead of `(lane, my_offset)`, recursing
    /// through outgoing lanes on the route when `lane` itself has no vehicle
    /// ahead. Returns `(distance_to_leader, leader_state)`.
    pub fn find_leader(
        &self,
        lane: LaneId,
        my_offset: f64,
        route_key: mtsim_core::RouteKey,
        route_index: i64,
        map: &dyn RoadMap,
        lengths: &RouteLengthIndex,
        exclude: ActorId,
    ) -> (f64, Option<&VehicleState>) {
        if let Some(entries) = self.back.get(&lane) {
            if let Some(hit) = entries
                .iter()
                .find(|e| e.offset > my_offset && e.actor != exclude)
            {
                let dist = hit.offset - my_offset;
                return (dist.max(0.0), self.states.get(&hit.actor));
            }
        }

        let Some(current_lane) = map.lane(lane) else { return (f64::INFINITY, None) };
        let lane_len = current_lane.length();
        let base = lane_len - my_offset;

        let mut best: (f64, Option<&VehicleState>) = (f64::INFINITY, None);
        for &next in current_lane.outgoing_lanes() {
            if lengths.remaining(route_key, next, route_index + 1).is_none() {
                continue;
            }
            let (d, leader) = self.find_leader_from_start(next, route_key, route_index + 1, map, lengths, exclude);
            let total = base + d;
            if total < best.0 {
                best = (total, leader);
            }
        }
        best
    }

    fn find_leader_from_start(
        &self,
        lane: LaneId,
        route_key: mtsim_core::RouteKey,
        route_index: i64,
        map: &dyn RoadMap,
        lengths: &RouteLengthIndex,
        exclude: ActorId,
    ) -> (f64, Option<&VehicleState>) {
        if let Some(entries) = self.back.get(&lane) {
            if let Some(hit) = entries.iter().find(|e| e.actor != exclude) {
                return (hit.offset.max(0.0), self.states.get(&hit.actor));
            }
        }
        let Some(current_lane) = map.lane(lane) else { return (f64::INFINITY, None) };
        let lane_len = current_lane.length();
        let mut best: (f64, Option<&VehicleState>) = (f64::INFINITY, None);
        for &next in current_lane.outgoing_lanes() {
            if lengths.remaining(route_key, next, route_index + 1).is_none() {
                continue;
            }
            let (d, leader) = self.find_leader_from_start(next, route_key, route_index + 1, map, lengths, exclude);
            let total = lane_len + d;
            if total < best.0 {
                best = (total, leader);
            }
        }
        best
    }

    /// Find the nearest follower behind `(lane, my_offset)`. Looks back at
    /// most one incoming-lane hop — followers further back don't affect the
    /// dynamics this cache supports.
    pub fn find_follower(
        &self,
        lane: LaneId,
        my_offset: f64,
        map: &dyn RoadMap,
        exclude: ActorId,
    ) -> (f64, Option<&VehicleState>) {
        if let Some(entries) = self.front.get(&lane) {
            if let Some(hit) = entries.iter().rev().find(|e| e.offset < my_offset && e.actor != exclude) {
                return ((my_offset - hit.offset).max(0.0), self.states.get(&hit.actor));
            }
        }

        let Some(current_lane) = map.lane(lane) else { return (f64::INFINITY, None) };
        let mut best: (f64, Option<&VehicleState>) = (f64::INFINITY, None);
        for &prev in current_lane.incoming_lanes() {
            let Some(prev_lane) = map.lane(prev) else { continue };
            if let Some(entries) = self.front.get(&prev) {
                if let Some(hit) = entries.iter().rev().find(|e| e.actor != exclude) {
                    let dist = my_offset + (prev_lane.length() - hit.offset);
                    if dist < best.0 {
                        best = (dist.max(0.0), self.states.get(&hit.actor));
                    }
                }
            }
        }
        best
    }

    pub fn actor_lane(&self, actor: ActorId) -> Option<LaneId> {
        self.lanes_of.get(&actor).copied()
    }
}
