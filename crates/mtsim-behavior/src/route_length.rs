//! `RouteLengthIndex` — remaining route length, cached per (route, lane, route position).
//!
//! Built once per distinct route by backward breadth-first propagation from
//! the terminal road: every lane of the last road starts at its own length,
//! then each predecessor lane (reachable through `Lane::incoming_lanes`) one
//! route-position earlier picks up its own length plus whatever its
//! successor already accumulated. A lane whose successor lies on the
//! route's first road gets a `+1` bias, so that endless-traffic looping is
//! mildly preferred over dead-ending when two branches are otherwise tied.

use std::collections::HashMap;

use indexmap::IndexMap;

use mtsim_core::{LaneId, RoadId};
use mtsim_map::{Route, RoadMap};

use crate::error::{BehaviorError, BehaviorResult};
use mtsim_core::RouteKey;

const LOOP_BIAS: f64 = 1.0;

/// Per-(lane, route-position) remaining length table for every route
/// registered so far.
#[derive(Default)]
pub struct RouteLengthIndex {
    next_key: u32,
    keys_by_roads: HashMap<Vec<RoadId>, RouteKey>,
    routes: IndexMap<RouteKey, Route>,
    lengths: HashMap<(RouteKey, LaneId, usize), f64>,
}

impl RouteLengthIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `roads` as a route, building its length table if this exact
    /// road sequence hasn't been seen before. Idempotent.
    pub fn register(&mut self, roads: &[RoadId], map: &dyn RoadMap) -> BehaviorResult<RouteKey> {
        if let Some(&key) = self.keys_by_roads.get(roads) {
            return Ok(key);
        }

        for &road_id in roads {
            map.road(road_id).ok_or(BehaviorError::UnknownRoad(road_id))?;
        }

        let key = RouteKey(self.next_key);
        self.next_key += 1;

        self.build(key, roads, map)?;

        self.keys_by_roads.insert(roads.to_vec(), key);
        self.routes.insert(key, Route::new(roads.to_vec()));
        Ok(key)
    }

    fn build(&mut self, key: RouteKey, roads: &[RoadId], map: &dyn RoadMap) -> BehaviorResult<()> {
        let last = roads.len() - 1;
        let first_road = roads[0];

        let last_road = map.road(roads[last]).expect("checked above");
        for &lane_id in last_road.lanes() {
            let lane = map.lane(lane_id).expect("road.lanes() entries must resolve");
            let mut length = lane.length();
            if lane.outgoing_lanes().iter().any(|&out| {
                map.lane(out).map(|l| l.road() == first_road).unwrap_or(false)
            }) {
                length += LOOP_BIAS;
            }
            self.lengths.insert((key, lane_id, last), length);
        }

        for i in (0..last).rev() {
            let road = map.road(roads[i]).expect("checked above");
            let next_road = roads[i + 1];
            for &lane_id in road.lanes() {
                let lane = map.lane(lane_id).expect("road.lanes() entries must resolve");
                let best = lane
                    .outgoing_lanes()
                    .iter()
                    .filter(|&&out| map.lane(out).map(|l| l.road() == next_road).unwrap_or(false))
                    .filter_map(|&out| self.lengths.get(&(key, out, i + 1)))
                    .cloned()
                    .fold(f64::INFINITY, f64::min);
                if best.is_finite() {
                    self.lengths.insert((key, lane_id, i), lane.length() + best);
                }
            }
        }
        Ok(())
    }

    /// Remaining path length from the start of `lane` at route position
    /// `route_index`, or `None` if `lane` isn't on the route at that
    /// position.
    pub fn remaining(&self, key: RouteKey, lane: LaneId, route_index: i64) -> Option<f64> {
        if route_index < 0 {
            return None;
        }
        self.lengths.get(&(key, lane, route_index as usize)).copied()
    }

    pub fn route(&self, key: RouteKey) -> Option<&Route> {
        self.routes.get(&key)
    }
}
