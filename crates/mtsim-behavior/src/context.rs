//! `DecisionContext` — the read-only per-tick bundle passed to every actor's
//! decision step.
//!
//! Built once per tick by the provider and shared immutably across every
//! actor's intent-phase computation (see §5): no actor observes another's
//! partial update, so iteration order over actors never affects the result.

use mtsim_map::RoadMap;

use crate::route_length::RouteLengthIndex;
use crate::spatial_cache::SpatialLaneCache;

pub struct DecisionContext<'a> {
    pub dt: f64,
    pub sim_time: f64,
    pub map: &'a dyn RoadMap,
    pub lengths: &'a RouteLengthIndex,
    pub cache: &'a SpatialLaneCache,
    pub endless_traffic: bool,
}

impl<'a> DecisionContext<'a> {
    pub fn new(
        dt: f64,
        sim_time: f64,
        map: &'a dyn RoadMap,
        lengths: &'a RouteLengthIndex,
        cache: &'a SpatialLaneCache,
        endless_traffic: bool,
    ) -> Self {
        Self { dt, sim_time, map, lengths, cache, endless_traffic }
    }
}
