//! `LaneWindow` — the per-candidate-lane decision record, and the
//! crossing-time model used to decide whether steering into a lane is
//! feasible before the actor runs out of room.

use mtsim_actor::TrafficActor;
use mtsim_core::{LaneId, RouteKey};
use mtsim_map::RoadMap;

use crate::longitudinal::time_to_cover;
use crate::route_length::RouteLengthIndex;
use crate::spatial_cache::SpatialLaneCache;

/// Sine of the nominal 30-degree crossing angle used by the crossing-time
/// model (`theta = PI / 6`).
const CROSSING_ANGLE_SIN: f64 = 0.5;

/// Scratch record built once per candidate lane during lane selection.
#[derive(Clone, Debug)]
pub struct LaneWindow {
    pub lane: LaneId,
    /// Lane-relative coordinate of the actor's projection onto this lane.
    pub s: f64,
    pub t: f64,
    pub gap_ahead: f64,
    pub time_left: f64,
    pub ttre: f64,
    pub agent_gap: Option<f64>,
    pub adj_time_left: f64,
}

impl LaneWindow {
    /// Build the window for `lane`, given the actor's own state, its current
    /// kinematics, and the shared per-tick caches.
    #[allow(clippy::too_many_arguments)]
    pub fn build(
        actor: &TrafficActor,
        lane: LaneId,
        route_key: RouteKey,
        route_index: i64,
        map: &dyn RoadMap,
        lengths: &RouteLengthIndex,
        cache: &SpatialLaneCache,
    ) -> Option<Self> {
        let lane_geom = map.lane(lane)?;
        let (s, t) = lane_geom.to_lane_coord(actor.state.position);

        let remaining_in_lane = lengths
            .remaining(route_key, lane, route_index)
            .unwrap_or_else(|| lane_geom.length() - s);

        let (leader_dist, leader) = cache.find_leader(lane, s, route_key, route_index, map, lengths, actor.id());
        let half_len = actor.state.length * 0.5;
        let gap_ahead = (leader_dist - half_len - actor.personality.min_space_cushion).max(0.0);

        let (follower_dist, follower) = cache.find_follower(lane, s, map, actor.id());
        let gap_behind = (follower_dist - half_len - actor.personality.min_space_cushion).max(0.0);

        // The leader's acceleration isn't carried as a plain scalar (only as
        // the momentum-step `linear_acceleration` vector), so the closing
        // term uses relative speed only, with zero relative acceleration.
        let delta_speed = actor.state.speed - leader.map(|l| l.speed).unwrap_or(actor.state.speed);
        let time_to_collision = if leader.is_some() {
            time_to_cover(gap_ahead, delta_speed, 0.0)
        } else {
            f64::INFINITY
        };
        let time_to_end = if actor.state.speed > 0.0 {
            remaining_in_lane / actor.state.speed
        } else {
            f64::INFINITY
        };
        let time_left = time_to_end.min(time_to_collision);

        let follower_speed = follower.map(|f| f.speed).unwrap_or(0.0);
        let ttre = if let Some(f) = follower {
            let closing = f.speed - actor.state.speed;
            if closing > 0.0 { gap_behind / closing } else { f64::INFINITY }
        } else {
            f64::INFINITY
        };
        let _ = follower_speed;

        let agent_gap = follower
            .filter(|f| f.role == mtsim_core::Role::EgoAgent)
            .map(|_| gap_behind);

        let crossing = crossing_time_into(actor, lane_geom.index(), lane, map, s, t);
        let adj_time_left = time_left - crossing;

        Some(LaneWindow { lane, s, t, gap_ahead, time_left, ttre, agent_gap, adj_time_left })
    }
}

/// Closed-form crossing time for a single lane boundary at the actor's
/// current speed, with a curvature correction that scales the effective
/// crossing distance by the lane's local radius of curvature.
pub fn crossing_time_at_speed(width: f64, curvature_radius: f64, speed: f64) -> f64 {
    let base = width / CROSSING_ANGLE_SIN;
    let curvature_scale = if curvature_radius.is_finite() && curvature_radius.abs() > 1e-6 {
        1.0 + width / (2.0 * curvature_radius.abs())
    } else {
        1.0
    };
    let dist = base * curvature_scale;
    if speed > 1e-6 {
        dist / speed
    } else {
        f64::INFINITY
    }
}

/// Aggregate crossing time from the actor's current lane index to
/// `target_index`, summing a partial current-lane term (from how far
/// off-center the actor already is), full crossings for intermediate lanes,
/// and half a crossing for the final lane.
fn crossing_time_into(
    actor: &TrafficActor,
    current_index: i32,
    target: LaneId,
    map: &dyn RoadMap,
    s: f64,
    t: f64,
) -> f64 {
    let Some(target_lane) = map.lane(target) else { return f64::INFINITY };
    let target_index = target_lane.index();
    if target_index == current_index {
        return 0.0;
    }

    let width = target_lane.width_at_offset(s);
    let radius = target_lane.curvature_radius_at_offset(s);
    let per_lane = crossing_time_at_speed(width, radius, actor.state.speed.max(0.1));

    let lane_count = (target_index - current_index).unsigned_abs() as f64;
    let intermediate = (lane_count - 1.0).max(0.0) * per_lane;
    let current_lane_term = (t.abs() / width.max(1e-3)).min(1.0) * per_lane;

    current_lane_term + intermediate + 0.5 * per_lane
}

/// `true` iff crossing from the actor's current lane into `target` is
/// feasible: every intermediate lane's `min(time_left, ttre)` must exceed
/// the aggregate crossing time into it.
pub fn crossing_is_feasible(window: &LaneWindow) -> bool {
    window.time_left.min(window.ttre) > window.time_left - window.adj_time_left
}

