//! Post-step re-localization (§4.8) and endless-traffic reroute (§4.9).

use mtsim_actor::{ActorWorld, TrafficActor, VehicleState};
use mtsim_core::OrientedBox;
use mtsim_map::RoadMap;

use crate::route_length::RouteLengthIndex;

/// How many nearest lanes to consider when re-localizing after a step.
const RELOCALIZE_K: usize = 5;

/// Outcome of re-localizing an actor after committing its next pose.
pub struct Relocalized {
    pub lane: mtsim_core::LaneId,
    pub lane_offset: f64,
    pub off_route: bool,
    /// Updated route index, or the actor's prior index when it fell off-route.
    pub route_index: i64,
    /// `true` once the actor's new lane/offset reached its destination,
    /// independent of whether endless traffic is enabled — the caller
    /// decides whether that means `done_with_route` or a reroute attempt.
    pub reached_destination: bool,
    pub done_with_route: bool,
}

/// Re-derive `actor`'s lane and offset from its (already-committed) new
/// position, per §4.8. Prefers a lane on the route at or after the current
/// route index; falls back to the nearest lane and sets `off_route`.
pub fn relocalize(
    actor: &TrafficActor,
    route_key: mtsim_core::RouteKey,
    lengths: &RouteLengthIndex,
    map: &dyn RoadMap,
    endless_traffic: bool,
) -> Relocalized {
    let candidates = map.nearest_lanes(actor.state.position, RELOCALIZE_K, actor.state.length, true);

    let route = lengths.route(route_key);
    let mut best: Option<(mtsim_core::LaneId, i64, i64)> = None;
    if let Some(route) = route {
        for &lane_id in &candidates {
            let Some(lane) = map.lane(lane_id) else { continue };
            for (i, &road) in route.roads.iter().enumerate() {
                if road == lane.road() && i as i64 >= actor.route_index {
                    let delta = i as i64 - actor.route_index;
                    if best.map(|(_, d, _)| delta < d).unwrap_or(true) {
                        best = Some((lane_id, delta, i as i64));
                    }
                    break;
                }
            }
        }
    }

    let (lane, off_route, route_index) = match best {
        Some((lane_id, _, i)) => (lane_id, false, i),
        None => {
            let nearest = candidates.first().copied().unwrap_or(actor.lane);
            (nearest, true, actor.route_index)
        }
    };

    let lane_offset = map
        .lane(lane)
        .map(|l| l.offset_along_lane(actor.state.position))
        .unwrap_or(actor.lane_offset);

    let reached_destination = lane == actor.dest_lane && lane_offset >= actor.dest_offset;
    let done_with_route = (reached_destination && !endless_traffic) || actor.done_with_route;

    Relocalized { lane, lane_offset, off_route, route_index, reached_destination, done_with_route }
}

/// Outcome of attempting an endless-traffic reroute for an actor that just
/// reached its destination.
pub enum RerouteOutcome {
    /// Strategy A: the route loops back on itself; reset `route_index` to
    /// `-1` so the next step re-enters the route's first road naturally.
    Loop,
    /// Strategy B: teleport to the original depart pose. `None` if the
    /// teleport bbox overlaps existing geometry — caller should mark the
    /// actor `done_with_route` instead.
    Teleport(VehicleState),
    Blocked,
}

/// Decide and, for the teleport strategy, validate an endless-traffic
/// reroute for `actor`, which has just reached its destination lane/offset.
pub fn reroute(
    actor: &TrafficActor,
    route_key: mtsim_core::RouteKey,
    lengths: &RouteLengthIndex,
    map: &dyn RoadMap,
    world: &ActorWorld,
    reserved: &[OrientedBox],
) -> RerouteOutcome {
    if let Some(route) = lengths.route(route_key) {
        if let (Some(first), Some(current_lane)) = (route.first_road(), map.lane(actor.lane)) {
            if current_lane
                .outgoing_lanes()
                .iter()
                .any(|&out| map.lane(out).map(|l| l.road() == first).unwrap_or(false))
            {
                return RerouteOutcome::Loop;
            }
        }
    }

    let depart_position = map
        .lane(actor.depart_lane)
        .map(|l| l.from_lane_coord(actor.depart_offset, 0.0))
        .unwrap_or(actor.state.position);

    let teleported = VehicleState::new(
        actor.id(),
        depart_position,
        actor.depart_heading,
        actor.depart_speed,
        actor.state.length,
        actor.state.width,
        actor.state.height,
        actor.state.role,
        actor.state.source.clone(),
    );

    let bbox = teleported.bounding_box();
    let overlaps_vehicle = world
        .all_states()
        .filter(|s| s.id != actor.id())
        .any(|s| bbox.intersects(&s.bounding_box()));
    let overlaps_reserved = reserved.iter().any(|r| bbox.intersects(r));

    if overlaps_vehicle || overlaps_reserved {
        RerouteOutcome::Blocked
    } else {
        RerouteOutcome::Teleport(teleported)
    }
}

