//! Crate-level integration tests covering the concrete scenarios for
//! cut-in acceptance and rejection.

use mtsim_actor::{ActorWorld, Personality, TrafficActor, VehicleState};
use mtsim_core::{ActorId, ActorRng, LaneId, Point2, Role, RouteKey};
use mtsim_map::{RoadMap, StaticRoadMapBuilder};

use crate::route_length::RouteLengthIndex;
use crate::selection::select_lane;
use crate::spatial_cache::SpatialLaneCache;

struct Scenario {
    map: mtsim_map::StaticRoadMap,
    lane0: LaneId,
    lane1: LaneId,
}

fn two_parallel_lanes() -> Scenario {
    let mut b = StaticRoadMapBuilder::new();
    let road = b.add_road();
    let lane0 = b.add_lane(road, 0, Point2::new(0.0, 0.0), 0.0, 200.0, 3.5, 20.0, f64::INFINITY);
    let lane1 = b.add_lane(road, 1, Point2::new(0.0, 3.5), 0.0, 200.0, 3.5, 20.0, f64::INFINITY);
    Scenario { map: b.build(), lane0, lane1 }
}

fn cutin_actor(lane: LaneId, offset: f64, cutin_target_gap: f64) -> TrafficActor {
    let position = Point2::new(offset, 0.0);
    let state = VehicleState::new(ActorId(1), position, 0.0, 10.0, 4.5, 2.0, 1.5, Role::Social, "core");
    TrafficActor {
        state,
        lane,
        lane_offset: offset,
        route_key: RouteKey(0),
        route_index: 0,
        dest_lane: lane,
        dest_offset: 1000.0,
        personality: Personality {
            cutin_prob: 1.0,
            cutin_target_gap,
            aggressiveness: 1.0,
            min_space_cushion: 0.5,
            ..Personality::default()
        },
        cutting_into: None,
        off_route: false,
        done_with_route: false,
        prev_heading_error: 0.0,
        prev_lateral_error: 0.0,
        depart_lane: lane,
        depart_offset: offset,
        depart_heading: 0.0,
        depart_speed: 10.0,
    }
}

fn follower_shadow(lane: LaneId, front_offset_gap: f64, actor_offset: f64) -> VehicleState {
    let follower_half_len = 2.25;
    let follower_offset = actor_offset - follower_half_len - front_offset_gap;
    let position = Point2::new(follower_offset, if lane == LaneId(1) { 3.5 } else { 0.0 });
    VehicleState::new(ActorId(2), position, 0.0, 10.0, 4.5, 2.0, 1.5, Role::EgoAgent, "external")
}

fn build_cache(world: &ActorWorld, actor_lane: LaneId, actor_offset: f64, follower_lane: LaneId, follower_offset: f64) -> SpatialLaneCache {
    let mut cache = SpatialLaneCache::new();
    cache.rebuild(world, |id| {
        if id == ActorId(1) {
            Some((actor_lane, actor_offset))
        } else if id == ActorId(2) {
            Some((follower_lane, follower_offset))
        } else {
            None
        }
    });
    cache
}

#[test]
fn cut_in_accepted_for_tight_gap() {
    let scenario = two_parallel_lanes();
    let actor = cutin_actor(scenario.lane0, 50.0, 2.5);
    let follower = follower_shadow(scenario.lane1, 6.0, 50.0);

    let mut world = ActorWorld::new();
    world.insert_shadow(ActorId(2), follower.clone(), None);

    let follower_offset = follower.position.x;
    let cache = build_cache(&world, scenario.lane0, 50.0, scenario.lane1, follower_offset);

    let mut lengths = RouteLengthIndex::new();
    let road = scenario.map.lane(scenario.lane0).unwrap().road();
    let route_key = lengths.register(&[road], &scenario.map).unwrap();

    let mut rng = ActorRng::new(1, ActorId(1));
    let road_lanes = scenario.map.road(road).unwrap().lanes().to_vec();
    let selection = select_lane(&actor, route_key, 0, &road_lanes, &scenario.map, &lengths, &cache, &mut rng, 0.0).unwrap();

    assert_eq!(selection.window.lane, scenario.lane1);
    assert!(selection.cutting_into.is_some());
}

#[test]
fn cut_in_rejected_for_wide_gap() {
    let scenario = two_parallel_lanes();
    let actor = cutin_actor(scenario.lane0, 50.0, 2.5);
    let follower = follower_shadow(scenario.lane1, 20.0, 50.0);

    let mut world = ActorWorld::new();
    world.insert_shadow(ActorId(2), follower.clone(), None);

    let follower_offset = follower.position.x;
    let cache = build_cache(&world, scenario.lane0, 50.0, scenario.lane1, follower_offset);

    let mut lengths = RouteLengthIndex::new();
    let road = scenario.map.lane(scenario.lane0).unwrap().road();
    let route_key = lengths.register(&[road], &scenario.map).unwrap();

    let mut rng = ActorRng::new(1, ActorId(1));
    let road_lanes = scenario.map.road(road).unwrap().lanes().to_vec();
    let selection = select_lane(&actor, route_key, 0, &road_lanes, &scenario.map, &lengths, &cache, &mut rng, 0.0).unwrap();

    assert_eq!(selection.window.lane, scenario.lane0);
}
