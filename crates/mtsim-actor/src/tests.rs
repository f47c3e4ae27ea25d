//! Unit tests for mtsim-actor.

use mtsim_core::{ActorId, LaneId, Point2, Role, RouteKey};

use crate::actor::Personality;
use crate::{ActorWorld, TrafficActor, VehicleState};

fn make_actor(id: u64, source: &str) -> TrafficActor {
    let state = VehicleState::new(
        ActorId(id),
        Point2::new(0.0, 0.0),
        0.0,
        5.0,
        4.5,
        2.0,
        1.5,
        Role::Social,
        source,
    );
    TrafficActor {
        state,
        lane: LaneId(0),
        lane_offset: 0.0,
        route_key: RouteKey(0),
        route_index: 0,
        dest_lane: LaneId(0),
        dest_offset: 100.0,
        personality: Personality::default(),
        cutting_into: None,
        off_route: false,
        done_with_route: false,
        prev_heading_error: 0.0,
        prev_lateral_error: 0.0,
        depart_lane: LaneId(0),
        depart_offset: 0.0,
        depart_heading: 0.0,
        depart_speed: 0.0,
    }
}

#[test]
fn vehicle_state_clamps_speed_and_heading() {
    let s = VehicleState::new(
        ActorId(0),
        Point2::new(0.0, 0.0),
        -0.1,
        -5.0,
        4.0,
        2.0,
        1.5,
        Role::Social,
        "core",
    );
    assert!(s.speed >= 0.0);
    assert!(s.heading >= 0.0 && s.heading < std::f64::consts::TAU);
}

#[test]
fn personality_defaults_match_vtype_defaults() {
    let p = Personality::default();
    assert_eq!(p.max_speed, 55.55);
    assert_eq!(p.accel, 2.6);
    assert_eq!(p.decel, 4.5);
    assert_eq!(p.emergency_decel, 4.5);
    assert_eq!(p.tau, 1.0);
    assert_eq!(p.cutin_target_gap, 1.25);
}

#[test]
fn owned_and_shadow_stay_disjoint() {
    let mut world = ActorWorld::new();
    world.insert_owned(make_actor(1, "core"));
    world.insert_owned(make_actor(2, "core"));
    assert!(world.ownership_disjoint());
    assert!(world.manages(ActorId(1)));
    assert!(!world.manages(ActorId(99)));
}

#[test]
fn hand_off_out_moves_id_out_of_owned() {
    let mut world = ActorWorld::new();
    world.insert_owned(make_actor(1, "core"));
    let removed = world.remove_owned(ActorId(1)).unwrap();
    world.insert_shadow(ActorId(1), removed.state, None);
    assert!(!world.manages(ActorId(1)));
    assert!(world.shadow(ActorId(1)).is_some());
    assert!(world.ownership_disjoint());
}

#[test]
fn insert_shadow_removes_any_owned_alias() {
    let mut world = ActorWorld::new();
    world.insert_owned(make_actor(1, "core"));
    let state = make_actor(1, "external").state;
    world.insert_shadow(ActorId(1), state, None);
    assert!(!world.manages(ActorId(1)));
    assert!(world.ownership_disjoint());
}

#[test]
fn all_states_iterates_owned_before_shadow_in_insertion_order() {
    let mut world = ActorWorld::new();
    world.insert_owned(make_actor(2, "core"));
    world.insert_owned(make_actor(1, "core"));
    world.insert_shadow(ActorId(3), make_actor(3, "external").state, None);
    let ids: Vec<u64> = world.all_states().map(|s| s.id.0).collect();
    assert_eq!(ids, vec![2, 1, 3]);
}
