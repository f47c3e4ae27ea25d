//! Integration tests for the provider orchestrator.

use mtsim_actor::VehicleState;
use mtsim_core::{ActorId, Point2, Role};
use mtsim_map::{StaticRoadMap, StaticRoadMapBuilder};

use crate::observer::NoopObserver;
use crate::provider::Provider;
use crate::scenario::{ProviderConfig, Scenario};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Two one-lane roads end to end: road 0 (100 m) feeds road 1 (100 m).
fn two_road_map() -> StaticRoadMap {
    let mut b = StaticRoadMapBuilder::new();
    let r0 = b.add_road();
    let l0 = b.add_lane(r0, 0, Point2::new(0.0, 0.0), 0.0, 100.0, 3.5, 30.0, f64::INFINITY);
    let r1 = b.add_road();
    let l1 = b.add_lane(r1, 0, Point2::new(100.0, 0.0), 0.0, 100.0, 3.5, 30.0, f64::INFINITY);
    b.connect_lanes(l0, l1);
    b.connect_roads(r0, r1);
    b.build()
}

const ONE_FLOW_XML: &str = r#"
<routes>
  <vType id="car" maxSpeed="12" accel="2.6" decel="4.5"/>
  <route id="r0" edges="0 1"/>
  <flow id="f0" type="car" route="r0" begin="0" end="3600" vehsPerHour="3600"
        departLane="0" departPos="0" departSpeed="max"
        arrivalLane="0" arrivalPos="max"/>
</routes>
"#;

fn scenario() -> Scenario<StaticRoadMap> {
    let flow_file = mtsim_flow::load_flow_str(ONE_FLOW_XML).unwrap();
    Scenario {
        map: two_road_map(),
        flow_file,
        config: ProviderConfig { dt: 0.1, seed: 7, endless_traffic: false, ..ProviderConfig::default() },
        source: "traffic".into(),
    }
}

// ── setup ─────────────────────────────────────────────────────────────────────

#[test]
fn setup_spawns_the_first_flow_vehicle_immediately() {
    let (provider, state) = Provider::setup(scenario()).unwrap();
    assert_eq!(state.len(), 1);
    assert_eq!(state[0].speed, 12.0);
    assert!(provider.manages_vehicle(state[0].id));
}

#[test]
fn setup_rejects_a_flow_with_an_unknown_vtype() {
    let xml = r#"
    <routes>
      <route id="r0" edges="0 1"/>
      <flow id="f0" type="ghost" route="r0" begin="0" end="10" vehsPerHour="360"/>
    </routes>
    "#;
    let flow_file = mtsim_flow::load_flow_str(xml);
    assert!(flow_file.is_err(), "the loader itself rejects unknown vType references");
}

// ── step ──────────────────────────────────────────────────────────────────────

#[test]
fn step_advances_owned_vehicles_and_keeps_snapshot_owned_only() {
    let (mut provider, state) = Provider::setup(scenario()).unwrap();
    let id = state[0].id;
    let mut observer = NoopObserver;

    let mut sim_time = 0.0;
    let mut last = state;
    for _ in 0..20 {
        sim_time += 0.1;
        last = provider.step(0.1, sim_time, &mut observer);
    }

    let vehicle = last.iter().find(|v| v.id == id).expect("vehicle still owned");
    assert!(vehicle.position.x > 0.0, "vehicle should have advanced along the lane");
    assert!(last.iter().all(|v| v.source == "traffic"), "snapshot reports only this provider's source");
}

#[test]
fn step_keeps_spawning_new_flow_vehicles_over_time() {
    let (mut provider, _state) = Provider::setup(scenario()).unwrap();
    let mut observer = NoopObserver;

    let mut sim_time = 0.0;
    let mut seen_ids = std::collections::HashSet::new();
    for _ in 0..50 {
        sim_time += 0.1;
        let state = provider.step(0.1, sim_time, &mut observer);
        for v in &state {
            seen_ids.insert(v.id);
        }
    }

    assert!(seen_ids.len() > 1, "a 3600 veh/h flow should spawn more than one vehicle in 5 simulated seconds");
}

// ── sync (hand-off) ───────────────────────────────────────────────────────────

#[test]
fn sync_adopts_foreign_vehicles_as_shadows() {
    let (mut provider, state) = Provider::setup(scenario()).unwrap();
    let mut incoming = state;
    incoming.push(VehicleState::new(
        ActorId(999),
        Point2::new(50.0, 0.0),
        0.0,
        5.0,
        4.5,
        1.8,
        1.5,
        Role::Social,
        "other_provider",
    ));

    provider.sync(incoming);
    assert!(!provider.manages_vehicle(ActorId(999)), "a foreign vehicle never becomes owned by sync alone");
}

#[test]
fn sync_drops_owned_vehicles_missing_from_the_incoming_snapshot() {
    let (mut provider, state) = Provider::setup(scenario()).unwrap();
    let id = state[0].id;
    provider.sync(Vec::new());
    assert!(!provider.manages_vehicle(id));
}

// ── add_vehicle / stop_managing ──────────────────────────────────────────────

#[test]
fn add_vehicle_adopts_a_hand_off_and_assigns_a_route() {
    let (mut provider, _state) = Provider::setup(scenario()).unwrap();
    let incoming = VehicleState::new(
        ActorId(42),
        Point2::new(10.0, 0.0),
        0.0,
        8.0,
        4.5,
        1.8,
        1.5,
        Role::Social,
        "other_provider",
    );

    provider.add_vehicle(incoming, None).unwrap();
    assert!(provider.manages_vehicle(ActorId(42)));
    assert!(provider.vehicle_dest_road(ActorId(42)).is_some());
}

#[test]
fn stop_managing_unknown_vehicle_is_an_error() {
    let (mut provider, _state) = Provider::setup(scenario()).unwrap();
    assert!(provider.stop_managing(ActorId(12345)).is_err());
}

#[test]
fn stop_managing_known_vehicle_releases_it() {
    let (mut provider, state) = Provider::setup(scenario()).unwrap();
    let id = state[0].id;
    provider.stop_managing(id).unwrap();
    assert!(!provider.manages_vehicle(id));
}

// ── reserve_traffic_location_for_vehicle ─────────────────────────────────────

#[test]
fn reserved_location_blocks_a_flow_spawn_at_the_same_spot() {
    let (mut provider, state) = Provider::setup(scenario()).unwrap();
    assert_eq!(state.len(), 1);

    // Reserve the depart point so the flow's next vehicle (period = 1s, since
    // vehsPerHour = 3600) can't spawn there once its period has elapsed.
    let blocker = mtsim_core::OrientedBox::new(Point2::new(0.0, 0.0), 0.0, 4.5, 1.8);
    provider.reserve_traffic_location_for_vehicle(ActorId(9000), blocker);

    let mut observer = NoopObserver;
    let mut sim_time = 0.0;
    let mut last = state;
    for _ in 0..12 {
        sim_time += 0.1;
        last = provider.step(0.1, sim_time, &mut observer);
    }

    assert_eq!(last.len(), 1, "the reservation should have blocked the second spawn attempt");
}
