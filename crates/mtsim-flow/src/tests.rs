//! End-to-end: load a flow file, then spawn from it against a real map.

use mtsim_core::{ActorId, ActorRng, Point2};
use mtsim_map::StaticRoadMapBuilder;

use crate::{load_flow_str, Flow};

const XML: &str = r#"
<routes>
  <vType id="car" maxSpeed="12" accel="2.6" decel="4.5"/>
  <route id="r0" edges="0"/>
  <flow id="f0" type="car" route="r0" begin="0" end="3600" vehsPerHour="720"
        departLane="0" departPos="0" departSpeed="max"
        arrivalLane="0" arrivalPos="max"/>
</routes>
"#;

#[test]
fn load_and_spawn_one_actor() {
    let mut b = StaticRoadMapBuilder::new();
    let road = b.add_road();
    b.add_lane(road, 0, Point2::new(0.0, 0.0), 0.0, 100.0, 3.5, 10.0, f64::INFINITY);
    let map = b.build();

    let file = load_flow_str(XML).unwrap();
    let flow_spec = file.flows[0].clone();
    let route = file.routes[&flow_spec.route].clone();
    let vtype = file.vtypes[&flow_spec.vtype].clone();
    let mut flow = Flow::new(flow_spec, route, vtype);

    let mut rng = ActorRng::new(0, ActorId(0));
    let actor = flow.try_spawn(0.0, ActorId(1), &map, &[], &[], &mut rng).unwrap();

    assert_eq!(actor.state.speed, 12.0);
    assert_eq!(actor.lane_offset, 0.0);
}
