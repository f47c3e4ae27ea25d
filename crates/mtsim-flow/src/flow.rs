//! Flow spawner: turns a declarative [`FlowSpec`] into concrete
//! [`TrafficActor`]s over the course of a run.

use mtsim_actor::{Personality, TrafficActor, VehicleState};
use mtsim_core::{ActorId, ActorRng, OrientedBox, Role};
use mtsim_map::{Lane, RoadMap};

use crate::spec::{FlowSpec, OffsetSpec, RouteSpec, SpeedSpec, VTypeSpec};

/// Default social-vehicle dimensions (meters), used when a flow spawns an
/// actor rather than receiving one with its own measured bounding box.
const DEFAULT_LENGTH: f64 = 4.5;
const DEFAULT_WIDTH: f64 = 1.8;
const DEFAULT_HEIGHT: f64 = 1.5;

/// A spawn source bound to its route and vehicle-type template.
pub struct Flow {
    pub spec: FlowSpec,
    route: RouteSpec,
    vtype: VTypeSpec,
    last_spawn_time: Option<f64>,
}

impl Flow {
    pub fn new(spec: FlowSpec, route: RouteSpec, vtype: VTypeSpec) -> Self {
        Self { spec, route, vtype, last_spawn_time: None }
    }

    pub fn route(&self) -> &RouteSpec {
        &self.route
    }

    /// Attempt to spawn one actor at `sim_time`. Returns `None` (and leaves
    /// `last_spawn_time` untouched) if the flow is outside its time window,
    /// hasn't reached its next inter-arrival period, or the tentative bbox
    /// overlaps a reserved area or an existing vehicle — per §4.10 the
    /// rejection is silent and retried next tick.
    pub fn try_spawn(
        &mut self,
        sim_time: f64,
        next_id: ActorId,
        map: &dyn RoadMap,
        reserved: &[OrientedBox],
        existing: &[OrientedBox],
        rng: &mut ActorRng,
    ) -> Option<TrafficActor> {
        if sim_time < self.spec.begin || sim_time >= self.spec.end {
            return None;
        }
        let period = self.spec.period_secs();
        if let Some(last) = self.last_spawn_time {
            if sim_time - last < period {
                return None;
            }
        }

        let actor = self.build_actor(next_id, map, rng)?;
        let bbox = actor.state.bounding_box();
        let blocked = reserved.iter().any(|r| bbox.intersects(r)) || existing.iter().any(|e| bbox.intersects(e));
        if blocked {
            return None;
        }

        self.last_spawn_time = Some(sim_time);
        Some(actor)
    }

    fn build_actor(&self, id: ActorId, map: &dyn RoadMap, rng: &mut ActorRng) -> Option<TrafficActor> {
        let first_road = *self.route.edges.first()?;
        let road = map.road(first_road)?;
        let lane_idx = if self.spec.depart_lane >= 0 { self.spec.depart_lane as usize } else { 0 };
        let lane_id = *road.lanes().get(lane_idx)?;
        let lane = map.lane(lane_id)?;

        let depart_offset = match self.spec.depart_pos {
            OffsetSpec::Max => lane.length(),
            OffsetSpec::Random => rng.gen_range(0.0..=lane.length()),
            OffsetSpec::Literal(v) => v.clamp(0.0, lane.length()),
        };
        let depart_speed = match self.spec.depart_speed {
            SpeedSpec::Max => self.vtype.max_speed,
            SpeedSpec::SpeedLimit => lane.speed_limit(),
            SpeedSpec::Random => rng.gen_range(0.0..=lane.speed_limit()),
            SpeedSpec::Literal(v) => v,
        };

        let last_road = *self.route.edges.last()?;
        let dest_road = map.road(last_road)?;
        let dest_lane_idx = if self.spec.arrival_lane >= 0 { self.spec.arrival_lane as usize } else { 0 };
        let dest_lane_id = *dest_road.lanes().get(dest_lane_idx)?;
        let dest_lane = map.lane(dest_lane_id)?;
        let dest_offset = match self.spec.arrival_pos {
            OffsetSpec::Max => dest_lane.length(),
            OffsetSpec::Random => rng.gen_range(0.0..=dest_lane.length()),
            OffsetSpec::Literal(v) => v.clamp(0.0, dest_lane.length()),
        };

        let position = lane.from_lane_coord(depart_offset, 0.0);
        let heading = lane.vector_at_offset(depart_offset).heading();

        let state = VehicleState::new(
            id,
            position,
            heading,
            depart_speed,
            DEFAULT_LENGTH,
            DEFAULT_WIDTH,
            DEFAULT_HEIGHT,
            Role::Social,
            "traffic_flow",
        );

        let personality = Personality {
            min_space_cushion: 0.5,
            speed_factor: self.vtype.speed_factor,
            aggressiveness: self.vtype.lc_assertive,
            cutin_prob: self.vtype.lc_cutin_prob,
            cutin_target_gap: 2.5 * 0.5,
            cutin_hold_secs: 3.0,
            dogmatic: self.vtype.lc_dogmatic,
            max_angular_velocity: 26.0,
            max_speed: self.vtype.max_speed,
            accel: self.vtype.accel,
            decel: self.vtype.decel,
            emergency_decel: self.vtype.emergency_decel,
            tau: self.vtype.tau,
        };

        Some(TrafficActor {
            state,
            lane: lane_id,
            lane_offset: depart_offset,
            route_key: mtsim_core::RouteKey::INVALID,
            route_index: 0,
            dest_lane: dest_lane_id,
            dest_offset,
            personality,
            cutting_into: None,
            off_route: false,
            done_with_route: false,
            prev_heading_error: 0.0,
            prev_lateral_error: 0.0,
            depart_lane: lane_id,
            depart_offset,
            depart_heading: heading,
            depart_speed,
        })
    }
}
