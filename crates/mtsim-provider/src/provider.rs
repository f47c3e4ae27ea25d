//! The `Provider` struct and its two-pass tick loop.

use std::collections::HashMap;

use mtsim_actor::{ActorWorld, TrafficActor, VehicleState};
use mtsim_behavior::{decide, relocalize, reroute, DecisionContext, RerouteOutcome, RouteLengthIndex, SpatialLaneCache};
use mtsim_core::{ActorId, ActorRng, OrientedBox, RoadId, SimRng};
use mtsim_flow::Flow;
use mtsim_map::{Lane, RoadMap};

use crate::error::{ProviderError, ProviderResult};
use crate::observer::ProviderObserver;
use crate::scenario::{ProviderConfig, Scenario};

/// A snapshot of the vehicles a provider currently owns — the only thing
/// that crosses the provider boundary (§6).
pub type ProviderState = Vec<VehicleState>;

/// Top-level orchestrator: ticks all owned actors in two passes (decide,
/// then apply), owns the per-tick caches, and exchanges state with peers.
///
/// Generic over the road-map collaborator the way the teacher's `Sim<B, R>`
/// is generic over its router, so a host can plug in a real lane-geometry
/// backend without this crate depending on it.
pub struct Provider<M: RoadMap> {
    map: M,
    config: ProviderConfig,
    source: String,

    world: ActorWorld,
    lengths: RouteLengthIndex,
    cache: SpatialLaneCache,
    flows: Vec<Flow>,

    /// Soft keep-out boxes, keyed by the vehicle id that reserved them.
    reserved: HashMap<ActorId, OrientedBox>,

    sim_rng: SimRng,
    next_actor_seq: u64,
}

impl<M: RoadMap> Provider<M> {
    /// Bind the road map, ingest flow specs, spawn zero-time actors, and
    /// return the initial snapshot.
    pub fn setup(scenario: Scenario<M>) -> ProviderResult<(Self, ProviderState)> {
        let Scenario { map, flow_file, config, source } = scenario;

        let mut lengths = RouteLengthIndex::new();
        let mut flows = Vec::with_capacity(flow_file.flows.len());
        for spec in &flow_file.flows {
            let vtype = flow_file
                .vtypes
                .get(&spec.vtype)
                .ok_or_else(|| ProviderError::Config(format!("flow {:?}: unknown vType {:?}", spec.id, spec.vtype)))?
                .clone();
            let route = flow_file
                .routes
                .get(&spec.route)
                .ok_or_else(|| ProviderError::Config(format!("flow {:?}: unknown route {:?}", spec.id, spec.route)))?
                .clone();
            lengths.register(&route.edges, &map)?;
            flows.push(Flow::new(spec.clone(), route, vtype));
        }

        let sim_rng = SimRng::new(config.seed);

        let mut provider = Provider {
            map,
            config,
            source,
            world: ActorWorld::new(),
            lengths,
            cache: SpatialLaneCache::new(),
            flows,
            reserved: HashMap::new(),
            sim_rng,
            next_actor_seq: 0,
        };

        provider.spawn_tick(0.0);
        let state = provider.snapshot();
        Ok((provider, state))
    }

    /// Run the pipeline of §2 for one tick and return the new snapshot. The
    /// only mutator of owned vehicle state.
    pub fn step(&mut self, dt: f64, sim_time: f64, observer: &mut impl ProviderObserver) -> ProviderState {
        observer.on_tick_start(sim_time);

        for id in self.world.shadow_ids().collect::<Vec<_>>() {
            self.reserved.remove(&id);
        }

        let spawned = self.spawn_tick(sim_time);
        for id in spawned {
            observer.on_spawn(id);
        }

        let world = &self.world;
        let map = &self.map;
        self.cache.rebuild(world, |id| {
            if let Some(actor) = world.owned(id) {
                return Some((actor.lane, actor.lane_offset));
            }
            let shadow = world.shadow(id)?;
            let lane_id = map.nearest_lane(shadow.state.position, shadow.state.length.max(5.0), true)?;
            let lane = map.lane(lane_id)?;
            Some((lane_id, lane.offset_along_lane(shadow.state.position)))
        });

        let ids: Vec<ActorId> = self.world.owned_ids().collect();
        let ctx = DecisionContext::new(dt, sim_time, &self.map, &self.lengths, &self.cache, self.config.endless_traffic);

        let decisions: Vec<(ActorId, Option<decide::Decision>)> = ids
            .iter()
            .map(|&id| {
                let actor = self.world.owned(id).expect("id came from owned_ids");
                let mut rng = ActorRng::new(self.config.seed, id);
                (id, decide::decide(actor, &ctx, &mut rng))
            })
            .collect();

        let mut to_remove = Vec::new();
        for (id, decision) in decisions {
            let Some(decision) = decision else {
                tracing::warn!(actor = %id, "next pose unresolvable against map; dropping actor");
                to_remove.push(id);
                continue;
            };

            let actor = self.world.owned_mut(id).expect("id came from owned_ids");
            actor.state.position = decision.position;
            actor.state.heading = decision.heading;
            actor.state.speed = decision.speed;
            actor.state.linear_acceleration = decision.linear_acceleration;
            actor.cutting_into = decision.cutting_into;
            actor.prev_heading_error = decision.prev_heading_error;
            actor.prev_lateral_error = decision.prev_lateral_error;
            let _ = decision.target_lane;

            let actor = self.world.owned(id).expect("just updated");
            let relocalized = relocalize(actor, actor.route_key, &self.lengths, &self.map, self.config.endless_traffic);

            if relocalized.reached_destination && self.config.endless_traffic {
                let reserved_boxes: Vec<OrientedBox> = self.reserved.values().copied().collect();
                let outcome = reroute(actor, actor.route_key, &self.lengths, &self.map, &self.world, &reserved_boxes);
                let actor = self.world.owned_mut(id).expect("just updated");
                match outcome {
                    RerouteOutcome::Loop => {
                        actor.lane = relocalized.lane;
                        actor.lane_offset = relocalized.lane_offset;
                        actor.off_route = relocalized.off_route;
                        actor.route_index = -1;
                    }
                    RerouteOutcome::Teleport(state) => {
                        actor.state = state;
                        actor.lane = actor.depart_lane;
                        actor.lane_offset = actor.depart_offset;
                        actor.route_index = 0;
                        actor.off_route = false;
                        actor.done_with_route = false;
                    }
                    RerouteOutcome::Blocked => {
                        actor.done_with_route = true;
                    }
                }
            } else {
                let actor = self.world.owned_mut(id).expect("just updated");
                actor.lane = relocalized.lane;
                actor.lane_offset = relocalized.lane_offset;
                actor.off_route = relocalized.off_route;
                actor.route_index = relocalized.route_index;
                actor.done_with_route = relocalized.done_with_route;
            }

            if self.world.owned(id).map(|a| a.done_with_route).unwrap_or(false) {
                to_remove.push(id);
            }
        }

        for id in to_remove {
            self.world.remove_owned(id);
            observer.on_remove(id);
        }

        let state = self.snapshot();
        observer.on_tick_end(sim_time, &state);
        state
    }

    /// Absorb external vehicles: drop owned vehicles missing from `state`,
    /// release ownership of any owned vehicle whose source now differs
    /// (hand-off out), and mirror everything else as read-only shadows.
    pub fn sync(&mut self, state: Vec<VehicleState>) {
        let incoming: HashMap<ActorId, &VehicleState> = state.iter().map(|s| (s.id, s)).collect();

        for id in self.world.owned_ids().collect::<Vec<_>>() {
            if !incoming.contains_key(&id) {
                self.world.remove_owned(id);
            }
        }

        self.world.clear_shadow();
        for s in &state {
            if self.world.manages(s.id) {
                if s.source != self.source {
                    self.world.remove_owned(s.id);
                    self.world.insert_shadow(s.id, s.clone(), None);
                }
            } else {
                self.world.insert_shadow(s.id, s.clone(), None);
            }
        }
    }

    /// Accept an external vehicle (hand-off in): stamp its source, optionally
    /// generate a random route from its current road, and construct a
    /// `TrafficActor` from its current pose.
    pub fn add_vehicle(&mut self, mut state: VehicleState, route: Option<Vec<RoadId>>) -> ProviderResult<()> {
        state.source = self.source.clone();
        let id = state.id;

        let lane_id = self
            .map
            .nearest_lane(state.position, state.length.max(5.0), true)
            .ok_or_else(|| ProviderError::Config(format!("vehicle {id}: no lane near current position")))?;
        let lane = self.map.lane(lane_id).expect("nearest_lane returned a live id");
        let lane_offset = lane.offset_along_lane(state.position);

        let mut rng = ActorRng::new(self.config.seed, id);
        let roads = match route {
            Some(roads) => roads,
            None => {
                let route = self
                    .map
                    .random_route_from_road(lane.road(), &mut rng)
                    .ok_or_else(|| ProviderError::Config(format!("vehicle {id}: road {:?} has no outgoing roads", lane.road())))?;
                route.roads
            }
        };
        let route_key = self.lengths.register(&roads, &self.map)?;

        let last_road = *roads.last().ok_or_else(|| ProviderError::Config(format!("vehicle {id}: empty route")))?;
        let dest_road = self.map.road(last_road).ok_or(mtsim_behavior::BehaviorError::UnknownRoad(last_road))?;
        let dest_lane_id = *dest_road.lanes().first().ok_or_else(|| ProviderError::Config(format!("vehicle {id}: destination road has no lanes")))?;
        let dest_offset = self.map.lane(dest_lane_id).map(|l| l.length()).unwrap_or(0.0);

        let actor = TrafficActor {
            lane: lane_id,
            lane_offset,
            route_key,
            route_index: 0,
            dest_lane: dest_lane_id,
            dest_offset,
            personality: self.config.default_personality,
            cutting_into: None,
            off_route: false,
            done_with_route: false,
            prev_heading_error: 0.0,
            prev_lateral_error: 0.0,
            depart_lane: lane_id,
            depart_offset: lane_offset,
            depart_heading: state.heading,
            depart_speed: state.speed,
            state,
        };

        self.world.insert_owned(actor);
        Ok(())
    }

    /// A soft keep-out that blocks spawning inside `polygon`; cleared on the
    /// next tick once `id` reappears in the shadow set.
    pub fn reserve_traffic_location_for_vehicle(&mut self, id: ActorId, polygon: OrientedBox) {
        self.reserved.insert(id, polygon);
    }

    pub fn stop_managing(&mut self, id: ActorId) -> ProviderResult<()> {
        self.world.remove_owned(id).map(|_| ()).ok_or(ProviderError::UnknownVehicle(id))
    }

    pub fn update_route_for_vehicle(&mut self, id: ActorId, roads: Vec<RoadId>) -> ProviderResult<()> {
        let route_key = self.lengths.register(&roads, &self.map)?;
        let last_road = *roads.last().ok_or_else(|| ProviderError::Config(format!("vehicle {id}: empty route")))?;
        let dest_road = self.map.road(last_road).ok_or(mtsim_behavior::BehaviorError::UnknownRoad(last_road))?;
        let dest_lane_id = *dest_road.lanes().first().ok_or_else(|| ProviderError::Config(format!("vehicle {id}: destination road has no lanes")))?;
        let dest_offset = self.map.lane(dest_lane_id).map(|l| l.length()).unwrap_or(0.0);

        let actor = self.world.owned_mut(id).ok_or(ProviderError::UnknownVehicle(id))?;
        actor.route_key = route_key;
        actor.route_index = 0;
        actor.dest_lane = dest_lane_id;
        actor.dest_offset = dest_offset;
        Ok(())
    }

    pub fn vehicle_dest_road(&self, id: ActorId) -> Option<RoadId> {
        let actor = self.world.owned(id)?;
        self.map.lane(actor.dest_lane).map(|l| l.road())
    }

    /// `true` unless this provider already owns `state.id`.
    pub fn can_accept_vehicle(&self, state: &VehicleState) -> bool {
        !self.world.manages(state.id)
    }

    pub fn manages_vehicle(&self, id: ActorId) -> bool {
        self.world.manages(id)
    }

    pub fn source_str(&self) -> &str {
        &self.source
    }

    /// Empty all state; safe to call at any tick boundary.
    pub fn teardown(&mut self) {
        self.world = ActorWorld::new();
        self.reserved.clear();
    }

    // ── Internals ─────────────────────────────────────────────────────────

    fn spawn_tick(&mut self, sim_time: f64) -> Vec<ActorId> {
        let mut spawned = Vec::new();
        let reserved_boxes: Vec<OrientedBox> = self.reserved.values().copied().collect();

        for flow in &mut self.flows {
            let existing_boxes: Vec<OrientedBox> = self.world.all_states().map(|s| s.bounding_box()).collect();
            let candidate_id = ActorId(self.next_actor_seq);
            let mut rng = ActorRng::new(self.config.seed, candidate_id);

            let Some(mut actor) = flow.try_spawn(sim_time, candidate_id, &self.map, &reserved_boxes, &existing_boxes, &mut rng) else {
                continue;
            };

            if let Ok(route_key) = self.lengths.register(&flow.route().edges, &self.map) {
                actor.route_key = route_key;
            }

            self.next_actor_seq += 1;
            let id = actor.id();
            self.world.insert_owned(actor);
            spawned.push(id);
        }

        spawned
    }

    fn snapshot(&self) -> ProviderState {
        self.world.iter_owned().map(|a| a.state.clone()).collect()
    }
}
