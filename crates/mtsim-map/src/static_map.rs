//! `StaticRoadMap` — a minimal in-memory `RoadMap` implementation.
//!
//! Lanes are modeled as straight centerline segments with a constant
//! curvature radius (`f64::INFINITY` for a straight lane, a finite signed
//! radius for a curve). This is enough geometry to drive every formula in
//! `mtsim-behavior` and to exercise the testable properties end to end; it
//! is not a substitute for a real lane-geometry engine.

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use mtsim_core::{unit_vector, ActorRng, LaneId, Point2, RoadId, Vec2};

use crate::map::{Lane, Road, RoadMap};
use crate::route::Route;

#[derive(Clone)]
struct LaneEntry {
    mid: [f64; 2],
    id: LaneId,
}

impl RTreeObject for LaneEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.mid)
    }
}

impl PointDistance for LaneEntry {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.mid[0] - point[0];
        let dy = self.mid[1] - point[1];
        dx * dx + dy * dy
    }
}

/// A straight-centerline lane record.
pub struct LaneRecord {
    pub id: LaneId,
    pub road: RoadId,
    pub index: i32,
    pub start: Point2,
    pub heading: f64,
    pub length: f64,
    pub width: f64,
    pub speed_limit: f64,
    /// Signed radius of curvature; `f64::INFINITY` for a straight lane.
    pub curvature_radius: f64,
    pub incoming: Vec<LaneId>,
    pub outgoing: Vec<LaneId>,
    pub composite: Option<LaneId>,
}

impl Lane for LaneRecord {
    fn id(&self) -> LaneId {
        self.id
    }
    fn road(&self) -> RoadId {
        self.road
    }
    fn index(&self) -> i32 {
        self.index
    }
    fn length(&self) -> f64 {
        self.length
    }
    fn speed_limit(&self) -> f64 {
        self.speed_limit
    }
    fn width_at_offset(&self, _s: f64) -> f64 {
        self.width
    }
    fn curvature_radius_at_offset(&self, _s: f64) -> f64 {
        self.curvature_radius
    }
    fn offset_along_lane(&self, point: Point2) -> f64 {
        self.to_lane_coord(point).0
    }
    fn from_lane_coord(&self, s: f64, t: f64) -> Point2 {
        let fwd = unit_vector(self.heading);
        let left = Vec2::new(-fwd.y, fwd.x);
        self.start + fwd.scale(s) + left.scale(t)
    }
    fn to_lane_coord(&self, point: Point2) -> (f64, f64) {
        let d = point - self.start;
        let fwd = unit_vector(self.heading);
        let left = Vec2::new(-fwd.y, fwd.x);
        let s = d.x * fwd.x + d.y * fwd.y;
        let t = d.x * left.x + d.y * left.y;
        (s, t)
    }
    fn vector_at_offset(&self, _s: f64) -> Vec2 {
        unit_vector(self.heading)
    }
    fn incoming_lanes(&self) -> &[LaneId] {
        &self.incoming
    }
    fn outgoing_lanes(&self) -> &[LaneId] {
        &self.outgoing
    }
    fn composite_lane(&self) -> LaneId {
        self.composite.unwrap_or(self.id)
    }
}

pub struct RoadRecord {
    pub id: RoadId,
    pub lanes: Vec<LaneId>,
    pub incoming_roads: Vec<RoadId>,
    pub outgoing_roads: Vec<RoadId>,
}

impl Road for RoadRecord {
    fn id(&self) -> RoadId {
        self.id
    }
    fn lanes(&self) -> &[LaneId] {
        &self.lanes
    }
    fn incoming_roads(&self) -> &[RoadId] {
        &self.incoming_roads
    }
    fn outgoing_roads(&self) -> &[RoadId] {
        &self.outgoing_roads
    }
}

/// A minimal in-memory `RoadMap`. See module docs.
pub struct StaticRoadMap {
    lanes: Vec<LaneRecord>,
    roads: Vec<RoadRecord>,
    spatial_idx: RTree<LaneEntry>,
}

impl StaticRoadMap {
    pub fn empty() -> Self {
        StaticRoadMapBuilder::new().build()
    }

    pub fn lane_count(&self) -> usize {
        self.lanes.len()
    }

    pub fn road_count(&self) -> usize {
        self.roads.len()
    }
}

impl RoadMap for StaticRoadMap {
    fn lane(&self, id: LaneId) -> Option<&dyn Lane> {
        self.lanes.get(id.index()).map(|l| l as &dyn Lane)
    }

    fn road(&self, id: RoadId) -> Option<&dyn Road> {
        self.roads.get(id.index()).map(|r| r as &dyn Road)
    }

    fn nearest_lane(&self, point: Point2, radius: f64, _include_junctions: bool) -> Option<LaneId> {
        self.nearest_lanes(point, 1, radius, _include_junctions)
            .into_iter()
            .next()
    }

    fn nearest_lanes(
        &self,
        point: Point2,
        k: usize,
        radius: f64,
        _include_junctions: bool,
    ) -> Vec<LaneId> {
        let r2 = radius * radius;
        self.spatial_idx
            .nearest_neighbor_iter(&[point.x, point.y])
            .take_while(|e| {
                let dx = e.mid[0] - point.x;
                let dy = e.mid[1] - point.y;
                dx * dx + dy * dy <= r2
            })
            .take(k)
            .map(|e| e.id)
            .collect()
    }

    fn random_route_from_road(&self, road: RoadId, rng: &mut ActorRng) -> Option<Route> {
        let mut roads = vec![road];
        let mut current = self.road(road)?;
        const MAX_HOPS: usize = 16;
        for _ in 0..MAX_HOPS {
            if current.outgoing_roads().is_empty() {
                break;
            }
            let next = *rng.choose(current.outgoing_roads())?;
            roads.push(next);
            current = self.road(next)?;
        }
        Some(Route::new(roads))
    }
}

struct RawLane {
    road: RoadId,
    index: i32,
    start: Point2,
    heading: f64,
    length: f64,
    width: f64,
    speed_limit: f64,
    curvature_radius: f64,
}

/// Incrementally builds a [`StaticRoadMap`].
pub struct StaticRoadMapBuilder {
    roads: Vec<(Vec<RoadId>, Vec<RoadId>)>, // (incoming, outgoing) per RoadId
    road_lanes: Vec<Vec<LaneId>>,
    raw_lanes: Vec<RawLane>,
    lane_links: Vec<(Vec<LaneId>, Vec<LaneId>)>, // (incoming, outgoing) per LaneId
}

impl StaticRoadMapBuilder {
    pub fn new() -> Self {
        Self {
            roads: Vec::new(),
            road_lanes: Vec::new(),
            raw_lanes: Vec::new(),
            lane_links: Vec::new(),
        }
    }

    /// Register a road; returns its `RoadId` (sequential from 0).
    pub fn add_road(&mut self) -> RoadId {
        let id = RoadId(self.roads.len() as u32);
        self.roads.push((Vec::new(), Vec::new()));
        self.road_lanes.push(Vec::new());
        id
    }

    /// Add a straight lane to `road`. `index` is the lateral position
    /// (0 = rightmost). Returns the new lane's `LaneId`.
    #[allow(clippy::too_many_arguments)]
    pub fn add_lane(
        &mut self,
        road: RoadId,
        index: i32,
        start: Point2,
        heading: f64,
        length: f64,
        width: f64,
        speed_limit: f64,
        curvature_radius: f64,
    ) -> LaneId {
        let id = LaneId(self.raw_lanes.len() as u32);
        self.raw_lanes.push(RawLane {
            road,
            index,
            start,
            heading,
            length,
            width,
            speed_limit,
            curvature_radius,
        });
        self.lane_links.push((Vec::new(), Vec::new()));
        self.road_lanes[road.index()].push(id);
        id
    }

    /// Record that `to` is reachable from the end of `from` (across a
    /// junction or same-road succession).
    pub fn connect_lanes(&mut self, from: LaneId, to: LaneId) {
        self.lane_links[from.index()].1.push(to);
        self.lane_links[to.index()].0.push(from);
    }

    /// Record that `to` is an outgoing road of `from`.
    pub fn connect_roads(&mut self, from: RoadId, to: RoadId) {
        self.roads[from.index()].1.push(to);
        self.roads[to.index()].0.push(from);
    }

    pub fn build(self) -> StaticRoadMap {
        let lanes: Vec<LaneRecord> = self
            .raw_lanes
            .into_iter()
            .enumerate()
            .map(|(i, raw)| LaneRecord {
                id: LaneId(i as u32),
                road: raw.road,
                index: raw.index,
                start: raw.start,
                heading: raw.heading,
                length: raw.length,
                width: raw.width,
                speed_limit: raw.speed_limit,
                curvature_radius: raw.curvature_radius,
                incoming: self.lane_links[i].0.clone(),
                outgoing: self.lane_links[i].1.clone(),
                composite: None,
            })
            .collect();

        let roads: Vec<RoadRecord> = self
            .roads
            .into_iter()
            .enumerate()
            .map(|(i, (incoming, outgoing))| RoadRecord {
                id: RoadId(i as u32),
                lanes: self.road_lanes[i].clone(),
                incoming_roads: incoming,
                outgoing_roads: outgoing,
            })
            .collect();

        let entries: Vec<LaneEntry> = lanes
            .iter()
            .map(|l| {
                let mid = l.from_lane_coord(l.length * 0.5, 0.0);
                LaneEntry { mid: [mid.x, mid.y], id: l.id }
            })
            .collect();
        let spatial_idx = RTree::bulk_load(entries);

        StaticRoadMap { lanes, roads, spatial_idx }
    }
}

impl Default for StaticRoadMapBuilder {
    fn default() -> Self {
        Self::new()
    }
}
