//! The `RoadMap`/`Lane`/`Road` collaborator contract.
//!
//! The production lane-geometry library this crate is designed to sit on top
//! of is an external collaborator — this module exists only to make that
//! collaborator's contract concrete enough for the rest of the workspace to
//! compile and test against. Implement these traits over a real map backend
//! in a host application; [`StaticRoadMap`][crate::static_map::StaticRoadMap]
//! is a minimal in-memory reference implementation for tests and small
//! scenarios, not a production lane-geometry engine.

use mtsim_core::{ActorRng, LaneId, Point2, RoadId, Vec2};

use crate::route::Route;

/// A single drivable lane.
pub trait Lane {
    fn id(&self) -> LaneId;
    fn road(&self) -> RoadId;
    /// Lateral index within the road, left-to-right (0-based).
    fn index(&self) -> i32;
    /// Centerline length, in meters.
    fn length(&self) -> f64;
    /// Speed limit, in m/s.
    fn speed_limit(&self) -> f64;
    /// Lane width at arc-length offset `s`, in meters.
    fn width_at_offset(&self, s: f64) -> f64;
    /// Signed radius of curvature at offset `s`; `f64::INFINITY` for straight
    /// segments. Sign follows the turn direction (positive = left turn).
    fn curvature_radius_at_offset(&self, s: f64) -> f64;
    /// Arc-length coordinate of the point on this lane's centerline nearest
    /// to `point` (does not require `point` to actually lie on the lane).
    fn offset_along_lane(&self, point: Point2) -> f64;
    /// Map a lane-relative `(s, t)` coordinate to a world point.
    fn from_lane_coord(&self, s: f64, t: f64) -> Point2;
    /// Map a world point to lane-relative `(s, t)` coordinates.
    fn to_lane_coord(&self, point: Point2) -> (f64, f64);
    /// Unit tangent vector at offset `s`.
    fn vector_at_offset(&self, s: f64) -> Vec2;
    /// Lanes that feed into the start of this lane (possibly on a different
    /// road, across a junction).
    fn incoming_lanes(&self) -> &[LaneId];
    /// Lanes reachable from the end of this lane.
    fn outgoing_lanes(&self) -> &[LaneId];
    /// The canonical representative of this lane across lane equivalences
    /// (e.g. merged shoulder/carpool lanes share a composite lane for
    /// neighbor-query purposes). Defaults to this lane's own id.
    fn composite_lane(&self) -> LaneId {
        self.id()
    }
}

/// A road: an ordered bundle of same-direction lanes plus junction topology.
pub trait Road {
    fn id(&self) -> RoadId;
    fn lanes(&self) -> &[LaneId];
    fn incoming_roads(&self) -> &[RoadId];
    fn outgoing_roads(&self) -> &[RoadId];
}

/// The map collaborator: lane/road lookup, nearest-lane queries, and
/// synthetic route generation for endless traffic.
pub trait RoadMap {
    fn lane(&self, id: LaneId) -> Option<&dyn Lane>;
    fn road(&self, id: RoadId) -> Option<&dyn Road>;

    /// The single nearest lane to `point` within `radius` meters.
    fn nearest_lane(&self, point: Point2, radius: f64, include_junctions: bool) -> Option<LaneId>;

    /// Up to `k` nearest lanes to `point` within `radius` meters, nearest
    /// first.
    fn nearest_lanes(
        &self,
        point: Point2,
        k: usize,
        radius: f64,
        include_junctions: bool,
    ) -> Vec<LaneId>;

    /// Build a random plausible route starting from `road`, for endless
    /// traffic or for stamping a freshly hand-off'd vehicle with a route.
    /// Returns `None` if `road` is unknown or has no outgoing roads.
    fn random_route_from_road(&self, road: RoadId, rng: &mut ActorRng) -> Option<Route>;
}
