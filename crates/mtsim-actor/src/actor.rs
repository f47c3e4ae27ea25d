//! `TrafficActor` — per-vehicle state owned by the provider.

use mtsim_core::{ActorId, LaneId, RouteKey};

use crate::vehicle::VehicleState;

/// Personality parameters, set at spawn time from the actor's `vType` and
/// held constant for the actor's lifetime.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Personality {
    pub min_space_cushion: f64,
    /// Scales the lane speed limit to get this actor's nominal target speed.
    pub speed_factor: f64,
    /// Divides the cut-in gap threshold; higher = more willing to cut in
    /// into tighter gaps.
    pub aggressiveness: f64,
    pub cutin_prob: f64,
    pub cutin_target_gap: f64,
    pub cutin_hold_secs: f64,
    /// When `true`, a destination lane that's already reachable is always
    /// preferred over any other candidate, even a higher-scoring one.
    pub dogmatic: bool,
    pub max_angular_velocity: f64,
    pub max_speed: f64,
    pub accel: f64,
    pub decel: f64,
    pub emergency_decel: f64,
    pub tau: f64,
}

impl Default for Personality {
    fn default() -> Self {
        // vType defaults, per the traffic flow file format.
        let min_space_cushion = 0.5;
        Self {
            min_space_cushion,
            speed_factor: 1.0,
            aggressiveness: 1.0,
            cutin_prob: 0.0,
            cutin_target_gap: 2.5 * min_space_cushion,
            cutin_hold_secs: 3.0,
            dogmatic: false,
            max_angular_velocity: 26.0,
            max_speed: 55.55,
            accel: 2.6,
            decel: 4.5,
            emergency_decel: 4.5,
            tau: 1.0,
        }
    }
}

/// Tracks a cut-in commitment in progress: the target lane and, once the
/// actor has actually entered it, the sim-time it did so (used to compute
/// the `cutin_hold_secs` hold window before release).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CutinState {
    pub target_lane: LaneId,
    pub entered_at: Option<f64>,
}

/// Per-vehicle decision state: pose, route progress, lane evaluation carry
/// state, and personality. Owned exactly by the provider that controls the
/// vehicle; see `mtsim-actor::world::ActorWorld`.
#[derive(Clone, Debug)]
pub struct TrafficActor {
    pub state: VehicleState,

    pub lane: LaneId,
    pub lane_offset: f64,

    pub route_key: RouteKey,
    /// Position within the route's road sequence. Signed so that a loop
    /// reset (`-1`) can be represented before the next step re-enters the
    /// route's first road.
    pub route_index: i64,

    pub dest_lane: LaneId,
    pub dest_offset: f64,

    pub personality: Personality,

    pub cutting_into: Option<CutinState>,

    pub off_route: bool,
    pub done_with_route: bool,

    /// Previous tick's lateral-control errors, carried across ticks for the
    /// finite-difference damping terms in the steering law.
    pub prev_heading_error: f64,
    pub prev_lateral_error: f64,

    /// The lane/offset/heading/speed this actor was originally spawned with,
    /// used by the teleport endless-traffic strategy.
    pub depart_lane: LaneId,
    pub depart_offset: f64,
    pub depart_heading: f64,
    pub depart_speed: f64,
}

impl TrafficActor {
    pub fn id(&self) -> ActorId {
        self.state.id
    }
}
