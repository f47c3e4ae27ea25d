//! Typed flow-file fields.
//!
//! The XML loader parses strings into these tagged variants at load time so
//! nothing downstream has to re-interpret "max"/"random"/a literal number at
//! spawn time.

use mtsim_core::RoadId;

/// A depart or arrival position along a lane.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum OffsetSpec {
    Max,
    Random,
    Literal(f64),
}

/// A depart speed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SpeedSpec {
    Max,
    SpeedLimit,
    Random,
    Literal(f64),
}

/// A `<vType>` template: the personality parameters assigned to every actor
/// spawned with this type.
#[derive(Clone, Debug, PartialEq)]
pub struct VTypeSpec {
    pub id: String,
    pub max_speed: f64,
    pub accel: f64,
    pub decel: f64,
    pub emergency_decel: f64,
    pub min_gap: f64,
    pub tau: f64,
    pub speed_factor: f64,
    pub speed_dev: f64,
    pub sigma: f64,
    pub lc_assertive: f64,
    pub lc_cutin_prob: f64,
    pub lc_dogmatic: bool,
}

impl Default for VTypeSpec {
    fn default() -> Self {
        Self {
            id: String::new(),
            max_speed: 55.55,
            accel: 2.6,
            decel: 4.5,
            emergency_decel: 4.5,
            min_gap: 2.5,
            tau: 1.0,
            speed_factor: 1.0,
            speed_dev: 0.1,
            sigma: 0.0,
            lc_assertive: 1.0,
            lc_cutin_prob: 0.0,
            lc_dogmatic: false,
        }
    }
}

/// A `<route>`: a named sequence of road ids.
#[derive(Clone, Debug, PartialEq)]
pub struct RouteSpec {
    pub id: String,
    pub edges: Vec<RoadId>,
}

/// A `<flow>`: a declarative spawn source.
#[derive(Clone, Debug, PartialEq)]
pub struct FlowSpec {
    pub id: String,
    pub vtype: String,
    pub route: String,
    pub begin: f64,
    pub end: f64,
    pub vehs_per_hour: f64,
    pub depart_lane: i32,
    pub depart_pos: OffsetSpec,
    pub depart_speed: SpeedSpec,
    pub arrival_lane: i32,
    pub arrival_pos: OffsetSpec,
}

impl FlowSpec {
    /// Inter-arrival period in seconds: `3600 / vehsPerHour`.
    pub fn period_secs(&self) -> f64 {
        3600.0 / self.vehs_per_hour
    }
}
