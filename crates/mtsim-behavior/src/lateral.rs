//! Lateral control: steering toward a target lane and integrating the next
//! pose.

use mtsim_actor::VehicleState;
use mtsim_core::{angle_diff, unit_vector, Point2, Vec2};
use mtsim_map::Lane;

const STEER_HEADING_GAIN: f64 = 3.75;
const STEER_LATERAL_GAIN: f64 = 1.25;
const STEER_DAMPING_GAIN: f64 = 2.2;
const STEER_RATE_GAIN: f64 = 0.2;

/// The next pose after one control step, per §4.7.
pub struct NextPose {
    pub heading: f64,
    pub position: Point2,
    pub speed: f64,
    pub linear_acceleration: Vec2,
}

/// Compute the next pose for `state`, steering toward `target_lane` at
/// acceleration `acc`, over `dt` seconds.
///
/// `prev_heading_error`/`prev_lateral_error` are the previous tick's errors,
/// used for the finite-difference damping terms; pass `0.0` on an actor's
/// first tick.
pub fn step(
    state: &VehicleState,
    target_lane: &dyn Lane,
    acc: f64,
    dt: f64,
    max_angular_velocity: f64,
    prev_heading_error: f64,
    prev_lateral_error: f64,
) -> NextPose {
    let lookahead_dist = (dt * state.speed).max(2.0);
    let lookahead = state.position + unit_vector(state.heading).scale(lookahead_dist);

    let (s, t) = target_lane.to_lane_coord(lookahead);
    let target_heading = target_lane.vector_at_offset(s).heading();
    let heading_error = angle_diff(target_heading, state.heading);
    let lateral_error = t;

    let mut omega = STEER_HEADING_GAIN * heading_error - STEER_LATERAL_GAIN * lateral_error;
    if heading_error * lateral_error < 0.0 {
        omega += STEER_DAMPING_GAIN * omega.signum() * (heading_error * lateral_error);
    }
    let dheading = heading_error - prev_heading_error;
    let dlateral = lateral_error - prev_lateral_error;
    omega -= STEER_RATE_GAIN * dheading;
    omega += STEER_RATE_GAIN * dlateral;
    omega = omega.clamp(-max_angular_velocity, max_angular_velocity);

    let next_heading = mtsim_core::normalize_angle(state.heading + omega * dt);
    let next_position = state.position + unit_vector(next_heading).scale(dt * state.speed);
    let next_speed = (state.speed + acc * dt).max(0.0);
    // Preserved bit-for-bit: dimensionally a velocity delta, not an
    // acceleration, but downstream consumers may depend on the existing
    // shape of this field.
    let next_linear_acceleration = unit_vector(next_heading).scale(dt * acc);

    NextPose {
        heading: next_heading,
        position: next_position,
        speed: next_speed,
        linear_acceleration: next_linear_acceleration,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mtsim_core::{ActorId, Role};

    struct StraightLane;
    impl Lane for StraightLane {
        fn id(&self) -> mtsim_core::LaneId {
            mtsim_core::LaneId(0)
        }
        fn road(&self) -> mtsim_core::RoadId {
            mtsim_core::RoadId(0)
        }
        fn index(&self) -> i32 {
            0
        }
        fn length(&self) -> f64 {
            1000.0
        }
        fn speed_limit(&self) -> f64 {
            20.0
        }
        fn width_at_offset(&self, _s: f64) -> f64 {
            3.5
        }
        fn curvature_radius_at_offset(&self, _s: f64) -> f64 {
            f64::INFINITY
        }
        fn offset_along_lane(&self, point: Point2) -> f64 {
            point.x
        }
        fn from_lane_coord(&self, s: f64, t: f64) -> Point2 {
            Point2::new(s, t)
        }
        fn to_lane_coord(&self, point: Point2) -> (f64, f64) {
            (point.x, point.y)
        }
        fn vector_at_offset(&self, _s: f64) -> Vec2 {
            Vec2::new(1.0, 0.0)
        }
        fn incoming_lanes(&self) -> &[mtsim_core::LaneId] {
            &[]
        }
        fn outgoing_lanes(&self) -> &[mtsim_core::LaneId] {
            &[]
        }
    }

    #[test]
    fn straight_lane_no_steering_keeps_heading() {
        let state = VehicleState::new(ActorId(1), Point2::new(0.0, 0.0), 0.0, 10.0, 4.5, 2.0, 1.5, Role::Social, "core");
        let next = step(&state, &StraightLane, 0.0, 0.1, 26.0, 0.0, 0.0);
        assert!((next.heading - 0.0).abs() < 1e-6);
        assert!(next.position.x > 0.0);
    }

    #[test]
    fn speed_never_goes_negative() {
        let state = VehicleState::new(ActorId(1), Point2::new(0.0, 0.0), 0.0, 0.5, 4.5, 2.0, 1.5, Role::Social, "core");
        let next = step(&state, &StraightLane, -10.0, 0.1, 26.0, 0.0, 0.0);
        assert!(next.speed >= 0.0);
    }
}
