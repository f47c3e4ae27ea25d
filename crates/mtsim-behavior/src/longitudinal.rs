//! Longitudinal control: target-speed selection and acceleration output.

use mtsim_actor::TrafficActor;
use mtsim_map::Lane;

use crate::lane_window::LaneWindow;

/// Empirical curvature speed-limit factor: a vehicle turning at radius `r`
/// should not exceed `|r| * CURVATURE_SPEED_FACTOR`, i.e. roughly 6 m/s
/// through a 10.5 m radius 90-degree turn.
const CURVATURE_SPEED_FACTOR: f64 = 0.5714;

/// PID-ish gains for the non-emergency acceleration term.
const GAIN_P: f64 = 0.006;
const GAIN_I: f64 = -0.01;
const GAIN_D: f64 = -0.001;

/// Solve `dist = v*t + 0.5*a*t^2` for the smallest positive real root.
/// Returns `+inf` when no positive root exists (e.g. decelerating to a stop
/// before covering `dist`).
pub fn time_to_cover(dist: f64, v: f64, a: f64) -> f64 {
    if dist <= 0.0 {
        return 0.0;
    }
    if a.abs() < 1e-9 {
        return if v > 1e-9 { dist / v } else { f64::INFINITY };
    }
    let discriminant = v * v + 2.0 * a * dist;
    if discriminant < 0.0 {
        return f64::INFINITY;
    }
    let sqrt_d = discriminant.sqrt();
    let t1 = (-v + sqrt_d) / a;
    let t2 = (-v - sqrt_d) / a;
    [t1, t2]
        .into_iter()
        .filter(|t| *t > 0.0)
        .fold(f64::INFINITY, f64::min)
}

/// Target speed for `lane`: the speed limit scaled by the actor's personal
/// speed factor, clamped to `maxSpeed` and to a curvature-derived limit.
pub fn target_speed(actor: &TrafficActor, lane: &dyn Lane, s: f64) -> f64 {
    let mut target = lane.speed_limit() * actor.personality.speed_factor;
    target = target.min(actor.personality.max_speed);

    let radius = lane.curvature_radius_at_offset(s);
    if radius.is_finite() {
        target = target.min(radius.abs() * CURVATURE_SPEED_FACTOR);
    }
    target.max(0.0)
}

/// Longitudinal acceleration for this tick, per §4.6: emergency braking when
/// the time or space cushion to the leader runs thin, a PID-style term
/// otherwise.
pub fn longitudinal_accel(
    actor: &TrafficActor,
    target_lane_window: &LaneWindow,
    current_lane_window: &LaneWindow,
    target: f64,
    lane_speed: f64,
    lane_acc: f64,
    dt: f64,
) -> f64 {
    let cushion = target_lane_window
        .time_left
        .min(current_lane_window.time_left)
        .min(target_lane_window.gap_ahead / actor.state.speed.max(0.1))
        .min(current_lane_window.gap_ahead / actor.state.speed.max(0.1));

    let tau = actor.personality.tau;
    if cushion < tau && actor.state.speed > 0.0 {
        let ratio = (4.0 * (tau - cushion) / tau).clamp(0.0, 1.0);
        return -actor.personality.emergency_decel * ratio;
    }

    let space_cushion = target_lane_window.gap_ahead.min(current_lane_window.gap_ahead);
    let min_space_cushion = actor.personality.min_space_cushion;
    if space_cushion < min_space_cushion {
        let ratio = (4.0 * (min_space_cushion - space_cushion) / min_space_cushion).clamp(0.0, 1.0);
        return -actor.personality.emergency_decel * ratio;
    }

    let p = GAIN_P * (target - lane_speed);
    let i = GAIN_I / space_cushion.max(1e-3);
    let d = GAIN_D * lane_acc;
    let dt = dt.max(1e-6);
    let raw = ((p + i + d) / dt).clamp(-1.0, 1.0);

    if raw >= 0.0 {
        raw * actor.personality.accel
    } else {
        raw * actor.personality.decel
    }
}
