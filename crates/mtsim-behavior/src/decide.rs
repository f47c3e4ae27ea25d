//! The per-actor decision step: lane selection, longitudinal control, and
//! lateral control combined into a single next-state computation.
//!
//! This is the phase-1 half of the two-pass tick (§5): everything here reads
//! `actor` and the shared [`DecisionContext`] but mutates neither — the
//! provider commits the returned [`Decision`] in phase 2.

use mtsim_actor::{CutinState, TrafficActor};
use mtsim_core::{ActorRng, LaneId, Point2, Vec2};

use crate::context::DecisionContext;
use crate::lane_window::LaneWindow;
use crate::longitudinal::{longitudinal_accel, target_speed};
use crate::{lateral, selection};

/// The actor's computed next state, ready to be committed in phase 2.
pub struct Decision {
    pub position: Point2,
    pub heading: f64,
    pub speed: f64,
    pub linear_acceleration: Vec2,
    pub target_lane: LaneId,
    pub cutting_into: Option<CutinState>,
    pub prev_heading_error: f64,
    pub prev_lateral_error: f64,
}

/// Compute `actor`'s next state for this tick. Returns `None` if the actor's
/// current lane can't be resolved against the map (treated by the caller as
/// a map-inconsistency fault; see the error taxonomy).
pub fn decide(actor: &TrafficActor, ctx: &DecisionContext<'_>, rng: &mut ActorRng) -> Option<Decision> {
    let current_lane_geom = ctx.map.lane(actor.lane)?;
    let road = ctx.map.road(current_lane_geom.road())?;

    let current_window = LaneWindow::build(
        actor,
        actor.lane,
        actor.route_key,
        actor.route_index,
        ctx.map,
        ctx.lengths,
        ctx.cache,
    )?;

    let selection = selection::select_lane(
        actor,
        actor.route_key,
        actor.route_index,
        road.lanes(),
        ctx.map,
        ctx.lengths,
        ctx.cache,
        rng,
        ctx.sim_time,
    )?;

    let target_lane_geom = ctx.map.lane(selection.window.lane)?;
    let target = target_speed(actor, target_lane_geom, selection.window.s);
    let lane_acc = (target - actor.state.speed) / ctx.dt.max(1e-6);

    let acc = longitudinal_accel(actor, &selection.window, &current_window, target, actor.state.speed, lane_acc, ctx.dt);

    let pose = lateral::step(
        &actor.state,
        target_lane_geom,
        acc,
        ctx.dt,
        actor.personality.max_angular_velocity,
        actor.prev_heading_error,
        actor.prev_lateral_error,
    );

    let heading_error = mtsim_core::angle_diff(target_lane_geom.vector_at_offset(selection.window.s).heading(), actor.state.heading);

    Some(Decision {
        position: pose.position,
        heading: pose.heading,
        speed: pose.speed,
        linear_acceleration: pose.linear_acceleration,
        target_lane: selection.window.lane,
        cutting_into: selection.cutting_into,
        prev_heading_error: heading_error,
        prev_lateral_error: selection.window.t,
    })
}
