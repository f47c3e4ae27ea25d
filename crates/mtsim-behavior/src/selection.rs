//! Lane selection: the per-tick decision among candidate `LaneWindow`s.

use mtsim_actor::{CutinState, TrafficActor};
use mtsim_core::{ActorRng, LaneId, RouteKey};
use mtsim_map::RoadMap;

use crate::lane_window::{crossing_is_feasible, LaneWindow};
use crate::route_length::RouteLengthIndex;
use crate::spatial_cache::SpatialLaneCache;

/// Outcome of one lane-selection pass: the chosen window, and an updated
/// cut-in commitment (or `None` if none is active / it was just released).
pub struct Selection {
    pub window: LaneWindow,
    pub cutting_into: Option<CutinState>,
}

/// Choose the target lane for this tick, per §4.5.
///
/// `sim_time` is used to track how long the actor has held a cut-in lane
/// before releasing it.
pub fn select_lane(
    actor: &TrafficActor,
    route_key: RouteKey,
    route_index: i64,
    road_lane_ids: &[LaneId],
    map: &dyn RoadMap,
    lengths: &RouteLengthIndex,
    cache: &SpatialLaneCache,
    rng: &mut ActorRng,
    sim_time: f64,
) -> Option<Selection> {
    let windows: Vec<LaneWindow> = road_lane_ids
        .iter()
        .filter_map(|&lane| LaneWindow::build(actor, lane, route_key, route_index, map, lengths, cache))
        .collect();

    let current_window = windows.iter().find(|w| w.lane == actor.lane)?;
    let mut best = current_window.clone();
    let mut cutting_into = actor.cutting_into;

    // Honor an in-progress cut-in first: hold it if still feasible, release
    // it once the hold window has elapsed past actual entry.
    if let Some(cutin) = actor.cutting_into {
        if let Some(target) = windows.iter().find(|w| w.lane == cutin.target_lane) {
            if crossing_is_feasible(target) {
                let held_long_enough = cutin
                    .entered_at
                    .map(|entered| sim_time - entered >= actor.personality.cutin_hold_secs)
                    .unwrap_or(false);
                let actually_entered = actor.lane == cutin.target_lane;
                if actually_entered && held_long_enough {
                    cutting_into = None;
                } else {
                    return Some(Selection { window: target.clone(), cutting_into });
                }
            } else {
                cutting_into = None;
            }
        } else {
            cutting_into = None;
        }
    }

    for window in &windows {
        if window.lane == actor.lane {
            continue;
        }
        if !crossing_is_feasible(window) {
            continue;
        }

        if window.lane == actor.dest_lane && window.s + window.gap_ahead >= actor.dest_offset {
            if actor.personality.dogmatic {
                best = window.clone();
                continue;
            }
        }

        if let Some(agent_gap) = window.agent_gap {
            let lower = actor.personality.cutin_target_gap / actor.personality.aggressiveness;
            let upper = actor.personality.cutin_target_gap + 2.0;
            if agent_gap > lower && agent_gap < upper && rng.gen_bool(actor.personality.cutin_prob) {
                best = window.clone();
                cutting_into = Some(CutinState { target_lane: window.lane, entered_at: None });
                continue;
            }
        }

        if window.adj_time_left > best.adj_time_left {
            best = window.clone();
        } else if (window.adj_time_left - best.adj_time_left).abs() < 1e-9 {
            let before_dest = actor.route_index >= 0 && best.s < actor.dest_offset;
            if window.lane == actor.dest_lane && before_dest {
                best = window.clone();
            } else if window.ttre > best.ttre {
                best = window.clone();
            }
        }
    }

    if let Some(cutin) = cutting_into {
        if cutin.entered_at.is_none() && actor.lane == cutin.target_lane {
            cutting_into = Some(CutinState { target_lane: cutin.target_lane, entered_at: Some(sim_time) });
        }
    }

    Some(Selection { window: best, cutting_into })
}
