//! Error taxonomy for the decision layer.

use thiserror::Error;

use mtsim_core::RoadId;

#[derive(Debug, Error)]
pub enum BehaviorError {
    /// A route referenced a road the map doesn't know about. Rejected whole,
    /// per the route-length contract: a route either resolves entirely or
    /// not at all.
    #[error("road {0} is not known to the road map")]
    UnknownRoad(RoadId),

    /// Two consecutive roads in a route share no legal lane-to-lane
    /// transition.
    #[error("roads {0} and {1} are not connected in the road map")]
    Disconnected(RoadId, RoadId),
}

pub type BehaviorResult<T> = Result<T, BehaviorError>;
