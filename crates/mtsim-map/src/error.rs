//! Map-subsystem error type.

use thiserror::Error;

use mtsim_core::{LaneId, RoadId};

/// Errors produced by `mtsim-map`.
#[derive(Debug, Error)]
pub enum MapError {
    #[error("lane {0} not found")]
    LaneNotFound(LaneId),

    #[error("road {0} not found")]
    RoadNotFound(RoadId),

    #[error("road {0} has no lanes")]
    RoadHasNoLanes(RoadId),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type MapResult<T> = Result<T, MapError>;
