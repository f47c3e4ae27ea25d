//! `Route` — an ordered sequence of road ids.
//!
//! A route's stable numeric key (used to index `RouteLengthIndex`) is
//! assigned by the behavior layer the first time a given road sequence is
//! registered, not by this crate — `mtsim-map` only knows about map
//! geometry, not about route-length caching.

use mtsim_core::RoadId;

/// An ordered sequence of road ids forming a route.
///
/// Invariant (checked at registration, not here): every road id resolves in
/// the road map, and consecutive roads share at least one legal lane-to-lane
/// transition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Route {
    pub roads: Vec<RoadId>,
}

impl Route {
    pub fn new(roads: Vec<RoadId>) -> Self {
        Self { roads }
    }

    pub fn first_road(&self) -> Option<RoadId> {
        self.roads.first().copied()
    }

    pub fn last_road(&self) -> Option<RoadId> {
        self.roads.last().copied()
    }

    pub fn len(&self) -> usize {
        self.roads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roads.is_empty()
    }
}
