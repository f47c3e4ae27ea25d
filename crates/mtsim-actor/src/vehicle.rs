//! `VehicleState` — the provider-protocol wire type.
//!
//! This is the only type that crosses the provider boundary (see
//! `mtsim-provider::ProviderState`): both owned actors and externally
//! observed shadows are represented as a `VehicleState` plus whatever extra
//! bookkeeping the holder needs.

use mtsim_core::{ActorId, Point2, Role, Vec2};

/// One vehicle's instantaneous physical state.
///
/// Invariants: `speed >= 0`; `heading` normalized to `[0, 2*PI)`; `length`,
/// `width`, `height` strictly positive; `source` names exactly one provider.
#[derive(Clone, Debug, PartialEq)]
pub struct VehicleState {
    pub id: ActorId,
    pub position: Point2,
    pub heading: f64,
    pub speed: f64,
    /// Preserved bit-for-bit from the longitudinal/lateral control step even
    /// though `Δt · a · unit(heading)` is dimensionally a velocity delta, not
    /// an acceleration — downstream consumers may depend on the existing
    /// value, so the quirk is kept rather than "corrected".
    pub linear_acceleration: Vec2,
    pub length: f64,
    pub width: f64,
    pub height: f64,
    pub role: Role,
    /// Identifier of the provider currently responsible for this vehicle.
    pub source: String,
}

impl VehicleState {
    pub fn new(
        id: ActorId,
        position: Point2,
        heading: f64,
        speed: f64,
        length: f64,
        width: f64,
        height: f64,
        role: Role,
        source: impl Into<String>,
    ) -> Self {
        Self {
            id,
            position,
            heading: mtsim_core::normalize_angle(heading),
            speed: speed.max(0.0),
            linear_acceleration: Vec2::zero(),
            length,
            width,
            height,
            role,
            source: source.into(),
        }
    }

    pub fn bounding_box(&self) -> mtsim_core::OrientedBox {
        mtsim_core::OrientedBox::new(self.position, self.heading, self.length, self.width)
    }
}
