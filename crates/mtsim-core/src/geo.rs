//! Planar coordinate types and small vector/angle utilities.
//!
//! Unlike a city-scale digital twin, a local traffic simulator works in a
//! planar, map-local coordinate frame (meters, not lat/lon) — there is no
//! need for haversine distance here. `Point2`/`Vec2` stay `f64` throughout:
//! the longitudinal/lateral control loop in `mtsim-behavior` accumulates
//! small errors tick over tick and `f32` drift is visible within a few
//! hundred ticks at highway speeds.

use std::f64::consts::TAU;

/// A point in the map-local planar frame, in meters.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn distance(self, other: Point2) -> f64 {
        (self - other).length()
    }
}

impl std::ops::Sub for Point2 {
    type Output = Vec2;
    #[inline]
    fn sub(self, rhs: Point2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl std::ops::Add<Vec2> for Point2 {
    type Output = Point2;
    #[inline]
    fn add(self, rhs: Vec2) -> Point2 {
        Point2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::fmt::Display for Point2 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.3}, {:.3})", self.x, self.y)
    }
}

/// A planar displacement or direction vector, in meters.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    #[inline]
    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }

    #[inline]
    pub fn scale(self, k: f64) -> Vec2 {
        Vec2::new(self.x * k, self.y * k)
    }

    /// The heading of this vector, in radians, normalized to `[0, TAU)`.
    #[inline]
    pub fn heading(self) -> f64 {
        normalize_angle(self.y.atan2(self.x))
    }
}

impl std::ops::Add for Vec2 {
    type Output = Vec2;
    #[inline]
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

/// A unit vector pointing in `heading` radians (0 = +x axis, increasing
/// counter-clockwise).
#[inline]
pub fn unit_vector(heading: f64) -> Vec2 {
    Vec2::new(heading.cos(), heading.sin())
}

/// Normalize an angle into `[0, TAU)`.
#[inline]
pub fn normalize_angle(theta: f64) -> f64 {
    let wrapped = theta % TAU;
    if wrapped < 0.0 {
        wrapped + TAU
    } else {
        wrapped
    }
}

/// Signed smallest-magnitude difference `a - b`, wrapped into `(-PI, PI]`.
///
/// Used throughout the lateral control loop to compute heading error without
/// discontinuities at the 0/TAU wraparound.
#[inline]
pub fn angle_diff(a: f64, b: f64) -> f64 {
    let raw = normalize_angle(a - b);
    if raw > std::f64::consts::PI {
        raw - TAU
    } else {
        raw
    }
}

/// An oriented bounding box, used for spawn/teleport overlap checks.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct OrientedBox {
    pub center: Point2,
    pub heading: f64,
    pub length: f64,
    pub width: f64,
}

impl OrientedBox {
    pub fn new(center: Point2, heading: f64, length: f64, width: f64) -> Self {
        Self { center, heading, length, width }
    }

    /// The four corners, in the box's local frame rotated by `heading`.
    fn corners(&self) -> [Point2; 4] {
        let hl = self.length * 0.5;
        let hw = self.width * 0.5;
        let (s, c) = self.heading.sin_cos();
        let local = [(hl, hw), (hl, -hw), (-hl, -hw), (-hl, hw)];
        local.map(|(lx, ly)| {
            Point2::new(
                self.center.x + lx * c - ly * s,
                self.center.y + lx * s + ly * c,
            )
        })
    }

    /// Separating-axis-theorem overlap test between two oriented boxes.
    pub fn intersects(&self, other: &OrientedBox) -> bool {
        let a = self.corners();
        let b = other.corners();
        let axes = [
            unit_vector(self.heading),
            unit_vector(self.heading + std::f64::consts::FRAC_PI_2),
            unit_vector(other.heading),
            unit_vector(other.heading + std::f64::consts::FRAC_PI_2),
        ];
        for axis in axes {
            let (min_a, max_a) = project(&a, axis);
            let (min_b, max_b) = project(&b, axis);
            if max_a < min_b || max_b < min_a {
                return false;
            }
        }
        true
    }
}

fn project(corners: &[Point2; 4], axis: Vec2) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for p in corners {
        let d = p.x * axis.x + p.y * axis.y;
        min = min.min(d);
        max = max.max(d);
    }
    (min, max)
}
