//! Pointer geometry: boundary clamping and polar readings
//!
//! All functions here are pure. Coordinates are in screen space, so Y grows
//! downward; angles are reported on a counter-clockwise protractor with 0°
//! pointing east.
//!
//! # Key Functions
//!
//! - [`clamp`]: Project a point outside the circle back onto its edge
//! - [`angle_of`]: Direction of the offset from center, in whole degrees
//! - [`strength_of`]: Offset magnitude as a percentage of the radius

use crate::error::{JoystickError, Result};

/// A position in the host's coordinate space
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Euclidean distance to another point
    pub fn distance_to(&self, other: Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Boundary circle the button is confined to
///
/// Construction validates the radius, so every `Circle` in circulation
/// satisfies `radius > 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    center: Point,
    radius: f64,
}

impl Circle {
    /// Create a circle, rejecting non-finite or non-positive radii
    pub fn new(center: Point, radius: f64) -> Result<Self> {
        if !radius.is_finite() || radius <= 0.0 {
            return Err(JoystickError::InvalidRadius(radius));
        }
        Ok(Self { center, radius })
    }

    pub fn center(&self) -> Point {
        self.center
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Whether `point` lies inside or on the boundary
    pub fn contains(&self, point: Point) -> bool {
        point.distance_to(self.center) <= self.radius
    }
}

/// Direction and magnitude of the button relative to the center
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PolarReading {
    /// Degrees in [0, 360), 0 = east, counter-clockwise
    pub angle: u16,
    /// Percent of the boundary radius in [0, 100]
    pub strength: u8,
}

impl PolarReading {
    /// Reading reported when the button rests at the center
    pub const CENTERED: PolarReading = PolarReading {
        angle: 0,
        strength: 0,
    };
}

/// Clamp a point to the circle's boundary
///
/// Points inside or on the circle are returned unchanged. Points outside are
/// scaled along the ray from the center so they land exactly on the edge.
pub fn clamp(point: Point, circle: &Circle) -> Point {
    debug_assert!(circle.radius > 0.0, "clamp called with non-positive radius");

    let center = circle.center;
    let distance = point.distance_to(center);

    if distance <= circle.radius {
        return point;
    }

    let scale = circle.radius / distance;
    Point {
        x: (point.x - center.x) * scale + center.x,
        y: (point.y - center.y) * scale + center.y,
    }
}

/// Angle of the offset from center in whole degrees, in [0, 360)
///
/// The Y difference is taken as `center.y - point.y` to undo the downward
/// screen axis. The degree value is truncated toward zero and negative
/// results wrap by adding 360. The center itself reports 0.
pub fn angle_of(point: Point, circle: &Circle) -> u16 {
    debug_assert!(circle.radius > 0.0, "angle_of called with non-positive radius");

    let center = circle.center;
    let dx = point.x - center.x;
    let dy = center.y - point.y;

    if dx == 0.0 && dy == 0.0 {
        return 0;
    }

    let degrees = dy.atan2(dx).to_degrees().trunc() as i32;
    let normalized = if degrees < 0 { degrees + 360 } else { degrees };

    // atan2 is bounded by ±180, so this only guards the 360 edge
    (normalized % 360) as u16
}

/// Distance from center as a rounded percentage of the radius, in [0, 100]
pub fn strength_of(point: Point, circle: &Circle) -> u8 {
    debug_assert!(circle.radius > 0.0, "strength_of called with non-positive radius");

    let ratio = point.distance_to(circle.center) / circle.radius;
    (100.0 * ratio).round().clamp(0.0, 100.0) as u8
}

/// Angle and strength of a point in one call
pub fn reading(point: Point, circle: &Circle) -> PolarReading {
    PolarReading {
        angle: angle_of(point, circle),
        strength: strength_of(point, circle),
    }
}
