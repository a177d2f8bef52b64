//! Conversions between normalized percentages and renderer coordinates.
//!
//! - Surface: a 2D physical rectangle (`FieldBounds`), e.g. overlay pixels.
//! - World: volumetric scene space, Y up, field lying on the Y = 0 plane.
//!   World X follows normalized X, world Z follows normalized Y.

use nalgebra::{Point2, Point3};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::geometry::{ClampRange, FieldBounds, FieldGeometry};

/// Height of marker anchors above the pitch in world units.
pub const GROUND_Y: f32 = 0.0;

/// Renderer-independent position as a percentage of field width/height.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct NormalizedPos {
    pub x: f32,
    pub y: f32,
}

impl NormalizedPos {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn clamped(self, range: ClampRange) -> Self {
        Self { x: range.clamp(self.x), y: range.clamp(self.y) }
    }

    pub fn is_within(&self, range: ClampRange) -> bool {
        range.contains(self.x) && range.contains(self.y)
    }

    pub fn distance(&self, other: &NormalizedPos) -> f32 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// Normalized percentages to volumetric world coordinates.
pub fn to_world(pos: NormalizedPos, geometry: &FieldGeometry) -> Point3<f32> {
    let surface = to_surface(pos, &geometry.bounds());
    Point3::new(surface.x, GROUND_Y, surface.y)
}

/// Normalized percentages to a point inside `bounds`.
pub fn to_surface(pos: NormalizedPos, bounds: &FieldBounds) -> Point2<f32> {
    Point2::new(
        bounds.left + pos.x / 100.0 * bounds.width,
        bounds.top + pos.y / 100.0 * bounds.height,
    )
}

/// Physical point inside `bounds` to normalized percentages, clamped to `range`.
///
/// Degenerate bounds collapse onto the lower edge of the range.
pub fn to_normalized(point: Point2<f32>, bounds: &FieldBounds, range: ClampRange) -> NormalizedPos {
    if bounds.is_degenerate() {
        return NormalizedPos::new(range.min, range.min);
    }

    let x = (point.x - bounds.left) / bounds.width * 100.0;
    let y = (point.y - bounds.top) / bounds.height * 100.0;
    NormalizedPos::new(range.clamp(x), range.clamp(y))
}

/// Projects a world point onto the pitch plane.
pub fn ground_point(world: &Point3<f32>) -> Point2<f32> {
    Point2::new(world.x, world.z)
}

pub fn world_to_normalized(
    world: &Point3<f32>,
    geometry: &FieldGeometry,
    range: ClampRange,
) -> NormalizedPos {
    to_normalized(ground_point(world), &geometry.bounds(), range)
}
