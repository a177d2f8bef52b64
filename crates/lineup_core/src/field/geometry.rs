use nalgebra::Point2;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Field length in world units (meters)
pub const LENGTH_M: f32 = 105.0;
/// Field width in world units (meters)
pub const WIDTH_M: f32 = 68.0;

/// Physical dimensions used by the volumetric renderer to denormalize coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
pub struct FieldGeometry {
    /// Goal line to goal line (maps to normalized Y)
    #[validate(range(min = 1.0, max = 1000.0))]
    pub length: f32,
    /// Touchline to touchline (maps to normalized X)
    #[validate(range(min = 1.0, max = 1000.0))]
    pub width: f32,
}

impl Default for FieldGeometry {
    fn default() -> Self {
        Self { length: LENGTH_M, width: WIDTH_M }
    }
}

impl FieldGeometry {
    /// Ground-plane rectangle of the field, centered on the world origin.
    pub fn bounds(&self) -> FieldBounds {
        FieldBounds::new(-self.width * 0.5, -self.length * 0.5, self.width, self.length)
    }
}

/// Axis-aligned rectangle of the playing surface in some physical space:
/// overlay pixels for the planar view, ground-plane meters for the volumetric one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldBounds {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl FieldBounds {
    pub const fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self { left, top, width, height }
    }

    /// 100 x 100 rectangle at the origin; physical units equal percentages.
    pub const fn percent() -> Self {
        Self::new(0.0, 0.0, 100.0, 100.0)
    }

    pub fn origin(&self) -> Point2<f32> {
        Point2::new(self.left, self.top)
    }

    pub fn is_degenerate(&self) -> bool {
        !(self.width.is_finite() && self.height.is_finite())
            || self.width <= f32::EPSILON
            || self.height <= f32::EPSILON
    }
}

/// Inclusive clamp window for normalized coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_clamp_range"))]
pub struct ClampRange {
    pub min: f32,
    pub max: f32,
}

impl ClampRange {
    /// Full field, used for click-to-place.
    pub const PERCENT: ClampRange = ClampRange { min: 0.0, max: 100.0 };
    /// Keeps a dragged marker fully inside the visible field.
    pub const DRAG: ClampRange = ClampRange { min: 2.0, max: 98.0 };

    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// NaN maps to `min`; infinities saturate.
    pub fn clamp(&self, value: f32) -> f32 {
        if value.is_nan() {
            return self.min;
        }
        value.clamp(self.min, self.max)
    }

    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }
}

fn validate_clamp_range(range: &ClampRange) -> Result<(), ValidationError> {
    let within = ClampRange::PERCENT.contains(range.min) && ClampRange::PERCENT.contains(range.max);
    if !within || range.min >= range.max {
        return Err(ValidationError::new("clamp_range"));
    }
    Ok(())
}
