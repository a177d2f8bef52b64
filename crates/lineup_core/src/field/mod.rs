//! Field geometry and coordinate-space conversions.
//!
//! Normalized coordinates are percentages of the field:
//! - X: 0 = left touchline, 100 = right touchline
//! - Y: 0 = opponent goal line, 100 = own goal line

pub mod coordinates;
pub mod geometry;

pub use coordinates::{ground_point, to_normalized, to_surface, to_world, world_to_normalized, NormalizedPos};
pub use geometry::{ClampRange, FieldBounds, FieldGeometry};
