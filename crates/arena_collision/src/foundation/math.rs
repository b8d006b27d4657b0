//! Math utilities and types
//!
//! Provides the planar math types used by the collision layer. Everything is
//! `f32` in world units, angles in radians, counter-clockwise positive.

pub use nalgebra::{Rotation2, Vector2};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 2D rotation type
pub type Rot2 = Rotation2<f32>;

/// Rotate a vector about the origin by `angle` radians
#[inline]
pub fn rotate(v: Vec2, angle: f32) -> Vec2 {
    Rot2::new(angle) * v
}

/// Left-hand perpendicular `(-y, x)`, i.e. `v` rotated by +90 degrees
#[inline]
pub fn perp(v: Vec2) -> Vec2 {
    Vec2::new(-v.y, v.x)
}

/// Heading angle of a direction vector, measured from +X
#[inline]
pub fn heading_of(direction: Vec2) -> f32 {
    direction.y.atan2(direction.x)
}

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// Pi / 2
    pub const HALF_PI: f32 = PI * 0.5;

    /// Lengths below this are treated as zero when normalizing
    pub const LENGTH_EPSILON: f32 = 1.0e-6;
}
