//! Arena boundary component

use crate::ecs::component::Component;
use crate::foundation::math::Vec2;
use crate::physics::shapes::CollisionPlane;

/// One edge of the arena
///
/// Edges are wound counter-clockwise around the playing field, so the left side
/// of `start -> end` is the inside.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArenaBoundaryComponent {
    /// First endpoint
    pub start: Vec2,

    /// Second endpoint
    pub end: Vec2,
}

impl ArenaBoundaryComponent {
    /// Create a boundary edge
    pub fn new(start: Vec2, end: Vec2) -> Self {
        Self { start, end }
    }

    /// The four edges of an axis-aligned rectangular arena
    pub fn rectangle(min: Vec2, max: Vec2) -> [Self; 4] {
        let bottom_right = Vec2::new(max.x, min.y);
        let top_left = Vec2::new(min.x, max.y);
        [
            Self::new(min, bottom_right),
            Self::new(bottom_right, max),
            Self::new(max, top_left),
            Self::new(top_left, min),
        ]
    }

    /// Half-plane whose allowed side is the arena interior
    pub fn plane(&self) -> CollisionPlane {
        CollisionPlane::through_points(self.start, self.end)
    }
}

impl Component for ArenaBoundaryComponent {}
