//! Trail wall component for the solid walls vehicles leave behind

use crate::ecs::component::Component;
use crate::foundation::math::Vec2;
use crate::physics::shapes::CollisionLine;

/// A straight trail wall segment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrailWallComponent {
    /// First endpoint
    pub start: Vec2,

    /// Second endpoint
    pub end: Vec2,
}

impl TrailWallComponent {
    /// Create a wall segment
    pub fn new(start: Vec2, end: Vec2) -> Self {
        Self { start, end }
    }

    /// Segment length
    pub fn length(&self) -> f32 {
        (self.end - self.start).norm()
    }

    /// Collision segment facing the side `facing` lies on
    pub fn line(&self, facing: Vec2) -> CollisionLine {
        CollisionLine::new(self.start, self.end, facing)
    }
}

impl Component for TrailWallComponent {}

/// Factory for creating trail wall components
pub struct TrailWallFactory;

impl TrailWallFactory {
    /// Segment between two successive rear-wheel drop points
    pub fn dropped(previous: Vec2, current: Vec2) -> TrailWallComponent {
        TrailWallComponent::new(previous, current)
    }

    /// Free-standing wall, e.g. a level obstacle
    pub fn static_wall(start: Vec2, end: Vec2) -> TrailWallComponent {
        TrailWallComponent::new(start, end)
    }
}
