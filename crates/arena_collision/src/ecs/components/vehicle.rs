//! Vehicle component for two-wheeled arena vehicles
//!
//! The driving subsystem owns the wheel positions and heading; the collision
//! system reads them to place the footprint box and writes corrections back.

use crate::ecs::component::Component;
use crate::foundation::math::{heading_of, rotate, Vec2};
use crate::physics::response::{apply_correction, WheelCorrection, WheelFrame};
use crate::physics::shapes::{CollisionBox, ShapeError};

/// Two-wheeled vehicle state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VehicleComponent {
    /// Front wheel position in world space
    pub front_wheel: Vec2,

    /// Rear wheel position in world space
    pub rear_wheel: Vec2,

    /// Heading in radians, derived from the wheel positions
    pub heading: f32,

    /// Fixed distance between the two wheels
    pub wheelbase: f32,

    /// Footprint width in world units
    pub width: f32,
}

impl VehicleComponent {
    /// Create a vehicle from its wheel positions
    ///
    /// The wheelbase is taken from the current wheel distance.
    pub fn new(front_wheel: Vec2, rear_wheel: Vec2) -> Self {
        let axis = front_wheel - rear_wheel;
        Self {
            front_wheel,
            rear_wheel,
            heading: heading_of(axis),
            wheelbase: axis.norm(),
            width: 1.0,
        }
    }

    /// Create a vehicle centered at `center` facing `heading`
    pub fn from_pose(center: Vec2, heading: f32, wheelbase: f32) -> Self {
        let half = rotate(Vec2::new(wheelbase * 0.5, 0.0), heading);
        Self {
            front_wheel: center + half,
            rear_wheel: center - half,
            heading,
            wheelbase,
            width: 1.0,
        }
    }

    /// Set footprint width
    pub fn with_width(mut self, width: f32) -> Self {
        self.width = width;
        self
    }

    /// Midpoint between the wheels
    pub fn center(&self) -> Vec2 {
        (self.front_wheel + self.rear_wheel) * 0.5
    }

    /// Current distance between the wheels
    pub fn wheel_distance(&self) -> f32 {
        (self.front_wheel - self.rear_wheel).norm()
    }

    /// Rear-to-front frame, `None` when the wheels coincide
    pub fn wheel_frame(&self) -> Option<WheelFrame> {
        WheelFrame::from_wheels(self.front_wheel, self.rear_wheel)
    }

    /// Build the footprint box spanning both wheels
    pub fn collision_box(&self) -> Result<CollisionBox, ShapeError> {
        CollisionBox::new(self.center(), self.box_half_size(), self.box_rotation())
    }

    /// Move an existing footprint box onto the current wheel positions
    pub fn refresh_box(&self, collision_box: &mut CollisionBox) -> Result<(), ShapeError> {
        collision_box.update(self.center(), self.box_half_size(), self.box_rotation())
    }

    /// Apply an averaged contact correction and re-derive the heading
    pub fn apply_correction(&mut self, frame: &WheelFrame, correction: &WheelCorrection) {
        self.heading = apply_correction(
            &mut self.front_wheel,
            &mut self.rear_wheel,
            self.wheelbase,
            frame,
            correction,
        );
    }

    fn box_half_size(&self) -> Vec2 {
        Vec2::new(self.wheel_distance() * 0.5, self.width * 0.5)
    }

    fn box_rotation(&self) -> f32 {
        heading_of(self.front_wheel - self.rear_wheel)
    }
}

impl Component for VehicleComponent {}
