//! Obstacle kinds and the tagged shape stored in the shape pool

use crate::foundation::memory::OwnedPool;
use crate::physics::aabb::Aabb2;
use crate::physics::shapes::{CollisionBox, CollisionLine, CollisionPlane};
use serde::{Deserialize, Serialize};

slotmap::new_key_type! {
    /// Key of a cached shape inside the [`ShapePool`]
    pub struct ShapeHandle;
}

/// Owned-resource pool holding every cached collision primitive
pub type ShapePool = OwnedPool<ShapeHandle, CollisionShape>;

/// What a vehicle ran into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObstacleKind {
    /// Arena boundary, modelled as a half-plane
    Boundary,
    /// Trail wall segment left behind by a vehicle
    TrailWall,
    /// Another vehicle's footprint
    Vehicle,
}

impl ObstacleKind {
    /// The filter bit for this kind
    pub fn flag(self) -> ObstacleKinds {
        match self {
            Self::Boundary => ObstacleKinds::BOUNDARY,
            Self::TrailWall => ObstacleKinds::TRAIL_WALL,
            Self::Vehicle => ObstacleKinds::VEHICLE,
        }
    }
}

bitflags::bitflags! {
    /// Set of obstacle kinds a vehicle is tested against
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct ObstacleKinds: u8 {
        /// Arena boundaries
        const BOUNDARY = 1 << 0;
        /// Trail walls
        const TRAIL_WALL = 1 << 1;
        /// Other vehicles
        const VEHICLE = 1 << 2;
    }
}

impl Default for ObstacleKinds {
    fn default() -> Self {
        Self::BOUNDARY | Self::TRAIL_WALL
    }
}

/// A cached primitive, tagged by the obstacle kind it represents
#[derive(Debug, Clone, PartialEq)]
pub enum CollisionShape {
    /// Arena boundary
    Plane(CollisionPlane),
    /// Trail wall
    Line(CollisionLine),
    /// Vehicle footprint
    Box(CollisionBox),
}

impl CollisionShape {
    /// Obstacle kind this shape stands for
    pub fn kind(&self) -> ObstacleKind {
        match self {
            Self::Plane(_) => ObstacleKind::Boundary,
            Self::Line(_) => ObstacleKind::TrailWall,
            Self::Box(_) => ObstacleKind::Vehicle,
        }
    }

    /// Cached broad-phase bounds
    pub fn aabb(&self) -> &Aabb2 {
        match self {
            Self::Plane(plane) => plane.aabb(),
            Self::Line(line) => line.aabb(),
            Self::Box(collision_box) => collision_box.aabb(),
        }
    }

    /// The box, if this is a vehicle footprint
    pub fn as_box(&self) -> Option<&CollisionBox> {
        match self {
            Self::Box(collision_box) => Some(collision_box),
            _ => None,
        }
    }

    /// Mutable access to the box, if this is a vehicle footprint
    pub fn as_box_mut(&mut self) -> Option<&mut CollisionBox> {
        match self {
            Self::Box(collision_box) => Some(collision_box),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec2;

    #[test]
    fn test_shape_kind_tags() {
        let plane = CollisionShape::Plane(CollisionPlane::new(Vec2::new(0.0, 1.0), 0.0));
        let segment = CollisionLine::new(Vec2::zeros(), Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0));
        let line = CollisionShape::Line(segment);
        let footprint = CollisionBox::new(Vec2::zeros(), Vec2::new(1.0, 0.5), 0.0).unwrap();
        let vehicle = CollisionShape::Box(footprint);

        assert_eq!(plane.kind(), ObstacleKind::Boundary);
        assert_eq!(line.kind(), ObstacleKind::TrailWall);
        assert_eq!(vehicle.kind(), ObstacleKind::Vehicle);
        assert!(plane.as_box().is_none());
        assert!(vehicle.as_box().is_some());
    }

    #[test]
    fn test_default_filter_excludes_vehicles() {
        let filter = ObstacleKinds::default();
        assert!(filter.contains(ObstacleKind::Boundary.flag()));
        assert!(filter.contains(ObstacleKind::TrailWall.flag()));
        assert!(!filter.contains(ObstacleKind::Vehicle.flag()));
    }
}
