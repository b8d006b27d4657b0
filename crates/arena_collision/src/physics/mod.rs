//! Physics module for planar collision detection and response
//!
//! Provides the collision primitives with their cached bounds, the narrow-phase
//! queries between them, the per-tick contact list and the wheel-level
//! response used to push vehicles out of obstacles.

pub mod aabb;
pub mod collision_list;
pub mod narrow_phase;
pub mod obstacle;
pub mod response;
pub mod shapes;

pub use aabb::Aabb2;
pub use collision_list::{CollisionList, CollisionRecord};
pub use narrow_phase::{box_vs_box, box_vs_line, box_vs_plane};
pub use obstacle::{CollisionShape, ObstacleKind, ObstacleKinds, ShapeHandle, ShapePool};
pub use response::{ContactAccumulator, WheelCorrection, WheelFrame};
pub use shapes::{
    CollisionBox, CollisionData, CollisionLine, CollisionPlane, ContactSet, ShapeError,
};
