//! ECS Components module
//!
//! Contains the components the arena collision system reads and writes

pub mod arena;
pub mod collision;
pub mod trail_wall;
pub mod vehicle;

pub use arena::ArenaBoundaryComponent;
pub use collision::CachedCollider;
pub use trail_wall::{TrailWallComponent, TrailWallFactory};
pub use vehicle::VehicleComponent;
