//! ECS Systems module

pub mod arena_collision_system;

pub use arena_collision_system::{
    cached_footprint, ArenaCollisionSystem, CollisionSystemError, TickReport,
};
