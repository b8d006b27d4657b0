//! # Arena Collision
//!
//! 2D collision detection and response for two-wheeled arena vehicles.
//!
//! ## Features
//!
//! - **Primitives**: oriented boxes, finite trail-wall segments and arena
//!   half-planes, each with a cached AABB for O(1) broad-phase rejection
//! - **Narrow Phase**: box-vs-plane, box-vs-line and box-vs-box contact queries
//!   that never touch the heap
//! - **Two-Pass Pipeline**: every vehicle is detected before any is resolved
//! - **Wheel Response**: averaged contact pushes with a rigid wheelbase
//! - **ECS Integration**: lazily cached colliders released by destruction hooks
//!
//! ## Quick Start
//!
//! ```rust
//! use arena_collision::prelude::*;
//!
//! let mut world = World::new();
//! let mut collisions = ArenaCollisionSystem::new();
//! collisions.install_resources(&mut world);
//!
//! for edge in ArenaBoundaryComponent::rectangle(Vec2::zeros(), Vec2::new(50.0, 50.0)) {
//!     let entity = world.create_entity();
//!     world.add_component(entity, edge)?;
//! }
//!
//! let car = world.create_entity();
//! world.add_component(car, VehicleComponent::from_pose(Vec2::new(25.0, 0.1), 0.0, 2.0))?;
//!
//! let report = collisions.update(&mut world, 1.0 / 60.0)?;
//! assert_eq!(report.vehicles_resolved, 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod ecs;
pub mod foundation;
pub mod physics;

/// Common imports for crate users
pub mod prelude {
    pub use crate::{
        config::{CollisionConfig, Config, ConfigError},
        ecs::{
            components::{
                ArenaBoundaryComponent, CachedCollider, TrailWallComponent, TrailWallFactory,
                VehicleComponent,
            },
            systems::{ArenaCollisionSystem, CollisionSystemError, TickReport},
            Component, Entity, System, World, WorldError,
        },
        foundation::{
            math::Vec2,
            memory::{OwnedPool, ScratchPool},
        },
        physics::{CollisionList, CollisionRecord, ObstacleKind, ObstacleKinds, ShapePool},
    };
}
