//! Entity-Component-System implementation
//!
//! A small slotmap-backed ECS: generational entities, typed component
//! storage, singleton resources and per-entity destruction hooks.

pub mod world;
pub mod entity;
pub mod component;
pub mod system;
pub mod components;
pub mod systems;

#[cfg(test)]
mod tests;

pub use world::{World, WorldError};
pub use entity::Entity;
pub use component::Component;
pub use system::System;
