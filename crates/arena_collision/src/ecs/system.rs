//! System trait

/// System trait for processing entities and components once per tick
pub trait System {
    /// Run the system for a tick of `delta_time` seconds
    fn run(&mut self, world: &mut crate::ecs::World, delta_time: f32);
}
