//! ECS-level integration tests for the arena collision pipeline

mod collider_lifecycle;
