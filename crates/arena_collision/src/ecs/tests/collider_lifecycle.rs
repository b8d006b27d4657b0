//! Cached collider creation and release across entity lifetimes

use crate::config::CollisionConfig;
use crate::ecs::components::{
    ArenaBoundaryComponent, CachedCollider, TrailWallFactory, VehicleComponent,
};
use crate::ecs::systems::{ArenaCollisionSystem, CollisionSystemError};
use crate::ecs::{System, World};
use crate::foundation::logging;
use crate::foundation::math::Vec2;
use crate::physics::{CollisionShape, ShapePool};

fn pool(world: &World) -> &ShapePool {
    world.resource::<ShapePool>().unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_colliders_are_built_lazily_and_reused() {
        logging::init_for_tests();
        let mut world = World::new();
        let mut system = ArenaCollisionSystem::new();
        system.install_resources(&mut world);

        let car = world.create_entity();
        world
            .add_component(car, VehicleComponent::from_pose(Vec2::new(5.0, 5.0), 0.0, 2.0))
            .unwrap();
        let edge = world.create_entity();
        let boundary = ArenaBoundaryComponent::new(Vec2::zeros(), Vec2::new(10.0, 0.0));
        world.add_component(edge, boundary).unwrap();

        system.update(&mut world, 0.016).unwrap();
        let handle = world.get_component::<CachedCollider>(car).unwrap().handle;
        assert_eq!(pool(&world).live_count(), 2);

        // Later ticks move the same box instead of building a new one
        world.get_component_mut::<VehicleComponent>(car).unwrap().front_wheel.x += 1.0;
        world.get_component_mut::<VehicleComponent>(car).unwrap().rear_wheel.x += 1.0;
        system.update(&mut world, 0.016).unwrap();

        assert_eq!(world.get_component::<CachedCollider>(car).unwrap().handle, handle);
        assert_eq!(pool(&world).acquired_count(), 2);
        match pool(&world).get(handle) {
            Some(CollisionShape::Box(footprint)) => {
                assert_eq!(footprint.origin(), Vec2::new(6.0, 5.0));
            }
            other => panic!("expected a vehicle box, got {other:?}"),
        }
    }

    #[test]
    fn test_spawn_destroy_cycles_balance_pool() {
        logging::init_for_tests();
        let mut world = World::new();
        let config = CollisionConfig::default().with_activation_delay(0.0);
        let mut system = ArenaCollisionSystem::with_config(config);
        system.install_resources(&mut world);

        for cycle in 0..25 {
            let car = world.create_entity();
            let heading = 0.1 * cycle as f32;
            world
                .add_component(car, VehicleComponent::from_pose(Vec2::new(5.0, 5.0), heading, 2.0))
                .unwrap();
            let wall = world.create_entity();
            let segment = TrailWallFactory::dropped(Vec2::new(0.0, 1.0), Vec2::new(9.0, 1.0));
            world.add_component(wall, segment).unwrap();
            let edge = world.create_entity();
            let boundary = ArenaBoundaryComponent::new(Vec2::zeros(), Vec2::new(10.0, 0.0));
            world.add_component(edge, boundary).unwrap();

            for _ in 0..3 {
                system.run(&mut world, 0.016);
            }
            assert_eq!(pool(&world).live_count(), 3);

            assert!(world.destroy_entity(wall));
            assert!(world.destroy_entity(car));
            assert!(world.destroy_entity(edge));
            assert_eq!(pool(&world).live_count(), 0);
        }

        let shapes = pool(&world);
        assert_eq!(shapes.acquired_count(), 75);
        assert_eq!(shapes.released_count(), 75);
        assert_eq!(world.entity_count(), 0);
    }

    #[test]
    fn test_destroyed_wall_stops_colliding() {
        logging::init_for_tests();
        let mut world = World::new();
        let config = CollisionConfig::default().with_activation_delay(0.0);
        let mut system = ArenaCollisionSystem::with_config(config);
        system.install_resources(&mut world);

        let car = world.create_entity();
        world
            .add_component(car, VehicleComponent::from_pose(Vec2::new(10.0, 10.0), 0.0, 2.0))
            .unwrap();
        let wall = world.create_entity();
        let segment = TrailWallFactory::static_wall(Vec2::new(5.0, 9.8), Vec2::new(15.0, 9.8));
        world.add_component(wall, segment).unwrap();

        assert_eq!(system.update(&mut world, 0.016).unwrap().contacts, 2);

        world.destroy_entity(wall);
        let report = system.update(&mut world, 0.016).unwrap();
        assert_eq!(report.obstacles, 0);
        assert_eq!(report.contacts, 0);
        assert_eq!(pool(&world).live_count(), 1);
    }

    #[test]
    fn test_run_with_missing_resources_is_harmless() {
        logging::init_for_tests();
        let mut world = World::new();
        let mut system = ArenaCollisionSystem::new();
        let car = world.create_entity();
        world
            .add_component(car, VehicleComponent::from_pose(Vec2::new(1.0, 1.0), 0.0, 2.0))
            .unwrap();

        // The failed tick is reported through the log and leaves the world alone
        system.run(&mut world, 0.016);
        assert!(!world.has_component::<CachedCollider>(car));
        assert_eq!(
            system.update(&mut world, 0.016),
            Err(CollisionSystemError::MissingResource("ShapePool"))
        );
        assert!(world.destroy_entity(car));
    }
}
