//! Arena collision system
//!
//! Runs once per simulation tick in two strictly ordered passes:
//!
//! 1. **Detect**: refresh every vehicle's cached footprint box, lazily build
//!    boundary planes and trail-wall lines, then test every vehicle against every
//!    active obstacle and record the contacts in the [`CollisionList`].
//! 2. **Resolve**: for each vehicle with contacts, average the per-contact wheel
//!    corrections, apply them, restore the wheelbase and re-derive the heading.
//!
//! No vehicle is moved until detection has finished for all of them, so the
//! result does not depend on iteration order.

use crate::config::CollisionConfig;
use crate::ecs::components::{
    ArenaBoundaryComponent, CachedCollider, TrailWallComponent, VehicleComponent,
};
use crate::ecs::system::System;
use crate::ecs::world::WorldError;
use crate::ecs::{Entity, World};
use crate::foundation::memory::ScratchPool;
use crate::physics::collision_list::CollisionList;
use crate::physics::narrow_phase::{box_vs_box, box_vs_line, box_vs_plane};
use crate::physics::obstacle::{CollisionShape, ShapeHandle, ShapePool};
use crate::physics::response::ContactAccumulator;
use crate::physics::shapes::CollisionBox;

/// Errors that abort a collision tick before any state is touched
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CollisionSystemError {
    /// A shared pool the system depends on is not in the world
    #[error("collision tick skipped: missing resource `{0}`")]
    MissingResource(&'static str),

    /// Entity bookkeeping failed
    #[error(transparent)]
    World(#[from] WorldError),
}

/// Summary of one collision tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Vehicles that took part in detection
    pub vehicles: usize,
    /// Active obstacles (boundaries and trail walls) tested against
    pub obstacles: usize,
    /// Contacts recorded
    pub contacts: usize,
    /// Vehicles whose wheels were corrected
    pub vehicles_resolved: usize,
    /// Vehicles skipped because their footprint could not be built
    pub construction_failures: usize,
}

/// Detects and resolves vehicle contacts with the arena, trail walls and,
/// optionally, other vehicles
pub struct ArenaCollisionSystem {
    config: CollisionConfig,

    /// Contacts from the most recent tick
    collision_list: CollisionList,

    /// Vehicles with a valid footprint this tick
    vehicles: Vec<(Entity, ShapeHandle)>,

    /// Boundaries and active trail walls this tick
    obstacles: Vec<(Entity, ShapeHandle)>,
}

impl ArenaCollisionSystem {
    /// Create a system with default settings
    pub fn new() -> Self {
        Self::with_config(CollisionConfig::default())
    }

    /// Create a system with custom settings
    pub fn with_config(config: CollisionConfig) -> Self {
        Self {
            config,
            collision_list: CollisionList::with_capacity(64),
            vehicles: Vec::with_capacity(16),
            obstacles: Vec::with_capacity(64),
        }
    }

    /// Current settings
    pub fn config(&self) -> &CollisionConfig {
        &self.config
    }

    /// Contacts recorded by the last tick
    pub fn collision_list(&self) -> &CollisionList {
        &self.collision_list
    }

    /// Insert the shared pools this system needs, keeping any already present
    pub fn install_resources(&self, world: &mut World) {
        if !world.has_resource::<ShapePool>() {
            world.insert_resource(ShapePool::new());
        }
        if !world.has_resource::<ScratchPool>() {
            world.insert_resource(ScratchPool::new(self.config.scratch_capacity));
        }
    }

    /// Run one detect-then-resolve tick
    pub fn update(
        &mut self,
        world: &mut World,
        delta_time: f32,
    ) -> Result<TickReport, CollisionSystemError> {
        Self::check_resource::<ShapePool>(world, "ShapePool")?;
        Self::check_resource::<ScratchPool>(world, "ScratchPool")?;

        self.collision_list.clear();
        self.vehicles.clear();
        self.obstacles.clear();

        world.resource_scope::<ShapePool, _>(|world, shapes| {
            world.resource_scope::<ScratchPool, _>(|world, scratch| {
                self.run_tick(world, shapes, scratch, delta_time)
            })
        })??
    }

    fn check_resource<R: 'static>(
        world: &World,
        name: &'static str,
    ) -> Result<(), CollisionSystemError> {
        if world.has_resource::<R>() {
            return Ok(());
        }
        log::error!("Arena collision tick skipped: {} resource is missing", name);
        Err(CollisionSystemError::MissingResource(name))
    }

    fn run_tick(
        &mut self,
        world: &mut World,
        shapes: &mut ShapePool,
        scratch: &mut ScratchPool,
        delta_time: f32,
    ) -> Result<TickReport, CollisionSystemError> {
        let mut report = TickReport::default();

        self.refresh_vehicles(world, shapes, &mut report)?;
        self.refresh_obstacles(world, shapes, delta_time)?;
        report.vehicles = self.vehicles.len();
        report.obstacles = self.obstacles.len();

        self.detect(shapes, scratch);
        report.contacts = self.collision_list.len();

        report.vehicles_resolved = self.resolve(world);

        log::debug!(
            "Collision tick: {} vehicles, {} obstacles, {} contacts, {} resolved",
            report.vehicles,
            report.obstacles,
            report.contacts,
            report.vehicles_resolved
        );
        Ok(report)
    }

    fn refresh_vehicles(
        &mut self,
        world: &mut World,
        shapes: &mut ShapePool,
        report: &mut TickReport,
    ) -> Result<(), CollisionSystemError> {
        for entity in world.entities_with::<VehicleComponent>() {
            let Some(vehicle) = world.get_component::<VehicleComponent>(entity).copied() else {
                continue;
            };

            let built = match cached_handle(world, shapes, entity) {
                Some(handle) => match shapes.get_mut(handle).and_then(CollisionShape::as_box_mut) {
                    Some(footprint) => vehicle.refresh_box(footprint).map(|()| handle),
                    None => {
                        log::warn!("Vehicle {:?} has a non-box collider, skipping", entity);
                        continue;
                    }
                },
                None => match vehicle.collision_box() {
                    Ok(footprint) => {
                        let shape = CollisionShape::Box(footprint);
                        Ok(Self::attach(world, shapes, entity, shape, 0.0)?)
                    }
                    Err(err) => Err(err),
                },
            };

            match built {
                Ok(handle) => self.vehicles.push((entity, handle)),
                Err(err) => {
                    log::error!("Skipping vehicle {:?} this tick: {}", entity, err);
                    report.construction_failures += 1;
                }
            }
        }
        Ok(())
    }

    fn refresh_obstacles(
        &mut self,
        world: &mut World,
        shapes: &mut ShapePool,
        delta_time: f32,
    ) -> Result<(), CollisionSystemError> {
        for entity in world.entities_with::<ArenaBoundaryComponent>() {
            let handle = match cached_handle(world, shapes, entity) {
                Some(handle) => handle,
                None => {
                    let Some(boundary) = world.get_component::<ArenaBoundaryComponent>(entity)
                    else {
                        continue;
                    };
                    let plane = boundary.plane();
                    Self::attach(world, shapes, entity, CollisionShape::Plane(plane), 0.0)?
                }
            };
            self.obstacles.push((entity, handle));
        }

        // Trail-wall normals are oriented once, toward the first active vehicle
        let facing = self
            .vehicles
            .first()
            .and_then(|&(_, handle)| shapes.get(handle))
            .and_then(CollisionShape::as_box)
            .map(CollisionBox::origin);

        for entity in world.entities_with::<TrailWallComponent>() {
            let handle = match cached_handle(world, shapes, entity) {
                Some(handle) => handle,
                None => {
                    let Some(facing) = facing else {
                        continue;
                    };
                    let Some(wall) = world.get_component::<TrailWallComponent>(entity) else {
                        continue;
                    };
                    let line = wall.line(facing);
                    let delay = self.config.trail_wall_activation_delay;
                    Self::attach(world, shapes, entity, CollisionShape::Line(line), delay)?
                }
            };

            let Some(collider) = world.get_component_mut::<CachedCollider>(entity) else {
                continue;
            };
            if collider.tick(delta_time) {
                self.obstacles.push((entity, handle));
            }
        }
        Ok(())
    }

    /// Cache `shape` for `entity` and arrange for its release on destruction
    fn attach(
        world: &mut World,
        shapes: &mut ShapePool,
        entity: Entity,
        shape: CollisionShape,
        activation_delay: f32,
    ) -> Result<ShapeHandle, CollisionSystemError> {
        let kind = shape.kind();
        let handle = shapes.acquire(shape);

        let collider = CachedCollider::new(handle).with_activation_delay(activation_delay);
        let registered = world
            .add_component(entity, collider)
            .and_then(|()| world.on_destroy(entity, move |world| release_collider(world, handle)));
        if let Err(err) = registered {
            log::error!("Failed to cache {:?} collider for entity {:?}: {}", kind, entity, err);
            let _ = shapes.release(handle);
            return Err(err.into());
        }

        log::trace!("Cached {:?} collider for entity {:?}", kind, entity);
        Ok(handle)
    }

    fn detect(&mut self, shapes: &ShapePool, scratch: &mut ScratchPool) {
        let filter = self.config.collide_with;

        for &(vehicle, vehicle_handle) in &self.vehicles {
            let Some(footprint) = shapes.get(vehicle_handle).and_then(CollisionShape::as_box) else {
                continue;
            };

            let other_vehicles = self.vehicles.iter().filter(|(other, _)| *other != vehicle);
            for &(obstacle, obstacle_handle) in self.obstacles.iter().chain(other_vehicles) {
                let Some(shape) = shapes.get(obstacle_handle) else {
                    continue;
                };
                let kind = shape.kind();
                if !filter.contains(kind.flag()) {
                    continue;
                }

                let mut scope = scratch.scope();
                let contacts = match shape {
                    CollisionShape::Plane(plane) => box_vs_plane(footprint, plane, &mut scope),
                    CollisionShape::Line(line) => box_vs_line(footprint, line, &mut scope),
                    CollisionShape::Box(other) => box_vs_box(other, footprint, &mut scope),
                };

                if let Some(contacts) = contacts {
                    self.collision_list.extend_from_contacts(vehicle, obstacle, kind, &contacts);
                }
            }
        }
    }

    fn resolve(&self, world: &mut World) -> usize {
        let mut resolved = 0;

        for &(entity, _) in &self.vehicles {
            let mut records = self.collision_list.for_vehicle(entity).peekable();
            if records.peek().is_none() {
                continue;
            }

            let Some(vehicle) = world.get_component_mut::<VehicleComponent>(entity) else {
                continue;
            };
            let Some(frame) = vehicle.wheel_frame() else {
                log::warn!("Vehicle {:?} has coincident wheels, contacts ignored", entity);
                continue;
            };

            let mut accumulator = ContactAccumulator::new();
            for record in records {
                accumulator.add(&frame, &record.data);
            }
            if let Some(correction) = accumulator.average() {
                vehicle.apply_correction(&frame, &correction);
                resolved += 1;
            }
        }
        resolved
    }
}

impl Default for ArenaCollisionSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for ArenaCollisionSystem {
    fn run(&mut self, world: &mut World, delta_time: f32) {
        if let Err(err) = self.update(world, delta_time) {
            log::error!("Arena collision tick failed: {}", err);
        }
    }
}

/// Handle of a live cached shape for `entity`
fn cached_handle(world: &World, shapes: &ShapePool, entity: Entity) -> Option<ShapeHandle> {
    world
        .get_component::<CachedCollider>(entity)
        .map(|collider| collider.handle)
        .filter(|&handle| shapes.get(handle).is_some())
}

fn release_collider(world: &mut World, handle: ShapeHandle) {
    let Some(shapes) = world.resource_mut::<ShapePool>() else {
        log::warn!("Shape pool missing while releasing collider {:?}", handle);
        return;
    };
    if let Err(err) = shapes.release(handle) {
        log::warn!("Collider {:?} release failed: {}", handle, err);
    }
}

/// The cached footprint box of a vehicle, as of its last refresh
pub fn cached_footprint(world: &World, entity: Entity) -> Option<&CollisionBox> {
    let handle = world.get_component::<CachedCollider>(entity)?.handle;
    world.resource::<ShapePool>()?.get(handle)?.as_box()
}
