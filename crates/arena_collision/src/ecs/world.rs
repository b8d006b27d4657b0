//! ECS World implementation

use super::{Component, Entity};
use slotmap::{SecondaryMap, SlotMap};
use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;

/// World access errors
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum WorldError {
    /// A mandatory singleton resource has not been inserted
    #[error("missing required resource `{name}`")]
    MissingResource {
        /// Type name of the missing resource
        name: &'static str,
    },

    /// The entity was destroyed or never existed
    #[error("entity {0:?} is not alive")]
    DeadEntity(Entity),
}

/// Callback run once when its entity is destroyed
type DestroyHook = Box<dyn FnOnce(&mut World)>;

/// Type-erased per-component storage
trait ComponentStorage: Any {
    fn remove_entity(&mut self, entity: Entity);
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Component> ComponentStorage for SecondaryMap<Entity, T> {
    fn remove_entity(&mut self, entity: Entity) {
        self.remove(entity);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// ECS World containing all entities, components and singleton resources
///
/// Iteration over components follows slot order, so it is deterministic for a
/// given sequence of spawns and despawns.
pub struct World {
    entities: SlotMap<Entity, ()>,
    component_storages: HashMap<TypeId, Box<dyn ComponentStorage>>,
    resources: HashMap<TypeId, Box<dyn Any>>,
    destroy_hooks: SecondaryMap<Entity, Vec<DestroyHook>>,
}

impl World {
    /// Create a new world
    pub fn new() -> Self {
        Self {
            entities: SlotMap::with_key(),
            component_storages: HashMap::new(),
            resources: HashMap::new(),
            destroy_hooks: SecondaryMap::new(),
        }
    }

    /// Create a new entity
    pub fn create_entity(&mut self) -> Entity {
        self.entities.insert(())
    }

    /// Destroy an entity
    ///
    /// Destruction hooks run first, in registration order, while the entity's
    /// components are still readable. Returns `false` if the entity was not alive.
    pub fn destroy_entity(&mut self, entity: Entity) -> bool {
        if !self.entities.contains_key(entity) {
            return false;
        }

        if let Some(hooks) = self.destroy_hooks.remove(entity) {
            for hook in hooks {
                hook(self);
            }
        }

        for storage in self.component_storages.values_mut() {
            storage.remove_entity(entity);
        }
        self.entities.remove(entity);
        true
    }

    /// Check whether an entity is alive
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.entities.contains_key(entity)
    }

    /// Number of live entities
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Get an iterator over all entities
    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.entities.keys()
    }

    /// Register a hook to run when `entity` is destroyed
    pub fn on_destroy(
        &mut self,
        entity: Entity,
        hook: impl FnOnce(&mut World) + 'static,
    ) -> Result<(), WorldError> {
        if !self.is_alive(entity) {
            return Err(WorldError::DeadEntity(entity));
        }
        self.destroy_hooks
            .entry(entity)
            .ok_or(WorldError::DeadEntity(entity))?
            .or_insert_with(Vec::new)
            .push(Box::new(hook));
        Ok(())
    }

    /// Add a component to an entity, replacing any previous one of the same type
    pub fn add_component<T: Component>(
        &mut self,
        entity: Entity,
        component: T,
    ) -> Result<(), WorldError> {
        if !self.is_alive(entity) {
            return Err(WorldError::DeadEntity(entity));
        }
        self.storage_mut::<T>().insert(entity, component);
        Ok(())
    }

    /// Get a component from an entity
    pub fn get_component<T: Component>(&self, entity: Entity) -> Option<&T> {
        self.storage::<T>()?.get(entity)
    }

    /// Get a mutable component from an entity
    pub fn get_component_mut<T: Component>(&mut self, entity: Entity) -> Option<&mut T> {
        self.component_storages
            .get_mut(&TypeId::of::<T>())?
            .as_any_mut()
            .downcast_mut::<SecondaryMap<Entity, T>>()?
            .get_mut(entity)
    }

    /// Remove a component from an entity
    pub fn remove_component<T: Component>(&mut self, entity: Entity) -> Option<T> {
        self.component_storages
            .get_mut(&TypeId::of::<T>())?
            .as_any_mut()
            .downcast_mut::<SecondaryMap<Entity, T>>()?
            .remove(entity)
    }

    /// Check whether an entity has a component
    pub fn has_component<T: Component>(&self, entity: Entity) -> bool {
        self.get_component::<T>(entity).is_some()
    }

    /// Iterate over every entity holding a `T`, with the component
    pub fn query<T: Component>(&self) -> impl Iterator<Item = (Entity, &T)> + '_ {
        self.storage::<T>().into_iter().flat_map(SecondaryMap::iter)
    }

    /// Collect the entities holding a `T`
    ///
    /// Useful when the caller needs to mutate the world while walking the list.
    pub fn entities_with<T: Component>(&self) -> Vec<Entity> {
        self.query::<T>().map(|(entity, _)| entity).collect()
    }

    /// Insert a singleton resource, returning the previous value
    pub fn insert_resource<R: 'static>(&mut self, resource: R) -> Option<R> {
        self.resources
            .insert(TypeId::of::<R>(), Box::new(resource))
            .and_then(|previous| previous.downcast::<R>().ok())
            .map(|previous| *previous)
    }

    /// Borrow a resource
    pub fn resource<R: 'static>(&self) -> Option<&R> {
        self.resources.get(&TypeId::of::<R>())?.downcast_ref::<R>()
    }

    /// Mutably borrow a resource
    pub fn resource_mut<R: 'static>(&mut self) -> Option<&mut R> {
        self.resources.get_mut(&TypeId::of::<R>())?.downcast_mut::<R>()
    }

    /// Borrow a mandatory resource, failing with its type name when absent
    pub fn require_resource<R: 'static>(&self) -> Result<&R, WorldError> {
        self.resource::<R>().ok_or(WorldError::MissingResource { name: type_name::<R>() })
    }

    /// Check whether a resource is present
    pub fn has_resource<R: 'static>(&self) -> bool {
        self.resources.contains_key(&TypeId::of::<R>())
    }

    /// Remove a resource
    pub fn remove_resource<R: 'static>(&mut self) -> Option<R> {
        self.resources
            .remove(&TypeId::of::<R>())
            .and_then(|resource| resource.downcast::<R>().ok())
            .map(|resource| *resource)
    }

    /// Lift a resource out of the world for the duration of `f`
    ///
    /// Lets a system use the resource and `&mut World` at the same time. The
    /// resource is put back afterwards; inside `f` it is absent from the world.
    pub fn resource_scope<R: 'static, T>(
        &mut self,
        f: impl FnOnce(&mut World, &mut R) -> T,
    ) -> Result<T, WorldError> {
        let mut resource = self
            .remove_resource::<R>()
            .ok_or(WorldError::MissingResource { name: type_name::<R>() })?;
        let result = f(self, &mut resource);
        self.insert_resource(resource);
        Ok(result)
    }

    fn storage<T: Component>(&self) -> Option<&SecondaryMap<Entity, T>> {
        self.component_storages
            .get(&TypeId::of::<T>())?
            .as_any()
            .downcast_ref::<SecondaryMap<Entity, T>>()
    }

    fn storage_mut<T: Component>(&mut self) -> &mut SecondaryMap<Entity, T> {
        let storage = self
            .component_storages
            .entry(TypeId::of::<T>())
            .or_insert_with(|| -> Box<dyn ComponentStorage> {
                Box::new(SecondaryMap::<Entity, T>::new())
            });
        match storage.as_any_mut().downcast_mut::<SecondaryMap<Entity, T>>() {
            Some(typed) => typed,
            None => unreachable!("component storage registered under a foreign TypeId"),
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}
