//! World wrapper around hecs
//!
//! Component access is by value: reads hand back a copy and writes store a
//! snapshot, so callers re-fetch to observe later writes.

use hecs::Entity;

/// Entity store holding every entity and its components
pub struct World {
    /// The underlying hecs world
    pub inner: hecs::World,
}

impl World {
    /// Create a new empty world
    pub fn new() -> Self {
        Self {
            inner: hecs::World::new(),
        }
    }

    /// Spawn an entity with the given components
    pub fn spawn(&mut self, components: impl hecs::DynamicBundle) -> Entity {
        self.inner.spawn(components)
    }

    /// Despawn an entity
    ///
    /// Does not touch hierarchy links; use
    /// [`despawn_recursive`](super::despawn_recursive) for wired entities.
    pub fn despawn(&mut self, entity: Entity) -> Result<(), hecs::NoSuchEntity> {
        self.inner.despawn(entity)
    }

    /// Check if an entity is alive
    pub fn contains(&self, entity: Entity) -> bool {
        self.inner.contains(entity)
    }

    /// Check if an entity has a component
    pub fn has<T: hecs::Component>(&self, entity: Entity) -> bool {
        self.inner
            .entity(entity)
            .is_ok_and(|entity_ref| entity_ref.has::<T>())
    }

    /// Get a copy of a component
    pub fn get_copy<T: hecs::Component + Clone>(&self, entity: Entity) -> Option<T> {
        self.inner.get::<&T>(entity).ok().map(|c| (*c).clone())
    }

    /// Add or replace a component
    pub fn insert<T: hecs::Component>(
        &mut self,
        entity: Entity,
        component: T,
    ) -> Result<(), hecs::NoSuchEntity> {
        self.inner.insert_one(entity, component)
    }

    /// Remove a component, returning it if it was present
    pub fn remove<T: hecs::Component>(&mut self, entity: Entity) -> Option<T> {
        self.inner.remove_one::<T>(entity).ok()
    }

    /// Get the number of entities
    pub fn len(&self) -> u32 {
        self.inner.len()
    }

    /// Check if the world is empty
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Query for entities with specific components
    pub fn query<Q: hecs::Query>(&self) -> hecs::QueryBorrow<'_, Q> {
        self.inner.query::<Q>()
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}
