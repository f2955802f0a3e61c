//! Entity hierarchy components
//!
//! Parent-child relationships between entities. Every entity listed in a
//! [`Children`] set carries a [`Parent`] pointing back at the owner; the
//! reconciliation pass is the only writer that keeps both sides in step.

use hecs::Entity;
use smallvec::SmallVec;

use super::World;

/// Parent component - indicates this entity has a parent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parent(pub Entity);

impl Parent {
    /// Create a new parent reference
    #[must_use]
    pub const fn new(entity: Entity) -> Self {
        Self(entity)
    }

    /// Get the parent entity
    #[must_use]
    pub const fn entity(&self) -> Entity {
        self.0
    }
}

/// Children component - the children of this entity in attach order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Children(pub SmallVec<[Entity; 8]>);

impl Children {
    /// Create an empty children list
    #[must_use]
    pub fn new() -> Self {
        Self(SmallVec::new())
    }

    /// Create from a single child
    #[must_use]
    pub fn single(child: Entity) -> Self {
        let mut children = SmallVec::new();
        children.push(child);
        Self(children)
    }

    /// Append a child; already-present children keep their position
    pub fn add(&mut self, child: Entity) {
        if !self.0.contains(&child) {
            self.0.push(child);
        }
    }

    /// Remove a child, preserving the order of the rest
    pub fn remove(&mut self, child: Entity) -> bool {
        if let Some(pos) = self.0.iter().position(|&e| e == child) {
            self.0.remove(pos);
            true
        } else {
            false
        }
    }

    /// Check if a child is present
    #[must_use]
    pub fn contains(&self, child: Entity) -> bool {
        self.0.contains(&child)
    }

    /// Check if this entity has children
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get the number of children
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate over children
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Entity> {
        self.0.iter()
    }
}

/// Get the committed parent of an entity
#[must_use]
pub fn parent_of(world: &World, entity: Entity) -> Option<Entity> {
    world.get_copy::<Parent>(entity).map(|p| p.0)
}

/// Get the committed children of an entity in attach order
#[must_use]
pub fn children_of(world: &World, entity: Entity) -> SmallVec<[Entity; 8]> {
    world
        .get_copy::<Children>(entity)
        .map(|c| c.0)
        .unwrap_or_default()
}

/// Collect the ancestors of an entity, nearest first
///
/// Stops early if the chain loops back on itself.
#[must_use]
pub fn ancestors(world: &World, entity: Entity) -> Vec<Entity> {
    let mut chain = Vec::new();
    let mut current = entity;
    while let Some(parent) = parent_of(world, current) {
        if parent == entity || chain.contains(&parent) {
            log::error!("Hierarchy loop detected above {entity:?}");
            break;
        }
        chain.push(parent);
        current = parent;
    }
    chain
}

/// Check whether `ancestor` lies on the parent chain of `entity`
#[must_use]
pub fn is_ancestor_of(world: &World, ancestor: Entity, entity: Entity) -> bool {
    ancestors(world, entity).contains(&ancestor)
}

/// Despawn an entity and all of its descendants.
///
/// The entity is first removed from its parent's [`Children`]. Must run on
/// the simulation thread, outside of `update`. This does not mark any
/// transform system dirty; prefer
/// [`TransformSystem::despawn_recursive`](crate::transform::TransformSystem::despawn_recursive),
/// or call `mark_dirty` afterwards.
pub fn despawn_recursive(world: &mut World, entity: Entity) {
    if let Some(parent) = world.remove::<Parent>(entity) {
        let now_empty = match world.inner.get::<&mut Children>(parent.0) {
            Ok(mut children) => {
                children.remove(entity);
                children.is_empty()
            }
            Err(_) => false,
        };
        if now_empty {
            world.remove::<Children>(parent.0);
        }
    }

    let mut stack = vec![entity];
    while let Some(current) = stack.pop() {
        if let Some(children) = world.remove::<Children>(current) {
            stack.extend(children.0);
        }
        if world.despawn(current).is_err() {
            log::debug!("Entity {current:?} was already despawned");
        }
    }
}
