//! Reparenting requests
//!
//! [`HierarchyManager::set_parent`] only stages an edit; the graph itself
//! changes inside `TransformSystem::update`.

use std::sync::Arc;

use hecs::Entity;

use super::Shared;
use super::staging::{EditQueue, PendingEdit};
use crate::core::HierarchyError;
use crate::ecs::{World, parent_of};

/// Cloneable handle for staging parent changes from any thread
#[derive(Clone)]
pub struct HierarchyManager {
    pub(crate) shared: Arc<Shared>,
}

impl HierarchyManager {
    /// Request that `entity` be parented under `new_parent` (`None` = root).
    ///
    /// The last request for an entity before the next update wins. A request
    /// matching the committed parent is free and cancels any pending edit,
    /// unless other pending edits would then close a loop.
    ///
    /// # Errors
    ///
    /// Returns an `InvalidArgument`-kind error, without changing any state, if
    /// `new_parent == entity`, if either handle is dead, or if `new_parent`
    /// is (or will be after pending edits) a descendant of `entity`.
    pub fn set_parent(
        &self,
        world: &World,
        entity: Entity,
        new_parent: Option<Entity>,
    ) -> Result<(), HierarchyError> {
        if new_parent == Some(entity) {
            return Err(HierarchyError::SelfParent(entity));
        }
        if !world.contains(entity) {
            return Err(HierarchyError::NoSuchEntity(entity));
        }
        if let Some(parent) = new_parent
            && !world.contains(parent)
        {
            return Err(HierarchyError::NoSuchEntity(parent));
        }

        let mut staging = self.shared.staging.lock();
        let current = parent_of(world, entity);

        if new_parent == current {
            // Other edits may have relied on the one being cancelled
            if let Some(parent) = current
                && staging.edits.pending_parent(entity).is_some()
                && creates_cycle(world, &staging.edits, entity, parent)
            {
                return Err(HierarchyError::Cycle { entity, parent });
            }
            if staging.edits.cancel(entity) {
                log::trace!("Cancelled pending reparent of {entity:?}");
            }
            return Ok(());
        }

        if let Some(parent) = new_parent
            && creates_cycle(world, &staging.edits, entity, parent)
        {
            return Err(HierarchyError::Cycle { entity, parent });
        }

        staging.edits.stage(PendingEdit {
            entity,
            old_parent: current,
            new_parent,
        });
        staging.dirty = true;
        Ok(())
    }

    /// Request that `entity` become a root
    ///
    /// # Errors
    ///
    /// Returns an error if `entity` is dead
    pub fn clear_parent(&self, world: &World, entity: Entity) -> Result<(), HierarchyError> {
        self.set_parent(world, entity, None)
    }

    /// Staged target parent for an entity, if a request is pending
    #[must_use]
    pub fn pending_parent(&self, entity: Entity) -> Option<Option<Entity>> {
        self.shared.staging.lock().edits.pending_parent(entity)
    }

    /// Parent the entity will have once pending edits are applied
    #[must_use]
    pub fn effective_parent(&self, world: &World, entity: Entity) -> Option<Entity> {
        self.shared.staging.lock().effective_parent(world, entity)
    }

    /// Check whether any reparenting request is waiting for an update
    #[must_use]
    pub fn has_pending_edits(&self) -> bool {
        !self.shared.staging.lock().edits.is_empty()
    }
}

/// Walk the effective ancestor chain of `parent` looking for `entity`.
///
/// The walk is bounded by the entity count, so a committed graph that
/// already loops is reported as a cycle instead of hanging.
fn creates_cycle(world: &World, edits: &EditQueue, entity: Entity, parent: Entity) -> bool {
    let limit = world.len() as usize;
    let mut current = Some(parent);
    let mut steps = 0;

    while let Some(node) = current {
        if node == entity {
            return true;
        }
        steps += 1;
        if steps > limit {
            log::error!("Ancestor chain of {parent:?} does not terminate");
            return true;
        }
        current = match edits.pending_parent(node) {
            Some(pending) => pending,
            None => parent_of(world, node),
        };
    }

    false
}
