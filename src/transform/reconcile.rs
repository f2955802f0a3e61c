//! Reconciliation pass: applies staged reparenting edits to the world
//!
//! Each edit is an independent edge update: detach from the old parent's
//! [`Children`], then attach to the new parent (or become a root).

use hecs::Entity;

use super::staging::PendingEdit;
use crate::core::{HierarchyError, InvariantPolicy};
use crate::ecs::{Children, Parent, World, parent_of};

/// Result of one reconciliation pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct ReconcileOutcome {
    pub applied: usize,
    pub violations: usize,
}

/// Apply every edit, consuming the batch
pub(crate) fn reconcile(
    world: &mut World,
    edits: Vec<PendingEdit>,
    policy: InvariantPolicy,
) -> ReconcileOutcome {
    let mut outcome = ReconcileOutcome::default();

    for edit in edits {
        let entity = edit.entity;
        if !world.contains(entity) {
            log::debug!("Dropping reparent of despawned entity {entity:?}");
            continue;
        }

        let committed = parent_of(world, entity);
        if committed != edit.old_parent {
            log::warn!(
                "Parent of {entity:?} changed outside the hierarchy manager ({:?} -> {committed:?})",
                edit.old_parent
            );
        }

        if let Some(old_parent) = committed
            && let Err(error) = detach(world, entity, old_parent)
        {
            match policy {
                InvariantPolicy::Panic => panic!("{error}"),
                InvariantPolicy::LogAndSkip => {
                    log::error!("{error}; skipping detach");
                    outcome.violations += 1;
                }
            }
        }

        attach(world, entity, edit.new_parent);
        outcome.applied += 1;
    }

    outcome
}

/// Remove `child` from `parent`'s children, dropping the set once empty
fn detach(world: &mut World, child: Entity, parent: Entity) -> Result<(), HierarchyError> {
    if !world.contains(parent) {
        log::debug!("Old parent {parent:?} of {child:?} is gone");
        return Ok(());
    }

    let now_empty = {
        let Ok(mut children) = world.inner.get::<&mut Children>(parent) else {
            return Err(HierarchyError::MissingChildren { parent, child });
        };
        if !children.remove(child) {
            log::warn!("{child:?} was not listed under its parent {parent:?}");
        }
        children.is_empty()
    };

    if now_empty {
        world.remove::<Children>(parent);
    }
    Ok(())
}

/// Point `entity` at its new parent and append it to the parent's children
fn attach(world: &mut World, entity: Entity, new_parent: Option<Entity>) {
    let Some(parent) = new_parent else {
        world.remove::<Parent>(entity);
        return;
    };

    if !world.contains(parent) {
        log::warn!("Parent {parent:?} was despawned; {entity:?} becomes a root");
        world.remove::<Parent>(entity);
        return;
    }

    if world.insert(entity, Parent(parent)).is_err() {
        return;
    }

    let appended = match world.inner.get::<&mut Children>(parent) {
        Ok(mut children) => {
            children.add(entity);
            true
        }
        Err(_) => false,
    };
    if !appended && world.insert(parent, Children::single(entity)).is_err() {
        log::warn!("Could not create children set on {parent:?}");
    }
}
