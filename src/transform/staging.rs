//! Pending state shared between producers and the simulation thread
//!
//! Everything here lives behind the single per-system mutex.

use hecs::Entity;
use rustc_hash::FxHashMap;

use crate::ecs::{LocalTransform, ParentRelativeTransform, World};

/// One staged reparenting request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PendingEdit {
    /// Entity being moved
    pub entity: Entity,
    /// Committed parent at staging time
    pub old_parent: Option<Entity>,
    /// Target parent; `None` makes the entity a root
    pub new_parent: Option<Entity>,
}

/// Pending edits in first-staged order, at most one per entity.
///
/// Cancelled edits leave an empty slot behind so every operation stays
/// constant-time under the lock; `take` skips the holes.
#[derive(Debug, Default)]
pub(crate) struct EditQueue {
    slots: Vec<Option<PendingEdit>>,
    index: FxHashMap<Entity, usize>,
}

impl EditQueue {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    /// Stage an edit, replacing any earlier edit for the same entity in place
    pub fn stage(&mut self, edit: PendingEdit) {
        if let Some(&slot) = self.index.get(&edit.entity)
            && let Some(existing) = self.slots.get_mut(slot)
        {
            *existing = Some(edit);
            return;
        }
        self.index.insert(edit.entity, self.slots.len());
        self.slots.push(Some(edit));
    }

    /// Drop the pending edit for an entity, returning whether one existed
    pub fn cancel(&mut self, entity: Entity) -> bool {
        let Some(slot) = self.index.remove(&entity) else {
            return false;
        };
        if let Some(existing) = self.slots.get_mut(slot) {
            *existing = None;
        }
        true
    }

    /// Pending target parent, if an edit is staged for the entity
    pub fn pending_parent(&self, entity: Entity) -> Option<Option<Entity>> {
        let slot = *self.index.get(&entity)?;
        self.slots
            .get(slot)
            .and_then(Option::as_ref)
            .map(|edit| edit.new_parent)
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Take every pending edit in first-staged order, leaving the queue empty
    pub fn take(&mut self) -> Vec<PendingEdit> {
        self.index.clear();
        self.slots.drain(..).flatten().collect()
    }
}

/// A local transform write and its precomputed parent-relative form
#[derive(Debug, Clone, Copy)]
pub(crate) struct StagedTransform {
    pub local: LocalTransform,
    pub relative: ParentRelativeTransform,
}

impl StagedTransform {
    pub fn new(local: LocalTransform) -> Self {
        Self {
            local,
            relative: ParentRelativeTransform::from(&local),
        }
    }
}

/// State guarded by the system lock
#[derive(Debug, Default)]
pub(crate) struct Staging {
    /// Something changed since the last update
    pub dirty: bool,
    pub edits: EditQueue,
    pub transforms: FxHashMap<Entity, StagedTransform>,
}

impl Staging {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            dirty: false,
            edits: EditQueue::with_capacity(capacity),
            transforms: FxHashMap::default(),
        }
    }

    /// Stage a local transform write (last write wins)
    pub fn stage_transform(&mut self, entity: Entity, local: LocalTransform) {
        self.transforms.insert(entity, StagedTransform::new(local));
        self.dirty = true;
    }

    /// Latest local transform: staged first, then committed
    pub fn current_transform(&self, world: &World, entity: Entity) -> Option<LocalTransform> {
        self.transforms
            .get(&entity)
            .map(|staged| staged.local)
            .or_else(|| world.get_copy::<LocalTransform>(entity))
    }

    /// Parent the entity will have after the next update
    pub fn effective_parent(&self, world: &World, entity: Entity) -> Option<Entity> {
        self.edits
            .pending_parent(entity)
            .unwrap_or_else(|| crate::ecs::parent_of(world, entity))
    }
}
