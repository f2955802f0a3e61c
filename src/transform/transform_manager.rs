//! Local transform writes
//!
//! Writes are staged under the system lock together with their
//! parent-relative matrix and land in the world on the next update.

use std::sync::Arc;

use glam::{Quat, Vec3};
use hecs::Entity;

use super::Shared;
use crate::ecs::{CameraMask, LocalTransform, World};

/// Cloneable handle for writing local transforms from any thread
#[derive(Clone)]
pub struct TransformManager {
    pub(crate) shared: Arc<Shared>,
}

impl TransformManager {
    /// Replace an entity's local transform and mark the system dirty
    pub fn set_transforms(&self, entity: Entity, local: LocalTransform) {
        self.shared.staging.lock().stage_transform(entity, local);
    }

    /// Get an entity's latest local transform.
    ///
    /// Returns [`LocalTransform::UNSET`] for entities that were never given one.
    #[must_use]
    pub fn get_transform(&self, world: &World, entity: Entity) -> LocalTransform {
        self.shared
            .staging
            .lock()
            .current_transform(world, entity)
            .unwrap_or(LocalTransform::UNSET)
    }

    /// Set the position; returns whether anything was written
    pub fn set_position(&self, world: &World, entity: Entity, position: Vec3) -> bool {
        self.modify(world, entity, |local| local.position = position)
    }

    /// Set the rotation; returns whether anything was written
    pub fn set_rotation(&self, world: &World, entity: Entity, rotation: Quat) -> bool {
        self.modify(world, entity, |local| local.rotation = rotation)
    }

    /// Set the scale; returns whether anything was written
    pub fn set_scale(&self, world: &World, entity: Entity, scale: Option<Vec3>) -> bool {
        self.modify(world, entity, |local| local.scale = scale)
    }

    /// Set visibility; returns whether anything was written
    pub fn set_visible(&self, world: &World, entity: Entity, is_visible: bool) -> bool {
        self.modify(world, entity, |local| local.is_visible = is_visible)
    }

    /// Set the camera mask; returns whether anything was written
    pub fn set_camera_mask(&self, world: &World, entity: Entity, camera_mask: CameraMask) -> bool {
        self.modify(world, entity, |local| local.camera_mask = camera_mask)
    }

    /// Apply `delta` after the current rotation; returns whether anything was written
    pub fn append_rotation(&self, world: &World, entity: Entity, delta: Quat) -> bool {
        self.modify(world, entity, |local| local.rotation = delta * local.rotation)
    }

    /// Read-compare-write under one lock acquisition.
    ///
    /// Entities without a transform start from [`LocalTransform::default`]
    /// and are always written.
    fn modify(&self, world: &World, entity: Entity, edit: impl FnOnce(&mut LocalTransform)) -> bool {
        let mut staging = self.shared.staging.lock();
        let existing = staging.current_transform(world, entity);
        let current = existing.unwrap_or_default();

        let mut next = current;
        edit(&mut next);

        if existing.is_some() && next == current {
            return false;
        }
        staging.stage_transform(entity, next);
        true
    }
}
