//! The per-tick driver

use std::sync::Arc;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use super::propagation::Propagator;
use super::reconcile::reconcile;
use super::staging::{StagedTransform, Staging};
use super::{HierarchyManager, Shared, TransformManager};
use crate::core::{HierarchyConfig, UpdateStats};
use crate::ecs::World;

/// Owns the staged hierarchy state and runs the per-tick passes.
///
/// Hand out [`HierarchyManager`] and [`TransformManager`] handles to
/// producers; keep the system itself on the simulation thread. `update`
/// takes `&mut self`, so passes can never overlap or reenter.
pub struct TransformSystem {
    shared: Arc<Shared>,
    config: HierarchyConfig,
    propagator: Propagator,
}

impl TransformSystem {
    /// Create a system with the default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(HierarchyConfig::default())
    }

    /// Create a system with the given configuration
    #[must_use]
    pub fn with_config(config: HierarchyConfig) -> Self {
        let staging = Staging::with_capacity(config.edit_capacity);
        Self {
            shared: Arc::new(Shared {
                staging: Mutex::new(staging),
            }),
            propagator: Propagator::with_capacity(config.traversal_capacity),
            config,
        }
    }

    /// Get the configuration
    #[must_use]
    pub fn config(&self) -> &HierarchyConfig {
        &self.config
    }

    /// Get a handle for reparenting requests
    #[must_use]
    pub fn hierarchy(&self) -> HierarchyManager {
        HierarchyManager {
            shared: Arc::clone(&self.shared),
        }
    }

    /// Get a handle for local transform writes
    #[must_use]
    pub fn transforms(&self) -> TransformManager {
        TransformManager {
            shared: Arc::clone(&self.shared),
        }
    }

    /// Check whether anything changed since the last update
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.shared.staging.lock().dirty
    }

    /// Force the next update to run both passes.
    ///
    /// Call after editing hierarchy or transform components directly, e.g.
    /// after [`crate::ecs::despawn_recursive`].
    pub fn mark_dirty(&self) {
        self.shared.staging.lock().dirty = true;
    }

    /// Despawn an entity with its subtree and schedule a full update
    pub fn despawn_recursive(&self, world: &mut World, entity: hecs::Entity) {
        crate::ecs::despawn_recursive(world, entity);
        self.mark_dirty();
    }

    /// Apply every staged change and recompute world transforms.
    ///
    /// Does nothing when clean. Everything staged before the call is applied
    /// before it returns; changes staged by other threads while it runs
    /// land in this update or the next.
    pub fn update(&mut self, world: &mut World) -> UpdateStats {
        let (edits, transforms) = {
            let mut staging = self.shared.staging.lock();
            if !staging.dirty {
                return UpdateStats::skipped();
            }
            staging.dirty = false;
            (staging.edits.take(), std::mem::take(&mut staging.transforms))
        };

        let transforms_flushed = flush_transforms(world, transforms);
        let reconciled = reconcile(world, edits, self.config.invariant_policy);
        let propagated = self.propagator.run(world);

        let stats = UpdateStats {
            skipped: false,
            transforms_flushed,
            edits_applied: reconciled.applied,
            invariant_violations: reconciled.violations,
            roots: propagated.roots,
            entities_visited: propagated.visited,
            stale_removed: propagated.stale_removed,
        };
        log::trace!("{}", stats.format_stats());
        stats
    }
}

impl Default for TransformSystem {
    fn default() -> Self {
        Self::new()
    }
}

/// Write staged local transforms, creating the components on first use
fn flush_transforms(world: &mut World, transforms: FxHashMap<hecs::Entity, StagedTransform>) -> usize {
    let mut flushed = 0;
    for (entity, staged) in transforms {
        if world.inner.insert(entity, (staged.local, staged.relative)).is_ok() {
            flushed += 1;
        } else {
            log::debug!("Dropping transform staged for despawned entity {entity:?}");
        }
    }
    flushed
}
