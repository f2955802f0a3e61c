//! Hierarchical transform system
//!
//! Producers stage local transform writes and reparenting requests through
//! [`TransformManager`] and [`HierarchyManager`] handles from any thread.
//! Once per tick the simulation thread calls [`TransformSystem::update`],
//! which flushes staged writes, reconciles the parent graph and then
//! recomputes every reachable [`WorldTransform`](crate::ecs::WorldTransform).
//!
//! All staged state sits behind one coarse lock per system instance.
//! Per-frame edit volume is small, so producers contend briefly on a
//! single mutex instead of taking per-entity locks.

mod hierarchy_manager;
mod propagation;
mod reconcile;
mod staging;
mod system;
mod transform_manager;

pub use hierarchy_manager::HierarchyManager;
pub use system::TransformSystem;
pub use transform_manager::TransformManager;

use parking_lot::Mutex;

use staging::Staging;

/// State shared by a system and its handles
#[derive(Debug)]
pub(crate) struct Shared {
    pub staging: Mutex<Staging>,
}
