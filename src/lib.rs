//! Hierarchical scene transforms on top of hecs
//!
//! This crate provides:
//! - Parent/child relationships between entities
//! - Local, parent-relative and world transform components
//! - Thread-safe staging of reparenting and transform writes
//! - A per-tick pass that reconciles the graph and propagates world
//!   transforms and camera masks down every tree

pub mod core;
pub mod ecs;
pub mod transform;

// Re-exports for convenience
pub use glam;
pub use hecs;

/// Prelude module for common imports
pub mod prelude {
    pub use crate::core::{HierarchyConfig, HierarchyError, InvariantPolicy, UpdateStats};
    pub use crate::ecs::{
        ALL_CAMERAS, CameraMask, Children, LocalTransform, NO_CAMERAS, Parent,
        ParentRelativeTransform, World, WorldTransform,
    };
    pub use crate::transform::{HierarchyManager, TransformManager, TransformSystem};
    pub use glam::{Mat4, Quat, Vec3};
    pub use hecs::Entity;
}
