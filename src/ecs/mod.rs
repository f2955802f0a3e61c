//! Entity Component System module
//!
//! Built on top of the hecs ECS library

mod components;
mod hierarchy;
mod world;

pub use components::{
    ALL_CAMERAS, CameraMask, LocalTransform, NO_CAMERAS, ParentRelativeTransform, WorldTransform,
    local_matrix,
};
pub use hierarchy::{
    Children, Parent, ancestors, children_of, despawn_recursive, is_ancestor_of, parent_of,
};
pub use world::World;
