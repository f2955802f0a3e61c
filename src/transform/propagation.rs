//! Propagation pass: composes world transforms down every tree
//!
//! Roots are entities with a [`ParentRelativeTransform`] and [`Children`]
//! but no [`Parent`]; each starts under the implicit world root. The walk
//! is an explicit depth-first stack in strict pre-order: an entity's world
//! transform is written before any of its children is visited, and the
//! children list is snapshotted at that moment.
//!
//! Camera masks only ever lose bits on the way down. An invisible entity
//! zeroes the mask of its whole subtree.

use hecs::Entity;
use rustc_hash::FxHashSet;

use crate::ecs::{Children, Parent, ParentRelativeTransform, World, WorldTransform};

/// Result of one propagation pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct PropagationOutcome {
    pub roots: usize,
    pub visited: usize,
    pub stale_removed: usize,
}

/// Reusable traversal buffers
#[derive(Debug, Default)]
pub(crate) struct Propagator {
    roots: Vec<Entity>,
    stack: Vec<(Entity, WorldTransform)>,
    visited: FxHashSet<Entity>,
}

impl Propagator {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            roots: Vec::new(),
            stack: Vec::with_capacity(capacity),
            visited: FxHashSet::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    /// Rebuild every reachable [`WorldTransform`] and drop the rest
    pub fn run(&mut self, world: &mut World) -> PropagationOutcome {
        self.roots.clear();
        self.stack.clear();
        self.visited.clear();

        self.roots.extend(
            world
                .query::<(&ParentRelativeTransform, &Children)>()
                .without::<&Parent>()
                .iter()
                .map(|(entity, _)| entity),
        );

        let roots = std::mem::take(&mut self.roots);
        for &root in &roots {
            self.stack.push((root, WorldTransform::ROOT));
            self.drain(world);
        }
        self.roots = roots;

        let stale_removed = self.remove_stale(world);
        PropagationOutcome {
            roots: self.roots.len(),
            visited: self.visited.len(),
            stale_removed,
        }
    }

    fn drain(&mut self, world: &mut World) {
        while let Some((entity, parent_world)) = self.stack.pop() {
            if !world.contains(entity) {
                log::warn!("Skipping despawned entity {entity:?} still listed as a child");
                continue;
            }
            if !self.visited.insert(entity) {
                log::error!("{entity:?} reached twice in one pass; hierarchy is not a forest");
                continue;
            }

            let relative = world.get_copy::<ParentRelativeTransform>(entity);
            let world_transform = match &relative {
                Some(relative) => parent_world.child(relative),
                None => parent_world,
            };
            write_world_transform(world, entity, world_transform);

            if relative.is_none() {
                continue;
            }
            if let Some(children) = world.get_copy::<Children>(entity) {
                // Reversed so the first child is popped first
                for &child in children.iter().rev() {
                    self.stack.push((child, world_transform));
                }
            }
        }
    }

    fn remove_stale(&self, world: &mut World) -> usize {
        let stale: Vec<Entity> = world
            .query::<&WorldTransform>()
            .iter()
            .map(|(entity, _)| entity)
            .filter(|entity| !self.visited.contains(entity))
            .collect();

        for &entity in &stale {
            world.remove::<WorldTransform>(entity);
        }
        stale.len()
    }
}

fn write_world_transform(world: &mut World, entity: Entity, value: WorldTransform) {
    if let Ok(mut existing) = world.inner.get::<&mut WorldTransform>(entity) {
        *existing = value;
        return;
    }
    if world.insert(entity, value).is_err() {
        log::warn!("Could not store world transform on {entity:?}");
    }
}

#[cfg(test)]
mod tests {
    use glam::{Mat4, Quat, Vec3};

    use super::*;
    use crate::ecs::{ALL_CAMERAS, LocalTransform};

    fn spawn_node(world: &mut World, local: LocalTransform) -> Entity {
        world.spawn((local, ParentRelativeTransform::from(&local)))
    }

    fn link(world: &mut World, child: Entity, parent: Entity) {
        world.insert(child, Parent(parent)).unwrap();
        let mut children = world.get_copy::<Children>(parent).unwrap_or_default();
        children.add(child);
        world.insert(parent, children).unwrap();
    }

    #[test]
    fn test_translation_chain() {
        let mut world = World::new();
        let root = spawn_node(&mut world, LocalTransform::default());
        let parent = spawn_node(&mut world, LocalTransform::from_position(Vec3::new(1.0, 0.0, 0.0)));
        let child = spawn_node(&mut world, LocalTransform::from_position(Vec3::new(0.0, 2.0, 0.0)));
        link(&mut world, parent, root);
        link(&mut world, child, parent);

        let outcome = Propagator::default().run(&mut world);

        assert_eq!(outcome.roots, 1);
        assert_eq!(outcome.visited, 3);
        let world_child = world.get_copy::<WorldTransform>(child).unwrap();
        assert_eq!(world_child.position(), Vec3::new(1.0, 2.0, 0.0));
        assert_eq!(world_child.camera_mask, ALL_CAMERAS);
    }

    #[test]
    fn test_rotation_carries_children() {
        let mut world = World::new();
        let quarter = Quat::from_rotation_z(std::f32::consts::FRAC_PI_2);
        let root = spawn_node(&mut world, LocalTransform::new(true, ALL_CAMERAS, quarter, Vec3::ZERO));
        let child = spawn_node(&mut world, LocalTransform::from_position(Vec3::X));
        link(&mut world, child, root);

        Propagator::default().run(&mut world);

        let position = world.get_copy::<WorldTransform>(child).unwrap().position();
        assert!((position - Vec3::Y).length() < 0.001);
    }

    #[test]
    fn test_masks_only_lose_bits() {
        let mut world = World::new();
        let root = spawn_node(&mut world, LocalTransform::default().with_camera_mask(0b0110));
        let child = spawn_node(&mut world, LocalTransform::default().with_camera_mask(0b1011));
        let grandchild = spawn_node(&mut world, LocalTransform::default().with_camera_mask(ALL_CAMERAS));
        link(&mut world, child, root);
        link(&mut world, grandchild, child);

        Propagator::default().run(&mut world);

        assert_eq!(world.get_copy::<WorldTransform>(root).unwrap().camera_mask, 0b0110);
        assert_eq!(world.get_copy::<WorldTransform>(child).unwrap().camera_mask, 0b0010);
        assert_eq!(world.get_copy::<WorldTransform>(grandchild).unwrap().camera_mask, 0b0010);
    }

    #[test]
    fn test_invisible_zeroes_subtree() {
        let mut world = World::new();
        let root = spawn_node(&mut world, LocalTransform::default());
        let hidden = spawn_node(
            &mut world,
            LocalTransform::default().with_camera_mask(0xFF).with_visible(false),
        );
        let below = spawn_node(&mut world, LocalTransform::default().with_camera_mask(0xFF));
        link(&mut world, hidden, root);
        link(&mut world, below, hidden);

        Propagator::default().run(&mut world);

        let hidden_world = world.get_copy::<WorldTransform>(hidden).unwrap();
        assert_eq!(hidden_world.camera_mask, 0);
        assert!(!hidden_world.is_visible());
        assert_eq!(world.get_copy::<WorldTransform>(below).unwrap().camera_mask, 0);
    }

    #[test]
    fn test_unwired_entities_are_skipped() {
        let mut world = World::new();
        let lonely = spawn_node(&mut world, LocalTransform::from_position(Vec3::X));

        let outcome = Propagator::default().run(&mut world);

        assert_eq!(outcome.roots, 0);
        assert!(!world.has::<WorldTransform>(lonely));
    }

    #[test]
    fn test_child_without_relative_transform_inherits_parent() {
        let mut world = World::new();
        let root = spawn_node(&mut world, LocalTransform::from_position(Vec3::X).with_camera_mask(0x5));
        let bare = world.spawn(());
        let below = spawn_node(&mut world, LocalTransform::from_position(Vec3::Y));
        link(&mut world, bare, root);
        link(&mut world, below, bare);

        Propagator::default().run(&mut world);

        let bare_world = world.get_copy::<WorldTransform>(bare).unwrap();
        assert_eq!(bare_world.matrix, Mat4::from_translation(Vec3::X));
        assert_eq!(bare_world.camera_mask, 0x5);
        // The subtree under a bare entity is not entered
        assert!(!world.has::<WorldTransform>(below));
    }

    #[test]
    fn test_stale_world_transforms_removed() {
        let mut world = World::new();
        let root = spawn_node(&mut world, LocalTransform::default());
        let child = spawn_node(&mut world, LocalTransform::default());
        link(&mut world, child, root);

        let mut propagator = Propagator::default();
        propagator.run(&mut world);
        assert!(world.has::<WorldTransform>(child));

        // Unwire the child by hand; it is no longer reachable
        world.remove::<Parent>(child);
        world.remove::<Children>(root);
        let outcome = propagator.run(&mut world);

        assert_eq!(outcome.stale_removed, 2);
        assert!(!world.has::<WorldTransform>(child));
        assert!(!world.has::<WorldTransform>(root));
    }

    #[test]
    fn test_siblings_follow_attach_order() {
        let mut world = World::new();
        let root = spawn_node(&mut world, LocalTransform::default());
        let first = spawn_node(&mut world, LocalTransform::from_position(Vec3::X));
        let second = spawn_node(&mut world, LocalTransform::from_position(Vec3::Y));
        let nested = spawn_node(&mut world, LocalTransform::from_position(Vec3::Z));
        link(&mut world, first, root);
        link(&mut world, second, root);
        link(&mut world, nested, first);

        let outcome = Propagator::default().run(&mut world);

        assert_eq!(outcome.visited, 4);
        assert_eq!(world.get_copy::<WorldTransform>(second).unwrap().position(), Vec3::Y);
        assert_eq!(
            world.get_copy::<WorldTransform>(nested).unwrap().position(),
            Vec3::new(1.0, 0.0, 1.0)
        );
    }

    #[test]
    fn test_repeated_child_is_visited_once() {
        let mut world = World::new();
        let root = spawn_node(&mut world, LocalTransform::default());
        let child = spawn_node(&mut world, LocalTransform::default());
        world.insert(child, Parent(root)).unwrap();
        let mut children = Children::single(child);
        children.0.push(child);
        world.insert(root, children).unwrap();

        let outcome = Propagator::default().run(&mut world);

        assert_eq!(outcome.visited, 2);
    }
}
