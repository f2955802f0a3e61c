//! Demo: a small orbiting scene driven through the transform system

use scene_hierarchy::prelude::*;

fn main() {
    env_logger::init();

    let mut world = World::new();
    let mut system = TransformSystem::new();
    let transforms = system.transforms();
    let hierarchy = system.hierarchy();

    let sun = world.spawn(());
    let planet = world.spawn(());
    let moon = world.spawn(());

    transforms.set_transforms(sun, LocalTransform::default());
    transforms.set_transforms(planet, LocalTransform::from_position(Vec3::new(10.0, 0.0, 0.0)));
    transforms.set_transforms(
        moon,
        LocalTransform::from_position(Vec3::new(2.0, 0.0, 0.0)).with_camera_mask(0b01),
    );

    for (child, parent) in [(planet, sun), (moon, planet)] {
        if let Err(e) = hierarchy.set_parent(&world, child, Some(parent)) {
            log::error!("Failed to parent {child:?}: {e}");
            return;
        }
    }

    let step = Quat::from_rotation_y(std::f32::consts::FRAC_PI_4);
    for frame in 0..4 {
        let stats = system.update(&mut world);
        log::info!("Frame {frame}: {}", stats.format_stats());

        for (name, entity) in [("sun", sun), ("planet", planet), ("moon", moon)] {
            if let Some(world_transform) = world.get_copy::<WorldTransform>(entity) {
                log::info!(
                    "  {name}: position {:?}, cameras {:#b}",
                    world_transform.position(),
                    world_transform.camera_mask
                );
            }
        }

        transforms.append_rotation(&world, sun, step);
    }
}
