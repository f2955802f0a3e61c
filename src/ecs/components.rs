//! Transform components
//!
//! Matrices use glam's column-vector convention: a local matrix applies the
//! entity's rotation first, then its translation, then its scale (so the
//! translation is scaled too), and a world matrix is `parent_world * local`.

use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Bitset selecting which cameras or render passes may see an entity
pub type CameraMask = u32;

/// Mask with every camera bit set
pub const ALL_CAMERAS: CameraMask = u32::MAX;

/// Mask with no camera bits set
pub const NO_CAMERAS: CameraMask = 0;

/// Build a parent-relative matrix from local parts
#[must_use]
pub fn local_matrix(rotation: Quat, position: Vec3, scale: Option<Vec3>) -> Mat4 {
    let rotate_translate = Mat4::from_translation(position) * Mat4::from_quat(rotation);
    match scale {
        Some(scale) => Mat4::from_scale(scale) * rotate_translate,
        None => rotate_translate,
    }
}

/// Entity placement and visibility relative to its parent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocalTransform {
    /// Whether the entity (and therefore its subtree) may be seen
    pub is_visible: bool,
    /// Cameras this entity is visible to
    pub camera_mask: CameraMask,
    /// Rotation relative to the parent
    pub rotation: Quat,
    /// Position relative to the parent
    pub position: Vec3,
    /// Optional scale, applied last
    pub scale: Option<Vec3>,
}

impl LocalTransform {
    /// Value returned for entities whose transform was never set.
    ///
    /// Invisible, seen by no camera, identity rotation and parked at
    /// `f32::MAX` on every axis, far outside any valid world position.
    pub const UNSET: Self = Self {
        is_visible: false,
        camera_mask: NO_CAMERAS,
        rotation: Quat::IDENTITY,
        position: Vec3::splat(f32::MAX),
        scale: None,
    };

    /// Create an unscaled local transform
    #[must_use]
    pub const fn new(is_visible: bool, camera_mask: CameraMask, rotation: Quat, position: Vec3) -> Self {
        Self {
            is_visible,
            camera_mask,
            rotation,
            position,
            scale: None,
        }
    }

    /// Visible to every camera at the given position
    #[must_use]
    pub const fn from_position(position: Vec3) -> Self {
        Self::new(true, ALL_CAMERAS, Quat::IDENTITY, position)
    }

    /// Set the scale
    #[must_use]
    pub const fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = Some(scale);
        self
    }

    /// Set the camera mask
    #[must_use]
    pub const fn with_camera_mask(mut self, camera_mask: CameraMask) -> Self {
        self.camera_mask = camera_mask;
        self
    }

    /// Set visibility
    #[must_use]
    pub const fn with_visible(mut self, is_visible: bool) -> Self {
        self.is_visible = is_visible;
        self
    }

    /// Whether this is the never-set sentinel
    #[must_use]
    pub fn is_unset(&self) -> bool {
        *self == Self::UNSET
    }

    /// Get the parent-relative matrix
    #[must_use]
    pub fn matrix(&self) -> Mat4 {
        local_matrix(self.rotation, self.position, self.scale)
    }
}

impl Default for LocalTransform {
    fn default() -> Self {
        Self::from_position(Vec3::ZERO)
    }
}

/// Cached composition of a [`LocalTransform`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParentRelativeTransform {
    /// Copied from the local transform
    pub is_visible: bool,
    /// Copied from the local transform
    pub camera_mask: CameraMask,
    /// Parent-relative matrix
    pub matrix: Mat4,
}

impl ParentRelativeTransform {
    /// Mask this entity lets through to itself and its subtree
    #[must_use]
    pub const fn effective_mask(&self) -> CameraMask {
        if self.is_visible {
            self.camera_mask
        } else {
            NO_CAMERAS
        }
    }
}

impl From<&LocalTransform> for ParentRelativeTransform {
    fn from(local: &LocalTransform) -> Self {
        Self {
            is_visible: local.is_visible,
            camera_mask: local.camera_mask,
            matrix: local.matrix(),
        }
    }
}

/// World-space transform, rebuilt by every propagation pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldTransform {
    /// Cameras that may see this entity
    pub camera_mask: CameraMask,
    /// World-space transformation matrix
    pub matrix: Mat4,
}

impl WorldTransform {
    /// The implicit world root: identity, seen by every camera
    pub const ROOT: Self = Self {
        camera_mask: ALL_CAMERAS,
        matrix: Mat4::IDENTITY,
    };

    /// Compose a parent-relative transform under this one
    #[must_use]
    pub fn child(&self, local: &ParentRelativeTransform) -> Self {
        Self {
            camera_mask: self.camera_mask & local.effective_mask(),
            matrix: self.matrix * local.matrix,
        }
    }

    /// Get world position
    #[must_use]
    pub fn position(&self) -> Vec3 {
        self.matrix.w_axis.truncate()
    }

    /// Transform a point from local to world space
    #[must_use]
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.matrix.transform_point3(point)
    }

    /// Transform a direction vector (ignores translation)
    #[must_use]
    pub fn transform_direction(&self, direction: Vec3) -> Vec3 {
        self.matrix.transform_vector3(direction)
    }

    /// Whether any camera may see this entity
    #[must_use]
    pub const fn is_visible(&self) -> bool {
        self.camera_mask != NO_CAMERAS
    }

    /// Whether any of the given cameras may see this entity
    #[must_use]
    pub const fn is_visible_to(&self, cameras: CameraMask) -> bool {
        self.camera_mask & cameras != NO_CAMERAS
    }
}

impl Default for WorldTransform {
    fn default() -> Self {
        Self::ROOT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 0.001
    }

    #[test]
    fn test_unset_sentinel() {
        let unset = LocalTransform::UNSET;
        assert!(!unset.is_visible);
        assert_eq!(unset.camera_mask, 0);
        assert_eq!(unset.rotation, Quat::IDENTITY);
        assert!(unset.position.x > 1.0e30);
        assert!(unset.is_unset());
        assert!(!LocalTransform::default().is_unset());
    }

    #[test]
    fn test_local_matrix_rotates_before_translating() {
        let rotation = Quat::from_rotation_z(std::f32::consts::FRAC_PI_2);
        let matrix = local_matrix(rotation, Vec3::new(1.0, 0.0, 0.0), None);

        // The translation itself is not rotated
        assert!(approx_eq(matrix.w_axis.truncate(), Vec3::new(1.0, 0.0, 0.0)));
        // A local point is rotated, then moved
        let point = matrix.transform_point3(Vec3::X);
        assert!(approx_eq(point, Vec3::new(1.0, 1.0, 0.0)));
    }

    #[test]
    fn test_local_matrix_scales_last() {
        let matrix = local_matrix(Quat::IDENTITY, Vec3::new(1.0, 0.0, 0.0), Some(Vec3::splat(2.0)));

        assert!(approx_eq(matrix.w_axis.truncate(), Vec3::new(2.0, 0.0, 0.0)));
        assert!(approx_eq(matrix.transform_point3(Vec3::Y), Vec3::new(2.0, 2.0, 0.0)));
    }

    #[test]
    fn test_effective_mask() {
        let visible = ParentRelativeTransform::from(&LocalTransform::default().with_camera_mask(0x0F));
        assert_eq!(visible.effective_mask(), 0x0F);

        let hidden = ParentRelativeTransform::from(
            &LocalTransform::default()
                .with_camera_mask(0x0F)
                .with_visible(false),
        );
        assert_eq!(hidden.effective_mask(), 0);
    }

    #[test]
    fn test_world_child_composition() {
        let parent = WorldTransform::ROOT.child(&ParentRelativeTransform::from(
            &LocalTransform::from_position(Vec3::new(1.0, 0.0, 0.0)).with_camera_mask(0xFF),
        ));
        let child = parent.child(&ParentRelativeTransform::from(
            &LocalTransform::from_position(Vec3::new(0.0, 2.0, 0.0)).with_camera_mask(0x0F),
        ));

        assert_eq!(child.position(), Vec3::new(1.0, 2.0, 0.0));
        assert_eq!(child.camera_mask, 0x0F);
        assert!(child.is_visible_to(0x01));
        assert!(!child.is_visible_to(0x10));
    }

    #[test]
    fn test_world_transform_directions() {
        let world = WorldTransform {
            camera_mask: ALL_CAMERAS,
            matrix: Mat4::from_translation(Vec3::new(5.0, 0.0, 0.0)),
        };

        assert!(approx_eq(world.transform_point(Vec3::ZERO), Vec3::new(5.0, 0.0, 0.0)));
        assert!(approx_eq(world.transform_direction(Vec3::Y), Vec3::Y));
    }
}
