//! Position / rotation / scale value type.
//!
//! [`Transform`] is the plain TRS triple the scene's transform component is
//! built from. Rotations are edited in the inspector as XYZ Euler angles in
//! degrees; [`euler_degrees`] and [`quat_from_euler_degrees`] are the two
//! directions of that conversion.

use glam::{EulerRot, Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Rotation order used for every Euler conversion in the editor.
pub const EDITOR_EULER: EulerRot = EulerRot::XYZ;

/// XYZ Euler angles of `rotation`, in degrees.
#[must_use]
pub fn euler_degrees(rotation: Quat) -> Vec3 {
    let (x, y, z) = rotation.to_euler(EDITOR_EULER);
    Vec3::new(x.to_degrees(), y.to_degrees(), z.to_degrees())
}

/// Inverse of [`euler_degrees`].
#[must_use]
pub fn quat_from_euler_degrees(degrees: Vec3) -> Quat {
    Quat::from_euler(
        EDITOR_EULER,
        degrees.x.to_radians(),
        degrees.y.to_radians(),
        degrees.z.to_radians(),
    )
}

/// Translation, rotation, and non-uniform scale.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    /// Unit quaternion.
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Transform {
    /// Origin, no rotation, unit scale.
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    #[must_use]
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::IDENTITY
        }
    }

    /// Decompose an affine matrix.
    #[must_use]
    pub fn from_matrix(matrix: Mat4) -> Self {
        let (scale, rotation, position) = matrix.to_scale_rotation_translation();
        Self {
            position,
            rotation,
            scale,
        }
    }

    /// The model matrix: scale, then rotate, then translate.
    #[must_use]
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }

    /// `self` applied after `child`, i.e. `child` expressed in `self`'s parent space.
    #[must_use]
    pub fn compose(&self, child: &Transform) -> Self {
        Self::from_matrix(self.matrix() * child.matrix())
    }

    /// The transform undoing `self`, so that
    /// `self.compose(&self.inverse())` is the identity.
    #[must_use]
    pub fn inverse(&self) -> Self {
        Self::from_matrix(self.matrix().inverse())
    }

    #[must_use]
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.position + self.rotation * (self.scale * point)
    }

    #[must_use]
    pub fn euler_degrees(&self) -> Vec3 {
        euler_degrees(self.rotation)
    }

    pub fn set_euler_degrees(&mut self, degrees: Vec3) {
        self.rotation = quat_from_euler_degrees(degrees);
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    #[test]
    fn test_identity_matrix() {
        assert_eq!(Transform::IDENTITY.matrix(), Mat4::IDENTITY);
        assert_eq!(Transform::default(), Transform::IDENTITY);
    }

    #[test]
    fn test_matrix_decomposition() {
        let t = Transform {
            position: Vec3::new(1.0, 2.0, 3.0),
            rotation: quat_from_euler_degrees(Vec3::new(10.0, 20.0, 30.0)),
            scale: Vec3::new(2.0, 2.0, 2.0),
        };
        let back = Transform::from_matrix(t.matrix());
        assert!(back.position.abs_diff_eq(t.position, EPS));
        assert!(back.scale.abs_diff_eq(t.scale, EPS));
        assert!(back.rotation.abs_diff_eq(t.rotation, EPS));
    }

    #[test]
    fn test_euler_degrees_roundtrip() {
        let degrees = Vec3::new(15.0, -40.0, 75.0);
        let q = quat_from_euler_degrees(degrees);
        assert!(euler_degrees(q).abs_diff_eq(degrees, 1e-3));
        assert!(euler_degrees(Quat::IDENTITY).abs_diff_eq(Vec3::ZERO, EPS));
    }

    #[test]
    fn test_transform_point_matches_matrix() {
        let t = Transform {
            position: Vec3::new(0.0, 1.0, 0.0),
            rotation: quat_from_euler_degrees(Vec3::new(0.0, 90.0, 0.0)),
            scale: Vec3::splat(3.0),
        };
        let p = Vec3::new(1.0, 0.0, 0.0);
        assert!(t.transform_point(p).abs_diff_eq(t.matrix().transform_point3(p), EPS));
    }

    #[test]
    fn test_compose_with_identity() {
        let t = Transform::from_position(Vec3::new(4.0, 5.0, 6.0));
        let composed = t.compose(&Transform::IDENTITY);
        assert!(composed.position.abs_diff_eq(t.position, EPS));
    }

    #[test]
    fn test_set_euler_degrees() {
        let mut t = Transform::IDENTITY;
        t.set_euler_degrees(Vec3::new(0.0, 0.0, 90.0));
        assert!(t.euler_degrees().abs_diff_eq(Vec3::new(0.0, 0.0, 90.0), 1e-3));
    }

    #[test]
    fn test_inverse_undoes_compose() {
        let parent = Transform {
            position: Vec3::new(1.0, 2.0, 3.0),
            rotation: quat_from_euler_degrees(Vec3::new(0.0, 45.0, 0.0)),
            scale: Vec3::splat(2.0),
        };
        let child = Transform::from_position(Vec3::new(0.0, 0.0, 4.0));
        let back = parent.inverse().compose(&parent.compose(&child));
        assert!(back.position.abs_diff_eq(child.position, 1e-4));
        assert!(back.scale.abs_diff_eq(Vec3::ONE, 1e-4));
    }
}
