//! # engine_math
//!
//! Math types for the scene editor. Re-exports [`glam`] for linear algebra,
//! defines the [`Transform`] value type, and registers the vector,
//! quaternion and transform types with the reflection registry so they can
//! appear as component fields.

pub mod reflect;
pub mod transform;

// Re-export glam types for convenience.
pub use glam::{EulerRot, Mat3, Mat4, Quat, Vec2, Vec3, Vec4};

pub use reflect::register_math_types;
pub use transform::{EDITOR_EULER, Transform, euler_degrees, quat_from_euler_degrees};
