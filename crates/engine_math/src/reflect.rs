//! Reflection registration for the math types.
//!
//! Vectors and quaternions are leaves: they are written as sequences of their
//! components (`x, y, z` and `x, y, z, w`) through glam's `serde` support,
//! and edited as float arrays. The emitter writes block sequences, one
//! `- x` line per component; flow input such as `[x, y, z]` reads the same.
//! Quaternions are shown and edited as Euler degrees.

use engine_reflect::{TypeInfo, TypeRegistry, Ui, downcast_mut, type_info};
use glam::{Quat, Vec2, Vec3, Vec4};

use crate::transform::{Transform, euler_degrees, quat_from_euler_degrees};

fn edit_floats<T, const N: usize>(
    ui: &mut dyn Ui,
    label: &str,
    value: &mut T,
    to_floats: fn(&T) -> [f32; N],
    from_floats: fn([f32; N]) -> T,
) -> bool {
    let mut floats = to_floats(value);
    if !ui.input_floats(label, &mut floats) {
        return false;
    }
    *value = from_floats(floats);
    true
}

/// Register `Vec2`, `Vec3`, `Vec4`, `Quat`, and [`Transform`].
///
/// Requires the basic types (`f32`) to be registered for
/// [`TypeRegistry::finalize`] to pass, since `Transform` lists its fields.
pub fn register_math_types(registry: &mut TypeRegistry) {
    registry.register_type(
        TypeInfo::new::<Vec2>("Vec2")
            .with_ui(|ui, label, value| {
                let value = downcast_mut::<Vec2>(value);
                edit_floats(ui, label, value, Vec2::to_array, Vec2::from_array)
            })
            .with_serde::<Vec2>(),
    );
    registry.register_type(
        TypeInfo::new::<Vec3>("Vec3")
            .with_ui(|ui, label, value| {
                let value = downcast_mut::<Vec3>(value);
                edit_floats(ui, label, value, Vec3::to_array, Vec3::from_array)
            })
            .with_serde::<Vec3>(),
    );
    registry.register_type(
        TypeInfo::new::<Vec4>("Vec4")
            .with_ui(|ui, label, value| {
                let value = downcast_mut::<Vec4>(value);
                edit_floats(ui, label, value, Vec4::to_array, Vec4::from_array)
            })
            .with_serde::<Vec4>(),
    );
    registry.register_type(
        TypeInfo::new::<Quat>("Quat")
            .with_ui(|ui, label, value| {
                edit_floats(
                    ui,
                    label,
                    downcast_mut::<Quat>(value),
                    |q| euler_degrees(*q).to_array(),
                    |degrees| quat_from_euler_degrees(Vec3::from_array(degrees)),
                )
            })
            .with_serde::<Quat>(),
    );
    registry.register_type(type_info!(Transform { position, rotation, scale }));
}
