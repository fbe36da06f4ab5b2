//! Registration macro.

/// Build a [`TypeInfo`](crate::TypeInfo) from an ordered list of field names.
///
/// Each listed field gets a typed accessor pair; the field's type is inferred
/// from the struct definition. Fields left out are invisible to the editor
/// and the serializer.
///
/// ```rust
/// use engine_reflect::{TypeId, type_info};
///
/// #[derive(Default)]
/// struct Light {
///     color: [f32; 3],
///     intensity: f32,
///     cached_lux: f32,
/// }
///
/// let info = type_info!(Light { color, intensity });
/// assert_eq!(info.name, "Light");
/// assert_eq!(info.fields.len(), 2);
/// assert_eq!(info.fields[1].type_id, TypeId::of::<f32>());
///
/// let renamed = type_info!(Light as "PointLight" { intensity });
/// assert_eq!(renamed.name, "PointLight");
/// ```
#[macro_export]
macro_rules! type_info {
    (@build $ty:ty, $name:expr, $($field:ident),*) => {
        $crate::TypeInfo::new::<$ty>($name)
            $(.with_field($crate::TypeField::new::<$ty, _>(
                stringify!($field),
                |owner| &owner.$field,
                |owner| &mut owner.$field,
            )))*
    };
    ($ty:ident { $($field:ident),* $(,)? }) => {
        $crate::type_info!(@build $ty, stringify!($ty), $($field),*)
    };
    ($ty:ty as $name:literal { $($field:ident),* $(,)? }) => {
        $crate::type_info!(@build $ty, $name, $($field),*)
    };
}
