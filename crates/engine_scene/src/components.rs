//! Built-in scene components.
//!
//! Every entity created through [`Scene::create`](crate::Scene::create) gets
//! a [`UuidComponent`], a [`TagComponent`] and a [`SceneTransformComponent`].
//! The remaining components are opt-in data the inspector can attach.
//!
//! The transform also carries the hierarchy: `parent` and `children` are
//! entity references kept consistent by the [`Scene`](crate::Scene)
//! hierarchy operations, and position, rotation and scale are relative to the
//! parent.
//!
//! All of them are plain `Clone + Default` structs; their reflection
//! descriptions and erased component descriptors are registered by
//! [`register_components`].

use engine_component::{Component, Entity, World};
use engine_math::{Mat4, Quat, Transform, Vec3};
use engine_reflect::{ComponentInfo, TypeRegistry, slider_f32, type_info};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Stable identity of an entity across saves, copies and undo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct UuidComponent {
    pub uuid: u64,
}

impl Component for UuidComponent {
    fn type_name() -> &'static str {
        "UuidComponent"
    }
}

/// Display name. Not required to be unique.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TagComponent {
    pub tag: String,
}

impl Component for TagComponent {
    fn type_name() -> &'static str {
        "TagComponent"
    }
}

/// Placement of an entity relative to its parent, plus its place in the
/// hierarchy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneTransformComponent {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
    /// `Entity::NULL` for a top-level entity.
    pub parent: Entity,
    /// In sibling order.
    pub children: Vec<Entity>,
}

impl SceneTransformComponent {
    #[must_use]
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn transform(&self) -> Transform {
        Transform {
            position: self.position,
            rotation: self.rotation,
            scale: self.scale,
        }
    }

    pub fn set_transform(&mut self, transform: Transform) {
        self.position = transform.position;
        self.rotation = transform.rotation;
        self.scale = transform.scale;
    }

    #[must_use]
    pub fn matrix(&self) -> Mat4 {
        self.transform().matrix()
    }

    pub fn set_matrix(&mut self, matrix: Mat4) {
        self.set_transform(Transform::from_matrix(matrix));
    }

    #[must_use]
    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    #[must_use]
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    #[must_use]
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }

    #[must_use]
    pub fn has_parent(&self) -> bool {
        !self.parent.is_null()
    }

    #[must_use]
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}

impl Default for SceneTransformComponent {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
            parent: Entity::NULL,
            children: Vec::new(),
        }
    }
}

impl Component for SceneTransformComponent {
    fn type_name() -> &'static str {
        "SceneTransformComponent"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimpleMaterialComponent {
    pub albedo: Vec3,
    /// In `[0, 1]`.
    pub roughness: f32,
    /// In `[0, 1]`.
    pub metallic: f32,
    pub opaque: bool,
}

impl Default for SimpleMaterialComponent {
    fn default() -> Self {
        Self {
            albedo: Vec3::ONE,
            roughness: 0.1,
            metallic: 0.0,
            opaque: true,
        }
    }
}

impl Component for SimpleMaterialComponent {
    fn type_name() -> &'static str {
        "SimpleMaterialComponent"
    }
}

/// Point light.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LightComponent {
    pub color: Vec3,
    pub intensity: f32,
    pub radius: f32,
}

impl Default for LightComponent {
    fn default() -> Self {
        Self {
            color: Vec3::ONE,
            intensity: 1.0,
            radius: 5.0,
        }
    }
}

impl Component for LightComponent {
    fn type_name() -> &'static str {
        "LightComponent"
    }
}

/// Directional light. Its direction is the owner's transform forward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DirectLightComponent {
    pub color: Vec3,
    pub intensity: f32,
}

impl Default for DirectLightComponent {
    fn default() -> Self {
        Self {
            color: Vec3::ONE,
            intensity: 1.0,
        }
    }
}

impl Component for DirectLightComponent {
    fn type_name() -> &'static str {
        "DirectLightComponent"
    }
}

/// Sky color plus a reference to the entity acting as the sun.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SkyComponent {
    pub direct_light: Entity,
    pub color: Vec3,
}

impl Default for SkyComponent {
    fn default() -> Self {
        Self {
            direct_light: Entity::NULL,
            color: Vec3::ONE,
        }
    }
}

impl Component for SkyComponent {
    fn type_name() -> &'static str {
        "SkyComponent"
    }
}

/// Marker present on disabled entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DisabledComponent;

impl Component for DisabledComponent {
    fn type_name() -> &'static str {
        "DisabledComponent"
    }
}

fn normalize_rotation(world: &mut World, entity: Entity) {
    if let Some(trans) = world.try_get_mut::<SceneTransformComponent>(entity) {
        trans.rotation = trans.rotation.normalize();
    }
}

fn clamp_light(world: &mut World, entity: Entity) {
    if let Some(light) = world.try_get_mut::<LightComponent>(entity) {
        light.intensity = light.intensity.max(0.0);
        light.radius = light.radius.max(0.0);
    }
}

/// Drop the sun reference if it no longer names a live directional light.
fn validate_sky(world: &mut World, entity: Entity) {
    let Some(sky) = world.try_get::<SkyComponent>(entity) else {
        return;
    };
    let sun = sky.direct_light;
    if sun.is_null() || world.has::<DirectLightComponent>(sun) {
        return;
    }
    warn!(%entity, %sun, "sky references an entity without a direct light");
    world.get_mut::<SkyComponent>(entity).direct_light = Entity::NULL;
}

/// Register the built-in components and their field types' owners.
///
/// The basic and math types must already be registered for
/// [`TypeRegistry::finalize`] to pass.
pub fn register_components(registry: &mut TypeRegistry) {
    registry.register_type(type_info!(UuidComponent { uuid }));
    registry.register_component(ComponentInfo::of::<UuidComponent>());

    registry.register_type(type_info!(TagComponent { tag }));
    registry.register_component(ComponentInfo::of::<TagComponent>());

    registry.register_type(type_info!(SceneTransformComponent {
        position,
        rotation,
        scale,
        parent,
        children,
    }));
    registry.register_component(
        ComponentInfo::of::<SceneTransformComponent>().with_on_changed(normalize_rotation),
    );

    registry.register_type(
        type_info!(SimpleMaterialComponent { albedo, roughness, metallic, opaque })
            .with_field_ui("roughness", slider_f32(0.0, 1.0))
            .with_field_ui("metallic", slider_f32(0.0, 1.0)),
    );
    registry.register_component(ComponentInfo::of::<SimpleMaterialComponent>());

    registry.register_type(type_info!(LightComponent { color, intensity, radius }));
    registry.register_component(ComponentInfo::of::<LightComponent>().with_on_changed(clamp_light));

    registry.register_type(type_info!(DirectLightComponent { color, intensity }));
    registry.register_component(ComponentInfo::of::<DirectLightComponent>());

    registry.register_type(type_info!(SkyComponent { direct_light, color }));
    registry.register_component(
        ComponentInfo::of::<SkyComponent>()
            .with_on_enable(validate_sky)
            .with_on_changed(validate_sky),
    );

    registry.register_type(type_info!(DisabledComponent {}));
    registry.register_component(ComponentInfo::of::<DisabledComponent>());
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine_reflect::{HeadlessUi, TypeId, register_basic_types};
    use engine_math::register_math_types;

    fn registry() -> TypeRegistry {
        let mut registry = TypeRegistry::new();
        register_basic_types(&mut registry);
        register_math_types(&mut registry);
        register_components(&mut registry);
        registry
    }

    #[test]
    fn test_registry_is_complete() {
        let registry = registry();
        assert_eq!(registry.finalize(), Ok(()));
        assert_eq!(registry.components().len(), 8);
        assert!(registry.component_by_name("SkyComponent").is_some());
    }

    #[test]
    fn test_defaults() {
        let trans = SceneTransformComponent::default();
        assert_eq!(trans.transform(), Transform::IDENTITY);
        assert!(!trans.has_parent() && !trans.has_children());
        let material = SimpleMaterialComponent::default();
        assert_eq!(material.roughness, 0.1);
        assert!(material.opaque);
        assert_eq!(LightComponent::default().radius, 5.0);
        assert!(SkyComponent::default().direct_light.is_null());
    }

    #[test]
    fn test_transform_axes() {
        let trans = SceneTransformComponent::default();
        assert_eq!(trans.right(), Vec3::X);
        assert_eq!(trans.up(), Vec3::Y);
        assert_eq!(trans.forward(), Vec3::Z);
    }

    #[test]
    fn test_material_sliders_clamp() {
        let registry = registry();
        let mut ui = HeadlessUi::new().with_edit("Material/roughness", "3.5");
        let mut material = SimpleMaterialComponent::default();
        assert!(registry.render_ui(
            &mut ui,
            "Material",
            TypeId::of::<SimpleMaterialComponent>(),
            &mut material
        ));
        assert_eq!(material.roughness, 1.0);
    }

    #[test]
    fn test_sky_hook_drops_dangling_sun() {
        let mut world = World::new();
        let sun = world.spawn();
        let sky = world.spawn();
        world.add(
            sky,
            SkyComponent {
                direct_light: sun,
                ..SkyComponent::default()
            },
        );
        validate_sky(&mut world, sky);
        assert!(world.get::<SkyComponent>(sky).direct_light.is_null());

        let sun = world.spawn();
        world.add(sun, DirectLightComponent::default());
        world.get_mut::<SkyComponent>(sky).direct_light = sun;
        validate_sky(&mut world, sky);
        assert_eq!(world.get::<SkyComponent>(sky).direct_light, sun);
    }

    #[test]
    fn test_light_hook_clamps() {
        let mut world = World::new();
        let e = world.spawn();
        world.add(
            e,
            LightComponent {
                intensity: -2.0,
                radius: -1.0,
                ..LightComponent::default()
            },
        );
        clamp_light(&mut world, e);
        let light = world.get::<LightComponent>(e);
        assert_eq!(light.intensity, 0.0);
        assert_eq!(light.radius, 0.0);
    }
}
