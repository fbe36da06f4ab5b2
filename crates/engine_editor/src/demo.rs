//! Starter scene written by `engine_editor new`.

use engine_math::{Vec3, quat_from_euler_degrees};
use engine_scene::{
    DirectLightComponent, LightComponent, Scene, SceneTransformComponent, SimpleMaterialComponent,
    SkyComponent,
};

/// A sun, a sky lit by it, a ground plane, and a cube carrying a point light
/// as its child.
#[must_use]
pub fn demo_scene() -> Scene {
    let mut scene = Scene::new();

    let sun = scene.create("sun");
    scene.world_mut().get_mut::<SceneTransformComponent>(sun).rotation =
        quat_from_euler_degrees(Vec3::new(-45.0, 30.0, 0.0));
    scene.world_mut().add(sun, DirectLightComponent::default());

    let sky = scene.create("sky");
    scene.world_mut().add(
        sky,
        SkyComponent {
            direct_light: sun,
            color: Vec3::new(0.5, 0.7, 1.0),
        },
    );

    let ground = scene.create("ground");
    scene.world_mut().get_mut::<SceneTransformComponent>(ground).scale = Vec3::new(20.0, 0.1, 20.0);
    scene.world_mut().add(ground, SimpleMaterialComponent::default());

    let cube = scene.create("cube");
    scene.world_mut().get_mut::<SceneTransformComponent>(cube).position = Vec3::new(0.0, 1.0, 0.0);
    scene.world_mut().add(
        cube,
        SimpleMaterialComponent {
            albedo: Vec3::new(0.8, 0.2, 0.2),
            roughness: 0.5,
            ..SimpleMaterialComponent::default()
        },
    );

    let lamp = scene.create_child("lamp", cube);
    scene.world_mut().get_mut::<SceneTransformComponent>(lamp).position = Vec3::new(2.0, 2.0, -1.0);
    scene.world_mut().add(lamp, LightComponent::default());

    scene
}
