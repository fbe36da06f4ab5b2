use std::path::PathBuf;

use engine_math::{Quat, Vec3, quat_from_euler_degrees};
use engine_reflect::TypeRegistry;
use engine_scene::{
    DirectLightComponent, LightComponent, Scene, SceneTransformComponent, SimpleMaterialComponent,
    SkyComponent, TagComponent, load_scene, register_all, save_scene,
};

fn registry() -> TypeRegistry {
    let mut registry = TypeRegistry::new();
    register_all(&mut registry);
    registry.finalize().expect("complete registry");
    registry
}

fn temp_path() -> PathBuf {
    std::env::temp_dir().join(format!("engine_scene_{}.yaml", uuid::Uuid::new_v4()))
}

#[test]
fn test_three_entities_roundtrip() {
    let registry = registry();
    let mut scene = Scene::new();
    let cases = [
        ("x", Vec3::new(1.0, 0.0, 0.0)),
        ("y", Vec3::new(0.0, 1.0, 0.0)),
        ("z", Vec3::new(0.0, 0.0, 1.0)),
    ];
    for (name, position) in cases {
        let e = scene.create(name);
        scene.world_mut().get_mut::<SceneTransformComponent>(e).position = position;
    }

    let path = temp_path();
    save_scene(&registry, &scene, &path).unwrap();
    let loaded = load_scene(&registry, &path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(loaded.entity_count(), 3);
    for (name, position) in cases {
        let e = loaded.find_by_name(name).unwrap();
        assert_eq!(loaded.world().get::<SceneTransformComponent>(e).position, position);
    }
}

#[test]
fn test_transform_roundtrip_keeps_rotation() {
    let registry = registry();
    let mut scene = Scene::new();
    let e = scene.create("rotated");
    let rotation = quat_from_euler_degrees(Vec3::new(10.0, 20.0, 30.0));
    {
        let trans = scene.world_mut().get_mut::<SceneTransformComponent>(e);
        trans.position = Vec3::new(1.0, 2.0, 3.0);
        trans.rotation = rotation;
        trans.scale = Vec3::new(1.0, 1.0, 1.0);
    }

    let path = temp_path();
    save_scene(&registry, &scene, &path).unwrap();
    let loaded = load_scene(&registry, &path).unwrap();
    std::fs::remove_file(&path).unwrap();

    let e = loaded.find_by_name("rotated").unwrap();
    let trans = loaded.world().get::<SceneTransformComponent>(e);
    assert_eq!(trans.position, Vec3::new(1.0, 2.0, 3.0));
    assert_eq!(trans.scale, Vec3::ONE);
    assert!(trans.rotation.abs_diff_eq(rotation, 1e-5));
    assert_ne!(trans.rotation, Quat::IDENTITY);
}

#[test]
fn test_uuids_and_optional_components_survive() {
    let registry = registry();
    let mut scene = Scene::new();
    let e = scene.create("lamp");
    scene.world_mut().add(e, LightComponent { radius: 7.5, ..LightComponent::default() });
    scene.world_mut().add(
        e,
        SimpleMaterialComponent {
            opaque: false,
            ..SimpleMaterialComponent::default()
        },
    );
    let plain = scene.create("plain");

    let path = temp_path();
    save_scene(&registry, &scene, &path).unwrap();
    let loaded = load_scene(&registry, &path).unwrap();
    std::fs::remove_file(&path).unwrap();

    let lamp = loaded.entity_by_uuid(scene.uuid_of(e).unwrap()).unwrap();
    assert_eq!(loaded.world().get::<LightComponent>(lamp).radius, 7.5);
    assert!(!loaded.world().get::<SimpleMaterialComponent>(lamp).opaque);
    let plain = loaded.entity_by_uuid(scene.uuid_of(plain).unwrap()).unwrap();
    assert!(!loaded.world().has::<LightComponent>(plain));
}

#[test]
fn test_entity_reference_resolves_regardless_of_order() {
    let registry = registry();
    let mut scene = Scene::new();
    let sky = scene.create("sky");
    let sun = scene.create("sun");
    scene.world_mut().add(sun, DirectLightComponent::default());
    scene.world_mut().add(sky, SkyComponent { direct_light: sun, ..SkyComponent::default() });
    let empty_sky = scene.create("empty sky");
    scene.world_mut().add(empty_sky, SkyComponent::default());

    let path = temp_path();
    save_scene(&registry, &scene, &path).unwrap();
    let loaded = load_scene(&registry, &path).unwrap();
    std::fs::remove_file(&path).unwrap();

    let sky = loaded.find_by_name("sky").unwrap();
    let sun = loaded.find_by_name("sun").unwrap();
    assert_eq!(loaded.world().get::<SkyComponent>(sky).direct_light, sun);
    let empty_sky = loaded.find_by_name("empty sky").unwrap();
    assert!(loaded.world().get::<SkyComponent>(empty_sky).direct_light.is_null());
}

#[test]
fn test_missing_file_yields_none() {
    let registry = registry();
    assert!(load_scene(&registry, temp_path()).is_none());
}

#[test]
fn test_malformed_file_yields_none() {
    let registry = registry();
    let path = temp_path();
    std::fs::write(&path, "entities: [unclosed\n").unwrap();
    let loaded = load_scene(&registry, &path);
    std::fs::remove_file(&path).unwrap();
    assert!(loaded.is_none());
}

#[test]
fn test_malformed_field_loads_rest_of_entity() {
    let registry = registry();
    let path = temp_path();
    std::fs::write(
        &path,
        "entities:\n  - uuid: 3\n    TagComponent:\n      tag: broken\n    \
         SceneTransformComponent:\n      position: [1.0, 2.0]\n      scale: [2.0, 2.0, 2.0]\n",
    )
    .unwrap();
    let loaded = load_scene(&registry, &path).unwrap();
    std::fs::remove_file(&path).unwrap();

    let e = loaded.entity_by_uuid(3).unwrap();
    assert_eq!(loaded.world().get::<TagComponent>(e).tag, "broken");
    let trans = loaded.world().get::<SceneTransformComponent>(e);
    assert_eq!(trans.position, Vec3::ZERO);
    assert_eq!(trans.scale, Vec3::splat(2.0));
}

#[test]
fn test_hierarchy_roundtrip_keeps_world_placement() {
    let registry = registry();
    let mut scene = Scene::new();
    let arm = scene.create("arm");
    scene.world_mut().get_mut::<SceneTransformComponent>(arm).position = Vec3::new(0.0, 2.0, 0.0);
    let hand = scene.create_child("hand", arm);
    scene.world_mut().get_mut::<SceneTransformComponent>(hand).position = Vec3::new(1.0, 0.0, 0.0);
    let finger = scene.create_child("finger", hand);
    let before = scene.world_transform(finger).position;

    let path = temp_path();
    save_scene(&registry, &scene, &path).unwrap();
    let mut loaded = load_scene(&registry, &path).unwrap();
    std::fs::remove_file(&path).unwrap();

    let arm = loaded.find_by_name("arm").unwrap();
    let hand = loaded.find_by_name("hand").unwrap();
    let finger = loaded.find_by_name("finger").unwrap();
    assert_eq!(loaded.children_of(arm), &[hand]);
    assert_eq!(loaded.children_of(hand), &[finger]);
    assert!(loaded.world_transform(finger).position.abs_diff_eq(before, 1e-5));

    let copy = loaded.duplicate(&registry, hand);
    assert_eq!(loaded.children_of(arm), &[hand, copy]);
    assert_eq!(loaded.subtree(copy).len(), 2);
    assert_eq!(loaded.entity_count(), 5);
}
