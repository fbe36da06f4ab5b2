//! Scene files.
//!
//! A scene document is a mapping with one `entities` sequence. Each entry
//! holds the entity's `uuid` and one key per registered component present on
//! it, named after the component:
//!
//! ```yaml
//! entities:
//!   - uuid: 1234
//!     TagComponent:
//!       tag: sun
//!     SceneTransformComponent:
//!       position:
//!         - 0.0
//!         - 10.0
//!         - 0.0
//!       parent: ~
//!       ...
//! ```
//!
//! Loading runs in two passes: every entity is created from its UUID first,
//! then components are read, so entity references resolve no matter where
//! their target appears in the file. An entity gets exactly the components
//! its entry lists. Parent and child links are checked against each other
//! once everything is read.

use std::path::Path;

use engine_component::{Entity, TypeId};
use engine_reflect::{Deserializer, Document, Serializer, TypeRegistry, Value};
use tracing::{info, warn};

use crate::components::UuidComponent;
use crate::error::SceneError;
use crate::scene::Scene;

const ENTITIES_KEY: &str = "entities";
const UUID_KEY: &str = "uuid";

/// Serialize one entity's registered components, keyed by component name.
///
/// Entity references are written as UUIDs of `scene`.
#[must_use]
pub fn entity_to_value(registry: &TypeRegistry, scene: &Scene, entity: Entity) -> Value {
    let refs = scene.entity_refs();
    let mut ser = Serializer::new(registry).with_refs(&refs);
    write_entity(&mut ser, registry, scene, entity);
    ser.into_value()
}

fn write_entity(ser: &mut Serializer<'_>, registry: &TypeRegistry, scene: &Scene, entity: Entity) {
    if let Some(uuid) = scene.uuid_of(entity) {
        ser.write_serde(UUID_KEY, &uuid);
    }
    let uuid_id = TypeId::of::<UuidComponent>();
    for info in registry.components().iter().filter(|info| info.type_id != uuid_id) {
        if let Some(value) = (info.try_get_ref)(scene.world(), entity) {
            ser.ser_erased(info.name, info.type_id, value);
        }
    }
}

#[must_use]
pub fn scene_to_document(registry: &TypeRegistry, scene: &Scene) -> Document {
    let refs = scene.entity_refs();
    let entities: Vec<Value> = scene
        .entities()
        .map(|entity| {
            let mut ser = Serializer::new(registry).with_refs(&refs);
            write_entity(&mut ser, registry, scene, entity);
            ser.into_value()
        })
        .collect();

    let mut root = Serializer::new(registry);
    root.write(ENTITIES_KEY, Value::Sequence(entities));
    root.into_document()
}

/// Build a scene from a document.
///
/// Entries without a readable `uuid`, or reusing one, are skipped with a
/// warning. Components that fail to read keep their defaults for the
/// affected fields; the rest of the scene still loads.
pub fn scene_from_document(
    registry: &TypeRegistry,
    doc: &Document,
) -> Result<Scene, SceneError> {
    let Some(entries) = doc.root().get(ENTITIES_KEY).and_then(Value::as_sequence) else {
        return Err(SceneError::MissingEntities);
    };

    let mut scene = Scene::new();
    let mut loaded = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        let Some(uuid) = entry.get(UUID_KEY).and_then(Value::as_u64) else {
            warn!(index, "scene entry has no uuid, skipping");
            continue;
        };
        if scene.entity_by_uuid(uuid).is_some() {
            warn!(index, uuid, "duplicate uuid in scene document, skipping");
            continue;
        }
        loaded.push((scene.spawn_with_uuid(uuid), entry));
    }

    let refs = scene.entity_refs();
    let mut incomplete = 0usize;
    for (entity, entry) in loaded {
        let de = Deserializer::new(registry, entry).with_refs(&refs);
        if let Some(mapping) = entry.as_mapping() {
            for key in mapping.keys().filter_map(Value::as_str) {
                if key != UUID_KEY && registry.component_by_name(key).is_none() {
                    warn!(%entity, component = key, "unknown component in scene document");
                }
            }
        }
        for info in registry.components() {
            if info.type_id == TypeId::of::<UuidComponent>() || de.get(info.name).is_none() {
                continue;
            }
            let value = (info.get_or_add)(scene.world_mut(), entity);
            if !registry.deserialize(&de, info.name, info.type_id, value) {
                incomplete += 1;
            }
        }
    }
    if incomplete > 0 {
        warn!(incomplete, "some components were only partially loaded");
    }
    scene.link_hierarchy();
    Ok(scene)
}

/// Write `scene` to a YAML file.
pub fn save_scene(
    registry: &TypeRegistry,
    scene: &Scene,
    path: impl AsRef<Path>,
) -> Result<(), SceneError> {
    let path = path.as_ref();
    scene_to_document(registry, scene).save(path)?;
    info!(path = %path.display(), entities = scene.entity_count(), "saved scene");
    Ok(())
}

/// Load a scene file. A missing or unreadable file yields `None` and a
/// warning.
#[must_use]
pub fn load_scene(registry: &TypeRegistry, path: impl AsRef<Path>) -> Option<Scene> {
    let path = path.as_ref();
    let loaded = Document::from_file(path)
        .map_err(SceneError::from)
        .and_then(|doc| scene_from_document(registry, &doc));
    match loaded {
        Ok(scene) => {
            info!(path = %path.display(), entities = scene.entity_count(), "loaded scene");
            Some(scene)
        }
        Err(err) => {
            warn!(path = %path.display(), %err, "failed to load scene");
            None
        }
    }
}
