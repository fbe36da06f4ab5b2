//! Scalar, string, and entity-handle registrations.
//!
//! These are the leaves every composite type bottoms out in. They all carry
//! custom functions: widgets come from the matching [`Ui`](crate::Ui) method and the
//! document form is the value's own `serde` representation. Entity handles
//! are written as the referenced entity's UUID (or `null`) through the
//! serializer's [`EntityRefs`](crate::EntityRefs); entity lists
//! (`Vec<Entity>`) as a sequence of UUIDs.

use engine_component::Entity;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_yaml::Value;
use tracing::warn;

use crate::document::{Deserializer, Serializer};
use crate::registry::TypeRegistry;
use crate::type_info::{TypeInfo, downcast_mut, downcast_ref};

fn int_type<T>(name: &str) -> TypeInfo
where
    T: Copy + Serialize + DeserializeOwned + Into<i64> + TryFrom<i64> + Send + Sync + 'static,
{
    TypeInfo::new::<T>(name)
        .with_ui(|ui, label, value| {
            let value = downcast_mut::<T>(value);
            let mut wide: i64 = (*value).into();
            if !ui.input_int(label, &mut wide) {
                return false;
            }
            narrow_edit(label, wide, value)
        })
        .with_serde::<T>()
}

fn uint_type<T>(name: &str) -> TypeInfo
where
    T: Copy + Serialize + DeserializeOwned + Into<u64> + TryFrom<u64> + Send + Sync + 'static,
{
    TypeInfo::new::<T>(name)
        .with_ui(|ui, label, value| {
            let value = downcast_mut::<T>(value);
            let mut wide: u64 = (*value).into();
            if !ui.input_uint(label, &mut wide) {
                return false;
            }
            narrow_edit(label, wide, value)
        })
        .with_serde::<T>()
}

fn narrow_edit<W, T>(label: &str, wide: W, value: &mut T) -> bool
where
    W: Copy + std::fmt::Display,
    T: TryFrom<W>,
{
    match T::try_from(wide) {
        Ok(narrow) => {
            *value = narrow;
            true
        }
        Err(_) => {
            warn!(label, value = %wide, "edited value is out of range");
            false
        }
    }
}

fn entity_uuid(ser: &Serializer<'_>, key: &str, entity: Entity) -> Option<u64> {
    if entity.is_null() {
        return None;
    }
    let uuid = ser.refs().and_then(|refs| refs.uuid_of(entity));
    if uuid.is_none() {
        warn!(key, %entity, "entity reference has no uuid");
    }
    uuid
}

fn resolve_entity(de: &Deserializer<'_>, key: &str, node: &Value) -> Option<Entity> {
    let resolved = node
        .as_u64()
        .and_then(|uuid| de.refs().and_then(|refs| refs.entity_of(uuid)));
    if resolved.is_none() {
        warn!(key, node = ?node, "unresolved entity reference");
    }
    resolved
}

fn entity_list_type() -> TypeInfo {
    TypeInfo::new::<Vec<Entity>>("EntityList")
        .with_ui(|ui, label, value| {
            let list = downcast_ref::<Vec<Entity>>(value);
            let items: Vec<_> = list.iter().map(Entity::to_string).collect();
            ui.text(label, &format!("[{}]", items.join(", ")));
            false
        })
        .with_serialize(|ser, name, value| {
            let uuids: Vec<Value> = downcast_ref::<Vec<Entity>>(value)
                .iter()
                .filter_map(|&entity| entity_uuid(ser, name, entity))
                .map(Value::from)
                .collect();
            ser.write(name, Value::Sequence(uuids));
        })
        .with_deserialize(|de, name, value| {
            let Some(node) = de.get(name) else {
                warn!(key = name, "missing key in document");
                return false;
            };
            let Some(items) = node.as_sequence() else {
                warn!(key = name, node = ?node, "entity list is not a sequence");
                return false;
            };
            let mut complete = true;
            let mut entities = Vec::with_capacity(items.len());
            for item in items.iter().filter(|item| !item.is_null()) {
                match resolve_entity(de, name, item) {
                    Some(entity) => entities.push(entity),
                    None => complete = false,
                }
            }
            *downcast_mut::<Vec<Entity>>(value) = entities;
            complete
        })
        .with_remap(|value, map| {
            let list = downcast_mut::<Vec<Entity>>(value);
            for entity in list.iter_mut() {
                *entity = map(*entity);
            }
            list.retain(|entity| !entity.is_null());
        })
}

/// Register `bool`, the integer and float primitives, `String`, and
/// [`Entity`].
pub fn register_basic_types(registry: &mut TypeRegistry) {
    registry.register_type(
        TypeInfo::new::<bool>("bool")
            .with_ui(|ui, label, value| ui.checkbox(label, downcast_mut::<bool>(value)))
            .with_serde::<bool>(),
    );

    registry.register_type(int_type::<i32>("i32"));
    registry.register_type(uint_type::<u32>("u32"));
    registry.register_type(int_type::<i64>("i64"));
    registry.register_type(uint_type::<u64>("u64"));

    registry.register_type(
        TypeInfo::new::<f32>("f32")
            .with_ui(|ui, label, value| {
                let value = downcast_mut::<f32>(value);
                let mut wide = f64::from(*value);
                if !ui.input_float(label, &mut wide) {
                    return false;
                }
                *value = wide as f32;
                true
            })
            .with_serde::<f32>(),
    );
    registry.register_type(
        TypeInfo::new::<f64>("f64")
            .with_ui(|ui, label, value| ui.input_float(label, downcast_mut::<f64>(value)))
            .with_serde::<f64>(),
    );

    registry.register_type(
        TypeInfo::new::<String>("String")
            .with_ui(|ui, label, value| ui.input_text(label, downcast_mut::<String>(value)))
            .with_serde::<String>(),
    );

    registry.register_type(
        TypeInfo::new::<Entity>("Entity")
            .with_ui(|ui, label, value| {
                ui.text(label, &downcast_ref::<Entity>(value).to_string());
                false
            })
            .with_serialize(|ser, name, value| {
                let entity = *downcast_ref::<Entity>(value);
                let node = entity_uuid(ser, name, entity).map_or(Value::Null, Value::from);
                ser.write(name, node);
            })
            .with_deserialize(|de, name, value| {
                let Some(node) = de.get(name) else {
                    warn!(key = name, "missing key in document");
                    return false;
                };
                let target = downcast_mut::<Entity>(value);
                if node.is_null() {
                    *target = Entity::NULL;
                    return true;
                }
                match resolve_entity(de, name, node) {
                    Some(entity) => {
                        *target = entity;
                        true
                    }
                    None => {
                        *target = Entity::NULL;
                        false
                    }
                }
            }),
    );
    registry.register_type(entity_list_type());
}
