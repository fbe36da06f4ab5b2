//! The type registry.
//!
//! [`TypeRegistry`] maps every [`TypeId`] to its [`TypeInfo`] and keeps the
//! lists of registered [`ComponentInfo`] and [`ScriptInfo`] descriptors. On
//! top of those maps it provides the reflection-driven operations that work
//! for any registered type without knowing it at compile time. Each one calls
//! the type's custom function when present, otherwise it walks the fields:
//!
//! | Operation | Field walk |
//! |---|---|
//! | [`render_ui`](TypeRegistry::render_ui) | collapsible group, one widget per field |
//! | [`serialize`](TypeRegistry::serialize) | mapping keyed by field name |
//! | [`deserialize`](TypeRegistry::deserialize) | read each field from the mapping |
//! | [`remap_entities`](TypeRegistry::remap_entities) | remap each field |
//!
//! ## Failure semantics
//!
//! - Registering a type, component or script twice panics. So does
//!   [`type_info`](TypeRegistry::type_info) for an unknown ID.
//! - A missing key during deserialization is a data error: it logs a
//!   warning, leaves the value untouched, returns `false`, and sibling
//!   fields are still read.
//!
//! The generic walks recurse through field types and only terminate when the
//! field graph is acyclic; [`finalize`](TypeRegistry::finalize) checks that
//! once all registration is done.

use std::any::Any;
use std::collections::{HashMap, HashSet};

use engine_component::{Entity, TypeId};
use serde::Serialize;
use serde_yaml::{Mapping, Value};
use tracing::{debug, warn};

use crate::component_info::ComponentInfo;
use crate::document::{Deserializer, Serializer};
use crate::error::RegistryError;
use crate::script_info::ScriptInfo;
use crate::type_info::{TypeInfo, downcast_mut};
use crate::ui::Ui;

/// Serializable summary of one registered type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeDescription {
    pub name: String,
    pub type_id: String,
    pub size: usize,
    pub component: bool,
    pub script: bool,
    pub custom_ui: bool,
    pub custom_serialize: bool,
    pub custom_deserialize: bool,
    pub fields: Vec<FieldDescription>,
}

/// Serializable summary of one registered field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDescription {
    pub name: String,
    /// Registered name of the field type, or its Rust name if unregistered.
    pub type_name: String,
    pub custom_ui: bool,
}

/// Process-local source of truth for type and component descriptions.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    types: HashMap<TypeId, TypeInfo>,
    components: Vec<ComponentInfo>,
    scripts: Vec<ScriptInfo>,
}

impl TypeRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a type description.
    ///
    /// # Panics
    ///
    /// Panics if the type is already registered.
    pub fn register_type(&mut self, info: TypeInfo) {
        assert!(
            !self.types.contains_key(&info.type_id),
            "type `{}` ({}) is already registered",
            info.name,
            info.type_id
        );
        debug!(name = %info.name, type_id = %info.type_id, "registered type");
        self.types.insert(info.type_id, info);
    }

    /// Remove a type description, returning it if it was present.
    pub fn unregister_type(&mut self, id: TypeId) -> Option<TypeInfo> {
        let removed = self.types.remove(&id);
        if let Some(info) = &removed {
            debug!(name = %info.name, type_id = %id, "unregistered type");
        }
        removed
    }

    /// Register a component descriptor.
    ///
    /// # Panics
    ///
    /// Panics if a component with the same type ID is already registered.
    pub fn register_component(&mut self, info: ComponentInfo) {
        assert!(
            self.component_info(info.type_id).is_none(),
            "component `{}` ({}) is already registered",
            info.name,
            info.type_id
        );
        debug!(name = info.name, type_id = %info.type_id, "registered component");
        self.components.push(info);
    }

    /// Remove a component descriptor, returning it if it was present.
    pub fn unregister_component(&mut self, id: TypeId) -> Option<ComponentInfo> {
        let index = self.components.iter().position(|info| info.type_id == id)?;
        let removed = self.components.remove(index);
        debug!(name = removed.name, type_id = %id, "unregistered component");
        Some(removed)
    }

    /// Register a script descriptor.
    ///
    /// # Panics
    ///
    /// Panics if a script with the same type ID is already registered.
    pub fn register_script(&mut self, info: ScriptInfo) {
        assert!(
            self.script_info(info.type_id).is_none(),
            "script `{}` ({}) is already registered",
            info.name,
            info.type_id
        );
        debug!(name = info.name, type_id = %info.type_id, "registered script");
        self.scripts.push(info);
    }

    /// Remove a script descriptor, returning it if it was present.
    pub fn unregister_script(&mut self, id: TypeId) -> Option<ScriptInfo> {
        let index = self.scripts.iter().position(|info| info.type_id == id)?;
        let removed = self.scripts.remove(index);
        debug!(name = removed.name, type_id = %id, "unregistered script");
        Some(removed)
    }

    #[must_use]
    pub fn contains_type(&self, id: TypeId) -> bool {
        self.types.contains_key(&id)
    }

    /// Look up a type that must be registered.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not registered.
    #[must_use]
    pub fn type_info(&self, id: TypeId) -> &TypeInfo {
        match self.types.get(&id) {
            Some(info) => info,
            None => panic!("type {id} is not registered"),
        }
    }

    #[must_use]
    pub fn get_type_info(&self, id: TypeId) -> Option<&TypeInfo> {
        self.types.get(&id)
    }

    #[must_use]
    pub fn type_by_name(&self, name: &str) -> Option<&TypeInfo> {
        self.types.values().find(|info| info.name == name)
    }

    /// All registered types, sorted by name.
    #[must_use]
    pub fn types(&self) -> Vec<&TypeInfo> {
        let mut types: Vec<_> = self.types.values().collect();
        types.sort_by(|a, b| a.name.cmp(&b.name));
        types
    }

    #[must_use]
    pub fn component_info(&self, id: TypeId) -> Option<&ComponentInfo> {
        self.components.iter().find(|info| info.type_id == id)
    }

    #[must_use]
    pub fn component_by_name(&self, name: &str) -> Option<&ComponentInfo> {
        self.components.iter().find(|info| info.name == name)
    }

    /// Registered components in registration order.
    #[must_use]
    pub fn components(&self) -> &[ComponentInfo] {
        &self.components
    }

    #[must_use]
    pub fn script_info(&self, id: TypeId) -> Option<&ScriptInfo> {
        self.scripts.iter().find(|info| info.type_id == id)
    }

    /// Registered scripts in registration order.
    #[must_use]
    pub fn scripts(&self) -> &[ScriptInfo] {
        &self.scripts
    }

    /// Split into types (sorted by name), then components and scripts
    /// (registration order).
    #[must_use]
    pub fn into_parts(self) -> (Vec<TypeInfo>, Vec<ComponentInfo>, Vec<ScriptInfo>) {
        let mut types: Vec<_> = self.types.into_values().collect();
        types.sort_by(|a, b| a.name.cmp(&b.name));
        (types, self.components, self.scripts)
    }

    /// Number of registered types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns `true` when no types, components or scripts are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty() && self.components.is_empty() && self.scripts.is_empty()
    }

    /// Draw an editor for `value` and report whether the user changed it.
    ///
    /// # Panics
    ///
    /// Panics if `id` (or any field type reached) is not registered.
    pub fn render_ui(&self, ui: &mut dyn Ui, name: &str, id: TypeId, value: &mut dyn Any) -> bool {
        let info = self.type_info(id);
        if let Some(custom) = &info.ui {
            return custom(ui, name, value);
        }
        if !ui.begin_group(name) {
            return false;
        }
        let mut edited = false;
        for field in &info.fields {
            let field_value = field.get_mut(&mut *value);
            edited |= match &field.ui {
                Some(custom) => custom(ui, &field.name, field_value),
                None => self.render_ui(ui, &field.name, field.type_id, field_value),
            };
        }
        ui.end_group();
        edited
    }

    /// Write `value` under `name`.
    ///
    /// # Panics
    ///
    /// Panics if `id` (or any field type reached) is not registered.
    pub fn serialize(&self, ser: &mut Serializer<'_>, name: &str, id: TypeId, value: &dyn Any) {
        let info = self.type_info(id);
        if let Some(custom) = &info.serialize {
            custom(ser, name, value);
            return;
        }
        let mut node = ser.child();
        node.write("", Value::Mapping(Mapping::new()));
        for field in &info.fields {
            self.serialize(&mut node, &field.name, field.type_id, field.get(value));
        }
        ser.write(name, node.into_value());
    }

    /// Read `name` into `value`.
    ///
    /// Returns `false` if any key on the way was missing or malformed. The
    /// affected fields keep their previous values; all other fields are
    /// still read.
    ///
    /// # Panics
    ///
    /// Panics if `id` (or any field type reached) is not registered.
    pub fn deserialize(
        &self,
        de: &Deserializer<'_>,
        name: &str,
        id: TypeId,
        value: &mut dyn Any,
    ) -> bool {
        let info = self.type_info(id);
        if let Some(custom) = &info.deserialize {
            return custom(de, name, value);
        }
        let Some(node) = de.child(name) else {
            warn!(key = name, type_name = %info.name, "missing key in document");
            return false;
        };
        let mut complete = true;
        for field in &info.fields {
            let target = field.get_mut(&mut *value);
            complete &= self.deserialize(&node, &field.name, field.type_id, target);
        }
        complete
    }

    /// Rewrite every [`Entity`] reachable through registered fields of
    /// `value`. Types with a custom remap function (entity lists) rewrite
    /// their own contents.
    pub fn remap_entities(
        &self,
        id: TypeId,
        value: &mut dyn Any,
        map: &mut dyn FnMut(Entity) -> Entity,
    ) {
        if id == TypeId::of::<Entity>() {
            let entity = downcast_mut::<Entity>(value);
            *entity = map(*entity);
            return;
        }
        let Some(info) = self.types.get(&id) else {
            return;
        };
        if let Some(custom) = &info.remap {
            custom(value, map);
            return;
        }
        for field in &info.fields {
            self.remap_entities(field.type_id, field.get_mut(&mut *value), map);
        }
    }

    /// Check that every field type is registered and that the field graph
    /// has no cycles.
    pub fn finalize(&self) -> Result<(), RegistryError> {
        let types = self.types();
        for info in &types {
            for field in &info.fields {
                if !self.types.contains_key(&field.type_id) {
                    return Err(RegistryError::MissingFieldType {
                        owner: info.name.clone(),
                        field: field.name.clone(),
                        field_type: field.type_name,
                    });
                }
            }
        }

        let mut done = HashSet::new();
        let mut path = Vec::new();
        for info in &types {
            self.check_acyclic(info.type_id, &mut path, &mut done)?;
        }
        debug!(types = types.len(), components = self.components.len(), "registry finalized");
        Ok(())
    }

    fn check_acyclic(
        &self,
        id: TypeId,
        path: &mut Vec<TypeId>,
        done: &mut HashSet<TypeId>,
    ) -> Result<(), RegistryError> {
        if done.contains(&id) {
            return Ok(());
        }
        if let Some(start) = path.iter().position(|&on_path| on_path == id) {
            let mut names: Vec<_> = path[start..]
                .iter()
                .map(|&step| self.type_info(step).name.clone())
                .collect();
            names.push(self.type_info(id).name.clone());
            return Err(RegistryError::Cycle { path: names });
        }
        path.push(id);
        for field in &self.type_info(id).fields {
            self.check_acyclic(field.type_id, path, done)?;
        }
        path.pop();
        done.insert(id);
        Ok(())
    }

    /// Summarize one registered type.
    #[must_use]
    pub fn describe(&self, id: TypeId) -> Option<TypeDescription> {
        let info = self.types.get(&id)?;
        Some(TypeDescription {
            name: info.name.clone(),
            type_id: id.to_string(),
            size: info.size,
            component: self.component_info(id).is_some(),
            script: self.script_info(id).is_some(),
            custom_ui: info.ui.is_some(),
            custom_serialize: info.serialize.is_some(),
            custom_deserialize: info.deserialize.is_some(),
            fields: info
                .fields
                .iter()
                .map(|field| FieldDescription {
                    name: field.name.clone(),
                    type_name: self
                        .types
                        .get(&field.type_id)
                        .map_or_else(|| field.type_name.to_owned(), |ty| ty.name.clone()),
                    custom_ui: field.ui.is_some(),
                })
                .collect(),
        })
    }

    /// Summarize every registered type, sorted by name.
    #[must_use]
    pub fn describe_all(&self) -> Vec<TypeDescription> {
        self.types()
            .into_iter()
            .filter_map(|info| self.describe(info.type_id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basic_types::register_basic_types;
    use crate::document::{Document, EntityRefs};
    use crate::type_info::{TypeField, downcast_ref};
    use crate::type_info;
    use crate::ui::HeadlessUi;

    #[derive(Debug, Clone, Default, PartialEq)]
    struct Inner {
        count: i32,
        label: String,
    }

    #[derive(Debug, Clone, Default, PartialEq)]
    struct Outer {
        enabled: bool,
        inner: Inner,
        scale: f32,
    }

    #[derive(Debug, Clone, Default, PartialEq)]
    struct Link {
        target: Entity,
        weight: f64,
    }

    #[derive(Debug, Default)]
    struct Node {
        next: Option<Box<Node>>,
    }

    fn registry() -> TypeRegistry {
        let mut registry = TypeRegistry::new();
        register_basic_types(&mut registry);
        registry.register_type(type_info!(Inner { count, label }));
        registry.register_type(type_info!(Outer { enabled, inner, scale }));
        registry.register_type(type_info!(Link { target, weight }));
        registry
    }

    fn sample() -> Outer {
        Outer {
            enabled: true,
            inner: Inner {
                count: 7,
                label: "seven".into(),
            },
            scale: 0.5,
        }
    }

    #[test]
    #[should_panic(expected = "already registered")]
    fn test_double_registration_panics() {
        let mut registry = registry();
        registry.register_type(type_info!(Inner { count, label }));
    }

    #[test]
    fn test_register_unregister_register() {
        let mut registry = registry();
        let id = TypeId::of::<Inner>();
        assert!(registry.unregister_type(id).is_some());
        assert!(!registry.contains_type(id));
        assert!(registry.unregister_type(id).is_none());
        registry.register_type(type_info!(Inner { count, label }));
        assert!(registry.contains_type(id));
    }

    #[test]
    #[should_panic(expected = "is not registered")]
    fn test_missing_type_lookup_panics() {
        let registry = TypeRegistry::new();
        let _ = registry.type_info(TypeId::of::<Outer>());
    }

    #[test]
    fn test_serialize_writes_nested_mappings() {
        let registry = registry();
        let mut ser = Serializer::new(&registry);
        ser.ser("outer", &sample());
        let doc = ser.into_document();
        let outer = doc.root().get("outer").unwrap();
        assert_eq!(outer.get("enabled"), Some(&Value::from(true)));
        assert_eq!(outer.get("scale"), Some(&Value::from(0.5f32)));
        let inner = outer.get("inner").unwrap();
        assert!(inner.is_mapping());
        assert_eq!(inner.get("count"), Some(&Value::from(7)));
        assert_eq!(inner.get("label"), Some(&Value::from("seven")));

        let keys: Vec<_> = outer
            .as_mapping()
            .unwrap()
            .keys()
            .filter_map(Value::as_str)
            .collect();
        assert_eq!(keys, vec!["enabled", "inner", "scale"]);
    }

    #[test]
    fn test_generic_roundtrip() {
        let registry = registry();
        let mut ser = Serializer::new(&registry);
        ser.ser("", &sample());
        let value = ser.into_value();

        let mut loaded = Outer::default();
        assert!(Deserializer::new(&registry, &value).deser("", &mut loaded));
        assert_eq!(loaded, sample());
    }

    #[test]
    fn test_missing_field_reports_false_and_keeps_siblings() {
        let registry = registry();
        let doc = Document::parse("enabled: true\ninner:\n  label: partial\nscale: 2.0\n").unwrap();

        let mut loaded = Outer::default();
        assert!(!doc.reader(&registry).deser("", &mut loaded));
        assert!(loaded.enabled);
        assert_eq!(loaded.inner.count, 0);
        assert_eq!(loaded.inner.label, "partial");
        assert_eq!(loaded.scale, 2.0);
    }

    #[test]
    fn test_missing_root_key_is_false() {
        let registry = registry();
        let doc = Document::parse("other: 1\n").unwrap();
        let mut loaded = sample();
        assert!(!doc.reader(&registry).deser("outer", &mut loaded));
        assert_eq!(loaded, sample());
    }

    #[test]
    fn test_render_ui_visits_every_field_once() {
        let registry = registry();
        let mut ui = HeadlessUi::new();
        let mut value = sample();
        assert!(!registry.render_ui(&mut ui, "Outer", TypeId::of::<Outer>(), &mut value));

        let labels: Vec<_> = ui
            .lines()
            .iter()
            .map(|line| (line.depth, line.label.as_str()))
            .collect();
        assert_eq!(
            labels,
            vec![
                (0, "Outer"),
                (1, "enabled"),
                (1, "inner"),
                (2, "count"),
                (2, "label"),
                (1, "scale"),
            ]
        );
    }

    #[test]
    fn test_render_ui_reports_nested_edit() {
        let registry = registry();
        let mut ui = HeadlessUi::new().with_edit("Outer/inner/count", "11");
        let mut value = sample();
        assert!(registry.render_ui(&mut ui, "Outer", TypeId::of::<Outer>(), &mut value));
        assert_eq!(value.inner.count, 11);
    }

    #[test]
    fn test_collapsed_group_skips_fields() {
        let registry = registry();
        let mut ui = HeadlessUi::new()
            .with_collapsed("Outer/inner")
            .with_edit("Outer/inner/count", "11");
        let mut value = sample();
        assert!(!registry.render_ui(&mut ui, "Outer", TypeId::of::<Outer>(), &mut value));
        assert_eq!(value.inner.count, 7);
    }

    #[test]
    fn test_field_ui_override_is_used() {
        let mut registry = registry();
        registry.unregister_type(TypeId::of::<Outer>());
        registry.register_type(
            type_info!(Outer { enabled, inner, scale })
                .with_field_ui("scale", crate::ui::slider_f32(0.0, 1.0)),
        );
        let mut ui = HeadlessUi::new().with_edit("Outer/scale", "3");
        let mut value = sample();
        assert!(registry.render_ui(&mut ui, "Outer", TypeId::of::<Outer>(), &mut value));
        assert_eq!(value.scale, 1.0);
    }

    #[test]
    fn test_custom_serialize_takes_precedence() {
        let mut registry = registry();
        registry.unregister_type(TypeId::of::<Inner>());
        registry.register_type(
            TypeInfo::new::<Inner>("Inner")
                .with_field(TypeField::new::<Inner, _>("count", |i| &i.count, |i| &mut i.count))
                .with_serialize(|ser, name, value| {
                    let inner = downcast_ref::<Inner>(value);
                    ser.write_serde(name, &format!("{}x{}", inner.label, inner.count));
                }),
        );
        let mut ser = Serializer::new(&registry);
        ser.ser("inner", &sample().inner);
        assert_eq!(ser.value().get("inner"), Some(&Value::from("sevenx7")));
    }

    #[test]
    fn test_entity_fields_use_refs() {
        let registry = registry();
        let mut world = engine_component::World::new();
        let target = world.spawn();
        let mut refs = EntityRefs::new();
        refs.insert(target, 9001);

        let link = Link { target, weight: 1.5 };
        let mut ser = Serializer::new(&registry).with_refs(&refs);
        ser.ser("", &link);
        let value = ser.into_value();
        assert_eq!(value.get("target"), Some(&Value::from(9001u64)));

        let mut loaded = Link::default();
        let de = Deserializer::new(&registry, &value).with_refs(&refs);
        assert!(de.deser("", &mut loaded));
        assert_eq!(loaded, link);
    }

    #[test]
    fn test_unresolved_entity_reference_is_null() {
        let registry = registry();
        let doc = Document::parse("target: 5\nweight: 1.0\n").unwrap();
        let refs = EntityRefs::new();
        let mut loaded = Link::default();
        assert!(!doc.reader(&registry).with_refs(&refs).deser("", &mut loaded));
        assert!(loaded.target.is_null());
        assert_eq!(loaded.weight, 1.0);
    }

    #[test]
    fn test_remap_entities_rewrites_handles() {
        let registry = registry();
        let mut world = engine_component::World::new();
        let old = world.spawn();
        let new = world.spawn();
        let mut link = Link {
            target: old,
            weight: 0.0,
        };
        let mut map = |e: Entity| if e == old { new } else { e };
        registry.remap_entities(TypeId::of::<Link>(), &mut link, &mut map);
        assert_eq!(link.target, new);
    }

    #[test]
    fn test_finalize_accepts_complete_registry() {
        assert_eq!(registry().finalize(), Ok(()));
    }

    #[test]
    fn test_finalize_reports_missing_field_type() {
        let mut registry = TypeRegistry::new();
        registry.register_type(type_info!(Inner { count, label }));
        let err = registry.finalize().unwrap_err();
        assert!(matches!(
            err,
            RegistryError::MissingFieldType { ref field, .. } if field == "count"
        ));
    }

    #[test]
    fn test_finalize_reports_cycle() {
        let mut registry = TypeRegistry::new();
        registry.register_type(TypeInfo::new::<Node>("Node").with_field(TypeField::new::<Node, _>(
            "next",
            |n| n,
            |n| n,
        )));
        let err = registry.finalize().unwrap_err();
        assert_eq!(
            err,
            RegistryError::Cycle {
                path: vec!["Node".into(), "Node".into()]
            }
        );
    }

    #[test]
    fn test_describe_reports_fields_and_customs() {
        let mut registry = registry();
        registry.register_component(crate::ComponentInfo::of::<Gauge>());
        registry.register_type(type_info!(Gauge { value }));

        let outer = registry.describe(TypeId::of::<Outer>()).unwrap();
        assert_eq!(outer.name, "Outer");
        assert!(!outer.component);
        assert!(!outer.custom_serialize);
        let field_types: Vec<_> = outer.fields.iter().map(|f| f.type_name.as_str()).collect();
        assert_eq!(field_types, vec!["bool", "Inner", "f32"]);

        assert!(registry.describe(TypeId::of::<Gauge>()).unwrap().component);
        assert!(registry.describe(TypeId::of::<f32>()).unwrap().custom_serialize);
        assert!(registry.describe(TypeId::of::<Node>()).is_none());

        let names: Vec<_> = registry.describe_all().into_iter().map(|d| d.name).collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
    }

    #[derive(Debug, Clone, Default)]
    struct Gauge {
        value: u32,
    }

    impl engine_component::Component for Gauge {
        fn type_name() -> &'static str {
            "Gauge"
        }
    }

    #[test]
    #[should_panic(expected = "component `Gauge`")]
    fn test_double_component_registration_panics() {
        let mut registry = TypeRegistry::new();
        registry.register_component(crate::ComponentInfo::of::<Gauge>());
        registry.register_component(crate::ComponentInfo::of::<Gauge>());
    }

    #[test]
    fn test_component_unregister_then_reregister() {
        let mut registry = TypeRegistry::new();
        registry.register_component(crate::ComponentInfo::of::<Gauge>());
        assert!(registry.component_by_name("Gauge").is_some());
        assert!(registry.unregister_component(TypeId::of::<Gauge>()).is_some());
        assert!(registry.component_info(TypeId::of::<Gauge>()).is_none());
        registry.register_component(crate::ComponentInfo::of::<Gauge>());
        assert_eq!(registry.components().len(), 1);
    }

    impl crate::Script for Gauge {}

    #[test]
    #[should_panic(expected = "script `Gauge`")]
    fn test_double_script_registration_panics() {
        let mut registry = TypeRegistry::new();
        registry.register_script(crate::ScriptInfo::of::<Gauge>());
        registry.register_script(crate::ScriptInfo::of::<Gauge>());
    }

    #[test]
    fn test_script_unregister_then_reregister() {
        let mut registry = TypeRegistry::new();
        registry.register_script(crate::ScriptInfo::of::<Gauge>());
        assert!(!registry.is_empty());
        assert_eq!(registry.scripts()[0].name, "Gauge");
        assert!(registry.unregister_script(TypeId::of::<Gauge>()).is_some());
        assert!(registry.script_info(TypeId::of::<Gauge>()).is_none());
        assert!(registry.unregister_script(TypeId::of::<Gauge>()).is_none());
        assert!(registry.is_empty());
        registry.register_script(crate::ScriptInfo::of::<Gauge>());
        assert_eq!(registry.scripts().len(), 1);
    }

    #[test]
    fn test_describe_flags_scripts() {
        let mut registry = registry();
        registry.register_type(type_info!(Gauge { value }));
        registry.register_component(crate::ComponentInfo::of::<Gauge>());
        assert!(!registry.describe(TypeId::of::<Gauge>()).unwrap().script);
        registry.register_script(crate::ScriptInfo::of::<Gauge>());
        let desc = registry.describe(TypeId::of::<Gauge>()).unwrap();
        assert!(desc.component && desc.script);
    }

    #[derive(Debug, Clone, Default, PartialEq)]
    struct Squad(Vec<Entity>);

    #[derive(Debug, Clone, Default, PartialEq)]
    struct Roster {
        squad: Squad,
        leader: Entity,
    }

    #[test]
    fn test_custom_remap_rewrites_contents() {
        let mut registry = registry();
        registry.register_type(TypeInfo::new::<Squad>("Squad").with_remap(|value, map| {
            for entity in &mut downcast_mut::<Squad>(value).0 {
                *entity = map(*entity);
            }
        }));
        registry.register_type(type_info!(Roster { squad, leader }));

        let mut world = engine_component::World::new();
        let old = world.spawn();
        let kept = world.spawn();
        let new = world.spawn();
        let mut roster = Roster {
            squad: Squad(vec![old, kept]),
            leader: old,
        };
        let mut map = |e: Entity| if e == old { new } else { e };
        registry.remap_entities(TypeId::of::<Roster>(), &mut roster, &mut map);
        assert_eq!(roster.squad.0, vec![new, kept]);
        assert_eq!(roster.leader, new);
    }
}
