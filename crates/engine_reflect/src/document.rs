//! Structured document reader and writer.
//!
//! Documents are YAML trees held as [`serde_yaml::Value`]. A [`Serializer`]
//! builds one node at a time: `write(key, value)` inserts into the current
//! mapping, and the empty key `""` replaces the node itself so a single value
//! can be the whole document. A [`Deserializer`] is the read-only mirror,
//! borrowing a node out of a parsed tree.
//!
//! Both carry an optional [`EntityRefs`] table so entity handles can be
//! written as stable UUIDs and resolved back to live handles on load.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use engine_component::{Entity, TypeId};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_yaml::{Mapping, Value};
use tracing::warn;

use crate::error::DocumentError;
use crate::registry::TypeRegistry;

/// Two-way map between live entity handles and their persistent UUIDs.
#[derive(Debug, Clone, Default)]
pub struct EntityRefs {
    uuids: HashMap<Entity, u64>,
    entities: HashMap<u64, Entity>,
}

impl EntityRefs {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `entity` is persisted as `uuid`.
    pub fn insert(&mut self, entity: Entity, uuid: u64) {
        self.uuids.insert(entity, uuid);
        self.entities.insert(uuid, entity);
    }

    #[must_use]
    pub fn uuid_of(&self, entity: Entity) -> Option<u64> {
        self.uuids.get(&entity).copied()
    }

    #[must_use]
    pub fn entity_of(&self, uuid: u64) -> Option<Entity> {
        self.entities.get(&uuid).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.uuids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.uuids.is_empty()
    }
}

/// Builds a document node, driven by a [`TypeRegistry`].
pub struct Serializer<'a> {
    registry: &'a TypeRegistry,
    refs: Option<&'a EntityRefs>,
    node: Value,
}

impl<'a> Serializer<'a> {
    /// Start an empty (null) node.
    #[must_use]
    pub fn new(registry: &'a TypeRegistry) -> Self {
        Self {
            registry,
            refs: None,
            node: Value::Null,
        }
    }

    /// Resolve entity handles through `refs` while writing.
    #[must_use]
    pub fn with_refs(mut self, refs: &'a EntityRefs) -> Self {
        self.refs = Some(refs);
        self
    }

    #[must_use]
    pub fn registry(&self) -> &'a TypeRegistry {
        self.registry
    }

    #[must_use]
    pub fn refs(&self) -> Option<&'a EntityRefs> {
        self.refs
    }

    /// A fresh, empty node sharing this serializer's registry and refs.
    #[must_use]
    pub fn child(&self) -> Serializer<'a> {
        Serializer {
            registry: self.registry,
            refs: self.refs,
            node: Value::Null,
        }
    }

    /// Store `value` under `key`, or as the node itself if `key` is empty.
    ///
    /// Writing a key into a non-mapping node turns it into a mapping.
    pub fn write(&mut self, key: &str, value: Value) {
        if key.is_empty() {
            self.node = value;
            return;
        }
        if !self.node.is_mapping() {
            self.node = Value::Mapping(Mapping::new());
        }
        if let Value::Mapping(map) = &mut self.node {
            map.insert(Value::String(key.to_owned()), value);
        }
    }

    /// Store any `serde` value under `key`.
    pub fn write_serde<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) {
        match serde_yaml::to_value(value) {
            Ok(node) => self.write(key, node),
            Err(err) => {
                warn!(key, error = %err, "value cannot be represented in a document");
                self.write(key, Value::Null);
            }
        }
    }

    /// Serialize a registered type under `key`.
    pub fn ser<T: 'static>(&mut self, key: &str, value: &T) {
        self.ser_erased(key, TypeId::of::<T>(), value);
    }

    /// Serialize an erased value whose registered type is `type_id`.
    pub fn ser_erased(&mut self, key: &str, type_id: TypeId, value: &dyn std::any::Any) {
        let registry = self.registry;
        registry.serialize(self, key, type_id, value);
    }

    /// The node built so far.
    #[must_use]
    pub fn value(&self) -> &Value {
        &self.node
    }

    #[must_use]
    pub fn into_value(self) -> Value {
        self.node
    }

    #[must_use]
    pub fn into_document(self) -> Document {
        Document::from_value(self.node)
    }
}

/// Reads a document node, driven by a [`TypeRegistry`].
#[derive(Clone, Copy)]
pub struct Deserializer<'a> {
    registry: &'a TypeRegistry,
    refs: Option<&'a EntityRefs>,
    node: &'a Value,
}

impl<'a> Deserializer<'a> {
    #[must_use]
    pub fn new(registry: &'a TypeRegistry, node: &'a Value) -> Self {
        Self {
            registry,
            refs: None,
            node,
        }
    }

    /// Resolve entity UUIDs through `refs` while reading.
    #[must_use]
    pub fn with_refs(mut self, refs: &'a EntityRefs) -> Self {
        self.refs = Some(refs);
        self
    }

    #[must_use]
    pub fn registry(&self) -> &'a TypeRegistry {
        self.registry
    }

    #[must_use]
    pub fn refs(&self) -> Option<&'a EntityRefs> {
        self.refs
    }

    /// The node under `key`, or this node if `key` is empty.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&'a Value> {
        if key.is_empty() {
            return Some(self.node);
        }
        self.node.get(key)
    }

    /// A reader positioned on the node under `key`.
    #[must_use]
    pub fn child(&self, key: &str) -> Option<Deserializer<'a>> {
        self.get(key).map(|node| Deserializer {
            registry: self.registry,
            refs: self.refs,
            node,
        })
    }

    /// Read `key` through `serde`. Missing or malformed nodes log a warning
    /// and yield `None`.
    #[must_use]
    pub fn read_serde<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let Some(node) = self.get(key) else {
            warn!(key, "missing key in document");
            return None;
        };
        match serde_yaml::from_value(node.clone()) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(key, error = %err, "malformed value in document");
                None
            }
        }
    }

    /// Deserialize a registered type from `key` into `value`.
    pub fn deser<T: 'static>(&self, key: &str, value: &mut T) -> bool {
        self.registry
            .deserialize(self, key, TypeId::of::<T>(), value)
    }
}

/// A parsed document tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    root: Value,
}

impl Document {
    #[must_use]
    pub fn from_value(root: Value) -> Self {
        Self { root }
    }

    /// Parse YAML text.
    pub fn parse(text: &str) -> Result<Self, DocumentError> {
        Ok(Self::from_value(serde_yaml::from_str(text)?))
    }

    /// Read and parse a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, DocumentError> {
        let text = fs::read_to_string(path)?;
        Self::parse(&text)
    }

    #[must_use]
    pub fn root(&self) -> &Value {
        &self.root
    }

    /// A reader positioned on the root.
    #[must_use]
    pub fn reader<'a>(&'a self, registry: &'a TypeRegistry) -> Deserializer<'a> {
        Deserializer::new(registry, &self.root)
    }

    pub fn to_yaml_string(&self) -> Result<String, DocumentError> {
        Ok(serde_yaml::to_string(&self.root)?)
    }

    /// Write the document as YAML, replacing `path`.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), DocumentError> {
        fs::write(path, self.to_yaml_string()?)?;
        Ok(())
    }
}
