//! Type descriptions: [`TypeInfo`] and its ordered [`TypeField`] list.
//!
//! A [`TypeInfo`] tells the registry how to walk a value it only sees as
//! `&dyn Any`. Composite types list their fields; each field carries a typed
//! accessor pair generated at registration time, so the generic traversal
//! never touches raw memory. Types whose document or UI form is not a plain
//! field decomposition (vectors, scalars, entity handles) install custom
//! functions instead, which always take precedence over the field walk.

use std::any::{Any, type_name};
use std::fmt;
use std::sync::Arc;

use engine_component::{Entity, TypeId};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::document::{Deserializer, Serializer};
use crate::ui::Ui;

/// Custom editor widget: `(ui, label, value) -> edited`.
pub type UiFn = Arc<dyn Fn(&mut dyn Ui, &str, &mut dyn Any) -> bool + Send + Sync>;

/// Custom writer: stores `value` under `name` in the serializer.
pub type SerializeFn = Arc<dyn Fn(&mut Serializer<'_>, &str, &dyn Any) + Send + Sync>;

/// Custom reader: loads `name` into `value`, returning `false` on a data
/// error (the value keeps whatever it held before).
pub type DeserializeFn = Arc<dyn Fn(&Deserializer<'_>, &str, &mut dyn Any) -> bool + Send + Sync>;

/// Custom entity rewrite for types that hold handles outside registered
/// fields, such as lists.
pub type RemapFn = Arc<dyn Fn(&mut dyn Any, &mut dyn FnMut(Entity) -> Entity) + Send + Sync>;

/// Downcast an erased value to `T`.
///
/// # Panics
///
/// Panics if the value is not a `T`. Erased values only ever reach a
/// function through the type ID they were registered under, so a mismatch
/// is a registration bug.
#[must_use]
pub fn downcast_ref<T: 'static>(value: &dyn Any) -> &T {
    match value.downcast_ref::<T>() {
        Some(value) => value,
        None => panic!("erased value is not a `{}`", type_name::<T>()),
    }
}

/// Mutable variant of [`downcast_ref`].
///
/// # Panics
///
/// Panics if the value is not a `T`.
#[must_use]
pub fn downcast_mut<T: 'static>(value: &mut dyn Any) -> &mut T {
    match value.downcast_mut::<T>() {
        Some(value) => value,
        None => panic!("erased value is not a `{}`", type_name::<T>()),
    }
}

/// Erased access from an owning value to one of its fields.
pub trait FieldAccessor: Send + Sync {
    fn get<'a>(&self, owner: &'a dyn Any) -> &'a dyn Any;
    fn get_mut<'a>(&self, owner: &'a mut dyn Any) -> &'a mut dyn Any;
}

/// [`FieldAccessor`] backed by a pair of plain projection functions.
pub struct TypedAccessor<O, F> {
    get: fn(&O) -> &F,
    get_mut: fn(&mut O) -> &mut F,
}

impl<O: 'static, F: 'static> FieldAccessor for TypedAccessor<O, F> {
    fn get<'a>(&self, owner: &'a dyn Any) -> &'a dyn Any {
        (self.get)(downcast_ref::<O>(owner))
    }

    fn get_mut<'a>(&self, owner: &'a mut dyn Any) -> &'a mut dyn Any {
        (self.get_mut)(downcast_mut::<O>(owner))
    }
}

/// One registered field of a composite type.
#[derive(Clone)]
pub struct TypeField {
    /// Key used in documents and label used in the editor.
    pub name: String,
    /// The field's own declared type.
    pub type_id: TypeId,
    /// Rust name of the field type, for diagnostics.
    pub type_name: &'static str,
    pub(crate) accessor: Arc<dyn FieldAccessor>,
    /// Per-field widget override; replaces the field type's own UI.
    pub ui: Option<UiFn>,
}

impl TypeField {
    /// Describe field `name` of `O` with type `F`.
    ///
    /// Usually generated by [`type_info!`](crate::type_info).
    #[must_use]
    pub fn new<O: 'static, F: 'static>(
        name: &str,
        get: fn(&O) -> &F,
        get_mut: fn(&mut O) -> &mut F,
    ) -> Self {
        Self {
            name: name.to_owned(),
            type_id: TypeId::of::<F>(),
            type_name: type_name::<F>(),
            accessor: Arc::new(TypedAccessor { get, get_mut }),
            ui: None,
        }
    }

    /// Borrow this field out of an erased owner.
    #[must_use]
    pub fn get<'a>(&self, owner: &'a dyn Any) -> &'a dyn Any {
        self.accessor.get(owner)
    }

    /// Mutably borrow this field out of an erased owner.
    pub fn get_mut<'a>(&self, owner: &'a mut dyn Any) -> &'a mut dyn Any {
        self.accessor.get_mut(owner)
    }
}

impl fmt::Debug for TypeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeField")
            .field("name", &self.name)
            .field("type_id", &self.type_id)
            .field("type_name", &self.type_name)
            .field("custom_ui", &self.ui.is_some())
            .finish()
    }
}

/// Registered description of a type.
#[derive(Clone)]
pub struct TypeInfo {
    /// Display name; also the document key when the type is a component.
    pub name: String,
    pub type_id: TypeId,
    /// `size_of` the described type.
    pub size: usize,
    /// Ordered fields walked by the generic UI and serializer.
    pub fields: Vec<TypeField>,
    pub ui: Option<UiFn>,
    pub serialize: Option<SerializeFn>,
    pub deserialize: Option<DeserializeFn>,
    pub remap: Option<RemapFn>,
}

impl TypeInfo {
    /// Start a description of `T` with no fields and no custom functions.
    #[must_use]
    pub fn new<T: 'static>(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            type_id: TypeId::of::<T>(),
            size: std::mem::size_of::<T>(),
            fields: Vec::new(),
            ui: None,
            serialize: None,
            deserialize: None,
            remap: None,
        }
    }

    /// Append a field.
    ///
    /// # Panics
    ///
    /// Panics if a field with the same name is already listed.
    #[must_use]
    pub fn with_field(mut self, field: TypeField) -> Self {
        assert!(
            self.field(&field.name).is_none(),
            "type `{}` lists field `{}` twice",
            self.name,
            field.name
        );
        self.fields.push(field);
        self
    }

    /// Install a custom editor widget for the whole type.
    #[must_use]
    pub fn with_ui<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut dyn Ui, &str, &mut dyn Any) -> bool + Send + Sync + 'static,
    {
        self.ui = Some(Arc::new(f));
        self
    }

    /// Install a custom writer.
    #[must_use]
    pub fn with_serialize<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut Serializer<'_>, &str, &dyn Any) + Send + Sync + 'static,
    {
        self.serialize = Some(Arc::new(f));
        self
    }

    /// Install a custom reader.
    #[must_use]
    pub fn with_deserialize<F>(mut self, f: F) -> Self
    where
        F: Fn(&Deserializer<'_>, &str, &mut dyn Any) -> bool + Send + Sync + 'static,
    {
        self.deserialize = Some(Arc::new(f));
        self
    }

    /// Install a custom entity rewrite used by
    /// [`TypeRegistry::remap_entities`](crate::TypeRegistry::remap_entities).
    #[must_use]
    pub fn with_remap<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut dyn Any, &mut dyn FnMut(Entity) -> Entity) + Send + Sync + 'static,
    {
        self.remap = Some(Arc::new(f));
        self
    }

    /// Read and write the whole value through its `serde` implementation
    /// instead of walking fields.
    ///
    /// # Panics
    ///
    /// Panics if `T` is not the type this info describes.
    #[must_use]
    pub fn with_serde<T>(self) -> Self
    where
        T: Serialize + DeserializeOwned + 'static,
    {
        assert_eq!(
            self.type_id,
            TypeId::of::<T>(),
            "with_serde::<{}> on type `{}`",
            type_name::<T>(),
            self.name
        );
        self.with_serialize(|ser, name, value| ser.write_serde(name, downcast_ref::<T>(value)))
            .with_deserialize(|de, name, value| match de.read_serde::<T>(name) {
                Some(loaded) => {
                    *downcast_mut::<T>(value) = loaded;
                    true
                }
                None => false,
            })
    }

    /// Override the widget of one listed field.
    ///
    /// # Panics
    ///
    /// Panics if no field is called `field`.
    #[must_use]
    pub fn with_field_ui<F>(mut self, field: &str, f: F) -> Self
    where
        F: Fn(&mut dyn Ui, &str, &mut dyn Any) -> bool + Send + Sync + 'static,
    {
        let owner = self.name.clone();
        match self.fields.iter_mut().find(|candidate| candidate.name == field) {
            Some(entry) => entry.ui = Some(Arc::new(f)),
            None => panic!("type `{owner}` has no field `{field}`"),
        }
        self
    }

    /// Look up a field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&TypeField> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// A type with a custom writer or no fields is a leaf of the type graph.
    #[must_use]
    pub fn is_simple_type(&self) -> bool {
        self.serialize.is_some() || self.fields.is_empty()
    }
}

impl fmt::Debug for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeInfo")
            .field("name", &self.name)
            .field("type_id", &self.type_id)
            .field("size", &self.size)
            .field("fields", &self.fields)
            .field("custom_ui", &self.ui.is_some())
            .field("custom_serialize", &self.serialize.is_some())
            .field("custom_deserialize", &self.deserialize.is_some())
            .field("custom_remap", &self.remap.is_some())
            .finish()
    }
}
