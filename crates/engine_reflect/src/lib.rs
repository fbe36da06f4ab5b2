//! # engine_reflect
//!
//! Runtime reflection for the scene editor.
//!
//! Types and components register a description once at startup; from then
//! on, code that only holds a [`TypeId`] and an erased `&dyn Any` can draw an
//! editor for the value, write it to a YAML document, read it back, and add,
//! copy, or remove it on an entity.
//!
//! - [`TypeInfo`] / [`TypeField`] — a type's ordered fields plus optional
//!   custom UI, serialize and deserialize functions.
//! - [`ComponentInfo`] — erased add/get/remove/duplicate operations and
//!   lifecycle hooks for one component type.
//! - [`ScriptInfo`] / [`Script`] — erased iteration over one script type.
//! - [`TypeRegistry`] — the maps plus the generic walks over them.
//! - [`Serializer`] / [`Deserializer`] / [`Document`] — the YAML document
//!   model.
//! - [`Ui`] — the widget seam, with [`HeadlessUi`] for tests and tools.
//! - [`global`] — the process-wide registry and its RAII guards.
//!
//! ## Startup
//!
//! ```rust
//! use engine_reflect::{Serializer, TypeId, TypeRegistry, register_basic_types, type_info};
//!
//! #[derive(Default)]
//! struct Settings {
//!     volume: f32,
//!     muted: bool,
//! }
//!
//! let mut registry = TypeRegistry::new();
//! register_basic_types(&mut registry);
//! registry.register_type(type_info!(Settings { volume, muted }));
//! registry.finalize().expect("complete registry");
//!
//! let mut ser = Serializer::new(&registry);
//! ser.ser("settings", &Settings { volume: 0.5, muted: false });
//! let yaml = ser.into_document().to_yaml_string().unwrap();
//! assert!(yaml.contains("volume: 0.5"));
//! ```

pub mod basic_types;
pub mod component_info;
pub mod document;
pub mod error;
pub mod global;
mod macros;
pub mod registry;
pub mod script_info;
pub mod type_info;
pub mod ui;

pub use basic_types::register_basic_types;
pub use component_info::{ComponentHook, ComponentInfo};
pub use document::{Deserializer, Document, EntityRefs, Serializer};
pub use error::{DocumentError, RegistryError};
pub use global::{
    ComponentRegisterGuard, RegistrationGuards, ScriptRegisterGuard, TypeRegisterGuard,
};
pub use registry::{FieldDescription, TypeDescription, TypeRegistry};
pub use script_info::{SceneApplyFn, Script, ScriptInfo};
pub use type_info::{
    DeserializeFn, FieldAccessor, RemapFn, SerializeFn, TypeField, TypeInfo, UiFn, downcast_mut,
    downcast_ref,
};
pub use ui::{HeadlessUi, Ui, UiLine, slider_f32};

pub use engine_component::{Entity, TypeId};
pub use serde_yaml::Value;
