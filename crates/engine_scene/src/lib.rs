//! # engine_scene
//!
//! The editable scene on top of the component world and the reflection
//! registry.
//!
//! - [`Scene`] — entity creation with UUID, tag and transform; UUID and
//!   name lookup; the parent/child hierarchy and world-space transforms;
//!   subtree duplication, copying, enable/disable and script updates.
//! - [`components`] — the built-in component set.
//! - [`serialize`] — YAML scene files.
//! - [`UndoStack`] — component-level undo keyed by UUID.
//!
//! ## Startup
//!
//! Registration is one explicit call, made before any registry use:
//!
//! ```rust
//! use engine_reflect::TypeRegistry;
//! use engine_scene::Scene;
//!
//! let mut registry = TypeRegistry::new();
//! engine_scene::register_all(&mut registry);
//! registry.finalize().expect("complete registry");
//!
//! let mut scene = Scene::new();
//! let sun = scene.create("sun");
//! assert_eq!(scene.find_by_name("sun"), Some(sun));
//! ```

pub mod components;
pub mod error;
pub mod scene;
pub mod serialize;
pub mod undo;

use engine_reflect::{RegistrationGuards, TypeRegistry, register_basic_types};

pub use components::{
    DirectLightComponent, DisabledComponent, LightComponent, SceneTransformComponent,
    SimpleMaterialComponent, SkyComponent, TagComponent, UuidComponent, register_components,
};
pub use error::SceneError;
pub use scene::Scene;
pub use serialize::{
    entity_to_value, load_scene, save_scene, scene_from_document, scene_to_document,
};
pub use undo::{DEFAULT_UNDO_LIMIT, UndoEntry, UndoStack};

/// Register the basic types, the math types and the built-in components.
pub fn register_all(registry: &mut TypeRegistry) {
    register_basic_types(registry);
    engine_math::register_math_types(registry);
    register_components(registry);
}

/// Register everything [`register_all`] does in the process-wide registry.
///
/// The registrations last as long as the returned guards.
///
/// # Panics
///
/// Panics if any of the types is already registered globally.
pub fn register_global() -> RegistrationGuards {
    let mut registry = TypeRegistry::new();
    register_all(&mut registry);
    RegistrationGuards::adopt(registry)
}
