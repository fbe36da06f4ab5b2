//! Type-erased script descriptors.
//!
//! A script is a component with behaviour. It is registered as a component
//! like any other data, and additionally with a [`ScriptInfo`] whose
//! `scene_apply` visits every instance in a world through the [`Script`]
//! trait, so a runtime can drive all scripts without knowing their types.

use std::fmt;

use engine_component::{Component, Entity, TypeId, World};

/// Behaviour driven by the scene runtime.
pub trait Script {
    fn on_enable(&mut self) {}
    fn on_disable(&mut self) {}
    fn on_update(&mut self, _dt: f32) {}
}

/// Visit every instance of one script type in a world.
pub type SceneApplyFn = fn(&mut World, &mut dyn FnMut(Entity, &mut dyn Script));

/// Erased access to one script type.
#[derive(Clone, Copy)]
pub struct ScriptInfo {
    pub type_id: TypeId,
    pub name: &'static str,
    pub scene_apply: SceneApplyFn,
}

fn apply_erased<T: Component + Script>(
    world: &mut World,
    visit: &mut dyn FnMut(Entity, &mut dyn Script),
) {
    for (entity, script) in world.iter_mut::<T>() {
        visit(entity, script);
    }
}

impl ScriptInfo {
    /// Generate the descriptor for `T`.
    #[must_use]
    pub fn of<T: Component + Script>() -> Self {
        Self {
            type_id: T::component_type_id(),
            name: T::type_name(),
            scene_apply: apply_erased::<T>,
        }
    }
}

impl fmt::Debug for ScriptInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScriptInfo")
            .field("type_id", &self.type_id)
            .field("name", &self.name)
            .finish()
    }
}
