//! The process-wide registry and its registration guards.
//!
//! Most code should build a [`TypeRegistry`] value and pass it around. The
//! global instance exists for application startup: an explicit registration
//! call fills it through guards, and dropping the guards (in reverse order at
//! shutdown) empties it again.
//!
//! The registry is only ever mutated from the owning thread; the lock makes
//! the static sound, not concurrent. A poisoned lock (a registration
//! assertion fired while it was held) is recovered rather than propagated.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use engine_component::TypeId;
use once_cell::sync::Lazy;

use crate::component_info::ComponentInfo;
use crate::registry::TypeRegistry;
use crate::script_info::ScriptInfo;
use crate::type_info::TypeInfo;

static REGISTRY: Lazy<RwLock<TypeRegistry>> = Lazy::new(|| RwLock::new(TypeRegistry::new()));

/// Shared access to the global registry.
pub fn read() -> RwLockReadGuard<'static, TypeRegistry> {
    REGISTRY.read().unwrap_or_else(PoisonError::into_inner)
}

/// Exclusive access to the global registry.
pub fn write() -> RwLockWriteGuard<'static, TypeRegistry> {
    REGISTRY.write().unwrap_or_else(PoisonError::into_inner)
}

/// Keeps a type registered in the global registry until dropped.
#[must_use = "the type is unregistered as soon as the guard is dropped"]
#[derive(Debug)]
pub struct TypeRegisterGuard {
    id: TypeId,
}

impl TypeRegisterGuard {
    /// Register `info` globally.
    ///
    /// # Panics
    ///
    /// Panics if the type is already registered.
    pub fn new(info: TypeInfo) -> Self {
        let id = info.type_id;
        write().register_type(info);
        Self { id }
    }

    #[must_use]
    pub fn type_id(&self) -> TypeId {
        self.id
    }
}

impl Drop for TypeRegisterGuard {
    fn drop(&mut self) {
        write().unregister_type(self.id);
    }
}

/// Keeps a component registered in the global registry until dropped.
#[must_use = "the component is unregistered as soon as the guard is dropped"]
#[derive(Debug)]
pub struct ComponentRegisterGuard {
    id: TypeId,
}

impl ComponentRegisterGuard {
    /// Register `info` globally.
    ///
    /// # Panics
    ///
    /// Panics if the component is already registered.
    pub fn new(info: ComponentInfo) -> Self {
        let id = info.type_id;
        write().register_component(info);
        Self { id }
    }

    #[must_use]
    pub fn type_id(&self) -> TypeId {
        self.id
    }
}

impl Drop for ComponentRegisterGuard {
    fn drop(&mut self) {
        write().unregister_component(self.id);
    }
}

/// Keeps a script registered in the global registry until dropped.
#[must_use = "the script is unregistered as soon as the guard is dropped"]
#[derive(Debug)]
pub struct ScriptRegisterGuard {
    id: TypeId,
}

impl ScriptRegisterGuard {
    /// Register `info` globally.
    ///
    /// # Panics
    ///
    /// Panics if the script is already registered.
    pub fn new(info: ScriptInfo) -> Self {
        let id = info.type_id;
        write().register_script(info);
        Self { id }
    }

    #[must_use]
    pub fn type_id(&self) -> TypeId {
        self.id
    }
}

impl Drop for ScriptRegisterGuard {
    fn drop(&mut self) {
        write().unregister_script(self.id);
    }
}

/// Guards for a batch of registrations, released in reverse order.
#[must_use = "the registrations are undone as soon as the guards are dropped"]
#[derive(Debug, Default)]
pub struct RegistrationGuards {
    types: Vec<TypeRegisterGuard>,
    components: Vec<ComponentRegisterGuard>,
    scripts: Vec<ScriptRegisterGuard>,
}

impl RegistrationGuards {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register every type, component and script of `registry` globally.
    ///
    /// # Panics
    ///
    /// Panics if any of them is already registered globally.
    pub fn adopt(registry: TypeRegistry) -> Self {
        let mut guards = Self::new();
        let (types, components, scripts) = registry.into_parts();
        for info in types {
            guards.types.push(TypeRegisterGuard::new(info));
        }
        for info in components {
            guards.components.push(ComponentRegisterGuard::new(info));
        }
        for info in scripts {
            guards.scripts.push(ScriptRegisterGuard::new(info));
        }
        guards
    }

    pub fn push_type(&mut self, guard: TypeRegisterGuard) {
        self.types.push(guard);
    }

    pub fn push_component(&mut self, guard: ComponentRegisterGuard) {
        self.components.push(guard);
    }

    pub fn push_script(&mut self, guard: ScriptRegisterGuard) {
        self.scripts.push(guard);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len() + self.components.len() + self.scripts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Drop for RegistrationGuards {
    fn drop(&mut self) {
        while let Some(guard) = self.scripts.pop() {
            drop(guard);
        }
        while let Some(guard) = self.components.pop() {
            drop(guard);
        }
        while let Some(guard) = self.types.pop() {
            drop(guard);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::type_info;

    // Tests share the global instance with each other, so each uses its own
    // private types.

    #[derive(Debug, Clone, Default)]
    struct GuardedA {
        value: u8,
    }

    #[derive(Debug, Clone, Default)]
    struct GuardedB;

    impl engine_component::Component for GuardedB {
        fn type_name() -> &'static str {
            "GuardedB"
        }
    }

    #[derive(Debug, Clone, Default)]
    struct GuardedC;

    impl engine_component::Component for GuardedC {
        fn type_name() -> &'static str {
            "GuardedC"
        }
    }

    impl crate::Script for GuardedC {}

    #[test]
    fn test_type_guard_unregisters_on_drop() {
        let id = TypeId::of::<GuardedA>();
        {
            let guard = TypeRegisterGuard::new(type_info!(GuardedA { value }));
            assert_eq!(guard.type_id(), id);
            assert!(read().contains_type(id));
        }
        assert!(!read().contains_type(id));

        let _again = TypeRegisterGuard::new(type_info!(GuardedA { value }));
        assert!(read().contains_type(id));
    }

    #[test]
    fn test_component_guard_unregisters_on_drop() {
        let id = TypeId::of::<GuardedB>();
        let guard = ComponentRegisterGuard::new(ComponentInfo::of::<GuardedB>());
        assert!(read().component_info(id).is_some());
        drop(guard);
        assert!(read().component_info(id).is_none());
    }

    #[derive(Debug, Clone, Default)]
    struct GuardedScript;

    impl engine_component::Component for GuardedScript {
        fn type_name() -> &'static str {
            "GuardedScript"
        }
    }

    impl crate::Script for GuardedScript {}

    #[test]
    fn test_script_guard_unregisters_on_drop() {
        let id = TypeId::of::<GuardedScript>();
        let guard = ScriptRegisterGuard::new(ScriptInfo::of::<GuardedScript>());
        assert_eq!(guard.type_id(), id);
        assert!(read().script_info(id).is_some());
        drop(guard);
        assert!(read().script_info(id).is_none());
    }

    #[test]
    fn test_adopt_moves_registry_into_global() {
        let mut local = TypeRegistry::new();
        local.register_type(TypeInfo::new::<GuardedC>("GuardedC"));
        local.register_component(ComponentInfo::of::<GuardedC>());
        local.register_script(ScriptInfo::of::<GuardedC>());

        let guards = RegistrationGuards::adopt(local);
        assert_eq!(guards.len(), 3);
        assert!(read().script_info(TypeId::of::<GuardedC>()).is_some());
        assert!(read().component_by_name("GuardedC").is_some());
        assert!(read().type_by_name("GuardedC").is_some());

        drop(guards);
        assert!(read().component_by_name("GuardedC").is_none());
        assert!(read().type_by_name("GuardedC").is_none());
        assert!(read().script_info(TypeId::of::<GuardedC>()).is_none());
    }
}
