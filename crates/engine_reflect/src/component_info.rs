//! Type-erased component descriptors.
//!
//! A [`ComponentInfo`] lets code that only knows a [`TypeId`] (the inspector,
//! duplication, the scene serializer, undo) manipulate "the component of
//! that type on this entity". Every entry is a plain function pointer
//! monomorphized from a generic function at registration time by
//! [`ComponentInfo::of`], so nothing is hand-written per component type.
//!
//! Erased values are `&dyn Any`; handing a function a value of a different
//! type is a programmer error and panics at the downcast.

use std::any::Any;
use std::fmt;

use engine_component::{Component, Entity, TypeId, World};

use crate::type_info::{downcast_mut, downcast_ref};

/// Lifecycle hook fired by the editor or runtime.
pub type ComponentHook = fn(&mut World, Entity);

/// Erased operations on one component type.
#[derive(Clone)]
pub struct ComponentInfo {
    pub type_id: TypeId,
    /// Component name; the key used in scene documents.
    pub name: &'static str,
    pub has: fn(&World, Entity) -> bool,
    /// Attach a default-constructed component. Panics if already present.
    pub add: fn(&mut World, Entity),
    /// Detach the component; `false` if it was absent.
    pub remove: fn(&mut World, Entity) -> bool,
    /// Borrow the component. Panics if absent.
    pub get: fn(&mut World, Entity) -> &mut dyn Any,
    /// Borrow the component, or default-construct it first.
    pub get_or_add: fn(&mut World, Entity) -> &mut dyn Any,
    /// Borrow the component if present. Never mutates the world.
    pub try_get: fn(&mut World, Entity) -> Option<&mut dyn Any>,
    pub try_get_ref: fn(&World, Entity) -> Option<&dyn Any>,
    /// Copy-assign `src` into `dst`.
    pub duplicate: fn(&mut dyn Any, &dyn Any),
    /// Clone an erased value into a detached box.
    pub clone_boxed: fn(&dyn Any) -> Box<dyn Any>,
    /// Attach a clone of `src` to the entity.
    pub copy_ctor: fn(&mut World, Entity, &dyn Any),
    /// Attach `src` itself to the entity.
    pub move_ctor: fn(&mut World, Entity, Box<dyn Any>),
    pub on_enable: Option<ComponentHook>,
    pub on_disable: Option<ComponentHook>,
    pub on_changed: Option<ComponentHook>,
}

fn get_erased<T: Component>(world: &mut World, entity: Entity) -> &mut dyn Any {
    world.get_mut::<T>(entity)
}

fn get_or_add_erased<T: Component + Default>(world: &mut World, entity: Entity) -> &mut dyn Any {
    world.get_or_add::<T>(entity)
}

fn try_get_erased<T: Component>(world: &mut World, entity: Entity) -> Option<&mut dyn Any> {
    world
        .try_get_mut::<T>(entity)
        .map(|value| value as &mut dyn Any)
}

fn try_get_ref_erased<T: Component>(world: &World, entity: Entity) -> Option<&dyn Any> {
    world.try_get::<T>(entity).map(|value| value as &dyn Any)
}

fn move_erased<T: Component>(world: &mut World, entity: Entity, src: Box<dyn Any>) {
    match src.downcast::<T>() {
        Ok(value) => {
            world.add(entity, *value);
        }
        Err(_) => panic!("move_ctor for `{}` got a different type", T::type_name()),
    }
}

impl ComponentInfo {
    /// Generate the descriptor for `T`.
    #[must_use]
    pub fn of<T: Component + Clone + Default>() -> Self {
        Self {
            type_id: T::component_type_id(),
            name: T::type_name(),
            has: |world, entity| world.has::<T>(entity),
            add: |world, entity| {
                world.add(entity, T::default());
            },
            remove: |world, entity| world.remove::<T>(entity).is_some(),
            get: get_erased::<T>,
            get_or_add: get_or_add_erased::<T>,
            try_get: try_get_erased::<T>,
            try_get_ref: try_get_ref_erased::<T>,
            duplicate: |dst, src| downcast_mut::<T>(dst).clone_from(downcast_ref::<T>(src)),
            clone_boxed: |src| Box::new(downcast_ref::<T>(src).clone()) as Box<dyn Any>,
            copy_ctor: |world, entity, src| {
                world.add(entity, downcast_ref::<T>(src).clone());
            },
            move_ctor: move_erased::<T>,
            on_enable: None,
            on_disable: None,
            on_changed: None,
        }
    }

    #[must_use]
    pub fn with_on_enable(mut self, hook: ComponentHook) -> Self {
        self.on_enable = Some(hook);
        self
    }

    #[must_use]
    pub fn with_on_disable(mut self, hook: ComponentHook) -> Self {
        self.on_disable = Some(hook);
        self
    }

    #[must_use]
    pub fn with_on_changed(mut self, hook: ComponentHook) -> Self {
        self.on_changed = Some(hook);
        self
    }
}

impl fmt::Debug for ComponentInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentInfo")
            .field("type_id", &self.type_id)
            .field("name", &self.name)
            .field("on_enable", &self.on_enable.is_some())
            .field("on_disable", &self.on_disable.is_some())
            .field("on_changed", &self.on_changed.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Default, PartialEq)]
    struct Light {
        intensity: f32,
    }

    impl Component for Light {
        fn type_name() -> &'static str {
            "Light"
        }
    }

    #[derive(Debug, Clone, Default, PartialEq)]
    struct Counter(u32);

    impl Component for Counter {
        fn type_name() -> &'static str {
            "Counter"
        }
    }

    fn bump(world: &mut World, entity: Entity) {
        world.get_or_add::<Counter>(entity).0 += 1;
    }

    #[test]
    fn test_try_get_on_absent_is_none_and_pure() {
        let info = ComponentInfo::of::<Light>();
        let mut world = World::new();
        let e = world.spawn();
        assert!((info.try_get)(&mut world, e).is_none());
        assert!((info.try_get_ref)(&world, e).is_none());
        assert!(!(info.has)(&world, e));
        assert!(world.component_types(e).is_empty());
    }

    #[test]
    fn test_get_or_add_is_idempotent() {
        let info = ComponentInfo::of::<Light>();
        let mut world = World::new();
        let e = world.spawn();

        downcast_mut::<Light>((info.get_or_add)(&mut world, e)).intensity = 3.0;
        let second = downcast_mut::<Light>((info.get_or_add)(&mut world, e));
        assert_eq!(second.intensity, 3.0);
        assert_eq!(world.view::<(Light,)>().count(), 1);
    }

    #[test]
    fn test_add_get_remove() {
        let info = ComponentInfo::of::<Light>();
        let mut world = World::new();
        let e = world.spawn();

        (info.add)(&mut world, e);
        assert!((info.has)(&world, e));
        downcast_mut::<Light>((info.get)(&mut world, e)).intensity = 2.0;
        assert_eq!(world.get::<Light>(e).intensity, 2.0);

        assert!((info.remove)(&mut world, e));
        assert!(!(info.remove)(&mut world, e));
    }

    #[test]
    fn test_duplicate_copy_assigns() {
        let info = ComponentInfo::of::<Light>();
        let src = Light { intensity: 5.0 };
        let mut dst = Light::default();
        (info.duplicate)(&mut dst, &src);
        assert_eq!(dst, src);
    }

    #[test]
    fn test_copy_and_move_ctor() {
        let info = ComponentInfo::of::<Light>();
        let mut world = World::new();
        let a = world.spawn();
        let b = world.spawn();

        (info.copy_ctor)(&mut world, a, &Light { intensity: 1.0 });
        let boxed = (info.clone_boxed)((info.try_get_ref)(&world, a).unwrap());
        (info.move_ctor)(&mut world, b, boxed);

        assert_eq!(world.get::<Light>(b), &Light { intensity: 1.0 });
        assert_eq!(world.get::<Light>(a), world.get::<Light>(b));
    }

    #[test]
    #[should_panic(expected = "erased value is not a")]
    fn test_copy_ctor_type_mismatch_panics() {
        let info = ComponentInfo::of::<Light>();
        let mut world = World::new();
        let e = world.spawn();
        (info.copy_ctor)(&mut world, e, &Counter(1));
    }

    #[test]
    fn test_hooks_are_optional() {
        let info = ComponentInfo::of::<Light>();
        assert!(info.on_changed.is_none());

        let info = info.with_on_changed(bump).with_on_enable(bump);
        let mut world = World::new();
        let e = world.spawn();
        if let Some(hook) = info.on_changed {
            hook(&mut world, e);
        }
        if let Some(hook) = info.on_enable {
            hook(&mut world, e);
        }
        assert_eq!(world.get::<Counter>(e), &Counter(2));
        assert!(info.on_disable.is_none());
    }
}
