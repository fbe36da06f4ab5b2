//! Entity and component storage.
//!
//! The [`World`] owns the entity allocator and one sparse table per component
//! type. It is the only thing that creates or destroys entity rows; every
//! typed accessor checks the handle's generation, so a stale handle never
//! reaches data belonging to a newer entity in the same slot.

use std::collections::HashMap;
use std::fmt;

use tracing::debug;

use crate::component::{Component, TypeId};
use crate::entity::{Entity, EntityAllocator};
use crate::error::WorldError;
use crate::query::{View, ViewQuery};
use crate::storage::{AnyTable, ComponentTable};

/// Owner of all entities and their component tables.
pub struct World {
    /// Slot allocation and liveness.
    allocator: EntityAllocator,
    /// One type-erased table per component type ever added.
    tables: HashMap<TypeId, Box<dyn AnyTable>>,
}

impl World {
    /// Create a new empty world.
    #[must_use]
    pub fn new() -> Self {
        Self {
            allocator: EntityAllocator::new(),
            tables: HashMap::new(),
        }
    }

    /// Allocate a new entity with no components.
    pub fn spawn(&mut self) -> Entity {
        self.allocator.allocate()
    }

    /// Destroy `entity` and every component attached to it.
    ///
    /// Returns `false` if the handle was already stale.
    pub fn destroy(&mut self, entity: Entity) -> bool {
        if !self.allocator.is_alive(entity) {
            return false;
        }
        let removed = self
            .tables
            .values_mut()
            .map(|table| table.remove_entity(entity))
            .filter(|&removed| removed)
            .count();
        self.allocator.free(entity);
        debug!(%entity, components = removed, "destroyed entity");
        true
    }

    /// Returns `true` if `entity` is a live handle of this world.
    #[must_use]
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.allocator.is_alive(entity)
    }

    /// Returns the number of alive entities.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.allocator.alive_count()
    }

    /// Iterates over all alive entities in slot order.
    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.allocator.iter_alive()
    }

    /// Attach `value` to `entity`.
    ///
    /// # Panics
    ///
    /// Panics if the entity is not alive or already has a `T`.
    pub fn add<T: Component>(&mut self, entity: Entity, value: T) -> &mut T {
        match self.try_add(entity, value) {
            Ok(value) => value,
            Err(err) => panic!("World::add failed: {err}"),
        }
    }

    /// Attach `value` to `entity`, reporting misuse as an error instead of
    /// panicking.
    pub fn try_add<T: Component>(
        &mut self,
        entity: Entity,
        value: T,
    ) -> Result<&mut T, WorldError> {
        if !self.is_alive(entity) {
            return Err(WorldError::EntityNotAlive(entity));
        }
        self.table_mut::<T>()
            .insert(entity, value)
            .map_err(|_| WorldError::ComponentAlreadyPresent {
                entity,
                component: T::type_name(),
            })
    }

    /// Returns `true` if `entity` has a `T`.
    #[must_use]
    pub fn has<T: Component>(&self, entity: Entity) -> bool {
        self.has_type(entity, T::component_type_id())
    }

    /// Returns `true` if `entity` has the component identified by `type_id`.
    #[must_use]
    pub fn has_type(&self, entity: Entity, type_id: TypeId) -> bool {
        self.tables
            .get(&type_id)
            .is_some_and(|table| table.contains(entity))
    }

    /// Returns `entity`'s `T`, or `None` if absent or the handle is stale.
    #[must_use]
    pub fn try_get<T: Component>(&self, entity: Entity) -> Option<&T> {
        self.table::<T>()?.get(entity)
    }

    /// Mutable variant of [`World::try_get`].
    #[must_use]
    pub fn try_get_mut<T: Component>(&mut self, entity: Entity) -> Option<&mut T> {
        self.tables
            .get_mut(&T::component_type_id())?
            .as_any_mut()
            .downcast_mut::<ComponentTable<T>>()?
            .get_mut(entity)
    }

    /// Returns `entity`'s `T`.
    ///
    /// # Panics
    ///
    /// Panics if the entity lacks `T`.
    #[must_use]
    pub fn get<T: Component>(&self, entity: Entity) -> &T {
        match self.try_get::<T>(entity) {
            Some(value) => value,
            None => panic!("entity {entity} has no {}", T::type_name()),
        }
    }

    /// Mutable variant of [`World::get`].
    ///
    /// # Panics
    ///
    /// Panics if the entity lacks `T`.
    #[must_use]
    pub fn get_mut<T: Component>(&mut self, entity: Entity) -> &mut T {
        match self.try_get_mut::<T>(entity) {
            Some(value) => value,
            None => panic!("entity {entity} has no {}", T::type_name()),
        }
    }

    /// Returns `entity`'s `T`, default-constructing it first if absent.
    ///
    /// # Panics
    ///
    /// Panics if the entity is not alive.
    pub fn get_or_add<T: Component + Default>(&mut self, entity: Entity) -> &mut T {
        if !self.has::<T>(entity) {
            self.add(entity, T::default());
        }
        self.get_mut::<T>(entity)
    }

    /// Detach and return `entity`'s `T`.
    pub fn remove<T: Component>(&mut self, entity: Entity) -> Option<T> {
        self.tables
            .get_mut(&T::component_type_id())?
            .as_any_mut()
            .downcast_mut::<ComponentTable<T>>()?
            .remove(entity)
    }

    /// Type IDs of every component attached to `entity`.
    #[must_use]
    pub fn component_types(&self, entity: Entity) -> Vec<TypeId> {
        self.tables
            .iter()
            .filter(|(_, table)| table.contains(entity))
            .map(|(&id, _)| id)
            .collect()
    }

    /// Lazily iterate every entity that has all of the component types in `Q`.
    #[must_use]
    pub fn view<Q: ViewQuery>(&self) -> View<'_, Q> {
        View::new(self)
    }

    /// Iterate `(entity, &mut T)` for every entity with a `T`.
    pub fn iter_mut<T: Component>(&mut self) -> impl Iterator<Item = (Entity, &mut T)> {
        self.tables
            .get_mut(&T::component_type_id())
            .and_then(|table| table.as_any_mut().downcast_mut::<ComponentTable<T>>())
            .into_iter()
            .flat_map(|table| table.iter_mut())
    }

    /// Typed handle for chained per-entity access.
    ///
    /// # Panics
    ///
    /// Panics if the entity is not alive.
    pub fn entity_mut(&mut self, entity: Entity) -> EntityMut<'_> {
        assert!(self.is_alive(entity), "entity {entity} is not alive");
        EntityMut {
            world: self,
            entity,
        }
    }

    pub(crate) fn table_entities(&self, type_id: TypeId) -> Option<&[Entity]> {
        self.tables.get(&type_id).map(|table| table.entities())
    }

    fn table<T: Component>(&self) -> Option<&ComponentTable<T>> {
        self.tables
            .get(&T::component_type_id())?
            .as_any()
            .downcast_ref::<ComponentTable<T>>()
    }

    fn table_mut<T: Component>(&mut self) -> &mut ComponentTable<T> {
        let table = self
            .tables
            .entry(T::component_type_id())
            .or_insert_with(|| Box::new(ComponentTable::<T>::new()));
        match table.as_any_mut().downcast_mut::<ComponentTable<T>>() {
            Some(table) => table,
            None => panic!(
                "component table for {} holds a different type (TypeId collision?)",
                T::type_name()
            ),
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for World {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut tables: Vec<_> = self
            .tables
            .values()
            .map(|table| (table.type_name(), table.len()))
            .collect();
        tables.sort();
        f.debug_struct("World")
            .field("entities", &self.entity_count())
            .field("tables", &tables)
            .finish()
    }
}

/// A live entity paired with mutable access to its world.
pub struct EntityMut<'w> {
    world: &'w mut World,
    entity: Entity,
}

impl EntityMut<'_> {
    /// The wrapped handle.
    #[must_use]
    pub fn id(&self) -> Entity {
        self.entity
    }

    /// Attach a component and return `self` for chaining.
    pub fn with<T: Component>(self, value: T) -> Self {
        self.world.add(self.entity, value);
        self
    }

    pub fn add<T: Component>(&mut self, value: T) -> &mut T {
        self.world.add(self.entity, value)
    }

    #[must_use]
    pub fn has<T: Component>(&self) -> bool {
        self.world.has::<T>(self.entity)
    }

    #[must_use]
    pub fn try_get<T: Component>(&self) -> Option<&T> {
        self.world.try_get::<T>(self.entity)
    }

    #[must_use]
    pub fn get_mut<T: Component>(&mut self) -> &mut T {
        self.world.get_mut::<T>(self.entity)
    }

    pub fn remove<T: Component>(&mut self) -> Option<T> {
        self.world.remove::<T>(self.entity)
    }
}
