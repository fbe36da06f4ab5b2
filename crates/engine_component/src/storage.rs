//! Sparse per-type component tables.
//!
//! Every component type gets its own [`ComponentTable`]: a sparse set that
//! maps an entity's slot index to a row in two dense, parallel vectors (the
//! owning entity handles and the component values). Lookups are O(1),
//! iteration walks the dense arrays, and removal is a swap-remove, so the
//! iteration order of a table changes after structural mutation.
//!
//! The [`World`](crate::World) stores tables type-erased behind
//! [`AnyTable`] and downcasts on typed access.

use std::any::Any;

use crate::component::{Component, TypeId};
use crate::entity::Entity;

/// Sentinel marking an empty sparse slot.
const EMPTY: u32 = u32::MAX;

/// Dense storage for one component type.
#[derive(Debug)]
pub struct ComponentTable<T> {
    /// Entity slot index → dense row (or [`EMPTY`]).
    sparse: Vec<u32>,
    /// Owning entity of each dense row. Stores the full handle so a stale
    /// generation never matches.
    entities: Vec<Entity>,
    /// Component values, parallel to `entities`.
    values: Vec<T>,
}

impl<T> ComponentTable<T> {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            sparse: Vec::new(),
            entities: Vec::new(),
            values: Vec::new(),
        }
    }

    fn row(&self, entity: Entity) -> Option<usize> {
        let row = *self.sparse.get(entity.index() as usize)?;
        if row == EMPTY {
            return None;
        }
        let row = row as usize;
        (self.entities[row] == entity).then_some(row)
    }

    /// Returns `true` if `entity` has a row in this table.
    #[must_use]
    pub fn contains(&self, entity: Entity) -> bool {
        self.row(entity).is_some()
    }

    /// Insert a value for `entity`.
    ///
    /// Returns the value back as `Err` if the entity already has a row.
    pub fn insert(&mut self, entity: Entity, value: T) -> Result<&mut T, T> {
        if self.contains(entity) {
            return Err(value);
        }
        let slot = entity.index() as usize;
        if slot >= self.sparse.len() {
            self.sparse.resize(slot + 1, EMPTY);
        }
        self.sparse[slot] = self.values.len() as u32;
        self.entities.push(entity);
        self.values.push(value);
        Ok(self.values.last_mut().unwrap_or_else(|| unreachable!()))
    }

    /// Get a shared reference to `entity`'s value.
    #[must_use]
    pub fn get(&self, entity: Entity) -> Option<&T> {
        self.row(entity).map(|row| &self.values[row])
    }

    /// Get a mutable reference to `entity`'s value.
    #[must_use]
    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut T> {
        self.row(entity).map(|row| &mut self.values[row])
    }

    /// Remove and return `entity`'s value.
    ///
    /// The last row is moved into the freed position.
    pub fn remove(&mut self, entity: Entity) -> Option<T> {
        let row = self.row(entity)?;
        self.sparse[entity.index() as usize] = EMPTY;
        self.entities.swap_remove(row);
        let value = self.values.swap_remove(row);
        if let Some(moved) = self.entities.get(row) {
            self.sparse[moved.index() as usize] = row as u32;
        }
        Some(value)
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Owning entities in dense order.
    #[must_use]
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Iterate `(entity, &value)` pairs in dense order.
    pub fn iter(&self) -> impl Iterator<Item = (Entity, &T)> {
        self.entities.iter().copied().zip(self.values.iter())
    }

    /// Iterate `(entity, &mut value)` pairs in dense order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Entity, &mut T)> {
        self.entities.iter().copied().zip(self.values.iter_mut())
    }
}

impl<T> Default for ComponentTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Type-erased view of a [`ComponentTable`], so the world can hold tables of
/// every component type in one map.
pub trait AnyTable: Send + Sync {
    /// The component type stored in this table.
    fn component_type_id(&self) -> TypeId;
    /// Human-readable component name.
    fn type_name(&self) -> &'static str;
    /// Returns `true` if `entity` has a row.
    fn contains(&self, entity: Entity) -> bool;
    /// Drop `entity`'s row if present. Returns `true` if a row was removed.
    fn remove_entity(&mut self, entity: Entity) -> bool;
    /// Owning entities in dense order.
    fn entities(&self) -> &[Entity];
    /// Number of rows.
    fn len(&self) -> usize;
    /// Returns `true` if the table has no rows.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Component> AnyTable for ComponentTable<T> {
    fn component_type_id(&self) -> TypeId {
        T::component_type_id()
    }

    fn type_name(&self) -> &'static str {
        T::type_name()
    }

    fn contains(&self, entity: Entity) -> bool {
        ComponentTable::contains(self, entity)
    }

    fn remove_entity(&mut self, entity: Entity) -> bool {
        self.remove(entity).is_some()
    }

    fn entities(&self) -> &[Entity] {
        ComponentTable::entities(self)
    }

    fn len(&self) -> usize {
        ComponentTable::len(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
