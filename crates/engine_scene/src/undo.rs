//! Component-level undo.
//!
//! Entries name their entity by UUID and their component by [`TypeId`], and
//! hold the component's state as a document node (or "absent"). Nothing is
//! kept by handle or reference, so entries survive any structural change to
//! the scene; an entry whose entity has since been destroyed is dropped when
//! reached.

use std::collections::VecDeque;

use engine_component::{Entity, TypeId};
use engine_reflect::{ComponentInfo, Deserializer, Serializer, TypeRegistry, Value};
use tracing::{debug, warn};

use crate::components::SceneTransformComponent;
use crate::scene::Scene;

/// Default number of entries kept.
pub const DEFAULT_UNDO_LIMIT: usize = 128;

/// One reversible change.
#[derive(Debug, Clone, PartialEq)]
pub enum UndoEntry {
    /// Component state before an edit. `None` means the component was not
    /// present.
    Component {
        uuid: u64,
        type_id: TypeId,
        snapshot: Option<Value>,
    },
    /// The entity was created; undoing destroys it.
    Created { uuid: u64 },
}

/// Bounded stack of [`UndoEntry`]s. The oldest entry is evicted first.
#[derive(Debug)]
pub struct UndoStack {
    entries: VecDeque<UndoEntry>,
    limit: usize,
}

impl UndoStack {
    /// # Panics
    ///
    /// Panics if `limit` is zero.
    #[must_use]
    pub fn new(limit: usize) -> Self {
        assert!(limit > 0, "undo limit must be positive");
        Self {
            entries: VecDeque::new(),
            limit,
        }
    }

    #[must_use]
    pub fn limit(&self) -> usize {
        self.limit
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    #[must_use]
    pub fn peek(&self) -> Option<&UndoEntry> {
        self.entries.back()
    }

    pub fn push(&mut self, entry: UndoEntry) {
        if self.entries.len() == self.limit {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    /// Current state of component `type_id` on `entity` as a document node,
    /// or `None` if absent.
    ///
    /// # Panics
    ///
    /// Panics if `type_id` is not a registered component.
    #[must_use]
    pub fn snapshot(
        registry: &TypeRegistry,
        scene: &Scene,
        type_id: TypeId,
        entity: Entity,
    ) -> Option<Value> {
        let info = component(registry, type_id);
        let value = (info.try_get_ref)(scene.world(), entity)?;
        let refs = scene.entity_refs();
        let mut ser = Serializer::new(registry).with_refs(&refs);
        ser.ser_erased("", type_id, value);
        Some(ser.into_value())
    }

    /// Record the current state of component `type_id` on `entity` before
    /// changing it. Call before adding, editing or removing the component.
    ///
    /// # Panics
    ///
    /// Panics if `type_id` is not a registered component.
    pub fn mark(
        &mut self,
        registry: &TypeRegistry,
        scene: &Scene,
        type_id: TypeId,
        entity: Entity,
    ) {
        let Some(uuid) = scene.uuid_of(entity) else {
            warn!(%entity, "cannot mark an entity without a uuid");
            return;
        };
        let snapshot = Self::snapshot(registry, scene, type_id, entity);
        self.push(UndoEntry::Component {
            uuid,
            type_id,
            snapshot,
        });
    }

    /// Record that `entity` was just created.
    pub fn mark_created(&mut self, scene: &Scene, entity: Entity) {
        match scene.uuid_of(entity) {
            Some(uuid) => self.push(UndoEntry::Created { uuid }),
            None => warn!(%entity, "cannot mark an entity without a uuid"),
        }
    }

    /// Revert the most recent entry. Returns `false` if the stack was empty
    /// or the entry could not be applied.
    pub fn undo(&mut self, registry: &TypeRegistry, scene: &mut Scene) -> bool {
        let Some(entry) = self.entries.pop_back() else {
            return false;
        };
        match entry {
            UndoEntry::Created { uuid } => match scene.entity_by_uuid(uuid) {
                Some(entity) => scene.destroy_immediate(entity),
                None => {
                    warn!(uuid, "undo target no longer exists");
                    false
                }
            },
            UndoEntry::Component {
                uuid,
                type_id,
                snapshot,
            } => {
                let Some(entity) = scene.entity_by_uuid(uuid) else {
                    warn!(uuid, "undo target no longer exists");
                    return false;
                };
                restore(registry, scene, entity, type_id, snapshot.as_ref())
            }
        }
    }
}

impl Default for UndoStack {
    fn default() -> Self {
        Self::new(DEFAULT_UNDO_LIMIT)
    }
}

fn component(registry: &TypeRegistry, type_id: TypeId) -> &ComponentInfo {
    match registry.component_info(type_id) {
        Some(info) => info,
        None => panic!("component {type_id} is not registered"),
    }
}

fn restore(
    registry: &TypeRegistry,
    scene: &mut Scene,
    entity: Entity,
    type_id: TypeId,
    snapshot: Option<&Value>,
) -> bool {
    let info = component(registry, type_id);
    let Some(node) = snapshot else {
        let removed = (info.remove)(scene.world_mut(), entity);
        debug!(%entity, component = info.name, "undo removed component");
        return removed;
    };
    let refs = scene.entity_refs();
    let de = Deserializer::new(registry, node).with_refs(&refs);
    let value = (info.get_or_add)(scene.world_mut(), entity);
    let complete = registry.deserialize(&de, "", type_id, value);
    if type_id == TypeId::of::<SceneTransformComponent>() {
        scene.link_hierarchy();
    }
    scene.notify_changed(registry, entity, type_id);
    debug!(%entity, component = info.name, complete, "undo restored component");
    true
}
