//! The editable scene.
//!
//! A [`Scene`] is a [`World`] plus a UUID index. Every entity it creates
//! carries a [`UuidComponent`], a [`TagComponent`] and a
//! [`SceneTransformComponent`]; the UUID is what documents, undo entries and
//! scene copies use to name an entity, since handles are only meaningful
//! inside one world.
//!
//! Entities form a hierarchy through the transform's `parent` and
//! `children` references. A local transform is relative to the parent;
//! [`Scene::world_transform`] composes the chain. Destroying, duplicating
//! and (optionally) enabling an entity applies to its whole subtree.
//!
//! Component access goes through [`Scene::world`] / [`Scene::world_mut`].
//! Removing the UUID component by hand breaks the index; use
//! [`Scene::destroy_immediate`] to delete entities, and
//! [`Scene::set_parent`] to change the hierarchy.

use std::collections::{HashMap, HashSet};

use engine_component::{Entity, TypeId, World};
use engine_math::{Mat4, Transform};
use engine_reflect::{ComponentHook, EntityRefs, Script, TypeRegistry};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::components::{DisabledComponent, SceneTransformComponent, TagComponent, UuidComponent};

#[derive(Debug, Default)]
pub struct Scene {
    world: World,
    uuids: HashMap<u64, Entity>,
}

impl Scene {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Mutable world access for component edits.
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Create a top-level entity with a fresh UUID, the given tag and a
    /// default transform.
    pub fn create(&mut self, name: &str) -> Entity {
        let uuid = self.fresh_uuid();
        self.create_with_uuid(name, uuid)
    }

    /// Create an entity as the last child of `parent`.
    pub fn create_child(&mut self, name: &str, parent: Entity) -> Entity {
        let child = self.create(name);
        self.set_parent(child, parent, false);
        child
    }

    /// Create an entity with a caller-chosen UUID.
    ///
    /// # Panics
    ///
    /// Panics if `uuid` already names an entity in this scene.
    pub fn create_with_uuid(&mut self, name: &str, uuid: u64) -> Entity {
        let entity = self.spawn_with_uuid(uuid);
        self.world.add(
            entity,
            TagComponent {
                tag: name.to_owned(),
            },
        );
        self.world.add(entity, SceneTransformComponent::default());
        entity
    }

    /// An entity carrying nothing but its UUID. Loading and copying fill in
    /// exactly the components the source had.
    pub(crate) fn spawn_with_uuid(&mut self, uuid: u64) -> Entity {
        assert!(
            !self.uuids.contains_key(&uuid),
            "uuid {uuid:#018x} is already used in this scene"
        );
        let entity = self.world.spawn();
        self.world.add(entity, UuidComponent { uuid });
        self.uuids.insert(uuid, entity);
        entity
    }

    /// Remove `entity`, its descendants and all their components. Returns
    /// `false` for a stale handle.
    pub fn destroy_immediate(&mut self, entity: Entity) -> bool {
        if !self.world.is_alive(entity) {
            return false;
        }
        self.detach(entity);
        for doomed in self.subtree(entity) {
            if let Some(uuid) = self.uuid_of(doomed) {
                self.uuids.remove(&uuid);
            }
            self.world.destroy(doomed);
        }
        debug!(%entity, "destroyed entity");
        true
    }

    #[must_use]
    pub fn is_valid(&self, entity: Entity) -> bool {
        self.world.is_alive(entity)
    }

    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.world.entity_count()
    }

    /// Live entities in slot order.
    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.world.entities()
    }

    #[must_use]
    pub fn entity_by_uuid(&self, uuid: u64) -> Option<Entity> {
        self.uuids.get(&uuid).copied()
    }

    #[must_use]
    pub fn uuid_of(&self, entity: Entity) -> Option<u64> {
        self.world.try_get::<UuidComponent>(entity).map(|c| c.uuid)
    }

    #[must_use]
    pub fn tag_of(&self, entity: Entity) -> Option<&str> {
        self.world
            .try_get::<TagComponent>(entity)
            .map(|c| c.tag.as_str())
    }

    /// First entity whose tag equals `name`.
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<Entity> {
        self.world
            .view::<(TagComponent,)>()
            .find(|(_, tag)| tag.tag == name)
            .map(|(entity, _)| entity)
    }

    /// UUID table for serializing or resolving entity references.
    #[must_use]
    pub fn entity_refs(&self) -> EntityRefs {
        let mut refs = EntityRefs::new();
        for (&uuid, &entity) in &self.uuids {
            refs.insert(entity, uuid);
        }
        refs
    }

    #[must_use]
    pub fn parent_of(&self, entity: Entity) -> Option<Entity> {
        self.world
            .try_get::<SceneTransformComponent>(entity)
            .map(|trans| trans.parent)
            .filter(|parent| !parent.is_null())
    }

    #[must_use]
    pub fn children_of(&self, entity: Entity) -> &[Entity] {
        self.world
            .try_get::<SceneTransformComponent>(entity)
            .map_or(&[], |trans| trans.children.as_slice())
    }

    /// Entities without a parent, in slot order.
    #[must_use]
    pub fn roots(&self) -> Vec<Entity> {
        self.entities()
            .filter(|&entity| self.parent_of(entity).is_none())
            .collect()
    }

    /// `entity` followed by all its descendants, depth first in sibling
    /// order. Empty for a stale handle.
    #[must_use]
    pub fn subtree(&self, entity: Entity) -> Vec<Entity> {
        let mut out = Vec::new();
        if !self.world.is_alive(entity) {
            return out;
        }
        let mut seen = HashSet::new();
        let mut stack = vec![entity];
        while let Some(next) = stack.pop() {
            if !seen.insert(next) || !self.world.is_alive(next) {
                continue;
            }
            out.push(next);
            stack.extend(self.children_of(next).iter().rev());
        }
        out
    }

    /// `true` if `ancestor` is a strict ancestor of `entity`.
    #[must_use]
    pub fn is_ancestor(&self, ancestor: Entity, entity: Entity) -> bool {
        let mut current = self.parent_of(entity);
        for _ in 0..self.entity_count() {
            match current {
                Some(parent) if parent == ancestor => return true,
                Some(parent) => current = self.parent_of(parent),
                None => return false,
            }
        }
        false
    }

    /// Move `child` to the end of `parent`'s children, or to the top level
    /// if `parent` is null. With `keep_world` the child's world placement is
    /// preserved by rewriting its local transform; otherwise the local
    /// transform is kept as is.
    ///
    /// Returns `false`, changing nothing, if either entity is dead or the
    /// move would create a cycle.
    pub fn set_parent(&mut self, child: Entity, parent: Entity, keep_world: bool) -> bool {
        if !self.world.is_alive(child) || (!parent.is_null() && !self.world.is_alive(parent)) {
            warn!(%child, %parent, "cannot reparent a dead entity");
            return false;
        }
        if parent == child || self.is_ancestor(child, parent) {
            warn!(%child, %parent, "reparenting would create a cycle");
            return false;
        }
        let world_before = self.world_transform(child);
        self.detach(child);
        self.world.get_or_add::<SceneTransformComponent>(child).parent = parent;
        if !parent.is_null() {
            self.world
                .get_or_add::<SceneTransformComponent>(parent)
                .children
                .push(child);
        }
        if keep_world {
            self.set_world_transform(child, world_before);
        }
        true
    }

    /// Placement of `entity` in scene space: its local transform composed
    /// with every ancestor's.
    #[must_use]
    pub fn world_transform(&self, entity: Entity) -> Transform {
        let Some(trans) = self.world.try_get::<SceneTransformComponent>(entity) else {
            return Transform::IDENTITY;
        };
        let mut result = trans.transform();
        let mut parent = trans.parent;
        for _ in 0..self.entity_count() {
            let Some(up) = self.world.try_get::<SceneTransformComponent>(parent) else {
                return result;
            };
            result = up.transform().compose(&result);
            parent = up.parent;
        }
        warn!(%entity, "hierarchy cycle while composing world transform");
        result
    }

    #[must_use]
    pub fn world_matrix(&self, entity: Entity) -> Mat4 {
        self.world_transform(entity).matrix()
    }

    /// Set the local transform of `entity` so that its world placement is
    /// `world`.
    pub fn set_world_transform(&mut self, entity: Entity, world: Transform) {
        let parent_world = match self.parent_of(entity) {
            Some(parent) => self.world_transform(parent),
            None => Transform::IDENTITY,
        };
        let local = parent_world.inverse().compose(&world);
        self.world
            .get_or_add::<SceneTransformComponent>(entity)
            .set_transform(local);
    }

    /// Clone `entity` and its subtree under fresh UUIDs, placing the copy
    /// right after the original among its siblings.
    ///
    /// Every registered component except the UUID is cloned; components the
    /// original lacks stay absent. Entity references to members of the
    /// subtree point at their copies, other references keep their targets.
    ///
    /// # Panics
    ///
    /// Panics if `entity` is not alive.
    pub fn duplicate(&mut self, registry: &TypeRegistry, entity: Entity) -> Entity {
        assert!(self.world.is_alive(entity), "cannot duplicate dead entity {entity}");
        let uuid_id = TypeId::of::<UuidComponent>();
        let sources = self.subtree(entity);
        let mut remap = HashMap::with_capacity(sources.len());
        for &src in &sources {
            let uuid = self.fresh_uuid();
            let copy = self.spawn_with_uuid(uuid);
            remap.insert(src, copy);
            for info in registry.components().iter().filter(|info| info.type_id != uuid_id) {
                let Some(value) = (info.try_get_ref)(&self.world, src) else {
                    continue;
                };
                let value = (info.clone_boxed)(value);
                (info.move_ctor)(&mut self.world, copy, value);
            }
        }

        let mut map = |old: Entity| remap.get(&old).copied().unwrap_or(old);
        for &copy in remap.values() {
            remap_components(registry, &mut self.world, copy, &mut map);
        }

        let root = remap[&entity];
        if let Some(parent) = self.parent_of(entity)
            && let Some(up) = self.world.try_get_mut::<SceneTransformComponent>(parent)
        {
            let siblings = &mut up.children;
            let at = siblings.iter().position(|&e| e == entity).map_or(siblings.len(), |i| i + 1);
            siblings.insert(at, root);
        }
        debug!(%entity, copy = %root, entities = sources.len(), "duplicated entity");
        root
    }

    /// A deep copy with the same UUIDs.
    ///
    /// Entity references, the hierarchy included, are remapped to the copy's
    /// handles; references to entities outside the scene become null.
    #[must_use]
    pub fn copy(&self, registry: &TypeRegistry) -> Scene {
        let mut dst = Scene::new();
        let mut remap = HashMap::new();
        let uuid_id = TypeId::of::<UuidComponent>();

        for entity in self.entities() {
            let Some(uuid) = self.uuid_of(entity) else {
                continue;
            };
            let copy = dst.spawn_with_uuid(uuid);
            remap.insert(entity, copy);
            for info in registry.components().iter().filter(|info| info.type_id != uuid_id) {
                if let Some(src) = (info.try_get_ref)(&self.world, entity) {
                    (info.copy_ctor)(&mut dst.world, copy, src);
                }
            }
        }

        let mut map = |old: Entity| {
            if old.is_null() {
                return old;
            }
            remap.get(&old).copied().unwrap_or_else(|| {
                warn!(entity = %old, "reference to an entity outside the scene");
                Entity::NULL
            })
        };
        let copies: Vec<Entity> = dst.entities().collect();
        for entity in copies {
            remap_components(registry, &mut dst.world, entity, &mut map);
        }
        dst
    }

    /// Make `parent` and `children` references agree after a load: children
    /// listed by a non-parent are dropped, and entities naming a parent that
    /// does not list them are appended to its children.
    pub(crate) fn link_hierarchy(&mut self) {
        let entities: Vec<Entity> = self.entities().collect();
        for &entity in &entities {
            let Some(trans) = self.world.try_get::<SceneTransformComponent>(entity) else {
                continue;
            };
            let stray: Vec<Entity> = trans
                .children
                .iter()
                .copied()
                .filter(|&child| self.parent_of(child) != Some(entity))
                .collect();
            if stray.is_empty() {
                continue;
            }
            warn!(%entity, count = stray.len(), "dropping children that name another parent");
            self.world
                .get_mut::<SceneTransformComponent>(entity)
                .children
                .retain(|child| !stray.contains(child));
        }
        for &entity in &entities {
            let Some(parent) = self.parent_of(entity) else {
                continue;
            };
            let valid = self.world.has::<SceneTransformComponent>(parent)
                && !self.is_ancestor(entity, parent);
            if !valid {
                warn!(%entity, %parent, "dropping invalid parent reference");
                self.world.get_mut::<SceneTransformComponent>(entity).parent = Entity::NULL;
                continue;
            }
            let siblings = &mut self.world.get_mut::<SceneTransformComponent>(parent).children;
            if !siblings.contains(&entity) {
                siblings.push(entity);
            }
        }
    }

    #[must_use]
    pub fn is_entity_enabled(&self, entity: Entity) -> bool {
        self.world.is_alive(entity) && !self.world.has::<DisabledComponent>(entity)
    }

    /// Enable or disable `entity`, and with `with_children` its whole
    /// subtree. Each entity whose state changes fires the matching hook of
    /// each present component and the matching method of each script.
    pub fn set_entity_enabled(
        &mut self,
        registry: &TypeRegistry,
        entity: Entity,
        enabled: bool,
        with_children: bool,
    ) {
        let targets = if with_children {
            self.subtree(entity)
        } else {
            vec![entity]
        };
        for target in targets {
            self.set_enabled_one(registry, target, enabled);
        }
    }

    fn set_enabled_one(&mut self, registry: &TypeRegistry, entity: Entity, enabled: bool) {
        if !self.world.is_alive(entity) || self.is_entity_enabled(entity) == enabled {
            return;
        }
        if enabled {
            self.world.remove::<DisabledComponent>(entity);
        } else {
            self.world.add(entity, DisabledComponent);
        }
        let hooks: Vec<ComponentHook> = registry
            .components()
            .iter()
            .filter(|info| (info.has)(&self.world, entity))
            .filter_map(|info| if enabled { info.on_enable } else { info.on_disable })
            .collect();
        for hook in hooks {
            hook(&mut self.world, entity);
        }
        for info in registry.scripts() {
            (info.scene_apply)(&mut self.world, &mut |owner: Entity, script: &mut dyn Script| {
                if owner != entity {
                    return;
                }
                if enabled {
                    script.on_enable();
                } else {
                    script.on_disable();
                }
            });
        }
        debug!(%entity, enabled, "entity enabled state changed");
    }

    /// Call `visit` for every registered script instance in the scene.
    pub fn for_each_script(
        &mut self,
        registry: &TypeRegistry,
        mut visit: impl FnMut(Entity, &mut dyn Script),
    ) {
        for info in registry.scripts() {
            (info.scene_apply)(&mut self.world, &mut visit);
        }
    }

    /// Advance every script on an enabled entity by `dt` seconds.
    pub fn update_scripts(&mut self, registry: &TypeRegistry, dt: f32) {
        let disabled: HashSet<Entity> = self
            .world
            .view::<(DisabledComponent,)>()
            .map(|(entity, _)| entity)
            .collect();
        self.for_each_script(registry, |entity, script| {
            if !disabled.contains(&entity) {
                script.on_update(dt);
            }
        });
    }

    /// Fire the `on_changed` hook of component `type_id` on `entity`.
    pub fn notify_changed(&mut self, registry: &TypeRegistry, entity: Entity, type_id: TypeId) {
        let hook = registry.component_info(type_id).and_then(|info| info.on_changed);
        if let Some(hook) = hook
            && self.world.has_type(entity, type_id)
        {
            hook(&mut self.world, entity);
        }
    }

    /// Remove `entity` from its parent's children and clear its parent.
    fn detach(&mut self, entity: Entity) {
        let Some(parent) = self.parent_of(entity) else {
            return;
        };
        if let Some(up) = self.world.try_get_mut::<SceneTransformComponent>(parent) {
            up.children.retain(|&child| child != entity);
        }
        self.world.get_mut::<SceneTransformComponent>(entity).parent = Entity::NULL;
    }

    fn fresh_uuid(&self) -> u64 {
        loop {
            let uuid = Uuid::new_v4().as_u64_pair().0;
            if uuid != 0 && uuid != u64::MAX && !self.uuids.contains_key(&uuid) {
                return uuid;
            }
        }
    }
}

fn remap_components(
    registry: &TypeRegistry,
    world: &mut World,
    entity: Entity,
    map: &mut dyn FnMut(Entity) -> Entity,
) {
    for info in registry.components() {
        if let Some(value) = (info.try_get)(world, entity) {
            registry.remap_entities(info.type_id, value, map);
        }
    }
}
