//! The editing session: one scene, its selection, undo history and config.
//!
//! [`Session::inspect`] is the inspector panel. It draws the primary
//! selection's name, enabled flag and UUID, then every registered component
//! the entity carries through [`TypeRegistry::render_ui`]. Each component is
//! snapshotted before it is drawn; when the widget walk reports an edit the
//! snapshot becomes an undo entry and the component's `on_changed` hook runs.

use engine_component::{Entity, TypeId};
use engine_reflect::{TypeRegistry, Ui};
use engine_scene::{
    DisabledComponent, Scene, SceneError, SceneTransformComponent, TagComponent, UndoEntry,
    UndoStack, UuidComponent, load_scene, save_scene,
};
use tracing::{debug, info, warn};

use crate::config::EditorConfig;
use crate::error::SessionError;
use crate::selection::Selection;

/// Components drawn by the inspector header instead of the component list.
fn is_managed(type_id: TypeId) -> bool {
    type_id == TypeId::of::<UuidComponent>()
        || type_id == TypeId::of::<TagComponent>()
        || type_id == TypeId::of::<DisabledComponent>()
}

#[derive(Debug)]
pub struct Session {
    registry: TypeRegistry,
    scene: Scene,
    selection: Selection,
    undo: UndoStack,
    config: EditorConfig,
}

impl Session {
    #[must_use]
    pub fn new(registry: TypeRegistry, scene: Scene, config: EditorConfig) -> Self {
        let undo = UndoStack::new(config.undo_capacity());
        Self {
            registry,
            scene,
            selection: Selection::new(),
            undo,
            config,
        }
    }

    /// Open the scene at `config.scene_path`, or start an empty one if it
    /// cannot be loaded.
    #[must_use]
    pub fn open(registry: TypeRegistry, config: EditorConfig) -> Self {
        let scene = load_scene(&registry, &config.scene_path).unwrap_or_else(|| {
            info!(path = %config.scene_path, "starting with an empty scene");
            Scene::new()
        });
        Self::new(registry, scene, config)
    }

    #[must_use]
    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    #[must_use]
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut Selection {
        &mut self.selection
    }

    #[must_use]
    pub fn undo_stack(&self) -> &UndoStack {
        &self.undo
    }

    #[must_use]
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Select the first entity tagged `name`, replacing the selection.
    pub fn select_by_name(&mut self, name: &str) -> Option<Entity> {
        let entity = self.scene.find_by_name(name)?;
        self.selection.select(entity, true);
        Some(entity)
    }

    fn primary(&self) -> Result<Entity, SessionError> {
        self.selection
            .first()
            .filter(|&entity| self.scene.is_valid(entity))
            .ok_or(SessionError::NoSelection)
    }

    /// Draw the inspector for the primary selection. Returns `true` if
    /// anything was edited.
    pub fn inspect(&mut self, ui: &mut dyn Ui) -> bool {
        let Ok(entity) = self.primary() else {
            ui.text("Inspector", "nothing selected");
            return false;
        };
        let Self {
            registry,
            scene,
            undo,
            ..
        } = self;
        let Some(uuid) = scene.uuid_of(entity) else {
            warn!(%entity, "selected entity has no uuid");
            return false;
        };
        let mut edited = false;

        let tag_id = TypeId::of::<TagComponent>();
        let before = UndoStack::snapshot(registry, scene, tag_id, entity);
        let tag = scene.world_mut().get_or_add::<TagComponent>(entity);
        if ui.input_text("Name", &mut tag.tag) {
            undo.push(UndoEntry::Component {
                uuid,
                type_id: tag_id,
                snapshot: before,
            });
            edited = true;
        }

        let mut enabled = scene.is_entity_enabled(entity);
        if ui.checkbox("Enabled", &mut enabled) {
            undo.mark(registry, scene, TypeId::of::<DisabledComponent>(), entity);
            scene.set_entity_enabled(registry, entity, enabled, false);
            edited = true;
        }

        ui.text("UUID", &format!("{uuid:#018x}"));

        for info in registry.components() {
            if is_managed(info.type_id) || !(info.has)(scene.world(), entity) {
                continue;
            }
            let before = UndoStack::snapshot(registry, scene, info.type_id, entity);
            let value = (info.get)(scene.world_mut(), entity);
            if registry.render_ui(ui, info.name, info.type_id, value) {
                undo.push(UndoEntry::Component {
                    uuid,
                    type_id: info.type_id,
                    snapshot: before,
                });
                scene.notify_changed(registry, entity, info.type_id);
                debug!(%entity, component = info.name, "component edited");
                edited = true;
            }
        }

        if edited
            && self.config.autosave
            && let Err(err) = self.save()
        {
            warn!(%err, "autosave failed");
        }
        edited
    }

    /// Registered components the primary selection lacks, in registration
    /// order. Empty without a selection.
    #[must_use]
    pub fn addable_components(&self) -> Vec<&'static str> {
        let Ok(entity) = self.primary() else {
            return Vec::new();
        };
        self.registry
            .components()
            .iter()
            .filter(|info| !is_managed(info.type_id) && !(info.has)(self.scene.world(), entity))
            .map(|info| info.name)
            .collect()
    }

    /// Attach a default-constructed component to the primary selection.
    pub fn add_component(&mut self, name: &str) -> Result<(), SessionError> {
        let entity = self.primary()?;
        let info = self
            .registry
            .component_by_name(name)
            .ok_or_else(|| SessionError::UnknownComponent(name.to_owned()))?;
        if is_managed(info.type_id) {
            return Err(SessionError::Protected(info.name));
        }
        if (info.has)(self.scene.world(), entity) {
            return Err(SessionError::AlreadyPresent {
                entity,
                component: info.name,
            });
        }
        self.undo.mark(&self.registry, &self.scene, info.type_id, entity);
        (info.add)(self.scene.world_mut(), entity);
        self.scene.notify_changed(&self.registry, entity, info.type_id);
        debug!(%entity, component = info.name, "component added");
        Ok(())
    }

    /// Detach a component from the primary selection. The transform of an
    /// entity inside a hierarchy stays attached.
    pub fn remove_component(&mut self, name: &str) -> Result<(), SessionError> {
        let entity = self.primary()?;
        let info = self
            .registry
            .component_by_name(name)
            .ok_or_else(|| SessionError::UnknownComponent(name.to_owned()))?;
        if is_managed(info.type_id) {
            return Err(SessionError::Protected(info.name));
        }
        if !(info.has)(self.scene.world(), entity) {
            return Err(SessionError::Missing {
                entity,
                component: info.name,
            });
        }
        let linked = self.scene.parent_of(entity).is_some()
            || !self.scene.children_of(entity).is_empty();
        if info.type_id == TypeId::of::<SceneTransformComponent>() && linked {
            return Err(SessionError::Linked { entity });
        }
        self.undo.mark(&self.registry, &self.scene, info.type_id, entity);
        (info.remove)(self.scene.world_mut(), entity);
        debug!(%entity, component = info.name, "component removed");
        Ok(())
    }

    /// Create a tagged entity and select it.
    pub fn create_entity(&mut self, name: &str) -> Entity {
        let entity = self.scene.create(name);
        self.undo.mark_created(&self.scene, entity);
        self.selection.select(entity, true);
        entity
    }

    /// Duplicate the primary selection and select the copy.
    pub fn duplicate_selected(&mut self) -> Result<Entity, SessionError> {
        let entity = self.primary()?;
        let copy = self.scene.duplicate(&self.registry, entity);
        self.undo.mark_created(&self.scene, copy);
        self.selection.select(copy, true);
        Ok(copy)
    }

    /// Revert the most recent change.
    pub fn undo(&mut self) -> bool {
        let undone = self.undo.undo(&self.registry, &mut self.scene);
        self.selection.retain_valid(&self.scene);
        undone
    }

    /// Write the scene to `config.scene_path`.
    pub fn save(&self) -> Result<(), SceneError> {
        save_scene(&self.registry, &self.scene, &self.config.scene_path)
    }
}
