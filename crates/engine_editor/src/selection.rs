//! Ordered multi-selection of entities.

use engine_component::Entity;
use engine_scene::Scene;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    selected: Vec<Entity>,
}

impl Selection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `entity`, optionally replacing the current selection. Selecting
    /// an already selected entity moves it to the end.
    pub fn select(&mut self, entity: Entity, clear_previous: bool) {
        if clear_previous {
            self.selected.clear();
        } else {
            self.selected.retain(|&e| e != entity);
        }
        self.selected.push(entity);
    }

    /// Select `entity` if unselected, otherwise unselect it.
    pub fn toggle(&mut self, entity: Entity) {
        if self.contains(entity) {
            self.unselect(entity);
        } else {
            self.selected.push(entity);
        }
    }

    pub fn unselect(&mut self, entity: Entity) {
        self.selected.retain(|&e| e != entity);
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    #[must_use]
    pub fn contains(&self, entity: Entity) -> bool {
        self.selected.contains(&entity)
    }

    /// The primary selection, shown by the inspector.
    #[must_use]
    pub fn first(&self) -> Option<Entity> {
        self.selected.first().copied()
    }

    #[must_use]
    pub fn last(&self) -> Option<Entity> {
        self.selected.last().copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Entity> + '_ {
        self.selected.iter().copied()
    }

    /// Forget entities that no longer exist in `scene`.
    pub fn retain_valid(&mut self, scene: &Scene) {
        self.selected.retain(|&e| scene.is_valid(e));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_keeps_order() {
        let mut scene = Scene::new();
        let a = scene.create("a");
        let b = scene.create("b");
        let mut selection = Selection::new();
        selection.select(a, true);
        selection.select(b, false);
        assert_eq!(selection.first(), Some(a));
        assert_eq!(selection.last(), Some(b));

        selection.select(a, false);
        assert_eq!(selection.iter().collect::<Vec<_>>(), vec![b, a]);

        selection.select(b, true);
        assert_eq!(selection.len(), 1);
    }

    #[test]
    fn test_toggle() {
        let mut scene = Scene::new();
        let a = scene.create("a");
        let mut selection = Selection::new();
        selection.toggle(a);
        assert!(selection.contains(a));
        selection.toggle(a);
        assert!(selection.is_empty());
    }

    #[test]
    fn test_retain_valid_drops_destroyed() {
        let mut scene = Scene::new();
        let a = scene.create("a");
        let b = scene.create("b");
        let mut selection = Selection::new();
        selection.select(a, false);
        selection.select(b, false);
        scene.destroy_immediate(a);
        selection.retain_valid(&scene);
        assert_eq!(selection.first(), Some(b));
        selection.clear();
        assert_eq!(selection.first(), None);
    }
}
