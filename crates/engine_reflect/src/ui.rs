//! The editor UI seam.
//!
//! The registry never draws anything itself; it calls into a [`Ui`] supplied
//! by the caller. An immediate-mode toolkit implements the trait with real
//! widgets. [`HeadlessUi`] records every widget it is asked for and applies
//! scripted edits, which is what the tests and the command-line editor use.
//!
//! Every widget returns `true` when the user changed the value this frame.

use std::any::Any;
use std::collections::HashMap;

use tracing::warn;

use crate::type_info::downcast_mut;

/// Widget capability injected into the registry's UI walk.
pub trait Ui {
    fn checkbox(&mut self, label: &str, value: &mut bool) -> bool;
    fn input_int(&mut self, label: &str, value: &mut i64) -> bool;
    fn input_uint(&mut self, label: &str, value: &mut u64) -> bool;
    fn input_float(&mut self, label: &str, value: &mut f64) -> bool;
    fn input_text(&mut self, label: &str, value: &mut String) -> bool;
    /// Edit a small fixed-size float array (vectors, Euler angles, colors).
    fn input_floats(&mut self, label: &str, values: &mut [f32]) -> bool;
    fn slider_float(&mut self, label: &str, value: &mut f32, min: f32, max: f32) -> bool;
    /// Read-only label/value line.
    fn text(&mut self, label: &str, value: &str);
    /// Open a collapsible group. Returns `false` when collapsed, in which
    /// case the caller skips the contents and must not call
    /// [`Ui::end_group`].
    fn begin_group(&mut self, label: &str) -> bool;
    fn end_group(&mut self);
}

/// Field widget: an `f32` slider clamped to `[min, max]`.
///
/// For use with [`TypeInfo::with_field_ui`](crate::TypeInfo::with_field_ui).
pub fn slider_f32(
    min: f32,
    max: f32,
) -> impl Fn(&mut dyn Ui, &str, &mut dyn Any) -> bool + Send + Sync + 'static {
    move |ui, label, value| ui.slider_float(label, downcast_mut::<f32>(value), min, max)
}

/// One widget visited by a [`HeadlessUi`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiLine {
    /// Group nesting depth.
    pub depth: usize,
    pub label: String,
    /// Rendered value after any edit; empty for groups.
    pub value: String,
}

/// A [`Ui`] without a window.
///
/// Edits are keyed by widget path: the labels of the enclosing groups and
/// the widget joined with `/`, e.g. `SceneTransformComponent/position`.
/// Values are parsed according to the widget asked for: `true`/`false`,
/// integers, floats, raw text, or comma-separated float lists.
#[derive(Debug, Default)]
pub struct HeadlessUi {
    groups: Vec<String>,
    lines: Vec<UiLine>,
    edits: HashMap<String, String>,
    collapsed: Vec<String>,
}

impl HeadlessUi {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an edit for the widget at `path`.
    #[must_use]
    pub fn with_edit(mut self, path: &str, value: &str) -> Self {
        self.edit(path, value);
        self
    }

    pub fn edit(&mut self, path: &str, value: &str) {
        self.edits.insert(path.to_owned(), value.to_owned());
    }

    /// Report the group at `path` as collapsed.
    #[must_use]
    pub fn with_collapsed(mut self, path: &str) -> Self {
        self.collapsed.push(path.to_owned());
        self
    }

    #[must_use]
    pub fn lines(&self) -> &[UiLine] {
        &self.lines
    }

    /// Queued edits whose widget has not been visited.
    #[must_use]
    pub fn pending_edits(&self) -> Vec<&str> {
        let mut pending: Vec<_> = self.edits.keys().map(String::as_str).collect();
        pending.sort_unstable();
        pending
    }

    /// Indented text rendering of every visited widget.
    #[must_use]
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            out.push_str(&"  ".repeat(line.depth));
            out.push_str(&line.label);
            if !line.value.is_empty() {
                out.push_str(": ");
                out.push_str(&line.value);
            }
            out.push('\n');
        }
        out
    }

    /// Forget visited widgets, keeping pending edits.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.groups.clear();
    }

    fn path(&self, label: &str) -> String {
        let mut path = self.groups.join("/");
        if !path.is_empty() {
            path.push('/');
        }
        path.push_str(label);
        path
    }

    fn record(&mut self, label: &str, value: String) {
        self.lines.push(UiLine {
            depth: self.groups.len(),
            label: label.to_owned(),
            value,
        });
    }

    /// Take and parse the queued edit for `label`, if any.
    fn take_edit<T>(&mut self, label: &str, parse: impl FnOnce(&str) -> Option<T>) -> Option<T> {
        let path = self.path(label);
        let raw = self.edits.remove(&path)?;
        let parsed = parse(raw.trim());
        if parsed.is_none() {
            warn!(path, value = raw, "ignoring edit that does not fit the widget");
        }
        parsed
    }
}

fn format_floats(values: &[f32]) -> String {
    let items: Vec<_> = values.iter().map(f32::to_string).collect();
    format!("[{}]", items.join(", "))
}

impl Ui for HeadlessUi {
    fn checkbox(&mut self, label: &str, value: &mut bool) -> bool {
        let edit = self.take_edit(label, |raw| raw.parse().ok());
        let edited = edit.is_some_and(|new| new != *value);
        if let Some(new) = edit {
            *value = new;
        }
        self.record(label, value.to_string());
        edited
    }

    fn input_int(&mut self, label: &str, value: &mut i64) -> bool {
        let edit = self.take_edit(label, |raw| raw.parse().ok());
        let edited = edit.is_some_and(|new| new != *value);
        if let Some(new) = edit {
            *value = new;
        }
        self.record(label, value.to_string());
        edited
    }

    fn input_uint(&mut self, label: &str, value: &mut u64) -> bool {
        let edit = self.take_edit(label, |raw| raw.parse().ok());
        let edited = edit.is_some_and(|new| new != *value);
        if let Some(new) = edit {
            *value = new;
        }
        self.record(label, value.to_string());
        edited
    }

    fn input_float(&mut self, label: &str, value: &mut f64) -> bool {
        let edit = self.take_edit(label, |raw| raw.parse().ok());
        let edited = edit.is_some_and(|new| new != *value);
        if let Some(new) = edit {
            *value = new;
        }
        self.record(label, value.to_string());
        edited
    }

    fn input_text(&mut self, label: &str, value: &mut String) -> bool {
        let edit = self.take_edit(label, |raw| Some(raw.to_owned()));
        let edited = edit.as_ref().is_some_and(|new| new != value);
        if let Some(new) = edit {
            *value = new;
        }
        self.record(label, format!("{value:?}"));
        edited
    }

    fn input_floats(&mut self, label: &str, values: &mut [f32]) -> bool {
        let len = values.len();
        let edit = self.take_edit(label, |raw| {
            let parsed: Option<Vec<f32>> = raw
                .trim_start_matches('[')
                .trim_end_matches(']')
                .split(',')
                .map(|item| item.trim().parse().ok())
                .collect();
            parsed.filter(|items| items.len() == len)
        });
        let edited = edit.as_deref().is_some_and(|new| new != &*values);
        if let Some(new) = edit {
            values.copy_from_slice(&new);
        }
        self.record(label, format_floats(values));
        edited
    }

    fn slider_float(&mut self, label: &str, value: &mut f32, min: f32, max: f32) -> bool {
        let edit = self.take_edit(label, |raw| raw.parse::<f32>().ok().map(|v| v.clamp(min, max)));
        let edited = edit.is_some_and(|new| new != *value);
        if let Some(new) = edit {
            *value = new;
        }
        self.record(label, value.to_string());
        edited
    }

    fn text(&mut self, label: &str, value: &str) {
        self.record(label, value.to_owned());
    }

    fn begin_group(&mut self, label: &str) -> bool {
        let path = self.path(label);
        self.record(label, String::new());
        if self.collapsed.contains(&path) {
            return false;
        }
        self.groups.push(label.to_owned());
        true
    }

    fn end_group(&mut self) {
        self.groups.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edit_applies_inside_group() {
        let mut ui = HeadlessUi::new().with_edit("Light/intensity", "2.5");
        let mut intensity = 1.0f64;
        assert!(ui.begin_group("Light"));
        assert!(ui.input_float("intensity", &mut intensity));
        ui.end_group();
        assert_eq!(intensity, 2.5);
        assert!(ui.pending_edits().is_empty());
    }

    #[test]
    fn test_edit_outside_path_is_not_applied() {
        let mut ui = HeadlessUi::new().with_edit("intensity", "2.5");
        let mut intensity = 1.0f64;
        ui.begin_group("Light");
        assert!(!ui.input_float("intensity", &mut intensity));
        ui.end_group();
        assert_eq!(intensity, 1.0);
        assert_eq!(ui.pending_edits(), vec!["intensity"]);
    }

    #[test]
    fn test_unparsable_edit_is_ignored() {
        let mut ui = HeadlessUi::new().with_edit("position", "1, two, 3");
        let mut position = [0.0f32; 3];
        assert!(!ui.input_floats("position", &mut position));
        assert_eq!(position, [0.0; 3]);
    }

    #[test]
    fn test_float_list_edit() {
        let mut ui = HeadlessUi::new().with_edit("position", "[1, 2, 3]");
        let mut position = [0.0f32; 3];
        assert!(ui.input_floats("position", &mut position));
        assert_eq!(position, [1.0, 2.0, 3.0]);
        assert_eq!(ui.lines()[0].value, "[1, 2, 3]");
    }

    #[test]
    fn test_same_value_is_not_an_edit() {
        let mut ui = HeadlessUi::new().with_edit("opaque", "true");
        let mut opaque = true;
        assert!(!ui.checkbox("opaque", &mut opaque));
    }

    #[test]
    fn test_slider_clamps() {
        let mut ui = HeadlessUi::new().with_edit("roughness", "4");
        let mut roughness = 0.5f32;
        assert!(ui.slider_float("roughness", &mut roughness, 0.0, 1.0));
        assert_eq!(roughness, 1.0);
    }

    #[test]
    fn test_collapsed_group_reports_false() {
        let mut ui = HeadlessUi::new().with_collapsed("Tag");
        assert!(!ui.begin_group("Tag"));
        assert!(ui.begin_group("Other"));
        ui.end_group();
        assert_eq!(ui.lines().len(), 2);
    }

    #[test]
    fn test_render_text_indents_groups() {
        let mut ui = HeadlessUi::new();
        ui.begin_group("Tag");
        let mut tag = String::from("cube");
        ui.input_text("tag", &mut tag);
        ui.end_group();
        ui.text("uuid", "7");
        assert_eq!(ui.render_text(), "Tag\n  tag: \"cube\"\nuuid: 7\n");
    }

    #[test]
    fn test_slider_f32_widget() {
        let widget = slider_f32(0.0, 1.0);
        let mut ui = HeadlessUi::new().with_edit("metallic", "0.25");
        let mut metallic = 0.0f32;
        let edited = widget(&mut ui as &mut dyn Ui, "metallic", &mut metallic as &mut dyn Any);
        assert!(edited);
        assert_eq!(metallic, 0.25);
    }
}
