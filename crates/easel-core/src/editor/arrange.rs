//! Selection, z-order, deletion, alignment, locking, and the layers panel.

use super::Editor;
use crate::error::EditorResult;
use crate::events::EditorEvent;
use crate::scene::Scene;
use crate::shapes::{LockFlags, ObjectId, ObjectKey, SceneObject};
use kurbo::{Rect, Vec2};

/// Edge or center of the workspace to align to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    CenterHorizontal,
    Right,
    Top,
    CenterVertical,
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NudgeDirection {
    Up,
    Down,
    Left,
    Right,
}

impl NudgeDirection {
    fn unit(self) -> Vec2 {
        match self {
            NudgeDirection::Up => Vec2::new(0.0, -1.0),
            NudgeDirection::Down => Vec2::new(0.0, 1.0),
            NudgeDirection::Left => Vec2::new(-1.0, 0.0),
            NudgeDirection::Right => Vec2::new(1.0, 0.0),
        }
    }
}

/// One row of the layers panel.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerInfo {
    pub id: ObjectId,
    pub key: ObjectKey,
    pub name: String,
    pub type_name: &'static str,
    pub visible: bool,
    pub locked: bool,
    pub selected: bool,
}

/// Translate `object` by `delta`, dropping the components its locks forbid.
/// Returns false when nothing moved.
pub(super) fn move_respecting_locks(object: &mut SceneObject, delta: Vec2) -> bool {
    let dx = if object.locks.movement_x { 0.0 } else { delta.x };
    let dy = if object.locks.movement_y { 0.0 } else { delta.y };
    if dx == 0.0 && dy == 0.0 {
        return false;
    }
    object.frame.translate(Vec2::new(dx, dy));
    true
}

impl Editor {
    // --- selection ---

    /// Make `key` the sole selection.
    pub fn select(&mut self, key: ObjectKey) -> bool {
        self.select_keys([key])
    }

    pub fn select_by_id(&mut self, id: ObjectId) -> bool {
        match self.scene.find_by_id(id) {
            Some(key) => self.select(key),
            None => false,
        }
    }

    /// Replace the selection with `keys`. The workspace and unknown keys are
    /// skipped; an empty list clears the selection.
    pub fn select_many(&mut self, keys: &[ObjectKey]) -> bool {
        self.select_keys(keys.iter().copied())
    }

    /// Add `key` to the selection, or take it out if already selected.
    pub fn toggle_in_selection(&mut self, key: ObjectKey) -> bool {
        let mut keys = self.selection.keys().to_vec();
        if self.selection.contains(key) {
            keys.retain(|k| *k != key);
        } else if self.scene.get(key).is_some_and(|o| !o.is_workspace()) {
            keys.push(key);
        } else {
            return false;
        }
        self.select_keys(keys)
    }

    /// Marquee selection: every visible, selectable object whose bounds
    /// intersect `rect` (object space).
    pub fn select_in_rect(&mut self, rect: Rect) -> bool {
        let keys = self.scene.objects_in_rect(rect);
        self.select_keys(keys)
    }

    /// Select every visible, selectable object.
    pub fn select_all(&mut self) -> bool {
        let keys: Vec<ObjectKey> = self
            .scene
            .content()
            .filter(|o| o.visible && o.interaction.selectable)
            .map(SceneObject::key)
            .collect();
        self.select_keys(keys)
    }

    // --- z-order ---

    fn reorder_selection(&mut self, op: fn(&mut Scene, &[ObjectKey]) -> bool) -> EditorResult<bool> {
        let keys = self.selection.keys().to_vec();
        if keys.is_empty() {
            return Ok(false);
        }
        let changed = op(&mut self.scene, &keys);
        if changed {
            for key in keys {
                self.notify(EditorEvent::ObjectModified(key));
            }
        }
        self.commit_if(changed)
    }

    pub fn bring_to_front(&mut self) -> EditorResult<bool> {
        self.reorder_selection(Scene::bring_to_front)
    }

    pub fn bring_forward(&mut self) -> EditorResult<bool> {
        self.reorder_selection(Scene::bring_forward)
    }

    pub fn send_backwards(&mut self) -> EditorResult<bool> {
        self.reorder_selection(Scene::send_backward)
    }

    pub fn send_to_back(&mut self) -> EditorResult<bool> {
        self.reorder_selection(Scene::send_to_back)
    }

    // --- deletion ---

    /// Remove the selected objects. Returns how many were removed.
    pub fn delete(&mut self) -> EditorResult<usize> {
        let keys = self.selection.keys().to_vec();
        let mut removed = 0;
        for key in keys {
            if self.scene.remove(key).is_some() {
                removed += 1;
                self.notify(EditorEvent::ObjectRemoved(key));
            }
        }
        self.clear_selection();
        if removed > 0 {
            log::debug!("Deleted {removed} object(s)");
            self.commit()?;
        }
        Ok(removed)
    }

    // --- placement ---

    /// Line each selected object up with a workspace edge or center line.
    pub fn align_to_workspace(&mut self, alignment: Alignment) -> EditorResult<bool> {
        let Some(ws) = self.scene.workspace_rect() else {
            return Ok(false);
        };
        let changed = self.update_selected(|object| {
            let b = object.bounds();
            let delta = match alignment {
                Alignment::Left => Vec2::new(ws.x0 - b.x0, 0.0),
                Alignment::CenterHorizontal => Vec2::new(ws.center().x - b.center().x, 0.0),
                Alignment::Right => Vec2::new(ws.x1 - b.x1, 0.0),
                Alignment::Top => Vec2::new(0.0, ws.y0 - b.y0),
                Alignment::CenterVertical => Vec2::new(0.0, ws.center().y - b.center().y),
                Alignment::Bottom => Vec2::new(0.0, ws.y1 - b.y1),
            };
            move_respecting_locks(object, delta)
        });
        self.commit_if(changed)
    }

    /// Move the selection by the nudge step (`fast` uses the larger step).
    pub fn nudge(&mut self, direction: NudgeDirection, fast: bool) -> EditorResult<bool> {
        let step = if fast {
            self.config.fast_nudge_step
        } else {
            self.config.nudge_step
        };
        let delta = direction.unit() * step;
        let changed = self.update_selected(|object| move_respecting_locks(object, delta));
        self.commit_if(changed)
    }

    /// Lock every selected object, or unlock them all if all are locked.
    pub fn toggle_lock(&mut self) -> EditorResult<bool> {
        let all_locked = self
            .selection
            .objects(&self.scene)
            .all(|o| o.locks.is_locked());
        let changed = self.update_selected(|object| {
            object.locks = if all_locked {
                LockFlags::default()
            } else {
                LockFlags::all()
            };
            object.interaction.has_controls = all_locked;
            true
        });
        self.commit_if(changed)
    }

    // --- layers panel ---

    /// Content objects, top-most first. Ids are assigned on first listing.
    pub fn layers(&mut self) -> Vec<LayerInfo> {
        let keys: Vec<ObjectKey> = self.scene.content().map(SceneObject::key).collect();
        let mut layers = Vec::with_capacity(keys.len());
        for key in keys.into_iter().rev() {
            let Some(id) = self.scene.ensure_id(key) else {
                continue;
            };
            if let Some(object) = self.scene.get(key) {
                layers.push(LayerInfo {
                    id,
                    key,
                    name: object.display_name().to_string(),
                    type_name: object.type_name(),
                    visible: object.visible,
                    locked: object.locks.is_locked(),
                    selected: self.selection.contains(key),
                });
            }
        }
        layers
    }

    /// Show or hide a layer. Hiding also deselects it.
    pub fn toggle_visibility(&mut self, id: ObjectId) -> EditorResult<bool> {
        let Some(key) = self.scene.find_by_id(id) else {
            return Ok(false);
        };
        let Some(object) = self.scene.get_mut(key) else {
            return Ok(false);
        };
        object.visible = !object.visible;
        let hidden = !object.visible;
        self.notify(EditorEvent::ObjectModified(key));
        if hidden && self.selection.contains(key) {
            let rest: Vec<ObjectKey> = self
                .selection
                .keys()
                .iter()
                .copied()
                .filter(|k| *k != key)
                .collect();
            self.select_keys(rest);
        }
        self.commit()?;
        Ok(true)
    }

    /// Set a layer's display name. A blank name restores the default label.
    pub fn rename(&mut self, id: ObjectId, name: &str) -> EditorResult<bool> {
        let Some(key) = self.scene.find_by_id(id) else {
            return Ok(false);
        };
        let name = name.trim();
        let custom_name = (!name.is_empty()).then(|| name.to_string());
        let Some(object) = self.scene.get_mut(key) else {
            return Ok(false);
        };
        if object.custom_name == custom_name {
            return Ok(false);
        }
        object.custom_name = custom_name;
        self.notify(EditorEvent::ObjectModified(key));
        self.commit()?;
        Ok(true)
    }

    pub fn delete_by_id(&mut self, id: ObjectId) -> EditorResult<bool> {
        let Some(key) = self.scene.find_by_id(id) else {
            return Ok(false);
        };
        if self.scene.remove(key).is_none() {
            return Ok(false);
        }
        self.notify(EditorEvent::ObjectRemoved(key));
        if self.selection.contains(key) {
            let rest: Vec<ObjectKey> = self
                .selection
                .keys()
                .iter()
                .copied()
                .filter(|k| *k != key)
                .collect();
            self.select_keys(rest);
        }
        self.commit()?;
        Ok(true)
    }

    /// Reorder from a layers-panel order (top-most first). Unknown ids are
    /// ignored; unlisted layers stay on top.
    pub fn reorder_layers(&mut self, ids: &[ObjectId]) -> EditorResult<bool> {
        let order: Vec<ObjectKey> = ids
            .iter()
            .rev()
            .filter_map(|id| self.scene.find_by_id(*id))
            .collect();
        let changed = self.scene.reorder(&order);
        self.commit_if(changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::tests::editor;
    use crate::shapes::ShapeKind;

    fn keys_back_to_front(editor: &Editor) -> Vec<ObjectKey> {
        editor.scene().content().map(SceneObject::key).collect()
    }

    #[test]
    fn test_bring_to_front_keeps_workspace_first() {
        let mut editor = editor();
        let a = editor.add_shape(ShapeKind::Rectangle, None).unwrap();
        let b = editor.add_shape(ShapeKind::Circle, None).unwrap();
        let c = editor.add_shape(ShapeKind::Star, None).unwrap();
        editor.select(a);
        assert!(editor.bring_to_front().unwrap());

        let objects = editor.scene().objects();
        assert!(objects[0].is_workspace());
        assert_eq!(objects.last().map(SceneObject::key), Some(a));
        assert_eq!(keys_back_to_front(&editor), vec![b, c, a]);
    }

    #[test]
    fn test_send_to_back_stays_above_workspace() {
        let mut editor = editor();
        let a = editor.add_shape(ShapeKind::Rectangle, None).unwrap();
        let b = editor.add_shape(ShapeKind::Circle, None).unwrap();
        assert!(editor.send_to_back().unwrap());
        assert!(editor.scene().objects()[0].is_workspace());
        assert_eq!(keys_back_to_front(&editor), vec![b, a]);
        assert!(!editor.send_to_back().unwrap());
    }

    #[test]
    fn test_forward_and_backwards() {
        let mut editor = editor();
        let a = editor.add_shape(ShapeKind::Rectangle, None).unwrap();
        let b = editor.add_shape(ShapeKind::Circle, None).unwrap();
        editor.select(a);
        assert!(editor.bring_forward().unwrap());
        assert_eq!(keys_back_to_front(&editor), vec![b, a]);
        assert!(editor.send_backwards().unwrap());
        assert_eq!(keys_back_to_front(&editor), vec![a, b]);
    }

    #[test]
    fn test_reorder_with_empty_selection_is_noop() {
        let mut editor = editor();
        editor.add_shape(ShapeKind::Rectangle, None).unwrap();
        editor.clear_selection();
        let before = editor.history().len();
        assert!(!editor.bring_to_front().unwrap());
        assert_eq!(editor.history().len(), before);
    }

    #[test]
    fn test_delete_clears_selection_and_snapshots() {
        let mut editor = editor();
        editor.add_shape(ShapeKind::Rectangle, None).unwrap();
        editor.add_shape(ShapeKind::Circle, None).unwrap();
        editor.select_all();
        let before = editor.history().len();
        assert_eq!(editor.delete().unwrap(), 2);
        assert!(editor.selection().is_empty());
        assert!(editor.scene().is_empty());
        assert_eq!(editor.history().len(), before + 1);
        assert_eq!(editor.delete().unwrap(), 0);
        assert_eq!(editor.history().len(), before + 1);
    }

    #[test]
    fn test_workspace_cannot_be_selected() {
        let mut editor = editor();
        let workspace = editor.scene().workspace().unwrap().key();
        assert!(!editor.select(workspace));
        assert!(editor.selection().is_empty());
    }

    #[test]
    fn test_align_to_workspace() {
        let mut editor = editor();
        let key = editor.add_shape(ShapeKind::Rectangle, None).unwrap();
        editor.align_to_workspace(Alignment::Left).unwrap();
        editor.align_to_workspace(Alignment::Bottom).unwrap();
        let bounds = editor.scene().get(key).unwrap().bounds();
        assert_eq!(bounds.x0, 0.0);
        assert_eq!(bounds.y1, 900.0);

        editor.align_to_workspace(Alignment::CenterHorizontal).unwrap();
        assert_eq!(editor.scene().get(key).unwrap().bounds().center().x, 450.0);
    }

    #[test]
    fn test_locked_objects_do_not_move() {
        let mut editor = editor();
        let key = editor.add_shape(ShapeKind::Rectangle, None).unwrap();
        assert!(editor.toggle_lock().unwrap());
        let frame = editor.scene().get(key).unwrap().frame;
        assert!(!editor.nudge(NudgeDirection::Left, false).unwrap());
        assert!(!editor.align_to_workspace(Alignment::Top).unwrap());
        assert_eq!(editor.scene().get(key).unwrap().frame, frame);

        assert!(editor.toggle_lock().unwrap());
        assert!(!editor.scene().get(key).unwrap().locks.is_locked());
    }

    #[test]
    fn test_nudge_steps() {
        let mut editor = editor();
        let key = editor.add_shape(ShapeKind::Rectangle, None).unwrap();
        let left = editor.scene().get(key).unwrap().frame.left;
        editor.nudge(NudgeDirection::Right, false).unwrap();
        editor.nudge(NudgeDirection::Right, true).unwrap();
        assert_eq!(editor.scene().get(key).unwrap().frame.left, left + 11.0);
    }

    #[test]
    fn test_layers_top_first_with_lazy_ids() {
        let mut editor = editor();
        let a = editor.add_shape(ShapeKind::Rectangle, None).unwrap();
        let b = editor.add_text("Label", None).unwrap();
        assert!(editor.scene().get(a).unwrap().id().is_none());

        let layers = editor.layers();
        assert_eq!(layers.len(), 2);
        assert_eq!(layers[0].key, b);
        assert_eq!(layers[0].type_name, "Text");
        assert!(layers[0].selected);
        assert_eq!(layers[1].key, a);
        assert_eq!(editor.scene().get(a).unwrap().id(), Some(layers[1].id));
        // Ids are stable across listings.
        assert_eq!(editor.layers()[1].id, layers[1].id);
    }

    #[test]
    fn test_layer_operations() {
        let mut editor = editor();
        let a = editor.add_shape(ShapeKind::Rectangle, None).unwrap();
        let b = editor.add_shape(ShapeKind::Circle, None).unwrap();
        let layers = editor.layers();
        let (id_b, id_a) = (layers[0].id, layers[1].id);

        assert!(editor.rename(id_a, "Background").unwrap());
        assert_eq!(editor.layers()[1].name, "Background");
        assert!(editor.rename(id_a, "  ").unwrap());
        assert_eq!(editor.layers()[1].name, "Rectangle");

        assert!(editor.toggle_visibility(id_b).unwrap());
        assert!(!editor.selection().contains(b));
        assert!(!editor.scene().get(b).unwrap().visible);

        assert!(editor.reorder_layers(&[id_a, id_b]).unwrap());
        assert_eq!(keys_back_to_front(&editor), vec![b, a]);

        assert!(editor.select_by_id(id_a));
        assert!(editor.delete_by_id(id_a).unwrap());
        assert!(editor.selection().is_empty());
        assert!(!editor.delete_by_id(id_a).unwrap());
        assert_eq!(editor.scene().len(), 1);
    }

    #[test]
    fn test_select_all_skips_hidden() {
        let mut editor = editor();
        editor.add_shape(ShapeKind::Rectangle, None).unwrap();
        editor.add_shape(ShapeKind::Circle, None).unwrap();
        let top = editor.layers()[0].id;
        editor.toggle_visibility(top).unwrap();
        editor.select_all();
        assert_eq!(editor.selection().len(), 1);
    }

    fn rect_at(editor: &mut Editor, left: f64, top: f64) -> ObjectKey {
        let key = editor.add_shape(ShapeKind::Rectangle, None).unwrap();
        editor.scene.get_mut(key).unwrap().frame = crate::shapes::Frame::new(left, top, 50.0, 50.0);
        key
    }

    #[test]
    fn test_select_many_skips_workspace() {
        let mut editor = editor();
        let a = rect_at(&mut editor, 0.0, 0.0);
        let b = rect_at(&mut editor, 100.0, 0.0);
        let workspace = editor.scene().objects()[0].key();
        assert!(editor.select_many(&[b, workspace, a]));
        assert_eq!(editor.selection().keys(), &[b, a]);
        assert!(editor.select_many(&[]));
        assert!(editor.selection().is_empty());
    }

    #[test]
    fn test_toggle_in_selection() {
        let mut editor = editor();
        let a = rect_at(&mut editor, 0.0, 0.0);
        let b = rect_at(&mut editor, 100.0, 0.0);
        editor.select(a);
        assert!(editor.toggle_in_selection(b));
        assert_eq!(editor.selection().keys(), &[a, b]);
        assert!(editor.toggle_in_selection(a));
        assert_eq!(editor.selection().keys(), &[b]);
        assert!(editor.toggle_in_selection(b));
        assert!(editor.selection().is_empty());

        let workspace = editor.scene().objects()[0].key();
        assert!(!editor.toggle_in_selection(workspace));
    }

    #[test]
    fn test_select_in_rect() {
        let mut editor = editor();
        let a = rect_at(&mut editor, 0.0, 0.0);
        let b = rect_at(&mut editor, 100.0, 0.0);
        let _far = rect_at(&mut editor, 600.0, 600.0);
        assert!(editor.select_in_rect(Rect::new(20.0, 20.0, 120.0, 40.0)));
        assert_eq!(editor.selection().keys(), &[a, b]);

        // Marquee over empty space clears.
        assert!(editor.select_in_rect(Rect::new(300.0, 300.0, 310.0, 310.0)));
        assert!(editor.selection().is_empty());
    }
}
