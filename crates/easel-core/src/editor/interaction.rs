//! Pointer-driven move and scale of the selection.
//!
//! Pointer events only queue a frame request; `on_animation_frame` applies
//! the most recent one, so several pointer moves between frames collapse
//! into a single geometry update. Snapping runs once per applied frame and
//! the interaction commits one snapshot when it ends.

use super::Editor;
use super::arrange::move_respecting_locks;
use crate::error::{EditorResult, require_finite, require_positive};
use crate::events::EditorEvent;
use crate::shapes::{Frame, ObjectKey};
use crate::snap::{GuideSegment, SnapGuide, SnapSettings, compute_snap, guide_segments};
use kurbo::{Rect, Vec2};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionKind {
    Move,
    Scale,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum FrameRequest {
    /// Offset from where the drag started.
    Translate(Vec2),
    /// Scale factors relative to the starting scale.
    Scale { sx: f64, sy: f64 },
}

/// State of an active drag or scale.
#[derive(Debug, Clone)]
pub(crate) struct ActiveInteraction {
    kind: InteractionKind,
    /// Selected objects and their frames when the interaction began.
    originals: Vec<(ObjectKey, Frame)>,
    pending: Option<FrameRequest>,
}

impl Editor {
    pub fn set_snapping(&mut self, enabled: bool) {
        self.config.snapping = enabled;
    }

    pub fn is_interacting(&self) -> bool {
        self.interaction.is_some()
    }

    /// Start moving or scaling the selection. Returns false when nothing is
    /// selected.
    pub fn begin_interaction(&mut self, kind: InteractionKind) -> bool {
        let originals: Vec<(ObjectKey, Frame)> = self
            .selection
            .objects(&self.scene)
            .map(|o| (o.key(), o.frame))
            .collect();
        if originals.is_empty() {
            return false;
        }
        self.interaction = Some(ActiveInteraction {
            kind,
            originals,
            pending: None,
        });
        true
    }

    /// Queue a move to `offset` from the drag start. Replaces any request not
    /// yet applied.
    pub fn drag_selection_by(&mut self, offset: Vec2) -> EditorResult<()> {
        require_finite("drag offset", offset.x)?;
        require_finite("drag offset", offset.y)?;
        if let Some(active) = self.interaction.as_mut() {
            if active.kind == InteractionKind::Move {
                active.pending = Some(FrameRequest::Translate(offset));
            }
        }
        Ok(())
    }

    /// Queue a scale by `sx`, `sy` relative to the starting scale.
    pub fn scale_selection(&mut self, sx: f64, sy: f64) -> EditorResult<()> {
        require_positive("scale factor", sx)?;
        require_positive("scale factor", sy)?;
        if let Some(active) = self.interaction.as_mut() {
            if active.kind == InteractionKind::Scale {
                active.pending = Some(FrameRequest::Scale { sx, sy });
            }
        }
        Ok(())
    }

    /// Apply the latest queued request, snap, and refresh the guides.
    /// Returns false when there was nothing to apply.
    pub fn on_animation_frame(&mut self) -> bool {
        let Some(active) = self.interaction.as_mut() else {
            return false;
        };
        let Some(request) = active.pending.take() else {
            return false;
        };
        let kind = active.kind;
        let originals = active.originals.clone();

        // Objects taking part in the snap, even when this frame left them
        // where they started.
        let mut targets = Vec::with_capacity(originals.len());
        for (key, start) in &originals {
            let Some(object) = self.scene.get_mut(*key) else {
                continue;
            };
            object.frame = *start;
            let participates = match request {
                FrameRequest::Translate(offset) => {
                    move_respecting_locks(object, offset);
                    !object.locks.is_locked()
                }
                FrameRequest::Scale { sx, sy } => {
                    if !object.locks.scaling_x {
                        object.frame.scale_x = start.scale_x * sx;
                    }
                    if !object.locks.scaling_y {
                        object.frame.scale_y = start.scale_y * sy;
                    }
                    true
                }
            };
            if participates {
                targets.push(*key);
            }
        }

        self.snap_moved(&targets, kind);
        for (key, start) in &originals {
            let changed = self.scene.get(*key).is_some_and(|o| o.frame != *start);
            if changed {
                self.notify(EditorEvent::ObjectModified(*key));
            }
        }
        true
    }

    /// Align the interacting objects with the workspace and their siblings.
    ///
    /// The correction is applied only while moving; scaling keeps its
    /// anchor and just shows the guides.
    fn snap_moved(&mut self, moved: &[ObjectKey], kind: InteractionKind) {
        let active = moved
            .iter()
            .filter_map(|k| self.scene.get(*k))
            .map(|o| o.bounds())
            .reduce(|acc, b| acc.union(b));
        let Some(active) = active else {
            self.set_guides(Vec::new());
            return;
        };

        let siblings: Vec<Rect> = self
            .scene
            .content()
            .filter(|o| o.visible && o.interaction.evented && !self.selection.contains(o.key()))
            .map(|o| o.bounds())
            .collect();
        let settings = SnapSettings {
            enabled: self.config.snapping && kind == InteractionKind::Move,
            threshold: self.config.snap_threshold,
        };
        let result = compute_snap(active, &siblings, self.scene.workspace_rect(), &settings);

        if result.is_snapped() {
            let delta = Vec2::new(result.dx, result.dy);
            for key in moved {
                if let Some(object) = self.scene.get_mut(*key) {
                    move_respecting_locks(object, delta);
                }
            }
        }
        self.set_guides(result.guides);
    }

    fn set_guides(&mut self, guides: Vec<SnapGuide>) {
        if guides.is_empty() && self.guides.is_empty() {
            return;
        }
        self.guides = guides;
        self.notify(EditorEvent::GuidesChanged);
    }

    /// Finish the interaction: apply any queued frame, drop the guides, and
    /// commit one snapshot if anything changed.
    pub fn end_interaction(&mut self) -> EditorResult<bool> {
        self.on_animation_frame();
        let Some(active) = self.interaction.take() else {
            return Ok(false);
        };
        self.set_guides(Vec::new());
        let changed = active
            .originals
            .iter()
            .any(|(key, start)| self.scene.get(*key).is_some_and(|o| o.frame != *start));
        self.commit_if(changed)
    }

    /// Current guides mapped to viewport space, ready to draw.
    pub fn guide_segments(&self) -> Vec<GuideSegment> {
        guide_segments(&self.guides, &self.viewport)
    }
}

#[cfg(test)]
mod tests {
    use crate::editor::tests::editor;
    use crate::editor::{Editor, InteractionKind};
    use crate::shapes::{Frame, ObjectKey, ShapeKind};
    use crate::snap::GuideKind;
    use kurbo::{Size, Vec2};

    /// Add a rectangle and give it an explicit frame.
    fn rect_at(editor: &mut Editor, left: f64, top: f64, width: f64, height: f64) -> ObjectKey {
        let key = editor.add_shape(ShapeKind::Rectangle, None).unwrap();
        editor.scene.get_mut(key).unwrap().frame = Frame::new(left, top, width, height);
        key
    }

    #[test]
    fn test_drag_snaps_left_edge_to_workspace() {
        let mut editor = editor();
        let key = rect_at(&mut editor, 100.0, 100.0, 50.0, 50.0);
        editor.select(key);
        assert!(editor.begin_interaction(InteractionKind::Move));
        editor.drag_selection_by(Vec2::new(-97.0, 0.0)).unwrap();
        assert!(editor.on_animation_frame());

        let frame = editor.scene().get(key).unwrap().frame;
        assert_eq!(frame.left, 0.0);
        assert!(!editor.guides().is_empty());
    }

    #[test]
    fn test_only_latest_request_applies() {
        let mut editor = editor();
        let key = rect_at(&mut editor, 100.0, 100.0, 50.0, 50.0);
        editor.select(key);
        editor.begin_interaction(InteractionKind::Move);
        editor.drag_selection_by(Vec2::new(500.0, 500.0)).unwrap();
        editor.drag_selection_by(Vec2::new(20.0, 20.0)).unwrap();
        editor.on_animation_frame();
        assert!(!editor.on_animation_frame());
        let frame = editor.scene().get(key).unwrap().frame;
        assert_eq!((frame.left, frame.top), (120.0, 120.0));
    }

    #[test]
    fn test_interaction_commits_once_on_end() {
        let mut editor = editor();
        let key = rect_at(&mut editor, 100.0, 100.0, 50.0, 50.0);
        editor.select(key);
        let before = editor.history().len();

        editor.begin_interaction(InteractionKind::Move);
        for step in 1..=5 {
            editor.drag_selection_by(Vec2::new(f64::from(step) * 20.0, 0.0)).unwrap();
            editor.on_animation_frame();
        }
        assert_eq!(editor.history().len(), before);
        assert!(editor.end_interaction().unwrap());
        assert_eq!(editor.history().len(), before + 1);
        assert!(editor.guides().is_empty());
        assert!(!editor.is_interacting());
    }

    #[test]
    fn test_end_applies_pending_request() {
        let mut editor = editor();
        let key = rect_at(&mut editor, 100.0, 100.0, 50.0, 50.0);
        editor.select(key);
        editor.begin_interaction(InteractionKind::Move);
        editor.drag_selection_by(Vec2::new(33.0, 0.0)).unwrap();
        editor.end_interaction().unwrap();
        assert_eq!(editor.scene().get(key).unwrap().frame.left, 133.0);
    }

    #[test]
    fn test_interaction_without_change_records_nothing() {
        let mut editor = editor();
        let key = rect_at(&mut editor, 100.0, 100.0, 50.0, 50.0);
        editor.select(key);
        let before = editor.history().len();
        editor.begin_interaction(InteractionKind::Move);
        assert!(!editor.end_interaction().unwrap());
        assert_eq!(editor.history().len(), before);
    }

    #[test]
    fn test_begin_without_selection() {
        let mut editor = editor();
        assert!(!editor.begin_interaction(InteractionKind::Move));
        editor.drag_selection_by(Vec2::new(10.0, 0.0)).unwrap();
        assert!(!editor.on_animation_frame());
    }

    #[test]
    fn test_distribution_snaps_middle_object() {
        let mut editor = editor();
        // 100-wide boxes in a row with the middle one 2 units right of center.
        let a = rect_at(&mut editor, 100.0, 400.0, 100.0, 100.0);
        let b = rect_at(&mut editor, 302.0, 400.0, 100.0, 100.0);
        let c = rect_at(&mut editor, 500.0, 400.0, 100.0, 100.0);
        editor.select(b);
        editor.begin_interaction(InteractionKind::Move);
        editor.drag_selection_by(Vec2::new(0.0, 0.0)).unwrap();
        editor.on_animation_frame();

        let frame = editor.scene().get(b).unwrap().frame;
        assert_eq!(frame.left, 300.0);
        assert!(editor.guides().iter().any(|g| g.kind == GuideKind::Distribution));
        assert_eq!(editor.scene().get(a).unwrap().frame.left, 100.0);
        assert_eq!(editor.scene().get(c).unwrap().frame.left, 500.0);
    }

    #[test]
    fn test_resting_pointer_still_snaps() {
        let mut editor = editor();
        let key = rect_at(&mut editor, 3.0, 100.0, 50.0, 50.0);
        editor.select(key);
        editor.begin_interaction(InteractionKind::Move);
        editor.drag_selection_by(Vec2::new(40.0, 0.0)).unwrap();
        editor.on_animation_frame();
        // Back to where the drag started.
        editor.drag_selection_by(Vec2::ZERO).unwrap();
        assert!(editor.on_animation_frame());

        assert_eq!(editor.scene().get(key).unwrap().frame.left, 0.0);
        assert!(editor.guides().iter().any(|g| g.position == 0.0));
        assert!(editor.end_interaction().unwrap());
    }

    #[test]
    fn test_locked_object_is_not_snapped() {
        let mut editor = editor();
        let key = rect_at(&mut editor, 3.0, 100.0, 50.0, 50.0);
        editor.select(key);
        editor.toggle_lock().unwrap();
        editor.begin_interaction(InteractionKind::Move);
        editor.drag_selection_by(Vec2::ZERO).unwrap();
        editor.on_animation_frame();
        assert_eq!(editor.scene().get(key).unwrap().frame.left, 3.0);
        assert!(editor.guides().is_empty());
    }

    #[test]
    fn test_snapping_disabled_moves_freely() {
        let mut editor = editor();
        let key = rect_at(&mut editor, 100.0, 100.0, 50.0, 50.0);
        editor.set_snapping(false);
        editor.select(key);
        editor.begin_interaction(InteractionKind::Move);
        editor.drag_selection_by(Vec2::new(-97.0, 0.0)).unwrap();
        editor.on_animation_frame();
        assert_eq!(editor.scene().get(key).unwrap().frame.left, 3.0);
    }

    #[test]
    fn test_scale_keeps_anchor() {
        let mut editor = editor();
        let key = rect_at(&mut editor, 100.0, 100.0, 50.0, 50.0);
        editor.select(key);
        editor.begin_interaction(InteractionKind::Scale);
        editor.scale_selection(2.0, 3.0).unwrap();
        editor.on_animation_frame();
        let frame = editor.scene().get(key).unwrap().frame;
        assert_eq!((frame.scale_x, frame.scale_y), (2.0, 3.0));
        assert_eq!((frame.left, frame.top), (100.0, 100.0));
        assert!(editor.scale_selection(0.0, 1.0).is_err());
        assert!(editor.end_interaction().unwrap());
    }

    #[test]
    fn test_clear_selection_drops_guides() {
        let mut editor = editor();
        let key = rect_at(&mut editor, 100.0, 100.0, 50.0, 50.0);
        editor.select(key);
        editor.begin_interaction(InteractionKind::Move);
        editor.drag_selection_by(Vec2::new(-98.0, 0.0)).unwrap();
        editor.on_animation_frame();
        assert!(!editor.guides().is_empty());
        editor.clear_selection();
        assert!(editor.guides().is_empty());
        assert!(!editor.is_interacting());
    }

    #[test]
    fn test_guide_segments_follow_viewport() {
        let mut editor = editor();
        editor.set_container(Size::new(900.0, 900.0)).unwrap();
        let key = rect_at(&mut editor, 100.0, 100.0, 50.0, 50.0);
        editor.select(key);
        editor.begin_interaction(InteractionKind::Move);
        editor.drag_selection_by(Vec2::new(-98.0, 0.0)).unwrap();
        editor.on_animation_frame();

        let segments = editor.guide_segments();
        assert_eq!(segments.len(), editor.guides().len());
        let zoom = editor.viewport().zoom;
        let x = editor.viewport().offset.x;
        assert!(segments.iter().any(|s| (s.start.x - x).abs() < 1e-9 && zoom < 1.0));
    }
}
