//! The editing facade.
//!
//! [`Editor`] owns the scene, selection, history, viewport and clipboard and
//! is the only way the host changes any of them. Every committed operation
//! records one history snapshot; continuous interactions and batches commit
//! once when they end.

mod add;
mod arrange;
mod image;
mod interaction;
mod style;

pub use arrange::{Alignment, LayerInfo, NudgeDirection};
pub use interaction::InteractionKind;

use crate::clipboard::Clipboard;
use crate::config::{EditorConfig, StyleDefaults};
use crate::error::{EditorError, EditorResult, require_positive};
use crate::events::{EditorEvent, EventBus, SubscriptionId};
use crate::export::{ExportOutput, ExportRequest, Rasterizer, export_with};
use crate::history::History;
use crate::image_load::ImageLoads;
use crate::scene::Scene;
use crate::selection::Selection;
use crate::shapes::{Interaction, ObjectKey, Paint, SceneObject, SerializableColor};
use crate::snap::SnapGuide;
use crate::viewport::Viewport;
use interaction::ActiveInteraction;
use kurbo::{Point, Size, Vec2};
use serde::{Deserialize, Serialize};

/// What a host persists for a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavePayload {
    /// Scene snapshot.
    pub json: String,
    /// Workspace size, for thumbnails and project lists.
    pub width: f64,
    pub height: f64,
}

/// One editing session.
#[derive(Debug)]
pub struct Editor {
    scene: Scene,
    selection: Selection,
    history: History,
    viewport: Viewport,
    clipboard: Clipboard,
    image_loads: ImageLoads,
    events: EventBus,
    config: EditorConfig,
    /// Last-used style, inherited by new objects.
    defaults: StyleDefaults,
    interaction: Option<ActiveInteraction>,
    guides: Vec<SnapGuide>,
    batch_depth: usize,
    batch_dirty: bool,
    drawing_mode: bool,
}

impl Editor {
    /// Create an editor with an empty workspace sized from `config`.
    pub fn new(config: EditorConfig) -> EditorResult<Self> {
        let size = Size::new(
            require_positive("workspace width", config.workspace_width)?,
            require_positive("workspace height", config.workspace_height)?,
        );
        require_positive("fit margin", config.fit_margin)?;

        let scene = Scene::new(size);
        let mut history = History::new(config.history_limit);
        history.reset(scene.to_json()?);

        Ok(Self {
            scene,
            selection: Selection::new(),
            history,
            viewport: Viewport::new(),
            clipboard: Clipboard::new(),
            image_loads: ImageLoads::new(),
            events: EventBus::new(),
            defaults: config.defaults.clone(),
            config,
            interaction: None,
            guides: Vec::new(),
            batch_depth: 0,
            batch_dirty: false,
            drawing_mode: false,
        })
    }

    /// Create an editor whose history starts at the given snapshot.
    pub fn from_snapshot(config: EditorConfig, json: &str) -> EditorResult<Self> {
        let mut editor = Self::new(config)?;
        editor.scene.load_json(json)?;
        editor.history.reset(editor.scene.to_json()?);
        Ok(editor)
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn defaults(&self) -> &StyleDefaults {
        &self.defaults
    }

    /// Guides produced by the latest interaction frame, in object space.
    pub fn guides(&self) -> &[SnapGuide] {
        &self.guides
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn can_paste(&self) -> bool {
        self.clipboard.has_content()
    }

    pub fn is_drawing_mode(&self) -> bool {
        self.drawing_mode
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&EditorEvent) + 'static) -> SubscriptionId {
        self.events.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }

    pub(crate) fn notify(&mut self, event: EditorEvent) {
        self.events.emit(event);
        self.events.dispatch();
    }

    fn notify_history(&mut self) {
        let event = EditorEvent::HistoryChanged {
            can_undo: self.history.can_undo(),
            can_redo: self.history.can_redo(),
        };
        self.notify(event);
    }

    // --- history ---

    /// Record the live scene as one history step.
    ///
    /// Suppressed during replay; deferred to `end_batch` inside a batch.
    pub(crate) fn commit(&mut self) -> EditorResult<()> {
        if self.history.is_replaying() {
            return Ok(());
        }
        if self.batch_depth > 0 {
            self.batch_dirty = true;
            return Ok(());
        }
        let snapshot = self.scene.to_json()?;
        if self.history.record(snapshot) {
            log::debug!(
                "Recorded history step {}/{}",
                self.history.position() + 1,
                self.history.len()
            );
            self.notify_history();
        }
        Ok(())
    }

    /// Commit only if something changed.
    pub(crate) fn commit_if(&mut self, changed: bool) -> EditorResult<bool> {
        if changed {
            self.commit()?;
        }
        Ok(changed)
    }

    /// Start a batch: commits are collected until the matching `end_batch`.
    pub fn begin_batch(&mut self) {
        self.batch_depth += 1;
    }

    /// End a batch, recording one snapshot if anything was committed in it.
    pub fn end_batch(&mut self) -> EditorResult<()> {
        if self.batch_depth == 0 {
            return Ok(());
        }
        self.batch_depth -= 1;
        if self.batch_depth == 0 && std::mem::take(&mut self.batch_dirty) {
            self.commit()?;
        }
        Ok(())
    }

    /// Step back one snapshot. Returns false at the start of history.
    pub fn undo(&mut self) -> EditorResult<bool> {
        let Some(target) = self.history.undo_target().map(str::to_owned) else {
            return Ok(false);
        };
        self.replay(&target)?;
        self.history.step_back();
        log::debug!("Undo to step {}/{}", self.history.position() + 1, self.history.len());
        self.notify_history();
        Ok(true)
    }

    /// Step forward one snapshot. Returns false at the end of history.
    pub fn redo(&mut self) -> EditorResult<bool> {
        let Some(target) = self.history.redo_target().map(str::to_owned) else {
            return Ok(false);
        };
        self.replay(&target)?;
        self.history.step_forward();
        log::debug!("Redo to step {}/{}", self.history.position() + 1, self.history.len());
        self.notify_history();
        Ok(true)
    }

    /// Load a snapshot with recording suppressed.
    fn replay(&mut self, json: &str) -> EditorResult<()> {
        self.history.set_replaying(true);
        let result = self.scene.load_json(json);
        self.history.set_replaying(false);
        result?;
        self.reset_transient_state();
        self.notify(EditorEvent::SceneLoaded);
        Ok(())
    }

    fn reset_transient_state(&mut self) {
        self.interaction = None;
        if !self.guides.is_empty() {
            self.guides.clear();
            self.notify(EditorEvent::GuidesChanged);
        }
        if self.selection.clear() {
            self.notify(EditorEvent::SelectionCleared);
        }
    }

    // --- serialization ---

    pub fn to_snapshot(&self) -> EditorResult<String> {
        self.scene.to_json()
    }

    pub fn save_payload(&self) -> EditorResult<SavePayload> {
        let workspace = self
            .scene
            .workspace_rect()
            .ok_or(EditorError::MissingWorkspace)?;
        Ok(SavePayload {
            json: self.scene.to_json()?,
            width: workspace.width(),
            height: workspace.height(),
        })
    }

    /// Replace the scene with a snapshot and start a fresh history from it.
    ///
    /// On error the live scene is left exactly as it was.
    pub fn load_scene(&mut self, json: &str) -> EditorResult<()> {
        self.history.set_replaying(true);
        let result = self.scene.load_json(json);
        self.history.set_replaying(false);
        if let Err(err) = result {
            log::warn!("Failed to load scene: {err}");
            return Err(err);
        }

        self.reset_transient_state();
        self.history.reset(self.scene.to_json()?);
        log::info!("Loaded scene with {} objects", self.scene.len());
        self.notify(EditorEvent::SceneLoaded);
        self.notify_history();
        self.refit()?;
        Ok(())
    }

    // --- viewport ---

    /// Resize the host container and re-fit the workspace into it.
    pub fn set_container(&mut self, size: Size) -> EditorResult<f64> {
        self.fit_into(size)
    }

    /// Re-fit the workspace into the current container.
    pub fn auto_zoom(&mut self) -> EditorResult<f64> {
        self.fit_into(self.viewport.container)
    }

    /// Re-fit only when the container size is known.
    fn refit(&mut self) -> EditorResult<()> {
        let container = self.viewport.container;
        if container.width > 0.0 && container.height > 0.0 {
            self.fit_into(container)?;
        }
        Ok(())
    }

    fn fit_into(&mut self, container: Size) -> EditorResult<f64> {
        let workspace = self
            .scene
            .workspace_rect()
            .ok_or(EditorError::MissingWorkspace)?;
        let zoom = self
            .viewport
            .auto_fit(workspace, container, self.config.fit_margin)?;
        if let Some(workspace) = self.scene.workspace_mut() {
            workspace.interaction = Interaction::inert();
        }
        log::debug!(
            "Auto-fit {}x{} workspace into {}x{} container at zoom {zoom:.4}",
            workspace.width(),
            workspace.height(),
            container.width,
            container.height
        );
        self.notify(EditorEvent::ViewportChanged);
        Ok(zoom)
    }

    pub fn zoom_in(&mut self) {
        self.zoom_by(self.config.zoom_step);
    }

    pub fn zoom_out(&mut self) {
        self.zoom_by(1.0 / self.config.zoom_step);
    }

    fn zoom_by(&mut self, factor: f64) {
        let center = self.viewport.container_center();
        self.viewport.zoom_at(center, factor);
        self.notify(EditorEvent::ViewportChanged);
    }

    /// Pan by a delta in screen pixels.
    pub fn pan(&mut self, delta: Vec2) {
        self.viewport.pan(delta);
        self.notify(EditorEvent::ViewportChanged);
    }

    /// Where new objects are centered: the middle of what is on screen, or
    /// the workspace center before the container size is known.
    fn placement_center(&self) -> Point {
        let container = self.viewport.container;
        if container.width > 0.0 && container.height > 0.0 {
            return self.viewport.visible_center();
        }
        self.scene
            .workspace_rect()
            .map(|r| r.center())
            .unwrap_or(Point::ZERO)
    }

    // --- workspace ---

    /// Change the workspace size, re-fit, and commit.
    pub fn resize_workspace(&mut self, width: f64, height: f64) -> EditorResult<()> {
        let width = require_positive("workspace width", width)?;
        let height = require_positive("workspace height", height)?;
        let workspace = self
            .scene
            .workspace_mut()
            .ok_or(EditorError::MissingWorkspace)?;
        workspace.frame.width = width;
        workspace.frame.height = height;
        workspace.frame.scale_x = 1.0;
        workspace.frame.scale_y = 1.0;
        let key = workspace.key();
        self.notify(EditorEvent::ObjectModified(key));
        self.refit()?;
        self.commit()
    }

    pub fn set_workspace_background(&mut self, color: SerializableColor) -> EditorResult<()> {
        let workspace = self
            .scene
            .workspace_mut()
            .ok_or(EditorError::MissingWorkspace)?;
        workspace.style.fill = Some(Paint::Solid(color));
        let key = workspace.key();
        self.notify(EditorEvent::ObjectModified(key));
        self.refit()?;
        self.commit()
    }

    // --- clipboard ---

    /// Copy the selection. Returns false when nothing is selected.
    pub fn copy(&mut self) -> bool {
        let copied = self
            .clipboard
            .copy(self.selection.objects_back_to_front(&self.scene));
        if copied {
            log::debug!("Copied {} object(s)", self.selection.len());
        }
        copied
    }

    /// Paste the clipboard as new objects, offset from the previous paste,
    /// and select them. One history step.
    pub fn paste(&mut self) -> EditorResult<Vec<ObjectKey>> {
        let step = self.config.paste_offset;
        let Some(objects) = self.clipboard.paste(Vec2::new(step, step)) else {
            return Ok(Vec::new());
        };
        let keys: Vec<ObjectKey> = objects.into_iter().map(|o| self.insert(o)).collect();
        self.select_keys(keys.iter().copied());
        self.commit()?;
        log::debug!("Pasted {} object(s)", keys.len());
        Ok(keys)
    }

    /// Copy then delete the selection.
    pub fn cut(&mut self) -> EditorResult<usize> {
        if !self.copy() {
            return Ok(0);
        }
        self.delete()
    }

    // --- export ---

    /// Rasterize `request` with an identity view; the live viewport is
    /// restored afterwards.
    pub fn export(
        &mut self,
        rasterizer: &mut dyn Rasterizer,
        request: &ExportRequest,
    ) -> EditorResult<ExportOutput> {
        export_with(&self.scene, &mut self.viewport, rasterizer, request)
    }

    /// Export request for the full workspace.
    pub fn workspace_export_request(&self) -> EditorResult<ExportRequest> {
        let workspace = self
            .scene
            .workspace_rect()
            .ok_or(EditorError::MissingWorkspace)?;
        Ok(ExportRequest::for_workspace(workspace))
    }

    // --- shared helpers ---

    fn insert(&mut self, object: SceneObject) -> ObjectKey {
        let key = self.scene.add(object);
        self.notify(EditorEvent::ObjectAdded(key));
        key
    }

    /// Replace the selection, skipping the workspace and unknown keys.
    fn select_keys(&mut self, keys: impl IntoIterator<Item = ObjectKey>) -> bool {
        let keys: Vec<ObjectKey> = keys
            .into_iter()
            .filter(|k| self.scene.get(*k).is_some_and(|o| !o.is_workspace()))
            .collect();
        if keys.is_empty() {
            return self.clear_selection();
        }
        let was_empty = self.selection.is_empty();
        if !self.selection.set(keys) {
            return false;
        }
        let keys = self.selection.keys().to_vec();
        self.notify(if was_empty {
            EditorEvent::SelectionCreated(keys)
        } else {
            EditorEvent::SelectionUpdated(keys)
        });
        true
    }

    /// Deselect everything. Guides go with the selection.
    pub fn clear_selection(&mut self) -> bool {
        if !self.selection.clear() {
            return false;
        }
        self.interaction = None;
        if !self.guides.is_empty() {
            self.guides.clear();
            self.notify(EditorEvent::GuidesChanged);
        }
        self.notify(EditorEvent::SelectionCleared);
        true
    }

    /// Apply `f` to every selected object. Returns true if any reported a change.
    fn update_selected(&mut self, mut f: impl FnMut(&mut SceneObject) -> bool) -> bool {
        let mut changed = Vec::new();
        for key in self.selection.keys().to_vec() {
            if let Some(object) = self.scene.get_mut(key) {
                if f(object) {
                    changed.push(key);
                }
            }
        }
        for key in &changed {
            self.notify(EditorEvent::ObjectModified(*key));
        }
        !changed.is_empty()
    }

    fn primary_object(&self) -> Option<&SceneObject> {
        self.selection.primary().and_then(|k| self.scene.get(k))
    }
}
