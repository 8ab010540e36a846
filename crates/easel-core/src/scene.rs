//! The scene: an ordered object list with the workspace pinned at the back.

use crate::error::{EditorError, EditorResult};
use crate::shapes::{
    Frame, Interaction, ObjectId, ObjectKey, ObjectKind, ObjectStyle, Paint, SceneObject,
    SerializableColor, Shadow, ShapeGeometry,
};
use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Name that marks the workspace object.
pub const WORKSPACE_NAME: &str = "clip";

/// Default workspace ("page") size.
pub const DEFAULT_WORKSPACE_SIZE: Size = Size::new(900.0, 900.0);

#[derive(Serialize)]
struct SnapshotRef<'a> {
    objects: &'a [SceneObject],
}

#[derive(Deserialize)]
struct SnapshotOwned {
    objects: Vec<SceneObject>,
}

impl SceneObject {
    /// Whether this object is the workspace.
    pub fn is_workspace(&self) -> bool {
        self.name.as_deref() == Some(WORKSPACE_NAME)
    }

    /// Legacy scenes mark the workspace only by making a rectangle unselectable.
    fn looks_like_workspace(&self) -> bool {
        matches!(self.kind, ObjectKind::Shape(ShapeGeometry::Rect { .. }))
            && !self.interaction.selectable
    }
}

/// Build the workspace rectangle.
pub fn workspace_object(size: Size) -> SceneObject {
    let mut workspace = SceneObject::new(
        ObjectKind::Shape(ShapeGeometry::Rect { corner_radius: 0.0 }),
        Frame::new(0.0, 0.0, size.width, size.height),
    )
    .with_style(ObjectStyle {
        fill: Some(Paint::Solid(SerializableColor::white())),
        stroke: None,
        ..ObjectStyle::default()
    });
    workspace.name = Some(WORKSPACE_NAME.to_string());
    workspace.shadow = Some(Shadow {
        color: SerializableColor::new(0, 0, 0, 204),
        blur: 5.0,
        offset_x: 0.0,
        offset_y: 0.0,
    });
    workspace.interaction = Interaction::inert();
    workspace
}

/// Ordered object list, back to front. Index 0 is always the workspace.
#[derive(Debug, Clone)]
pub struct Scene {
    objects: Vec<SceneObject>,
    next_key: u64,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(DEFAULT_WORKSPACE_SIZE)
    }
}

impl Scene {
    /// Create a scene holding only a workspace of `size`.
    pub fn new(size: Size) -> Self {
        let mut scene = Self {
            objects: Vec::new(),
            next_key: 1,
        };
        let mut workspace = workspace_object(size);
        workspace.key = scene.allocate_key();
        scene.objects.push(workspace);
        scene
    }

    fn allocate_key(&mut self) -> ObjectKey {
        let key = ObjectKey(self.next_key);
        self.next_key += 1;
        key
    }

    /// All objects back to front, workspace first.
    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    /// Every object except the workspace, back to front.
    pub fn content(&self) -> impl Iterator<Item = &SceneObject> {
        self.objects.iter().filter(|o| !o.is_workspace())
    }

    /// Number of objects excluding the workspace.
    pub fn len(&self) -> usize {
        self.content().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn workspace(&self) -> Option<&SceneObject> {
        self.objects.first().filter(|o| o.is_workspace())
    }

    pub fn workspace_mut(&mut self) -> Option<&mut SceneObject> {
        self.objects.first_mut().filter(|o| o.is_workspace())
    }

    /// Workspace bounds in object space.
    pub fn workspace_rect(&self) -> Option<Rect> {
        self.workspace().map(SceneObject::bounds)
    }

    /// Append an object on top and return its key.
    pub fn add(&mut self, mut object: SceneObject) -> ObjectKey {
        let key = self.allocate_key();
        object.key = key;
        self.objects.push(object);
        key
    }

    /// Remove an object. The workspace cannot be removed.
    pub fn remove(&mut self, key: ObjectKey) -> Option<SceneObject> {
        let index = self.index_of(key)?;
        if self.objects[index].is_workspace() {
            return None;
        }
        Some(self.objects.remove(index))
    }

    pub fn get(&self, key: ObjectKey) -> Option<&SceneObject> {
        self.objects.iter().find(|o| o.key == key)
    }

    pub fn get_mut(&mut self, key: ObjectKey) -> Option<&mut SceneObject> {
        self.objects.iter_mut().find(|o| o.key == key)
    }

    pub fn contains(&self, key: ObjectKey) -> bool {
        self.index_of(key).is_some()
    }

    /// Stacking index (0 = back).
    pub fn index_of(&self, key: ObjectKey) -> Option<usize> {
        self.objects.iter().position(|o| o.key == key)
    }

    pub fn find_by_id(&self, id: ObjectId) -> Option<ObjectKey> {
        self.objects
            .iter()
            .find(|o| o.id == Some(id))
            .map(SceneObject::key)
    }

    /// Return the object's persistent id, generating one on first request.
    pub fn ensure_id(&mut self, key: ObjectKey) -> Option<ObjectId> {
        let object = self.get_mut(key)?;
        Some(*object.id.get_or_insert_with(Uuid::new_v4))
    }

    /// Keep the workspace at index 0 after a reorder.
    fn pin_workspace(&mut self) {
        if let Some(index) = self.objects.iter().position(SceneObject::is_workspace) {
            if index != 0 {
                let workspace = self.objects.remove(index);
                self.objects.insert(0, workspace);
            }
        }
    }

    fn sorted_indices(&self, keys: &[ObjectKey]) -> Vec<usize> {
        let mut indices: Vec<usize> = keys
            .iter()
            .filter_map(|k| self.index_of(*k))
            .filter(|i| !self.objects[*i].is_workspace())
            .collect();
        indices.sort_unstable();
        indices.dedup();
        indices
    }

    /// Move objects to the top, keeping their relative order.
    pub fn bring_to_front(&mut self, keys: &[ObjectKey]) -> bool {
        let indices = self.sorted_indices(keys);
        if indices.is_empty() {
            return false;
        }
        let before: Vec<ObjectKey> = self.objects.iter().map(|o| o.key).collect();
        let mut moved = Vec::with_capacity(indices.len());
        for index in indices.iter().rev() {
            moved.push(self.objects.remove(*index));
        }
        moved.reverse();
        self.objects.extend(moved);
        self.pin_workspace();
        self.objects.iter().map(|o| o.key).ne(before)
    }

    /// Move objects to just above the workspace, keeping their relative order.
    pub fn send_to_back(&mut self, keys: &[ObjectKey]) -> bool {
        let indices = self.sorted_indices(keys);
        if indices.is_empty() {
            return false;
        }
        let before: Vec<ObjectKey> = self.objects.iter().map(|o| o.key).collect();
        let mut moved = Vec::with_capacity(indices.len());
        for index in indices.iter().rev() {
            moved.push(self.objects.remove(*index));
        }
        let floor = usize::from(self.workspace().is_some());
        for object in moved {
            self.objects.insert(floor, object);
        }
        self.pin_workspace();
        self.objects.iter().map(|o| o.key).ne(before)
    }

    /// Move each object one step toward the front.
    pub fn bring_forward(&mut self, keys: &[ObjectKey]) -> bool {
        let indices = self.sorted_indices(keys);
        let mut changed = false;
        let mut ceiling = self.objects.len();
        for index in indices.into_iter().rev() {
            if index + 1 < ceiling {
                self.objects.swap(index, index + 1);
                changed = true;
            } else {
                // Already blocked by the top or by a selected neighbor.
                ceiling = index;
            }
        }
        self.pin_workspace();
        changed
    }

    /// Move each object one step toward the back, never below the workspace.
    pub fn send_backward(&mut self, keys: &[ObjectKey]) -> bool {
        let indices = self.sorted_indices(keys);
        let mut changed = false;
        let mut floor = usize::from(self.workspace().is_some());
        for index in indices {
            if index > floor {
                self.objects.swap(index, index - 1);
                changed = true;
            } else {
                floor = index + 1;
            }
        }
        self.pin_workspace();
        changed
    }

    /// Reorder content to `order` (back to front). Keys not listed keep
    /// their place at the front, unknown keys are ignored.
    pub fn reorder(&mut self, order: &[ObjectKey]) -> bool {
        let before: Vec<ObjectKey> = self.objects.iter().map(|o| o.key).collect();
        let mut rest = std::mem::take(&mut self.objects);
        let mut reordered = Vec::with_capacity(rest.len());
        if let Some(index) = rest.iter().position(SceneObject::is_workspace) {
            reordered.push(rest.remove(index));
        }
        for key in order {
            if let Some(index) = rest.iter().position(|o| o.key == *key) {
                reordered.push(rest.remove(index));
            }
        }
        reordered.extend(rest);
        self.objects = reordered;
        self.objects.iter().map(|o| o.key).ne(before)
    }

    /// Selectable objects under a point, front to back.
    pub fn objects_at_point(&self, point: Point) -> Vec<ObjectKey> {
        self.objects
            .iter()
            .rev()
            .filter(|o| !o.is_workspace() && o.interaction.selectable && o.hit_test(point))
            .map(SceneObject::key)
            .collect()
    }

    /// Selectable objects whose bounds intersect a rectangle, back to front.
    pub fn objects_in_rect(&self, rect: Rect) -> Vec<ObjectKey> {
        self.objects
            .iter()
            .filter(|o| !o.is_workspace() && o.visible && o.interaction.selectable)
            .filter(|o| rect.intersect(o.bounds()).area() > 0.0)
            .map(SceneObject::key)
            .collect()
    }

    /// Union of all content bounds.
    pub fn content_bounds(&self) -> Option<Rect> {
        self.content()
            .map(SceneObject::bounds)
            .reduce(|acc, b| acc.union(b))
    }

    /// Serialize to snapshot JSON: `{ "objects": [...] }`, workspace first.
    pub fn to_json(&self) -> EditorResult<String> {
        Ok(serde_json::to_string(&SnapshotRef {
            objects: &self.objects,
        })?)
    }

    /// Replace the contents with a snapshot.
    ///
    /// The workspace is found by name, or failing that as the first
    /// unselectable rectangle. It is moved to the back and made inert; every
    /// other object is made interactive. On error the scene is untouched.
    pub fn load_json(&mut self, json: &str) -> EditorResult<()> {
        let snapshot: SnapshotOwned = serde_json::from_str(json)?;
        let mut objects = snapshot.objects;

        for object in &objects {
            validate_frame(&object.frame)?;
        }

        let index = objects
            .iter()
            .position(SceneObject::is_workspace)
            .or_else(|| objects.iter().position(SceneObject::looks_like_workspace))
            .ok_or(EditorError::MissingWorkspace)?;

        let mut workspace = objects.remove(index);
        let size = workspace.frame.scaled_size();
        if size.width <= 0.0 || size.height <= 0.0 {
            return Err(EditorError::MalformedScene(format!(
                "workspace size {}x{} is not positive",
                size.width, size.height
            )));
        }
        workspace.name = Some(WORKSPACE_NAME.to_string());
        workspace.interaction = Interaction::inert();

        for object in &mut objects {
            // Only one workspace; stray copies of its name become plain objects.
            if object.is_workspace() {
                object.name = None;
            }
            object.interaction = Interaction {
                has_controls: !object.locks.is_locked(),
                ..Interaction::default()
            };
        }
        objects.insert(0, workspace);

        for object in &mut objects {
            object.key = self.allocate_key();
        }
        self.objects = objects;
        Ok(())
    }

    /// Parse a snapshot into a fresh scene.
    pub fn from_json(json: &str) -> EditorResult<Self> {
        let mut scene = Self {
            objects: Vec::new(),
            next_key: 1,
        };
        scene.load_json(json)?;
        Ok(scene)
    }
}

fn validate_frame(frame: &Frame) -> EditorResult<()> {
    let values = [
        frame.left,
        frame.top,
        frame.width,
        frame.height,
        frame.scale_x,
        frame.scale_y,
        frame.angle,
    ];
    if values.iter().any(|v| !v.is_finite()) {
        return Err(EditorError::MalformedScene(
            "object frame contains a non-finite number".to_string(),
        ));
    }
    if frame.width < 0.0 || frame.height < 0.0 {
        return Err(EditorError::MalformedScene(
            "object frame has a negative size".to_string(),
        ));
    }
    Ok(())
}
