//! In-editor clipboard, independent of the system clipboard.

use crate::shapes::SceneObject;
use kurbo::Vec2;

/// What was copied.
#[derive(Debug, Clone)]
pub enum ClipboardContent {
    Single(SceneObject),
    /// Several objects copied together, back to front.
    Multiple(Vec<SceneObject>),
}

impl ClipboardContent {
    fn objects_mut(&mut self) -> Vec<&mut SceneObject> {
        match self {
            ClipboardContent::Single(object) => vec![object],
            ClipboardContent::Multiple(objects) => objects.iter_mut().collect(),
        }
    }

    fn to_vec(&self) -> Vec<SceneObject> {
        match self {
            ClipboardContent::Single(object) => vec![object.detached_clone()],
            ClipboardContent::Multiple(objects) => {
                objects.iter().map(SceneObject::detached_clone).collect()
            }
        }
    }
}

/// Holds at most one copied object or group.
#[derive(Debug, Clone, Default)]
pub struct Clipboard {
    slot: Option<ClipboardContent>,
}

impl Clipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_content(&self) -> bool {
        self.slot.is_some()
    }

    pub fn content(&self) -> Option<&ClipboardContent> {
        self.slot.as_ref()
    }

    /// Store clones of `objects`. Copying nothing leaves the slot as it was.
    pub fn copy<'a>(&mut self, objects: impl IntoIterator<Item = &'a SceneObject>) -> bool {
        let mut clones: Vec<SceneObject> = objects
            .into_iter()
            .map(SceneObject::detached_clone)
            .collect();
        self.slot = match clones.len() {
            0 => return false,
            1 => clones.pop().map(ClipboardContent::Single),
            _ => Some(ClipboardContent::Multiple(clones)),
        };
        true
    }

    /// Fresh clones shifted by `offset`. The stored copy moves by the same
    /// amount, so the next paste lands one step further.
    pub fn paste(&mut self, offset: Vec2) -> Option<Vec<SceneObject>> {
        let content = self.slot.as_mut()?;
        for object in content.objects_mut() {
            object.frame.translate(offset);
        }
        let mut pasted = content.to_vec();
        for object in &mut pasted {
            object.visible = true;
            object.interaction.evented = true;
        }
        Some(pasted)
    }

    pub fn clear(&mut self) {
        self.slot = None;
    }
}
