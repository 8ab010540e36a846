//! Active selection.

use crate::scene::Scene;
use crate::shapes::{ObjectKey, SceneObject};
use kurbo::Rect;

/// The set of selected objects, in selection order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    keys: Vec<ObjectKey>,
}

impl Selection {
    /// Empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Selected keys in selection order.
    pub fn keys(&self) -> &[ObjectKey] {
        &self.keys
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Number of selected objects.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn contains(&self, key: ObjectKey) -> bool {
        self.keys.contains(&key)
    }

    /// The first selected object; single-object getters read from it.
    pub fn primary(&self) -> Option<ObjectKey> {
        self.keys.first().copied()
    }

    /// Replace the selection. Returns true if it changed.
    pub fn set(&mut self, keys: impl IntoIterator<Item = ObjectKey>) -> bool {
        let mut next: Vec<ObjectKey> = Vec::new();
        for key in keys {
            if !next.contains(&key) {
                next.push(key);
            }
        }
        if next == self.keys {
            return false;
        }
        self.keys = next;
        true
    }

    /// Append `key` unless already selected. Returns true if added.
    pub fn add(&mut self, key: ObjectKey) -> bool {
        if self.contains(key) {
            return false;
        }
        self.keys.push(key);
        true
    }

    /// Returns true if `key` was selected.
    pub fn remove(&mut self, key: ObjectKey) -> bool {
        let before = self.keys.len();
        self.keys.retain(|k| *k != key);
        self.keys.len() != before
    }

    /// Returns true if anything was selected.
    pub fn clear(&mut self) -> bool {
        let was_selected = !self.keys.is_empty();
        self.keys.clear();
        was_selected
    }

    /// Drop keys that no longer exist in `scene`.
    pub fn retain_existing(&mut self, scene: &Scene) -> bool {
        let before = self.keys.len();
        self.keys.retain(|k| scene.contains(*k));
        self.keys.len() != before
    }

    /// Selected objects in selection order.
    pub fn objects<'a>(&'a self, scene: &'a Scene) -> impl Iterator<Item = &'a SceneObject> + 'a {
        self.keys.iter().filter_map(|k| scene.get(*k))
    }

    /// Selected objects in stacking order, back to front.
    pub fn objects_back_to_front<'a>(&self, scene: &'a Scene) -> Vec<&'a SceneObject> {
        let mut stacked: Vec<(usize, &SceneObject)> = self
            .keys
            .iter()
            .filter_map(|k| Some((scene.index_of(*k)?, scene.get(*k)?)))
            .collect();
        stacked.sort_by_key(|(index, _)| *index);
        stacked.into_iter().map(|(_, object)| object).collect()
    }

    /// Union of the selected objects' bounds.
    pub fn bounds(&self, scene: &Scene) -> Option<Rect> {
        self.objects(scene)
            .map(SceneObject::bounds)
            .reduce(|acc, b| acc.union(b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Frame, ObjectKind, ShapeGeometry};

    fn add_rect(scene: &mut Scene, left: f64) -> ObjectKey {
        scene.add(SceneObject::new(
            ObjectKind::Shape(ShapeGeometry::Ellipse),
            Frame::new(left, 0.0, 10.0, 10.0),
        ))
    }

    #[test]
    fn test_set_and_clear() {
        let mut scene = Scene::default();
        let a = add_rect(&mut scene, 0.0);
        let mut selection = Selection::new();
        assert!(selection.set([a, a]));
        assert_eq!(selection.len(), 1);
        assert!(!selection.set([a]));
        assert!(selection.clear());
        assert!(!selection.clear());
    }

    #[test]
    fn test_bounds() {
        let mut scene = Scene::default();
        let a = add_rect(&mut scene, 0.0);
        let b = add_rect(&mut scene, 100.0);
        let mut selection = Selection::new();
        selection.set([a, b]);
        assert_eq!(selection.bounds(&scene), Some(Rect::new(0.0, 0.0, 110.0, 10.0)));
        assert_eq!(selection.primary(), Some(a));
    }

    #[test]
    fn test_back_to_front_ignores_selection_order() {
        let mut scene = Scene::default();
        let a = add_rect(&mut scene, 0.0);
        let b = add_rect(&mut scene, 10.0);
        let c = add_rect(&mut scene, 20.0);
        let mut selection = Selection::new();
        selection.set([c, a, b]);
        let keys: Vec<ObjectKey> = selection
            .objects_back_to_front(&scene)
            .into_iter()
            .map(SceneObject::key)
            .collect();
        assert_eq!(keys, vec![a, b, c]);
        assert_eq!(selection.primary(), Some(c));
    }

    #[test]
    fn test_retain_existing() {
        let mut scene = Scene::default();
        let a = add_rect(&mut scene, 0.0);
        let b = add_rect(&mut scene, 10.0);
        let mut selection = Selection::new();
        selection.set([a, b]);
        scene.remove(a);
        assert!(selection.retain_existing(&scene));
        assert_eq!(selection.keys(), &[b]);
    }
}
