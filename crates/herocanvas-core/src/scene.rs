//! Scene object table and z-order.

use crate::objects::{
    Background, ObjectId, ObjectRole, SceneObject, SceneObjectFactory, SerializableColor, TextLabel, TextRole,
};
use kurbo::{Point, Size};
use serde::Serialize;
use std::collections::HashMap;
use thiserror::Error;

/// Scene construction errors.
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("Expected a {expected:?} object, got {actual:?}")]
    WrongRole {
        expected: ObjectRole,
        actual: ObjectRole,
    },
}

/// All drawable objects of one mounted view plus their shared zoom.
///
/// Objects live in a table keyed by [`ObjectId`]; `z_order` lists them back
/// to front. After every structural change the order is normalized to:
/// export backdrop (only during a capture), background, sprites in insertion
/// order, title, subtitle.
#[derive(Debug, Clone, Serialize)]
pub struct Scene {
    objects: HashMap<ObjectId, SceneObject>,
    z_order: Vec<ObjectId>,
    background: ObjectId,
    title: ObjectId,
    subtitle: ObjectId,
    zoom: f64,
    active: Option<ObjectId>,
}

impl Scene {
    /// Build a scene from its three protected objects.
    pub fn from_objects(background: SceneObject, title: SceneObject, subtitle: SceneObject) -> Result<Self, SceneError> {
        expect_role(&background, ObjectRole::Background)?;
        expect_role(&title, ObjectRole::Title)?;
        expect_role(&subtitle, ObjectRole::Subtitle)?;

        let (background_id, title_id, subtitle_id) = (background.id(), title.id(), subtitle.id());
        let mut objects = HashMap::new();
        objects.insert(background_id, background);
        objects.insert(title_id, title);
        objects.insert(subtitle_id, subtitle);

        Ok(Self {
            objects,
            z_order: vec![background_id, title_id, subtitle_id],
            background: background_id,
            title: title_id,
            subtitle: subtitle_id,
            zoom: 1.0,
            active: None,
        })
    }

    pub fn background_id(&self) -> ObjectId {
        self.background
    }

    pub fn text_id(&self, role: TextRole) -> ObjectId {
        match role {
            TextRole::Title => self.title,
            TextRole::Subtitle => self.subtitle,
        }
    }

    /// Get an object by ID.
    pub fn get(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.get(&id)
    }

    /// Get a mutable reference to an object by ID.
    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut SceneObject> {
        self.objects.get_mut(&id)
    }

    pub fn background(&self) -> Option<&Background> {
        self.get(self.background).and_then(SceneObject::as_background)
    }

    pub fn background_mut(&mut self) -> Option<&mut Background> {
        let id = self.background;
        self.get_mut(id).and_then(SceneObject::as_background_mut)
    }

    pub fn text(&self, role: TextRole) -> Option<&TextLabel> {
        self.get(self.text_id(role)).and_then(SceneObject::as_text)
    }

    pub fn text_mut(&mut self, role: TextRole) -> Option<&mut TextLabel> {
        let id = self.text_id(role);
        self.get_mut(id).and_then(SceneObject::as_text_mut)
    }

    /// Insert a sprite; text labels stay above it.
    /// Returns `None` (and inserts nothing) for non-sprite objects.
    pub fn add_sprite(&mut self, sprite: SceneObject) -> Option<ObjectId> {
        if !sprite.is_sprite() {
            log::debug!("Refusing to add {:?} as a sprite", sprite.role());
            return None;
        }
        let id = sprite.id();
        self.objects.insert(id, sprite);
        self.z_order.push(id);
        self.normalize_order();
        Some(id)
    }

    /// Remove a user-added object. Protected objects are never removed.
    pub fn remove(&mut self, id: ObjectId) -> Option<SceneObject> {
        if self.objects.get(&id)?.role().is_protected() {
            return None;
        }
        if self.active == Some(id) {
            self.active = None;
        }
        self.z_order.retain(|&oid| oid != id);
        self.objects.remove(&id)
    }

    /// Remove every sprite. Returns how many were removed.
    pub fn clear_sprites(&mut self) -> usize {
        let sprites: Vec<ObjectId> = self.sprite_ids().collect();
        for &id in &sprites {
            self.remove(id);
        }
        sprites.len()
    }

    /// Sprite IDs back to front.
    pub fn sprite_ids(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.z_order
            .iter()
            .copied()
            .filter(|id| self.objects.get(id).is_some_and(SceneObject::is_sprite))
    }

    /// Z-order of objects (back to front).
    pub fn z_order(&self) -> &[ObjectId] {
        &self.z_order
    }

    /// Get objects in z-order (back to front).
    pub fn objects_ordered(&self) -> impl Iterator<Item = &SceneObject> {
        self.z_order.iter().filter_map(|id| self.objects.get(id))
    }

    /// Bring a sprite to the front of the sprite layer.
    pub fn bring_to_front(&mut self, id: ObjectId) {
        self.z_order.retain(|&oid| oid != id);
        self.z_order.push(id);
        self.normalize_order();
    }

    /// Send a sprite to the back of the sprite layer.
    pub fn send_to_back(&mut self, id: ObjectId) {
        self.z_order.retain(|&oid| oid != id);
        self.z_order.insert(0, id);
        self.normalize_order();
    }

    /// Re-establish the layer invariant, keeping relative sprite order.
    fn normalize_order(&mut self) {
        let mut backdrops = Vec::new();
        let mut sprites = Vec::new();
        for &id in &self.z_order {
            match self.objects.get(&id).map(SceneObject::role) {
                Some(ObjectRole::ExportBackdrop) => backdrops.push(id),
                Some(ObjectRole::Sprite) => sprites.push(id),
                _ => {}
            }
        }
        let mut order = Vec::with_capacity(self.objects.len());
        order.extend(backdrops);
        order.push(self.background);
        order.extend(sprites);
        order.push(self.title);
        order.push(self.subtitle);
        self.z_order = order;
    }

    /// Check the layer invariant: background bottommost among persistent
    /// objects, labels last, one of each protected object.
    pub fn is_well_ordered(&self) -> bool {
        let persistent: Vec<ObjectId> = self
            .z_order
            .iter()
            .copied()
            .filter(|id| self.objects.get(id).map(SceneObject::role) != Some(ObjectRole::ExportBackdrop))
            .collect();
        let n = persistent.len();
        n >= 3
            && persistent[0] == self.background
            && persistent[n - 2] == self.title
            && persistent[n - 1] == self.subtitle
            && persistent[1..n - 2]
                .iter()
                .all(|id| self.objects.get(id).is_some_and(SceneObject::is_sprite))
            && self.z_order.len() == self.objects.len()
    }

    /// Insert an opaque backdrop under everything, run `capture` against the
    /// scene, then remove the backdrop again.
    ///
    /// `capture` only gets shared access, so nothing can mutate the scene or
    /// request a render between insertion and removal.
    pub fn with_export_backdrop<R>(&mut self, size: Size, color: SerializableColor, capture: impl FnOnce(&Scene) -> R) -> R {
        let backdrop = SceneObjectFactory::export_backdrop(size, color);
        let id = backdrop.id();
        self.objects.insert(id, backdrop);
        self.z_order.insert(0, id);
        self.normalize_order();

        let result = capture(&*self);

        self.z_order.retain(|&oid| oid != id);
        self.objects.remove(&id);
        result
    }

    /// Find the topmost selectable object at a point (scene coordinates).
    pub fn object_at(&self, point: Point, tolerance: f64) -> Option<ObjectId> {
        self.z_order
            .iter()
            .rev()
            .filter_map(|id| self.objects.get(id))
            .find(|obj| obj.affordances().selectable && obj.hit_test(point, tolerance))
            .map(SceneObject::id)
    }

    /// Currently active (selected) object.
    pub fn active(&self) -> Option<ObjectId> {
        self.active
    }

    /// Make `id` the active object. Non-selectable objects are ignored.
    pub fn set_active(&mut self, id: ObjectId) -> bool {
        match self.objects.get(&id) {
            Some(obj) if obj.affordances().selectable => {
                self.active = Some(id);
                true
            }
            _ => false,
        }
    }

    /// Deselect the active object.
    pub fn clear_active(&mut self) {
        self.active = None;
    }

    /// Zoom applied to all object coordinates when rendering.
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom;
    }

    /// Get the number of objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the scene holds no objects at all.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Serialize the scene to JSON (debug snapshots; pixel data omitted).
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

fn expect_role(object: &SceneObject, expected: ObjectRole) -> Result<(), SceneError> {
    let actual = object.role();
    if actual == expected {
        Ok(())
    } else {
        Err(SceneError::WrongRole { expected, actual })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::ImageResource;
    use std::sync::Arc;

    fn scene() -> Scene {
        let ink = SerializableColor::rgb(0, 0, 0);
        Scene::from_objects(
            SceneObjectFactory::background(Size::new(800.0, 600.0)),
            SceneObjectFactory::title("Title", ink),
            SceneObjectFactory::subtitle("Subtitle", ink),
        )
        .unwrap()
    }

    fn sprite_at(x: f64, y: f64) -> SceneObject {
        let resource = Arc::new(ImageResource::solid("img", 40, 40, [255, 0, 0, 255]).unwrap());
        SceneObjectFactory::sprite(resource, Point::new(x, y), 1.0)
    }

    #[test]
    fn test_scene_creation() {
        let scene = scene();
        assert_eq!(scene.len(), 3);
        assert!(!scene.is_empty());
        assert!(scene.is_well_ordered());
        assert_eq!(scene.z_order()[0], scene.background_id());
    }

    #[test]
    fn test_wrong_roles_rejected() {
        let ink = SerializableColor::rgb(0, 0, 0);
        let result = Scene::from_objects(
            SceneObjectFactory::title("a", ink),
            SceneObjectFactory::title("b", ink),
            SceneObjectFactory::subtitle("c", ink),
        );
        assert!(matches!(
            result,
            Err(SceneError::WrongRole { expected: ObjectRole::Background, .. })
        ));
    }

    #[test]
    fn test_sprites_stay_below_labels() {
        let mut scene = scene();
        let a = scene.add_sprite(sprite_at(10.0, 10.0)).unwrap();
        let b = scene.add_sprite(sprite_at(20.0, 20.0)).unwrap();
        assert!(scene.is_well_ordered());
        let order = scene.z_order();
        assert_eq!(order[1], a);
        assert_eq!(order[2], b);
        assert_eq!(order[3], scene.text_id(TextRole::Title));
        assert_eq!(order[4], scene.text_id(TextRole::Subtitle));

        scene.bring_to_front(a);
        assert!(scene.is_well_ordered());
        assert_eq!(scene.z_order()[2], a);

        scene.send_to_back(a);
        assert!(scene.is_well_ordered());
        assert_eq!(scene.z_order()[1], a);
    }

    #[test]
    fn test_protected_objects_cannot_be_removed() {
        let mut scene = scene();
        assert!(scene.remove(scene.background_id()).is_none());
        assert!(scene.remove(scene.text_id(TextRole::Title)).is_none());
        assert_eq!(scene.len(), 3);
    }

    #[test]
    fn test_add_sprite_rejects_other_kinds() {
        let mut scene = scene();
        let extra = SceneObjectFactory::background(Size::new(1.0, 1.0));
        assert!(scene.add_sprite(extra).is_none());
        assert_eq!(scene.len(), 3);
    }

    #[test]
    fn test_clear_sprites() {
        let mut scene = scene();
        let id = scene.add_sprite(sprite_at(10.0, 10.0)).unwrap();
        scene.add_sprite(sprite_at(30.0, 30.0));
        scene.set_active(id);
        assert_eq!(scene.clear_sprites(), 2);
        assert_eq!(scene.len(), 3);
        assert_eq!(scene.active(), None);
        assert!(scene.is_well_ordered());
    }

    #[test]
    fn test_export_backdrop_is_scoped() {
        let mut scene = scene();
        scene.add_sprite(sprite_at(10.0, 10.0));
        let before: Vec<ObjectId> = scene.z_order().to_vec();
        let seen = scene.with_export_backdrop(Size::new(800.0, 600.0), SerializableColor::rgb(11, 16, 32), |s| {
            let first = s.objects_ordered().next().map(SceneObject::role);
            (s.len(), first)
        });
        assert_eq!(seen, (5, Some(ObjectRole::ExportBackdrop)));
        assert_eq!(scene.z_order(), before.as_slice());
        assert_eq!(scene.len(), 4);
    }

    #[test]
    fn test_object_at_prefers_topmost() {
        let mut scene = scene();
        let lower = scene.add_sprite(sprite_at(100.0, 100.0)).unwrap();
        let upper = scene.add_sprite(sprite_at(110.0, 110.0)).unwrap();
        assert_eq!(scene.object_at(Point::new(105.0, 105.0), 0.0), Some(upper));
        assert_eq!(scene.object_at(Point::new(85.0, 85.0), 0.0), Some(lower));
        // Background is not selectable
        assert_eq!(scene.object_at(Point::new(700.0, 590.0), 0.0), None);
    }

    #[test]
    fn test_background_not_selectable() {
        let mut scene = scene();
        assert!(!scene.set_active(scene.background_id()));
        assert!(scene.set_active(scene.text_id(TextRole::Title)));
        scene.clear_active();
        assert_eq!(scene.active(), None);
    }

    #[test]
    fn test_to_json() {
        let mut scene = scene();
        scene.add_sprite(sprite_at(10.0, 10.0));
        let json = scene.to_json().unwrap();
        assert!(json.contains("\"Title\""));
        assert!(json.contains("\"img\""));
    }
}
