//! Construction of typed scene objects with their interaction affordances.

use super::{Background, BackgroundFill, ImageResource, ImageSprite, SceneObject, SerializableColor, TextLabel, TextRole};
use kurbo::{Point, Size};
use std::sync::Arc;

/// Builds the three kinds of scene objects.
///
/// Every object leaves here with its final affordances: the background is
/// inert, text labels are selectable, editable and transformable, and sprites
/// are selectable and transformable but not editable.
pub struct SceneObjectFactory;

impl SceneObjectFactory {
    /// Transparent background covering `size`.
    pub fn background(size: Size) -> SceneObject {
        SceneObject::Background(Background::new(
            size,
            BackgroundFill::Solid(SerializableColor::transparent()),
        ))
    }

    /// Opaque rectangle placed under everything during an export.
    pub fn export_backdrop(size: Size, color: SerializableColor) -> SceneObject {
        SceneObject::Background(Background::export_backdrop(size, color))
    }

    pub fn title(content: &str, fill: SerializableColor) -> SceneObject {
        SceneObject::Text(TextLabel::new(TextRole::Title, content, fill))
    }

    pub fn subtitle(content: &str, fill: SerializableColor) -> SceneObject {
        SceneObject::Text(TextLabel::new(TextRole::Subtitle, content, fill))
    }

    /// Center-anchored image sprite.
    pub fn sprite(resource: Arc<ImageResource>, center: Point, scale: f64) -> SceneObject {
        SceneObject::Sprite(ImageSprite::new(resource, center, scale))
    }
}
