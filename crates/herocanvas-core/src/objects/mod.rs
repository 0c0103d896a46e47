//! Scene object definitions for the cover canvas.

mod background;
mod factory;
mod image;
mod text;

pub use background::{Background, BackgroundFill};
pub use factory::SceneObjectFactory;
pub use image::{AssetError, ImageFormat, ImageResource, ImageSprite};
pub use text::{FontFamily, FontWeight, TextLabel, TextRole};

use kurbo::{Affine, Point, Rect, Size, Vec2};
use peniko::Color;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color from RGB components.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Color with a fractional alpha (0.0..=1.0), like CSS `rgba()`.
    pub fn rgba(r: u8, g: u8, b: u8, alpha: f64) -> Self {
        let a = (alpha.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self::new(r, g, b, a)
    }

    pub const fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
    }

    /// Alpha as a fraction in 0.0..=1.0.
    pub fn alpha(&self) -> f64 {
        self.a as f64 / 255.0
    }

    /// Whether the color is fully transparent.
    pub fn is_transparent(&self) -> bool {
        self.a == 0
    }

    /// `#rrggbb` hex string (alpha is not included).
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Parse `#rrggbb` (leading `#` optional) into an opaque color.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.trim().strip_prefix('#').unwrap_or(hex.trim());
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
        Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Unique identifier for scene objects.
pub type ObjectId = Uuid;

/// What an object is for. Protected roles survive a reset; sprites do not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectRole {
    Background,
    Title,
    Subtitle,
    Sprite,
    /// Temporary opaque fill inserted only while an export is captured.
    ExportBackdrop,
}

impl ObjectRole {
    /// Background and the two text labels are never removed by a reset.
    pub fn is_protected(&self) -> bool {
        matches!(
            self,
            ObjectRole::Background | ObjectRole::Title | ObjectRole::Subtitle
        )
    }
}

/// Point of the object that `position` refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OriginMode {
    /// `position` is the top-left corner (before rotation).
    #[default]
    TopLeft,
    /// `position` is the visual center.
    Center,
}

/// Scale and rotation applied on top of an object's intrinsic size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObjectTransform {
    pub scale_x: f64,
    pub scale_y: f64,
    /// Rotation in degrees, clockwise, around the origin point.
    pub angle: f64,
}

impl Default for ObjectTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl ObjectTransform {
    pub const IDENTITY: Self = Self {
        scale_x: 1.0,
        scale_y: 1.0,
        angle: 0.0,
    };

    /// Uniform scale with no rotation.
    pub fn uniform(scale: f64) -> Self {
        Self {
            scale_x: scale,
            scale_y: scale,
            angle: 0.0,
        }
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }
}

/// Interaction affordances attached to an object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Affordances {
    /// Can become the active object.
    pub selectable: bool,
    /// Receives pointer events at all.
    pub evented: bool,
    /// Text content can be edited in place.
    pub editable: bool,
    /// Shows transform controls when active.
    pub has_controls: bool,
    /// Corner handles are drawn as outlines instead of filled squares.
    pub transparent_corners: bool,
    /// Corner handle size in screen pixels.
    pub corner_size: f64,
    pub corner_color: SerializableColor,
    pub border_color: SerializableColor,
}

impl Affordances {
    /// Affordances for objects the user may move, scale and rotate.
    pub fn interactive(editable: bool) -> Self {
        Self {
            selectable: true,
            evented: true,
            editable,
            has_controls: true,
            transparent_corners: false,
            corner_size: 10.0,
            corner_color: SerializableColor::rgb(59, 130, 246),
            border_color: SerializableColor::rgba(59, 130, 246, 0.8),
        }
    }

    /// Affordances for inert objects (background, export backdrop).
    pub fn inert() -> Self {
        Self {
            selectable: false,
            evented: false,
            editable: false,
            has_controls: false,
            ..Self::interactive(false)
        }
    }
}

/// Common behaviour of every object in the scene.
pub trait SceneObjectTrait {
    /// Get the unique identifier.
    fn id(&self) -> ObjectId;

    /// Get the role of this object.
    fn role(&self) -> ObjectRole;

    /// Position of the origin point in scene coordinates.
    fn position(&self) -> Point;

    /// Intrinsic (untransformed) size.
    fn size(&self) -> Size;

    /// Which point `position` refers to.
    fn origin(&self) -> OriginMode;

    fn transform(&self) -> &ObjectTransform;

    fn transform_mut(&mut self) -> &mut ObjectTransform;

    fn affordances(&self) -> &Affordances;

    /// Local-to-scene affine built from position, origin, rotation and scale.
    fn affine(&self) -> Affine {
        let t = self.transform();
        let size = self.size();
        let base = Affine::translate(self.position().to_vec2())
            * Affine::rotate(t.angle.to_radians())
            * Affine::scale_non_uniform(t.scale_x, t.scale_y);
        match self.origin() {
            OriginMode::TopLeft => base,
            OriginMode::Center => base * Affine::translate(Vec2::new(-size.width / 2.0, -size.height / 2.0)),
        }
    }

    /// Axis-aligned bounding box in scene coordinates.
    fn bounds(&self) -> Rect {
        self.affine().transform_rect_bbox(self.size().to_rect())
    }

    /// Check if a point (in scene coordinates) hits this object.
    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        if !self.affordances().evented {
            return false;
        }
        let local = self.affine().inverse() * point;
        self.size()
            .to_rect()
            .inflate(tolerance, tolerance)
            .contains(local)
    }
}

/// Enum wrapper for all object types.
#[derive(Debug, Clone, Serialize)]
pub enum SceneObject {
    Background(Background),
    Text(TextLabel),
    Sprite(ImageSprite),
}

impl SceneObject {
    fn inner(&self) -> &dyn SceneObjectTrait {
        match self {
            SceneObject::Background(b) => b,
            SceneObject::Text(t) => t,
            SceneObject::Sprite(s) => s,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn SceneObjectTrait {
        match self {
            SceneObject::Background(b) => b,
            SceneObject::Text(t) => t,
            SceneObject::Sprite(s) => s,
        }
    }

    pub fn id(&self) -> ObjectId {
        self.inner().id()
    }

    pub fn role(&self) -> ObjectRole {
        self.inner().role()
    }

    pub fn position(&self) -> Point {
        self.inner().position()
    }

    pub fn size(&self) -> Size {
        self.inner().size()
    }

    pub fn transform(&self) -> &ObjectTransform {
        self.inner().transform()
    }

    pub fn transform_mut(&mut self) -> &mut ObjectTransform {
        self.inner_mut().transform_mut()
    }

    pub fn affordances(&self) -> &Affordances {
        self.inner().affordances()
    }

    pub fn affine(&self) -> Affine {
        self.inner().affine()
    }

    pub fn bounds(&self) -> Rect {
        self.inner().bounds()
    }

    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        self.inner().hit_test(point, tolerance)
    }

    /// Move the origin point to `position`.
    pub fn set_position(&mut self, position: Point) {
        match self {
            SceneObject::Background(b) => b.position = position,
            SceneObject::Text(t) => t.position = position,
            SceneObject::Sprite(s) => s.position = position,
        }
    }

    pub fn as_text(&self) -> Option<&TextLabel> {
        match self {
            SceneObject::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_text_mut(&mut self) -> Option<&mut TextLabel> {
        match self {
            SceneObject::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_background(&self) -> Option<&Background> {
        match self {
            SceneObject::Background(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_background_mut(&mut self) -> Option<&mut Background> {
        match self {
            SceneObject::Background(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_sprite(&self) -> Option<&ImageSprite> {
        match self {
            SceneObject::Sprite(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_sprite(&self) -> bool {
        matches!(self, SceneObject::Sprite(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgba_alpha_rounding() {
        let c = SerializableColor::rgba(248, 250, 252, 0.96);
        assert_eq!(c.a, 245);
        assert!((c.alpha() - 245.0 / 255.0).abs() < f64::EPSILON);
        assert_eq!(c.to_hex(), "#f8fafc");
    }

    #[test]
    fn test_hex_parsing() {
        assert_eq!(SerializableColor::from_hex("#0b1020"), Some(SerializableColor::rgb(11, 16, 32)));
        assert_eq!(SerializableColor::from_hex("F4F5F7"), Some(SerializableColor::rgb(244, 245, 247)));
        assert_eq!(SerializableColor::from_hex("#0b10"), None);
        assert_eq!(SerializableColor::from_hex("#zz1020"), None);
    }

    #[test]
    fn test_protected_roles() {
        assert!(ObjectRole::Background.is_protected());
        assert!(ObjectRole::Title.is_protected());
        assert!(ObjectRole::Subtitle.is_protected());
        assert!(!ObjectRole::Sprite.is_protected());
        assert!(!ObjectRole::ExportBackdrop.is_protected());
    }

    #[test]
    fn test_inert_affordances() {
        let a = Affordances::inert();
        assert!(!a.selectable);
        assert!(!a.evented);
        assert!(!a.has_controls);
    }
}
