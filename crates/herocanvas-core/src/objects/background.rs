//! Background rectangle.

use super::{Affordances, ObjectId, ObjectRole, ObjectTransform, OriginMode, SceneObjectTrait, SerializableColor};
use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Fill of a background rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BackgroundFill {
    /// Flat color (transparent while editing).
    Solid(SerializableColor),
    /// Vertical linear gradient from `top` to `bottom`.
    LinearGradient {
        top: SerializableColor,
        bottom: SerializableColor,
    },
}

impl BackgroundFill {
    /// Whether the fill paints nothing at all.
    pub fn is_transparent(&self) -> bool {
        match self {
            BackgroundFill::Solid(c) => c.is_transparent(),
            BackgroundFill::LinearGradient { top, bottom } => {
                top.is_transparent() && bottom.is_transparent()
            }
        }
    }
}

/// A full-canvas rectangle painted beneath everything else.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Background {
    pub(crate) id: ObjectId,
    pub(crate) role: ObjectRole,
    /// Top-left corner position.
    pub position: Point,
    pub width: f64,
    pub height: f64,
    pub fill: BackgroundFill,
    pub transform: ObjectTransform,
    pub affordances: Affordances,
}

impl Background {
    /// Create a new background covering `size` from the scene origin.
    pub fn new(size: Size, fill: BackgroundFill) -> Self {
        Self::with_role(ObjectRole::Background, size, fill)
    }

    /// Opaque rectangle used only while an export is captured.
    pub fn export_backdrop(size: Size, color: SerializableColor) -> Self {
        Self::with_role(ObjectRole::ExportBackdrop, size, BackgroundFill::Solid(color))
    }

    fn with_role(role: ObjectRole, size: Size, fill: BackgroundFill) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            position: Point::ZERO,
            width: size.width,
            height: size.height,
            fill,
            transform: ObjectTransform::IDENTITY,
            affordances: Affordances::inert(),
        }
    }

    /// Resize to cover `size` from the scene origin.
    pub fn cover(&mut self, size: Size) {
        self.position = Point::ZERO;
        self.width = size.width;
        self.height = size.height;
    }

    pub fn as_rect(&self) -> Rect {
        Rect::new(
            self.position.x,
            self.position.y,
            self.position.x + self.width,
            self.position.y + self.height,
        )
    }
}

impl SceneObjectTrait for Background {
    fn id(&self) -> ObjectId {
        self.id
    }

    fn role(&self) -> ObjectRole {
        self.role
    }

    fn position(&self) -> Point {
        self.position
    }

    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    fn origin(&self) -> OriginMode {
        OriginMode::TopLeft
    }

    fn transform(&self) -> &ObjectTransform {
        &self.transform
    }

    fn transform_mut(&mut self) -> &mut ObjectTransform {
        &mut self.transform
    }

    fn affordances(&self) -> &Affordances {
        &self.affordances
    }
}
