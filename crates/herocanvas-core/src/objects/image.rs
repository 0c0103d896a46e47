//! Image sprites and the decoded resources they draw.

use super::{Affordances, ObjectId, ObjectRole, ObjectTransform, OriginMode, SceneObjectTrait};
use kurbo::{Point, Size};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

/// Asset loading errors.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("Failed to decode image {name}: {message}")]
    Decode { name: String, message: String },
    #[error("Image {0} has no pixels")]
    EmptyImage(String),
    #[error("Pixel buffer for {name} has {actual} bytes, expected {expected}")]
    BufferSize {
        name: String,
        expected: usize,
        actual: usize,
    },
    #[error("IO error: {0}")]
    Io(String),
}

/// Image format of an asset file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageFormat {
    Png,
    Jpeg,
    WebP,
}

impl ImageFormat {
    /// Detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "png" => Some(ImageFormat::Png),
            "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
            "webp" => Some(ImageFormat::WebP),
            _ => None,
        }
    }
}

/// A decoded raster image (straight-alpha RGBA8).
#[derive(Debug, Clone, Serialize)]
pub struct ImageResource {
    pub name: String,
    pub width: u32,
    pub height: u32,
    #[serde(skip)]
    pixels: Arc<Vec<u8>>,
}

impl ImageResource {
    /// Wrap decoded RGBA8 pixels. Rejects empty images and mismatched buffers.
    pub fn new(name: impl Into<String>, width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, AssetError> {
        let name = name.into();
        if width == 0 || height == 0 {
            return Err(AssetError::EmptyImage(name));
        }
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            return Err(AssetError::BufferSize {
                name,
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            name,
            width,
            height,
            pixels: Arc::new(pixels),
        })
    }

    /// A single-color image, handy for placeholders and tests.
    pub fn solid(name: impl Into<String>, width: u32, height: u32, rgba: [u8; 4]) -> Result<Self, AssetError> {
        let pixels = rgba.repeat(width as usize * height as usize);
        Self::new(name, width, height, pixels)
    }

    /// RGBA8 pixel data, row-major.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn intrinsic_size(&self) -> Size {
        Size::new(self.width as f64, self.height as f64)
    }
}

/// A user-placed image, anchored at its visual center.
#[derive(Debug, Clone, Serialize)]
pub struct ImageSprite {
    pub(crate) id: ObjectId,
    /// Visual center in scene coordinates.
    pub position: Point,
    pub transform: ObjectTransform,
    pub affordances: Affordances,
    #[serde(serialize_with = "serialize_resource_name")]
    resource: Arc<ImageResource>,
}

fn serialize_resource_name<S: serde::Serializer>(resource: &Arc<ImageResource>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&resource.name)
}

impl ImageSprite {
    /// Create a sprite centered on `center` with a uniform scale.
    pub fn new(resource: Arc<ImageResource>, center: Point, scale: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            position: center,
            transform: ObjectTransform::uniform(scale),
            affordances: Affordances::interactive(false),
            resource,
        }
    }

    pub fn resource(&self) -> &Arc<ImageResource> {
        &self.resource
    }

    /// Size after scaling (rotation not included).
    pub fn rendered_size(&self) -> Size {
        Size::new(
            self.resource.width as f64 * self.transform.scale_x.abs(),
            self.resource.height as f64 * self.transform.scale_y.abs(),
        )
    }
}

impl SceneObjectTrait for ImageSprite {
    fn id(&self) -> ObjectId {
        self.id
    }

    fn role(&self) -> ObjectRole {
        ObjectRole::Sprite
    }

    fn position(&self) -> Point {
        self.position
    }

    fn size(&self) -> Size {
        self.resource.intrinsic_size()
    }

    fn origin(&self) -> OriginMode {
        OriginMode::Center
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_detection() {
        assert_eq!(ImageFormat::from_extension("png"), Some(ImageFormat::Png));
        assert_eq!(ImageFormat::from_extension("JPG"), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::from_extension("webp"), Some(ImageFormat::WebP));
        assert_eq!(ImageFormat::from_extension("gif"), None);
    }

    #[test]
    fn test_resource_validation() {
        assert!(matches!(
            ImageResource::new("empty", 0, 10, Vec::new()),
            Err(AssetError::EmptyImage(_))
        ));
        assert!(matches!(
            ImageResource::new("short", 2, 2, vec![0; 15]),
            Err(AssetError::BufferSize { expected: 16, actual: 15, .. })
        ));
        let ok = ImageResource::solid("red", 2, 3, [255, 0, 0, 255]).unwrap();
        assert_eq!(ok.pixels().len(), 24);
    }

    #[test]
    fn test_sprite_is_center_anchored() {
        let resource = Arc::new(ImageResource::solid("img", 100, 50, [0, 0, 0, 255]).unwrap());
        let sprite = ImageSprite::new(resource, Point::new(200.0, 100.0), 0.5);
        let bounds = sprite.bounds();
        assert!((bounds.x0 - 175.0).abs() < 1e-9);
        assert!((bounds.x1 - 225.0).abs() < 1e-9);
        assert!((bounds.y0 - 87.5).abs() < 1e-9);
        assert!((bounds.y1 - 112.5).abs() < 1e-9);
        assert!(sprite.hit_test(Point::new(200.0, 100.0), 0.0));
        assert!(!sprite.hit_test(Point::new(240.0, 100.0), 0.0));
    }

    #[test]
    fn test_rotated_sprite_bounds_grow() {
        let resource = Arc::new(ImageResource::solid("img", 100, 100, [0, 0, 0, 255]).unwrap());
        let mut sprite = ImageSprite::new(resource, Point::new(0.0, 0.0), 1.0);
        sprite.transform.angle = 45.0;
        let bounds = sprite.bounds();
        let expected = 100.0 * std::f64::consts::SQRT_2;
        assert!((bounds.width() - expected).abs() < 1e-6);
    }
}
