//! CPU rendering surface on a tiny-skia pixmap.

use crate::svg_text;
use herocanvas_core::{
    Background, BackgroundFill, ImageSprite, ObjectId, RenderSurface, Scene, SceneObject, SceneObjectTrait,
    SerializableColor, SurfaceError,
};
use kurbo::{Affine, Rect, Size};
use peniko::Color;
use resvg::tiny_skia::{
    self, FilterQuality, GradientStop, IntSize, LinearGradient, Paint, PathBuilder, Pixmap, PixmapPaint, SpreadMode,
    Stroke, Transform,
};
use resvg::usvg;
use std::collections::HashMap;
use std::sync::Arc;

/// Largest backing store or capture edge, in pixels.
const MAX_DIMENSION: u32 = 16_384;

fn to_transform(affine: Affine) -> Transform {
    let [a, b, c, d, e, f] = affine.as_coeffs();
    Transform::from_row(a as f32, b as f32, c as f32, d as f32, e as f32, f as f32)
}

fn to_skia(color: SerializableColor) -> tiny_skia::Color {
    let rgba = Color::from(color).to_rgba8();
    tiny_skia::Color::from_rgba8(rgba.r, rgba.g, rgba.b, rgba.a)
}

fn solid_paint(color: SerializableColor) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(to_skia(color));
    paint.anti_alias = true;
    paint
}

/// Encode a premultiplied pixmap as straight-alpha RGBA PNG.
pub fn encode_png(pixmap: &Pixmap) -> Result<Vec<u8>, SurfaceError> {
    let mut rgba = Vec::with_capacity(pixmap.data().len());
    for pixel in pixmap.pixels() {
        let c = pixel.demultiply();
        rgba.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
    }

    let mut png_data = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut png_data, pixmap.width(), pixmap.height());
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder
            .write_header()
            .map_err(|e| SurfaceError::Encode(e.to_string()))?;
        writer
            .write_image_data(&rgba)
            .map_err(|e| SurfaceError::Encode(e.to_string()))?;
    }
    Ok(png_data)
}

fn allocate(width: u32, height: u32) -> Result<Pixmap, SurfaceError> {
    if width > MAX_DIMENSION || height > MAX_DIMENSION {
        return Err(SurfaceError::InvalidSize { width, height });
    }
    Pixmap::new(width, height).ok_or(SurfaceError::InvalidSize { width, height })
}

/// Software [`RenderSurface`].
///
/// Renders are coalesced: [`RenderSurface::request_render`] only marks the
/// surface dirty and the host calls `render` once per frame.
pub struct RasterSurface {
    pixmap: Option<Pixmap>,
    size: (u32, u32),
    zoom: f64,
    dirty: bool,
    released: bool,
    fontdb: Arc<usvg::fontdb::Database>,
    sprite_cache: HashMap<ObjectId, Pixmap>,
    frames: u64,
}

impl RasterSurface {
    pub fn new(fontdb: Arc<usvg::fontdb::Database>) -> Self {
        Self {
            pixmap: None,
            size: (0, 0),
            zoom: 1.0,
            dirty: false,
            released: false,
            fontdb,
            sprite_cache: HashMap::new(),
            frames: 0,
        }
    }

    /// Number of completed renders.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Current backing store, if allocated.
    pub fn pixmap(&self) -> Option<&Pixmap> {
        self.pixmap.as_ref()
    }

    /// Straight-alpha RGBA of one backing-store pixel.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let c = self.pixmap.as_ref()?.pixel(x, y)?.demultiply();
        Some([c.red(), c.green(), c.blue(), c.alpha()])
    }

    fn draw_scene(&mut self, target: &mut Pixmap, scene: &Scene, view: Affine) -> Result<(), SurfaceError> {
        self.sprite_cache.retain(|id, _| scene.get(*id).is_some());

        // Labels always sit on top, so text is composited in one pass at the end
        let mut text_fragments = Vec::new();
        for object in scene.objects_ordered() {
            let transform = view * object.affine();
            match object {
                SceneObject::Background(background) => draw_background(target, background, transform),
                SceneObject::Sprite(sprite) => self.draw_sprite(target, sprite, transform),
                SceneObject::Text(label) => text_fragments.push(svg_text::label_fragment(label, transform)),
            }
        }
        if !text_fragments.is_empty() {
            self.draw_text(target, &text_fragments)?;
        }

        if let Some(active) = scene.active().and_then(|id| scene.get(id)) {
            draw_selection(target, active, view);
        }
        Ok(())
    }

    fn draw_sprite(&mut self, target: &mut Pixmap, sprite: &ImageSprite, transform: Affine) {
        let id = sprite.id();
        if !self.sprite_cache.contains_key(&id) {
            match sprite_pixmap(sprite) {
                Some(pixmap) => {
                    self.sprite_cache.insert(id, pixmap);
                }
                None => {
                    log::warn!("Cannot rasterize sprite {}", sprite.resource().name);
                    return;
                }
            }
        }
        if let Some(pixmap) = self.sprite_cache.get(&id) {
            let paint = PixmapPaint {
                quality: FilterQuality::Bicubic,
                ..PixmapPaint::default()
            };
            target.draw_pixmap(0, 0, pixmap.as_ref(), &paint, to_transform(transform), None);
        }
    }

    fn draw_text(&self, target: &mut Pixmap, fragments: &[String]) -> Result<(), SurfaceError> {
        let svg = svg_text::document(target.width(), target.height(), fragments);
        let options = usvg::Options {
            fontdb: self.fontdb.clone(),
            ..Default::default()
        };
        let tree = usvg::Tree::from_str(&svg, &options).map_err(|e| SurfaceError::RenderFailed(e.to_string()))?;
        resvg::render(&tree, Transform::identity(), &mut target.as_mut());
        Ok(())
    }
}

/// Premultiplied copy of a sprite's pixels.
fn sprite_pixmap(sprite: &ImageSprite) -> Option<Pixmap> {
    let resource = sprite.resource();
    let size = IntSize::from_wh(resource.width, resource.height)?;
    let mut data = resource.pixels().to_vec();
    for px in data.chunks_exact_mut(4) {
        let a = px[3] as u16;
        for channel in &mut px[..3] {
            *channel = ((*channel as u16 * a + 127) / 255) as u8;
        }
    }
    Pixmap::from_vec(data, size)
}

fn draw_background(target: &mut Pixmap, background: &Background, transform: Affine) {
    if background.fill.is_transparent() {
        return;
    }
    let Some(rect) = tiny_skia::Rect::from_xywh(0.0, 0.0, background.width as f32, background.height as f32) else {
        return;
    };
    let paint = match background.fill {
        BackgroundFill::Solid(color) => solid_paint(color),
        BackgroundFill::LinearGradient { top, bottom } => {
            let shader = LinearGradient::new(
                tiny_skia::Point::from_xy(0.0, 0.0),
                tiny_skia::Point::from_xy(0.0, background.height as f32),
                vec![GradientStop::new(0.0, to_skia(top)), GradientStop::new(1.0, to_skia(bottom))],
                SpreadMode::Pad,
                Transform::identity(),
            );
            let mut paint = Paint::default();
            match shader {
                Some(shader) => paint.shader = shader,
                None => paint.set_color(to_skia(top)),
            }
            paint
        }
    };
    target.fill_rect(rect, &paint, to_transform(transform), None);
}

/// Outline plus corner handles around the active object, in pixel space.
fn draw_selection(target: &mut Pixmap, object: &SceneObject, view: Affine) {
    let affordances = object.affordances();
    if !affordances.has_controls {
        return;
    }
    let bounds: Rect = view.transform_rect_bbox(object.bounds());
    let Some(outline) = tiny_skia::Rect::from_ltrb(bounds.x0 as f32, bounds.y0 as f32, bounds.x1 as f32, bounds.y1 as f32)
    else {
        return;
    };
    let stroke = Stroke {
        width: 1.5,
        ..Stroke::default()
    };
    let border = solid_paint(affordances.border_color);
    target.stroke_path(&PathBuilder::from_rect(outline), &border, &stroke, Transform::identity(), None);

    let half = affordances.corner_size / 2.0;
    let corner_paint = solid_paint(affordances.corner_color);
    for (x, y) in [
        (bounds.x0, bounds.y0),
        (bounds.x1, bounds.y0),
        (bounds.x1, bounds.y1),
        (bounds.x0, bounds.y1),
    ] {
        let Some(handle) = tiny_skia::Rect::from_ltrb((x - half) as f32, (y - half) as f32, (x + half) as f32, (y + half) as f32)
        else {
            continue;
        };
        if affordances.transparent_corners {
            target.stroke_path(&PathBuilder::from_rect(handle), &corner_paint, &stroke, Transform::identity(), None);
        } else {
            target.fill_rect(handle, &corner_paint, Transform::identity(), None);
        }
    }
}

impl RenderSurface for RasterSurface {
    fn backing_size(&self) -> (u32, u32) {
        self.size
    }

    fn set_backing_size(&mut self, width: u32, height: u32) {
        self.size = (width, height);
        self.pixmap = match allocate(width, height) {
            Ok(pixmap) => Some(pixmap),
            Err(err) => {
                log::warn!("Backing store not allocated: {}", err);
                None
            }
        };
        self.dirty = true;
    }

    fn zoom(&self) -> f64 {
        self.zoom
    }

    fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom;
    }

    fn request_render(&mut self) {
        self.dirty = true;
    }

    fn needs_render(&self) -> bool {
        self.dirty && !self.released
    }

    fn render(&mut self, scene: &Scene) -> Result<(), SurfaceError> {
        if self.released {
            return Err(SurfaceError::Released);
        }
        let (width, height) = self.size;
        let mut pixmap = self.pixmap.take().ok_or(SurfaceError::InvalidSize { width, height })?;
        pixmap.fill(tiny_skia::Color::TRANSPARENT);
        let result = self.draw_scene(&mut pixmap, scene, Affine::scale(self.zoom));
        self.pixmap = Some(pixmap);
        result?;
        self.dirty = false;
        self.frames += 1;
        Ok(())
    }

    fn capture_png(&mut self, scene: &Scene, visible: Size, multiplier: f64) -> Result<Vec<u8>, SurfaceError> {
        if self.released {
            return Err(SurfaceError::Released);
        }
        let width = (visible.width * multiplier).round() as u32;
        let height = (visible.height * multiplier).round() as u32;
        let mut pixmap = allocate(width, height)?;
        self.draw_scene(&mut pixmap, scene, Affine::scale(multiplier))?;
        encode_png(&pixmap)
    }

    fn release(&mut self) {
        self.pixmap = None;
        self.sprite_cache.clear();
        self.size = (0, 0);
        self.dirty = false;
        self.released = true;
    }
}
