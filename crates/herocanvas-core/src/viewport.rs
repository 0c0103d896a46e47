//! Viewport fitting and canonical text placement.

use crate::objects::TextRole;
use crate::scene::Scene;
use crate::surface::RenderSurface;
use kurbo::{Point, Size};
use serde::{Deserialize, Serialize};

/// Smallest supported visible width.
pub const MIN_VISIBLE_WIDTH: f64 = 320.0;
/// Smallest supported visible height.
pub const MIN_VISIBLE_HEIGHT: f64 = 360.0;
/// Upper bound on the device pixel ratio used for the backing store.
pub const MAX_DEVICE_PIXEL_RATIO: f64 = 2.0;
/// Lower bound, so the backing store never drops below the visible size.
pub const MIN_DEVICE_PIXEL_RATIO: f64 = 1.0;

const MIN_PADDING: f64 = 48.0;
const PADDING_FRACTION: f64 = 0.08;
const MIN_TOP: f64 = 72.0;
const TOP_FRACTION: f64 = 0.18;
const TITLE_MAX_WIDTH: f64 = 980.0;
const SUBTITLE_MAX_WIDTH: f64 = 900.0;
const SUBTITLE_GAP: f64 = 24.0;

/// Layout rectangle of the hosting container, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContainerMetrics {
    pub width: f64,
    pub height: f64,
    pub device_pixel_ratio: f64,
}

impl ContainerMetrics {
    pub fn new(width: f64, height: f64, device_pixel_ratio: f64) -> Self {
        Self {
            width,
            height,
            device_pixel_ratio,
        }
    }

    /// Container size clamped to the minimum supported visible size.
    pub fn visible_size(&self) -> Size {
        let clamp = |value: f64, min: f64| if value.is_finite() { value.max(min) } else { min };
        Size::new(
            clamp(self.width, MIN_VISIBLE_WIDTH),
            clamp(self.height, MIN_VISIBLE_HEIGHT),
        )
    }

    /// Device pixel ratio clamped to 1..=2; unusable values fall back to 1.
    pub fn effective_dpr(&self) -> f64 {
        let dpr = self.device_pixel_ratio;
        if dpr.is_finite() && dpr > 0.0 {
            dpr.clamp(MIN_DEVICE_PIXEL_RATIO, MAX_DEVICE_PIXEL_RATIO)
        } else {
            1.0
        }
    }

    /// Backing-store size in whole physical pixels.
    pub fn physical_size(&self) -> (u32, u32) {
        let visible = self.visible_size();
        let dpr = self.effective_dpr();
        (
            (visible.width * dpr).round() as u32,
            (visible.height * dpr).round() as u32,
        )
    }
}

impl Default for ContainerMetrics {
    fn default() -> Self {
        Self::new(1280.0, 720.0, 1.0)
    }
}

/// Canonical geometry of the two text labels for one visible size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextLayout {
    pub padding: f64,
    pub top: f64,
    pub title_width: f64,
    pub subtitle_width: f64,
}

impl TextLayout {
    pub fn for_visible(visible: Size) -> Self {
        let padding = MIN_PADDING.max(PADDING_FRACTION * visible.width);
        let top = MIN_TOP.max(TOP_FRACTION * visible.height);
        let available = visible.width - 2.0 * padding;
        Self {
            padding,
            top,
            title_width: available.min(TITLE_MAX_WIDTH).max(0.0),
            subtitle_width: available.min(SUBTITLE_MAX_WIDTH).max(0.0),
        }
    }
}

/// Sizes the surface's backing store and lays out the scene.
pub struct ViewportLayoutEngine;

impl ViewportLayoutEngine {
    /// Fit surface and scene to `container`, returning the visible size.
    ///
    /// The backing store is only reallocated (and zoom only reset) when the
    /// physical size differs from the current one. Background coverage and
    /// text placement are redone on every call; the background spans the
    /// whole backing store at the surface's current zoom.
    pub fn fit(surface: &mut dyn RenderSurface, scene: &mut Scene, container: &ContainerMetrics) -> Size {
        let visible = container.visible_size();
        let (width, height) = container.physical_size();

        if surface.backing_size() != (width, height) {
            let dpr = container.effective_dpr();
            log::debug!("Reallocating backing store to {}x{} (dpr {})", width, height, dpr);
            surface.set_backing_size(width, height);
            surface.set_zoom(dpr);
            scene.set_zoom(dpr);
        }

        // Scene units are drawn at the surface zoom, so divide it back out
        let zoom = surface.zoom();
        let zoom = if zoom.is_finite() && zoom > 0.0 { zoom } else { 1.0 };
        if let Some(background) = scene.background_mut() {
            background.cover(Size::new(width as f64 / zoom, height as f64 / zoom));
        }
        Self::place_text_objects(scene, visible);
        surface.request_render();
        visible
    }

    /// Recompute title and subtitle position and width from scratch.
    pub fn place_text_objects(scene: &mut Scene, visible: Size) {
        let layout = TextLayout::for_visible(visible);

        let title_bottom = match scene.text_mut(TextRole::Title) {
            Some(title) => {
                title.position = Point::new(layout.padding, layout.top);
                title.set_box_width(layout.title_width);
                title.position.y + title.height
            }
            None => layout.top,
        };

        if let Some(subtitle) = scene.text_mut(TextRole::Subtitle) {
            subtitle.position = Point::new(layout.padding, title_bottom + SUBTITLE_GAP);
            subtitle.set_box_width(layout.subtitle_width);
        }
    }
}
