//! Rendering surface abstraction.

use crate::scene::Scene;
use kurbo::Size;
use thiserror::Error;

/// Surface errors.
#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("Invalid surface size {width}x{height}")]
    InvalidSize { width: u32, height: u32 },
    #[error("Render failed: {0}")]
    RenderFailed(String),
    #[error("PNG encoding failed: {0}")]
    Encode(String),
    #[error("Surface has been released")]
    Released,
}

/// A pixel-addressable 2D drawing surface that scenes are rendered onto.
///
/// The backing store is measured in physical pixels; the zoom multiplier maps
/// scene coordinates (visible units) onto it.
pub trait RenderSurface {
    /// Current backing-store size in physical pixels.
    fn backing_size(&self) -> (u32, u32);

    /// Reallocate the backing store.
    fn set_backing_size(&mut self, width: u32, height: u32);

    /// Global zoom applied to all object coordinates.
    fn zoom(&self) -> f64;

    fn set_zoom(&mut self, zoom: f64);

    /// Ask for a full re-render. Surfaces coalesce requests so at most one
    /// render happens per [`RenderSurface::render`] call.
    fn request_render(&mut self);

    /// Whether a render has been requested since the last one.
    fn needs_render(&self) -> bool;

    /// Render `scene` into the backing store, clearing the pending request.
    fn render(&mut self, scene: &Scene) -> Result<(), SurfaceError>;

    /// Render `scene` offscreen at `visible × multiplier` pixels and encode it
    /// as PNG. The backing store's device pixel ratio is ignored.
    fn capture_png(&mut self, scene: &Scene, visible: Size, multiplier: f64) -> Result<Vec<u8>, SurfaceError>;

    /// Drop the backing store. Further renders fail with [`SurfaceError::Released`].
    fn release(&mut self);
}
