//! PNG export with a temporary opaque backdrop.

use crate::scene::Scene;
use crate::surface::{RenderSurface, SurfaceError};
use crate::theme::ThemePalette;
use kurbo::Size;
use thiserror::Error;

/// Fixed output multiplier relative to the visible size.
pub const EXPORT_MULTIPLIER: f64 = 2.0;
/// File name handed to the download trigger.
pub const EXPORT_FILE_NAME: &str = "cover-hero.png";

/// Export errors.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("No live scene to export")]
    NotReady,
    #[error("Surface error: {0}")]
    Surface(#[from] SurfaceError),
    #[error("Download failed: {0}")]
    Download(#[from] DownloadError),
}

/// Download errors.
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Download rejected: {0}")]
    Rejected(String),
}

/// Host hook that saves a finished export.
pub trait DownloadTrigger {
    fn download(&mut self, file_name: &str, bytes: &[u8]) -> Result<(), DownloadError>;
}

/// An encoded snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PngExport {
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub file_name: &'static str,
}

pub struct ExportRenderer;

impl ExportRenderer {
    /// Capture the scene at `visible × 2` over the palette's export color.
    ///
    /// The selection is cleared first. The backdrop lives only inside
    /// [`Scene::with_export_backdrop`], so no render is requested while it is
    /// present; one render is requested afterwards to restore the editing view.
    pub fn export(
        scene: &mut Scene,
        surface: &mut dyn RenderSurface,
        visible: Size,
        palette: &ThemePalette,
    ) -> Result<PngExport, ExportError> {
        scene.clear_active();

        let captured = scene.with_export_backdrop(visible, palette.export_background, |scene| {
            surface.capture_png(scene, visible, EXPORT_MULTIPLIER)
        });
        surface.request_render();

        let bytes = captured?;
        let export = PngExport {
            bytes,
            width: (visible.width * EXPORT_MULTIPLIER).round() as u32,
            height: (visible.height * EXPORT_MULTIPLIER).round() as u32,
            file_name: EXPORT_FILE_NAME,
        };
        log::info!("Exported {}x{} PNG ({} bytes)", export.width, export.height, export.bytes.len());
        Ok(export)
    }
}
