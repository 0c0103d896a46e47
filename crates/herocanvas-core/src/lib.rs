//! HeroCanvas Core Library
//!
//! Platform-agnostic scene graph and logic for the interactive cover canvas:
//! layout, image placement, text presets, theme recoloring, PNG export and
//! the lifecycle that ties them to a rendering surface.

pub mod catalog;
pub mod export;
pub mod fonts;
pub mod lifecycle;
pub mod objects;
pub mod placement;
pub mod presets;
pub mod resize;
pub mod scene;
pub mod surface;
pub mod theme;
pub mod viewport;

pub use catalog::{AssetCatalog, AssetEntry};
pub use export::{DownloadError, DownloadTrigger, EXPORT_FILE_NAME, EXPORT_MULTIPLIER, ExportError, ExportRenderer, PngExport};
pub use fonts::{BoxFuture, DEFAULT_FONT_TIMEOUT, FontGateReport, FontLoadError, FontPreloadGate, FontSource, FontSpec, ThreadTimer, Timer};
pub use lifecycle::{SceneHandle, SceneLifecycleManager};
pub use objects::{
    AssetError, Background, BackgroundFill, ImageFormat, ImageResource, ImageSprite, ObjectId, ObjectRole,
    ObjectTransform, SceneObject, SceneObjectFactory, SceneObjectTrait, SerializableColor, TextLabel, TextRole,
};
pub use placement::AssetPlacementEngine;
pub use presets::{PresetRole, PresetTextController};
pub use resize::{ResizeSource, ResizeSubscription};
pub use scene::Scene;
pub use surface::{RenderSurface, SurfaceError};
pub use theme::{Theme, ThemePalette, ThemeRecolorController};
pub use viewport::{ContainerMetrics, ViewportLayoutEngine};
