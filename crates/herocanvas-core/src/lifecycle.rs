//! Mounting, teardown and the public operations of one hero canvas.

use crate::export::{DownloadTrigger, ExportError, ExportRenderer, PngExport};
use crate::fonts::{FontPreloadGate, FontSource, FontSpec, Timer};
use crate::objects::{
    AssetError, BackgroundFill, ImageResource, ObjectId, ObjectTransform, SceneObject, SceneObjectFactory, SerializableColor,
    TextRole,
};
use crate::placement::AssetPlacementEngine;
use crate::presets::{PresetRole, PresetTextController};
use crate::resize::{ResizeSource, ResizeSubscription};
use crate::scene::Scene;
use crate::surface::RenderSurface;
use crate::theme::{Theme, ThemePalette, ThemeRecolorController};
use crate::viewport::{ContainerMetrics, ViewportLayoutEngine};
use kurbo::{Point, Size};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::cell::RefCell;
use std::sync::Arc;
use std::time::Duration;

/// Hit-test slack for pointer selection, in visible units.
const SELECT_TOLERANCE: f64 = 4.0;

/// Ticket from [`SceneLifecycleManager::begin_mount`], redeemed by
/// [`SceneLifecycleManager::complete_mount`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneHandle {
    generation: u64,
}

/// Owns the surface and scene of one mounted hero view.
///
/// Every operation other than mounting is a no-op until the scene is ready
/// and again after [`SceneLifecycleManager::unmount`].
pub struct SceneLifecycleManager {
    surface: Option<Box<dyn RenderSurface>>,
    scene: Option<Scene>,
    resize_source: Box<dyn ResizeSource>,
    subscription: Option<ResizeSubscription>,
    container: ContainerMetrics,
    visible: Size,
    theme: Theme,
    preset: PresetRole,
    background_fill: BackgroundFill,
    rng: StdRng,
    generation: u64,
    disposed: bool,
    ready: bool,
}

impl SceneLifecycleManager {
    pub fn new(resize_source: Box<dyn ResizeSource>, theme: Theme) -> Self {
        Self::with_rng(resize_source, theme, StdRng::from_entropy())
    }

    /// Manager with a fixed placement seed.
    pub fn with_seed(resize_source: Box<dyn ResizeSource>, theme: Theme, seed: u64) -> Self {
        Self::with_rng(resize_source, theme, StdRng::seed_from_u64(seed))
    }

    fn with_rng(resize_source: Box<dyn ResizeSource>, theme: Theme, rng: StdRng) -> Self {
        Self {
            surface: None,
            scene: None,
            resize_source,
            subscription: None,
            container: ContainerMetrics::default(),
            visible: Size::ZERO,
            theme,
            preset: PresetRole::default(),
            background_fill: BackgroundFill::Solid(SerializableColor::transparent()),
            rng,
            generation: 0,
            disposed: false,
            ready: false,
        }
    }

    /// First half of mounting: take the surface and remember the container.
    ///
    /// Any previous mount is torn down first.
    pub fn begin_mount(&mut self, surface: Box<dyn RenderSurface>, container: ContainerMetrics) -> SceneHandle {
        if self.surface.is_some() || self.scene.is_some() {
            self.unmount();
        }
        self.generation += 1;
        self.disposed = false;
        self.surface = Some(surface);
        self.container = container;
        SceneHandle {
            generation: self.generation,
        }
    }

    /// Second half of mounting, after fonts settled: build the scene, lay it
    /// out and subscribe to resizes.
    ///
    /// Returns `false` without touching anything when the manager was
    /// unmounted or mounted again since `handle` was issued.
    pub fn complete_mount(&mut self, handle: SceneHandle) -> bool {
        if self.disposed || handle.generation != self.generation || self.scene.is_some() {
            log::debug!("Discarding stale mount (generation {})", handle.generation);
            return false;
        }
        let Some(surface) = self.surface.as_mut() else {
            return false;
        };

        let palette = ThemePalette::for_theme(self.theme.is_dark());
        let (title, subtitle) = self.preset.text();
        let scene = Scene::from_objects(
            SceneObjectFactory::background(Size::ZERO),
            SceneObjectFactory::title(title, palette.title),
            SceneObjectFactory::subtitle(subtitle, palette.subtitle),
        );
        let mut scene = match scene {
            Ok(scene) => scene,
            Err(err) => {
                log::warn!("Failed to build scene: {}", err);
                return false;
            }
        };

        if let Some(background) = scene.background_mut() {
            background.fill = self.background_fill;
        }
        self.visible = ViewportLayoutEngine::fit(surface.as_mut(), &mut scene, &self.container);
        self.scene = Some(scene);
        if self.subscription.is_none() {
            self.subscription = Some(self.resize_source.subscribe());
        }
        self.ready = true;
        log::info!(
            "Hero canvas mounted at {}x{} (dpr {})",
            self.visible.width,
            self.visible.height,
            self.container.effective_dpr()
        );
        true
    }

    /// Mount `surface`, waiting for fonts first.
    ///
    /// The `RefCell` is not borrowed while the font gate is pending, so the
    /// host may unmount in the meantime; the late completion is then ignored.
    pub async fn mount(
        manager: &RefCell<Self>,
        surface: Box<dyn RenderSurface>,
        container: ContainerMetrics,
        fonts: &dyn FontSource,
        timer: &dyn Timer,
        specs: &[FontSpec],
        timeout: Duration,
    ) -> bool {
        let handle = manager.borrow_mut().begin_mount(surface, container);
        let report = FontPreloadGate::wait(fonts, timer, specs, timeout).await;
        log::debug!("Font gate finished: {:?}", report);
        manager.borrow_mut().complete_mount(handle)
    }

    /// Tear down: unsubscribe, drop the scene, release the surface.
    /// Safe to call repeatedly and before mounting.
    pub fn unmount(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            self.resize_source.unsubscribe(subscription);
        }
        let had_scene = self.scene.take().is_some();
        if let Some(mut surface) = self.surface.take() {
            surface.release();
        }
        self.ready = false;
        self.disposed = true;
        if had_scene {
            log::info!("Hero canvas unmounted");
        }
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn scene(&self) -> Option<&Scene> {
        self.scene.as_ref()
    }

    pub fn visible_size(&self) -> Size {
        self.visible
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn preset(&self) -> PresetRole {
        self.preset
    }

    pub fn active_object(&self) -> Option<ObjectId> {
        self.scene.as_ref().and_then(Scene::active)
    }

    fn live(&mut self) -> Option<(&mut Scene, &mut dyn RenderSurface)> {
        match (self.scene.as_mut(), self.surface.as_mut()) {
            (Some(scene), Some(surface)) => {
                let surface: &mut dyn RenderSurface = surface.as_mut();
                Some((scene, surface))
            }
            _ => {
                log::debug!("Ignoring operation without a live scene");
                None
            }
        }
    }

    pub fn apply_preset(&mut self, role: PresetRole) {
        let Some((scene, surface)) = self.live() else {
            return;
        };
        PresetTextController::apply(scene, surface, role);
        self.preset = role;
    }

    /// Remove every sprite and restore both labels to their defaults at the
    /// canonical layout position. Returns the number of removed sprites.
    pub fn reset(&mut self) -> usize {
        let visible = self.visible;
        let palette = ThemePalette::for_theme(self.theme.is_dark());
        let default_preset = PresetRole::default();
        let Some((scene, surface)) = self.live() else {
            return 0;
        };

        let removed = scene.clear_sprites();
        scene.clear_active();
        let (title, subtitle) = default_preset.text();
        for (role, content) in [(TextRole::Title, title), (TextRole::Subtitle, subtitle)] {
            if let Some(label) = scene.text_mut(role) {
                label.set_content(content);
                label.fill = palette.text_fill(role);
                label.transform = ObjectTransform::IDENTITY;
            }
        }
        ViewportLayoutEngine::place_text_objects(scene, visible);
        surface.request_render();

        self.preset = default_preset;
        log::debug!("Reset removed {} sprites", removed);
        removed
    }

    /// Snapshot the scene as PNG at twice the visible size.
    pub fn export_png(&mut self) -> Result<PngExport, ExportError> {
        let visible = self.visible;
        let palette = ThemePalette::for_theme(self.theme.is_dark());
        let (scene, surface) = self.live().ok_or(ExportError::NotReady)?;
        ExportRenderer::export(scene, surface, visible, &palette)
    }

    /// Export and hand the bytes to the host's download trigger.
    pub fn export_and_download(&mut self, trigger: &mut dyn DownloadTrigger) -> Result<PngExport, ExportError> {
        let export = self.export_png()?;
        trigger.download(export.file_name, &export.bytes)?;
        Ok(export)
    }

    /// Place a decoded image. Failed decodes are ignored.
    pub fn add_image_to_canvas(&mut self, resource: Result<Arc<ImageResource>, AssetError>) -> Option<ObjectId> {
        let visible = self.visible;
        let (scene, surface) = match (self.scene.as_mut(), self.surface.as_mut()) {
            (Some(scene), Some(surface)) => (scene, surface.as_mut()),
            _ => return None,
        };
        AssetPlacementEngine::place(scene, surface, resource, visible, &mut self.rng)
    }

    /// Record the theme and recolor the labels if mounted.
    pub fn set_theme(&mut self, is_dark: bool) {
        self.theme = Theme::from_is_dark(is_dark);
        if let Some((scene, surface)) = self.live() {
            ThemeRecolorController::recolor(scene, surface, is_dark);
        }
    }

    /// Record the background fill and repaint it if mounted. Survives
    /// remounts and resets.
    pub fn set_background(&mut self, fill: BackgroundFill) {
        self.background_fill = fill;
        if let Some((scene, surface)) = self.live() {
            if let Some(background) = scene.background_mut() {
                background.fill = fill;
            }
            surface.request_render();
        }
    }

    /// Re-fit after the container changed.
    pub fn handle_resize(&mut self, container: ContainerMetrics) {
        self.container = container;
        let Some((scene, surface)) = self.live() else {
            return;
        };
        self.visible = ViewportLayoutEngine::fit(surface, scene, &container);
    }

    /// Make `id` the active object.
    pub fn select(&mut self, id: ObjectId) -> bool {
        let Some((scene, surface)) = self.live() else {
            return false;
        };
        let selected = scene.set_active(id);
        if selected {
            surface.request_render();
        }
        selected
    }

    /// Select the topmost selectable object under `point`, or deselect.
    pub fn select_at(&mut self, point: Point) -> Option<ObjectId> {
        let (scene, surface) = self.live()?;
        let hit = scene.object_at(point, SELECT_TOLERANCE);
        match hit {
            Some(id) => {
                scene.set_active(id);
            }
            None => scene.clear_active(),
        }
        surface.request_render();
        hit
    }

    pub fn clear_selection(&mut self) {
        if let Some((scene, surface)) = self.live() {
            scene.clear_active();
            surface.request_render();
        }
    }

    /// Replace the scale/rotation of a transformable object.
    pub fn transform_object(&mut self, id: ObjectId, transform: ObjectTransform) -> bool {
        self.with_controlled(id, |object| *object.transform_mut() = transform)
    }

    pub fn move_object(&mut self, id: ObjectId, position: Point) -> bool {
        self.with_controlled(id, |object| object.set_position(position))
    }

    /// Multiply the object's current scale.
    pub fn scale_object(&mut self, id: ObjectId, factor_x: f64, factor_y: f64) -> bool {
        if !(factor_x.is_finite() && factor_y.is_finite()) || factor_x == 0.0 || factor_y == 0.0 {
            return false;
        }
        self.with_controlled(id, |object| {
            let transform = object.transform_mut();
            transform.scale_x *= factor_x;
            transform.scale_y *= factor_y;
        })
    }

    /// Set the rotation angle in degrees.
    pub fn rotate_object(&mut self, id: ObjectId, angle: f64) -> bool {
        if !angle.is_finite() {
            return false;
        }
        self.with_controlled(id, |object| object.transform_mut().angle = angle.rem_euclid(360.0))
    }

    fn with_controlled(&mut self, id: ObjectId, edit: impl FnOnce(&mut SceneObject)) -> bool {
        let Some((scene, surface)) = self.live() else {
            return false;
        };
        match scene.get_mut(id) {
            Some(object) if object.affordances().has_controls => {
                edit(object);
                surface.request_render();
                true
            }
            _ => false,
        }
    }

    /// Render if something requested it since the last frame.
    pub fn present(&mut self) -> bool {
        let Some((scene, surface)) = self.live() else {
            return false;
        };
        if !surface.needs_render() {
            return false;
        }
        match surface.render(scene) {
            Ok(()) => true,
            Err(err) => {
                log::warn!("Render failed: {}", err);
                false
            }
        }
    }
}

impl Drop for SceneLifecycleManager {
    fn drop(&mut self) {
        self.unmount();
    }
}
