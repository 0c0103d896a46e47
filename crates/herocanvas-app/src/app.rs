//! Headless host: mounts one hero canvas, places assets, replays resizes
//! and exports the result.

use crate::config::{AppConfig, ConfigError};
use crate::host::{FileDownload, HostResizeSource, scan_asset_dir};
use herocanvas_core::{
    AssetCatalog, ExportError, FontSpec, ImageResource, SceneLifecycleManager, ThreadTimer,
};
use herocanvas_render::{FontDbSource, RasterSurface, build_font_database, load_image};
use kurbo::Size;
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

/// Name of the optional scene snapshot written next to the export.
pub const SCENE_JSON_FILE_NAME: &str = "scene.json";

/// Application errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Failed to read assets from {path}: {source}")]
    Assets {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Hero canvas failed to mount")]
    MountFailed,
    #[error("Export failed: {0}")]
    Export(#[from] ExportError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to serialize scene: {0}")]
    Json(#[from] serde_json::Error),
}

/// What a run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    /// Visible size after the last resize.
    pub visible: Size,
    pub sprites: usize,
    pub export_path: PathBuf,
    pub export_width: u32,
    pub export_height: u32,
    pub scene_json: Option<PathBuf>,
}

/// Run the host once with `config`.
pub fn run(config: &AppConfig) -> Result<RunSummary, AppError> {
    let catalog = match &config.asset_dir {
        Some(dir) => scan_asset_dir(dir).map_err(|source| AppError::Assets {
            path: dir.clone(),
            source,
        })?,
        None => AssetCatalog::default(),
    };

    let mut font_dirs: Vec<&Path> = config.font_dirs.iter().map(PathBuf::as_path).collect();
    let bundled_fonts = config.asset_dir.as_ref().map(|dir| dir.join("fonts"));
    if let Some(dir) = bundled_fonts.as_deref().filter(|dir| dir.is_dir()) {
        font_dirs.push(dir);
    }
    let fontdb = build_font_database(&font_dirs);

    let resize_source = HostResizeSource::new();
    let mut manager = match config.seed {
        Some(seed) => SceneLifecycleManager::with_seed(Box::new(resize_source.clone()), config.theme, seed),
        None => SceneLifecycleManager::new(Box::new(resize_source.clone()), config.theme),
    };
    if let Some(fill) = config.background {
        manager.set_background(fill);
    }
    let manager = RefCell::new(manager);

    let surface = Box::new(RasterSurface::new(fontdb.clone()));
    let fonts = FontDbSource::new(fontdb);
    let mounted = pollster::block_on(SceneLifecycleManager::mount(
        &manager,
        surface,
        config.container(),
        &fonts,
        &ThreadTimer,
        &FontSpec::defaults(),
        config.font_timeout(),
    ));
    if !mounted {
        return Err(AppError::MountFailed);
    }
    let mut manager = manager.into_inner();

    manager.apply_preset(config.preset);
    place_assets(&mut manager, &catalog, config.placements);
    manager.present();

    for step in &config.resize_steps {
        log::debug!("Resize to {:?}", step);
        manager.handle_resize(*step);
        manager.present();
    }

    let mut download = FileDownload::new(&config.output_dir);
    let export = manager.export_and_download(&mut download)?;
    let export_path = download
        .last_path()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| config.output_dir.join(export.file_name));

    let scene_json = match manager.scene() {
        Some(scene) if config.write_scene_json => {
            let path = config.output_dir.join(SCENE_JSON_FILE_NAME);
            std::fs::write(&path, scene.to_json()?)?;
            Some(path)
        }
        _ => None,
    };

    let summary = RunSummary {
        visible: manager.visible_size(),
        sprites: manager.scene().map_or(0, |scene| scene.sprite_ids().count()),
        export_path,
        export_width: export.width,
        export_height: export.height,
        scene_json,
    };
    manager.unmount();
    log::debug!("Resize listeners left: {}", resize_source.active());
    Ok(summary)
}

/// Place `count` sprites, cycling through the catalog. Each file is decoded
/// once; failures are handed on and dropped by the placement engine.
fn place_assets(manager: &mut SceneLifecycleManager, catalog: &AssetCatalog, count: usize) -> usize {
    if catalog.is_empty() {
        if count > 0 {
            log::warn!("No assets available for {} placements", count);
        }
        return 0;
    }

    let mut decoded: HashMap<PathBuf, Arc<ImageResource>> = HashMap::new();
    let mut placed = 0;
    for entry in catalog.entries().iter().cycle().take(count) {
        let resource = match decoded.get(&entry.handle) {
            Some(resource) => Ok(resource.clone()),
            None => load_image(&entry.handle).map(Arc::new),
        };
        if let Ok(resource) = &resource {
            decoded.entry(entry.handle.clone()).or_insert_with(|| resource.clone());
        }
        log::debug!("Placing {}", entry.label);
        if manager.add_image_to_canvas(resource).is_some() {
            placed += 1;
        }
    }
    log::info!("Placed {} of {} sprites", placed, count);
    placed
}

#[cfg(test)]
mod tests {
    use super::*;
    use herocanvas_core::{BackgroundFill, ContainerMetrics, EXPORT_FILE_NAME, SerializableColor, Theme};

    fn png_bytes(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
        let mut out = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut out, width, height);
            encoder.set_color(png::ColorType::Rgba);
            encoder.set_depth(png::BitDepth::Eight);
            let mut writer = encoder.write_header().unwrap();
            writer.write_image_data(&rgba.repeat((width * height) as usize)).unwrap();
        }
        out
    }

    fn config_in(root: &Path) -> AppConfig {
        AppConfig {
            output_dir: root.join("out"),
            font_timeout_ms: 50,
            seed: Some(7),
            ..AppConfig::default()
        }
    }

    #[test]
    fn test_run_exports_at_double_visible_size() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            container_width: 640.0,
            container_height: 400.0,
            device_pixel_ratio: 2.0,
            ..config_in(dir.path())
        };

        let summary = run(&config).unwrap();
        assert_eq!(summary.visible, Size::new(640.0, 400.0));
        assert_eq!((summary.export_width, summary.export_height), (1280, 800));
        assert_eq!(summary.export_path, dir.path().join("out").join(EXPORT_FILE_NAME));
        let bytes = std::fs::read(&summary.export_path).unwrap();
        assert_eq!(&bytes[..4], &[0x89, b'P', b'N', b'G']);
        assert_eq!(summary.sprites, 0);
        assert!(summary.scene_json.is_none());
    }

    #[test]
    fn test_run_gradient_covers_export_at_dpr_2() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            container_width: 400.0,
            container_height: 400.0,
            device_pixel_ratio: 2.0,
            background: Some(BackgroundFill::LinearGradient {
                top: SerializableColor::rgb(0, 0, 0),
                bottom: SerializableColor::rgb(255, 255, 255),
            }),
            ..config_in(dir.path())
        };

        let summary = run(&config).unwrap();
        assert_eq!((summary.export_width, summary.export_height), (800, 800));

        let file = std::fs::File::open(&summary.export_path).unwrap();
        let mut reader = png::Decoder::new(std::io::BufReader::new(file)).read_info().unwrap();
        let mut buf = vec![0; reader.output_buffer_size()];
        let info = reader.next_frame(&mut buf).unwrap();
        let channels = info.color_type.samples();
        let at = |x: usize, y: usize| buf[(y * info.width as usize + x) * channels];
        assert!(at(5, 1) < 10);
        assert!(at(5, 798) > 245);
    }

    #[test]
    fn test_run_places_assets_and_skips_broken_files() {
        let dir = tempfile::tempdir().unwrap();
        let assets = dir.path().join("assets");
        std::fs::create_dir(&assets).unwrap();
        std::fs::write(assets.join("glow.png"), png_bytes(40, 30, [200, 80, 40, 255])).unwrap();
        std::fs::write(assets.join("broken.png"), b"not a png").unwrap();

        let config = AppConfig {
            asset_dir: Some(assets),
            placements: 3,
            theme: Theme::Light,
            resize_steps: vec![ContainerMetrics::new(800.0, 600.0, 2.0)],
            write_scene_json: true,
            ..config_in(dir.path())
        };

        let summary = run(&config).unwrap();
        // broken, glow, broken
        assert_eq!(summary.sprites, 1);
        assert_eq!(summary.visible, Size::new(800.0, 600.0));
        assert_eq!((summary.export_width, summary.export_height), (1600, 1200));

        let json_path = summary.scene_json.unwrap();
        let json: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(json_path).unwrap()).unwrap();
        assert!(json.is_object());
    }

    #[test]
    fn test_run_missing_asset_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            asset_dir: Some(dir.path().join("missing")),
            ..config_in(dir.path())
        };
        assert!(matches!(run(&config), Err(AppError::Assets { .. })));
    }

    #[test]
    fn test_small_container_clamps_visible_size() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            container_width: 100.0,
            container_height: 100.0,
            ..config_in(dir.path())
        };
        let summary = run(&config).unwrap();
        assert_eq!(summary.visible, Size::new(320.0, 360.0));
        assert_eq!((summary.export_width, summary.export_height), (640, 720));
    }
}
