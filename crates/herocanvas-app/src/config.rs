//! Application configuration: JSON file plus command-line overrides.

use clap::{Parser, ValueEnum};
use herocanvas_core::{BackgroundFill, ContainerMetrics, DEFAULT_FONT_TIMEOUT, PresetRole, SerializableColor, Theme};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub container_width: f64,
    pub container_height: f64,
    pub device_pixel_ratio: f64,
    pub theme: Theme,
    pub preset: PresetRole,
    /// Background fill; transparent when absent.
    pub background: Option<BackgroundFill>,
    /// Directory scanned for PNG/JPEG/WebP assets.
    pub asset_dir: Option<PathBuf>,
    /// How many sprites to place, cycling through the catalog.
    pub placements: usize,
    /// Where `cover-hero.png` is written.
    pub output_dir: PathBuf,
    pub font_timeout_ms: u64,
    /// Extra directories with .ttf/.otf/.ttc files.
    pub font_dirs: Vec<PathBuf>,
    /// Placement seed; random when absent.
    pub seed: Option<u64>,
    /// Container sizes replayed as resize events after mounting.
    pub resize_steps: Vec<ContainerMetrics>,
    /// Also write a JSON snapshot of the scene next to the export.
    pub write_scene_json: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            container_width: 1280.0,
            container_height: 720.0,
            device_pixel_ratio: 1.0,
            theme: Theme::Dark,
            preset: PresetRole::Ux,
            background: None,
            asset_dir: None,
            placements: 0,
            output_dir: PathBuf::from("."),
            font_timeout_ms: DEFAULT_FONT_TIMEOUT.as_millis() as u64,
            font_dirs: Vec::new(),
            seed: None,
            resize_steps: Vec::new(),
            write_scene_json: false,
        }
    }
}

impl AppConfig {
    /// Load from a JSON file; missing fields keep their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn container(&self) -> ContainerMetrics {
        ContainerMetrics::new(self.container_width, self.container_height, self.device_pixel_ratio)
    }

    pub fn font_timeout(&self) -> Duration {
        Duration::from_millis(self.font_timeout_ms)
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ThemeChoice {
    Light,
    Dark,
}

impl From<ThemeChoice> for Theme {
    fn from(choice: ThemeChoice) -> Self {
        match choice {
            ThemeChoice::Light => Theme::Light,
            ThemeChoice::Dark => Theme::Dark,
        }
    }
}

/// Parse `WIDTHxHEIGHT` or `WIDTHxHEIGHT@DPR`.
pub fn parse_container(s: &str) -> Result<ContainerMetrics, String> {
    let (dims, dpr) = match s.split_once('@') {
        Some((dims, dpr)) => (dims, dpr.parse::<f64>().map_err(|e| format!("bad dpr {dpr:?}: {e}"))?),
        None => (s, 1.0),
    };
    let (w, h) = dims
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got {s:?}"))?;
    let width = w.trim().parse::<f64>().map_err(|e| format!("bad width {w:?}: {e}"))?;
    let height = h.trim().parse::<f64>().map_err(|e| format!("bad height {h:?}: {e}"))?;
    Ok(ContainerMetrics::new(width, height, dpr))
}

/// Parse `TOP,BOTTOM` hex colors into a vertical gradient.
pub fn parse_gradient(s: &str) -> Result<BackgroundFill, String> {
    let (top, bottom) = s
        .split_once(',')
        .ok_or_else(|| format!("expected TOP,BOTTOM, got {s:?}"))?;
    let color = |hex: &str| SerializableColor::from_hex(hex).ok_or_else(|| format!("bad color {hex:?}"));
    Ok(BackgroundFill::LinearGradient {
        top: color(top)?,
        bottom: color(bottom)?,
    })
}

/// Render the hero cover canvas headlessly and export it as PNG.
#[derive(Parser, Debug)]
#[command(name = "herocanvas", version)]
pub struct Cli {
    /// JSON configuration file.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Container width in CSS pixels.
    #[arg(long)]
    pub width: Option<f64>,

    /// Container height in CSS pixels.
    #[arg(long)]
    pub height: Option<f64>,

    /// Device pixel ratio (capped at 2).
    #[arg(long)]
    pub dpr: Option<f64>,

    #[arg(long, value_enum)]
    pub theme: Option<ThemeChoice>,

    /// Preset key: ux, performance, interaction (or auth).
    #[arg(long)]
    pub preset: Option<PresetRole>,

    /// Vertical background gradient as TOP,BOTTOM hex colors.
    #[arg(long, value_parser = parse_gradient)]
    pub gradient: Option<BackgroundFill>,

    /// Directory of image assets.
    #[arg(long)]
    pub assets: Option<PathBuf>,

    /// Number of sprites to place.
    #[arg(long)]
    pub placements: Option<usize>,

    /// Output directory for cover-hero.png.
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Font warm-up timeout in milliseconds.
    #[arg(long)]
    pub font_timeout_ms: Option<u64>,

    /// Additional font directory (repeatable).
    #[arg(long = "font-dir")]
    pub font_dirs: Vec<PathBuf>,

    /// Placement seed.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Resize step as WIDTHxHEIGHT[@DPR] (repeatable).
    #[arg(long = "resize", value_parser = parse_container)]
    pub resize_steps: Vec<ContainerMetrics>,

    /// Write scene.json next to the export.
    #[arg(long)]
    pub scene_json: bool,
}

impl Cli {
    /// Configuration from the optional file with flags applied on top.
    pub fn resolve(&self) -> Result<AppConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => AppConfig::load(path)?,
            None => AppConfig::default(),
        };
        self.apply(&mut config);
        Ok(config)
    }

    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(width) = self.width {
            config.container_width = width;
        }
        if let Some(height) = self.height {
            config.container_height = height;
        }
        if let Some(dpr) = self.dpr {
            config.device_pixel_ratio = dpr;
        }
        if let Some(theme) = self.theme {
            config.theme = theme.into();
        }
        if let Some(preset) = self.preset {
            config.preset = preset;
        }
        if let Some(gradient) = self.gradient {
            config.background = Some(gradient);
        }
        if let Some(assets) = &self.assets {
            config.asset_dir = Some(assets.clone());
        }
        if let Some(placements) = self.placements {
            config.placements = placements;
        }
        if let Some(out) = &self.out {
            config.output_dir = out.clone();
        }
        if let Some(timeout) = self.font_timeout_ms {
            config.font_timeout_ms = timeout;
        }
        config.font_dirs.extend(self.font_dirs.iter().cloned());
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if !self.resize_steps.is_empty() {
            config.resize_steps = self.resize_steps.clone();
        }
        if self.scene_json {
            config.write_scene_json = true;
        }
    }
}
