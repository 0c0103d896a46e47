//! HeroCanvas application host.
//!
//! Loads configuration, scans the asset directory, mounts a hero canvas on a
//! CPU raster surface and writes the exported cover image.

pub mod app;
pub mod config;
pub mod host;

pub use app::{AppError, RunSummary, SCENE_JSON_FILE_NAME, run};
pub use config::{AppConfig, Cli, ConfigError};
pub use host::{FileDownload, HostResizeSource, scan_asset_dir};
