//! Host-side adapters: resize subscriptions, file downloads and the asset
//! directory scan.

use herocanvas_core::{AssetCatalog, AssetEntry, DownloadError, DownloadTrigger, ImageFormat, ResizeSource, ResizeSubscription};
use std::cell::RefCell;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::rc::Rc;

#[derive(Debug, Default)]
struct ResizeState {
    next: u64,
    active: BTreeSet<u64>,
}

/// Resize source for the headless host. Events are replayed by the runner,
/// so this only tracks which listeners are registered.
#[derive(Debug, Default, Clone)]
pub struct HostResizeSource {
    state: Rc<RefCell<ResizeState>>,
}

impl HostResizeSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered listeners.
    pub fn active(&self) -> usize {
        self.state.borrow().active.len()
    }
}

impl ResizeSource for HostResizeSource {
    fn subscribe(&mut self) -> ResizeSubscription {
        let mut state = self.state.borrow_mut();
        state.next += 1;
        let id = state.next;
        state.active.insert(id);
        log::debug!("Resize listener {} registered", id);
        ResizeSubscription(id)
    }

    fn unsubscribe(&mut self, subscription: ResizeSubscription) {
        if self.state.borrow_mut().active.remove(&subscription.0) {
            log::debug!("Resize listener {} removed", subscription.0);
        } else {
            log::warn!("Unknown resize listener {}", subscription.0);
        }
    }
}

/// Saves downloads into a directory.
#[derive(Debug, Clone)]
pub struct FileDownload {
    output_dir: PathBuf,
    last_path: Option<PathBuf>,
}

impl FileDownload {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            last_path: None,
        }
    }

    /// Path of the most recent download.
    pub fn last_path(&self) -> Option<&Path> {
        self.last_path.as_deref()
    }
}

impl DownloadTrigger for FileDownload {
    fn download(&mut self, file_name: &str, bytes: &[u8]) -> Result<(), DownloadError> {
        if file_name.is_empty() || file_name.contains(['/', '\\']) {
            return Err(DownloadError::Rejected(format!("invalid file name {file_name:?}")));
        }
        std::fs::create_dir_all(&self.output_dir)?;
        let path = self.output_dir.join(file_name);
        std::fs::write(&path, bytes)?;
        log::info!("Saved {} ({} bytes)", path.display(), bytes.len());
        self.last_path = Some(path);
        Ok(())
    }
}

/// Collect the supported images in `dir` (non-recursive).
pub fn scan_asset_dir(dir: &Path) -> std::io::Result<AssetCatalog> {
    let mut entries = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let supported = path
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(ImageFormat::from_extension)
            .is_some();
        if !supported {
            continue;
        }
        if let Some(asset) = AssetEntry::from_path(path) {
            entries.push(asset);
        }
    }
    log::debug!("Found {} assets in {}", entries.len(), dir.display());
    Ok(AssetCatalog::new(entries))
}
