//! Ordered list of image assets offered to the user.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One clickable asset: display label, file name and where to load it from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetEntry {
    pub label: String,
    pub file_name: String,
    pub handle: PathBuf,
}

impl AssetEntry {
    /// Entry whose label is derived from the file stem.
    pub fn from_path(handle: impl Into<PathBuf>) -> Option<Self> {
        let handle = handle.into();
        let file_name = handle.file_name()?.to_str()?.to_string();
        let stem = handle.file_stem()?.to_str()?;
        Some(Self {
            label: display_label(stem),
            file_name,
            handle,
        })
    }
}

/// `hero-glow_02` -> `Hero Glow 02`
pub fn display_label(stem: &str) -> String {
    stem.split(['-', '_', ' '])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Assets in display order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetCatalog {
    entries: Vec<AssetEntry>,
}

impl AssetCatalog {
    /// Build a catalog sorted by file name.
    pub fn new(mut entries: Vec<AssetEntry>) -> Self {
        entries.sort_by(|a, b| a.file_name.cmp(&b.file_name));
        Self { entries }
    }

    pub fn entries(&self) -> &[AssetEntry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&AssetEntry> {
        self.entries.get(index)
    }

    pub fn find(&self, file_name: &str) -> Option<&AssetEntry> {
        self.entries.iter().find(|e| e.file_name == file_name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_label() {
        assert_eq!(display_label("hero-glow_02"), "Hero Glow 02");
        assert_eq!(display_label("orb"), "Orb");
        assert_eq!(display_label("--"), "");
    }

    #[test]
    fn test_catalog_is_sorted() {
        let catalog = AssetCatalog::new(vec![
            AssetEntry::from_path("assets/zeta.png").unwrap(),
            AssetEntry::from_path("assets/alpha-orb.webp").unwrap(),
        ]);
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.entries()[0].label, "Alpha Orb");
        assert_eq!(catalog.find("zeta.png").unwrap().label, "Zeta");
        assert!(catalog.get(2).is_none());
    }
}
