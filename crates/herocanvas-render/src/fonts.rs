//! Font discovery backed by the usvg font database.

use herocanvas_core::{BoxFuture, FontLoadError, FontSource, FontSpec};
use resvg::usvg::fontdb::{Database, Family, Query, Stretch, Style, Weight};
use std::path::Path;
use std::sync::Arc;

/// Build a font database from system fonts plus any font files in `dirs`.
pub fn build_font_database(dirs: &[&Path]) -> Arc<Database> {
    let mut db = Database::new();
    db.load_system_fonts();
    for dir in dirs {
        load_fonts_from_dir(&mut db, dir);
    }
    log::debug!("Font database holds {} faces", db.len());
    Arc::new(db)
}

fn load_fonts_from_dir(db: &mut Database, dir: &Path) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        let is_font = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| matches!(ext.to_ascii_lowercase().as_str(), "ttf" | "otf" | "ttc"));
        if path.is_file() && is_font {
            if let Err(err) = db.load_font_file(&path) {
                log::debug!("Skipping font {}: {}", path.display(), err);
            }
        }
    }
}

/// Resolves font specs against a font database. Lookups complete
/// immediately; a missing family is reported as an error.
#[derive(Clone)]
pub struct FontDbSource {
    db: Arc<Database>,
}

impl FontDbSource {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub fn database(&self) -> &Arc<Database> {
        &self.db
    }

    /// Whether a face with this exact family name is installed.
    pub fn has_family(&self, spec: &FontSpec) -> bool {
        let families = [Family::Name(&spec.family)];
        let query = Query {
            families: &families,
            weight: Weight(spec.weight),
            stretch: Stretch::Normal,
            style: Style::Normal,
        };
        self.db
            .query(&query)
            .and_then(|id| self.db.face(id))
            .is_some_and(|face| face.families.iter().any(|(name, _)| name.eq_ignore_ascii_case(&spec.family)))
    }
}

impl FontSource for FontDbSource {
    fn load(&self, spec: &FontSpec) -> BoxFuture<'_, Result<(), FontLoadError>> {
        let result = if self.has_family(spec) {
            Ok(())
        } else {
            Err(FontLoadError::NotAvailable(spec.to_string()))
        };
        Box::pin(std::future::ready(result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_family_is_not_available() {
        let source = FontDbSource::new(Arc::new(Database::new()));
        let spec = FontSpec::new(400, 22.0, "No Such Family 1234");
        assert!(!source.has_family(&spec));
        let result = pollster::block_on(source.load(&spec));
        assert!(matches!(result, Err(FontLoadError::NotAvailable(_))));
    }

    #[test]
    fn test_missing_font_dir_is_ignored() {
        let db = build_font_database(&[Path::new("/definitely/not/a/font/dir")]);
        let source = FontDbSource::new(db);
        assert!(!source.has_family(&FontSpec::new(400, 12.0, "No Such Family 1234")));
    }
}
