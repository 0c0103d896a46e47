//! Theme-driven label colors.

use crate::objects::{SerializableColor, TextRole};
use crate::scene::Scene;
use crate::surface::RenderSurface;
use serde::{Deserialize, Serialize};

/// Light or dark appearance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    pub fn from_is_dark(is_dark: bool) -> Self {
        if is_dark { Theme::Dark } else { Theme::Light }
    }

    pub fn is_dark(&self) -> bool {
        *self == Theme::Dark
    }
}

/// Label fills plus the opaque color used behind exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemePalette {
    pub title: SerializableColor,
    pub subtitle: SerializableColor,
    pub export_background: SerializableColor,
}

impl ThemePalette {
    pub fn dark() -> Self {
        Self {
            title: SerializableColor::rgba(248, 250, 252, 0.96),
            subtitle: SerializableColor::rgba(226, 232, 240, 0.80),
            export_background: SerializableColor::rgb(0x0b, 0x10, 0x20),
        }
    }

    pub fn light() -> Self {
        Self {
            title: SerializableColor::rgba(15, 23, 42, 0.96),
            subtitle: SerializableColor::rgba(30, 41, 59, 0.72),
            export_background: SerializableColor::rgb(0xf4, 0xf5, 0xf7),
        }
    }

    pub fn for_theme(is_dark: bool) -> Self {
        if is_dark { Self::dark() } else { Self::light() }
    }

    pub fn text_fill(&self, role: TextRole) -> SerializableColor {
        match role {
            TextRole::Title => self.title,
            TextRole::Subtitle => self.subtitle,
        }
    }
}

/// Rewrites label fills when the theme flips.
pub struct ThemeRecolorController;

impl ThemeRecolorController {
    /// Apply the palette's text fills. Nothing but `fill` is touched.
    pub fn recolor(scene: &mut Scene, surface: &mut dyn RenderSurface, is_dark: bool) -> ThemePalette {
        let palette = ThemePalette::for_theme(is_dark);
        for role in [TextRole::Title, TextRole::Subtitle] {
            if let Some(label) = scene.text_mut(role) {
                label.fill = palette.text_fill(role);
            }
        }
        surface.request_render();
        palette
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::SceneObjectFactory;
    use crate::surface::testing::RecordingSurface;
    use kurbo::{Point, Size};

    #[test]
    fn test_palette_values() {
        let dark = ThemePalette::for_theme(true);
        assert_eq!(dark.export_background.to_hex(), "#0b1020");
        assert_eq!(dark.title.a, 245);
        assert_eq!(dark.subtitle.a, 204);

        let light = ThemePalette::for_theme(false);
        assert_eq!(light.export_background.to_hex(), "#f4f5f7");
        assert_eq!(light.title.to_hex(), "#0f172a");
        assert_eq!(light.subtitle.a, 184);
    }

    #[test]
    fn test_recolor_touches_only_fill() {
        let ink = SerializableColor::rgb(0, 0, 0);
        let mut scene = Scene::from_objects(
            SceneObjectFactory::background(Size::new(800.0, 600.0)),
            SceneObjectFactory::title("Title", ink),
            SceneObjectFactory::subtitle("Subtitle", ink),
        )
        .unwrap();
        scene.text_mut(TextRole::Subtitle).unwrap().position = Point::new(12.0, 34.0);
        let before = scene.text(TextRole::Subtitle).unwrap().clone();
        let mut surface = RecordingSurface::new();

        let palette = ThemeRecolorController::recolor(&mut scene, &mut surface, false);

        let after = scene.text(TextRole::Subtitle).unwrap();
        assert_eq!(after.fill, palette.subtitle);
        assert_eq!(after.position, before.position);
        assert_eq!(after.height, before.height);
        assert_eq!(after.content(), before.content());
        assert_eq!(scene.text(TextRole::Title).unwrap().fill, ThemePalette::light().title);
        assert!(surface.dirty);
    }

    #[test]
    fn test_theme_flag() {
        assert!(Theme::from_is_dark(true).is_dark());
        assert_eq!(Theme::default(), Theme::Dark);
    }
}
