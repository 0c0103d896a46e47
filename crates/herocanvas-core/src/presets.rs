//! Title/subtitle presets.

use crate::objects::TextRole;
use crate::scene::Scene;
use crate::surface::RenderSurface;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Closed set of preset keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresetRole {
    #[default]
    Ux,
    Performance,
    #[serde(alias = "auth")]
    Interaction,
}

impl PresetRole {
    pub const ALL: [PresetRole; 3] = [PresetRole::Ux, PresetRole::Performance, PresetRole::Interaction];

    pub fn key(&self) -> &'static str {
        match self {
            PresetRole::Ux => "ux",
            PresetRole::Performance => "performance",
            PresetRole::Interaction => "interaction",
        }
    }

    /// (title, subtitle) pair for this preset.
    pub fn text(&self) -> (&'static str, &'static str) {
        match self {
            PresetRole::Ux => (
                "Interfaces people understand on first contact",
                "Research-led product design: flows, prototypes and design systems that hold up in production.",
            ),
            PresetRole::Performance => (
                "Fast by default, not by accident",
                "Rendering budgets, lean bundles and measured interactions that stay smooth on modest hardware.",
            ),
            PresetRole::Interaction => (
                "Motion and input that feel physical",
                "Direct manipulation, gesture handling and sign-in flows tuned until they disappear.",
            ),
        }
    }

    pub fn title(&self) -> &'static str {
        self.text().0
    }

    pub fn subtitle(&self) -> &'static str {
        self.text().1
    }
}

impl fmt::Display for PresetRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown preset {0:?}")]
pub struct UnknownPreset(pub String);

impl FromStr for PresetRole {
    type Err = UnknownPreset;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ux" => Ok(PresetRole::Ux),
            "performance" => Ok(PresetRole::Performance),
            "interaction" | "auth" => Ok(PresetRole::Interaction),
            _ => Err(UnknownPreset(s.to_string())),
        }
    }
}

/// Swaps label content by preset.
pub struct PresetTextController;

impl PresetTextController {
    /// Overwrite both labels with the preset's text and re-measure them.
    /// Position, transform and fill are left as they are.
    pub fn apply(scene: &mut Scene, surface: &mut dyn RenderSurface, role: PresetRole) {
        let (title, subtitle) = role.text();
        for (text_role, content) in [(TextRole::Title, title), (TextRole::Subtitle, subtitle)] {
            if let Some(label) = scene.text_mut(text_role) {
                label.set_content(content);
            }
        }
        surface.request_render();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::{ObjectTransform, SceneObjectFactory, SerializableColor};
    use crate::surface::testing::RecordingSurface;
    use kurbo::{Point, Size};

    fn scene() -> Scene {
        let ink = SerializableColor::rgb(1, 2, 3);
        let (title, subtitle) = PresetRole::Ux.text();
        let mut scene = Scene::from_objects(
            SceneObjectFactory::background(Size::new(800.0, 600.0)),
            SceneObjectFactory::title(title, ink),
            SceneObjectFactory::subtitle(subtitle, ink),
        )
        .unwrap();
        scene.text_mut(TextRole::Title).unwrap().set_box_width(600.0);
        scene.text_mut(TextRole::Subtitle).unwrap().set_box_width(600.0);
        scene
    }

    fn contents(scene: &Scene) -> (String, String) {
        (
            scene.text(TextRole::Title).unwrap().content().to_string(),
            scene.text(TextRole::Subtitle).unwrap().content().to_string(),
        )
    }

    #[test]
    fn test_parse_keys() {
        assert_eq!("ux".parse(), Ok(PresetRole::Ux));
        assert_eq!("Performance".parse(), Ok(PresetRole::Performance));
        assert_eq!("auth".parse(), Ok(PresetRole::Interaction));
        assert_eq!("interaction".parse(), Ok(PresetRole::Interaction));
        assert!("marketing".parse::<PresetRole>().is_err());
        for role in PresetRole::ALL {
            assert_eq!(role.key().parse(), Ok(role));
        }
    }

    #[test]
    fn test_serde_alias() {
        let role: PresetRole = serde_json::from_str("\"auth\"").unwrap();
        assert_eq!(role, PresetRole::Interaction);
        assert_eq!(serde_json::to_string(&PresetRole::Ux).unwrap(), "\"ux\"");
    }

    #[test]
    fn test_apply_round_trip() {
        let mut scene = scene();
        let mut surface = RecordingSurface::new();

        PresetTextController::apply(&mut scene, &mut surface, PresetRole::Performance);
        let once = contents(&scene);
        PresetTextController::apply(&mut scene, &mut surface, PresetRole::Performance);
        assert_eq!(once, contents(&scene));
        assert_eq!(once.0, PresetRole::Performance.title());

        PresetTextController::apply(&mut scene, &mut surface, PresetRole::Interaction);
        PresetTextController::apply(&mut scene, &mut surface, PresetRole::Ux);
        PresetTextController::apply(&mut scene, &mut surface, PresetRole::Performance);
        assert_eq!(once, contents(&scene));
    }

    #[test]
    fn test_apply_preserves_geometry_and_fill() {
        let mut scene = scene();
        let mut surface = RecordingSurface::new();
        {
            let title = scene.text_mut(TextRole::Title).unwrap();
            title.position = Point::new(150.0, 90.0);
            title.transform = ObjectTransform {
                scale_x: 1.5,
                scale_y: 1.5,
                angle: 12.0,
            };
        }
        let before = scene.text(TextRole::Title).unwrap().clone();

        PresetTextController::apply(&mut scene, &mut surface, PresetRole::Interaction);

        let after = scene.text(TextRole::Title).unwrap();
        assert_eq!(after.position, before.position);
        assert_eq!(after.transform, before.transform);
        assert_eq!(after.fill, before.fill);
        assert_eq!(after.width, before.width);
        assert_eq!(after.content(), PresetRole::Interaction.title());
        assert!(surface.dirty);
    }
}
