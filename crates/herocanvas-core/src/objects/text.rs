//! Text labels (title and subtitle).

use super::{Affordances, ObjectId, ObjectRole, ObjectTransform, OriginMode, SceneObjectTrait, SerializableColor};
use kurbo::{Point, Size};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Font family options. Each label role uses a fixed family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FontFamily {
    /// Display face used by the title.
    SpaceGrotesk,
    /// Text face used by the subtitle.
    Inter,
}

impl FontFamily {
    /// Get the font family name as used by the renderer.
    pub fn name(&self) -> &'static str {
        match self {
            FontFamily::SpaceGrotesk => "Space Grotesk",
            FontFamily::Inter => "Inter",
        }
    }

    /// Family list with generic fallback, for CSS/SVG `font-family`.
    pub fn css_stack(&self) -> &'static str {
        match self {
            FontFamily::SpaceGrotesk => "'Space Grotesk', 'Inter', sans-serif",
            FontFamily::Inter => "'Inter', sans-serif",
        }
    }
}

/// Font weight options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FontWeight {
    Regular,
    Bold,
}

impl FontWeight {
    /// Numeric CSS weight.
    pub fn value(&self) -> u16 {
        match self {
            FontWeight::Regular => 400,
            FontWeight::Bold => 700,
        }
    }
}

/// Which of the two persistent labels this is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TextRole {
    Title,
    Subtitle,
}

impl TextRole {
    pub fn object_role(&self) -> ObjectRole {
        match self {
            TextRole::Title => ObjectRole::Title,
            TextRole::Subtitle => ObjectRole::Subtitle,
        }
    }
}

/// A wrapped text block with fixed box width and measured height.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextLabel {
    pub(crate) id: ObjectId,
    pub(crate) text_role: TextRole,
    /// Top-left corner of the text box.
    pub position: Point,
    /// Box width; text wraps inside it.
    pub width: f64,
    /// Measured height of the wrapped text block.
    pub height: f64,
    content: String,
    pub font_family: FontFamily,
    pub font_size: f64,
    pub font_weight: FontWeight,
    /// Line height as a multiple of the font size.
    pub line_height: f64,
    /// Extra tracking in 1/1000 em.
    pub char_spacing: f64,
    pub fill: SerializableColor,
    pub transform: ObjectTransform,
    pub affordances: Affordances,
}

impl TextLabel {
    pub const TITLE_FONT_SIZE: f64 = 64.0;
    pub const SUBTITLE_FONT_SIZE: f64 = 22.0;

    /// Create a label with the fixed typography of its role.
    pub fn new(role: TextRole, content: impl Into<String>, fill: SerializableColor) -> Self {
        let (font_family, font_size, font_weight, line_height, char_spacing) = match role {
            TextRole::Title => (FontFamily::SpaceGrotesk, Self::TITLE_FONT_SIZE, FontWeight::Bold, 1.05, -20.0),
            TextRole::Subtitle => (FontFamily::Inter, Self::SUBTITLE_FONT_SIZE, FontWeight::Regular, 1.4, 0.0),
        };
        let mut label = Self {
            id: Uuid::new_v4(),
            text_role: role,
            position: Point::ZERO,
            width: 0.0,
            height: 0.0,
            content: content.into(),
            font_family,
            font_size,
            font_weight,
            line_height,
            char_spacing,
            fill,
            transform: ObjectTransform::IDENTITY,
            affordances: Affordances::interactive(true),
        };
        label.measure();
        label
    }

    pub fn text_role(&self) -> TextRole {
        self.text_role
    }

    /// Get the text content.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Replace the content and re-measure the text block.
    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
        self.measure();
    }

    /// Change the wrapping width and re-measure the text block.
    pub fn set_box_width(&mut self, width: f64) {
        self.width = width.max(0.0);
        self.measure();
    }

    /// Recompute `height` from content, typography and box width.
    pub fn measure(&mut self) {
        let line_count = self.wrapped_lines().len().max(1);
        self.height = line_count as f64 * self.line_pitch();
    }

    /// Distance between consecutive baselines.
    pub fn line_pitch(&self) -> f64 {
        self.font_size * self.line_height
    }

    /// Average horizontal advance per character, tracking included.
    pub fn char_advance(&self) -> f64 {
        // Empirical average glyph widths for the two faces
        let factor = match (self.font_family, self.font_weight) {
            (FontFamily::SpaceGrotesk, FontWeight::Regular) => 0.54,
            (FontFamily::SpaceGrotesk, FontWeight::Bold) => 0.58,
            (FontFamily::Inter, FontWeight::Regular) => 0.52,
            (FontFamily::Inter, FontWeight::Bold) => 0.56,
        };
        (self.font_size * factor + self.char_spacing / 1000.0 * self.font_size).max(1.0)
    }

    /// Width of the widest wrapped line.
    pub fn content_width(&self) -> f64 {
        self.wrapped_lines()
            .iter()
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0) as f64
            * self.char_advance()
    }

    /// Lines after greedy word wrapping at the box width.
    pub fn wrapped_lines(&self) -> Vec<String> {
        let max_chars = if self.width > 0.0 {
            ((self.width / self.char_advance()).floor() as usize).max(1)
        } else {
            usize::MAX
        };
        let mut lines = Vec::new();
        for paragraph in self.content.split('\n') {
            wrap_paragraph(paragraph, max_chars, &mut lines);
        }
        lines
    }
}

fn wrap_paragraph(paragraph: &str, max_chars: usize, out: &mut Vec<String>) {
    let mut line = String::new();
    let mut line_chars = 0usize;
    for word in paragraph.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        // Words wider than a full line are broken by character
        while word.len() > max_chars {
            if line_chars > 0 {
                out.push(std::mem::take(&mut line));
                line_chars = 0;
            }
            let rest = word.split_off(max_chars);
            out.push(word.into_iter().collect());
            word = rest;
        }
        if word.is_empty() {
            continue;
        }
        if line_chars > 0 && line_chars + 1 + word.len() > max_chars {
            out.push(std::mem::take(&mut line));
            line_chars = 0;
        }
        if line_chars > 0 {
            line.push(' ');
            line_chars += 1;
        }
        line_chars += word.len();
        line.extend(word);
    }
    out.push(line);
}

impl SceneObjectTrait for TextLabel {
    fn id(&self) -> ObjectId {
        self.id
    }

    fn role(&self) -> ObjectRole {
        self.text_role.object_role()
    }

    fn position(&self) -> Point {
        self.position
    }

    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    fn origin(&self) -> OriginMode {
        OriginMode::TopLeft
    }

    fn transform(&self) -> &ObjectTransform {
        &self.transform
    }

    fn transform_mut(&mut self) -> &mut ObjectTransform {
        &mut self.transform
    }

    fn affordances(&self) -> &Affordances {
        &self.affordances
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label(content: &str, width: f64) -> TextLabel {
        let mut label = TextLabel::new(TextRole::Subtitle, content, SerializableColor::rgb(0, 0, 0));
        label.set_box_width(width);
        label
    }

    #[test]
    fn test_role_typography() {
        let title = TextLabel::new(TextRole::Title, "Hi", SerializableColor::rgb(0, 0, 0));
        assert_eq!(title.font_family, FontFamily::SpaceGrotesk);
        assert_eq!(title.font_weight.value(), 700);
        assert_eq!(title.role(), ObjectRole::Title);
        let subtitle = TextLabel::new(TextRole::Subtitle, "Hi", SerializableColor::rgb(0, 0, 0));
        assert_eq!(subtitle.font_family, FontFamily::Inter);
        assert_eq!(subtitle.role(), ObjectRole::Subtitle);
    }

    #[test]
    fn test_wrapping_respects_box_width() {
        let text = label("the quick brown fox jumps over the lazy dog", 120.0);
        let lines = text.wrapped_lines();
        assert!(lines.len() > 1);
        let max_chars = (120.0 / text.char_advance()).floor() as usize;
        for line in &lines {
            assert!(line.chars().count() <= max_chars, "line too long: {line:?}");
        }
        assert!(text.content_width() <= 120.0);
    }

    #[test]
    fn test_long_word_is_broken() {
        let text = label("supercalifragilisticexpialidocious", 60.0);
        let lines = text.wrapped_lines();
        assert!(lines.len() > 1);
        assert_eq!(lines.concat(), "supercalifragilisticexpialidocious");
    }

    #[test]
    fn test_explicit_newlines_start_lines() {
        let text = label("one\ntwo\n\nthree", 2000.0);
        assert_eq!(text.wrapped_lines(), vec!["one", "two", "", "three"]);
    }

    #[test]
    fn test_height_follows_content() {
        let mut text = label("short", 300.0);
        let one_line = text.height;
        assert!((one_line - text.line_pitch()).abs() < f64::EPSILON);
        text.set_content("a considerably longer subtitle that needs several lines to fit in the box");
        assert!(text.height > one_line);
    }

    #[test]
    fn test_empty_content_has_one_line() {
        let text = label("", 300.0);
        assert!((text.height - text.line_pitch()).abs() < f64::EPSILON);
    }
}
