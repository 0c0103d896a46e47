//! Text labels rendered through an SVG document.
//!
//! Each label becomes one `<g>` carrying its full transform, with one `<text>`
//! element per wrapped line. usvg shapes the glyphs against the font database.

use herocanvas_core::TextLabel;
use kurbo::Affine;
use std::fmt::Write;

/// Baseline offset from the top of a line box, as a fraction of font size.
const ASCENT: f64 = 0.8;

/// Escape text for use inside an XML element or attribute.
pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

/// SVG fragment for one label drawn with `transform` (scene to pixels).
pub fn label_fragment(label: &TextLabel, transform: Affine) -> String {
    let [a, b, c, d, e, f] = transform.as_coeffs();
    let fill = label.fill;
    let letter_spacing = label.char_spacing / 1000.0 * label.font_size;
    let pitch = label.line_pitch();
    let half_leading = (pitch - label.font_size) / 2.0;

    let mut svg = String::new();
    let _ = write!(
        svg,
        r#"<g transform="matrix({a} {b} {c} {d} {e} {f})" font-family="{family}" font-size="{size}" font-weight="{weight}" letter-spacing="{letter_spacing}" fill="rgb({r},{g},{bl})" fill-opacity="{opacity}">"#,
        family = escape_xml(label.font_family.css_stack()),
        size = label.font_size,
        weight = label.font_weight.value(),
        r = fill.r,
        g = fill.g,
        bl = fill.b,
        opacity = fill.alpha(),
    );
    for (i, line) in label.wrapped_lines().iter().enumerate() {
        if line.is_empty() {
            continue;
        }
        let baseline = i as f64 * pitch + half_leading + label.font_size * ASCENT;
        let _ = write!(
            svg,
            r#"<text x="0" y="{baseline}" xml:space="preserve">{}</text>"#,
            escape_xml(line)
        );
    }
    svg.push_str("</g>");
    svg
}

/// Wrap fragments into a complete document of `width × height` pixels.
pub fn document(width: u32, height: u32, fragments: &[String]) -> String {
    let mut svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
    );
    for fragment in fragments {
        svg.push_str(fragment);
    }
    svg.push_str("</svg>");
    svg
}

#[cfg(test)]
mod tests {
    use super::*;
    use herocanvas_core::{SerializableColor, TextRole};

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("a < b & \"c\""), "a &lt; b &amp; &quot;c&quot;");
        assert_eq!(escape_xml("plain"), "plain");
    }

    #[test]
    fn test_fragment_has_one_text_per_line() {
        let mut label = TextLabel::new(TextRole::Subtitle, "one\ntwo & three", SerializableColor::rgba(30, 41, 59, 0.72));
        label.set_box_width(2000.0);
        let fragment = label_fragment(&label, Affine::scale(2.0));

        assert_eq!(fragment.matches("<text").count(), 2);
        assert!(fragment.contains("two &amp; three"));
        assert!(fragment.contains("matrix(2 0 0 2 0 0)"));
        assert!(fragment.contains("font-weight=\"400\""));
        assert!(fragment.contains("fill=\"rgb(30,41,59)\""));
    }

    #[test]
    fn test_document_wraps_fragments() {
        let doc = document(10, 20, &["<g></g>".to_string()]);
        assert!(doc.starts_with("<svg"));
        assert!(doc.contains("viewBox=\"0 0 10 20\""));
        assert!(doc.ends_with("<g></g></svg>"));
    }
}
