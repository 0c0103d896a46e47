//! HeroCanvas Render Library
//!
//! CPU implementation of the rendering surface (tiny-skia compositing, text
//! through resvg), image decoding and a font source backed by a font database.

mod decode;
mod fonts;
mod raster;
mod svg_text;

pub use decode::{decode_image, load_image};
pub use fonts::{FontDbSource, build_font_database};
pub use raster::{RasterSurface, encode_png};
