//! Image asset decoding.

use herocanvas_core::{AssetError, ImageResource};
use std::path::Path;

/// Decode PNG, JPEG or WebP bytes into an RGBA8 resource.
pub fn decode_image(name: &str, bytes: &[u8]) -> Result<ImageResource, AssetError> {
    let decoded = ::image::load_from_memory(bytes).map_err(|e| AssetError::Decode {
        name: name.to_string(),
        message: e.to_string(),
    })?;
    let rgba = decoded.to_rgba8();
    let (width, height) = rgba.dimensions();
    ImageResource::new(name, width, height, rgba.into_raw())
}

/// Read and decode an image file. The resource is named after the file.
pub fn load_image(path: &Path) -> Result<ImageResource, AssetError> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("image")
        .to_string();
    let bytes = std::fs::read(path).map_err(|e| AssetError::Io(format!("{}: {}", path.display(), e)))?;
    decode_image(&name, &bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_bytes(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
        let mut out = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut out, width, height);
            encoder.set_color(png::ColorType::Rgba);
            encoder.set_depth(png::BitDepth::Eight);
            let mut writer = encoder.write_header().unwrap();
            writer.write_image_data(&rgba.repeat((width * height) as usize)).unwrap();
        }
        out
    }

    #[test]
    fn test_decode_png() {
        let resource = decode_image("dot.png", &png_bytes(3, 2, [1, 2, 3, 255])).unwrap();
        assert_eq!((resource.width, resource.height), (3, 2));
        assert_eq!(&resource.pixels()[..4], &[1, 2, 3, 255]);
        assert_eq!(resource.name, "dot.png");
    }

    #[test]
    fn test_decode_garbage_fails() {
        let err = decode_image("broken.png", b"not an image").unwrap_err();
        assert!(matches!(err, AssetError::Decode { ref name, .. } if name == "broken.png"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_image(Path::new("/definitely/not/here.png")).unwrap_err();
        assert!(matches!(err, AssetError::Io(_)));
    }
}
