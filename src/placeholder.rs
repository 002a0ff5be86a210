//! Placeholder imagery for unresolvable assets.

use std::io::Cursor;
use std::sync::LazyLock;

use image::{ImageFormat, Rgb, RgbImage};

use crate::translate::{AssetStream, StreamOrigin};

/// Edge length of the built-in placeholder, in pixels.
pub const PLACEHOLDER_SIZE: u32 = 6;

/// Solid red, so a missing asset is obvious on screen.
const PLACEHOLDER_COLOR: Rgb<u8> = Rgb([0xff, 0x00, 0x00]);

static PLACEHOLDER_PNG: LazyLock<Vec<u8>> = LazyLock::new(|| {
    let image = RgbImage::from_pixel(PLACEHOLDER_SIZE, PLACEHOLDER_SIZE, PLACEHOLDER_COLOR);
    let mut bytes = Cursor::new(Vec::new());
    image
        .write_to(&mut bytes, ImageFormat::Png)
        .expect("in-memory PNG encoding cannot fail");
    bytes.into_inner()
});

/// Source of stand-in image bytes.
pub trait PlaceholderProvider: Send + Sync {
    fn placeholder(&self) -> AssetStream;
}

/// 6×6 solid red PNG, encoded once per process.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinPlaceholder;

impl BuiltinPlaceholder {
    /// Encoded PNG bytes.
    pub fn bytes() -> &'static [u8] {
        &PLACEHOLDER_PNG
    }
}

impl PlaceholderProvider for BuiltinPlaceholder {
    fn placeholder(&self) -> AssetStream {
        AssetStream::from_bytes(StreamOrigin::Placeholder, Self::bytes())
    }
}

/// Placeholder backed by caller-supplied bytes.
#[derive(Debug, Clone)]
pub struct StaticPlaceholder(pub &'static [u8]);

impl PlaceholderProvider for StaticPlaceholder {
    fn placeholder(&self) -> AssetStream {
        AssetStream::from_bytes(StreamOrigin::Placeholder, self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_is_decodable_png() {
        let mut stream = BuiltinPlaceholder.placeholder();
        assert!(stream.is_placeholder());
        assert_eq!(stream.probe_format().unwrap(), Some(ImageFormat::Png));

        let bytes = stream.into_bytes().unwrap();
        let decoded = image::load_from_memory_with_format(&bytes, ImageFormat::Png)
            .unwrap()
            .to_rgb8();
        assert_eq!(decoded.dimensions(), (PLACEHOLDER_SIZE, PLACEHOLDER_SIZE));
        assert!(decoded.pixels().all(|p| *p == PLACEHOLDER_COLOR));
    }

    #[test]
    fn test_builtin_bytes_are_shared() {
        assert_eq!(BuiltinPlaceholder::bytes().as_ptr(), BuiltinPlaceholder::bytes().as_ptr());
    }

    #[test]
    fn test_static_placeholder() {
        let stream = StaticPlaceholder(b"GIF89a").placeholder();
        assert!(stream.is_placeholder());
        assert_eq!(stream.into_bytes().unwrap(), b"GIF89a");
    }
}
