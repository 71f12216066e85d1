//! Codec adapter: encoded bytes ⇄ [`RasterBuffer`].
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, TIFF, WebP) | `image::load_from_memory` → `to_rgba8` |
//! | Encode PNG / TIFF / WebP (lossless) | `DynamicImage::write_to` on RGBA8 |
//! | Encode JPEG | `DynamicImage::write_to` on RGB8 (alpha dropped) |

use super::backend::EffectError;
use super::raster::RasterBuffer;
use image::{DynamicImage, ImageError, ImageFormat};
use serde::{Deserialize, Serialize};
use std::io::Cursor;
use std::path::Path;
use std::sync::LazyLock;
use tracing::debug;

/// Extensions whose decoders are compiled in.
const INPUT_CANDIDATES: &[(&str, ImageFormat)] = &[
    ("jpg", ImageFormat::Jpeg),
    ("jpeg", ImageFormat::Jpeg),
    ("png", ImageFormat::Png),
    ("tif", ImageFormat::Tiff),
    ("tiff", ImageFormat::Tiff),
    ("webp", ImageFormat::WebP),
];

static SUPPORTED_EXTENSIONS: LazyLock<Vec<&'static str>> = LazyLock::new(|| {
    INPUT_CANDIDATES
        .iter()
        .filter(|(_, fmt)| fmt.reading_enabled())
        .map(|(ext, _)| *ext)
        .collect()
});

/// Returns the image file extensions that have working decoders compiled in.
pub fn supported_input_extensions() -> &'static [&'static str] {
    &SUPPORTED_EXTENSIONS
}

/// Whether `path` has an extension we can decode (case-insensitive).
pub fn is_supported_input(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| {
            supported_input_extensions()
                .iter()
                .any(|s| s.eq_ignore_ascii_case(e))
        })
}

/// Encoded output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Png,
    Jpeg,
    Webp,
    Tiff,
}

impl OutputFormat {
    /// Infer the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "webp" => Some(Self::Webp),
            "tif" | "tiff" => Some(Self::Tiff),
            _ => None,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::Webp => "webp",
            Self::Tiff => "tiff",
        }
    }

    fn image_format(self) -> ImageFormat {
        match self {
            Self::Png => ImageFormat::Png,
            Self::Jpeg => ImageFormat::Jpeg,
            Self::Webp => ImageFormat::WebP,
            Self::Tiff => ImageFormat::Tiff,
        }
    }
}

fn decode_error(err: ImageError) -> EffectError {
    match err {
        ImageError::Limits(e) => EffectError::SurfaceUnavailable(e.to_string()),
        ImageError::IoError(e) => EffectError::Io(e),
        other => EffectError::Decode(other.to_string()),
    }
}

/// Decode an encoded image of any supported format.
pub fn decode(bytes: &[u8]) -> Result<RasterBuffer, EffectError> {
    let image = image::load_from_memory(bytes).map_err(decode_error)?;
    let buffer = RasterBuffer::from_image(image.to_rgba8())?;
    debug!(
        width = buffer.width(),
        height = buffer.height(),
        "decoded image"
    );
    Ok(buffer)
}

/// Encode a buffer.
pub fn encode(buffer: &RasterBuffer, format: OutputFormat) -> Result<Vec<u8>, EffectError> {
    let rgba = DynamicImage::ImageRgba8(buffer.clone().into_image()?);
    let image = match format {
        // The JPEG encoder has no alpha channel
        OutputFormat::Jpeg => DynamicImage::ImageRgb8(rgba.to_rgb8()),
        _ => rgba,
    };
    let mut out = Cursor::new(Vec::new());
    image
        .write_to(&mut out, format.image_format())
        .map_err(|e| EffectError::Encode(format!("{format:?}: {e}")))?;
    Ok(out.into_inner())
}

/// Read and decode an image file.
pub fn load(path: &Path) -> Result<RasterBuffer, EffectError> {
    let bytes = std::fs::read(path)?;
    decode(&bytes).map_err(|e| match e {
        EffectError::Decode(msg) => {
            EffectError::Decode(format!("{}: {msg}", path.display()))
        }
        other => other,
    })
}

/// Encode and write an image file, creating parent directories as needed.
pub fn save(buffer: &RasterBuffer, path: &Path, format: OutputFormat) -> Result<(), EffectError> {
    let bytes = encode(buffer, format)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, bytes)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::gradient;

    #[test]
    fn supported_extensions_match_decodable_formats() {
        let exts = supported_input_extensions();
        for expected in &["jpg", "jpeg", "png", "tif", "tiff", "webp"] {
            assert!(
                exts.contains(expected),
                "expected {expected} in supported extensions"
            );
        }
    }

    #[test]
    fn is_supported_input_ignores_case() {
        assert!(is_supported_input(Path::new("a/b/PHOTO.JPG")));
        assert!(!is_supported_input(Path::new("notes.txt")));
        assert!(!is_supported_input(Path::new("no_extension")));
    }

    #[test]
    fn format_from_path() {
        assert_eq!(
            OutputFormat::from_path(Path::new("x.JPEG")),
            Some(OutputFormat::Jpeg)
        );
        assert_eq!(
            OutputFormat::from_path(Path::new("x.tif")),
            Some(OutputFormat::Tiff)
        );
        assert_eq!(OutputFormat::from_path(Path::new("x.avif")), None);
    }

    #[test]
    fn png_is_lossless() {
        let original = gradient(13, 9);
        let bytes = encode(&original, OutputFormat::Png).unwrap();
        assert_eq!(decode(&bytes).unwrap(), original);
    }

    #[test]
    fn jpeg_keeps_dimensions_and_drops_alpha() {
        let original = gradient(16, 8);
        let bytes = encode(&original, OutputFormat::Jpeg).unwrap();
        let decoded = decode(&bytes).unwrap();
        assert_eq!(decoded.dimensions(), (16, 8));
        assert!(decoded.pixels().chunks_exact(4).all(|px| px[3] == 255));
    }

    #[test]
    fn garbage_bytes_are_a_decode_error() {
        let result = decode(b"definitely not an image");
        assert!(matches!(result, Err(EffectError::Decode(_))));
    }

    #[test]
    fn save_then_load() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("nested/out.png");
        let original = gradient(6, 6);

        save(&original, &path, OutputFormat::Png).unwrap();
        assert_eq!(load(&path).unwrap(), original);
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let result = load(Path::new("/nonexistent/image.png"));
        assert!(matches!(result, Err(EffectError::Io(_))));
    }
}
