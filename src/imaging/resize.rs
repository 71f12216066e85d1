//! Width-capped downscale.

use super::backend::EffectError;
use super::calculations::fit_to_width;
use super::raster::RasterBuffer;
use image::imageops::{self, FilterType};
use tracing::debug;

/// Downscale to `max_width`, keeping the aspect ratio, when the buffer is
/// wider than that. Narrower buffers are returned as-is.
///
/// One bilinear (`Triangle`) resample pass.
pub fn fit_width(buffer: RasterBuffer, max_width: u32) -> Result<RasterBuffer, EffectError> {
    let Some((width, height)) = fit_to_width(buffer.dimensions(), max_width) else {
        return Ok(buffer);
    };
    debug!(
        from_width = buffer.width(),
        from_height = buffer.height(),
        width,
        height,
        "downscaling"
    );
    let image = buffer.into_image()?;
    let resized = imageops::resize(&image, width, height, FilterType::Triangle);
    RasterBuffer::from_image(resized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{gradient, solid};

    #[test]
    fn narrow_buffer_is_untouched() {
        let original = gradient(30, 20);
        let out = fit_width(original.clone(), 1920).unwrap();
        assert_eq!(out, original);
    }

    #[test]
    fn wide_buffer_shrinks_preserving_aspect() {
        let out = fit_width(solid(400, 100, [9, 9, 9, 255]), 100).unwrap();
        assert_eq!(out.dimensions(), (100, 25));
        assert_eq!(out.pixel(50, 12), [9, 9, 9, 255]);
    }

    #[test]
    fn never_grows() {
        for w in [1, 99, 100, 101, 250] {
            let out = fit_width(gradient(w, 3), 100).unwrap();
            assert!(out.width() <= w.min(100));
        }
    }
}
