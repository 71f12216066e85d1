//! Histogram stretch (auto-levels).

use super::calculations::to_channel;
use super::raster::{CHANNELS, RasterBuffer};
use rayon::prelude::*;

/// Darkest and lightest per-pixel RGB average, or `None` for an empty slice.
pub fn average_range(pixels: &[u8]) -> Option<(f32, f32)> {
    pixels
        .par_chunks_exact(CHANNELS)
        .map(|px| {
            let avg = (px[0] as f32 + px[1] as f32 + px[2] as f32) / 3.0;
            (avg, avg)
        })
        .reduce_with(|(lo_a, hi_a), (lo_b, hi_b)| (lo_a.min(lo_b), hi_a.max(hi_b)))
}

/// Linearly remap every color channel so the darkest pixel average lands on
/// 0 and the lightest on 255.
///
/// A flat image (all averages equal) is left untouched.
pub fn auto_levels(buffer: &mut RasterBuffer) {
    let Some((min, max)) = average_range(buffer.pixels()) else {
        return;
    };
    let range = max - min;
    if range <= 0.0 {
        return;
    }
    let stretch = move |v: u8| to_channel((v as f32 - min) / range * 255.0);
    buffer.map_rgb(|r, g, b| (stretch(r), stretch(g), stretch(b)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{gradient, solid};

    #[test]
    fn flat_gray_is_unchanged() {
        let original = solid(50, 50, [120, 120, 120, 255]);
        let mut buffer = original.clone();
        auto_levels(&mut buffer);
        assert_eq!(buffer, original);
    }

    #[test]
    fn full_range_is_unchanged() {
        let mut original = solid(4, 1, [0, 0, 0, 255]);
        original.set_pixel(1, 0, [255, 255, 255, 255]);
        original.set_pixel(2, 0, [17, 90, 201, 255]);
        original.set_pixel(3, 0, [250, 3, 64, 255]);

        let mut buffer = original.clone();
        auto_levels(&mut buffer);
        assert_eq!(buffer, original);
    }

    #[test]
    fn narrow_range_is_stretched() {
        let mut buffer = solid(2, 1, [100, 100, 100, 255]);
        buffer.set_pixel(1, 0, [150, 150, 150, 255]);
        auto_levels(&mut buffer);
        assert_eq!(buffer.pixel(0, 0), [0, 0, 0, 255]);
        assert_eq!(buffer.pixel(1, 0), [255, 255, 255, 255]);
    }

    #[test]
    fn average_range_of_gradient() {
        let buffer = gradient(3, 3);
        let (lo, hi) = average_range(buffer.pixels()).unwrap();
        assert!(lo <= hi);
    }
}
