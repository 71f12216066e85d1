//! Spatial filters: 3×3 convolution, mosaic, and radial falloff.
//!
//! Convolutions read from an untouched copy of the input and write interior
//! pixels only. The 1-pixel border keeps its input values: there is no
//! neighbourhood to sample there, and no padding policy is applied.

use super::calculations::{scale_channel, vignette_factor};
use super::params::BlockSize;
use super::raster::{CHANNELS, RasterBuffer};
use rayon::prelude::*;

/// A 3×3 integer convolution kernel, row-major.
pub type Kernel3 = [[i32; 3]; 3];

pub const SHARPEN_KERNEL: Kernel3 = [[0, -1, 0], [-1, 5, -1], [0, -1, 0]];

/// Weighted sum of the 3×3 neighbourhood of `(x, y)` on one channel.
///
/// `(x, y)` must be an interior pixel of a buffer `width` pixels wide.
pub(crate) fn convolve_at(
    src: &[u8],
    width: usize,
    x: usize,
    y: usize,
    channel: usize,
    kernel: &Kernel3,
) -> i32 {
    let mut acc = 0i32;
    for (ky, row) in kernel.iter().enumerate() {
        let sy = y + ky - 1;
        for (kx, &weight) in row.iter().enumerate() {
            let sx = x + kx - 1;
            acc += weight * src[(sy * width + sx) * CHANNELS + channel] as i32;
        }
    }
    acc
}

/// Run `f` on every interior row, handing it the row index, that row's
/// output bytes, and a snapshot of the whole input.
pub(crate) fn for_each_interior_row<F>(buffer: &mut RasterBuffer, f: F)
where
    F: Fn(usize, &mut [u8], &[u8]) + Sync + Send,
{
    let (width, height) = buffer.dimensions();
    if width < 3 || height < 3 {
        return;
    }
    let last = height as usize - 1;
    let stride = buffer.stride();
    let src = buffer.pixels().to_vec();
    buffer
        .pixels_mut()
        .par_chunks_exact_mut(stride)
        .enumerate()
        .filter(|(y, _)| *y > 0 && *y < last)
        .for_each(|(y, row)| f(y, row, &src));
}

/// Sharpen R,G,B with [`SHARPEN_KERNEL`].
pub fn sharpen(buffer: &mut RasterBuffer) {
    let width = buffer.width() as usize;
    for_each_interior_row(buffer, |y, row, src| {
        for x in 1..width - 1 {
            for c in 0..3 {
                let v = convolve_at(src, width, x, y, c, &SHARPEN_KERNEL);
                row[x * CHANNELS + c] = v.clamp(0, 255) as u8;
            }
        }
    });
}

/// Mosaic: copy each block's top-left pixel over the whole block.
///
/// Blocks are `block × block` and tile from the origin; blocks cut off by the
/// right or bottom edge are filled the same way. The sample is copied, not
/// averaged, alpha included.
pub fn pixelate(buffer: &mut RasterBuffer, block: BlockSize) {
    let block = block.value() as usize;
    let width = buffer.width() as usize;
    let stride = buffer.stride();
    buffer
        .pixels_mut()
        .par_chunks_mut(stride * block)
        .for_each(|band| {
            for bx in (0..width).step_by(block) {
                let start = bx * CHANNELS;
                let mut sample = [0u8; CHANNELS];
                sample.copy_from_slice(&band[start..start + CHANNELS]);
                let end = (bx + block).min(width) * CHANNELS;
                for row in band.chunks_exact_mut(stride) {
                    for px in row[start..end].chunks_exact_mut(CHANNELS) {
                        px.copy_from_slice(&sample);
                    }
                }
            }
        });
}

/// Darken toward the corners by [`vignette_factor`].
pub fn vignette(buffer: &mut RasterBuffer, strength: f32) {
    let (width, height) = buffer.dimensions();
    buffer.map_rgb_at(|x, y, r, g, b| {
        let f = vignette_factor(x, y, width, height, strength);
        (scale_channel(r, f), scale_channel(g, f), scale_channel(b, f))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{assert_border_unchanged, gradient, solid};

    #[test]
    fn sharpen_flat_image_is_unchanged() {
        // Kernel weights sum to 1
        let original = solid(6, 5, [40, 80, 120, 255]);
        let mut buffer = original.clone();
        sharpen(&mut buffer);
        assert_eq!(buffer, original);
    }

    #[test]
    fn sharpen_boosts_isolated_peak() {
        let mut buffer = solid(3, 3, [100, 100, 100, 255]);
        buffer.set_pixel(1, 1, [120, 100, 100, 255]);
        sharpen(&mut buffer);
        // 5 * 120 - 4 * 100 = 200
        assert_eq!(buffer.pixel(1, 1), [200, 100, 100, 255]);
    }

    #[test]
    fn sharpen_preserves_border() {
        let original = gradient(9, 7);
        let mut buffer = original.clone();
        sharpen(&mut buffer);
        assert_border_unchanged(&original, &buffer);
    }

    #[test]
    fn sharpen_tiny_buffer_is_noop() {
        let original = gradient(2, 8);
        let mut buffer = original.clone();
        sharpen(&mut buffer);
        assert_eq!(buffer, original);
    }

    #[test]
    fn pixelate_copies_top_left_sample() {
        let original = gradient(4, 4);
        let mut buffer = original.clone();
        pixelate(&mut buffer, BlockSize::new(2));

        for y in 0..4 {
            for x in 0..4 {
                let expected = original.pixel(x - x % 2, y - y % 2);
                assert_eq!(buffer.pixel(x, y), expected, "pixel ({x}, {y})");
            }
        }
    }

    #[test]
    fn pixelate_handles_partial_edge_blocks() {
        let original = gradient(7, 5);
        let mut buffer = original.clone();
        pixelate(&mut buffer, BlockSize::new(3));

        assert_eq!(buffer.pixel(6, 4), original.pixel(6, 3));
        assert_eq!(buffer.pixel(5, 2), original.pixel(3, 0));
    }

    #[test]
    fn pixelate_block_of_one_is_identity() {
        let original = gradient(5, 5);
        let mut buffer = original.clone();
        pixelate(&mut buffer, BlockSize::new(1));
        assert_eq!(buffer, original);
    }

    #[test]
    fn vignette_white_square() {
        let mut buffer = solid(101, 101, [255, 255, 255, 255]);
        vignette(&mut buffer, 0.7);

        assert_eq!(buffer.pixel(50, 50), [255, 255, 255, 255]);
        // 255 * 0.3138 = 80.0
        for (x, y) in [(0, 0), (100, 0), (0, 100), (100, 100)] {
            let [r, g, b, a] = buffer.pixel(x, y);
            assert!((79..=81).contains(&r), "corner ({x}, {y}) = {r}");
            assert_eq!((r, r, a), (g, b, 255));
        }
    }

    #[test]
    fn vignette_smallest_square_still_darkens_corners() {
        let mut buffer = solid(3, 3, [200, 200, 200, 255]);
        vignette(&mut buffer, 0.7);
        assert_eq!(buffer.pixel(1, 1)[0], 200);
        for (x, y) in [(0, 0), (2, 0), (0, 2), (2, 2)] {
            assert!(buffer.pixel(x, y)[0] < 200, "corner ({x}, {y})");
            assert_eq!(buffer.pixel(x, y), buffer.pixel(0, 0));
        }
    }

    #[test]
    fn vignette_center_brighter_than_every_corner() {
        let mut buffer = solid(5, 4, [200, 200, 200, 255]);
        vignette(&mut buffer, 0.7);
        let center = buffer.pixel(2, 2)[0];
        for (x, y) in [(0, 0), (4, 0), (0, 3), (4, 3)] {
            assert!(center > buffer.pixel(x, y)[0], "corner ({x}, {y})");
        }
    }
}
