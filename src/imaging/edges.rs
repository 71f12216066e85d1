//! Sobel edge detection rendered as a pencil sketch.

use super::calculations::to_channel;
use super::color::grayscale;
use super::raster::{CHANNELS, RasterBuffer};
use super::spatial::{Kernel3, convolve_at, for_each_interior_row};

pub const SOBEL_X: Kernel3 = [[-1, 0, 1], [-2, 0, 2], [-1, 0, 1]];
pub const SOBEL_Y: Kernel3 = [[-1, -2, -1], [0, 0, 0], [1, 2, 1]];

/// Dark lines on a light field.
///
/// Converts to grayscale, then writes `255 - |∇|` into R,G,B of every
/// interior pixel. Border pixels keep their grayscale value.
pub fn sketch(buffer: &mut RasterBuffer) {
    grayscale(buffer);
    let width = buffer.width() as usize;
    for_each_interior_row(buffer, |y, row, src| {
        for x in 1..width - 1 {
            // R == G == B after grayscale, so channel 0 carries the signal
            let gx = convolve_at(src, width, x, y, 0, &SOBEL_X) as f32;
            let gy = convolve_at(src, width, x, y, 0, &SOBEL_Y) as f32;
            let edge = 255 - to_channel((gx * gx + gy * gy).sqrt());
            let i = x * CHANNELS;
            row[i] = edge;
            row[i + 1] = edge;
            row[i + 2] = edge;
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{assert_border_unchanged, gradient, solid};

    #[test]
    fn flat_image_sketches_to_white() {
        let mut buffer = solid(5, 5, [90, 30, 200, 255]);
        sketch(&mut buffer);
        assert_eq!(buffer.pixel(2, 2), [255, 255, 255, 255]);
    }

    #[test]
    fn vertical_edge_draws_dark_line() {
        let mut buffer = solid(6, 3, [0, 0, 0, 255]);
        for y in 0..3 {
            for x in 3..6 {
                buffer.set_pixel(x, y, [255, 255, 255, 255]);
            }
        }
        sketch(&mut buffer);
        // gx = 4 * 255 at the step, saturates to black
        assert_eq!(buffer.pixel(2, 1), [0, 0, 0, 255]);
        assert_eq!(buffer.pixel(1, 1), [255, 255, 255, 255]);
    }

    #[test]
    fn border_matches_grayscale_input() {
        let original = gradient(8, 6);
        let mut expected = original.clone();
        grayscale(&mut expected);

        let mut buffer = original;
        sketch(&mut buffer);
        assert_border_unchanged(&expected, &buffer);
    }

    #[test]
    fn output_is_gray() {
        let mut buffer = gradient(10, 10);
        sketch(&mut buffer);
        for px in buffer.pixels().chunks_exact(4) {
            assert!(px[0] == px[1] && px[1] == px[2]);
        }
    }
}
