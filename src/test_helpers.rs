//! Shared test utilities for the retouch test suite.
//!
//! Buffer builders with predictable content, plus assertions for filters that
//! leave the image border alone.
//!
//! # Usage
//!
//! ```rust
//! use crate::imaging::spatial::sharpen;
//! use crate::test_helpers::*;
//!
//! let original = gradient(9, 7);
//! let mut buffer = original.clone();
//! sharpen(&mut buffer);
//! assert_border_unchanged(&original, &buffer);
//! ```

use crate::imaging::RasterBuffer;

// =========================================================================
// Buffer builders
// =========================================================================

/// A `width`×`height` buffer with every pixel set to `rgba`.
pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> RasterBuffer {
    RasterBuffer::filled(width, height, rgba).unwrap()
}

/// A 1×1 buffer.
pub fn single_pixel(rgba: [u8; 4]) -> RasterBuffer {
    solid(1, 1, rgba)
}

/// A buffer where no two neighbouring pixels are equal.
///
/// Red ramps left to right, green top to bottom, blue follows the diagonal
/// and alpha varies so filters that must keep alpha are caught if they don't.
pub fn gradient(width: u32, height: u32) -> RasterBuffer {
    let mut buffer = RasterBuffer::new(width, height).unwrap();
    let x_span = width.saturating_sub(1).max(1);
    let y_span = height.saturating_sub(1).max(1);
    for y in 0..height {
        for x in 0..width {
            let r = (x * 255 / x_span) as u8;
            let g = (y * 255 / y_span) as u8;
            let b = ((x * 37 + y * 23) % 256) as u8;
            let a = 255 - ((x * 7 + y * 3) % 64) as u8;
            buffer.set_pixel(x, y, [r, g, b, a]);
        }
    }
    buffer
}

// =========================================================================
// Assertions
// =========================================================================

/// Assert that the outermost ring of pixels is identical in both buffers.
pub fn assert_border_unchanged(expected: &RasterBuffer, actual: &RasterBuffer) {
    assert_eq!(expected.dimensions(), actual.dimensions());
    let (w, h) = expected.dimensions();
    for y in 0..h {
        for x in 0..w {
            if x == 0 || y == 0 || x == w - 1 || y == h - 1 {
                assert_eq!(
                    expected.pixel(x, y),
                    actual.pixel(x, y),
                    "border pixel ({x}, {y}) changed"
                );
            }
        }
    }
}
