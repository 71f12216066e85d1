//! Noise and analog-signal filters.
//!
//! [`grain`] takes its random source as a parameter so callers choose between
//! a seeded generator (reproducible output) and an entropy-seeded one.

use super::calculations::{scale_channel, to_channel};
use super::params::SCANLINE_FACTOR;
use super::raster::{CHANNELS, RasterBuffer};
use rand::Rng;

/// Add uniform noise in `[-amount, +amount)` to each of R,G,B independently.
///
/// A non-positive or non-finite `amount` leaves the buffer untouched.
pub fn grain<R: Rng>(buffer: &mut RasterBuffer, amount: f32, rng: &mut R) {
    if !amount.is_finite() || amount <= 0.0 {
        return;
    }
    for px in buffer.pixels_mut().chunks_exact_mut(CHANNELS) {
        for v in &mut px[..3] {
            *v = to_channel(*v as f32 + rng.gen_range(-amount..amount));
        }
    }
}

/// VHS-style chromatic misalignment plus scanlines.
///
/// Walking the pixels in buffer order, red is taken from the pixel two
/// positions ahead and blue from the pixel one position ahead; the last
/// pixels, with nothing ahead of them, keep their own values. Then every
/// third row (starting at row 0) is dimmed to [`SCANLINE_FACTOR`].
pub fn glitch(buffer: &mut RasterBuffer) {
    let count = buffer.pixel_count();
    let stride = buffer.stride();
    let px = buffer.pixels_mut();

    for i in 0..count {
        let base = i * CHANNELS;
        if i + 2 < count {
            px[base] = px[base + 2 * CHANNELS];
        }
        if i + 1 < count {
            px[base + 2] = px[base + CHANNELS + 2];
        }
    }

    for row in px.chunks_exact_mut(stride).step_by(3) {
        for p in row.chunks_exact_mut(CHANNELS) {
            for v in &mut p[..3] {
                *v = scale_channel(*v, SCANLINE_FACTOR);
            }
        }
    }
}
