//! Per-pixel color and tone filters.
//!
//! Every function here rewrites R,G,B in place from that pixel's own values
//! and never touches alpha. Cost is `O(W·H)`.

use super::calculations::{luma, scale_channel, to_channel};
use super::params::{Channel, ChannelBoost, ToneShift};
use super::raster::RasterBuffer;

/// Replace R,G,B with their Rec. 601 luma.
pub fn grayscale(buffer: &mut RasterBuffer) {
    buffer.map_rgb(|r, g, b| {
        let v = to_channel(luma(r, g, b));
        (v, v, v)
    });
}

/// `255 - v` on each color channel.
pub fn invert(buffer: &mut RasterBuffer) {
    buffer.map_rgb(|r, g, b| (255 - r, 255 - g, 255 - b));
}

/// Classic sepia matrix.
pub fn sepia(buffer: &mut RasterBuffer) {
    buffer.map_rgb(|r, g, b| {
        let (r, g, b) = (r as f32, g as f32, b as f32);
        (
            to_channel(0.393 * r + 0.769 * g + 0.189 * b),
            to_channel(0.349 * r + 0.686 * g + 0.168 * b),
            to_channel(0.272 * r + 0.534 * g + 0.131 * b),
        )
    });
}

/// Multiply R,G,B by `factor`. Used for both brighten (> 1) and darken (< 1).
pub fn scale(buffer: &mut RasterBuffer, factor: f32) {
    buffer.map_rgb(|r, g, b| {
        (
            scale_channel(r, factor),
            scale_channel(g, factor),
            scale_channel(b, factor),
        )
    });
}

/// Boost one channel and attenuate the other two.
pub fn boost_channel(buffer: &mut RasterBuffer, channel: Channel, boost: ChannelBoost) {
    let mut factors = [boost.others; 3];
    factors[channel.offset()] = boost.boost;
    buffer.map_rgb(|r, g, b| {
        (
            scale_channel(r, factors[0]),
            scale_channel(g, factors[1]),
            scale_channel(b, factors[2]),
        )
    });
}

/// Stretch values away from mid-gray: `(v - 128) * factor + 128`.
pub fn contrast(buffer: &mut RasterBuffer, factor: f32) {
    let stretch = move |v: u8| to_channel((v as f32 - 128.0) * factor + 128.0);
    buffer.map_rgb(|r, g, b| (stretch(r), stretch(g), stretch(b)));
}

/// Move each channel toward (`amount < 1`) or away from (`amount > 1`) the
/// pixel's luma.
pub fn saturation(buffer: &mut RasterBuffer, amount: f32) {
    buffer.map_rgb(|r, g, b| {
        let gray = luma(r, g, b);
        let mix = |v: u8| to_channel(gray + amount * (v as f32 - gray));
        (mix(r), mix(g), mix(b))
    });
}

/// Apply per-channel temperature multipliers.
pub fn tone(buffer: &mut RasterBuffer, shift: ToneShift) {
    buffer.map_rgb(|r, g, b| {
        (
            scale_channel(r, shift.red),
            scale_channel(g, shift.green),
            scale_channel(b, shift.blue),
        )
    });
}
