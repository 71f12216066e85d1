//! Pure calculation functions shared by the filters.
//!
//! All functions here are pure and testable without any buffers or I/O.

/// Rec. 601 luma of an RGB triple, in the `0.0..=255.0` range.
///
/// # Examples
/// ```
/// # use retouch::imaging::calculations::luma;
/// assert!((luma(255, 0, 0) - 76.245).abs() < 1e-3);
/// ```
pub fn luma(r: u8, g: u8, b: u8) -> f32 {
    0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32
}

/// Convert a computed channel value back to a byte.
///
/// Rounds to nearest and clamps to `[0, 255]`, the same way a clamped byte
/// array stores an out-of-range float. NaN maps to 0.
pub fn to_channel(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

/// Scale a channel by `factor`, clamping the result.
pub fn scale_channel(value: u8, factor: f32) -> u8 {
    to_channel(value as f32 * factor)
}

/// Brightness multiplier of the vignette at pixel `(x, y)`.
///
/// `factor = 1 - (d / max_distance)^2 * strength`, where `d` is the distance
/// from the pixel's center `(x + 0.5, y + 0.5)` to the image center
/// `(width / 2, height / 2)` and `max_distance` the center-to-corner distance.
/// The falloff is symmetric: all four corner pixels get the same factor.
pub fn vignette_factor(x: u32, y: u32, width: u32, height: u32, strength: f32) -> f32 {
    let cx = width as f32 / 2.0;
    let cy = height as f32 / 2.0;
    let max_distance = (cx * cx + cy * cy).sqrt();
    if max_distance == 0.0 {
        return 1.0;
    }
    let dx = x as f32 + 0.5 - cx;
    let dy = y as f32 + 0.5 - cy;
    let ratio = (dx * dx + dy * dy).sqrt() / max_distance;
    1.0 - ratio * ratio * strength
}

/// Calculate the dimensions of a downscale to `max_width`.
///
/// Returns `None` when the image already fits (no resize needed). Otherwise
/// the aspect ratio is preserved and the height rounded, never below 1.
///
/// # Examples
/// ```
/// # use retouch::imaging::calculations::fit_to_width;
/// assert_eq!(fit_to_width((3840, 2160), 1920), Some((1920, 1080)));
/// assert_eq!(fit_to_width((800, 600), 1920), None);
/// ```
pub fn fit_to_width(original: (u32, u32), max_width: u32) -> Option<(u32, u32)> {
    let (orig_w, orig_h) = original;
    if orig_w <= max_width || max_width == 0 {
        return None;
    }
    let ratio = max_width as f64 / orig_w as f64;
    let height = ((orig_h as f64 * ratio).round() as u32).max(1);
    Some((max_width, height))
}
