//! In-process [`Blur`] implementations.
//!
//! | Implementation | Method |
//! |---|---|
//! | [`BoxBlur`] | Separable box filter, edge-clamped, integer arithmetic |
//! | [`GaussianBlur`] | `image::imageops::blur` with `sigma = radius` |
//!
//! Both blur all four channels, alpha included.

use super::backend::{Blur, EffectError};
use super::params::BlurKind;
use super::raster::{CHANNELS, RasterBuffer};
use image::imageops;
use rayon::prelude::*;

/// Separable box blur: a horizontal pass then a vertical pass, each averaging
/// `2 * radius + 1` samples. Samples past the edge repeat the edge pixel, so a
/// flat image stays flat.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoxBlur;

impl BoxBlur {
    pub fn new() -> Self {
        Self
    }
}

impl Blur for BoxBlur {
    fn blur(&self, buffer: &RasterBuffer, radius: u32) -> Result<RasterBuffer, EffectError> {
        if radius == 0 {
            return Ok(buffer.clone());
        }
        let (width, height) = buffer.dimensions();
        let mut tmp = vec![0u8; buffer.pixels().len()];
        let mut out = vec![0u8; buffer.pixels().len()];

        horizontal_pass(buffer.pixels(), &mut tmp, width, radius);
        vertical_pass(&tmp, &mut out, width, height, radius);
        RasterBuffer::from_pixels(width, height, out)
    }
}

fn horizontal_pass(src: &[u8], dst: &mut [u8], width: u32, radius: u32) {
    let w = width as i64;
    let r = radius as i64;
    let taps = (2 * r + 1) as u32;
    let stride = width as usize * CHANNELS;
    dst.par_chunks_exact_mut(stride)
        .zip(src.par_chunks_exact(stride))
        .for_each(|(out_row, in_row)| {
            for x in 0..w {
                let mut acc = [0u32; CHANNELS];
                for dx in -r..=r {
                    let sx = (x + dx).clamp(0, w - 1) as usize * CHANNELS;
                    for c in 0..CHANNELS {
                        acc[c] += in_row[sx + c] as u32;
                    }
                }
                let o = x as usize * CHANNELS;
                for c in 0..CHANNELS {
                    out_row[o + c] = average(acc[c], taps);
                }
            }
        });
}

fn vertical_pass(src: &[u8], dst: &mut [u8], width: u32, height: u32, radius: u32) {
    let h = height as i64;
    let r = radius as i64;
    let taps = (2 * r + 1) as u32;
    let stride = width as usize * CHANNELS;
    dst.par_chunks_exact_mut(stride)
        .enumerate()
        .for_each(|(y, out_row)| {
            let y = y as i64;
            for x in 0..width as usize {
                let mut acc = [0u32; CHANNELS];
                for dy in -r..=r {
                    let sy = (y + dy).clamp(0, h - 1) as usize;
                    let i = sy * stride + x * CHANNELS;
                    for c in 0..CHANNELS {
                        acc[c] += src[i + c] as u32;
                    }
                }
                let o = x * CHANNELS;
                for c in 0..CHANNELS {
                    out_row[o + c] = average(acc[c], taps);
                }
            }
        });
}

/// Rounded integer mean.
fn average(sum: u32, taps: u32) -> u8 {
    ((sum + taps / 2) / taps).min(255) as u8
}

/// Gaussian blur from the `image` crate, with the radius used as sigma (the
/// way a CSS `blur(<length>)` is interpreted).
#[derive(Debug, Clone, Copy, Default)]
pub struct GaussianBlur;

impl GaussianBlur {
    pub fn new() -> Self {
        Self
    }
}

impl Blur for GaussianBlur {
    fn blur(&self, buffer: &RasterBuffer, radius: u32) -> Result<RasterBuffer, EffectError> {
        if radius == 0 {
            return Ok(buffer.clone());
        }
        let image = buffer.clone().into_image()?;
        let blurred = imageops::blur(&image, radius as f32);
        RasterBuffer::from_image(blurred)
    }
}

/// Build the blur implementation named by `kind`.
pub fn blur_for(kind: BlurKind) -> Box<dyn Blur + Send> {
    match kind {
        BlurKind::Box => Box::new(BoxBlur::new()),
        BlurKind::Gaussian => Box::new(GaussianBlur::new()),
    }
}
