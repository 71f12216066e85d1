//! The RGBA8 pixel buffer every filter reads and writes.
//!
//! A [`RasterBuffer`] owns `width * height * 4` bytes in R,G,B,A order. The
//! pixel vector is private: filters get a fixed-length slice through
//! [`RasterBuffer::pixels_mut`], so the length invariant cannot be broken
//! after construction. Filters that change the dimensions (resize) build a new
//! buffer instead.

use super::backend::EffectError;
use image::RgbaImage;
use rayon::prelude::*;

/// Bytes per pixel.
pub const CHANNELS: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterBuffer {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

/// Byte length of a `width × height` RGBA buffer, or why it cannot exist.
fn byte_len(width: u32, height: u32) -> Result<usize, EffectError> {
    if width == 0 || height == 0 {
        return Err(EffectError::SurfaceUnavailable(format!(
            "{width}x{height} has no pixels"
        )));
    }
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(CHANNELS))
        .ok_or_else(|| {
            EffectError::SurfaceUnavailable(format!("{width}x{height} overflows the address space"))
        })
}

impl RasterBuffer {
    /// Create a transparent black buffer.
    pub fn new(width: u32, height: u32) -> Result<Self, EffectError> {
        Self::filled(width, height, [0, 0, 0, 0])
    }

    /// Create a buffer where every pixel is `rgba`.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Result<Self, EffectError> {
        let len = byte_len(width, height)?;
        Ok(Self {
            width,
            height,
            pixels: rgba.repeat(len / CHANNELS),
        })
    }

    /// Wrap existing RGBA bytes. The length must be exactly `width * height * 4`.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, EffectError> {
        let expected = byte_len(width, height)?;
        if pixels.len() != expected {
            return Err(EffectError::Processing(format!(
                "{width}x{height} buffer needs {expected} bytes, got {}",
                pixels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn from_image(image: RgbaImage) -> Result<Self, EffectError> {
        let (width, height) = image.dimensions();
        Self::from_pixels(width, height, image.into_raw())
    }

    pub fn into_image(self) -> Result<RgbaImage, EffectError> {
        let (width, height) = (self.width, self.height);
        RgbaImage::from_raw(width, height, self.pixels).ok_or_else(|| {
            EffectError::SurfaceUnavailable(format!("cannot wrap {width}x{height} pixels"))
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn pixel_count(&self) -> usize {
        self.pixels.len() / CHANNELS
    }

    /// Bytes in one row.
    pub fn stride(&self) -> usize {
        self.width as usize * CHANNELS
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    /// Byte offset of pixel `(x, y)`.
    pub fn index(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * CHANNELS
    }

    /// Read pixel `(x, y)`. Panics when out of bounds, like slice indexing.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = self.index(x, y);
        [
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ]
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        let i = self.index(x, y);
        self.pixels[i..i + CHANNELS].copy_from_slice(&rgba);
    }

    /// Rewrite the color channels of every pixel. Alpha is left alone.
    ///
    /// Pixels are independent, so the work is spread across the rayon pool.
    pub fn map_rgb<F>(&mut self, f: F)
    where
        F: Fn(u8, u8, u8) -> (u8, u8, u8) + Sync + Send,
    {
        self.pixels.par_chunks_exact_mut(CHANNELS).for_each(|px| {
            let (r, g, b) = f(px[0], px[1], px[2]);
            px[0] = r;
            px[1] = g;
            px[2] = b;
        });
    }

    /// Like [`map_rgb`](Self::map_rgb), but the closure also receives the
    /// pixel coordinates.
    pub fn map_rgb_at<F>(&mut self, f: F)
    where
        F: Fn(u32, u32, u8, u8, u8) -> (u8, u8, u8) + Sync + Send,
    {
        let stride = self.stride();
        self.pixels
            .par_chunks_exact_mut(stride)
            .enumerate()
            .for_each(|(y, row)| {
                for (x, px) in row.chunks_exact_mut(CHANNELS).enumerate() {
                    let (r, g, b) = f(x as u32, y as u32, px[0], px[1], px[2]);
                    px[0] = r;
                    px[1] = g;
                    px[2] = b;
                }
            });
    }
}
