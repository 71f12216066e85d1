//! Error taxonomy and the blur capability trait.
//!
//! Most filters are plain functions over a [`RasterBuffer`]. Blur is the one
//! primitive hosts commonly provide themselves (a graphics context's blur
//! property, a GPU pass), so it sits behind the [`Blur`] trait. The in-process
//! implementations live in [`blur`](super::blur): [`BoxBlur`](super::BoxBlur)
//! is the default, [`GaussianBlur`](super::GaussianBlur) delegates to the
//! `image` crate.

use super::raster::RasterBuffer;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EffectError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to decode image: {0}")]
    Decode(String),
    #[error("Failed to encode image: {0}")]
    Encode(String),
    #[error("Drawing surface unavailable: {0}")]
    SurfaceUnavailable(String),
    #[error("Processing failed: {0}")]
    Processing(String),
}

/// A low-pass filter of a given radius.
///
/// Implementations must return a buffer with the same dimensions as the
/// input. `radius == 0` must be the identity.
pub trait Blur: Sync {
    fn blur(&self, buffer: &RasterBuffer, radius: u32) -> Result<RasterBuffer, EffectError>;
}
