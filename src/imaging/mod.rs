//! Pixel processing in pure Rust, no platform graphics context.
//!
//! | Filter family | Module | Functions |
//! |---|---|---|
//! | **Color / tone** | [`color`] | grayscale, invert, sepia, scale, boost_channel, contrast, saturation, tone |
//! | **Spatial** | [`spatial`] | sharpen, pixelate, vignette |
//! | **Blur** | [`blur`] | [`BoxBlur`], [`GaussianBlur`] behind the [`Blur`] trait |
//! | **Edges** | [`edges`] | sketch (Sobel) |
//! | **Noise / analog** | [`noise`] | grain, glitch |
//! | **Tone mapping** | [`tone`] | auto_levels |
//! | **Resize** | [`resize`] | fit_width |
//!
//! The module is split into:
//! - **Raster**: the [`RasterBuffer`] data model
//! - **Calculations**: Pure per-value math (unit testable)
//! - **Parameters**: Filter strengths and settings
//! - **Backend**: [`EffectError`] + the [`Blur`] capability trait
//! - **Codec**: decode/encode through the `image` crate

pub mod backend;
pub mod blur;
pub mod calculations;
pub mod codec;
pub mod color;
pub mod edges;
pub mod noise;
pub mod params;
pub mod raster;
pub mod resize;
pub mod spatial;
pub mod tone;

pub use backend::{Blur, EffectError};
pub use blur::{BoxBlur, GaussianBlur, blur_for};
pub use codec::{OutputFormat, decode, encode, load, save, supported_input_extensions};
pub use params::{BlockSize, BlurKind, Channel, ChannelBoost, EffectSettings, ToneShift};
pub use raster::RasterBuffer;
