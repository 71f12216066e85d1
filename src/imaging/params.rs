//! Parameter types for pixel filters.
//!
//! These structs describe *how strongly* a filter acts, not *how* it works.
//! They are the interface between the [`pipeline`](crate::pipeline) (which
//! decides which filters run) and the filter functions in the sibling modules
//! (which do the actual pixel work).
//!
//! ## Types
//!
//! - [`BlockSize`]: Pixelate mosaic tile edge (≥ 1, default 10). Clamped on construction.
//! - [`Channel`] / [`ChannelBoost`]: Which channel to boost and by how much.
//! - [`ToneShift`]: Per-channel multipliers for warm/cool grading.
//! - [`BlurKind`]: Which in-process blur implementation backs the blur effect.
//! - [`EffectSettings`]: The tunables every pipeline run needs.

use serde::{Deserialize, Serialize};

/// Multiplier applied to R,G,B by the brighten effect.
pub const BRIGHTEN_FACTOR: f32 = 1.5;
/// Multiplier applied to R,G,B by the darken effect.
pub const DARKEN_FACTOR: f32 = 0.5;
/// Slope of the contrast stretch around mid-gray.
pub const CONTRAST_FACTOR: f32 = 2.0;
/// Saturation scale for the boost variant.
pub const SATURATE_AMOUNT: f32 = 1.8;
/// Saturation scale for the `reduce` variant.
pub const DESATURATE_AMOUNT: f32 = 0.3;
/// How much of the brightness a corner pixel loses under the vignette.
pub const VIGNETTE_STRENGTH: f32 = 0.7;
/// Brightness kept by each scanline row of the glitch effect.
pub const SCANLINE_FACTOR: f32 = 0.8;

/// Edge length of a pixelate tile, in pixels (≥ 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockSize(pub u32);

impl BlockSize {
    pub fn new(value: u32) -> Self {
        Self(value.max(1))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for BlockSize {
    fn default() -> Self {
        Self(10)
    }
}

/// A color channel of an RGBA pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Red,
    Green,
    Blue,
}

impl Channel {
    /// Byte offset of this channel inside an RGBA pixel.
    pub fn offset(self) -> usize {
        match self {
            Channel::Red => 0,
            Channel::Green => 1,
            Channel::Blue => 2,
        }
    }
}

/// Multipliers for the channel boost filters.
///
/// - `boost`: applied to the named channel
/// - `others`: applied to the remaining two color channels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelBoost {
    pub boost: f32,
    pub others: f32,
}

impl Default for ChannelBoost {
    fn default() -> Self {
        Self {
            boost: 1.5,
            others: 0.7,
        }
    }
}

/// Per-channel multipliers for color temperature grading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneShift {
    pub red: f32,
    pub green: f32,
    pub blue: f32,
}

impl ToneShift {
    /// Push toward orange: more red, less blue.
    pub fn warm() -> Self {
        Self {
            red: 1.15,
            green: 1.05,
            blue: 0.9,
        }
    }

    /// Push toward blue: less red, more blue.
    pub fn cool() -> Self {
        Self {
            red: 0.9,
            green: 1.05,
            blue: 1.15,
        }
    }
}

/// Blur implementation selected for the blur effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlurKind {
    /// Separable box filter, computed in-process.
    #[default]
    Box,
    /// Gaussian filter from the `image` crate.
    Gaussian,
}

/// Tunables consumed by a pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectSettings {
    pub block_size: BlockSize,
    /// Blur radius in pixels.
    pub blur_radius: u32,
    /// Grain noise is drawn from `[-grain_amount, +grain_amount)`.
    pub grain_amount: f32,
    /// Images wider than this are downscaled by the resize effect.
    pub max_width: u32,
}

impl Default for EffectSettings {
    fn default() -> Self {
        Self {
            block_size: BlockSize::default(),
            blur_radius: 8,
            grain_amount: 15.0,
            max_width: 1920,
        }
    }
}
