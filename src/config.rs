//! Effect configuration module.
//!
//! Handles loading, validating, and merging `retouch.toml`. Stock defaults
//! are the base layer; a user file overrides only the keys it names.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [resize]
//! max_width = 1920          # Images wider than this are downscaled
//!
//! [pixelate]
//! block_size = 10           # Mosaic tile edge in pixels
//!
//! [blur]
//! kind = "box"              # "box" (in-process) or "gaussian"
//! radius = 8                # Blur radius in pixels
//!
//! [grain]
//! amount = 15.0             # Noise drawn from [-amount, +amount)
//! # seed = 42               # Fixed seed for reproducible grain
//!
//! [dispatch]
//! mode = "stacking"         # "stacking" or "first-match"
//!
//! [output]
//! format = "png"            # png, jpeg, webp, tiff
//!
//! [processing]
//! max_processes = 4         # Max parallel workers (omit for auto = CPU cores)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::dispatch::Dispatch;
use crate::imaging::{BlockSize, BlurKind, EffectSettings, OutputFormat};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Configuration loaded from `retouch.toml`.
///
/// All fields have defaults matching the stock effect strengths.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RetouchConfig {
    /// Width cap for the resize effect.
    pub resize: ResizeConfig,
    /// Pixelate tile size.
    pub pixelate: PixelateConfig,
    /// Blur implementation and radius.
    pub blur: BlurConfig,
    /// Film grain strength and seed.
    pub grain: GrainConfig,
    /// Effect-name matching mode.
    pub dispatch: DispatchConfig,
    /// Encoded output settings.
    pub output: OutputConfig,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

impl RetouchConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.resize.max_width == 0 {
            return Err(ConfigError::Validation(
                "resize.max_width must be non-zero".into(),
            ));
        }
        if self.pixelate.block_size == 0 {
            return Err(ConfigError::Validation(
                "pixelate.block_size must be non-zero".into(),
            ));
        }
        if self.blur.radius > 256 {
            return Err(ConfigError::Validation(
                "blur.radius must be 0-256".into(),
            ));
        }
        if !self.grain.amount.is_finite() || !(0.0..=255.0).contains(&self.grain.amount) {
            return Err(ConfigError::Validation(
                "grain.amount must be 0-255".into(),
            ));
        }
        Ok(())
    }

    /// The filter tunables this config describes.
    pub fn effect_settings(&self) -> EffectSettings {
        EffectSettings {
            block_size: BlockSize::new(self.pixelate.block_size),
            blur_radius: self.blur.radius,
            grain_amount: self.grain.amount,
            max_width: self.resize.max_width,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResizeConfig {
    /// Images wider than this many pixels are downscaled.
    pub max_width: u32,
}

impl Default for ResizeConfig {
    fn default() -> Self {
        Self { max_width: 1920 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PixelateConfig {
    /// Mosaic tile edge length in pixels.
    pub block_size: u32,
}

impl Default for PixelateConfig {
    fn default() -> Self {
        Self { block_size: 10 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BlurConfig {
    pub kind: BlurKind,
    /// Radius in pixels (sigma for the Gaussian kind).
    pub radius: u32,
}

impl Default for BlurConfig {
    fn default() -> Self {
        Self {
            kind: BlurKind::default(),
            radius: 8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GrainConfig {
    /// Noise is drawn uniformly from `[-amount, +amount)`.
    pub amount: f32,
    /// Fixed seed for reproducible output. When absent, OS entropy is used.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for GrainConfig {
    fn default() -> Self {
        Self {
            amount: 15.0,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DispatchConfig {
    pub mode: Dispatch,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Format used when the output path has no recognized extension, and for
    /// every file written by batch runs.
    pub format: OutputFormat,
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(RetouchConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<RetouchConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: RetouchConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `path`, falling back to stock defaults when the file is
/// absent.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(path: &Path) -> Result<RetouchConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(path)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `retouch.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# retouch configuration
# =====================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Resize
# ---------------------------------------------------------------------------
[resize]
# Images wider than this are downscaled, keeping the aspect ratio.
max_width = 1920

# ---------------------------------------------------------------------------
# Pixelate
# ---------------------------------------------------------------------------
[pixelate]
# Mosaic tile edge in pixels. Each tile takes its top-left pixel's color.
block_size = 10

# ---------------------------------------------------------------------------
# Blur
# ---------------------------------------------------------------------------
[blur]
# "box" is a separable box filter; "gaussian" uses a Gaussian kernel with
# sigma = radius.
kind = "box"
radius = 8

# ---------------------------------------------------------------------------
# Film grain
# ---------------------------------------------------------------------------
[grain]
# Noise added to each color channel is drawn from [-amount, +amount).
amount = 15.0
# Fix the seed for reproducible grain. Omit for fresh noise on every run.
# seed = 42

# ---------------------------------------------------------------------------
# Effect-name matching
# ---------------------------------------------------------------------------
[dispatch]
# "stacking": every keyword found in the name applies, in a fixed order
#             ("dark vignette" darkens, then vignettes).
# "first-match": only the first matching keyword applies.
mode = "stacking"

# ---------------------------------------------------------------------------
# Output
# ---------------------------------------------------------------------------
[output]
# png, jpeg, webp or tiff. Single-file runs use the output path's extension
# when it names a known format.
format = "png"

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel workers for batch runs.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}
