//! Running effects over a buffer.
//!
//! A [`Pipeline`] binds the tunables ([`EffectSettings`]), the blur
//! implementation, the dispatch mode, and an optional grain seed. It holds no
//! per-call state: every call owns its buffer and its random generator, so one
//! pipeline can serve concurrent calls from a rayon pool.
//!
//! ```
//! use retouch::imaging::RasterBuffer;
//! use retouch::pipeline::Pipeline;
//!
//! let pipeline = Pipeline::default();
//! let buffer = RasterBuffer::filled(1, 1, [255, 0, 0, 255]).unwrap();
//! let out = pipeline.apply_named(buffer, "Grayscale").unwrap();
//! assert_eq!(out.pixel(0, 0), [76, 76, 76, 255]);
//! ```

use crate::config::RetouchConfig;
use crate::dispatch::{Dispatch, Effect, resolve};
use crate::imaging::params::{
    BRIGHTEN_FACTOR, CONTRAST_FACTOR, DARKEN_FACTOR, DESATURATE_AMOUNT, SATURATE_AMOUNT,
    VIGNETTE_STRENGTH,
};
use crate::imaging::{
    Blur, BoxBlur, Channel, ChannelBoost, EffectError, EffectSettings, OutputFormat,
    RasterBuffer, ToneShift, blur_for, codec, color, edges, noise, resize, spatial, tone,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

/// What a run applies: a free-text name resolved through dispatch, or an
/// explicit list that bypasses keyword matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Named(String),
    Explicit(Vec<Effect>),
}

pub struct Pipeline {
    settings: EffectSettings,
    blur: Box<dyn Blur + Send>,
    dispatch: Dispatch,
    seed: Option<u64>,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(EffectSettings::default())
    }
}

impl Pipeline {
    pub fn new(settings: EffectSettings) -> Self {
        Self {
            settings,
            blur: Box::new(BoxBlur::new()),
            dispatch: Dispatch::default(),
            seed: None,
        }
    }

    /// Build a pipeline from a loaded config file.
    pub fn from_config(config: &RetouchConfig) -> Self {
        Self::new(config.effect_settings())
            .with_blur(blur_for(config.blur.kind))
            .with_dispatch(config.dispatch.mode)
            .with_seed(config.grain.seed)
    }

    pub fn with_blur(mut self, blur: Box<dyn Blur + Send>) -> Self {
        self.blur = blur;
        self
    }

    pub fn with_dispatch(mut self, dispatch: Dispatch) -> Self {
        self.dispatch = dispatch;
        self
    }

    /// Seed for the grain generator. `None` draws from OS entropy.
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn settings(&self) -> &EffectSettings {
        &self.settings
    }

    pub fn dispatch(&self) -> Dispatch {
        self.dispatch
    }

    /// The effects a name selects under this pipeline's dispatch mode.
    pub fn resolve(&self, name: &str) -> Vec<Effect> {
        resolve(name, self.dispatch)
    }

    pub fn effects_for(&self, selection: &Selection) -> Vec<Effect> {
        match selection {
            Selection::Named(name) => self.resolve(name),
            Selection::Explicit(effects) => effects.clone(),
        }
    }

    /// Random generator for the `index`-th buffer of a run.
    ///
    /// Seeded runs offset the seed by the index so every file of a batch gets
    /// its own reproducible stream.
    pub fn rng_for(&self, index: u64) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(index)),
            None => StdRng::from_entropy(),
        }
    }

    /// Resolve `name` and apply every selected effect. An unmatched name
    /// returns the buffer unchanged.
    pub fn apply_named(&self, buffer: RasterBuffer, name: &str) -> Result<RasterBuffer, EffectError> {
        let effects = self.resolve(name);
        debug!(name, ?effects, "resolved effect name");
        self.apply_effects(buffer, &effects)
    }

    pub fn apply_effects(
        &self,
        buffer: RasterBuffer,
        effects: &[Effect],
    ) -> Result<RasterBuffer, EffectError> {
        self.apply_effects_with_rng(buffer, effects, &mut self.rng_for(0))
    }

    /// Apply `effects` in order, feeding each output into the next.
    pub fn apply_effects_with_rng<R: Rng>(
        &self,
        buffer: RasterBuffer,
        effects: &[Effect],
        rng: &mut R,
    ) -> Result<RasterBuffer, EffectError> {
        effects
            .iter()
            .try_fold(buffer, |buffer, &effect| self.apply_effect(buffer, effect, rng))
    }

    pub fn apply_effect<R: Rng>(
        &self,
        mut buffer: RasterBuffer,
        effect: Effect,
        rng: &mut R,
    ) -> Result<RasterBuffer, EffectError> {
        debug!(%effect, width = buffer.width(), height = buffer.height(), "applying effect");
        let s = &self.settings;
        match effect {
            Effect::Grayscale => color::grayscale(&mut buffer),
            Effect::Invert => color::invert(&mut buffer),
            Effect::Sepia => color::sepia(&mut buffer),
            Effect::Blur => return self.blur.blur(&buffer, s.blur_radius),
            Effect::Brighten => color::scale(&mut buffer, BRIGHTEN_FACTOR),
            Effect::Darken => color::scale(&mut buffer, DARKEN_FACTOR),
            Effect::BoostRed => {
                color::boost_channel(&mut buffer, Channel::Red, ChannelBoost::default())
            }
            Effect::BoostBlue => {
                color::boost_channel(&mut buffer, Channel::Blue, ChannelBoost::default())
            }
            Effect::BoostGreen => {
                color::boost_channel(&mut buffer, Channel::Green, ChannelBoost::default())
            }
            Effect::Contrast => color::contrast(&mut buffer, CONTRAST_FACTOR),
            Effect::Pixelate => spatial::pixelate(&mut buffer, s.block_size),
            Effect::Sharpen => spatial::sharpen(&mut buffer),
            Effect::Vignette => spatial::vignette(&mut buffer, VIGNETTE_STRENGTH),
            Effect::Saturate => color::saturation(&mut buffer, SATURATE_AMOUNT),
            Effect::Desaturate => color::saturation(&mut buffer, DESATURATE_AMOUNT),
            Effect::Warm => color::tone(&mut buffer, ToneShift::warm()),
            Effect::Cool => color::tone(&mut buffer, ToneShift::cool()),
            Effect::Grain => noise::grain(&mut buffer, s.grain_amount, rng),
            Effect::Glitch => noise::glitch(&mut buffer),
            Effect::Sketch => edges::sketch(&mut buffer),
            Effect::Resize => return resize::fit_width(buffer, s.max_width),
            Effect::AutoLevels => tone::auto_levels(&mut buffer),
        }
        Ok(buffer)
    }

    /// Full host round trip: decode `bytes`, apply `name`, encode as `format`.
    pub fn render(
        &self,
        bytes: &[u8],
        name: &str,
        format: OutputFormat,
    ) -> Result<Vec<u8>, EffectError> {
        let buffer = codec::decode(bytes)?;
        let buffer = self.apply_named(buffer, name)?;
        codec::encode(&buffer, format)
    }
}
