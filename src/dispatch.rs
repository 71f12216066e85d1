//! Effect selection: free-text effect names → an ordered list of [`Effect`]s.
//!
//! Effect names come from an application menu ("Vintage Film", "Dark
//! Vignette", "VHS Glitch") and are not a closed vocabulary. Selection is by
//! keyword containment: the lowercased name is tested against every rule in
//! [`RULES`], in declaration order.
//!
//! ## Stacking
//!
//! In the default [`Dispatch::Stacking`] mode **every** matching rule fires,
//! so `"dark vignette"` darkens and then vignettes. Substrings overlap in
//! ways a menu author may not expect: `"reduce saturation"` also contains
//! `"red"`, and `"darken"` contains `"dark"`. [`Dispatch::FirstMatch`] keeps
//! only the first matching rule. Callers who want no matching at all pass an
//! explicit `&[Effect]` to the [`Pipeline`](crate::pipeline::Pipeline).
//!
//! ```
//! use retouch::dispatch::{Dispatch, Effect, resolve};
//!
//! assert_eq!(
//!     resolve("Dark Vignette", Dispatch::Stacking),
//!     vec![Effect::Darken, Effect::Vignette]
//! );
//! assert!(resolve("kaleidoscope", Dispatch::Stacking).is_empty());
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Every filter the pipeline can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Effect {
    Grayscale,
    Invert,
    Sepia,
    Blur,
    Brighten,
    Darken,
    BoostRed,
    BoostBlue,
    BoostGreen,
    Contrast,
    Pixelate,
    Sharpen,
    Vignette,
    Saturate,
    Desaturate,
    Warm,
    Cool,
    Grain,
    Glitch,
    Sketch,
    Resize,
    AutoLevels,
}

impl Effect {
    pub const ALL: [Effect; 22] = [
        Effect::Grayscale,
        Effect::Invert,
        Effect::Sepia,
        Effect::Blur,
        Effect::Brighten,
        Effect::Darken,
        Effect::BoostRed,
        Effect::BoostBlue,
        Effect::BoostGreen,
        Effect::Contrast,
        Effect::Pixelate,
        Effect::Sharpen,
        Effect::Vignette,
        Effect::Saturate,
        Effect::Desaturate,
        Effect::Warm,
        Effect::Cool,
        Effect::Grain,
        Effect::Glitch,
        Effect::Sketch,
        Effect::Resize,
        Effect::AutoLevels,
    ];

    /// Canonical kebab-case identifier.
    pub fn id(self) -> &'static str {
        match self {
            Effect::Grayscale => "grayscale",
            Effect::Invert => "invert",
            Effect::Sepia => "sepia",
            Effect::Blur => "blur",
            Effect::Brighten => "brighten",
            Effect::Darken => "darken",
            Effect::BoostRed => "boost-red",
            Effect::BoostBlue => "boost-blue",
            Effect::BoostGreen => "boost-green",
            Effect::Contrast => "contrast",
            Effect::Pixelate => "pixelate",
            Effect::Sharpen => "sharpen",
            Effect::Vignette => "vignette",
            Effect::Saturate => "saturate",
            Effect::Desaturate => "desaturate",
            Effect::Warm => "warm",
            Effect::Cool => "cool",
            Effect::Grain => "grain",
            Effect::Glitch => "glitch",
            Effect::Sketch => "sketch",
            Effect::Resize => "resize",
            Effect::AutoLevels => "auto-levels",
        }
    }

    /// One-line description for listings.
    pub fn description(self) -> &'static str {
        match self {
            Effect::Grayscale => "Rec. 601 luma on all channels",
            Effect::Invert => "255 - v on each color channel",
            Effect::Sepia => "Warm brown sepia matrix",
            Effect::Blur => "Low-pass filter",
            Effect::Brighten => "R,G,B x 1.5",
            Effect::Darken => "R,G,B x 0.5",
            Effect::BoostRed => "Red x 1.5, green and blue x 0.7",
            Effect::BoostBlue => "Blue x 1.5, red and green x 0.7",
            Effect::BoostGreen => "Green x 1.5, red and blue x 0.7",
            Effect::Contrast => "Double the distance from mid-gray",
            Effect::Pixelate => "Mosaic of top-left block samples",
            Effect::Sharpen => "3x3 sharpen kernel, border untouched",
            Effect::Vignette => "Radial darkening toward the corners",
            Effect::Saturate => "Push colors away from gray (x 1.8)",
            Effect::Desaturate => "Pull colors toward gray (x 0.3)",
            Effect::Warm => "Orange temperature shift",
            Effect::Cool => "Blue temperature shift",
            Effect::Grain => "Uniform film grain noise",
            Effect::Glitch => "VHS channel shift and scanlines",
            Effect::Sketch => "Sobel edges as dark pencil lines",
            Effect::Resize => "Downscale to the maximum width",
            Effect::AutoLevels => "Stretch the tonal range to 0-255",
        }
    }
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown effect '{0}' (run `retouch effects` for the list)")]
pub struct UnknownEffect(pub String);

impl FromStr for Effect {
    type Err = UnknownEffect;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Effect::ALL
            .into_iter()
            .find(|e| e.id().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownEffect(s.to_string()))
    }
}

/// One keyword predicate of the dispatch table.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    /// Lowercase substrings; any one of them selects the rule.
    pub keywords: &'static [&'static str],
    pub effect: Effect,
}

impl Rule {
    const fn new(keywords: &'static [&'static str], effect: Effect) -> Self {
        Self { keywords, effect }
    }

    fn matches(&self, name: &str) -> bool {
        self.keywords.iter().any(|k| name.contains(k))
    }

    /// The effect this rule applies to a (lowercased) name.
    ///
    /// The saturation rule picks its direction from the name.
    fn select(&self, name: &str) -> Effect {
        match self.effect {
            Effect::Saturate if name.contains("reduce") => Effect::Desaturate,
            effect => effect,
        }
    }
}

/// The keyword table, in application order.
pub const RULES: &[Rule] = &[
    Rule::new(&["grayscale", "black"], Effect::Grayscale),
    Rule::new(&["invert"], Effect::Invert),
    Rule::new(&["sepia", "vintage"], Effect::Sepia),
    Rule::new(&["blur"], Effect::Blur),
    Rule::new(&["bright"], Effect::Brighten),
    Rule::new(&["dark"], Effect::Darken),
    Rule::new(&["red"], Effect::BoostRed),
    Rule::new(&["blue"], Effect::BoostBlue),
    Rule::new(&["green"], Effect::BoostGreen),
    Rule::new(&["contrast"], Effect::Contrast),
    Rule::new(&["pixelate"], Effect::Pixelate),
    Rule::new(&["sharpen"], Effect::Sharpen),
    Rule::new(&["vignette"], Effect::Vignette),
    Rule::new(&["saturation"], Effect::Saturate),
    Rule::new(&["warm"], Effect::Warm),
    Rule::new(&["cool"], Effect::Cool),
    Rule::new(&["grain", "film"], Effect::Grain),
    Rule::new(&["glitch", "vhs"], Effect::Glitch),
    Rule::new(&["sketch"], Effect::Sketch),
    Rule::new(&["resize"], Effect::Resize),
    Rule::new(&["enhance", "auto"], Effect::AutoLevels),
];

/// How many matching rules fire for one name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Dispatch {
    /// Every matching rule, in table order.
    #[default]
    Stacking,
    /// Only the first matching rule.
    FirstMatch,
}

/// Resolve an effect name to the effects that will run, in order.
///
/// An empty result means the name matched nothing: the identity pass.
pub fn resolve(name: &str, mode: Dispatch) -> Vec<Effect> {
    let name = name.to_lowercase();
    let matched = RULES
        .iter()
        .filter(|rule| rule.matches(&name))
        .map(|rule| rule.select(&name));
    match mode {
        Dispatch::Stacking => matched.collect(),
        Dispatch::FirstMatch => matched.take(1).collect(),
    }
}

/// Parse a list of canonical identifiers.
pub fn parse_effects<S: AsRef<str>>(ids: &[S]) -> Result<Vec<Effect>, UnknownEffect> {
    ids.iter().map(|id| id.as_ref().parse()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_keyword() {
        assert_eq!(resolve("sepia", Dispatch::Stacking), vec![Effect::Sepia]);
        assert_eq!(resolve("invert", Dispatch::Stacking), vec![Effect::Invert]);
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert_eq!(
            resolve("VINTAGE Look", Dispatch::Stacking),
            vec![Effect::Sepia]
        );
    }

    #[test]
    fn aliases_select_the_same_effect() {
        for name in ["black and white", "grayscale"] {
            assert_eq!(resolve(name, Dispatch::Stacking), vec![Effect::Grayscale]);
        }
        for name in ["film", "grain"] {
            assert_eq!(resolve(name, Dispatch::Stacking), vec![Effect::Grain]);
        }
        for name in ["vhs", "glitch"] {
            assert_eq!(resolve(name, Dispatch::Stacking), vec![Effect::Glitch]);
        }
        for name in ["enhance", "auto"] {
            assert_eq!(
                resolve(name, Dispatch::Stacking),
                vec![Effect::AutoLevels]
            );
        }
    }

    #[test]
    fn unmatched_name_is_identity() {
        assert!(resolve("kaleidoscope", Dispatch::Stacking).is_empty());
        assert!(resolve("", Dispatch::Stacking).is_empty());
    }

    #[test]
    fn stacking_follows_declaration_order_not_name_order() {
        assert_eq!(
            resolve("vignette dark", Dispatch::Stacking),
            vec![Effect::Darken, Effect::Vignette]
        );
    }

    #[test]
    fn first_match_keeps_one() {
        assert_eq!(
            resolve("dark vignette", Dispatch::FirstMatch),
            vec![Effect::Darken]
        );
    }

    #[test]
    fn saturation_direction_comes_from_name() {
        assert_eq!(
            resolve("saturation boost", Dispatch::Stacking),
            vec![Effect::Saturate]
        );
        // "reduce" also contains "red"
        assert_eq!(
            resolve("reduce saturation", Dispatch::Stacking),
            vec![Effect::BoostRed, Effect::Desaturate]
        );
    }

    #[test]
    fn every_keyword_resolves() {
        let vocabulary = [
            "grayscale", "black", "invert", "sepia", "vintage", "blur", "bright", "dark",
            "red", "blue", "green", "contrast", "pixelate", "sharpen", "vignette",
            "saturation", "warm", "cool", "grain", "film", "glitch", "vhs", "sketch",
            "resize", "enhance", "auto",
        ];
        for word in vocabulary {
            assert!(
                !resolve(word, Dispatch::Stacking).is_empty(),
                "{word} resolved to nothing"
            );
        }
    }

    #[test]
    fn ids_roundtrip_through_from_str() {
        for effect in Effect::ALL {
            assert_eq!(effect.id().parse::<Effect>().unwrap(), effect);
            assert_eq!(effect.to_string(), effect.id());
        }
    }

    #[test]
    fn parse_effects_reports_unknown_id() {
        assert_eq!(
            parse_effects(&["sepia", "Vignette"]).unwrap(),
            vec![Effect::Sepia, Effect::Vignette]
        );
        assert_eq!(
            parse_effects(&["sepia", "lomo"]),
            Err(UnknownEffect("lomo".to_string()))
        );
    }
}
