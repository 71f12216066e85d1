//! # Retouch
//!
//! A raster effect pipeline for photo editing. An image is decoded into an
//! RGBA [`RasterBuffer`](imaging::RasterBuffer), a free-text effect name
//! ("Vintage Film", "Dark Vignette") is turned into an ordered list of
//! filters, the filters run in sequence, and the result is re-encoded.
//!
//! # Architecture
//!
//! ```text
//! bytes ──decode──▶ RasterBuffer ──effect 1──▶ … ──effect n──▶ RasterBuffer ──encode──▶ bytes
//!                                   ▲
//!                 dispatch::resolve("dark vignette") = [Darken, Vignette]
//! ```
//!
//! Every filter is a plain function over an owned buffer. Filters hold no
//! state, so one [`Pipeline`](pipeline::Pipeline) can be shared by a whole
//! rayon pool; batch runs rely on this.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`imaging`] | The pixel model, every filter, blur backends, and the codec adapter |
//! | [`dispatch`] | The closed [`Effect`](dispatch::Effect) set and the keyword table that selects from it |
//! | [`pipeline`] | Binds settings, blur backend, dispatch mode and grain seed; applies effects |
//! | [`config`] | `retouch.toml` loading, merging over stock defaults, and validation |
//! | [`process`] | Parallel batch runs over a directory tree, with a JSON report |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Keyword Stacking
//!
//! Effect names are matched by substring, and every match applies. This is
//! what makes "Dark Vignette" a two-step effect without a separate recipe
//! format. It also means "reduce saturation" boosts red before desaturating,
//! because "reduce" contains "red". [`Dispatch::FirstMatch`](dispatch::Dispatch)
//! and explicit effect lists exist for callers who want something stricter.
//!
//! ## Pure-Rust Imaging
//!
//! Decoding, encoding and resampling go through the `image` crate, and every
//! filter is in-process Rust over a byte slice. There is no platform graphics
//! context to acquire, so the only "surface unavailable" failure is a buffer
//! that cannot be allocated.
//!
//! ## Reproducible Noise
//!
//! Film grain takes its random generator as an argument. A configured seed
//! makes output byte-for-byte repeatable, including across batch runs with a
//! different number of worker threads.

pub mod config;
pub mod dispatch;
pub mod imaging;
pub mod output;
pub mod pipeline;
pub mod process;

#[cfg(test)]
pub(crate) mod test_helpers;
