//! CLI output formatting for every command.
//!
//! Each command has a pure `format_*` function returning display lines and a
//! thin `print_*` wrapper. Tests assert on the lines, never on stdout.
//!
//! # Output Format
//!
//! ## Effects
//!
//! ```text
//! grayscale     grayscale | black        Rec. 601 luma on all channels
//! ...
//! desaturate    reduce + saturation      Pull colors toward gray (x 0.3)
//! ```
//!
//! ## Resolution
//!
//! ```text
//! "Dark Vignette"
//!     1 darken
//!     2 vignette
//! ```
//!
//! ## Apply
//!
//! ```text
//! beach.jpg → beach.png
//!     Effects: darken, vignette
//!     Size: 4000x3000
//! ```
//!
//! ## Batch
//!
//! ```text
//! 3 images: sepia, grain
//!     001 a.png (640x480)
//!     002 nested/c.png (1920x1080 → 1920x1080)
//! Wrote 3 images to out/ (report: out/report.json)
//! ```

use crate::dispatch::{Effect, RULES};
use crate::process::{BatchReport, ProcessEvent, REPORT_FILE};
use std::path::Path;

/// Indentation for nested context lines.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn dimensions(dims: (u32, u32)) -> String {
    format!("{}x{}", dims.0, dims.1)
}

fn size_change(before: (u32, u32), after: (u32, u32)) -> String {
    if before == after {
        dimensions(after)
    } else {
        format!("{} \u{2192} {}", dimensions(before), dimensions(after))
    }
}

fn effect_ids(effects: &[Effect]) -> String {
    if effects.is_empty() {
        "none".to_string()
    } else {
        effects
            .iter()
            .map(|e| e.id())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// The keywords that select `effect`, as shown in listings.
fn trigger(effect: Effect) -> String {
    if effect == Effect::Desaturate {
        return "reduce + saturation".to_string();
    }
    RULES
        .iter()
        .find(|rule| rule.effect == effect)
        .map(|rule| rule.keywords.join(" | "))
        .unwrap_or_default()
}

// ============================================================================
// effects
// ============================================================================

/// One line per effect: id, triggering keywords, description.
pub fn format_effect_list() -> Vec<String> {
    Effect::ALL
        .iter()
        .map(|&effect| {
            format!(
                "{:<13} {:<24} {}",
                effect.id(),
                trigger(effect),
                effect.description()
            )
        })
        .collect()
}

pub fn print_effect_list() {
    for line in format_effect_list() {
        println!("{}", line);
    }
}

/// What a free-text name resolves to, in application order.
pub fn format_resolution(name: &str, effects: &[Effect]) -> Vec<String> {
    let mut lines = vec![format!("\"{}\"", name)];
    if effects.is_empty() {
        lines.push(format!("{}no effect matched, image passes through unchanged", indent(1)));
    }
    for (i, effect) in effects.iter().enumerate() {
        lines.push(format!("{}{} {}", indent(1), i + 1, effect.id()));
    }
    lines
}

pub fn print_resolution(name: &str, effects: &[Effect]) {
    for line in format_resolution(name, effects) {
        println!("{}", line);
    }
}

// ============================================================================
// apply
// ============================================================================

/// Summary of a single-file run.
pub fn format_apply_result(
    input: &Path,
    output: &Path,
    effects: &[Effect],
    before: (u32, u32),
    after: (u32, u32),
) -> Vec<String> {
    vec![
        format!("{} \u{2192} {}", input.display(), output.display()),
        format!("{}Effects: {}", indent(1), effect_ids(effects)),
        format!("{}Size: {}", indent(1), size_change(before, after)),
    ]
}

pub fn print_apply_result(
    input: &Path,
    output: &Path,
    effects: &[Effect],
    before: (u32, u32),
    after: (u32, u32),
) {
    for line in format_apply_result(input, output, effects, before, after) {
        println!("{}", line);
    }
}

// ============================================================================
// batch
// ============================================================================

/// Format a single batch progress event as display lines.
pub fn format_process_event(event: &ProcessEvent) -> Vec<String> {
    match event {
        ProcessEvent::Started {
            file_count,
            effects,
        } => {
            vec![format!("{} images: {}", file_count, effect_ids(effects))]
        }
        ProcessEvent::FileProcessed {
            index,
            output,
            input_dimensions,
            output_dimensions,
            ..
        } => vec![format!(
            "{}{:03} {} ({})",
            indent(1),
            index,
            output,
            size_change(*input_dimensions, *output_dimensions)
        )],
    }
}

/// Closing line of a batch run.
pub fn format_batch_summary(report: &BatchReport, output_dir: &Path) -> Vec<String> {
    vec![format!(
        "Wrote {} images to {} (report: {})",
        report.files.len(),
        output_dir.display(),
        output_dir.join(REPORT_FILE).display()
    )]
}

pub fn print_batch_summary(report: &BatchReport, output_dir: &Path) {
    for line in format_batch_summary(report, output_dir) {
        println!("{}", line);
    }
}
