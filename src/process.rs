//! Batch processing: one selection of effects over a directory tree.
//!
//! Walks the input directory for decodable images, runs every file through the
//! same [`Pipeline`] in parallel, and mirrors the tree into the output
//! directory. A `report.json` summarizing the run is written next to the
//! outputs.
//!
//! ## Output Structure
//!
//! ```text
//! out/
//! ├── report.json            # BatchReport: effects, format, per-file sizes
//! ├── beach.png              # in/beach.jpg with the selected effects
//! └── 2024/
//!     └── party.png          # in/2024/party.webp
//! ```
//!
//! ## Parallel Processing
//!
//! Files are processed in parallel using [rayon](https://docs.rs/rayon). Each
//! file gets its own random generator from [`Pipeline::rng_for`], keyed by its
//! position in the sorted file list, so seeded runs produce the same bytes no
//! matter how the work is scheduled. The first failure aborts the run.

use crate::dispatch::Effect;
use crate::imaging::codec::{self, is_supported_input};
use crate::imaging::{EffectError, OutputFormat};
use crate::pipeline::{Pipeline, Selection};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;
use tracing::{debug, info};
use walkdir::WalkDir;

pub const REPORT_FILE: &str = "report.json";

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Effect failed: {0}")]
    Effect(#[from] EffectError),
    #[error("Source directory not found: {0}")]
    SourceNotFound(PathBuf),
    #[error("Directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("{first} and {second} would both be written to {output}")]
    OutputCollision {
        output: String,
        first: String,
        second: String,
    },
}

/// Progress events emitted while a batch runs.
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessEvent {
    /// Discovery finished; `effects` is what every file will receive.
    Started {
        file_count: usize,
        effects: Vec<Effect>,
    },
    /// One file was written. `index` is 1-based in discovery order.
    FileProcessed {
        index: usize,
        source: String,
        output: String,
        input_dimensions: (u32, u32),
        output_dimensions: (u32, u32),
    },
}

/// Summary of a batch run, written to `report.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    /// Canonical ids of the effects applied, in order.
    pub effects: Vec<String>,
    pub format: OutputFormat,
    pub files: Vec<FileResult>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileResult {
    /// Path relative to the input directory.
    pub source: String,
    /// Path relative to the output directory.
    pub output: String,
    pub input_dimensions: (u32, u32),
    pub output_dimensions: (u32, u32),
}

/// Every decodable image under `root`, sorted by path.
pub fn discover_images(root: &Path) -> Result<Vec<PathBuf>, ProcessError> {
    if !root.is_dir() {
        return Err(ProcessError::SourceNotFound(root.to_path_buf()));
    }
    let mut files = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_file() && is_supported_input(entry.path()) {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// Where a source file lands in the output tree.
fn output_path(relative: &Path, format: OutputFormat) -> PathBuf {
    relative.with_extension(format.extension())
}

fn display_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Pair every source with its output path, relative to the two roots.
///
/// Sources that differ only by extension (`a.png`, `a.tiff`) would land on
/// the same output file; that is rejected before anything is written.
fn plan_outputs(
    input_dir: &Path,
    sources: &[PathBuf],
    format: OutputFormat,
) -> Result<Vec<(PathBuf, PathBuf)>, ProcessError> {
    let mut claimed: HashMap<PathBuf, &Path> = HashMap::new();
    let mut plan = Vec::with_capacity(sources.len());
    for source in sources {
        let relative = source.strip_prefix(input_dir).unwrap_or(source);
        let target = output_path(relative, format);
        if let Some(first) = claimed.insert(target.clone(), relative) {
            return Err(ProcessError::OutputCollision {
                output: display_path(&target),
                first: display_path(first),
                second: display_path(relative),
            });
        }
        plan.push((relative.to_path_buf(), target));
    }
    Ok(plan)
}

/// Apply `selection` to every image under `input_dir`, writing results under
/// `output_dir` as `format`.
pub fn process(
    input_dir: &Path,
    output_dir: &Path,
    pipeline: &Pipeline,
    selection: &Selection,
    format: OutputFormat,
    progress: Option<Sender<ProcessEvent>>,
) -> Result<BatchReport, ProcessError> {
    let sources = discover_images(input_dir)?;
    let plan = plan_outputs(input_dir, &sources, format)?;
    let effects = pipeline.effects_for(selection);
    info!(
        files = sources.len(),
        effects = ?effects,
        input = %input_dir.display(),
        "starting batch"
    );

    if let Some(tx) = &progress {
        tx.send(ProcessEvent::Started {
            file_count: sources.len(),
            effects: effects.clone(),
        })
        .ok();
    }

    std::fs::create_dir_all(output_dir)?;

    let files = sources
        .par_iter()
        .zip(plan.par_iter())
        .enumerate()
        .map(|(index, (source, (relative, target)))| {
            let buffer = codec::load(source)?;
            let input_dimensions = buffer.dimensions();
            let mut rng = pipeline.rng_for(index as u64);
            let buffer = pipeline.apply_effects_with_rng(buffer, &effects, &mut rng)?;
            codec::save(&buffer, &output_dir.join(target), format)?;
            debug!(source = %source.display(), "processed");

            let result = FileResult {
                source: display_path(relative),
                output: display_path(target),
                input_dimensions,
                output_dimensions: buffer.dimensions(),
            };
            if let Some(tx) = &progress {
                tx.send(ProcessEvent::FileProcessed {
                    index: index + 1,
                    source: result.source.clone(),
                    output: result.output.clone(),
                    input_dimensions: result.input_dimensions,
                    output_dimensions: result.output_dimensions,
                })
                .ok();
            }
            Ok(result)
        })
        .collect::<Result<Vec<_>, ProcessError>>()?;

    let report = BatchReport {
        effects: effects.iter().map(|e| e.id().to_string()).collect(),
        format,
        files,
    };
    write_report(&report, output_dir)?;
    Ok(report)
}

/// Write `report` as pretty JSON to `<output_dir>/report.json`.
pub fn write_report(report: &BatchReport, output_dir: &Path) -> Result<PathBuf, ProcessError> {
    let path = output_dir.join(REPORT_FILE);
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(&path, json)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::save;
    use crate::test_helpers::{gradient, solid};
    use std::fs;
    use tempfile::TempDir;

    fn fixture_tree() -> TempDir {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        save(&gradient(12, 8), &root.join("b.png"), OutputFormat::Png).unwrap();
        save(&solid(4, 4, [200, 200, 200, 255]), &root.join("a.png"), OutputFormat::Png)
            .unwrap();
        save(&gradient(6, 6), &root.join("nested/c.tiff"), OutputFormat::Tiff).unwrap();
        fs::write(root.join("notes.txt"), "not an image").unwrap();
        tmp
    }

    // =========================================================================
    // Discovery
    // =========================================================================

    #[test]
    fn discover_finds_images_sorted_and_skips_other_files() {
        let tmp = fixture_tree();
        let found: Vec<_> = discover_images(tmp.path())
            .unwrap()
            .into_iter()
            .map(|p| display_path(p.strip_prefix(tmp.path()).unwrap()))
            .collect();
        assert_eq!(found, vec!["a.png", "b.png", "nested/c.tiff"]);
    }

    #[test]
    fn discover_missing_dir_is_source_not_found() {
        let result = discover_images(Path::new("/nonexistent/photos"));
        assert!(matches!(result, Err(ProcessError::SourceNotFound(_))));
    }

    #[test]
    fn output_path_swaps_extension() {
        assert_eq!(
            output_path(Path::new("2024/party.jpg"), OutputFormat::Webp),
            PathBuf::from("2024/party.webp")
        );
    }

    // =========================================================================
    // Full runs
    // =========================================================================

    #[test]
    fn process_mirrors_tree_and_writes_report() {
        let src = fixture_tree();
        let out = TempDir::new().unwrap();
        let pipeline = Pipeline::default();

        let report = process(
            src.path(),
            out.path(),
            &pipeline,
            &Selection::Named("Dark".into()),
            OutputFormat::Png,
            None,
        )
        .unwrap();

        assert_eq!(report.effects, vec!["darken"]);
        assert_eq!(report.files.len(), 3);
        assert_eq!(report.files[2].output, "nested/c.png");
        assert!(out.path().join("nested/c.png").exists());

        let darkened = codec::load(&out.path().join("a.png")).unwrap();
        assert_eq!(darkened.pixel(0, 0), [100, 100, 100, 255]);

        let json = fs::read_to_string(out.path().join(REPORT_FILE)).unwrap();
        let parsed: BatchReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, report);
    }

    #[test]
    fn process_reports_resized_dimensions() {
        let src = fixture_tree();
        let out = TempDir::new().unwrap();
        let pipeline = Pipeline::new(crate::imaging::EffectSettings {
            max_width: 6,
            ..Default::default()
        });

        let report = process(
            src.path(),
            out.path(),
            &pipeline,
            &Selection::Explicit(vec![Effect::Resize]),
            OutputFormat::Png,
            None,
        )
        .unwrap();

        let b = report.files.iter().find(|f| f.source == "b.png").unwrap();
        assert_eq!(b.input_dimensions, (12, 8));
        assert_eq!(b.output_dimensions, (6, 4));
    }

    #[test]
    fn process_sends_events() {
        let src = fixture_tree();
        let out = TempDir::new().unwrap();
        let (tx, rx) = std::sync::mpsc::channel();

        process(
            src.path(),
            out.path(),
            &Pipeline::default(),
            &Selection::Named("invert".into()),
            OutputFormat::Png,
            Some(tx),
        )
        .unwrap();

        let events: Vec<ProcessEvent> = rx.iter().collect();
        assert_eq!(
            events[0],
            ProcessEvent::Started {
                file_count: 3,
                effects: vec![Effect::Invert],
            }
        );
        let mut indices: Vec<usize> = events[1..]
            .iter()
            .map(|e| match e {
                ProcessEvent::FileProcessed { index, .. } => *index,
                other => panic!("unexpected event {other:?}"),
            })
            .collect();
        indices.sort();
        assert_eq!(indices, vec![1, 2, 3]);
    }

    #[test]
    fn seeded_grain_batches_are_reproducible() {
        let src = fixture_tree();
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        let pipeline = Pipeline::default().with_seed(Some(2024));
        let selection = Selection::Named("film grain".into());

        for out in [&first, &second] {
            process(src.path(), out.path(), &pipeline, &selection, OutputFormat::Png, None)
                .unwrap();
        }

        for name in ["a.png", "b.png", "nested/c.png"] {
            assert_eq!(
                fs::read(first.path().join(name)).unwrap(),
                fs::read(second.path().join(name)).unwrap(),
                "{name} differs between seeded runs"
            );
        }
    }

    #[test]
    fn sources_differing_only_by_extension_are_rejected() {
        let src = fixture_tree();
        save(&gradient(3, 3), &src.path().join("a.tiff"), OutputFormat::Tiff).unwrap();
        let out = TempDir::new().unwrap();

        let result = process(
            src.path(),
            out.path(),
            &Pipeline::default(),
            &Selection::Named("invert".into()),
            OutputFormat::Png,
            None,
        );
        match result {
            Err(ProcessError::OutputCollision {
                output,
                first,
                second,
            }) => {
                assert_eq!(output, "a.png");
                assert_eq!((first.as_str(), second.as_str()), ("a.png", "a.tiff"));
            }
            other => panic!("expected an output collision, got {other:?}"),
        }
        assert!(!out.path().join("a.png").exists());
    }

    #[test]
    fn same_stem_in_different_directories_is_fine() {
        let src = fixture_tree();
        save(&gradient(3, 3), &src.path().join("nested/a.tiff"), OutputFormat::Tiff).unwrap();
        let plan = plan_outputs(
            src.path(),
            &discover_images(src.path()).unwrap(),
            OutputFormat::Png,
        )
        .unwrap();
        let targets: Vec<_> = plan.iter().map(|(_, t)| display_path(t)).collect();
        assert_eq!(targets, vec!["a.png", "b.png", "nested/a.png", "nested/c.png"]);
    }

    #[test]
    fn corrupt_image_fails_the_batch() {
        let src = fixture_tree();
        fs::write(src.path().join("broken.png"), b"not a png").unwrap();
        let out = TempDir::new().unwrap();

        let result = process(
            src.path(),
            out.path(),
            &Pipeline::default(),
            &Selection::Named("sepia".into()),
            OutputFormat::Png,
            None,
        );
        assert!(matches!(
            result,
            Err(ProcessError::Effect(EffectError::Decode(_)))
        ));
        assert!(!out.path().join(REPORT_FILE).exists());
    }
}
