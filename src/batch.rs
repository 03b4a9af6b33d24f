//! Parallel batch processing of a directory tree.
//!
//! Every supported image under the input directory is loaded, optionally
//! auto-oriented, run through a [`Recipe`] and saved under the output
//! directory at the same relative path. Files are independent, so they are
//! spread over rayon's global pool with no shared state; size the pool with
//! [`effective_threads`](crate::config::effective_threads) before calling.

use crate::config::EngineConfig;
use crate::image::Image;
use crate::recipe::{Recipe, RecipeError};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

const SUPPORTED_EXTENSIONS: &[&str] = &["gif", "png", "jpg", "jpeg"];

/// Outcome of a batch run.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Output paths written.
    pub processed: Vec<PathBuf>,
    /// Input paths that failed, with the error message.
    pub failed: Vec<(PathBuf, String)>,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| SUPPORTED_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Supported image files under `dir`, sorted.
pub fn collect_inputs(dir: &Path) -> Vec<PathBuf> {
    let mut inputs: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(error = %e, "skipping unreadable entry");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file() && is_supported(entry.path()))
        .map(|entry| entry.into_path())
        .collect();
    inputs.sort();
    inputs
}

/// Load, transform and save one file.
pub fn process_file(
    input: &Path,
    output: &Path,
    recipe: &Recipe,
    config: &EngineConfig,
) -> Result<(), RecipeError> {
    let mut img = Image::new()?;
    img.configure(config).load(input)?;
    if config.auto_orientate {
        img.auto_orientate()?;
    }
    recipe.apply(&mut img)?;
    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)?;
    }
    img.save(Some(output))?;
    debug!(input = %input.display(), output = %output.display(), "processed");
    Ok(())
}

/// Process every supported file under `dir` into `out_dir`.
pub fn run(dir: &Path, out_dir: &Path, recipe: &Recipe, config: &EngineConfig) -> BatchReport {
    let results: Vec<(PathBuf, Result<PathBuf, String>)> = collect_inputs(dir)
        .into_par_iter()
        .map(|input| {
            let relative = input.strip_prefix(dir).unwrap_or(&input);
            let output = out_dir.join(relative);
            let result = process_file(&input, &output, recipe, config)
                .map(|()| output)
                .map_err(|e| e.to_string());
            (input, result)
        })
        .collect();

    let mut report = BatchReport::default();
    for (input, result) in results {
        match result {
            Ok(output) => report.processed.push(output),
            Err(message) => {
                warn!(input = %input.display(), error = %message, "failed");
                report.failed.push((input, message));
            }
        }
    }
    report
}
