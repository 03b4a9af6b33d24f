//! Declarative transform pipelines.
//!
//! A recipe is a TOML file listing steps in order. Each step names its
//! operation in `op` and carries parameters in any shape the
//! [normalizer](crate::normalize) accepts:
//!
//! ```toml
//! [[steps]]
//! op = "resize"
//! mode = "resizecrop"
//! size = { w = 400, h = 300 }
//!
//! [[steps]]
//! op = "rotate"
//! degrees = 15
//! background = "#ffffff"
//!
//! [[steps]]
//! op = "sepia"
//!
//! [[steps]]
//! op = "watermark"
//! file = "logo.png"          # relative to the recipe file
//! position = "bottom right"
//! size = "25%"
//! margin = [-10, -10]
//! ```

use crate::error::Error;
use crate::image::Image;
use crate::imaging::{Codec, WatermarkOptions};
use crate::normalize::{self, Args};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum RecipeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    /// Failure outside any step, e.g. loading or saving around the recipe.
    #[error(transparent)]
    Image(#[from] Error),
    #[error("step {} ({op}) failed: {source}", .index + 1)]
    Step {
        /// Zero-based position of the failing step.
        index: usize,
        op: &'static str,
        #[source]
        source: Error,
    },
}

fn default_passes() -> u32 {
    1
}

fn default_block_size() -> u32 {
    3
}

fn default_vignette_size() -> f64 {
    0.7
}

fn default_vignette_level() -> f64 {
    0.8
}

/// One pipeline step.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    Resize {
        mode: String,
        size: Args,
    },
    Crop {
        rect: Args,
    },
    Rotate {
        degrees: f64,
        #[serde(default)]
        background: Option<Args>,
    },
    Flip {
        axis: String,
    },
    AutoOrientate,
    Fill {
        color: Args,
    },
    Blur {
        #[serde(default)]
        kind: Option<String>,
        #[serde(default = "default_passes")]
        passes: u32,
    },
    Brightness {
        level: i32,
    },
    Contrast {
        level: i32,
    },
    Smooth {
        level: i32,
    },
    Grayscale,
    Negate,
    EdgeDetection,
    Emboss,
    MeanRemove,
    Colorize {
        color: Args,
    },
    Pixelate {
        #[serde(default = "default_block_size")]
        block_size: u32,
        #[serde(default)]
        advanced: bool,
    },
    Sepia {
        #[serde(default)]
        alpha: u8,
    },
    Vignette {
        #[serde(default = "default_vignette_size")]
        size: f64,
        #[serde(default = "default_vignette_level")]
        level: f64,
    },
    Watermark {
        file: PathBuf,
        #[serde(default)]
        position: Option<Args>,
        #[serde(default)]
        size: Option<Args>,
        #[serde(default)]
        margin: Option<Args>,
    },
}

impl Step {
    pub fn name(&self) -> &'static str {
        match self {
            Step::Resize { .. } => "resize",
            Step::Crop { .. } => "crop",
            Step::Rotate { .. } => "rotate",
            Step::Flip { .. } => "flip",
            Step::AutoOrientate => "auto_orientate",
            Step::Fill { .. } => "fill",
            Step::Blur { .. } => "blur",
            Step::Brightness { .. } => "brightness",
            Step::Contrast { .. } => "contrast",
            Step::Smooth { .. } => "smooth",
            Step::Grayscale => "grayscale",
            Step::Negate => "negate",
            Step::EdgeDetection => "edge_detection",
            Step::Emboss => "emboss",
            Step::MeanRemove => "mean_remove",
            Step::Colorize { .. } => "colorize",
            Step::Pixelate { .. } => "pixelate",
            Step::Sepia { .. } => "sepia",
            Step::Vignette { .. } => "vignette",
            Step::Watermark { .. } => "watermark",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Recipe {
    #[serde(default)]
    pub steps: Vec<Step>,
    /// Directory relative watermark paths resolve against.
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

impl Recipe {
    pub fn from_toml(content: &str) -> Result<Self, RecipeError> {
        Ok(toml::from_str(content)?)
    }

    /// Read a recipe file. Relative paths inside it resolve against its directory.
    pub fn load(path: &Path) -> Result<Self, RecipeError> {
        let content = fs::read_to_string(path)?;
        let mut recipe = Self::from_toml(&content)?;
        recipe.base_dir = path.parent().map(Path::to_path_buf);
        Ok(recipe)
    }

    /// Run every step in order, stopping at the first failure.
    pub fn apply<C: Codec>(&self, image: &mut Image<C>) -> Result<(), RecipeError> {
        for (index, step) in self.steps.iter().enumerate() {
            debug!(index, op = step.name(), "recipe step");
            self.apply_step(step, image)
                .map_err(|source| RecipeError::Step {
                    index,
                    op: step.name(),
                    source,
                })?;
        }
        Ok(())
    }

    fn resolve(&self, file: &Path) -> PathBuf {
        match &self.base_dir {
            Some(dir) if file.is_relative() => dir.join(file),
            _ => file.to_path_buf(),
        }
    }

    fn apply_step<C: Codec>(&self, step: &Step, image: &mut Image<C>) -> crate::Result<()> {
        match step {
            Step::Resize { mode, size } => image.resize(mode, size.clone())?,
            Step::Crop { rect } => image.crop(rect.clone())?,
            Step::Rotate {
                degrees,
                background: Some(bg),
            } => image.rotate_with_background(*degrees, bg.clone())?,
            Step::Rotate { degrees, .. } => image.rotate(*degrees)?,
            Step::Flip { axis } => image.flip(axis)?,
            Step::AutoOrientate => image.auto_orientate()?,
            Step::Fill { color } => image.fill(color.clone())?,
            Step::Blur { kind, passes } => image.blur(kind.as_deref(), *passes)?,
            Step::Brightness { level } => image.brightness(*level)?,
            Step::Contrast { level } => image.contrast(*level)?,
            Step::Smooth { level } => image.smooth(*level)?,
            Step::Grayscale => image.grayscale()?,
            Step::Negate => image.negate()?,
            Step::EdgeDetection => image.edge_detection()?,
            Step::Emboss => image.emboss()?,
            Step::MeanRemove => image.mean_remove()?,
            Step::Colorize { color } => image.colorize(color.clone())?,
            Step::Pixelate {
                block_size,
                advanced,
            } => image.pixelate(*block_size, *advanced)?,
            Step::Sepia { alpha } => image.sepia(*alpha)?,
            Step::Vignette { size, level } => image.vignette(*size, *level)?,
            Step::Watermark {
                file,
                position,
                size,
                margin,
            } => {
                let defaults = WatermarkOptions::default();
                let options = WatermarkOptions {
                    position: position
                        .as_ref()
                        .map(normalize::css_position)
                        .transpose()?
                        .unwrap_or(defaults.position),
                    size: size.as_ref().map(normalize::watermark_size).transpose()?,
                    margin: margin
                        .as_ref()
                        .map(normalize::margin)
                        .transpose()?
                        .unwrap_or(defaults.margin),
                };
                image.watermark(self.resolve(file), &options)?
            }
        };
        Ok(())
    }
}
