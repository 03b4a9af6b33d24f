//! Engine configuration module.
//!
//! Handles loading and validating `pixmill.toml`. Every key is optional;
//! anything left out keeps its stock default.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! quality = 80            # GIF/JPEG export quality (0-100)
//! compression = 9         # PNG compression level (0-9)
//! auto_orientate = true   # Apply EXIF orientation on load
//!
//! [processing]
//! max_processes = 4       # Max parallel workers (omit for auto = CPU cores)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

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

/// Engine configuration loaded from `pixmill.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// GIF/JPEG export quality.
    pub quality: u8,
    /// PNG compression level.
    pub compression: u8,
    /// Rotate/flip loaded images according to their EXIF orientation tag.
    pub auto_orientate: bool,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            quality: 80,
            compression: 9,
            auto_orientate: true,
            processing: ProcessingConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.quality > 100 {
            return Err(ConfigError::Validation("quality must be 0-100".into()));
        }
        if self.compression > 9 {
            return Err(ConfigError::Validation("compression must be 0-9".into()));
        }
        if self.processing.max_processes == Some(0) {
            return Err(ConfigError::Validation(
                "processing.max_processes must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel batch workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
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
    config.max_processes.map(|n| n.min(cores)).unwrap_or(cores)
}

/// Parse and validate a config document.
pub fn parse_config(content: &str) -> Result<EngineConfig, ConfigError> {
    let config: EngineConfig = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
}

/// Load config from the given file.
///
/// A missing file yields the stock defaults.
pub fn load_config(path: &Path) -> Result<EngineConfig, ConfigError> {
    if !path.exists() {
        return Ok(EngineConfig::default());
    }
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Returns a fully-commented stock `pixmill.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# pixmill Configuration
# =====================
# All settings are optional. Remove or comment out any you don't need.

# Export quality for GIF and JPEG output, 0 (worst) to 100 (best).
quality = 80

# PNG compression level, 0 (none, fastest) to 9 (smallest files).
compression = 9

# Rotate and mirror JPEGs according to their EXIF orientation tag
# right after loading.
auto_orientate = true

# ---------------------------------------------------------------------------
# Parallel processing
# ---------------------------------------------------------------------------
[processing]
# Maximum number of images processed at once by `pixmill batch`.
# Omit to use every CPU core. Larger values are clamped to the core count.
# max_processes = 4
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_values() {
        let config = EngineConfig::default();
        assert_eq!(config.quality, 80);
        assert_eq!(config.compression, 9);
        assert!(config.auto_orientate);
        assert_eq!(config.processing.max_processes, None);
    }

    #[test]
    fn stock_config_parses_to_defaults() {
        let config = parse_config(stock_config_toml()).unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let config = parse_config("quality = 55").unwrap();
        assert_eq!(config.quality, 55);
        assert_eq!(config.compression, 9);
        assert!(config.auto_orientate);
    }

    #[test]
    fn unknown_keys_rejected() {
        assert!(matches!(
            parse_config("qualty = 55"),
            Err(ConfigError::Toml(_))
        ));
        assert!(matches!(
            parse_config("[processing]\nworkers = 2"),
            Err(ConfigError::Toml(_))
        ));
    }

    // =========================================================================
    // validation
    // =========================================================================

    #[test]
    fn quality_out_of_range() {
        assert!(matches!(
            parse_config("quality = 101"),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn compression_out_of_range() {
        assert!(matches!(
            parse_config("compression = 10"),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn zero_workers_rejected() {
        assert!(matches!(
            parse_config("[processing]\nmax_processes = 0"),
            Err(ConfigError::Validation(_))
        ));
    }

    // =========================================================================
    // load_config tests
    // =========================================================================

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(&tmp.path().join("pixmill.toml")).unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("pixmill.toml");
        fs::write(
            &path,
            r#"
auto_orientate = false

[processing]
max_processes = 2
"#,
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert!(!config.auto_orientate);
        assert_eq!(config.processing.max_processes, Some(2));
        assert_eq!(config.quality, 80);
    }

    // =========================================================================
    // effective_threads
    // =========================================================================

    #[test]
    fn effective_threads_auto() {
        let config = ProcessingConfig {
            max_processes: None,
        };
        let threads = effective_threads(&config);
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        assert_eq!(threads, cores);
    }

    #[test]
    fn effective_threads_clamped_to_cores() {
        let config = ProcessingConfig {
            max_processes: Some(99999),
        };
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        assert_eq!(effective_threads(&config), cores);
    }

    #[test]
    fn effective_threads_user_constrains_down() {
        let config = ProcessingConfig {
            max_processes: Some(1),
        };
        assert_eq!(effective_threads(&config), 1);
    }
}
