//! Configuration file support for inkpad.
//!
//! This module handles loading and validating user settings from the configuration file
//! located at `~/.config/inkpad/config.toml`. Settings include stroke defaults, canvas
//! size and resize policy, history depth, export location, and persistence.
//!
//! If no config file exists, sensible defaults are used automatically.

pub mod enums;
pub mod types;

// Re-export commonly used types at module level
pub use enums::{ColorSpec, ResizePolicy, SessionCompression, SessionStorageMode};
pub use types::{CanvasConfig, DrawingConfig, ExportConfig, HistoryConfig, SessionConfig};

use anyhow::{Context, Result};
use log::{debug, info};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure containing all user settings.
///
/// This is the root configuration type that gets deserialized from the TOML file.
/// All fields have sensible defaults and will use those if not specified in the config file.
///
/// # Example TOML
/// ```toml
/// [drawing]
/// default_color = "#000000"
/// default_width = 1
/// max_width = 15
///
/// [canvas]
/// width = 800
/// height = 600
/// resize_policy = "restore"
///
/// [history]
/// max_depth = 100
///
/// [session]
/// persist = true
/// compress = "auto"
/// ```
#[derive(Debug, Serialize, Deserialize, Default, JsonSchema)]
pub struct Config {
    /// Stroke defaults (color, width, width bounds)
    #[serde(default)]
    pub drawing: DrawingConfig,

    /// Canvas size and resize behaviour
    #[serde(default)]
    pub canvas: CanvasConfig,

    /// Undo/redo history limits
    #[serde(default)]
    pub history: HistoryConfig,

    /// Document export settings
    #[serde(default)]
    pub export: ExportConfig,

    /// Persistence across restarts
    #[serde(default)]
    pub session: SessionConfig,
}

impl Config {
    /// Validates and clamps all configuration values to acceptable ranges.
    ///
    /// Invalid values are clamped to the nearest valid value and a warning is logged.
    ///
    /// Validated ranges:
    /// - `min_width`: at least 1
    /// - `max_width`: at least `min_width`
    /// - `default_width`: `min_width` - `max_width`
    /// - `canvas.width`, `canvas.height`: at least 1
    /// - `auto_compress_threshold_kb`, `max_file_size_mb`: at least 1
    pub fn validate_and_clamp(&mut self) {
        if self.drawing.min_width < 1 {
            log::warn!("Invalid min_width 0, clamping to 1");
            self.drawing.min_width = 1;
        }

        if self.drawing.max_width < self.drawing.min_width {
            log::warn!(
                "max_width {} is below min_width {}, raising it",
                self.drawing.max_width,
                self.drawing.min_width
            );
            self.drawing.max_width = self.drawing.min_width;
        }

        let (min, max) = (self.drawing.min_width, self.drawing.max_width);
        if !(min..=max).contains(&self.drawing.default_width) {
            log::warn!(
                "Invalid default_width {}, clamping to {}-{} range",
                self.drawing.default_width,
                min,
                max
            );
            self.drawing.default_width = self.drawing.default_width.clamp(min, max);
        }

        if self.canvas.width < 1 || self.canvas.height < 1 {
            log::warn!(
                "Invalid canvas size {}x{}, clamping each side to at least 1",
                self.canvas.width,
                self.canvas.height
            );
            self.canvas.width = self.canvas.width.max(1);
            self.canvas.height = self.canvas.height.max(1);
        }

        if self.session.auto_compress_threshold_kb == 0 {
            log::warn!("Invalid auto_compress_threshold_kb 0, using 1");
            self.session.auto_compress_threshold_kb = 1;
        }

        if self.session.max_file_size_mb == 0 {
            log::warn!("Invalid max_file_size_mb 0, using 1");
            self.session.max_file_size_mb = 1;
        }
    }

    /// Returns the directory holding the configuration file (`~/.config/inkpad`).
    ///
    /// # Errors
    /// Returns an error if the config directory cannot be determined (e.g., HOME not set).
    pub fn config_dir() -> Result<PathBuf> {
        Ok(dirs::config_dir()
            .context("Could not find config directory")?
            .join("inkpad"))
    }

    /// Returns the path to the configuration file.
    pub fn get_config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Loads configuration from the default location, or returns defaults if not found.
    ///
    /// # Errors
    /// Returns an error if:
    /// - The config directory path cannot be determined
    /// - The file exists but cannot be read
    /// - The file exists but contains invalid TOML syntax
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;
        Self::load_from(&config_path)
    }

    /// Loads configuration from an explicit path; a missing file yields defaults.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            info!("Config file not found, using defaults");
            debug!("Expected config at: {}", config_path.display());
            return Ok(Self::default());
        }

        let config_str = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config from {}", config_path.display()))?;

        let mut config = Self::from_toml(&config_str)
            .with_context(|| format!("Failed to parse config from {}", config_path.display()))?;

        config.validate_and_clamp();

        info!("Loaded config from {}", config_path.display());
        debug!("Config: {:?}", config);

        Ok(config)
    }

    /// Parses configuration from a TOML string without validation.
    pub fn from_toml(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    /// JSON schema describing the configuration file.
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = Config::default();
        assert_eq!(config.drawing.default_width, 1);
        assert_eq!(config.drawing.max_width, 15);
        assert_eq!(config.drawing.default_color.to_color().to_hex(), "#000000");
        assert_eq!(config.canvas.resize_policy, ResizePolicy::Restore);
        assert_eq!(config.history.max_depth, 100);
        assert!(config.session.persist);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = Config::from_toml(
            r#"
            [canvas]
            width = 300
            resize_policy = "clear"
            "#,
        )
        .unwrap();
        assert_eq!(config.canvas.width, 300);
        assert_eq!(config.canvas.height, 600);
        assert_eq!(config.canvas.resize_policy, ResizePolicy::Clear);
        assert_eq!(config.drawing.min_width, 1);
    }

    #[test]
    fn validate_clamps_out_of_range_values() {
        let mut config = Config::from_toml(
            r#"
            [drawing]
            default_width = 40
            min_width = 0
            max_width = 12

            [canvas]
            width = -5
            height = 0
            "#,
        )
        .unwrap();
        config.validate_and_clamp();

        assert_eq!(config.drawing.min_width, 1);
        assert_eq!(config.drawing.default_width, 12);
        assert_eq!((config.canvas.width, config.canvas.height), (1, 1));
    }

    #[test]
    fn inverted_width_bounds_are_repaired() {
        let mut config = Config::default();
        config.drawing.min_width = 8;
        config.drawing.max_width = 4;
        config.validate_and_clamp();
        assert_eq!(config.drawing.max_width, 8);
        assert_eq!(config.drawing.default_width, 8);
    }

    #[test]
    fn load_from_missing_file_returns_defaults() {
        let temp = tempfile::tempdir().unwrap();
        let config = Config::load_from(&temp.path().join("config.toml")).unwrap();
        assert_eq!(config.canvas.width, 800);
    }

    #[test]
    fn load_from_reports_syntax_errors() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "[canvas\nwidth = ").unwrap();
        let err = Config::load_from(&path).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to parse config"));
    }

    #[test]
    fn schema_mentions_every_section() {
        let schema = serde_json::to_string(&Config::json_schema()).unwrap();
        for section in ["drawing", "canvas", "history", "export", "session"] {
            assert!(schema.contains(section), "schema missing {section}");
        }
    }
}
