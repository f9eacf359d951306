//! Configuration file support for lessonkit.
//!
//! This module handles loading and validating user settings from the configuration file
//! located at `~/.config/lessonkit/config.toml`. Settings cover the trend-line tool
//! (colors, boundary inset, input throttling) and story persistence.
//!
//! If no config file exists, sensible defaults are used automatically.

pub mod enums;
pub mod types;

// Re-export commonly used types at module level
pub use enums::ColorSpec;
pub use types::{LineToolConfig, StoryConfig};

use anyhow::{Context, Result};
use log::{debug, info};
use schemars::{JsonSchema, Schema};
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
/// [line_tool]
/// line_color = "black"
/// endpoint_color = [40, 40, 200]
/// boundary_inset = 0.98
/// move_throttle_ms = 70
///
/// [story]
/// write_debounce_secs = 2.0
/// nonserialized = ["inputs"]
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, JsonSchema)]
pub struct Config {
    /// Trend-line tool settings
    #[serde(default)]
    pub line_tool: LineToolConfig,

    /// Story progress and persistence settings
    #[serde(default)]
    pub story: StoryConfig,
}

impl Config {
    /// Validates and clamps all configuration values to acceptable ranges.
    ///
    /// Invalid values are clamped to the nearest valid value and a warning is logged.
    ///
    /// Validated ranges:
    /// - `line_tool.boundary_inset`: 0.5 - 1.0
    /// - `line_tool.move_throttle_ms`: 0 - 1000
    /// - `line_tool.pick_tolerance`: 0.001 - 0.25
    /// - `story.write_debounce_secs`: 0.0 - 60.0
    fn validate_and_clamp(&mut self) {
        // Boundary inset: 0.5 - 1.0
        if !(0.5..=1.0).contains(&self.line_tool.boundary_inset) {
            log::warn!(
                "Invalid boundary_inset {:.3}, clamping to 0.5-1.0 range",
                self.line_tool.boundary_inset
            );
            self.line_tool.boundary_inset = if self.line_tool.boundary_inset.is_nan() {
                crate::util::DEFAULT_BOUNDARY_INSET
            } else {
                self.line_tool.boundary_inset.clamp(0.5, 1.0)
            };
        }

        // Move throttle: 0 - 1000 ms
        if self.line_tool.move_throttle_ms > 1000 {
            log::warn!(
                "Invalid move_throttle_ms {}, clamping to 0-1000 range",
                self.line_tool.move_throttle_ms
            );
            self.line_tool.move_throttle_ms = 1000;
        }

        // Pick tolerance: 0.001 - 0.25
        if !(0.001..=0.25).contains(&self.line_tool.pick_tolerance) {
            log::warn!(
                "Invalid pick_tolerance {:.4}, clamping to 0.001-0.25 range",
                self.line_tool.pick_tolerance
            );
            self.line_tool.pick_tolerance = if self.line_tool.pick_tolerance.is_nan() {
                0.02
            } else {
                self.line_tool.pick_tolerance.clamp(0.001, 0.25)
            };
        }

        // Write debounce: 0 - 60 s
        if !(0.0..=60.0).contains(&self.story.write_debounce_secs) {
            log::warn!(
                "Invalid write_debounce_secs {:.1}, clamping to 0.0-60.0 range",
                self.story.write_debounce_secs
            );
            self.story.write_debounce_secs = if self.story.write_debounce_secs.is_nan() {
                2.0
            } else {
                self.story.write_debounce_secs.clamp(0.0, 60.0)
            };
        }

        // Unknown colors fall back to black at conversion time; warn early.
        for (field, spec) in [
            ("line_color", &self.line_tool.line_color),
            ("endpoint_color", &self.line_tool.endpoint_color),
        ] {
            if let ColorSpec::Name(name) = spec {
                if crate::util::name_to_color(name).is_none() {
                    log::warn!("Unknown {field} '{name}', black will be used");
                }
            }
        }
    }

    /// Returns the path to the configuration file.
    ///
    /// The config file is located at `~/.config/lessonkit/config.toml`.
    ///
    /// # Errors
    /// Returns an error if the config directory cannot be determined (e.g., HOME not set).
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not find config directory")?
            .join("lessonkit");

        Ok(config_dir.join("config.toml"))
    }

    /// Loads configuration from the default path, or returns defaults if not found.
    ///
    /// # Errors
    /// Returns an error if:
    /// - The config directory path cannot be determined
    /// - The file exists but cannot be read
    /// - The file exists but contains invalid TOML syntax
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;

        if !config_path.exists() {
            info!("Config file not found, using defaults");
            debug!("Expected config at: {}", config_path.display());
            return Ok(Self::default());
        }

        Self::load_from(&config_path)
    }

    /// Loads configuration from an explicit path.
    ///
    /// Unlike [`load`](Self::load), a missing file is an error here.
    pub fn load_from(path: &Path) -> Result<Self> {
        let config_str = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        let config = Self::from_toml(&config_str)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;

        info!("Loaded config from {}", path.display());
        debug!("Config: {:?}", config);

        Ok(config)
    }

    /// Parses and validates configuration from a TOML string.
    pub fn from_toml(source: &str) -> Result<Self> {
        let mut config: Config = toml::from_str(source)?;
        config.validate_and_clamp();
        Ok(config)
    }

    /// Serializes the configuration as pretty TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }

    /// Saves the current configuration to the default path.
    ///
    /// Creates the parent directory if it doesn't exist.
    ///
    /// # Errors
    /// Returns an error if:
    /// - The config directory cannot be created
    /// - The config cannot be serialized to TOML
    /// - The file cannot be written
    pub fn save(&self) -> Result<()> {
        let config_path = Self::get_config_path()?;

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        fs::write(&config_path, self.to_toml()?)
            .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

        info!("Saved config to {}", config_path.display());
        Ok(())
    }

    /// JSON schema describing the configuration file.
    pub fn json_schema() -> Schema {
        schemars::schema_for!(Config)
    }
}
