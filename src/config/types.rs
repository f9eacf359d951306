//! Configuration type definitions.

use super::enums::ColorSpec;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Trend-line tool settings.
///
/// Controls how the line and its endpoint look and how the host delivers
/// pointer input to the tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct LineToolConfig {
    /// Color of the trend line - a named color or an RGB array like `[0, 0, 0]`
    #[serde(default = "default_line_color")]
    pub line_color: ColorSpec,

    /// Color of the draggable endpoint
    #[serde(default = "default_line_color")]
    pub endpoint_color: ColorSpec,

    /// Fraction of the distance to the crossed edge kept when an endpoint
    /// dropped outside the plot is pulled back in (valid range: 0.5 - 1.0)
    #[serde(default = "default_boundary_inset")]
    pub boundary_inset: f64,

    /// Minimum spacing between pointer moves delivered to the tool, in
    /// milliseconds (valid range: 0 - 1000, 0 disables throttling)
    #[serde(default = "default_move_throttle_ms")]
    pub move_throttle_ms: u64,

    /// Radius for grabbing a draggable point, as a fraction of each axis span
    /// (valid range: 0.001 - 0.25)
    #[serde(default = "default_pick_tolerance")]
    pub pick_tolerance: f64,
}

impl Default for LineToolConfig {
    fn default() -> Self {
        Self {
            line_color: default_line_color(),
            endpoint_color: default_line_color(),
            boundary_inset: default_boundary_inset(),
            move_throttle_ms: default_move_throttle_ms(),
            pick_tolerance: default_pick_tolerance(),
        }
    }
}

/// Story progress settings.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct StoryConfig {
    /// Quiet period before a burst of story changes is written out, in
    /// seconds (valid range: 0.0 - 60.0)
    #[serde(default = "default_write_debounce_secs")]
    pub write_debounce_secs: f64,

    /// Story keys that are never exported or imported
    #[serde(default)]
    pub nonserialized: Vec<String>,
}

impl Default for StoryConfig {
    fn default() -> Self {
        Self {
            write_debounce_secs: default_write_debounce_secs(),
            nonserialized: Vec::new(),
        }
    }
}

// =============================================================================
// Default value functions
// =============================================================================

fn default_line_color() -> ColorSpec {
    ColorSpec::Name("black".to_string())
}

fn default_boundary_inset() -> f64 {
    crate::util::DEFAULT_BOUNDARY_INSET
}

fn default_move_throttle_ms() -> u64 {
    70
}

fn default_pick_tolerance() -> f64 {
    0.02
}

fn default_write_debounce_secs() -> f64 {
    2.0
}
