//! Utility functions for colors and data-space geometry.
//!
//! This module provides:
//! - Name-to-color mapping for the configuration file (constants live in draw::color)
//! - Data-space points and axis bounds
//! - The boundary clamp used when a trend-line endpoint is dragged off the plot

use crate::draw::{Color, color::*};
use serde::{Deserialize, Serialize};

// ============================================================================
// Color Mapping
// ============================================================================

/// Maps color name strings to Color values.
///
/// Used by the configuration system to parse color names from the config file.
///
/// # Supported Names (case-insensitive)
/// - "red", "green", "blue", "orange", "white", "black"
///
/// # Returns
/// - `Some(Color)` if the name matches a predefined color
/// - `None` if the name is not recognized
pub fn name_to_color(name: &str) -> Option<Color> {
    match name.to_lowercase().as_str() {
        "red" => Some(RED),
        "green" => Some(GREEN),
        "blue" => Some(BLUE),
        "orange" => Some(ORANGE),
        "white" => Some(WHITE),
        "black" => Some(BLACK),
        _ => None,
    }
}

// ============================================================================
// Geometry Utilities
// ============================================================================

/// A point in data space (the plotted data's own coordinates, not pixels).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Visible axis bounds of a plot, in data space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            x_min: 0.0,
            x_max: 1.0,
            y_min: 0.0,
            y_max: 1.0,
        }
    }
}

impl Bounds {
    /// Creates bounds, swapping each pair if given out of order.
    pub fn new(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Self {
        Self {
            x_min: x_min.min(x_max),
            x_max: x_min.max(x_max),
            y_min: y_min.min(y_max),
            y_max: y_min.max(y_max),
        }
    }

    /// Inclusive containment test.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x_min
            && point.x <= self.x_max
            && point.y >= self.y_min
            && point.y <= self.y_max
    }

    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }
}

/// Default fraction of the exit parameter kept when pulling a point back inside.
pub const DEFAULT_BOUNDARY_INSET: f64 = 0.98;

/// Brings a point that lies outside `bounds` back onto the segment from `base`.
///
/// The point is moved along the ray from `base` through `point` to just inside
/// the first edge the segment crosses. The exit parameter is scaled by `inset`
/// so the result never sits exactly on the edge.
///
/// Special cases:
/// - points already inside `bounds` are returned unchanged
/// - vertical segments (`point.x == base.x`) snap y onto the overshot edge
/// - horizontal segments (`point.y == base.y`) snap x onto the overshot edge
/// - when no edge is crossed within the segment, the result collapses to `base`
///
/// Scaling is relative to `base`: the result is `base + (point - base) * t`.
pub fn clamp_to_bounds(point: Point, base: Point, bounds: &Bounds, inset: f64) -> Point {
    if bounds.contains(point) {
        return point;
    }

    if point.x == base.x {
        let y = if point.y < bounds.y_min {
            bounds.y_min
        } else {
            bounds.y_max
        };
        return Point::new(point.x, y);
    }

    if point.y == base.y {
        let x = if point.x < bounds.x_min {
            bounds.x_min
        } else {
            bounds.x_max
        };
        return Point::new(x, point.y);
    }

    let dx = point.x - base.x;
    let dy = point.y - base.y;

    // Ray parameter where each edge line is crossed: x_max, y_max, x_min, y_min.
    let candidates = [
        (bounds.x_max - base.x) / dx,
        (bounds.y_max - base.y) / dy,
        (bounds.x_min - base.x) / dx,
        (bounds.y_min - base.y) / dy,
    ];

    let t = candidates
        .into_iter()
        .filter(|t| *t > 0.0 && *t < 1.0)
        .fold(None, |acc: Option<f64>, t| Some(acc.map_or(t, |m| m.min(t))))
        .unwrap_or(0.0)
        * inset;

    Point::new(base.x + dx * t, base.y + dy * t)
}
