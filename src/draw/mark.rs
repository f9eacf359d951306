//! Mark definitions for plot annotations.

use super::color::Color;
use crate::util::Point;
use serde::{Deserialize, Serialize};

/// Stable identity of a mark placed on a canvas.
///
/// Ids are handed out by the canvas and never reused within one canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MarkId(pub u64);

/// Pointer cursor shown while hovering a mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Cursor {
    #[default]
    Default,
    Grab,
    Grabbing,
}

/// Straight line between two data-space points.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LineMark {
    /// Fixed end of the line
    pub start: Point,
    /// Free end of the line
    pub end: Point,
    /// Line color
    pub color: Color,
}

/// Single data-space point, optionally draggable by the user.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PointMark {
    /// Current position; the canvas moves it while the point is dragged
    pub position: Point,
    /// Fill color
    pub color: Color,
    /// Whether the point can be dragged
    pub enable_move: bool,
    /// Cursor shown while hovering the point
    pub hovered_cursor: Cursor,
}

/// Represents a drawable mark on a plot.
///
/// Marks are pure data; how they are rendered is up to the host canvas.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Mark {
    Line(LineMark),
    Point(PointMark),
}

impl Mark {
    /// Creates a line mark.
    pub fn line(start: Point, end: Point, color: Color) -> Self {
        Mark::Line(LineMark { start, end, color })
    }

    /// Creates a draggable point mark with a grab cursor.
    pub fn draggable_point(position: Point, color: Color) -> Self {
        Mark::Point(PointMark {
            position,
            color,
            enable_move: true,
            hovered_cursor: Cursor::Grab,
        })
    }

    pub fn as_line(&self) -> Option<&LineMark> {
        match self {
            Mark::Line(line) => Some(line),
            _ => None,
        }
    }

    pub fn as_line_mut(&mut self) -> Option<&mut LineMark> {
        match self {
            Mark::Line(line) => Some(line),
            _ => None,
        }
    }

    pub fn as_point(&self) -> Option<&PointMark> {
        match self {
            Mark::Point(point) => Some(point),
            _ => None,
        }
    }

    pub fn as_point_mut(&mut self) -> Option<&mut PointMark> {
        match self {
            Mark::Point(point) => Some(point),
            _ => None,
        }
    }
}
