//! In-memory figure holding the marks of one plot.

use super::canvas::{Canvas, Interaction};
use super::mark::{Mark, MarkId};
use crate::util::{Bounds, Point};
use serde::{Deserialize, Serialize};

/// Plot axis selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
}

/// Container for all marks on a plot, plus its view state.
///
/// Marks are kept in draw order (first = bottom layer, last = top layer).
#[derive(Debug, Clone)]
pub struct Figure {
    marks: Vec<(MarkId, Mark)>,
    next_id: u64,
    interaction: Interaction,
    bounds: Bounds,
    x_ticks: u32,
    y_ticks: u32,
}

/// Serializable view of a figure, used for CLI output.
#[derive(Debug, Clone, Serialize)]
pub struct FigureSnapshot {
    pub bounds: Bounds,
    pub interaction: Interaction,
    pub x_ticks: u32,
    pub y_ticks: u32,
    pub marks: Vec<SnapshotMark>,
}

/// One mark with its id, as emitted in a [`FigureSnapshot`].
#[derive(Debug, Clone, Serialize)]
pub struct SnapshotMark {
    pub id: MarkId,
    #[serde(flatten)]
    pub mark: Mark,
}

impl Default for Figure {
    fn default() -> Self {
        Self::new(Bounds::default())
    }
}

impl Figure {
    /// Creates an empty figure with pan/zoom installed.
    pub fn new(bounds: Bounds) -> Self {
        Self {
            marks: Vec::new(),
            next_id: 0,
            interaction: Interaction::PanZoom,
            bounds,
            x_ticks: 5,
            y_ticks: 5,
        }
    }

    pub fn set_bounds(&mut self, bounds: Bounds) {
        self.bounds = bounds;
    }

    /// Iterates marks in draw order.
    pub fn marks(&self) -> impl Iterator<Item = (MarkId, &Mark)> {
        self.marks.iter().map(|(id, mark)| (*id, mark))
    }

    pub fn len(&self) -> usize {
        self.marks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }

    pub fn contains(&self, id: MarkId) -> bool {
        self.marks.iter().any(|(existing, _)| *existing == id)
    }

    pub fn nticks(&self, axis: Axis) -> u32 {
        match axis {
            Axis::X => self.x_ticks,
            Axis::Y => self.y_ticks,
        }
    }

    pub fn set_nticks(&mut self, axis: Axis, ticks: u32) {
        match axis {
            Axis::X => self.x_ticks = ticks,
            Axis::Y => self.y_ticks = ticks,
        }
    }

    /// Finds the topmost draggable point under `at`.
    ///
    /// `tolerance` is a fraction of each axis span, so picking behaves the
    /// same regardless of the data's units.
    pub fn pick_point(&self, at: Point, tolerance: f64) -> Option<MarkId> {
        let tol_x = (self.bounds.width() * tolerance).abs();
        let tol_y = (self.bounds.height() * tolerance).abs();
        self.marks
            .iter()
            .rev()
            .find(|(_, mark)| {
                mark.as_point().is_some_and(|point| {
                    point.enable_move
                        && (point.position.x - at.x).abs() <= tol_x
                        && (point.position.y - at.y).abs() <= tol_y
                })
            })
            .map(|(id, _)| *id)
    }

    pub fn snapshot(&self) -> FigureSnapshot {
        FigureSnapshot {
            bounds: self.bounds,
            interaction: self.interaction,
            x_ticks: self.x_ticks,
            y_ticks: self.y_ticks,
            marks: self
                .marks
                .iter()
                .map(|(id, mark)| SnapshotMark {
                    id: *id,
                    mark: mark.clone(),
                })
                .collect(),
        }
    }
}

impl Canvas for Figure {
    fn add_mark(&mut self, mark: Mark) -> MarkId {
        let id = MarkId(self.next_id);
        self.next_id += 1;
        self.marks.push((id, mark));
        id
    }

    fn remove_mark(&mut self, id: MarkId) -> Option<Mark> {
        let index = self.marks.iter().position(|(existing, _)| *existing == id)?;
        Some(self.marks.remove(index).1)
    }

    fn mark(&self, id: MarkId) -> Option<&Mark> {
        self.marks
            .iter()
            .find(|(existing, _)| *existing == id)
            .map(|(_, mark)| mark)
    }

    fn mark_mut(&mut self, id: MarkId) -> Option<&mut Mark> {
        self.marks
            .iter_mut()
            .find(|(existing, _)| *existing == id)
            .map(|(_, mark)| mark)
    }

    fn interaction(&self) -> Interaction {
        self.interaction
    }

    fn set_interaction(&mut self, interaction: Interaction) {
        self.interaction = interaction;
    }

    fn bounds(&self) -> Bounds {
        self.bounds
    }
}
