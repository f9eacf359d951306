//! Canvas contract shared by plot hosts and interaction tools.

use super::mark::{Mark, MarkId};
use crate::util::Bounds;
use serde::Serialize;

/// Pointer interaction handler installed on a canvas.
///
/// Exactly one handler receives pointer moves and clicks at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Interaction {
    /// No canvas-wide handler; only per-mark drags are delivered
    None,
    /// Built-in pan/zoom behaviour of the plot
    #[default]
    PanZoom,
    /// Listener owned by the viewer tool with this id
    Tool(&'static str),
}

/// A 2D plotting surface that tools draw on.
///
/// Implementations own the marks; tools refer to them by [`MarkId`].
pub trait Canvas {
    /// Adds a mark on top of existing marks and returns its id.
    fn add_mark(&mut self, mark: Mark) -> MarkId;

    /// Removes a mark, returning it if it was present.
    fn remove_mark(&mut self, id: MarkId) -> Option<Mark>;

    fn mark(&self, id: MarkId) -> Option<&Mark>;

    fn mark_mut(&mut self, id: MarkId) -> Option<&mut Mark>;

    /// Currently installed pointer interaction.
    fn interaction(&self) -> Interaction;

    /// Installs a pointer interaction, replacing the current one.
    fn set_interaction(&mut self, interaction: Interaction);

    /// Visible axis bounds in data space.
    fn bounds(&self) -> Bounds;
}
