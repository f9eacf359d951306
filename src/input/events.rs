//! Generic input event types delivered by a plot host.

use crate::util::Point;

/// Pointer event routed to the tool that owns the canvas interaction.
///
/// Coordinates are already converted to data space by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    /// Cursor moved over the plot
    Move { at: Point },
    /// Primary button clicked
    Click { at: Point },
}

/// Lifecycle phase of a drag on a single mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragPhase {
    Start,
    Drag,
    End,
}

/// Raw event as received by a [`Viewer`](super::Viewer).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Cursor moved; `time_ms` feeds the move throttle
    Move { at: Point, time_ms: u64 },
    Click { at: Point },
    /// Button pressed on a mark
    DragStart { at: Point },
    /// Button held while moving
    Drag { at: Point },
    /// Button released
    DragEnd { at: Point },
}
