//! Viewer tool contract.

use super::events::{DragPhase, PointerEvent};
use crate::draw::{Canvas, MarkId};
use crate::util::Point;
use std::any::Any;

/// A checkable toolbar tool attached to a viewer.
///
/// While active, a tool may install its own [`Interaction`](crate::draw::Interaction)
/// on the canvas; the viewer then routes pointer events to it. Drags on marks
/// are offered to every tool, and each tool ignores marks it doesn't own.
pub trait ViewerTool: Any {
    /// Unique identifier, e.g. `cds:linedraw`
    fn tool_id(&self) -> &'static str;

    /// Short label shown in the toolbar
    fn action_text(&self) -> &'static str;

    /// Hover text; may change as the tool's state changes
    fn tool_tip(&self) -> &'static str;

    fn activate(&mut self, canvas: &mut dyn Canvas);

    fn deactivate(&mut self, canvas: &mut dyn Canvas);

    /// Handles a pointer event while this tool's interaction is installed.
    fn on_pointer(&mut self, canvas: &mut dyn Canvas, event: PointerEvent);

    /// Handles a drag on `mark`. Returns whether the tool owns the mark.
    fn on_mark_drag(
        &mut self,
        _canvas: &mut dyn Canvas,
        _mark: MarkId,
        _phase: DragPhase,
        _at: Point,
    ) -> bool {
        false
    }

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}
