//! Trend-line drawing tool.
//!
//! The student moves the cursor to aim a line anchored at a fixed base point,
//! clicks to commit it, and can afterwards drag the committed endpoint. An
//! endpoint dropped outside the plot is pulled back inside along the line.

use super::events::{DragPhase, PointerEvent};
use super::tool::ViewerTool;
use crate::config::LineToolConfig;
use crate::draw::{BLACK, Canvas, Color, Cursor, Interaction, Mark, MarkId};
use crate::observe::Observable;
use crate::util::{self, Bounds, DEFAULT_BOUNDARY_INSET, Point};
use log::{debug, info};
use std::any::Any;

#[cfg(test)]
mod tests;

/// Toolbar identifier of the line-draw tool.
pub const TOOL_ID: &str = "cds:linedraw";
/// Toolbar label.
pub const ACTION_TEXT: &str = "Draw line";
/// Tool tip before a line has been committed.
pub const DRAW_TOOL_TIP: &str = "Draw a trend line";
/// Tool tip once a line exists and only its endpoint can be adjusted.
pub const UPDATE_TOOL_TIP: &str = "Update trend line";

/// Appearance and geometry settings for the drawn line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineStyle {
    /// Color of the trend line
    pub line_color: Color,
    /// Color of the draggable endpoint
    pub endpoint_color: Color,
    /// Fraction of the exit distance kept when clamping a dragged endpoint
    pub boundary_inset: f64,
}

impl Default for LineStyle {
    fn default() -> Self {
        Self {
            line_color: BLACK,
            endpoint_color: BLACK,
            boundary_inset: DEFAULT_BOUNDARY_INSET,
        }
    }
}

impl From<&LineToolConfig> for LineStyle {
    fn from(config: &LineToolConfig) -> Self {
        Self {
            line_color: config.line_color.to_color(),
            endpoint_color: config.endpoint_color.to_color(),
            boundary_inset: config.boundary_inset,
        }
    }
}

/// Line drawing state machine.
///
/// The mark ids live inside the variants, so a line without a state to own
/// it, or an endpoint without its line, cannot be represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawState {
    /// No line on the canvas
    Inactive,
    /// Line follows the cursor until the user clicks
    FollowingCursor {
        /// Line from the base point to the cursor
        line: MarkId,
    },
    /// Line committed; its endpoint can be dragged
    LineFixed {
        /// Line from the base point to the endpoint
        line: MarkId,
        /// Draggable endpoint mark
        endpoint: MarkId,
    },
}

/// Draws a single trend line from a fixed base point.
#[derive(Debug)]
pub struct LineDrawTool {
    base: Point,
    style: LineStyle,
    state: DrawState,
    /// Interaction the canvas had before this tool was created
    original_interaction: Interaction,
    /// Whether this tool's listener is installed on the canvas
    listening: bool,
    line_drawn: Observable<bool>,
    tool_tip: &'static str,
}

impl LineDrawTool {
    /// Creates the tool for `canvas`, anchoring lines at `base`.
    ///
    /// The canvas's current interaction is remembered and restored on
    /// [`deactivate`](Self::deactivate).
    pub fn new(canvas: &dyn Canvas, base: Point, style: LineStyle) -> Self {
        Self {
            base,
            style,
            state: DrawState::Inactive,
            original_interaction: canvas.interaction(),
            listening: false,
            line_drawn: Observable::new(false),
            tool_tip: DRAW_TOOL_TIP,
        }
    }

    pub fn base(&self) -> Point {
        self.base
    }

    pub fn state(&self) -> DrawState {
        self.state
    }

    pub fn line(&self) -> Option<MarkId> {
        match self.state {
            DrawState::Inactive => None,
            DrawState::FollowingCursor { line } | DrawState::LineFixed { line, .. } => Some(line),
        }
    }

    pub fn endpoint(&self) -> Option<MarkId> {
        match self.state {
            DrawState::LineFixed { endpoint, .. } => Some(endpoint),
            _ => None,
        }
    }

    /// Whether the tool is currently capturing pointer moves and clicks.
    pub fn is_listening(&self) -> bool {
        self.listening
    }

    /// Whether a line has been committed.
    pub fn line_drawn(&self) -> bool {
        *self.line_drawn.get()
    }

    /// Observable "line committed" flag, for progress tracking.
    pub fn line_drawn_mut(&mut self) -> &mut Observable<bool> {
        &mut self.line_drawn
    }

    /// Arms the tool, unless a line has already been committed.
    pub fn activate(&mut self, canvas: &mut dyn Canvas) {
        if self.endpoint().is_some() {
            canvas.set_interaction(Interaction::None);
            self.listening = false;
            debug!("Line already committed; endpoint drag only");
        } else {
            canvas.set_interaction(Interaction::Tool(TOOL_ID));
            self.listening = true;
            debug!("Line draw tool armed at base {:?}", self.base);
        }
    }

    /// Stops capturing input and restores the canvas's original interaction.
    ///
    /// A line that was never committed is removed. A committed line stays.
    pub fn deactivate(&mut self, canvas: &mut dyn Canvas) {
        canvas.set_interaction(self.original_interaction);
        self.listening = false;

        if let DrawState::FollowingCursor { line } = self.state {
            canvas.remove_mark(line);
            self.state = DrawState::Inactive;
            self.tool_tip = DRAW_TOOL_TIP;
            debug!("Discarded uncommitted line");
        }
    }

    /// Removes the line and endpoint from the canvas, whatever the state.
    pub fn clear(&mut self, canvas: &mut dyn Canvas) {
        match self.state {
            DrawState::Inactive => {}
            DrawState::FollowingCursor { line } => {
                canvas.remove_mark(line);
            }
            DrawState::LineFixed { line, endpoint } => {
                canvas.remove_mark(line);
                canvas.remove_mark(endpoint);
            }
        }
        self.state = DrawState::Inactive;
        self.tool_tip = DRAW_TOOL_TIP;
        self.line_drawn.set(false);
    }

    /// Handles a cursor move while armed.
    pub fn on_pointer_move(&mut self, canvas: &mut dyn Canvas, at: Point) {
        if !self.listening {
            return;
        }
        match self.state {
            DrawState::Inactive => {
                let line = canvas.add_mark(Mark::line(self.base, at, self.style.line_color));
                self.state = DrawState::FollowingCursor { line };
                debug!("Line started, following cursor");
            }
            DrawState::FollowingCursor { line } => self.set_line_end(canvas, line, at),
            DrawState::LineFixed { .. } => {}
        }
    }

    /// Handles a click while armed; commits a line that follows the cursor.
    pub fn on_click(&mut self, canvas: &mut dyn Canvas, at: Point) {
        if !self.listening {
            return;
        }
        let DrawState::FollowingCursor { line } = self.state else {
            return;
        };

        let endpoint = canvas.add_mark(Mark::draggable_point(at, self.style.endpoint_color));
        self.set_line_end(canvas, line, at);
        self.state = DrawState::LineFixed { line, endpoint };

        // Endpoint drags take over from here.
        canvas.set_interaction(Interaction::None);
        self.listening = false;
        self.tool_tip = UPDATE_TOOL_TIP;

        info!("Trend line committed at ({:.3}, {:.3})", at.x, at.y);
        self.line_drawn.set(true);
    }

    pub fn on_endpoint_drag_start(&mut self, canvas: &mut dyn Canvas) {
        if let Some(endpoint) = self.endpoint() {
            set_hover_cursor(canvas, endpoint, Cursor::Grabbing);
        }
    }

    /// The line follows the dragged endpoint; no clamping happens mid-drag.
    pub fn on_endpoint_drag(&mut self, canvas: &mut dyn Canvas, at: Point) {
        if let Some(line) = self.line() {
            self.set_line_end(canvas, line, at);
        }
    }

    /// Pulls an endpoint dropped outside the plot back inside.
    pub fn on_endpoint_drag_end(&mut self, canvas: &mut dyn Canvas) {
        let DrawState::LineFixed { line, endpoint } = self.state else {
            return;
        };
        set_hover_cursor(canvas, endpoint, Cursor::Grab);

        let Some(position) = canvas
            .mark(endpoint)
            .and_then(Mark::as_point)
            .map(|point| point.position)
        else {
            return;
        };

        let adjusted = self.coordinates_in_bounds(position, &canvas.bounds());
        if adjusted != position {
            debug!(
                "Endpoint ({:.3}, {:.3}) outside bounds, moved to ({:.3}, {:.3})",
                position.x, position.y, adjusted.x, adjusted.y
            );
            if let Some(point) = canvas.mark_mut(endpoint).and_then(Mark::as_point_mut) {
                point.position = adjusted;
            }
            self.set_line_end(canvas, line, adjusted);
        }
    }

    /// Returns `point` pulled inside `bounds` along the line from the base point.
    pub fn coordinates_in_bounds(&self, point: Point, bounds: &Bounds) -> Point {
        util::clamp_to_bounds(point, self.base, bounds, self.style.boundary_inset)
    }

    fn set_line_end(&self, canvas: &mut dyn Canvas, line: MarkId, end: Point) {
        if let Some(mark) = canvas.mark_mut(line).and_then(Mark::as_line_mut) {
            mark.start = self.base;
            mark.end = end;
        }
    }
}

fn set_hover_cursor(canvas: &mut dyn Canvas, endpoint: MarkId, cursor: Cursor) {
    if let Some(point) = canvas.mark_mut(endpoint).and_then(Mark::as_point_mut) {
        point.hovered_cursor = cursor;
    }
}

impl ViewerTool for LineDrawTool {
    fn tool_id(&self) -> &'static str {
        TOOL_ID
    }

    fn action_text(&self) -> &'static str {
        ACTION_TEXT
    }

    fn tool_tip(&self) -> &'static str {
        self.tool_tip
    }

    fn activate(&mut self, canvas: &mut dyn Canvas) {
        LineDrawTool::activate(self, canvas);
    }

    fn deactivate(&mut self, canvas: &mut dyn Canvas) {
        LineDrawTool::deactivate(self, canvas);
    }

    fn on_pointer(&mut self, canvas: &mut dyn Canvas, event: PointerEvent) {
        match event {
            PointerEvent::Move { at } => self.on_pointer_move(canvas, at),
            PointerEvent::Click { at } => self.on_click(canvas, at),
        }
    }

    fn on_mark_drag(
        &mut self,
        canvas: &mut dyn Canvas,
        mark: MarkId,
        phase: DragPhase,
        at: Point,
    ) -> bool {
        if self.endpoint() != Some(mark) {
            return false;
        }
        match phase {
            DragPhase::Start => self.on_endpoint_drag_start(canvas),
            DragPhase::Drag => self.on_endpoint_drag(canvas, at),
            DragPhase::End => self.on_endpoint_drag_end(canvas),
        }
        true
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
