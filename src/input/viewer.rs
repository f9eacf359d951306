//! Plot viewer with a toolbar of interaction tools.

use super::events::{DragPhase, InputEvent, PointerEvent};
use super::throttle::MoveThrottle;
use super::tool::ViewerTool;
use crate::config::LineToolConfig;
use crate::draw::{Canvas, Figure, Interaction, Mark, MarkId};
use crate::util::Point;
use log::{debug, trace};
use thiserror::Error;

/// Errors raised while managing a viewer's toolbar.
#[derive(Debug, Error)]
pub enum ViewerError {
    #[error("no tool with id '{0}' is registered")]
    UnknownTool(String),

    #[error("a tool with id '{0}' is already registered")]
    DuplicateTool(String),
}

/// Host-side input settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewerSettings {
    /// Minimum spacing between delivered pointer moves (0 = no throttling)
    pub move_throttle_ms: u64,
    /// Pick radius for draggable points, as a fraction of each axis span
    pub pick_tolerance: f64,
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self::from(&LineToolConfig::default())
    }
}

impl From<&LineToolConfig> for ViewerSettings {
    fn from(config: &LineToolConfig) -> Self {
        Self {
            move_throttle_ms: config.move_throttle_ms,
            pick_tolerance: config.pick_tolerance,
        }
    }
}

/// A figure plus the tools that act on it.
///
/// The viewer turns raw host events into tool callbacks. Pointer moves and
/// clicks go to the tool whose interaction is installed on the figure. Drags
/// move the draggable point under the cursor and are offered to every tool.
pub struct Viewer {
    figure: Figure,
    tools: Vec<Box<dyn ViewerTool>>,
    active_tool: Option<usize>,
    throttle: MoveThrottle,
    pick_tolerance: f64,
    /// Point currently held by the pointer
    dragging: Option<MarkId>,
}

impl Viewer {
    pub fn new(figure: Figure, settings: ViewerSettings) -> Self {
        Self {
            figure,
            tools: Vec::new(),
            active_tool: None,
            throttle: MoveThrottle::new(settings.move_throttle_ms),
            pick_tolerance: settings.pick_tolerance,
            dragging: None,
        }
    }

    pub fn figure(&self) -> &Figure {
        &self.figure
    }

    pub fn figure_mut(&mut self) -> &mut Figure {
        &mut self.figure
    }

    /// Adds a tool to the toolbar.
    pub fn add_tool(&mut self, tool: Box<dyn ViewerTool>) -> Result<(), ViewerError> {
        let id = tool.tool_id();
        if self.tools.iter().any(|existing| existing.tool_id() == id) {
            return Err(ViewerError::DuplicateTool(id.to_string()));
        }
        debug!("Registered tool '{}' ({})", id, tool.action_text());
        self.tools.push(tool);
        Ok(())
    }

    pub fn tool_ids(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.tools.iter().map(|tool| tool.tool_id())
    }

    pub fn active_tool_id(&self) -> Option<&'static str> {
        self.active_tool.map(|index| self.tools[index].tool_id())
    }

    /// Borrows a registered tool by concrete type.
    pub fn tool<T: ViewerTool>(&self) -> Option<&T> {
        self.tools
            .iter()
            .find_map(|tool| tool.as_any().downcast_ref::<T>())
    }

    pub fn tool_mut<T: ViewerTool>(&mut self) -> Option<&mut T> {
        self.tools
            .iter_mut()
            .find_map(|tool| tool.as_any_mut().downcast_mut::<T>())
    }

    /// Borrows a tool and the figure at the same time, for calling tool
    /// operations that act on the canvas.
    pub fn tool_and_figure_mut<T: ViewerTool>(&mut self) -> (Option<&mut T>, &mut Figure) {
        let tool = self
            .tools
            .iter_mut()
            .find_map(|tool| tool.as_any_mut().downcast_mut::<T>());
        (tool, &mut self.figure)
    }

    /// Makes `id` the active tool, deactivating the previous one first.
    ///
    /// Selecting the tool that is already active activates it again, so a
    /// tool that stopped listening after finishing its work is re-armed.
    pub fn activate_tool(&mut self, id: &str) -> Result<(), ViewerError> {
        let index = self
            .tools
            .iter()
            .position(|tool| tool.tool_id() == id)
            .ok_or_else(|| ViewerError::UnknownTool(id.to_string()))?;

        if self.active_tool != Some(index) {
            self.deactivate_tool();
        }

        self.tools[index].activate(&mut self.figure);
        self.active_tool = Some(index);
        self.throttle.reset();
        debug!("Activated tool '{id}'");
        Ok(())
    }

    /// Deactivates the active tool, if any, leaving no tool selected.
    pub fn deactivate_tool(&mut self) {
        if let Some(index) = self.active_tool.take() {
            self.tools[index].deactivate(&mut self.figure);
            debug!("Deactivated tool '{}'", self.tools[index].tool_id());
        }
    }

    /// Processes one host event synchronously.
    pub fn dispatch(&mut self, event: InputEvent) {
        match event {
            InputEvent::Move { at, time_ms } => {
                if !self.throttle.accept(time_ms) {
                    trace!("Throttled pointer move at {time_ms} ms");
                    return;
                }
                self.route_pointer(PointerEvent::Move { at });
            }
            InputEvent::Click { at } => self.route_pointer(PointerEvent::Click { at }),
            InputEvent::DragStart { at } => {
                self.dragging = self.figure.pick_point(at, self.pick_tolerance);
                if let Some(mark) = self.dragging {
                    self.offer_drag(mark, DragPhase::Start, at);
                }
            }
            InputEvent::Drag { at } => {
                if let Some(mark) = self.dragging {
                    self.move_point(mark, at);
                    self.offer_drag(mark, DragPhase::Drag, at);
                }
            }
            InputEvent::DragEnd { at } => {
                if let Some(mark) = self.dragging.take() {
                    self.move_point(mark, at);
                    self.offer_drag(mark, DragPhase::End, at);
                }
            }
        }
    }

    fn route_pointer(&mut self, event: PointerEvent) {
        let Interaction::Tool(id) = self.figure.interaction() else {
            return;
        };
        if let Some(tool) = self.tools.iter_mut().find(|tool| tool.tool_id() == id) {
            tool.on_pointer(&mut self.figure, event);
        }
    }

    fn move_point(&mut self, mark: MarkId, at: Point) {
        if let Some(point) = self.figure.mark_mut(mark).and_then(Mark::as_point_mut) {
            point.position = at;
        }
    }

    fn offer_drag(&mut self, mark: MarkId, phase: DragPhase, at: Point) {
        for tool in &mut self.tools {
            if tool.on_mark_drag(&mut self.figure, mark, phase, at) {
                break;
            }
        }
    }
}
