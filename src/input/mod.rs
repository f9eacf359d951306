//! Input handling and tool state machines.
//!
//! This module translates host pointer events into tool actions. The
//! [`Viewer`] owns a figure and a toolbar and routes each event to the tool
//! whose interaction is installed, and [`LineDrawTool`] implements the
//! trend-line draw/adjust state machine.

pub mod events;
pub mod line_draw;
pub mod throttle;
pub mod tool;
pub mod viewer;

// Re-export commonly used types at module level
pub use events::{DragPhase, InputEvent, PointerEvent};
pub use line_draw::{DrawState, LineDrawTool, LineStyle};
pub use throttle::MoveThrottle;
pub use tool::ViewerTool;
pub use viewer::{Viewer, ViewerError, ViewerSettings};
