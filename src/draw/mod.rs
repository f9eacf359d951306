//! Plot marks and the canvas they are drawn on.
//!
//! This module defines the core drawing types used for lesson annotations:
//! - [`Color`]: RGBA color representation with predefined color constants
//! - [`Mark`]: Drawable primitives (lines, draggable points)
//! - [`Canvas`]: The contract tools use to place and edit marks
//! - [`Figure`]: In-memory canvas holding marks, bounds and the active interaction

pub mod canvas;
pub mod color;
pub mod figure;
pub mod mark;

// Re-export commonly used types at module level
pub use canvas::{Canvas, Interaction};
pub use color::Color;
pub use figure::{Axis, Figure, FigureSnapshot};
pub use mark::{Cursor, LineMark, Mark, MarkId, PointMark};

pub use color::{BLACK, BLUE, GREEN, ORANGE, RED, WHITE};
