//! Scripted input sessions for the trend-line tool.
//!
//! A replay script fixes the plot bounds and base point and lists host
//! events in order. Running it drives a [`Viewer`] exactly the way a plot
//! frontend would and reports the resulting figure.
//!
//! ```json
//! {
//!   "base": [0.0, 0.0],
//!   "bounds": { "x_min": 0.0, "x_max": 10.0, "y_min": 0.0, "y_max": 10.0 },
//!   "events": [
//!     { "type": "activate" },
//!     { "type": "move", "x": 4.0, "y": 2.0 },
//!     { "type": "click", "x": 4.0, "y": 2.0 }
//!   ]
//! }
//! ```

use crate::config::Config;
use crate::draw::{Figure, FigureSnapshot};
use crate::input::line_draw::{self, DrawState, LineDrawTool, LineStyle};
use crate::input::{InputEvent, Viewer, ViewerSettings};
use crate::util::{Bounds, Point};
use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// One scripted host event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScriptEvent {
    /// Pointer move; without `time_ms` the clock advances by one throttle interval
    Move {
        x: f64,
        y: f64,
        #[serde(default)]
        time_ms: Option<u64>,
    },
    Click {
        x: f64,
        y: f64,
    },
    DragStart {
        x: f64,
        y: f64,
    },
    Drag {
        x: f64,
        y: f64,
    },
    DragEnd {
        x: f64,
        y: f64,
    },
    Activate,
    Deactivate,
    Clear,
}

/// A complete replay session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayScript {
    /// Fixed first endpoint of the trend line
    pub base: (f64, f64),
    #[serde(default)]
    pub bounds: Bounds,
    pub events: Vec<ScriptEvent>,
}

impl ReplayScript {
    pub fn load(path: &Path) -> Result<Self> {
        let source = fs::read_to_string(path)
            .with_context(|| format!("Failed to read replay script {}", path.display()))?;
        serde_json::from_str(&source)
            .with_context(|| format!("Failed to parse replay script {}", path.display()))
    }
}

/// Final state after a replay.
#[derive(Debug, Serialize)]
pub struct ReplayOutcome {
    pub line_drawn: bool,
    pub state: &'static str,
    pub figure: FigureSnapshot,
}

/// Runs `script` against a fresh figure using the tool settings from `config`.
pub fn run(script: &ReplayScript, config: &Config) -> Result<ReplayOutcome> {
    let settings = ViewerSettings::from(&config.line_tool);
    let interval = settings.move_throttle_ms;
    let mut viewer = Viewer::new(Figure::new(script.bounds), settings);

    let base = Point::new(script.base.0, script.base.1);
    let tool = LineDrawTool::new(viewer.figure(), base, LineStyle::from(&config.line_tool));
    viewer.add_tool(Box::new(tool))?;

    let mut clock: u64 = 0;
    for (index, event) in script.events.iter().enumerate() {
        debug!("Replaying event {}: {:?}", index, event);
        match *event {
            ScriptEvent::Move { x, y, time_ms } => {
                clock = time_ms.unwrap_or(clock.saturating_add(interval));
                viewer.dispatch(InputEvent::Move {
                    at: Point::new(x, y),
                    time_ms: clock,
                });
            }
            ScriptEvent::Click { x, y } => viewer.dispatch(InputEvent::Click {
                at: Point::new(x, y),
            }),
            ScriptEvent::DragStart { x, y } => viewer.dispatch(InputEvent::DragStart {
                at: Point::new(x, y),
            }),
            ScriptEvent::Drag { x, y } => viewer.dispatch(InputEvent::Drag {
                at: Point::new(x, y),
            }),
            ScriptEvent::DragEnd { x, y } => viewer.dispatch(InputEvent::DragEnd {
                at: Point::new(x, y),
            }),
            ScriptEvent::Activate => viewer.activate_tool(line_draw::TOOL_ID)?,
            ScriptEvent::Deactivate => viewer.deactivate_tool(),
            ScriptEvent::Clear => {
                let (tool, figure) = viewer.tool_and_figure_mut::<LineDrawTool>();
                tool.context("Line tool is not registered")?.clear(figure);
            }
        }
    }

    let tool = viewer
        .tool::<LineDrawTool>()
        .context("Line tool is not registered")?;
    let (line_drawn, state) = (tool.line_drawn(), state_name(tool.state()));
    info!(
        "Replayed {} events, line drawn: {}",
        script.events.len(),
        line_drawn
    );

    Ok(ReplayOutcome {
        line_drawn,
        state,
        figure: viewer.figure().snapshot(),
    })
}

fn state_name(state: DrawState) -> &'static str {
    match state {
        DrawState::Inactive => "inactive",
        DrawState::FollowingCursor { .. } => "following_cursor",
        DrawState::LineFixed { .. } => "line_fixed",
    }
}
