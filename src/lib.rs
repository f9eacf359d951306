//! Interactive lesson building blocks.
//!
//! Exposes the trend-line drawing tool, the plot viewer that hosts it and the
//! story model that tracks a student's progress, together with the shared
//! configuration so that binaries and tests use the same validation logic.

pub mod config;
pub mod draw;
pub mod input;
pub mod observe;
pub mod replay;
pub mod story;
pub mod util;

pub use config::Config;
