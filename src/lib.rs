//! Freehand raster drawing with snapshot undo history and document export.
//!
//! The [`input::DrawingSession`] owns the canvas surface, stroke style, undo
//! history and stroke state machine. Front-ends feed it pointer events; the
//! bundled binary replays TOML scripts through [`script`].

pub mod config;
pub mod draw;
pub mod export;
pub mod history;
pub mod input;
pub mod script;
pub mod session;
pub mod util;

pub use config::Config;
