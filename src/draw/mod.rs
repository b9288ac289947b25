//! Raster primitives for the drawing surface (Cairo-based).
//!
//! This module defines the pixel-level types the rest of the crate builds on:
//! - [`Color`]: RGBA color representation with hex conversion and constants
//! - [`Raster`]: an owned, immutable copy of the canvas pixels
//! - [`CanvasSurface`]: the live ARGB32 buffer strokes are painted into
//! - Rendering functions for Cairo-based output

pub mod color;
pub mod raster;
pub mod render;
pub mod surface;

// Re-export commonly used types at module level
pub use color::Color;
pub use raster::Raster;
pub use render::{render_blank, render_image_at_origin, render_segment};
pub use surface::{CanvasSurface, MIN_DIMENSION, SurfaceError, clamp_dimensions};

#[allow(unused_imports)]
pub use color::{BLACK, BLUE, GREEN, ORANGE, PINK, RED, WHITE, YELLOW};
