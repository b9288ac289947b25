//! Utility functions for coordinates, colors, and paths.
//!
//! This module provides:
//! - The pointer coordinate mapper (viewport space to canvas space)
//! - Color name parsing for the configuration file
//! - Small path helpers shared by the store and export modules

use crate::draw::{Color, color::*};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ============================================================================
// Coordinate Mapping
// ============================================================================

/// A 2D position in either viewport or canvas-local coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Converts a pointer position in viewport space to canvas-local coordinates.
///
/// `origin` is the canvas's top-left corner in the same viewport space. Layout
/// can move the canvas between events, so callers pass the origin observed for
/// each event instead of caching it.
///
/// # Examples
/// ```
/// use inkpad::util::{Point, map_to_canvas};
/// let local = map_to_canvas(Point::new(100.0, 200.0), Point::new(150.0, 260.0));
/// assert_eq!(local, Point::new(50.0, 60.0));
/// ```
pub fn map_to_canvas(origin: Point, pointer: Point) -> Point {
    Point {
        x: pointer.x - origin.x,
        y: pointer.y - origin.y,
    }
}

/// True when a canvas-local point falls outside `[0, width) x [0, height)`.
pub fn is_outside(point: Point, width: u32, height: u32) -> bool {
    !(point.x >= 0.0 && point.y >= 0.0 && point.x < width as f64 && point.y < height as f64)
}

// ============================================================================
// Color Mapping
// ============================================================================

/// Maps color name strings to Color values.
///
/// Used by the configuration system to parse color names from the config file.
/// Hex strings (`#rrggbb` or `#rgb`) are accepted as well.
///
/// # Supported Names (case-insensitive)
/// - "red", "green", "blue", "yellow", "orange", "pink", "white", "black"
pub fn name_to_color(name: &str) -> Option<Color> {
    match name.trim().to_lowercase().as_str() {
        "red" => Some(RED),
        "green" => Some(GREEN),
        "blue" => Some(BLUE),
        "yellow" => Some(YELLOW),
        "orange" => Some(ORANGE),
        "pink" => Some(PINK),
        "white" => Some(WHITE),
        "black" => Some(BLACK),
        other if other.starts_with('#') => Color::from_hex(other),
        _ => None,
    }
}

// ============================================================================
// Paths
// ============================================================================

/// Expand tilde (~) in path strings.
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(stripped);
    }
    PathBuf::from(path)
}

/// Replaces anything but ASCII alphanumerics with `_` so the value is safe in
/// a file name.
pub fn sanitize_identifier(raw: &str) -> String {
    if raw.is_empty() {
        return "default".to_string();
    }

    raw.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}
