//! Stroke style: color, width and paint mode.

use crate::draw::Color;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Compositing rule applied to each painted segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaintMode {
    /// Paint the stroke color over existing content
    #[default]
    Draw,
    /// Remove existing content along the stroke
    Erase,
}

impl FromStr for PaintMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "draw" | "pen" => Ok(Self::Draw),
            "erase" | "eraser" => Ok(Self::Erase),
            other => Err(format!("unknown paint mode '{other}'")),
        }
    }
}

impl fmt::Display for PaintMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Draw => "draw",
            Self::Erase => "erase",
        })
    }
}

/// The style applied to segments painted from now on.
///
/// Changing any value never touches pixels that are already painted. Setters
/// return whether the held value changed, so callers can persist only real
/// changes.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleState {
    color: Color,
    width: u32,
    mode: PaintMode,
    min_width: u32,
    max_width: u32,
}

impl StyleState {
    /// Creates a style in draw mode. `width` is clamped to `min_width..=max_width`;
    /// inverted bounds collapse onto `min_width`.
    pub fn new(color: Color, width: u32, min_width: u32, max_width: u32) -> Self {
        let min_width = min_width.max(1);
        let max_width = max_width.max(min_width);
        Self {
            color,
            width: width.clamp(min_width, max_width),
            mode: PaintMode::Draw,
            min_width,
            max_width,
        }
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn mode(&self) -> PaintMode {
        self.mode
    }

    /// Inclusive `(min, max)` stroke width bounds.
    pub fn width_bounds(&self) -> (u32, u32) {
        (self.min_width, self.max_width)
    }

    pub fn set_color(&mut self, color: Color) -> bool {
        if self.color == color {
            return false;
        }
        self.color = color;
        true
    }

    /// Sets the width, clamped to the configured bounds.
    pub fn set_width(&mut self, width: u32) -> bool {
        let width = width.clamp(self.min_width, self.max_width);
        if self.width == width {
            return false;
        }
        self.width = width;
        true
    }

    /// Nudges the width by `delta`, staying within bounds.
    pub fn adjust_width(&mut self, delta: i32) -> bool {
        let target = (self.width as i64 + delta as i64).max(0) as u32;
        self.set_width(target)
    }

    pub fn set_mode(&mut self, mode: PaintMode) -> bool {
        if self.mode == mode {
            return false;
        }
        self.mode = mode;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::color::{BLACK, RED};

    #[test]
    fn new_clamps_initial_width() {
        assert_eq!(StyleState::new(BLACK, 0, 1, 15).width(), 1);
        assert_eq!(StyleState::new(BLACK, 99, 1, 15).width(), 15);
        assert_eq!(StyleState::new(BLACK, 3, 5, 2).width_bounds(), (5, 5));
    }

    #[test]
    fn set_width_clamps_to_bounds() {
        let mut style = StyleState::new(BLACK, 1, 1, 15);
        assert!(style.set_width(40));
        assert_eq!(style.width(), 15);
        assert!(style.set_width(0));
        assert_eq!(style.width(), 1);
    }

    #[test]
    fn setters_are_idempotent() {
        let mut style = StyleState::new(BLACK, 4, 1, 15);
        assert!(style.set_color(RED));
        assert!(!style.set_color(RED));
        assert!(!style.set_width(4));
        assert!(style.set_mode(PaintMode::Erase));
        assert!(!style.set_mode(PaintMode::Erase));
        assert_eq!(style.color(), RED);
        assert_eq!(style.mode(), PaintMode::Erase);
    }

    #[test]
    fn adjust_width_saturates() {
        let mut style = StyleState::new(BLACK, 2, 1, 15);
        assert!(style.adjust_width(3));
        assert_eq!(style.width(), 5);
        assert!(style.adjust_width(-100));
        assert_eq!(style.width(), 1);
        assert!(!style.adjust_width(-1));
    }

    #[test]
    fn paint_mode_parses_aliases() {
        assert_eq!("Erase".parse::<PaintMode>(), Ok(PaintMode::Erase));
        assert_eq!("pen".parse::<PaintMode>(), Ok(PaintMode::Draw));
        assert!("smudge".parse::<PaintMode>().is_err());
        assert_eq!(PaintMode::Erase.to_string(), "erase");
    }
}
