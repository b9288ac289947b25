//! Pointer event types delivered by whichever front-end drives the session.

use crate::util::Point;
use serde::{Deserialize, Serialize};

/// Kind of pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerKind {
    /// Primary button pressed
    Down,
    /// Pointer moved (with or without a button held)
    Move,
    /// Primary button released
    Up,
    /// Pointer left the canvas element
    Leave,
}

/// A pointer event in viewport coordinates.
///
/// The canvas origin is supplied separately with each event because layout
/// can move the canvas between events.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub position: Point,
}

impl PointerEvent {
    pub fn new(kind: PointerKind, x: f64, y: f64) -> Self {
        Self {
            kind,
            position: Point::new(x, y),
        }
    }

    pub fn down(x: f64, y: f64) -> Self {
        Self::new(PointerKind::Down, x, y)
    }

    pub fn moved(x: f64, y: f64) -> Self {
        Self::new(PointerKind::Move, x, y)
    }

    pub fn up(x: f64, y: f64) -> Self {
        Self::new(PointerKind::Up, x, y)
    }

    pub fn leave(x: f64, y: f64) -> Self {
        Self::new(PointerKind::Leave, x, y)
    }
}
