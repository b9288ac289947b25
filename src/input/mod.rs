//! Pointer handling and the stroke state machine.
//!
//! This module translates pointer events into paint operations on the canvas
//! surface. It holds the current stroke style (color, width, paint mode) and the
//! drawing session that owns the surface, the history log, and the Idle/Stroking
//! state machine.

pub mod events;
pub mod state;
pub mod style;

// Re-export commonly used types at module level
pub use events::{PointerEvent, PointerKind};
pub use state::{ActiveStroke, DrawingSession, DrawingState, HistoryMove};
pub use style::{PaintMode, StyleState};
