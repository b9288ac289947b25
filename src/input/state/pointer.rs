//! Pointer handling: the idle/stroking state machine and stroke completion.

use crate::input::events::{PointerEvent, PointerKind};
use crate::util::{self, Point};
use log::{debug, warn};

use super::{ActiveStroke, DrawingSession, DrawingState};

impl DrawingSession {
    /// Maps a viewport event into canvas space and feeds it to the state machine.
    ///
    /// # Arguments
    /// * `event` - Pointer event in viewport coordinates
    /// * `origin` - Canvas top-left corner in the same space, as observed for this event
    pub fn handle_pointer(&mut self, event: PointerEvent, origin: Point) {
        let point = util::map_to_canvas(origin, event.position);
        match event.kind {
            PointerKind::Down => self.on_pointer_down(point),
            PointerKind::Move => self.on_pointer_move(point),
            PointerKind::Up => self.on_pointer_up(),
            PointerKind::Leave => self.on_pointer_leave(),
        }
    }

    /// Starts a stroke at a canvas-local point. Nothing is painted yet.
    ///
    /// Ignored while a stroke is already active, when the point is off the
    /// canvas, or when no surface exists.
    pub fn on_pointer_down(&mut self, point: Point) {
        let Some(canvas) = self.canvas.as_ref() else {
            debug!("No drawing surface; ignoring pointer-down");
            return;
        };

        if self.is_stroking() {
            debug!("Pointer-down while stroking; ignored");
            return;
        }

        if !canvas.surface.contains(point) {
            debug!(
                "Pointer-down at ({:.1}, {:.1}) is outside the canvas; ignored",
                point.x, point.y
            );
            return;
        }

        self.state = DrawingState::Stroking(ActiveStroke {
            last: point,
            segments: 0,
        });
    }

    /// Paints the segment from the last visited point to `point` with the
    /// current style.
    ///
    /// Moving off the canvas finishes the stroke as if the pointer was released.
    pub fn on_pointer_move(&mut self, point: Point) {
        let DrawingState::Stroking(stroke) = self.state else {
            return;
        };
        let Some(canvas) = self.canvas.as_mut() else {
            return;
        };

        if !canvas.surface.contains(point) {
            debug!(
                "Pointer moved off the canvas at ({:.1}, {:.1}); finishing stroke",
                point.x, point.y
            );
            self.finish_stroke();
            return;
        }

        if let Err(err) = canvas.surface.paint_segment(stroke.last, point, &self.style) {
            warn!("Failed to paint stroke segment: {}", err);
        }

        self.state = DrawingState::Stroking(ActiveStroke {
            last: point,
            segments: stroke.segments + 1,
        });
    }

    pub fn on_pointer_up(&mut self) {
        self.finish_stroke();
    }

    pub fn on_pointer_leave(&mut self) {
        self.finish_stroke();
    }

    /// Completes the active stroke, if any: back to Idle, push a snapshot of the
    /// visible raster, and persist it.
    ///
    /// Returns whether a stroke was active.
    pub fn finish_stroke(&mut self) -> bool {
        let DrawingState::Stroking(stroke) = std::mem::take(&mut self.state) else {
            return false;
        };

        debug!("Stroke finished after {} segment(s)", stroke.segments);
        self.commit_snapshot();
        true
    }
}
