//! Editing actions on a session: style setters, undo/redo, clear, resize and export.

use crate::config::ResizePolicy;
use crate::draw::Color;
use crate::export::{ExportError, ExportedDocument, Exporter};
use crate::history::Step;
use crate::input::PaintMode;
use crate::session;
use log::{debug, info, warn};

use super::{DrawingSession, HistoryMove};

impl DrawingSession {
    /// Sets the stroke color for subsequent segments and persists the style on change.
    pub fn set_color(&mut self, color: Color) -> bool {
        let changed = self.style.set_color(color);
        if changed {
            self.persist_style();
        }
        changed
    }

    /// Parses `#rrggbb` / `#rgb` and applies it. Malformed input is logged and ignored.
    pub fn set_color_hex(&mut self, value: &str) -> bool {
        match Color::from_hex(value) {
            Some(color) => self.set_color(color),
            None => {
                warn!("Ignoring malformed color '{}'", value);
                false
            }
        }
    }

    /// Sets the stroke width (clamped) and persists the style on change.
    pub fn set_width(&mut self, width: u32) -> bool {
        let changed = self.style.set_width(width);
        if changed {
            self.persist_style();
        }
        changed
    }

    pub fn adjust_width(&mut self, delta: i32) -> bool {
        let changed = self.style.adjust_width(delta);
        if changed {
            self.persist_style();
        }
        changed
    }

    /// Switches between drawing and erasing. Painted pixels are untouched.
    pub fn set_mode(&mut self, mode: PaintMode) -> bool {
        let changed = self.style.set_mode(mode);
        if changed {
            debug!("Paint mode set to {}", mode);
        }
        changed
    }

    /// Shows the previous snapshot. An active stroke is finished first.
    pub fn undo(&mut self) -> HistoryMove {
        self.step_history(false)
    }

    /// Shows the next snapshot. An active stroke is finished first.
    pub fn redo(&mut self) -> HistoryMove {
        self.step_history(true)
    }

    fn step_history(&mut self, forward: bool) -> HistoryMove {
        self.finish_stroke();

        let Some(canvas) = self.canvas.as_mut() else {
            debug!("No drawing surface; history unavailable");
            return HistoryMove::Unavailable;
        };

        let step = if forward {
            canvas.history.redo()
        } else {
            canvas.history.undo()
        };

        let (id, raster) = match step {
            Step::Moved(snapshot) => (snapshot.id(), snapshot.raster().clone()),
            Step::AtOldest => {
                debug!("Undo requested at the oldest snapshot");
                return HistoryMove::AtOldest;
            }
            Step::AtNewest => {
                debug!("Redo requested at the newest snapshot");
                return HistoryMove::AtNewest;
            }
        };

        if let Err(err) = canvas.surface.put_raster(&raster) {
            warn!("Failed to show snapshot {}: {}", id, err);
        }
        debug!(
            "{} to snapshot {}",
            if forward { "Redid" } else { "Undid" },
            id
        );

        self.persist_drawing();
        HistoryMove::Moved(id)
    }

    /// Blanks the canvas as a completed mutation: a snapshot is pushed and the
    /// blank raster persisted, so the clear itself can be undone.
    ///
    /// Returns whether the canvas was cleared.
    pub fn clear(&mut self) -> bool {
        self.finish_stroke();

        let Some(canvas) = self.canvas.as_mut() else {
            debug!("No drawing surface; ignoring clear");
            return false;
        };

        if let Err(err) = canvas.surface.clear() {
            warn!("Failed to clear canvas: {}", err);
            return false;
        }

        info!("Canvas cleared");
        self.commit_snapshot();
        true
    }

    /// Reallocates the surface at a new size (each side clamped to at least 1).
    ///
    /// An active stroke is finished first. With [`ResizePolicy::Restore`] the
    /// persisted drawing is redrawn at the new origin and history is left alone.
    /// With [`ResizePolicy::Clear`] the blank canvas is committed as a snapshot
    /// and persisted, so the drawing before the resize can be brought back with
    /// undo. Style is unchanged.
    ///
    /// Returns whether the surface was reallocated.
    pub fn resize(&mut self, width: i32, height: i32) -> bool {
        self.finish_stroke();

        let Some(canvas) = self.canvas.as_mut() else {
            debug!("No drawing surface; ignoring resize");
            return false;
        };

        if let Err(err) = canvas.surface.resize(width, height) {
            warn!(
                "Failed to resize canvas to {}x{}: {}; keeping {}x{}",
                width,
                height,
                err,
                canvas.surface.width(),
                canvas.surface.height()
            );
            return false;
        }

        if self.resize_policy == ResizePolicy::Restore
            && let Some(png) = session::load_drawing(self.store.as_ref())
            && let Err(err) = canvas.surface.draw_png_at_origin(&png)
        {
            warn!("Failed to restore drawing after resize: {}", err);
        }

        info!(
            "Canvas resized to {}x{}",
            canvas.surface.width(),
            canvas.surface.height()
        );

        if self.resize_policy == ResizePolicy::Clear {
            self.commit_snapshot();
        }
        true
    }

    /// Copies the visible raster and encodes it into a new document.
    ///
    /// A stroke in progress is exported as painted so far and keeps going.
    pub fn export(&self, exporter: &Exporter) -> Result<ExportedDocument, ExportError> {
        let canvas = self
            .canvas
            .as_ref()
            .ok_or(ExportError::SurfaceUnavailable)?;
        let raster = canvas.surface.raster()?;
        exporter.export(&raster)
    }
}
