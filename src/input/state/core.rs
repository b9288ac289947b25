//! Stroke state machine and drawing session ownership.

use crate::config::{Config, ResizePolicy};
use crate::draw::{CanvasSurface, Raster, SurfaceError};
use crate::history::{HistoryLog, SnapshotId};
use crate::input::StyleState;
use crate::session::{self, KeyValueStore};
use crate::util::Point;

/// The stroke in progress between pointer-down and its completion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActiveStroke {
    /// Last visited canvas coordinate; the next segment starts here
    pub(super) last: Point,
    /// Segments painted so far
    pub(super) segments: usize,
}

impl ActiveStroke {
    pub fn last(&self) -> Point {
        self.last
    }

    pub fn segments(&self) -> usize {
        self.segments
    }
}

/// Current drawing mode state machine.
///
/// Idle until a pointer-down lands on the canvas, Stroking until the pointer is
/// released, leaves, moves off the canvas, or another operation forces the
/// stroke to finish.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DrawingState {
    /// Not drawing - waiting for pointer-down
    #[default]
    Idle,
    /// Pointer held down; segments are painted as it moves
    Stroking(ActiveStroke),
}

/// Outcome of an undo or redo request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryMove {
    /// The cursor moved; the surface now shows this snapshot.
    Moved(SnapshotId),
    /// Undo with nothing older to show.
    AtOldest,
    /// Redo with nothing newer to show.
    AtNewest,
    /// No surface exists, so there is no history.
    Unavailable,
}

/// Surface plus the history of its completed mutations.
pub(super) struct Canvas {
    pub(super) surface: CanvasSurface,
    pub(super) history: HistoryLog,
}

impl Canvas {
    fn open(width: i32, height: i32, max_depth: usize) -> Result<Self, SurfaceError> {
        let surface = CanvasSurface::new(width, height)?;
        let blank = surface.raster()?;
        Ok(Self {
            surface,
            history: HistoryLog::new(blank, max_depth),
        })
    }
}

/// Owns everything a drawing needs: surface, style, history, stroke state and
/// the persistence store.
///
/// Every operation takes `&mut self`, so operations never interleave and at most
/// one stroke is ever active. If the surface cannot be allocated the session
/// stays usable but inert: pointer, clear, undo, redo and resize are ignored and
/// export reports that no surface exists.
pub struct DrawingSession {
    pub(super) canvas: Option<Canvas>,
    pub(super) style: StyleState,
    pub(super) state: DrawingState,
    pub(super) store: Box<dyn KeyValueStore>,
    pub(super) resize_policy: ResizePolicy,
}

impl DrawingSession {
    /// Creates a session from configuration, seeding style and the visible
    /// canvas from `store`.
    ///
    /// The history always starts with a single blank snapshot, even when a
    /// persisted drawing is restored onto the surface.
    pub fn new(config: &Config, store: Box<dyn KeyValueStore>) -> Self {
        let drawing = &config.drawing;
        let mut style = StyleState::new(
            drawing.default_color.to_color(),
            drawing.default_width,
            drawing.min_width,
            drawing.max_width,
        );
        session::restore_style(store.as_ref(), &mut style);

        let canvas = match Canvas::open(
            config.canvas.width,
            config.canvas.height,
            config.history.max_depth,
        ) {
            Ok(mut canvas) => {
                if let Some(png) = session::load_drawing(store.as_ref()) {
                    match canvas.surface.draw_png_at_origin(&png) {
                        Ok(()) => log::info!("Restored persisted drawing"),
                        Err(err) => log::warn!("Failed to restore persisted drawing: {}", err),
                    }
                }
                Some(canvas)
            }
            Err(err) => {
                log::error!(
                    "Failed to create {}x{} drawing surface: {}",
                    config.canvas.width,
                    config.canvas.height,
                    err
                );
                None
            }
        };

        log::debug!(
            "Drawing session ready: color {}, width {}, resize policy {:?}",
            style.color().to_hex(),
            style.width(),
            config.canvas.resize_policy
        );

        Self {
            canvas,
            style,
            state: DrawingState::Idle,
            store,
            resize_policy: config.canvas.resize_policy,
        }
    }

    pub fn state(&self) -> &DrawingState {
        &self.state
    }

    pub fn is_stroking(&self) -> bool {
        matches!(self.state, DrawingState::Stroking(_))
    }

    pub fn style(&self) -> &StyleState {
        &self.style
    }

    pub fn resize_policy(&self) -> ResizePolicy {
        self.resize_policy
    }

    /// Whether a drawing surface exists.
    pub fn has_surface(&self) -> bool {
        self.canvas.is_some()
    }

    pub fn history(&self) -> Option<&HistoryLog> {
        self.canvas.as_ref().map(|canvas| &canvas.history)
    }

    /// Current surface size in pixels.
    pub fn surface_size(&self) -> Option<(u32, u32)> {
        self.canvas
            .as_ref()
            .map(|canvas| (canvas.surface.width(), canvas.surface.height()))
    }

    /// A copy of the visible pixels.
    pub fn raster(&self) -> Option<Raster> {
        let canvas = self.canvas.as_ref()?;
        match canvas.surface.raster() {
            Ok(raster) => Some(raster),
            Err(err) => {
                log::warn!("Failed to read canvas pixels: {}", err);
                None
            }
        }
    }

    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }

    /// Records the visible raster as a completed mutation and persists it.
    pub(super) fn commit_snapshot(&mut self) {
        let Some(canvas) = self.canvas.as_mut() else {
            return;
        };

        match canvas.surface.raster() {
            Ok(raster) => {
                let id = canvas.history.push(raster).id();
                log::debug!(
                    "Pushed snapshot {} (depth {})",
                    id,
                    canvas.history.len()
                );
            }
            Err(err) => {
                log::warn!("Failed to snapshot canvas: {}", err);
                return;
            }
        }

        self.persist_drawing();
    }

    /// Writes the visible raster to the store. Failures are logged only.
    pub(super) fn persist_drawing(&mut self) {
        let Some(canvas) = self.canvas.as_ref() else {
            return;
        };

        let png = match canvas.surface.encode_png() {
            Ok(png) => png,
            Err(err) => {
                log::warn!("Failed to encode drawing for persistence: {}", err);
                return;
            }
        };

        if let Err(err) = session::save_drawing(self.store.as_mut(), &png) {
            log::warn!("Failed to persist drawing: {:#}", err);
        }
    }

    /// Writes both style keys to the store. Failures are logged only.
    pub(super) fn persist_style(&mut self) {
        if let Err(err) = session::save_style(self.store.as_mut(), &self.style) {
            log::warn!("Failed to persist style: {:#}", err);
        }
    }
}
