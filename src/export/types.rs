//! Data types for document export.

use crate::draw::SurfaceError;
use std::path::PathBuf;
use thiserror::Error;

/// Geometry of the document an encoder produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageLayout {
    /// Page width in points (one point per canvas pixel).
    pub width: f64,
    /// Page height in points.
    pub height: f64,
    /// Horizontal offset of the image on the page.
    pub image_x: f64,
    /// Vertical offset of the image on the page.
    pub image_y: f64,
    /// Number of pages written.
    pub pages: u32,
}

impl PageLayout {
    /// A single page matching the raster size with the image at the origin.
    pub fn single_page(width: u32, height: u32) -> Self {
        Self {
            width: width as f64,
            height: height as f64,
            image_x: 0.0,
            image_y: 0.0,
            pages: 1,
        }
    }
}

/// Result of a successful export.
#[derive(Debug, Clone)]
pub struct ExportedDocument {
    /// Where the document was written.
    pub path: PathBuf,
    /// Page geometry reported by the encoder.
    pub layout: PageLayout,
}

/// Errors that can occur while exporting the canvas.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("No drawing surface is available")]
    SurfaceUnavailable,

    #[error("Failed to read canvas pixels: {0}")]
    Surface(#[from] SurfaceError),

    #[error("Document rendering failed: {0}")]
    Cairo(#[from] cairo::Error),

    #[error("Failed to write document: {0}")]
    Io(#[from] std::io::Error),

    #[error("Document encoding failed: {0}")]
    Encode(String),
}
