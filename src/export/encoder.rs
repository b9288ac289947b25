//! Document encoders.

use super::types::{ExportError, PageLayout};
use crate::draw::Raster;
use crate::draw::surface::image_surface_from_raster;
use cairo::{Context, PdfSurface};
use std::path::Path;

/// Abstraction over turning a raster copy into a document file. Mocked in tests.
pub trait DocumentEncoder: Send + Sync {
    /// File extension without the leading dot.
    fn extension(&self) -> &'static str;

    /// Writes `raster` to `path` and reports the resulting page geometry.
    fn encode(&self, raster: &Raster, path: &Path) -> Result<PageLayout, ExportError>;
}

/// Writes a single-page PDF whose page is exactly the raster size.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfEncoder;

impl DocumentEncoder for PdfEncoder {
    fn extension(&self) -> &'static str {
        "pdf"
    }

    fn encode(&self, raster: &Raster, path: &Path) -> Result<PageLayout, ExportError> {
        let layout = PageLayout::single_page(raster.width(), raster.height());
        let image = image_surface_from_raster(raster)?;

        let pdf = PdfSurface::new(layout.width, layout.height, path)?;
        {
            let ctx = Context::new(&pdf)?;
            ctx.set_source_surface(&image, layout.image_x, layout.image_y)?;
            ctx.paint()?;
        }
        pdf.finish();
        pdf.status()?;

        log::debug!(
            "Encoded {}x{} PDF page at {}",
            raster.width(),
            raster.height(),
            path.display()
        );
        Ok(layout)
    }
}
