//! The live raster buffer that strokes are painted into.

use super::raster::Raster;
use super::render;
use crate::input::StyleState;
use crate::util::{self, Point};
use cairo::{Context, Format, ImageSurface};
use std::io::Cursor;
use thiserror::Error;

/// Smallest width or height a surface is ever allocated with.
pub const MIN_DIMENSION: i32 = 1;

/// Errors raised by the Cairo-backed canvas surface.
#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("Cairo error: {0}")]
    Cairo(#[from] cairo::Error),

    #[error("Surface pixels unavailable: {0}")]
    Borrow(#[from] cairo::BorrowError),

    #[error("PNG encoding error: {0}")]
    Png(#[from] cairo::IoError),

    #[error("Pixel buffer does not match a {width}x{height} surface")]
    Geometry { width: u32, height: u32 },
}

/// Clamps requested dimensions to the minimum allocation size.
pub fn clamp_dimensions(width: i32, height: i32) -> (i32, i32) {
    (width.max(MIN_DIMENSION), height.max(MIN_DIMENSION))
}

/// Owns the ARGB32 raster buffer and its logical size.
///
/// Cairo contexts are created per operation and dropped before returning, so
/// the surface is never shared while its pixels are read or replaced.
pub struct CanvasSurface {
    surface: ImageSurface,
}

impl CanvasSurface {
    /// Allocates a blank surface. Non-positive dimensions are clamped to 1.
    pub fn new(width: i32, height: i32) -> Result<Self, SurfaceError> {
        let (width, height) = clamp_dimensions(width, height);
        let surface = ImageSurface::create(Format::ARgb32, width, height)?;
        log::debug!("Allocated {}x{} canvas surface", width, height);
        Ok(Self { surface })
    }

    pub fn width(&self) -> u32 {
        self.surface.width() as u32
    }

    pub fn height(&self) -> u32 {
        self.surface.height() as u32
    }

    /// True when a canvas-local point lies on the surface.
    pub fn contains(&self, point: Point) -> bool {
        !util::is_outside(point, self.width(), self.height())
    }

    /// Reallocates the buffer at the new size. The new buffer is blank; callers
    /// that preserve content redraw it afterwards.
    ///
    /// On failure the previous buffer is kept.
    pub fn resize(&mut self, width: i32, height: i32) -> Result<(), SurfaceError> {
        *self = Self::new(width, height)?;
        Ok(())
    }

    /// Sets every pixel to transparent.
    pub fn clear(&mut self) -> Result<(), SurfaceError> {
        let ctx = Context::new(&self.surface)?;
        render::render_blank(&ctx)?;
        Ok(())
    }

    /// Paints a single stroke segment with the given style.
    pub fn paint_segment(
        &mut self,
        from: Point,
        to: Point,
        style: &StyleState,
    ) -> Result<(), SurfaceError> {
        let ctx = Context::new(&self.surface)?;
        render::render_segment(&ctx, from, to, style)?;
        Ok(())
    }

    /// Returns an independent copy of the current pixels.
    pub fn raster(&self) -> Result<Raster, SurfaceError> {
        let mut copy = Vec::new();
        self.surface
            .with_data(|data| copy.extend_from_slice(data))?;

        let (width, height) = (self.width(), self.height());
        Raster::from_parts(width, height, self.surface.stride() as usize, copy)
            .ok_or(SurfaceError::Geometry { width, height })
    }

    /// Replaces the live pixels with `raster`.
    ///
    /// A raster of another size is drawn at the origin of a blank buffer that
    /// keeps the current dimensions.
    pub fn put_raster(&mut self, raster: &Raster) -> Result<(), SurfaceError> {
        let image = image_surface_from_raster(raster)?;
        if raster.width() == self.width() && raster.height() == self.height() {
            self.surface = image;
            return Ok(());
        }

        let ctx = Context::new(&self.surface)?;
        render::render_image_at_origin(&ctx, &image, true)?;
        Ok(())
    }

    /// Encodes the current pixels as PNG bytes.
    pub fn encode_png(&self) -> Result<Vec<u8>, SurfaceError> {
        let mut out = Vec::new();
        self.surface.write_to_png(&mut out)?;
        Ok(out)
    }

    /// Decodes PNG bytes and composites them at the origin, clipping anything
    /// that does not fit.
    pub fn draw_png_at_origin(&mut self, png: &[u8]) -> Result<(), SurfaceError> {
        let image = ImageSurface::create_from_png(&mut Cursor::new(png))?;
        let ctx = Context::new(&self.surface)?;
        render::render_image_at_origin(&ctx, &image, false)?;
        log::debug!(
            "Restored {}x{} image onto {}x{} canvas",
            image.width(),
            image.height(),
            self.width(),
            self.height()
        );
        Ok(())
    }
}

/// Builds a standalone Cairo image surface holding a copy of `raster`.
pub fn image_surface_from_raster(raster: &Raster) -> Result<ImageSurface, SurfaceError> {
    let surface = ImageSurface::create_for_data(
        raster.data().to_vec(),
        Format::ARgb32,
        raster.width() as i32,
        raster.height() as i32,
        raster.stride() as i32,
    )?;
    Ok(surface)
}
