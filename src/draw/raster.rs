//! Owned, immutable copies of the canvas pixel buffer.

use std::fmt;
use std::sync::Arc;

/// A full copy of an ARGB32 pixel buffer.
///
/// Pixels use Cairo's `ARgb32` layout: one native-endian `u32` per pixel with
/// premultiplied alpha in the high byte, rows padded to `stride` bytes. The
/// bytes are shared behind an [`Arc`] so handing a raster to the history log or
/// the exporter never aliases the live surface.
#[derive(Clone, PartialEq, Eq)]
pub struct Raster {
    width: u32,
    height: u32,
    stride: usize,
    data: Arc<[u8]>,
}

impl Raster {
    /// Wraps raw pixel bytes. Returns `None` when the buffer is too small for
    /// the given geometry.
    pub fn from_parts(width: u32, height: u32, stride: usize, data: Vec<u8>) -> Option<Self> {
        if stride < width as usize * 4 || data.len() < stride * height as usize {
            return None;
        }
        Some(Self {
            width,
            height,
            stride,
            data: data.into(),
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Returns the packed ARGB value at `(x, y)`, or `None` outside the raster.
    pub fn argb(&self, x: u32, y: u32) -> Option<u32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = y as usize * self.stride + x as usize * 4;
        let bytes = self.data.get(offset..offset + 4)?;
        Some(u32::from_ne_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Alpha channel at `(x, y)`; zero outside the raster.
    pub fn alpha(&self, x: u32, y: u32) -> u8 {
        self.argb(x, y).map_or(0, |px| (px >> 24) as u8)
    }

    /// True when every pixel is fully transparent.
    pub fn is_blank(&self) -> bool {
        (0..self.height as usize).all(|row| {
            let start = row * self.stride;
            self.data[start..start + self.width as usize * 4]
                .iter()
                .all(|byte| *byte == 0)
        })
    }

    /// Number of pixels with non-zero alpha.
    pub fn painted_pixels(&self) -> usize {
        (0..self.height)
            .flat_map(|y| (0..self.width).map(move |x| (x, y)))
            .filter(|&(x, y)| self.alpha(x, y) > 0)
            .count()
    }
}

impl fmt::Debug for Raster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Raster")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("stride", &self.stride)
            .field("bytes", &self.data.len())
            .finish()
    }
}
