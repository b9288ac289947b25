//! Document export for the drawing canvas.
//!
//! This module provides:
//! - A snapshot-then-encode pipeline that writes one document per call
//! - A pluggable [`DocumentEncoder`] with a Cairo PDF default
//! - Random, collision-free output file names

pub mod encoder;
pub mod file;
pub mod types;

mod pipeline;
#[cfg(test)]
mod tests;

pub use encoder::{DocumentEncoder, PdfEncoder};
pub use pipeline::Exporter;
pub use types::{ExportError, ExportedDocument, PageLayout};
