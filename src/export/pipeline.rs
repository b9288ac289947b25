use std::{
    fmt,
    path::{Path, PathBuf},
    sync::Arc,
};

use crate::config::ExportConfig;
use crate::draw::Raster;
use crate::export::{
    encoder::{DocumentEncoder, PdfEncoder},
    file::{default_export_directory, ensure_directory_exists, generate_filename},
    types::{ExportError, ExportedDocument},
};
use crate::util::expand_tilde;

/// Writes raster copies to documents in a fixed directory.
#[derive(Clone)]
pub struct Exporter {
    directory: PathBuf,
    encoder: Arc<dyn DocumentEncoder>,
}

impl fmt::Debug for Exporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Exporter")
            .field("directory", &self.directory)
            .field("extension", &self.encoder.extension())
            .finish()
    }
}

impl Exporter {
    /// Creates an exporter that writes PDFs into `directory`.
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self::with_encoder(directory, Arc::new(PdfEncoder))
    }

    pub fn with_encoder(directory: impl Into<PathBuf>, encoder: Arc<dyn DocumentEncoder>) -> Self {
        Self {
            directory: directory.into(),
            encoder,
        }
    }

    /// Builds an exporter from the `[export]` config section.
    pub fn from_config(config: &ExportConfig) -> Self {
        let directory = config
            .directory
            .as_deref()
            .map(expand_tilde)
            .unwrap_or_else(default_export_directory);
        Self::new(directory)
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Encodes `raster` into a new document and returns where it was written.
    pub fn export(&self, raster: &Raster) -> Result<ExportedDocument, ExportError> {
        let directory = ensure_directory_exists(&self.directory)?;
        let path = directory.join(generate_filename(self.encoder.extension()));

        log::info!(
            "Exporting {}x{} canvas to {}",
            raster.width(),
            raster.height(),
            path.display()
        );

        let layout = self.encoder.encode(raster, &path)?;

        #[cfg(unix)]
        {
            use std::fs::{self, Permissions};
            use std::os::unix::fs::PermissionsExt;
            if path.exists() {
                fs::set_permissions(&path, Permissions::from_mode(0o600))?;
            }
        }

        log::info!("Export saved successfully: {}", path.display());
        Ok(ExportedDocument { path, layout })
    }
}
