//! Output location and naming for exported documents.

use super::types::ExportError;
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Default export directory: `~/Documents/Inkpad`.
pub fn default_export_directory() -> PathBuf {
    dirs::document_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join("Inkpad")
}

/// Generate a fresh file name: a random token plus `extension`.
///
/// Every call yields a new name, so repeated exports never overwrite each other.
pub fn generate_filename(extension: &str) -> String {
    format!("{}.{}", Uuid::new_v4().simple(), extension)
}

/// Ensure the export directory exists, creating it if necessary.
///
/// # Returns
/// The canonicalized path to the directory
pub fn ensure_directory_exists(directory: &Path) -> Result<PathBuf, ExportError> {
    if !directory.exists() {
        log::info!("Creating export directory: {}", directory.display());
        fs::create_dir_all(directory)?;
    }

    let canonical = directory
        .canonicalize()
        .unwrap_or_else(|_| directory.to_path_buf());

    Ok(canonical)
}
