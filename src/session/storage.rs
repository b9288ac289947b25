use super::file_store::{self, LoadedEntries};
use super::options::StoreOptions;
use super::persist::{CURRENT_DRAWING_KEY, LINE_COLOR_KEY, LINE_WEIGHT_KEY};
use anyhow::{Context, Result};
use fs2::FileExt;
use log::warn;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Result of clearing on-disk store data.
#[derive(Debug, Clone, Copy)]
pub struct ClearOutcome {
    pub removed_store: bool,
    pub removed_backup: bool,
    pub removed_lock: bool,
}

/// Summary information about the current store file(s).
#[derive(Debug, Clone)]
pub struct StoreInspection {
    pub store_path: PathBuf,
    pub exists: bool,
    pub size_bytes: Option<u64>,
    pub modified: Option<SystemTime>,
    pub backup_path: PathBuf,
    pub backup_exists: bool,
    pub backup_size_bytes: Option<u64>,
    pub keys: Vec<String>,
    pub line_color: Option<String>,
    pub line_weight: Option<String>,
    pub drawing_bytes: Option<usize>,
    pub compressed: bool,
}

/// Remove persisted store files (store, backup, and lock).
pub fn clear_store(options: &StoreOptions) -> Result<ClearOutcome> {
    Ok(ClearOutcome {
        removed_store: remove_file_if_exists(&options.store_file_path())?,
        removed_backup: remove_file_if_exists(&options.backup_file_path())?,
        removed_lock: remove_file_if_exists(&options.lock_file_path())?,
    })
}

/// Inspect the current store file for CLI reporting.
pub fn inspect_store(options: &StoreOptions) -> Result<StoreInspection> {
    let store_path = options.store_file_path();
    let metadata = fs::metadata(&store_path).ok();
    let exists = metadata.is_some();
    let size_bytes = metadata.as_ref().map(|m| m.len());
    let modified = metadata.as_ref().and_then(|m| m.modified().ok());

    let backup_path = options.backup_file_path();
    let backup_meta = fs::metadata(&backup_path).ok();

    let mut inspection = StoreInspection {
        store_path: store_path.clone(),
        exists,
        size_bytes,
        modified,
        backup_path,
        backup_exists: backup_meta.is_some(),
        backup_size_bytes: backup_meta.as_ref().map(|m| m.len()),
        keys: Vec::new(),
        line_color: None,
        line_weight: None,
        drawing_bytes: None,
        compressed: false,
    };

    if !exists {
        return Ok(inspection);
    }

    let lock_path = options.lock_file_path();
    let lock_file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(&lock_path)
        .with_context(|| format!("failed to open store lock file {}", lock_path.display()))?;
    lock_file
        .lock_shared()
        .with_context(|| format!("failed to acquire shared lock {}", lock_path.display()))?;

    let loaded = file_store::load_entries_inner(&store_path);

    lock_file.unlock().unwrap_or_else(|err| {
        warn!("failed to unlock store file {}: {}", lock_path.display(), err)
    });

    if let Some(LoadedEntries {
        entries,
        compressed,
    }) = loaded?
    {
        inspection.keys = entries.keys().cloned().collect();
        inspection.line_color = entries.get(LINE_COLOR_KEY).cloned();
        inspection.line_weight = entries.get(LINE_WEIGHT_KEY).cloned();
        inspection.drawing_bytes = entries.get(CURRENT_DRAWING_KEY).map(String::len);
        inspection.compressed = compressed;
    }

    Ok(inspection)
}

fn remove_file_if_exists(path: &Path) -> Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(err) => Err(err).with_context(|| format!("failed to remove {}", path.display())),
    }
}
