use super::options::{CompressionMode, StoreOptions};
use super::store::KeyValueStore;
use anyhow::{Context, Result};
use chrono::Utc;
use flate2::{Compression, bufread::GzDecoder, write::GzEncoder};
use fs2::FileExt;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

const CURRENT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct StoreFile {
    version: u32,
    last_modified: String,
    #[serde(default)]
    entries: BTreeMap<String, String>,
}

pub(crate) struct LoadedEntries {
    pub entries: BTreeMap<String, String>,
    pub compressed: bool,
}

/// Key-value store persisted as a JSON document on disk.
///
/// Entries are cached in memory and written through on every change. Writes go
/// to a temporary file that is renamed into place under an exclusive lock; the
/// previous file is rotated to `.bak` when backups are enabled.
#[derive(Debug)]
pub struct FileStore {
    options: StoreOptions,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    /// Opens the store, loading existing entries if the file is present.
    pub fn open(options: StoreOptions) -> Result<Self> {
        let entries = load_entries(&options)?.unwrap_or_default();
        debug!(
            "Opened store {} with {} entr{}",
            options.store_file_path().display(),
            entries.len(),
            if entries.len() == 1 { "y" } else { "ies" }
        );
        Ok(Self { options, entries })
    }

    pub fn path(&self) -> PathBuf {
        self.options.store_file_path()
    }

    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    fn flush(&self) -> Result<()> {
        fs::create_dir_all(&self.options.base_dir).with_context(|| {
            format!(
                "failed to create store directory {}",
                self.options.base_dir.display()
            )
        })?;

        let lock_path = self.options.lock_file_path();
        let lock_file = open_lock_file(&lock_path)?;
        lock_file
            .lock_exclusive()
            .with_context(|| format!("failed to lock store file {}", lock_path.display()))?;

        let result = save_entries_inner(&self.entries, &self.options);

        lock_file.unlock().unwrap_or_else(|err| {
            warn!("failed to unlock store file {}: {}", lock_path.display(), err)
        });

        result
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<()> {
        if self.entries.get(key) == Some(&value) {
            return Ok(());
        }
        self.entries.insert(key.to_string(), value);
        self.flush()
    }

    fn remove(&mut self, key: &str) -> Result<bool> {
        if self.entries.remove(key).is_none() {
            return Ok(false);
        }
        self.flush()?;
        Ok(true)
    }

    fn keys(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }
}

fn open_lock_file(lock_path: &Path) -> Result<File> {
    OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(lock_path)
        .with_context(|| format!("failed to open store lock file {}", lock_path.display()))
}

fn save_entries_inner(entries: &BTreeMap<String, String>, options: &StoreOptions) -> Result<()> {
    let store_path = options.store_file_path();
    let backup_path = options.backup_file_path();

    if entries.is_empty() {
        if store_path.exists() {
            debug!(
                "Removing store file {} because it holds no entries",
                store_path.display()
            );
            fs::remove_file(&store_path).with_context(|| {
                format!("failed to remove empty store file {}", store_path.display())
            })?;
        }
        return Ok(());
    }

    let file_payload = StoreFile {
        version: CURRENT_VERSION,
        last_modified: Utc::now().to_rfc3339(),
        entries: entries.clone(),
    };

    let mut json_bytes =
        serde_json::to_vec_pretty(&file_payload).context("failed to serialise store payload")?;

    if json_bytes.len() as u64 > options.max_file_size_bytes {
        warn!(
            "Store data size {} bytes exceeds the configured limit of {} bytes; skipping save",
            json_bytes.len(),
            options.max_file_size_bytes
        );
        return Ok(());
    }

    let should_compress = match options.compression {
        CompressionMode::Off => false,
        CompressionMode::On => true,
        CompressionMode::Auto => (json_bytes.len() as u64) >= options.auto_compress_threshold_bytes,
    };

    if should_compress {
        json_bytes = compress_bytes(&json_bytes)?;
    }

    let tmp_path = temp_path(&store_path);
    {
        let mut tmp_file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&tmp_path)
            .with_context(|| format!("failed to open temporary store file {}", tmp_path.display()))?;
        tmp_file
            .write_all(&json_bytes)
            .context("failed to write store payload")?;
        tmp_file
            .sync_all()
            .context("failed to sync temporary store file")?;
    }

    if store_path.exists() {
        if options.backup_retention > 0 {
            if backup_path.exists() {
                fs::remove_file(&backup_path).ok();
            }
            fs::rename(&store_path, &backup_path).with_context(|| {
                format!(
                    "failed to rotate previous store file {} -> {}",
                    store_path.display(),
                    backup_path.display()
                )
            })?;
        } else {
            fs::remove_file(&store_path).ok();
        }
    }

    fs::rename(&tmp_path, &store_path).with_context(|| {
        format!(
            "failed to move temporary store file {} -> {}",
            tmp_path.display(),
            store_path.display()
        )
    })?;

    info!(
        "Store saved to {} ({} bytes, compression={})",
        store_path.display(),
        json_bytes.len(),
        should_compress
    );

    Ok(())
}

/// Loads the persisted entries, holding a shared lock while reading.
fn load_entries(options: &StoreOptions) -> Result<Option<BTreeMap<String, String>>> {
    let store_path = options.store_file_path();
    if !store_path.exists() {
        debug!(
            "No store file present at {}, starting empty",
            store_path.display()
        );
        return Ok(None);
    }

    let metadata = fs::metadata(&store_path)
        .with_context(|| format!("failed to stat store file {}", store_path.display()))?;
    if metadata.len() > options.max_file_size_bytes {
        warn!(
            "Store file {} is {} bytes which exceeds the configured limit ({} bytes); refusing to load",
            store_path.display(),
            metadata.len(),
            options.max_file_size_bytes
        );
        return Ok(None);
    }

    let lock_path = options.lock_file_path();
    let lock_file = open_lock_file(&lock_path)?;
    lock_file
        .lock_shared()
        .with_context(|| format!("failed to acquire shared lock {}", lock_path.display()))?;

    let result = load_entries_inner(&store_path);

    lock_file.unlock().unwrap_or_else(|err| {
        warn!("failed to unlock store file {}: {}", lock_path.display(), err)
    });

    Ok(result?.map(|loaded| loaded.entries))
}

pub(crate) fn load_entries_inner(store_path: &Path) -> Result<Option<LoadedEntries>> {
    let mut file_bytes = Vec::new();
    {
        let mut file = File::open(store_path)
            .with_context(|| format!("failed to open store file {}", store_path.display()))?;
        file.read_to_end(&mut file_bytes)
            .context("failed to read store file")?;
    }

    let compressed = is_gzip(&file_bytes);
    let decompressed = if compressed {
        let mut decoder = GzDecoder::new(&file_bytes[..]);
        let mut out = Vec::new();
        decoder
            .read_to_end(&mut out)
            .context("failed to decompress store file")?;
        out
    } else {
        file_bytes
    };

    let store_file: StoreFile =
        serde_json::from_slice(&decompressed).context("failed to parse store json")?;

    if store_file.version > CURRENT_VERSION {
        warn!(
            "Store file {} has version {} (newer than {}); reading known fields only",
            store_path.display(),
            store_file.version,
            CURRENT_VERSION
        );
    }

    if store_file.entries.is_empty() {
        debug!(
            "Loaded store file at {} but it contained no entries",
            store_path.display()
        );
        return Ok(None);
    }

    Ok(Some(LoadedEntries {
        entries: store_file.entries,
        compressed,
    }))
}

fn compress_bytes(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(data)
        .context("failed to compress store payload")?;
    encoder
        .finish()
        .context("failed to finalise compressed store payload")
}

fn is_gzip(bytes: &[u8]) -> bool {
    bytes.len() > 2 && bytes[0] == 0x1f && bytes[1] == 0x8b
}

fn temp_path(target: &Path) -> PathBuf {
    let mut candidate = target.with_extension("json.tmp");
    let mut counter = 0u32;
    while candidate.exists() {
        counter += 1;
        candidate = target.with_extension(format!("json.tmp{}", counter));
    }
    candidate
}
