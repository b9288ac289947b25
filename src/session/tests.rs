use super::*;
use crate::config::{SessionConfig, SessionStorageMode};
use crate::draw::color::{BLACK, BLUE};
use crate::input::StyleState;
use std::path::PathBuf;

fn temp_options(profile: &str) -> (tempfile::TempDir, StoreOptions) {
    let temp = tempfile::tempdir().unwrap();
    let options = StoreOptions::new(temp.path().to_path_buf(), profile);
    (temp, options)
}

#[test]
fn file_store_round_trips_entries() {
    let (_temp, options) = temp_options("roundtrip");

    let mut store = FileStore::open(options.clone()).unwrap();
    store.set(LINE_COLOR_KEY, "#ff0000".to_string()).unwrap();
    store.set(LINE_WEIGHT_KEY, "7".to_string()).unwrap();
    assert!(options.store_file_path().exists());

    let reopened = FileStore::open(options).unwrap();
    assert_eq!(reopened.get(LINE_COLOR_KEY).as_deref(), Some("#ff0000"));
    assert_eq!(reopened.get(LINE_WEIGHT_KEY).as_deref(), Some("7"));
    assert_eq!(reopened.keys(), vec![LINE_COLOR_KEY, LINE_WEIGHT_KEY]);
}

#[test]
fn file_store_rotates_previous_file_into_backup() {
    let (_temp, options) = temp_options("backup");

    let mut store = FileStore::open(options.clone()).unwrap();
    store.set("a", "1".to_string()).unwrap();
    assert!(!options.backup_file_path().exists());
    store.set("a", "2".to_string()).unwrap();
    assert!(options.backup_file_path().exists());
}

#[test]
fn file_store_skips_backup_when_retention_is_zero() {
    let (_temp, mut options) = temp_options("nobackup");
    options.backup_retention = 0;

    let mut store = FileStore::open(options.clone()).unwrap();
    store.set("a", "1".to_string()).unwrap();
    store.set("a", "2".to_string()).unwrap();
    assert!(options.store_file_path().exists());
    assert!(!options.backup_file_path().exists());
}

#[test]
fn file_store_writes_gzip_when_compression_forced() {
    let (_temp, mut options) = temp_options("gzip");
    options.compression = CompressionMode::On;

    let mut store = FileStore::open(options.clone()).unwrap();
    store.set("key", "value".to_string()).unwrap();

    let bytes = std::fs::read(options.store_file_path()).unwrap();
    assert_eq!(&bytes[..2], &[0x1f, 0x8b]);

    let reopened = FileStore::open(options).unwrap();
    assert_eq!(reopened.get("key").as_deref(), Some("value"));
}

#[test]
fn file_store_removes_file_once_empty() {
    let (_temp, options) = temp_options("empty");

    let mut store = FileStore::open(options.clone()).unwrap();
    store.set("only", "x".to_string()).unwrap();
    assert!(options.store_file_path().exists());

    assert!(store.remove("only").unwrap());
    assert!(!store.remove("only").unwrap());
    assert!(!options.store_file_path().exists());
}

#[test]
fn file_store_skips_oversized_payloads() {
    let (_temp, mut options) = temp_options("oversized");
    options.max_file_size_bytes = 16;

    let mut store = FileStore::open(options.clone()).unwrap();
    store
        .set(CURRENT_DRAWING_KEY, "x".repeat(256))
        .unwrap();
    assert!(!options.store_file_path().exists());
    assert!(store.get(CURRENT_DRAWING_KEY).is_some());
}

#[test]
fn file_store_rejects_corrupt_file() {
    let (_temp, options) = temp_options("corrupt");
    std::fs::write(options.store_file_path(), b"{ not json").unwrap();
    assert!(FileStore::open(options).is_err());
}

#[test]
fn options_from_config_custom_storage() {
    let temp = tempfile::tempdir().unwrap();
    let custom_dir = temp.path().join("stores");

    let mut cfg = SessionConfig::default();
    cfg.storage = SessionStorageMode::Custom;
    cfg.custom_directory = Some(custom_dir.to_string_lossy().to_string());
    cfg.backup_retention = 0;

    let options = options_from_config(&cfg, temp.path(), Some("display-1")).unwrap();
    assert_eq!(options.base_dir, custom_dir);
    assert_eq!(options.backup_retention, 0);
    assert_eq!(
        options
            .store_file_path()
            .file_name()
            .unwrap()
            .to_string_lossy(),
        "drawing-display_1.json"
    );
}

#[test]
fn options_from_config_config_storage_uses_config_dir() {
    let temp = tempfile::tempdir().unwrap();

    let mut cfg = SessionConfig::default();
    cfg.storage = SessionStorageMode::Config;
    cfg.max_file_size_mb = 2;

    let options = options_from_config(&cfg, temp.path(), None).unwrap();
    assert_eq!(options.base_dir, temp.path());
    assert_eq!(options.max_file_size_bytes, 2 * 1024 * 1024);
    assert_eq!(options.compression, CompressionMode::Auto);
    assert_eq!(
        options
            .store_file_path()
            .file_name()
            .unwrap()
            .to_string_lossy(),
        "drawing-default.json"
    );
}

#[test]
fn options_from_config_custom_requires_directory() {
    let mut cfg = SessionConfig::default();
    cfg.storage = SessionStorageMode::Custom;
    assert!(options_from_config(&cfg, &PathBuf::from("/tmp"), None).is_err());
}

#[test]
fn clear_store_reports_removed_files() {
    let (_temp, options) = temp_options("clear");

    let mut store = FileStore::open(options.clone()).unwrap();
    store.set("a", "1".to_string()).unwrap();
    store.set("a", "2".to_string()).unwrap();

    let outcome = clear_store(&options).unwrap();
    assert!(outcome.removed_store);
    assert!(outcome.removed_backup);
    assert!(outcome.removed_lock);

    let again = clear_store(&options).unwrap();
    assert!(!again.removed_store);
    assert!(!again.removed_backup);
    assert!(!again.removed_lock);
}

#[test]
fn inspect_store_summarises_entries() {
    let (_temp, options) = temp_options("inspect");

    let missing = inspect_store(&options).unwrap();
    assert!(!missing.exists);
    assert!(missing.keys.is_empty());

    let mut store = FileStore::open(options.clone()).unwrap();
    store.set(LINE_COLOR_KEY, "#0000ff".to_string()).unwrap();
    store.set(LINE_WEIGHT_KEY, "3".to_string()).unwrap();
    store
        .set(CURRENT_DRAWING_KEY, encode_data_url(b"\x89PNG"))
        .unwrap();

    let inspection = inspect_store(&options).unwrap();
    assert!(inspection.exists);
    assert!(inspection.size_bytes.unwrap() > 0);
    assert!(inspection.backup_exists);
    assert_eq!(inspection.keys.len(), 3);
    assert_eq!(inspection.line_color.as_deref(), Some("#0000ff"));
    assert_eq!(inspection.line_weight.as_deref(), Some("3"));
    assert!(inspection.drawing_bytes.unwrap() > 0);
    assert!(!inspection.compressed);
}

#[test]
fn restore_style_applies_valid_entries() {
    let store = MemoryStore::with_entries([(LINE_COLOR_KEY, "#0000ff"), (LINE_WEIGHT_KEY, "9")]);
    let mut style = StyleState::new(BLACK, 1, 1, 15);
    restore_style(&store, &mut style);
    assert_eq!(style.color(), BLUE);
    assert_eq!(style.width(), 9);
}

#[test]
fn restore_style_ignores_malformed_entries() {
    let mut style = StyleState::new(BLACK, 1, 1, 15);
    for (color, weight) in [("blue-ish", "abc"), ("#12345", "0"), ("", "-4"), ("#zzzzzz", "2.5")] {
        let store = MemoryStore::with_entries([(LINE_COLOR_KEY, color), (LINE_WEIGHT_KEY, weight)]);
        restore_style(&store, &mut style);
        assert_eq!(style.color(), BLACK);
        assert_eq!(style.width(), 1);
    }
}

#[test]
fn restore_style_clamps_large_weight() {
    let store = MemoryStore::with_entries([(LINE_WEIGHT_KEY, "99")]);
    let mut style = StyleState::new(BLACK, 1, 1, 15);
    restore_style(&store, &mut style);
    assert_eq!(style.width(), 15);
}

#[test]
fn save_style_writes_both_keys() {
    let mut store = MemoryStore::new();
    let mut style = StyleState::new(BLACK, 1, 1, 15);
    style.set_color(BLUE);
    style.set_width(4);
    save_style(&mut store, &style).unwrap();
    assert_eq!(store.get(LINE_COLOR_KEY).as_deref(), Some("#0000ff"));
    assert_eq!(store.get(LINE_WEIGHT_KEY).as_deref(), Some("4"));
}

#[test]
fn drawing_entry_is_a_png_data_url() {
    let mut store = MemoryStore::new();
    save_drawing(&mut store, b"\x89PNG\r\n").unwrap();
    let raw = store.get(CURRENT_DRAWING_KEY).unwrap();
    assert!(raw.starts_with("data:image/png;base64,"));
    assert_eq!(load_drawing(&store).unwrap(), b"\x89PNG\r\n");
}

#[test]
fn malformed_drawing_entry_is_ignored() {
    let store = MemoryStore::with_entries([(CURRENT_DRAWING_KEY, "data:image/jpeg;base64,AAAA")]);
    assert!(load_drawing(&store).is_none());
    assert!(decode_data_url("data:image/png;base64,@@@").is_none());
}
