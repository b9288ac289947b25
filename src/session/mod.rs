//! Persistence across restarts.
//!
//! Style and the visible drawing are kept in a string key-value store. The
//! on-disk store writes a JSON document with locking, optional compression, and
//! backup rotation; an in-memory store is used when persistence is disabled.

mod file_store;
mod options;
mod persist;
mod storage;
mod store;

pub use file_store::FileStore;
pub use options::{
    CompressionMode, DEFAULT_AUTO_COMPRESS_THRESHOLD_BYTES, StoreOptions, options_from_config,
};
pub use persist::{
    CURRENT_DRAWING_KEY, LINE_COLOR_KEY, LINE_WEIGHT_KEY, decode_data_url, encode_data_url,
    load_drawing, restore_style, save_drawing, save_style,
};
pub use storage::{ClearOutcome, StoreInspection, clear_store, inspect_store};
pub use store::{KeyValueStore, MemoryStore};

#[cfg(test)]
mod tests;
