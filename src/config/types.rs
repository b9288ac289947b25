//! Configuration type definitions.

use super::enums::{ColorSpec, ResizePolicy, SessionCompression, SessionStorageMode};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Stroke defaults and limits.
///
/// Controls the style a fresh session starts with. Values persisted by a previous
/// session (`lineColor`, `lineWeight`) take precedence when present.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct DrawingConfig {
    /// Default stroke color - a named color, `#rrggbb`, or an RGB array like `[255, 0, 0]`
    #[serde(default = "default_color")]
    pub default_color: ColorSpec,

    /// Default stroke width in pixels (clamped to `min_width..=max_width`)
    #[serde(default = "default_width")]
    pub default_width: u32,

    /// Smallest selectable stroke width
    #[serde(default = "default_min_width")]
    pub min_width: u32,

    /// Largest selectable stroke width
    #[serde(default = "default_max_width")]
    pub max_width: u32,
}

impl Default for DrawingConfig {
    fn default() -> Self {
        Self {
            default_color: default_color(),
            default_width: default_width(),
            min_width: default_min_width(),
            max_width: default_max_width(),
        }
    }
}

/// Canvas sizing.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct CanvasConfig {
    /// Initial canvas width in pixels (minimum 1)
    #[serde(default = "default_canvas_width")]
    pub width: i32,

    /// Initial canvas height in pixels (minimum 1)
    #[serde(default = "default_canvas_height")]
    pub height: i32,

    /// Whether a resize restores the last persisted drawing or starts blank
    #[serde(default)]
    pub resize_policy: ResizePolicy,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: default_canvas_width(),
            height: default_canvas_height(),
            resize_policy: ResizePolicy::default(),
        }
    }
}

/// Undo/redo history limits.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct HistoryConfig {
    /// Maximum snapshots kept in memory; the oldest are evicted first (0 = unlimited)
    ///
    /// Every snapshot is a full copy of the canvas, so memory grows with
    /// `width * height * 4 * max_depth`.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
        }
    }
}

/// Document export settings.
#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct ExportConfig {
    /// Directory for exported documents (defaults to `~/Documents/Inkpad`)
    #[serde(default)]
    pub directory: Option<String>,
}

/// Persistence of style and the visible drawing across restarts.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct SessionConfig {
    /// Write style and drawing to disk so the next launch restores them
    #[serde(default = "default_persist")]
    pub persist: bool,

    /// Where the store file lives
    #[serde(default)]
    pub storage: SessionStorageMode,

    /// Directory used when `storage = "custom"`
    #[serde(default)]
    pub custom_directory: Option<String>,

    /// Gzip the store file
    #[serde(default)]
    pub compress: SessionCompression,

    /// Payload size that triggers compression in `auto` mode
    #[serde(default = "default_auto_compress_threshold_kb")]
    pub auto_compress_threshold_kb: u64,

    /// Store files larger than this are neither written nor loaded
    #[serde(default = "default_max_file_size_mb")]
    pub max_file_size_mb: u64,

    /// Number of previous store files kept as `.bak` (0 disables backups)
    #[serde(default = "default_backup_retention")]
    pub backup_retention: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            persist: default_persist(),
            storage: SessionStorageMode::default(),
            custom_directory: None,
            compress: SessionCompression::default(),
            auto_compress_threshold_kb: default_auto_compress_threshold_kb(),
            max_file_size_mb: default_max_file_size_mb(),
            backup_retention: default_backup_retention(),
        }
    }
}

// =============================================================================
// Default value functions
// =============================================================================

fn default_color() -> ColorSpec {
    ColorSpec::Name("#000000".to_string())
}

fn default_width() -> u32 {
    1
}

fn default_min_width() -> u32 {
    1
}

fn default_max_width() -> u32 {
    15
}

fn default_canvas_width() -> i32 {
    800
}

fn default_canvas_height() -> i32 {
    600
}

fn default_max_depth() -> usize {
    100
}

fn default_persist() -> bool {
    true
}

fn default_auto_compress_threshold_kb() -> u64 {
    100
}

fn default_max_file_size_mb() -> u64 {
    32
}

fn default_backup_retention() -> usize {
    1
}
