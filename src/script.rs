//! Replaying recorded pointer and editing steps against a drawing session.
//!
//! A script is a TOML document with an optional canvas `origin` and a list of
//! `[[step]]` tables, each naming an `action`:
//!
//! ```toml
//! origin = { x = 100.0, y = 200.0 }
//!
//! [[step]]
//! action = "width"
//! value = 4
//!
//! [[step]]
//! action = "down"
//! x = 110.0
//! y = 210.0
//!
//! [[step]]
//! action = "move"
//! x = 180.0
//! y = 260.0
//!
//! [[step]]
//! action = "up"
//! ```
//!
//! Pointer coordinates are in viewport space and are mapped through the origin
//! in effect when the step runs; an `origin` step moves the canvas.

use crate::export::{ExportedDocument, Exporter};
use crate::input::{DrawingSession, HistoryMove, PaintMode, PointerEvent};
use crate::util::Point;
use anyhow::{Context, Result};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// A parsed drawing script.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Script {
    /// Canvas top-left corner in viewport space at the start of the script
    #[serde(default)]
    pub origin: Point,

    #[serde(default, rename = "step")]
    pub steps: Vec<ScriptStep>,
}

/// One scripted action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum ScriptStep {
    /// Move the canvas within the viewport
    Origin { x: f64, y: f64 },
    Down { x: f64, y: f64 },
    Move { x: f64, y: f64 },
    Up,
    Leave,
    /// Stroke color as `#rrggbb` or a color name
    Color { value: String },
    Width { value: i64 },
    /// Grow or shrink the stroke width by `delta`
    AdjustWidth { delta: i32 },
    Mode { value: PaintMode },
    Undo,
    Redo,
    Clear,
    Resize { width: i32, height: i32 },
    /// Export the canvas as it currently looks
    Export,
}

/// Summary of a script run.
#[derive(Debug, Default)]
pub struct ScriptReport {
    pub steps_run: usize,
    pub undo_boundaries: usize,
    pub exports: Vec<ExportedDocument>,
}

impl Script {
    /// Loads and parses a script file.
    pub fn load(path: &Path) -> Result<Self> {
        let source = fs::read_to_string(path)
            .with_context(|| format!("Failed to read script {}", path.display()))?;
        Self::parse(&source).with_context(|| format!("Failed to parse script {}", path.display()))
    }

    pub fn parse(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }
}

/// Replays every step of `script` against `session`.
///
/// `export` steps need an exporter; without one they are skipped with a
/// warning. Export failures abort the run.
pub fn run_script(
    session: &mut DrawingSession,
    script: &Script,
    exporter: Option<&Exporter>,
) -> Result<ScriptReport> {
    let mut origin = script.origin;
    let mut report = ScriptReport::default();

    for (index, step) in script.steps.iter().enumerate() {
        debug!("Script step {}: {:?}", index + 1, step);
        match step {
            ScriptStep::Origin { x, y } => origin = Point::new(*x, *y),
            ScriptStep::Down { x, y } => session.handle_pointer(PointerEvent::down(*x, *y), origin),
            ScriptStep::Move { x, y } => {
                session.handle_pointer(PointerEvent::moved(*x, *y), origin)
            }
            ScriptStep::Up => session.on_pointer_up(),
            ScriptStep::Leave => session.on_pointer_leave(),
            ScriptStep::Color { value } if value.starts_with('#') => {
                session.set_color_hex(value);
            }
            ScriptStep::Color { value } => match crate::util::name_to_color(value) {
                Some(color) => {
                    session.set_color(color);
                }
                None => warn!("Step {}: unknown color '{}'", index + 1, value),
            },
            ScriptStep::Width { value } => {
                session.set_width((*value).clamp(0, u32::MAX as i64) as u32);
            }
            ScriptStep::AdjustWidth { delta } => {
                session.adjust_width(*delta);
            }
            ScriptStep::Mode { value } => {
                session.set_mode(*value);
            }
            ScriptStep::Undo => {
                if session.undo() == HistoryMove::AtOldest {
                    report.undo_boundaries += 1;
                }
            }
            ScriptStep::Redo => {
                if session.redo() == HistoryMove::AtNewest {
                    report.undo_boundaries += 1;
                }
            }
            ScriptStep::Clear => {
                session.clear();
            }
            ScriptStep::Resize { width, height } => {
                session.resize(*width, *height);
            }
            ScriptStep::Export => match exporter {
                Some(exporter) => {
                    let document = session
                        .export(exporter)
                        .with_context(|| format!("Export failed at script step {}", index + 1))?;
                    report.exports.push(document);
                }
                None => warn!("Step {}: no export directory configured; skipping", index + 1),
            },
        }
        report.steps_run += 1;
    }

    if session.finish_stroke() {
        debug!("Script ended mid-stroke; stroke finished");
    }

    info!(
        "Script finished: {} step(s), {} export(s)",
        report.steps_run,
        report.exports.len()
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::draw::color::BLUE;
    use crate::session::{KeyValueStore, LINE_COLOR_KEY, LINE_WEIGHT_KEY, MemoryStore};

    fn session(width: i32, height: i32) -> DrawingSession {
        let mut config = Config::default();
        config.canvas.width = width;
        config.canvas.height = height;
        DrawingSession::new(&config, Box::new(MemoryStore::new()))
    }

    #[test]
    fn parses_every_step_kind() {
        let script = Script::parse(
            r##"
            origin = { x = 5, y = 5.5 }

            [[step]]
            action = "origin"
            x = 1
            y = 2

            [[step]]
            action = "down"
            x = 10
            y = 10

            [[step]]
            action = "move"
            x = 20.5
            y = 10

            [[step]]
            action = "up"

            [[step]]
            action = "leave"

            [[step]]
            action = "color"
            value = "#00ff00"

            [[step]]
            action = "width"
            value = 3

            [[step]]
            action = "adjust-width"
            delta = -2

            [[step]]
            action = "mode"
            value = "erase"

            [[step]]
            action = "undo"

            [[step]]
            action = "redo"

            [[step]]
            action = "clear"

            [[step]]
            action = "resize"
            width = 40
            height = 30

            [[step]]
            action = "export"
            "##,
        )
        .unwrap();

        assert_eq!(script.origin, Point::new(5.0, 5.5));
        assert_eq!(script.steps.len(), 14);
        assert_eq!(script.steps[0], ScriptStep::Origin { x: 1.0, y: 2.0 });
        assert_eq!(script.steps[2], ScriptStep::Move { x: 20.5, y: 10.0 });
        assert_eq!(script.steps[7], ScriptStep::AdjustWidth { delta: -2 });
        assert_eq!(
            script.steps[8],
            ScriptStep::Mode {
                value: PaintMode::Erase
            }
        );
        assert_eq!(
            script.steps[12],
            ScriptStep::Resize {
                width: 40,
                height: 30
            }
        );
        assert_eq!(script.steps[13], ScriptStep::Export);
    }

    #[test]
    fn rejects_unknown_actions() {
        let err = Script::parse("[[step]]\naction = \"smudge\"\n").unwrap_err();
        assert!(err.to_string().contains("smudge"));
    }

    #[test]
    fn replays_strokes_through_origin() {
        let script = Script::parse(
            r##"
            origin = { x = 100, y = 200 }

            [[step]]
            action = "color"
            value = "blue"

            [[step]]
            action = "width"
            value = 5

            [[step]]
            action = "down"
            x = 110
            y = 220

            [[step]]
            action = "move"
            x = 190
            y = 220

            [[step]]
            action = "up"
            "##,
        )
        .unwrap();

        let mut session = session(100, 100);
        let report = run_script(&mut session, &script, None).unwrap();
        assert_eq!(report.steps_run, 5);
        assert_eq!(session.style().color(), BLUE);

        let raster = session.raster().unwrap();
        assert_eq!(raster.alpha(50, 20), 255);
        assert_eq!(session.history().unwrap().len(), 2);
    }

    #[test]
    fn width_adjustments_and_hex_colors_update_persisted_style() {
        let script = Script::parse(
            r##"
            [[step]]
            action = "width"
            value = 4

            [[step]]
            action = "adjust-width"
            delta = 3

            [[step]]
            action = "adjust-width"
            delta = -100

            [[step]]
            action = "adjust-width"
            delta = 2

            [[step]]
            action = "color"
            value = "#00ff00"

            [[step]]
            action = "color"
            value = "#zzz"
            "##,
        )
        .unwrap();

        let mut session = session(20, 20);
        let report = run_script(&mut session, &script, None).unwrap();
        assert_eq!(report.steps_run, 6);
        assert_eq!(session.style().width(), 3);
        assert_eq!(session.style().color().to_hex(), "#00ff00");
        assert_eq!(
            session.store().get(LINE_WEIGHT_KEY).as_deref(),
            Some("3")
        );
        assert_eq!(
            session.store().get(LINE_COLOR_KEY).as_deref(),
            Some("#00ff00")
        );
    }

    #[test]
    fn unfinished_stroke_is_committed_at_end() {
        let script = Script::parse(
            r##"
            [[step]]
            action = "down"
            x = 10
            y = 10

            [[step]]
            action = "move"
            x = 30
            y = 10
            "##,
        )
        .unwrap();

        let mut session = session(50, 50);
        run_script(&mut session, &script, None).unwrap();
        assert!(!session.is_stroking());
        assert_eq!(session.history().unwrap().len(), 2);
    }

    #[test]
    fn counts_history_boundaries_and_exports() {
        let script = Script::parse(
            r##"
            [[step]]
            action = "undo"

            [[step]]
            action = "redo"

            [[step]]
            action = "export"
            "##,
        )
        .unwrap();

        let temp = tempfile::tempdir().unwrap();
        let exporter = Exporter::new(temp.path());
        let mut session = session(30, 20);
        let report = run_script(&mut session, &script, Some(&exporter)).unwrap();

        assert_eq!(report.undo_boundaries, 2);
        assert_eq!(report.exports.len(), 1);
        assert_eq!(report.exports[0].layout.width, 30.0);
        assert!(report.exports[0].path.exists());
    }
}
