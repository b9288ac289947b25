//! Snapshot-based undo/redo history.
//!
//! Every completed mutation of the canvas stores a full [`Raster`] copy. The log
//! keeps snapshots oldest-to-newest in a ring buffer with an integer cursor
//! marking the snapshot currently shown on the surface. Pushing after an undo
//! discards everything newer than the cursor, so the timeline stays linear.

use crate::draw::Raster;
use std::collections::VecDeque;

/// Identity of a snapshot; strictly increasing in insertion order.
pub type SnapshotId = u64;

/// An immutable full-canvas copy captured at one point in the timeline.
#[derive(Debug, Clone)]
pub struct HistorySnapshot {
    id: SnapshotId,
    raster: Raster,
}

impl HistorySnapshot {
    pub fn id(&self) -> SnapshotId {
        self.id
    }

    pub fn raster(&self) -> &Raster {
        &self.raster
    }
}

/// Result of moving the cursor.
#[derive(Debug)]
pub enum Step<'a> {
    /// The cursor moved; the snapshot now visible.
    Moved(&'a HistorySnapshot),
    /// Undo requested with the cursor on the oldest snapshot.
    AtOldest,
    /// Redo requested with the cursor on the newest snapshot.
    AtNewest,
}

/// Linear snapshot history with a cursor.
///
/// Invariant: `snapshots` is never empty and `cursor < snapshots.len()`.
#[derive(Debug)]
pub struct HistoryLog {
    snapshots: VecDeque<HistorySnapshot>,
    cursor: usize,
    next_id: SnapshotId,
    /// Maximum number of snapshots retained (0 = unbounded)
    max_depth: usize,
}

impl HistoryLog {
    /// Creates a log holding only `blank`, with the cursor on it.
    pub fn new(blank: Raster, max_depth: usize) -> Self {
        Self {
            snapshots: VecDeque::from([HistorySnapshot { id: 0, raster: blank }]),
            cursor: 0,
            next_id: 1,
            max_depth,
        }
    }

    /// Appends `raster` right after the cursor and moves the cursor onto it.
    ///
    /// Snapshots newer than the old cursor are dropped permanently. When the
    /// configured depth is exceeded the oldest snapshots are evicted.
    pub fn push(&mut self, raster: Raster) -> &HistorySnapshot {
        let discarded = self.snapshots.len() - (self.cursor + 1);
        if discarded > 0 {
            log::debug!("Discarding {} redo snapshot(s)", discarded);
            self.snapshots.truncate(self.cursor + 1);
        }

        let id = self.next_id;
        self.next_id += 1;
        self.snapshots.push_back(HistorySnapshot { id, raster });

        if self.max_depth > 0 {
            while self.snapshots.len() > self.max_depth {
                if let Some(evicted) = self.snapshots.pop_front() {
                    log::debug!(
                        "History depth limit {} reached; evicted snapshot {}",
                        self.max_depth,
                        evicted.id
                    );
                }
            }
        }

        self.cursor = self.snapshots.len() - 1;
        &self.snapshots[self.cursor]
    }

    /// Moves the cursor one snapshot older.
    pub fn undo(&mut self) -> Step<'_> {
        if self.cursor == 0 {
            return Step::AtOldest;
        }
        self.cursor -= 1;
        Step::Moved(&self.snapshots[self.cursor])
    }

    /// Moves the cursor one snapshot newer.
    pub fn redo(&mut self) -> Step<'_> {
        if self.cursor + 1 >= self.snapshots.len() {
            return Step::AtNewest;
        }
        self.cursor += 1;
        Step::Moved(&self.snapshots[self.cursor])
    }

    /// The snapshot at the cursor.
    pub fn current(&self) -> &HistorySnapshot {
        &self.snapshots[self.cursor]
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.snapshots.len()
    }

    /// Number of snapshots held, including the cursor's.
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Always false; the log holds at least one snapshot.
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Zero-based index of the cursor.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }
}
