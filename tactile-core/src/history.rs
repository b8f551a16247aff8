//! Snapshot-based undo/redo.
//!
//! ## Model
//!
//! ```text
//! push_undo(s)   undo_stack: [.. s]        redo_stack: []
//! undo()         undo_stack: [..]          redo_stack: [.. current]
//! redo()         undo_stack: [.. current]  redo_stack: [..]
//! ```
//!
//! History is linear: any new push clears the redo stack. The undo stack is
//! bounded and evicts from the oldest end.

use std::collections::VecDeque;

use crate::action::{ActionResult, CanvasTransition, Transition};
use crate::grid::CellMap;
use crate::{CanvasError, CanvasState, GridConfig, Position};

/// Default bound on the undo stack.
pub const DEFAULT_MAX_HISTORY: usize = 50;

/// Current Unix timestamp in milliseconds.
#[cfg(not(target_arch = "wasm32"))]
pub(crate) fn current_timestamp_ms() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};

    SystemTime::now().duration_since(UNIX_EPOCH).map_or(0, |d| {
        // Timestamp will not exceed u64 max for millennia
        #[allow(clippy::cast_possible_truncation)]
        {
            d.as_millis() as u64
        }
    })
}

/// wasm32-unknown-unknown has no system clock; browser callers pass timestamps in.
#[cfg(target_arch = "wasm32")]
pub(crate) fn current_timestamp_ms() -> u64 {
    0
}

/// Immutable capture of focus and cells at a point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanvasSnapshot {
    focus: Position,
    cells: CellMap,
    timestamp: u64,
}

impl CanvasSnapshot {
    /// Capture a canvas now.
    #[must_use]
    pub fn capture(canvas: &CanvasState) -> Self {
        Self::capture_at(canvas, current_timestamp_ms())
    }

    /// Capture a canvas with an explicit timestamp.
    #[must_use]
    pub fn capture_at(canvas: &CanvasState, timestamp: u64) -> Self {
        Self {
            focus: canvas.focus(),
            cells: canvas.clone_cells(),
            timestamp,
        }
    }

    /// Captured focus.
    #[must_use]
    pub const fn focus(&self) -> Position {
        self.focus
    }

    /// Captured cells.
    #[must_use]
    pub fn cells(&self) -> &CellMap {
        &self.cells
    }

    /// Capture time in milliseconds since the epoch.
    #[must_use]
    pub const fn timestamp(&self) -> u64 {
        self.timestamp
    }

    /// Rebuild a canvas from this snapshot. The snapshot itself is not consumed.
    #[must_use]
    pub fn restore(&self, config: GridConfig) -> CanvasState {
        let cells = self
            .cells
            .iter()
            .map(|(key, cell)| (*key, cell.clone()))
            .collect();
        CanvasState::from_parts(config, self.focus, cells)
    }

    /// Whether the snapshot holds exactly this canvas's focus and cells.
    #[must_use]
    pub fn matches(&self, canvas: &CanvasState) -> bool {
        self.focus == canvas.focus() && &self.cells == canvas.cells()
    }
}

/// Bounded undo and redo stacks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryState {
    /// Oldest first.
    undo_stack: VecDeque<CanvasSnapshot>,
    /// Oldest first.
    redo_stack: Vec<CanvasSnapshot>,
    max_history_size: usize,
}

impl HistoryState {
    /// Create empty history holding at most `max_history_size` undo steps
    /// (at least one).
    #[must_use]
    pub fn new(max_history_size: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            max_history_size: max_history_size.max(1),
        }
    }

    /// Maximum undo depth.
    #[must_use]
    pub const fn max_history_size(&self) -> usize {
        self.max_history_size
    }

    /// Number of undo steps available.
    #[must_use]
    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    /// Number of redo steps available.
    #[must_use]
    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    /// Whether undo is possible.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Whether redo is possible.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Record the state before a new action. Invalidates redo.
    pub fn push_undo(&mut self, snapshot: CanvasSnapshot) {
        self.push_bounded(snapshot);
        self.redo_stack.clear();
    }

    fn push_bounded(&mut self, snapshot: CanvasSnapshot) {
        self.undo_stack.push_back(snapshot);
        while self.undo_stack.len() > self.max_history_size {
            self.undo_stack.pop_front();
        }
    }

    /// Step back to the most recent snapshot.
    pub fn undo(&mut self, canvas: &CanvasState) -> CanvasTransition {
        let Some(snapshot) = self.undo_stack.pop_back() else {
            return Transition::new(
                canvas.clone(),
                ActionResult::failed(CanvasError::NothingToUndo),
            );
        };
        self.redo_stack.push(CanvasSnapshot::capture(canvas));
        let restored = snapshot.restore(canvas.config());
        let focus = restored.focus();
        tracing::debug!(remaining = self.undo_stack.len(), "undo applied");
        Transition::new(
            restored,
            ActionResult::at(format!("Undone, focus at {focus}"), focus, None),
        )
    }

    /// Re-apply the most recently undone snapshot.
    pub fn redo(&mut self, canvas: &CanvasState) -> CanvasTransition {
        let Some(snapshot) = self.redo_stack.pop() else {
            return Transition::new(
                canvas.clone(),
                ActionResult::failed(CanvasError::NothingToRedo),
            );
        };
        self.push_bounded(CanvasSnapshot::capture(canvas));
        let restored = snapshot.restore(canvas.config());
        let focus = restored.focus();
        tracing::debug!(remaining = self.redo_stack.len(), "redo applied");
        Transition::new(
            restored,
            ActionResult::at(format!("Redone, focus at {focus}"), focus, None),
        )
    }

    /// Drop all history.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

impl Default for HistoryState {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_HISTORY)
    }
}
