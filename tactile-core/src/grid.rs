//! Grid model: dimensions, positions, painted cells and the canvas state.
//!
//! The canvas is sparse. Only painted cells are stored, keyed by a packed
//! `(row, col)` integer so point lookups stay O(1).

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{CanvasError, CanvasResult, Color};

/// Largest supported width or height.
pub const MAX_GRID_DIMENSION: u32 = 256;

/// Grid dimensions, fixed for the lifetime of a canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridConfig {
    /// Number of columns.
    pub width: u32,
    /// Number of rows.
    pub height: u32,
}

impl GridConfig {
    /// Create a validated grid configuration.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::InvalidDimension`] if either side is zero or larger
    /// than [`MAX_GRID_DIMENSION`].
    pub fn new(width: u32, height: u32) -> CanvasResult<Self> {
        let config = Self { width, height };
        config.validate()?;
        Ok(config)
    }

    /// Check the dimension bounds.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::InvalidDimension`] on a zero or oversized side.
    pub fn validate(self) -> CanvasResult<()> {
        let in_range = |side: u32| (1..=MAX_GRID_DIMENSION).contains(&side);
        if in_range(self.width) && in_range(self.height) {
            Ok(())
        } else {
            Err(CanvasError::InvalidDimension {
                width: self.width,
                height: self.height,
            })
        }
    }

    /// Whether `pos` lies inside the grid.
    #[must_use]
    pub fn contains(self, pos: Position) -> bool {
        pos.row >= 0
            && pos.col >= 0
            && i64::from(pos.row) < i64::from(self.height)
            && i64::from(pos.col) < i64::from(self.width)
    }

    /// Total number of cells.
    #[must_use]
    pub fn cell_count(self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Bottom-right position.
    #[must_use]
    #[allow(clippy::cast_possible_wrap)] // bounded by MAX_GRID_DIMENSION
    pub fn last_position(self) -> Position {
        Position::new(self.height as i32 - 1, self.width as i32 - 1)
    }
}

/// A grid coordinate.
///
/// Signed so that a candidate one step past an edge is representable; every
/// position held as focus or cell coordinate is inside the grid.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Position {
    /// Row index, 0 at the top.
    pub row: i32,
    /// Column index, 0 at the left.
    pub col: i32,
}

impl Position {
    /// Create a position.
    #[must_use]
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "row {}, column {}", self.row, self.col)
    }
}

/// Packed `(row, col)` map key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellKey(u64);

impl From<Position> for CellKey {
    #[allow(clippy::cast_sign_loss)]
    fn from(pos: Position) -> Self {
        Self((u64::from(pos.row as u32) << 32) | u64::from(pos.col as u32))
    }
}

impl CellKey {
    /// Unpack back into a position.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub fn position(self) -> Position {
        Position::new((self.0 >> 32) as u32 as i32, self.0 as u32 as i32)
    }
}

impl fmt::Display for CellKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pos = self.position();
        write!(f, "{},{}", pos.row, pos.col)
    }
}

/// A painted cell.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    /// Row index.
    pub row: i32,
    /// Column index.
    pub col: i32,
    /// Paint color.
    pub color: Color,
}

impl Cell {
    /// Create a cell at a position.
    #[must_use]
    pub fn new(pos: Position, color: Color) -> Self {
        Self {
            row: pos.row,
            col: pos.col,
            color,
        }
    }

    /// The cell's position.
    #[must_use]
    pub const fn position(&self) -> Position {
        Position::new(self.row, self.col)
    }
}

/// Sparse cell storage.
pub type CellMap = HashMap<CellKey, Cell>;

/// The complete painting surface: dimensions, focus and painted cells.
///
/// Values are never mutated by the action layer; each action yields a new state so
/// earlier states stay valid for history and change detection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanvasState {
    config: GridConfig,
    focus: Position,
    cells: CellMap,
}

impl CanvasState {
    /// Create an empty canvas with focus at the top-left corner.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::InvalidDimension`] if the configuration is invalid.
    pub fn new(config: GridConfig) -> CanvasResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            focus: Position::default(),
            cells: CellMap::new(),
        })
    }

    /// Assemble a state from already validated parts.
    pub(crate) fn from_parts(config: GridConfig, focus: Position, cells: CellMap) -> Self {
        debug_assert!(config.contains(focus));
        Self {
            config,
            focus,
            cells,
        }
    }

    /// Grid dimensions.
    #[must_use]
    pub const fn config(&self) -> GridConfig {
        self.config
    }

    /// Current focus.
    #[must_use]
    pub const fn focus(&self) -> Position {
        self.focus
    }

    /// Read-only view of the painted cells.
    #[must_use]
    pub fn cells(&self) -> &CellMap {
        &self.cells
    }

    /// Whether `pos` lies inside this canvas.
    #[must_use]
    pub fn is_valid_position(&self, pos: Position) -> bool {
        self.config.contains(pos)
    }

    /// Cell at `pos`, if painted.
    #[must_use]
    pub fn get_cell(&self, pos: Position) -> Option<&Cell> {
        self.cells.get(&CellKey::from(pos))
    }

    /// Color at `pos`, if painted.
    #[must_use]
    pub fn get_cell_color(&self, pos: Position) -> Option<&Color> {
        self.get_cell(pos).map(|cell| &cell.color)
    }

    /// Whether `pos` is painted.
    #[must_use]
    pub fn is_cell_painted(&self, pos: Position) -> bool {
        self.cells.contains_key(&CellKey::from(pos))
    }

    /// Number of painted cells.
    #[must_use]
    pub fn painted_count(&self) -> usize {
        self.cells.len()
    }

    /// Whether no cell is painted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Fully independent copy of the cell map.
    #[must_use]
    pub fn clone_cells(&self) -> CellMap {
        self.cells
            .iter()
            .map(|(key, cell)| (*key, cell.clone()))
            .collect()
    }

    /// Painted cells in canonical `(row, col)` order.
    #[must_use]
    pub fn sorted_cells(&self) -> Vec<&Cell> {
        let mut cells: Vec<_> = self.cells.values().collect();
        cells.sort_by_key(|cell| cell.position());
        cells
    }

    /// A copy with every cell removed and the same focus.
    #[must_use]
    pub fn cleared(&self) -> Self {
        Self::from_parts(self.config, self.focus, CellMap::new())
    }

    pub(crate) fn with_focus(&self, focus: Position) -> Self {
        Self::from_parts(self.config, focus, self.clone_cells())
    }

    pub(crate) fn with_cells(&self, cells: CellMap) -> Self {
        Self::from_parts(self.config, self.focus, cells)
    }
}
