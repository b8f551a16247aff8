//! Error types for canvas operations.

use serde::Serialize;
use thiserror::Error;

use crate::grid::MAX_GRID_DIMENSION;

/// Result type for canvas operations.
pub type CanvasResult<T> = Result<T, CanvasError>;

/// Errors that can occur in canvas operations.
///
/// Apart from [`CanvasError::InvalidDimension`] raised at construction time, every
/// variant is a recoverable condition that is reported inside an
/// [`ActionResult`](crate::ActionResult) rather than propagated.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", content = "detail")]
pub enum CanvasError {
    /// Grid width or height is zero or exceeds the supported maximum.
    #[error("Invalid grid dimensions {width}x{height}: each side must be between 1 and {MAX_GRID_DIMENSION}")]
    InvalidDimension {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },

    /// Color is neither a hex triplet/sextet nor a known color name.
    #[error("Invalid color: {0}")]
    InvalidColor(String),

    /// A focus change would leave the grid.
    #[error("Edge reached: {0}")]
    BoundaryReached(String),

    /// The undo stack is empty.
    #[error("Nothing to undo")]
    NothingToUndo,

    /// The redo stack is empty.
    #[error("Nothing to redo")]
    NothingToRedo,

    /// A menu transition was requested while the color menu is closed.
    #[error("Color menu is not open")]
    MenuNotOpen,

    /// The color menu was opened twice.
    #[error("Color menu is already open")]
    MenuAlreadyOpen,

    /// A move or paint arrived while the color menu owns directional input.
    #[error("Color menu is open")]
    ColorMenuActive,

    /// Erase was requested on an unpainted cell.
    #[error("Nothing to erase at row {row}, column {col}")]
    CellNotPainted {
        /// Row of the focused cell.
        row: i32,
        /// Column of the focused cell.
        col: i32,
    },

    /// A payload could not be decoded or failed validation.
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// A payload was written by a newer exporter.
    #[error("Unsupported version {found} (newest supported is {supported})")]
    UnsupportedVersion {
        /// Version found in the payload.
        found: u64,
        /// Newest version this build understands.
        supported: u32,
    },
}

impl From<serde_json::Error> for CanvasError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidFormat(err.to_string())
    }
}
