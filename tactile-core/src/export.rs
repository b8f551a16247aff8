//! Canonical JSON export and import.
//!
//! The export holds dimensions and cells sorted by `(row, col)`. Focus and menu
//! state are UI-only and left out. Imports check the version before anything
//! else so a newer payload is reported as such rather than as malformed.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::grid::{Cell, CellKey, CellMap};
use crate::history::current_timestamp_ms;
use crate::{CanvasError, CanvasResult, CanvasState, GridConfig, Position};

/// Newest export version this build reads and the one it writes.
pub const EXPORT_VERSION: u32 = 1;

/// Serialized canvas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportedCanvas {
    /// Format version.
    pub version: u32,
    /// Export time in milliseconds since the epoch.
    pub exported_at: u64,
    /// Dimensions and cells.
    pub canvas: ExportedGrid,
}

/// Dimensions and canonical cell list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportedGrid {
    /// Number of columns.
    pub width: u32,
    /// Number of rows.
    pub height: u32,
    /// Painted cells, sorted by `(row, col)`.
    pub cells: Vec<Cell>,
}

impl ExportedCanvas {
    /// Pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::InvalidFormat`] if serialization fails.
    pub fn to_json(&self) -> CanvasResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Validate and rebuild a canvas with focus at the origin.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::UnsupportedVersion`] for a newer version and
    /// [`CanvasError::InvalidFormat`] for bad dimensions or cells.
    pub fn into_canvas(self) -> CanvasResult<CanvasState> {
        ensure_supported(u64::from(self.version))?;
        let config = GridConfig {
            width: self.canvas.width,
            height: self.canvas.height,
        };
        build_canvas(config, Position::default(), self.canvas.cells)
    }
}

/// Export with the current time.
#[must_use]
pub fn export_canvas(canvas: &CanvasState) -> ExportedCanvas {
    export_canvas_at(canvas, current_timestamp_ms())
}

/// Export with an explicit timestamp.
#[must_use]
pub fn export_canvas_at(canvas: &CanvasState, exported_at: u64) -> ExportedCanvas {
    let config = canvas.config();
    ExportedCanvas {
        version: EXPORT_VERSION,
        exported_at,
        canvas: ExportedGrid {
            width: config.width,
            height: config.height,
            cells: canvas.sorted_cells().into_iter().cloned().collect(),
        },
    }
}

/// Export straight to JSON.
///
/// # Errors
///
/// Returns [`CanvasError::InvalidFormat`] if serialization fails.
pub fn export_json(canvas: &CanvasState) -> CanvasResult<String> {
    export_canvas(canvas).to_json()
}

/// Parse an exported payload.
///
/// # Errors
///
/// Returns [`CanvasError::UnsupportedVersion`] if the payload is newer than
/// [`EXPORT_VERSION`], otherwise [`CanvasError::InvalidFormat`] for anything
/// that is not a well-formed, in-bounds canvas.
pub fn load_canvas(json: &str) -> CanvasResult<CanvasState> {
    let value: Value = serde_json::from_str(json)?;
    check_version(&value)?;
    let exported: ExportedCanvas = serde_json::from_value(value)?;
    exported.into_canvas()
}

/// Read and check the top-level `version` field of a raw payload.
pub(crate) fn check_version(value: &Value) -> CanvasResult<()> {
    let version = value
        .get("version")
        .and_then(Value::as_u64)
        .ok_or_else(|| CanvasError::InvalidFormat("missing or non-integer version".to_string()))?;
    ensure_supported(version)
}

pub(crate) fn ensure_supported(version: u64) -> CanvasResult<()> {
    if version > u64::from(EXPORT_VERSION) {
        return Err(CanvasError::UnsupportedVersion {
            found: version,
            supported: EXPORT_VERSION,
        });
    }
    if version == 0 {
        return Err(CanvasError::InvalidFormat("version must be at least 1".to_string()));
    }
    Ok(())
}

/// Assemble a canvas from decoded parts, rejecting out-of-bounds or repeated cells.
pub(crate) fn build_canvas(
    config: GridConfig,
    focus: Position,
    cells: Vec<Cell>,
) -> CanvasResult<CanvasState> {
    config
        .validate()
        .map_err(|err| CanvasError::InvalidFormat(err.to_string()))?;
    if !config.contains(focus) {
        return Err(CanvasError::InvalidFormat(format!("focus {focus} is out of bounds")));
    }

    let mut seen = HashSet::with_capacity(cells.len());
    let mut map = CellMap::with_capacity(cells.len());
    for cell in cells {
        let pos = cell.position();
        if !config.contains(pos) {
            return Err(CanvasError::InvalidFormat(format!("cell at {pos} is out of bounds")));
        }
        let key = CellKey::from(pos);
        if !seen.insert(key) {
            return Err(CanvasError::InvalidFormat(format!("duplicate cell at {pos}")));
        }
        map.insert(key, cell);
    }
    Ok(CanvasState::from_parts(config, focus, map))
}
