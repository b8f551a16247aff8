//! Named canvas documents exchanged with a storage collaborator.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::export::{build_canvas, check_version, ensure_supported, EXPORT_VERSION};
use crate::grid::Cell;
use crate::history::current_timestamp_ms;
use crate::{CanvasError, CanvasResult, CanvasState, GridConfig, Position};

/// Unique identifier for a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(Uuid);

impl DocumentId {
    /// Create a new random ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Parse the hyphenated string form.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::InvalidFormat`] if `value` is not a UUID.
    pub fn parse(value: &str) -> CanvasResult<Self> {
        Uuid::parse_str(value)
            .map(Self)
            .map_err(|e| CanvasError::InvalidFormat(format!("invalid document id {value:?}: {e}")))
    }
}

impl Default for DocumentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Canvas body of a document. Unlike the export, focus is kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentCanvas {
    /// Number of columns.
    pub width: u32,
    /// Number of rows.
    pub height: u32,
    /// Focus when saved.
    pub focus: Position,
    /// Painted cells, sorted by `(row, col)`.
    pub cells: Vec<Cell>,
}

/// A persisted, named canvas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanvasDocument {
    /// Document identifier.
    pub id: DocumentId,
    /// Display name.
    pub name: String,
    /// Format version.
    pub version: u32,
    /// Last save time in milliseconds since the epoch.
    pub timestamp: u64,
    /// Canvas content.
    pub canvas: DocumentCanvas,
}

impl CanvasDocument {
    /// Wrap a canvas under an existing ID.
    #[must_use]
    pub fn new(id: DocumentId, name: impl Into<String>, canvas: &CanvasState) -> Self {
        let config = canvas.config();
        Self {
            id,
            name: name.into(),
            version: EXPORT_VERSION,
            timestamp: current_timestamp_ms(),
            canvas: DocumentCanvas {
                width: config.width,
                height: config.height,
                focus: canvas.focus(),
                cells: canvas.sorted_cells().into_iter().cloned().collect(),
            },
        }
    }

    /// Wrap a canvas under a fresh ID.
    #[must_use]
    pub fn from_canvas(name: impl Into<String>, canvas: &CanvasState) -> Self {
        Self::new(DocumentId::new(), name, canvas)
    }

    /// Same document with new content and a fresh timestamp.
    #[must_use]
    pub fn with_canvas(&self, canvas: &CanvasState) -> Self {
        Self::new(self.id, self.name.clone(), canvas)
    }

    /// Parse and strictly validate a document.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::UnsupportedVersion`] for a newer version and
    /// [`CanvasError::InvalidFormat`] for any missing, mistyped or
    /// inconsistent field.
    pub fn from_json(json: &str) -> CanvasResult<Self> {
        let value: Value = serde_json::from_str(json)?;
        check_version(&value)?;
        let document: Self = serde_json::from_value(value)?;
        document.validate()?;
        Ok(document)
    }

    /// Pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::InvalidFormat`] if serialization fails.
    pub fn to_json(&self) -> CanvasResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Semantic checks beyond the typed decode.
    ///
    /// # Errors
    ///
    /// See [`CanvasDocument::from_json`].
    pub fn validate(&self) -> CanvasResult<()> {
        self.to_canvas().map(|_| ())
    }

    /// Rebuild the canvas, focus included.
    ///
    /// # Errors
    ///
    /// See [`CanvasDocument::from_json`].
    pub fn to_canvas(&self) -> CanvasResult<CanvasState> {
        ensure_supported(u64::from(self.version))?;
        if self.name.trim().is_empty() {
            return Err(CanvasError::InvalidFormat("document name is empty".to_string()));
        }
        let config = GridConfig {
            width: self.canvas.width,
            height: self.canvas.height,
        };
        build_canvas(config, self.canvas.focus, self.canvas.cells.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{move_focus, paint_cell};
    use crate::Direction;

    fn canvas() -> CanvasState {
        let canvas = CanvasState::new(GridConfig::new(5, 5).expect("config")).expect("canvas");
        let painted = paint_cell(&canvas, "green").state;
        move_focus(&painted, Direction::Down).state
    }

    #[test]
    fn test_document_round_trip_keeps_focus() {
        let original = canvas();
        let doc = CanvasDocument::from_canvas("Sketch", &original);
        let json = doc.to_json().expect("json");
        let parsed = CanvasDocument::from_json(&json).expect("parse");
        assert_eq!(parsed, doc);
        assert_eq!(parsed.to_canvas().expect("canvas"), original);
    }

    #[test]
    fn test_with_canvas_keeps_identity() {
        let doc = CanvasDocument::from_canvas("Sketch", &canvas());
        let blank = CanvasState::new(GridConfig::new(5, 5).expect("config")).expect("canvas");
        let updated = doc.with_canvas(&blank);
        assert_eq!(updated.id, doc.id);
        assert_eq!(updated.name, "Sketch");
        assert!(updated.canvas.cells.is_empty());
    }

    #[test]
    fn test_document_id_parse() {
        let id = DocumentId::new();
        assert_eq!(DocumentId::parse(&id.to_string()).expect("parse"), id);
        assert!(matches!(
            DocumentId::parse("nope"),
            Err(CanvasError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_strict_validation() {
        let id = DocumentId::new();
        let body = |canvas: &str| {
            format!(r#"{{"id":"{id}","name":"a","version":1,"timestamp":0,"canvas":{canvas}}}"#)
        };
        let bad = [
            body(r#"{"width":3,"height":3,"cells":[]}"#),
            body(r#"{"width":3,"height":3,"focus":{"row":3,"col":0},"cells":[]}"#),
            body(r#"{"width":3,"height":3,"focus":{"row":0,"col":0},"cells":[{"row":0,"col":9,"color":"red"}]}"#),
            body(r#"{"width":3,"height":3,"focus":{"row":0,"col":0},"cells":"none"}"#),
            format!(r#"{{"id":"{id}","version":1,"timestamp":0,"canvas":{{}}}}"#),
            format!(r#"{{"id":"x","name":"a","version":1,"timestamp":0,"canvas":{{}}}}"#),
            format!(
                r#"{{"id":"{id}","name":" ","version":1,"timestamp":0,"canvas":{{"width":3,"height":3,"focus":{{"row":0,"col":0}},"cells":[]}}}}"#
            ),
        ];
        for json in &bad {
            assert!(
                matches!(CanvasDocument::from_json(json), Err(CanvasError::InvalidFormat(_))),
                "accepted: {json}"
            );
        }

        let good = body(r#"{"width":3,"height":3,"focus":{"row":2,"col":2},"cells":[]}"#);
        assert!(CanvasDocument::from_json(&good).is_ok());

        let newer = format!(r#"{{"id":"{id}","name":"a","version":7,"timestamp":0}}"#);
        assert!(matches!(
            CanvasDocument::from_json(&newer),
            Err(CanvasError::UnsupportedVersion { found: 7, .. })
        ));
    }

    #[test]
    fn test_version_checked_without_json() {
        let mut doc = CanvasDocument::from_canvas("Sketch", &canvas());
        doc.version = 0;
        assert!(matches!(doc.validate(), Err(CanvasError::InvalidFormat(_))));
        assert!(matches!(doc.to_canvas(), Err(CanvasError::InvalidFormat(_))));

        doc.version = EXPORT_VERSION + 1;
        assert!(matches!(doc.validate(), Err(CanvasError::UnsupportedVersion { .. })));
    }
}
