//! # Tactile Canvas Core
//!
//! Canvas state engine for painting on a grid without seeing the screen.
//! Compiles to WASM; performs no I/O, rendering or speech.
//!
//! ## Architecture
//!
//! ```text
//! gesture ──▶ IntentMapper ──▶ CanvasSession::dispatch
//!                                   │
//!              ┌────────────────────┼─────────────────────┐
//!              ▼                    ▼                     ▼
//!        action (pure)        ColorMenuState        HistoryState
//!              │                                    (snapshots)
//!              ▼
//!        CanvasState ──▶ export / document / describe / svg
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod action;
pub mod color;
pub mod describe;
pub mod document;
pub mod error;
pub mod export;
pub mod gesture;
pub mod grid;
pub mod history;
pub mod menu;
pub mod session;
pub mod svg;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use action::{ActionResult, CanvasTransition, Direction, Transition};
pub use color::{color_label, color_name, is_valid_color, Color, PALETTE};
pub use describe::{describe_canvas, describe_context, summarize};
pub use document::{CanvasDocument, DocumentId};
pub use error::{CanvasError, CanvasResult};
pub use export::{export_canvas, load_canvas, ExportedCanvas, EXPORT_VERSION};
pub use gesture::{GestureConfig, GestureEvent, GestureInput, InputMode, Intent, IntentMapper};
pub use grid::{CanvasState, Cell, GridConfig, Position, MAX_GRID_DIMENSION};
pub use history::{CanvasSnapshot, HistoryState};
pub use menu::ColorMenuState;
pub use session::{CanvasSession, Inspection, SessionConfig};
pub use svg::{to_svg, SvgOptions};

/// Tactile core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
