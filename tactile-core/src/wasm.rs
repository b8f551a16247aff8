//! WebAssembly bindings for tactile-core.
//!
//! Commands return the [`ActionResult`](crate::ActionResult) serialized as JSON
//! so the browser shell can voice and vibrate from one object.

use wasm_bindgen::prelude::*;

use crate::svg::SvgOptions;
use crate::{CanvasDocument, CanvasSession, Direction, GridConfig, Position, SessionConfig};

/// Initialize the WASM module.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

fn to_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_default()
}

/// Painting session for JavaScript.
#[wasm_bindgen]
pub struct WasmSession {
    session: CanvasSession,
}

#[wasm_bindgen]
impl WasmSession {
    /// Create a session on an empty `width` by `height` canvas.
    ///
    /// # Errors
    ///
    /// Returns an error string for invalid dimensions.
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32) -> Result<WasmSession, String> {
        let grid = GridConfig::new(width, height).map_err(|e| e.to_string())?;
        let session =
            CanvasSession::with_config(grid, SessionConfig::default()).map_err(|e| e.to_string())?;
        Ok(Self { session })
    }

    /// Paint the focused cell.
    #[wasm_bindgen(js_name = paint)]
    pub fn paint(&mut self, color: &str) -> String {
        to_json(&self.session.paint(color))
    }

    /// Paint with the selected color.
    #[wasm_bindgen(js_name = paintSelected)]
    pub fn paint_selected(&mut self) -> String {
        to_json(&self.session.paint_selected())
    }

    /// Erase the focused cell.
    #[wasm_bindgen(js_name = erase)]
    pub fn erase(&mut self) -> String {
        to_json(&self.session.erase())
    }

    /// Move focus; `direction` is `up`, `down`, `left` or `right`.
    #[wasm_bindgen(js_name = moveFocus)]
    pub fn move_focus(&mut self, direction: &str) -> String {
        match Direction::from_name(direction) {
            Some(direction) => to_json(&self.session.move_focus(direction)),
            None => to_json(&crate::ActionResult::failed(crate::CanvasError::InvalidFormat(
                format!("unknown direction {direction:?}"),
            ))),
        }
    }

    /// Jump focus.
    #[wasm_bindgen(js_name = setFocus)]
    pub fn set_focus(&mut self, row: i32, col: i32) -> String {
        to_json(&self.session.set_focus(Position::new(row, col)))
    }

    /// Undo.
    #[wasm_bindgen(js_name = undo)]
    pub fn undo(&mut self) -> String {
        to_json(&self.session.undo())
    }

    /// Redo.
    #[wasm_bindgen(js_name = redo)]
    pub fn redo(&mut self) -> String {
        to_json(&self.session.redo())
    }

    /// Clear all cells.
    #[wasm_bindgen(js_name = clear)]
    pub fn clear(&mut self) -> String {
        to_json(&self.session.clear())
    }

    /// Open the color menu.
    #[wasm_bindgen(js_name = openColorMenu)]
    pub fn open_color_menu(&mut self) -> String {
        to_json(&self.session.open_color_menu())
    }

    /// Close the color menu without keeping the browsed color.
    #[wasm_bindgen(js_name = closeColorMenu)]
    pub fn close_color_menu(&mut self) -> String {
        to_json(&self.session.close_color_menu())
    }

    /// Next palette color.
    #[wasm_bindgen(js_name = nextColor)]
    pub fn next_color(&mut self) -> String {
        to_json(&self.session.next_color())
    }

    /// Previous palette color.
    #[wasm_bindgen(js_name = prevColor)]
    pub fn prev_color(&mut self) -> String {
        to_json(&self.session.prev_color())
    }

    /// Keep the previewed color.
    #[wasm_bindgen(js_name = confirmColor)]
    pub fn confirm_color(&mut self) -> String {
        to_json(&self.session.confirm_color())
    }

    /// Inspect the focused cell: `{row, col, color|null}`.
    #[wasm_bindgen(js_name = inspect)]
    #[must_use]
    pub fn inspect(&self) -> String {
        to_json(&self.session.inspect())
    }

    /// Keep the color from before the menu opened.
    #[wasm_bindgen(js_name = cancelColor)]
    pub fn cancel_color(&mut self) -> String {
        to_json(&self.session.cancel_color())
    }

    /// Select a color directly.
    #[wasm_bindgen(js_name = selectColor)]
    pub fn select_color(&mut self, color: &str) -> String {
        to_json(&self.session.select_color(color))
    }

    /// Feed a gesture event as JSON. Returns `null` when the gesture was
    /// dropped and an `InvalidFormat` failure when the JSON is malformed.
    #[wasm_bindgen(js_name = handleGesture)]
    pub fn handle_gesture(&mut self, event_json: &str) -> String {
        to_json(&self.session.handle_gesture_json(event_json))
    }

    /// Feed a JSON array of gestures that claimed the same touch; the
    /// highest-priority one is dispatched.
    #[wasm_bindgen(js_name = handleGestures)]
    pub fn handle_gestures(&mut self, events_json: &str) -> String {
        to_json(&self.session.handle_gestures_json(events_json))
    }

    /// Finger down that may become a hold.
    #[wasm_bindgen(js_name = pressBegan)]
    pub fn press_began(&mut self, timestamp_ms: u64) {
        self.session.press_began(timestamp_ms);
    }

    /// Call on each animation frame during a hold; returns `null` until the
    /// extended hold fires.
    #[wasm_bindgen(js_name = pressPoll)]
    pub fn press_poll(&mut self, now_ms: u64) -> String {
        to_json(&self.session.press_poll(now_ms))
    }

    /// Finger up after a hold.
    #[wasm_bindgen(js_name = pressEnded)]
    pub fn press_ended(&mut self, timestamp_ms: u64) -> String {
        to_json(&self.session.press_ended(timestamp_ms))
    }

    /// Another recognizer claimed the touch.
    #[wasm_bindgen(js_name = pressCancelled)]
    pub fn press_cancelled(&mut self) {
        self.session.press_cancelled();
    }

    /// Canonical JSON export.
    ///
    /// # Errors
    ///
    /// Returns an error string if serialization fails.
    #[wasm_bindgen(js_name = exportJson)]
    pub fn export_json(&self) -> Result<String, String> {
        self.session.export_json().map_err(|e| e.to_string())
    }

    /// Load an exported payload.
    #[wasm_bindgen(js_name = loadJson)]
    pub fn load_json(&mut self, json: &str) -> String {
        to_json(&self.session.load_json(json))
    }

    /// Load a stored document.
    #[wasm_bindgen(js_name = loadDocument)]
    pub fn load_document(&mut self, json: &str) -> String {
        let result = match CanvasDocument::from_json(json) {
            Ok(document) => self.session.load_document(&document),
            Err(err) => crate::ActionResult::failed(err),
        };
        to_json(&result)
    }

    /// Text description.
    #[wasm_bindgen(js_name = describe)]
    #[must_use]
    pub fn describe(&self) -> String {
        self.session.describe()
    }

    /// One-line summary.
    #[wasm_bindgen(js_name = summary)]
    #[must_use]
    pub fn summary(&self) -> String {
        self.session.summary()
    }

    /// SVG markup with default options.
    #[wasm_bindgen(js_name = toSvg)]
    #[must_use]
    pub fn to_svg(&self) -> String {
        self.session.to_svg(&SvgOptions::default())
    }
}
