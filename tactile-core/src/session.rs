//! # Canvas Session
//!
//! The single owner of one document's live state: the canvas, its undo history,
//! the color menu and the gesture mapper. Every command returns an
//! [`ActionResult`] for feedback collaborators to voice or vibrate; none of
//! them fail with a Rust error.
//!
//! ## History bracketing
//!
//! Paint, erase and clear capture a snapshot of the canvas before running and
//! push it only if the action succeeds. Navigation never touches history.
//!
//! ## Menu guard
//!
//! While the color menu is open it owns directional input, so focus changes and
//! paint are rejected with [`CanvasError::ColorMenuActive`].

use serde::{Deserialize, Serialize};

use crate::action::{
    clear_canvas, erase_cell, move_focus, move_focus_to_end, move_focus_to_home, paint_cell,
    set_focus, CanvasTransition,
};
use crate::describe::{describe_canvas, describe_context, describe_position, summarize};
use crate::document::CanvasDocument;
use crate::export::{export_canvas, load_canvas, ExportedCanvas};
use crate::gesture::{GestureConfig, GestureEvent, InputMode, Intent, IntentMapper};
use crate::history::{CanvasSnapshot, HistoryState, DEFAULT_MAX_HISTORY};
use crate::menu::{ColorMenuState, MenuTransition};
use crate::svg::{to_svg, SvgOptions};
use crate::{
    ActionResult, CanvasError, CanvasResult, CanvasState, Color, Direction, GridConfig, Position,
};

/// Session tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Undo depth.
    pub max_history_size: usize,
    /// Color selected when the session starts.
    pub default_color: String,
    /// Gesture thresholds.
    pub gesture: GestureConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_history_size: DEFAULT_MAX_HISTORY,
            default_color: Color::default().as_str().to_string(),
            gesture: GestureConfig::default(),
        }
    }
}

/// Read-only report of the focused cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Inspection {
    /// Focus row.
    pub row: i32,
    /// Focus column.
    pub col: i32,
    /// Paint at the focus, `None` when empty.
    pub color: Option<Color>,
}

/// Live state for one document.
#[derive(Debug, Clone)]
pub struct CanvasSession {
    canvas: CanvasState,
    history: HistoryState,
    menu: ColorMenuState,
    mapper: IntentMapper,
}

impl CanvasSession {
    /// Start a session on an empty canvas with default settings.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::InvalidDimension`] for an invalid grid.
    pub fn new(grid: GridConfig) -> CanvasResult<Self> {
        Self::with_config(grid, SessionConfig::default())
    }

    /// Start a session on an empty canvas.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::InvalidDimension`] for an invalid grid or
    /// [`CanvasError::InvalidColor`] for a bad default color.
    pub fn with_config(grid: GridConfig, config: SessionConfig) -> CanvasResult<Self> {
        Self::from_canvas(CanvasState::new(grid)?, config)
    }

    /// Start a session on an existing canvas.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::InvalidColor`] for a bad default color.
    pub fn from_canvas(canvas: CanvasState, config: SessionConfig) -> CanvasResult<Self> {
        let color = Color::parse(&config.default_color)?;
        let grid = canvas.config();
        tracing::info!(width = grid.width, height = grid.height, "canvas session started");
        Ok(Self {
            canvas,
            history: HistoryState::new(config.max_history_size),
            menu: ColorMenuState::new(color),
            mapper: IntentMapper::new(config.gesture),
        })
    }

    /// The live canvas.
    #[must_use]
    pub const fn canvas(&self) -> &CanvasState {
        &self.canvas
    }

    /// Undo/redo stacks.
    #[must_use]
    pub const fn history(&self) -> &HistoryState {
        &self.history
    }

    /// Color menu state.
    #[must_use]
    pub const fn menu(&self) -> &ColorMenuState {
        &self.menu
    }

    /// Color used by [`CanvasSession::paint_selected`].
    #[must_use]
    pub const fn selected_color(&self) -> &Color {
        self.menu.selected_color()
    }

    /// Current focus.
    #[must_use]
    pub const fn focus(&self) -> Position {
        self.canvas.focus()
    }

    /// Whether undo is available.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Whether redo is available.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Which surface owns gestures.
    #[must_use]
    pub const fn mode(&self) -> InputMode {
        if self.menu.is_open() {
            InputMode::Menu
        } else {
            InputMode::Canvas
        }
    }

    fn log(command: &str, result: &ActionResult) {
        if result.is_success() {
            tracing::debug!(command, message = result.message(), "command applied");
        } else {
            tracing::debug!(command, message = result.message(), "command rejected");
        }
    }

    fn menu_guard(&self) -> Option<ActionResult> {
        self.menu
            .is_open()
            .then(|| ActionResult::failed(CanvasError::ColorMenuActive))
    }

    /// Run a destructive action with history bracketing.
    fn apply_recorded(
        &mut self,
        command: &str,
        action: impl FnOnce(&CanvasState) -> CanvasTransition,
    ) -> ActionResult {
        let snapshot = CanvasSnapshot::capture(&self.canvas);
        let transition = action(&self.canvas);
        if transition.is_success() {
            self.history.push_undo(snapshot);
            self.canvas = transition.state;
        }
        Self::log(command, &transition.result);
        transition.result
    }

    /// Run a focus change, subject to the menu guard.
    fn apply_navigation(
        &mut self,
        command: &str,
        action: impl FnOnce(&CanvasState) -> CanvasTransition,
    ) -> ActionResult {
        if let Some(rejected) = self.menu_guard() {
            Self::log(command, &rejected);
            return rejected;
        }
        let transition = action(&self.canvas);
        if transition.is_success() {
            self.canvas = transition.state;
        }
        Self::log(command, &transition.result);
        transition.result
    }

    fn apply_menu(&mut self, command: &str, transition: MenuTransition) -> ActionResult {
        if transition.is_success() {
            self.menu = transition.state;
        }
        Self::log(command, &transition.result);
        transition.result
    }

    /// Paint the focused cell with `color`.
    pub fn paint(&mut self, color: &str) -> ActionResult {
        if let Some(rejected) = self.menu_guard() {
            Self::log("paint", &rejected);
            return rejected;
        }
        self.apply_recorded("paint", |canvas| paint_cell(canvas, color))
    }

    /// Paint the focused cell with the selected color.
    pub fn paint_selected(&mut self) -> ActionResult {
        let color = self.menu.selected_color().as_str().to_string();
        self.paint(&color)
    }

    /// Erase the focused cell.
    pub fn erase(&mut self) -> ActionResult {
        self.apply_recorded("erase", erase_cell)
    }

    /// Remove every cell. An already empty canvas records no history.
    pub fn clear(&mut self) -> ActionResult {
        if self.canvas.is_empty() {
            let transition = clear_canvas(&self.canvas);
            Self::log("clear", &transition.result);
            return transition.result;
        }
        self.apply_recorded("clear", clear_canvas)
    }

    /// Move focus one cell.
    pub fn move_focus(&mut self, direction: Direction) -> ActionResult {
        self.apply_navigation("move", |canvas| move_focus(canvas, direction))
    }

    /// Jump focus to `position`.
    pub fn set_focus(&mut self, position: Position) -> ActionResult {
        self.apply_navigation("set_focus", |canvas| set_focus(canvas, position))
    }

    /// Jump focus to the top-left cell.
    pub fn home(&mut self) -> ActionResult {
        self.apply_navigation("home", move_focus_to_home)
    }

    /// Jump focus to the bottom-right cell.
    pub fn end(&mut self) -> ActionResult {
        self.apply_navigation("end", move_focus_to_end)
    }

    /// Step back one recorded change.
    pub fn undo(&mut self) -> ActionResult {
        let transition = self.history.undo(&self.canvas);
        self.canvas = transition.state;
        Self::log("undo", &transition.result);
        transition.result
    }

    /// Re-apply the last undone change.
    pub fn redo(&mut self) -> ActionResult {
        let transition = self.history.redo(&self.canvas);
        self.canvas = transition.state;
        Self::log("redo", &transition.result);
        transition.result
    }

    /// Open the color menu.
    pub fn open_color_menu(&mut self) -> ActionResult {
        let transition = self.menu.open();
        self.apply_menu("open_color_menu", transition)
    }

    /// Close the color menu without keeping the browsed color.
    pub fn close_color_menu(&mut self) -> ActionResult {
        self.cancel_color()
    }

    /// Open the menu when closed, cancel it when open.
    pub fn toggle_color_menu(&mut self) -> ActionResult {
        if self.menu.is_open() {
            self.cancel_color()
        } else {
            self.open_color_menu()
        }
    }

    /// Preview the next palette color.
    pub fn next_color(&mut self) -> ActionResult {
        let transition = self.menu.next();
        self.apply_menu("next_color", transition)
    }

    /// Preview the previous palette color.
    pub fn prev_color(&mut self) -> ActionResult {
        let transition = self.menu.prev();
        self.apply_menu("prev_color", transition)
    }

    /// Keep the previewed color.
    pub fn confirm_color(&mut self) -> ActionResult {
        let transition = self.menu.confirm();
        self.apply_menu("confirm_color", transition)
    }

    /// Restore the color from before the menu opened.
    pub fn cancel_color(&mut self) -> ActionResult {
        let transition = self.menu.cancel();
        self.apply_menu("cancel_color", transition)
    }

    /// Select any valid color directly (menu closed).
    pub fn select_color(&mut self, color: &str) -> ActionResult {
        let transition = self.menu.select(color);
        self.apply_menu("select_color", transition)
    }

    /// Report the focused cell.
    #[must_use]
    pub fn inspect(&self) -> Inspection {
        let focus = self.canvas.focus();
        Inspection {
            row: focus.row,
            col: focus.col,
            color: self.canvas.get_cell_color(focus).cloned(),
        }
    }

    /// [`CanvasSession::inspect`] as a spoken result.
    #[must_use]
    pub fn inspect_result(&self) -> ActionResult {
        let focus = self.canvas.focus();
        ActionResult::at(
            describe_position(&self.canvas, focus),
            focus,
            self.canvas.get_cell_color(focus).cloned(),
        )
    }

    /// Full spoken context for the extended hold.
    #[must_use]
    pub fn announce_context(&self) -> ActionResult {
        ActionResult::at(
            describe_context(&self.canvas, &self.menu),
            self.canvas.focus(),
            Some(self.menu.selected_color().clone()),
        )
    }

    /// Replace the canvas, dropping history and closing the menu.
    fn replace_canvas(&mut self, canvas: CanvasState) -> ActionResult {
        if self.menu.is_open() {
            self.menu = self.menu.cancel().state;
        }
        self.history.clear();
        self.mapper.reset();
        self.canvas = canvas;
        let config = self.canvas.config();
        tracing::info!(
            width = config.width,
            height = config.height,
            cells = self.canvas.painted_count(),
            "canvas loaded"
        );
        ActionResult::at(
            format!(
                "Loaded {} by {} canvas, {}",
                config.width,
                config.height,
                summarize(&self.canvas)
            ),
            self.canvas.focus(),
            None,
        )
    }

    /// Start over on an empty canvas of a new size.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::InvalidDimension`] for an invalid grid; the
    /// session is unchanged.
    pub fn reset(&mut self, grid: GridConfig) -> CanvasResult<ActionResult> {
        let canvas = CanvasState::new(grid)?;
        Ok(self.replace_canvas(canvas))
    }

    /// Load an exported JSON payload. On failure the session is unchanged.
    pub fn load_json(&mut self, json: &str) -> ActionResult {
        match load_canvas(json) {
            Ok(canvas) => self.replace_canvas(canvas),
            Err(err) => {
                tracing::warn!(error = %err, "rejected canvas payload");
                ActionResult::failed(err)
            }
        }
    }

    /// Load a stored document, focus included. On failure the session is
    /// unchanged.
    pub fn load_document(&mut self, document: &CanvasDocument) -> ActionResult {
        match document.to_canvas() {
            Ok(canvas) => self.replace_canvas(canvas),
            Err(err) => {
                tracing::warn!(error = %err, id = %document.id, "rejected document");
                ActionResult::failed(err)
            }
        }
    }

    /// Canonical export.
    #[must_use]
    pub fn export(&self) -> ExportedCanvas {
        export_canvas(&self.canvas)
    }

    /// Canonical export as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::InvalidFormat`] if serialization fails.
    pub fn export_json(&self) -> CanvasResult<String> {
        self.export().to_json()
    }

    /// Wrap the canvas as a new named document.
    #[must_use]
    pub fn to_document(&self, name: &str) -> CanvasDocument {
        CanvasDocument::from_canvas(name, &self.canvas)
    }

    /// Text description.
    #[must_use]
    pub fn describe(&self) -> String {
        describe_canvas(&self.canvas)
    }

    /// One-line summary.
    #[must_use]
    pub fn summary(&self) -> String {
        summarize(&self.canvas)
    }

    /// SVG markup.
    #[must_use]
    pub fn to_svg(&self, options: &SvgOptions) -> String {
        to_svg(&self.canvas, options)
    }

    /// Route an intent to its command. `Unknown` is ignored.
    pub fn dispatch(&mut self, intent: Intent) -> Option<ActionResult> {
        let result = match intent {
            Intent::MoveUp | Intent::MoveDown | Intent::MoveLeft | Intent::MoveRight => {
                let direction = intent.direction()?;
                self.move_focus(direction)
            }
            Intent::Paint => self.paint_selected(),
            Intent::Erase => self.erase(),
            Intent::Inspect => self.inspect_result(),
            Intent::Undo => self.undo(),
            Intent::Redo => self.redo(),
            Intent::Menu => self.toggle_color_menu(),
            Intent::Home => self.home(),
            Intent::Announce => self.announce_context(),
            Intent::ColorMenuNext => self.next_color(),
            Intent::ColorMenuPrev => self.prev_color(),
            Intent::ColorMenuConfirm => self.confirm_color(),
            Intent::ColorMenuCancel => self.cancel_color(),
            Intent::Unknown => return None,
        };
        Some(result)
    }

    /// Map a gesture in the current mode and dispatch it.
    pub fn handle_gesture(&mut self, event: &GestureEvent) -> Option<ActionResult> {
        let intent = self.mapper.process(event, self.mode())?;
        self.dispatch(intent)
    }

    /// Arbitrate gestures that claimed the same input, then dispatch the winner.
    pub fn handle_gestures(&mut self, events: &[GestureEvent]) -> Option<ActionResult> {
        let intent = self.mapper.resolve(events, self.mode())?;
        self.dispatch(intent)
    }

    /// Decode one gesture event from JSON and handle it.
    ///
    /// Malformed input yields an [`CanvasError::InvalidFormat`] failure so it
    /// can be told apart from a dropped gesture (`None`).
    pub fn handle_gesture_json(&mut self, json: &str) -> Option<ActionResult> {
        match serde_json::from_str::<GestureEvent>(json) {
            Ok(event) => self.handle_gesture(&event),
            Err(err) => Some(Self::rejected_input(err)),
        }
    }

    /// Decode a JSON array of competing gesture events and arbitrate them.
    pub fn handle_gestures_json(&mut self, json: &str) -> Option<ActionResult> {
        match serde_json::from_str::<Vec<GestureEvent>>(json) {
            Ok(events) => self.handle_gestures(&events),
            Err(err) => Some(Self::rejected_input(err)),
        }
    }

    fn rejected_input(err: serde_json::Error) -> ActionResult {
        tracing::warn!(error = %err, "rejected gesture input");
        ActionResult::failed(err.into())
    }

    /// Finger down that may become a hold.
    pub fn press_began(&mut self, timestamp_ms: u64) {
        self.mapper.press_began(timestamp_ms);
    }

    /// Drive an ongoing hold; dispatches the announce once its threshold passes.
    pub fn press_poll(&mut self, now_ms: u64) -> Option<ActionResult> {
        let intent = self.mapper.press_poll(now_ms)?;
        self.dispatch(intent)
    }

    /// Finger up after a hold.
    pub fn press_ended(&mut self, timestamp_ms: u64) -> Option<ActionResult> {
        let intent = self.mapper.press_ended(timestamp_ms)?;
        self.dispatch(intent)
    }

    /// Another recognizer claimed the hold.
    pub fn press_cancelled(&mut self) {
        self.mapper.press_cancelled();
    }
}
