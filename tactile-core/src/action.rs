//! Pure state transitions on a [`CanvasState`].
//!
//! Every function takes the current state by reference and returns a
//! [`Transition`] holding the next state and an [`ActionResult`]. Failed actions
//! return an unchanged copy of the input. Nothing here touches history.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::color::color_name;
use crate::describe::{count_phrase, describe_position};
use crate::grid::{Cell, CellKey};
use crate::{CanvasError, CanvasState, Color, Position};

/// Focus movement direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Towards row 0.
    Up,
    /// Towards the last row.
    Down,
    /// Towards column 0.
    Left,
    /// Towards the last column.
    Right,
}

impl Direction {
    /// All directions in a fixed order.
    pub const ALL: [Self; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    /// Parse a lowercase direction name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "up" => Some(Self::Up),
            "down" => Some(Self::Down),
            "left" => Some(Self::Left),
            "right" => Some(Self::Right),
            _ => None,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
        })
    }
}

/// Outcome of a command, reported to feedback collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ActionResult {
    /// The command took effect.
    Success {
        /// Text suitable for speech output.
        message: String,
        /// Position the command acted on.
        #[serde(skip_serializing_if = "Option::is_none")]
        position: Option<Position>,
        /// Color involved in the command.
        #[serde(skip_serializing_if = "Option::is_none")]
        color: Option<Color>,
    },
    /// The command was rejected; state is unchanged.
    Failure {
        /// Why it was rejected.
        error: CanvasError,
        /// Text suitable for speech output.
        message: String,
    },
}

impl ActionResult {
    /// A success carrying only a message.
    #[must_use]
    pub fn ok(message: impl Into<String>) -> Self {
        Self::Success {
            message: message.into(),
            position: None,
            color: None,
        }
    }

    /// A success at a position, optionally with a color.
    #[must_use]
    pub fn at(message: impl Into<String>, position: Position, color: Option<Color>) -> Self {
        Self::Success {
            message: message.into(),
            position: Some(position),
            color,
        }
    }

    /// A failure whose message is the error's display text.
    #[must_use]
    pub fn failed(error: CanvasError) -> Self {
        let message = error.to_string();
        Self::Failure { error, message }
    }

    /// Whether the command took effect.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Message for either outcome.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Success { message, .. } | Self::Failure { message, .. } => message,
        }
    }

    /// Position, for successes that carry one.
    #[must_use]
    pub const fn position(&self) -> Option<Position> {
        match self {
            Self::Success { position, .. } => *position,
            Self::Failure { .. } => None,
        }
    }

    /// Color, for successes that carry one.
    #[must_use]
    pub fn color(&self) -> Option<&Color> {
        match self {
            Self::Success { color, .. } => color.as_ref(),
            Self::Failure { .. } => None,
        }
    }

    /// Error, for failures.
    #[must_use]
    pub const fn error(&self) -> Option<&CanvasError> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { error, .. } => Some(error),
        }
    }
}

/// The next state together with the result that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition<T> {
    /// State after the action (an unchanged copy on failure).
    pub state: T,
    /// What happened.
    pub result: ActionResult,
}

impl<T> Transition<T> {
    /// Build a transition.
    #[must_use]
    pub fn new(state: T, result: ActionResult) -> Self {
        Self { state, result }
    }

    /// Whether the action succeeded.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.result.is_success()
    }
}

/// Transition over a canvas.
pub type CanvasTransition = Transition<CanvasState>;

fn rejected(canvas: &CanvasState, error: CanvasError) -> CanvasTransition {
    Transition::new(canvas.clone(), ActionResult::failed(error))
}

/// Paint the focused cell, replacing whatever was there.
#[must_use]
pub fn paint_cell(canvas: &CanvasState, color: &str) -> CanvasTransition {
    let color = match Color::parse(color) {
        Ok(color) => color,
        Err(err) => return rejected(canvas, err),
    };
    let pos = canvas.focus();
    let mut cells = canvas.clone_cells();
    cells.insert(CellKey::from(pos), Cell::new(pos, color.clone()));
    let message = format!("Painted {} at {pos}", color_name(&color));
    Transition::new(
        canvas.with_cells(cells),
        ActionResult::at(message, pos, Some(color)),
    )
}

/// Remove the paint from the focused cell.
#[must_use]
pub fn erase_cell(canvas: &CanvasState) -> CanvasTransition {
    let pos = canvas.focus();
    let mut cells = canvas.clone_cells();
    let Some(removed) = cells.remove(&CellKey::from(pos)) else {
        return rejected(
            canvas,
            CanvasError::CellNotPainted {
                row: pos.row,
                col: pos.col,
            },
        );
    };
    let message = format!("Erased {} at {pos}", color_name(&removed.color));
    Transition::new(
        canvas.with_cells(cells),
        ActionResult::at(message, pos, Some(removed.color)),
    )
}

/// One step from `pos` towards `direction`, without bounds checking.
#[must_use]
pub const fn calculate_new_position(pos: Position, direction: Direction) -> Position {
    match direction {
        Direction::Up => Position::new(pos.row - 1, pos.col),
        Direction::Down => Position::new(pos.row + 1, pos.col),
        Direction::Left => Position::new(pos.row, pos.col - 1),
        Direction::Right => Position::new(pos.row, pos.col + 1),
    }
}

/// Move the focus one cell; cells are untouched.
#[must_use]
pub fn move_focus(canvas: &CanvasState, direction: Direction) -> CanvasTransition {
    let target = calculate_new_position(canvas.focus(), direction);
    if !canvas.is_valid_position(target) {
        return rejected(
            canvas,
            CanvasError::BoundaryReached(format!(
                "cannot move {direction} from {}",
                canvas.focus()
            )),
        );
    }
    focus_at(canvas, target)
}

/// Jump the focus to an arbitrary position.
#[must_use]
pub fn set_focus(canvas: &CanvasState, position: Position) -> CanvasTransition {
    if !canvas.is_valid_position(position) {
        let config = canvas.config();
        return rejected(
            canvas,
            CanvasError::BoundaryReached(format!(
                "{position} is outside the {} by {} grid",
                config.width, config.height
            )),
        );
    }
    focus_at(canvas, position)
}

/// Jump the focus to the top-left cell.
#[must_use]
pub fn move_focus_to_home(canvas: &CanvasState) -> CanvasTransition {
    set_focus(canvas, Position::default())
}

/// Jump the focus to the bottom-right cell.
#[must_use]
pub fn move_focus_to_end(canvas: &CanvasState) -> CanvasTransition {
    set_focus(canvas, canvas.config().last_position())
}

/// Remove every painted cell, keeping focus.
#[must_use]
pub fn clear_canvas(canvas: &CanvasState) -> CanvasTransition {
    let message = if canvas.is_empty() {
        "Canvas is already empty".to_string()
    } else {
        format!("Cleared {}", count_phrase(canvas.painted_count(), "cell", "cells"))
    };
    Transition::new(canvas.cleared(), ActionResult::ok(message))
}

fn focus_at(canvas: &CanvasState, target: Position) -> CanvasTransition {
    let next = canvas.with_focus(target);
    let message = describe_position(&next, target);
    let color = next.get_cell_color(target).cloned();
    Transition::new(next, ActionResult::at(message, target, color))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GridConfig;

    fn canvas(width: u32, height: u32) -> CanvasState {
        CanvasState::new(GridConfig::new(width, height).expect("config")).expect("canvas")
    }

    #[test]
    fn test_paint_sets_focused_cell() {
        let t = paint_cell(&canvas(4, 4), "#FF0000");
        assert!(t.is_success());
        assert_eq!(t.result.position(), Some(Position::new(0, 0)));
        assert_eq!(t.result.color().map(Color::as_str), Some("#FF0000"));
        assert_eq!(t.result.message(), "Painted red at row 0, column 0");
        assert!(t.state.is_cell_painted(Position::new(0, 0)));
    }

    #[test]
    fn test_paint_invalid_color_is_rejected() {
        let start = canvas(4, 4);
        let t = paint_cell(&start, "#12");
        assert!(!t.is_success());
        assert_eq!(
            t.result.error(),
            Some(&CanvasError::InvalidColor("#12".to_string()))
        );
        assert_eq!(t.state, start);
    }

    #[test]
    fn test_paint_overwrites() {
        let first = paint_cell(&canvas(4, 4), "#FF0000").state;
        let second = paint_cell(&first, "blue").state;
        assert_eq!(second.painted_count(), 1);
        assert_eq!(
            second.get_cell_color(Position::new(0, 0)).map(Color::as_str),
            Some("blue")
        );
    }

    #[test]
    fn test_paint_leaves_input_untouched() {
        let start = canvas(4, 4);
        let _ = paint_cell(&start, "red");
        assert!(start.is_empty());
    }

    #[test]
    fn test_erase() {
        let painted = paint_cell(&canvas(4, 4), "red").state;
        let t = erase_cell(&painted);
        assert!(t.is_success());
        assert!(t.state.is_empty());
        assert_eq!(t.result.message(), "Erased red at row 0, column 0");
    }

    #[test]
    fn test_erase_unpainted_fails() {
        let t = erase_cell(&canvas(4, 4));
        assert_eq!(
            t.result.error(),
            Some(&CanvasError::CellNotPainted { row: 0, col: 0 })
        );
    }

    #[test]
    fn test_calculate_new_position() {
        let pos = Position::new(2, 2);
        assert_eq!(calculate_new_position(pos, Direction::Up), Position::new(1, 2));
        assert_eq!(calculate_new_position(pos, Direction::Down), Position::new(3, 2));
        assert_eq!(calculate_new_position(pos, Direction::Left), Position::new(2, 1));
        assert_eq!(calculate_new_position(pos, Direction::Right), Position::new(2, 3));
    }

    #[test]
    fn test_move_focus_within_bounds() {
        let t = move_focus(&canvas(4, 4), Direction::Right);
        assert!(t.is_success());
        assert_eq!(t.state.focus(), Position::new(0, 1));
        assert_eq!(t.result.message(), "Row 0, column 1, empty");
    }

    #[test]
    fn test_move_focus_reports_cell_color() {
        let painted = paint_cell(&canvas(4, 4), "#00FF00").state;
        let moved = move_focus(&painted, Direction::Down).state;
        let back = move_focus(&moved, Direction::Up);
        assert_eq!(back.result.message(), "Row 0, column 0, green");
        assert_eq!(back.result.color().map(Color::as_str), Some("#00FF00"));
    }

    #[test]
    fn test_move_focus_at_edge_fails() {
        let start = canvas(4, 4);
        let t = move_focus(&start, Direction::Up);
        assert!(matches!(t.result.error(), Some(CanvasError::BoundaryReached(_))));
        assert_eq!(t.state, start);
    }

    #[test]
    fn test_set_focus_bounds() {
        let start = canvas(5, 3);
        assert!(set_focus(&start, Position::new(2, 4)).is_success());
        assert!(!set_focus(&start, Position::new(3, 0)).is_success());
        assert!(!set_focus(&start, Position::new(-1, 0)).is_success());
    }

    #[test]
    fn test_home_and_end() {
        let start = canvas(5, 3);
        let end = move_focus_to_end(&start);
        assert_eq!(end.state.focus(), Position::new(2, 4));
        let home = move_focus_to_home(&end.state);
        assert_eq!(home.state.focus(), Position::new(0, 0));
    }

    #[test]
    fn test_clear_canvas() {
        let painted = paint_cell(&canvas(4, 4), "red").state;
        let t = clear_canvas(&painted);
        assert!(t.state.is_empty());
        assert_eq!(t.result.message(), "Cleared 1 cell");
        assert_eq!(
            clear_canvas(&t.state).result.message(),
            "Canvas is already empty"
        );
    }

    #[test]
    fn test_direction_names() {
        for direction in Direction::ALL {
            assert_eq!(Direction::from_name(&direction.to_string()), Some(direction));
        }
        assert_eq!(Direction::from_name("sideways"), None);
    }
}
