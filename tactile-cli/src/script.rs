//! Text scripts of canvas commands.
//!
//! Commands are separated by `;` or newlines, e.g.
//! `paint red; right; paint; menu; next; confirm; down; paint`.

use std::str::FromStr;

use tactile_core::{ActionResult, CanvasSession, Direction, Position};

/// Errors raised while parsing a script.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScriptError {
    /// The word does not name a command.
    #[error("Unknown command: {0}")]
    UnknownCommand(String),
    /// A command received the wrong arguments.
    #[error("Invalid arguments for {command}: {detail}")]
    InvalidArguments {
        /// Command name.
        command: String,
        /// What was wrong.
        detail: String,
    },
}

/// One scripted command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptCommand {
    /// Paint with the given color, or the selected one.
    Paint(Option<String>),
    /// Erase the focused cell.
    Erase,
    /// Move focus one cell.
    Move(Direction),
    /// Jump focus.
    Focus(Position),
    /// Focus the top-left cell.
    Home,
    /// Focus the bottom-right cell.
    End,
    /// Undo.
    Undo,
    /// Redo.
    Redo,
    /// Clear the canvas.
    Clear,
    /// Toggle the color menu.
    Menu,
    /// Next palette color.
    Next,
    /// Previous palette color.
    Prev,
    /// Keep the previewed color.
    Confirm,
    /// Close the menu without keeping the browsed color.
    Cancel,
    /// Select a color directly.
    Select(String),
    /// Report the focused cell.
    Inspect,
    /// Announce full context.
    Announce,
}

fn invalid(command: &str, detail: impl Into<String>) -> ScriptError {
    ScriptError::InvalidArguments {
        command: command.to_string(),
        detail: detail.into(),
    }
}

fn expect_no_args(
    command: &str,
    args: &[&str],
    parsed: ScriptCommand,
) -> Result<ScriptCommand, ScriptError> {
    if args.is_empty() {
        Ok(parsed)
    } else {
        Err(invalid(command, format!("unexpected {:?}", args.join(" "))))
    }
}

impl FromStr for ScriptCommand {
    type Err = ScriptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut words = s.split_whitespace();
        let Some(first) = words.next() else {
            return Err(ScriptError::UnknownCommand(String::new()));
        };
        let name = first.to_ascii_lowercase();
        let args: Vec<&str> = words.collect();

        if let Some(direction) = Direction::from_name(&name) {
            return expect_no_args(&name, &args, Self::Move(direction));
        }

        match name.as_str() {
            "paint" => match args.as_slice() {
                [] => Ok(Self::Paint(None)),
                [color] => Ok(Self::Paint(Some((*color).to_string()))),
                _ => Err(invalid(&name, "expected at most one color")),
            },
            "select" => match args.as_slice() {
                [color] => Ok(Self::Select((*color).to_string())),
                _ => Err(invalid(&name, "expected one color")),
            },
            "focus" => match args.as_slice() {
                [row, col] => {
                    let row: i32 = row
                        .parse()
                        .map_err(|_| invalid(&name, format!("bad row {row:?}")))?;
                    let col: i32 = col
                        .parse()
                        .map_err(|_| invalid(&name, format!("bad column {col:?}")))?;
                    Ok(Self::Focus(Position::new(row, col)))
                }
                _ => Err(invalid(&name, "expected row and column")),
            },
            "erase" => expect_no_args(&name, &args, Self::Erase),
            "home" => expect_no_args(&name, &args, Self::Home),
            "end" => expect_no_args(&name, &args, Self::End),
            "undo" => expect_no_args(&name, &args, Self::Undo),
            "redo" => expect_no_args(&name, &args, Self::Redo),
            "clear" => expect_no_args(&name, &args, Self::Clear),
            "menu" => expect_no_args(&name, &args, Self::Menu),
            "next" => expect_no_args(&name, &args, Self::Next),
            "prev" => expect_no_args(&name, &args, Self::Prev),
            "confirm" => expect_no_args(&name, &args, Self::Confirm),
            "cancel" => expect_no_args(&name, &args, Self::Cancel),
            "inspect" => expect_no_args(&name, &args, Self::Inspect),
            "announce" => expect_no_args(&name, &args, Self::Announce),
            _ => Err(ScriptError::UnknownCommand(first.to_string())),
        }
    }
}

/// Parse a whole script. Blank entries are skipped.
///
/// # Errors
///
/// Returns the first command that fails to parse.
pub fn parse_script(script: &str) -> Result<Vec<ScriptCommand>, ScriptError> {
    script
        .split([';', '\n'])
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(ScriptCommand::from_str)
        .collect()
}

/// Run one command against a session.
pub fn apply(session: &mut CanvasSession, command: &ScriptCommand) -> ActionResult {
    match command {
        ScriptCommand::Paint(Some(color)) => session.paint(color),
        ScriptCommand::Paint(None) => session.paint_selected(),
        ScriptCommand::Erase => session.erase(),
        ScriptCommand::Move(direction) => session.move_focus(*direction),
        ScriptCommand::Focus(position) => session.set_focus(*position),
        ScriptCommand::Home => session.home(),
        ScriptCommand::End => session.end(),
        ScriptCommand::Undo => session.undo(),
        ScriptCommand::Redo => session.redo(),
        ScriptCommand::Clear => session.clear(),
        ScriptCommand::Menu => session.toggle_color_menu(),
        ScriptCommand::Next => session.next_color(),
        ScriptCommand::Prev => session.prev_color(),
        ScriptCommand::Confirm => session.confirm_color(),
        ScriptCommand::Cancel => session.cancel_color(),
        ScriptCommand::Select(color) => session.select_color(color),
        ScriptCommand::Inspect => session.inspect_result(),
        ScriptCommand::Announce => session.announce_context(),
    }
}

/// Run every command in order, collecting results. Failures do not stop the
/// script.
pub fn run_script(session: &mut CanvasSession, commands: &[ScriptCommand]) -> Vec<ActionResult> {
    commands.iter().map(|command| apply(session, command)).collect()
}
