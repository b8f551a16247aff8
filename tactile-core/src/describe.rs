//! Natural-language descriptions of a canvas for screen readers.
//!
//! Cells are grouped by color (lexicographic order of the color as written).
//! Inside a group, maximal runs of three or more adjacent cells are found per
//! axis; a cell may belong to both a row run and a column run. Cells outside
//! every run are listed one by one.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::color::{color_label, color_name};
use crate::menu::ColorMenuState;
use crate::{CanvasState, Color, Position};

/// Shortest sequence reported as a run.
pub const MIN_RUN_LENGTH: usize = 3;

/// `1 cell`, `3 cells`.
pub(crate) fn count_phrase(n: usize, singular: &str, plural: &str) -> String {
    if n == 1 {
        format!("{n} {singular}")
    } else {
        format!("{n} {plural}")
    }
}

/// A straight line of same-colored cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Run {
    /// Along a row.
    Horizontal {
        /// Row index.
        row: i32,
        /// First column.
        start: i32,
        /// Last column, inclusive.
        end: i32,
    },
    /// Along a column.
    Vertical {
        /// Column index.
        col: i32,
        /// First row.
        start: i32,
        /// Last row, inclusive.
        end: i32,
    },
}

impl Run {
    /// Number of cells covered.
    #[must_use]
    #[allow(clippy::cast_sign_loss)]
    pub const fn cell_count(&self) -> usize {
        let (Self::Horizontal { start, end, .. } | Self::Vertical { start, end, .. }) = *self;
        (end - start + 1) as usize
    }

    /// Positions covered, in order.
    #[must_use]
    pub fn positions(&self) -> Vec<Position> {
        match *self {
            Self::Horizontal { row, start, end } => {
                (start..=end).map(|col| Position::new(row, col)).collect()
            }
            Self::Vertical { col, start, end } => {
                (start..=end).map(|row| Position::new(row, col)).collect()
            }
        }
    }
}

impl fmt::Display for Run {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Horizontal { row, start, end } => {
                write!(f, "row {row}, columns {start} to {end} ({} cells)", self.cell_count())
            }
            Self::Vertical { col, start, end } => {
                write!(f, "column {col}, rows {start} to {end} ({} cells)", self.cell_count())
            }
        }
    }
}

/// Every cell of one color, as runs plus leftovers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorGroup {
    /// The color, as painted.
    pub color: Color,
    /// Row runs first, then column runs.
    pub runs: Vec<Run>,
    /// Cells in no run, in `(row, col)` order.
    pub singles: Vec<Position>,
}

impl ColorGroup {
    fn build(color: Color, cells: &BTreeSet<Position>) -> Self {
        let mut runs = axis_runs(cells, |p| (p.row, p.col), |row, start, end| Run::Horizontal {
            row,
            start,
            end,
        });
        runs.extend(axis_runs(cells, |p| (p.col, p.row), |col, start, end| Run::Vertical {
            col,
            start,
            end,
        }));

        let covered: BTreeSet<Position> = runs.iter().flat_map(Run::positions).collect();
        let singles = cells.difference(&covered).copied().collect();
        Self {
            color,
            runs,
            singles,
        }
    }
}

impl fmt::Display for ColorGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", color_label(&self.color))?;
        let parts: Vec<String> = self
            .runs
            .iter()
            .map(ToString::to_string)
            .chain(self.singles.iter().map(ToString::to_string))
            .collect();
        write!(f, "{}.", parts.join("; "))
    }
}

/// Maximal runs along one axis. `key` maps a position to `(line, offset)`.
fn axis_runs(
    cells: &BTreeSet<Position>,
    key: impl Fn(&Position) -> (i32, i32),
    make: impl Fn(i32, i32, i32) -> Run,
) -> Vec<Run> {
    let ordered: BTreeSet<(i32, i32)> = cells.iter().map(key).collect();
    let mut runs = Vec::new();
    let mut current: Option<(i32, i32, i32)> = None;

    for (line, offset) in ordered {
        current = match current {
            Some((l, start, end)) if l == line && end + 1 == offset => Some((l, start, offset)),
            previous => {
                if let Some((l, start, end)) = previous {
                    push_run(&mut runs, &make, l, start, end);
                }
                Some((line, offset, offset))
            }
        };
    }
    if let Some((l, start, end)) = current {
        push_run(&mut runs, &make, l, start, end);
    }
    runs
}

#[allow(clippy::cast_sign_loss)]
fn push_run(
    runs: &mut Vec<Run>,
    make: &impl Fn(i32, i32, i32) -> Run,
    line: i32,
    start: i32,
    end: i32,
) {
    if (end - start + 1) as usize >= MIN_RUN_LENGTH {
        runs.push(make(line, start, end));
    }
}

/// Group painted cells by color, in lexicographic color order.
#[must_use]
pub fn color_groups(canvas: &CanvasState) -> Vec<ColorGroup> {
    let mut by_color: BTreeMap<&Color, BTreeSet<Position>> = BTreeMap::new();
    for cell in canvas.cells().values() {
        by_color.entry(&cell.color).or_default().insert(cell.position());
    }
    by_color
        .into_iter()
        .map(|(color, cells)| ColorGroup::build(color.clone(), &cells))
        .collect()
}

/// Number of distinct colors, compared as written.
#[must_use]
pub fn distinct_colors(canvas: &CanvasState) -> usize {
    canvas
        .cells()
        .values()
        .map(|cell| &cell.color)
        .collect::<BTreeSet<_>>()
        .len()
}

/// Percentage of cells painted, rounded half up.
#[must_use]
pub fn fill_percentage(canvas: &CanvasState) -> usize {
    let total = canvas.config().cell_count();
    (canvas.painted_count() * 200 + total) / (total * 2)
}

/// One-line summary, e.g. `3 cells painted, 1 color, 5% filled`.
#[must_use]
pub fn summarize(canvas: &CanvasState) -> String {
    format!(
        "{} painted, {}, {}% filled",
        count_phrase(canvas.painted_count(), "cell", "cells"),
        count_phrase(distinct_colors(canvas), "color", "colors"),
        fill_percentage(canvas)
    )
}

/// Full description: a header line, then one line per color.
#[must_use]
pub fn describe_canvas(canvas: &CanvasState) -> String {
    let config = canvas.config();
    if canvas.is_empty() {
        return format!("Empty {} by {} canvas.", config.width, config.height);
    }
    let mut lines = vec![format!(
        "{} by {} canvas: {}.",
        config.width,
        config.height,
        summarize(canvas)
    )];
    lines.extend(color_groups(canvas).iter().map(ToString::to_string));
    lines.join("\n")
}

/// Speech for one position, e.g. `Row 2, column 3, red`.
#[must_use]
pub fn describe_position(canvas: &CanvasState, pos: Position) -> String {
    let base = format!("Row {}, column {}", pos.row, pos.col);
    match canvas.get_cell_color(pos) {
        Some(color) => format!("{base}, {}", color_name(color)),
        None => format!("{base}, empty"),
    }
}

/// Everything a user needs to reorient: focus, selected color, menu, totals.
#[must_use]
pub fn describe_context(canvas: &CanvasState, menu: &ColorMenuState) -> String {
    let menu_part = if menu.is_open() {
        " Color menu open."
    } else {
        ""
    };
    format!(
        "{}. Selected color {}.{menu_part} {}.",
        describe_position(canvas, canvas.focus()),
        color_name(menu.selected_color()),
        summarize(canvas)
    )
}
