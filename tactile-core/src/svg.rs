//! SVG markup for a canvas.
//!
//! One `<rect>` per painted cell in canonical order, preceded by `<title>` and
//! `<desc>` so screen readers announce the image.

use std::fmt::Write;

use serde::{Deserialize, Serialize};

use crate::color::color_name;
use crate::describe::summarize;
use crate::{CanvasState, Color};

/// Rendering options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SvgOptions {
    /// Side of one cell in user units.
    pub cell_size: u32,
    /// Background fill; `None` leaves it transparent. Anything that is not a
    /// valid canvas color is ignored.
    pub background: Option<String>,
    /// Draw thin lines between cells.
    pub grid_lines: bool,
}

impl Default for SvgOptions {
    fn default() -> Self {
        Self {
            cell_size: 20,
            background: Some("#FFFFFF".to_string()),
            grid_lines: false,
        }
    }
}

fn fill(color: &Color) -> String {
    color.to_hex().unwrap_or_else(|| color_name(color))
}

/// Cell coordinates are never negative inside a valid canvas.
fn offset(index: i32, size: u64) -> u64 {
    u64::try_from(index).unwrap_or(0) * size
}

/// Render `canvas` as a standalone SVG document.
#[must_use]
pub fn to_svg(canvas: &CanvasState, options: &SvgOptions) -> String {
    let config = canvas.config();
    let size = u64::from(options.cell_size.max(1));
    let width = u64::from(config.width) * size;
    let height = u64::from(config.height) * size;

    let mut svg = String::with_capacity(256 + canvas.painted_count() * 64);
    let _ = write!(
        svg,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\" role=\"img\">"
    );
    let _ = write!(
        svg,
        "<title>{} by {} canvas</title><desc>{}</desc>",
        config.width,
        config.height,
        summarize(canvas)
    );

    if let Some(background) = &options.background {
        match Color::parse(background) {
            Ok(color) => {
                let _ = write!(
                    svg,
                    "<rect width=\"{width}\" height=\"{height}\" fill=\"{}\"/>",
                    fill(&color)
                );
            }
            Err(_) => {
                tracing::warn!(background = %background, "ignoring invalid SVG background");
            }
        }
    }

    for cell in canvas.sorted_cells() {
        let _ = write!(
            svg,
            "<rect x=\"{}\" y=\"{}\" width=\"{size}\" height=\"{size}\" fill=\"{}\"/>",
            offset(cell.col, size),
            offset(cell.row, size),
            fill(&cell.color)
        );
    }

    if options.grid_lines {
        svg.push_str("<g stroke=\"#CCCCCC\" stroke-width=\"1\">");
        for col in 1..config.width {
            let x = u64::from(col) * size;
            let _ = write!(svg, "<line x1=\"{x}\" y1=\"0\" x2=\"{x}\" y2=\"{height}\"/>");
        }
        for row in 1..config.height {
            let y = u64::from(row) * size;
            let _ = write!(svg, "<line x1=\"0\" y1=\"{y}\" x2=\"{width}\" y2=\"{y}\"/>");
        }
        svg.push_str("</g>");
    }

    svg.push_str("</svg>");
    svg
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{paint_cell, set_focus};
    use crate::{GridConfig, Position};

    fn canvas() -> CanvasState {
        let canvas = CanvasState::new(GridConfig::new(3, 2).expect("config")).expect("canvas");
        let canvas = paint_cell(&set_focus(&canvas, Position::new(1, 2)).state, "red").state;
        paint_cell(&canvas, "#0f0").state
    }

    #[test]
    fn test_svg_structure() {
        let svg = to_svg(&canvas(), &SvgOptions::default());
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains("width=\"60\" height=\"40\""));
        assert!(svg.contains("<title>3 by 2 canvas</title>"));
        assert!(svg.contains("<desc>1 cell painted, 1 color, 17% filled</desc>"));
        assert!(
            svg.contains("<rect x=\"40\" y=\"20\" width=\"20\" height=\"20\" fill=\"#00FF00\"/>")
        );
        assert!(svg.contains("fill=\"#FFFFFF\""));
        assert!(!svg.contains("<line"));
    }

    #[test]
    fn test_svg_options() {
        let options = SvgOptions {
            cell_size: 10,
            background: None,
            grid_lines: true,
        };
        let svg = to_svg(&canvas(), &options);
        assert!(!svg.contains("#FFFFFF"));
        assert_eq!(svg.matches("<line").count(), 3);
        assert!(svg.contains("<rect x=\"20\" y=\"10\""));
    }

    #[test]
    fn test_huge_cell_size() {
        let grid = GridConfig::new(256, 256).expect("config");
        let canvas = CanvasState::new(grid).expect("canvas");
        let canvas = paint_cell(&set_focus(&canvas, Position::new(255, 255)).state, "red").state;
        let options = SvgOptions {
            cell_size: u32::MAX,
            background: None,
            grid_lines: true,
        };
        let svg = to_svg(&canvas, &options);
        let side = 256 * u64::from(u32::MAX);
        assert!(svg.contains(&format!("width=\"{side}\" height=\"{side}\"")));
        let corner = 255 * u64::from(u32::MAX);
        assert!(svg.contains(&format!("<rect x=\"{corner}\" y=\"{corner}\"")));
    }

    #[test]
    fn test_invalid_background_is_dropped() {
        let options = SvgOptions {
            background: Some("\"/><script>alert(1)</script>".to_string()),
            ..SvgOptions::default()
        };
        let svg = to_svg(&canvas(), &options);
        assert!(!svg.contains("<script>"));
        assert!(!svg.contains("<rect width="));

        let named = SvgOptions {
            background: Some("Purple".to_string()),
            ..SvgOptions::default()
        };
        let svg = to_svg(&canvas(), &named);
        assert!(svg.contains("<rect width=\"60\" height=\"40\" fill=\"purple\"/>"));
    }

    #[test]
    fn test_named_color_fill() {
        let canvas = CanvasState::new(GridConfig::new(1, 1).expect("config")).expect("canvas");
        let svg = to_svg(&paint_cell(&canvas, "Orange").state, &SvgOptions::default());
        assert!(svg.contains("fill=\"orange\""));
    }
}
