//! Color selection menu.
//!
//! ```text
//!            open                 next / prev
//!  Closed ─────────▶ Open ◀──────────────────┐
//!    ▲                │ └────────────────────┘
//!    └── confirm ─────┤
//!    └── cancel ──────┘   (restores previous color)
//! ```
//!
//! Browsing previews immediately: `selected_color` follows the menu index. Like
//! the action layer, every transition returns a new value.

use serde::Serialize;

use crate::action::{ActionResult, Transition};
use crate::color::{color_name, PALETTE};
use crate::{CanvasError, Color};

/// Transition over the menu state.
pub type MenuTransition = Transition<ColorMenuState>;

/// Modal color-menu state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColorMenuState {
    is_open: bool,
    selected_color: Color,
    menu_index: usize,
    previous_color: Color,
}

impl ColorMenuState {
    /// Closed menu with `color` selected.
    #[must_use]
    pub fn new(color: Color) -> Self {
        Self {
            is_open: false,
            menu_index: color.palette_index().unwrap_or(0),
            previous_color: color.clone(),
            selected_color: color,
        }
    }

    /// Whether the menu owns directional input.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.is_open
    }

    /// Color used for painting (previewed while open).
    #[must_use]
    pub const fn selected_color(&self) -> &Color {
        &self.selected_color
    }

    /// Current palette index.
    #[must_use]
    pub const fn menu_index(&self) -> usize {
        self.menu_index
    }

    /// Rollback target for cancel.
    #[must_use]
    pub const fn previous_color(&self) -> &Color {
        &self.previous_color
    }

    fn reject(&self, error: CanvasError) -> MenuTransition {
        Transition::new(self.clone(), ActionResult::failed(error))
    }

    fn announce(&self) -> String {
        format!(
            "{}, {} of {}",
            color_name(&self.selected_color),
            self.menu_index + 1,
            PALETTE.len()
        )
    }

    /// Open the menu, remembering the current color.
    #[must_use]
    pub fn open(&self) -> MenuTransition {
        if self.is_open {
            return self.reject(CanvasError::MenuAlreadyOpen);
        }
        let next = Self {
            is_open: true,
            selected_color: self.selected_color.clone(),
            menu_index: self.selected_color.palette_index().unwrap_or(0),
            previous_color: self.selected_color.clone(),
        };
        let message = format!("Color menu, {}", color_name(&next.selected_color));
        let color = next.selected_color.clone();
        Transition::new(next, ActionResult::Success {
            message,
            position: None,
            color: Some(color),
        })
    }

    fn step(&self, forward: bool) -> MenuTransition {
        if !self.is_open {
            return self.reject(CanvasError::MenuNotOpen);
        }
        let len = PALETTE.len();
        let menu_index = if forward {
            (self.menu_index + 1) % len
        } else {
            (self.menu_index + len - 1) % len
        };
        let next = Self {
            is_open: true,
            selected_color: Color::from_palette(menu_index),
            menu_index,
            previous_color: self.previous_color.clone(),
        };
        let message = next.announce();
        let color = next.selected_color.clone();
        Transition::new(next, ActionResult::Success {
            message,
            position: None,
            color: Some(color),
        })
    }

    /// Browse forward, wrapping at the end of the palette.
    #[must_use]
    pub fn next(&self) -> MenuTransition {
        self.step(true)
    }

    /// Browse backward, wrapping at the start of the palette.
    #[must_use]
    pub fn prev(&self) -> MenuTransition {
        self.step(false)
    }

    /// Keep the previewed color and close.
    #[must_use]
    pub fn confirm(&self) -> MenuTransition {
        if !self.is_open {
            return self.reject(CanvasError::MenuNotOpen);
        }
        let next = Self {
            is_open: false,
            selected_color: self.selected_color.clone(),
            menu_index: self.menu_index,
            previous_color: self.selected_color.clone(),
        };
        let message = format!("Selected {}", color_name(&next.selected_color));
        let color = next.selected_color.clone();
        Transition::new(next, ActionResult::Success {
            message,
            position: None,
            color: Some(color),
        })
    }

    /// Discard browsing and close, restoring the color from before `open`.
    #[must_use]
    pub fn cancel(&self) -> MenuTransition {
        if !self.is_open {
            return self.reject(CanvasError::MenuNotOpen);
        }
        let next = Self {
            is_open: false,
            selected_color: self.previous_color.clone(),
            menu_index: self.previous_color.palette_index().unwrap_or(0),
            previous_color: self.previous_color.clone(),
        };
        let message = format!(
            "Color menu closed, {}",
            color_name(&next.selected_color)
        );
        let color = next.selected_color.clone();
        Transition::new(next, ActionResult::Success {
            message,
            position: None,
            color: Some(color),
        })
    }

    /// Select an arbitrary valid color while the menu is closed.
    #[must_use]
    pub fn select(&self, color: &str) -> MenuTransition {
        if self.is_open {
            return self.reject(CanvasError::ColorMenuActive);
        }
        match Color::parse(color) {
            Ok(color) => {
                let message = format!("Selected {}", color_name(&color));
                Transition::new(Self::new(color.clone()), ActionResult::Success {
                    message,
                    position: None,
                    color: Some(color),
                })
            }
            Err(err) => self.reject(err),
        }
    }
}

impl Default for ColorMenuState {
    fn default() -> Self {
        Self::new(Color::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn color(value: &str) -> Color {
        Color::parse(value).expect("valid")
    }

    #[test]
    fn test_default_is_closed_black() {
        let menu = ColorMenuState::default();
        assert!(!menu.is_open());
        assert_eq!(menu.selected_color().as_str(), "#000000");
        assert_eq!(menu.menu_index(), 0);
    }

    #[test]
    fn test_open_captures_previous_and_index() {
        let menu = ColorMenuState::new(color("#0000ff"));
        let t = menu.open();
        assert!(t.is_success());
        assert!(t.state.is_open());
        assert_eq!(t.state.menu_index(), 6);
        assert_eq!(t.state.previous_color(), &color("#0000ff"));
    }

    #[test]
    fn test_open_unknown_color_starts_at_zero() {
        let t = ColorMenuState::new(color("#123456")).open();
        assert_eq!(t.state.menu_index(), 0);
        assert_eq!(t.state.selected_color(), &color("#123456"));
    }

    #[test]
    fn test_open_twice_fails() {
        let open = ColorMenuState::default().open().state;
        let t = open.open();
        assert_eq!(t.result.error(), Some(&CanvasError::MenuAlreadyOpen));
        assert_eq!(t.state, open);
    }

    #[test]
    fn test_closed_transitions_fail() {
        let menu = ColorMenuState::default();
        for t in [menu.next(), menu.prev(), menu.confirm(), menu.cancel()] {
            assert_eq!(t.result.error(), Some(&CanvasError::MenuNotOpen));
        }
    }

    #[test]
    fn test_next_previews_and_wraps() {
        let mut menu = ColorMenuState::default().open().state;
        let t = menu.next();
        assert_eq!(t.state.selected_color().as_str(), "#FFFFFF");
        assert_eq!(t.result.message(), "white, 2 of 12");
        for _ in 0..PALETTE.len() {
            menu = menu.next().state;
        }
        assert_eq!(menu.menu_index(), 0);
    }

    #[test]
    fn test_prev_wraps_backwards() {
        let menu = ColorMenuState::default().open().state;
        let t = menu.prev();
        assert_eq!(t.state.menu_index(), PALETTE.len() - 1);
        assert_eq!(t.state.selected_color().as_str(), "#00FFFF");
    }

    #[test]
    fn test_confirm_commits() {
        let browsed = ColorMenuState::default().open().state.next().state.next().state;
        let t = browsed.confirm();
        assert!(!t.state.is_open());
        assert_eq!(t.state.selected_color().as_str(), "#FF0000");
        assert_eq!(t.state.previous_color().as_str(), "#FF0000");
        assert_eq!(t.result.message(), "Selected red");

        let reopened = t.state.open().state;
        assert_eq!(reopened.menu_index(), 2);
    }

    #[test]
    fn test_cancel_restores_previous() {
        let mut menu = ColorMenuState::new(color("#123456")).open().state;
        for _ in 0..5 {
            menu = menu.next().state;
        }
        menu = menu.prev().state;
        let t = menu.cancel();
        assert!(!t.state.is_open());
        assert_eq!(t.state.selected_color(), &color("#123456"));
    }

    #[test]
    fn test_select() {
        let t = ColorMenuState::default().select("#ffa500");
        assert!(t.is_success());
        assert_eq!(t.state.menu_index(), 3);
        assert_eq!(t.result.message(), "Selected orange");

        let bad = ColorMenuState::default().select("mauve");
        assert!(matches!(bad.result.error(), Some(CanvasError::InvalidColor(_))));

        let open = ColorMenuState::default().open().state;
        assert_eq!(
            open.select("red").result.error(),
            Some(&CanvasError::ColorMenuActive)
        );
    }
}
