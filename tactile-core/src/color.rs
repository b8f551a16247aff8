//! Color values, validation and the fixed menu palette.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{CanvasError, CanvasResult};

/// Color names accepted in addition to hex notation.
pub const NAMED_COLORS: &[&str] = &[
    "black", "white", "red", "green", "blue", "yellow", "orange", "purple", "pink", "brown",
    "gray", "grey", "cyan", "magenta",
];

/// An entry of the color menu palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaletteEntry {
    /// Spoken name.
    pub name: &'static str,
    /// Hex value in `#RRGGBB` form.
    pub hex: &'static str,
}

/// The ordered palette browsed by the color menu.
pub const PALETTE: [PaletteEntry; 12] = [
    PaletteEntry { name: "black", hex: "#000000" },
    PaletteEntry { name: "white", hex: "#FFFFFF" },
    PaletteEntry { name: "red", hex: "#FF0000" },
    PaletteEntry { name: "orange", hex: "#FFA500" },
    PaletteEntry { name: "yellow", hex: "#FFFF00" },
    PaletteEntry { name: "green", hex: "#00FF00" },
    PaletteEntry { name: "blue", hex: "#0000FF" },
    PaletteEntry { name: "purple", hex: "#800080" },
    PaletteEntry { name: "pink", hex: "#FFC0CB" },
    PaletteEntry { name: "brown", hex: "#A52A2A" },
    PaletteEntry { name: "gray", hex: "#808080" },
    PaletteEntry { name: "cyan", hex: "#00FFFF" },
];

/// Check whether a string is an acceptable cell color.
///
/// Accepts `#RGB` and `#RRGGBB` (hex digits in any case) or one of
/// [`NAMED_COLORS`] (any case).
#[must_use]
pub fn is_valid_color(value: &str) -> bool {
    if let Some(hex) = value.strip_prefix('#') {
        return matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit());
    }
    NAMED_COLORS
        .iter()
        .any(|name| name.eq_ignore_ascii_case(value))
}

/// A validated cell color, kept exactly as the caller spelled it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color(String);

impl Color {
    /// Validate and wrap a color string.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::InvalidColor`] if the value is not a valid color.
    pub fn parse(value: &str) -> CanvasResult<Self> {
        if is_valid_color(value) {
            Ok(Self(value.to_string()))
        } else {
            Err(CanvasError::InvalidColor(value.to_string()))
        }
    }

    /// The color as written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Canonical `#RRGGBB` form, or `None` for named colors.
    #[must_use]
    pub fn to_hex(&self) -> Option<String> {
        let hex = self.0.strip_prefix('#')?;
        let expanded: String = if hex.len() == 3 {
            hex.chars().flat_map(|c| [c, c]).collect()
        } else {
            hex.to_string()
        };
        Some(format!("#{}", expanded.to_ascii_uppercase()))
    }

    /// Position of this color in [`PALETTE`], if present.
    #[must_use]
    pub fn palette_index(&self) -> Option<usize> {
        match self.to_hex() {
            Some(hex) => PALETTE.iter().position(|entry| entry.hex == hex),
            None => PALETTE
                .iter()
                .position(|entry| entry.name.eq_ignore_ascii_case(&self.0)),
        }
    }

    /// Color of the palette entry at `index` (wrapping).
    #[must_use]
    pub fn from_palette(index: usize) -> Self {
        Self(PALETTE[index % PALETTE.len()].hex.to_string())
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::from_palette(0)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Color {
    type Error = CanvasError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if is_valid_color(&value) {
            Ok(Self(value))
        } else {
            Err(CanvasError::InvalidColor(value))
        }
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.0
    }
}

/// Spoken name of a color.
///
/// Palette colors are named regardless of hex case; named colors are lowercased;
/// anything else is spoken as written.
#[must_use]
pub fn color_name(color: &Color) -> String {
    if color.to_hex().is_none() {
        return color.as_str().to_ascii_lowercase();
    }
    color
        .palette_index()
        .map_or_else(|| color.as_str().to_string(), |i| PALETTE[i].name.to_string())
}

/// Label used in descriptions, e.g. `red (#FF0000)`.
#[must_use]
pub fn color_label(color: &Color) -> String {
    let name = color_name(color);
    if name == color.as_str() || color.to_hex().is_none() {
        name
    } else {
        format!("{name} ({color})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_validation() {
        assert!(is_valid_color("#FFF"));
        assert!(is_valid_color("#ff00aa"));
        assert!(is_valid_color("#AbC"));
        assert!(!is_valid_color("#FFFF"));
        assert!(!is_valid_color("#GGGGGG"));
        assert!(!is_valid_color("FF0000"));
        assert!(!is_valid_color("#"));
        assert!(!is_valid_color(""));
    }

    #[test]
    fn test_named_validation() {
        assert!(is_valid_color("red"));
        assert!(is_valid_color("Grey"));
        assert!(!is_valid_color("chartreuse"));
    }

    #[test]
    fn test_parse_keeps_spelling() {
        let color = Color::parse("#ff0000").expect("valid");
        assert_eq!(color.as_str(), "#ff0000");
        assert_eq!(color.to_hex().as_deref(), Some("#FF0000"));
    }

    #[test]
    fn test_parse_rejects_invalid() {
        assert_eq!(
            Color::parse("nope"),
            Err(CanvasError::InvalidColor("nope".to_string()))
        );
    }

    #[test]
    fn test_short_hex_expands() {
        let color = Color::parse("#f0a").expect("valid");
        assert_eq!(color.to_hex().as_deref(), Some("#FF00AA"));
    }

    #[test]
    fn test_palette_lookup() {
        assert_eq!(Color::parse("#f00").expect("valid").palette_index(), Some(2));
        assert_eq!(Color::parse("blue").expect("valid").palette_index(), Some(6));
        assert_eq!(Color::parse("#123456").expect("valid").palette_index(), None);
        assert_eq!(Color::from_palette(13).as_str(), "#FFFFFF");
    }

    #[test]
    fn test_names_and_labels() {
        let red = Color::parse("#FF0000").expect("valid");
        assert_eq!(color_name(&red), "red");
        assert_eq!(color_label(&red), "red (#FF0000)");

        let odd = Color::parse("#123456").expect("valid");
        assert_eq!(color_label(&odd), "#123456");

        let named = Color::parse("Magenta").expect("valid");
        assert_eq!(color_label(&named), "magenta");
    }

    #[test]
    fn test_serde_validates() {
        let ok: Color = serde_json::from_str("\"#00ff00\"").expect("valid color");
        assert_eq!(ok.as_str(), "#00ff00");
        assert!(serde_json::from_str::<Color>("\"#00ff0\"").is_err());
    }
}
