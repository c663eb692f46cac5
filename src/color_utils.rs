//! Color utility functions shared across the renderer.
//!
//! Group colors are fixed for the first five groups; every other group shares
//! a neutral grey.

use std::fmt;

/// An RGBA color with 8-bit channels and a floating point alpha.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Rgba {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn with_alpha(self, a: f64) -> Self {
        Self { a, ..self }
    }

    /// Hex notation without alpha, e.g. `#FF5733`.
    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

/// Alpha applied to polygon fills.
pub const FILL_ALPHA: f64 = 0.3;

/// Stroke color of the selected polygon and of the in-progress polygon.
pub const HIGHLIGHT_STROKE: Rgba = Rgba::rgb(255, 0, 0).with_alpha(0.7);

/// Fill color of the selected polygon.
pub const HIGHLIGHT_FILL: Rgba = Rgba::rgb(255, 0, 0).with_alpha(0.3);

/// Vertex marker color of the in-progress polygon.
pub const DRAFT_VERTEX: Rgba = Rgba::rgb(0, 0, 255);

/// Vertex marker color of committed polygons.
pub const VERTEX_MARKER: Rgba = Rgba::rgb(255, 255, 255);

/// Label text and label box colors.
pub const LABEL_TEXT: Rgba = Rgba::rgb(255, 255, 255);
pub const LABEL_BACKGROUND: Rgba = Rgba::rgb(0, 0, 0).with_alpha(0.6);

const FALLBACK_GROUP_COLOR: Rgba = Rgba::rgb(0x9C, 0x9C, 0x9C);

/// Opaque base color for a group.
pub fn group_color(group: &str) -> Rgba {
    match group.trim() {
        "1" => Rgba::rgb(0xFF, 0x57, 0x33),
        "2" => Rgba::rgb(0x33, 0xA1, 0xFF),
        "3" => Rgba::rgb(0x33, 0xFF, 0x57),
        "4" => Rgba::rgb(0xF0, 0x33, 0xFF),
        "5" => Rgba::rgb(0xFF, 0xD7, 0x00),
        _ => FALLBACK_GROUP_COLOR,
    }
}

/// Semi-transparent fill for a group.
pub fn group_fill(group: &str) -> Rgba {
    group_color(group).with_alpha(FILL_ALPHA)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_groups() {
        assert_eq!(group_color("1").to_hex(), "#FF5733");
        assert_eq!(group_color("2").to_hex(), "#33A1FF");
        assert_eq!(group_color("3").to_hex(), "#33FF57");
        assert_eq!(group_color("4").to_hex(), "#F033FF");
        assert_eq!(group_color("5").to_hex(), "#FFD700");
    }

    #[test]
    fn test_unknown_groups_fall_back_to_grey() {
        assert_eq!(group_color("6").to_hex(), "#9C9C9C");
        assert_eq!(group_color("cars").to_hex(), "#9C9C9C");
        assert_eq!(group_color(""), group_color("42"));
    }

    #[test]
    fn test_fill_alpha() {
        let fill = group_fill("1");
        assert!((fill.a - FILL_ALPHA).abs() < 1e-9);
        assert_eq!(fill.to_string(), "rgba(255, 87, 51, 0.3)");
    }
}
