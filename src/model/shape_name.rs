//! Polygon display names.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Name of a polygon: one of the predefined shapes or a free-form string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ShapeName {
    #[default]
    Rectangle,
    Triangle,
    Circle,
    Hexagon,
    Star,
    Arrow,
    Custom(String),
}

impl ShapeName {
    /// The predefined vocabulary, in menu order.
    pub const PREDEFINED: [ShapeName; 6] = [
        ShapeName::Rectangle,
        ShapeName::Triangle,
        ShapeName::Circle,
        ShapeName::Hexagon,
        ShapeName::Star,
        ShapeName::Arrow,
    ];

    /// Parse a label, falling back to [`ShapeName::Custom`].
    pub fn from_label(label: &str) -> Self {
        match label {
            "Rectangle" => ShapeName::Rectangle,
            "Triangle" => ShapeName::Triangle,
            "Circle" => ShapeName::Circle,
            "Hexagon" => ShapeName::Hexagon,
            "Star" => ShapeName::Star,
            "Arrow" => ShapeName::Arrow,
            other => ShapeName::Custom(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ShapeName::Rectangle => "Rectangle",
            ShapeName::Triangle => "Triangle",
            ShapeName::Circle => "Circle",
            ShapeName::Hexagon => "Hexagon",
            ShapeName::Star => "Star",
            ShapeName::Arrow => "Arrow",
            ShapeName::Custom(name) => name,
        }
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, ShapeName::Custom(_))
    }
}

impl From<String> for ShapeName {
    fn from(value: String) -> Self {
        ShapeName::from_label(&value)
    }
}

impl From<&str> for ShapeName {
    fn from(value: &str) -> Self {
        ShapeName::from_label(value)
    }
}

impl From<ShapeName> for String {
    fn from(value: ShapeName) -> Self {
        match value {
            ShapeName::Custom(name) => name,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for ShapeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_label_roundtrip() {
        for name in ShapeName::PREDEFINED.iter() {
            assert_eq!(&ShapeName::from_label(name.as_str()), name);
        }
        assert_eq!(
            ShapeName::from_label("Leaf"),
            ShapeName::Custom("Leaf".to_string())
        );
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let json = serde_json::to_string(&ShapeName::Hexagon).unwrap();
        assert_eq!(json, "\"Hexagon\"");

        let custom: ShapeName = serde_json::from_str("\"Leaf\"").unwrap();
        assert!(custom.is_custom());
        assert_eq!(custom.to_string(), "Leaf");
    }
}
