//! The naming step that turns a finished draft into a polygon.

use crate::constants::DEFAULT_GROUP;
use crate::model::ShapeName;

/// Name and group being chosen for a completed draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamingStep {
    pub name: ShapeName,
    pub group: String,
}

impl NamingStep {
    /// Whether the current choice can be committed. Custom names must not be
    /// blank.
    pub fn is_acceptable(&self) -> bool {
        match &self.name {
            ShapeName::Custom(text) => !text.trim().is_empty(),
            _ => true,
        }
    }

    /// The group to store; a blank group falls back to the default.
    pub fn resolved_group(&self) -> String {
        match self.group.trim() {
            "" => DEFAULT_GROUP.to_string(),
            group => group.to_string(),
        }
    }
}

impl Default for NamingStep {
    fn default() -> Self {
        Self {
            name: ShapeName::default(),
            group: DEFAULT_GROUP.to_string(),
        }
    }
}

/// Shape names offered in the naming step: the predefined vocabulary followed
/// by custom names used so far.
#[derive(Debug, Clone, Default)]
pub struct ShapeCatalog {
    custom: Vec<String>,
}

impl ShapeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember a custom name. Predefined and duplicate names are ignored.
    pub fn remember(&mut self, name: &ShapeName) {
        if let ShapeName::Custom(text) = name {
            let text = text.trim();
            if !text.is_empty() && !self.custom.iter().any(|c| c == text) {
                log::debug!("Remembering custom shape name {:?}", text);
                self.custom.push(text.to_string());
            }
        }
    }

    pub fn custom_names(&self) -> &[String] {
        &self.custom
    }

    pub fn all_shape_names(&self) -> Vec<ShapeName> {
        ShapeName::PREDEFINED
            .iter()
            .cloned()
            .chain(self.custom.iter().map(|c| ShapeName::Custom(c.clone())))
            .collect()
    }
}
