//! Editing tools and cursor feedback.

use serde::{Deserialize, Serialize};

/// Active editing tool. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tool {
    /// Click to append vertices to the in-progress polygon
    Draw,
    /// Drag vertices, insert vertices on edges, select polygons
    #[default]
    EditSelect,
    /// Remove single vertices
    Erase,
    /// Drag whole polygons
    Move,
    /// Drag the view while zoomed in
    Pan,
}

impl Tool {
    /// Get the display name for this tool.
    pub fn name(&self) -> &'static str {
        match self {
            Tool::Draw => "Draw",
            Tool::EditSelect => "Edit / Select",
            Tool::Erase => "Erase",
            Tool::Move => "Move",
            Tool::Pan => "Pan",
        }
    }

    /// Get all available tools.
    pub fn all() -> &'static [Tool] {
        &[
            Tool::Draw,
            Tool::EditSelect,
            Tool::Erase,
            Tool::Move,
            Tool::Pan,
        ]
    }
}

/// Cursor the canvas should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cursor {
    #[default]
    Default,
    /// Over a vertex that can be dragged or erased
    Pointer,
    /// Drawing, over an edge, or in assisted mode
    Crosshair,
    /// Over a movable polygon, or dragging one
    Move,
    /// Pan available
    Grab,
    /// Panning
    Grabbing,
    /// Pan unavailable at the current zoom
    NotAllowed,
}

impl Cursor {
    /// CSS cursor keyword.
    pub fn css_name(&self) -> &'static str {
        match self {
            Cursor::Default => "default",
            Cursor::Pointer => "pointer",
            Cursor::Crosshair => "crosshair",
            Cursor::Move => "move",
            Cursor::Grab => "grab",
            Cursor::Grabbing => "grabbing",
            Cursor::NotAllowed => "not-allowed",
        }
    }
}
