//! Editor message types.
//!
//! All pointer events and editor actions are represented as messages in the
//! Elm architecture style and processed by [`Editor::update`](crate::editor::Editor::update).

use crate::editor::Tool;
use crate::model::{PolygonId, ShapeName};
use crate::transform::Viewport;

/// Pointer button that produced an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    /// Left button or touch
    Primary,
    /// Right button
    Secondary,
}

/// Top-level editor message.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    Pointer(PointerMessage),
    Tool(ToolMessage),
    Draft(DraftMessage),
    Polygon(PolygonMessage),
    View(ViewMessage),
    Assisted(AssistedMessage),
}

/// Pointer events in viewport (render) coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerMessage {
    Down { x: f64, y: f64, button: PointerButton },
    Move { x: f64, y: f64 },
    Up { x: f64, y: f64 },
}

/// Tool and mode selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolMessage {
    /// Switch the active tool
    Select(Tool),
    /// Enter or leave assisted segmentation mode
    SetAssisted(bool),
}

/// In-progress polygon and naming step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftMessage {
    /// Finish drawing and open the naming step
    Complete,
    /// Choose a name in the naming step
    SetName(ShapeName),
    /// Choose a group in the naming step
    SetGroup(String),
    /// Commit the draft with the chosen name and group
    Confirm,
    /// Close the naming step, keeping the drawn points
    Cancel,
    /// Throw away the in-progress polygon
    Discard,
}

/// Operations on committed polygons of the active image.
#[derive(Debug, Clone, PartialEq)]
pub enum PolygonMessage {
    /// Select a polygon by id, or clear the selection
    Select(Option<PolygonId>),
    /// Replace name and group
    Rename {
        id: PolygonId,
        name: ShapeName,
        group: String,
    },
    /// Delete a polygon
    Delete(PolygonId),
    /// Resample the selected polygon from a point-density value
    SetPointDensity(usize),
}

/// View transform messages.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewMessage {
    ZoomIn,
    ZoomOut,
    /// Back to zoom 1 with no pan
    Reset,
    /// Canvas or image size changed
    Resize(Viewport),
}

/// Assisted segmentation control actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssistedMessage {
    FinishObject,
    UndoClick,
    ResetClicks,
}
