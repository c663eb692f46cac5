//! Editor tests driven through [`Editor::update`](super::Editor::update).
//!
//! The fixture viewport is unscaled and the view starts at identity, so
//! pointer coordinates equal image coordinates unless a test zooms or pans.

mod edit_tests;
mod scenario_tests;

use super::{Editor, Outcome, Tool};
use crate::message::{DraftMessage, Message, PointerButton, PointerMessage, ToolMessage};
use crate::model::{ImageKey, Point, Polygon, PolygonId, ShapeName};
use crate::store::AnnotationStore;
use crate::transform::Viewport;

pub(super) fn key() -> ImageKey {
    ImageKey::from("frame_0001.png")
}

pub(super) fn setup() -> (Editor, AnnotationStore) {
    let mut editor = Editor::default();
    let mut store = AnnotationStore::new();
    editor.open_image(&mut store, key(), Viewport::unscaled(200.0, 200.0));
    (editor, store)
}

pub(super) fn down(editor: &mut Editor, store: &mut AnnotationStore, x: f64, y: f64) -> Outcome {
    editor.update(
        store,
        Message::Pointer(PointerMessage::Down {
            x,
            y,
            button: PointerButton::Primary,
        }),
    )
}

pub(super) fn right_down(
    editor: &mut Editor,
    store: &mut AnnotationStore,
    x: f64,
    y: f64,
) -> Outcome {
    editor.update(
        store,
        Message::Pointer(PointerMessage::Down {
            x,
            y,
            button: PointerButton::Secondary,
        }),
    )
}

pub(super) fn move_to(editor: &mut Editor, store: &mut AnnotationStore, x: f64, y: f64) -> Outcome {
    editor.update(store, Message::Pointer(PointerMessage::Move { x, y }))
}

pub(super) fn up(editor: &mut Editor, store: &mut AnnotationStore, x: f64, y: f64) -> Outcome {
    editor.update(store, Message::Pointer(PointerMessage::Up { x, y }))
}

pub(super) fn click(editor: &mut Editor, store: &mut AnnotationStore, x: f64, y: f64) -> Outcome {
    let outcome = down(editor, store, x, y);
    up(editor, store, x, y);
    outcome
}

pub(super) fn select_tool(editor: &mut Editor, store: &mut AnnotationStore, tool: Tool) -> Outcome {
    editor.update(store, Message::Tool(ToolMessage::Select(tool)))
}

pub(super) fn draft(editor: &mut Editor, store: &mut AnnotationStore, msg: DraftMessage) -> Outcome {
    editor.update(store, Message::Draft(msg))
}

/// Draw and commit a polygon with the default naming choice.
pub(super) fn draw_polygon(
    editor: &mut Editor,
    store: &mut AnnotationStore,
    points: &[(f64, f64)],
) -> PolygonId {
    select_tool(editor, store, Tool::Draw);
    for &(x, y) in points {
        click(editor, store, x, y);
    }
    draft(editor, store, DraftMessage::Complete);
    draft(editor, store, DraftMessage::Confirm);
    store
        .get_polygons(&key())
        .last()
        .map(|p| p.id.clone())
        .unwrap()
}

pub(super) const SQUARE: [(f64, f64); 4] = [(10.0, 10.0), (50.0, 10.0), (50.0, 50.0), (10.0, 50.0)];

pub(super) fn points(coords: &[(f64, f64)]) -> Vec<Point> {
    coords.iter().map(|&p| Point::from(p)).collect()
}

pub(super) fn only_polygon(store: &AnnotationStore) -> &Polygon {
    let polygons = store.get_polygons(&key());
    assert_eq!(polygons.len(), 1);
    &polygons[0]
}

pub(super) fn named(name: &str) -> ShapeName {
    ShapeName::from_label(name)
}
