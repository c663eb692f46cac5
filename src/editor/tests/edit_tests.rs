//! Vertex editing, edge insertion, selection and whole-polygon moves.

use super::*;
use crate::editor::{Cursor, Drag};
use crate::message::PolygonMessage;

fn setup_square() -> (Editor, AnnotationStore, PolygonId) {
    let (mut editor, mut store) = setup();
    let id = draw_polygon(&mut editor, &mut store, &SQUARE);
    select_tool(&mut editor, &mut store, Tool::EditSelect);
    (editor, store, id)
}

#[test]
fn test_vertex_drag_commits_on_release() {
    let (mut editor, mut store, id) = setup_square();

    assert_eq!(down(&mut editor, &mut store, 51.0, 9.0), Outcome::Updated);
    assert_eq!(editor.selected(), Some(&id));
    assert_eq!(move_to(&mut editor, &mut store, 60.0, 5.0), Outcome::Updated);

    // Store is untouched until the drag ends
    assert_eq!(only_polygon(&store).points, points(&SQUARE));
    let visible = editor.visible_polygons(&store);
    assert_eq!(visible[0].points[1], Point::new(60.0, 5.0));

    assert_eq!(up(&mut editor, &mut store, 60.0, 5.0), Outcome::Updated);
    let polygon = only_polygon(&store);
    assert_eq!(polygon.points[1], Point::new(60.0, 5.0));
    assert_eq!(polygon.points.len(), 4);
    assert!(editor.drag().is_none());
}

#[test]
fn test_drag_outside_image_is_ignored() {
    let (mut editor, mut store, _) = setup_square();

    down(&mut editor, &mut store, 50.0, 10.0);
    assert_eq!(move_to(&mut editor, &mut store, 250.0, 10.0), Outcome::Ignored);
    up(&mut editor, &mut store, 250.0, 10.0);
    assert_eq!(only_polygon(&store).points, points(&SQUARE));
}

#[test]
fn test_secondary_click_ends_vertex_drag() {
    let (mut editor, mut store, _) = setup_square();

    down(&mut editor, &mut store, 50.0, 50.0);
    move_to(&mut editor, &mut store, 70.0, 70.0);
    assert_eq!(right_down(&mut editor, &mut store, 70.0, 70.0), Outcome::Updated);
    assert!(editor.drag().is_none());
    assert_eq!(only_polygon(&store).points[2], Point::new(70.0, 70.0));
}

#[test]
fn test_click_on_edge_inserts_vertex() {
    let (mut editor, mut store, _) = setup_square();

    assert_eq!(down(&mut editor, &mut store, 30.0, 10.0), Outcome::Updated);
    match editor.drag() {
        Some(Drag::Vertex { polygon, index }) => {
            assert_eq!(*index, 1);
            assert_eq!(polygon.points.len(), 5);
            assert_eq!(polygon.points[1], Point::new(30.0, 10.0));
        }
        other => panic!("expected vertex drag, got {:?}", other),
    }

    move_to(&mut editor, &mut store, 30.0, 2.0);
    up(&mut editor, &mut store, 30.0, 2.0);

    let polygon = only_polygon(&store);
    assert_eq!(
        polygon.points,
        points(&[(10.0, 10.0), (30.0, 2.0), (50.0, 10.0), (50.0, 50.0), (10.0, 50.0)])
    );
    assert_eq!(polygon.original_points, points(&SQUARE));
}

#[test]
fn test_click_inside_selects_and_empty_click_clears() {
    let (mut editor, mut store, id) = setup_square();

    assert_eq!(click(&mut editor, &mut store, 30.0, 30.0), Outcome::Updated);
    assert_eq!(editor.selected(), Some(&id));
    assert!(editor.drag().is_none());
    assert_eq!(only_polygon(&store).points, points(&SQUARE));

    assert_eq!(click(&mut editor, &mut store, 150.0, 150.0), Outcome::Updated);
    assert!(editor.selected().is_none());
    assert_eq!(click(&mut editor, &mut store, 150.0, 150.0), Outcome::Ignored);
}

#[test]
fn test_nearest_vertex_wins_across_polygons() {
    let (mut editor, mut store, first) = setup_square();
    let second = draw_polygon(
        &mut editor,
        &mut store,
        &[(60.0, 10.0), (100.0, 10.0), (100.0, 50.0)],
    );
    select_tool(&mut editor, &mut store, Tool::EditSelect);

    down(&mut editor, &mut store, 56.0, 10.0);
    assert_eq!(editor.selected(), Some(&second));
    up(&mut editor, &mut store, 56.0, 10.0);

    down(&mut editor, &mut store, 54.0, 10.0);
    assert_eq!(editor.selected(), Some(&first));
}

#[test]
fn test_edit_cursor_feedback() {
    let (mut editor, mut store, _) = setup_square();

    move_to(&mut editor, &mut store, 50.0, 12.0);
    assert_eq!(editor.cursor(&store), Cursor::Pointer);
    move_to(&mut editor, &mut store, 30.0, 11.0);
    assert_eq!(editor.cursor(&store), Cursor::Crosshair);
    move_to(&mut editor, &mut store, 120.0, 120.0);
    assert_eq!(editor.cursor(&store), Cursor::Default);

    down(&mut editor, &mut store, 10.0, 10.0);
    assert_eq!(editor.cursor(&store), Cursor::Pointer);
}

#[test]
fn test_move_polygon_translates_points_and_basis() {
    let (mut editor, mut store, id) = setup_square();
    select_tool(&mut editor, &mut store, Tool::Move);

    assert_eq!(move_to(&mut editor, &mut store, 30.0, 30.0), Outcome::Updated);
    assert_eq!(editor.hovered(), Some(&id));
    assert_eq!(editor.cursor(&store), Cursor::Move);

    down(&mut editor, &mut store, 30.0, 30.0);
    move_to(&mut editor, &mut store, 40.0, 35.0);
    up(&mut editor, &mut store, 40.0, 35.0);

    let expected = points(&[(20.0, 15.0), (60.0, 15.0), (60.0, 55.0), (20.0, 55.0)]);
    let polygon = only_polygon(&store);
    assert_eq!(polygon.points, expected);
    assert_eq!(polygon.original_points, expected);
}

#[test]
fn test_move_and_back_restores_exactly() {
    let (mut editor, mut store, _) = setup_square();
    select_tool(&mut editor, &mut store, Tool::Move);

    down(&mut editor, &mut store, 30.0, 30.0);
    move_to(&mut editor, &mut store, 47.3, 41.9);
    move_to(&mut editor, &mut store, 30.0, 30.0);
    up(&mut editor, &mut store, 30.0, 30.0);

    assert_eq!(only_polygon(&store).points, points(&SQUARE));
    assert_eq!(only_polygon(&store).original_points, points(&SQUARE));
}

#[test]
fn test_second_click_ends_polygon_move() {
    let (mut editor, mut store, _) = setup_square();
    select_tool(&mut editor, &mut store, Tool::Move);

    down(&mut editor, &mut store, 30.0, 30.0);
    move_to(&mut editor, &mut store, 35.0, 30.0);
    assert_eq!(down(&mut editor, &mut store, 35.0, 30.0), Outcome::Updated);
    assert!(editor.drag().is_none());
    assert_eq!(only_polygon(&store).points[0], Point::new(15.0, 10.0));
}

#[test]
fn test_move_outside_polygon_does_nothing() {
    let (mut editor, mut store, _) = setup_square();
    select_tool(&mut editor, &mut store, Tool::Move);

    assert_eq!(down(&mut editor, &mut store, 150.0, 150.0), Outcome::Ignored);
    assert!(editor.drag().is_none());
    assert_eq!(editor.cursor(&store), Cursor::Default);
}

#[test]
fn test_rename_and_delete_by_id() {
    let (mut editor, mut store, id) = setup_square();

    let outcome = editor.update(
        &mut store,
        Message::Polygon(PolygonMessage::Rename {
            id: id.clone(),
            name: named("Leaf"),
            group: "3".to_string(),
        }),
    );
    assert_eq!(outcome, Outcome::Updated);
    assert_eq!(only_polygon(&store).name, named("Leaf"));
    assert_eq!(only_polygon(&store).group, "3");
    assert_eq!(editor.catalog().custom_names(), &["Leaf".to_string()]);

    let blank = editor.update(
        &mut store,
        Message::Polygon(PolygonMessage::Rename {
            id: id.clone(),
            name: named(""),
            group: "3".to_string(),
        }),
    );
    assert_eq!(blank, Outcome::Ignored);
    assert_eq!(only_polygon(&store).name, named("Leaf"));

    let regroup = editor.update(
        &mut store,
        Message::Polygon(PolygonMessage::Rename {
            id: id.clone(),
            name: named("Leaf"),
            group: "  ".to_string(),
        }),
    );
    assert_eq!(regroup, Outcome::Updated);
    assert_eq!(only_polygon(&store).group, "1");

    editor.update(&mut store, Message::Polygon(PolygonMessage::Select(Some(id.clone()))));
    assert_eq!(editor.selected(), Some(&id));
    let deleted = editor.update(&mut store, Message::Polygon(PolygonMessage::Delete(id.clone())));
    assert_eq!(deleted, Outcome::Updated);
    assert!(store.get_polygons(&key()).is_empty());
    assert!(editor.selected().is_none());

    let again = editor.update(&mut store, Message::Polygon(PolygonMessage::Delete(id)));
    assert_eq!(again, Outcome::Ignored);
}

#[test]
fn test_deleting_dragged_polygon_drops_the_drag() {
    let (mut editor, mut store, id) = setup_square();

    down(&mut editor, &mut store, 50.0, 10.0);
    move_to(&mut editor, &mut store, 60.0, 10.0);
    editor.update(&mut store, Message::Polygon(PolygonMessage::Delete(id)));

    assert!(editor.drag().is_none());
    assert_eq!(up(&mut editor, &mut store, 60.0, 10.0), Outcome::Ignored);
    assert!(store.get_polygons(&key()).is_empty());
}
