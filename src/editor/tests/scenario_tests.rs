//! End-to-end drawing, resampling and erasing scenarios.

use super::*;
use crate::geometry;
use crate::message::PolygonMessage;

#[test]
fn test_draw_and_name_rectangle() {
    let (mut editor, mut store) = setup();
    select_tool(&mut editor, &mut store, Tool::Draw);
    for &(x, y) in &SQUARE {
        assert_eq!(click(&mut editor, &mut store, x, y), Outcome::Updated);
    }
    assert_eq!(editor.draft().len(), 4);

    assert_eq!(draft(&mut editor, &mut store, DraftMessage::Complete), Outcome::Updated);
    let step = editor.naming().unwrap();
    assert_eq!(step.name, ShapeName::Rectangle);
    assert_eq!(step.group, "1");

    assert_eq!(draft(&mut editor, &mut store, DraftMessage::Confirm), Outcome::Updated);
    let polygon = only_polygon(&store);
    assert_eq!(polygon.points, points(&SQUARE));
    assert_eq!(polygon.original_points, points(&SQUARE));
    assert_eq!(polygon.group, "1");
    assert_eq!(polygon.name, ShapeName::Rectangle);
    assert_eq!(polygon.image_key, key());
    assert!(editor.draft().is_empty());
    assert!(editor.naming().is_none());
}

#[test]
fn test_resample_rectangle_to_eight_points() {
    let (mut editor, mut store) = setup();
    draw_polygon(&mut editor, &mut store, &SQUARE);

    let resampled = geometry::resample(only_polygon(&store), 8);
    assert_eq!(resampled.points.len(), 8);
    assert_eq!(resampled.points[0], Point::new(10.0, 10.0));
    let perimeter = geometry::perimeter(&resampled.points);
    assert!((perimeter - 160.0).abs() <= 1.6, "perimeter was {}", perimeter);
}

#[test]
fn test_point_density_resamples_selected_polygon() {
    let (mut editor, mut store) = setup();
    let id = draw_polygon(&mut editor, &mut store, &SQUARE);

    editor.update(&mut store, Message::Polygon(PolygonMessage::Select(Some(id))));
    let outcome = editor.update(&mut store, Message::Polygon(PolygonMessage::SetPointDensity(16)));
    assert_eq!(outcome, Outcome::Updated);
    assert_eq!(only_polygon(&store).points.len(), 8);
    assert_eq!(crate::handlers::point_density_for(only_polygon(&store)), 16);

    // Going back down resamples from the untouched basis
    editor.update(&mut store, Message::Polygon(PolygonMessage::SetPointDensity(8)));
    let polygon = only_polygon(&store);
    assert_eq!(polygon.points, points(&SQUARE));
}

#[test]
fn test_erase_rectangle_vertex() {
    let (mut editor, mut store) = setup();
    draw_polygon(&mut editor, &mut store, &SQUARE);

    select_tool(&mut editor, &mut store, Tool::Erase);
    assert_eq!(click(&mut editor, &mut store, 51.0, 11.0), Outcome::Updated);

    let polygon = only_polygon(&store);
    assert_eq!(polygon.points.len(), 3);
    assert!(!polygon.points.contains(&Point::new(50.0, 10.0)));
}

#[test]
fn test_erase_refuses_triangle_vertex() {
    let (mut editor, mut store) = setup();
    draw_polygon(&mut editor, &mut store, &[(10.0, 10.0), (50.0, 10.0), (30.0, 40.0)]);

    select_tool(&mut editor, &mut store, Tool::Erase);
    assert_eq!(click(&mut editor, &mut store, 50.0, 10.0), Outcome::Ignored);
    assert_eq!(only_polygon(&store).points.len(), 3);
}

#[test]
fn test_completed_polygons_mark_image_dirty() {
    let (mut editor, mut store) = setup();
    store.take_dirty();
    draw_polygon(&mut editor, &mut store, &SQUARE);
    assert_eq!(store.take_dirty(), vec![key()]);
}
