//! Message handlers for the polygon editor.
//!
//! Each handler processes one category of messages, keeping
//! [`Editor::update`] a plain dispatcher. Refused input (clicks outside the
//! image, removing a vertex from a triangle, completing a two-point draft)
//! is logged and reported as [`Outcome::Ignored`]; it never fails.

use crate::editor::{ActiveImage, AssistedRequest, Drag, Editor, NamingStep, Outcome, Tool};
use crate::geometry;
use crate::message::{
    AssistedMessage, DraftMessage, PointerButton, PointerMessage, PolygonMessage, ToolMessage,
    ViewMessage,
};
use crate::model::{MIN_POLYGON_VERTICES, Point, Polygon, PolygonId};
use crate::store::AnnotationStore;

// ============================================================================
// Pointer
// ============================================================================

/// Handle pointer down/move/up on the canvas.
pub fn handle_pointer(
    editor: &mut Editor,
    store: &mut AnnotationStore,
    msg: PointerMessage,
) -> Outcome {
    let Some(image) = editor.image.clone() else {
        log::trace!("Pointer event with no image loaded, ignoring");
        return Outcome::Ignored;
    };

    match msg {
        PointerMessage::Down { x, y, button } => pointer_down(editor, store, &image, x, y, button),
        PointerMessage::Move { x, y } => pointer_move(editor, store, &image, x, y),
        PointerMessage::Up { .. } => pointer_up(editor, store, &image),
    }
}

fn pointer_down(
    editor: &mut Editor,
    store: &mut AnnotationStore,
    image: &ActiveImage,
    x: f64,
    y: f64,
    button: PointerButton,
) -> Outcome {
    if editor.assisted {
        // The segmentation service does its own bounds handling
        let point = image.viewport.to_image_space(&editor.view, x, y);
        return Outcome::Assisted(AssistedRequest::Click {
            point,
            positive: button == PointerButton::Primary,
        });
    }

    if button == PointerButton::Secondary {
        if matches!(editor.drag, Some(Drag::Vertex { .. })) {
            log::debug!("Secondary click ends vertex drag");
            return commit_drag(editor, store, image);
        }
        return Outcome::Ignored;
    }

    if editor.naming.is_some() {
        log::trace!("Naming step open, ignoring pointer down");
        return Outcome::Ignored;
    }

    if editor.tool == Tool::Pan {
        if !editor.view.can_pan() {
            return Outcome::Ignored;
        }
        editor.drag = Some(Drag::Pan {
            anchor_x: x,
            anchor_y: y,
        });
        log::debug!("Pan drag started at ({:.1}, {:.1})", x, y);
        return Outcome::Updated;
    }

    // A second click ends a polygon move
    if matches!(editor.drag, Some(Drag::Polygon { .. })) {
        return commit_drag(editor, store, image);
    }

    let Some(point) = image.viewport.image_point_at(&editor.view, x, y) else {
        log::trace!("Click at ({:.1}, {:.1}) is outside the image", x, y);
        return Outcome::Ignored;
    };

    match editor.tool {
        Tool::Draw => {
            editor.draft.push(point);
            log::trace!("Draft vertex {} at ({:.1}, {:.1})", editor.draft.len(), point.x, point.y);
            Outcome::Updated
        }
        Tool::EditSelect => begin_edit(editor, store, image, point),
        Tool::Erase => erase_vertex(editor, store, image, point),
        Tool::Move => begin_move(editor, store, image, point),
        Tool::Pan => Outcome::Ignored,
    }
}

fn pointer_move(
    editor: &mut Editor,
    store: &AnnotationStore,
    image: &ActiveImage,
    x: f64,
    y: f64,
) -> Outcome {
    let point = image.viewport.image_point_at(&editor.view, x, y);
    let cursor_before = editor.cursor(store);
    editor.pointer = point;

    if let Some(Drag::Pan { anchor_x, anchor_y }) = editor.drag.as_mut() {
        let (dx, dy) = (x - *anchor_x, y - *anchor_y);
        *anchor_x = x;
        *anchor_y = y;
        editor.view = editor.view.pan_by(dx, dy).clamped(
            editor.config.pan_limit,
            image.viewport.canvas_width,
            image.viewport.canvas_height,
        );
        log::trace!("Panning: pan({:.1}, {:.1})", editor.view.pan_x, editor.view.pan_y);
        return Outcome::Updated;
    }

    if let Some(drag) = editor.drag.as_mut() {
        return match point {
            Some(point) => {
                drag.move_to(point);
                Outcome::Updated
            }
            None => Outcome::Ignored,
        };
    }

    if editor.tool == Tool::Move {
        let hovered = point
            .and_then(|p| store.hit_test(&image.key, &p))
            .map(|p| p.id.clone());
        if hovered != editor.hovered {
            editor.hovered = hovered;
            return Outcome::Updated;
        }
    }

    if editor.cursor(store) != cursor_before {
        Outcome::Updated
    } else {
        Outcome::Ignored
    }
}

fn pointer_up(editor: &mut Editor, store: &mut AnnotationStore, image: &ActiveImage) -> Outcome {
    match editor.drag {
        Some(Drag::Pan { .. }) => {
            editor.drag = None;
            log::debug!("Pan drag ended");
            Outcome::Updated
        }
        Some(_) => commit_drag(editor, store, image),
        None => Outcome::Ignored,
    }
}

/// Vertex hit, then edge insert, then plain selection.
fn begin_edit(
    editor: &mut Editor,
    store: &AnnotationStore,
    image: &ActiveImage,
    point: Point,
) -> Outcome {
    let polygons = store.get_polygons(&image.key);
    let tolerance = editor.config.vertex_tolerance;

    let mut nearest: Option<(&Polygon, geometry::ClosestPoint)> = None;
    for polygon in polygons {
        if let Some(hit) = geometry::closest_point(&polygon.points, point.x, point.y) {
            if hit.distance < tolerance
                && nearest.is_none_or(|(_, best)| hit.distance < best.distance)
            {
                nearest = Some((polygon, hit));
            }
        }
    }
    if let Some((polygon, hit)) = nearest {
        log::debug!("Dragging vertex {} of polygon {}", hit.index, polygon.id);
        editor.selected = Some(polygon.id.clone());
        editor.drag = Some(Drag::Vertex {
            polygon: polygon.clone(),
            index: hit.index,
        });
        return Outcome::Updated;
    }

    for polygon in polygons {
        if let Some(edge) =
            geometry::near_edge(point.x, point.y, &polygon.points, editor.config.edge_tolerance)
        {
            let mut working = polygon.clone();
            let index = working.insert_after(edge.edge_index, edge.point);
            log::debug!(
                "Inserted vertex {} on edge {} of polygon {}",
                index,
                edge.edge_index,
                polygon.id
            );
            editor.selected = Some(polygon.id.clone());
            editor.drag = Some(Drag::Vertex {
                polygon: working,
                index,
            });
            return Outcome::Updated;
        }
    }

    let hit = store.hit_test(&image.key, &point).map(|p| p.id.clone());
    if hit.is_none() && editor.selected.is_none() {
        return Outcome::Ignored;
    }
    log::debug!("Selected polygon: {:?}", hit);
    editor.selected = hit;
    Outcome::Updated
}

fn begin_move(
    editor: &mut Editor,
    store: &AnnotationStore,
    image: &ActiveImage,
    point: Point,
) -> Outcome {
    let Some(polygon) = store.hit_test(&image.key, &point) else {
        return Outcome::Ignored;
    };
    log::debug!("Moving polygon {}", polygon.id);
    editor.hovered = Some(polygon.id.clone());
    editor.drag = Some(Drag::polygon(polygon.clone(), point));
    Outcome::Updated
}

/// Remove the nearest vertex, preferring the in-progress polygon.
fn erase_vertex(
    editor: &mut Editor,
    store: &mut AnnotationStore,
    image: &ActiveImage,
    point: Point,
) -> Outcome {
    let tolerance = editor.config.erase_tolerance;

    if let Some(hit) = geometry::closest_point(&editor.draft, point.x, point.y) {
        if hit.distance <= tolerance {
            editor.draft.remove(hit.index);
            log::debug!("Erased draft vertex {}", hit.index);
            return Outcome::Updated;
        }
    }

    let mut nearest: Option<(PolygonId, usize, usize, f64)> = None;
    for polygon in store.get_polygons(&image.key) {
        if let Some(hit) = geometry::closest_point(&polygon.points, point.x, point.y) {
            if hit.distance <= tolerance
                && nearest
                    .as_ref()
                    .is_none_or(|(_, _, _, best)| hit.distance < *best)
            {
                nearest = Some((polygon.id.clone(), hit.index, polygon.points.len(), hit.distance));
            }
        }
    }

    let Some((id, index, len, _)) = nearest else {
        return Outcome::Ignored;
    };
    if len <= MIN_POLYGON_VERTICES {
        log::warn!(
            "Cannot remove point: polygon must have at least {} points",
            MIN_POLYGON_VERTICES
        );
        return Outcome::Ignored;
    }

    store.update_polygon(&image.key, &id, |polygon| {
        polygon.remove_vertex(index);
    });
    log::debug!("Erased vertex {} of polygon {}", index, id);
    Outcome::Updated
}

/// Write the dragged working copy back to the store.
fn commit_drag(editor: &mut Editor, store: &mut AnnotationStore, image: &ActiveImage) -> Outcome {
    let Some(drag) = editor.drag.take() else {
        return Outcome::Ignored;
    };
    match drag.into_polygon() {
        Some(polygon) => {
            if store.get_polygon(&image.key, &polygon.id).is_none() {
                log::warn!("Dragged polygon {} no longer exists, dropping edit", polygon.id);
                return Outcome::Ignored;
            }
            log::debug!("Committed drag of polygon {}", polygon.id);
            store.upsert_polygon(&image.key, polygon);
            Outcome::Updated
        }
        None => Outcome::Updated,
    }
}

/// End any drag, committing polygon edits to the image they were made on.
pub(crate) fn finish_drag(editor: &mut Editor, store: &mut AnnotationStore) {
    if let Some(image) = editor.image.clone() {
        commit_drag(editor, store, &image);
    } else {
        editor.drag = None;
    }
}

// ============================================================================
// Tools
// ============================================================================

/// Handle tool and assisted-mode switches.
pub fn handle_tool(editor: &mut Editor, store: &mut AnnotationStore, msg: ToolMessage) -> Outcome {
    match msg {
        ToolMessage::Select(tool) => {
            if tool == editor.tool {
                return Outcome::Ignored;
            }
            finish_drag(editor, store);
            if editor.naming.take().is_some() {
                editor.draft_preserved = true;
            }
            // Erase edits the draft, so switches to and from it keep it
            let keeps_draft =
                editor.draft_preserved || tool == Tool::Erase || editor.tool == Tool::Erase;
            if !editor.draft.is_empty() && !keeps_draft {
                log::debug!("Discarding {} draft vertex(es) on tool switch", editor.draft.len());
                editor.draft.clear();
            }
            editor.hovered = None;
            editor.tool = tool;
            log::debug!("Tool selected: {}", tool.name());
            Outcome::Updated
        }
        ToolMessage::SetAssisted(on) => {
            if on == editor.assisted {
                return Outcome::Ignored;
            }
            editor.assisted = on;
            if on {
                finish_drag(editor, store);
                log::info!("Entered assisted segmentation mode");
                Outcome::Updated
            } else {
                log::info!("Left assisted segmentation mode");
                Outcome::Assisted(AssistedRequest::Commit)
            }
        }
    }
}

// ============================================================================
// Draft / naming step
// ============================================================================

/// Handle completion and naming of the in-progress polygon.
pub fn handle_draft(editor: &mut Editor, store: &mut AnnotationStore, msg: DraftMessage) -> Outcome {
    match msg {
        DraftMessage::Complete => {
            if editor.draft.len() < MIN_POLYGON_VERTICES {
                log::debug!(
                    "Cannot complete polygon with {} point(s), need {}",
                    editor.draft.len(),
                    MIN_POLYGON_VERTICES
                );
                return Outcome::Ignored;
            }
            if editor.naming.is_some() {
                return Outcome::Ignored;
            }
            editor.naming = Some(editor.last_choice.clone());
            Outcome::Updated
        }
        DraftMessage::SetName(name) => match editor.naming.as_mut() {
            Some(step) => {
                step.name = name;
                Outcome::Updated
            }
            None => Outcome::Ignored,
        },
        DraftMessage::SetGroup(group) => match editor.naming.as_mut() {
            Some(step) => {
                step.group = group;
                Outcome::Updated
            }
            None => Outcome::Ignored,
        },
        DraftMessage::Confirm => confirm_naming(editor, store),
        DraftMessage::Cancel => {
            if editor.naming.take().is_none() {
                return Outcome::Ignored;
            }
            editor.draft_preserved = true;
            log::debug!("Naming cancelled, keeping {} draft vertex(es)", editor.draft.len());
            Outcome::Updated
        }
        DraftMessage::Discard => {
            if editor.draft.is_empty() && editor.naming.is_none() {
                return Outcome::Ignored;
            }
            editor.draft.clear();
            editor.naming = None;
            editor.draft_preserved = false;
            Outcome::Updated
        }
    }
}

fn confirm_naming(editor: &mut Editor, store: &mut AnnotationStore) -> Outcome {
    let Some(step) = editor.naming.clone() else {
        return Outcome::Ignored;
    };
    if !step.is_acceptable() {
        log::warn!("Custom shape name must not be empty");
        return Outcome::Ignored;
    }
    let Some(image) = editor.image.clone() else {
        return Outcome::Ignored;
    };

    let group = step.resolved_group();
    let polygon = Polygon::new(
        PolygonId::generate(),
        step.name.clone(),
        group.clone(),
        std::mem::take(&mut editor.draft),
        image.key.clone(),
    );
    log::info!(
        "Created polygon {} '{}' with {} points",
        polygon.id,
        polygon.label(),
        polygon.points.len()
    );
    store.upsert_polygon(&image.key, polygon);

    editor.catalog.remember(&step.name);
    editor.last_choice = NamingStep {
        name: step.name,
        group,
    };
    editor.naming = None;
    editor.draft_preserved = false;
    Outcome::Updated
}

// ============================================================================
// Polygon list
// ============================================================================

/// Number of vertices to resample to for a point-density value.
pub fn resample_target(density: usize) -> usize {
    (density / 2).clamp(
        crate::constants::MIN_RESAMPLE_POINTS,
        crate::constants::MAX_RESAMPLE_POINTS,
    )
}

/// Point-density value that corresponds to a polygon's current vertex count.
pub fn point_density_for(polygon: &Polygon) -> usize {
    (polygon.points.len() * 2).clamp(
        crate::constants::MIN_POINT_DENSITY,
        crate::constants::MAX_POINT_DENSITY,
    )
}

/// Handle selection, rename, delete and resampling of committed polygons.
pub fn handle_polygon(
    editor: &mut Editor,
    store: &mut AnnotationStore,
    msg: PolygonMessage,
) -> Outcome {
    let Some(image) = editor.image.clone() else {
        return Outcome::Ignored;
    };

    match msg {
        PolygonMessage::Select(id) => {
            let id = id.filter(|id| store.get_polygon(&image.key, id).is_some());
            if id == editor.selected {
                return Outcome::Ignored;
            }
            editor.selected = id;
            Outcome::Updated
        }
        PolygonMessage::Rename { id, name, group } => {
            let step = NamingStep { name, group };
            if !step.is_acceptable() {
                log::warn!("Custom shape name must not be empty");
                return Outcome::Ignored;
            }
            let group = step.resolved_group();
            let updated = store.update_polygon(&image.key, &id, |polygon| {
                polygon.name = step.name.clone();
                polygon.group = group;
            });
            if !updated {
                return Outcome::Ignored;
            }
            editor.catalog.remember(&step.name);
            Outcome::Updated
        }
        PolygonMessage::Delete(id) => {
            if editor.drag.as_ref().and_then(Drag::polygon_id) == Some(&id) {
                editor.drag = None;
            }
            if store.delete_polygon(&image.key, &id).is_none() {
                return Outcome::Ignored;
            }
            if editor.selected.as_ref() == Some(&id) {
                editor.selected = None;
            }
            if editor.hovered.as_ref() == Some(&id) {
                editor.hovered = None;
            }
            Outcome::Updated
        }
        PolygonMessage::SetPointDensity(density) => {
            let Some(id) = editor.selected.clone() else {
                return Outcome::Ignored;
            };
            let target = resample_target(density);
            let updated = store.update_polygon(&image.key, &id, |polygon| {
                polygon.points = geometry::resample(polygon, target).points;
            });
            if !updated {
                return Outcome::Ignored;
            }
            log::debug!("Resampled polygon {} to {} points", id, target);
            Outcome::Updated
        }
    }
}

// ============================================================================
// View
// ============================================================================

/// Handle zoom stepping, view reset and viewport resizes.
pub fn handle_view(editor: &mut Editor, msg: ViewMessage) -> Outcome {
    let config = &editor.config;
    let before = editor.view;
    match msg {
        ViewMessage::ZoomIn => {
            editor.view = editor.view.zoom_in(config.zoom_step, config.max_zoom);
            log::debug!("Zoom in: {:.2}x", editor.view.zoom);
        }
        ViewMessage::ZoomOut => {
            editor.view = editor.view.zoom_out(config.zoom_step, config.min_zoom);
            log::debug!("Zoom out: {:.2}x", editor.view.zoom);
        }
        ViewMessage::Reset => {
            editor.view = Default::default();
            log::debug!("View reset");
        }
        ViewMessage::Resize(viewport) => {
            if !viewport.is_valid() {
                log::warn!("Ignoring invalid viewport {:?}", viewport);
                return Outcome::Ignored;
            }
            return match editor.image.as_mut() {
                Some(image) => {
                    image.viewport = viewport;
                    Outcome::Updated
                }
                None => Outcome::Ignored,
            };
        }
    }

    if let Some(image) = editor.image.as_ref() {
        editor.view = editor.view.clamped(
            editor.config.pan_limit,
            image.viewport.canvas_width,
            image.viewport.canvas_height,
        );
    }
    if editor.view == before {
        Outcome::Ignored
    } else {
        Outcome::Updated
    }
}

// ============================================================================
// Assisted segmentation
// ============================================================================

/// Translate assisted-mode controls into requests for the bridge.
pub fn handle_assisted(editor: &Editor, msg: AssistedMessage) -> Outcome {
    if !editor.assisted {
        log::debug!("Assisted control {:?} outside assisted mode, ignoring", msg);
        return Outcome::Ignored;
    }
    Outcome::Assisted(match msg {
        AssistedMessage::FinishObject => AssistedRequest::FinishObject,
        AssistedMessage::UndoClick => AssistedRequest::UndoClick,
        AssistedMessage::ResetClicks => AssistedRequest::ResetClicks,
    })
}
