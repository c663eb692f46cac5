//! Render pipeline: turns editor state into a display list.
//!
//! Shapes are emitted in canvas space (image coordinates scaled by the
//! canvas/natural size ratio). Zoom and pan are not baked in; they travel as
//! [`Frame::transform`], to be applied once around the whole draw. That
//! transform is the forward direction inverted by
//! [`Viewport::to_image_space`].

use crate::color_utils::{
    self, DRAFT_VERTEX, HIGHLIGHT_FILL, HIGHLIGHT_STROKE, LABEL_BACKGROUND, LABEL_TEXT,
    VERTEX_MARKER, Rgba,
};
use crate::config::{DisplayConfig, DisplayMode};
use crate::editor::Editor;
use crate::model::{Point, Polygon, PolygonId};
use crate::store::AnnotationStore;
use crate::transform::{Affine, ViewTransform, Viewport};

/// Stroke width for committed and in-progress outlines.
pub const STROKE_WIDTH: f64 = 2.0;

/// Label box height in canvas pixels.
pub const LABEL_HEIGHT: f64 = 20.0;

/// Horizontal padding inside the label box.
pub const LABEL_PADDING: f64 = 4.0;

/// Gap between the label box and the polygon's first vertex.
pub const LABEL_OFFSET: f64 = 5.0;

/// One drawing primitive.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Fill {
        points: Vec<Point>,
        color: Rgba,
    },
    Stroke {
        points: Vec<Point>,
        color: Rgba,
        width: f64,
        /// Whether the last vertex connects back to the first
        closed: bool,
    },
    Vertex {
        center: Point,
        radius: f64,
        color: Rgba,
    },
    /// Name and group label. `origin` is the top-left corner of the box; the
    /// host measures the text and sizes the box as `text width + 2 * padding`
    /// by `height`.
    Label {
        text: String,
        origin: Point,
        height: f64,
        padding: f64,
        text_color: Rgba,
        background: Rgba,
    },
}

/// A complete display list for one canvas repaint.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Pan/zoom applied around every command.
    pub transform: Affine,
    pub commands: Vec<DrawCommand>,
}

/// Everything a frame depends on.
#[derive(Debug, Clone, Copy)]
pub struct Scene<'a> {
    pub viewport: Viewport,
    pub view: ViewTransform,
    pub polygons: &'a [&'a Polygon],
    pub draft: &'a [Point],
    pub selected: Option<&'a PolygonId>,
    pub display: &'a DisplayConfig,
}

/// Build the display list for a scene.
pub fn build_frame(scene: &Scene<'_>) -> Frame {
    let (cx, cy) = scene.viewport.center();
    let mut commands = Vec::new();

    for polygon in scene.polygons {
        let selected = scene.selected == Some(&polygon.id);
        push_polygon(&mut commands, scene, polygon, selected);
    }
    push_draft(&mut commands, scene);

    Frame {
        transform: scene.view.canvas_affine(cx, cy),
        commands,
    }
}

fn to_canvas(viewport: &Viewport, points: &[Point]) -> Vec<Point> {
    points.iter().map(|&p| viewport.to_canvas(p)).collect()
}

fn push_polygon(commands: &mut Vec<DrawCommand>, scene: &Scene<'_>, polygon: &Polygon, selected: bool) {
    let mode = scene.display.display_mode;
    let points = to_canvas(&scene.viewport, &polygon.points);

    let (fill, stroke) = if selected {
        (HIGHLIGHT_FILL, HIGHLIGHT_STROKE)
    } else {
        (
            color_utils::group_fill(&polygon.group),
            color_utils::group_color(&polygon.group),
        )
    };

    commands.push(DrawCommand::Fill {
        points: points.clone(),
        color: fill,
    });

    if mode == DisplayMode::Polygon {
        commands.push(DrawCommand::Stroke {
            points: points.clone(),
            color: stroke,
            width: STROKE_WIDTH,
            closed: true,
        });
    }

    if selected || mode == DisplayMode::Polygon {
        commands.extend(points.iter().map(|&center| DrawCommand::Vertex {
            center,
            radius: scene.display.vertex_radius,
            color: VERTEX_MARKER,
        }));
    }

    if mode == DisplayMode::Polygon {
        if let Some(first) = points.first() {
            commands.push(DrawCommand::Label {
                text: polygon.label(),
                origin: Point::new(first.x, first.y - LABEL_OFFSET - LABEL_HEIGHT),
                height: LABEL_HEIGHT,
                padding: LABEL_PADDING,
                text_color: LABEL_TEXT,
                background: LABEL_BACKGROUND,
            });
        }
    }
}

/// The in-progress polygon: open outline and vertices in every display mode.
fn push_draft(commands: &mut Vec<DrawCommand>, scene: &Scene<'_>) {
    if scene.draft.is_empty() {
        return;
    }
    let points = to_canvas(&scene.viewport, scene.draft);
    if points.len() > 1 {
        commands.push(DrawCommand::Stroke {
            points: points.clone(),
            color: HIGHLIGHT_STROKE,
            width: STROKE_WIDTH,
            closed: false,
        });
    }
    commands.extend(points.into_iter().map(|center| DrawCommand::Vertex {
        center,
        radius: scene.display.vertex_radius,
        color: DRAFT_VERTEX,
    }));
}

impl Editor {
    /// Display list for the active image, or `None` when no image is open.
    pub fn frame(&self, store: &AnnotationStore, display: &DisplayConfig) -> Option<Frame> {
        let image = self.image()?;
        let polygons = self.visible_polygons(store);
        Some(build_frame(&Scene {
            viewport: image.viewport,
            view: self.view(),
            polygons: &polygons,
            draft: self.draft(),
            selected: self.selected(),
            display,
        }))
    }
}
