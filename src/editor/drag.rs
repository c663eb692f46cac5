//! In-flight pointer drags.

use crate::model::{Point, Polygon, PolygonId};

/// A drag in progress.
///
/// Vertex and polygon drags edit a working copy of the polygon; the store is
/// only written when the drag ends.
#[derive(Debug, Clone, PartialEq)]
pub enum Drag {
    /// Dragging one vertex of `polygon`.
    Vertex { polygon: Polygon, index: usize },
    /// Translating all of `polygon`. `origin` is the polygon as it was when
    /// the drag started at `anchor`; every move translates from it.
    Polygon {
        origin: Polygon,
        polygon: Polygon,
        anchor: Point,
    },
    /// Panning the view; the anchor is in viewport coordinates.
    Pan { anchor_x: f64, anchor_y: f64 },
}

impl Drag {
    /// Start translating `polygon` from the pointer position `anchor`.
    pub fn polygon(polygon: Polygon, anchor: Point) -> Self {
        Drag::Polygon {
            origin: polygon.clone(),
            polygon,
            anchor,
        }
    }

    /// Working copy of the dragged polygon, if any.
    pub fn working_polygon(&self) -> Option<&Polygon> {
        match self {
            Drag::Vertex { polygon, .. } | Drag::Polygon { polygon, .. } => Some(polygon),
            Drag::Pan { .. } => None,
        }
    }

    pub fn polygon_id(&self) -> Option<&PolygonId> {
        self.working_polygon().map(|p| &p.id)
    }

    /// Consume the drag, returning the polygon to commit.
    pub fn into_polygon(self) -> Option<Polygon> {
        match self {
            Drag::Vertex { polygon, .. } | Drag::Polygon { polygon, .. } => Some(polygon),
            Drag::Pan { .. } => None,
        }
    }

    pub fn is_pan(&self) -> bool {
        matches!(self, Drag::Pan { .. })
    }

    /// Apply a pointer move in image space.
    pub fn move_to(&mut self, point: Point) {
        match self {
            Drag::Vertex { polygon, index } => {
                polygon.set_vertex(*index, point);
            }
            Drag::Polygon {
                origin,
                polygon,
                anchor,
            } => {
                let mut moved = origin.clone();
                moved.translate(point.x - anchor.x, point.y - anchor.y);
                *polygon = moved;
            }
            Drag::Pan { .. } => {}
        }
    }
}
