//! Interactive polygon editor state machine.
//!
//! [`Editor`] owns everything transient about an editing session (active
//! tool, in-progress polygon, drag, selection, view) while committed
//! polygons live in an [`AnnotationStore`] passed in on every call. Input
//! arrives as [`Message`]s; each update reports an [`Outcome`] so the host
//! knows whether to redraw or forward a request to the segmentation service.

mod drag;
mod naming;
mod tool;

#[cfg(test)]
mod tests;

pub use drag::Drag;
pub use naming::{NamingStep, ShapeCatalog};
pub use tool::{Cursor, Tool};

use crate::config::InteractionConfig;
use crate::geometry;
use crate::handlers;
use crate::message::Message;
use crate::model::{ImageKey, MIN_POLYGON_VERTICES, Point, Polygon, PolygonId};
use crate::store::AnnotationStore;
use crate::transform::{ViewTransform, Viewport};

/// The image currently shown in the editor.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveImage {
    pub key: ImageKey,
    pub viewport: Viewport,
}

/// Request for the assisted segmentation service.
#[derive(Debug, Clone, PartialEq)]
pub enum AssistedRequest {
    /// Point prompt in image space; `positive` is false for exclusion clicks.
    Click { point: Point, positive: bool },
    FinishObject,
    UndoClick,
    ResetClicks,
    /// Leaving assisted mode; accepted objects should be committed.
    Commit,
}

/// Result of processing one message.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Nothing changed.
    Ignored,
    /// Editor or store state changed; redraw.
    Updated,
    /// The host should forward this to the segmentation service.
    Assisted(AssistedRequest),
}

impl Outcome {
    pub fn is_ignored(&self) -> bool {
        matches!(self, Outcome::Ignored)
    }
}

/// Editing session for one image at a time.
#[derive(Debug, Clone)]
pub struct Editor {
    pub(crate) config: InteractionConfig,
    pub(crate) image: Option<ActiveImage>,
    pub(crate) view: ViewTransform,
    pub(crate) tool: Tool,
    pub(crate) assisted: bool,
    /// Vertices of the polygon being drawn.
    pub(crate) draft: Vec<Point>,
    /// Set when the naming step was cancelled; the draft then survives tool
    /// switches.
    pub(crate) draft_preserved: bool,
    pub(crate) naming: Option<NamingStep>,
    pub(crate) drag: Option<Drag>,
    pub(crate) selected: Option<PolygonId>,
    /// Polygon under the pointer in move mode.
    pub(crate) hovered: Option<PolygonId>,
    /// Last pointer position in image space, `None` outside the image.
    pub(crate) pointer: Option<Point>,
    pub(crate) catalog: ShapeCatalog,
    /// Name and group preselected in the next naming step.
    pub(crate) last_choice: NamingStep,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(InteractionConfig::default())
    }
}

impl Editor {
    pub fn new(config: InteractionConfig) -> Self {
        Self {
            config,
            image: None,
            view: ViewTransform::default(),
            tool: Tool::default(),
            assisted: false,
            draft: Vec::new(),
            draft_preserved: false,
            naming: None,
            drag: None,
            selected: None,
            hovered: None,
            pointer: None,
            catalog: ShapeCatalog::new(),
            last_choice: NamingStep::default(),
        }
    }

    /// Process one message.
    pub fn update(&mut self, store: &mut AnnotationStore, message: Message) -> Outcome {
        match message {
            Message::Pointer(msg) => handlers::handle_pointer(self, store, msg),
            Message::Tool(msg) => handlers::handle_tool(self, store, msg),
            Message::Draft(msg) => handlers::handle_draft(self, store, msg),
            Message::Polygon(msg) => handlers::handle_polygon(self, store, msg),
            Message::View(msg) => handlers::handle_view(self, msg),
            Message::Assisted(msg) => handlers::handle_assisted(self, msg),
        }
    }

    /// Switch to another image.
    ///
    /// Any drag is committed to the image it was started on; the draft and
    /// naming step are discarded. The view transform is kept.
    pub fn open_image(&mut self, store: &mut AnnotationStore, key: ImageKey, viewport: Viewport) {
        handlers::finish_drag(self, store);
        if !self.draft.is_empty() {
            log::debug!("Discarding {} draft vertex(es) on image switch", self.draft.len());
        }
        self.draft.clear();
        self.draft_preserved = false;
        self.naming = None;
        self.selected = None;
        self.hovered = None;
        self.pointer = None;

        store.touch(&key);
        log::info!("Editing image {}", key);
        self.image = Some(ActiveImage { key, viewport });
    }

    pub fn config(&self) -> &InteractionConfig {
        &self.config
    }

    pub fn image(&self) -> Option<&ActiveImage> {
        self.image.as_ref()
    }

    pub fn image_key(&self) -> Option<&ImageKey> {
        self.image.as_ref().map(|image| &image.key)
    }

    pub fn view(&self) -> ViewTransform {
        self.view
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn is_assisted(&self) -> bool {
        self.assisted
    }

    pub fn draft(&self) -> &[Point] {
        &self.draft
    }

    /// The draft has enough vertices to be completed.
    pub fn can_complete(&self) -> bool {
        self.draft.len() >= MIN_POLYGON_VERTICES && self.naming.is_none()
    }

    pub fn naming(&self) -> Option<&NamingStep> {
        self.naming.as_ref()
    }

    pub fn drag(&self) -> Option<&Drag> {
        self.drag.as_ref()
    }

    pub fn selected(&self) -> Option<&PolygonId> {
        self.selected.as_ref()
    }

    pub fn hovered(&self) -> Option<&PolygonId> {
        self.hovered.as_ref()
    }

    pub fn catalog(&self) -> &ShapeCatalog {
        &self.catalog
    }

    /// Committed polygons of the active image with any drag's working copy
    /// substituted in.
    pub fn visible_polygons<'a>(&'a self, store: &'a AnnotationStore) -> Vec<&'a Polygon> {
        let Some(image) = self.image.as_ref() else {
            return Vec::new();
        };
        let working = self.drag.as_ref().and_then(Drag::working_polygon);
        store
            .get_polygons(&image.key)
            .iter()
            .map(|polygon| match working {
                Some(w) if w.id == polygon.id => w,
                _ => polygon,
            })
            .collect()
    }

    /// Cursor for the current tool, drag and pointer position.
    pub fn cursor(&self, store: &AnnotationStore) -> Cursor {
        if self.assisted {
            return Cursor::Crosshair;
        }
        match self.drag {
            Some(Drag::Pan { .. }) => return Cursor::Grabbing,
            Some(Drag::Vertex { .. }) => return Cursor::Pointer,
            Some(Drag::Polygon { .. }) => return Cursor::Move,
            None => {}
        }

        let polygons = self.visible_polygons(store);
        match self.tool {
            Tool::Pan if self.view.can_pan() => Cursor::Grab,
            Tool::Pan => Cursor::NotAllowed,
            Tool::Draw => Cursor::Crosshair,
            Tool::EditSelect => {
                let Some(p) = self.pointer else {
                    return Cursor::Default;
                };
                let tolerance = self.config.vertex_tolerance;
                if polygons.iter().any(|polygon| {
                    geometry::closest_point(&polygon.points, p.x, p.y)
                        .is_some_and(|hit| hit.distance < tolerance)
                }) {
                    Cursor::Pointer
                } else if polygons.iter().any(|polygon| {
                    geometry::near_edge(p.x, p.y, &polygon.points, self.config.edge_tolerance)
                        .is_some()
                }) {
                    Cursor::Crosshair
                } else {
                    Cursor::Default
                }
            }
            Tool::Erase => {
                let Some(p) = self.pointer else {
                    return Cursor::Default;
                };
                let tolerance = self.config.erase_tolerance;
                let near = |points: &[Point]| {
                    geometry::closest_point(points, p.x, p.y)
                        .is_some_and(|hit| hit.distance <= tolerance)
                };
                let erasable = near(self.draft.as_slice())
                    || polygons.iter().any(|polygon| {
                        polygon.points.len() > MIN_POLYGON_VERTICES
                            && near(polygon.points.as_slice())
                    });
                if erasable {
                    Cursor::Pointer
                } else {
                    Cursor::Default
                }
            }
            Tool::Move if self.hovered.is_some() => Cursor::Move,
            Tool::Move => Cursor::Default,
        }
    }
}
