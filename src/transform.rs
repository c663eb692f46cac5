//! Coordinate transforms between image space and render space.
//!
//! Stored coordinates live in image space (natural image pixels). Drawing
//! first scales them into canvas pixels using the canvas/natural size ratio,
//! then applies the view transform: translate by pan, and scale by zoom about
//! the canvas center. [`Viewport::to_image_space`] is the exact inverse of
//! [`Viewport::to_render_space`].

use serde::{Deserialize, Serialize};

use crate::model::Point;

/// Axis-aligned affine map `p -> (p.x * sx + tx, p.y * sy + ty)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Affine {
    pub sx: f64,
    pub sy: f64,
    pub tx: f64,
    pub ty: f64,
}

impl Affine {
    pub fn identity() -> Self {
        Self {
            sx: 1.0,
            sy: 1.0,
            tx: 0.0,
            ty: 0.0,
        }
    }

    pub fn apply(&self, p: Point) -> Point {
        Point::new(p.x * self.sx + self.tx, p.y * self.sy + self.ty)
    }

    /// Inverse mapping. Scale factors must be non-zero.
    pub fn invert(&self, p: Point) -> Point {
        Point::new((p.x - self.tx) / self.sx, (p.y - self.ty) / self.sy)
    }
}

/// How far the pan offset may travel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PanLimit {
    /// No clamping; the image can be panned fully off-canvas.
    #[default]
    Unbounded,
    /// Keep the zoomed image covering the canvas: the offset never exceeds
    /// `|zoom - 1| * canvas_size / 2` on either axis.
    CoverCanvas,
}

/// Represents pan/zoom view state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    pub zoom: f64,
    pub pan_x: f64,
    pub pan_y: f64,
}

impl ViewTransform {
    /// Create a new transform with the given zoom and pan.
    pub fn new(zoom: f64, pan_x: f64, pan_y: f64) -> Self {
        Self { zoom, pan_x, pan_y }
    }

    /// Create an identity transform (zoom=1, no pan).
    pub fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0)
    }

    /// Zoom in by a factor (e.g., 1.2 for 20% zoom in).
    pub fn zoom_in(&self, factor: f64, max_zoom: f64) -> ViewTransform {
        ViewTransform {
            zoom: (self.zoom * factor).min(max_zoom),
            ..*self
        }
    }

    /// Zoom out by a factor (e.g., 1.2 for 20% zoom out).
    pub fn zoom_out(&self, factor: f64, min_zoom: f64) -> ViewTransform {
        ViewTransform {
            zoom: (self.zoom / factor).max(min_zoom),
            ..*self
        }
    }

    /// Apply a pan delta to the transform.
    pub fn pan_by(&self, dx: f64, dy: f64) -> ViewTransform {
        ViewTransform {
            pan_x: self.pan_x + dx,
            pan_y: self.pan_y + dy,
            ..*self
        }
    }

    /// Clamp the pan offset according to `limit` for a canvas of the given size.
    pub fn clamped(&self, limit: PanLimit, canvas_width: f64, canvas_height: f64) -> ViewTransform {
        match limit {
            PanLimit::Unbounded => *self,
            PanLimit::CoverCanvas => {
                let reach = (self.zoom - 1.0).abs();
                let max_x = reach * canvas_width / 2.0;
                let max_y = reach * canvas_height / 2.0;
                ViewTransform {
                    pan_x: self.pan_x.clamp(-max_x, max_x),
                    pan_y: self.pan_y.clamp(-max_y, max_y),
                    ..*self
                }
            }
        }
    }

    /// Panning is only allowed while zoomed in.
    pub fn can_pan(&self) -> bool {
        self.zoom > 1.0
    }

    /// The composed canvas-space transform: translate by pan, then scale by
    /// zoom about `(center_x, center_y)`.
    pub fn canvas_affine(&self, center_x: f64, center_y: f64) -> Affine {
        Affine {
            sx: self.zoom,
            sy: self.zoom,
            tx: self.pan_x + center_x - self.zoom * center_x,
            ty: self.pan_y + center_y - self.zoom * center_y,
        }
    }
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::identity()
    }
}

/// Canvas and natural image sizes for the image being edited.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub canvas_width: f64,
    pub canvas_height: f64,
    pub natural_width: f64,
    pub natural_height: f64,
}

impl Viewport {
    pub fn new(canvas_width: f64, canvas_height: f64, natural_width: f64, natural_height: f64) -> Self {
        Self {
            canvas_width,
            canvas_height,
            natural_width,
            natural_height,
        }
    }

    /// A viewport whose canvas matches the image's natural size.
    pub fn unscaled(natural_width: f64, natural_height: f64) -> Self {
        Self::new(natural_width, natural_height, natural_width, natural_height)
    }

    /// All four dimensions are positive and finite.
    pub fn is_valid(&self) -> bool {
        [
            self.canvas_width,
            self.canvas_height,
            self.natural_width,
            self.natural_height,
        ]
        .iter()
        .all(|v| v.is_finite() && *v > 0.0)
    }

    /// Image-to-canvas scale factors.
    pub fn scale(&self) -> (f64, f64) {
        (
            self.canvas_width / self.natural_width,
            self.canvas_height / self.natural_height,
        )
    }

    pub fn center(&self) -> (f64, f64) {
        (self.canvas_width / 2.0, self.canvas_height / 2.0)
    }

    /// Image space to canvas space (before pan/zoom).
    pub fn to_canvas(&self, p: Point) -> Point {
        let (sx, sy) = self.scale();
        Point::new(p.x * sx, p.y * sy)
    }

    /// The full image-to-render transform for a view.
    pub fn render_affine(&self, view: &ViewTransform) -> Affine {
        let (sx, sy) = self.scale();
        let (cx, cy) = self.center();
        let canvas = view.canvas_affine(cx, cy);
        Affine {
            sx: sx * canvas.sx,
            sy: sy * canvas.sy,
            tx: canvas.tx,
            ty: canvas.ty,
        }
    }

    /// Image space to render space.
    pub fn to_render_space(&self, view: &ViewTransform, p: Point) -> Point {
        self.render_affine(view).apply(p)
    }

    /// Render (viewport) space to image space.
    pub fn to_image_space(&self, view: &ViewTransform, x: f64, y: f64) -> Point {
        let (cx, cy) = self.center();
        let canvas = view.canvas_affine(cx, cy).invert(Point::new(x, y));
        let (sx, sy) = self.scale();
        Point::new(canvas.x / sx, canvas.y / sy)
    }

    /// Whether an image-space point lies within `[0, w] x [0, h]`.
    pub fn contains(&self, p: &Point) -> bool {
        p.x >= 0.0 && p.y >= 0.0 && p.x <= self.natural_width && p.y <= self.natural_height
    }

    /// Inverse-transform a viewport point, returning `None` outside the image.
    pub fn image_point_at(&self, view: &ViewTransform, x: f64, y: f64) -> Option<Point> {
        let p = self.to_image_space(view, x, y);
        self.contains(&p).then_some(p)
    }
}
