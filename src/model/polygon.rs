//! Polygon annotation types and identifiers.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use web_time::{SystemTime, UNIX_EPOCH};

use super::ShapeName;
use crate::geometry;

/// Minimum number of vertices a committed polygon may have.
pub const MIN_POLYGON_VERTICES: usize = 3;

/// Monotonic suffix so two ids minted in the same millisecond still differ.
static ID_SEQUENCE: AtomicU64 = AtomicU64::new(1);

/// A 2D point in image-space pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance_to(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// A new point offset by `(dx, dy)`.
    pub fn translated(&self, dx: f64, dy: f64) -> Point {
        Point::new(self.x + dx, self.y + dy)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

/// Opaque, never-reused polygon identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PolygonId(String);

impl PolygonId {
    /// Mint a fresh identifier.
    pub fn generate() -> Self {
        let seq = ID_SEQUENCE.fetch_add(1, Ordering::Relaxed);
        Self(format!("{}-{}", now_millis(), seq))
    }

    /// Mint a fresh identifier that carries a readable prefix, e.g. the
    /// `instanceId` of a decoded document entry.
    pub fn derived(prefix: &str) -> Self {
        let seq = ID_SEQUENCE.fetch_add(1, Ordering::Relaxed);
        Self(format!("{}-{}-{}", prefix, now_millis(), seq))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for PolygonId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for PolygonId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for PolygonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn now_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
}

/// Identity of an image in the annotation store (usually its URL or path).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageKey(String);

impl ImageKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ImageKey {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ImageKey {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for ImageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A committed polygon annotation.
///
/// `original_points` is the basis for resampling: it is captured when the
/// polygon is created (or explicitly re-anchored) and only ever changes
/// through a whole-polygon move, so repeated density changes never drift.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Polygon {
    pub id: PolygonId,
    pub name: ShapeName,
    pub group: String,
    pub points: Vec<Point>,
    pub original_points: Vec<Point>,
    pub image_key: ImageKey,
}

impl Polygon {
    /// Create a polygon whose resampling basis is its initial vertex list.
    pub fn new(
        id: PolygonId,
        name: ShapeName,
        group: impl Into<String>,
        points: Vec<Point>,
        image_key: ImageKey,
    ) -> Self {
        Self {
            id,
            name,
            group: group.into(),
            original_points: points.clone(),
            points,
            image_key,
        }
    }

    /// Whether the polygon has enough vertices to be committed.
    pub fn is_valid(&self) -> bool {
        self.points.len() >= MIN_POLYGON_VERTICES
    }

    /// Even-odd containment test against the current vertices.
    pub fn contains(&self, point: &Point) -> bool {
        geometry::point_in_polygon(point.x, point.y, &self.points)
    }

    /// Display label, e.g. `"Rectangle (1)"`.
    pub fn label(&self) -> String {
        format!("{} ({})", self.name, self.group)
    }

    /// Translate every vertex and the resampling basis by `(dx, dy)`.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        for p in self.points.iter_mut().chain(self.original_points.iter_mut()) {
            *p = p.translated(dx, dy);
        }
    }

    /// Replace one vertex. Returns false if `index` is out of range.
    pub fn set_vertex(&mut self, index: usize, point: Point) -> bool {
        match self.points.get_mut(index) {
            Some(slot) => {
                *slot = point;
                true
            }
            None => false,
        }
    }

    /// Splice a new vertex in after `edge_index` and return its index.
    pub fn insert_after(&mut self, edge_index: usize, point: Point) -> usize {
        let index = (edge_index + 1).min(self.points.len());
        self.points.insert(index, point);
        index
    }

    /// Remove one vertex, refusing if that would leave fewer than
    /// [`MIN_POLYGON_VERTICES`].
    pub fn remove_vertex(&mut self, index: usize) -> Option<Point> {
        if self.points.len() <= MIN_POLYGON_VERTICES || index >= self.points.len() {
            return None;
        }
        Some(self.points.remove(index))
    }

    /// Make the current vertices the new resampling basis.
    pub fn reanchor(&mut self) {
        self.original_points = self.points.clone();
    }
}
