//! Data models for polygon annotations.

mod polygon;
mod shape_name;

pub use polygon::{ImageKey, MIN_POLYGON_VERTICES, Point, Polygon, PolygonId};
pub use shape_name::ShapeName;
