//! Normalization of loosely-typed polygon data.
//!
//! Polygon collections that arrive from outside the editor (clipboard,
//! scripts, older saves) may be a list, a single polygon object or `null`,
//! with ids missing and image keys stale. Everything goes through
//! [`normalize_polygons`] before it can reach the store.

use serde_json::Value;

use crate::format::error::FormatError;
use crate::model::{ImageKey, MIN_POLYGON_VERTICES, Point, Polygon, PolygonId, ShapeName};
use crate::store::AnnotationStore;

/// A validated polygon record whose id may be unknown.
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonRecord {
    pub id: Option<PolygonId>,
    pub name: ShapeName,
    pub group: String,
    pub points: Vec<Point>,
    pub original_points: Option<Vec<Point>>,
}

impl PolygonRecord {
    /// Build a polygon for `image_key`, minting an id when the record has none.
    pub fn into_polygon(self, image_key: &ImageKey) -> Polygon {
        let id = self
            .id
            .unwrap_or_else(|| PolygonId::derived(self.name.as_str()));
        let mut polygon = Polygon::new(id, self.name, self.group, self.points, image_key.clone());
        if let Some(original) = self.original_points {
            polygon.original_points = original;
        }
        polygon
    }
}

/// Coerce a list, a single polygon object or `null` into validated records.
pub fn normalize_polygons(value: &Value) -> Result<Vec<PolygonRecord>, FormatError> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => items.iter().map(normalize_record).collect(),
        Value::Object(_) => Ok(vec![normalize_record(value)?]),
        other => Err(FormatError::invalid_format(format!(
            "expected a polygon list or object, found {}",
            json_kind(other)
        ))),
    }
}

/// Write normalized records into the store for one image.
///
/// Records with an id are upserted by id. Records without one replace the
/// first polygon that has the same name, or are appended.
pub fn apply_records(
    store: &mut AnnotationStore,
    image_key: &ImageKey,
    records: Vec<PolygonRecord>,
) {
    let count = records.len();
    for record in records {
        let has_id = record.id.is_some();
        let polygon = record.into_polygon(image_key);
        if has_id {
            store.upsert_polygon(image_key, polygon);
        } else {
            store.upsert_by_name(image_key, polygon);
        }
    }
    log::debug!("Imported {} polygon record(s) into {}", count, image_key);
}

fn normalize_record(value: &Value) -> Result<PolygonRecord, FormatError> {
    let object = value.as_object().ok_or_else(|| {
        FormatError::invalid_format(format!(
            "expected polygon object, found {}",
            json_kind(value)
        ))
    })?;

    let name = object
        .get("name")
        .and_then(Value::as_str)
        .map(ShapeName::from)
        .unwrap_or_default();

    let points = match object.get("points") {
        Some(points) => parse_points(points)?,
        None => return Err(FormatError::missing_field("points")),
    };
    if points.len() < MIN_POLYGON_VERTICES {
        return Err(FormatError::TooFewVertices {
            name: name.to_string(),
            count: points.len(),
        });
    }

    let original_points = match object.get("originalPoints") {
        None | Some(Value::Null) => None,
        Some(original) => {
            let original = parse_points(original)?;
            (original.len() >= MIN_POLYGON_VERTICES).then_some(original)
        }
    };

    Ok(PolygonRecord {
        id: object.get("id").and_then(scalar_string).map(PolygonId::from),
        group: object
            .get("group")
            .and_then(scalar_string)
            .unwrap_or_else(|| crate::constants::DEFAULT_GROUP.to_string()),
        name,
        points,
        original_points,
    })
}

/// Accept `[{x, y}, ...]` or `[[x, y], ...]`.
fn parse_points(value: &Value) -> Result<Vec<Point>, FormatError> {
    let items = value
        .as_array()
        .ok_or_else(|| FormatError::invalid_coordinates("point list is not an array"))?;
    items.iter().map(parse_point).collect()
}

fn parse_point(value: &Value) -> Result<Point, FormatError> {
    let (x, y) = match value {
        Value::Object(map) => (
            map.get("x").and_then(Value::as_f64),
            map.get("y").and_then(Value::as_f64),
        ),
        Value::Array(pair) if pair.len() == 2 => (pair[0].as_f64(), pair[1].as_f64()),
        _ => (None, None),
    };
    match (x, y) {
        (Some(x), Some(y)) if x.is_finite() && y.is_finite() => Ok(Point::new(x, y)),
        _ => Err(FormatError::invalid_coordinates(format!("bad point {}", value))),
    }
}

/// Strings pass through; numbers are formatted (groups are often small integers).
fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_null_is_empty() {
        assert!(normalize_polygons(&Value::Null).unwrap().is_empty());
    }

    #[test]
    fn test_single_object_becomes_list() {
        let value = json!({
            "id": "p1",
            "name": "Star",
            "group": 2,
            "points": [{"x": 0, "y": 0}, {"x": 4, "y": 0}, {"x": 0, "y": 4}]
        });
        let records = normalize_polygons(&value).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, Some(PolygonId::from("p1")));
        assert_eq!(records[0].name, ShapeName::Star);
        assert_eq!(records[0].group, "2");
        assert_eq!(records[0].points[1], Point::new(4.0, 0.0));
    }

    #[test]
    fn test_pair_points_and_defaults() {
        let value = json!([{ "points": [[1.5, 2], [3, 4], [5, 6]] }]);
        let records = normalize_polygons(&value).unwrap();
        assert_eq!(records[0].id, None);
        assert_eq!(records[0].name, ShapeName::Rectangle);
        assert_eq!(records[0].group, "1");
        assert_eq!(records[0].points[0], Point::new(1.5, 2.0));
    }

    #[test]
    fn test_rejects_bad_shapes() {
        assert!(matches!(
            normalize_polygons(&json!("nope")),
            Err(FormatError::InvalidFormat { .. })
        ));
        assert!(matches!(
            normalize_polygons(&json!({"name": "Star"})),
            Err(FormatError::MissingField { .. })
        ));
        assert!(matches!(
            normalize_polygons(&json!({"points": [[0, 0], [1, 1]]})),
            Err(FormatError::TooFewVertices { count: 2, .. })
        ));
        assert!(matches!(
            normalize_polygons(&json!({"points": [[0, 0], [1, "a"], [2, 2]]})),
            Err(FormatError::InvalidCoordinates { .. })
        ));
    }

    #[test]
    fn test_apply_records_restamps_and_matches_by_name() {
        let mut store = AnnotationStore::new();
        let key = ImageKey::from("a.png");

        let first = normalize_polygons(&json!([
            {"id": "a", "name": "Star", "points": [[0, 0], [4, 0], [0, 4]]},
            {"id": "b", "name": "Arrow", "points": [[0, 0], [4, 0], [0, 4]]}
        ]))
        .unwrap();
        apply_records(&mut store, &key, first);
        assert_eq!(store.len(&key), 2);

        // No id: replaces the existing "Arrow" in place
        let second = normalize_polygons(&json!({
            "name": "Arrow",
            "group": "5",
            "points": [[1, 1], [5, 1], [1, 5]]
        }))
        .unwrap();
        apply_records(&mut store, &key, second);

        let polygons = store.get_polygons(&key);
        assert_eq!(polygons.len(), 2);
        assert_eq!(polygons[1].name, ShapeName::Arrow);
        assert_eq!(polygons[1].group, "5");
        assert_ne!(polygons[1].id, PolygonId::from("b"));
        assert!(polygons.iter().all(|p| p.image_key == key));
    }
}
