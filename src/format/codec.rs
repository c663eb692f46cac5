//! Conversion between store polygons and [`Document`]s.
//!
//! The conversion is lossy: polygon ids, resampling bases and sub-pixel
//! precision are not written. Decoding mints fresh ids and uses the stored
//! coordinates as both the vertex list and the resampling basis.

use crate::format::document::{ClassEntry, Document, InstanceEntry, round_half_up};
use crate::format::error::FormatError;
use crate::model::{ImageKey, MIN_POLYGON_VERTICES, Point, Polygon, PolygonId, ShapeName};

/// Group polygons by class (group) and then by name.
///
/// Integer-like class and name buckets come first in numeric order, the rest
/// keep the order in which they first appear. Each polygon becomes one
/// instance with id `"<name>-<n>"`, `n` counting from 1 within its class and
/// name.
pub fn encode(image_name: &str, polygons: &[Polygon]) -> Document {
    // (class name, [(instance name, [points])])
    let mut grouped: Vec<(&str, Vec<(&str, Vec<&[Point]>)>)> = Vec::new();

    for polygon in polygons {
        let class_index = match grouped.iter().position(|(g, _)| *g == polygon.group) {
            Some(i) => i,
            None => {
                grouped.push((polygon.group.as_str(), Vec::new()));
                grouped.len() - 1
            }
        };
        let names = &mut grouped[class_index].1;
        let name = polygon.name.as_str();
        match names.iter_mut().find(|(n, _)| *n == name) {
            Some((_, bucket)) => bucket.push(polygon.points.as_slice()),
            None => names.push((name, vec![polygon.points.as_slice()])),
        }
    }

    grouped.sort_by_key(|(class_name, _)| bucket_order(class_name));
    for (_, names) in &mut grouped {
        names.sort_by_key(|(name, _)| bucket_order(name));
    }

    let classes = grouped
        .into_iter()
        .map(|(class_name, names)| ClassEntry {
            class_name: class_name.to_string(),
            instances: names
                .into_iter()
                .flat_map(|(name, buckets)| {
                    buckets
                        .into_iter()
                        .enumerate()
                        .map(move |(index, points)| InstanceEntry {
                            instance_id: format!("{}-{}", name, index + 1),
                            name: name.to_string(),
                            coordinates: points
                                .iter()
                                .map(|p| [round_half_up(p.x), round_half_up(p.y)])
                                .collect(),
                        })
                })
                .collect(),
        })
        .collect();

    log::trace!(
        "Encoded {} polygon(s) for {} into a document",
        polygons.len(),
        image_name
    );

    Document {
        image_name: image_name.to_string(),
        classes,
    }
}

/// Sort key for class and instance-name buckets.
///
/// Canonical integer names (`"0"`, `"2"`, `"10"`: no sign, no leading zeros,
/// below `u32::MAX`) come first in ascending numeric order; every other name
/// keeps its first-seen position after them. Callers sort stably.
fn bucket_order(name: &str) -> (bool, u32) {
    let canonical = !name.is_empty()
        && name.bytes().all(|b| b.is_ascii_digit())
        && (name == "0" || !name.starts_with('0'));
    match name.parse::<u32>() {
        Ok(n) if canonical && n != u32::MAX => (false, n),
        _ => (true, 0),
    }
}

/// Rebuild polygons for `image_key` from a document.
///
/// Fails on instances with fewer than three vertices or non-finite
/// coordinates; nothing is returned for a partially valid document.
pub fn decode(document: &Document, image_key: &ImageKey) -> Result<Vec<Polygon>, FormatError> {
    let mut polygons = Vec::with_capacity(document.instance_count());

    for class in document.classes.iter() {
        for instance in class.instances.iter() {
            let points = instance_points(instance)?;
            let id = if instance.instance_id.is_empty() {
                PolygonId::derived(&instance.name)
            } else {
                PolygonId::derived(&instance.instance_id)
            };
            polygons.push(Polygon::new(
                id,
                ShapeName::from(instance.name.as_str()),
                class.class_name.clone(),
                points,
                image_key.clone(),
            ));
        }
    }

    log::debug!(
        "Decoded {} polygon(s) from document {} for {}",
        polygons.len(),
        document.image_name,
        image_key
    );
    Ok(polygons)
}

fn instance_points(instance: &InstanceEntry) -> Result<Vec<Point>, FormatError> {
    if instance.coordinates.len() < MIN_POLYGON_VERTICES {
        return Err(FormatError::TooFewVertices {
            name: instance.name.clone(),
            count: instance.coordinates.len(),
        });
    }
    instance
        .coordinates
        .iter()
        .map(|[x, y]| {
            if x.is_finite() && y.is_finite() {
                Ok(Point::new(*x, *y))
            } else {
                Err(FormatError::invalid_coordinates(format!(
                    "[{}, {}] in instance '{}'",
                    x, y, instance.instance_id
                )))
            }
        })
        .collect()
}
