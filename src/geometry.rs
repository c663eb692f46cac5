//! Polygon geometry kernel.
//!
//! Pure functions over ordered vertex lists. Every vertex list is treated as
//! a closed ring: the edge from the last vertex back to the first is implicit.

use crate::model::{MIN_POLYGON_VERTICES, Point, Polygon};

/// Nearest vertex found by [`closest_point`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClosestPoint {
    pub index: usize,
    pub distance: f64,
}

/// Projection of a point onto a segment.
///
/// `x`/`y`/`distance` use the projection clamped to the segment, while
/// `param` is the unclamped line parameter so callers can tell an interior
/// hit (`0 < param < 1`) from one past an endpoint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentProjection {
    pub x: f64,
    pub y: f64,
    pub distance: f64,
    pub param: f64,
}

/// An edge within tolerance of a query point, see [`near_edge`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeHit {
    /// Index of the edge's first vertex; the edge runs to `edge_index + 1`
    /// (wrapping to 0).
    pub edge_index: usize,
    /// Closest point on that edge.
    pub point: Point,
}

/// Even-odd ray casting test.
///
/// Correct for simple (possibly non-convex) polygons; the result for
/// self-intersecting rings follows the even-odd rule and is otherwise
/// unspecified.
pub fn point_in_polygon(x: f64, y: f64, points: &[Point]) -> bool {
    if points.is_empty() {
        return false;
    }

    let mut inside = false;
    let mut j = points.len() - 1;
    for i in 0..points.len() {
        let (xi, yi) = (points[i].x, points[i].y);
        let (xj, yj) = (points[j].x, points[j].y);
        if ((yi > y) != (yj > y)) && (x < (xj - xi) * (y - yi) / (yj - yi) + xi) {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Nearest vertex by Euclidean distance, `None` for an empty list.
///
/// Ties keep the lowest index.
pub fn closest_point(points: &[Point], x: f64, y: f64) -> Option<ClosestPoint> {
    let target = Point::new(x, y);
    let mut best: Option<ClosestPoint> = None;
    for (index, point) in points.iter().enumerate() {
        let distance = point.distance_to(&target);
        if best.is_none_or(|b| distance < b.distance) {
            best = Some(ClosestPoint { index, distance });
        }
    }
    best
}

/// Project `(x, y)` onto the segment `a -> b`.
///
/// A zero-length segment projects onto `a` with `param = -1`.
pub fn closest_point_on_segment(
    x: f64,
    y: f64,
    ax: f64,
    ay: f64,
    bx: f64,
    by: f64,
) -> SegmentProjection {
    let dx = bx - ax;
    let dy = by - ay;
    let len_sq = dx * dx + dy * dy;

    let param = if len_sq != 0.0 {
        ((x - ax) * dx + (y - ay) * dy) / len_sq
    } else {
        -1.0
    };

    let (px, py) = if param < 0.0 {
        (ax, ay)
    } else if param > 1.0 {
        (bx, by)
    } else {
        (ax + param * dx, ay + param * dy)
    };

    let distance = ((x - px) * (x - px) + (y - py) * (y - py)).sqrt();
    SegmentProjection {
        x: px,
        y: py,
        distance,
        param,
    }
}

/// First edge (in edge-index order) whose projection of `(x, y)` is closer
/// than `threshold` and falls strictly inside the segment.
///
/// This is a first-match search, not a closest-edge search: when several
/// edges qualify, the lowest edge index wins even if a later edge is nearer.
/// Projections landing exactly on an endpoint never count; those are vertex
/// hits.
pub fn near_edge(x: f64, y: f64, points: &[Point], threshold: f64) -> Option<EdgeHit> {
    let n = points.len();
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        let proj = closest_point_on_segment(x, y, a.x, a.y, b.x, b.y);
        if proj.distance < threshold && proj.param > 0.0 && proj.param < 1.0 {
            return Some(EdgeHit {
                edge_index: i,
                point: Point::new(proj.x, proj.y),
            });
        }
    }
    None
}

/// Length of the closed ring.
pub fn perimeter(points: &[Point]) -> f64 {
    let n = points.len();
    (0..n)
        .map(|i| points[i].distance_to(&points[(i + 1) % n]))
        .sum()
}

/// Resample a polygon's boundary to `target_count` evenly spaced vertices.
///
/// The basis is `original_points` (falling back to `points` when empty), so
/// the result depends only on `(basis, target_count)`. Targets at or below
/// the basis length return the basis unchanged.
pub fn resample(polygon: &Polygon, target_count: usize) -> Polygon {
    let basis = if polygon.original_points.is_empty() {
        &polygon.points
    } else {
        &polygon.original_points
    };

    let mut resampled = polygon.clone();
    if resampled.original_points.is_empty() {
        resampled.original_points = basis.clone();
    }
    resampled.points = resample_points(basis, target_count);
    resampled
}

/// Arc-length resampling of a closed ring, see [`resample`].
pub fn resample_points(basis: &[Point], target_count: usize) -> Vec<Point> {
    if basis.len() < MIN_POLYGON_VERTICES || target_count <= basis.len() {
        return basis.to_vec();
    }

    let total = perimeter(basis);
    if total <= 0.0 {
        log::warn!("Cannot resample a polygon with zero perimeter");
        return basis.to_vec();
    }

    let spacing = total / target_count as f64;
    let mut out = Vec::with_capacity(target_count);
    let mut current = basis[0];
    out.push(current);

    let mut remaining = spacing;
    let mut index = 0;
    // Each step either places a vertex or advances one basis vertex, so a
    // full pass can never need more than this.
    let step_limit = (target_count + basis.len()) * 4;
    let mut steps = 0;

    while out.len() < target_count {
        steps += 1;
        if steps > step_limit {
            log::warn!("Resampling stopped early after {} steps", step_limit);
            break;
        }

        let next_index = (index + 1) % basis.len();
        let next = basis[next_index];
        let dx = next.x - current.x;
        let dy = next.y - current.y;
        let segment = (dx * dx + dy * dy).sqrt();

        if segment < remaining {
            current = next;
            index = next_index;
            remaining -= segment;
        } else {
            let ratio = remaining / segment;
            current = Point::new(current.x + dx * ratio, current.y + dy * ratio);
            out.push(current);
            remaining = spacing;
        }
    }

    while out.len() < target_count {
        out.push(current);
    }
    out.truncate(target_count);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ImageKey, PolygonId, ShapeName};

    const EPSILON: f64 = 1e-9;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON
    }

    fn pts(coords: &[(f64, f64)]) -> Vec<Point> {
        coords.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    fn rectangle() -> Vec<Point> {
        pts(&[(10.0, 10.0), (50.0, 10.0), (50.0, 50.0), (10.0, 50.0)])
    }

    fn polygon_from(points: Vec<Point>) -> Polygon {
        Polygon::new(
            PolygonId::from("p"),
            ShapeName::Rectangle,
            "1",
            points,
            ImageKey::from("img"),
        )
    }

    #[test]
    fn test_point_in_convex_polygon() {
        let square = rectangle();
        assert!(point_in_polygon(30.0, 30.0, &square));
        assert!(point_in_polygon(11.0, 49.0, &square));
        assert!(!point_in_polygon(5.0, 30.0, &square));
        assert!(!point_in_polygon(30.0, 60.0, &square));
    }

    #[test]
    fn test_point_in_non_convex_polygon() {
        // U shape opening upwards
        let u = pts(&[
            (0.0, 0.0),
            (30.0, 0.0),
            (30.0, 30.0),
            (20.0, 30.0),
            (20.0, 10.0),
            (10.0, 10.0),
            (10.0, 30.0),
            (0.0, 30.0),
        ]);
        assert!(point_in_polygon(5.0, 20.0, &u));
        assert!(point_in_polygon(25.0, 20.0, &u));
        assert!(point_in_polygon(15.0, 5.0, &u));
        // Inside the notch, which is inside the convex hull
        assert!(!point_in_polygon(15.0, 20.0, &u));
    }

    #[test]
    fn test_point_in_polygon_empty() {
        assert!(!point_in_polygon(0.0, 0.0, &[]));
    }

    #[test]
    fn test_closest_point_single_point() {
        let single = pts(&[(1000.0, 1000.0)]);
        let hit = closest_point(&single, 0.0, 0.0).unwrap();
        assert_eq!(hit.index, 0);
        assert!(hit.distance > 1000.0);
    }

    #[test]
    fn test_closest_point_empty() {
        assert_eq!(closest_point(&[], 1.0, 1.0), None);
    }

    #[test]
    fn test_closest_point_picks_nearest() {
        let hit = closest_point(&rectangle(), 48.0, 12.0).unwrap();
        assert_eq!(hit.index, 1);
        assert!(approx_eq(hit.distance, 8.0_f64.sqrt()));
    }

    #[test]
    fn test_segment_projection_interior() {
        let proj = closest_point_on_segment(5.0, 3.0, 0.0, 0.0, 10.0, 0.0);
        assert!(approx_eq(proj.x, 5.0));
        assert!(approx_eq(proj.y, 0.0));
        assert!(approx_eq(proj.distance, 3.0));
        assert!(approx_eq(proj.param, 0.5));
    }

    #[test]
    fn test_segment_projection_clamps_but_keeps_param() {
        let proj = closest_point_on_segment(15.0, 0.0, 0.0, 0.0, 10.0, 0.0);
        assert!(approx_eq(proj.x, 10.0));
        assert!(approx_eq(proj.distance, 5.0));
        assert!(approx_eq(proj.param, 1.5));

        let before = closest_point_on_segment(-4.0, 0.0, 0.0, 0.0, 10.0, 0.0);
        assert!(approx_eq(before.x, 0.0));
        assert!(before.param < 0.0);
    }

    #[test]
    fn test_segment_projection_degenerate() {
        let proj = closest_point_on_segment(3.0, 4.0, 0.0, 0.0, 0.0, 0.0);
        assert!(approx_eq(proj.distance, 5.0));
        assert!(approx_eq(proj.param, -1.0));
    }

    #[test]
    fn test_near_edge_interior_hit() {
        let hit = near_edge(30.0, 12.0, &rectangle(), 5.0).unwrap();
        assert_eq!(hit.edge_index, 0);
        assert_eq!(hit.point, Point::new(30.0, 10.0));
    }

    #[test]
    fn test_near_edge_closing_edge() {
        let hit = near_edge(8.0, 30.0, &rectangle(), 5.0).unwrap();
        assert_eq!(hit.edge_index, 3);
        assert_eq!(hit.point, Point::new(10.0, 30.0));
    }

    #[test]
    fn test_near_edge_ignores_vertex_projections() {
        // Exactly on a vertex: param is 0 for one edge and 1 for the other
        assert_eq!(near_edge(50.0, 10.0, &rectangle(), 5.0), None);
        // Past the end of both adjacent edges
        assert_eq!(near_edge(52.0, 8.0, &rectangle(), 5.0), None);
    }

    #[test]
    fn test_near_edge_first_match_not_closest() {
        // Thin sliver: edges 0 and 2 are both within threshold of the query
        let sliver = pts(&[(0.0, 0.0), (100.0, 0.0), (100.0, 4.0), (0.0, 4.0)]);
        let hit = near_edge(50.0, 3.0, &sliver, 5.0).unwrap();
        // Edge 2 (y = 4) is nearer, but edge 0 comes first
        assert_eq!(hit.edge_index, 0);
    }

    #[test]
    fn test_perimeter() {
        assert!(approx_eq(perimeter(&rectangle()), 160.0));
        assert!(approx_eq(perimeter(&[]), 0.0));
    }

    #[test]
    fn test_resample_identity_at_or_below_basis_length() {
        let poly = polygon_from(rectangle());
        assert_eq!(resample(&poly, 4).points, rectangle());
        assert_eq!(resample(&poly, 2).points, rectangle());
    }

    #[test]
    fn test_resample_exact_count_and_perimeter() {
        let poly = polygon_from(rectangle());
        let dense = resample(&poly, 8);
        assert_eq!(dense.points.len(), 8);
        assert_eq!(dense.points[0], Point::new(10.0, 10.0));
        assert_eq!(dense.points[1], Point::new(30.0, 10.0));
        let p = perimeter(&dense.points);
        assert!((p - 160.0).abs() / 160.0 < 0.01);
    }

    #[test]
    fn test_resample_uneven_count() {
        let poly = polygon_from(rectangle());
        let dense = resample(&poly, 13);
        assert_eq!(dense.points.len(), 13);
        let p = perimeter(&dense.points);
        // Cutting corners can only shorten the ring
        assert!(p <= 160.0 + EPSILON);
        assert!(p > 145.0);
    }

    #[test]
    fn test_resample_uses_original_points_as_basis() {
        let poly = polygon_from(rectangle());
        let once = resample(&poly, 12);
        let twice = resample(&resample(&once, 20), 12);
        assert_eq!(once.points, twice.points);
        assert_eq!(twice.original_points, rectangle());

        // Shrinking back restores the creation-time vertices
        assert_eq!(resample(&once, 3).points, rectangle());
    }

    #[test]
    fn test_resample_falls_back_to_points() {
        let mut poly = polygon_from(rectangle());
        poly.original_points.clear();
        let dense = resample(&poly, 8);
        assert_eq!(dense.points.len(), 8);
        assert_eq!(dense.original_points, rectangle());
    }
}
