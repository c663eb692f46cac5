//! Per-image polygon storage.
//!
//! The store maps each image key to its ordered polygon list. List order is the
//! drawing order. Every write re-stamps `image_key` and checks the vertex
//! minimum; callers that hand in a polygon with fewer than three vertices have
//! a bug, so the store panics instead of storing it.

use std::collections::{BTreeSet, HashMap};

use crate::model::{ImageKey, MIN_POLYGON_VERTICES, Point, Polygon, PolygonId};

/// Storage for polygon annotations across images.
#[derive(Debug, Clone, Default)]
pub struct AnnotationStore {
    images: HashMap<ImageKey, Vec<Polygon>>,
    /// Images modified since the last [`AnnotationStore::take_dirty`].
    dirty: BTreeSet<ImageKey>,
}

fn check_invariant(polygon: &Polygon) {
    assert!(
        polygon.points.len() >= MIN_POLYGON_VERTICES,
        "polygon {} has {} vertices, at least {} are required",
        polygon.id,
        polygon.points.len(),
        MIN_POLYGON_VERTICES
    );
}

impl AnnotationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Polygons for an image; empty if the image was never seen.
    pub fn get_polygons(&self, key: &ImageKey) -> &[Polygon] {
        self.images.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn get_polygon(&self, key: &ImageKey, id: &PolygonId) -> Option<&Polygon> {
        self.get_polygons(key).iter().find(|p| &p.id == id)
    }

    /// Create the (empty) entry for an image on first visit.
    pub fn touch(&mut self, key: &ImageKey) {
        self.images.entry(key.clone()).or_default();
    }

    /// Replace the whole polygon list for one image.
    ///
    /// # Panics
    ///
    /// Panics if any polygon has fewer than three vertices.
    pub fn set_polygons(&mut self, key: &ImageKey, mut polygons: Vec<Polygon>) {
        for polygon in polygons.iter_mut() {
            check_invariant(polygon);
            polygon.image_key = key.clone();
        }
        log::debug!("Store: set {} polygon(s) for {}", polygons.len(), key);
        self.images.insert(key.clone(), polygons);
        self.mark_dirty(key);
    }

    /// Replace the polygon with the same id in place, or append it.
    ///
    /// # Panics
    ///
    /// Panics if the polygon has fewer than three vertices.
    pub fn upsert_polygon(&mut self, key: &ImageKey, polygon: Polygon) {
        let id = polygon.id.clone();
        self.upsert_matching(key, polygon, |existing| existing.id == id);
    }

    /// Upsert keyed by name instead of id.
    ///
    /// Used for externally loaded records that carry no id. Names are not
    /// unique, so the first polygon with the same name is replaced.
    ///
    /// # Panics
    ///
    /// Panics if the polygon has fewer than three vertices.
    pub fn upsert_by_name(&mut self, key: &ImageKey, polygon: Polygon) {
        let name = polygon.name.clone();
        self.upsert_matching(key, polygon, |existing| existing.name == name);
    }

    fn upsert_matching(
        &mut self,
        key: &ImageKey,
        mut polygon: Polygon,
        matches: impl Fn(&Polygon) -> bool,
    ) {
        check_invariant(&polygon);
        polygon.image_key = key.clone();
        let list = self.images.entry(key.clone()).or_default();
        match list.iter_mut().find(|existing| matches(existing)) {
            Some(slot) => {
                log::trace!("Store: replaced polygon {} on {}", polygon.id, key);
                *slot = polygon;
            }
            None => {
                log::trace!("Store: appended polygon {} on {}", polygon.id, key);
                list.push(polygon);
            }
        }
        self.mark_dirty(key);
    }

    /// Apply `edit` to one polygon in place. Returns false if it was not found.
    ///
    /// # Panics
    ///
    /// Panics if the edit leaves the polygon with fewer than three vertices.
    pub fn update_polygon(
        &mut self,
        key: &ImageKey,
        id: &PolygonId,
        edit: impl FnOnce(&mut Polygon),
    ) -> bool {
        let Some(polygon) = self
            .images
            .get_mut(key)
            .and_then(|list| list.iter_mut().find(|p| &p.id == id))
        else {
            return false;
        };
        edit(polygon);
        check_invariant(polygon);
        polygon.image_key = key.clone();
        self.mark_dirty(key);
        true
    }

    /// Remove a polygon by id; no-op if it is not there.
    pub fn delete_polygon(&mut self, key: &ImageKey, id: &PolygonId) -> Option<Polygon> {
        let list = self.images.get_mut(key)?;
        let index = list.iter().position(|p| &p.id == id)?;
        let removed = list.remove(index);
        log::debug!("Store: deleted polygon {} from {}", id, key);
        self.mark_dirty(key);
        Some(removed)
    }

    /// First polygon (in list order) containing `point`.
    pub fn hit_test(&self, key: &ImageKey, point: &Point) -> Option<&Polygon> {
        self.get_polygons(key).iter().find(|p| p.contains(point))
    }

    pub fn image_keys(&self) -> impl Iterator<Item = &ImageKey> {
        self.images.keys()
    }

    pub fn len(&self, key: &ImageKey) -> usize {
        self.get_polygons(key).len()
    }

    pub fn is_dirty(&self, key: &ImageKey) -> bool {
        self.dirty.contains(key)
    }

    pub fn mark_dirty(&mut self, key: &ImageKey) {
        self.dirty.insert(key.clone());
    }

    /// Forget pending changes for one image, e.g. right after loading it.
    pub fn mark_clean(&mut self, key: &ImageKey) {
        self.dirty.remove(key);
    }

    /// Whether the image has been visited or loaded.
    pub fn contains(&self, key: &ImageKey) -> bool {
        self.images.contains_key(key)
    }

    /// Drain the set of images modified since the last call.
    pub fn take_dirty(&mut self) -> Vec<ImageKey> {
        std::mem::take(&mut self.dirty).into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ShapeName;

    fn key(name: &str) -> ImageKey {
        ImageKey::from(name)
    }

    fn triangle(id: &str, name: &str, owner: &str) -> Polygon {
        Polygon::new(
            PolygonId::from(id),
            ShapeName::from(name),
            "1",
            vec![
                Point::new(0.0, 0.0),
                Point::new(10.0, 0.0),
                Point::new(0.0, 10.0),
            ],
            key(owner),
        )
    }

    #[test]
    fn test_unseen_image_is_empty() {
        let store = AnnotationStore::new();
        assert!(store.get_polygons(&key("a.png")).is_empty());
    }

    #[test]
    fn test_set_polygons_restamps_image_key() {
        let mut store = AnnotationStore::new();
        store.set_polygons(
            &key("a.png"),
            vec![triangle("1", "Star", "stale.png"), triangle("2", "Arrow", "")],
        );
        let polygons = store.get_polygons(&key("a.png"));
        assert_eq!(polygons.len(), 2);
        assert!(polygons.iter().all(|p| p.image_key == key("a.png")));
    }

    #[test]
    fn test_upsert_replaces_in_place() {
        let mut store = AnnotationStore::new();
        let k = key("a.png");
        store.upsert_polygon(&k, triangle("1", "Star", "a.png"));
        store.upsert_polygon(&k, triangle("2", "Arrow", "a.png"));

        let mut renamed = triangle("1", "Circle", "a.png");
        renamed.group = "3".to_string();
        store.upsert_polygon(&k, renamed);

        let polygons = store.get_polygons(&k);
        assert_eq!(polygons.len(), 2);
        assert_eq!(polygons[0].id, PolygonId::from("1"));
        assert_eq!(polygons[0].name, ShapeName::Circle);
        assert_eq!(polygons[0].group, "3");
        assert_eq!(polygons[1].id, PolygonId::from("2"));
    }

    #[test]
    fn test_upsert_by_name_matches_first_with_name() {
        let mut store = AnnotationStore::new();
        let k = key("a.png");
        store.upsert_polygon(&k, triangle("1", "Star", "a.png"));
        store.upsert_polygon(&k, triangle("2", "Star", "a.png"));

        store.upsert_by_name(&k, triangle("fresh", "Star", "a.png"));
        let ids: Vec<_> = store.get_polygons(&k).iter().map(|p| p.id.clone()).collect();
        assert_eq!(ids, vec![PolygonId::from("fresh"), PolygonId::from("2")]);

        store.upsert_by_name(&k, triangle("3", "Hexagon", "a.png"));
        assert_eq!(store.len(&k), 3);
    }

    #[test]
    fn test_delete_is_noop_when_missing() {
        let mut store = AnnotationStore::new();
        let k = key("a.png");
        store.upsert_polygon(&k, triangle("1", "Star", "a.png"));
        assert!(store.delete_polygon(&k, &PolygonId::from("nope")).is_none());
        assert!(store.delete_polygon(&key("b.png"), &PolygonId::from("1")).is_none());
        assert!(store.delete_polygon(&k, &PolygonId::from("1")).is_some());
        assert!(store.get_polygons(&k).is_empty());
    }

    #[test]
    fn test_update_polygon() {
        let mut store = AnnotationStore::new();
        let k = key("a.png");
        store.upsert_polygon(&k, triangle("1", "Star", "a.png"));
        assert!(store.update_polygon(&k, &PolygonId::from("1"), |p| p.translate(1.0, 1.0)));
        assert_eq!(store.get_polygons(&k)[0].points[0], Point::new(1.0, 1.0));
        assert!(!store.update_polygon(&k, &PolygonId::from("2"), |_| {}));
    }

    #[test]
    #[should_panic(expected = "at least 3 are required")]
    fn test_write_with_too_few_vertices_panics() {
        let mut store = AnnotationStore::new();
        let mut bad = triangle("1", "Star", "a.png");
        bad.points.pop();
        store.upsert_polygon(&key("a.png"), bad);
    }

    #[test]
    fn test_dirty_tracking() {
        let mut store = AnnotationStore::new();
        store.upsert_polygon(&key("a.png"), triangle("1", "Star", "a.png"));
        store.upsert_polygon(&key("b.png"), triangle("2", "Star", "b.png"));
        assert!(store.is_dirty(&key("a.png")));

        let dirty = store.take_dirty();
        assert_eq!(dirty, vec![key("a.png"), key("b.png")]);
        assert!(store.take_dirty().is_empty());
    }

    #[test]
    fn test_hit_test() {
        let mut store = AnnotationStore::new();
        let k = key("a.png");
        store.upsert_polygon(&k, triangle("1", "Star", "a.png"));
        assert!(store.hit_test(&k, &Point::new(2.0, 2.0)).is_some());
        assert!(store.hit_test(&k, &Point::new(20.0, 20.0)).is_none());
    }
}
