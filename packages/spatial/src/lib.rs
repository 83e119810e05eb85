#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! In-memory spatial index over building polygons.
//!
//! Builds an R-tree keyed by each polygon's bounding box and provides the
//! three lookups the pipeline needs: strict point-in-polygon, nearest
//! polygon to a point, and polygons lying entirely within a region.
//! Used by both the listing matcher and the neighborhood enricher.
//!
//! Entries are identified by their positional index in the input, and
//! every lookup that can match several entries resolves to the lowest
//! index so results do not depend on tree layout.

use geo::{BoundingRect, Contains, Distance, Euclidean, MultiPolygon, Point};
use rstar::{AABB, PointDistance, RTree, RTreeObject};

/// A polygon stored in the R-tree with its positional index.
struct PolygonEntry {
    index: usize,
    envelope: AABB<[f64; 2]>,
    polygon: MultiPolygon<f64>,
}

impl RTreeObject for PolygonEntry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

impl PointDistance for PolygonEntry {
    /// Squared Euclidean distance from the point to the polygon; zero
    /// when the point lies inside.
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let point = Point::new(point[0], point[1]);
        let distance = self
            .polygon
            .0
            .iter()
            .map(|polygon| Euclidean.distance(&point, polygon))
            .fold(f64::INFINITY, f64::min);
        distance * distance
    }
}

/// R-tree index over a set of polygons.
pub struct PolygonIndex {
    tree: RTree<PolygonEntry>,
}

impl PolygonIndex {
    /// Builds the index from polygons in positional order.
    ///
    /// `None` entries (features without polygonal geometry) keep their
    /// position but are never returned by a lookup.
    #[must_use]
    pub fn new(polygons: impl IntoIterator<Item = Option<MultiPolygon<f64>>>) -> Self {
        let mut skipped = 0usize;
        let entries: Vec<PolygonEntry> = polygons
            .into_iter()
            .enumerate()
            .filter_map(|(index, polygon)| {
                let Some(polygon) = polygon else {
                    skipped += 1;
                    return None;
                };
                let Some(envelope) = compute_envelope(&polygon) else {
                    skipped += 1;
                    return None;
                };
                Some(PolygonEntry {
                    index,
                    envelope,
                    polygon,
                })
            })
            .collect();

        if skipped > 0 {
            log::warn!("Skipped {skipped} features without usable polygon geometry");
        }

        let tree = RTree::bulk_load(entries);
        log::info!("Loaded {} polygons into spatial index", tree.size());

        Self { tree }
    }

    /// Number of indexed polygons.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    /// Whether the index holds no polygons.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Index of the polygon strictly containing the point.
    ///
    /// Points on a boundary are not contained. Overlapping polygons
    /// resolve to the lowest index.
    #[must_use]
    pub fn containing(&self, lng: f64, lat: f64) -> Option<usize> {
        let point = Point::new(lng, lat);

        self.candidates(AABB::from_point([lng, lat]))
            .filter(|entry| entry.polygon.contains(&point))
            .map(|entry| entry.index)
            .min()
    }

    /// Index of the polygon nearest to the point by Euclidean distance in
    /// the data's coordinate space.
    ///
    /// Equidistant polygons resolve to the lowest index.
    #[must_use]
    pub fn nearest(&self, lng: f64, lat: f64) -> Option<(usize, f64)> {
        let mut candidates = self.tree.nearest_neighbor_iter_with_distance_2(&[lng, lat]);
        let (first, best) = candidates.next()?;

        let mut index = first.index;
        for (entry, distance_2) in candidates {
            if distance_2 > best {
                break;
            }
            index = index.min(entry.index);
        }

        Some((index, best.sqrt()))
    }

    /// Indexes of polygons whose bounding box intersects the rectangle,
    /// in ascending order.
    #[must_use]
    pub fn candidates_in(&self, min: [f64; 2], max: [f64; 2]) -> Vec<usize> {
        let mut indexes: Vec<usize> = self
            .candidates(AABB::from_corners(min, max))
            .map(|entry| entry.index)
            .collect();
        indexes.sort_unstable();
        indexes
    }

    /// Indexes of polygons lying entirely within `region`, in ascending
    /// order.
    ///
    /// Candidates are pruned by bounding box before the exact
    /// containment test, so polygons straddling the region's boundary
    /// are excluded.
    #[must_use]
    pub fn within(&self, region: &MultiPolygon<f64>) -> Vec<usize> {
        let Some(query_env) = compute_envelope(region) else {
            return Vec::new();
        };

        let mut indexes: Vec<usize> = self
            .candidates(query_env)
            .filter(|entry| region.contains(&entry.polygon))
            .map(|entry| entry.index)
            .collect();
        indexes.sort_unstable();
        indexes
    }

    /// Bounding-box prune shared by every envelope lookup.
    fn candidates(&self, envelope: AABB<[f64; 2]>) -> impl Iterator<Item = &PolygonEntry> {
        self.tree.locate_in_envelope_intersecting(&envelope)
    }
}

/// Compute the bounding box envelope for a [`MultiPolygon`].
fn compute_envelope(mp: &MultiPolygon<f64>) -> Option<AABB<[f64; 2]>> {
    mp.bounding_rect()
        .map(|rect| AABB::from_corners([rect.min().x, rect.min().y], [rect.max().x, rect.max().y]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{LineString, Polygon};

    fn square(x0: f64, y0: f64, size: f64) -> MultiPolygon<f64> {
        MultiPolygon(vec![Polygon::new(
            LineString::from(vec![
                (x0, y0),
                (x0 + size, y0),
                (x0 + size, y0 + size),
                (x0, y0 + size),
                (x0, y0),
            ]),
            vec![],
        )])
    }

    #[test]
    fn containing_finds_strict_interior_only() {
        let index = PolygonIndex::new(vec![Some(square(0.0, 0.0, 1.0)), Some(square(2.0, 0.0, 1.0))]);

        assert_eq!(index.containing(0.5, 0.5), Some(0));
        assert_eq!(index.containing(2.5, 0.5), Some(1));
        assert_eq!(index.containing(1.5, 0.5), None);
        // on the edge
        assert_eq!(index.containing(1.0, 0.5), None);
    }

    #[test]
    fn overlapping_polygons_resolve_to_lowest_index() {
        let index = PolygonIndex::new(vec![
            Some(square(5.0, 5.0, 1.0)),
            Some(square(0.0, 0.0, 2.0)),
            Some(square(0.5, 0.5, 1.0)),
        ]);
        assert_eq!(index.containing(1.0, 1.0), Some(1));
    }

    #[test]
    fn nearest_uses_polygon_distance_not_centroid() {
        // A long thin polygon whose centroid is far away but whose edge is
        // close, and a small square whose centroid is closer.
        let long = MultiPolygon(vec![Polygon::new(
            LineString::from(vec![(0.0, 1.2), (100.0, 1.2), (100.0, 1.3), (0.0, 1.3), (0.0, 1.2)]),
            vec![],
        )]);
        let index = PolygonIndex::new(vec![Some(square(3.0, 0.0, 1.0)), Some(long)]);

        let (nearest, distance) = index.nearest(0.0, 0.0).unwrap();
        assert_eq!(nearest, 1);
        assert!((distance - 1.2).abs() < 1e-9);
    }

    #[test]
    fn nearest_ties_resolve_to_lowest_index() {
        // Point at x=1.5 is 0.5 from both squares.
        let index = PolygonIndex::new(vec![
            Some(square(2.0, 0.0, 1.0)),
            Some(square(0.0, 0.0, 1.0)),
        ]);
        assert_eq!(index.nearest(1.5, 0.5).map(|(i, _)| i), Some(0));

        let reversed = PolygonIndex::new(vec![
            Some(square(0.0, 0.0, 1.0)),
            Some(square(2.0, 0.0, 1.0)),
        ]);
        assert_eq!(reversed.nearest(1.5, 0.5).map(|(i, _)| i), Some(0));
    }

    #[test]
    fn nearest_on_empty_index_is_none() {
        let index = PolygonIndex::new(Vec::new());
        assert!(index.is_empty());
        assert!(index.nearest(0.0, 0.0).is_none());
    }

    #[test]
    fn missing_geometry_keeps_positions() {
        let index = PolygonIndex::new(vec![None, Some(square(0.0, 0.0, 1.0))]);
        assert_eq!(index.len(), 1);
        assert_eq!(index.containing(0.5, 0.5), Some(1));
        assert_eq!(index.nearest(-1.0, 0.5).map(|(i, _)| i), Some(1));
    }

    #[test]
    fn within_excludes_straddling_and_outside_polygons() {
        let index = PolygonIndex::new(vec![
            Some(square(1.0, 1.0, 1.0)),  // inside
            Some(square(9.5, 1.0, 1.0)),  // straddles x=10
            Some(square(20.0, 1.0, 1.0)), // outside
            Some(square(3.0, 3.0, 2.0)),  // inside
        ]);
        let region = square(0.0, 0.0, 10.0);

        assert_eq!(index.within(&region), vec![0, 3]);
        assert_eq!(index.candidates_in([0.0, 0.0], [10.0, 10.0]), vec![0, 1, 3]);
    }
}
