// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Planar geometry contract
//!
//! The merge engine only talks to geometry through [`PlanarGeometry`], so
//! any 2D polygon library that offers set algebra and a validity check can
//! back it. [`MultiPolygon2D`] is the i_overlay-backed implementation.

use crate::bool2d::{
    bounds_overlap, is_valid_contour, normalize_paths, overlay, simplify_contour, BooleanOp,
    MIN_AREA_THRESHOLD,
};
use crate::polygon::{MultiPolygon2D, Polygon2D};
use crate::validity::is_crossing_free_ring;

/// Set algebra and predicates over planar areas
pub trait PlanarGeometry: Clone + std::fmt::Debug {
    /// The geometry covering nothing
    fn empty() -> Self;

    fn union(&self, other: &Self) -> Self;
    fn intersection(&self, other: &Self) -> Self;
    fn difference(&self, other: &Self) -> Self;
    fn symmetric_difference(&self, other: &Self) -> Self;

    /// True when the geometry has no area
    fn is_empty(&self) -> bool;

    /// True when no ring is degenerate or crosses itself
    fn is_valid(&self) -> bool;

    /// Reduce the vertex count without changing the topology of any ring
    fn simplify(&self, tolerance: f64) -> Self;

    /// Enclosed area
    fn area(&self) -> f64;

    /// `other` lies entirely within `self`
    fn contains(&self, other: &Self) -> bool {
        other.difference(self).is_empty()
    }

    /// The two geometries share area; touching along an edge does not count
    fn intersects(&self, other: &Self) -> bool {
        !self.intersection(other).is_empty()
    }

    /// Union of every item, empty for no items
    fn union_all<'a, I>(items: I) -> Self
    where
        I: IntoIterator<Item = &'a Self>,
        Self: 'a,
    {
        items
            .into_iter()
            .fold(Self::empty(), |acc, item| acc.union(item))
    }

    /// Intersection of every item, empty for no items
    fn intersection_all<'a, I>(items: I) -> Self
    where
        I: IntoIterator<Item = &'a Self>,
        Self: 'a,
    {
        let mut items = items.into_iter();
        let Some(first) = items.next() else {
            return Self::empty();
        };
        items.fold(first.clone(), |acc, item| acc.intersection(item))
    }
}

impl PlanarGeometry for MultiPolygon2D {
    fn empty() -> Self {
        MultiPolygon2D::empty()
    }

    fn union(&self, other: &Self) -> Self {
        overlay(self, other, BooleanOp::Union)
    }

    fn intersection(&self, other: &Self) -> Self {
        if !self.bounds_touch(other) {
            return MultiPolygon2D::empty();
        }
        overlay(self, other, BooleanOp::Intersection)
    }

    fn difference(&self, other: &Self) -> Self {
        if !self.bounds_touch(other) {
            return self.clone();
        }
        overlay(self, other, BooleanOp::Difference)
    }

    fn symmetric_difference(&self, other: &Self) -> Self {
        overlay(self, other, BooleanOp::Xor)
    }

    fn is_empty(&self) -> bool {
        self.area() <= MIN_AREA_THRESHOLD
    }

    fn is_valid(&self) -> bool {
        self.polygons.iter().all(|polygon| {
            is_valid_contour(&polygon.outer)
                && is_crossing_free_ring(&polygon.outer)
                && polygon
                    .holes
                    .iter()
                    .all(|hole| is_valid_contour(hole) && is_crossing_free_ring(hole))
        })
    }

    fn simplify(&self, tolerance: f64) -> Self {
        let polygons = self
            .polygons
            .iter()
            .map(|polygon| {
                let mut simplified = Polygon2D::new(simplify_ring(&polygon.outer, tolerance));
                for hole in &polygon.holes {
                    simplified.add_hole(simplify_ring(hole, tolerance));
                }
                simplified
            })
            .collect();
        let candidate = MultiPolygon2D::new(polygons);
        if candidate.is_valid() {
            candidate
        } else {
            tracing::warn!(
                vertices = self.vertex_count(),
                "Simplification broke ring validity, keeping original"
            );
            self.clone()
        }
    }

    fn area(&self) -> f64 {
        MultiPolygon2D::area(self)
    }
}

impl MultiPolygon2D {
    /// Bounding boxes overlap (cheap pre-check before an overlay)
    fn bounds_touch(&self, other: &Self) -> bool {
        match (self.bounds(), other.bounds()) {
            (Some((a_min, a_max)), Some((b_min, b_max))) => {
                bounds_overlap(&a_min, &a_max, &b_min, &b_max)
            }
            _ => false,
        }
    }

    /// Rebuild through the overlay graph: merges touching pieces and fixes orientation
    pub fn normalized(&self) -> Self {
        let paths: Vec<Vec<[f64; 2]>> = self
            .polygons
            .iter()
            .flat_map(|polygon| std::iter::once(&polygon.outer).chain(polygon.holes.iter()))
            .map(|ring| ring.iter().map(|p| [p.x, p.y]).collect())
            .collect();
        normalize_paths(&paths)
    }
}

/// Simplify one ring, keeping the original when the result would self-intersect
fn simplify_ring(ring: &[nalgebra::Point2<f64>], tolerance: f64) -> Vec<nalgebra::Point2<f64>> {
    let simplified = simplify_contour(ring, tolerance);
    if is_crossing_free_ring(&simplified) {
        simplified
    } else {
        ring.to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Point2;

    fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> MultiPolygon2D {
        MultiPolygon2D::from_ring(vec![
            Point2::new(x0, y0),
            Point2::new(x1, y0),
            Point2::new(x1, y1),
            Point2::new(x0, y1),
        ])
    }

    #[test]
    fn test_contains_and_intersects() {
        let outer = rect(0.0, 0.0, 10.0, 10.0);
        let inner = rect(2.0, 2.0, 4.0, 4.0);
        let beside = rect(10.0, 0.0, 20.0, 10.0);
        let far = rect(50.0, 50.0, 60.0, 60.0);

        assert!(outer.contains(&inner));
        assert!(!inner.contains(&outer));
        assert!(outer.intersects(&inner));
        // Shared edge only
        assert!(!outer.intersects(&beside));
        assert!(!outer.intersects(&far));
    }

    #[test]
    fn test_is_empty() {
        assert!(MultiPolygon2D::empty().is_empty());
        assert!(!rect(0.0, 0.0, 1.0, 1.0).is_empty());
        let sliver = rect(0.0, 0.0, 1e-6, 1e-6);
        assert!(sliver.is_empty());
    }

    #[test]
    fn test_is_valid_detects_bow_tie() {
        let bow_tie = MultiPolygon2D::new(vec![Polygon2D::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(2.0, 2.0),
            Point2::new(2.0, 0.0),
            Point2::new(0.0, 2.0),
        ])]);
        assert!(!bow_tie.is_valid());
        assert!(rect(0.0, 0.0, 1.0, 1.0).is_valid());
    }

    #[test]
    fn test_union_all_and_intersection_all() {
        let parts = [
            rect(0.0, 0.0, 4.0, 4.0),
            rect(2.0, 2.0, 6.0, 6.0),
            rect(3.0, 0.0, 5.0, 6.0),
        ];
        let union = MultiPolygon2D::union_all(parts.iter());
        assert!(union.is_valid());
        let inter = MultiPolygon2D::intersection_all(parts.iter());
        assert_relative_eq!(inter.area(), 1.0, epsilon = 1e-6);
        assert!(MultiPolygon2D::intersection_all(std::iter::empty()).is_empty());
    }

    #[test]
    fn test_simplify_removes_collinear_vertices() {
        let ring = MultiPolygon2D::from_ring(vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(2.0, 1.0),
            Point2::new(2.0, 2.0),
            Point2::new(0.0, 2.0),
        ]);
        let simplified = ring.simplify(1e-9);
        assert_eq!(simplified.vertex_count(), 4);
        assert_relative_eq!(simplified.area(), 4.0, epsilon = 1e-9);
    }

    #[test]
    fn test_normalized_merges_touching_pieces() {
        let two = MultiPolygon2D::new(vec![
            rect(0.0, 0.0, 1.0, 1.0).polygons.remove(0),
            rect(1.0, 0.0, 2.0, 1.0).polygons.remove(0),
        ]);
        let merged = two.normalized();
        assert_relative_eq!(merged.area(), 2.0, epsilon = 1e-6);
    }
}
