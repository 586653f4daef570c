// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Polygon and multi-polygon values
//!
//! Rings are stored open: the first point is not repeated at the end. Use
//! [`close_ring`] when a closed form is needed for output.

use crate::bool2d::{compute_signed_area, contour_bounds, ensure_ccw, point_in_contour};
use nalgebra::Point2;

/// Polygon with optional holes
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon2D {
    /// Outer boundary (counter-clockwise)
    pub outer: Vec<Point2<f64>>,
    /// Holes (clockwise)
    pub holes: Vec<Vec<Point2<f64>>>,
}

impl Polygon2D {
    /// Create a polygon without holes. A closing point equal to the first is dropped.
    pub fn new(outer: Vec<Point2<f64>>) -> Self {
        Self {
            outer: open_ring(outer),
            holes: Vec::new(),
        }
    }

    /// Add a hole to the polygon
    pub fn add_hole(&mut self, hole: Vec<Point2<f64>>) {
        self.holes.push(open_ring(hole));
    }

    /// Enclosed area, holes subtracted
    pub fn area(&self) -> f64 {
        let outer = compute_signed_area(&self.outer).abs();
        let holes: f64 = self
            .holes
            .iter()
            .map(|h| compute_signed_area(h).abs())
            .sum();
        (outer - holes).max(0.0)
    }

    /// Even-odd point membership
    pub fn contains_point(&self, point: &Point2<f64>) -> bool {
        point_in_contour(point, &self.outer)
            && !self.holes.iter().any(|h| point_in_contour(point, h))
    }

    pub fn vertex_count(&self) -> usize {
        self.outer.len() + self.holes.iter().map(Vec::len).sum::<usize>()
    }

    /// Bounding box of the outer ring
    pub fn bounds(&self) -> Option<(Point2<f64>, Point2<f64>)> {
        contour_bounds(&self.outer)
    }
}

/// Set of non-overlapping polygons
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MultiPolygon2D {
    pub polygons: Vec<Polygon2D>,
}

impl MultiPolygon2D {
    pub fn new(polygons: Vec<Polygon2D>) -> Self {
        Self { polygons }
    }

    /// Geometry covering nothing
    pub fn empty() -> Self {
        Self::default()
    }

    /// Single polygon from one ring, oriented counter-clockwise
    pub fn from_ring(ring: Vec<Point2<f64>>) -> Self {
        Self {
            polygons: vec![Polygon2D::new(ensure_ccw(&open_ring(ring)))],
        }
    }

    /// Total enclosed area
    pub fn area(&self) -> f64 {
        self.polygons.iter().map(Polygon2D::area).sum()
    }

    pub fn contains_point(&self, point: &Point2<f64>) -> bool {
        self.polygons.iter().any(|p| p.contains_point(point))
    }

    pub fn vertex_count(&self) -> usize {
        self.polygons.iter().map(Polygon2D::vertex_count).sum()
    }

    /// Bounding box over all outer rings
    pub fn bounds(&self) -> Option<(Point2<f64>, Point2<f64>)> {
        let mut bounds: Option<(Point2<f64>, Point2<f64>)> = None;
        for (min, max) in self.polygons.iter().filter_map(Polygon2D::bounds) {
            bounds = Some(match bounds {
                None => (min, max),
                Some((lo, hi)) => (
                    Point2::new(lo.x.min(min.x), lo.y.min(min.y)),
                    Point2::new(hi.x.max(max.x), hi.y.max(max.y)),
                ),
            });
        }
        bounds
    }
}

impl From<Polygon2D> for MultiPolygon2D {
    fn from(polygon: Polygon2D) -> Self {
        Self {
            polygons: vec![polygon],
        }
    }
}

/// Drop a trailing point equal to the first
pub fn open_ring(mut ring: Vec<Point2<f64>>) -> Vec<Point2<f64>> {
    if ring.len() > 1 && ring.first() == ring.last() {
        ring.pop();
    }
    ring
}

/// Repeat the first point at the end
pub fn close_ring(ring: &[Point2<f64>]) -> Vec<Point2<f64>> {
    let mut closed = ring.to_vec();
    if let Some(first) = ring.first() {
        if ring.last() != Some(first) || ring.len() == 1 {
            closed.push(*first);
        }
    }
    closed
}
