// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Traced figures and ring clean-up
//!
//! [`optimize`] drops collinear vertices from a closed ring and
//! [`remove_duplicate_points`] drops vertices repeated back-to-back. Both keep
//! the enclosed area unchanged.

use crate::grid::GridPoint;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Result of tracing one connected blocked region
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Figure {
    /// One cell wide, one row tall
    SinglePoint(GridPoint),
    /// One row tall, or one column wide over several rows
    Line(GridPoint, GridPoint),
    /// Closed ring, first point repeated as last
    Polygon(Vec<GridPoint>),
}

impl Figure {
    /// Vertices of the figure in output order
    pub fn points(&self) -> Vec<GridPoint> {
        match self {
            Figure::SinglePoint(p) => vec![*p],
            Figure::Line(a, b) => vec![*a, *b],
            Figure::Polygon(ring) => ring.clone(),
        }
    }

    /// Only polygons enclose area
    #[inline]
    pub fn is_area(&self) -> bool {
        matches!(self, Figure::Polygon(_))
    }
}

/// Remove every point equal to its immediate predecessor, keeping order
pub fn remove_duplicate_points<P: PartialEq + Clone>(points: &[P]) -> Vec<P> {
    let mut result: Vec<P> = Vec::with_capacity(points.len());
    for p in points {
        if result.last() != Some(p) {
            result.push(p.clone());
        }
    }
    result
}

/// Remove collinear vertices from a closed ring.
///
/// A vertex `b` between `a` and `c` goes when all three share a column, or
/// when `b - a` is a positive multiple of `c - b`. Runs to a fixed point, so
/// `optimize(&optimize(r)) == optimize(r)`. Rings of three or fewer distinct
/// vertices are returned unchanged.
pub fn optimize(ring: &[GridPoint]) -> Vec<GridPoint> {
    let closed = ring.len() > 1 && ring.first() == ring.last();
    let mut points: Vec<GridPoint> = if closed {
        ring[..ring.len() - 1].to_vec()
    } else {
        ring.to_vec()
    };

    let mut changed = true;
    while changed && points.len() > 3 {
        changed = false;
        let mut i = 0;
        while i < points.len() && points.len() > 3 {
            let n = points.len();
            let a = points[(i + n - 1) % n];
            let b = points[i];
            let c = points[(i + 1) % n];
            if is_redundant(a, b, c) {
                points.remove(i);
                changed = true;
            } else {
                i += 1;
            }
        }
    }

    if closed {
        if let Some(first) = points.first().copied() {
            points.push(first);
        }
    }
    points
}

#[inline]
fn is_redundant(a: GridPoint, b: GridPoint, c: GridPoint) -> bool {
    if a == b || b == c {
        return true;
    }
    if a.x == b.x && b.x == c.x {
        return true;
    }
    let (dx1, dy1) = ((b.x - a.x) as i64, (b.y - a.y) as i64);
    let (dx2, dy2) = ((c.x - b.x) as i64, (c.y - b.y) as i64);
    let cross = dx1 * dy2 - dy1 * dx2;
    let dot = dx1 * dx2 + dy1 * dy2;
    cross == 0 && dot > 0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring(points: &[(i32, i32)]) -> Vec<GridPoint> {
        points.iter().map(|&(x, y)| GridPoint::new(x, y)).collect()
    }

    #[test]
    fn test_optimize_drops_vertical_run() {
        let input = ring(&[(0, 0), (0, 1), (0, 2), (2, 2), (2, 0), (0, 0)]);
        let expected = ring(&[(0, 0), (0, 2), (2, 2), (2, 0), (0, 0)]);
        assert_eq!(optimize(&input), expected);
    }

    #[test]
    fn test_optimize_drops_diagonal_run() {
        let input = ring(&[(0, 0), (1, 1), (2, 2), (3, 2), (3, 0), (0, 0)]);
        let expected = ring(&[(0, 0), (2, 2), (3, 2), (3, 0), (0, 0)]);
        assert_eq!(optimize(&input), expected);
    }

    #[test]
    fn test_optimize_keeps_reversal() {
        // Direction flips at (2, 1): not a positive multiple
        let input = ring(&[(0, 0), (2, 1), (0, 2), (3, 3), (3, 0), (0, 0)]);
        assert_eq!(optimize(&input), input);
    }

    #[test]
    fn test_optimize_is_idempotent() {
        let input = ring(&[
            (0, 0),
            (0, 1),
            (0, 2),
            (1, 3),
            (2, 4),
            (3, 4),
            (4, 4),
            (4, 2),
            (4, 0),
            (2, 0),
            (0, 0),
        ]);
        let once = optimize(&input);
        assert_eq!(optimize(&once), once);
        assert_eq!(once.first(), once.last());
    }

    #[test]
    fn test_optimize_seam_vertex() {
        // Ring starts in the middle of its bottom edge
        let input = ring(&[(1, 0), (0, 0), (0, 2), (2, 2), (2, 0), (1, 0)]);
        let once = optimize(&input);
        assert_eq!(once.len(), 5);
        assert!(!once.contains(&GridPoint::new(1, 0)));
    }

    #[test]
    fn test_remove_duplicate_points_preserves_order() {
        let input = ring(&[(0, 0), (0, 0), (1, 0), (1, 1), (1, 1), (1, 1), (0, 0)]);
        let expected = ring(&[(0, 0), (1, 0), (1, 1), (0, 0)]);
        assert_eq!(remove_duplicate_points(&input), expected);
    }

    #[test]
    fn test_remove_duplicate_points_non_consecutive_kept() {
        let input = vec![1, 2, 1, 2];
        assert_eq!(remove_duplicate_points(&input), input);
        assert!(remove_duplicate_points::<i32>(&[]).is_empty());
    }

    #[test]
    fn test_figure_points() {
        let line = Figure::Line(GridPoint::new(0, 0), GridPoint::new(2, 0));
        assert_eq!(line.points().len(), 2);
        assert!(!line.is_area());
        assert!(Figure::Polygon(Vec::new()).is_area());
    }
}
