// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! 2D Boolean Operations on Multi-Polygons
//!
//! Thin layer over the i_overlay crate. Every operand is flattened into a
//! list of contours (outer rings counter-clockwise, holes clockwise) and
//! filled with the even-odd rule, which is exact for the non-overlapping
//! polygon sets this crate produces. Results come back as shapes (outer ring
//! first, then holes) and are turned into [`MultiPolygon2D`] again.

use crate::polygon::{MultiPolygon2D, Polygon2D};
use i_overlay::core::fill_rule::FillRule;
use i_overlay::core::overlay_rule::OverlayRule;
use i_overlay::float::single::SingleFloatOverlay;
use nalgebra::Point2;

/// Epsilon for floating point comparisons in 2D operations
pub const EPSILON_2D: f64 = 1e-9;

/// Minimum area threshold - polygons smaller than this are considered degenerate
pub const MIN_AREA_THRESHOLD: f64 = 1e-10;

/// Set operation applied by [`overlay`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BooleanOp {
    Union,
    Intersection,
    Difference,
    Xor,
}

impl BooleanOp {
    fn rule(self) -> OverlayRule {
        match self {
            BooleanOp::Union => OverlayRule::Union,
            BooleanOp::Intersection => OverlayRule::Intersect,
            BooleanOp::Difference => OverlayRule::Difference,
            BooleanOp::Xor => OverlayRule::Xor,
        }
    }
}

/// Perform a 2D boolean operation `subject <op> clip`
///
/// Empty operands are short-circuited so i_overlay never sees an empty path set.
pub fn overlay(subject: &MultiPolygon2D, clip: &MultiPolygon2D, op: BooleanOp) -> MultiPolygon2D {
    let subject_paths = multipolygon_to_paths(subject);
    let clip_paths = multipolygon_to_paths(clip);

    match (subject_paths.is_empty(), clip_paths.is_empty()) {
        (true, true) => return MultiPolygon2D::empty(),
        (true, false) => {
            return match op {
                BooleanOp::Union | BooleanOp::Xor => normalize_paths(&clip_paths),
                BooleanOp::Intersection | BooleanOp::Difference => MultiPolygon2D::empty(),
            }
        }
        (false, true) => {
            return match op {
                BooleanOp::Intersection => MultiPolygon2D::empty(),
                _ => normalize_paths(&subject_paths),
            }
        }
        (false, false) => {}
    }

    let result = subject_paths.overlay(&clip_paths, op.rule(), FillRule::EvenOdd);
    shapes_to_multipolygon(&result)
}

/// Re-run a contour set through the overlay graph on its own.
///
/// Splits touching rings, drops zero-area pieces and fixes orientation.
pub fn normalize_paths(paths: &[Vec<[f64; 2]>]) -> MultiPolygon2D {
    if paths.is_empty() {
        return MultiPolygon2D::empty();
    }
    let subject = paths.to_vec();
    let clip: Vec<Vec<[f64; 2]>> = Vec::new();
    let result = subject.overlay(&clip, OverlayRule::Subject, FillRule::EvenOdd);
    shapes_to_multipolygon(&result)
}

/// Check if a contour is valid (has area, not degenerate)
pub fn is_valid_contour(contour: &[Point2<f64>]) -> bool {
    if contour.len() < 3 {
        return false;
    }

    let area = compute_signed_area(contour).abs();
    area > MIN_AREA_THRESHOLD
}

/// Compute the signed area of a 2D contour
/// Positive = counter-clockwise, Negative = clockwise
pub fn compute_signed_area(contour: &[Point2<f64>]) -> f64 {
    if contour.len() < 3 {
        return 0.0;
    }

    let mut area = 0.0;
    let n = contour.len();

    for i in 0..n {
        let j = (i + 1) % n;
        area += contour[i].x * contour[j].y;
        area -= contour[j].x * contour[i].y;
    }

    area * 0.5
}

/// Ensure contour has counter-clockwise winding (positive area)
pub fn ensure_ccw(contour: &[Point2<f64>]) -> Vec<Point2<f64>> {
    let area = compute_signed_area(contour);
    if area < 0.0 {
        // Clockwise - reverse to make counter-clockwise
        contour.iter().rev().cloned().collect()
    } else {
        contour.to_vec()
    }
}

/// Ensure contour has clockwise winding (for holes)
pub fn ensure_cw(contour: &[Point2<f64>]) -> Vec<Point2<f64>> {
    let area = compute_signed_area(contour);
    if area > 0.0 {
        // Counter-clockwise - reverse to make clockwise
        contour.iter().rev().cloned().collect()
    } else {
        contour.to_vec()
    }
}

/// Simplify a contour by removing nearly collinear points
///
/// A vertex is dropped when the parallelogram spanned by its neighbours has an
/// area below `epsilon`.
pub fn simplify_contour(contour: &[Point2<f64>], epsilon: f64) -> Vec<Point2<f64>> {
    if contour.len() <= 3 {
        return contour.to_vec();
    }

    let mut result = Vec::with_capacity(contour.len());
    let n = contour.len();

    for i in 0..n {
        let prev = result.last().unwrap_or(&contour[(i + n - 1) % n]);
        let curr = &contour[i];
        let next = &contour[(i + 1) % n];

        // Check if current point is collinear with prev and next
        let cross = (curr.x - prev.x) * (next.y - prev.y) - (curr.y - prev.y) * (next.x - prev.x);

        if cross.abs() > epsilon {
            result.push(*curr);
        }
    }

    // Ensure we have at least 3 points
    if result.len() < 3 {
        return contour.to_vec();
    }

    result
}

/// Check if a point is inside a contour using ray casting
pub fn point_in_contour(point: &Point2<f64>, contour: &[Point2<f64>]) -> bool {
    if contour.len() < 3 {
        return false;
    }

    let mut inside = false;
    let n = contour.len();

    let mut j = n - 1;
    for i in 0..n {
        let pi = &contour[i];
        let pj = &contour[j];

        if ((pi.y > point.y) != (pj.y > point.y))
            && (point.x < (pj.x - pi.x) * (point.y - pi.y) / (pj.y - pi.y) + pi.x)
        {
            inside = !inside;
        }
        j = i;
    }

    inside
}

/// Compute bounding box of a contour
pub fn contour_bounds(contour: &[Point2<f64>]) -> Option<(Point2<f64>, Point2<f64>)> {
    if contour.is_empty() {
        return None;
    }

    let mut min = contour[0];
    let mut max = contour[0];

    for p in contour.iter().skip(1) {
        min.x = min.x.min(p.x);
        min.y = min.y.min(p.y);
        max.x = max.x.max(p.x);
        max.y = max.y.max(p.y);
    }

    Some((min, max))
}

/// Check if two bounding boxes overlap
pub fn bounds_overlap(
    a_min: &Point2<f64>,
    a_max: &Point2<f64>,
    b_min: &Point2<f64>,
    b_max: &Point2<f64>,
) -> bool {
    a_min.x <= b_max.x && a_max.x >= b_min.x && a_min.y <= b_max.y && a_max.y >= b_min.y
}

// ============================================================================
// Internal Helper Functions
// ============================================================================

/// Flatten a multi-polygon into i_overlay contours
fn multipolygon_to_paths(geometry: &MultiPolygon2D) -> Vec<Vec<[f64; 2]>> {
    let mut paths = Vec::new();

    for polygon in &geometry.polygons {
        if !is_valid_contour(&polygon.outer) {
            continue;
        }
        // Outer boundary counter-clockwise, holes clockwise
        paths.push(contour_to_path(&ensure_ccw(&polygon.outer)));
        for hole in &polygon.holes {
            if is_valid_contour(hole) {
                paths.push(contour_to_path(&ensure_cw(hole)));
            }
        }
    }

    paths
}

/// Convert a Point2 contour to i_overlay path format
fn contour_to_path(contour: &[Point2<f64>]) -> Vec<[f64; 2]> {
    contour.iter().map(|p| [p.x, p.y]).collect()
}

fn path_to_contour(path: &[[f64; 2]]) -> Vec<Point2<f64>> {
    path.iter().map(|p| Point2::new(p[0], p[1])).collect()
}

/// Convert i_overlay result shapes back to a multi-polygon
///
/// i_overlay returns Vec<Vec<Vec<[f64; 2]>>> where:
/// - Outer Vec: list of shapes
/// - Middle Vec: list of contours per shape (first is outer, rest are holes)
/// - Inner Vec: list of points per contour
fn shapes_to_multipolygon(shapes: &[Vec<Vec<[f64; 2]>>]) -> MultiPolygon2D {
    let mut polygons = Vec::with_capacity(shapes.len());

    for shape in shapes {
        let Some(first) = shape.first() else {
            continue;
        };
        let outer = path_to_contour(first);
        if !is_valid_contour(&outer) {
            continue;
        }

        let mut polygon = Polygon2D::new(ensure_ccw(&outer));
        for contour in shape.iter().skip(1) {
            let hole = path_to_contour(contour);
            if is_valid_contour(&hole) {
                polygon.add_hole(ensure_cw(&hole));
            }
        }
        polygons.push(polygon);
    }

    MultiPolygon2D::new(polygons)
}
