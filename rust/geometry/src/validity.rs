// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Ring validity check and repair
//!
//! Tie-breaks in the tracer and coordinate rounding can leave a ring that
//! crosses itself, which the overlay operations do not accept as a single
//! simple contour. Repair works in three steps:
//!
//! 1. Noding: every crossing or touching point between two edges becomes an
//!    explicit vertex on both edges.
//! 2. Face extraction: walking the noded ring, each return to an already
//!    visited vertex closes a loop. Every loop is a simple face.
//! 3. Faces are combined with symmetric difference, which gives the even-odd
//!    area of the original ring (overlapping lobes cancel out).

use crate::bool2d::{compute_signed_area, ensure_ccw, overlay, BooleanOp, EPSILON_2D, MIN_AREA_THRESHOLD};
use crate::error::{Error, Result};
use crate::polygon::{open_ring, MultiPolygon2D, Polygon2D};
use nalgebra::Point2;
use rustc_hash::FxHashMap;

/// True when no two non-adjacent edges of the ring touch or cross and no
/// two adjacent edges fold back onto each other.
///
/// Accepts open or closed rings.
pub fn is_simple_ring(ring: &[Point2<f64>]) -> bool {
    ring_is_clean(ring, false)
}

/// Like [`is_simple_ring`], but two edges may meet at a vertex they share.
///
/// This is the validity rule for overlay output, where pieces of one
/// result may touch at single points.
pub fn is_crossing_free_ring(ring: &[Point2<f64>]) -> bool {
    ring_is_clean(ring, true)
}

fn ring_is_clean(ring: &[Point2<f64>], allow_vertex_touch: bool) -> bool {
    let points = open_ring(ring.to_vec());
    let n = points.len();
    if n < 3 {
        return false;
    }

    for i in 0..n {
        let a0 = points[i];
        let a1 = points[(i + 1) % n];
        if a0 == a1 {
            return false;
        }
        for j in (i + 1)..n {
            let b0 = points[j];
            let b1 = points[(j + 1) % n];
            let adjacent = j == i + 1 || (i == 0 && j == n - 1);
            if adjacent {
                // Shared vertex is expected; overlap beyond it is a fold
                if collinear_overlap(a0, a1, b0, b1) {
                    return false;
                }
                continue;
            }
            let nodes = edge_nodes(a0, a1, b0, b1);
            match nodes.as_slice() {
                [] => continue,
                [node] if allow_vertex_touch
                    && is_endpoint(*node, a0, a1)
                    && is_endpoint(*node, b0, b1) =>
                {
                    continue
                }
                _ => return false,
            }
        }
    }
    true
}

/// Repair a possibly self-intersecting polygon into a valid multi-polygon
///
/// Holes are repaired on their own and combined with the outer result by
/// symmetric difference.
pub fn make_valid(polygon: &Polygon2D) -> Result<MultiPolygon2D> {
    let mut result = repair_ring(&polygon.outer)?;
    for hole in &polygon.holes {
        match repair_ring(hole) {
            Ok(faces) => result = overlay(&result, &faces, BooleanOp::Xor),
            // A degenerate hole removes nothing
            Err(Error::DegenerateRing { .. }) => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(result)
}

/// Repair one ring (open or closed)
pub fn repair_ring(ring: &[Point2<f64>]) -> Result<MultiPolygon2D> {
    let mut points = open_ring(ring.to_vec());
    points.dedup();
    if points.len() > 1 && points.first() == points.last() {
        points.pop();
    }
    if points.len() < 3 {
        return Err(Error::TooFewVertices {
            found: points.len(),
        });
    }

    let noded = node_ring(&points);
    let faces = extract_faces(&noded);

    tracing::debug!(
        vertices = points.len(),
        noded = noded.len(),
        faces = faces.len(),
        "Repaired ring"
    );

    match faces.len() {
        0 => Err(Error::DegenerateRing {
            vertices: points.len(),
        }),
        1 => Ok(MultiPolygon2D::from_ring(faces.into_iter().next().unwrap_or_default())),
        _ => Ok(faces
            .into_iter()
            .map(MultiPolygon2D::from_ring)
            .fold(MultiPolygon2D::empty(), |acc, face| {
                overlay(&acc, &face, BooleanOp::Xor)
            })),
    }
}

/// Insert every edge/edge intersection as an explicit vertex
///
/// Each intersection is computed once per edge pair and inserted into both
/// edges, so shared nodes compare bit-equal.
fn node_ring(points: &[Point2<f64>]) -> Vec<Point2<f64>> {
    let n = points.len();
    // (parameter along edge, node) per edge
    let mut splits: Vec<Vec<(f64, Point2<f64>)>> = vec![Vec::new(); n];

    for i in 0..n {
        let a0 = points[i];
        let a1 = points[(i + 1) % n];
        for j in (i + 1)..n {
            let b0 = points[j];
            let b1 = points[(j + 1) % n];

            for node in edge_nodes(a0, a1, b0, b1) {
                let node = snap_to_endpoint(node, &[a0, a1, b0, b1]);
                if node != a0 && node != a1 {
                    splits[i].push((parameter(a0, a1, node), node));
                }
                if node != b0 && node != b1 {
                    splits[j].push((parameter(b0, b1, node), node));
                }
            }
        }
    }

    let mut noded = Vec::with_capacity(n * 2);
    for (i, edge_splits) in splits.iter_mut().enumerate() {
        noded.push(points[i]);
        edge_splits.sort_by(|a, b| a.0.total_cmp(&b.0));
        for &(_, node) in edge_splits.iter() {
            if noded.last() != Some(&node) {
                noded.push(node);
            }
        }
    }
    noded
}

/// Split the noded ring into loops at every revisited vertex
fn extract_faces(noded: &[Point2<f64>]) -> Vec<Vec<Point2<f64>>> {
    let mut faces = Vec::new();
    let mut stack: Vec<Point2<f64>> = Vec::with_capacity(noded.len());
    let mut seen: FxHashMap<(u64, u64), usize> = FxHashMap::default();

    let closing = noded.first().copied();
    for p in noded.iter().copied().chain(closing) {
        let key = point_key(&p);
        if let Some(&start) = seen.get(&key) {
            let face: Vec<Point2<f64>> = stack[start..].to_vec();
            for q in &stack[start + 1..] {
                seen.remove(&point_key(q));
            }
            stack.truncate(start + 1);
            if face.len() >= 3 && compute_signed_area(&face).abs() > MIN_AREA_THRESHOLD {
                faces.push(ensure_ccw(&face));
            }
        } else {
            seen.insert(key, stack.len());
            stack.push(p);
        }
    }

    faces
}

#[inline]
fn point_key(p: &Point2<f64>) -> (u64, u64) {
    // Normalise -0.0 so it hashes like 0.0
    ((p.x + 0.0).to_bits(), (p.y + 0.0).to_bits())
}

#[inline]
fn cross(o: Point2<f64>, a: Point2<f64>, b: Point2<f64>) -> f64 {
    (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
}

#[inline]
fn parameter(a0: Point2<f64>, a1: Point2<f64>, p: Point2<f64>) -> f64 {
    let d = a1 - a0;
    let len2 = d.norm_squared();
    if len2 == 0.0 {
        0.0
    } else {
        (p - a0).dot(&d) / len2
    }
}

fn snap_to_endpoint(p: Point2<f64>, endpoints: &[Point2<f64>]) -> Point2<f64> {
    endpoints
        .iter()
        .copied()
        .find(|e| (e - p).norm() <= EPSILON_2D)
        .unwrap_or(p)
}

fn collinear_overlap(a0: Point2<f64>, a1: Point2<f64>, b0: Point2<f64>, b1: Point2<f64>) -> bool {
    if cross(a0, a1, b0).abs() > EPSILON_2D || cross(a0, a1, b1).abs() > EPSILON_2D {
        return false;
    }
    let (lo, hi) = overlap_range(a0, a1, b0, b1);
    hi - lo > EPSILON_2D
}

/// Parameter range along `a` shared with the collinear segment `b`
fn overlap_range(a0: Point2<f64>, a1: Point2<f64>, b0: Point2<f64>, b1: Point2<f64>) -> (f64, f64) {
    let t0 = parameter(a0, a1, b0);
    let t1 = parameter(a0, a1, b1);
    (t0.min(t1).max(0.0), t0.max(t1).min(1.0))
}

/// All points two segments share: one for a crossing or touch, up to two
/// for a collinear overlap
fn edge_nodes(a0: Point2<f64>, a1: Point2<f64>, b0: Point2<f64>, b1: Point2<f64>) -> Vec<Point2<f64>> {
    let d1 = cross(b0, b1, a0);
    let d2 = cross(b0, b1, a1);
    let d3 = cross(a0, a1, b0);
    let d4 = cross(a0, a1, b1);

    let collinear = d1.abs() <= EPSILON_2D
        && d2.abs() <= EPSILON_2D
        && d3.abs() <= EPSILON_2D
        && d4.abs() <= EPSILON_2D;
    if collinear {
        let (lo, hi) = overlap_range(a0, a1, b0, b1);
        if hi < lo - EPSILON_2D {
            return Vec::new();
        }
        let d = a1 - a0;
        let start = a0 + d * lo;
        let end = a0 + d * hi;
        return if (end - start).norm() <= EPSILON_2D {
            vec![start]
        } else {
            vec![start, end]
        };
    }

    let straddles_a = (d1 > EPSILON_2D && d2 < -EPSILON_2D) || (d1 < -EPSILON_2D && d2 > EPSILON_2D);
    let straddles_b = (d3 > EPSILON_2D && d4 < -EPSILON_2D) || (d3 < -EPSILON_2D && d4 > EPSILON_2D);
    if straddles_a && straddles_b {
        let t = d1 / (d1 - d2);
        return vec![a0 + (a1 - a0) * t];
    }

    // Touching: an endpoint of one segment lies on the other
    for (p, q0, q1, d) in [(a0, b0, b1, d1), (a1, b0, b1, d2), (b0, a0, a1, d3), (b1, a0, a1, d4)] {
        if d.abs() <= EPSILON_2D && within_box(p, q0, q1) {
            return vec![p];
        }
    }
    Vec::new()
}

#[inline]
fn is_endpoint(p: Point2<f64>, q0: Point2<f64>, q1: Point2<f64>) -> bool {
    (p - q0).norm() <= EPSILON_2D || (p - q1).norm() <= EPSILON_2D
}

#[inline]
fn within_box(p: Point2<f64>, q0: Point2<f64>, q1: Point2<f64>) -> bool {
    p.x >= q0.x.min(q1.x) - EPSILON_2D
        && p.x <= q0.x.max(q1.x) + EPSILON_2D
        && p.y >= q0.y.min(q1.y) - EPSILON_2D
        && p.y <= q0.y.max(q1.y) + EPSILON_2D
}
