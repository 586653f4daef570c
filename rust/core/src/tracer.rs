// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Region tracer: blocked cells to minimal-vertex figures
//!
//! The tracer does one west-to-east scan per row to find blocked runs
//! ([`segment_row`]) and then joins each row's runs onto the regions that were
//! still open after the previous row. Every region keeps its left and right
//! boundary as corner points only, so the finished ring can be emitted
//! directly as "left boundary upwards, right boundary downwards".
//!
//! Joining rule for an open region with last extent `[L, R]` and a candidate
//! run `[s, e]` of the current row:
//!
//! - no shared column: not a candidate
//! - same extent, or narrower on one or both sides: taken
//! - wider on either side: taken only when the next untried run of the row
//!   does not also touch `[L, R]`
//!
//! The last rule keeps two separate regions that merely touch an old extent
//! from both sides from being bridged into one ring.
//!
//! Regions live in an index-addressed pool. A region moves through
//! [`RegionState::Seeded`] and [`RegionState::Growing`] to
//! [`RegionState::Finalized`]; figures are reported in pool order, which is
//! the order in which regions were first seen.

use crate::error::Result;
use crate::figure::{optimize, remove_duplicate_points, Figure};
use crate::grid::{validate_rows, Grid, GridPoint};
use crate::segment::{segment_row, LineSegment, RowSegments};

/// Trace a grid given as rows (bottom-to-top).
///
/// `blocked` receives the cell position and value and decides whether the
/// cell is part of a NoGo region.
pub fn trace_rows<T, R, F>(rows: &[R], blocked: F) -> Result<Vec<Figure>>
where
    R: AsRef<[T]>,
    F: FnMut(GridPoint, &T) -> bool,
{
    validate_rows(rows)?;
    Ok(trace_validated(rows, blocked))
}

/// Trace a validated [`Grid`]
pub fn trace_grid<T, F>(grid: &Grid<T>, blocked: F) -> Vec<Figure>
where
    F: FnMut(GridPoint, &T) -> bool,
{
    let rows: Vec<&[T]> = grid.rows().collect();
    trace_validated(&rows, blocked)
}

/// Rows must be non-empty and of equal length
fn trace_validated<T, R, F>(rows: &[R], mut blocked: F) -> Vec<Figure>
where
    R: AsRef<[T]>,
    F: FnMut(GridPoint, &T) -> bool,
{
    let mut tracer = RegionTracer::new();
    for (y, cells) in rows.iter().enumerate() {
        let y = y as i32;
        let segments = segment_row(y, cells.as_ref(), |x, cell| {
            blocked(GridPoint::new(x, y), cell)
        });
        tracer.join_row(segments);
    }
    let figures = tracer.finish();

    tracing::debug!(
        rows = rows.len(),
        figures = figures.len(),
        "Traced grid regions"
    );
    figures
}

/// Per-region state during one trace
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegionState {
    /// Opened by a single run, nothing joined yet
    Seeded(LineSegment),
    /// At least two rows joined
    Growing(GrowingRegion),
    /// Closed; no further rows can join
    Finalized(Figure),
}

/// Boundaries of a region spanning more than one row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrowingRegion {
    /// Left boundary corners, bottom to top
    pub left: Vec<GridPoint>,
    /// Right boundary corners, bottom to top
    pub right: Vec<GridPoint>,
    pub last_left: i32,
    pub last_right: i32,
    pub last_row: i32,
    pub rows_merged: usize,
    /// Any joined run wider than one cell
    pub has_width: bool,
}

impl RegionState {
    /// Column extent `[L, R]` of the most recently joined run
    pub fn extent(&self) -> Option<(i32, i32)> {
        match self {
            RegionState::Seeded(segment) => Some((segment.start.x, segment.end.x)),
            RegionState::Growing(region) => Some((region.last_left, region.last_right)),
            RegionState::Finalized(_) => None,
        }
    }

    /// Join the next row's run onto this region
    pub fn absorb(self, segment: LineSegment) -> RegionState {
        match self {
            RegionState::Seeded(seed) => {
                let region = GrowingRegion {
                    left: vec![seed.start],
                    right: vec![seed.end],
                    last_left: seed.start.x,
                    last_right: seed.end.x,
                    last_row: seed.row(),
                    rows_merged: 1,
                    has_width: seed.length() > 0,
                };
                RegionState::Growing(region.absorb(segment))
            }
            RegionState::Growing(region) => RegionState::Growing(region.absorb(segment)),
            finalized @ RegionState::Finalized(_) => finalized,
        }
    }

    /// Close the region and produce its figure
    pub fn finalize(self) -> RegionState {
        match self {
            RegionState::Seeded(seed) if seed.length() == 0 => {
                RegionState::Finalized(Figure::SinglePoint(seed.start))
            }
            RegionState::Seeded(seed) => RegionState::Finalized(Figure::Line(seed.start, seed.end)),
            RegionState::Growing(region) => RegionState::Finalized(region.into_figure()),
            finalized @ RegionState::Finalized(_) => finalized,
        }
    }
}

impl GrowingRegion {
    fn absorb(mut self, segment: LineSegment) -> Self {
        let row = segment.row();
        if segment.start.x != self.last_left {
            push_corner(&mut self.left, GridPoint::new(self.last_left, self.last_row));
            push_corner(&mut self.left, segment.start);
        }
        if segment.end.x != self.last_right {
            push_corner(&mut self.right, GridPoint::new(self.last_right, self.last_row));
            push_corner(&mut self.right, segment.end);
        }
        self.last_left = segment.start.x;
        self.last_right = segment.end.x;
        self.last_row = row;
        self.rows_merged += 1;
        self.has_width |= segment.length() > 0;
        self
    }

    fn into_figure(mut self) -> Figure {
        push_corner(&mut self.left, GridPoint::new(self.last_left, self.last_row));
        push_corner(&mut self.right, GridPoint::new(self.last_right, self.last_row));

        // A one-cell-wide column never changes column, so its left boundary
        // is exactly its bottom and top cell
        if !self.has_width && self.left.len() == 2 {
            return Figure::Line(self.left[0], self.left[1]);
        }

        let mut ring = Vec::with_capacity(self.left.len() + self.right.len() + 1);
        ring.extend_from_slice(&self.left);
        ring.extend(self.right.iter().rev().copied());
        ring.push(self.left[0]);

        let ring = optimize(&remove_duplicate_points(&ring));
        if ring.len() < 4 {
            // Collapsed onto a segment
            return Figure::Line(ring[0], ring[ring.len() / 2]);
        }
        Figure::Polygon(ring)
    }
}

#[inline]
fn push_corner(boundary: &mut Vec<GridPoint>, point: GridPoint) {
    if boundary.last() != Some(&point) {
        boundary.push(point);
    }
}

/// Row-joining pass over an index-based pool of regions
#[derive(Debug, Default)]
pub struct RegionTracer {
    regions: Vec<Option<RegionState>>,
    active: Vec<usize>,
}

impl RegionTracer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of regions still open
    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Join one row's runs onto the open regions
    pub fn join_row(&mut self, segments: RowSegments) {
        let mut candidates: Vec<Option<LineSegment>> = segments.into_iter().map(Some).collect();
        let mut still_active = Vec::with_capacity(self.active.len() + candidates.len());

        for &index in &self.active {
            let Some(state) = self.regions[index].take() else {
                continue;
            };
            let continuation = state
                .extent()
                .and_then(|(left, right)| pick_continuation(left, right, &candidates));

            match continuation.and_then(|pos| candidates[pos].take()) {
                Some(segment) => {
                    self.regions[index] = Some(state.absorb(segment));
                    still_active.push(index);
                }
                None => self.regions[index] = Some(state.finalize()),
            }
        }

        for segment in candidates.into_iter().flatten() {
            still_active.push(self.regions.len());
            self.regions.push(Some(RegionState::Seeded(segment)));
        }

        self.active = still_active;
    }

    /// Close every open region and return all figures in discovery order
    pub fn finish(mut self) -> Vec<Figure> {
        for &index in &self.active {
            if let Some(state) = self.regions[index].take() {
                self.regions[index] = Some(state.finalize());
            }
        }

        self.regions
            .into_iter()
            .filter_map(|state| match state {
                Some(RegionState::Finalized(figure)) => Some(figure),
                _ => None,
            })
            .collect()
    }
}

/// Position in `candidates` of the run that continues a region with extent `[left, right]`
fn pick_continuation(left: i32, right: i32, candidates: &[Option<LineSegment>]) -> Option<usize> {
    let remaining: Vec<(usize, LineSegment)> = candidates
        .iter()
        .enumerate()
        .filter_map(|(pos, c)| c.map(|segment| (pos, segment)))
        .collect();

    for (i, &(pos, segment)) in remaining.iter().enumerate() {
        if !segment.overlaps(left, right) {
            continue;
        }
        let opens_out = segment.start.x < left || segment.end.x > right;
        if !opens_out {
            return Some(pos);
        }
        let ambiguous = remaining
            .get(i + 1)
            .is_some_and(|(_, next)| next.overlaps(left, right));
        if !ambiguous {
            return Some(pos);
        }
    }
    None
}
