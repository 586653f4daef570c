// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Row segmentation: maximal runs of blocked cells within one row

use crate::grid::GridPoint;
use smallvec::SmallVec;

/// Segments found in a single row. Most rows hold only a handful of runs.
pub type RowSegments = SmallVec<[LineSegment; 8]>;

/// Maximal contiguous run of blocked cells in one row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineSegment {
    pub start: GridPoint,
    pub end: GridPoint,
}

impl LineSegment {
    /// Run from column `start` to column `end` (inclusive) on `row`
    #[inline]
    pub const fn new(row: i32, start: i32, end: i32) -> Self {
        Self {
            start: GridPoint::new(start, row),
            end: GridPoint::new(end, row),
        }
    }

    /// `end.x - start.x`, zero for a single cell
    #[inline]
    pub fn length(&self) -> i32 {
        self.end.x - self.start.x
    }

    #[inline]
    pub fn row(&self) -> i32 {
        self.start.y
    }

    /// True when the column range `[left, right]` shares at least one column with this run
    #[inline]
    pub fn overlaps(&self, left: i32, right: i32) -> bool {
        !(left > self.end.x || right < self.start.x)
    }
}

/// Split one row into its blocked runs, west to east.
///
/// `blocked` receives the column index and the cell.
pub fn segment_row<T>(
    row: i32,
    cells: &[T],
    mut blocked: impl FnMut(i32, &T) -> bool,
) -> RowSegments {
    let mut segments = RowSegments::new();
    let mut run_start: Option<i32> = None;

    for (column, cell) in cells.iter().enumerate() {
        let column = column as i32;
        if blocked(column, cell) {
            if run_start.is_none() {
                run_start = Some(column);
            }
        } else if let Some(start) = run_start.take() {
            segments.push(LineSegment::new(row, start, column - 1));
        }
    }

    if let Some(start) = run_start {
        segments.push(LineSegment::new(row, start, cells.len() as i32 - 1));
    }

    segments
}
