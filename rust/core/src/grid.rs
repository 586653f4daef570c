// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Rectangular sample grids in local index space
//!
//! Rows are stored bottom-to-top: row 0 is the southernmost row of the source,
//! column 0 the westernmost. Nothing in this module knows about longitude or
//! latitude; that mapping is owned by the caller.

use crate::error::{Error, Result};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Integer (column, row) position in a grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GridPoint {
    /// Column index
    pub x: i32,
    /// Row index
    pub y: i32,
}

impl GridPoint {
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Rectangular grid of samples, row-major, rows bottom-to-top
#[derive(Debug, Clone, PartialEq)]
pub struct Grid<T> {
    width: usize,
    height: usize,
    cells: Vec<T>,
}

impl<T> Grid<T> {
    /// Build a grid from rows given bottom-to-top.
    ///
    /// Fails on an empty grid, an empty first row or rows of differing length.
    pub fn from_rows(rows: Vec<Vec<T>>) -> Result<Self> {
        let width = validate_rows(&rows)?;
        let height = rows.len();
        let mut cells = Vec::with_capacity(width * height);
        for row in rows {
            cells.extend(row);
        }
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Build a grid by sampling `f(column, row)` for every cell
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> T) -> Result<Self> {
        if height == 0 {
            return Err(Error::EmptyGrid);
        }
        if width == 0 {
            return Err(Error::EmptyRow { row: 0 });
        }
        let mut cells = Vec::with_capacity(width * height);
        for row in 0..height {
            for column in 0..width {
                cells.push(f(column, row));
            }
        }
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Cells of one row, west to east
    #[inline]
    pub fn row(&self, row: usize) -> &[T] {
        let start = row * self.width;
        &self.cells[start..start + self.width]
    }

    /// Iterate rows bottom-to-top
    pub fn rows(&self) -> impl Iterator<Item = &[T]> {
        self.cells.chunks(self.width)
    }

    #[inline]
    pub fn get(&self, column: usize, row: usize) -> Option<&T> {
        if column < self.width && row < self.height {
            self.cells.get(row * self.width + column)
        } else {
            None
        }
    }
}

/// Check the rectangular-grid contract and return the common row length
pub fn validate_rows<T, R: AsRef<[T]>>(rows: &[R]) -> Result<usize> {
    let first = rows.first().ok_or(Error::EmptyGrid)?;
    let width = first.as_ref().len();
    if width == 0 {
        return Err(Error::EmptyRow { row: 0 });
    }
    for (row, cells) in rows.iter().enumerate().skip(1) {
        let found = cells.as_ref().len();
        if found != width {
            return Err(Error::RaggedGrid {
                row,
                expected: width,
                found,
            });
        }
    }
    Ok(width)
}

/// One depth sample handed to a blocking predicate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridCell {
    /// Position of the sample in the grid
    pub position: GridPoint,
    /// Surveyed depth in metres, negative below the datum. `None` means no data.
    pub depth: Option<f64>,
}

/// Depth grid as supplied by a bathymetry source
pub type DepthGrid = Grid<Option<f64>>;

impl DepthGrid {
    /// Sample at a position as a [`GridCell`]
    pub fn cell(&self, position: GridPoint) -> Option<GridCell> {
        if position.x < 0 || position.y < 0 {
            return None;
        }
        self.get(position.x as usize, position.y as usize)
            .map(|depth| GridCell {
                position,
                depth: *depth,
            })
    }
}
