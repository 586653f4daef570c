// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Draught rule deciding which grid cells are blocked.
//!
//! Depths are negative below the datum, so a cell is navigable when
//! `-depth + tide >= draught`. Cells without a depth are always blocked.

use crate::error::{Error, Result};
use nogo_core::{trace_grid, DepthGrid, Figure, Grid, GridPoint};
use nogo_geometry::GridGeoreference;

/// Water level correction looked up per location.
pub trait TidalAdjustment: Send + Sync {
    /// Water level above datum in metres, `None` when unknown at this location.
    fn adjustment_at(&self, lon: f64, lat: f64) -> Option<f64>;
}

/// Tidal levels sampled on a regular grid, looked up by nearest cell.
#[derive(Debug, Clone)]
pub struct TideGrid {
    georef: GridGeoreference,
    levels: Grid<Option<f64>>,
}

impl TideGrid {
    pub fn new(georef: GridGeoreference, levels: Grid<Option<f64>>) -> Self {
        Self { georef, levels }
    }

    /// Same level everywhere inside `georef`'s `width` x `height` cells
    pub fn uniform(georef: GridGeoreference, width: usize, height: usize, level: f64) -> Result<Self> {
        let levels = Grid::from_fn(width, height, |_, _| Some(level))?;
        Ok(Self { georef, levels })
    }
}

impl TidalAdjustment for TideGrid {
    fn adjustment_at(&self, lon: f64, lat: f64) -> Option<f64> {
        let column = ((lon - self.georef.origin_lon) / self.georef.cell_width).round();
        let row = ((lat - self.georef.origin_lat) / self.georef.cell_height).round();
        if column < 0.0 || row < 0.0 {
            return None;
        }
        self.levels
            .get(column as usize, row as usize)
            .copied()
            .flatten()
    }
}

/// Figures traced from one grid, plus how many cells lacked tidal data.
#[derive(Debug, Clone, PartialEq)]
pub struct TraceOutcome {
    pub figures: Vec<Figure>,
    pub cells_without_tide: usize,
}

/// Blocking rule for a vessel draught, optionally corrected for tide.
#[derive(Clone, Copy)]
pub struct DraughtPredicate<'a> {
    draught: f64,
    tide: Option<(&'a dyn TidalAdjustment, GridGeoreference)>,
}

impl<'a> DraughtPredicate<'a> {
    /// Rule for a draught in metres
    pub fn new(draught: f64) -> Result<Self> {
        if !draught.is_finite() || draught < 0.0 {
            return Err(Error::InvalidRequest(format!(
                "draught must be a non-negative number, got {draught}"
            )));
        }
        Ok(Self {
            draught,
            tide: None,
        })
    }

    /// Correct depths with tidal levels. `georef` places the grid being traced.
    pub fn with_tide(self, tide: &'a dyn TidalAdjustment, georef: GridGeoreference) -> Self {
        Self {
            tide: Some((tide, georef)),
            ..self
        }
    }

    #[inline]
    pub fn draught(&self) -> f64 {
        self.draught
    }

    /// Blocking decision for a depth and a tidal level
    #[inline]
    pub fn is_blocked(&self, depth: Option<f64>, tide: f64) -> bool {
        match depth {
            None => true,
            Some(depth) => -depth + tide < self.draught,
        }
    }

    /// Tidal level at a cell; `None` when a tide source is set but has no value
    fn tide_at(&self, position: GridPoint) -> Option<f64> {
        match &self.tide {
            None => Some(0.0),
            Some((tide, georef)) => {
                let p = georef.to_geo(position);
                tide.adjustment_at(p.x, p.y)
            }
        }
    }

    /// Trace the blocked regions of a depth grid
    ///
    /// Missing tidal levels count as zero; the number of such cells is reported.
    pub fn trace(&self, grid: &DepthGrid) -> TraceOutcome {
        let mut cells_without_tide = 0usize;
        let figures = trace_grid(grid, |position, depth: &Option<f64>| {
            if depth.is_none() {
                return true;
            }
            let tide = self.tide_at(position).unwrap_or_else(|| {
                cells_without_tide += 1;
                0.0
            });
            self.is_blocked(*depth, tide)
        });
        TraceOutcome {
            figures,
            cells_without_tide,
        }
    }
}

impl std::fmt::Debug for DraughtPredicate<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DraughtPredicate")
            .field("draught", &self.draught)
            .field("tidal", &self.tide.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn georef() -> GridGeoreference {
        GridGeoreference::new(0.0, 0.0, 1.0, 1.0).unwrap()
    }

    #[test]
    fn test_rejects_bad_draught() {
        assert!(DraughtPredicate::new(-1.0).is_err());
        assert!(DraughtPredicate::new(f64::NAN).is_err());
        assert!(DraughtPredicate::new(0.0).is_ok());
    }

    #[test]
    fn test_static_rule() {
        let rule = DraughtPredicate::new(5.0).unwrap();
        assert!(rule.is_blocked(None, 0.0));
        assert!(rule.is_blocked(Some(-4.0), 0.0));
        assert!(!rule.is_blocked(Some(-5.0), 0.0));
        assert!(!rule.is_blocked(Some(-12.0), 0.0));
        // Tide lifts a shallow cell above the draught
        assert!(!rule.is_blocked(Some(-4.0), 1.5));
    }

    #[test]
    fn test_trace_without_tide() {
        // Bottom row: shallow, shallow, deep. Top row: no data, deep, deep.
        let grid =
            DepthGrid::from_rows(vec![vec![Some(-2.0), Some(-2.0), Some(-20.0)], vec![None, Some(-20.0), Some(-20.0)]])
                .unwrap();
        let outcome = DraughtPredicate::new(5.0).unwrap().trace(&grid);
        assert_eq!(outcome.cells_without_tide, 0);
        assert_eq!(
            outcome.figures,
            vec![Figure::Polygon(vec![
                GridPoint::new(0, 0),
                GridPoint::new(0, 1),
                GridPoint::new(1, 0),
                GridPoint::new(0, 0),
            ])]
        );
    }

    #[test]
    fn test_tide_grid_lookup() {
        let levels = Grid::from_rows(vec![vec![Some(1.0), None], vec![Some(2.0), Some(3.0)]]).unwrap();
        let tide = TideGrid::new(georef(), levels);
        assert_eq!(tide.adjustment_at(0.2, 0.1), Some(1.0));
        assert_eq!(tide.adjustment_at(1.0, 0.0), None);
        assert_eq!(tide.adjustment_at(0.9, 1.4), Some(3.0));
        assert_eq!(tide.adjustment_at(-3.0, 0.0), None);
        assert_eq!(tide.adjustment_at(5.0, 0.0), None);
    }

    #[test]
    fn test_tide_unblocks_and_missing_tide_is_counted() {
        let grid = DepthGrid::from_rows(vec![vec![Some(-4.0), Some(-4.0), None]]).unwrap();
        let levels = Grid::from_rows(vec![vec![Some(2.0), None, None]]).unwrap();
        let tide = TideGrid::new(georef(), levels);

        let outcome = DraughtPredicate::new(5.0)
            .unwrap()
            .with_tide(&tide, georef())
            .trace(&grid);

        // Cell 0 is lifted by the tide, cell 1 falls back to the static rule,
        // cell 2 has no depth and never asks for tide
        assert_eq!(outcome.cells_without_tide, 1);
        assert_eq!(
            outcome.figures,
            vec![Figure::Line(GridPoint::new(1, 0), GridPoint::new(2, 0))]
        );
    }
}
