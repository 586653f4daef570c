// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Grid georeferencing
//!
//! Maps traced grid indices to (longitude, latitude). A grid point names the
//! centre of a cell; the cell at (0, 0) is centred on the origin. Output
//! coordinates are rounded to a fixed number of decimals, which can fold
//! neighbouring vertices together or make a ring touch itself, so every ring
//! goes through duplicate removal and a validity check afterwards.

use crate::error::{Error, Result};
use crate::polygon::{MultiPolygon2D, Polygon2D};
use crate::rect::GeoRect;
use crate::validity::{is_simple_ring, make_valid};
use nalgebra::Point2;
use nogo_core::{remove_duplicate_points, Figure, GridPoint};
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Placement of a grid on the globe
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridGeoreference {
    /// Longitude of the centre of cell (0, 0)
    pub origin_lon: f64,
    /// Latitude of the centre of cell (0, 0)
    pub origin_lat: f64,
    /// Column spacing in degrees of longitude
    pub cell_width: f64,
    /// Row spacing in degrees of latitude
    pub cell_height: f64,
}

impl GridGeoreference {
    pub fn new(origin_lon: f64, origin_lat: f64, cell_width: f64, cell_height: f64) -> Result<Self> {
        if !(origin_lon.is_finite() && origin_lat.is_finite()) {
            return Err(Error::InvalidGeoreference(format!(
                "non-finite origin ({origin_lon}, {origin_lat})"
            )));
        }
        if !(cell_width.is_finite() && cell_width > 0.0 && cell_height.is_finite() && cell_height > 0.0)
        {
            return Err(Error::InvalidGeoreference(format!(
                "cell size must be positive, got {cell_width} x {cell_height}"
            )));
        }
        Ok(Self {
            origin_lon,
            origin_lat,
            cell_width,
            cell_height,
        })
    }

    /// Centre of a cell
    #[inline]
    pub fn to_geo(&self, point: GridPoint) -> Point2<f64> {
        Point2::new(
            self.origin_lon + f64::from(point.x) * self.cell_width,
            self.origin_lat + f64::from(point.y) * self.cell_height,
        )
    }

    /// Centre of a cell, rounded to `decimals`
    #[inline]
    pub fn to_geo_rounded(&self, point: GridPoint, decimals: u32) -> Point2<f64> {
        let p = self.to_geo(point);
        Point2::new(round_coordinate(p.x, decimals), round_coordinate(p.y, decimals))
    }

    /// Same grid spacing, origin moved to the centre of cell (column, row)
    pub fn shifted(&self, column: usize, row: usize) -> Self {
        Self {
            origin_lon: self.origin_lon + column as f64 * self.cell_width,
            origin_lat: self.origin_lat + row as f64 * self.cell_height,
            ..*self
        }
    }

    /// Area covered by a `width` x `height` grid: every cell extends half a
    /// cell around its centre
    pub fn coverage(&self, width: usize, height: usize) -> GeoRect {
        let half_w = self.cell_width / 2.0;
        let half_h = self.cell_height / 2.0;
        GeoRect {
            min_lon: self.origin_lon - half_w,
            min_lat: self.origin_lat - half_h,
            max_lon: self.origin_lon + width as f64 * self.cell_width - half_w,
            max_lat: self.origin_lat + height as f64 * self.cell_height - half_h,
        }
    }

    /// Rectangle spanned by the outermost cell centres of a `width` x
    /// `height` grid
    ///
    /// Traced rings run through cell centres, so this is the largest area a
    /// traced figure can describe. It has no width or height for a single
    /// column or row.
    pub fn centre_extent(&self, width: usize, height: usize) -> GeoRect {
        let last_column = width.saturating_sub(1) as f64;
        let last_row = height.saturating_sub(1) as f64;
        GeoRect {
            min_lon: self.origin_lon,
            min_lat: self.origin_lat,
            max_lon: self.origin_lon + last_column * self.cell_width,
            max_lat: self.origin_lat + last_row * self.cell_height,
        }
    }

    /// Columns and rows of a `width` x `height` grid whose cells overlap `area`
    ///
    /// `None` when no cell overlaps.
    pub fn cell_range(
        &self,
        area: &GeoRect,
        width: usize,
        height: usize,
    ) -> Option<(Range<usize>, Range<usize>)> {
        let columns = axis_range(
            area.min_lon,
            area.max_lon,
            self.origin_lon,
            self.cell_width,
            width,
        )?;
        let rows = axis_range(
            area.min_lat,
            area.max_lat,
            self.origin_lat,
            self.cell_height,
            height,
        )?;
        Some((columns, rows))
    }

    /// Convert a traced figure to geographic geometry
    ///
    /// Polygon rings are rounded, stripped of repeated vertices and repaired
    /// when they no longer form a simple ring. Figures that collapse under
    /// rounding degrade to a line or a point.
    pub fn figure_to_geometry(&self, figure: &Figure, decimals: u32) -> Result<GeoFigure> {
        match figure {
            Figure::SinglePoint(p) => Ok(GeoFigure::Point(self.to_geo_rounded(*p, decimals))),
            Figure::Line(a, b) => {
                let a = self.to_geo_rounded(*a, decimals);
                let b = self.to_geo_rounded(*b, decimals);
                Ok(if a == b {
                    GeoFigure::Point(a)
                } else {
                    GeoFigure::Line(a, b)
                })
            }
            Figure::Polygon(ring) => {
                let rounded: Vec<Point2<f64>> = ring
                    .iter()
                    .map(|p| self.to_geo_rounded(*p, decimals))
                    .collect();
                self.ring_to_geometry(remove_duplicate_points(&rounded))
            }
        }
    }

    fn ring_to_geometry(&self, ring: Vec<Point2<f64>>) -> Result<GeoFigure> {
        let polygon = Polygon2D::new(ring);
        match polygon.outer.len() {
            0 => Err(Error::TooFewVertices { found: 0 }),
            1 => Ok(GeoFigure::Point(polygon.outer[0])),
            2 => Ok(GeoFigure::Line(polygon.outer[0], polygon.outer[1])),
            _ if is_simple_ring(&polygon.outer) => {
                Ok(GeoFigure::Area(MultiPolygon2D::from(polygon)))
            }
            vertices => {
                tracing::warn!(vertices, "Traced ring is not simple, repairing");
                Ok(GeoFigure::Area(make_valid(&polygon)?))
            }
        }
    }
}

/// A traced figure in geographic coordinates
#[derive(Debug, Clone, PartialEq)]
pub enum GeoFigure {
    Point(Point2<f64>),
    Line(Point2<f64>, Point2<f64>),
    Area(MultiPolygon2D),
}

impl GeoFigure {
    /// Membership test; lines and points only contain their own vertices
    pub fn lies_within(&self, zone: &MultiPolygon2D) -> bool {
        match self {
            GeoFigure::Point(p) => zone.contains_point(p),
            GeoFigure::Line(a, b) => zone.contains_point(a) && zone.contains_point(b),
            GeoFigure::Area(area) => crate::planar::PlanarGeometry::contains(zone, area),
        }
    }
}

/// Round half away from zero to `decimals` places
#[inline]
pub fn round_coordinate(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals.min(15) as i32);
    (value * factor).round() / factor
}

/// Indices along one axis whose cell spans overlap [lo, hi]
fn axis_range(lo: f64, hi: f64, origin: f64, step: f64, count: usize) -> Option<Range<usize>> {
    if count == 0 {
        return None;
    }
    // Cell i spans [origin + (i - 0.5) * step, origin + (i + 0.5) * step]
    let first = ((lo - origin) / step - 0.5).ceil().max(0.0);
    let last = ((hi - origin) / step + 0.5).floor().min(count as f64 - 1.0);
    if !(first.is_finite() && last.is_finite()) || first > last {
        return None;
    }
    Some(first as usize..last as usize + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn georef() -> GridGeoreference {
        GridGeoreference::new(10.0, 50.0, 0.5, 0.25).unwrap()
    }

    #[test]
    fn test_new_rejects_bad_spacing() {
        assert!(GridGeoreference::new(0.0, 0.0, 0.0, 1.0).is_err());
        assert!(GridGeoreference::new(0.0, 0.0, 1.0, -1.0).is_err());
        assert!(GridGeoreference::new(f64::NAN, 0.0, 1.0, 1.0).is_err());
    }

    #[test]
    fn test_to_geo() {
        let p = georef().to_geo(GridPoint::new(2, 4));
        assert_relative_eq!(p.x, 11.0);
        assert_relative_eq!(p.y, 51.0);
    }

    #[test]
    fn test_round_coordinate() {
        assert_eq!(round_coordinate(1.234_567_89, 3), 1.235);
        assert_eq!(round_coordinate(-1.234_5, 2), -1.23);
        assert_eq!(round_coordinate(7.0, 0), 7.0);
    }

    #[test]
    fn test_coverage_and_cell_range() {
        let g = GridGeoreference::new(0.0, 0.0, 1.0, 1.0).unwrap();
        let coverage = g.coverage(10, 5);
        assert_eq!(
            coverage,
            GeoRect {
                min_lon: -0.5,
                min_lat: -0.5,
                max_lon: 9.5,
                max_lat: 4.5
            }
        );

        let area = GeoRect::new(2.2, 1.0, 4.1, 3.0).unwrap();
        let (columns, rows) = g.cell_range(&area, 10, 5).unwrap();
        assert_eq!(columns, 2..5);
        assert_eq!(rows, 1..4);

        // Clamped to the grid
        let (columns, rows) = g.cell_range(&GeoRect::new(-5.0, -5.0, 50.0, 50.0).unwrap(), 10, 5).unwrap();
        assert_eq!(columns, 0..10);
        assert_eq!(rows, 0..5);

        assert!(g.cell_range(&GeoRect::new(20.0, 0.0, 30.0, 1.0).unwrap(), 10, 5).is_none());
    }

    #[test]
    fn test_centre_extent() {
        let extent = georef().centre_extent(4, 3);
        assert_relative_eq!(extent.min_lon, 10.0);
        assert_relative_eq!(extent.min_lat, 50.0);
        assert_relative_eq!(extent.max_lon, 11.5);
        assert_relative_eq!(extent.max_lat, 50.5);
        // Half a cell inside the coverage on every side
        let coverage = georef().coverage(4, 3);
        assert_relative_eq!(extent.min_lon - coverage.min_lon, 0.25);
        assert_relative_eq!(coverage.max_lat - extent.max_lat, 0.125);

        // A single column spans no longitude
        assert_eq!(georef().centre_extent(1, 3).width(), 0.0);
    }

    #[test]
    fn test_shifted() {
        let shifted = georef().shifted(2, 4);
        assert_eq!(shifted.to_geo(GridPoint::new(0, 0)), georef().to_geo(GridPoint::new(2, 4)));
    }

    #[test]
    fn test_square_figure_to_area() {
        let figure = Figure::Polygon(vec![
            GridPoint::new(0, 0),
            GridPoint::new(0, 1),
            GridPoint::new(1, 1),
            GridPoint::new(1, 0),
            GridPoint::new(0, 0),
        ]);
        let GeoFigure::Area(area) = georef().figure_to_geometry(&figure, 7).unwrap() else {
            panic!("expected an area");
        };
        assert_eq!(area.polygons.len(), 1);
        assert_eq!(area.polygons[0].outer.len(), 4);
        assert_relative_eq!(area.area(), 0.5 * 0.25, epsilon = 1e-12);
    }

    #[test]
    fn test_rounding_collapses_to_line() {
        let g = GridGeoreference::new(0.0, 0.0, 1e-4, 1.0).unwrap();
        // At two decimals the two columns land on the same longitude
        let figure = Figure::Polygon(vec![
            GridPoint::new(0, 0),
            GridPoint::new(0, 1),
            GridPoint::new(1, 1),
            GridPoint::new(1, 0),
            GridPoint::new(0, 0),
        ]);
        assert_eq!(
            g.figure_to_geometry(&figure, 2).unwrap(),
            GeoFigure::Line(Point2::new(0.0, 0.0), Point2::new(0.0, 1.0))
        );
    }

    #[test]
    fn test_point_and_line_figures() {
        let g = georef();
        assert_eq!(
            g.figure_to_geometry(&Figure::SinglePoint(GridPoint::new(1, 1)), 7).unwrap(),
            GeoFigure::Point(Point2::new(10.5, 50.25))
        );
        assert_eq!(
            g.figure_to_geometry(&Figure::Line(GridPoint::new(0, 0), GridPoint::new(2, 0)), 7)
                .unwrap(),
            GeoFigure::Line(Point2::new(10.0, 50.0), Point2::new(11.0, 50.0))
        );
    }

    #[test]
    fn test_lies_within() {
        let zone = GeoRect::new(0.0, 0.0, 10.0, 10.0).unwrap().to_geometry();
        assert!(GeoFigure::Point(Point2::new(1.0, 1.0)).lies_within(&zone));
        assert!(!GeoFigure::Line(Point2::new(1.0, 1.0), Point2::new(11.0, 1.0)).lies_within(&zone));
        let inner = GeoRect::new(1.0, 1.0, 2.0, 2.0).unwrap().to_geometry();
        assert!(GeoFigure::Area(inner).lies_within(&zone));
    }
}
