// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Geographic rectangles and area matching
//!
//! Requests and source coverages are axis-aligned lon/lat rectangles.
//! [`area_match`] decides whether a source can answer (part of) a request
//! and which sub-rectangle to ask it for.

use crate::error::{Error, Result};
use crate::polygon::MultiPolygon2D;
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in (longitude, latitude)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoRect {
    /// Western edge
    pub min_lon: f64,
    /// Southern edge
    pub min_lat: f64,
    /// Eastern edge
    pub max_lon: f64,
    /// Northern edge
    pub max_lat: f64,
}

impl GeoRect {
    /// Create a rectangle, rejecting non-finite or inverted bounds
    pub fn new(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Result<Self> {
        let rect = Self {
            min_lon,
            min_lat,
            max_lon,
            max_lat,
        };
        rect.validate()?;
        Ok(rect)
    }

    /// Check bounds of a rectangle built by hand or deserialized
    pub fn validate(&self) -> Result<()> {
        let finite = [self.min_lon, self.min_lat, self.max_lon, self.max_lat]
            .iter()
            .all(|v| v.is_finite());
        if !finite {
            return Err(Error::InvalidRect(format!("non-finite bounds {self:?}")));
        }
        if self.min_lon > self.max_lon || self.min_lat > self.max_lat {
            return Err(Error::InvalidRect(format!("inverted bounds {self:?}")));
        }
        Ok(())
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.max_lon - self.min_lon
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    #[inline]
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// Overlap with another rectangle. `None` unless the overlap has area.
    pub fn intersection(&self, other: &GeoRect) -> Option<GeoRect> {
        let min_lon = self.min_lon.max(other.min_lon);
        let min_lat = self.min_lat.max(other.min_lat);
        let max_lon = self.max_lon.min(other.max_lon);
        let max_lat = self.max_lat.min(other.max_lat);
        if min_lon < max_lon && min_lat < max_lat {
            Some(GeoRect {
                min_lon,
                min_lat,
                max_lon,
                max_lat,
            })
        } else {
            None
        }
    }

    /// `other` lies inside `self`, edges included
    pub fn contains_rect(&self, other: &GeoRect) -> bool {
        other.min_lon >= self.min_lon
            && other.min_lat >= self.min_lat
            && other.max_lon <= self.max_lon
            && other.max_lat <= self.max_lat
    }

    /// Point membership, edges included
    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        lon >= self.min_lon && lon <= self.max_lon && lat >= self.min_lat && lat <= self.max_lat
    }

    /// Counter-clockwise ring as planar geometry
    pub fn to_geometry(&self) -> MultiPolygon2D {
        MultiPolygon2D::from_rect(self)
    }
}

impl MultiPolygon2D {
    /// Rectangle as a single counter-clockwise polygon
    pub fn from_rect(rect: &GeoRect) -> Self {
        MultiPolygon2D::from_ring(vec![
            Point2::new(rect.min_lon, rect.min_lat),
            Point2::new(rect.max_lon, rect.min_lat),
            Point2::new(rect.max_lon, rect.max_lat),
            Point2::new(rect.min_lon, rect.max_lat),
        ])
    }
}

/// Match a request against a source's coverage
///
/// Returns the sub-rectangle the source should be asked for, or `None` when
/// the source cannot contribute. Touching edges or corners do not match.
pub fn area_match(request: &GeoRect, coverage: &GeoRect) -> Option<GeoRect> {
    request.intersection(coverage)
}
