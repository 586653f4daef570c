// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Serialized response types.
//!
//! Coordinates are `[longitude, latitude]` pairs. Rings are closed: the first
//! pair is repeated at the end.

use nogo_geometry::{close_ring, MultiPolygon2D, Point2, Polygon2D};
use serde::{Deserialize, Serialize};

/// Id of the warning raised when tidal data was missing for some cells.
pub const TIDAL_DATA_UNAVAILABLE: &str = "TIDAL_DATA_UNAVAILABLE";
/// Id of the warning raised when the request is only partly covered by sources.
pub const AREA_PARTIALLY_SUPPORTED: &str = "AREA_PARTIALLY_SUPPORTED";

/// Information that could not be fully produced for a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warning {
    /// Machine-readable id.
    pub id: String,
    /// Human-readable summary.
    pub message: String,
    /// Extra context, e.g. the source or area concerned.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl Warning {
    pub fn new(id: &str, message: impl Into<String>) -> Self {
        Self {
            id: id.to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// NoGo areas were computed from draught alone for part of the grid.
    pub fn tidal_data_unavailable(source: &str, cells: usize) -> Self {
        Self::new(
            TIDAL_DATA_UNAVAILABLE,
            "Tidal data unavailable, NoGo areas computed without tidal adjustment",
        )
        .with_details(format!("source {source}: {cells} cells without tidal data"))
    }

    /// Part of the requested area has no source.
    pub fn area_partially_supported(uncovered_area: f64) -> Self {
        Self::new(
            AREA_PARTIALLY_SUPPORTED,
            "Requested area is only partially covered by available sources",
        )
        .with_details(format!("uncovered area {uncovered_area:.6} square degrees"))
    }
}

/// One NoGo polygon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoGoPolygon {
    /// Exterior ring.
    pub points: Vec<[f64; 2]>,
    /// Interior rings; empty for traced polygons.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub holes: Vec<Vec<[f64; 2]>>,
}

impl NoGoPolygon {
    pub fn from_polygon(polygon: &Polygon2D) -> Self {
        Self {
            points: ring_coordinates(&polygon.outer),
            holes: polygon.holes.iter().map(|h| ring_coordinates(h)).collect(),
        }
    }
}

/// Answer to one NoGo request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NoGoResponse {
    /// NoGo areas.
    pub polygons: Vec<NoGoPolygon>,
    /// Blocked regions one cell wide.
    pub lines: Vec<[[f64; 2]; 2]>,
    /// Blocked single cells.
    pub points: Vec<[f64; 2]>,
    /// Outline of the area the answering sources cover.
    pub supported_area: Vec<NoGoPolygon>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<Warning>,
}

impl NoGoResponse {
    pub fn push_area(&mut self, area: &MultiPolygon2D) {
        self.polygons
            .extend(area.polygons.iter().map(NoGoPolygon::from_polygon));
    }

    /// Total number of figures in the response
    pub fn figure_count(&self) -> usize {
        self.polygons.len() + self.lines.len() + self.points.len()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[inline]
pub(crate) fn coordinate(p: &Point2<f64>) -> [f64; 2] {
    [p.x, p.y]
}

fn ring_coordinates(ring: &[Point2<f64>]) -> Vec<[f64; 2]> {
    close_ring(ring).iter().map(coordinate).collect()
}
