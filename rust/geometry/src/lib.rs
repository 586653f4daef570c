// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! NoGo Geometry
//!
//! Planar polygon set algebra backed by i_overlay, ring validity repair,
//! area matching of lon/lat rectangles and georeferencing of traced figures.

pub mod bool2d;
pub mod error;
pub mod georef;
pub mod planar;
pub mod polygon;
pub mod rect;
pub mod validity;

// Re-export nalgebra types for convenience
pub use nalgebra::Point2;

pub use error::{Error, Result};
pub use georef::{round_coordinate, GeoFigure, GridGeoreference};
pub use planar::PlanarGeometry;
pub use polygon::{close_ring, MultiPolygon2D, Polygon2D};
pub use rect::{area_match, GeoRect};
pub use validity::{is_crossing_free_ring, is_simple_ring, make_valid, repair_ring};
