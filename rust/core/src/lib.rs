// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # NoGo Core
//!
//! Exact region tracing over rectangular sample grids.
//!
//! Given a grid and a per-cell "blocked" predicate, [`trace_rows`] returns one
//! [`Figure`] per connected blocked region: a point, a line, or a closed
//! polygon whose edges follow cell adjacency. Coordinates are integer grid
//! indices; conversion to longitude/latitude is left to the caller.
//!
//! ## Quick Start
//!
//! ```rust
//! use nogo_core::{trace_rows, Figure, GridPoint};
//!
//! let rows: &[&[u8]] = &[&[1, 1], &[1, 1]];
//! let figures = trace_rows(rows, |_, cell: &u8| *cell == 1).unwrap();
//!
//! assert_eq!(
//!     figures[0],
//!     Figure::Polygon(vec![
//!         GridPoint::new(0, 0),
//!         GridPoint::new(0, 1),
//!         GridPoint::new(1, 1),
//!         GridPoint::new(1, 0),
//!         GridPoint::new(0, 0),
//!     ])
//! );
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: serialization of grid points and figures

pub mod error;
pub mod figure;
pub mod grid;
pub mod segment;
pub mod tracer;

pub use error::{Error, Result};
pub use figure::{optimize, remove_duplicate_points, Figure};
pub use grid::{validate_rows, DepthGrid, Grid, GridCell, GridPoint};
pub use segment::{segment_row, LineSegment, RowSegments};
pub use tracer::{trace_grid, trace_rows, GrowingRegion, RegionState, RegionTracer};
