// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # NoGo Processing
//!
//! Computes NoGo areas for a vessel draught over one or more depth sources.
//!
//! A request is matched against the sources' coverage, every matching source
//! traces its own grid with the draught rule, and overlapping results are
//! reconciled by the merge engine before the response is serialized.
//!
//! ```rust
//! use nogo_core::DepthGrid;
//! use nogo_geometry::{GeoRect, GridGeoreference};
//! use nogo_processing::{NoGoRequest, NoGoService, StaticDepthSource};
//!
//! let georef = GridGeoreference::new(0.5, 0.5, 1.0, 1.0).unwrap();
//! let depths = DepthGrid::from_fn(4, 4, |column, _| Some(if column < 2 { -1.0 } else { -20.0 })).unwrap();
//! let service = NoGoService::default().with_source(StaticDepthSource::new("harbour", georef, depths));
//!
//! let response = service
//!     .compute(&NoGoRequest {
//!         area: GeoRect::new(0.0, 0.0, 4.0, 4.0).unwrap(),
//!         draught: 3.0,
//!     })
//!     .unwrap();
//! assert_eq!(response.polygons.len(), 1);
//! ```

pub mod config;
pub mod error;
pub mod merge;
pub mod predicate;
pub mod response;
pub mod service;
pub mod source;

pub use config::NoGoConfig;
pub use error::{Error, Result};
pub use merge::{exclusive_zone, merge_results, OverlapCombination, SourceResult};
pub use predicate::{DraughtPredicate, TidalAdjustment, TideGrid, TraceOutcome};
pub use response::{
    NoGoPolygon, NoGoResponse, Warning, AREA_PARTIALLY_SUPPORTED, TIDAL_DATA_UNAVAILABLE,
};
pub use service::{NoGoRequest, NoGoService};
pub use source::{match_sources, NoGoSource, SourceMatch, StaticDepthSource};
