// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for NoGo processing
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while answering a NoGo request
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Grid error: {0}")]
    Core(#[from] nogo_core::Error),

    #[error("Geometry error: {0}")]
    Geometry(#[from] nogo_geometry::Error),

    #[error("NoGo geometry {geometry_index} of source {source_index} is not valid")]
    InvalidNoGo {
        source_index: usize,
        geometry_index: usize,
    },

    #[error("Source '{source_name}': figure of {vertices} vertices starting at ({lon}, {lat}) failed: {error}")]
    Figure {
        source_name: String,
        lon: f64,
        lat: f64,
        vertices: usize,
        #[source]
        error: nogo_geometry::Error,
    },

    #[error("Overlap of sources {sources:?} (mask {mask:#b}) resolved to invalid geometry")]
    InvalidCombination { mask: u32, sources: Vec<usize> },

    #[error("Too many overlapping sources to merge: {count} (maximum {max})")]
    TooManySources { count: usize, max: usize },

    #[error("Nothing to merge")]
    EmptyMerge,

    #[error("No source covers the requested area {area:?}")]
    UnsupportedArea { area: nogo_geometry::GeoRect },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}
