// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for geometry operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during geometry processing
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Ring has too few vertices: {found}")]
    TooFewVertices { found: usize },

    #[error("Validity repair produced no faces for a ring of {vertices} vertices")]
    DegenerateRing { vertices: usize },

    #[error("Invalid georeference: {0}")]
    InvalidGeoreference(String),

    #[error("Invalid rectangle: {0}")]
    InvalidRect(String),

    #[error("Grid error: {0}")]
    Grid(#[from] nogo_core::Error),
}
