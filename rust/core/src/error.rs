// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for grid tracing operations
pub type Result<T> = std::result::Result<T, Error>;

/// Grid contract violations.
///
/// These indicate a caller bug rather than a runtime condition and are never retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("grid has no rows")]
    EmptyGrid,

    #[error("grid row {row} has no cells")]
    EmptyRow { row: usize },

    #[error("grid is not rectangular: row {row} has {found} cells, expected {expected}")]
    RaggedGrid {
        row: usize,
        expected: usize,
        found: usize,
    },
}
