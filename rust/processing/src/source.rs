// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Depth sources and request matching

use crate::error::{Error, Result};
use crate::predicate::{TidalAdjustment, TideGrid};
use crate::response::Warning;
use nogo_core::{DepthGrid, Grid};
use nogo_geometry::{area_match, GeoRect, GridGeoreference, MultiPolygon2D, PlanarGeometry};

/// A surveyed depth grid that can answer NoGo requests
pub trait NoGoSource: Send + Sync {
    /// Name used in logs and warnings
    fn name(&self) -> &str;

    /// Area the source has data for
    fn coverage(&self) -> GeoRect;

    /// Depth samples covering `area`, with the placement of the returned grid
    fn grid_for(&self, area: &GeoRect) -> Result<(DepthGrid, GridGeoreference)>;

    /// Tidal levels for this source's area, if any are known
    fn tide(&self) -> Option<&dyn TidalAdjustment> {
        None
    }
}

/// In-memory depth grid
#[derive(Debug, Clone)]
pub struct StaticDepthSource {
    name: String,
    georef: GridGeoreference,
    depths: DepthGrid,
    tide: Option<TideGrid>,
}

impl StaticDepthSource {
    pub fn new(name: impl Into<String>, georef: GridGeoreference, depths: DepthGrid) -> Self {
        Self {
            name: name.into(),
            georef,
            depths,
            tide: None,
        }
    }

    pub fn with_tide(mut self, tide: TideGrid) -> Self {
        self.tide = Some(tide);
        self
    }
}

impl NoGoSource for StaticDepthSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn coverage(&self) -> GeoRect {
        self.georef
            .coverage(self.depths.width(), self.depths.height())
    }

    fn grid_for(&self, area: &GeoRect) -> Result<(DepthGrid, GridGeoreference)> {
        let (columns, rows) = self
            .georef
            .cell_range(area, self.depths.width(), self.depths.height())
            .ok_or(Error::UnsupportedArea { area: *area })?;

        let window = Grid::from_fn(columns.len(), rows.len(), |column, row| {
            self.depths
                .get(columns.start + column, rows.start + row)
                .copied()
                .flatten()
        })?;
        Ok((window, self.georef.shifted(columns.start, rows.start)))
    }

    fn tide(&self) -> Option<&dyn TidalAdjustment> {
        self.tide.as_ref().map(|t| t as &dyn TidalAdjustment)
    }
}

/// A source selected for a request, with the part of the request it answers
pub struct SourceMatch<'a> {
    /// Position of the source in the service's source list
    pub index: usize,
    pub source: &'a dyn NoGoSource,
    pub area: GeoRect,
}

impl std::fmt::Debug for SourceMatch<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceMatch")
            .field("index", &self.index)
            .field("source", &self.source.name())
            .field("area", &self.area)
            .finish()
    }
}

/// Pick the sources whose coverage overlaps the request
///
/// Fails with [`Error::UnsupportedArea`] when none does. A request only
/// partly covered succeeds with an `AREA_PARTIALLY_SUPPORTED` warning.
pub fn match_sources<'a>(
    request: &GeoRect,
    sources: &'a [Box<dyn NoGoSource>],
) -> Result<(Vec<SourceMatch<'a>>, Option<Warning>)> {
    let matches: Vec<SourceMatch<'a>> = sources
        .iter()
        .enumerate()
        .filter_map(|(index, source)| {
            area_match(request, &source.coverage()).map(|area| SourceMatch {
                index,
                source: source.as_ref(),
                area,
            })
        })
        .collect();

    if matches.is_empty() {
        return Err(Error::UnsupportedArea { area: *request });
    }

    let matched_areas: Vec<MultiPolygon2D> = matches.iter().map(|m| m.area.to_geometry()).collect();
    let covered = MultiPolygon2D::union_all(matched_areas.iter());
    let uncovered = request.to_geometry().difference(&covered);
    let warning = if uncovered.is_empty() {
        None
    } else {
        Some(Warning::area_partially_supported(uncovered.area()))
    };

    tracing::debug!(
        sources = sources.len(),
        matched = matches.len(),
        partial = warning.is_some(),
        "Matched request area"
    );
    Ok((matches, warning))
}
