// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! End-to-end NoGo computation over a set of depth sources.

use crate::config::NoGoConfig;
use crate::error::{Error, Result};
use crate::merge::{exclusive_zone, merge_results, SourceResult};
use crate::predicate::DraughtPredicate;
use crate::response::{coordinate, NoGoPolygon, NoGoResponse, Warning};
use crate::source::{match_sources, NoGoSource, SourceMatch};
use nogo_core::Figure;
use nogo_geometry::{GeoFigure, GeoRect, GridGeoreference, MultiPolygon2D, PlanarGeometry, Point2};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Area and vessel draught to compute NoGo areas for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoGoRequest {
    pub area: GeoRect,
    /// Vessel draught in metres.
    pub draught: f64,
}

/// Traced output of one source, before merging.
#[derive(Debug, Clone)]
struct TracedSource {
    /// Sub-rectangle of the request the source answers
    matched: MultiPolygon2D,
    result: SourceResult<MultiPolygon2D>,
    points: Vec<Point2<f64>>,
    lines: Vec<(Point2<f64>, Point2<f64>)>,
}

/// NoGo service holding the available depth sources.
pub struct NoGoService {
    config: NoGoConfig,
    sources: Vec<Box<dyn NoGoSource>>,
}

impl NoGoService {
    pub fn new(config: NoGoConfig) -> Self {
        Self {
            config,
            sources: Vec::new(),
        }
    }

    pub fn with_source(mut self, source: impl NoGoSource + 'static) -> Self {
        self.add_source(Box::new(source));
        self
    }

    pub fn add_source(&mut self, source: Box<dyn NoGoSource>) {
        self.sources.push(source);
    }

    pub fn sources(&self) -> &[Box<dyn NoGoSource>] {
        &self.sources
    }

    pub fn config(&self) -> &NoGoConfig {
        &self.config
    }

    /// Compute the NoGo areas of a request.
    pub fn compute(&self, request: &NoGoRequest) -> Result<NoGoResponse> {
        let start = std::time::Instant::now();

        request
            .area
            .validate()
            .map_err(|e| Error::InvalidRequest(e.to_string()))?;
        let predicate = DraughtPredicate::new(request.draught)?;

        let (matches, area_warning) = match_sources(&request.area, &self.sources)?;

        let traced: Vec<TracedSource> = if self.config.parallel_sources && matches.len() > 1 {
            matches
                .par_iter()
                .map(|m| self.trace_source(m, predicate))
                .collect::<Result<_>>()?
        } else {
            matches
                .iter()
                .map(|m| self.trace_source(m, predicate))
                .collect::<Result<_>>()?
        };

        let response = self.assemble(traced, area_warning)?;

        tracing::info!(
            sources = matches.len(),
            polygons = response.polygons.len(),
            lines = response.lines.len(),
            points = response.points.len(),
            warning = response.warning.as_ref().map(|w| w.id.as_str()),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Computed NoGo areas"
        );
        Ok(response)
    }

    /// Trace one matched source into geographic figures clipped to its area
    fn trace_source(&self, matched: &SourceMatch<'_>, predicate: DraughtPredicate<'_>) -> Result<TracedSource> {
        let source = matched.source;
        let (grid, georef) = source.grid_for(&matched.area)?;
        let predicate = match source.tide() {
            Some(tide) => predicate.with_tide(tide, georef),
            None => predicate,
        };

        let outcome = predicate.trace(&grid);
        let matched_area = matched.area.to_geometry();
        // Traced rings stop at the outer cell centres, so the merge only
        // sees that extent of the source
        let coverage = georef
            .centre_extent(grid.width(), grid.height())
            .intersection(&matched.area)
            .map_or_else(MultiPolygon2D::empty, |extent| extent.to_geometry());

        let mut traced = TracedSource {
            matched: matched_area,
            result: SourceResult::new(coverage.clone(), Vec::new()),
            points: Vec::new(),
            lines: Vec::new(),
        };
        for figure in &outcome.figures {
            match convert_figure(source.name(), &georef, figure, self.config.coordinate_decimals)? {
                GeoFigure::Area(area) => {
                    let clipped = area.intersection(&coverage);
                    if !clipped.is_empty() {
                        traced.result.nogo.push(clipped);
                    }
                }
                GeoFigure::Line(a, b) => traced.lines.push((a, b)),
                GeoFigure::Point(p) => traced.points.push(p),
            }
        }

        if outcome.cells_without_tide > 0 {
            tracing::warn!(
                source = source.name(),
                cells = outcome.cells_without_tide,
                "Tidal data unavailable, using draught only"
            );
            traced.result.warning = Some(Warning::tidal_data_unavailable(
                source.name(),
                outcome.cells_without_tide,
            ));
        }

        tracing::debug!(
            source = source.name(),
            columns = grid.width(),
            rows = grid.height(),
            figures = outcome.figures.len(),
            "Traced source"
        );
        Ok(traced)
    }

    /// Merge traced sources and build the response
    fn assemble(&self, traced: Vec<TracedSource>, area_warning: Option<Warning>) -> Result<NoGoResponse> {
        let matched: Vec<MultiPolygon2D> = traced.iter().map(|t| t.matched.clone()).collect();
        let single = traced.len() == 1;

        let mut response = NoGoResponse::default();
        let mut results = Vec::with_capacity(traced.len());
        for (i, source) in traced.into_iter().enumerate() {
            // Degenerate figures are not merged; they survive only where no
            // other source has data
            let zone = if single {
                None
            } else {
                Some(exclusive_zone(i, &matched))
            };
            let keep = |figure: &GeoFigure| zone.as_ref().map_or(true, |z| figure.lies_within(z));

            for p in source.points {
                if keep(&GeoFigure::Point(p)) {
                    response.points.push(coordinate(&p));
                }
            }
            for (a, b) in source.lines {
                if keep(&GeoFigure::Line(a, b)) {
                    response.lines.push([coordinate(&a), coordinate(&b)]);
                }
            }
            results.push(source.result);
        }

        let merged = merge_results(
            results,
            self.config.max_merge_sources,
            self.config.coverage_simplify_tolerance,
        )?;

        for area in &merged.nogo {
            response.push_area(area);
        }
        response.supported_area = MultiPolygon2D::union_all(matched.iter())
            .simplify(self.config.coverage_simplify_tolerance)
            .polygons
            .iter()
            .map(NoGoPolygon::from_polygon)
            .collect();
        response.warning = area_warning.or(merged.warning);
        Ok(response)
    }
}

/// Georeference one traced figure, tagging failures with where they happened
fn convert_figure(
    source_name: &str,
    georef: &GridGeoreference,
    figure: &Figure,
    decimals: u32,
) -> Result<GeoFigure> {
    georef.figure_to_geometry(figure, decimals).map_err(|error| {
        let points = figure.points();
        let start = georef.to_geo(points.first().copied().unwrap_or_default());
        tracing::warn!(
            source = source_name,
            lon = start.x,
            lat = start.y,
            %error,
            "Traced figure could not be georeferenced"
        );
        Error::Figure {
            source_name: source_name.to_string(),
            lon: start.x,
            lat: start.y,
            vertices: points.len(),
            error,
        }
    })
}

impl Default for NoGoService {
    fn default() -> Self {
        Self::new(NoGoConfig::default())
    }
}
