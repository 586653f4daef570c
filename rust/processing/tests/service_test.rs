// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! End-to-end NoGo requests over in-memory depth sources.

use approx::assert_relative_eq;
use nogo_core::{DepthGrid, Grid};
use nogo_geometry::{GeoRect, GridGeoreference, MultiPolygon2D, Point2};
use nogo_processing::{
    Error, NoGoConfig, NoGoPolygon, NoGoRequest, NoGoService, StaticDepthSource, TideGrid,
    AREA_PARTIALLY_SUPPORTED, TIDAL_DATA_UNAVAILABLE,
};

const DEEP: f64 = -30.0;
const SHALLOW: f64 = -1.0;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// 10 x 10 cells of one degree, cell (0, 0) centred on (origin_lon, 0.5)
fn georef(origin_lon: f64) -> GridGeoreference {
    GridGeoreference::new(origin_lon, 0.5, 1.0, 1.0).unwrap()
}

fn grid(shallow: impl Fn(usize, usize) -> bool) -> DepthGrid {
    DepthGrid::from_fn(10, 10, |column, row| {
        Some(if shallow(column, row) { SHALLOW } else { DEEP })
    })
    .unwrap()
}

fn request(min_lon: f64, max_lon: f64) -> NoGoRequest {
    NoGoRequest {
        area: GeoRect::new(min_lon, 0.0, max_lon, 10.0).unwrap(),
        draught: 5.0,
    }
}

fn area_of(polygon: &NoGoPolygon) -> f64 {
    let ring: Vec<Point2<f64>> = polygon
        .points
        .iter()
        .map(|&[lon, lat]| Point2::new(lon, lat))
        .collect();
    MultiPolygon2D::from_ring(ring).area()
}

/// West covers [0,10]x[0,10], east covers [5,15]x[0,10]
fn overlapping_service(config: NoGoConfig) -> NoGoService {
    // West: shallow at lon 6.5..8.5, lat 2.5..6.5 (inside the overlap)
    let west = grid(|c, r| (6..=8).contains(&c) && (2..=6).contains(&r));
    // East: shallow at lon 7.5..9.5, lat 4.5..8.5 (inside the overlap)
    let east = grid(|c, r| (2..=4).contains(&c) && (4..=8).contains(&r));
    NoGoService::new(config)
        .with_source(StaticDepthSource::new("west", georef(0.5), west))
        .with_source(StaticDepthSource::new("east", georef(5.5), east))
}

#[test]
fn test_two_sources_agree_only_where_both_are_shallow() {
    init_tracing();
    let service = overlapping_service(NoGoConfig::default());
    let response = service.compute(&request(0.0, 15.0)).unwrap();

    // Each source alone blocks its own patch; merged, only the shared part stays
    assert_eq!(response.polygons.len(), 1);
    assert_relative_eq!(area_of(&response.polygons[0]), 2.0, epsilon = 1e-9);
    for &[lon, lat] in &response.polygons[0].points {
        assert!((7.5..=8.5).contains(&lon), "lon {lon}");
        assert!((4.5..=6.5).contains(&lat), "lat {lat}");
    }

    assert!(response.warning.is_none());
    assert_eq!(response.supported_area.len(), 1);
    assert_relative_eq!(area_of(&response.supported_area[0]), 150.0, epsilon = 1e-9);
}

#[test]
fn test_parallel_and_sequential_tracing_agree() {
    let parallel = overlapping_service(NoGoConfig::default())
        .compute(&request(0.0, 15.0))
        .unwrap();
    let sequential = overlapping_service(NoGoConfig {
        parallel_sources: false,
        ..NoGoConfig::default()
    })
    .compute(&request(0.0, 15.0))
    .unwrap();
    assert_eq!(parallel, sequential);
}

#[test]
fn test_fully_blocked_sources_leave_no_gap_in_overlap() {
    init_tracing();
    let service = NoGoService::default()
        .with_source(StaticDepthSource::new("west", georef(0.5), grid(|_, _| true)))
        .with_source(StaticDepthSource::new("east", georef(5.5), grid(|_, _| true)));

    let response = service.compute(&request(0.0, 15.0)).unwrap();

    let polygons: Vec<MultiPolygon2D> = response
        .polygons
        .iter()
        .map(|p| {
            MultiPolygon2D::from_ring(p.points.iter().map(|&[lon, lat]| Point2::new(lon, lat)).collect())
        })
        .collect();
    let blocked = |lon: f64| {
        polygons
            .iter()
            .any(|g| g.contains_point(&Point2::new(lon, 5.0)))
    };
    // Either source's edge falls inside the other's grid
    for lon in [3.0, 5.25, 7.0, 9.75, 12.0] {
        assert!(blocked(lon), "lon {lon} should be blocked");
    }

    // Blocked from the first to the last cell centre of the combined grids
    let total: f64 = response.polygons.iter().map(area_of).sum();
    assert_relative_eq!(total, 14.0 * 9.0, epsilon = 1e-9);
}

#[test]
fn test_exclusive_patches_survive_merge() {
    init_tracing();
    let west = grid(|c, r| (1..=3).contains(&c) && (2..=6).contains(&r));
    let east = grid(|c, r| (6..=8).contains(&c) && (2..=6).contains(&r));
    let service = NoGoService::default()
        .with_source(StaticDepthSource::new("west", georef(0.5), west))
        .with_source(StaticDepthSource::new("east", georef(5.5), east));

    let response = service.compute(&request(0.0, 15.0)).unwrap();
    assert_eq!(response.polygons.len(), 2);
    // Both patches span 2 x 4 between cell centres
    for polygon in &response.polygons {
        assert_relative_eq!(area_of(polygon), 8.0, epsilon = 1e-9);
    }
}

#[test]
fn test_degenerate_figures_kept_only_in_exclusive_zone() {
    // Single shallow cells: one at lon 2.5 (west only), one at lon 7.5 (shared)
    let west = grid(|c, r| (c, r) == (2, 2) || (c, r) == (7, 8));
    let east = grid(|_, _| false);
    let service = NoGoService::default()
        .with_source(StaticDepthSource::new("west", georef(0.5), west))
        .with_source(StaticDepthSource::new("east", georef(5.5), east));

    let response = service.compute(&request(0.0, 15.0)).unwrap();
    assert_eq!(response.points, vec![[2.5, 2.5]]);
    assert!(response.polygons.is_empty());
    assert!(response.lines.is_empty());
}

#[test]
fn test_unsupported_area() {
    let service = overlapping_service(NoGoConfig::default());
    let outside = NoGoRequest {
        area: GeoRect::new(50.0, 50.0, 60.0, 60.0).unwrap(),
        draught: 5.0,
    };
    assert!(matches!(
        service.compute(&outside),
        Err(Error::UnsupportedArea { .. })
    ));
}

#[test]
fn test_partially_supported_area_warns() {
    let service = NoGoService::default().with_source(StaticDepthSource::new(
        "west",
        georef(0.5),
        grid(|_, _| false),
    ));
    let response = service.compute(&request(5.0, 20.0)).unwrap();
    assert_eq!(response.warning.as_ref().unwrap().id, AREA_PARTIALLY_SUPPORTED);
    assert_eq!(response.figure_count(), 0);
}

#[test]
fn test_missing_tide_falls_back_to_draught_only() {
    init_tracing();
    // Depth 4 m everywhere: too shallow for 5 m draught without tide.
    let depths = DepthGrid::from_fn(10, 10, |_, _| Some(-4.0)).unwrap();
    // Tide of 3 m known for the western half only
    let levels = Grid::from_fn(10, 10, |column, _| if column < 5 { Some(3.0) } else { None }).unwrap();
    let source = StaticDepthSource::new("tidal", georef(0.5), depths)
        .with_tide(TideGrid::new(georef(0.5), levels));

    let response = NoGoService::default()
        .with_source(source)
        .compute(&request(0.0, 10.0))
        .unwrap();

    let warning = response.warning.unwrap();
    assert_eq!(warning.id, TIDAL_DATA_UNAVAILABLE);
    assert!(warning.details.unwrap().contains("50 cells"));

    // Eastern half blocked: lon 5.5..9.5 between cell centres
    assert_eq!(response.polygons.len(), 1);
    assert_relative_eq!(area_of(&response.polygons[0]), 4.0 * 9.0, epsilon = 1e-9);
}

#[test]
fn test_uniform_tide_clears_everything() {
    let depths = DepthGrid::from_fn(10, 10, |_, _| Some(-4.0)).unwrap();
    let tide = TideGrid::uniform(georef(0.5), 10, 10, 1.0).unwrap();
    let source = StaticDepthSource::new("tidal", georef(0.5), depths).with_tide(tide);

    let response = NoGoService::default()
        .with_source(source)
        .compute(&request(0.0, 10.0))
        .unwrap();
    assert_eq!(response.figure_count(), 0);
    assert!(response.warning.is_none());
}
