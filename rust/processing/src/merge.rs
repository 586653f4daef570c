// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Overlap merge of per-source NoGo results
//!
//! Every source traces its grid assuming that anything outside its own
//! coverage is blocked. Where coverages overlap, those assumptions conflict,
//! so the merge runs in two passes:
//!
//! 1. Each NoGo geometry is clipped to its source's exclusive zone. The parts
//!    cut away are kept per source as "unprocessed" remnants.
//! 2. Each overlap combination (a set of two or more sources and the zone
//!    that exactly those sources cover) is resolved from the remnants: a
//!    point in the zone is navigable when any included source's own data
//!    says so.
//!
//! Combinations are enumerated as bitmasks over the source list, which keeps
//! the power set allocation-free.

use crate::error::{Error, Result};
use crate::response::Warning;
use nogo_geometry::PlanarGeometry;

/// Hard limit imposed by the bitmask width
pub const MAX_MASK_SOURCES: usize = 31;

/// NoGo result of one source
#[derive(Debug, Clone)]
pub struct SourceResult<G> {
    /// Area the source has survey data for
    pub coverage: G,
    /// Blocked areas
    pub nogo: Vec<G>,
    pub warning: Option<Warning>,
}

impl<G: PlanarGeometry> SourceResult<G> {
    pub fn new(coverage: G, nogo: Vec<G>) -> Self {
        Self {
            coverage,
            nogo,
            warning: None,
        }
    }

    pub fn with_warning(mut self, warning: Option<Warning>) -> Self {
        self.warning = warning;
        self
    }
}

/// A subset of sources, as a bitmask over their indices
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlapCombination {
    mask: u32,
    count: usize,
}

impl OverlapCombination {
    pub fn new(mask: u32, count: usize) -> Self {
        Self { mask, count }
    }

    /// Every combination of two or more out of `count` sources
    pub fn enumerate(count: usize) -> impl Iterator<Item = OverlapCombination> {
        let count = count.min(MAX_MASK_SOURCES);
        (1u32..(1u32 << count))
            .filter(|mask| mask.count_ones() >= 2)
            .map(move |mask| OverlapCombination { mask, count })
    }

    #[inline]
    pub fn mask(&self) -> u32 {
        self.mask
    }

    #[inline]
    pub fn includes(&self, index: usize) -> bool {
        index < self.count && self.mask & (1 << index) != 0
    }

    /// Indices of the sources in the combination
    pub fn included(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.count).filter(|&i| self.includes(i))
    }

    /// Indices of the sources outside the combination
    pub fn excluded(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.count).filter(|&i| !self.includes(i))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.mask.count_ones() as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.mask == 0
    }

    /// Area covered by every included source and by no excluded one
    pub fn exclusive_zone<G: PlanarGeometry>(&self, coverages: &[G]) -> G {
        let shared = G::intersection_all(self.included().map(|i| &coverages[i]));
        if shared.is_empty() {
            return shared;
        }
        let foreign = G::union_all(self.excluded().map(|i| &coverages[i]));
        shared.difference(&foreign)
    }
}

/// Coverage of source `index` that no other source shares
pub fn exclusive_zone<G: PlanarGeometry>(index: usize, coverages: &[G]) -> G {
    let others = G::union_all(
        coverages
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != index)
            .map(|(_, c)| c),
    );
    coverages[index].difference(&others)
}

/// Merge the results of overlapping sources into one.
///
/// A single result is returned unchanged. Fails on an empty input, on more
/// than `max_sources` results, on any invalid NoGo geometry and when an
/// overlap combination resolves to an invalid blocked area.
pub fn merge_results<G: PlanarGeometry>(
    results: Vec<SourceResult<G>>,
    max_sources: usize,
    simplify_tolerance: f64,
) -> Result<SourceResult<G>> {
    let count = results.len();
    let max = max_sources.min(MAX_MASK_SOURCES);
    if count > max {
        return Err(Error::TooManySources { count, max });
    }
    let mut results = results;
    match count {
        0 => return Err(Error::EmptyMerge),
        1 => return results.pop().ok_or(Error::EmptyMerge),
        _ => {}
    }

    for (source_index, result) in results.iter().enumerate() {
        if let Some(geometry_index) = result.nogo.iter().position(|g| !g.is_valid()) {
            return Err(Error::InvalidNoGo {
                source_index,
                geometry_index,
            });
        }
    }

    let coverages: Vec<G> = results.iter().map(|r| r.coverage.clone()).collect();
    let mut nogo = Vec::new();
    let mut unprocessed: Vec<Vec<G>> = vec![Vec::new(); count];

    // Exclusive-zone clipping
    for (i, result) in results.iter().enumerate() {
        let overlapping: Vec<usize> = (0..count)
            .filter(|&j| j != i && coverages[i].intersects(&coverages[j]))
            .collect();

        for geometry in &result.nogo {
            let mut remaining = geometry.clone();
            for &j in &overlapping {
                if !remaining.intersects(&coverages[j]) {
                    continue;
                }
                let removed = remaining.intersection(&coverages[j]);
                remaining = remaining.difference(&coverages[j]);
                if !removed.is_empty() {
                    unprocessed[i].push(removed);
                }
            }
            if !remaining.is_empty() {
                nogo.push(remaining);
            }
        }
    }

    let clipped = nogo.len();

    // Overlap resolution
    let mut resolved = 0usize;
    for combination in OverlapCombination::enumerate(count) {
        let zone = combination.exclusive_zone(&coverages);
        if zone.is_empty() {
            continue;
        }

        let mut navigable = G::empty();
        for i in combination.included() {
            let layer = G::union_all(unprocessed[i].iter().filter(|g| g.intersects(&zone)));
            navigable = navigable.union(&zone.difference(&layer));
        }

        let blocked = zone.difference(&navigable);
        tracing::debug!(
            sources = combination.len(),
            zone_area = zone.area(),
            blocked_area = blocked.area(),
            "Resolved overlap combination"
        );
        if !blocked.is_empty() {
            if !blocked.is_valid() {
                return Err(Error::InvalidCombination {
                    mask: combination.mask(),
                    sources: combination.included().collect(),
                });
            }
            nogo.push(blocked);
            resolved += 1;
        }
    }

    let coverage = G::union_all(coverages.iter()).simplify(simplify_tolerance);
    let warning = results.iter_mut().find_map(|r| r.warning.take());

    tracing::debug!(
        sources = count,
        clipped,
        resolved,
        "Merged overlapping sources"
    );

    Ok(SourceResult {
        coverage,
        nogo,
        warning,
    })
}
