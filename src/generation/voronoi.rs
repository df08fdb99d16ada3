//! Voronoi cell construction by half-plane intersection
//!
//! Each cell starts as the bounding rectangle and is clipped by the bisector
//! of every competing site that can still reach it. Cells are computed
//! independently (and in parallel); the shared vertices of neighbouring cells
//! may therefore disagree in the last few bits until the diagram is repaired.

use std::collections::HashSet;

use glam::DVec2;
use rayon::prelude::*;

use crate::cell::{coord_key, ring_edges, VoronoiCell};
use crate::config::CellStrategy;
use crate::generation::halfplane::{clip_polygon, intersect_half_planes, rect_ring, HalfPlane};

/// An ordered set of cells tiling a bounding rectangle
///
/// `cells()[i]` belongs to input site `i`.
#[derive(Debug, Clone, PartialEq)]
pub struct VoronoiDiagram {
    min: DVec2,
    max: DVec2,
    pub(crate) cells: Vec<VoronoiCell>,
}

impl VoronoiDiagram {
    /// Assemble a diagram from precomputed cells
    pub fn from_cells(min: DVec2, max: DVec2, cells: Vec<VoronoiCell>) -> Self {
        Self { min, max, cells }
    }

    /// Lower corner of the bounding rectangle
    #[inline]
    pub fn min(&self) -> DVec2 {
        self.min
    }

    /// Upper corner of the bounding rectangle
    #[inline]
    pub fn max(&self) -> DVec2 {
        self.max
    }

    /// All cells, in site order
    #[inline]
    pub fn cells(&self) -> &[VoronoiCell] {
        &self.cells
    }

    /// Number of cells (equal to the number of input sites)
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Get a cell by site index
    #[inline]
    pub fn get_cell(&self, id: usize) -> Option<&VoronoiCell> {
        self.cells.get(id)
    }

    /// Distinct boundary vertices across all cells, in first-encounter order
    pub fn vertices(&self) -> Vec<DVec2> {
        let mut seen = HashSet::new();
        let mut vertices = Vec::new();
        for cell in &self.cells {
            for edge in &cell.edges {
                for &p in edge {
                    if seen.insert(coord_key(p)) {
                        vertices.push(p);
                    }
                }
            }
        }
        vertices
    }

    /// Sum of all cell areas
    pub fn total_area(&self) -> f64 {
        self.cells.iter().map(VoronoiCell::area).sum()
    }

    /// Total number of boundary edges across all cells
    pub fn edge_count(&self) -> usize {
        self.cells.iter().map(VoronoiCell::edge_count).sum()
    }
}

/// Compute one Voronoi cell per site inside `[min, max]` (incremental strategy)
///
/// Sites must lie within the rectangle. The result may show hairline
/// cracks between neighbours; see [`VoronoiDiagram::repair`].
///
/// # Example
///
/// ```
/// use shattered_glass::generation::compute_cells;
/// use glam::DVec2;
///
/// let sites = [DVec2::new(0.0, 0.0), DVec2::new(10.0, 0.0)];
/// let diagram = compute_cells(DVec2::ZERO, DVec2::splat(10.0), &sites);
/// assert_eq!(diagram.cell_count(), 2);
/// assert_eq!(diagram.cells()[0].area(), 50.0);
/// ```
pub fn compute_cells(min: DVec2, max: DVec2, sites: &[DVec2]) -> VoronoiDiagram {
    compute_cells_with_strategy(min, max, sites, CellStrategy::Incremental)
}

/// Compute Voronoi cells with an explicit construction strategy
///
/// Both strategies produce the same cells up to floating-point rounding.
pub fn compute_cells_with_strategy(
    min: DVec2,
    max: DVec2,
    sites: &[DVec2],
    strategy: CellStrategy,
) -> VoronoiDiagram {
    let cells: Vec<VoronoiCell> = (0..sites.len())
        .into_par_iter()
        .map(|id| match strategy {
            CellStrategy::Exhaustive => exhaustive_cell(id, min, max, sites),
            CellStrategy::Incremental => incremental_cell(id, min, max, sites),
        })
        .collect();

    VoronoiDiagram::from_cells(min, max, cells)
}

/// Intersect the rectangle with the bisector against every other site
fn exhaustive_cell(id: usize, min: DVec2, max: DVec2, sites: &[DVec2]) -> VoronoiCell {
    let site = sites[id];
    let mut constraints = Vec::with_capacity(sites.len().saturating_sub(1));

    for (other_id, &other) in sites.iter().enumerate() {
        if other_id == id {
            continue;
        }
        if other == site {
            // Duplicate position: the earliest occurrence keeps the cell
            if other_id < id {
                return VoronoiCell::new(id, site, Vec::new());
            }
            continue;
        }
        constraints.push(HalfPlane::bisector(site, other));
    }

    VoronoiCell::new(id, site, intersect_half_planes(min, max, &constraints))
}

/// A site still able to clip the cell under construction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    /// Index into the input site list
    pub index: usize,
    /// Distance from the owner site
    pub distance: f64,
}

/// Working set for building one cell incrementally
///
/// Holds every competing site not yet consumed or excluded, nearest first.
/// The owner's own site is an implicit sentinel member, so `len()` counts
/// it and construction stops once `len() < 2`.
#[derive(Debug, Clone)]
pub struct CandidateSet {
    owner: usize,
    /// Sorted by (distance, index); `next..end` is the live window
    candidates: Vec<Candidate>,
    next: usize,
    end: usize,
}

impl CandidateSet {
    /// Collect every other site, ordered by distance to the owner
    ///
    /// Equal distances keep input order.
    pub fn new(owner: usize, sites: &[DVec2]) -> Self {
        let site = sites[owner];
        let mut candidates: Vec<Candidate> = sites
            .iter()
            .enumerate()
            .filter(|&(index, _)| index != owner)
            .map(|(index, &other)| Candidate {
                index,
                distance: site.distance(other),
            })
            .collect();

        candidates.sort_by(|a, b| {
            a.distance
                .total_cmp(&b.distance)
                .then(a.index.cmp(&b.index))
        });

        let end = candidates.len();
        Self {
            owner,
            candidates,
            next: 0,
            end,
        }
    }

    /// Index of the site whose cell is being built
    #[inline]
    pub fn owner(&self) -> usize {
        self.owner
    }

    /// Live candidates, owner sentinel included
    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.next + 1
    }

    /// Never true: the owner is always a member
    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Take the nearest remaining candidate
    pub fn pop_nearest(&mut self) -> Option<Candidate> {
        if self.next >= self.end {
            return None;
        }
        let candidate = self.candidates[self.next];
        self.next += 1;
        Some(candidate)
    }

    /// Drop candidates that can no longer cut a cell of the given radius
    ///
    /// If every vertex is within `radius` of the owner, a site farther than
    /// `2 * radius` is farther from each vertex than the owner is, so its
    /// bisector misses the cell. Returns the number dropped.
    pub fn exclude_beyond(&mut self, radius: f64) -> usize {
        let limit = 2.0 * radius;
        let live = &self.candidates[self.next..self.end];
        let keep = live.partition_point(|c| c.distance <= limit);
        let dropped = live.len() - keep;
        self.end = self.next + keep;
        dropped
    }
}

/// Distance from `site` to the farthest vertex of `ring`
fn cell_radius(site: DVec2, ring: &[DVec2]) -> f64 {
    ring.iter()
        .map(|&v| site.distance(v))
        .fold(0.0, f64::max)
}

/// Clip the ring by the nearest live candidate, then prune the working set
///
/// Returns `false` if the cell must be emptied (clipped away, or a duplicate
/// of an earlier site).
fn clip_next(
    site: DVec2,
    sites: &[DVec2],
    candidates: &mut CandidateSet,
    ring: &mut Vec<DVec2>,
) -> bool {
    let Some(candidate) = candidates.pop_nearest() else {
        return true;
    };

    let other = sites[candidate.index];
    if other == site {
        return candidate.index > candidates.owner();
    }

    *ring = clip_polygon(ring, &HalfPlane::bisector(site, other));
    if ring.is_empty() {
        return false;
    }

    candidates.exclude_beyond(cell_radius(site, ring));
    true
}

/// Clip by nearest sites first, stopping once no remaining site can reach the cell
fn incremental_cell(id: usize, min: DVec2, max: DVec2, sites: &[DVec2]) -> VoronoiCell {
    let site = sites[id];
    let mut ring = rect_ring(min, max);
    let mut candidates = CandidateSet::new(id, sites);
    candidates.exclude_beyond(cell_radius(site, &ring));

    while candidates.len() >= 2 {
        if !clip_next(site, sites, &mut candidates, &mut ring) {
            return VoronoiCell::new(id, site, Vec::new());
        }
    }

    VoronoiCell::new(id, site, ring_edges(&ring))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::generate_sites;
    use approx::assert_relative_eq;

    fn bounds() -> (DVec2, DVec2) {
        (DVec2::ZERO, DVec2::new(120.0, 80.0))
    }

    /// Area of the intersection of two convex cells
    fn overlap_area(a: &VoronoiCell, b: &VoronoiCell) -> f64 {
        let mut ring = a.ring();
        for [p, q] in &b.edges {
            if ring.is_empty() {
                return 0.0;
            }
            let normal = -(*q - *p).perp().normalize();
            ring = clip_polygon(&ring, &HalfPlane::new(normal, normal.dot(*p)));
        }
        VoronoiCell::from_ring(0, DVec2::ZERO, &ring).area()
    }

    #[test]
    fn test_two_sites_split_along_bisector() {
        let sites = [DVec2::new(0.0, 0.0), DVec2::new(10.0, 0.0)];
        for strategy in [CellStrategy::Exhaustive, CellStrategy::Incremental] {
            let diagram =
                compute_cells_with_strategy(DVec2::ZERO, DVec2::splat(10.0), &sites, strategy);

            let left = &diagram.cells()[0];
            let right = &diagram.cells()[1];
            assert_eq!(
                left.ring(),
                vec![
                    DVec2::new(0.0, 0.0),
                    DVec2::new(5.0, 0.0),
                    DVec2::new(5.0, 10.0),
                    DVec2::new(0.0, 10.0),
                ]
            );
            assert_eq!(
                right.ring(),
                vec![
                    DVec2::new(5.0, 0.0),
                    DVec2::new(10.0, 0.0),
                    DVec2::new(10.0, 10.0),
                    DVec2::new(5.0, 10.0),
                ]
            );
            assert_eq!(left.area(), 50.0);
            assert_eq!(right.area(), 50.0);
        }
    }

    #[test]
    fn test_single_site_covers_rectangle() {
        let (min, max) = bounds();
        let diagram = compute_cells(min, max, &[DVec2::new(60.0, 40.0)]);

        assert_eq!(diagram.cell_count(), 1);
        assert_eq!(diagram.cells()[0].ring(), rect_ring(min, max));
    }

    #[test]
    fn test_no_sites() {
        let (min, max) = bounds();
        let diagram = compute_cells(min, max, &[]);
        assert_eq!(diagram.cell_count(), 0);
        assert!(diagram.vertices().is_empty());
    }

    #[test]
    fn test_cells_tile_rectangle() {
        let (min, max) = bounds();
        let sites = generate_sites(60, min, max, 42);
        let diagram = compute_cells(min, max, &sites);

        assert_eq!(diagram.cell_count(), sites.len());
        assert_relative_eq!(diagram.total_area(), 120.0 * 80.0, epsilon = 1e-6);

        for cell in diagram.cells() {
            assert!(cell.edge_count() >= 3);
            assert!(cell.area() > 0.0);
            assert!(cell.contains(cell.site, 1e-9), "cell {} misses its site", cell.id);
            for &v in &cell.ring() {
                assert!(v.x >= min.x - 1e-9 && v.x <= max.x + 1e-9);
                assert!(v.y >= min.y - 1e-9 && v.y <= max.y + 1e-9);
            }
        }
    }

    #[test]
    fn test_cells_do_not_overlap() {
        let (min, max) = bounds();
        let sites = generate_sites(25, min, max, 7);
        let diagram = compute_cells(min, max, &sites);

        for (i, a) in diagram.cells().iter().enumerate() {
            for b in &diagram.cells()[i + 1..] {
                assert!(overlap_area(a, b) < 1e-6, "cells {} and {} overlap", a.id, b.id);
            }
        }
    }

    #[test]
    fn test_nearest_site_owns_point() {
        let (min, max) = bounds();
        let sites = generate_sites(30, min, max, 3);
        let diagram = compute_cells(min, max, &sites);

        for probe in generate_sites(200, min, max, 99) {
            let nearest = (0..sites.len())
                .min_by(|&a, &b| probe.distance(sites[a]).total_cmp(&probe.distance(sites[b])))
                .unwrap();
            assert!(diagram.cells()[nearest].contains(probe, 1e-9));
        }
    }

    #[test]
    fn test_strategies_agree() {
        let (min, max) = bounds();
        let sites = generate_sites(40, min, max, 1234);
        let exhaustive = compute_cells_with_strategy(min, max, &sites, CellStrategy::Exhaustive);
        let incremental = compute_cells_with_strategy(min, max, &sites, CellStrategy::Incremental);

        for (a, b) in exhaustive.cells().iter().zip(incremental.cells()) {
            assert_eq!(a.id, b.id);
            assert_relative_eq!(a.area(), b.area(), epsilon = 1e-9);
        }
    }

    #[test]
    fn test_duplicate_site_yields_empty_cell() {
        let sites = [
            DVec2::new(2.0, 2.0),
            DVec2::new(8.0, 8.0),
            DVec2::new(2.0, 2.0),
        ];
        for strategy in [CellStrategy::Exhaustive, CellStrategy::Incremental] {
            let diagram =
                compute_cells_with_strategy(DVec2::ZERO, DVec2::splat(10.0), &sites, strategy);
            assert!(!diagram.cells()[0].is_empty());
            assert!(diagram.cells()[2].is_empty());
            assert_relative_eq!(diagram.total_area(), 100.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_candidate_set_order_and_ties() {
        let sites = [
            DVec2::new(0.0, 0.0),
            DVec2::new(3.0, 0.0),
            DVec2::new(0.0, 1.0),
            DVec2::new(-3.0, 0.0),
        ];
        let mut set = CandidateSet::new(0, &sites);
        assert_eq!(set.len(), 4);

        assert_eq!(set.pop_nearest().map(|c| c.index), Some(2));
        // 1 and 3 tie; input order wins
        assert_eq!(set.pop_nearest().map(|c| c.index), Some(1));
        assert_eq!(set.pop_nearest().map(|c| c.index), Some(3));
        assert_eq!(set.pop_nearest(), None);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_candidate_set_exclusion() {
        let sites = [
            DVec2::new(0.0, 0.0),
            DVec2::new(1.0, 0.0),
            DVec2::new(5.0, 0.0),
            DVec2::new(9.0, 0.0),
        ];
        let mut set = CandidateSet::new(0, &sites);

        assert_eq!(set.exclude_beyond(2.5), 1);
        assert_eq!(set.len(), 3);
        assert_eq!(set.exclude_beyond(0.4), 2);
        assert_eq!(set.len(), 1);
        assert_eq!(set.pop_nearest(), None);
    }
}
