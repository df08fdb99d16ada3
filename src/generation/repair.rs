//! Diagram repair: snapping near-duplicate vertices into one shared skeleton
//!
//! Cells are built independently, so a corner shared by three cells is
//! computed three times and the copies can differ by rounding error. Left
//! alone these differences become hairline cracks in the lifted mesh.

use std::collections::HashMap;

use glam::DVec2;
use log::debug;

use crate::cell::{coord_key, CoordKey};
use crate::generation::voronoi::VoronoiDiagram;
use crate::spatial::SpatialIndex;

/// Summary of one repair pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RepairStats {
    /// Distinct boundary vertices before the pass
    pub distinct: usize,
    /// Vertices remapped onto a different canonical vertex
    pub merged: usize,
    /// Edges deleted because both endpoints snapped together
    pub collapsed: usize,
}

impl VoronoiDiagram {
    /// Merge nearly identical boundary vertices so neighbouring cells share corners
    ///
    /// Vertices are visited in first-encounter order. Each unclaimed vertex
    /// claims every unclaimed vertex within `epsilon` (itself included) and
    /// becomes their canonical coordinate. A vertex claimed once is never
    /// reassigned, so a chain of close points collapses onto its earliest
    /// member rather than drifting. Edges left with identical endpoints are
    /// removed; the remaining edges keep their order.
    ///
    /// Running the pass again with the same epsilon merges nothing: any two
    /// canonical vertices within epsilon would have been claimed together.
    ///
    /// An epsilon above half the true minimum vertex spacing merges distinct
    /// corners. That is the caller's tuning concern and is not detected.
    pub fn repair(&mut self, epsilon: f64) -> RepairStats {
        let coords = self.vertices();
        let index = SpatialIndex::new(&coords);

        let mut claimed = vec![false; coords.len()];
        let mut mapping: HashMap<CoordKey, DVec2> = HashMap::with_capacity(coords.len());
        let mut merged = 0;

        for (i, &canonical) in coords.iter().enumerate() {
            if claimed[i] {
                continue;
            }
            claimed[i] = true;
            mapping.insert(coord_key(canonical), canonical);

            for neighbor in index.within(canonical, epsilon) {
                if !claimed[neighbor] {
                    claimed[neighbor] = true;
                    mapping.insert(coord_key(coords[neighbor]), canonical);
                    merged += 1;
                }
            }
        }

        let mut collapsed = 0;
        for cell in &mut self.cells {
            for edge in &mut cell.edges {
                for point in edge.iter_mut() {
                    if let Some(&canonical) = mapping.get(&coord_key(*point)) {
                        *point = canonical;
                    }
                }
            }

            let before = cell.edges.len();
            cell.edges.retain(|[a, b]| a != b);
            collapsed += before - cell.edges.len();
        }

        let stats = RepairStats {
            distinct: coords.len(),
            merged,
            collapsed,
        };
        debug!(
            "repair(epsilon={:e}): {} vertices, {} merged, {} edges collapsed",
            epsilon, stats.distinct, stats.merged, stats.collapsed
        );
        stats
    }
}
