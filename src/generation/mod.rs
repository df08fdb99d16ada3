//! Voronoi skeleton generation
//!
//! Scatters sites over the image plane, computes one convex cell per site by
//! half-plane intersection, and repairs the result into a crack-free skeleton.

mod halfplane;
mod repair;
mod sites;
mod voronoi;

pub use halfplane::{clip_polygon, intersect_half_planes, rect_half_planes, rect_ring, HalfPlane};
pub use repair::RepairStats;
pub use sites::{generate_sites, generate_sites_with_rng};
pub use voronoi::{
    compute_cells, compute_cells_with_strategy, Candidate, CandidateSet, VoronoiDiagram,
};

use glam::DVec2;
use log::{debug, info};

use crate::config::ShatterConfig;

/// Compute and repair the Voronoi diagram of `sites` as configured
///
/// Returns the repaired diagram together with the repair summary.
pub fn build_diagram(
    config: &ShatterConfig,
    min: DVec2,
    max: DVec2,
    sites: &[DVec2],
) -> (VoronoiDiagram, RepairStats) {
    info!("Creating Voronoi cells ({} sites, {:?})", sites.len(), config.strategy);
    let mut diagram = compute_cells_with_strategy(min, max, sites, config.strategy);
    debug!(
        "{} cells, {} edges, {} empty",
        diagram.cell_count(),
        diagram.edge_count(),
        diagram.cells().iter().filter(|c| c.is_empty()).count()
    );

    info!("Repairing Voronoi cells");
    let stats = diagram.repair(config.repair_epsilon);

    (diagram, stats)
}
