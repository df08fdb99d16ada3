//! Voronoi Cell Structure
//!
//! Represents one convex glass shard in the image plane: its site and its boundary edges.

use glam::DVec2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A boundary segment between two cell vertices
pub type Edge = [DVec2; 2];

/// Edges of a closed polygon ring, the last vertex connecting back to the first
pub fn ring_edges(ring: &[DVec2]) -> Vec<Edge> {
    ring.iter()
        .enumerate()
        .map(|(i, &a)| [a, ring[(i + 1) % ring.len()]])
        .collect()
}

/// Hashable identity of a coordinate; `-0.0` and `0.0` share a key
pub(crate) type CoordKey = (u64, u64);

#[inline]
pub(crate) fn coord_key(point: DVec2) -> CoordKey {
    ((point.x + 0.0).to_bits(), (point.y + 0.0).to_bits())
}

/// A single Voronoi cell in the image plane
///
/// # Design Notes
///
/// Edges are stored in ring order: counter-clockwise, with each edge's end
/// point equal to the next edge's start point. Repair preserves the order of
/// the edges it keeps, so the ring can always be read back from the edge
/// start points.
///
/// A cell with no edges is legal. It arises from duplicate sites and must
/// be tolerated by every downstream stage.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct VoronoiCell {
    /// Index of the owning site in the input site list
    pub id: usize,

    /// The site this cell is nearest to
    pub site: DVec2,

    /// Boundary edges, counter-clockwise
    pub edges: Vec<Edge>,
}

impl VoronoiCell {
    /// Create a new cell from explicit edges
    pub fn new(id: usize, site: DVec2, edges: Vec<Edge>) -> Self {
        Self { id, site, edges }
    }

    /// Create a cell from a closed polygon ring (last vertex connects back to the first)
    ///
    /// Rings with fewer than 3 vertices produce an empty cell.
    pub fn from_ring(id: usize, site: DVec2, ring: &[DVec2]) -> Self {
        if ring.len() < 3 {
            return Self::new(id, site, Vec::new());
        }

        Self::new(id, site, ring_edges(ring))
    }

    /// Get the number of boundary edges
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Check if the cell was clipped away entirely
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// The polygon ring, read from the start point of every edge
    pub fn ring(&self) -> Vec<DVec2> {
        self.edges.iter().map(|e| e[0]).collect()
    }

    /// Signed-area formula summed over the edges
    ///
    /// Positive for counter-clockwise cells. Only requires the edges to form a
    /// closed boundary, not to be in ring order.
    pub fn area(&self) -> f64 {
        self.edges.iter().map(|[a, b]| a.perp_dot(*b)).sum::<f64>() * 0.5
    }

    /// Check whether a point lies inside (or on the boundary of) this convex cell
    pub fn contains(&self, point: DVec2, tolerance: f64) -> bool {
        if self.is_empty() {
            return false;
        }
        self.edges
            .iter()
            .all(|[a, b]| (*b - *a).perp_dot(point - *a) >= -tolerance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_square() -> VoronoiCell {
        VoronoiCell::from_ring(
            0,
            DVec2::new(0.5, 0.5),
            &[
                DVec2::new(0.0, 0.0),
                DVec2::new(1.0, 0.0),
                DVec2::new(1.0, 1.0),
                DVec2::new(0.0, 1.0),
            ],
        )
    }

    #[test]
    fn test_cell_from_ring() {
        let cell = unit_square();

        assert_eq!(cell.edge_count(), 4);
        assert_eq!(cell.edges[3], [DVec2::new(0.0, 1.0), DVec2::new(0.0, 0.0)]);
        assert_eq!(cell.ring().len(), 4);
        assert!(!cell.is_empty());
    }

    #[test]
    fn test_degenerate_ring() {
        let cell = VoronoiCell::from_ring(3, DVec2::ZERO, &[DVec2::ZERO, DVec2::X]);
        assert!(cell.is_empty());
        assert_eq!(cell.area(), 0.0);
        assert!(!cell.contains(DVec2::ZERO, 1e-9));
    }

    #[test]
    fn test_area() {
        assert_relative_eq!(unit_square().area(), 1.0);

        let triangle = VoronoiCell::from_ring(
            1,
            DVec2::new(1.0, 0.5),
            &[DVec2::new(0.0, 0.0), DVec2::new(4.0, 0.0), DVec2::new(0.0, 3.0)],
        );
        assert_relative_eq!(triangle.area(), 6.0);
    }

    #[test]
    fn test_contains() {
        let cell = unit_square();
        assert!(cell.contains(DVec2::new(0.5, 0.5), 0.0));
        assert!(cell.contains(DVec2::new(1.0, 0.5), 1e-12));
        assert!(!cell.contains(DVec2::new(1.5, 0.5), 1e-12));
    }
}
