//! Half-plane constraints and convex polygon clipping
//!
//! A Voronoi cell is the bounding rectangle intersected with one bisector
//! half-plane per competing site. Intersection is done by clipping a convex
//! ring one constraint at a time (Sutherland-Hodgman against a single line),
//! which keeps the ring convex and counter-clockwise throughout.

use glam::DVec2;

use crate::cell::{ring_edges, Edge};

/// The region `{p : normal·p <= offset}`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HalfPlane {
    /// Unit outward normal
    pub normal: DVec2,
    /// Signed offset of the boundary line along `normal`
    pub offset: f64,
}

impl HalfPlane {
    /// Create a half-plane from an outward normal and offset
    pub fn new(normal: DVec2, offset: f64) -> Self {
        Self { normal, offset }
    }

    /// Perpendicular bisector of `site` and `other`, keeping the side nearer to `site`
    ///
    /// `site` and `other` must differ.
    pub fn bisector(site: DVec2, other: DVec2) -> Self {
        let normal = (other - site).normalize();
        let midpoint = (site + other) * 0.5;
        Self::new(normal, normal.dot(midpoint))
    }

    /// Positive outside, negative inside, zero on the boundary line
    #[inline]
    pub fn signed_distance(&self, point: DVec2) -> f64 {
        self.normal.dot(point) - self.offset
    }

    /// Check if a point satisfies the constraint (boundary included)
    #[inline]
    pub fn contains(&self, point: DVec2) -> bool {
        self.signed_distance(point) <= 0.0
    }
}

/// Counter-clockwise ring of the rectangle `[min, max]`
pub fn rect_ring(min: DVec2, max: DVec2) -> Vec<DVec2> {
    vec![
        DVec2::new(min.x, min.y),
        DVec2::new(max.x, min.y),
        DVec2::new(max.x, max.y),
        DVec2::new(min.x, max.y),
    ]
}

/// The four constraints equivalent to the rectangle `[min, max]`
pub fn rect_half_planes(min: DVec2, max: DVec2) -> [HalfPlane; 4] {
    [
        HalfPlane::new(DVec2::NEG_X, -min.x),
        HalfPlane::new(DVec2::X, max.x),
        HalfPlane::new(DVec2::NEG_Y, -min.y),
        HalfPlane::new(DVec2::Y, max.y),
    ]
}

/// Clip a convex ring by one half-plane
///
/// Returns an empty ring when fewer than 3 vertices survive.
pub fn clip_polygon(ring: &[DVec2], plane: &HalfPlane) -> Vec<DVec2> {
    let mut clipped = Vec::with_capacity(ring.len() + 1);

    for (i, &a) in ring.iter().enumerate() {
        let b = ring[(i + 1) % ring.len()];
        let da = plane.signed_distance(a);
        let db = plane.signed_distance(b);

        if da <= 0.0 {
            push_distinct(&mut clipped, a);
        }
        if (da < 0.0 && db > 0.0) || (da > 0.0 && db < 0.0) {
            let t = da / (da - db);
            push_distinct(&mut clipped, a + (b - a) * t);
        }
    }

    // Closing vertex may repeat the first one
    if clipped.len() > 1 && clipped.first() == clipped.last() {
        clipped.pop();
    }

    if clipped.len() < 3 {
        clipped.clear();
    }
    clipped
}

fn push_distinct(ring: &mut Vec<DVec2>, point: DVec2) {
    if ring.last() != Some(&point) {
        ring.push(point);
    }
}

/// Boundary of `[min, max]` intersected with every constraint
///
/// Returns no edges when the intersection is infeasible.
pub fn intersect_half_planes(min: DVec2, max: DVec2, constraints: &[HalfPlane]) -> Vec<Edge> {
    let mut ring = rect_ring(min, max);
    for plane in constraints {
        ring = clip_polygon(&ring, plane);
        if ring.is_empty() {
            return Vec::new();
        }
    }
    ring_edges(&ring)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_bisector_orientation() {
        let site = DVec2::new(0.0, 0.0);
        let other = DVec2::new(4.0, 0.0);
        let plane = HalfPlane::bisector(site, other);

        assert_eq!(plane.normal, DVec2::X);
        assert_eq!(plane.offset, 2.0);
        assert!(plane.contains(site));
        assert!(!plane.contains(other));
        assert!(plane.contains(DVec2::new(2.0, 17.0)));
    }

    #[test]
    fn test_clip_square_in_half() {
        let ring = rect_ring(DVec2::ZERO, DVec2::splat(10.0));
        let plane = HalfPlane::bisector(DVec2::ZERO, DVec2::new(10.0, 0.0));
        let clipped = clip_polygon(&ring, &plane);

        assert_eq!(
            clipped,
            vec![
                DVec2::new(0.0, 0.0),
                DVec2::new(5.0, 0.0),
                DVec2::new(5.0, 10.0),
                DVec2::new(0.0, 10.0),
            ]
        );
    }

    #[test]
    fn test_clip_through_vertex_has_no_duplicates() {
        let ring = rect_ring(DVec2::ZERO, DVec2::splat(2.0));
        // Diagonal through (0,0) and (2,2), keeping the lower-right half
        let plane = HalfPlane::new(DVec2::new(-1.0, 1.0).normalize(), 0.0);
        let clipped = clip_polygon(&ring, &plane);

        assert_eq!(
            clipped,
            vec![DVec2::new(0.0, 0.0), DVec2::new(2.0, 0.0), DVec2::new(2.0, 2.0)]
        );
    }

    #[test]
    fn test_clip_away_entirely() {
        let ring = rect_ring(DVec2::ZERO, DVec2::ONE);
        let plane = HalfPlane::new(DVec2::X, -1.0);
        assert!(clip_polygon(&ring, &plane).is_empty());
    }

    #[test]
    fn test_clip_keeps_everything() {
        let ring = rect_ring(DVec2::ZERO, DVec2::ONE);
        let plane = HalfPlane::new(DVec2::X, 5.0);
        assert_eq!(clip_polygon(&ring, &plane), ring);
    }

    #[test]
    fn test_intersect_half_planes() {
        let min = DVec2::ZERO;
        let max = DVec2::new(8.0, 4.0);
        let constraints = [
            HalfPlane::new(DVec2::X, 6.0),
            HalfPlane::new(DVec2::NEG_X, -2.0),
        ];
        let edges = intersect_half_planes(min, max, &constraints);

        assert_eq!(edges.len(), 4);
        let area: f64 = edges.iter().map(|[a, b]| a.perp_dot(*b)).sum::<f64>() * 0.5;
        assert_relative_eq!(area, 16.0);
    }

    #[test]
    fn test_intersect_infeasible() {
        let constraints = [
            HalfPlane::new(DVec2::X, 1.0),
            HalfPlane::new(DVec2::NEG_X, -2.0),
        ];
        assert!(intersect_half_planes(DVec2::ZERO, DVec2::splat(4.0), &constraints).is_empty());
    }

    #[test]
    fn test_rect_half_planes_match_ring() {
        let min = DVec2::new(-1.0, 2.0);
        let max = DVec2::new(3.0, 5.0);
        let planes = rect_half_planes(min, max);
        for corner in rect_ring(min, max) {
            for plane in &planes {
                assert!(plane.contains(corner));
            }
        }
        assert!(!planes[1].contains(DVec2::new(3.5, 3.0)));
    }
}
