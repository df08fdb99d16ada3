//! Nearest-site surface: one constant normal per Voronoi cell, no mesh

use glam::{DVec2, DVec3};
use rand::Rng;

use super::SurfaceProbe;
use crate::error::{Result, ShatterError};
use crate::mesh::jittered_normals;
use crate::spatial::SpatialIndex;

/// Surface whose normal at any point is the normal of the closest site
///
/// Equivalent to refracting through perfectly planar cells, but answered with
/// a KD-tree lookup instead of a ray cast. Only the cell ownership matters,
/// so the diagram itself is never built.
pub struct NearestSiteSurface {
    index: SpatialIndex,
    normals: Vec<DVec3>,
}

impl NearestSiteSurface {
    /// Pair each site with a normal
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the two slices differ in length
    pub fn new(sites: &[DVec2], normals: Vec<DVec3>) -> Result<Self> {
        if sites.len() != normals.len() {
            return Err(ShatterError::InvalidConfig(format!(
                "{} sites but {} normals",
                sites.len(),
                normals.len()
            )));
        }

        Ok(Self {
            index: SpatialIndex::new(sites),
            normals,
        })
    }

    /// Give every site a normal jittered away from +Z by `noise_scale`
    pub fn jittered<R: Rng + ?Sized>(sites: &[DVec2], noise_scale: f64, rng: &mut R) -> Self {
        Self {
            index: SpatialIndex::new(sites),
            normals: jittered_normals(sites.len(), noise_scale, rng),
        }
    }

    /// Number of sites
    pub fn len(&self) -> usize {
        self.normals.len()
    }

    /// Check if there are no sites
    pub fn is_empty(&self) -> bool {
        self.normals.is_empty()
    }

    /// Per-site normals, in site order
    pub fn normals(&self) -> &[DVec3] {
        &self.normals
    }
}

impl SurfaceProbe for NearestSiteSurface {
    fn normal_at(&self, point: DVec2) -> Option<DVec3> {
        self.index.find_nearest(point).map(|i| self.normals[i])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_nearest_site_normal() {
        let sites = [DVec2::new(0.0, 0.0), DVec2::new(10.0, 0.0)];
        let left = DVec3::new(0.1, 0.0, 1.0).normalize();
        let right = DVec3::new(0.0, -0.1, 1.0).normalize();
        let surface = NearestSiteSurface::new(&sites, vec![left, right]).unwrap();

        assert_eq!(surface.normal_at(DVec2::new(2.0, 3.0)), Some(left));
        assert_eq!(surface.normal_at(DVec2::new(7.0, 9.0)), Some(right));
    }

    #[test]
    fn test_length_mismatch() {
        let sites = [DVec2::ZERO, DVec2::ONE];
        assert!(NearestSiteSurface::new(&sites, vec![DVec3::Z]).is_err());
    }

    #[test]
    fn test_empty_surface_misses() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let surface = NearestSiteSurface::jittered(&[], 0.5, &mut rng);
        assert!(surface.is_empty());
        assert_eq!(surface.normal_at(DVec2::new(3.0, 3.0)), None);
    }

    #[test]
    fn test_jittered_normals_point_up() {
        let sites: Vec<DVec2> = (0..20).map(|i| DVec2::new(i as f64, 0.0)).collect();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let surface = NearestSiteSurface::jittered(&sites, 0.3, &mut rng);

        assert_eq!(surface.len(), 20);
        assert!(surface.normals().iter().all(|n| n.z > 0.0));
    }
}
