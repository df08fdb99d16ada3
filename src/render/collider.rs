//! Ray casting against the lifted facet mesh

use glam::{DVec2, DVec3};
use parry3d::math::{Point, Real, Vector};
use parry3d::query::{Ray, RayCast};
use parry3d::shape::TriMesh;

use super::SurfaceProbe;
use crate::mesh::FacetMesh;

/// A ray hit on the facet surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Hit position
    pub point: DVec3,
    /// Unit normal of the facet that was hit
    pub normal: DVec3,
    /// Ray parameter at the hit
    pub time_of_impact: f64,
}

/// Collision structure over a facet mesh
///
/// An empty mesh produces a collider that every ray misses.
pub struct Collider {
    trimesh: Option<TriMesh>,
    top: f64,
}

impl Collider {
    /// Build the acceleration structure for `mesh`
    pub fn new(mesh: &FacetMesh) -> Self {
        if mesh.is_empty() {
            return Self { trimesh: None, top: 0.0 };
        }

        let vertices: Vec<Point<Real>> = mesh
            .positions_f32()
            .into_iter()
            .map(|[x, y, z]| Point::new(x, y, z))
            .collect();
        let top = mesh.height_range().map_or(0.0, |(_, hi)| hi);

        Self {
            trimesh: Some(TriMesh::new(vertices, mesh.triangles().to_vec())),
            top,
        }
    }

    /// Number of triangles in the collider
    pub fn triangle_count(&self) -> usize {
        self.trimesh.as_ref().map_or(0, |t| t.num_triangles())
    }

    /// Highest point of the surface
    pub fn top(&self) -> f64 {
        self.top
    }

    /// First intersection of the ray with the surface
    pub fn first_hit(&self, origin: DVec3, direction: DVec3) -> Option<RayHit> {
        let trimesh = self.trimesh.as_ref()?;
        let ray = Ray::new(
            Point::new(origin.x as Real, origin.y as Real, origin.z as Real),
            Vector::new(direction.x as Real, direction.y as Real, direction.z as Real),
        );

        let hit = trimesh.cast_local_ray_and_get_normal(&ray, Real::MAX, true)?;
        let time_of_impact = f64::from(hit.time_of_impact);
        let normal = DVec3::new(
            f64::from(hit.normal.x),
            f64::from(hit.normal.y),
            f64::from(hit.normal.z),
        );

        Some(RayHit {
            point: origin + direction * time_of_impact,
            normal: normal.normalize_or_zero(),
            time_of_impact,
        })
    }
}

impl SurfaceProbe for Collider {
    /// Cast straight down from above the highest facet
    fn normal_at(&self, point: DVec2) -> Option<DVec3> {
        let hit = self.first_hit(point.extend(self.top + 1.0), DVec3::NEG_Z)?;
        Some(if hit.normal.z < 0.0 { -hit.normal } else { hit.normal })
    }
}
