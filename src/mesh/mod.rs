//! Facet mesh generation from a repaired Voronoi diagram
//!
//! Each cell is triangulated in the plane, embedded at height zero, and the
//! vertex heights are then perturbed by the configured noise model.

mod noise;

pub use noise::{
    apply_noise, jittered_normal, jittered_normals, normal_sensitivity, vertex_sensitivities,
    MIN_SENSITIVITY, SENSITIVITY_DELTA,
};

use std::collections::HashMap;

use glam::{DVec2, DVec3};
use rand::Rng;

use crate::cell::{coord_key, CoordKey};
use crate::config::NoiseModel;
use crate::generation::VoronoiDiagram;

/// Triangle mesh of glass facets
///
/// Triangles are grouped by the cell they came from. Vertex positions are the
/// only thing noise ever changes; connectivity is fixed at construction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FacetMesh {
    vertices: Vec<DVec3>,
    triangles: Vec<[u32; 3]>,
    triangle_cells: Vec<usize>,
}

/// Which vertices are merged when the flat mesh is assembled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VertexSharing {
    /// Equal 2D coordinates anywhere in the mesh become one vertex
    Shared,
    /// Equal coordinates merge only within a cell; neighbours get their own copies
    PerCell,
}

impl FacetMesh {
    /// Get the number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of triangles
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Check if mesh is empty
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Vertex positions
    pub fn vertices(&self) -> &[DVec3] {
        &self.vertices
    }

    /// Triangle vertex indices, counter-clockwise seen from +Z
    pub fn triangles(&self) -> &[[u32; 3]] {
        &self.triangles
    }

    /// Cell that produced triangle `index`
    pub fn triangle_cell(&self, index: usize) -> Option<usize> {
        self.triangle_cells.get(index).copied()
    }

    /// Corner positions of triangle `index`
    pub fn triangle(&self, index: usize) -> [DVec3; 3] {
        self.triangles[index].map(|v| self.vertices[v as usize])
    }

    /// Triangles touching each vertex
    pub fn incident_triangles(&self) -> Vec<Vec<usize>> {
        let mut incident = vec![Vec::new(); self.vertices.len()];
        for (t, triangle) in self.triangles.iter().enumerate() {
            for &v in triangle {
                incident[v as usize].push(t);
            }
        }
        incident
    }

    /// Lowest and highest vertex height, `None` for an empty mesh
    pub fn height_range(&self) -> Option<(f64, f64)> {
        if self.vertices.is_empty() {
            return None;
        }
        Some(self.vertices.iter().fold(
            (f64::INFINITY, f64::NEG_INFINITY),
            |(lo, hi), v| (lo.min(v.z), hi.max(v.z)),
        ))
    }

    /// Positions narrowed to `f32` for collision structures
    pub fn positions_f32(&self) -> Vec<[f32; 3]> {
        self.vertices
            .iter()
            .map(|v| [v.x as f32, v.y as f32, v.z as f32])
            .collect()
    }

    pub(crate) fn set_height(&mut self, vertex: usize, height: f64) {
        self.vertices[vertex].z = height;
    }
}

/// Triangulate a convex counter-clockwise ring as a fan from its first vertex
///
/// Zero-area triangles (collinear corners left behind by repair) are skipped.
pub fn triangulate_convex(ring: &[DVec2]) -> Vec<[usize; 3]> {
    if ring.len() < 3 {
        return Vec::new();
    }

    (1..ring.len() - 1)
        .filter(|&i| (ring[i] - ring[0]).perp_dot(ring[i + 1] - ring[0]) > 0.0)
        .map(|i| [0, i, i + 1])
        .collect()
}

/// Cell ring with consecutive and wrap-around duplicates removed
fn clean_ring(ring: Vec<DVec2>) -> Vec<DVec2> {
    let mut ring = ring;
    ring.dedup();
    while ring.len() > 1 && ring.first() == ring.last() {
        ring.pop();
    }
    ring
}

/// Embed every cell's triangulation at height zero
pub fn build_flat_mesh(diagram: &VoronoiDiagram, sharing: VertexSharing) -> FacetMesh {
    let mut mesh = FacetMesh::default();
    let mut lookup: HashMap<(CoordKey, usize), u32> = HashMap::new();

    for (cell_index, cell) in diagram.cells().iter().enumerate() {
        let ring = clean_ring(cell.ring());
        let scope = match sharing {
            VertexSharing::Shared => usize::MAX,
            VertexSharing::PerCell => cell_index,
        };

        for corners in triangulate_convex(&ring) {
            let triangle = corners.map(|c| {
                let p = ring[c];
                *lookup.entry((coord_key(p), scope)).or_insert_with(|| {
                    mesh.vertices.push(p.extend(0.0));
                    (mesh.vertices.len() - 1) as u32
                })
            });
            mesh.triangles.push(triangle);
            mesh.triangle_cells.push(cell_index);
        }
    }

    mesh
}

/// Triangulate a repaired diagram and lift it into a noisy 3D facet mesh
///
/// The normal-jitter model tilts whole cells independently, so its cells
/// do not share vertices; the other models keep the skeleton watertight.
///
/// # Example
///
/// ```
/// use shattered_glass::*;
/// use shattered_glass::generation::compute_cells;
/// use glam::DVec2;
/// use rand::SeedableRng;
///
/// let mut diagram = compute_cells(DVec2::ZERO, DVec2::splat(10.0), &[DVec2::splat(5.0)]);
/// diagram.repair(1e-8);
///
/// let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(1);
/// let mesh = lift_to_mesh(&diagram, 0.0, NoiseModel::SensitivityWeighted, &mut rng);
/// assert_eq!(mesh.triangle_count(), 2);
/// assert!(mesh.vertices().iter().all(|v| v.z == 0.0));
/// ```
pub fn lift_to_mesh<R: Rng + ?Sized>(
    diagram: &VoronoiDiagram,
    noise_scale: f64,
    model: NoiseModel,
    rng: &mut R,
) -> FacetMesh {
    let sharing = match model {
        NoiseModel::NormalJitter => VertexSharing::PerCell,
        NoiseModel::Uniform | NoiseModel::SensitivityWeighted => VertexSharing::Shared,
    };

    let mut mesh = build_flat_mesh(diagram, sharing);
    apply_noise(&mut mesh, diagram, noise_scale, model, rng);
    mesh
}
