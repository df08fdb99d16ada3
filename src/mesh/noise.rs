//! Height noise for lifted facets
//!
//! A flat mesh refracts nothing; tilting the facets is what makes the glass
//! look shattered. How strongly a vertex lift tilts its triangles depends on
//! the triangle shape: raising the apex of a sliver tilts it far more than
//! raising the corner of a fat triangle. The sensitivity-weighted model
//! divides each vertex's random lift by that sensitivity.

use glam::{DVec2, DVec3};
use log::debug;
use rand::Rng;
use rand_distr::StandardNormal;

use super::FacetMesh;
use crate::config::NoiseModel;
use crate::generation::VoronoiDiagram;

/// Height step used for the finite-difference sensitivity estimate
pub const SENSITIVITY_DELTA: f64 = 1e-5;

/// Floor applied to sensitivities before dividing by them
pub const MIN_SENSITIVITY: f64 = 1e-3;

/// Length of the XY part of a triangle's unit normal
#[inline]
fn projected_normal_length(triangle: [DVec3; 3]) -> f64 {
    let [a, b, c] = triangle;
    (b - a).cross(c - a).normalize_or_zero().truncate().length()
}

/// Rate of change of the projected normal length as one corner is raised
///
/// Works on a local copy of the triangle; the caller's mesh is never
/// touched. Degenerate triangles report zero.
///
/// # Arguments
///
/// * `triangle` - Corner positions
/// * `corner` - Which corner (0..3) to raise
/// * `delta` - Height step for the finite difference
pub fn normal_sensitivity(triangle: [DVec3; 3], corner: usize, delta: f64) -> f64 {
    let before = projected_normal_length(triangle);

    let mut probe = triangle;
    probe[corner].z += delta;

    (projected_normal_length(probe) - before) / delta
}

/// Per-vertex maximum sensitivity over incident triangles
///
/// Vertices that belong to no triangle report zero.
pub fn vertex_sensitivities(mesh: &FacetMesh, delta: f64) -> Vec<f64> {
    let mut sensitivities = vec![0.0_f64; mesh.vertex_count()];

    for (t, indices) in mesh.triangles().iter().enumerate() {
        let triangle = mesh.triangle(t);
        for (corner, &v) in indices.iter().enumerate() {
            let s = normal_sensitivity(triangle, corner, delta);
            let slot = &mut sensitivities[v as usize];
            *slot = slot.max(s);
        }
    }

    sensitivities
}

/// A unit normal tilted away from +Z by normally distributed XY jitter
pub fn jittered_normal<R: Rng + ?Sized>(noise_scale: f64, rng: &mut R) -> DVec3 {
    let jitter = DVec2::new(rng.sample(StandardNormal), rng.sample(StandardNormal));
    (DVec3::Z + jitter.extend(0.0) * noise_scale).normalize()
}

/// One jittered normal per site, drawn in site order
pub fn jittered_normals<R: Rng + ?Sized>(
    count: usize,
    noise_scale: f64,
    rng: &mut R,
) -> Vec<DVec3> {
    (0..count).map(|_| jittered_normal(noise_scale, rng)).collect()
}

/// Displace vertex heights according to the noise model
///
/// Random draws happen in vertex order (or cell order for normal jitter),
/// so a seeded generator reproduces the same surface.
pub fn apply_noise<R: Rng + ?Sized>(
    mesh: &mut FacetMesh,
    diagram: &VoronoiDiagram,
    noise_scale: f64,
    model: NoiseModel,
    rng: &mut R,
) {
    match model {
        NoiseModel::Uniform => {
            for v in 0..mesh.vertex_count() {
                let lift = rng.gen_range(-1.0..1.0) * noise_scale;
                mesh.set_height(v, lift);
            }
        }
        NoiseModel::SensitivityWeighted => {
            // Measured on the flat mesh, before anything moves
            let sensitivities = vertex_sensitivities(mesh, SENSITIVITY_DELTA);
            for (v, sensitivity) in sensitivities.into_iter().enumerate() {
                let weight = sensitivity.max(MIN_SENSITIVITY);
                let lift = rng.gen_range(-1.0..1.0) * noise_scale / weight;
                mesh.set_height(v, lift);
            }
        }
        NoiseModel::NormalJitter => {
            let normals = jittered_normals(diagram.cell_count(), noise_scale, rng);
            for t in 0..mesh.triangle_count() {
                let Some(cell) = mesh.triangle_cell(t) else {
                    continue;
                };
                let site = diagram.cells()[cell].site;
                let normal = normals[cell];
                let indices = mesh.triangles()[t];
                for v in indices {
                    let p = mesh.vertices()[v as usize].truncate();
                    mesh.set_height(v as usize, plane_height(normal, site, p));
                }
            }
        }
    }

    if let Some((lo, hi)) = mesh.height_range() {
        debug!("{} noise: heights in [{:.4}, {:.4}]", model.name(), lo, hi);
    }
}

/// Height at `p` of the plane through `(site, 0)` with the given normal
#[inline]
fn plane_height(normal: DVec3, site: DVec2, p: DVec2) -> f64 {
    -(normal.x * (p.x - site.x) + normal.y * (p.y - site.y)) / normal.z
}
