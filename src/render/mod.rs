//! Refractive resampling of a source image through a glass surface
//!
//! Every output pixel fires a vertical ray at the surface, bends it with
//! Snell's law at the hit, follows the bent ray for the projection distance
//! and copies the source pixel found there. Pixels whose ray misses the
//! surface stay fully transparent.

mod collider;
mod nearest;
mod refract;

pub use collider::{Collider, RayHit};
pub use nearest::NearestSiteSurface;
pub use refract::{project_offset, reflect_pad, refract, sample_reflected, Refraction};

use glam::{DVec2, DVec3};
use image::{Rgba, RgbaImage};
use log::debug;
use rayon::prelude::*;

use crate::error::{Result, ShatterError};

/// Anything the resampler can ask for a surface normal
///
/// `normal_at` returns the unit normal of the surface directly above
/// `point`, oriented so that `z >= 0`, or `None` if nothing is there.
pub trait SurfaceProbe: Sync {
    fn normal_at(&self, point: DVec2) -> Option<DVec3>;
}

/// Resample `source` through `surface`
///
/// The ray for pixel `(x, y)` is cast through its centre `(x + 0.5, y + 0.5)`,
/// so the facet pattern sits half a pixel off the integer sample grid; the
/// sample itself is taken at `floor((x, y) + offset)`. Rows are rendered in
/// parallel; the first pixel that fails aborts the whole render.
///
/// # Errors
///
/// * `TotalInternalReflection` if a facet is too steep for `refractive_index`
/// * `DegenerateRefraction` if a refracted ray does not travel forward
pub fn render<S: SurfaceProbe + ?Sized>(
    surface: &S,
    source: &RgbaImage,
    refractive_index: f64,
    projection_distance: f64,
) -> Result<RgbaImage> {
    let (width, height) = source.dimensions();
    let mut output = RgbaImage::new(width, height);
    if width == 0 || height == 0 {
        return Ok(output);
    }

    output
        .par_chunks_mut(width as usize * 4)
        .enumerate()
        .try_for_each(|(y, row)| -> Result<()> {
            for (x, pixel) in row.chunks_exact_mut(4).enumerate() {
                let shaded = shade(
                    surface,
                    source,
                    x as u32,
                    y as u32,
                    refractive_index,
                    projection_distance,
                )?;
                if let Some(color) = shaded {
                    pixel.copy_from_slice(&color.0);
                }
            }
            Ok(())
        })?;

    debug!("rendered {}x{} pixels", width, height);
    Ok(output)
}

/// Color for one output pixel, `None` on a miss
fn shade<S: SurfaceProbe + ?Sized>(
    surface: &S,
    source: &RgbaImage,
    x: u32,
    y: u32,
    refractive_index: f64,
    projection_distance: f64,
) -> Result<Option<Rgba<u8>>> {
    let pixel = DVec2::new(f64::from(x), f64::from(y));
    let Some(normal) = surface.normal_at(pixel + DVec2::splat(0.5)) else {
        return Ok(None);
    };

    let refracted = match refract(DVec3::NEG_Z, normal, refractive_index) {
        Refraction::Transmitted(direction) => direction,
        Refraction::TotalInternalReflection { incidence } => {
            return Err(ShatterError::TotalInternalReflection { x, y, incidence });
        }
    };
    let offset = project_offset(refracted, projection_distance)
        .ok_or(ShatterError::DegenerateRefraction { x, y })?;

    let target = (pixel + offset).floor();
    Ok(Some(sample_reflected(source, target.x as i64, target.y as i64)))
}
