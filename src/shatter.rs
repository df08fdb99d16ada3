//! ShatteredGlass main structure

use glam::DVec2;
use image::RgbaImage;
use log::{debug, info};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::config::{ShatterConfig, SurfaceKind};
use crate::error::{Result, ShatterError};
use crate::generation::{build_diagram, generate_sites, RepairStats, VoronoiDiagram};
use crate::mesh::{lift_to_mesh, FacetMesh};
use crate::render::{self, Collider, NearestSiteSurface};

/// Offset added to the seed for the surface noise stream
const NOISE_STREAM: u32 = 1000;

/// Offset added to the seed for nearest-site normals
const NORMAL_STREAM: u32 = 2000;

/// What rays are refracted through
enum Surface {
    Facets {
        diagram: VoronoiDiagram,
        repair: RepairStats,
        mesh: FacetMesh,
        collider: Collider,
    },
    NearestSite(NearestSiteSurface),
}

/// A generated pane of shattered glass over a rectangle of the image plane
///
/// Holds everything needed to distort any number of images of matching
/// size: the sites, the repaired Voronoi diagram, the lifted facet mesh and
/// its collider (or the per-site normals in nearest-site mode).
///
/// # Examples
///
/// ```
/// use shattered_glass::*;
/// use image::{Rgba, RgbaImage};
///
/// let source = RgbaImage::from_pixel(32, 24, Rgba([200, 40, 40, 255]));
/// let config = ShatterConfigBuilder::new()
///     .seed(42)
///     .site_count(20)
///     .noise_scale(0.2)
///     .unwrap()
///     .build()
///     .unwrap();
///
/// let glass = ShatteredGlass::for_image(config, &source).unwrap();
/// let output = glass.render(&source).unwrap();
/// assert_eq!(output.dimensions(), (32, 24));
/// ```
pub struct ShatteredGlass {
    config: ShatterConfig,
    min: DVec2,
    max: DVec2,
    sites: Vec<DVec2>,
    surface: Surface,
}

impl ShatteredGlass {
    /// Generate glass covering `[min, max]` from the configuration
    ///
    /// Sites are placed with the configured seed; the noise draws use their
    /// own seeded stream, so changing the noise model never moves the sites.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the rectangle is empty or not finite
    pub fn generate(config: ShatterConfig, min: DVec2, max: DVec2) -> Result<Self> {
        check_bounds(min, max)?;

        info!("Generating {} sites (seed {})", config.site_count, config.seed);
        let sites = generate_sites(config.site_count, min, max, config.seed);

        Self::generate_with_sites(config, min, max, sites)
    }

    /// Generate glass from explicit site positions
    ///
    /// `config.site_count` is ignored in favour of `sites.len()`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the rectangle is empty or not finite
    pub fn generate_with_sites(
        config: ShatterConfig,
        min: DVec2,
        max: DVec2,
        sites: Vec<DVec2>,
    ) -> Result<Self> {
        check_bounds(min, max)?;

        let surface = match config.surface {
            SurfaceKind::Mesh => {
                let (diagram, repair) = build_diagram(&config, min, max, &sites);

                info!("Creating mesh ({} noise)", config.noise_model.name());
                let noise_seed = config.seed.wrapping_add(NOISE_STREAM) as u64;
                let mut rng = ChaCha8Rng::seed_from_u64(noise_seed);
                let mesh =
                    lift_to_mesh(&diagram, config.noise_scale, config.noise_model, &mut rng);
                debug!(
                    "{} vertices, {} triangles",
                    mesh.vertex_count(),
                    mesh.triangle_count()
                );

                info!("Creating collider");
                let collider = Collider::new(&mesh);

                Surface::Facets {
                    diagram,
                    repair,
                    mesh,
                    collider,
                }
            }
            SurfaceKind::NearestSite => {
                info!("Creating nearest-site normals");
                let normal_seed = config.seed.wrapping_add(NORMAL_STREAM) as u64;
                let mut rng = ChaCha8Rng::seed_from_u64(normal_seed);
                let surface = NearestSiteSurface::jittered(&sites, config.noise_scale, &mut rng);
                Surface::NearestSite(surface)
            }
        };

        Ok(Self {
            config,
            min,
            max,
            sites,
            surface,
        })
    }

    /// Generate glass covering the whole of `source`, `[0, width] x [0, height]`
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the image has no pixels
    pub fn for_image(config: ShatterConfig, source: &RgbaImage) -> Result<Self> {
        let (width, height) = source.dimensions();
        Self::generate(config, DVec2::ZERO, DVec2::new(f64::from(width), f64::from(height)))
    }

    /// Distort `source` by refracting it through the glass
    ///
    /// The output matches the source dimensions. Pixels outside the glass
    /// are fully transparent.
    ///
    /// # Errors
    ///
    /// * `TotalInternalReflection` if a facet is too steep for the refractive index
    /// * `DegenerateRefraction` if a refracted ray cannot be projected
    pub fn render(&self, source: &RgbaImage) -> Result<RgbaImage> {
        info!("Casting image {}x{}", source.width(), source.height());
        match &self.surface {
            Surface::Facets { collider, .. } => render::render(
                collider,
                source,
                self.config.refractive_index,
                self.config.projection_distance,
            ),
            Surface::NearestSite(surface) => render::render(
                surface,
                source,
                self.config.refractive_index,
                self.config.projection_distance,
            ),
        }
    }

    /// Get the configuration used to generate this glass
    #[inline]
    pub fn config(&self) -> &ShatterConfig {
        &self.config
    }

    /// Lower and upper corner of the covered rectangle
    #[inline]
    pub fn bounds(&self) -> (DVec2, DVec2) {
        (self.min, self.max)
    }

    /// Voronoi sites, in generation order
    #[inline]
    pub fn sites(&self) -> &[DVec2] {
        &self.sites
    }

    /// Repaired Voronoi diagram, `None` in nearest-site mode
    pub fn diagram(&self) -> Option<&VoronoiDiagram> {
        match &self.surface {
            Surface::Facets { diagram, .. } => Some(diagram),
            Surface::NearestSite(_) => None,
        }
    }

    /// Summary of the repair pass, `None` in nearest-site mode
    pub fn repair_stats(&self) -> Option<RepairStats> {
        match &self.surface {
            Surface::Facets { repair, .. } => Some(*repair),
            Surface::NearestSite(_) => None,
        }
    }

    /// Lifted facet mesh, `None` in nearest-site mode
    pub fn mesh(&self) -> Option<&FacetMesh> {
        match &self.surface {
            Surface::Facets { mesh, .. } => Some(mesh),
            Surface::NearestSite(_) => None,
        }
    }
}

fn check_bounds(min: DVec2, max: DVec2) -> Result<()> {
    if !min.is_finite() || !max.is_finite() || max.x <= min.x || max.y <= min.y {
        return Err(ShatterError::InvalidConfig(format!(
            "bounds must be a finite non-empty rectangle (got {} to {})",
            min, max
        )));
    }
    Ok(())
}
