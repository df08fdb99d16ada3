//! Shattered Glass Configuration and Builder
//!
//! This module provides configuration types for deterministic shattered-glass generation.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Result, ShatterError};

/// How vertex heights are perturbed when the flat Voronoi skeleton is lifted into 3D
///
/// No single model is canonical; the three variants trade simplicity against
/// control over how strongly each facet tilts.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NoiseModel {
    /// Uniform random height per vertex, no sensitivity weighting
    Uniform,
    /// Uniform random height per vertex, divided by the vertex's normal sensitivity
    ///
    /// Vertices on slivers (where a small lift produces a large tilt) move less,
    /// which keeps thin facets from exploding visually.
    #[default]
    SensitivityWeighted,
    /// Normally distributed jitter of each cell's normal, giving one planar tilt per cell
    NormalJitter,
}

impl NoiseModel {
    /// Get a human-readable name for this noise model
    pub fn name(self) -> &'static str {
        match self {
            NoiseModel::Uniform => "uniform",
            NoiseModel::SensitivityWeighted => "sensitivity-weighted",
            NoiseModel::NormalJitter => "normal-jitter",
        }
    }
}

/// Which algorithm the Voronoi constructor uses
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellStrategy {
    /// Clip every cell against the bisector of every other site
    Exhaustive,
    /// Clip by nearest candidates first and stop once no remaining site can reach the cell
    #[default]
    Incremental,
}

/// What the resampler casts rays against
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SurfaceKind {
    /// Ray-cast against the lifted facet mesh
    #[default]
    Mesh,
    /// Skip the mesh: each pixel takes the jittered normal of its nearest site
    NearestSite,
}

/// Configuration for deterministic shattered-glass generation
///
/// The same configuration applied to the same image always produces the
/// identical output.
///
/// # Example
///
/// ```rust
/// use shattered_glass::*;
///
/// let config = ShatterConfigBuilder::new()
///     .seed(42)
///     .site_count(64)
///     .build()
///     .unwrap();
///
/// # #[cfg(feature = "serde")]
/// # {
/// let json = serde_json::to_string(&config).unwrap();
/// let restored: ShatterConfig = serde_json::from_str(&json).unwrap();
/// assert_eq!(config, restored);
/// # }
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShatterConfig {
    /// Random seed for site placement and surface noise
    pub seed: u32,

    /// Number of Voronoi sites (glass shards)
    pub site_count: usize,

    /// Scale of the Z-axis noise applied to the facet mesh
    pub noise_scale: f64,

    /// How the noise is applied
    pub noise_model: NoiseModel,

    /// Index of refraction used by Snell's law
    ///
    /// Values inside (0, 1) never trigger total internal reflection for
    /// rays arriving at normal incidence from the image plane.
    pub refractive_index: f64,

    /// Effective distance of the photo behind the glass
    pub projection_distance: f64,

    /// Snap distance used when repairing cracks between cells
    pub repair_epsilon: f64,

    /// Voronoi construction algorithm
    pub strategy: CellStrategy,

    /// Surface the resampler refracts through
    pub surface: SurfaceKind,
}

impl Default for ShatterConfig {
    fn default() -> Self {
        ShatterConfigBuilder::new().seed(0).build_unchecked()
    }
}

/// Builder for creating ShatterConfig with validation
///
/// # Example
///
/// ```rust
/// use shattered_glass::*;
///
/// let config = ShatterConfigBuilder::new()
///     .seed(7)
///     .site_count(200)
///     .noise_scale(0.25)
///     .unwrap()
///     .refractive_index(0.8)
///     .unwrap()
///     .noise_model(NoiseModel::Uniform)
///     .build()
///     .unwrap();
///
/// assert_eq!(config.site_count, 200);
/// ```
#[derive(Debug, Clone)]
pub struct ShatterConfigBuilder {
    seed: Option<u32>,
    site_count: usize,
    noise_scale: f64,
    noise_model: NoiseModel,
    refractive_index: f64,
    projection_distance: f64,
    repair_epsilon: f64,
    strategy: CellStrategy,
    surface: SurfaceKind,
}

impl ShatterConfigBuilder {
    /// Create a new builder with default values
    ///
    /// Defaults:
    /// - seed: Random (generated from thread_rng)
    /// - site_count: 500
    /// - noise_scale: 0.5
    /// - noise_model: SensitivityWeighted
    /// - refractive_index: 0.7
    /// - projection_distance: 100.0
    /// - repair_epsilon: 1e-8
    /// - strategy: Incremental
    /// - surface: Mesh
    pub fn new() -> Self {
        Self {
            seed: None,
            site_count: 500,
            noise_scale: 0.5,
            noise_model: NoiseModel::default(),
            refractive_index: 0.7,
            projection_distance: 100.0,
            repair_epsilon: 1e-8,
            strategy: CellStrategy::default(),
            surface: SurfaceKind::default(),
        }
    }

    /// Set the random seed
    pub fn seed(mut self, seed: u32) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the number of Voronoi sites
    ///
    /// Zero is allowed and produces an empty mesh (every output pixel is left unset).
    pub fn site_count(mut self, count: usize) -> Self {
        self.site_count = count;
        self
    }

    /// Set the Z-axis noise scale
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the scale is negative or not finite
    pub fn noise_scale(mut self, scale: f64) -> Result<Self> {
        if !scale.is_finite() || scale < 0.0 {
            return Err(ShatterError::InvalidConfig(format!(
                "noise scale must be finite and >= 0 (got {})",
                scale
            )));
        }
        self.noise_scale = scale;
        Ok(self)
    }

    /// Set the noise model
    pub fn noise_model(mut self, model: NoiseModel) -> Self {
        self.noise_model = model;
        self
    }

    /// Set the refractive index
    ///
    /// Indices >= 1 are accepted but make total internal reflection (a fatal
    /// render error) more likely on steep facets.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the index is not a positive finite number
    pub fn refractive_index(mut self, index: f64) -> Result<Self> {
        if !index.is_finite() || index <= 0.0 {
            return Err(ShatterError::InvalidConfig(format!(
                "refractive index must be finite and > 0 (got {})",
                index
            )));
        }
        self.refractive_index = index;
        Ok(self)
    }

    /// Set the distance the refracted ray travels before sampling the photo
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the distance is not finite
    pub fn projection_distance(mut self, distance: f64) -> Result<Self> {
        if !distance.is_finite() {
            return Err(ShatterError::InvalidConfig(format!(
                "projection distance must be finite (got {})",
                distance
            )));
        }
        self.projection_distance = distance;
        Ok(self)
    }

    /// Set the vertex snap distance used by diagram repair
    ///
    /// Too small leaves micro-cracks; too large merges distinct corners.
    /// Neither is detected.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if epsilon is negative or not finite
    pub fn repair_epsilon(mut self, epsilon: f64) -> Result<Self> {
        if !epsilon.is_finite() || epsilon < 0.0 {
            return Err(ShatterError::InvalidConfig(format!(
                "repair epsilon must be finite and >= 0 (got {})",
                epsilon
            )));
        }
        self.repair_epsilon = epsilon;
        Ok(self)
    }

    /// Set the Voronoi construction strategy
    pub fn strategy(mut self, strategy: CellStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Set the surface the resampler refracts through
    pub fn surface(mut self, surface: SurfaceKind) -> Self {
        self.surface = surface;
        self
    }

    /// Build the configuration
    ///
    /// If no seed was provided, generates a random seed using thread_rng.
    pub fn build(self) -> Result<ShatterConfig> {
        Ok(self.build_unchecked())
    }

    fn build_unchecked(self) -> ShatterConfig {
        ShatterConfig {
            seed: self.seed.unwrap_or_else(rand::random),
            site_count: self.site_count,
            noise_scale: self.noise_scale,
            noise_model: self.noise_model,
            refractive_index: self.refractive_index,
            projection_distance: self.projection_distance,
            repair_epsilon: self.repair_epsilon,
            strategy: self.strategy,
            surface: self.surface,
        }
    }
}

impl Default for ShatterConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let config = ShatterConfigBuilder::new().build().unwrap();
        assert_eq!(config.site_count, 500);
        assert_eq!(config.noise_scale, 0.5);
        assert_eq!(config.refractive_index, 0.7);
        assert_eq!(config.projection_distance, 100.0);
        assert_eq!(config.repair_epsilon, 1e-8);
        assert_eq!(config.noise_model, NoiseModel::SensitivityWeighted);
        assert_eq!(config.strategy, CellStrategy::Incremental);
        assert_eq!(config.surface, SurfaceKind::Mesh);
    }

    #[test]
    fn test_builder_custom() {
        let config = ShatterConfigBuilder::new()
            .seed(42)
            .site_count(10)
            .noise_scale(2.0)
            .unwrap()
            .noise_model(NoiseModel::NormalJitter)
            .refractive_index(1.0)
            .unwrap()
            .projection_distance(-20.0)
            .unwrap()
            .repair_epsilon(1e-6)
            .unwrap()
            .strategy(CellStrategy::Exhaustive)
            .surface(SurfaceKind::NearestSite)
            .build()
            .unwrap();

        assert_eq!(config.seed, 42);
        assert_eq!(config.site_count, 10);
        assert_eq!(config.noise_scale, 2.0);
        assert_eq!(config.noise_model, NoiseModel::NormalJitter);
        assert_eq!(config.refractive_index, 1.0);
        assert_eq!(config.projection_distance, -20.0);
        assert_eq!(config.repair_epsilon, 1e-6);
        assert_eq!(config.strategy, CellStrategy::Exhaustive);
        assert_eq!(config.surface, SurfaceKind::NearestSite);
    }

    #[test]
    fn test_builder_rejects_bad_values() {
        assert!(ShatterConfigBuilder::new().noise_scale(-0.1).is_err());
        assert!(ShatterConfigBuilder::new().noise_scale(f64::NAN).is_err());
        assert!(ShatterConfigBuilder::new().refractive_index(0.0).is_err());
        assert!(ShatterConfigBuilder::new().refractive_index(-1.5).is_err());
        assert!(ShatterConfigBuilder::new().refractive_index(f64::INFINITY).is_err());
        assert!(ShatterConfigBuilder::new().projection_distance(f64::NAN).is_err());
        assert!(ShatterConfigBuilder::new().repair_epsilon(-1e-9).is_err());
    }

    #[test]
    fn test_zero_noise_is_valid() {
        let config = ShatterConfigBuilder::new()
            .noise_scale(0.0)
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(config.noise_scale, 0.0);
    }

    #[test]
    fn test_noise_model_names() {
        assert_eq!(NoiseModel::Uniform.name(), "uniform");
        assert_eq!(NoiseModel::SensitivityWeighted.name(), "sensitivity-weighted");
        assert_eq!(NoiseModel::NormalJitter.name(), "normal-jitter");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_config_serialization() {
        let config = ShatterConfigBuilder::new()
            .seed(12345)
            .noise_model(NoiseModel::Uniform)
            .build()
            .unwrap();

        let json = serde_json::to_string(&config).unwrap();
        let restored: ShatterConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(config, restored);
    }
}
