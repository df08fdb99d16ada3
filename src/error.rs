//! Error types for shattered-glass generation and rendering

use thiserror::Error;

/// Errors that can occur while building the facet surface or rendering through it
#[derive(Debug, Error)]
pub enum ShatterError {
    /// Configuration validation failed
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Snell's law has no solution for this pixel (asin argument above 1)
    ///
    /// The refractive index and surface tilt combination is invalid for this
    /// renderer; the whole render is aborted.
    #[error("total internal reflection at pixel ({x}, {y}): sin(theta) * index = {incidence}")]
    TotalInternalReflection { x: u32, y: u32, incidence: f64 },

    /// The refracted ray travels sideways or backwards and cannot be projected
    #[error("refracted ray at pixel ({x}, {y}) has no forward z component")]
    DegenerateRefraction { x: u32, y: u32 },

    /// Image decode or encode failed
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// Underlying I/O failure
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for shattered-glass operations
pub type Result<T> = std::result::Result<T, ShatterError>;
