//! Shattered-glass image distortion
//!
//! Scatters random sites over an image, splits the plane into Voronoi cells,
//! lifts the cells into a jittered 3D facet mesh and resamples the image by
//! refracting a vertical ray through the facet above every pixel.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use shattered_glass::*;
//!
//! let source = load_rgba("photo.jpg").unwrap();
//!
//! let config = ShatterConfigBuilder::new()
//!     .seed(42)
//!     .site_count(500)
//!     .noise_scale(0.5).unwrap()
//!     .refractive_index(0.7).unwrap()
//!     .build().unwrap();
//!
//! let glass = ShatteredGlass::for_image(config, &source).unwrap();
//! let output = glass.render(&source).unwrap();
//! save_png(&output, "shattered.png").unwrap();
//! ```
//!
//! # Features
//!
//! - `serde`: Enables serialization support for configuration and cells

// Modules
pub mod error;
pub mod config;
pub mod cell;
pub mod spatial;
pub mod generation;
pub mod mesh;
pub mod render;
pub mod shatter;
pub mod image_io;

// Re-export core types for convenience
pub use error::{ShatterError, Result};
pub use config::{ShatterConfig, ShatterConfigBuilder, NoiseModel, CellStrategy, SurfaceKind};
pub use cell::VoronoiCell;
pub use spatial::SpatialIndex;
pub use generation::{VoronoiDiagram, RepairStats, build_diagram, compute_cells, generate_sites};
pub use mesh::{FacetMesh, lift_to_mesh};
pub use render::{SurfaceProbe, Collider, NearestSiteSurface, render};
pub use shatter::ShatteredGlass;
pub use image_io::{load_rgba, save_png};

// Re-export glam vectors for convenience
pub use glam::{DVec2, DVec3};
