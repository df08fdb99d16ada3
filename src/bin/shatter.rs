use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::info;

use shattered_glass::{
    load_rgba, save_png, CellStrategy, NoiseModel, ShatterConfigBuilder, ShatteredGlass,
    SurfaceKind,
};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum CliNoiseModel {
    #[value(name = "uniform")]
    Uniform,
    #[value(name = "sensitivity")]
    Sensitivity,
    #[value(name = "normal-jitter")]
    NormalJitter,
}

impl From<CliNoiseModel> for NoiseModel {
    fn from(value: CliNoiseModel) -> Self {
        match value {
            CliNoiseModel::Uniform => NoiseModel::Uniform,
            CliNoiseModel::Sensitivity => NoiseModel::SensitivityWeighted,
            CliNoiseModel::NormalJitter => NoiseModel::NormalJitter,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum CliStrategy {
    #[value(name = "exhaustive")]
    Exhaustive,
    #[value(name = "incremental")]
    Incremental,
}

impl From<CliStrategy> for CellStrategy {
    fn from(value: CliStrategy) -> Self {
        match value {
            CliStrategy::Exhaustive => CellStrategy::Exhaustive,
            CliStrategy::Incremental => CellStrategy::Incremental,
        }
    }
}

/// Shatter - refract a photo through a pane of broken glass
#[derive(Parser, Debug)]
#[command(name = "shatter", version, about)]
struct Cli {
    /// Input image (any format the image crate can decode)
    #[arg(long, value_name = "FILE")]
    in_path: PathBuf,

    /// Output PNG path
    #[arg(long, value_name = "FILE")]
    out_path: PathBuf,

    /// Number of Voronoi sites (glass shards)
    #[arg(long, default_value_t = 500)]
    points: usize,

    /// Scale of the facet height noise
    #[arg(long, default_value_t = 0.5)]
    noise: f64,

    /// Refractive index
    #[arg(long, default_value_t = 0.7)]
    refraction: f64,

    /// Distance from the glass to the photo behind it
    #[arg(long, default_value_t = 100.0)]
    image_dist: f64,

    /// Use the nearest site's normal instead of ray casting a mesh
    #[arg(long)]
    use_nn: bool,

    /// Random seed (random if omitted)
    #[arg(long)]
    seed: Option<u32>,

    /// How facet heights are perturbed
    #[arg(long, value_enum, default_value_t = CliNoiseModel::Sensitivity)]
    noise_model: CliNoiseModel,

    /// Voronoi construction algorithm
    #[arg(long, value_enum, default_value_t = CliStrategy::Incremental)]
    strategy: CliStrategy,

    /// Vertex snap distance for crack repair
    #[arg(long, default_value_t = 1e-8)]
    repair_epsilon: f64,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    info!("Reading image {}", cli.in_path.display());
    let source = load_rgba(&cli.in_path)
        .with_context(|| format!("failed to read {}", cli.in_path.display()))?;

    let mut builder = ShatterConfigBuilder::new()
        .site_count(cli.points)
        .noise_scale(cli.noise)?
        .refractive_index(cli.refraction)?
        .projection_distance(cli.image_dist)?
        .repair_epsilon(cli.repair_epsilon)?
        .noise_model(cli.noise_model.into())
        .strategy(cli.strategy.into())
        .surface(if cli.use_nn { SurfaceKind::NearestSite } else { SurfaceKind::Mesh });
    if let Some(seed) = cli.seed {
        builder = builder.seed(seed);
    }
    let config = builder.build()?;
    info!("Using seed {}", config.seed);

    let glass = ShatteredGlass::for_image(config, &source).context("failed to build glass")?;
    let output = glass.render(&source).context("failed to render")?;

    info!("Writing output {}", cli.out_path.display());
    save_png(&output, &cli.out_path)
        .with_context(|| format!("failed to write {}", cli.out_path.display()))?;

    Ok(())
}
