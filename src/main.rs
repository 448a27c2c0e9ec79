use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use scanraster::{
    config::Scene,
    math::utils::parse_hex_color,
    prim3d::RasterizerImplementation,
    scene::{RenderOptions, World},
    Pixel,
};

#[derive(Parser)]
#[command(name = "scanraster")]
#[command(about = "Render a scene file to a PNG on the CPU")]
struct Cli {
    /// Scene description (TOML)
    scene: PathBuf,

    /// Output image
    #[arg(short, long, default_value = "output.png")]
    output: PathBuf,

    /// Overrides the rasterizer chosen by the scene
    #[arg(long, value_enum)]
    implementation: Option<Implementation>,

    /// Also write the z-buffer as a grayscale image
    #[arg(long)]
    depth: Option<PathBuf>,

    /// Outline every triangle, optionally with a `#rrggbb` color
    #[arg(long, num_args = 0..=1, default_missing_value = "#ffffff")]
    wireframe: Option<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Implementation {
    Bbox,
    Scanline,
}

impl From<Implementation> for RasterizerImplementation {
    fn from(value: Implementation) -> Self {
        match value {
            Implementation::Bbox => RasterizerImplementation::BBox,
            Implementation::Scanline => RasterizerImplementation::Scanline,
        }
    }
}

fn wireframe_color(arg: Option<&str>) -> Result<Option<Pixel>> {
    match arg {
        None => Ok(None),
        Some(hex) => parse_hex_color(hex)
            .map(Some)
            .with_context(|| format!("invalid wireframe color {hex:?}")),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let scene = Scene::load_toml(&cli.scene)?;
    let base_dir = cli
        .scene
        .parent()
        .map(PathBuf::from)
        .unwrap_or_default();
    let world = World::load(scene, base_dir)?;

    let options = RenderOptions {
        implementation: cli.implementation.map(Into::into),
        wireframe: wireframe_color(cli.wireframe.as_deref())?,
    };
    let frame = world.render(&options)?;
    info!(elapsed = ?frame.elapsed, "rendered {:?}", cli.scene);
    println!("{}", frame.metrics);

    let img = frame
        .color_image()
        .context("color buffer does not match its dimensions")?;
    img.save(&cli.output)
        .with_context(|| format!("failed to write {:?}", cli.output))?;
    info!("wrote {:?}", cli.output);

    if let Some(path) = &cli.depth {
        let img = frame
            .depth_image()
            .context("depth buffer does not match its dimensions")?;
        img.save(path)
            .with_context(|| format!("failed to write {path:?}"))?;
        info!("wrote {path:?}");
    }

    Ok(())
}
