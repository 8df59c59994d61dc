mod scenes;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use lux_renderer::{
    format_duration, load_obj, render_path_traced, render_photon_mapped, tonemap, Accelerator, Color, Kernel,
    Material, RenderConfig, SplitMethod,
};
use scenes::Preset;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(name = "lux", version, about = "Offline path tracer and photon mapper")]
struct Cli {
    /// Preset scene to render
    #[arg(long, value_enum, default_value_t = Preset::PointLight)]
    scene: Preset,

    #[arg(long, default_value_t = 256)]
    width: usize,

    #[arg(long, default_value_t = 256)]
    height: usize,

    /// Samples per pixel
    #[arg(long)]
    spp: Option<usize>,

    #[arg(long, value_enum, default_value_t = Algorithm::Path)]
    algorithm: Algorithm,

    /// Acceleration structure
    #[arg(long, value_enum)]
    bvh: Option<BvhArg>,

    /// Build the BVH on several threads
    #[arg(long)]
    concurrent_bvh: bool,

    /// Density estimation kernel for the photon mapper
    #[arg(long, value_enum)]
    kernel: Option<KernelArg>,

    /// Photon walks traced from the lights
    #[arg(long)]
    photon_walks: Option<usize>,

    #[arg(long)]
    max_bounces: Option<u32>,

    /// JSON render configuration, applied before the other flags
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, short, default_value = "render.png")]
    output: PathBuf,

    /// Worker threads, 0 for all hardware threads
    #[arg(long)]
    threads: Option<usize>,

    #[arg(long)]
    seed: Option<u64>,

    /// Clamp at this fraction of the brightest value before equalizing
    #[arg(long, default_value_t = 0.8)]
    clamp: f32,

    /// Raise the equalized image to this power before writing
    #[arg(long)]
    gamma: Option<f32>,

    /// OBJ mesh added to the scene as grey diffuse triangles
    #[arg(long)]
    mesh: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Algorithm {
    Path,
    Photon,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum BvhArg {
    None,
    Sort,
    Centroid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum KernelArg {
    Box,
    NormalizedBox,
    Gaussian,
    NormalizedGaussian,
    Cone,
}

impl From<KernelArg> for Kernel {
    fn from(kernel: KernelArg) -> Self {
        match kernel {
            KernelArg::Box => Kernel::Box,
            KernelArg::NormalizedBox => Kernel::NormalizedBox,
            KernelArg::Gaussian => Kernel::Gaussian,
            KernelArg::NormalizedGaussian => Kernel::NormalizedGaussian,
            KernelArg::Cone => Kernel::Cone,
        }
    }
}

impl Cli {
    /// Load the config file if one was given, then apply the flags on top.
    fn render_config(&self) -> Result<RenderConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config {}", path.display()))?;
                serde_json::from_str(&text).with_context(|| format!("Failed to parse config {}", path.display()))?
            }
            None => RenderConfig::default(),
        };

        if self.spp.is_some() {
            config.samples_per_pixel = self.spp;
        }
        if let Some(max_bounces) = self.max_bounces {
            config.max_bounces = max_bounces;
        }
        if let Some(threads) = self.threads {
            config.threads = threads;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(kernel) = self.kernel {
            config.photon.kernel = kernel.into();
        }
        if let Some(walks) = self.photon_walks {
            config.photon.max_walks = walks;
        }

        let split = match self.bvh {
            Some(BvhArg::None) => None,
            Some(BvhArg::Sort) => Some(SplitMethod::Sort),
            Some(BvhArg::Centroid) => Some(SplitMethod::Centroid),
            None => match config.accelerator {
                Accelerator::None => None,
                Accelerator::Bvh(split) | Accelerator::ConcurrentBvh(split) => Some(split),
            },
        };
        config.accelerator = match split {
            None => Accelerator::None,
            Some(split) if self.concurrent_bvh => Accelerator::ConcurrentBvh(split),
            Some(split) => match config.accelerator {
                Accelerator::ConcurrentBvh(_) => Accelerator::ConcurrentBvh(split),
                _ => Accelerator::Bvh(split),
            },
        };

        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = cli.render_config()?;
    log::info!("Starting lux: {:?} scene, {:?}", cli.scene, cli.algorithm);
    log::debug!("{config:?}");

    let rays_per_pixel = config.samples_per_pixel.unwrap_or(16);
    let mut scene = scenes::build(cli.scene, cli.width, cli.height, rays_per_pixel)
        .with_context(|| format!("Failed to build scene {:?}", cli.scene))?;
    if let Some(path) = &cli.mesh {
        let triangles = load_obj(path, Material::diffuse(Color::splat(0.6)))
            .with_context(|| format!("Failed to load mesh {}", path.display()))?;
        for triangle in triangles {
            scene.add(triangle);
        }
    }

    let started = Instant::now();
    let image = match cli.algorithm {
        Algorithm::Path => render_path_traced(&mut scene, &config),
        Algorithm::Photon => render_photon_mapped(&mut scene, &config),
    }
    .context("Render failed")?;
    log::info!("Render time: {}", format_duration(started.elapsed()));

    let image = match cli.gamma {
        Some(gamma) => tonemap::clamp_and_gamma_curve(&image, cli.clamp, gamma),
        None => tonemap::clamp_and_equalize(&image, cli.clamp),
    };
    image
        .save_png(&cli.output)
        .with_context(|| format!("Failed to write {}", cli.output.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("lux").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults() {
        let cli = parse(&[]);
        let config = cli.render_config().unwrap();
        assert_eq!(cli.scene, Preset::PointLight);
        assert_eq!(config.accelerator, Accelerator::Bvh(SplitMethod::Centroid));
        assert_eq!(config.samples_per_pixel, None);
    }

    #[test]
    fn test_flags_override() {
        let cli = parse(&[
            "--scene",
            "area-light",
            "--algorithm",
            "photon",
            "--bvh",
            "sort",
            "--concurrent-bvh",
            "--kernel",
            "normalized-gaussian",
            "--spp",
            "8",
            "--seed",
            "3",
        ]);
        let config = cli.render_config().unwrap();

        assert_eq!(cli.scene, Preset::AreaLight);
        assert_eq!(cli.algorithm, Algorithm::Photon);
        assert_eq!(config.accelerator, Accelerator::ConcurrentBvh(SplitMethod::Sort));
        assert_eq!(config.photon.kernel, Kernel::NormalizedGaussian);
        assert_eq!(config.samples_per_pixel, Some(8));
        assert_eq!(config.seed, 3);
    }

    #[test]
    fn test_output_flags() {
        let cli = parse(&["--gamma", "0.5", "--mesh", "bunny.obj", "-o", "out.png"]);
        assert_eq!(cli.gamma, Some(0.5));
        assert_eq!(cli.mesh, Some(PathBuf::from("bunny.obj")));
        assert_eq!(cli.output, PathBuf::from("out.png"));
        assert_eq!(parse(&[]).gamma, None);
    }

    #[test]
    fn test_no_bvh() {
        let config = parse(&["--bvh", "none", "--concurrent-bvh"]).render_config().unwrap();
        assert_eq!(config.accelerator, Accelerator::None);
    }

    #[test]
    fn test_rejects_zero_spp() {
        assert!(parse(&["--spp", "0"]).render_config().is_err());
    }
}
