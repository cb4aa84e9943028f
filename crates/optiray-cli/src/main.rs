//! optiray CLI - spot diagrams and dispersion tables from the kernel.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::{info, warn, LevelFilter};

use optiray::prelude::*;

#[derive(Parser)]
#[command(name = "optiray")]
#[command(about = "Sequential optical ray tracing from the command line", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Trace a parallel ray fan onto a surface and print its spot diagram
    Spot {
        /// JSON sag-profile prescription (defaults to a built-in asphere)
        #[arg(long)]
        prescription: Option<PathBuf>,
        /// Number of rays across the fan diameter
        #[arg(long, default_value_t = 17)]
        rays: usize,
        /// Fan half-height in lens units
        #[arg(long, default_value_t = 1.25)]
        aperture: f64,
        /// Histogram resolution (bins per axis)
        #[arg(long, default_value_t = 16)]
        grid: usize,
    },
    /// Print a Sellmeier refractive-index table for N-BK7
    Index {
        /// Wavelengths in micrometres (defaults to the F, d, C lines)
        #[arg(long = "wavelength")]
        wavelengths: Vec<f64>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();

    match cli.command {
        Commands::Spot {
            prescription,
            rays,
            aperture,
            grid,
        } => spot(prescription, rays, aperture, grid),
        Commands::Index { wavelengths } => index_table(wavelengths),
    }
}

/// Default demo prescription: a hyperbolic asphere.
fn default_profile() -> SagProfile {
    SagProfile::Asphere(Asphere::new(
        1.0 / 0.25284872,
        1.0,
        vec![-0.005, 0.00001, -0.0000005],
    ))
}

fn load_profile(path: Option<PathBuf>) -> Result<SagProfile> {
    match path {
        Some(path) => {
            let json = fs::read_to_string(&path)
                .with_context(|| format!("reading prescription {}", path.display()))?;
            serde_json::from_str(&json)
                .with_context(|| format!("parsing prescription {}", path.display()))
        }
        None => Ok(default_profile()),
    }
}

fn spot(prescription: Option<PathBuf>, rays: usize, aperture: f64, grid: usize) -> Result<()> {
    anyhow::ensure!(rays >= 2, "need at least two rays across the fan");
    let profile = load_profile(prescription)?;
    info!("tracing {rays}x{rays} ray fan, aperture {aperture}");

    let surface = ElementId::new(1);
    let mut result = TraceResult::new(1);
    result.set_intercepted_save_state(surface, true);

    let mut lost = 0usize;
    for i in 0..rays {
        for j in 0..rays {
            let x = aperture * (2.0 * i as f64 / (rays - 1) as f64 - 1.0);
            let y = aperture * (2.0 * j as f64 / (rays - 1) as f64 - 1.0);
            let ray = Ray::new(Point3::new(x, y, -10.0), Vec3::new(0.0, 0.0, 1.0));
            result.add_ray_wavelen(0.5876);
            match intersect_sag_profile(&ray, &profile) {
                Some(hit) => {
                    let mut record = TraceRay::new(ray.origin, ray.direction, 0.5876, 1.0);
                    record.intercept = Some(hit.point);
                    let key = result.new_ray(record);
                    result.add_intercepted(surface, key);
                }
                None => lost += 1,
            }
        }
    }
    if lost > 0 {
        warn!("{lost} rays missed the surface");
    }

    let window = result.get_intercepted_window(surface)?;
    let center = result.get_intercepted_center(surface)?;
    let centroid = result.get_intercepted_centroid(surface)?;
    println!(
        "window   x [{:+.6}, {:+.6}]  y [{:+.6}, {:+.6}]  z [{:+.6}, {:+.6}]",
        window.min.x, window.max.x, window.min.y, window.max.y, window.min.z, window.max.z
    );
    println!(
        "center   ({:+.6}, {:+.6}, {:+.6})",
        center.x, center.y, center.z
    );
    println!(
        "centroid ({:+.6}, {:+.6}, {:+.6})",
        centroid.x, centroid.y, centroid.z
    );

    let histogram = result.pixelate(surface, grid, grid)?;
    println!("{}", render_histogram(&histogram));
    Ok(())
}

/// Render bin counts as ASCII shades, brightest bin first.
fn render_histogram(grid: &SpotGrid) -> String {
    const SHADES: &[u8] = b" .:-=+*#%@";
    let peak = grid.peak().max(1);
    let mut out = String::new();
    for iy in (0..grid.ny()).rev() {
        for ix in 0..grid.nx() {
            let level = (grid.count(ix, iy) as usize * (SHADES.len() - 1)) / peak as usize;
            out.push(SHADES[level] as char);
        }
        out.push('\n');
    }
    out
}

fn index_table(mut wavelengths: Vec<f64>) -> Result<()> {
    if wavelengths.is_empty() {
        // F, d, C lines
        wavelengths = vec![0.4861327, 0.5875618, 0.6562725];
    }
    let glass = Sellmeier::bk7();
    println!("N-BK7");
    for w in wavelengths {
        match glass.refractive_index(w) {
            Ok(n) => println!("  {w:.7} um  n = {n:.9}"),
            Err(err) => warn!("{w:.7} um: {err}"),
        }
    }
    Ok(())
}
