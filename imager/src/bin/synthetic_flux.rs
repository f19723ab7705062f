//! Write a synthetic optical / X-ray flux-map pair
//!
//! Produces `{tag}-optical.npy` and `{tag}-xray.npy` in the layout the ray
//! tracer writes, with NaN holes and a bright polar seam, so the imager can be
//! run without ray-tracer output.
//!
//! Usage:
//! ```
//! cargo run --bin synthetic_flux -- --output-dir ../data --tag synthetic
//! cargo run --bin imager -- --data-dir ../data --tag synthetic
//! ```

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use imager::colormap::Band;
use imager::synthetic::SyntheticDisk;
use shared::image_proc::save_flux_map;

/// Command line arguments for synthetic flux generation
#[derive(Parser, Debug)]
#[command(
    name = "synthetic_flux",
    about = "Writes a synthetic accretion-disk flux-map pair",
    long_about = None
)]
struct Args {
    /// Directory to write the flux maps to
    #[arg(short, long, default_value = "../data")]
    output_dir: PathBuf,

    /// Dataset tag used in the file names
    #[arg(short, long, default_value = "synthetic")]
    tag: String,

    /// Image height in pixels
    #[arg(long, default_value_t = 90)]
    rows: usize,

    /// Image width in pixels
    #[arg(long, default_value_t = 160)]
    cols: usize,

    /// Leave every Nth pixel unsampled (0 disables NaN holes)
    #[arg(long, default_value_t = 97)]
    nan_stride: usize,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let disk = SyntheticDisk {
        rows: args.rows,
        cols: args.cols,
        nan_stride: args.nan_stride,
        ..Default::default()
    };
    let (optical, xray) = disk.generate()?;

    std::fs::create_dir_all(&args.output_dir)
        .with_context(|| format!("Failed to create {}", args.output_dir.display()))?;

    for (band, map) in [(Band::Optical, &optical), (Band::Xray, &xray)] {
        let path = args
            .output_dir
            .join(format!("{}-{}.npy", args.tag, band.suffix()));
        save_flux_map(map, &path)?;
        println!("Wrote {}", path.display());
    }
    Ok(())
}
