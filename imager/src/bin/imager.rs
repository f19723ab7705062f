//! Render the configured batch of accretion-disk composites
//!
//! Reads `{tag}-optical.npy` / `{tag}-xray.npy` flux maps from the data
//! directory and writes `.png` and `.svg` composites with colorbar legends.
//!
//! Usage:
//! ```
//! cargo run --bin imager -- [OPTIONS]
//! ```
//!
//! Without `--config` the built-in run list is used. `--write-default-config`
//! dumps that list as JSON to start a custom batch from.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use imager::{run_batch, BatchConfig, Compositor};

/// Command line arguments for the batch imager
#[derive(Parser, Debug)]
#[command(
    name = "imager",
    about = "Renders false-color composites of optical and X-ray flux maps",
    long_about = None
)]
struct Args {
    /// JSON batch configuration; defaults to the built-in run list
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding the flux maps (overrides the config)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Directory to write composites to (overrides the config)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Only run entries for this dataset tag
    #[arg(short, long)]
    tag: Option<String>,

    /// Write the effective configuration to this path and exit
    #[arg(long)]
    write_default_config: Option<PathBuf>,
}

fn load_config(args: &Args) -> anyhow::Result<BatchConfig> {
    let mut config = match &args.config {
        Some(path) => BatchConfig::load_from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => BatchConfig::default(),
    };

    if let Some(dir) = &args.data_dir {
        config.data_dir = dir.clone();
    }
    if let Some(dir) = &args.output_dir {
        config.output_dir = dir.clone();
    }
    if let Some(tag) = &args.tag {
        config.retain_tag(tag);
    }

    config.validate()?;
    Ok(config)
}

fn run(args: &Args) -> anyhow::Result<bool> {
    let config = load_config(args)?;

    if let Some(path) = &args.write_default_config {
        config
            .save_to_file(path)
            .with_context(|| format!("Failed to write config {}", path.display()))?;
        println!("Config written to: {}", path.display());
        return Ok(true);
    }

    if config.run_count() == 0 {
        anyhow::bail!("No runs selected");
    }

    log::info!(
        "Running {} renders from {} into {}",
        config.run_count(),
        config.data_dir.display(),
        config.output_dir.display()
    );

    let compositor = Compositor::new(
        &config.data_dir,
        &config.output_dir,
        config.compositor_options(),
    );
    let outcome = run_batch(&compositor, &config);

    println!(
        "{} of {} runs succeeded",
        outcome.succeeded.len(),
        config.run_count()
    );
    for failed in &outcome.failed {
        eprintln!("  {}: {}", failed.name, failed.error);
    }
    Ok(outcome.all_succeeded())
}

fn main() -> ExitCode {
    // Initialize logging from environment variables
    env_logger::init();

    let args = Args::parse();

    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
