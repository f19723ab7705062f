//! Print the physical scales behind the ray tracer's dimensionless units
//!
//! Usage:
//! ```
//! cargo run --bin disk_scales -- [--solar-masses N]
//! ```

use clap::Parser;
use imager::{AccretionScales, PhysicalConstants};

/// Command line arguments for the scale report
#[derive(Parser, Debug)]
#[command(
    name = "disk_scales",
    about = "Prints luminosity, flux, temperature and corona scales of the disk model",
    long_about = None
)]
struct Args {
    /// Black-hole mass in solar masses
    #[arg(long, default_value_t = 1.0)]
    solar_masses: f64,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let defaults = PhysicalConstants::default();
    let constants = PhysicalConstants {
        solar_mass: defaults.solar_mass * args.solar_masses,
        ..defaults
    };
    log::debug!("Using constants {constants:?}");

    print!("{}", AccretionScales::from_constants(&constants));
}
