//! False-color imaging of black-hole accretion-disk flux maps.
//!
//! Turns the optical and X-ray flux maps written by the ray tracer into
//! composite images with blackbody colorbar legends, and computes the
//! physical scales the ray tracer's dimensionless units stand for.
//!
//! # Modules
//!
//! - **colormap**: blackbody temperature table and optical / X-ray colormaps
//! - **legend**: colorbar legends as SVG fragments
//! - **overlay**: rasterising legends onto images and embedding images in SVG
//! - **compositor**: the per-dataset `process` and `together` pipelines
//! - **config** / **batch**: JSON batch configuration and the batch runner
//! - **physics**: CGS constants and derived accretion scales

pub mod batch;
pub mod colormap;
pub mod compositor;
pub mod config;
pub mod error;
pub mod legend;
pub mod overlay;
pub mod physics;
pub mod synthetic;

pub use batch::{run_batch, BatchOutcome};
pub use colormap::{temperature_to_rgb, Band, Colormap};
pub use compositor::{
    prepare, Compositor, CompositorOptions, PreparedImage, ProcessReport, TogetherReport,
};
pub use config::BatchConfig;
pub use error::ImagerError;
pub use physics::{AccretionScales, PhysicalConstants};
