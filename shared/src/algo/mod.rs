//! Numeric helpers shared across the imaging pipeline
//!
//! Sample ranges and NaN-aware statistics used by the colormap builder and
//! the flux-map normalisation steps.

pub mod misc;
pub mod stats;

pub use misc::{arange, linspace};
pub use stats::{finite_max, finite_percentile, nan_mean, StatsError};
