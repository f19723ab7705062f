//! Flux-map image processing for the compositing pipeline.
//!
//! # Module Organization
//!
//! - **flux_map**: the channel-major `FluxMap` type, X-ray channel remap and
//!   conversion to `[row, column, channel]` image layout
//! - **repair**: single-pass NaN repair from 4-connected neighbours
//! - **normalize**: percentile-clip normalisation
//! - **seam**: polar seam suppression about the vertical midline
//! - **io**: `.npy` flux-map loading/saving and 8-bit rasterisation
//!
//! The steps are applied in that order by the compositor; each one operates
//! in place on an owned array so a dataset never holds more than one copy per
//! band.

pub mod flux_map;
pub mod io;
pub mod normalize;
pub mod repair;
pub mod seam;

pub use flux_map::{remap_xray_pixel, FluxMap, FluxMapError, CHANNELS};
pub use io::{encode_png, image_to_rgb8, load_flux_map, save_flux_map, FluxIoError};
pub use normalize::normalize_by_percentile;
pub use repair::{repair_nan_pixels, RepairSummary};
pub use seam::{suppress_polar_seam, DEFAULT_POLE_HALF_WIDTH};
