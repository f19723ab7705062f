//! Shared components for the flux-map imager.
//!
//! Array statistics, interpolation and the image-processing steps that turn a
//! raw ray-traced flux map into a displayable image. Nothing here knows about
//! colormaps or figure layout; those live in the `imager` crate.

pub mod algo;
pub mod image_proc;
