//! Error type for the imager crate.

use std::path::PathBuf;

use shared::algo::StatsError;
use shared::image_proc::{FluxIoError, FluxMapError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImagerError {
    #[error(transparent)]
    FluxIo(#[from] FluxIoError),
    #[error(transparent)]
    FluxMap(#[from] FluxMapError),
    #[error("Normalisation failed: {0}")]
    Stats(#[from] StatsError),
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid SVG overlay: {0}")]
    Svg(#[from] usvg::Error),
    #[error("Failed to encode raster: {0}")]
    Image(#[from] image::ImageError),
    #[error("Cannot allocate a {width}x{height} overlay buffer")]
    PixmapAlloc { width: u32, height: u32 },
    #[error("Flux map {0} has no pixels")]
    EmptyImage(String),
    #[error("Config error: {0}")]
    Config(String),
}
