//! Flux-map and raster I/O
//!
//! Flux maps are read from and written to NumPy `.npy` files holding a
//! `[3, rows, cols]` `f64` array, the format the ray tracer emits. Image-layout
//! arrays are rasterised to 8-bit RGB for PNG output.

use std::io::Cursor;
use std::path::Path;

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use ndarray::{Array3, ArrayView3};
use ndarray_npy::{read_npy, write_npy, ReadNpyError, WriteNpyError};
use thiserror::Error;

use super::flux_map::{FluxMap, FluxMapError, CHANNELS};

/// Errors that can occur while reading or writing flux maps and rasters
#[derive(Error, Debug)]
pub enum FluxIoError {
    #[error("Failed to read flux map {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: ReadNpyError,
    },
    #[error("Failed to write flux map {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: WriteNpyError,
    },
    #[error("Flux map {path} has the wrong shape: {source}")]
    Shape {
        path: String,
        #[source]
        source: FluxMapError,
    },
    #[error("Image must be [rows, cols, 3], got {0:?}")]
    ImageShape((usize, usize, usize)),
    #[error("Image of {rows}x{cols} pixels is too large to rasterise")]
    TooLarge { rows: usize, cols: usize },
    #[error("Image encoding failed: {0}")]
    Encode(#[from] image::ImageError),
}

/// Load a `[3, rows, cols]` flux map from a `.npy` file.
///
/// # Examples
/// ```no_run
/// use shared::image_proc::io::load_flux_map;
///
/// let optical = load_flux_map("../data/kerr-optical.npy").unwrap();
/// println!("kerr optical map is {:?}", optical.dim());
/// ```
pub fn load_flux_map<P: AsRef<Path>>(path: P) -> Result<FluxMap, FluxIoError> {
    let path = path.as_ref();
    let data: Array3<f64> = read_npy(path).map_err(|source| FluxIoError::Read {
        path: path.display().to_string(),
        source,
    })?;
    FluxMap::new(data).map_err(|source| FluxIoError::Shape {
        path: path.display().to_string(),
        source,
    })
}

/// Write a flux map as a `[3, rows, cols]` `.npy` file.
pub fn save_flux_map<P: AsRef<Path>>(map: &FluxMap, path: P) -> Result<(), FluxIoError> {
    let path = path.as_ref();
    write_npy(path, &map.view()).map_err(|source| FluxIoError::Write {
        path: path.display().to_string(),
        source,
    })
}

/// Convert a normalised value to an 8-bit channel.
///
/// Values are clipped to `[0, 1]`; NaN renders black.
pub fn unit_to_u8(value: f64) -> u8 {
    if value.is_nan() {
        0
    } else {
        (value.clamp(0.0, 1.0) * 255.0).round() as u8
    }
}

/// Rasterise a `[row, column, channel]` image with values in `[0, 1]`.
///
/// Row 0 becomes the top of the raster. Out-of-range values are clipped.
pub fn image_to_rgb8(image: ArrayView3<f64>) -> Result<RgbImage, FluxIoError> {
    let (rows, cols, channels) = image.dim();
    if channels != CHANNELS {
        return Err(FluxIoError::ImageShape(image.dim()));
    }

    let (Ok(width), Ok(height)) = (u32::try_from(cols), u32::try_from(rows)) else {
        return Err(FluxIoError::TooLarge { rows, cols });
    };

    Ok(RgbImage::from_fn(width, height, |x, y| {
        let (r, c) = (y as usize, x as usize);
        Rgb([
            unit_to_u8(image[[r, c, 0]]),
            unit_to_u8(image[[r, c, 1]]),
            unit_to_u8(image[[r, c, 2]]),
        ])
    }))
}

/// Encode a raster as PNG bytes.
pub fn encode_png(image: &RgbImage) -> Result<Vec<u8>, FluxIoError> {
    let mut buffer = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(image.clone()).write_to(&mut buffer, ImageFormat::Png)?;
    Ok(buffer.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;
    use tempfile::tempdir;

    #[test]
    fn test_flux_map_survives_npy() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ring-optical.npy");

        let mut map = FluxMap::from_elem(4, 6, 0.5);
        map.data_mut()[[1, 2, 3]] = f64::NAN;
        map.data_mut()[[2, 0, 5]] = 17.25;

        save_flux_map(&map, &path).unwrap();
        let loaded = load_flux_map(&path).unwrap();

        assert_eq!(loaded.dim(), (3, 4, 6));
        assert!(loaded.view()[[1, 2, 3]].is_nan());
        assert_eq!(loaded.view()[[2, 0, 5]], 17.25);
        assert_eq!(loaded.view()[[0, 3, 3]], 0.5);
    }

    #[test]
    fn test_load_rejects_wrong_channel_count() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.npy");
        write_npy(&path, &Array3::<f64>::zeros((2, 3, 3))).unwrap();

        assert!(matches!(
            load_flux_map(&path),
            Err(FluxIoError::Shape { .. })
        ));
    }

    #[test]
    fn test_load_missing_file_fails() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            load_flux_map(dir.path().join("absent.npy")),
            Err(FluxIoError::Read { .. })
        ));
    }

    #[test]
    fn test_unit_to_u8_clips() {
        assert_eq!(unit_to_u8(0.0), 0);
        assert_eq!(unit_to_u8(1.0), 255);
        assert_eq!(unit_to_u8(3.7), 255);
        assert_eq!(unit_to_u8(-0.2), 0);
        assert_eq!(unit_to_u8(0.5), 128);
        assert_eq!(unit_to_u8(f64::NAN), 0);
    }

    #[test]
    fn test_image_to_rgb8_orientation() {
        let mut image = Array3::zeros((2, 3, 3));
        image[[0, 2, 0]] = 1.0;
        image[[1, 0, 2]] = 2.0;

        let raster = image_to_rgb8(image.view()).unwrap();

        assert_eq!(raster.dimensions(), (3, 2));
        assert_eq!(raster.get_pixel(2, 0), &Rgb([255, 0, 0]));
        assert_eq!(raster.get_pixel(0, 1), &Rgb([0, 0, 255]));

        let wrong = Array3::<f64>::zeros((2, 2, 4));
        assert!(image_to_rgb8(wrong.view()).is_err());
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn test_image_wider_than_u32_is_rejected() {
        // no rows, so the array holds no elements despite its width
        let cols = u32::MAX as usize + 1;
        let wide = Array3::<f64>::zeros((0, cols, 3));

        assert!(matches!(
            image_to_rgb8(wide.view()),
            Err(FluxIoError::TooLarge { rows: 0, cols: c }) if c == cols
        ));
    }

    #[test]
    fn test_encode_png_signature() {
        let raster = RgbImage::from_pixel(4, 4, Rgb([10, 20, 30]));
        let bytes = encode_png(&raster).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }
}
