//! Suppression of the polar seam along the vertical midline.
//!
//! Rays launched close to the polar axis of the observer's spherical
//! coordinates pile up in a thin band of columns around the image centre.
//! Those columns are replaced by the average of the two columns just outside
//! the band.

use log::warn;
use ndarray::{s, Array3, Axis};

/// Default half-width of the suppressed band, in columns.
pub const DEFAULT_POLE_HALF_WIDTH: usize = 1;

/// Overwrite columns `middle - half_width ..= middle + half_width` of a
/// `[row, column, channel]` image with the mean of columns
/// `middle - half_width - 1` and `middle + half_width + 1`.
///
/// `middle` is `width / 2`. Returns `false` without touching the image when
/// the image is too narrow for both reference columns to exist.
pub fn suppress_polar_seam(image: &mut Array3<f64>, half_width: usize) -> bool {
    let width = image.len_of(Axis(1));
    let middle = width / 2;

    if middle < half_width + 1 || middle + half_width + 1 >= width {
        warn!(
            "Image width {} too narrow to suppress a seam of half-width {}, skipping",
            width, half_width
        );
        return false;
    }

    let left = image.slice(s![.., middle - half_width - 1, ..]).to_owned();
    let right = image.slice(s![.., middle + half_width + 1, ..]).to_owned();
    let reference = left / 2.0 + right / 2.0;

    for col in (middle - half_width)..=(middle + half_width) {
        image.slice_mut(s![.., col, ..]).assign(&reference);
    }
    true
}
