//! Percentile-clip normalisation of flux images.
//!
//! Every value is divided by `max(p, 1)` where `p` is the requested
//! percentile of the finite values. Bright outliers above the percentile end
//! up above 1 and are clipped at rasterisation, not rescaled here.

use ndarray::Array3;

use crate::algo::stats::{finite_percentile, StatsError};

/// Divide `image` in place by `max(percentile of finite values, 1)`.
///
/// # Arguments
/// * `image` - Array to normalise; NaN and infinite values are excluded from the
///   percentile but still divided
/// * `percentile` - Clip percentile in `[0, 100]`, e.g. 90.0 or 99.5
///
/// # Returns
/// * `Ok(divisor)` - The divisor that was applied (1.0 when the image has no
///   finite values, leaving it unchanged)
/// * `Err(StatsError::InvalidPercentile)` - If `percentile` is outside `[0, 100]`
///
/// # Examples
/// ```
/// use ndarray::Array3;
/// use shared::image_proc::normalize::normalize_by_percentile;
///
/// let mut image = Array3::from_shape_vec((1, 4, 1), vec![0.0, 10.0, 20.0, 40.0]).unwrap();
/// let divisor = normalize_by_percentile(&mut image, 100.0).unwrap();
/// assert_eq!(divisor, 40.0);
/// assert_eq!(image[[0, 3, 0]], 1.0);
/// ```
pub fn normalize_by_percentile(
    image: &mut Array3<f64>,
    percentile: f64,
) -> Result<f64, StatsError> {
    let max_val = match finite_percentile(image.iter().copied(), percentile) {
        Ok(value) => value,
        Err(StatsError::NoFiniteData(_)) => return Ok(1.0),
        Err(e) => return Err(e),
    };

    let divisor = max_val.max(1.0);
    image.mapv_inplace(|v| v / divisor);
    Ok(divisor)
}
