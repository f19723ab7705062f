//! NaN-aware statistics over flux samples

use thiserror::Error;

/// Errors from the NaN-aware statistics helpers
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StatsError {
    #[error("Percentile must be between 0 and 100, got {0}")]
    InvalidPercentile(f64),
    #[error("No finite values among {0} samples")]
    NoFiniteData(usize),
}

/// Mean of the non-NaN values, or NaN if every value is NaN.
///
/// Infinite values take part in the mean; only NaN marks a missing sample.
pub fn nan_mean<I>(values: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    let (sum, count) = values
        .into_iter()
        .filter(|v| !v.is_nan())
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));

    if count == 0 {
        f64::NAN
    } else {
        sum / count as f64
    }
}

/// Percentile of the finite values using linear interpolation between order
/// statistics.
///
/// The rank of the requested percentile is `p / 100 * (n - 1)`; values between
/// two order statistics are linearly interpolated.
///
/// # Arguments
/// * `values` - Samples to rank; NaN and infinite values are ignored
/// * `percentile` - Requested percentile in `[0, 100]`
///
/// # Returns
/// * `Ok(value)` - The interpolated percentile
/// * `Err(StatsError::InvalidPercentile)` - If `percentile` is out of range or NaN
/// * `Err(StatsError::NoFiniteData)` - If no finite values remain
///
/// # Examples
/// ```
/// use shared::algo::stats::finite_percentile;
///
/// let p = finite_percentile([1.0, f64::NAN, 3.0, 2.0, 4.0], 50.0).unwrap();
/// assert_eq!(p, 2.5);
/// ```
pub fn finite_percentile<I>(values: I, percentile: f64) -> Result<f64, StatsError>
where
    I: IntoIterator<Item = f64>,
{
    if !(0.0..=100.0).contains(&percentile) {
        return Err(StatsError::InvalidPercentile(percentile));
    }

    let mut total = 0usize;
    let mut finite: Vec<f64> = values
        .into_iter()
        .inspect(|_| total += 1)
        .filter(|v| v.is_finite())
        .collect();

    if finite.is_empty() {
        return Err(StatsError::NoFiniteData(total));
    }

    finite.sort_by(f64::total_cmp);

    let rank = percentile / 100.0 * (finite.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let frac = rank - lower as f64;

    if lower == upper {
        Ok(finite[lower])
    } else {
        Ok(finite[lower] + (finite[upper] - finite[lower]) * frac)
    }
}

/// Largest finite value, or `None` when there is none.
pub fn finite_max<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold(None, |acc: Option<f64>, v| {
            Some(acc.map_or(v, |m| m.max(v)))
        })
}
