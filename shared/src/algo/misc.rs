//! Sample generation for lookup tables and colormaps.
//!
//! - **Even spacing**: `linspace`-style breakpoint generation
//! - **Stepped ranges**: half-open `arange`-style sample generation

/// `n` evenly spaced values from `start` to `stop`, both inclusive.
///
/// The last element is exactly `stop` regardless of rounding in the step.
pub fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n - 1) as f64;
            (0..n)
                .map(|i| {
                    if i == n - 1 {
                        stop
                    } else {
                        start + i as f64 * step
                    }
                })
                .collect()
        }
    }
}

/// Values `start, start + step, ...` strictly below `stop`.
///
/// Mirrors the half-open `arange` convention: the sample count is
/// `ceil((stop - start) / step)`. Returns an empty vector for a non-positive
/// step or an empty range.
pub fn arange(start: f64, stop: f64, step: f64) -> Vec<f64> {
    if step <= 0.0 || stop <= start {
        return Vec::new();
    }
    let count = ((stop - start) / step).ceil() as usize;
    (0..count).map(|i| start + i as f64 * step).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_linspace_endpoints() {
        let pts = linspace(0.0, 1.0, 51);
        assert_eq!(pts.len(), 51);
        assert_eq!(pts[0], 0.0);
        assert_eq!(pts[50], 1.0);
        assert_relative_eq!(pts[25], 0.5, epsilon = 1e-12);

        assert!(linspace(0.0, 1.0, 0).is_empty());
        assert_eq!(linspace(3.0, 4.0, 1), vec![3.0]);
    }

    #[test]
    fn test_arange_half_open() {
        let temps = arange(1000.0, 6050.0, 100.0);
        assert_eq!(temps.len(), 51);
        assert_eq!(temps[0], 1000.0);
        assert_eq!(temps[50], 6000.0);

        // stop itself is excluded
        assert_eq!(arange(0.0, 3.0, 1.0), vec![0.0, 1.0, 2.0]);
        assert!(arange(1.0, 1.0, 1.0).is_empty());
        assert!(arange(0.0, 1.0, 0.0).is_empty());
    }
}
