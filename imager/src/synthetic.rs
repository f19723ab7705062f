//! Synthetic flux maps for exercising the pipeline without ray-tracer output.
//!
//! The optical map is an inclined ring with a Doppler-brightened approaching
//! side; the X-ray map is a compact corona at the centre. Both carry the
//! artifacts the compositor has to clean up: scattered NaN pixels and a
//! bright seam along the vertical midline.

use ndarray::Array3;
use shared::image_proc::{FluxMap, FluxMapError, CHANNELS};

/// Shape and brightness of a synthetic dataset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SyntheticDisk {
    pub rows: usize,
    pub cols: usize,
    /// Ring radius as a fraction of half the image width.
    pub ring_radius: f64,
    /// Cosine of the viewing inclination; squashes the ring vertically.
    pub inclination_cos: f64,
    pub optical_peak: f64,
    pub corona_peak: f64,
    /// Every `nan_stride`-th pixel in a scrambled order is left unsampled.
    pub nan_stride: usize,
    /// Flux multiplier of the midline columns.
    pub seam_gain: f64,
}

impl Default for SyntheticDisk {
    fn default() -> Self {
        Self {
            rows: 90,
            cols: 160,
            ring_radius: 0.6,
            inclination_cos: 0.35,
            optical_peak: 400.0,
            corona_peak: 60.0,
            nan_stride: 97,
            seam_gain: 4.0,
        }
    }
}

// relative weight of the three channels, warm for the disk and hot for the corona
const DISK_TINT: [f64; CHANNELS] = [1.0, 0.55, 0.25];
const CORONA_TINT: [f64; CHANNELS] = [0.3, 1.0, 0.8];

impl SyntheticDisk {
    /// `(optical, xray)` flux maps in `[channel, row, column]` layout.
    pub fn generate(&self) -> Result<(FluxMap, FluxMap), FluxMapError> {
        let (rows, cols) = (self.rows, self.cols);
        let cx = cols as f64 / 2.0;
        let cy = rows as f64 / 2.0;
        let half_width = (cols as f64 / 2.0).max(1.0);
        let ring = self.ring_radius * half_width;
        let ring_width = (0.12 * half_width).max(1.0);
        let corona_width = (0.15 * half_width).max(1.0);
        let middle = cols / 2;

        let mut optical = Array3::zeros((CHANNELS, rows, cols));
        let mut xray = Array3::zeros((CHANNELS, rows, cols));

        for r in 0..rows {
            for c in 0..cols {
                let dx = c as f64 + 0.5 - cx;
                let dy = (r as f64 + 0.5 - cy) / self.inclination_cos;
                let radius = dx.hypot(dy);

                // approaching side (positive x) is brighter
                let doppler = 1.0 + 0.5 * (dx / half_width).clamp(-1.0, 1.0);
                let disk = self.optical_peak
                    * doppler
                    * (-((radius - ring) / ring_width).powi(2)).exp();
                let corona = self.corona_peak * (-(radius / corona_width).powi(2)).exp();

                let seam = if c.abs_diff(middle) <= 1 {
                    self.seam_gain
                } else {
                    1.0
                };
                let unsampled = self.nan_stride > 0 && (r * 31 + c * 17) % self.nan_stride == 0;

                for ch in 0..CHANNELS {
                    if unsampled {
                        optical[[ch, r, c]] = f64::NAN;
                        xray[[ch, r, c]] = f64::NAN;
                    } else {
                        optical[[ch, r, c]] = disk * DISK_TINT[ch] * seam;
                        xray[[ch, r, c]] = corona * CORONA_TINT[ch] * seam;
                    }
                }
            }
        }

        Ok((FluxMap::new(optical)?, FluxMap::new(xray)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_shapes_and_artifacts() {
        let disk = SyntheticDisk {
            rows: 30,
            cols: 50,
            ..Default::default()
        };
        let (optical, xray) = disk.generate().unwrap();

        assert_eq!(optical.dim(), (3, 30, 50));
        assert_eq!(xray.dim(), optical.dim());

        let nan_count = optical.view().iter().filter(|v| v.is_nan()).count();
        assert!(nan_count > 0);
        assert_eq!(nan_count % 3, 0);

        // corona peaks in the centre
        let centre = xray.view()[[1, 15, 20]];
        let corner = xray.view()[[1, 1, 1]];
        assert!(centre > corner);
    }

    #[test]
    fn test_no_nan_when_stride_is_zero() {
        let disk = SyntheticDisk {
            rows: 10,
            cols: 12,
            nan_stride: 0,
            ..Default::default()
        };
        let (optical, _) = disk.generate().unwrap();
        assert!(optical.view().iter().all(|v| v.is_finite()));
    }
}
