//! Channel-major flux maps and their band remapping.
//!
//! A flux map is a `[channel, row, column]` array of photon flux with exactly
//! three channels. NaN marks pixels the ray tracer never sampled; those are
//! left in place here and repaired later in image layout.
//!
//! # Layouts
//!
//! - **Flux layout** `[channel, row, column]`: what the ray tracer writes to disk
//! - **Image layout** `[row, column, channel]`: what the compositor operates on,
//!   flipped vertically so row 0 is the top of the rendered picture

use ndarray::{s, Array3, ArrayView3, Axis};
use thiserror::Error;

/// Number of color channels every flux map carries.
pub const CHANNELS: usize = 3;

/// Output channel `i` of the X-ray remap takes input channel `XRAY_CHANNEL_ORDER[i]`.
pub const XRAY_CHANNEL_ORDER: [usize; CHANNELS] = [1, 2, 0];

/// Output channel of the X-ray remap that is halved after permutation.
pub const XRAY_HALVED_CHANNEL: usize = 1;

/// Errors raised when an array does not have the shape of a flux map
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FluxMapError {
    #[error("Flux map must have {expected} channels, found {found}")]
    ChannelCount { expected: usize, found: usize },
    #[error("Flux map shapes differ: {left:?} vs {right:?}")]
    ShapeMismatch {
        left: (usize, usize, usize),
        right: (usize, usize, usize),
    },
}

/// A three-channel flux map in `[channel, row, column]` layout.
#[derive(Debug, Clone, PartialEq)]
pub struct FluxMap {
    data: Array3<f64>,
}

impl FluxMap {
    /// Wrap a channel-major array, rejecting anything without exactly three channels.
    pub fn new(data: Array3<f64>) -> Result<Self, FluxMapError> {
        let found = data.len_of(Axis(0));
        if found != CHANNELS {
            return Err(FluxMapError::ChannelCount {
                expected: CHANNELS,
                found,
            });
        }
        Ok(Self { data })
    }

    /// Map of `rows` x `cols` pixels with every channel set to `value`.
    pub fn from_elem(rows: usize, cols: usize, value: f64) -> Self {
        Self {
            data: Array3::from_elem((CHANNELS, rows, cols), value),
        }
    }

    /// `(channels, rows, cols)`
    pub fn dim(&self) -> (usize, usize, usize) {
        self.data.dim()
    }

    pub fn rows(&self) -> usize {
        self.data.len_of(Axis(1))
    }

    pub fn cols(&self) -> usize {
        self.data.len_of(Axis(2))
    }

    pub fn view(&self) -> ArrayView3<'_, f64> {
        self.data.view()
    }

    pub fn data_mut(&mut self) -> &mut Array3<f64> {
        &mut self.data
    }

    pub fn into_inner(self) -> Array3<f64> {
        self.data
    }

    /// Re-project into the pseudo X-ray color space.
    ///
    /// Channels are permuted by [`XRAY_CHANNEL_ORDER`] and the channel that
    /// lands at [`XRAY_HALVED_CHANNEL`] of the output is halved. The input is
    /// left untouched.
    pub fn to_xray(&self) -> FluxMap {
        let mut data = self.data.select(Axis(0), &XRAY_CHANNEL_ORDER);
        data.index_axis_mut(Axis(0), XRAY_HALVED_CHANNEL)
            .mapv_inplace(|v| v / 2.0);
        FluxMap { data }
    }

    /// `self + weight * other`, element by element.
    pub fn weighted_sum(&self, other: &FluxMap, weight: f64) -> Result<FluxMap, FluxMapError> {
        if self.dim() != other.dim() {
            return Err(FluxMapError::ShapeMismatch {
                left: self.dim(),
                right: other.dim(),
            });
        }
        Ok(FluxMap {
            data: &self.data + &(&other.data * weight),
        })
    }

    /// Convert to `[row, column, channel]` and flip vertically.
    ///
    /// Row 0 of the flux map becomes the bottom row of the image.
    pub fn to_image_layout(&self) -> Array3<f64> {
        let transposed = self.data.view().permuted_axes([1, 2, 0]);
        transposed
            .slice(s![..;-1, .., ..])
            .as_standard_layout()
            .into_owned()
    }
}

/// Per-pixel form of [`FluxMap::to_xray`] for a single RGB triple.
pub fn remap_xray_pixel(rgb: [f64; CHANNELS]) -> [f64; CHANNELS] {
    let mut out = XRAY_CHANNEL_ORDER.map(|src| rgb[src]);
    out[XRAY_HALVED_CHANNEL] /= 2.0;
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;

    fn ramp(rows: usize, cols: usize) -> FluxMap {
        FluxMap::new(Array3::from_shape_fn((CHANNELS, rows, cols), |(c, r, col)| {
            (c * 100 + r * 10 + col) as f64
        }))
        .unwrap()
    }

    #[test]
    fn test_rejects_wrong_channel_count() {
        let err = FluxMap::new(Array3::zeros((4, 2, 2))).unwrap_err();
        assert_eq!(
            err,
            FluxMapError::ChannelCount {
                expected: 3,
                found: 4
            }
        );
    }

    #[test]
    fn test_to_xray_permutes_and_halves() {
        let map = ramp(3, 5);
        let xray = map.to_xray();
        assert_eq!(xray.dim(), map.dim());

        let src = map.view();
        let out = xray.view();
        for r in 0..3 {
            for c in 0..5 {
                assert_eq!(out[[0, r, c]], src[[1, r, c]]);
                assert_eq!(out[[1, r, c]], src[[2, r, c]] * 0.5);
                assert_eq!(out[[2, r, c]], src[[0, r, c]]);
            }
        }

        // input untouched
        assert_eq!(map, ramp(3, 5));
    }

    #[test]
    fn test_remap_pixel_matches_array_remap() {
        let map = ramp(1, 1);
        let xray = map.to_xray();
        let rgb = [0.0, 100.0, 200.0];
        let remapped = remap_xray_pixel(rgb);
        assert_eq!(
            remapped,
            [xray.view()[[0, 0, 0]], xray.view()[[1, 0, 0]], xray.view()[[2, 0, 0]]]
        );
        assert_eq!(remapped, [100.0, 100.0, 0.0]);
    }

    #[test]
    fn test_to_image_layout_transposes_and_flips() {
        let map = ramp(2, 3);
        let image = map.to_image_layout();
        assert_eq!(image.dim(), (2, 3, CHANNELS));

        // top row of the image is the last row of the flux map
        assert_eq!(image[[0, 0, 0]], 10.0);
        assert_eq!(image[[0, 2, 1]], 112.0);
        assert_eq!(image[[1, 1, 2]], 201.0);
    }

    #[test]
    fn test_weighted_sum() {
        let a = FluxMap::from_elem(2, 2, 1.0);
        let b = FluxMap::from_elem(2, 2, 0.5);
        let sum = a.weighted_sum(&b, 10.0).unwrap();
        assert!(sum.view().iter().all(|&v| v == 6.0));

        let c = FluxMap::from_elem(2, 3, 0.5);
        assert!(matches!(
            a.weighted_sum(&c, 10.0),
            Err(FluxMapError::ShapeMismatch { .. })
        ));
    }
}
