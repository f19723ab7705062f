//! Repair of unsampled (NaN) pixels in image-layout arrays.
//!
//! The ray tracer leaves NaN wherever no photon landed in a pixel. Each such
//! pixel is replaced by the NaN-aware mean of its 4-connected neighbours in a
//! single in-place row-major pass. Pixels repaired earlier in the pass feed
//! the means of later ones; there is no iteration to a fixed point.

use ndarray::{Array3, Axis};

use crate::algo::stats::nan_mean;

/// Outcome of a repair pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RepairSummary {
    /// Pixels with at least one NaN channel before the pass
    pub damaged: usize,
    /// Pixels overwritten with a neighbour mean
    pub repaired: usize,
    /// Pixels still holding a NaN channel after the pass
    pub remaining: usize,
}

/// Replace NaN pixels of a `[row, column, channel]` image with the mean of
/// their right, left, lower and upper neighbours.
///
/// Pixels in the last row or last column are skipped. Neighbours that fall
/// outside the image are ignored, as are NaN neighbour channels; a channel
/// whose neighbours are all NaN stays NaN.
pub fn repair_nan_pixels(image: &mut Array3<f64>) -> RepairSummary {
    let (rows, cols, channels) = image.dim();

    let damaged: Vec<(usize, usize)> = image
        .lanes(Axis(2))
        .into_iter()
        .enumerate()
        .filter(|(_, pixel)| pixel.iter().any(|v| v.is_nan()))
        .map(|(idx, _)| (idx / cols, idx % cols))
        .collect();

    let mut summary = RepairSummary {
        damaged: damaged.len(),
        ..Default::default()
    };

    for &(row, col) in &damaged {
        if row + 1 >= rows || col + 1 >= cols {
            continue;
        }

        // neighbours off the top or left edge are dropped, never wrapped
        let mut neighbours = vec![(row, col + 1), (row + 1, col)];
        if col > 0 {
            neighbours.push((row, col - 1));
        }
        if row > 0 {
            neighbours.push((row - 1, col));
        }

        for channel in 0..channels {
            let mean = nan_mean(neighbours.iter().map(|&(r, c)| image[[r, c, channel]]));
            image[[row, col, channel]] = mean;
        }
        summary.repaired += 1;
    }

    summary.remaining = damaged
        .iter()
        .filter(|&&(r, c)| (0..channels).any(|ch| image[[r, c, ch]].is_nan()))
        .count();

    summary
}
