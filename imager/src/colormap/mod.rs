//! Blackbody colormaps for optical and X-ray flux images.
//!
//! Colors come from an empirical blackbody table sampled every 100 units of
//! temperature from 1000 upwards. Between entries the color is linearly
//! interpolated; outside the table it fades to black with a Gaussian falloff.
//!
//! # Colormaps
//!
//! A [`Colormap`] is a piecewise-linear function from `[0, 1]` to RGB built
//! from breakpoints sampled off the table. The X-ray variant passes each
//! sampled color through the same channel remap applied to X-ray flux maps, so
//! a legend matches the colors in the rendered image.
//!
//! # Bands
//!
//! [`Band`] ties a colormap to the physical energy range and label shown on
//! its colorbar: optical in eV, X-ray in keV after the inverse-Compton boost
//! of the corona electrons.

pub mod table;

use shared::algo::misc::{arange, linspace};
use shared::image_proc::flux_map::remap_xray_pixel;

use crate::physics::{BOLTZMANN_EV_PER_K, XRAY_ENERGY_RESCALE};
use table::{BLACKBODY_RGB, TABLE_START, TABLE_STEP};

/// Width parameter of the Gaussian falloff outside the table, in squared table steps.
pub const FALLOFF_SIGMA: f64 = 1000.0;

/// Lowest temperature sampled into a colormap.
pub const COLORMAP_MIN_TEMP: f64 = 1000.0;

/// Colormap samples stop below this temperature (half of the table's span
/// measured from zero).
pub const COLORMAP_MAX_TEMP: f64 = (BLACKBODY_RGB.len() as f64 + 10.0) * 100.0 / 2.0;

/// RGB triple with channels nominally in `[0, 1]`.
pub type Rgb = [f64; 3];

fn entry(index: usize) -> Rgb {
    BLACKBODY_RGB[index].map(|c| c as f64 / 255.0)
}

/// Color of a blackbody at `temp`.
///
/// Inside the table the two bracketing entries are blended linearly. Below the
/// first entry the first color is scaled by `exp(-i^2 / FALLOFF_SIGMA)` where
/// `i` is the (negative) fractional table index. Above the table the last
/// color is scaled by `exp(-(i - len - 1)^2 / FALLOFF_SIGMA)`.
pub fn temperature_to_rgb(temp: f64) -> Rgb {
    let len = BLACKBODY_RGB.len();
    let float_index = temp / TABLE_STEP - TABLE_START / TABLE_STEP;

    if float_index < 0.0 {
        let falloff = (-float_index * float_index / FALLOFF_SIGMA).exp();
        return entry(0).map(|c| c * falloff);
    }
    if float_index > len as f64 - 2.0 {
        let offset = float_index - len as f64 - 1.0;
        let falloff = (-offset * offset / FALLOFF_SIGMA).exp();
        return entry(len - 1).map(|c| c * falloff);
    }

    let index = float_index.floor() as usize;
    let frac = float_index - index as f64;
    let (lo, hi) = (BLACKBODY_RGB[index], BLACKBODY_RGB[index + 1]);
    [0, 1, 2].map(|ch| (hi[ch] as f64 * frac + lo[ch] as f64 * (1.0 - frac)) / 255.0)
}

/// Energy band of a flux map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Band {
    Optical,
    Xray,
}

impl Band {
    pub fn is_xray(self) -> bool {
        matches!(self, Band::Xray)
    }

    /// Colorbar label, in the band's display unit.
    pub fn label(self) -> &'static str {
        match self {
            Band::Optical => "Optical Energy (eV)",
            Band::Xray => "X-ray Energy (keV)",
        }
    }

    /// File-name suffix for renders of this band alone.
    pub fn suffix(self) -> &'static str {
        match self {
            Band::Optical => "optical",
            Band::Xray => "xray",
        }
    }

    /// Physical energy range spanned by the colormap, in the band's display unit.
    pub fn energy_range(self) -> (f64, f64) {
        let scale = match self {
            Band::Optical => 1.0,
            // eV boosted by gamma_e^2, shown in keV
            Band::Xray => XRAY_ENERGY_RESCALE / 1000.0,
        };
        (
            COLORMAP_MIN_TEMP * BOLTZMANN_EV_PER_K * scale,
            COLORMAP_MAX_TEMP * BOLTZMANN_EV_PER_K * scale,
        )
    }

    pub fn colormap(self) -> Colormap {
        Colormap::blackbody(self)
    }
}

/// Continuous piecewise-linear map from `[0, 1]` to RGB.
#[derive(Debug, Clone, PartialEq)]
pub struct Colormap {
    name: String,
    positions: Vec<f64>,
    channels: [Vec<f64>; 3],
}

impl Colormap {
    /// Build a colormap through `colors` at evenly spaced positions.
    ///
    /// The positions ascend from exactly 0 to exactly 1, one per color, which
    /// is all [`Colormap::eval`] relies on.
    ///
    /// # Panics
    /// Panics with fewer than two colors.
    pub fn from_colors(name: impl Into<String>, colors: &[Rgb]) -> Self {
        assert!(colors.len() >= 2, "A colormap needs at least two colors");

        let positions = linspace(0.0, 1.0, colors.len());
        let channels = [0, 1, 2].map(|ch| colors.iter().map(|c| c[ch]).collect());
        Self {
            name: name.into(),
            positions,
            channels,
        }
    }

    /// Blackbody colormap sampled every table step from [`COLORMAP_MIN_TEMP`]
    /// up to (excluding) [`COLORMAP_MAX_TEMP`].
    pub fn blackbody(band: Band) -> Self {
        let colors: Vec<Rgb> = arange(COLORMAP_MIN_TEMP, COLORMAP_MAX_TEMP, TABLE_STEP)
            .into_iter()
            .map(temperature_to_rgb)
            .map(|rgb| if band.is_xray() { remap_xray_pixel(rgb) } else { rgb })
            .collect();

        let name = match band {
            Band::Optical => "thermal",
            Band::Xray => "thermal-xray",
        };
        Self::from_colors(name, &colors)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Breakpoint positions in `[0, 1]`, ascending.
    pub fn positions(&self) -> &[f64] {
        &self.positions
    }

    /// Color at breakpoint `index`.
    pub fn breakpoint(&self, index: usize) -> Rgb {
        [0, 1, 2].map(|ch| self.channels[ch][index])
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Color at `position`, clamped to `[0, 1]`.
    pub fn eval(&self, position: f64) -> Rgb {
        let x = if position.is_nan() {
            0.0
        } else {
            position.clamp(0.0, 1.0)
        };

        let last = self.positions.len() - 1;
        // index of the first breakpoint above x
        let upper = self.positions.partition_point(|&p| p <= x);
        if upper > last {
            return self.breakpoint(last);
        }
        let upper = upper.max(1);
        let (x0, x1) = (self.positions[upper - 1], self.positions[upper]);
        let t = (x - x0) / (x1 - x0);
        [0, 1, 2].map(|ch| {
            let (y0, y1) = (self.channels[ch][upper - 1], self.channels[ch][upper]);
            y0 + t * (y1 - y0)
        })
    }

    /// 8-bit form of [`Colormap::eval`].
    pub fn eval_u8(&self, position: f64) -> [u8; 3] {
        self.eval(position)
            .map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn temp_at(float_index: f64) -> f64 {
        (float_index + 10.0) * 100.0
    }

    #[test]
    fn test_table_entries_are_exact() {
        assert_eq!(temperature_to_rgb(1000.0), entry(0));
        assert_eq!(temperature_to_rgb(6600.0), entry(56));
        assert_eq!(temperature_to_rgb(11900.0), entry(109));
    }

    #[test]
    fn test_interpolates_between_entries() {
        let rgb = temperature_to_rgb(1050.0);
        assert_relative_eq!(rgb[0], 1.0, epsilon = 1e-12);
        assert_relative_eq!(rgb[1], (56.0 + 71.0) / 2.0 / 255.0, epsilon = 1e-12);
        assert_relative_eq!(rgb[2], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_lookup_is_continuous_at_every_interior_entry() {
        for i in 0..(BLACKBODY_RGB.len() - 2) {
            let at = temperature_to_rgb(temp_at((i + 1) as f64));
            for eps in [1e-3, 1e-6, 1e-9] {
                let below = temperature_to_rgb(temp_at((i + 1) as f64 - eps));
                for ch in 0..3 {
                    assert!(
                        (below[ch] - at[ch]).abs() <= eps * 1.01 + 1e-12,
                        "discontinuity at entry {} channel {}",
                        i + 1,
                        ch
                    );
                }
            }
        }
    }

    #[test]
    fn test_falloff_below_table_decreases_to_black() {
        let mut previous = temperature_to_rgb(999.0);
        for temp in [900.0, 500.0, 0.0, -2000.0, -10000.0] {
            let rgb = temperature_to_rgb(temp);
            assert!(rgb[0] < previous[0]);
            assert!(rgb[1] < previous[1]);
            // first entry has no blue
            assert_eq!(rgb[2], 0.0);
            previous = rgb;
        }
        let far = temperature_to_rgb(-50000.0);
        assert!(far[0] < 1e-100);
    }

    #[test]
    fn test_falloff_above_table_keeps_offset() {
        let len = BLACKBODY_RGB.len() as f64;
        let float_index = 120.0;
        let rgb = temperature_to_rgb(temp_at(float_index));
        let falloff = (-(float_index - len - 1.0).powi(2) / FALLOFF_SIGMA).exp();
        let last = entry(BLACKBODY_RGB.len() - 1);
        for ch in 0..3 {
            assert_relative_eq!(rgb[ch], last[ch] * falloff, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_blackbody_colormap_breakpoints() {
        let cmap = Colormap::blackbody(Band::Optical);
        assert_eq!(cmap.len(), 51);
        assert_eq!(cmap.positions()[0], 0.0);
        assert_eq!(cmap.positions()[50], 1.0);
        assert_eq!(cmap.breakpoint(0), temperature_to_rgb(1000.0));
        assert_eq!(cmap.breakpoint(50), temperature_to_rgb(6000.0));
        assert_eq!(cmap.eval(0.0), cmap.breakpoint(0));
        assert_eq!(cmap.eval(1.0), cmap.breakpoint(50));
    }

    #[test]
    fn test_colormap_is_piecewise_linear_and_continuous() {
        let cmap = Colormap::blackbody(Band::Optical);
        let positions = cmap.positions().to_vec();

        for k in 1..positions.len() - 1 {
            let at = cmap.eval(positions[k]);
            let just_below = cmap.eval(positions[k] - 1e-9);
            let just_above = cmap.eval(positions[k] + 1e-9);
            for ch in 0..3 {
                assert_relative_eq!(at[ch], cmap.breakpoint(k)[ch], epsilon = 1e-12);
                assert_relative_eq!(just_below[ch], at[ch], epsilon = 1e-6);
                assert_relative_eq!(just_above[ch], at[ch], epsilon = 1e-6);
            }

            let mid = cmap.eval((positions[k] + positions[k + 1]) / 2.0);
            let (a, b) = (cmap.breakpoint(k), cmap.breakpoint(k + 1));
            for ch in 0..3 {
                assert_relative_eq!(mid[ch], (a[ch] + b[ch]) / 2.0, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_xray_colormap_is_remapped_optical() {
        let optical = Colormap::blackbody(Band::Optical);
        let xray = Colormap::blackbody(Band::Xray);
        assert_eq!(xray.len(), optical.len());

        for k in 0..optical.len() {
            let [r, g, b] = optical.breakpoint(k);
            assert_eq!(xray.breakpoint(k), [g, b / 2.0, r]);
        }
    }

    #[test]
    fn test_eval_between_custom_colors() {
        let cmap = Colormap::from_colors(
            "ramp",
            &[[0.0, 0.0, 1.0], [1.0, 0.5, 0.0], [0.0, 1.0, 0.0]],
        );
        assert_eq!(cmap.positions(), &[0.0, 0.5, 1.0]);

        let quarter = cmap.eval(0.25);
        assert_relative_eq!(quarter[0], 0.5);
        assert_relative_eq!(quarter[1], 0.25);
        assert_relative_eq!(quarter[2], 0.5);

        let three_quarters = cmap.eval(0.75);
        assert_relative_eq!(three_quarters[0], 0.5);
        assert_relative_eq!(three_quarters[1], 0.75);
        assert_relative_eq!(three_quarters[2], 0.0);

        assert_eq!(cmap.eval(0.0), [0.0, 0.0, 1.0]);
        assert_eq!(cmap.eval(0.5), [1.0, 0.5, 0.0]);
        assert_eq!(cmap.eval(1.0), [0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_eval_clamps() {
        let cmap = Colormap::blackbody(Band::Xray);
        assert_eq!(cmap.eval(-3.0), cmap.eval(0.0));
        assert_eq!(cmap.eval(7.0), cmap.eval(1.0));
        assert_eq!(cmap.eval(f64::NAN), cmap.eval(0.0));
    }

    #[test]
    fn test_band_energy_ranges() {
        let (lo, hi) = Band::Optical.energy_range();
        assert_relative_eq!(lo, 0.0861733326, epsilon = 1e-12);
        assert_relative_eq!(hi, 0.52134866223, epsilon = 1e-10);

        let (lo, hi) = Band::Xray.energy_range();
        assert_relative_eq!(lo, 2.904813421680096, epsilon = 1e-9);
        assert_relative_eq!(hi, 17.574121201164576, epsilon = 1e-9);
    }

    #[test]
    #[should_panic(expected = "at least two colors")]
    fn test_single_color_colormap_panics() {
        Colormap::from_colors("flat", &[[1.0, 1.0, 1.0]]);
    }
}
