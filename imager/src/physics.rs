//! Physical scales of the accretion-disk model.
//!
//! The ray tracer works in dimensionless units: lengths in Schwarzschild radii
//! of a one-solar-mass hole, fluxes and temperatures in units of the scales
//! computed here. All inputs are CGS; energies are additionally reported in
//! electron-volts.
//!
//! # Derived scales
//!
//! - **Luminosity**: Eddington luminosity `4 pi G M m_p c / sigma_T`
//! - **Flux**: Eddington luminosity spread over a sphere of radius `r_s`
//! - **Temperature**: blackbody temperature radiating that flux
//! - **Scale height**: thermal disk thickness relative to radius
//! - **Corona height**: electron rest energy scale per unit temperature
//! - **Travel time**: `r_s sigma_T / m_e`, multiplies density to give optical depth
//! - **Optical depth**: fixed estimate for the corona model

use std::f64::consts::PI;
use std::fmt;

/// Boltzmann constant in electron-volts per kelvin.
pub const BOLTZMANN_EV_PER_K: f64 = 8.61733326e-5;

/// Proton to electron mass ratio, rounded as the corona model uses it.
pub const PROTON_ELECTRON_MASS_RATIO: f64 = 1836.0;

/// `gamma - 1` of protons heated in the corona.
pub const CORONA_PROTON_GAMMA_MINUS_ONE: f64 = 0.1;

/// Lorentz factor of corona electrons sharing the proton kinetic energy.
pub const CORONA_ELECTRON_GAMMA: f64 = PROTON_ELECTRON_MASS_RATIO * CORONA_PROTON_GAMMA_MINUS_ONE;

/// Inverse-Compton boost (`gamma_e^2`) from disk photon energies to X-ray energies.
pub const XRAY_ENERGY_RESCALE: f64 = CORONA_ELECTRON_GAMMA * CORONA_ELECTRON_GAMMA;

/// Fundamental constants in CGS units, rounded as in the model write-up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicalConstants {
    /// g
    pub solar_mass: f64,
    /// cm^2
    pub thomson_cross_section: f64,
    /// erg cm^-2 s^-1 K^-4
    pub stefan_boltzmann: f64,
    /// cm / s
    pub speed_of_light: f64,
    /// cm^3 g^-1 s^-2
    pub gravitational_constant: f64,
    /// g
    pub proton_mass: f64,
    /// g
    pub electron_mass: f64,
    /// erg / K
    pub boltzmann: f64,
    pub ev_per_erg: f64,
}

impl Default for PhysicalConstants {
    fn default() -> Self {
        Self {
            solar_mass: 2e33,
            thomson_cross_section: 6.652e-25,
            stefan_boltzmann: 5.670374e-5,
            speed_of_light: 3e10,
            gravitational_constant: 6.67e-8,
            proton_mass: 1.67262192e-24,
            electron_mass: 9.1093837e-28,
            boltzmann: 1.3807e-16,
            ev_per_erg: 6.242e11,
        }
    }
}

/// Dimensionful scales derived from [`PhysicalConstants`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccretionScales {
    /// erg / s
    pub luminosity: f64,
    /// cm
    pub schwarzschild_radius: f64,
    /// erg / s / cm^2
    pub flux: f64,
    /// erg
    pub temperature: f64,
    /// dimensionless
    pub scale_height: f64,
    /// eV per eV of temperature
    pub corona_height_ev: f64,
    /// cm^3 / g
    pub travel_time: f64,
    /// dimensionless
    pub optical_depth: f64,
    ev_per_erg: f64,
}

/// Opacity coefficient of the corona optical-depth estimate.
const CORONA_OPACITY: f64 = 3.7e-3;
/// Column scale of the corona optical-depth estimate.
const CORONA_COLUMN: f64 = 250.0;
/// Density scale entering the optical-depth estimate at the -1/8 power.
const CORONA_DENSITY_SCALE: f64 = 2.4e12;

impl AccretionScales {
    pub fn from_constants(c: &PhysicalConstants) -> Self {
        let luminosity = 4.0 * PI * c.gravitational_constant * c.solar_mass * c.proton_mass
            * c.speed_of_light
            / c.thomson_cross_section;

        let schwarzschild_radius =
            2.0 * c.gravitational_constant * c.solar_mass / c.speed_of_light.powi(2);
        let flux = luminosity / (4.0 * PI * schwarzschild_radius.powi(2));

        let temperature = c.boltzmann * (flux / c.stefan_boltzmann).powf(0.25);
        let scale_height =
            (4.0 * temperature / (c.proton_mass * c.speed_of_light.powi(2))).sqrt();

        let corona_height_ev = c.electron_mass * c.speed_of_light.powi(2) / 2.0 * c.ev_per_erg;
        let travel_time = schwarzschild_radius * c.thomson_cross_section / c.electron_mass;

        let optical_depth =
            CORONA_OPACITY * CORONA_COLUMN * CORONA_DENSITY_SCALE.powf(-1.0 / 8.0) * 2.0;

        Self {
            luminosity,
            schwarzschild_radius,
            flux,
            temperature,
            scale_height,
            corona_height_ev,
            travel_time,
            optical_depth,
            ev_per_erg: c.ev_per_erg,
        }
    }

    /// Temperature scale in electron-volts.
    pub fn temperature_ev(&self) -> f64 {
        self.temperature * self.ev_per_erg
    }

    /// One line per quantity, with units.
    pub fn report_lines(&self) -> Vec<String> {
        vec![
            format!("Luminosity {} erg / s", self.luminosity),
            format!("Flux {} erg / s / cm^2", self.flux),
            format!("Temp scale {} eV", self.temperature_ev()),
            format!("Scale height scale {}", self.scale_height),
            format!("Corona height scale {} / temp in eV", self.corona_height_ev),
            format!("Travel scale {} cm^3 / g", self.travel_time),
            format!("Optical depth {}", self.optical_depth),
        ]
    }
}

impl Default for AccretionScales {
    fn default() -> Self {
        Self::from_constants(&PhysicalConstants::default())
    }
}

impl fmt::Display for AccretionScales {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.report_lines() {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_scales() {
        let scales = AccretionScales::default();

        assert_relative_eq!(scales.luminosity, 1.2645397677626713e38, max_relative = 1e-12);
        assert_relative_eq!(scales.schwarzschild_radius, 296444.4444444444, max_relative = 1e-12);
        assert_relative_eq!(scales.flux, 1.1450804397861206e26, max_relative = 1e-12);
        assert_relative_eq!(scales.temperature_ev(), 3248.846272552306, max_relative = 1e-12);
        assert_relative_eq!(scales.scale_height, 0.0037188832792850865, max_relative = 1e-12);
        assert_relative_eq!(scales.corona_height_ev, 255873.47874929997, max_relative = 1e-12);
        assert_relative_eq!(scales.travel_time, 216474408.08146486, max_relative = 1e-12);
        assert_relative_eq!(scales.optical_depth, 0.052437903884862434, max_relative = 1e-12);
    }

    #[test]
    fn test_luminosity_scales_with_mass() {
        let heavy = PhysicalConstants {
            solar_mass: 2e34,
            ..Default::default()
        };
        let base = AccretionScales::default();
        let scaled = AccretionScales::from_constants(&heavy);

        assert_relative_eq!(scaled.luminosity / base.luminosity, 10.0, max_relative = 1e-12);
        // flux falls as 1/M since r_s grows linearly with M
        assert_relative_eq!(scaled.flux / base.flux, 0.1, max_relative = 1e-12);
    }

    #[test]
    fn test_corona_constants() {
        assert_relative_eq!(CORONA_ELECTRON_GAMMA, 183.6, epsilon = 1e-12);
        assert_relative_eq!(XRAY_ENERGY_RESCALE, 33708.96, max_relative = 1e-12);
    }

    #[test]
    fn test_report_has_a_line_per_quantity() {
        let report = AccretionScales::default().to_string();
        let lines: Vec<&str> = report.lines().collect();

        assert_eq!(lines.len(), 7);
        assert!(lines[0].starts_with("Luminosity "));
        assert!(lines[0].ends_with(" erg / s"));
        assert!(lines[2].starts_with("Temp scale "));
        assert!(lines[6].starts_with("Optical depth "));
    }
}
