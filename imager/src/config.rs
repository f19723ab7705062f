//! Batch configuration for the imager driver
//!
//! A [`BatchConfig`] lists the `process` and `together` runs to perform and
//! where flux maps are read from and composites written to. It is stored as
//! JSON; fields missing from a file take their default values, so a config
//! holding only `{"output_dir": "renders"}` runs the full default batch into
//! `renders/`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use shared::image_proc::DEFAULT_POLE_HALF_WIDTH;

use crate::compositor::{CompositorOptions, DEFAULT_TARGET_HEIGHT, DEFAULT_XRAY_WEIGHT};
use crate::error::ImagerError;

/// Clip percentile of the regular renders.
pub const LOW_FLUX_PERCENTILE: f64 = 90.0;
/// Clip percentile of the "bright-" renders.
pub const HIGH_FLUX_PERCENTILE: f64 = 99.5;

/// Render the two bands of `tag` separately.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessRun {
    pub tag: String,
    pub max_flux: f64,
    /// Inserted between `{tag}-` and the band suffix of the output names.
    #[serde(default)]
    pub extra_name: String,
}

impl ProcessRun {
    pub fn new(tag: &str, max_flux: f64, extra_name: &str) -> Self {
        Self {
            tag: tag.to_string(),
            max_flux,
            extra_name: extra_name.to_string(),
        }
    }
}

/// Render the weighted sum of both bands of `tag` as one image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TogetherRun {
    pub tag: String,
    pub max_flux: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    pub data_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Polar seam half-width in columns; `null` disables seam suppression.
    pub remove_pole: Option<usize>,
    pub xray_weight: f64,
    /// Rasters shorter than this many pixels are upscaled by a whole factor.
    pub target_height: u32,
    pub process: Vec<ProcessRun>,
    pub together: Vec<TogetherRun>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        let low = LOW_FLUX_PERCENTILE;
        let high = HIGH_FLUX_PERCENTILE;
        Self {
            data_dir: PathBuf::from("../data"),
            output_dir: PathBuf::from("../data"),
            remove_pole: Some(DEFAULT_POLE_HALF_WIDTH),
            xray_weight: DEFAULT_XRAY_WEIGHT,
            target_height: DEFAULT_TARGET_HEIGHT,
            process: vec![
                ProcessRun::new("flat", low, ""),
                ProcessRun::new("minkowski", low, ""),
                ProcessRun::new("thick", low, ""),
                ProcessRun::new("thick", high, "bright-"),
                ProcessRun::new("thin", low, ""),
                ProcessRun::new("thin", high, "bright-"),
                ProcessRun::new("schwarzschild", low, ""),
                ProcessRun::new("schwarzschild", high, "bright-"),
                ProcessRun::new("kerr", low, ""),
                ProcessRun::new("kerr", high, "bright-"),
            ],
            together: vec![
                TogetherRun {
                    tag: "schwarzschild".to_string(),
                    max_flux: 90.0,
                },
                TogetherRun {
                    tag: "kerr".to_string(),
                    max_flux: 98.0,
                },
            ],
        }
    }
}

impl BatchConfig {
    pub fn save_to_file(&self, path: &Path) -> Result<(), std::io::Error> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, json)
    }

    pub fn load_from_file(path: &Path) -> Result<Self, std::io::Error> {
        let json = std::fs::read_to_string(path)?;
        serde_json::from_str(&json)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }

    /// Check values serde cannot: percentiles in `[0, 100]`, a finite X-ray
    /// weight and a non-zero target height.
    pub fn validate(&self) -> Result<(), ImagerError> {
        if !self.xray_weight.is_finite() {
            return Err(ImagerError::Config(format!(
                "xray_weight must be finite, got {}",
                self.xray_weight
            )));
        }
        if self.target_height == 0 {
            return Err(ImagerError::Config("target_height must be positive".into()));
        }

        let percentiles = self
            .process
            .iter()
            .map(|r| (&r.tag, r.max_flux))
            .chain(self.together.iter().map(|r| (&r.tag, r.max_flux)));
        for (tag, max_flux) in percentiles {
            if !(0.0..=100.0).contains(&max_flux) {
                return Err(ImagerError::Config(format!(
                    "run {tag} has max_flux {max_flux} outside [0, 100]"
                )));
            }
        }
        Ok(())
    }

    /// Keep only the runs for `tag`.
    pub fn retain_tag(&mut self, tag: &str) {
        self.process.retain(|r| r.tag == tag);
        self.together.retain(|r| r.tag == tag);
    }

    pub fn compositor_options(&self) -> CompositorOptions {
        CompositorOptions {
            remove_pole: self.remove_pole,
            xray_weight: self.xray_weight,
            target_height: self.target_height,
        }
    }

    pub fn run_count(&self) -> usize {
        self.process.len() + self.together.len()
    }
}
