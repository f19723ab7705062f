//! False-color composites of optical and X-ray flux maps.
//!
//! A dataset is a pair of flux maps `{tag}-optical.npy` / `{tag}-xray.npy`.
//! Each band is prepared by [`prepare`]:
//!
//! 1. transpose to `[row, column, channel]` and flip vertically
//! 2. repair NaN pixels from their 4-connected neighbours
//! 3. divide by the clip percentile of the finite values (at least 1)
//! 4. overwrite the polar seam about the vertical midline
//!
//! and then rasterised with a colorbar legend to `{name}.png` and `{name}.svg`.
//! [`Compositor::process`] renders the bands separately; [`Compositor::together`]
//! renders their weighted sum as a single image.

use std::fs;
use std::path::{Path, PathBuf};

use image::imageops::{self, FilterType};
use image::{ImageFormat, RgbImage};
use log::{debug, info, warn};
use ndarray::Array3;

use shared::algo::finite_max;
use shared::image_proc::{
    image_to_rgb8, load_flux_map, normalize_by_percentile, repair_nan_pixels,
    suppress_polar_seam, FluxMap, FluxMapError, RepairSummary, DEFAULT_POLE_HALF_WIDTH,
};

use crate::colormap::Band;
use crate::error::ImagerError;
use crate::legend::{legend_svg, Colorbar, LegendLayout};
use crate::overlay::{embed_raster_svg, OverlayRenderer};

/// Weight of the X-ray map in the combined image.
pub const DEFAULT_XRAY_WEIGHT: f64 = 10.0;

/// Rasters shorter than this are upscaled by a whole factor.
pub const DEFAULT_TARGET_HEIGHT: u32 = 900;

/// Knobs shared by every render of a [`Compositor`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompositorOptions {
    /// Half-width of the polar seam band; `None` leaves the seam alone.
    pub remove_pole: Option<usize>,
    pub xray_weight: f64,
    pub target_height: u32,
}

impl Default for CompositorOptions {
    fn default() -> Self {
        Self {
            remove_pole: Some(DEFAULT_POLE_HALF_WIDTH),
            xray_weight: DEFAULT_XRAY_WEIGHT,
            target_height: DEFAULT_TARGET_HEIGHT,
        }
    }
}

/// One band after the preparation steps, in `[row, column, channel]` layout.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedImage {
    pub image: Array3<f64>,
    /// Value every pixel was divided by.
    pub divisor: f64,
    pub repair: RepairSummary,
    /// Whether the seam columns were overwritten.
    pub seam_suppressed: bool,
}

impl PreparedImage {
    /// Largest finite value, if any.
    pub fn finite_max(&self) -> Option<f64> {
        finite_max(self.image.iter().copied())
    }
}

/// Transpose, flip, repair, normalise and de-seam one flux map.
///
/// # Arguments
/// * `flux` - Channel-major flux map
/// * `max_flux` - Clip percentile in `[0, 100]`
/// * `remove_pole` - Seam half-width, or `None` to skip seam suppression
pub fn prepare(
    flux: &FluxMap,
    max_flux: f64,
    remove_pole: Option<usize>,
) -> Result<PreparedImage, ImagerError> {
    let mut image = flux.to_image_layout();

    let repair = repair_nan_pixels(&mut image);
    debug!(
        "Repaired {}/{} NaN pixels ({} left)",
        repair.repaired, repair.damaged, repair.remaining
    );

    let divisor = normalize_by_percentile(&mut image, max_flux)?;
    debug!("Normalised by {divisor} at the {max_flux} percentile");

    let seam_suppressed = match remove_pole {
        Some(half_width) => suppress_polar_seam(&mut image, half_width),
        None => false,
    };

    Ok(PreparedImage {
        image,
        divisor,
        repair,
        seam_suppressed,
    })
}

/// Files written for one rendered image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedImage {
    pub png: PathBuf,
    pub svg: PathBuf,
}

/// A band of a [`ProcessReport`].
#[derive(Debug, Clone, PartialEq)]
pub struct BandReport {
    pub band: Band,
    pub prepared: PreparedImage,
    /// `None` when the band was not rendered.
    pub output: Option<RenderedImage>,
}

/// Outcome of [`Compositor::process`].
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessReport {
    pub tag: String,
    pub optical: BandReport,
    pub xray: BandReport,
}

impl ProcessReport {
    pub fn xray_rendered(&self) -> bool {
        self.xray.output.is_some()
    }
}

/// Outcome of [`Compositor::together`].
#[derive(Debug, Clone, PartialEq)]
pub struct TogetherReport {
    pub tag: String,
    pub prepared: PreparedImage,
    pub output: RenderedImage,
}

/// Loads datasets from `data_dir` and writes composites to `output_dir`.
pub struct Compositor {
    data_dir: PathBuf,
    output_dir: PathBuf,
    options: CompositorOptions,
    renderer: OverlayRenderer,
}

impl Compositor {
    pub fn new(
        data_dir: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
        options: CompositorOptions,
    ) -> Self {
        Self {
            data_dir: data_dir.into(),
            output_dir: output_dir.into(),
            options,
            renderer: OverlayRenderer::new(),
        }
    }

    /// Replace the overlay renderer, e.g. with one that skips font loading.
    pub fn with_renderer(mut self, renderer: OverlayRenderer) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn options(&self) -> &CompositorOptions {
        &self.options
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// `{data_dir}/{tag}-{band}.npy`
    pub fn flux_path(&self, tag: &str, band: Band) -> PathBuf {
        self.data_dir.join(format!("{tag}-{}.npy", band.suffix()))
    }

    fn load_pair(&self, tag: &str) -> Result<(FluxMap, FluxMap), ImagerError> {
        let optical = load_flux_map(self.flux_path(tag, Band::Optical))?;
        let xray = load_flux_map(self.flux_path(tag, Band::Xray))?;
        if optical.dim() != xray.dim() {
            return Err(FluxMapError::ShapeMismatch {
                left: optical.dim(),
                right: xray.dim(),
            }
            .into());
        }
        debug!("Loaded {tag} flux maps of shape {:?}", optical.dim());
        Ok((optical, xray))
    }

    /// Render the optical and X-ray bands of `tag` as separate images.
    ///
    /// The optical image always goes to `{tag}-{extra_name}optical`. The X-ray
    /// map is remapped into the X-ray color space and goes to
    /// `{tag}-{extra_name}xray` only if some prepared pixel is brighter than 1,
    /// i.e. the band has anything above its clip level worth showing.
    pub fn process(
        &self,
        tag: &str,
        max_flux: f64,
        extra_name: &str,
    ) -> Result<ProcessReport, ImagerError> {
        let (optical, xray) = self.load_pair(tag)?;

        let optical = prepare(&optical, max_flux, self.options.remove_pole)?;
        let xray = prepare(&xray.to_xray(), max_flux, self.options.remove_pole)?;

        let name = format!("{tag}-{extra_name}{}", Band::Optical.suffix());
        let optical_output =
            self.render(&optical.image, &[Colorbar::for_band(Band::Optical)], &name)?;

        let xray_output = match xray.finite_max() {
            Some(brightest) if brightest > 1.0 => {
                let name = format!("{tag}-{extra_name}{}", Band::Xray.suffix());
                Some(self.render(&xray.image, &[Colorbar::for_band(Band::Xray)], &name)?)
            }
            brightest => {
                info!("Skipping {tag} X-ray image, brightest pixel {brightest:?} is not above 1");
                None
            }
        };

        Ok(ProcessReport {
            tag: tag.to_string(),
            optical: BandReport {
                band: Band::Optical,
                prepared: optical,
                output: Some(optical_output),
            },
            xray: BandReport {
                band: Band::Xray,
                prepared: xray,
                output: xray_output,
            },
        })
    }

    /// Render `optical + xray_weight * to_xray(xray)` for `tag` as one image
    /// with both colorbars.
    pub fn together(&self, tag: &str, max_flux: f64) -> Result<TogetherReport, ImagerError> {
        let (optical, xray) = self.load_pair(tag)?;
        let combined = optical.weighted_sum(&xray.to_xray(), self.options.xray_weight)?;

        let prepared = prepare(&combined, max_flux, self.options.remove_pole)?;
        let bars = [
            Colorbar::for_band(Band::Optical),
            Colorbar::for_band(Band::Xray),
        ];
        let output = self.render(&prepared.image, &bars, &format!("{tag}-tog"))?;

        Ok(TogetherReport {
            tag: tag.to_string(),
            prepared,
            output,
        })
    }

    fn render(
        &self,
        image: &Array3<f64>,
        bars: &[Colorbar],
        name: &str,
    ) -> Result<RenderedImage, ImagerError> {
        let raster = upscale(image_to_rgb8(image.view())?, self.options.target_height, name)?;
        let (width, height) = raster.dimensions();
        let legend = legend_svg(bars, &LegendLayout::for_image(width, height));

        fs::create_dir_all(&self.output_dir).map_err(|source| ImagerError::Write {
            path: self.output_dir.clone(),
            source,
        })?;

        let png = self.output_dir.join(format!("{name}.png"));
        self.renderer
            .overlay(&raster, &legend)?
            .save_with_format(&png, ImageFormat::Png)?;
        info!("Wrote {}", png.display());

        let svg = self.output_dir.join(format!("{name}.svg"));
        let document = embed_raster_svg(&raster, &legend)?;
        fs::write(&svg, document).map_err(|source| ImagerError::Write {
            path: svg.clone(),
            source,
        })?;
        info!("Wrote {}", svg.display());

        Ok(RenderedImage { png, svg })
    }
}

/// Nearest-neighbour upscale by the largest whole factor keeping the height
/// at most `target_height`, and never below 1.
///
/// A raster whose upscaled size would not fit in `u32` is returned as is.
fn upscale(raster: RgbImage, target_height: u32, name: &str) -> Result<RgbImage, ImagerError> {
    let (width, height) = raster.dimensions();
    if width == 0 || height == 0 {
        return Err(ImagerError::EmptyImage(name.to_string()));
    }

    let factor = (target_height / height).max(1);
    if factor == 1 {
        return Ok(raster);
    }
    let Some((new_width, new_height)) = width.checked_mul(factor).zip(height.checked_mul(factor))
    else {
        warn!("{name} is {width}x{height}, too wide to upscale by {factor}; keeping its size");
        return Ok(raster);
    };

    debug!("Upscaling {name} by {factor}");
    Ok(imageops::resize(&raster, new_width, new_height, FilterType::Nearest))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use image::Rgb;
    use ndarray::Array3;

    #[test]
    fn test_prepare_flips_rows() {
        // row index encoded in the value, all below 1 so nothing is rescaled
        let data = Array3::from_shape_fn((3, 4, 7), |(_, r, _)| r as f64 * 0.1);
        let flux = FluxMap::new(data).unwrap();

        let prepared = prepare(&flux, 90.0, None).unwrap();

        assert_eq!(prepared.image.dim(), (4, 7, 3));
        assert_eq!(prepared.divisor, 1.0);
        assert_relative_eq!(prepared.image[[0, 0, 0]], 0.3);
        assert_relative_eq!(prepared.image[[3, 0, 0]], 0.0);
        assert!(!prepared.seam_suppressed);
    }

    #[test]
    fn test_prepare_repairs_then_normalises() {
        let mut flux = FluxMap::from_elem(5, 9, 4.0);
        flux.data_mut()[[1, 2, 3]] = f64::NAN;

        let prepared = prepare(&flux, 50.0, Some(1)).unwrap();

        assert_eq!(prepared.repair.damaged, 1);
        assert_eq!(prepared.repair.remaining, 0);
        assert_eq!(prepared.divisor, 4.0);
        assert!(prepared.seam_suppressed);
        assert!(prepared.image.iter().all(|&v| v == 1.0));
    }

    #[test]
    fn test_prepare_rejects_bad_percentile() {
        let flux = FluxMap::from_elem(2, 2, 1.0);
        assert!(matches!(
            prepare(&flux, 101.0, None),
            Err(ImagerError::Stats(_))
        ));
    }

    #[test]
    fn test_upscale_by_whole_factor() {
        let raster = RgbImage::from_fn(3, 2, |x, _| Rgb([x as u8, 0, 0]));

        let up = upscale(raster.clone(), 9, "t").unwrap();
        assert_eq!(up.dimensions(), (12, 8));
        assert_eq!(up.get_pixel(11, 7), &Rgb([2, 0, 0]));
        assert_eq!(up.get_pixel(4, 0), &Rgb([1, 0, 0]));

        let same = upscale(raster, 1, "t").unwrap();
        assert_eq!(same.dimensions(), (3, 2));

        assert!(matches!(
            upscale(RgbImage::new(0, 0), 900, "empty"),
            Err(ImagerError::EmptyImage(_))
        ));
    }

    #[test]
    fn test_upscale_keeps_size_when_factor_overflows() {
        // 5e6 columns times a factor of 900 does not fit in u32
        let raster = RgbImage::new(5_000_000, 1);

        let kept = upscale(raster, DEFAULT_TARGET_HEIGHT, "wide").unwrap();

        assert_eq!(kept.dimensions(), (5_000_000, 1));
    }

    #[test]
    fn test_flux_path() {
        let compositor = Compositor::new("/data", "/out", CompositorOptions::default())
            .with_renderer(OverlayRenderer::without_fonts());
        assert_eq!(
            compositor.flux_path("kerr", Band::Xray),
            PathBuf::from("/data/kerr-xray.npy")
        );
    }
}
