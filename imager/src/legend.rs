//! Colorbar legends drawn as SVG on top of composite images.
//!
//! A legend is a stack of horizontal colorbars anchored in the upper-left
//! corner of the image. Each bar shows its colormap as a linear gradient with
//! one stop per breakpoint, tick marks at round values of the band's energy
//! range, and a label underneath. Text and outlines are white so they read
//! against the dark sky around the disk.

use crate::colormap::{Band, Colormap};

/// Bar width as a fraction of the image width.
pub const BAR_WIDTH_FRACTION: f64 = 0.20;
/// Bar height as a fraction of the image height.
pub const BAR_HEIGHT_FRACTION: f64 = 0.013;
/// Most tick labels placed on one bar.
pub const MAX_TICKS: usize = 5;

const LEGEND_COLOR: &str = "white";
const FONT_FAMILY: &str = "serif";

/// A horizontal colorbar: a colormap stretched over a physical value range.
#[derive(Debug, Clone, PartialEq)]
pub struct Colorbar {
    pub colormap: Colormap,
    pub range: (f64, f64),
    pub label: String,
}

impl Colorbar {
    pub fn new(colormap: Colormap, range: (f64, f64), label: impl Into<String>) -> Self {
        Self {
            colormap,
            range,
            label: label.into(),
        }
    }

    /// Colorbar for a band's blackbody colormap, energy range and label.
    pub fn for_band(band: Band) -> Self {
        Self::new(band.colormap(), band.energy_range(), band.label())
    }

    /// Round tick values inside the bar's range with their display strings.
    pub fn ticks(&self) -> Vec<(f64, String)> {
        let (lo, hi) = self.range;
        let step = nice_step(lo, hi, MAX_TICKS);
        nice_ticks(lo, hi, MAX_TICKS)
            .into_iter()
            .map(|v| (v, format_tick(v, step)))
            .collect()
    }

    /// Horizontal position of `value` along a bar of `width` starting at `x`.
    fn value_to_x(&self, value: f64, x: f64, width: f64) -> f64 {
        let (lo, hi) = self.range;
        x + (value - lo) / (hi - lo) * width
    }
}

/// Pixel geometry of a legend for an image of a given size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LegendLayout {
    pub pad: f64,
    pub bar_width: f64,
    pub bar_height: f64,
    pub font_size: f64,
    pub tick_length: f64,
}

impl LegendLayout {
    pub fn for_image(width: u32, height: u32) -> Self {
        let font_size = (height as f64 * 0.019).max(8.0);
        Self {
            pad: font_size,
            bar_width: width as f64 * BAR_WIDTH_FRACTION,
            bar_height: (height as f64 * BAR_HEIGHT_FRACTION).max(4.0),
            font_size,
            tick_length: font_size * 0.35,
        }
    }

    /// Vertical space one colorbar block takes: bar, ticks, tick labels and label.
    pub fn block_height(&self) -> f64 {
        self.bar_height + self.tick_length + self.font_size * 2.6
    }
}

/// SVG elements (no enclosing `<svg>`) drawing `bars` stacked top to bottom.
pub fn legend_svg(bars: &[Colorbar], layout: &LegendLayout) -> String {
    let mut svg = String::new();
    let x = layout.pad;
    let mut y = layout.pad;

    for (i, bar) in bars.iter().enumerate() {
        write_colorbar(&mut svg, bar, &format!("colorbar{i}"), x, y, layout);
        y += layout.block_height() + layout.pad * 0.5;
    }
    svg
}

/// Wrap SVG elements into a standalone document of the given size.
pub fn svg_document(width: u32, height: u32, body: &str) -> String {
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" width="{width}" height="{height}" viewBox="0 0 {width} {height}">{body}</svg>"#
    )
}

fn write_colorbar(
    svg: &mut String,
    bar: &Colorbar,
    id: &str,
    x: f64,
    y: f64,
    layout: &LegendLayout,
) {
    let cmap = &bar.colormap;
    let (w, h) = (layout.bar_width, layout.bar_height);

    svg.push_str(&format!(
        r#"<defs><linearGradient id="{id}" x1="0" y1="0" x2="1" y2="0">"#
    ));
    for &pos in cmap.positions() {
        svg.push_str(&format!(
            r#"<stop offset="{:.6}" stop-color="{}"/>"#,
            pos,
            hex_color(cmap.eval_u8(pos))
        ));
    }
    svg.push_str("</linearGradient></defs>");

    svg.push_str(&format!(
        r#"<rect x="{x:.2}" y="{y:.2}" width="{w:.2}" height="{h:.2}" fill="url(#{id})" stroke="{LEGEND_COLOR}" stroke-width="0.8"/>"#
    ));

    let tick_top = y + h;
    let tick_bottom = tick_top + layout.tick_length;
    let label_baseline = tick_bottom + layout.font_size;
    for (value, text) in bar.ticks() {
        let tx = bar.value_to_x(value, x, w);
        svg.push_str(&format!(
            r#"<line x1="{tx:.2}" y1="{tick_top:.2}" x2="{tx:.2}" y2="{tick_bottom:.2}" stroke="{LEGEND_COLOR}" stroke-width="0.8"/>"#
        ));
        svg.push_str(&format!(
            r#"<text x="{tx:.2}" y="{label_baseline:.2}" font-family="{FONT_FAMILY}" font-size="{:.1}" text-anchor="middle" fill="{LEGEND_COLOR}">{}</text>"#,
            layout.font_size * 0.85,
            escape_xml(&text)
        ));
    }

    let title_baseline = label_baseline + layout.font_size * 1.3;
    svg.push_str(&format!(
        r#"<text x="{:.2}" y="{title_baseline:.2}" font-family="{FONT_FAMILY}" font-size="{:.1}" text-anchor="middle" fill="{LEGEND_COLOR}">{}</text>"#,
        x + w / 2.0,
        layout.font_size,
        escape_xml(&bar.label)
    ));
}

fn hex_color([r, g, b]: [u8; 3]) -> String {
    format!("#{r:02x}{g:02x}{b:02x}")
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Smallest "round" step (1, 2, 2.5 or 5 times a power of ten) that covers
/// `[lo, hi]` in at most `max_ticks` intervals.
pub fn nice_step(lo: f64, hi: f64, max_ticks: usize) -> f64 {
    let span = (hi - lo).abs();
    if span == 0.0 || !span.is_finite() || max_ticks == 0 {
        return 1.0;
    }
    let raw = span / max_ticks as f64;
    let magnitude = 10f64.powf(raw.log10().floor());
    [1.0, 2.0, 2.5, 5.0, 10.0]
        .iter()
        .map(|m| m * magnitude)
        .find(|&step| step >= raw * (1.0 - 1e-12))
        .unwrap_or(10.0 * magnitude)
}

/// Multiples of [`nice_step`] inside `[lo, hi]`.
pub fn nice_ticks(lo: f64, hi: f64, max_ticks: usize) -> Vec<f64> {
    let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
    let step = nice_step(lo, hi, max_ticks);
    let first = (lo / step - 1e-9).ceil() as i64;
    let last = (hi / step + 1e-9).floor() as i64;
    (first..=last).map(|k| k as f64 * step).collect()
}

/// Format a tick value with just enough decimals for `step`.
pub fn format_tick(value: f64, step: f64) -> String {
    let mut decimals = (-step.log10().floor()).max(0.0) as usize;
    // 2.5 x 10^k needs one more digit than its power of ten
    let mantissa = step / 10f64.powf(step.log10().floor());
    if (mantissa - 2.5).abs() < 1e-9 {
        decimals += 1;
    }
    format!("{value:.decimals$}")
}
