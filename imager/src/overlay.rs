//! SVG overlay rendering for composite images
//!
//! Legends are authored as SVG fragments. For raster output the fragment is
//! rasterised with resvg and alpha-blended over the composite; for vector
//! output the composite is embedded as a base64 PNG underneath the fragment.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use image::{Rgb, RgbImage};
use tiny_skia::{Pixmap, Transform};
use usvg::{Options, Tree};

use shared::image_proc::encode_png;

use crate::error::ImagerError;
use crate::legend::svg_document;

/// Renders SVG overlays with a font database loaded once.
pub struct OverlayRenderer {
    options: Options<'static>,
}

impl OverlayRenderer {
    /// Renderer with the system fonts available for legend text.
    pub fn new() -> Self {
        let mut options = Options::default();
        options.fontdb_mut().load_system_fonts();
        log::debug!("Loaded {} font faces for overlays", options.fontdb.len());
        Self { options }
    }

    /// Renderer without any fonts; text elements are dropped.
    pub fn without_fonts() -> Self {
        Self {
            options: Options::default(),
        }
    }

    /// Draw an SVG fragment over `image`.
    ///
    /// The fragment is wrapped in a document the size of the image, so its
    /// coordinates are image pixels.
    pub fn overlay(&self, image: &RgbImage, svg_body: &str) -> Result<RgbImage, ImagerError> {
        let (width, height) = image.dimensions();
        let svg_data = svg_document(width, height, svg_body);
        let svg_tree = Tree::from_str(&svg_data, &self.options)?;

        let mut pixmap =
            Pixmap::new(width, height).ok_or(ImagerError::PixmapAlloc { width, height })?;
        resvg::render(&svg_tree, Transform::identity(), &mut pixmap.as_mut());

        let mut output = image.clone();
        for (x, y, pixel) in output.enumerate_pixels_mut() {
            let Some(overlay_pixel) = pixmap.pixel(x, y) else {
                continue;
            };
            if overlay_pixel.alpha() == 0 {
                continue;
            }
            let color = overlay_pixel.demultiply();
            let alpha = color.alpha();
            let base = *pixel;
            *pixel = Rgb([
                blend_channel(base[0], color.red(), alpha),
                blend_channel(base[1], color.green(), alpha),
                blend_channel(base[2], color.blue(), alpha),
            ]);
        }

        Ok(output)
    }
}

impl Default for OverlayRenderer {
    fn default() -> Self {
        Self::new()
    }
}

// straight-alpha blend of one channel
fn blend_channel(base: u8, overlay: u8, alpha: u8) -> u8 {
    let alpha_f = alpha as f32 / 255.0;
    (base as f32 * (1.0 - alpha_f) + overlay as f32 * alpha_f).round() as u8
}

/// Standalone SVG document with `image` embedded as a PNG and `svg_body`
/// drawn on top.
///
/// The raster keeps nearest-neighbour scaling so the flux pixels stay crisp
/// when the document is zoomed.
pub fn embed_raster_svg(image: &RgbImage, svg_body: &str) -> Result<String, ImagerError> {
    let (width, height) = image.dimensions();
    let encoded = STANDARD.encode(encode_png(image)?);

    let mut body = format!(
        r#"<image x="0" y="0" width="{width}" height="{height}" preserveAspectRatio="none" style="image-rendering:pixelated" xlink:href="data:image/png;base64,{encoded}"/>"#
    );
    body.push_str(svg_body);
    Ok(svg_document(width, height, &body))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blend_channel() {
        assert_eq!(blend_channel(0, 255, 255), 255);
        assert_eq!(blend_channel(100, 255, 0), 100);
        assert_eq!(blend_channel(0, 255, 128), 128);
        assert_eq!(blend_channel(200, 0, 255), 0);
    }

    #[test]
    fn test_overlay_draws_only_where_svg_is_opaque() {
        let renderer = OverlayRenderer::without_fonts();
        let base = RgbImage::from_pixel(20, 10, Rgb([10, 20, 30]));
        let body = r#"<rect x="0" y="0" width="5" height="5" fill="white"/>"#;

        let out = renderer.overlay(&base, body).unwrap();

        assert_eq!(out.dimensions(), (20, 10));
        assert_eq!(out.get_pixel(2, 2), &Rgb([255, 255, 255]));
        assert_eq!(out.get_pixel(15, 8), &Rgb([10, 20, 30]));
    }

    #[test]
    fn test_overlay_rejects_malformed_svg() {
        let renderer = OverlayRenderer::without_fonts();
        let base = RgbImage::new(4, 4);
        assert!(matches!(
            renderer.overlay(&base, "<rect"),
            Err(ImagerError::Svg(_))
        ));
    }

    #[test]
    fn test_embed_raster_svg() {
        let image = RgbImage::from_pixel(6, 3, Rgb([1, 2, 3]));
        let doc = embed_raster_svg(&image, r#"<circle cx="1" cy="1" r="1"/>"#).unwrap();

        assert!(doc.starts_with("<svg"));
        assert!(doc.contains(r#"width="6" height="3""#));
        assert!(doc.contains("data:image/png;base64,iVBORw0KGgo"));
        // legend is drawn after, so on top of, the raster
        assert!(doc.find("<image").unwrap() < doc.find("<circle").unwrap());

        let tree = Tree::from_str(&doc, &Options::default()).unwrap();
        assert_eq!(tree.size().width(), 6.0);
    }
}
