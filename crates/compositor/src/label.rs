//! The `compose()` contract: one text payload in, one finished label out.

use std::io::Cursor;

use ab_glyph::{FontArc, PxScale};
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, RgbaImage};
use tracing::debug;

use qr_render::{EcLevel, QrError, Symbol, fit_square};

use crate::compose::{blank_canvas, overlay};
use crate::layout::{self, LayoutConfig, LayoutError, LayoutPlan, Metrics};
use crate::text;

/// One QR payload and its encoding redundancy tier.
#[derive(Debug, Clone)]
pub struct QrRequest {
    pub text: String,
    pub ec_level: EcLevel,
}

impl QrRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ec_level: EcLevel::default(),
        }
    }

    pub fn with_ec_level(mut self, ec_level: EcLevel) -> Self {
        self.ec_level = ec_level;
        self
    }
}

/// Read-only external inputs to composition.
#[derive(Clone)]
pub struct Assets {
    pub logo: Option<DynamicImage>,
    pub font: FontArc,
}

impl Assets {
    pub fn new(font: FontArc) -> Self {
        Self { logo: None, font }
    }

    pub fn with_logo(mut self, logo: DynamicImage) -> Self {
        self.logo = Some(logo);
        self
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ComposeError {
    #[error("input text is empty")]
    EmptyText,
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error(transparent)]
    Qr(#[from] QrError),
}

/// A finished label: immutable canvas plus the plan that produced it.
pub struct ComposedImage {
    canvas: RgbaImage,
    plan: LayoutPlan,
}

impl ComposedImage {
    pub fn width(&self) -> u32 {
        self.canvas.width()
    }

    pub fn height(&self) -> u32 {
        self.canvas.height()
    }

    pub fn canvas(&self) -> &RgbaImage {
        &self.canvas
    }

    pub fn plan(&self) -> &LayoutPlan {
        &self.plan
    }

    pub fn into_canvas(self) -> RgbaImage {
        self.canvas
    }

    /// Encode the canvas as PNG bytes.
    pub fn to_png(&self) -> Result<Vec<u8>, image::ImageError> {
        let mut buf = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(self.canvas.clone()).write_to(&mut buf, ImageFormat::Png)?;
        Ok(buf.into_inner())
    }
}

/// Compose one label from a payload, a layout, and loaded assets.
///
/// Pure with respect to its inputs: the same request, config, and assets
/// always produce the same canvas. The canvas is exactly
/// `target_width` x `target_height`; the QR block is clamped downward
/// until the stack fits.
pub fn compose(
    req: &QrRequest,
    cfg: &LayoutConfig,
    assets: &Assets,
) -> Result<ComposedImage, ComposeError> {
    if req.text.is_empty() {
        return Err(ComposeError::EmptyText);
    }
    cfg.validate()?;

    let symbol = Symbol::encode(&req.text, req.ec_level)?;

    let metrics = Metrics::from_config(cfg);
    let content_width = cfg
        .target_width
        .saturating_sub(metrics.padding * 2)
        .max(1);
    let scale = PxScale::from(cfg.caption_font_px());

    let (lines, caption_size) = if cfg.caption {
        let lines = text::wrap_text(&assets.font, scale, &req.text, content_width);
        let size = text::block_size(&assets.font, scale, &lines);
        (lines, Some(size))
    } else {
        (Vec::new(), None)
    };

    let logo_size = assets.logo.as_ref().map(|l| (l.width(), l.height()));
    let plan = layout::plan(cfg, logo_size, caption_size, symbol.total_modules())?;

    let mut canvas = blank_canvas(plan.canvas_width, plan.canvas_height);

    if let (Some(logo), Some(rect)) = (assets.logo.as_ref(), plan.logo) {
        // The logo is a photographic asset; Lanczos3 is the right filter
        // here, unlike the QR raster.
        let resized = logo.resize_exact(rect.width, rect.height, FilterType::Lanczos3);
        overlay(&mut canvas, &resized, rect.x, rect.y);
    }

    let rendered = symbol.render(plan.module_size);
    let qr_block = fit_square(&rendered, plan.qr.width);
    overlay(&mut canvas, &qr_block, plan.qr.x, plan.qr.y);

    if let Some(rect) = plan.caption {
        let block = text::render_block(&assets.font, scale, &lines, rect.width, rect.height);
        overlay(&mut canvas, &DynamicImage::ImageRgba8(block), rect.x, rect.y);
    }

    debug!(
        width = plan.canvas_width,
        height = plan.canvas_height,
        modules = symbol.total_modules(),
        "label composed"
    );

    Ok(ComposedImage { canvas, plan })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::default_font;
    use crate::layout::HAlign;
    use image::Rgba;

    fn assets() -> Assets {
        Assets::new(default_font())
    }

    fn logo(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            width,
            height,
            Rgba([10, 20, 200, 255]),
        ))
    }

    #[test]
    fn compose_returns_exact_target_size() {
        let req = QrRequest::new("https://example.com");
        let cfg = LayoutConfig::default();
        let label = compose(&req, &cfg, &assets()).unwrap();
        assert_eq!((label.width(), label.height()), (1200, 600));
    }

    #[test]
    fn compose_qr_block_is_square() {
        let req = QrRequest::new("https://example.com");
        let label = compose(&req, &LayoutConfig::default(), &assets()).unwrap();
        let qr = label.plan().qr;
        assert_eq!(qr.width, qr.height);
    }

    #[test]
    fn compose_empty_text_is_rejected() {
        let req = QrRequest::new("");
        match compose(&req, &LayoutConfig::default(), &assets()) {
            Err(ComposeError::EmptyText) => {}
            other => panic!("expected EmptyText, got {:?}", other.err()),
        }
    }

    #[test]
    fn compose_zero_dimension_is_rejected() {
        let req = QrRequest::new("hello");
        let cfg = LayoutConfig {
            target_width: 0,
            ..LayoutConfig::default()
        };
        assert!(matches!(
            compose(&req, &cfg, &assets()),
            Err(ComposeError::Layout(_))
        ));
    }

    #[test]
    fn compose_over_capacity_is_rejected() {
        let req = QrRequest::new("x".repeat(8000)).with_ec_level(EcLevel::H);
        assert!(matches!(
            compose(&req, &LayoutConfig::default(), &assets()),
            Err(ComposeError::Qr(QrError::Capacity))
        ));
    }

    #[test]
    fn compose_is_deterministic() {
        let req = QrRequest::new("determinism check");
        let cfg = LayoutConfig::default();
        let a = compose(&req, &cfg, &assets()).unwrap();
        let b = compose(&req, &cfg, &assets()).unwrap();
        assert_eq!(a.canvas().as_raw(), b.canvas().as_raw());
    }

    #[test]
    fn compose_qr_block_contains_both_colors() {
        let req = QrRequest::new("https://example.com");
        let label = compose(&req, &LayoutConfig::default(), &assets()).unwrap();
        let qr = label.plan().qr;

        let mut dark = 0u32;
        let mut light = 0u32;
        for y in qr.y..qr.y + qr.height {
            for x in qr.x..qr.x + qr.width {
                if label.canvas().get_pixel(x, y)[0] < 128 {
                    dark += 1;
                } else {
                    light += 1;
                }
            }
        }
        let total = dark + light;
        // A QR symbol sits well away from all-black or all-white.
        assert!(dark > total / 10, "too few dark modules: {dark}/{total}");
        assert!(light > total / 10, "too few light modules: {light}/{total}");
    }

    #[test]
    fn compose_with_logo_paints_it_at_the_planned_rect() {
        let req = QrRequest::new("with logo");
        let cfg = LayoutConfig {
            logo_align: HAlign::Left,
            ..LayoutConfig::default()
        };
        let label = compose(&req, &cfg, &assets().with_logo(logo(500, 200))).unwrap();
        let rect = label.plan().logo.unwrap();

        let px = label.canvas().get_pixel(rect.x + 2, rect.y + 2);
        assert!(px[2] > 150 && px[0] < 100, "logo pixel expected, got {px:?}");
    }

    #[test]
    fn compose_without_caption_has_no_caption_rect() {
        let req = QrRequest::new("qr only");
        let cfg = LayoutConfig {
            caption: false,
            ..LayoutConfig::default()
        };
        let label = compose(&req, &cfg, &assets()).unwrap();
        assert!(label.plan().caption.is_none());
    }

    #[test]
    fn compose_tiny_canvas_still_yields_requested_size() {
        let req = QrRequest::new("tiny");
        let cfg = LayoutConfig {
            target_width: 50,
            target_height: 50,
            caption: false,
            ..LayoutConfig::default()
        };
        let label = compose(&req, &cfg, &assets()).unwrap();
        assert_eq!((label.width(), label.height()), (50, 50));
    }

    #[test]
    fn to_png_produces_a_decodable_image() {
        let req = QrRequest::new("png bytes");
        let label = compose(&req, &LayoutConfig::default(), &assets()).unwrap();
        let png = label.to_png().unwrap();
        let decoded = image::load_from_memory(&png).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (1200, 600));
    }
}
