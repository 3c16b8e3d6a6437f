//! Layout geometry: alignment, proportional scaling, and the block plan.
//!
//! Everything here is integer/float arithmetic over sizes. No rasters,
//! no fonts; callers measure their blocks first and ask for a plan.

use tracing::debug;

use crate::{REFERENCE_HEIGHT, REFERENCE_WIDTH};

/// Padding between the canvas edge and content, at reference scale.
const BASE_PADDING: u32 = 30;

/// Vertical gap between stacked blocks, at reference scale.
const BASE_GAP: u32 = 20;

/// Horizontal alignment of a block within the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HAlign {
    Left,
    #[default]
    Center,
    Right,
}

impl HAlign {
    pub fn as_str(self) -> &'static str {
        match self {
            HAlign::Left => "left",
            HAlign::Center => "center",
            HAlign::Right => "right",
        }
    }
}

impl std::str::FromStr for HAlign {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" => Ok(HAlign::Left),
            "center" => Ok(HAlign::Center),
            "right" => Ok(HAlign::Right),
            other => Err(format!("unknown alignment '{other}'")),
        }
    }
}

impl std::fmt::Display for HAlign {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
    #[error("target dimensions must be positive, got {width}x{height}")]
    InvalidDimension { width: u32, height: u32 },
}

/// Target canvas geometry and block styling for one composed label.
#[derive(Debug, Clone)]
pub struct LayoutConfig {
    pub target_width: u32,
    pub target_height: u32,
    pub logo_align: HAlign,
    pub qr_align: HAlign,
    pub caption_align: HAlign,
    /// Logo width in pixels at reference scale.
    pub logo_width: u32,
    /// Caption font size in points.
    pub caption_font_pt: f32,
    /// Dots per inch used for the pt-to-px conversion.
    pub dpi: u32,
    /// Draw the payload text as a caption block below the symbol.
    pub caption: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            target_width: REFERENCE_WIDTH,
            target_height: REFERENCE_HEIGHT,
            logo_align: HAlign::Left,
            qr_align: HAlign::Center,
            caption_align: HAlign::Center,
            logo_width: 250,
            caption_font_pt: 20.0,
            dpi: 96,
            caption: true,
        }
    }
}

impl LayoutConfig {
    pub fn validate(&self) -> Result<(), LayoutError> {
        if self.target_width == 0 || self.target_height == 0 {
            return Err(LayoutError::InvalidDimension {
                width: self.target_width,
                height: self.target_height,
            });
        }
        Ok(())
    }

    /// Proportional scale factor relative to the reference design.
    pub fn scale(&self) -> f32 {
        let sx = self.target_width as f32 / REFERENCE_WIDTH as f32;
        let sy = self.target_height as f32 / REFERENCE_HEIGHT as f32;
        sx.min(sy)
    }

    /// Caption font size in pixels (pt -> px at the configured DPI),
    /// scaled with the canvas.
    pub fn caption_font_px(&self) -> f32 {
        (self.caption_font_pt * self.dpi as f32 / 72.0 * self.scale()).max(1.0)
    }
}

/// Derived pixel metrics, all scaled from the reference design.
#[derive(Debug, Clone, Copy)]
pub struct Metrics {
    pub padding: u32,
    pub gap: u32,
    pub logo_width: u32,
}

impl Metrics {
    pub fn from_config(cfg: &LayoutConfig) -> Self {
        let s = cfg.scale();
        Self {
            padding: scaled(BASE_PADDING, s),
            gap: scaled(BASE_GAP, s),
            logo_width: scaled(cfg.logo_width, s),
        }
    }
}

fn scaled(base: u32, factor: f32) -> u32 {
    ((base as f32 * factor).round() as u32).max(1)
}

/// Horizontal offset of a block under the alignment rule.
///
/// Left pins to the padding, right to the far edge minus padding, and
/// center splits the remainder. Offsets clamp at zero when the block is
/// wider than the canvas.
pub fn align_offset(align: HAlign, canvas_width: u32, block_width: u32, padding: u32) -> u32 {
    match align {
        HAlign::Left => padding,
        HAlign::Center => canvas_width.saturating_sub(block_width) / 2,
        HAlign::Right => canvas_width
            .saturating_sub(block_width)
            .saturating_sub(padding),
    }
}

/// Pixel rectangle of one block on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Computed block positions for one composed label.
#[derive(Debug, Clone)]
pub struct LayoutPlan {
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub logo: Option<Rect>,
    pub qr: Rect,
    pub caption: Option<Rect>,
    /// Integral pixel size of one module before the exact-square fit.
    pub module_size: u32,
}

/// Compute the block plan for one label.
///
/// `logo_size` is the natural raster size of the logo asset, if any;
/// `caption_size` the measured caption block, if any; `total_modules`
/// the symbol side in modules including the quiet zone.
///
/// The QR block is budgeted from whatever height remains after padding,
/// logo, caption, and gaps, clamped to the content width. It shrinks
/// before anything else does.
pub fn plan(
    cfg: &LayoutConfig,
    logo_size: Option<(u32, u32)>,
    caption_size: Option<(u32, u32)>,
    total_modules: u32,
) -> Result<LayoutPlan, LayoutError> {
    cfg.validate()?;

    let m = Metrics::from_config(cfg);
    let canvas_w = cfg.target_width;
    let canvas_h = cfg.target_height;
    let content_width = canvas_w.saturating_sub(m.padding * 2).max(1);

    // Logo scales to the metric width, preserving aspect ratio.
    let logo = logo_size.map(|(w, h)| {
        let lw = m.logo_width.min(content_width).max(1);
        let lh = ((h as f32 * lw as f32 / w as f32).round() as u32).max(1);
        (lw, lh)
    });

    let mut used = m.padding * 2;
    if let Some((_, lh)) = logo {
        used += lh + m.gap;
    }
    if let Some((_, ch)) = caption_size {
        used += ch + m.gap;
    }

    let available_height = canvas_h.saturating_sub(used).max(1);
    let qr_side = content_width.min(available_height);
    let module_size = (qr_side / total_modules).max(1);

    debug!(
        qr_side,
        total_modules, module_size, content_width, available_height, "planned QR block"
    );

    let mut y = m.padding;
    let logo_rect = logo.map(|(lw, lh)| {
        let rect = Rect {
            x: align_offset(cfg.logo_align, canvas_w, lw, m.padding),
            y,
            width: lw,
            height: lh,
        };
        y += lh + m.gap;
        rect
    });

    let qr_rect = Rect {
        x: align_offset(cfg.qr_align, canvas_w, qr_side, m.padding),
        y,
        width: qr_side,
        height: qr_side,
    };
    y += qr_side + m.gap;

    let caption_rect = caption_size.map(|(cw, ch)| {
        let cw = cw.min(content_width);
        Rect {
            x: align_offset(cfg.caption_align, canvas_w, cw, m.padding),
            y,
            width: cw,
            height: ch,
        }
    });

    Ok(LayoutPlan {
        canvas_width: canvas_w,
        canvas_height: canvas_h,
        logo: logo_rect,
        qr: qr_rect,
        caption: caption_rect,
        module_size,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg(width: u32, height: u32) -> LayoutConfig {
        LayoutConfig {
            target_width: width,
            target_height: height,
            ..LayoutConfig::default()
        }
    }

    #[test]
    fn align_left_is_always_padding() {
        for (canvas, block, pad) in [(100, 30, 5), (1200, 600, 30), (64, 64, 1)] {
            assert_eq!(align_offset(HAlign::Left, canvas, block, pad), pad);
        }
    }

    #[test]
    fn align_right_is_canvas_minus_block_minus_padding() {
        for (canvas, block, pad) in [(100u32, 30u32, 5u32), (1200, 250, 30), (500, 499, 1)] {
            assert_eq!(
                align_offset(HAlign::Right, canvas, block, pad),
                canvas - block - pad
            );
        }
    }

    #[test]
    fn align_center_splits_the_remainder() {
        assert_eq!(align_offset(HAlign::Center, 100, 40, 5), 30);
        assert_eq!(align_offset(HAlign::Center, 1200, 600, 30), 300);
    }

    #[test]
    fn align_clamps_when_block_exceeds_canvas() {
        assert_eq!(align_offset(HAlign::Center, 50, 80, 5), 0);
        assert_eq!(align_offset(HAlign::Right, 50, 80, 5), 0);
    }

    #[test]
    fn scale_is_min_of_both_axes() {
        assert_eq!(cfg(1200, 600).scale(), 1.0);
        assert_eq!(cfg(600, 300).scale(), 0.5);
        // Width would allow 2x, height only 1x -> height wins.
        assert_eq!(cfg(2400, 600).scale(), 1.0);
    }

    #[test]
    fn validate_rejects_zero_dimensions() {
        assert!(cfg(0, 600).validate().is_err());
        assert!(cfg(1200, 0).validate().is_err());
        assert!(cfg(1, 1).validate().is_ok());
    }

    #[test]
    fn plan_qr_block_is_square_within_budget() {
        let config = cfg(1200, 600);
        let m = Metrics::from_config(&config);
        let plan = plan(&config, Some((500, 200)), Some((400, 60)), 29).unwrap();

        assert_eq!(plan.qr.width, plan.qr.height);
        let content_width = config.target_width - m.padding * 2;
        assert!(plan.qr.width <= content_width);
        assert!(plan.module_size >= 1);
    }

    #[test]
    fn plan_stacks_blocks_top_to_bottom() {
        let plan = plan(&cfg(1200, 600), Some((500, 200)), Some((400, 60)), 29).unwrap();
        let logo = plan.logo.unwrap();
        let caption = plan.caption.unwrap();
        assert!(logo.y < plan.qr.y);
        assert!(plan.qr.y > logo.y + logo.height);
        assert!(caption.y >= plan.qr.y + plan.qr.height);
    }

    #[test]
    fn plan_without_logo_or_caption_gives_qr_the_full_height() {
        let config = cfg(1200, 600);
        let m = Metrics::from_config(&config);
        let plan = plan(&config, None, None, 29).unwrap();
        assert_eq!(plan.qr.height, config.target_height - m.padding * 2);
        assert_eq!(plan.qr.y, m.padding);
    }

    #[test]
    fn plan_survives_canvas_smaller_than_symbol() {
        let plan = plan(&cfg(20, 20), None, None, 29).unwrap();
        assert_eq!(plan.module_size, 1);
        assert_eq!(plan.qr.width, plan.qr.height);
        assert!(plan.qr.width >= 1);
    }

    #[test]
    fn plan_rejects_zero_canvas() {
        assert!(plan(&cfg(0, 100), None, None, 29).is_err());
    }

    #[test]
    fn plan_respects_alignment_choices() {
        let mut config = cfg(1000, 800);
        config.qr_align = HAlign::Right;
        config.logo_align = HAlign::Center;
        let m = Metrics::from_config(&config);
        let plan = plan(&config, Some((400, 100)), None, 33).unwrap();

        let logo = plan.logo.unwrap();
        assert_eq!(logo.x, (config.target_width - logo.width) / 2);
        assert_eq!(
            plan.qr.x,
            config.target_width - plan.qr.width - m.padding
        );
    }

    #[test]
    fn metrics_scale_with_the_canvas() {
        let full = Metrics::from_config(&cfg(1200, 600));
        let half = Metrics::from_config(&cfg(600, 300));
        assert_eq!(full.padding, 30);
        assert_eq!(full.gap, 20);
        assert_eq!(half.padding, 15);
        assert_eq!(half.gap, 10);
        assert_eq!(half.logo_width, 125);
    }

    #[test]
    fn caption_font_px_tracks_dpi_and_scale() {
        let config = cfg(1200, 600);
        // 20pt at 96dpi -> 26.67px at reference scale.
        let px = config.caption_font_px();
        assert!((px - 20.0 * 96.0 / 72.0).abs() < 0.01);

        let half = cfg(600, 300);
        assert!((half.caption_font_px() - px / 2.0).abs() < 0.01);
    }

    #[test]
    fn halign_parses_case_insensitively() {
        assert_eq!("LEFT".parse::<HAlign>().unwrap(), HAlign::Left);
        assert_eq!("center".parse::<HAlign>().unwrap(), HAlign::Center);
        assert!("middle".parse::<HAlign>().is_err());
    }
}
