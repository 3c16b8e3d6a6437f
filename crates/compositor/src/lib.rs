//! Label composition: logo, QR symbol, and caption stacked onto a
//! fixed-size canvas.
//!
//! Geometry lives in [`layout`] as pure arithmetic; [`label`] ties a
//! computed plan to actual rasters. Keeping the two apart means the
//! layout rules are testable without touching fonts or image assets.

pub mod compose;
pub mod label;
pub mod layout;
pub mod text;

pub use label::{Assets, ComposeError, ComposedImage, QrRequest, compose};
pub use layout::{HAlign, LayoutConfig, LayoutError, LayoutPlan, Rect};
pub use qr_render::EcLevel;

/// Reference design width the proportional scale is computed against.
pub const REFERENCE_WIDTH: u32 = 1200;

/// Reference design height the proportional scale is computed against.
pub const REFERENCE_HEIGHT: u32 = 600;

/// Bundled fallback caption font (DejaVu Sans).
pub fn default_font() -> ab_glyph::FontArc {
    ab_glyph::FontArc::try_from_slice(include_bytes!("../assets/DejaVuSans.ttf"))
        .expect("bundled font is a valid TTF")
}
