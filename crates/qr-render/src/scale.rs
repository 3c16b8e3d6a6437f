//! Exact-square scaling for rendered symbols.

use image::DynamicImage;
use image::imageops::FilterType;
use tracing::debug;

/// Resize a rendered symbol to an exact `side`×`side` square.
///
/// Nearest-neighbor filtering keeps module edges crisp; a smoothing
/// filter here would bleed gray into the black/white transitions.
pub fn fit_square(img: &DynamicImage, side: u32) -> DynamicImage {
    let side = side.max(1);

    if img.width() == side && img.height() == side {
        debug!(side, "symbol already at target size, skipping resize");
        return img.clone();
    }

    debug!(from = img.width(), to = side, "fitting symbol to exact square");
    img.resize_exact(side, side, FilterType::Nearest)
}
