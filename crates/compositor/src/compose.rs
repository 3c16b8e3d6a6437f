//! Raster composition onto the label canvas.

use image::{DynamicImage, Rgba, RgbaImage};

/// Create a white RGBA canvas of the given size (floored at 1x1).
pub fn blank_canvas(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_pixel(width.max(1), height.max(1), Rgba([255, 255, 255, 255]))
}

/// Alpha-composite `top` onto `base` at the given position.
///
/// Pixels falling outside the base are clipped.
pub fn overlay(base: &mut RgbaImage, top: &DynamicImage, x: u32, y: u32) {
    let top = top.to_rgba8();
    for (dx, dy, pixel) in top.enumerate_pixels() {
        let (tx, ty) = (x + dx, y + dy);
        if tx >= base.width() || ty >= base.height() {
            continue;
        }
        match pixel[3] {
            0 => {}
            255 => base.put_pixel(tx, ty, *pixel),
            alpha => {
                let blended = blend(base.get_pixel(tx, ty), pixel, alpha);
                base.put_pixel(tx, ty, blended);
            }
        }
    }
}

fn blend(bg: &Rgba<u8>, fg: &Rgba<u8>, alpha: u8) -> Rgba<u8> {
    let a = u16::from(alpha);
    let inv = 255 - a;
    let mix = |f: u8, b: u8| ((u16::from(f) * a + u16::from(b) * inv) / 255) as u8;
    Rgba([mix(fg[0], bg[0]), mix(fg[1], bg[1]), mix(fg[2], bg[2]), 255])
}
