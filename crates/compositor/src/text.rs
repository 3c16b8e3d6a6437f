//! Caption measurement, wrapping, and block rendering.

use ab_glyph::{Font, GlyphId, PxScale, ScaleFont};
use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_text_mut;

const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Vertical spacing between caption lines, in pixels.
const LINE_SPACING: u32 = 2;

/// Measure the pixel width of a string at the given scale, kerning included.
pub fn measure_text_width<F: Font>(font: &F, scale: PxScale, text: &str) -> u32 {
    let scaled = font.as_scaled(scale);
    let mut width = 0.0f32;
    let mut prev: Option<GlyphId> = None;

    for ch in text.chars() {
        let id = scaled.glyph_id(ch);
        if let Some(prev) = prev {
            width += scaled.kern(prev, id);
        }
        width += scaled.h_advance(id);
        prev = Some(id);
    }

    width.ceil() as u32
}

/// Line height for the given font and scale.
pub fn line_height<F: Font>(font: &F, scale: PxScale) -> u32 {
    let scaled = font.as_scaled(scale);
    (scaled.ascent() - scaled.descent() + scaled.line_gap()).ceil() as u32
}

/// Wrap text into lines that fit within `max_width` pixels.
///
/// Wraps at whitespace; a single word wider than the limit is broken
/// character by character so no line ever exceeds it.
pub fn wrap_text<F: Font>(font: &F, scale: PxScale, text: &str, max_width: u32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    let mut line_width = 0u32;

    for word in text.split_inclusive(char::is_whitespace) {
        let word_width = measure_text_width(font, scale, word);

        if line_width + word_width > max_width && !line.is_empty() {
            lines.push(std::mem::take(&mut line).trim_end().to_string());
            line_width = 0;
        }

        if word_width > max_width {
            let (rest, rest_width) = break_word(font, scale, word, max_width, &mut lines);
            line = rest;
            line_width = rest_width;
            continue;
        }

        line.push_str(word);
        line_width += word_width;
    }

    if !line.is_empty() {
        lines.push(line.trim_end().to_string());
    }
    if lines.is_empty() {
        lines.push(String::new());
    }

    lines
}

/// Break an oversize word into full lines, returning the trailing partial
/// line and its width.
fn break_word<F: Font>(
    font: &F,
    scale: PxScale,
    word: &str,
    max_width: u32,
    lines: &mut Vec<String>,
) -> (String, u32) {
    let mut chunk = String::new();
    let mut chunk_width = 0u32;

    for ch in word.chars() {
        let ch_width = measure_text_width(font, scale, ch.encode_utf8(&mut [0u8; 4]));
        if chunk_width + ch_width > max_width && !chunk.is_empty() {
            lines.push(std::mem::take(&mut chunk));
            chunk_width = 0;
        }
        chunk.push(ch);
        chunk_width += ch_width;
    }

    (chunk, chunk_width)
}

/// Measured size of a caption block for a set of wrapped lines.
pub fn block_size<F: Font>(font: &F, scale: PxScale, lines: &[String]) -> (u32, u32) {
    let width = lines
        .iter()
        .map(|l| measure_text_width(font, scale, l))
        .max()
        .unwrap_or(0);
    let height = lines.len() as u32 * (line_height(font, scale) + LINE_SPACING);
    (width.max(1), height.max(1))
}

/// Render wrapped caption lines into a standalone white block.
///
/// Lines are drawn left-aligned; the caller positions the block.
pub fn render_block<F: Font>(
    font: &F,
    scale: PxScale,
    lines: &[String],
    width: u32,
    height: u32,
) -> RgbaImage {
    let mut img = RgbaImage::from_pixel(width.max(1), height.max(1), Rgba([255, 255, 255, 255]));
    let lh = line_height(font, scale);

    let mut y = 0i32;
    for line in lines {
        draw_text_mut(&mut img, BLACK, 0, y, scale, font, line);
        y += (lh + LINE_SPACING) as i32;
    }

    img
}
