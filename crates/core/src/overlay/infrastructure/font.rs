//! Compact 3x5 bitmap glyphs, scaled up at draw time.
//!
//! Covers digits, the latin letters used by expression labels, ':', '%',
//! and space. Unknown characters render as a filled block.

use crate::shared::frame::Frame;

pub const GLYPH_WIDTH: usize = 3;
pub const GLYPH_HEIGHT: usize = 5;
pub const GLYPH_SPACING: usize = 1;

/// Width in pixels of `text` drawn at `scale`.
pub fn text_width(text: &str, scale: usize) -> usize {
    text.chars().count() * (GLYPH_WIDTH + GLYPH_SPACING) * scale
}

pub fn text_height(scale: usize) -> usize {
    GLYPH_HEIGHT * scale
}

/// Draws a single line of text; `(x, y)` is the top-left corner. Clipping
/// is handled by the frame's bounds-checked pixel writes.
pub fn draw_text(frame: &mut Frame, x: i64, y: i64, text: &str, color: [u8; 3], scale: usize) {
    let advance = ((GLYPH_WIDTH + GLYPH_SPACING) * scale) as i64;
    let mut cx = x;
    for c in text.chars() {
        draw_glyph(frame, cx, y, c, color, scale);
        cx += advance;
    }
}

fn draw_glyph(frame: &mut Frame, x: i64, y: i64, c: char, color: [u8; 3], scale: usize) {
    let rows = glyph(c);
    for (row, bits) in rows.iter().enumerate() {
        for col in 0..GLYPH_WIDTH {
            if (bits >> (GLYPH_WIDTH - 1 - col)) & 1 == 0 {
                continue;
            }
            for dy in 0..scale {
                for dx in 0..scale {
                    frame.set_pixel(
                        x + (col * scale + dx) as i64,
                        y + (row * scale + dy) as i64,
                        color,
                    );
                }
            }
        }
    }
}

/// Each glyph row holds 3 bits, most significant on the left.
fn glyph(c: char) -> [u8; GLYPH_HEIGHT] {
    match c.to_ascii_uppercase() {
        '0' => [0x7, 0x5, 0x5, 0x5, 0x7],
        '1' => [0x2, 0x6, 0x2, 0x2, 0x7],
        '2' => [0x7, 0x1, 0x7, 0x4, 0x7],
        '3' => [0x7, 0x1, 0x7, 0x1, 0x7],
        '4' => [0x5, 0x5, 0x7, 0x1, 0x1],
        '5' => [0x7, 0x4, 0x7, 0x1, 0x7],
        '6' => [0x7, 0x4, 0x7, 0x5, 0x7],
        '7' => [0x7, 0x1, 0x2, 0x4, 0x4],
        '8' => [0x7, 0x5, 0x7, 0x5, 0x7],
        '9' => [0x7, 0x5, 0x7, 0x1, 0x7],
        'A' => [0x2, 0x5, 0x7, 0x5, 0x5],
        'C' => [0x7, 0x4, 0x4, 0x4, 0x7],
        'D' => [0x6, 0x5, 0x5, 0x5, 0x6],
        'E' => [0x7, 0x4, 0x6, 0x4, 0x7],
        'F' => [0x7, 0x4, 0x6, 0x4, 0x4],
        'G' => [0x7, 0x4, 0x5, 0x5, 0x7],
        'H' => [0x5, 0x5, 0x7, 0x5, 0x5],
        'I' => [0x7, 0x2, 0x2, 0x2, 0x7],
        'L' => [0x4, 0x4, 0x4, 0x4, 0x7],
        'M' => [0x5, 0x7, 0x5, 0x5, 0x5],
        'N' => [0x6, 0x5, 0x5, 0x5, 0x5],
        'O' => [0x7, 0x5, 0x5, 0x5, 0x7],
        'P' => [0x7, 0x5, 0x7, 0x4, 0x4],
        'R' => [0x6, 0x5, 0x6, 0x5, 0x5],
        'S' => [0x3, 0x4, 0x2, 0x1, 0x6],
        'T' => [0x7, 0x2, 0x2, 0x2, 0x2],
        'U' => [0x5, 0x5, 0x5, 0x5, 0x7],
        'Y' => [0x5, 0x5, 0x2, 0x2, 0x2],
        ':' => [0x0, 0x2, 0x0, 0x2, 0x0],
        '%' => [0x5, 0x1, 0x2, 0x4, 0x5],
        ' ' => [0x0, 0x0, 0x0, 0x0, 0x0],
        _ => [0x7, 0x7, 0x7, 0x7, 0x7],
    }
}
