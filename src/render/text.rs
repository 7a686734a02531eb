//! Fixed 5x6 bitmap text.
//!
//! Covers digits, `. - , ( )`, space and the axis letters `X Y Z`. Any other
//! character renders as a solid box outline.

use super::primitives::draw_rect;
use crate::color::Rgba;
use crate::framebuffer::Framebuffer;

/// Glyph width in pixels.
pub const GLYPH_WIDTH: i32 = 5;

/// Glyph height in pixels.
pub const GLYPH_HEIGHT: i32 = 6;

/// Horizontal distance between glyph origins (width plus 1px spacing).
pub const GLYPH_ADVANCE: i32 = GLYPH_WIDTH + 1;

/// Padding around the label background.
pub const LABEL_PADDING: i32 = 2;

/// Translucent backdrop drawn behind every string.
pub const LABEL_BACKGROUND: Rgba = Rgba::new(240, 240, 240, 220);

/// A glyph as six rows of five bits; bit 4 is the leftmost column.
pub type Glyph = [u8; GLYPH_HEIGHT as usize];

/// Glyph for characters outside the table.
pub const FALLBACK_GLYPH: Glyph = [0b11111, 0b10001, 0b10001, 0b10001, 0b10001, 0b11111];

/// Look up the bitmap for `ch`.
#[must_use]
pub fn glyph(ch: char) -> Glyph {
    match ch {
        '0' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        '1' => [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b01110],
        '2' => [0b01110, 0b10001, 0b00010, 0b00100, 0b01000, 0b11111],
        '3' => [0b01110, 0b10001, 0b00110, 0b00001, 0b10001, 0b01110],
        '4' => [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010],
        '5' => [0b11111, 0b10000, 0b11110, 0b00001, 0b10001, 0b01110],
        '6' => [0b01110, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110],
        '7' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000],
        '8' => [0b01110, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110],
        '9' => [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b01110],
        '.' => [0, 0, 0, 0, 0, 0b00100],
        '-' => [0, 0, 0b11111, 0, 0, 0],
        ',' => [0, 0, 0, 0, 0b00100, 0b01000],
        '(' => [0b00100, 0b01000, 0b10000, 0b10000, 0b01000, 0b00100],
        ')' => [0b00100, 0b00010, 0b00001, 0b00001, 0b00010, 0b00100],
        ' ' => [0; 6],
        'X' => [0b10001, 0b01010, 0b00100, 0b01010, 0b10001, 0],
        'Y' => [0b10001, 0b01010, 0b00100, 0b00100, 0b00100, 0],
        'Z' => [0b11111, 0b00010, 0b00100, 0b01000, 0b11111, 0],
        _ => FALLBACK_GLYPH,
    }
}

/// Pixel width covered by the glyphs of `text`, including trailing spacing.
#[must_use]
pub fn text_width(text: &str) -> i32 {
    i32::try_from(text.chars().count())
        .unwrap_or(i32::MAX)
        .saturating_mul(GLYPH_ADVANCE)
}

/// Draw `text` with its top-left glyph corner at `(x, y)`.
///
/// A translucent backdrop spanning `x - 2 .. x + width + 4` and
/// `y - 2 .. y + 8` goes down first, then each glyph left to right.
pub fn draw_text(fb: &mut Framebuffer, text: &str, x: i32, y: i32, color: Rgba) {
    if text.is_empty() {
        return;
    }

    let bg_width = i64::from(text_width(text)) + 3 * i64::from(LABEL_PADDING);
    let bg_height = GLYPH_HEIGHT + 2 * LABEL_PADDING;
    draw_rect(
        fb,
        x.saturating_sub(LABEL_PADDING),
        y.saturating_sub(LABEL_PADDING),
        u32::try_from(bg_width).unwrap_or(u32::MAX),
        bg_height as u32,
        LABEL_BACKGROUND,
    );

    for (i, ch) in text.chars().enumerate() {
        let origin_x = i64::from(x) + i as i64 * i64::from(GLYPH_ADVANCE);
        if origin_x >= i64::from(fb.width()) {
            break;
        }
        draw_glyph(fb, glyph(ch), origin_x, i64::from(y), color);
    }
}

fn draw_glyph(fb: &mut Framebuffer, glyph: Glyph, x: i64, y: i64, color: Rgba) {
    for (dy, bits) in glyph.iter().enumerate() {
        for dx in 0..GLYPH_WIDTH {
            if bits & (1 << (GLYPH_WIDTH - 1 - dx)) == 0 {
                continue;
            }
            let px = x + i64::from(dx);
            let py = y + dy as i64;
            if let (Ok(px), Ok(py)) = (i32::try_from(px), i32::try_from(py)) {
                fb.plot(px, py, color);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BG: Rgba = Rgba::rgb(240, 240, 240);

    fn canvas() -> Framebuffer {
        let mut fb = Framebuffer::new(60, 30).unwrap();
        fb.clear(BG);
        fb
    }

    /// Collect the 5x6 cell at `(x, y)` as bit rows.
    fn read_cell(fb: &Framebuffer, x: u32, y: u32, color: Rgba) -> Glyph {
        let mut rows = [0u8; 6];
        for (dy, row) in rows.iter_mut().enumerate() {
            for dx in 0..5u32 {
                if fb.get_pixel(x + dx, y + dy as u32) == Some(color) {
                    *row |= 1 << (4 - dx);
                }
            }
        }
        rows
    }

    #[test]
    fn test_glyph_rows_fit_width() {
        let chars = "0123456789.-,() XYZ?";
        for ch in chars.chars() {
            assert!(glyph(ch).iter().all(|row| *row < 32), "glyph {ch:?}");
        }
    }

    #[test]
    fn test_draws_known_glyph() {
        let mut fb = canvas();
        draw_text(&mut fb, "7", 10, 10, Rgba::BLACK);
        assert_eq!(read_cell(&fb, 10, 10, Rgba::BLACK), glyph('7'));
    }

    #[test]
    fn test_unknown_char_renders_solid_box() {
        let mut fb = canvas();
        draw_text(&mut fb, "q", 10, 10, Rgba::BLACK);
        assert_eq!(read_cell(&fb, 10, 10, Rgba::BLACK), FALLBACK_GLYPH);

        let mut other = canvas();
        draw_text(&mut other, "%", 10, 10, Rgba::BLACK);
        assert_eq!(fb.pixels(), other.pixels());
    }

    #[test]
    fn test_glyphs_advance_six_pixels() {
        let mut fb = canvas();
        draw_text(&mut fb, "1-Z", 5, 5, Rgba::RED);
        assert_eq!(read_cell(&fb, 5, 5, Rgba::RED), glyph('1'));
        assert_eq!(read_cell(&fb, 11, 5, Rgba::RED), glyph('-'));
        assert_eq!(read_cell(&fb, 17, 5, Rgba::RED), glyph('Z'));
    }

    #[test]
    fn test_background_extent() {
        let mut fb = Framebuffer::new(60, 30).unwrap();
        fb.clear(Rgba::BLACK);
        draw_text(&mut fb, "  ", 10, 10, Rgba::RED);

        let backdrop = |x: u32, y: u32| fb.get_pixel(x, y) != Some(Rgba::BLACK);
        // two chars: x from 8 through 10 + 12 + 4 - 1 = 25
        assert!(backdrop(8, 8));
        assert!(backdrop(25, 17));
        assert!(!backdrop(7, 10));
        assert!(!backdrop(26, 10));
        assert!(!backdrop(10, 7));
        assert!(!backdrop(10, 18));
    }

    #[test]
    fn test_background_is_blended() {
        let mut fb = Framebuffer::new(20, 20).unwrap();
        fb.clear(Rgba::BLACK);
        draw_text(&mut fb, " ", 5, 5, Rgba::RED);

        let px = fb.get_pixel(5, 5).unwrap();
        // 240 * 220/255 over black
        assert!(px.r > 200 && px.r < 210);
        assert_eq!(px.a, 255);
    }

    #[test]
    fn test_clipped_text_does_not_panic() {
        let mut fb = canvas();
        draw_text(&mut fb, "(1.0, 2.0, 3.0)", -20, -3, Rgba::BLACK);
        draw_text(&mut fb, "(1.0, 2.0, 3.0)", 55, 27, Rgba::BLACK);
        draw_text(&mut fb, "XYZ", i32::MAX - 2, i32::MIN, Rgba::BLACK);
        draw_text(&mut fb, "", 10, 10, Rgba::BLACK);
    }

    #[test]
    fn test_text_width() {
        assert_eq!(text_width(""), 0);
        assert_eq!(text_width("X"), 6);
        assert_eq!(text_width("(1.0, 2.0, 3.0)"), 90);
    }
}
