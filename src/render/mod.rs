//! Software rasterization.
//!
//! Pixel-level primitives drawn straight into a [`Framebuffer`](crate::framebuffer::Framebuffer):
//!
//! - **Bresenham's Line**: 1px integer lines, plus a disc-stamped thick variant
//! - **Filled Disc**: every pixel within `radius` of the center
//! - **Bitmap Text**: fixed 5x6 glyphs over a translucent backdrop
//! - **Hit Testing**: square pointer proximity test
//!
//! Colors with alpha below 255 blend over the existing pixel; opaque colors
//! overwrite it.
//!
//! # References
//!
//! - Bresenham, J. E. (1965). "Algorithm for computer control of a digital plotter."

mod primitives;
mod text;

pub use primitives::{draw_filled_circle, draw_line, draw_rect, draw_thick_line, is_near};
pub use text::{
    draw_text, glyph, text_width, Glyph, FALLBACK_GLYPH, GLYPH_ADVANCE, GLYPH_HEIGHT,
    GLYPH_WIDTH, LABEL_BACKGROUND, LABEL_PADDING,
};
