//! Terminal preview of a composed frame.
//!
//! Two modes:
//! - ASCII: one character per cell from the ramp ` .:-=+*#%@`
//! - ANSI half blocks: `▀` with 24-bit foreground/background colors, two
//!   pixel rows per character line
//!
//! Each output cell averages the framebuffer pixels it covers, so thin
//! lines and small markers fade instead of vanishing between samples.
//!
//! The composed scene is mostly light gray, which lands near the top of the
//! ASCII ramp. With [`TerminalEncoder::stretch`] the ramp is spread over the
//! frame's own luminance range instead of `0..=255`.

use crate::color::Rgba;
use crate::framebuffer::Framebuffer;
use std::fmt::Write as FmtWrite;

/// Terminal rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TerminalMode {
    /// Grayscale characters, no escape codes.
    Ascii,
    /// Upper-half blocks with ANSI 24-bit colors.
    #[default]
    HalfBlock,
}

/// Renders a framebuffer as terminal text.
#[derive(Debug, Clone)]
pub struct TerminalEncoder {
    mode: TerminalMode,
    columns: u32,
    invert: bool,
    stretch: bool,
}

impl Default for TerminalEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalEncoder {
    /// Dark to light.
    const ASCII_RAMP: &'static [char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

    /// Default output width in characters.
    pub const DEFAULT_COLUMNS: u32 = 80;

    /// Terminal cells are about twice as tall as they are wide.
    const CELL_ASPECT: f64 = 2.0;

    /// Create an encoder: half blocks, 80 columns.
    #[must_use]
    pub fn new() -> Self {
        Self {
            mode: TerminalMode::default(),
            columns: Self::DEFAULT_COLUMNS,
            invert: false,
            stretch: false,
        }
    }

    /// Set the rendering mode.
    #[must_use]
    pub fn mode(mut self, mode: TerminalMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the output width in characters (at least 1). Never wider than
    /// the frame.
    #[must_use]
    pub fn columns(mut self, columns: u32) -> Self {
        self.columns = columns.max(1);
        self
    }

    /// Swap light and dark, for terminals with a dark background.
    #[must_use]
    pub fn invert(mut self, invert: bool) -> Self {
        self.invert = invert;
        self
    }

    /// Map the frame's darkest to brightest luminance onto the full ASCII
    /// ramp. No effect on half blocks or on a frame of one luminance.
    #[must_use]
    pub fn stretch(mut self, stretch: bool) -> Self {
        self.stretch = stretch;
        self
    }

    /// Output grid size as (columns, lines).
    #[must_use]
    pub fn grid_size(&self, fb: &Framebuffer) -> (u32, u32) {
        let cols = self.columns.min(fb.width());
        let rows_per_line = match self.mode {
            TerminalMode::Ascii => 1,
            TerminalMode::HalfBlock => 2,
        };
        let cell_w = f64::from(fb.width()) / f64::from(cols);
        let lines = (f64::from(fb.height()) / (cell_w * Self::CELL_ASPECT)).round() as u32;
        let lines = lines.clamp(1, fb.height().div_ceil(rows_per_line).max(1));
        (cols, lines)
    }

    /// Render a framebuffer to a string, one `\n`-terminated line per row.
    #[must_use]
    pub fn render(&self, fb: &Framebuffer) -> String {
        let (cols, lines) = self.grid_size(fb);
        match self.mode {
            TerminalMode::Ascii => self.render_ascii(fb, cols, lines),
            TerminalMode::HalfBlock => self.render_half_block(fb, cols, lines),
        }
    }

    fn render_ascii(&self, fb: &Framebuffer, cols: u32, lines: u32) -> String {
        let (lo, hi) = self.luma_range(fb);
        let mut output = String::with_capacity((cols as usize + 1) * lines as usize);
        for row in 0..lines {
            for col in 0..cols {
                let c = self.cell_average(fb, col, cols, row, lines);
                let level = ((luma(c) - lo) / (hi - lo)).clamp(0.0, 1.0);
                output.push(Self::ASCII_RAMP[Self::ramp_index(level)]);
            }
            output.push('\n');
        }
        output
    }

    fn render_half_block(&self, fb: &Framebuffer, cols: u32, lines: u32) -> String {
        let sub_rows = lines * 2;
        let mut output = String::with_capacity((cols as usize * 40 + 5) * lines as usize);
        for row in 0..lines {
            for col in 0..cols {
                let top = self.cell_average(fb, col, cols, row * 2, sub_rows);
                let bottom = self.cell_average(fb, col, cols, row * 2 + 1, sub_rows);
                let _ = write!(
                    output,
                    "\x1b[38;2;{};{};{}m\x1b[48;2;{};{};{}m▀",
                    top.r, top.g, top.b, bottom.r, bottom.g, bottom.b
                );
            }
            output.push_str("\x1b[0m\n");
        }
        output
    }

    /// Mean color of the pixels in cell (`col`, `row`) of a `cols`×`rows`
    /// partition of the frame. Alpha is ignored.
    fn cell_average(&self, fb: &Framebuffer, col: u32, cols: u32, row: u32, rows: u32) -> Rgba {
        let span = |i: u32, n: u32, len: u32| {
            let start = (u64::from(i) * u64::from(len) / u64::from(n)) as u32;
            let end = (u64::from(i + 1) * u64::from(len) / u64::from(n)) as u32;
            (start, end.max(start + 1).min(len))
        };
        let (x0, x1) = span(col, cols, fb.width());
        let (y0, y1) = span(row, rows, fb.height());

        let mut sum = [0u64; 3];
        let mut count = 0u64;
        for y in y0..y1 {
            for x in x0..x1 {
                if let Some(p) = fb.get_pixel(x, y) {
                    sum[0] += u64::from(p.r);
                    sum[1] += u64::from(p.g);
                    sum[2] += u64::from(p.b);
                    count += 1;
                }
            }
        }
        if count == 0 {
            return Rgba::BLACK;
        }

        let avg = |s: u64| ((s + count / 2) / count) as u8;
        let (r, g, b) = (avg(sum[0]), avg(sum[1]), avg(sum[2]));
        if self.invert {
            Rgba::rgb(255 - r, 255 - g, 255 - b)
        } else {
            Rgba::rgb(r, g, b)
        }
    }

    /// Luminance mapped to the ends of the ramp, in `[0, 1]`.
    fn luma_range(&self, fb: &Framebuffer) -> (f64, f64) {
        if !self.stretch {
            return (0.0, 1.0);
        }
        let (min, max, _) = fb.luminance_stats();
        if max - min < 1.0 {
            return (0.0, 1.0);
        }
        let (lo, hi) = (f64::from(min) / 255.0, f64::from(max) / 255.0);
        // Cells are inverted before lookup
        if self.invert {
            (1.0 - hi, 1.0 - lo)
        } else {
            (lo, hi)
        }
    }

    fn ramp_index(luma: f64) -> usize {
        let last = Self::ASCII_RAMP.len() - 1;
        ((luma * last as f64).round() as usize).min(last)
    }
}

/// Rec. 709 luminance in `[0, 1]`.
fn luma(c: Rgba) -> f64 {
    (0.2126 * f64::from(c.r) + 0.7152 * f64::from(c.g) + 0.0722 * f64::from(c.b)) / 255.0
}
