//! Primitive rendering functions.
//!
//! Integer rasterization of lines, thick lines, discs and rectangles. Every
//! primitive clips silently: pixels outside the framebuffer are dropped, and
//! no input makes a primitive fail.

use std::ops::RangeInclusive;

use crate::color::Rgba;
use crate::framebuffer::Framebuffer;

// ============================================================================
// Line Drawing
// ============================================================================

/// Draw a 1px line with the pixels Bresenham's algorithm picks.
///
/// One pixel per step along the major axis; the minor coordinate is the
/// ideal line rounded half away from the start. Both endpoints are inclusive.
/// Only steps that land inside the framebuffer are visited, so endpoints may
/// lie anywhere and the cost is bounded by the buffer size.
///
/// # Arguments
///
/// * `fb` - Target framebuffer
/// * `x0`, `y0` - Start coordinates
/// * `x1`, `y1` - End coordinates
/// * `color` - Line color
pub fn draw_line(fb: &mut Framebuffer, x0: i32, y0: i32, x1: i32, y1: i32, color: Rgba) {
    let w = i64::from(fb.width());
    let h = i64::from(fb.height());
    let (x0, y0) = (i64::from(x0), i64::from(y0));
    let (x1, y1) = (i64::from(x1), i64::from(y1));

    // The path is monotonic, so both endpoints past one edge means nothing lands
    if (x0 < 0 && x1 < 0) || (y0 < 0 && y1 < 0) || (x0 >= w && x1 >= w) || (y0 >= h && y1 >= h) {
        return;
    }

    let dx = (x1 - x0).abs();
    let dy = (y1 - y0).abs();
    let sx = if x0 > x1 { -1 } else { 1 };
    let sy = if y0 > y1 { -1 } else { 1 };

    if dx >= dy {
        for i in visible_steps(x0, sx, dx, w) {
            let y = y0 + sy * minor_offset(i, dy, dx);
            if (0..h).contains(&y) {
                fb.plot((x0 + sx * i) as i32, y as i32, color);
            }
        }
    } else {
        for i in visible_steps(y0, sy, dy, h) {
            let x = x0 + sx * minor_offset(i, dx, dy);
            if (0..w).contains(&x) {
                fb.plot(x as i32, (y0 + sy * i) as i32, color);
            }
        }
    }
}

/// Steps `i` in `0..=len` for which `start + step * i` lies in `0..limit`.
fn visible_steps(start: i64, step: i64, len: i64, limit: i64) -> RangeInclusive<i64> {
    let (lo, hi) = if step > 0 {
        (-start, limit - 1 - start)
    } else {
        (start - (limit - 1), start)
    };
    lo.max(0)..=hi.min(len)
}

/// `round(i * minor / major)` with halves rounded up.
#[inline]
fn minor_offset(i: i64, minor: i64, major: i64) -> i64 {
    if major == 0 {
        return 0;
    }
    let (i, minor, major) = (i128::from(i), i128::from(minor), i128::from(major));
    ((2 * i * minor + major) / (2 * major)) as i64
}

/// Draw a line approximately `thickness` pixels wide.
///
/// Draws the base line, then a parallel copy shifted by every integer
/// offset `(dx, dy)` inside a disc of radius `thickness / 2`. This is a
/// stamp approximation of stroke width, not a polygon fill.
pub fn draw_thick_line(
    fb: &mut Framebuffer,
    x0: i32,
    y0: i32,
    x1: i32,
    y1: i32,
    thickness: u32,
    color: Rgba,
) {
    draw_line(fb, x0, y0, x1, y1, color);

    let half = i32::try_from(thickness / 2).unwrap_or(i32::MAX);
    let radius_sq = i64::from(half) * i64::from(half);

    for dy in -half..=half {
        for dx in -half..=half {
            // The base line is already drawn
            if (dx, dy) == (0, 0) {
                continue;
            }
            if i64::from(dx) * i64::from(dx) + i64::from(dy) * i64::from(dy) <= radius_sq {
                draw_line(
                    fb,
                    x0.saturating_add(dx),
                    y0.saturating_add(dy),
                    x1.saturating_add(dx),
                    y1.saturating_add(dy),
                    color,
                );
            }
        }
    }
}

// ============================================================================
// Rectangle Drawing
// ============================================================================

/// Draw a filled rectangle at a signed position, clipped to the framebuffer.
///
/// Translucent colors are blended per pixel.
pub fn draw_rect(fb: &mut Framebuffer, x: i32, y: i32, width: u32, height: u32, color: Rgba) {
    let y_end = i64::from(y) + i64::from(height);
    let x_end = i64::from(x) + i64::from(width) - 1;
    let y_start = i64::from(y).max(0);
    let y_end = y_end.min(i64::from(fb.height()));

    for row in y_start..y_end {
        draw_span(fb, i64::from(x), x_end, row as i32, color);
    }
}

// ============================================================================
// Circle Drawing
// ============================================================================

/// Draw a filled disc: every pixel with `dx² + dy² <= radius²`.
///
/// A zero radius sets the center pixel; a negative radius draws nothing.
///
/// # Arguments
///
/// * `fb` - Target framebuffer
/// * `cx`, `cy` - Center coordinates
/// * `radius` - Disc radius in pixels
/// * `color` - Fill color
pub fn draw_filled_circle(fb: &mut Framebuffer, cx: i32, cy: i32, radius: i32, color: Rgba) {
    if radius < 0 {
        return;
    }

    let r = i64::from(radius);
    let (cx, cy) = (i64::from(cx), i64::from(cy));
    let top = (cy - r).max(0);
    let bottom = (cy + r).min(i64::from(fb.height()) - 1);

    for row in top..=bottom {
        let dy = row - cy;
        let span = isqrt(r * r - dy * dy);
        draw_span(fb, cx - span, cx + span, row as i32, color);
    }
}

/// Largest `s` with `s * s <= v`.
fn isqrt(v: i64) -> i64 {
    let mut s = (v as f64).sqrt() as i64;
    while s * s > v {
        s -= 1;
    }
    while (s + 1) * (s + 1) <= v {
        s += 1;
    }
    s
}

/// Fill pixels `x_start..=x_end` on row `y`, clipped to the framebuffer.
#[inline]
fn draw_span(fb: &mut Framebuffer, x_start: i64, x_end: i64, y: i32, color: Rgba) {
    if y < 0 || i64::from(y) >= i64::from(fb.height()) {
        return;
    }

    let x_start = x_start.max(0);
    let x_end = x_end.min(i64::from(fb.width()) - 1);
    if x_start > x_end {
        return;
    }

    if color.is_opaque() {
        fb.fill_rect(x_start as u32, y as u32, (x_end - x_start + 1) as u32, 1, color);
    } else {
        for x in x_start..=x_end {
            fb.blend_pixel(x as u32, y as u32, color);
        }
    }
}

// ============================================================================
// Hit Testing
// ============================================================================

/// Whether a pointer pixel lies in the square of half-size `box_size`
/// around a point's screen position. Edges are inclusive.
#[must_use]
pub fn is_near(pointer_x: i32, pointer_y: i32, point_x: i32, point_y: i32, box_size: i32) -> bool {
    let limit = i64::from(box_size);
    (i64::from(pointer_x) - i64::from(point_x)).abs() <= limit
        && (i64::from(pointer_y) - i64::from(point_y)).abs() <= limit
}

// ============================================================================
// Tests
// ============================================================================
