//! 3D to 2D projection state.
//!
//! A [`Projection`] holds the three rotation angles, the uniform scale, the
//! pixel offset and the viewport size. [`Projection::project`] maps a world
//! point to screen space by rotating about X, then Y, then Z, applying a
//! perspective divide and finally scaling and centering in the viewport.
//!
//! Projection never mutates state. Interaction code mutates through the
//! `rotate_by`/`pan_by`/`zoom_by`/`reset` family.

use batuta_common::display::WithDimensions;

use crate::geometry::{Point, ScreenPoint};

/// Camera distance used by the perspective divide.
pub const PERSPECTIVE_DISTANCE: f64 = 600.0;

/// Smallest allowed scale.
pub const MIN_SCALE: f64 = 5.0;

/// Largest allowed scale.
pub const MAX_SCALE: f64 = 500.0;

/// Scale after construction or reset.
pub const DEFAULT_SCALE: f64 = 50.0;

/// Multiplicative zoom applied per scroll notch.
pub const ZOOM_STEP: f64 = 1.1;

/// Radians per pixel of drag.
pub const DRAG_SENSITIVITY: f64 = 0.01;

/// Radians per unit of scroll while the rotate key is held.
pub const SCROLL_ROTATE_SENSITIVITY: f64 = 0.1;

/// Default viewport width in pixels.
pub const DEFAULT_WIDTH: u32 = 800;

/// Default viewport height in pixels.
pub const DEFAULT_HEIGHT: u32 = 600;

/// Mutable view transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    rotation_x: f64,
    rotation_y: f64,
    rotation_z: f64,
    scale: f64,
    offset_x: f64,
    offset_y: f64,
    width: u32,
    height: u32,
}

impl Default for Projection {
    fn default() -> Self {
        Self::new(DEFAULT_WIDTH, DEFAULT_HEIGHT)
    }
}

impl Projection {
    /// Create a projection with default view for the given viewport.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            rotation_x: 0.0,
            rotation_y: 0.0,
            rotation_z: 0.0,
            scale: DEFAULT_SCALE,
            offset_x: 0.0,
            offset_y: 0.0,
            width,
            height,
        }
    }

    /// Rotation angles `(x, y, z)` in radians.
    #[must_use]
    pub fn rotation(&self) -> (f64, f64, f64) {
        (self.rotation_x, self.rotation_y, self.rotation_z)
    }

    /// Current scale, always within `[MIN_SCALE, MAX_SCALE]`.
    #[must_use]
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Pixel offset `(x, y)`.
    #[must_use]
    pub fn offset(&self) -> (f64, f64) {
        (self.offset_x, self.offset_y)
    }

    /// Viewport width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Viewport height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Set all three rotation angles. Angles are unbounded.
    pub fn set_rotation(&mut self, x: f64, y: f64, z: f64) {
        self.rotation_x = x;
        self.rotation_y = y;
        self.rotation_z = z;
    }

    /// Set the scale, clamped to `[MIN_SCALE, MAX_SCALE]`.
    ///
    /// NaN leaves the scale unchanged.
    pub fn set_scale(&mut self, scale: f64) {
        if !scale.is_nan() {
            self.scale = scale.clamp(MIN_SCALE, MAX_SCALE);
        }
    }

    /// Set the pixel offset.
    pub fn set_offset(&mut self, x: f64, y: f64) {
        self.offset_x = x;
        self.offset_y = y;
    }

    /// Drag rotation: `dx` turns about Y, `dy` about X.
    pub fn rotate_by(&mut self, dx: f64, dy: f64) {
        self.rotation_y += dx * DRAG_SENSITIVITY;
        self.rotation_x += dy * DRAG_SENSITIVITY;
    }

    /// Scroll rotation while the rotate key is held.
    pub fn rotate_by_scroll(&mut self, dx: f64, dy: f64) {
        self.rotation_x += dy * SCROLL_ROTATE_SENSITIVITY;
        self.rotation_y += dx * SCROLL_ROTATE_SENSITIVITY;
    }

    /// Move the projected image by a pixel delta.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.offset_x += dx;
        self.offset_y += dy;
    }

    /// Multiply the scale by `factor`, clamped.
    pub fn zoom_by(&mut self, factor: f64) {
        self.set_scale(self.scale * factor);
    }

    /// One zoom-in notch.
    pub fn zoom_in(&mut self) {
        self.zoom_by(ZOOM_STEP);
    }

    /// One zoom-out notch.
    pub fn zoom_out(&mut self) {
        self.zoom_by(1.0 / ZOOM_STEP);
    }

    /// Restore rotation, scale and offset defaults; the viewport is kept.
    pub fn reset(&mut self) {
        *self = Self::new(self.width, self.height);
    }

    /// Rotate a point about X, then Y, then Z.
    #[must_use]
    pub fn rotate(&self, p: Point) -> Point {
        let (sin_a, cos_a) = self.rotation_x.sin_cos();
        let y1 = p.y * cos_a - p.z * sin_a;
        let z1 = p.y * sin_a + p.z * cos_a;

        let (sin_b, cos_b) = self.rotation_y.sin_cos();
        let x2 = p.x * cos_b + z1 * sin_b;
        let z2 = -p.x * sin_b + z1 * cos_b;

        let (sin_c, cos_c) = self.rotation_z.sin_cos();
        let x3 = x2 * cos_c - y1 * sin_c;
        let y3 = x2 * sin_c + y1 * cos_c;

        Point::new(x3, y3, z2)
    }

    /// Project a world point to screen coordinates.
    ///
    /// The result is non-finite when the rotated depth sits exactly at
    /// `-PERSPECTIVE_DISTANCE`; callers check [`ScreenPoint::is_finite`].
    #[must_use]
    pub fn project(&self, p: Point) -> ScreenPoint {
        let r = self.rotate(p);
        let perspective = PERSPECTIVE_DISTANCE / (PERSPECTIVE_DISTANCE + r.z);
        let factor = self.scale * perspective;

        ScreenPoint::new(
            f64::from(self.width) / 2.0 + r.x * factor + self.offset_x,
            f64::from(self.height) / 2.0 + r.y * factor + self.offset_y,
        )
    }
}

impl WithDimensions for Projection {
    fn set_dimensions(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_defaults() {
        let p = Projection::default();
        assert_eq!(p.rotation(), (0.0, 0.0, 0.0));
        assert_eq!(p.scale(), 50.0);
        assert_eq!(p.offset(), (0.0, 0.0));
        assert_eq!((p.width(), p.height()), (800, 600));
    }

    #[test]
    fn test_origin_projects_to_center() {
        let p = Projection::default();
        assert_eq!(p.project(Point::ORIGIN), ScreenPoint::new(400.0, 300.0));
    }

    #[test]
    fn test_unit_x_without_rotation() {
        let p = Projection::default();
        let s = p.project(Point::new(1.0, 0.0, 0.0));
        assert_relative_eq!(s.x, 450.0, epsilon = 1e-12);
        assert_relative_eq!(s.y, 300.0, epsilon = 1e-12);
    }

    #[test]
    fn test_perspective_shrinks_distant_points() {
        let p = Projection::default();
        let near = p.project(Point::new(1.0, 0.0, 0.0));
        let far = p.project(Point::new(1.0, 0.0, 600.0));
        // perspective 600 / 1200 halves the displacement
        assert_relative_eq!(far.x - 400.0, (near.x - 400.0) / 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_rotation_y_quarter_turn() {
        let mut p = Projection::default();
        p.set_rotation(0.0, FRAC_PI_2, 0.0);
        let r = p.rotate(Point::new(1.0, 0.0, 0.0));
        assert_relative_eq!(r.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(r.z, -1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_rotation_order_matters() {
        let point = Point::new(1.0, 2.0, 3.0);

        let mut xy = Projection::default();
        xy.set_rotation(0.7, 0.4, 0.0);
        // Apply Y first by hand, then X, to compare against the fixed order
        let (sb, cb) = 0.4_f64.sin_cos();
        let (sa, ca) = 0.7_f64.sin_cos();
        let x1 = point.x * cb + point.z * sb;
        let z1 = -point.x * sb + point.z * cb;
        let y2 = point.y * ca - z1 * sa;
        let yx = Point::new(x1, y2, point.y * sa + z1 * ca);

        let fixed = xy.rotate(point);
        assert!((fixed.x - yx.x).abs() > 1e-6 || (fixed.y - yx.y).abs() > 1e-6);
    }

    #[test]
    fn test_singular_depth_is_non_finite() {
        let p = Projection::default();
        let s = p.project(Point::new(1.0, 0.0, -PERSPECTIVE_DISTANCE));
        assert!(!s.is_finite());
    }

    #[test]
    fn test_drag_and_scroll_rotation() {
        let mut p = Projection::default();
        p.rotate_by(10.0, -20.0);
        assert_relative_eq!(p.rotation().1, 0.1, epsilon = 1e-12);
        assert_relative_eq!(p.rotation().0, -0.2, epsilon = 1e-12);

        p.rotate_by_scroll(1.0, 2.0);
        assert_relative_eq!(p.rotation().0, 0.0, epsilon = 1e-12);
        assert_relative_eq!(p.rotation().1, 0.2, epsilon = 1e-12);
    }

    #[test]
    fn test_pan_moves_projection() {
        let mut p = Projection::default();
        p.pan_by(15.0, -5.0);
        p.pan_by(5.0, 0.0);
        assert_eq!(p.offset(), (20.0, -5.0));
        assert_eq!(p.project(Point::ORIGIN), ScreenPoint::new(420.0, 295.0));
    }

    #[test]
    fn test_zoom_clamps() {
        let mut p = Projection::default();
        for _ in 0..100 {
            p.zoom_in();
        }
        assert_eq!(p.scale(), MAX_SCALE);

        for _ in 0..200 {
            p.zoom_out();
        }
        assert_eq!(p.scale(), MIN_SCALE);

        p.set_scale(f64::NAN);
        assert_eq!(p.scale(), MIN_SCALE);
    }

    #[test]
    fn test_reset_keeps_viewport() {
        let mut p = Projection::new(1024, 768);
        p.rotate_by(50.0, 50.0);
        p.pan_by(3.0, 4.0);
        p.zoom_in();
        p.reset();
        assert_eq!(p, Projection::new(1024, 768));
    }

    #[test]
    fn test_set_dimensions_recenters() {
        let mut p = Projection::default();
        p.set_dimensions(200, 100);
        assert_eq!(p.project(Point::ORIGIN), ScreenPoint::new(100.0, 50.0));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(128))]

            #[test]
            fn prop_scale_stays_clamped(factors in prop::collection::vec(0.01f64..100.0, 1..40)) {
                let mut p = Projection::default();
                for f in factors {
                    p.zoom_by(f);
                    prop_assert!(p.scale() >= MIN_SCALE && p.scale() <= MAX_SCALE);
                }
            }

            #[test]
            fn prop_origin_is_center(
                rx in -10.0f64..10.0,
                ry in -10.0f64..10.0,
                rz in -10.0f64..10.0,
                scale in MIN_SCALE..MAX_SCALE,
            ) {
                let mut p = Projection::default();
                p.set_rotation(rx, ry, rz);
                p.set_scale(scale);
                let s = p.project(Point::ORIGIN);
                prop_assert!((s.x - 400.0).abs() < 1e-9);
                prop_assert!((s.y - 300.0).abs() < 1e-9);
            }

            #[test]
            fn prop_rotation_preserves_length(
                x in -10.0f64..10.0,
                y in -10.0f64..10.0,
                z in -10.0f64..10.0,
                rx in -10.0f64..10.0,
                ry in -10.0f64..10.0,
                rz in -10.0f64..10.0,
            ) {
                let mut p = Projection::default();
                p.set_rotation(rx, ry, rz);
                let point = Point::new(x, y, z);
                let rotated = p.rotate(point);
                let before = point.distance_to(Point::ORIGIN);
                prop_assert!((rotated.distance_to(Point::ORIGIN) - before).abs() < 1e-9);
            }
        }
    }
}
