//! Frame composition.
//!
//! One call to [`FrameComposer::compose`] redraws the whole scene from
//! scratch: background, three reference grids, the coordinate axes with
//! their labels, then every point of the cloud in insertion order with an
//! optional coordinate label under the pointer.
//!
//! There is no depth sorting. Later points paint over earlier points and
//! over the grid regardless of their projected depth.

use batuta_common::display::WithDimensions;

use crate::color::Rgba;
use crate::error::Result;
use crate::framebuffer::Framebuffer;
use crate::geometry::{Point, PointCloud, ScreenPoint};
use crate::projection::{Projection, DEFAULT_HEIGHT, DEFAULT_WIDTH};
use crate::render::{draw_filled_circle, draw_line, draw_text, draw_thick_line, is_near};

/// Largest grid half-extent accepted from configuration.
pub const MAX_GRID_EXTENT: i32 = 100;

/// Largest point marker radius accepted from configuration.
pub const MAX_POINT_SIZE: i32 = 200;

/// Largest axis stroke thickness accepted from configuration.
pub const MAX_AXIS_THICKNESS: u32 = 32;

/// Output size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Viewport {
    /// Create a viewport.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Whether a pixel coordinate lies inside.
    #[must_use]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(DEFAULT_WIDTH, DEFAULT_HEIGHT)
    }
}

/// Colors and sizes used when composing a frame.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneStyle {
    /// Fill radius of a point marker; the border adds 2px.
    pub point_size: i32,
    /// Frame background.
    pub background: Rgba,
    /// Point fill color.
    pub point_color: Rgba,
    /// Point border color.
    pub border_color: Rgba,
    /// Hover coordinate label color.
    pub label_color: Rgba,
    /// XZ (floor) grid tint.
    pub floor_grid: Rgba,
    /// XY wall grid tint.
    pub xy_grid: Rgba,
    /// YZ wall grid tint.
    pub yz_grid: Rgba,
    /// Grid lattice covers `-grid_extent..=grid_extent` on both plane axes.
    pub grid_extent: i32,
    /// World length of each axis segment.
    pub axis_length: f64,
    /// Axis stroke thickness in pixels.
    pub axis_thickness: u32,
    /// Axis stroke colors (X, Y, Z).
    pub axis_colors: [Rgba; 3],
    /// Axis label colors (X, Y, Z).
    pub axis_label_colors: [Rgba; 3],
}

impl Default for SceneStyle {
    fn default() -> Self {
        Self {
            point_size: 10,
            background: Rgba::rgb(240, 240, 240),
            point_color: Rgba::rgb(30, 144, 255),
            border_color: Rgba::BLACK,
            label_color: Rgba::rgb(50, 50, 50),
            floor_grid: Rgba::new(180, 180, 180, 160),
            xy_grid: Rgba::new(180, 180, 220, 120),
            yz_grid: Rgba::new(220, 180, 180, 120),
            grid_extent: 5,
            axis_length: 2.0,
            axis_thickness: 3,
            axis_colors: [
                Rgba::rgb(255, 50, 50),
                Rgba::rgb(50, 255, 50),
                Rgba::rgb(50, 50, 255),
            ],
            axis_label_colors: [Rgba::RED, Rgba::GREEN, Rgba::BLUE],
        }
    }
}

impl SceneStyle {
    /// Half-size of the hover hit box around a point.
    #[must_use]
    pub fn hover_box(&self) -> i32 {
        self.point_size.saturating_mul(5)
    }
}

/// Coordinate plane of a reference grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridPlane {
    /// The floor, `y = 0`.
    Xz,
    /// The back wall, `z = 0`.
    Xy,
    /// The side wall, `x = 0`.
    Yz,
}

impl GridPlane {
    /// All planes in drawing order.
    pub const ALL: [Self; 3] = [Self::Xz, Self::Xy, Self::Yz];

    /// World point for lattice coordinates `(i, j)` on this plane.
    #[must_use]
    pub fn point(self, i: i64, j: i64) -> Point {
        let (i, j) = (i as f64, j as f64);
        match self {
            Self::Xz => Point::new(i, 0.0, j),
            Self::Xy => Point::new(i, j, 0.0),
            Self::Yz => Point::new(0.0, i, j),
        }
    }

    fn tint(self, style: &SceneStyle) -> Rgba {
        match self {
            Self::Xz => style.floor_grid,
            Self::Xy => style.xy_grid,
            Self::Yz => style.yz_grid,
        }
    }
}

/// Format a point as the hover label `(x.x, y.y, z.z)`.
#[must_use]
pub fn coordinate_label(p: Point) -> String {
    format!("({:.1}, {:.1}, {:.1})", p.x, p.y, p.z)
}

/// Draws complete frames with a fixed style.
#[derive(Debug, Clone, Default)]
pub struct FrameComposer {
    style: SceneStyle,
}

impl FrameComposer {
    /// Create a composer with the given style.
    #[must_use]
    pub fn new(style: SceneStyle) -> Self {
        Self { style }
    }

    /// The style in use.
    #[must_use]
    pub fn style(&self) -> &SceneStyle {
        &self.style
    }

    /// Compose a new frame.
    ///
    /// The projection is copied and sized to `viewport`; the caller's value
    /// is not touched. `pointer` is the hover position in pixels, if any.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimensions`](crate::Error::InvalidDimensions)
    /// for a zero-sized viewport.
    pub fn compose(
        &self,
        cloud: &PointCloud,
        projection: &Projection,
        viewport: Viewport,
        pointer: Option<(f64, f64)>,
    ) -> Result<Framebuffer> {
        let mut fb = Framebuffer::new(viewport.width, viewport.height)?;
        self.compose_into(&mut fb, cloud, projection, pointer);
        Ok(fb)
    }

    /// Redraw into an existing framebuffer, using its size as the viewport.
    pub fn compose_into(
        &self,
        fb: &mut Framebuffer,
        cloud: &PointCloud,
        projection: &Projection,
        pointer: Option<(f64, f64)>,
    ) {
        let viewport = Viewport::new(fb.width(), fb.height());
        let mut view = *projection;
        view.set_dimensions(viewport.width, viewport.height);

        log::trace!(
            "composing {}x{} frame with {} points",
            viewport.width,
            viewport.height,
            cloud.len()
        );

        fb.clear(self.style.background);
        for plane in GridPlane::ALL {
            self.draw_grid(fb, &view, viewport, plane);
        }
        self.draw_axes(fb, &view);

        let pointer = pointer.map(|(x, y)| (x as i32, y as i32));
        for point in cloud {
            self.draw_point(fb, &view, *point, pointer);
        }
    }

    /// Draw one lattice. A segment is drawn only when both endpoints land
    /// inside the viewport; partially visible segments are dropped whole.
    fn draw_grid(
        &self,
        fb: &mut Framebuffer,
        view: &Projection,
        viewport: Viewport,
        plane: GridPlane,
    ) {
        let extent = i64::from(self.style.grid_extent);
        let tint = plane.tint(&self.style);
        let visible = |s: ScreenPoint| {
            if !s.is_finite() {
                return None;
            }
            let (x, y) = s.to_pixel();
            viewport.contains(x, y).then_some((x, y))
        };

        for i in -extent..=extent {
            for j in -extent..=extent {
                let Some(start) = visible(view.project(plane.point(i, j))) else {
                    continue;
                };
                for end in [plane.point(i + 1, j), plane.point(i, j + 1)] {
                    if let Some(end) = visible(view.project(end)) {
                        draw_line(fb, start.0, start.1, end.0, end.1, tint);
                    }
                }
            }
        }
    }

    fn draw_axes(&self, fb: &mut Framebuffer, view: &Projection) {
        let origin = view.project(Point::ORIGIN);
        if !origin.is_finite() {
            return;
        }
        let (ox, oy) = origin.to_pixel();
        let len = self.style.axis_length;
        let tips = [
            ("X", Point::new(len, 0.0, 0.0)),
            ("Y", Point::new(0.0, len, 0.0)),
            ("Z", Point::new(0.0, 0.0, len)),
        ];

        for (axis, (label, tip)) in tips.into_iter().enumerate() {
            let tip = view.project(tip);
            if !tip.is_finite() {
                continue;
            }
            let (tx, ty) = tip.to_pixel();
            draw_thick_line(
                fb,
                ox,
                oy,
                tx,
                ty,
                self.style.axis_thickness,
                self.style.axis_colors[axis],
            );
            draw_text(
                fb,
                label,
                tx.saturating_add(5),
                ty.saturating_sub(5),
                self.style.axis_label_colors[axis],
            );
        }
    }

    fn draw_point(
        &self,
        fb: &mut Framebuffer,
        view: &Projection,
        point: Point,
        pointer: Option<(i32, i32)>,
    ) {
        let screen = view.project(point);
        if !screen.is_finite() {
            return;
        }
        let (sx, sy) = screen.to_pixel();
        let size = self.style.point_size;

        draw_filled_circle(fb, sx, sy, size.saturating_add(2), self.style.border_color);
        draw_filled_circle(fb, sx, sy, size, self.style.point_color);

        if let Some((px, py)) = pointer {
            if is_near(px, py, sx, sy, self.style.hover_box()) {
                draw_text(
                    fb,
                    &coordinate_label(point),
                    sx.saturating_add(size).saturating_add(5),
                    sy.saturating_sub(5),
                    self.style.label_color,
                );
            }
        }
    }
}

/// Compose a frame with the default style.
///
/// # Errors
///
/// Returns [`Error::InvalidDimensions`](crate::Error::InvalidDimensions)
/// for a zero-sized viewport.
pub fn compose_frame(
    cloud: &PointCloud,
    projection: &Projection,
    viewport: Viewport,
    pointer: Option<(f64, f64)>,
) -> Result<Framebuffer> {
    FrameComposer::default().compose(cloud, projection, viewport, pointer)
}
