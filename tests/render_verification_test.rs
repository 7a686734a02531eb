//! Pixel Verification Tests
//!
//! Compose whole frames through the public API and check individual pixels
//! against the known geometry of the default camera: origin at the viewport
//! center, 50 pixels per world unit, screen y growing downward.
//!
//! Run: cargo test --test render_verification_test

#![allow(clippy::unwrap_used)]

use trueno_points::prelude::*;
use trueno_points::scene::compose_frame;

const VIEW: Viewport = Viewport::new(800, 600);

fn pixel(fb: &Framebuffer, x: u32, y: u32) -> Rgba {
    fb.get_pixel(x, y).unwrap()
}

fn frame(points: &[Point], pointer: Option<(f64, f64)>) -> Framebuffer {
    let cloud: PointCloud = points.iter().copied().collect();
    compose_frame(&cloud, &Projection::default(), VIEW, pointer).unwrap()
}

// ============================================================================
// Axes and grids
// ============================================================================

#[test]
fn pixel_axes_at_default_view() {
    let style = SceneStyle::default();
    let fb = frame(&[], None);

    // X axis runs right from the center, Y axis runs down
    assert_eq!(pixel(&fb, 450, 300), style.axis_colors[0]);
    assert_eq!(pixel(&fb, 400, 350), style.axis_colors[1]);
    assert_eq!(pixel(&fb, 0, 599), style.background);
}

#[test]
fn pixel_back_wall_grid_is_tinted() {
    let style = SceneStyle::default();
    let fb = frame(&[], None);

    // Vertical XY grid line at x = 3 world units, between lattice rows
    let p = pixel(&fb, 550, 125);
    assert_ne!(p, style.background);
    assert!(p.b > p.r, "XY grid should be bluish, got {p:?}");
}

#[test]
fn pixel_grid_segment_with_offscreen_end_is_dropped() {
    let style = SceneStyle::default();
    let small = Viewport::new(300, 300);
    let fb = compose_frame(&PointCloud::new(), &Projection::default(), small, None).unwrap();

    // Row y = -1 on the back wall: (200,100)-(250,100) fits, (250,100)-(300,100)
    // ends on the excluded right edge
    assert_ne!(pixel(&fb, 225, 100), style.background);
    assert_eq!(pixel(&fb, 275, 100), style.background);
}

// ============================================================================
// Point markers
// ============================================================================

#[test]
fn pixel_marker_fill_and_border() {
    let style = SceneStyle::default();
    let fb = frame(&[Point::new(1.0, 1.0, 0.0)], None);

    assert_eq!(pixel(&fb, 450, 350), style.point_color);
    assert_eq!(pixel(&fb, 460, 350), style.point_color);
    assert_eq!(pixel(&fb, 461, 350), style.border_color);
    assert_eq!(pixel(&fb, 462, 350), style.border_color);
    assert_ne!(pixel(&fb, 463, 350), style.border_color);
}

#[test]
fn pixel_later_points_paint_over_earlier() {
    let style = SceneStyle::default();
    let a = Point::new(1.0, 1.0, 0.0); // (450, 350)
    let b = Point::new(1.25, 1.0, 0.0); // (462, 350)

    // 1 px from a (its fill), 11 px from b (its border)
    let forward = frame(&[a, b], None);
    assert_eq!(pixel(&forward, 451, 350), style.border_color);

    let reversed = frame(&[b, a], None);
    assert_eq!(pixel(&reversed, 451, 350), style.point_color);
}

#[test]
fn pixel_singular_point_is_skipped() {
    // Rotated depth of -600 sits on the perspective singularity
    let fb = frame(&[Point::new(1.0, 1.0, -600.0)], None);
    let empty = frame(&[], None);
    assert_eq!(fb.pixels(), empty.pixels());
}

// ============================================================================
// Hover labels
// ============================================================================

#[test]
fn pixel_hover_label_inside_box_only() {
    let label = SceneStyle::default().label_color;
    let p = Point::new(1.0, 1.0, 0.0);

    // Hover box is point_size * 5 = 50 px, inclusive
    for pointer in [(450.0, 350.0), (500.0, 400.0), (400.0, 300.0)] {
        let fb = frame(&[p], Some(pointer));
        assert!(fb.count_color(label) > 0, "label expected for pointer {pointer:?}");
    }
    for pointer in [(501.0, 350.0), (450.0, 401.0), (10.0, 10.0)] {
        let fb = frame(&[p], Some(pointer));
        assert_eq!(fb.count_color(label), 0, "no label expected for pointer {pointer:?}");
    }
    assert_eq!(frame(&[p], None).count_color(label), 0);
}

#[test]
fn pixel_hover_label_backdrop_position() {
    let p = Point::new(1.0, 1.0, 0.0);
    let hovered = frame(&[p], Some((450.0, 350.0)));
    let plain = frame(&[p], None);

    // Text origin is (center.x + size + 5, center.y - 5) = (465, 345); the
    // backdrop starts 2 px up and left of it and covers the y = 350 grid line
    assert_ne!(pixel(&hovered, 470, 350), pixel(&plain, 470, 350));
    assert_ne!(pixel(&hovered, 463, 350), pixel(&plain, 463, 350));

    // The marker border just left of the backdrop is untouched
    assert_eq!(pixel(&hovered, 462, 350), pixel(&plain, 462, 350));
    assert_eq!(pixel(&hovered, 462, 350), SceneStyle::default().border_color);
}

// ============================================================================
// Viewer pipeline
// ============================================================================

#[test]
fn pixel_viewer_renders_sampled_function() {
    let grid = SampleGrid::new(0.0, 1.0, 0.0, 1.0, 1.0).unwrap();
    let cloud = sample(&FunctionEvaluator::new("x + y"), &grid);
    assert_eq!(cloud.len(), 4);

    let mut viewer = Viewer::new(cloud);
    let fb = viewer.render(VIEW).unwrap();

    // (x=1, y=0) samples to the world point (1, 1, 0)
    assert_eq!(pixel(&fb, 450, 350), SceneStyle::default().point_color);
}

#[test]
fn pixel_viewer_pan_moves_everything() {
    let mut viewer = Viewer::new(PointCloud::from(vec![Point::new(1.0, 1.0, 0.0)]));
    viewer.pointer_down(PointerButton::Secondary, Modifiers::NONE, (0.0, 0.0));
    viewer.pointer_moved((-30.0, 20.0));
    viewer.pointer_up();

    let fb = viewer.render(VIEW).unwrap();
    assert_eq!(pixel(&fb, 420, 370), SceneStyle::default().point_color);
    assert_eq!(pixel(&fb, 420, 320), SceneStyle::default().axis_colors[0]);
}

#[test]
fn pixel_rendering_is_deterministic() {
    let mut viewer = Viewer::new(trueno_points::sampler::demo_cloud());
    viewer.projection_mut().set_rotation(0.4, -0.7, 0.1);
    viewer.pointer_moved((400.0, 300.0));

    let a = viewer.render(VIEW).unwrap();
    let b = viewer.render(VIEW).unwrap();
    assert_eq!(a.pixels(), b.pixels());
}

#[test]
fn pixel_frame_encodes_to_png_and_terminal() {
    let mut viewer = Viewer::new(trueno_points::sampler::default_cloud());
    let fb = viewer.render(Viewport::new(160, 120)).unwrap();

    let png = PngEncoder::to_bytes(&fb).unwrap();
    assert_eq!(&png[1..4], b"PNG");

    let text = TerminalEncoder::new()
        .mode(TerminalMode::Ascii)
        .columns(40)
        .render(&fb);
    assert_eq!(text.lines().count(), 15);
    assert!(text.lines().all(|l| l.chars().count() == 40));
}
