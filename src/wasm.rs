//! WebAssembly bindings for browser shells.
//!
//! The page owns the canvas and decodes DOM events; [`PointViewer`] takes
//! the decoded values and hands back RGBA pixels for `ImageData` or a PNG.
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { PointViewer } from 'trueno-points';
//!
//! await init();
//!
//! const viewer = PointViewer.fromFunction("sin(x) * cos(y)", -5, 5, -5, 5, 0.2);
//! canvas.onmousemove = (e) => { viewer.pointerMoved(e.offsetX, e.offsetY); draw(); };
//!
//! function draw() {
//!     const rgba = viewer.renderRgba(canvas.width, canvas.height);
//!     const image = new ImageData(new Uint8ClampedArray(rgba), canvas.width);
//!     ctx.putImageData(image, 0, 0);
//! }
//! ```

use wasm_bindgen::prelude::*;

use crate::error::Error;
use crate::expr::FunctionEvaluator;
use crate::io::{read_csv, write_csv};
use crate::output::PngEncoder;
use crate::sampler::{default_cloud, sample, SampleGrid};
use crate::scene::Viewport;
use crate::viewer::{Modifiers, PointerButton, Viewer};

// ============================================================================
// Helper Functions
// ============================================================================

fn js_error(err: impl std::fmt::Display) -> JsValue {
    let message = err.to_string();
    web_sys::console::warn_1(&JsValue::from_str(&message));
    js_sys::Error::new(&message).into()
}

/// DOM `MouseEvent.button`: 0 main, 1 wheel, 2 secondary.
fn pointer_button(button: u8) -> PointerButton {
    match button {
        1 => PointerButton::Tertiary,
        2 => PointerButton::Secondary,
        _ => PointerButton::Primary,
    }
}

// ============================================================================
// Viewer
// ============================================================================

/// Interactive point cloud view for a canvas.
#[wasm_bindgen]
#[derive(Debug, Clone)]
pub struct PointViewer {
    inner: Viewer,
}

#[wasm_bindgen]
impl PointViewer {
    /// View the three built-in reference points.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            inner: Viewer::new(default_cloud()),
        }
    }

    /// Sample `z = f(x, y)` over a grid. Cells that fail to evaluate are
    /// left out.
    ///
    /// # Errors
    ///
    /// Rejects a non-positive step or non-finite bounds.
    #[wasm_bindgen(js_name = fromFunction)]
    pub fn from_function(
        expression: &str,
        x_min: f64,
        x_max: f64,
        y_min: f64,
        y_max: f64,
        step: f64,
    ) -> Result<PointViewer, JsValue> {
        let grid = SampleGrid::new(x_min, x_max, y_min, y_max, step).map_err(js_error)?;
        let cloud = sample(&FunctionEvaluator::new(expression), &grid);
        Ok(Self {
            inner: Viewer::new(cloud),
        })
    }

    /// Load points from CSV text (`X,Y,Z` header).
    ///
    /// # Errors
    ///
    /// Returns the CSV format error with its line number.
    #[wasm_bindgen(js_name = fromCsv)]
    pub fn from_csv(text: &str) -> Result<PointViewer, JsValue> {
        let cloud = read_csv(text.as_bytes()).map_err(js_error)?;
        Ok(Self {
            inner: Viewer::new(cloud),
        })
    }

    /// Replace the points with CSV text and reset the view. On error the
    /// current points are kept.
    ///
    /// # Errors
    ///
    /// Returns the CSV format error with its line number.
    #[wasm_bindgen(js_name = loadCsv)]
    pub fn load_csv(&mut self, text: &str) -> Result<(), JsValue> {
        let cloud = read_csv(text.as_bytes()).map_err(js_error)?;
        self.inner.replace_cloud(cloud);
        Ok(())
    }

    /// Current points as CSV text.
    ///
    /// # Errors
    ///
    /// Only fails if formatting fails.
    #[wasm_bindgen(js_name = toCsv)]
    pub fn to_csv(&self) -> Result<String, JsValue> {
        let mut out = Vec::new();
        write_csv(&mut out, self.inner.cloud()).map_err(js_error)?;
        String::from_utf8(out).map_err(js_error)
    }

    /// Number of points shown.
    #[wasm_bindgen(js_name = pointCount)]
    pub fn point_count(&self) -> usize {
        self.inner.cloud().len()
    }

    /// Current zoom factor.
    pub fn scale(&self) -> f64 {
        self.inner.projection().scale()
    }

    /// `button` is `MouseEvent.button`.
    #[wasm_bindgen(js_name = pointerDown)]
    pub fn pointer_down(&mut self, button: u8, alt: bool, x: f64, y: f64) {
        let modifiers = Modifiers {
            alt,
            ..Modifiers::NONE
        };
        self.inner.pointer_down(pointer_button(button), modifiers, (x, y));
    }

    /// Pointer moved to (`x`, `y`) in canvas pixels.
    #[wasm_bindgen(js_name = pointerMoved)]
    pub fn pointer_moved(&mut self, x: f64, y: f64) {
        self.inner.pointer_moved((x, y));
    }

    /// Button released.
    #[wasm_bindgen(js_name = pointerUp)]
    pub fn pointer_up(&mut self) {
        self.inner.pointer_up();
    }

    /// Pointer left the canvas.
    #[wasm_bindgen(js_name = pointerLeft)]
    pub fn pointer_left(&mut self) {
        self.inner.pointer_left();
    }

    /// Wheel delta, positive `dy` zooming in. Browsers report wheel-down as
    /// positive `deltaY`, so pass `-event.deltaY`.
    pub fn scrolled(&mut self, dx: f64, dy: f64) {
        self.inner.scrolled(dx, dy);
    }

    /// Rotate key (R) pressed or released.
    #[wasm_bindgen(js_name = setRotateKey)]
    pub fn set_rotate_key(&mut self, held: bool) {
        self.inner.set_rotate_key(held);
    }

    /// Back to the default rotation, zoom and offset.
    #[wasm_bindgen(js_name = resetView)]
    pub fn reset_view(&mut self) {
        self.inner.reset_view();
    }

    /// Render a frame as tightly packed RGBA bytes.
    ///
    /// # Errors
    ///
    /// Fails for a zero-sized canvas.
    #[wasm_bindgen(js_name = renderRgba)]
    pub fn render_rgba(&mut self, width: u32, height: u32) -> Result<Vec<u8>, JsValue> {
        let fb = self.inner.render(Viewport::new(width, height)).map_err(js_error)?;
        Ok(fb.to_compact_pixels())
    }

    /// Render a frame as PNG bytes.
    ///
    /// # Errors
    ///
    /// Fails for a zero-sized canvas or if encoding fails.
    #[wasm_bindgen(js_name = renderPng)]
    pub fn render_png(&mut self, width: u32, height: u32) -> Result<Vec<u8>, JsValue> {
        let fb = self.inner.render(Viewport::new(width, height)).map_err(js_error)?;
        PngEncoder::to_bytes(&fb).map_err(js_error)
    }

    /// Render a frame as a `data:image/png;base64,` URI.
    ///
    /// # Errors
    ///
    /// Fails for a zero-sized canvas or if encoding fails.
    #[wasm_bindgen(js_name = renderDataUri)]
    pub fn render_data_uri(&mut self, width: u32, height: u32) -> Result<String, JsValue> {
        let fb = self.inner.render(Viewport::new(width, height)).map_err(js_error)?;
        PngEncoder::to_data_uri(&fb).map_err(js_error)
    }
}

impl Default for PointViewer {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Free Functions
// ============================================================================

/// Evaluate an expression at one (x, y).
///
/// # Errors
///
/// Returns the parse or evaluation error message.
#[wasm_bindgen]
pub fn evaluate(expression: &str, x: f64, y: f64) -> Result<f64, JsValue> {
    crate::expr::evaluate(expression, x, y).map_err(|e| js_error(Error::from(e)))
}

/// Get the library version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
