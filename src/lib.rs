//! # Trueno-Points
//!
//! Software-rasterized 3D point cloud viewer with a built-in expression
//! sampler.
//!
//! Points come from a CSV file or from sampling `z = f(x, y)` over a grid.
//! A rotating perspective camera projects them onto an RGBA framebuffer
//! together with reference grids, axes and hover labels. No GPU or
//! windowing system is involved: the host shell forwards decoded input to a
//! [`viewer::Viewer`] and displays the frames it returns.
//!
//! ## Quick Start
//!
//! ```rust
//! use trueno_points::prelude::*;
//!
//! let grid = SampleGrid::new(-2.0, 2.0, -2.0, 2.0, 0.5)?;
//! let cloud = sample(&FunctionEvaluator::new("sin(x) * cos(y)"), &grid);
//!
//! let mut viewer = Viewer::new(cloud);
//! viewer.scrolled(0.0, 1.0);
//! let frame = viewer.render(Viewport::new(320, 240))?;
//! assert_eq!(frame.width(), 320);
//! # Ok::<(), trueno_points::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` (default): the `trueno-points` binary
//! - `wasm`: browser bindings

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
// Allow unwrap() in tests only - banned in production code (Cloudflare incident 2025-11-18)
#![cfg_attr(test, allow(clippy::unwrap_used))]
// Allow common patterns in graphics/visualization code
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Core Modules
// ============================================================================

/// Color types.
pub mod color;

/// Core framebuffer for pixel rendering.
pub mod framebuffer;

/// Points, point clouds and screen positions.
pub mod geometry;

// ============================================================================
// Data Sources
// ============================================================================

/// Scalar expression parser and evaluator.
pub mod expr;

/// Grid sampling of `z = f(x, y)`.
pub mod sampler;

/// Point cloud file formats.
pub mod io;

// ============================================================================
// Rendering Modules
// ============================================================================

/// Rotation, zoom and perspective projection.
pub mod projection;

/// Rasterization primitives and bitmap text.
pub mod render;

/// Whole-frame composition.
pub mod scene;

/// Output encoders (PNG, terminal).
pub mod output;

// ============================================================================
// Interaction & Support
// ============================================================================

/// Interactive viewer state.
pub mod viewer;

/// YAML configuration.
pub mod config;

/// Stderr logger for the `log` facade.
pub mod debug;

/// WebAssembly bindings for browser usage.
#[cfg(feature = "wasm")]
#[cfg_attr(docsrs, doc(cfg(feature = "wasm")))]
pub mod wasm;

// ============================================================================
// Error Types
// ============================================================================

/// Error types for trueno-points operations.
pub mod error;

pub use error::{Error, Result};

// ============================================================================
// Prelude
// ============================================================================

/// Commonly used types and traits for convenient imports.
///
/// ```rust
/// use trueno_points::prelude::*;
/// ```
pub mod prelude {
    pub use batuta_common::display::WithDimensions;
    pub use crate::color::Rgba;
    pub use crate::error::{Error, Result};
    pub use crate::expr::{evaluate, EvalError, Evaluate, Expression, FunctionEvaluator};
    pub use crate::framebuffer::Framebuffer;
    pub use crate::geometry::{Point, PointCloud, ScreenPoint};
    pub use crate::io::{load_csv, save_csv};
    pub use crate::output::{PngEncoder, TerminalEncoder, TerminalMode};
    pub use crate::projection::Projection;
    pub use crate::sampler::{sample, SampleGrid};
    pub use crate::scene::{FrameComposer, SceneStyle, Viewport};
    pub use crate::viewer::{DragMode, Modifiers, PointerButton, Viewer};
}

// ============================================================================
// Re-exports
// ============================================================================

/// Re-export trueno for direct access to SIMD operations.
pub use trueno;

#[cfg(test)]
mod tests {
    use super::prelude::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_core_types_are_send_sync() {
        assert_send_sync::<Point>();
        assert_send_sync::<PointCloud>();
        assert_send_sync::<Expression>();
        assert_send_sync::<Projection>();
        assert_send_sync::<Framebuffer>();
        assert_send_sync::<Viewer>();
    }
}
