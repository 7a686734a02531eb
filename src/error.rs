//! Error types for trueno-points operations.

use crate::expr::EvalError;
use std::io;
use thiserror::Error;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in trueno-points operations.
///
/// Expression failures inside a sampling pass never reach this type; they are
/// absorbed per cell by the sampler. They only surface here when a caller
/// evaluates an expression directly and propagates with `?`.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error (file operations, etc.).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// PNG encoding error.
    #[error("PNG encoding error: {0}")]
    PngEncoding(#[from] png::EncodingError),

    /// Invalid dimensions for a framebuffer or viewport.
    #[error("Invalid dimensions: {width}x{height}")]
    InvalidDimensions {
        /// Width value.
        width: u32,
        /// Height value.
        height: u32,
    },

    /// Expression parse or evaluation failure.
    #[error("Expression error: {0}")]
    Eval(#[from] EvalError),

    /// CSV structural or numeric violation.
    #[error("CSV format error at line {line}: {message}")]
    Format {
        /// Line number where the error occurred (1-indexed).
        line: usize,
        /// Error message describing the issue.
        message: String,
    },

    /// Rejected sampling grid (non-positive step, non-finite bounds).
    #[error("Invalid sampling grid: {0}")]
    InvalidSampling(String),

    /// Configuration parsing error with line number.
    #[error("configuration error at line {line}: {message}")]
    ConfigParse {
        /// Line number where the error occurred (1-indexed).
        line: usize,
        /// Error message describing the issue.
        message: String,
    },

    /// Configuration file not found.
    #[error("configuration file not found: {0}")]
    ConfigNotFound(String),
}
