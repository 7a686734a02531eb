//! Viewer configuration.
//!
//! YAML file with precedence: CLI > file > defaults. Every field is optional;
//! missing fields take the built-in default.
//!
//! ```yaml
//! version: 1
//! viewport:
//!   width: 1024
//!   height: 768
//! style:
//!   point_size: 6
//!   point_color: "#ff8800"
//! sampling:
//!   step: 0.1
//! ```

use crate::color::Rgba;
use crate::error::{Error, Result};
use crate::sampler::SampleGrid;
use crate::scene::{
    SceneStyle, Viewport, MAX_AXIS_THICKNESS, MAX_GRID_EXTENT, MAX_POINT_SIZE,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Window size used for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewportConfig {
    /// Width in pixels.
    #[serde(default = "default_width")]
    pub width: u32,

    /// Height in pixels.
    #[serde(default = "default_height")]
    pub height: u32,
}

fn default_width() -> u32 {
    crate::projection::DEFAULT_WIDTH
}
fn default_height() -> u32 {
    crate::projection::DEFAULT_HEIGHT
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
        }
    }
}

/// Scene appearance. Colors are `#RRGGBB` or `#RRGGBBAA`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleConfig {
    /// Point marker radius in pixels.
    #[serde(default = "default_point_size")]
    pub point_size: i32,

    /// Frame background.
    #[serde(default = "default_background")]
    pub background: String,

    /// Point fill.
    #[serde(default = "default_point_color")]
    pub point_color: String,

    /// Point outline.
    #[serde(default = "default_border_color")]
    pub border_color: String,

    /// Hover label text.
    #[serde(default = "default_label_color")]
    pub label_color: String,

    /// Grid half-extent in world units.
    #[serde(default = "default_grid_extent")]
    pub grid_extent: i32,

    /// Axis length in world units.
    #[serde(default = "default_axis_length")]
    pub axis_length: f64,

    /// Axis stroke width in pixels.
    #[serde(default = "default_axis_thickness")]
    pub axis_thickness: u32,
}

fn default_point_size() -> i32 {
    SceneStyle::default().point_size
}
fn default_background() -> String {
    SceneStyle::default().background.to_hex()
}
fn default_point_color() -> String {
    SceneStyle::default().point_color.to_hex()
}
fn default_border_color() -> String {
    SceneStyle::default().border_color.to_hex()
}
fn default_label_color() -> String {
    SceneStyle::default().label_color.to_hex()
}
fn default_grid_extent() -> i32 {
    SceneStyle::default().grid_extent
}
fn default_axis_length() -> f64 {
    SceneStyle::default().axis_length
}
fn default_axis_thickness() -> u32 {
    SceneStyle::default().axis_thickness
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            point_size: default_point_size(),
            background: default_background(),
            point_color: default_point_color(),
            border_color: default_border_color(),
            label_color: default_label_color(),
            grid_extent: default_grid_extent(),
            axis_length: default_axis_length(),
            axis_thickness: default_axis_thickness(),
        }
    }
}

/// Function sampling range and step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplingConfig {
    /// Lower x bound.
    #[serde(default = "default_min")]
    pub x_min: f64,
    /// Upper x bound.
    #[serde(default = "default_max")]
    pub x_max: f64,
    /// Lower y bound.
    #[serde(default = "default_min")]
    pub y_min: f64,
    /// Upper y bound.
    #[serde(default = "default_max")]
    pub y_max: f64,
    /// Grid spacing.
    #[serde(default = "default_step")]
    pub step: f64,
}

fn default_min() -> f64 {
    SampleGrid::default().x_min()
}
fn default_max() -> f64 {
    SampleGrid::default().x_max()
}
fn default_step() -> f64 {
    SampleGrid::default().step()
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            x_min: default_min(),
            x_max: default_max(),
            y_min: default_min(),
            y_max: default_max(),
            step: default_step(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Configuration version.
    #[serde(default = "default_version")]
    pub version: u32,

    /// Render size.
    #[serde(default)]
    pub viewport: ViewportConfig,

    /// Scene appearance.
    #[serde(default)]
    pub style: StyleConfig,

    /// Function sampling.
    #[serde(default)]
    pub sampling: SamplingConfig,
}

fn default_version() -> u32 {
    1
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            viewport: ViewportConfig::default(),
            style: StyleConfig::default(),
            sampling: SamplingConfig::default(),
        }
    }
}

fn out_of_range<T: std::fmt::Display>(field: &str, value: T, max: T) -> Error {
    Error::ConfigParse {
        line: 0,
        message: format!("style.{field} must be within 0..={max}, got {value}"),
    }
}

impl Config {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// `<config dir>/trueno-points/config.yaml`, if the platform has one.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("trueno-points").join("config.yaml"))
    }

    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigNotFound`] if the file cannot be read and
    /// [`Error::ConfigParse`] if it is invalid.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .map_err(|_| Error::ConfigNotFound(path.display().to_string()))?;

        let config = Self::parse(&content)?;
        log::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Parses configuration from a YAML string.
    ///
    /// An empty document yields the defaults. Values that deserialize but
    /// make no sense (bad colors, out-of-range sizes, a non-positive step)
    /// are reported with line 0.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigParse`] with the YAML line number.
    pub fn parse(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Self = serde_yaml_ng::from_str(yaml).map_err(|e| {
            let line = e.location().map_or(0, |l| l.line());
            Error::ConfigParse {
                line,
                message: e.to_string(),
            }
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration with fallback to defaults.
    #[must_use]
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(path).unwrap_or_default()
    }

    fn validate(&self) -> Result<()> {
        let style = &self.style;
        for (name, value) in [
            ("background", &style.background),
            ("point_color", &style.point_color),
            ("border_color", &style.border_color),
            ("label_color", &style.label_color),
        ] {
            if Rgba::from_hex(value).is_none() {
                return Err(Error::ConfigParse {
                    line: 0,
                    message: format!("style.{name}: '{value}' is not a #RRGGBB color"),
                });
            }
        }
        if !(0..=MAX_POINT_SIZE).contains(&style.point_size) {
            return Err(out_of_range("point_size", style.point_size, MAX_POINT_SIZE));
        }
        if !(0..=MAX_GRID_EXTENT).contains(&style.grid_extent) {
            return Err(out_of_range("grid_extent", style.grid_extent, MAX_GRID_EXTENT));
        }
        if style.axis_thickness > MAX_AXIS_THICKNESS {
            return Err(out_of_range("axis_thickness", style.axis_thickness, MAX_AXIS_THICKNESS));
        }
        if !style.axis_length.is_finite() || style.axis_length < 0.0 {
            return Err(Error::ConfigParse {
                line: 0,
                message: format!(
                    "style.axis_length must be finite and not negative, got {}",
                    style.axis_length
                ),
            });
        }
        self.sampling_grid().map_err(|e| Error::ConfigParse {
            line: 0,
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Render viewport.
    #[must_use]
    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.viewport.width, self.viewport.height)
    }

    /// Scene style with the configured overrides. Unparsable colors keep
    /// their default.
    #[must_use]
    pub fn scene_style(&self) -> SceneStyle {
        let defaults = SceneStyle::default();
        let color = |hex: &str, fallback: Rgba| Rgba::from_hex(hex).unwrap_or(fallback);
        let style = &self.style;

        SceneStyle {
            point_size: style.point_size,
            background: color(&style.background, defaults.background),
            point_color: color(&style.point_color, defaults.point_color),
            border_color: color(&style.border_color, defaults.border_color),
            label_color: color(&style.label_color, defaults.label_color),
            grid_extent: style.grid_extent,
            axis_length: style.axis_length,
            axis_thickness: style.axis_thickness,
            ..defaults
        }
    }

    /// Sampling grid for function mode.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSampling`] for a non-positive step or
    /// non-finite bounds.
    pub fn sampling_grid(&self) -> Result<SampleGrid> {
        let s = &self.sampling;
        SampleGrid::new(s.x_min, s.x_max, s.y_min, s.y_max, s.step)
    }
}
