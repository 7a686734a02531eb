//! Grid sampling of `z = f(x, y)` into a point cloud.
//!
//! The sampler walks x (outer) and y (inner) from the minimum to the
//! inclusive maximum by repeatedly adding `step`, evaluates the function at
//! each cell and stores the result as a height field: the point is
//! `(x, f(x, y), y)`, with the sampled value in the vertical slot.
//!
//! Cells where evaluation fails are skipped; sampling itself never fails.

use crate::error::{Error, Result};
use crate::expr::Evaluate;
use crate::geometry::{Point, PointCloud};

/// Validated sampling range and step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleGrid {
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
    step: f64,
}

impl Default for SampleGrid {
    /// x and y over `[-5, 5]` with step 0.2.
    fn default() -> Self {
        Self {
            x_min: -5.0,
            x_max: 5.0,
            y_min: -5.0,
            y_max: 5.0,
            step: 0.2,
        }
    }
}

impl SampleGrid {
    /// Create a grid.
    ///
    /// A minimum above its maximum is accepted and yields no cells.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSampling`] if `step` is not a positive finite
    /// number or any bound is not finite.
    pub fn new(x_min: f64, x_max: f64, y_min: f64, y_max: f64, step: f64) -> Result<Self> {
        if !step.is_finite() || step <= 0.0 {
            return Err(Error::InvalidSampling(format!(
                "step must be a positive finite number, got {step}"
            )));
        }
        for (name, value) in [("xmin", x_min), ("xmax", x_max), ("ymin", y_min), ("ymax", y_max)] {
            if !value.is_finite() {
                return Err(Error::InvalidSampling(format!("{name} must be finite, got {value}")));
            }
        }

        Ok(Self {
            x_min,
            x_max,
            y_min,
            y_max,
            step,
        })
    }

    /// Lower x bound.
    #[must_use]
    pub fn x_min(&self) -> f64 {
        self.x_min
    }

    /// Upper x bound (inclusive).
    #[must_use]
    pub fn x_max(&self) -> f64 {
        self.x_max
    }

    /// Lower y bound.
    #[must_use]
    pub fn y_min(&self) -> f64 {
        self.y_min
    }

    /// Upper y bound (inclusive).
    #[must_use]
    pub fn y_max(&self) -> f64 {
        self.y_max
    }

    /// Increment between samples on both axes.
    #[must_use]
    pub fn step(&self) -> f64 {
        self.step
    }

    /// X values visited by the outer loop.
    pub fn xs(&self) -> impl Iterator<Item = f64> {
        axis(self.x_min, self.x_max, self.step)
    }

    /// Y values visited by the inner loop.
    pub fn ys(&self) -> impl Iterator<Item = f64> {
        axis(self.y_min, self.y_max, self.step)
    }

    /// Number of cells a sampling pass visits.
    #[must_use]
    pub fn candidate_cells(&self) -> usize {
        self.xs().count().saturating_mul(self.ys().count())
    }
}

/// Additive walk from `start` to `end` inclusive.
///
/// Accumulates `step` instead of multiplying, so the visited values carry
/// the same rounding as a plain `v += step` loop. Stops early if the sum
/// stops growing at large magnitudes.
fn axis(start: f64, end: f64, step: f64) -> impl Iterator<Item = f64> {
    let mut next = Some(start);
    std::iter::from_fn(move || {
        let current = next.filter(|v| *v <= end)?;
        let advanced = current + step;
        next = (advanced > current).then_some(advanced);
        Some(current)
    })
}

/// Sample `evaluator` over `grid`.
///
/// Points appear in visit order (x outer, y inner). Failed cells are
/// omitted, never zero-filled.
pub fn sample<E>(evaluator: &E, grid: &SampleGrid) -> PointCloud
where
    E: Evaluate + ?Sized,
{
    let mut cloud = PointCloud::new();
    let mut visited = 0usize;

    for x in grid.xs() {
        for y in grid.ys() {
            visited += 1;
            match evaluator.evaluate(x, y) {
                Ok(z) => cloud.push(Point::new(x, z, y)),
                Err(e) => log::trace!("skipping cell ({x}, {y}): {e}"),
            }
        }
    }

    log::debug!(
        "sampled {} of {} cells ({} skipped)",
        cloud.len(),
        visited,
        visited - cloud.len()
    );
    cloud
}

/// Unit cube corners followed by a helix.
///
/// The helix is `(cos t, sin t, t / 3)` for `t` stepping by 0.1 from 0
/// while `t < 10`.
#[must_use]
pub fn demo_cloud() -> PointCloud {
    let mut cloud: PointCloud = [
        (0.0, 0.0, 0.0),
        (1.0, 0.0, 0.0),
        (0.0, 1.0, 0.0),
        (0.0, 0.0, 1.0),
        (1.0, 1.0, 0.0),
        (1.0, 0.0, 1.0),
        (0.0, 1.0, 1.0),
        (1.0, 1.0, 1.0),
    ]
    .into_iter()
    .map(Point::from)
    .collect();

    let mut t = 0.0_f64;
    while t < 10.0 {
        cloud.push(Point::new(t.cos(), t.sin(), t / 3.0));
        t += 0.1;
    }
    cloud
}

/// The fallback cloud shown when no input is given.
#[must_use]
pub fn default_cloud() -> PointCloud {
    PointCloud::from(vec![
        Point::new(0.0, 0.0, 0.0),
        Point::new(3.0, 4.0, 0.0),
        Point::new(3.0, 4.0, 5.0),
    ])
}
