//! Stipple fill sampling.
//!
//! Approximates a solid fill with dots on a regular grid. The grid lives in
//! device space (`shape * device_scale`) and is anchored at the device
//! origin, so two shapes filled with the same density share grid lines no
//! matter where their bounds start.

use crate::shape::FinalizedShape;
use jetplot_core::{BoundingBox, Point, RenderSurface};

/// Grid sampler for stipple fills.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DotFill {
    /// Device pixels per shape unit.
    pub device_scale: f64,
    /// Device pixels between neighboring samples before density is applied.
    pub sample_stride: u32,
}

impl Default for DotFill {
    fn default() -> Self {
        Self {
            device_scale: 2.0,
            sample_stride: 2,
        }
    }
}

impl DotFill {
    pub fn new(device_scale: f64, sample_stride: u32) -> Self {
        Self {
            device_scale,
            sample_stride,
        }
    }

    /// Samples the area enclosed by `subpaths` (even-odd) in row-major order.
    ///
    /// Only every `density`-th grid row and column is kept, so the count
    /// drops roughly with `1 / density²`. A density of 0 is treated as 1.
    pub fn sample<S>(&self, subpaths: &[Vec<Point>], density: u32, surface: &S) -> Vec<Point>
    where
        S: RenderSurface + ?Sized,
    {
        let Some(bounds) = BoundingBox::from_points(subpaths.iter().flatten()) else {
            return Vec::new();
        };
        if self.device_scale.is_nan()
            || self.device_scale <= 0.0
            || !bounds.top_left.is_finite()
            || !bounds.bottom_right.is_finite()
        {
            return Vec::new();
        }

        let scale = self.device_scale;
        let stride = self.sample_stride.max(1) as f64;
        let density = i64::from(density.max(1));

        let first_col = (bounds.top_left.x * scale / stride).ceil() as i64;
        let last_col = (bounds.bottom_right.x * scale / stride).floor() as i64;
        let first_row = (bounds.top_left.y * scale / stride).ceil() as i64;
        let last_row = (bounds.bottom_right.y * scale / stride).floor() as i64;

        let mut dots = Vec::new();

        for row in first_row..=last_row {
            if row.rem_euclid(density) != 0 {
                continue;
            }
            let y = row as f64 * stride / scale;

            for col in first_col..=last_col {
                if col.rem_euclid(density) != 0 {
                    continue;
                }
                let x = col as f64 * stride / scale;

                let crossings = subpaths
                    .iter()
                    .filter(|path| surface.point_in_closed_path(path, x, y))
                    .count();
                if crossings % 2 == 1 {
                    dots.push(Point::new(x, y));
                }
            }
        }

        tracing::debug!(
            "Dot fill: {} dot(s) at density {} over {:.1}x{:.1}",
            dots.len(),
            density,
            bounds.width,
            bounds.height
        );
        dots
    }

    /// Fills `shape.dots` from its own subpaths and density.
    pub fn fill_shape<S>(&self, shape: &mut FinalizedShape, surface: &S)
    where
        S: RenderSurface + ?Sized,
    {
        shape.dots = self.sample(&shape.subpaths, shape.density(), surface);
    }
}
