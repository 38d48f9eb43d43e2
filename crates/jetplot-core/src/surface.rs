//! Rendering surface interface
//!
//! Defines the only drawing capabilities the plotting core ever uses. A
//! surface implementation owns the pixels; the core hands it closed point
//! sequences and dot positions.

use crate::types::Point;

/// Drawing capabilities required from a rendering collaborator.
pub trait RenderSurface {
    /// Returns true when `(x, y)` is enclosed by the closed polygon `path`.
    ///
    /// The polygon is implicitly closed: the last point connects back to the
    /// first.
    fn point_in_closed_path(&self, path: &[Point], x: f64, y: f64) -> bool;

    /// Strokes the outline `path` with `color`.
    fn stroke_closed_path(&mut self, path: &[Point], color: &str);

    /// Places a small filled dot at `(x, y)` with `color`.
    fn place_dot(&mut self, x: f64, y: f64, color: &str);
}

impl<S: RenderSurface + ?Sized> RenderSurface for &mut S {
    fn point_in_closed_path(&self, path: &[Point], x: f64, y: f64) -> bool {
        (**self).point_in_closed_path(path, x, y)
    }

    fn stroke_closed_path(&mut self, path: &[Point], color: &str) {
        (**self).stroke_closed_path(path, color)
    }

    fn place_dot(&mut self, x: f64, y: f64, color: &str) {
        (**self).place_dot(x, y, color)
    }
}

/// Even-odd ray casting test of `(x, y)` against an implicitly closed polygon.
///
/// Surfaces without a native hit test can delegate to this.
pub fn ray_cast_contains(path: &[Point], x: f64, y: f64) -> bool {
    if path.len() < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = path.len() - 1;

    for i in 0..path.len() {
        let (xi, yi) = (path[i].x, path[i].y);
        let (xj, yj) = (path[j].x, path[j].y);

        if ((yi > y) != (yj > y)) && (x < (xj - xi) * (y - yi) / (yj - yi) + xi) {
            inside = !inside;
        }
        j = i;
    }

    inside
}
