//! Geometry generators.
//!
//! Stateless functions turning high-level primitives into flattened point
//! sequences. Every function is deterministic: operation-log replay relies
//! on the same inputs producing bit-identical output.
//!
//! `segments` controls flattening resolution; cost grows linearly with it.
//! Degenerate inputs (zero radius, zero segments) are not validated.

use jetplot_core::Point;
use std::f64::consts::TAU;

/// Default flattening resolution for arcs and curves.
pub const DEFAULT_SEGMENTS: usize = 50;

/// Samples `segments + 1` points along a circular arc.
///
/// `total_angle` is in radians; `start_angle` is in degrees, reduced
/// modulo 360. A full turn ends exactly on its first point.
pub fn arc(
    center: Point,
    radius: f64,
    total_angle: f64,
    segments: usize,
    start_angle: f64,
) -> Vec<Point> {
    let start = TAU * ((start_angle % 360.0) / 360.0);
    let angle_segment = total_angle / segments as f64;
    let mut path = Vec::with_capacity(segments + 1);

    for i in 0..=segments {
        let angle = start + angle_segment * i as f64;
        path.push(Point::new(
            center.x + angle.cos() * radius,
            center.y + angle.sin() * radius,
        ));
    }

    if (total_angle.abs() - TAU).abs() < f64::EPSILON && path.len() > 1 {
        let first = path[0];
        if let Some(last) = path.last_mut() {
            *last = first;
        }
    }

    path
}

/// A closed circle: `arc` over a full turn starting at angle zero.
pub fn circle(center: Point, radius: f64, segments: usize) -> Vec<Point> {
    arc(center, radius, TAU, segments, 0.0)
}

/// Axis-aligned rectangle as an explicitly closed 5-point sequence.
pub fn rectangle(top_left: Point, width: f64, height: f64) -> Vec<Point> {
    let Point { x, y } = top_left;
    vec![
        Point::new(x, y),
        Point::new(x + width, y),
        Point::new(x + width, y + height),
        Point::new(x, y + height),
        Point::new(x, y),
    ]
}

/// Evaluates the cubic Bernstein form at `t`.
pub fn point_on_cubic(t: f64, p0: Point, p1: Point, p2: Point, p3: Point) -> Point {
    let inv = 1.0 - t;
    let a = inv * inv * inv;
    let b = 3.0 * inv * inv * t;
    let c = 3.0 * inv * t * t;
    let d = t * t * t;
    Point::new(
        a * p0.x + b * p1.x + c * p2.x + d * p3.x,
        a * p0.y + b * p1.y + c * p2.y + d * p3.y,
    )
}

/// Evaluates the quadratic Bernstein form at `t`.
pub fn point_on_quadratic(t: f64, p0: Point, p1: Point, p2: Point) -> Point {
    let inv = 1.0 - t;
    Point::new(
        inv * inv * p0.x + 2.0 * inv * t * p1.x + t * t * p2.x,
        inv * inv * p0.y + 2.0 * inv * t * p1.y + t * t * p2.y,
    )
}

/// Flattens a cubic Bézier.
///
/// The result excludes `p0` (the caller already holds it) and ends with
/// `p3` itself rather than an evaluated approximation of it.
pub fn cubic_bezier(p0: Point, p1: Point, p2: Point, p3: Point, segments: usize) -> Vec<Point> {
    let step = 1.0 / segments as f64;
    let mut path = Vec::with_capacity(segments.max(1));

    for i in 1..segments {
        path.push(point_on_cubic(step * i as f64, p0, p1, p2, p3));
    }

    path.push(p3);
    path
}

/// Flattens a quadratic Bézier. Same conventions as [`cubic_bezier`].
pub fn quadratic_bezier(p0: Point, p1: Point, p2: Point, segments: usize) -> Vec<Point> {
    let step = 1.0 / segments as f64;
    let mut path = Vec::with_capacity(segments.max(1));

    for i in 1..segments {
        path.push(point_on_quadratic(step * i as f64, p0, p1, p2));
    }

    path.push(p2);
    path
}
