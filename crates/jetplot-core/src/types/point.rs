//! Plane coordinates and derived bounds.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Sub};

/// A position in shape space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Point;

    fn mul(self, rhs: f64) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned bounds of a point set.
///
/// Never stored on a shape; always recomputed from the current points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub top_left: Point,
    pub bottom_right: Point,
    pub width: f64,
    pub height: f64,
    pub center: Point,
}

impl BoundingBox {
    /// Computes the bounds of `points`, or `None` when there are none.
    pub fn from_points<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Point>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);

        for p in iter {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }

        let width = max_x - min_x;
        let height = max_y - min_y;

        Some(Self {
            top_left: Point::new(min_x, min_y),
            bottom_right: Point::new(max_x, max_y),
            width,
            height,
            center: Point::new(min_x + width / 2.0, min_y + height / 2.0),
        })
    }

    pub fn contains(&self, p: &Point) -> bool {
        p.x >= self.top_left.x
            && p.x <= self.bottom_right.x
            && p.y >= self.top_left.y
            && p.y <= self.bottom_right.y
    }
}
