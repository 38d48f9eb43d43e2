//! Drawing finalized shapes onto a [`RenderSurface`].

use crate::commands::{DEFAULT_FILL, DEFAULT_STROKE};
use crate::shape::{FinalizedShape, ShapeKind};
use jetplot_core::RenderSurface;

/// Colors used for shapes that carry none of their own.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    pub stroke: String,
    pub fill: String,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            stroke: DEFAULT_STROKE.to_string(),
            fill: DEFAULT_FILL.to_string(),
        }
    }
}

impl Palette {
    pub fn new(stroke: impl Into<String>, fill: impl Into<String>) -> Self {
        Self {
            stroke: stroke.into(),
            fill: fill.into(),
        }
    }

    pub fn color_for<'a>(&'a self, shape: &'a FinalizedShape) -> &'a str {
        match (&shape.style.color, shape.kind) {
            (Some(color), _) => color,
            (None, ShapeKind::Outline) => &self.stroke,
            (None, ShapeKind::Stipple) => &self.fill,
        }
    }
}

/// Strokes every subpath of an outline or places every dot of a stipple.
pub fn draw_shape<S>(shape: &FinalizedShape, surface: &mut S, palette: &Palette)
where
    S: RenderSurface + ?Sized,
{
    let color = palette.color_for(shape);
    match shape.kind {
        ShapeKind::Outline => {
            for subpath in &shape.subpaths {
                surface.stroke_closed_path(subpath, color);
            }
        }
        ShapeKind::Stipple => {
            for dot in &shape.dots {
                surface.place_dot(dot.x, dot.y, color);
            }
        }
    }
}
