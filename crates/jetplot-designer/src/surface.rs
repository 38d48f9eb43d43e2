//! Raster rendering surface backed by `tiny-skia`.

use jetplot_core::{ray_cast_contains, Error, Point, RenderSurface, Result};
use std::path::Path;
use tiny_skia::{Color, FillRule, Paint, PathBuilder, Pixmap, Stroke, Transform};

const NAMED_COLORS: &[(&str, [u8; 3])] = &[
    ("black", [0, 0, 0]),
    ("white", [255, 255, 255]),
    ("red", [255, 0, 0]),
    ("green", [0, 128, 0]),
    ("lime", [0, 255, 0]),
    ("blue", [0, 0, 255]),
    ("cyan", [0, 255, 255]),
    ("magenta", [255, 0, 255]),
    ("yellow", [255, 255, 0]),
    ("orange", [255, 165, 0]),
    ("purple", [128, 0, 128]),
    ("gray", [128, 128, 128]),
    ("grey", [128, 128, 128]),
];

/// Parses a color token: a CSS name from a small table, `#rgb`,
/// `#rrggbb`, or `rgb(r, g, b)`.
pub fn parse_color(token: &str) -> Option<[u8; 3]> {
    let token = token.trim().to_ascii_lowercase();

    if let Some(hex) = token.strip_prefix('#') {
        let digits: Vec<u8> = hex
            .chars()
            .map(|c| c.to_digit(16).map(|d| d as u8))
            .collect::<Option<_>>()?;
        return match digits.as_slice() {
            [r, g, b] => Some([r * 17, g * 17, b * 17]),
            [r1, r2, g1, g2, b1, b2] => Some([r1 * 16 + r2, g1 * 16 + g2, b1 * 16 + b2]),
            _ => None,
        };
    }

    if let Some(inner) = token.strip_prefix("rgb(").and_then(|s| s.strip_suffix(')')) {
        let channels: Vec<u8> = inner
            .split(',')
            .map(|c| c.trim().parse::<u8>().ok())
            .collect::<Option<_>>()?;
        return match channels.as_slice() {
            [r, g, b] => Some([*r, *g, *b]),
            _ => None,
        };
    }

    NAMED_COLORS
        .iter()
        .find(|(name, _)| *name == token)
        .map(|(_, rgb)| *rgb)
}

fn paint_for(color: &str) -> Paint<'static> {
    let [r, g, b] = parse_color(color).unwrap_or_else(|| {
        tracing::warn!("Unknown color '{}', using black", color);
        [0, 0, 0]
    });
    let mut paint = Paint::default();
    paint.set_color(Color::from_rgba8(r, g, b, 255));
    paint.anti_alias = true;
    paint
}

/// A [`RenderSurface`] drawing into an in-memory pixmap.
///
/// Shape coordinates are multiplied by `device_scale` to get pixels, so a
/// 640x480 canvas at scale 2 is a 1280x960 image.
pub struct PixmapSurface {
    pixmap: Pixmap,
    device_scale: f32,
    stroke_width: f32,
    dot_radius: f32,
}

impl PixmapSurface {
    /// Creates a white surface of `width` x `height` shape units.
    pub fn new(width: u32, height: u32, device_scale: f32) -> Result<Self> {
        let pixel_width = (width as f32 * device_scale).round() as u32;
        let pixel_height = (height as f32 * device_scale).round() as u32;
        let mut pixmap = Pixmap::new(pixel_width, pixel_height).ok_or_else(|| {
            Error::other(format!(
                "Cannot allocate a {}x{} pixmap",
                pixel_width, pixel_height
            ))
        })?;
        pixmap.fill(Color::WHITE);

        Ok(Self {
            pixmap,
            device_scale,
            stroke_width: 1.0,
            dot_radius: 1.0,
        })
    }

    pub fn with_stroke_width(mut self, width: f32) -> Self {
        self.stroke_width = width;
        self
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// RGB of the pixel at device coordinates, if in bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        self.pixmap.pixel(x, y).map(|p| {
            let c = p.demultiply();
            [c.red(), c.green(), c.blue()]
        })
    }

    pub fn clear(&mut self) {
        self.pixmap.fill(Color::WHITE);
    }

    pub fn encode_png(&self) -> Result<Vec<u8>> {
        self.pixmap
            .encode_png()
            .map_err(|e| Error::other(format!("PNG encoding failed: {}", e)))
    }

    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<()> {
        let bytes = self.encode_png()?;
        std::fs::write(path.as_ref(), bytes)?;
        tracing::info!(
            "Wrote {}x{} image to {}",
            self.width(),
            self.height(),
            path.as_ref().display()
        );
        Ok(())
    }

    fn transform(&self) -> Transform {
        Transform::from_scale(self.device_scale, self.device_scale)
    }
}

impl RenderSurface for PixmapSurface {
    fn point_in_closed_path(&self, path: &[Point], x: f64, y: f64) -> bool {
        ray_cast_contains(path, x, y)
    }

    fn stroke_closed_path(&mut self, path: &[Point], color: &str) {
        let Some((first, rest)) = path.split_first() else {
            return;
        };

        let mut pb = PathBuilder::new();
        pb.move_to(first.x as f32, first.y as f32);
        for p in rest {
            pb.line_to(p.x as f32, p.y as f32);
        }
        let Some(outline) = pb.finish() else {
            return;
        };

        let stroke = Stroke {
            width: self.stroke_width,
            ..Default::default()
        };
        let transform = self.transform();
        self.pixmap
            .stroke_path(&outline, &paint_for(color), &stroke, transform, None);
    }

    fn place_dot(&mut self, x: f64, y: f64, color: &str) {
        let Some(dot) = PathBuilder::from_circle(x as f32, y as f32, self.dot_radius) else {
            return;
        };
        let transform = self.transform();
        self.pixmap
            .fill_path(&dot, &paint_for(color), FillRule::Winding, transform, None);
    }
}

impl std::fmt::Debug for PixmapSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixmapSurface")
            .field("width", &self.pixmap.width())
            .field("height", &self.pixmap.height())
            .field("device_scale", &self.device_scale)
            .finish()
    }
}
