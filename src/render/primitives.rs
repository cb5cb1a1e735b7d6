//! Primitive rendering functions.

use crate::color::Rgba;
use crate::surface::Surface;

/// Samples per pixel along each axis.
pub const SUBSAMPLES: u32 = 4;

/// Trait for drawable primitives.
pub trait Drawable {
    /// Draw this primitive onto a surface.
    fn draw(&self, surface: &mut Surface, color: Rgba);
}

/// An axis-aligned ellipse outline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipse {
    /// Center x.
    pub cx: f32,
    /// Center y.
    pub cy: f32,
    /// Horizontal radius.
    pub rx: f32,
    /// Vertical radius.
    pub ry: f32,
    /// Stroke width, centered on the ellipse path.
    pub line_width: f32,
}

impl Ellipse {
    /// Create an ellipse outline.
    #[must_use]
    pub const fn new(cx: f32, cy: f32, rx: f32, ry: f32, line_width: f32) -> Self {
        Self {
            cx,
            cy,
            rx,
            ry,
            line_width,
        }
    }
}

impl Drawable for Ellipse {
    fn draw(&self, surface: &mut Surface, color: Rgba) {
        stroke_ellipse(surface, self, color);
    }
}

/// A filled circle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    /// Center x.
    pub cx: f32,
    /// Center y.
    pub cy: f32,
    /// Radius.
    pub radius: f32,
}

impl Circle {
    /// Create a filled circle.
    #[must_use]
    pub const fn new(cx: f32, cy: f32, radius: f32) -> Self {
        Self { cx, cy, radius }
    }
}

impl Drawable for Circle {
    fn draw(&self, surface: &mut Surface, color: Rgba) {
        fill_circle(surface, self.cx, self.cy, self.radius, color);
    }
}

// ============================================================================
// Ellipse
// ============================================================================

/// Stroke an ellipse outline.
///
/// Zero or negative radii draw nothing.
pub fn stroke_ellipse(surface: &mut Surface, ellipse: &Ellipse, color: Rgba) {
    if ellipse.rx <= 0.0 || ellipse.ry <= 0.0 || ellipse.line_width <= 0.0 {
        return;
    }

    let half = ellipse.line_width / 2.0;
    let (outer_rx, outer_ry) = (ellipse.rx + half, ellipse.ry + half);
    let (inner_rx, inner_ry) = (ellipse.rx - half, ellipse.ry - half);
    let has_hole = inner_rx > 0.0 && inner_ry > 0.0;

    let (cx, cy) = (ellipse.cx, ellipse.cy);
    let covered = |x: f32, y: f32| {
        let in_outer = unit_distance(x - cx, y - cy, outer_rx, outer_ry) <= 1.0;
        let in_inner = has_hole && unit_distance(x - cx, y - cy, inner_rx, inner_ry) < 1.0;
        in_outer && !in_inner
    };

    rasterize(
        surface,
        (cx - outer_rx, cy - outer_ry, cx + outer_rx, cy + outer_ry),
        color,
        covered,
    );
}

/// Squared normalized distance of `(dx, dy)` from an ellipse center.
#[inline]
fn unit_distance(dx: f32, dy: f32, rx: f32, ry: f32) -> f32 {
    (dx / rx).powi(2) + (dy / ry).powi(2)
}

// ============================================================================
// Circle
// ============================================================================

/// Fill a circle.
///
/// Zero or negative radii draw nothing.
pub fn fill_circle(surface: &mut Surface, cx: f32, cy: f32, radius: f32, color: Rgba) {
    if radius <= 0.0 {
        return;
    }

    let r2 = radius * radius;
    rasterize(
        surface,
        (cx - radius, cy - radius, cx + radius, cy + radius),
        color,
        |x, y| (x - cx).powi(2) + (y - cy).powi(2) <= r2,
    );
}

// ============================================================================
// Coverage
// ============================================================================

/// Blend `color` into every pixel of the bounding box, weighted by the share
/// of its subsamples for which `covered` holds.
fn rasterize<F>(surface: &mut Surface, bounds: (f32, f32, f32, f32), color: Rgba, covered: F)
where
    F: Fn(f32, f32) -> bool,
{
    let (min_x, min_y, max_x, max_y) = bounds;
    let x_start = min_x.floor().max(0.0) as u32;
    let y_start = min_y.floor().max(0.0) as u32;
    let x_end = (max_x.ceil().max(0.0) as u32).min(surface.width());
    let y_end = (max_y.ceil().max(0.0) as u32).min(surface.height());

    let step = 1.0 / SUBSAMPLES as f32;
    let total = (SUBSAMPLES * SUBSAMPLES) as f32;

    for py in y_start..y_end {
        for px in x_start..x_end {
            let mut hits = 0u32;
            for sy in 0..SUBSAMPLES {
                let y = py as f32 + (sy as f32 + 0.5) * step;
                for sx in 0..SUBSAMPLES {
                    let x = px as f32 + (sx as f32 + 0.5) * step;
                    if covered(x, y) {
                        hits += 1;
                    }
                }
            }

            if hits > 0 {
                let alpha = (f32::from(color.a) * hits as f32 / total).round() as u8;
                surface.blend_pixel(px, py, color.with_alpha(alpha));
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
