use image::{Rgba, RgbaImage};

use crate::stroke::{Paint, StrokeCap, StrokeShape};

/// Paints recorded strokes onto the backing raster.
///
/// The whiteboard owns the raster; the compositor only knows how to draw on
/// it and how to ask the host for a new frame.
pub trait RasterCompositor {
    /// Reset every pixel of the raster to transparent
    fn clear_raster(&mut self, raster: &mut RgbaImage);

    /// Draw one stroke with its own paint attributes
    fn draw_onto(&mut self, raster: &mut RgbaImage, shape: &StrokeShape, paint: &Paint);

    /// Ask the host to present the raster again
    fn request_repaint(&mut self);
}

/// CPU compositor stamping a pen footprint along each stroke
#[derive(Default)]
pub struct SoftwareCompositor {
    repaint: Option<egui::Context>,
}

impl std::fmt::Debug for SoftwareCompositor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SoftwareCompositor")
            .field("repaint", &self.repaint.is_some())
            .finish()
    }
}

impl SoftwareCompositor {
    pub fn new() -> Self {
        Self { repaint: None }
    }

    /// Forward repaint requests to an egui context
    pub fn with_repaint_context(ctx: egui::Context) -> Self {
        Self { repaint: Some(ctx) }
    }
}

impl RasterCompositor for SoftwareCompositor {
    fn clear_raster(&mut self, raster: &mut RgbaImage) {
        for pixel in raster.pixels_mut() {
            *pixel = Rgba([0, 0, 0, 0]);
        }
    }

    fn draw_onto(&mut self, raster: &mut RgbaImage, shape: &StrokeShape, paint: &Paint) {
        let outline = shape.outline();
        let Some(mask) = CoverageMask::stamp(&outline, paint, raster.width(), raster.height()) else {
            return;
        };
        let [r, g, b, a] = paint.color.to_srgba_unmultiplied();
        mask.blend(raster, [r, g, b], a);
    }

    fn request_repaint(&mut self) {
        if let Some(ctx) = &self.repaint {
            ctx.request_repaint();
        }
    }
}

/// Pixels covered by one stroke. Each pixel is blended once, so
/// translucent pens do not darken where stamps overlap.
struct CoverageMask {
    left: u32,
    top: u32,
    width: u32,
    height: u32,
    covered: Vec<bool>,
}

impl CoverageMask {
    fn stamp(outline: &[egui::Pos2], paint: &Paint, raster_width: u32, raster_height: u32) -> Option<Self> {
        let radius = (paint.width / 2.0).max(0.5);
        let bounds = crate::geometry::calculate_bounds(outline, radius + 1.0);
        if !bounds.is_positive() {
            return None;
        }
        let left = bounds.min.x.max(0.0) as u32;
        let top = bounds.min.y.max(0.0) as u32;
        let right = (bounds.max.x.max(0.0) as u32).min(raster_width);
        let bottom = (bounds.max.y.max(0.0) as u32).min(raster_height);
        if left >= right || top >= bottom {
            return None;
        }

        let mut mask = Self {
            left,
            top,
            width: right - left,
            height: bottom - top,
            covered: vec![false; ((right - left) * (bottom - top)) as usize],
        };
        let round = paint.cap == StrokeCap::Round;
        let spacing = (radius / 2.0).max(0.5);

        match outline {
            [] => return None,
            [only] => mask.stamp_pen(*only, radius, round),
            _ => {
                for pair in outline.windows(2) {
                    let (from, to) = (pair[0], pair[1]);
                    let steps = (from.distance(to) / spacing).ceil().max(1.0) as usize;
                    for step in 0..=steps {
                        let t = step as f32 / steps as f32;
                        mask.stamp_pen(from.lerp(to, t), radius, round);
                    }
                }
            }
        }
        Some(mask)
    }

    fn stamp_pen(&mut self, center: egui::Pos2, radius: f32, round: bool) {
        let x0 = ((center.x - radius).floor() as i64).max(self.left as i64);
        let y0 = ((center.y - radius).floor() as i64).max(self.top as i64);
        let x1 = ((center.x + radius).ceil() as i64).min((self.left + self.width) as i64);
        let y1 = ((center.y + radius).ceil() as i64).min((self.top + self.height) as i64);
        for y in y0..y1 {
            for x in x0..x1 {
                let dx = x as f32 + 0.5 - center.x;
                let dy = y as f32 + 0.5 - center.y;
                let inside = if round {
                    dx * dx + dy * dy <= radius * radius
                } else {
                    dx.abs() <= radius && dy.abs() <= radius
                };
                if inside {
                    let index = (y as u32 - self.top) * self.width + (x as u32 - self.left);
                    self.covered[index as usize] = true;
                }
            }
        }
    }

    fn blend(&self, raster: &mut RgbaImage, rgb: [u8; 3], alpha: u8) {
        for (index, covered) in self.covered.iter().enumerate() {
            if !covered {
                continue;
            }
            let x = self.left + index as u32 % self.width;
            let y = self.top + index as u32 / self.width;
            let dst = raster.get_pixel_mut(x, y);
            *dst = source_over(*dst, rgb, alpha);
        }
    }
}

/// Unpremultiplied source-over blend
pub(crate) fn source_over(dst: Rgba<u8>, rgb: [u8; 3], alpha: u8) -> Rgba<u8> {
    let sa = alpha as f32 / 255.0;
    let da = dst[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        return Rgba([0, 0, 0, 0]);
    }
    let channel = |s: u8, d: u8| {
        let value = (s as f32 * sa + d as f32 * da * (1.0 - sa)) / out_a;
        value.round().clamp(0.0, 255.0) as u8
    };
    Rgba([
        channel(rgb[0], dst[0]),
        channel(rgb[1], dst[1]),
        channel(rgb[2], dst[2]),
        (out_a * 255.0).round() as u8,
    ])
}
