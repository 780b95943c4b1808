use rayon::prelude::*;

use crate::buffer::{PixelBuffer, PixelFormat};
use crate::consts::PARALLEL_PIXEL_THRESHOLD;
use crate::geometry::{Point, Rect, Size};

use super::CanvasSurface;

/// Resampling used when the image is drawn at a non-unit scale.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SamplingFilter {
    #[default]
    Nearest,
    Bilinear,
}

/// One entry of the per-frame drawable list, in surface coordinates.
#[derive(Clone, Copy, Debug)]
pub enum DrawItem<'a> {
    Background {
        color: [u8; 3],
    },
    Image {
        buffer: &'a PixelBuffer,
        dest: Rect,
        filter: SamplingFilter,
    },
    Line {
        from: Point,
        to: Point,
        color: [u8; 3],
        width: f32,
    },
}

/// Software rendering of `items` clipped to `region`, as an RGB8 bitmap.
///
/// The region is snapped outwards to whole pixels. Pixels are sampled at
/// their centers.
pub fn rasterize(items: &[DrawItem<'_>], region: Rect) -> PixelBuffer {
    let ox = region.x.floor();
    let oy = region.y.floor();
    let w = (region.right().ceil() - ox).max(0.0) as usize;
    let h = (region.bottom().ceil() - oy).max(0.0) as usize;
    if w == 0 || h == 0 {
        return PixelBuffer::empty();
    }

    let mut out = vec![0u8; w * h * 3];
    let canvas = Canvas { ox, oy, w, h };
    for item in items {
        match *item {
            DrawItem::Background { color } => {
                out.chunks_exact_mut(3).for_each(|px| px.copy_from_slice(&color));
            }
            DrawItem::Image {
                buffer,
                dest,
                filter,
            } => paint_image(&mut out, &canvas, buffer, dest, filter),
            DrawItem::Line {
                from,
                to,
                color,
                width,
            } => paint_line(&mut out, &canvas, from, to, color, width),
        }
    }

    PixelBuffer::from_sized(w as u32, h as u32, PixelFormat::Rgb8, out)
}

struct Canvas {
    ox: f64,
    oy: f64,
    w: usize,
    h: usize,
}

fn paint_image(
    out: &mut [u8],
    canvas: &Canvas,
    buffer: &PixelBuffer,
    dest: Rect,
    filter: SamplingFilter,
) {
    if buffer.is_empty() || dest.is_empty() {
        return;
    }
    let paint_row = |(j, row): (usize, &mut [u8])| {
        let cy = canvas.oy + j as f64 + 0.5;
        if cy < dest.y || cy >= dest.bottom() {
            return;
        }
        let v = (cy - dest.y) / dest.height * buffer.height() as f64;
        for (i, px) in row.chunks_exact_mut(3).enumerate() {
            let cx = canvas.ox + i as f64 + 0.5;
            if cx < dest.x || cx >= dest.right() {
                continue;
            }
            let u = (cx - dest.x) / dest.width * buffer.width() as f64;
            let rgb = match filter {
                SamplingFilter::Nearest => sample_nearest(buffer, u, v),
                SamplingFilter::Bilinear => sample_bilinear(buffer, u, v),
            };
            px.copy_from_slice(&rgb);
        }
    };

    let stride = canvas.w * 3;
    if canvas.w * canvas.h >= PARALLEL_PIXEL_THRESHOLD {
        out.par_chunks_mut(stride).enumerate().for_each(paint_row);
    } else {
        out.chunks_mut(stride).enumerate().for_each(paint_row);
    }
}

fn fetch(buffer: &PixelBuffer, x: u32, y: u32) -> [u8; 3] {
    buffer.pixel(x, y).unwrap_or_default()
}

fn sample_nearest(buffer: &PixelBuffer, u: f64, v: f64) -> [u8; 3] {
    let x = (u.max(0.0) as u32).min(buffer.width() - 1);
    let y = (v.max(0.0) as u32).min(buffer.height() - 1);
    fetch(buffer, x, y)
}

fn sample_bilinear(buffer: &PixelBuffer, u: f64, v: f64) -> [u8; 3] {
    let max_x = buffer.width() - 1;
    let max_y = buffer.height() - 1;
    let fx = (u - 0.5).max(0.0);
    let fy = (v - 0.5).max(0.0);
    let x0 = (fx as u32).min(max_x);
    let y0 = (fy as u32).min(max_y);
    let x1 = (x0 + 1).min(max_x);
    let y1 = (y0 + 1).min(max_y);
    let tx = (fx - x0 as f64).clamp(0.0, 1.0);
    let ty = (fy - y0 as f64).clamp(0.0, 1.0);

    let p00 = fetch(buffer, x0, y0);
    let p10 = fetch(buffer, x1, y0);
    let p01 = fetch(buffer, x0, y1);
    let p11 = fetch(buffer, x1, y1);
    std::array::from_fn(|c| {
        let top = p00[c] as f64 * (1.0 - tx) + p10[c] as f64 * tx;
        let bottom = p01[c] as f64 * (1.0 - tx) + p11[c] as f64 * tx;
        (top * (1.0 - ty) + bottom * ty).round().clamp(0.0, 255.0) as u8
    })
}

fn paint_line(out: &mut [u8], canvas: &Canvas, from: Point, to: Point, color: [u8; 3], width: f32) {
    let half = (width as f64 / 2.0).max(0.5);
    let min_x = ((from.x.min(to.x) - half - canvas.ox).floor().max(0.0)) as usize;
    let min_y = ((from.y.min(to.y) - half - canvas.oy).floor().max(0.0)) as usize;
    let max_x = ((from.x.max(to.x) + half - canvas.ox).ceil().max(0.0) as usize).min(canvas.w);
    let max_y = ((from.y.max(to.y) + half - canvas.oy).ceil().max(0.0) as usize).min(canvas.h);

    for j in min_y..max_y {
        for i in min_x..max_x {
            let p = Point::new(canvas.ox + i as f64 + 0.5, canvas.oy + j as f64 + 0.5);
            if distance_to_segment(p, from, to) <= half {
                let idx = (j * canvas.w + i) * 3;
                out[idx..idx + 3].copy_from_slice(&color);
            }
        }
    }
}

fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let len2 = dx * dx + dy * dy;
    let t = if len2 == 0.0 {
        0.0
    } else {
        (((p.x - a.x) * dx + (p.y - a.y) * dy) / len2).clamp(0.0, 1.0)
    };
    let (cx, cy) = (a.x + t * dx, a.y + t * dy);
    (p.x - cx).hypot(p.y - cy)
}

/// Off-screen [`CanvasSurface`] that keeps the last painted frame.
pub struct RasterSurface {
    size: Size,
    frame: PixelBuffer,
}

impl RasterSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: Size::new(width as f64, height as f64),
            frame: PixelBuffer::empty(),
        }
    }

    pub fn set_size(&mut self, width: u32, height: u32) {
        self.size = Size::new(width as f64, height as f64);
    }

    /// Last painted frame; empty until the first draw.
    pub fn frame(&self) -> &PixelBuffer {
        &self.frame
    }

    pub fn into_frame(self) -> PixelBuffer {
        self.frame
    }
}

impl CanvasSurface for RasterSurface {
    fn size(&self) -> Size {
        self.size
    }

    fn draw(&mut self, items: &[DrawItem<'_>]) {
        self.frame = rasterize(items, Rect::from_size(self.size));
    }
}
