use std::ops::Range;

use image::{Rgb, RgbImage};
use imageproc::{drawing::draw_filled_rect_mut, rect::Rect};

// Solid fill primitives on float geometry. A pixel is filled when its centre lies inside
// the shape, nothing is anti-aliased.
//------------------------------------------------------------------------------

pub trait Draw {
    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: Rgb<u8>);
    fn fill_circle(&mut self, cx: f64, cy: f64, radius: f64, color: Rgb<u8>);
    fn fill_rounded_rect(&mut self, x: f64, y: f64, w: f64, h: f64, radius: f64, color: Rgb<u8>);
}

// Pixels whose centre falls in [from, to), clipped to [0, limit)
fn pixel_span(from: f64, to: f64, limit: u32) -> Range<u32> {
    let start = (from - 0.5).ceil().clamp(0.0, limit as f64) as u32;
    let end = (to - 0.5).ceil().clamp(0.0, limit as f64) as u32;
    start..end.max(start)
}

impl Draw for RgbImage {
    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: Rgb<u8>) {
        let xs = pixel_span(x, x + w, self.width());
        let ys = pixel_span(y, y + h, self.height());
        if xs.is_empty() || ys.is_empty() {
            return;
        }
        let (w, h) = (xs.len() as u32, ys.len() as u32);
        let rect = Rect::at(xs.start as i32, ys.start as i32).of_size(w, h);
        draw_filled_rect_mut(self, rect, color);
    }

    fn fill_circle(&mut self, cx: f64, cy: f64, radius: f64, color: Rgb<u8>) {
        // Closed disc, so the span is widened by one pixel and tested per pixel
        let xs = pixel_span(cx - radius, cx + radius + 1.0, self.width());
        let ys = pixel_span(cy - radius, cy + radius + 1.0, self.height());
        let r2 = radius * radius;
        for py in ys {
            let dy = py as f64 + 0.5 - cy;
            for px in xs.clone() {
                let dx = px as f64 + 0.5 - cx;
                if dx * dx + dy * dy <= r2 {
                    self.put_pixel(px, py, color);
                }
            }
        }
    }

    fn fill_rounded_rect(&mut self, x: f64, y: f64, w: f64, h: f64, radius: f64, color: Rgb<u8>) {
        let radius = radius.min(w / 2.0).min(h / 2.0).max(0.0);
        // Corner arcs are centred on the corners of the inner rect
        let (left, right) = (x + radius, x + w - radius);
        let (top, bottom) = (y + radius, y + h - radius);
        let r2 = radius * radius;

        let xs = pixel_span(x, x + w, self.width());
        let ys = pixel_span(y, y + h, self.height());
        for py in ys {
            let fy = py as f64 + 0.5;
            let dy = fy - fy.max(top).min(bottom);
            for px in xs.clone() {
                let fx = px as f64 + 0.5;
                let dx = fx - fx.max(left).min(right);
                if dx * dx + dy * dy <= r2 {
                    self.put_pixel(px, py, color);
                }
            }
        }
    }
}
