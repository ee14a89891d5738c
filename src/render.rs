use image::{Rgba, RgbaImage};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::contour::{Contour, Point};
use crate::field::HeightField;
use crate::grid::CellGrid;
use crate::tiles::Dir;

// Map palette: light blue water, soft green land, ink-black coastlines.
const WATER: Rgba<u8> = Rgba([150, 200, 255, 255]);
const LAND: Rgba<u8> = Rgba([90, 195, 140, 255]);
const INK: Rgba<u8> = Rgba([0, 0, 0, 255]);

const GRID_COLOR: Rgba<u8> = Rgba([150, 150, 150, 255]);
const LAND_DOT: Rgba<u8> = Rgba([0, 150, 0, 255]);
const WATER_DOT: Rgba<u8> = Rgba([200, 0, 0, 255]);
const RAW_LINK: Rgba<u8> = Rgba([220, 40, 40, 255]);

/// Straight spans each curve segment is flattened into before filling
/// and stroking.
const CURVE_SAMPLES: usize = 8;

/// Arc-length spacing of the coastline ink dots, in pixels.
const DOT_SPACING: f32 = 1.0;

/// Renderer collaborator: fits a smooth curve through each contour's
/// control points and accumulates fills and stroked coastlines into a
/// persistent image buffer. The tracer core never touches pixels.
pub struct MapRenderer {
    canvas: RgbaImage,
    rng: ChaCha8Rng,
}

impl MapRenderer {
    pub fn new(width: u32, height: u32, seed: u64) -> Self {
        Self {
            canvas: RgbaImage::from_pixel(width, height, WATER),
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn canvas(&self) -> &RgbaImage {
        &self.canvas
    }

    /// Reset the accumulated image to open water.
    pub fn clear(&mut self) {
        for pixel in self.canvas.pixels_mut() {
            *pixel = WATER;
        }
    }

    /// Draw one closed contour: filled interior plus a stippled ink
    /// coastline.
    pub fn draw_contour(&mut self, contour: &Contour) {
        let curve = sample_curve(&contour.points, CURVE_SAMPLES);
        if curve.len() < 3 {
            return;
        }

        let fill = if contour.encloses_land { LAND } else { WATER };
        self.fill_polygon(&curve, fill);
        self.stroke_stippled(&curve);
    }

    /// Even-odd scanline fill of a closed polygon.
    fn fill_polygon(&mut self, poly: &[Point], color: Rgba<u8>) {
        let min_y = poly.iter().map(|p| p.y).fold(f32::INFINITY, f32::min);
        let max_y = poly.iter().map(|p| p.y).fold(f32::NEG_INFINITY, f32::max);
        let y0 = (min_y.floor().max(0.0)) as i32;
        let y1 = (max_y.ceil() as i32).min(self.canvas.height() as i32 - 1);

        let mut hits: Vec<f32> = Vec::new();
        for y in y0..=y1 {
            let yc = y as f32 + 0.5;
            hits.clear();
            for i in 0..poly.len() {
                let a = poly[i];
                let b = poly[(i + 1) % poly.len()];
                if (a.y <= yc) != (b.y <= yc) {
                    hits.push(a.x + (yc - a.y) / (b.y - a.y) * (b.x - a.x));
                }
            }
            hits.sort_by(|a, b| a.total_cmp(b));
            for pair in hits.chunks_exact(2) {
                let x0 = pair[0].round().max(0.0) as i32;
                let x1 = pair[1].round() as i32;
                for x in x0..x1 {
                    put(&mut self.canvas, x, y, color);
                }
            }
        }
    }

    /// Ink dots of jittered radius at ~1 px intervals; overlapping discs
    /// read as a hand-drawn coast.
    fn stroke_stippled(&mut self, curve: &[Point]) {
        let mut carry = 0.0;
        for span in curve.windows(2) {
            let (a, b) = (span[0], span[1]);
            let dx = b.x - a.x;
            let dy = b.y - a.y;
            let len = (dx * dx + dy * dy).sqrt();
            if len <= f32::EPSILON {
                continue;
            }

            let mut t = carry;
            while t < len {
                let radius = self.rng.gen_range(1.5..3.0);
                self.dot(a.x + dx * t / len, a.y + dy * t / len, radius);
                t += DOT_SPACING;
            }
            carry = t - len;
        }
    }

    fn dot(&mut self, cx: f32, cy: f32, radius: f32) {
        let r2 = radius * radius;
        let x0 = (cx - radius).floor() as i32;
        let x1 = (cx + radius).ceil() as i32;
        let y0 = (cy - radius).floor() as i32;
        let y1 = (cy + radius).ceil() as i32;
        for y in y0..=y1 {
            for x in x0..=x1 {
                let dx = x as f32 + 0.5 - cx;
                let dy = y as f32 + 0.5 - cy;
                if dx * dx + dy * dy <= r2 {
                    put(&mut self.canvas, x, y, INK);
                }
            }
        }
    }
}

/// Sample a Catmull-Rom spline through the control polyline. The first and
/// last control points steer the curve but are not on it, which is why
/// traced contours arrive with their leading points re-emitted at the tail.
pub fn sample_curve(control: &[Point], samples_per_segment: usize) -> Vec<Point> {
    if control.len() < 4 {
        return control.to_vec();
    }

    let mut out = Vec::with_capacity((control.len() - 3) * samples_per_segment + 1);
    for i in 1..control.len() - 2 {
        let p0 = control[i - 1];
        let p1 = control[i];
        let p2 = control[i + 1];
        let p3 = control[i + 2];
        for s in 0..samples_per_segment {
            let t = s as f32 / samples_per_segment as f32;
            out.push(Point {
                x: catmull_rom(p0.x, p1.x, p2.x, p3.x, t),
                y: catmull_rom(p0.y, p1.y, p2.y, p3.y, t),
            });
        }
    }
    // Close the last drawn segment on its end control point.
    out.push(control[control.len() - 2]);
    out
}

/// Catmull-Rom spline interpolation
fn catmull_rom(p0: f32, p1: f32, p2: f32, p3: f32, t: f32) -> f32 {
    let t2 = t * t;
    let t3 = t2 * t;

    0.5 * ((2.0 * p1)
        + (-p0 + p2) * t
        + (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * t2
        + (-p0 + 3.0 * p1 - 3.0 * p2 + p3) * t3)
}

/// Grayscale view of the raw land values, sea level at mid gray.
pub fn noise_view(field: &HeightField, sea_bias: f32) -> RgbaImage {
    let mut img = RgbaImage::new(field.width() as u32, field.height() as u32);
    for y in 0..field.height() {
        for x in 0..field.width() {
            let v = field.value_at(x as f32, y as f32) + sea_bias;
            let g = (v * 255.0).clamp(0.0, 255.0) as u8;
            img.put_pixel(x as u32, y as u32, Rgba([g, g, g, 255]));
        }
    }
    img
}

/// Draw cell outlines, corner occupancy dots, and boundary links on top of
/// an existing canvas. Red segments join edge midpoints; black segments
/// show the bias-interpolated crossings actually traced.
pub fn debug_overlay(canvas: &mut RgbaImage, grid: &CellGrid) {
    let cs = grid.cell_size();

    for y in 0..grid.height() {
        for x in 0..grid.width() {
            let cell = grid.cell(x, y);
            let ox = x as f32 * cs;
            let oy = y as f32 * cs;

            rect_outline(canvas, ox, oy, cs, GRID_COLOR);

            for (i, &b) in cell.bias.iter().enumerate() {
                let px = ox + cs / 8.0 + (i % 2) as f32 * cs * 6.0 / 8.0;
                let py = oy + cs / 8.0 + (i / 2) as f32 * cs * 6.0 / 8.0;
                let color = if b > 0.0 { LAND_DOT } else { WATER_DOT };
                put(canvas, px as i32, py as i32, color);
            }

            for entry in Dir::ALL {
                let Some(exit) = cell.tile.link(entry) else {
                    continue;
                };
                let (mx0, my0) = edge_midpoint(ox, oy, cs, entry);
                let (mx1, my1) = edge_midpoint(ox, oy, cs, exit);
                line(canvas, mx0, my0, mx1, my1, RAW_LINK);

                let (bx0, by0) = grid.edge_crossing(x, y, entry);
                let (bx1, by1) = grid.edge_crossing(x, y, exit);
                line(canvas, bx0, by0, bx1, by1, INK);
            }
        }
    }
}

fn edge_midpoint(ox: f32, oy: f32, cs: f32, d: Dir) -> (f32, f32) {
    match d {
        Dir::Top => (ox + cs / 2.0, oy),
        Dir::Left => (ox, oy + cs / 2.0),
        Dir::Right => (ox + cs, oy + cs / 2.0),
        Dir::Bottom => (ox + cs / 2.0, oy + cs),
    }
}

fn rect_outline(canvas: &mut RgbaImage, ox: f32, oy: f32, size: f32, color: Rgba<u8>) {
    line(canvas, ox, oy, ox + size, oy, color);
    line(canvas, ox, oy + size, ox + size, oy + size, color);
    line(canvas, ox, oy, ox, oy + size, color);
    line(canvas, ox + size, oy, ox + size, oy + size, color);
}

fn line(canvas: &mut RgbaImage, x0: f32, y0: f32, x1: f32, y1: f32, color: Rgba<u8>) {
    let steps = (x1 - x0).abs().max((y1 - y0).abs()).ceil().max(1.0) as usize;
    for s in 0..=steps {
        let t = s as f32 / steps as f32;
        let x = x0 + (x1 - x0) * t;
        let y = y0 + (y1 - y0) * t;
        put(canvas, x as i32, y as i32, color);
    }
}

fn put(canvas: &mut RgbaImage, x: i32, y: i32, color: Rgba<u8>) {
    if x >= 0 && y >= 0 && (x as u32) < canvas.width() && (y as u32) < canvas.height() {
        canvas.put_pixel(x as u32, y as u32, color);
    }
}
