//! PNG preview of a simulated program
//!
//! Depth levels are drawn shallowest last so cuts sit on top of rapids at safe
//! height. Breaks between strokes are never bridged.

use std::path::Path;

use image::{Rgb, RgbImage};
use tracing::info;

use crate::error::{Error, Result};
use crate::interpreter::{Bounds, Simulation};

const BACKGROUND: Rgb<u8> = Rgb([26, 26, 26]);
const START_MARKER: Rgb<u8> = Rgb([0, 255, 0]);
const END_MARKER: Rgb<u8> = Rgb([255, 0, 0]);
const MARGIN: f64 = 50.0;

/// Render `sim` into a `width` x `height` PNG at `path`
pub fn export_png(sim: &Simulation, path: impl AsRef<Path>, width: u32, height: u32) -> Result<()> {
    let path = path.as_ref();
    let img = render(sim, width, height);

    img.save(path).map_err(|e| Error::UnwritableOutput {
        path: path.to_path_buf(),
        source: match e {
            image::ImageError::IoError(io) => io,
            other => std::io::Error::new(std::io::ErrorKind::Other, other),
        },
    })?;

    info!("exported {}x{} preview to {}", width, height, path.display());
    Ok(())
}

pub fn render(sim: &Simulation, width: u32, height: u32) -> RgbImage {
    let mut img = RgbImage::from_pixel(width, height, BACKGROUND);

    let Some(bounds) = sim.depths.bounds() else {
        return img;
    };
    let view = Viewport::fit(bounds, width, height);

    let levels = sim.depths.sorted_levels();
    let count = levels.len();
    for (n, level) in levels.into_iter().enumerate() {
        let color = depth_color(n, count);
        for stroke in level.points.split(|p| p.is_none()) {
            for pair in stroke.windows(2) {
                if let [Some(a), Some(b)] = pair {
                    let (x0, y0) = view.to_screen(a.x, a.y);
                    let (x1, y1) = view.to_screen(b.x, b.y);
                    draw_line(&mut img, x0, y0, x1, y1, color);
                }
            }
        }
    }

    let (sx, sy) = view.to_screen(sim.start_marker.x, sim.start_marker.y);
    draw_circle(&mut img, sx, sy, 5, START_MARKER);
    let (ex, ey) = view.to_screen(sim.end_marker.x, sim.end_marker.y);
    draw_circle(&mut img, ex, ey, 5, END_MARKER);

    img
}

struct Viewport {
    scale: f64,
    offset_x: f64,
    offset_y: f64,
    height: f64,
    /// Screen coordinates are clamped to `±limit` so far-off points stay in i32 range
    limit: f64,
}

impl Viewport {
    fn fit(bounds: Bounds, width: u32, height: u32) -> Self {
        // A single point or a straight axis-aligned stroke still gets a scale
        let x_range = (bounds.max_x - bounds.min_x).max(1.0);
        let y_range = (bounds.max_y - bounds.min_y).max(1.0);

        let scale_x = (width as f64 - 2.0 * MARGIN).max(1.0) / x_range;
        let scale_y = (height as f64 - 2.0 * MARGIN).max(1.0) / y_range;
        let scale = scale_x.min(scale_y);

        Self {
            scale,
            offset_x: (width as f64 - x_range * scale) / 2.0 - bounds.min_x * scale,
            offset_y: (height as f64 - y_range * scale) / 2.0 - bounds.min_y * scale,
            height: height as f64,
            limit: (width as f64 + height as f64).max(1.0),
        }
    }

    fn to_screen(&self, x: f64, y: f64) -> (i32, i32) {
        let sx = (x * self.scale + self.offset_x).clamp(-self.limit, self.limit);
        let sy = (self.height - (y * self.scale + self.offset_y)).clamp(-self.limit, self.limit);
        (sx as i32, sy as i32)
    }
}

/// Colour for the `n`-th of `count` depth levels, deepest first (purple → yellow)
fn depth_color(n: usize, count: usize) -> Rgb<u8> {
    const RAMP: [[u8; 3]; 5] = [
        [68, 1, 84],
        [59, 82, 139],
        [33, 145, 140],
        [94, 201, 98],
        [253, 231, 37],
    ];

    if count <= 1 {
        return Rgb(RAMP[RAMP.len() - 1]);
    }
    let t = n as f64 / (count - 1) as f64 * (RAMP.len() - 1) as f64;
    let lo = (t.floor() as usize).min(RAMP.len() - 2);
    let frac = t - lo as f64;

    let mut rgb = [0u8; 3];
    for c in 0..3 {
        let a = RAMP[lo][c] as f64;
        let b = RAMP[lo + 1][c] as f64;
        rgb[c] = (a + (b - a) * frac).round() as u8;
    }
    Rgb(rgb)
}

/// Bresenham line, clipped to the image
fn draw_line(img: &mut RgbImage, x0: i32, y0: i32, x1: i32, y1: i32, color: Rgb<u8>) {
    let (mut x, mut y) = (x0, y0);
    let dx = (x1 - x0).abs();
    let dy = (y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx - dy;

    loop {
        put(img, x, y, color);
        if x == x1 && y == y1 {
            break;
        }

        let e2 = 2 * err;
        if e2 > -dy {
            err -= dy;
            x += sx;
        }
        if e2 < dx {
            err += dx;
            y += sy;
        }
    }
}

fn draw_circle(img: &mut RgbImage, cx: i32, cy: i32, r: i32, color: Rgb<u8>) {
    for y in -r..=r {
        for x in -r..=r {
            if x * x + y * y <= r * r {
                put(img, cx + x, cy + y, color);
            }
        }
    }
}

fn put(img: &mut RgbImage, x: i32, y: i32, color: Rgb<u8>) {
    if x >= 0 && y >= 0 && (x as u32) < img.width() && (y as u32) < img.height() {
        img.put_pixel(x as u32, y as u32, color);
    }
}
