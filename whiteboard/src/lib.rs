//! # whiteboard
//!
//! A persistent RGB canvas the gesture engine draws on.
//!
//! * **Pen**: round-capped line, `brush_size` wide, in `brush_color`.
//! * **Eraser**: three times the pen width, painted in the background colour.
//!
//! Coordinates are pixel-space `f32`; anything outside the canvas is clipped.
//!
//! ```rust,no_run
//! use gesture_engine::Point;
//! use whiteboard::Whiteboard;
//!
//! let mut wb = Whiteboard::new(1280, 720);
//! wb.draw_line(Point::new(100.0, 100.0), Point::new(400.0, 300.0));
//! wb.save_png("board.png").unwrap();
//! ```

use std::path::{Path, PathBuf};

use gesture_engine::{Canvas, GestureConfig, Point};
use image::{Rgb, RgbImage};
use thiserror::Error;
use tracing::info;

/// Canvas background (dark grey).
pub const BACKGROUND: [u8; 3] = [30, 30, 30];

/// Eraser width as a multiple of the pen width.
pub const ERASER_SCALE: u32 = 3;

#[derive(Error, Debug)]
pub enum WhiteboardError {
    #[error("Failed to save whiteboard to {path}: {source}")]
    Save {
        path:   PathBuf,
        #[source]
        source: image::ImageError,
    },
}

// ════════════════════════════════════════════════════════════════════════════
// Whiteboard
// ════════════════════════════════════════════════════════════════════════════

pub struct Whiteboard {
    image:           RgbImage,
    pub brush_size:  u32,
    pub brush_color: [u8; 3],
}

impl Whiteboard {
    pub fn new(width: u32, height: u32) -> Self {
        Whiteboard {
            image:       RgbImage::from_pixel(width, height, Rgb(BACKGROUND)),
            brush_size:  5,
            brush_color: [255, 255, 0],
        }
    }

    pub fn width(&self) -> u32  { self.image.width() }
    pub fn height(&self) -> u32 { self.image.height() }

    /// Pick up pen width and colour from a (possibly just edited) config.
    pub fn apply_config(&mut self, config: &GestureConfig) {
        self.brush_size  = config.brush_size.max(1);
        self.brush_color = config.brush_color;
    }

    pub fn draw_line(&mut self, from: Point, to: Point) {
        let (width, color) = (self.brush_size, self.brush_color);
        self.stroke(from, to, width, color);
    }

    pub fn erase_line(&mut self, from: Point, to: Point) {
        let width = self.brush_size.saturating_mul(ERASER_SCALE);
        self.stroke(from, to, width, BACKGROUND);
    }

    /// Wipe the board back to the background colour.
    pub fn clear(&mut self) {
        for px in self.image.pixels_mut() {
            *px = Rgb(BACKGROUND);
        }
    }

    pub fn get_frame(&self) -> &RgbImage {
        &self.image
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        (x < self.width() && y < self.height()).then(|| self.image.get_pixel(x, y).0)
    }

    pub fn is_blank(&self) -> bool {
        self.image.pixels().all(|p| p.0 == BACKGROUND)
    }

    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<(), WhiteboardError> {
        let path = path.as_ref();
        self.image.save(path).map_err(|source| WhiteboardError::Save {
            path: path.to_path_buf(),
            source,
        })?;
        info!("whiteboard saved to {}", path.display());
        Ok(())
    }

    // ── rasterisation ─────────────────────────────────────────────────────

    /// Stamp a disc of diameter `width` every pixel along `from → to`.
    fn stroke(&mut self, from: Point, to: Point, width: u32, color: [u8; 3]) {
        let radius = width.max(1) as f32 / 2.0;
        let Some((a, b)) = clip_segment(from, to, self.width(), self.height(), radius) else {
            return;
        };
        let steps = (b.x - a.x).abs().max((b.y - a.y).abs()).ceil().max(1.0) as u32;
        for i in 0..=steps {
            let t = i as f32 / steps as f32;
            let cx = a.x + (b.x - a.x) * t;
            let cy = a.y + (b.y - a.y) * t;
            self.stamp(cx, cy, radius, color);
        }
    }

    fn stamp(&mut self, cx: f32, cy: f32, radius: f32, color: [u8; 3]) {
        let (cx, cy) = (cx.round() as i64, cy.round() as i64);
        let r = radius.ceil() as i64;
        let r2 = radius * radius;
        let (w, h) = (self.width() as i64, self.height() as i64);
        for dy in -r..=r {
            let y = cy + dy;
            if y < 0 || y >= h { continue; }
            for dx in -r..=r {
                let x = cx + dx;
                if x < 0 || x >= w { continue; }
                if (dx * dx + dy * dy) as f32 <= r2 {
                    self.image.put_pixel(x as u32, y as u32, Rgb(color));
                }
            }
        }
    }
}

impl Canvas for Whiteboard {
    fn draw_line(&mut self, from: Point, to: Point)  { Whiteboard::draw_line(self, from, to) }
    fn erase_line(&mut self, from: Point, to: Point) { Whiteboard::erase_line(self, from, to) }
    fn clear(&mut self)                              { Whiteboard::clear(self) }
}

// ════════════════════════════════════════════════════════════════════════════
// Segment clipping (Liang–Barsky)
// ════════════════════════════════════════════════════════════════════════════

/// Clip `a → b` to the canvas grown by `margin` on every side.
/// Returns `None` when nothing is visible or a coordinate is not finite.
fn clip_segment(a: Point, b: Point, width: u32, height: u32, margin: f32) -> Option<(Point, Point)> {
    if ![a.x, a.y, b.x, b.y].iter().all(|v| v.is_finite()) {
        return None;
    }
    let (xmin, ymin) = (-margin, -margin);
    let (xmax, ymax) = (width as f32 + margin, height as f32 + margin);
    let (dx, dy) = (b.x - a.x, b.y - a.y);

    let mut t0 = 0.0_f32;
    let mut t1 = 1.0_f32;
    for (p, q) in [
        (-dx, a.x - xmin),
        ( dx, xmax - a.x),
        (-dy, a.y - ymin),
        ( dy, ymax - a.y),
    ] {
        if p == 0.0 {
            if q < 0.0 { return None; }
        } else {
            let r = q / p;
            if p < 0.0 {
                if r > t1 { return None; }
                t0 = t0.max(r);
            } else {
                if r < t0 { return None; }
                t1 = t1.min(r);
            }
        }
    }
    Some((
        Point::new(a.x + t0 * dx, a.y + t0 * dy),
        Point::new(a.x + t1 * dx, a.y + t1 * dy),
    ))
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
