// The drawing surface: a persistent RGB buffer that accumulates ink across frames.
// Visual expectation: black everywhere until you draw; only non-black pixels ever
// show up on top of the live video.

use std::path::Path;

use image::{ImageFormat, Pixel, Rgb, RgbImage};

use crate::error::{Error, Result};

/// Background color. Anything this dark is treated as "no ink".
pub const BACKGROUND: Rgb<u8> = Rgb([0, 0, 0]);

/// Canvas luma above this counts as ink when compositing.
pub const INK_THRESHOLD: u8 = 50;

pub struct Canvas {
    image: RgbImage,
    ink_threshold: u8,
}

impl Canvas {
    /// A blank (all-background) surface. Its size never changes afterwards.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbImage::from_pixel(width, height, BACKGROUND),
            ink_threshold: INK_THRESHOLD,
        }
    }

    pub fn with_ink_threshold(mut self, threshold: u8) -> Self {
        self.ink_threshold = threshold;
        self
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    /// Reset every pixel to the background.
    pub fn clear(&mut self) {
        for px in self.image.pixels_mut() {
            *px = BACKGROUND;
        }
    }

    /// True while nothing but background has been drawn.
    pub fn is_blank(&self) -> bool {
        self.image.pixels().all(|px| *px == BACKGROUND)
    }

    /// Set one pixel if (x,y) is inside bounds.
    #[inline]
    fn put_pixel(&mut self, x: i32, y: i32, color: Rgb<u8>) {
        if x < 0 || y < 0 {
            return;
        }
        let (x, y) = (x as u32, y as u32);
        if x >= self.image.width() || y >= self.image.height() {
            return;
        }
        self.image.put_pixel(x, y, color);
    }

    /// Fill a solid disc centered at (cx,cy). Parts outside the surface are clipped.
    pub fn fill_circle(&mut self, (cx, cy): (i32, i32), radius: i32, color: Rgb<u8>) {
        if radius < 0 {
            return;
        }
        let r2 = radius * radius;
        // Scan just the bounding box
        for y in (cy - radius)..=(cy + radius) {
            for x in (cx - radius)..=(cx + radius) {
                let (dx, dy) = (x - cx, y - cy);
                if dx * dx + dy * dy <= r2 {
                    self.put_pixel(x, y, color);
                }
            }
        }
    }

    /// Draw a straight segment `thickness` pixels wide from `from` to `to`.
    /// Bresenham walk with a round brush stamped at every step, so the ends are rounded.
    pub fn draw_line(&mut self, from: (i32, i32), to: (i32, i32), color: Rgb<u8>, thickness: u32) {
        let brush = (thickness / 2) as i32;
        let (mut x0, mut y0) = from;
        let (x1, y1) = to;
        let dx = (x1 - x0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let dy = -(y1 - y0).abs();
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            if brush == 0 {
                self.put_pixel(x0, y0, color);
            } else {
                self.fill_circle((x0, y0), brush, color);
            }
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }

    /// Put the ink on top of `frame`, in place.
    ///
    /// Where the canvas luma exceeds the ink threshold the canvas pixel wins outright.
    /// Everywhere else the frame is kept and OR-ed with the (dark) canvas pixel,
    /// which leaves it untouched wherever the canvas is pure background.
    pub fn composite_onto(&self, frame: &mut RgbImage) -> Result<()> {
        if frame.dimensions() != self.image.dimensions() {
            return Err(Error::DimensionMismatch {
                expected: self.image.dimensions(),
                actual: frame.dimensions(),
            });
        }

        for (dst, ink) in frame.pixels_mut().zip(self.image.pixels()) {
            if ink.to_luma()[0] > self.ink_threshold {
                *dst = *ink;
            } else {
                dst.apply2(ink, |f, c| f | c);
            }
        }
        Ok(())
    }

    /// Write the surface (not the composited view) as a PNG.
    pub fn save_png(&self, path: &Path) -> Result<()> {
        self.image.save_with_format(path, ImageFormat::Png)?;
        Ok(())
    }
}
