// The window and its keyboard controls.
// Visual: a fixed-size window showing the composited frame, refreshed every tick;
// the title bar tells you whether capture is running.

use image::RgbImage;
use minifb::{Key, KeyRepeat, Window, WindowOptions};

use crate::error::{Error, Result};

pub const TITLE: &str = "Virtual Whiteboard";

/// What the user asked for since the last poll.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Controls {
    pub start: bool,
    pub stop: bool,
    pub save: bool,
    pub quit: bool,
}

pub struct Display {
    window: Window,
    buffer: Vec<u32>, // reused 0x00RRGGBB scratch for minifb
    width: usize,
    height: usize,
}

impl Display {
    /// Open the window. `target_fps` caps how often `present` returns, which
    /// doubles as the tick timer.
    pub fn new(width: u32, height: u32, target_fps: usize) -> Result<Self> {
        let (width, height) = (width as usize, height as usize);
        let mut window = Window::new(TITLE, width, height, WindowOptions::default())
            .map_err(|e| Error::WindowInit(e.to_string()))?;
        window.set_target_fps(target_fps);

        let mut display = Self {
            window,
            buffer: vec![0; width * height],
            width,
            height,
        };
        display.set_status("stopped | Space: start  X: stop  S: save  Esc: quit");
        Ok(display)
    }

    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    pub fn set_status(&mut self, status: &str) {
        self.window.set_title(&format!("{TITLE} - {status}"));
    }

    /// Read the keys once per tick.
    pub fn poll_controls(&self) -> Controls {
        Controls {
            start: self.window.is_key_pressed(Key::Space, KeyRepeat::No),
            stop: self.window.is_key_pressed(Key::X, KeyRepeat::No),
            save: self.window.is_key_pressed(Key::S, KeyRepeat::No),
            quit: !self.window.is_open() || self.window.is_key_down(Key::Escape),
        }
    }

    /// Push this frame to the screen.
    pub fn present(&mut self, frame: &RgbImage) -> Result<()> {
        pack_rgb(frame, &mut self.buffer);
        self.flush()
    }

    /// Blank the view (used after Stop).
    pub fn clear(&mut self) -> Result<()> {
        self.buffer.fill(0);
        self.flush()
    }

    /// Keep the window responsive without new pixels.
    pub fn idle(&mut self) {
        self.window.update();
    }

    fn flush(&mut self) -> Result<()> {
        self.window
            .update_with_buffer(&self.buffer, self.width, self.height)
            .map_err(|e| Error::WindowUpdate(e.to_string()))
    }
}

/// Pack RGB pixels as 0x00RRGGBB. `out` is resized to fit.
pub fn pack_rgb(frame: &RgbImage, out: &mut Vec<u32>) {
    out.clear();
    out.extend(frame.pixels().map(|p| {
        let [r, g, b] = p.0;
        ((r as u32) << 16) | ((g as u32) << 8) | b as u32
    }));
}
