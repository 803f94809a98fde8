// Turns "which fingers are up + where is the index tip" into ink on the canvas.
// Visual: index alone leaves a trail, index+middle rubs a round hole into the ink,
// anything else lifts the pen.

use image::Rgb;

use crate::canvas::{Canvas, BACKGROUND};
use crate::config::Config;
use crate::landmarks::{FingerStates, Gesture};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StrokeStyle {
    pub color: Rgb<u8>,
    pub thickness: u32,
    pub eraser_radius: u32,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            color: Rgb([255, 0, 255]),
            thickness: 5,
            eraser_radius: 20,
        }
    }
}

impl From<&Config> for StrokeStyle {
    fn from(cfg: &Config) -> Self {
        Self {
            color: Rgb(cfg.ink),
            thickness: cfg.thickness,
            eraser_radius: cfg.eraser_radius,
        }
    }
}

/// Pen state carried from one frame to the next.
#[derive(Debug, Default)]
pub struct StrokeCompositor {
    style: StrokeStyle,
    /// Where the last segment ended; `None` while the pen is lifted.
    cursor: Option<(i32, i32)>,
}

impl StrokeCompositor {
    pub fn new(style: StrokeStyle) -> Self {
        Self { style, cursor: None }
    }

    pub fn cursor(&self) -> Option<(i32, i32)> {
        self.cursor
    }

    /// Lift the pen: the next Draw starts a fresh stroke instead of connecting.
    pub fn lift(&mut self) {
        self.cursor = None;
    }

    /// Apply one frame's gesture at fingertip `tip` (pixels) and report which one it was.
    pub fn apply(&mut self, canvas: &mut Canvas, fingers: FingerStates, tip: (i32, i32)) -> Gesture {
        let gesture = Gesture::from_fingers(fingers);
        match gesture {
            Gesture::Draw => {
                // First contact only places the pen, otherwise we'd get a long
                // segment from wherever the previous stroke ended.
                if let Some(prev) = self.cursor {
                    canvas.draw_line(prev, tip, self.style.color, self.style.thickness);
                }
                self.cursor = Some(tip);
            }
            Gesture::Erase => {
                canvas.fill_circle(tip, self.style.eraser_radius as i32, BACKGROUND);
                self.cursor = None;
            }
            Gesture::Idle => self.cursor = None,
        }
        gesture
    }
}
