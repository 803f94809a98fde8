// One whiteboard session: the canvas, the pen, and the per-tick pipeline
// frame -> mirror -> detect -> classify -> draw/erase -> composite.
// Visual: whatever `tick` returns is exactly what the window shows next.

use std::path::Path;

use image::{RgbImage, imageops};

use crate::camera::FrameSource;
use crate::canvas::Canvas;
use crate::config::Config;
use crate::detector::HandDetector;
use crate::error::Result;
use crate::landmarks::Gesture;
use crate::overlay;
use crate::stroke::{StrokeCompositor, StrokeStyle};

pub struct Session {
    canvas: Canvas,
    stroke: StrokeCompositor,
    mirror: bool,
    show_skeleton: bool,
}

impl Session {
    pub fn new(cfg: &Config) -> Self {
        Self {
            canvas: Canvas::new(cfg.width, cfg.height).with_ink_threshold(cfg.ink_threshold),
            stroke: StrokeCompositor::new(StrokeStyle::from(cfg)),
            mirror: cfg.mirror,
            show_skeleton: cfg.show_skeleton,
        }
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut Canvas {
        &mut self.canvas
    }

    pub fn cursor(&self) -> Option<(i32, i32)> {
        self.stroke.cursor()
    }

    pub fn lift_pen(&mut self) {
        self.stroke.lift();
    }

    /// Write the canvas (ink only, no video) as a PNG.
    pub fn save(&self, path: &Path) -> Result<()> {
        self.canvas.save_png(path)
    }

    /// Run one timer tick. `None` means no frame was available and the tick was skipped.
    pub fn tick(
        &mut self,
        source: &mut dyn FrameSource,
        detector: &mut dyn HandDetector,
    ) -> Option<RgbImage> {
        let mut frame = match source.next_frame() {
            Ok(frame) => frame,
            Err(e) => {
                log::debug!("skipping tick: {e}");
                return None;
            }
        };

        let (w, h) = self.canvas.dimensions();
        if frame.dimensions() != (w, h) {
            frame = imageops::resize(&frame, w, h, imageops::FilterType::Triangle);
        }
        if self.mirror {
            imageops::flip_horizontal_in_place(&mut frame);
        }

        let hand = detector.detect(&frame).unwrap_or_else(|e| {
            log::warn!("hand detection failed: {e}");
            None
        });

        if let Some(hand) = hand {
            if self.show_skeleton {
                overlay::draw_hand(&mut frame, &hand);
            }
            let fingers = hand.fingers();
            let tip = hand.index_tip().to_pixel(w, h);
            let gesture = self.stroke.apply(&mut self.canvas, fingers, tip);
            if gesture != Gesture::Idle {
                log::trace!("{gesture:?} at {tip:?} fingers {:?}", fingers.as_bits());
            }
        }

        // Sizes always agree here, the frame was resized above.
        if let Err(e) = self.canvas.composite_onto(&mut frame) {
            log::error!("compositing failed: {e}");
        }
        Some(frame)
    }
}
