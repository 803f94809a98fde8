// Shared fixtures: a scripted camera and a scripted hand detector.
#![allow(dead_code)]

use std::collections::VecDeque;

use hand_whiteboard::Error;
use hand_whiteboard::camera::FrameSource;
use hand_whiteboard::detector::HandDetector;
use hand_whiteboard::landmarks::{FINGER_TIPS, HandLandmarks, INDEX_TIP, Landmark};
use image::{Rgb, RgbImage};

pub const W: u32 = 640;
pub const H: u32 = 480;

/// Yields a flat gray frame per tick, or an error when told to drop one.
pub struct ScriptedCamera {
    pub frames: VecDeque<Option<RgbImage>>,
    pub fallback: RgbImage,
}

impl ScriptedCamera {
    pub fn gray() -> Self {
        Self {
            frames: VecDeque::new(),
            fallback: RgbImage::from_pixel(W, H, Rgb([90, 90, 90])),
        }
    }

    pub fn failing_next(mut self) -> Self {
        self.frames.push_back(None);
        self
    }
}

impl FrameSource for ScriptedCamera {
    fn next_frame(&mut self) -> Result<RgbImage, Error> {
        match self.frames.pop_front() {
            Some(Some(frame)) => Ok(frame),
            Some(None) => Err(Error::CameraFrame("scripted drop".into())),
            None => Ok(self.fallback.clone()),
        }
    }
}

/// Replays one detection result per call; `None` once the script runs out.
#[derive(Default)]
pub struct ScriptedHands {
    pub script: VecDeque<Option<HandLandmarks>>,
    pub seen: Vec<(u32, u32)>,
}

impl ScriptedHands {
    pub fn push(&mut self, hand: Option<HandLandmarks>) -> &mut Self {
        self.script.push_back(hand);
        self
    }
}

impl HandDetector for ScriptedHands {
    fn detect(&mut self, rgb: &RgbImage) -> Result<Option<HandLandmarks>, Error> {
        self.seen.push(rgb.dimensions());
        Ok(self.script.pop_front().flatten())
    }
}

/// A hand with the given fingers raised (thumb, index, middle, ring, pinky) and
/// the index fingertip at pixel `tip` of a W x H frame.
pub fn hand(up: [bool; 5], tip: (i32, i32)) -> HandLandmarks {
    let mut pts = [Landmark::new(0.5, 0.5); 21];
    // every reference joint at the same spot: equal means "down"
    if up[0] {
        pts[FINGER_TIPS[0]].x = 0.4;
    }
    for i in 1..5 {
        pts[FINGER_TIPS[i]].y = if up[i] { 0.3 } else { 0.7 };
    }
    // nudge into the middle of the pixel so truncation lands exactly on `tip`
    let tx = (tip.0 as f32 + 0.5) / W as f32;
    let ty = (tip.1 as f32 + 0.5) / H as f32;
    pts[INDEX_TIP] = Landmark::new(tx, ty);
    pts[INDEX_TIP - 2].y = if up[1] { ty + 0.05 } else { ty - 0.05 };
    HandLandmarks::from_slice(&pts).expect("21 points")
}

pub const INDEX_ONLY: [bool; 5] = [false, true, false, false, false];
pub const INDEX_MIDDLE: [bool; 5] = [false, true, true, false, false];
pub const NONE_UP: [bool; 5] = [false; 5];
