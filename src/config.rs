// Runtime knobs. Defaults reproduce the classic whiteboard: 640x480, magenta ink,
// 5 px strokes, 20 px eraser, 10 ms ticks.
// A few values can be overridden through environment variables; there is no
// config file and no command-line parsing.

use serde::{Deserialize, Serialize};

pub const ENV_CAMERA: &str = "WHITEBOARD_CAMERA";
pub const ENV_DETECTOR: &str = "WHITEBOARD_DETECTOR";
pub const ENV_MIN_CONFIDENCE: &str = "WHITEBOARD_MIN_CONFIDENCE";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Width of the drawing surface and the display (pixels).
    pub width: u32,
    /// Height of the drawing surface and the display (pixels).
    pub height: u32,
    /// Camera device index (0 = default webcam).
    pub camera_index: u32,
    /// Timer interval between ticks.
    pub tick_ms: u64,
    /// Hands scoring below this are ignored.
    pub min_confidence: f32,
    /// Ink color as RGB.
    pub ink: [u8; 3],
    /// Stroke width in pixels.
    pub thickness: u32,
    pub eraser_radius: u32,
    /// Canvas luma above this counts as ink when compositing.
    pub ink_threshold: u8,
    /// Flip frames horizontally so the view behaves like a mirror.
    pub mirror: bool,
    /// Draw the tracked hand skeleton on top of the video.
    pub show_skeleton: bool,
    /// Command line of the hand-landmark helper process, if any.
    pub detector_command: Option<Vec<String>>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            camera_index: 0,
            tick_ms: 10,
            min_confidence: 0.7,
            ink: [255, 0, 255],
            thickness: 5,
            eraser_radius: 20,
            ink_threshold: 50,
            mirror: true,
            show_skeleton: true,
            detector_command: None,
        }
    }
}

impl Config {
    /// Defaults, overlaid with whatever the process environment provides.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Config::from_env`] but reads variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut cfg = Self::default();

        if let Some(raw) = lookup(ENV_CAMERA) {
            match raw.trim().parse() {
                Ok(index) => cfg.camera_index = index,
                Err(e) => log::warn!("ignoring {ENV_CAMERA}={raw:?}: {e}"),
            }
        }

        if let Some(raw) = lookup(ENV_MIN_CONFIDENCE) {
            match raw.trim().parse::<f32>() {
                Ok(v) if (0.0..=1.0).contains(&v) => cfg.min_confidence = v,
                Ok(v) => log::warn!("ignoring {ENV_MIN_CONFIDENCE}={v}: must be within 0..=1"),
                Err(e) => log::warn!("ignoring {ENV_MIN_CONFIDENCE}={raw:?}: {e}"),
            }
        }

        if let Some(raw) = lookup(ENV_DETECTOR) {
            let argv: Vec<String> = raw.split_whitespace().map(str::to_owned).collect();
            if argv.is_empty() {
                log::warn!("ignoring empty {ENV_DETECTOR}");
            } else {
                cfg.detector_command = Some(argv);
            }
        }

        cfg
    }

    /// Display refresh cap that matches the tick interval.
    pub fn target_fps(&self) -> usize {
        (1000 / self.tick_ms.max(1)) as usize
    }
}
