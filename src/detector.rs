//! Hand-landmark detection.
//!
//! The pretrained model is not part of this crate. [`SubprocessDetector`] talks to an
//! external helper process that wraps it, using a tiny framed protocol:
//!
//! 1. On startup the helper prints a single `READY` line.
//! 2. Per frame we write `width`, `height`, `channels` as little-endian `u32`s, followed
//!    by `width * height * channels` bytes of packed RGB.
//! 3. The helper answers with one JSON line:
//!    `{"hands":[{"handedness":"Right","score":0.93,"landmarks":[{"x":..,"y":..,"z":..}, ...]}]}`
//!    or `{"hands":[],"error":"..."}`.
//!
//! Coordinates are normalized to `[0,1]` of the frame that was sent.

use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

use image::RgbImage;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::landmarks::{HandLandmarks, LANDMARK_COUNT, Landmark};

/// Finds at most one hand in an RGB frame.
pub trait HandDetector {
    fn detect(&mut self, rgb: &RgbImage) -> Result<Option<HandLandmarks>>;
}

/// Used when no helper is configured: the app still shows video, nothing gets drawn.
#[derive(Debug, Default)]
pub struct NoDetector;

impl HandDetector for NoDetector {
    fn detect(&mut self, _rgb: &RgbImage) -> Result<Option<HandLandmarks>> {
        Ok(None)
    }
}

/// How far outside [0,1] a landmark may sit before the hand is rejected.
const MAX_OVERSHOOT: f32 = 0.5;

#[derive(Deserialize, Debug)]
struct LandmarkJson {
    x: f32,
    y: f32,
    #[serde(default)]
    z: f32,
}

#[derive(Deserialize, Debug)]
struct HandJson {
    #[serde(default)]
    handedness: String,
    score: f32,
    landmarks: Vec<LandmarkJson>,
}

#[derive(Deserialize, Debug)]
struct DetectionReply {
    #[serde(default)]
    hands: Vec<HandJson>,
    #[serde(default)]
    error: Option<String>,
}

/// Normalized coordinates may stray a little past the frame edge, never far.
fn plausible(v: f32) -> bool {
    v.is_finite() && (-MAX_OVERSHOOT..=1.0 + MAX_OVERSHOOT).contains(&v)
}

/// Parse one reply line and pick the first hand at or above `min_confidence`.
fn parse_reply(line: &str, min_confidence: f32) -> Result<Option<HandLandmarks>> {
    let reply: DetectionReply = serde_json::from_str(line.trim())
        .map_err(|e| Error::Detector(format!("bad reply {:?}: {e}", line.trim())))?;

    if let Some(error) = reply.error {
        log::warn!("hand detector reported: {error}");
        return Ok(None);
    }

    for hand in reply.hands {
        if hand.score < min_confidence {
            continue;
        }
        if hand.landmarks.len() != LANDMARK_COUNT {
            log::warn!(
                "expected {LANDMARK_COUNT} landmarks, got {}; skipping hand",
                hand.landmarks.len()
            );
            continue;
        }
        if !hand.landmarks.iter().all(|lm| plausible(lm.x) && plausible(lm.y)) {
            log::warn!("landmark coordinates out of range; skipping hand");
            continue;
        }

        let points: Vec<Landmark> = hand
            .landmarks
            .iter()
            .map(|lm| Landmark { x: lm.x, y: lm.y, z: lm.z })
            .collect();
        let mut found = HandLandmarks::from_slice(&points)?;
        found.score = hand.score;
        found.handedness = hand.handedness;
        return Ok(Some(found));
    }

    Ok(None)
}

/// Take the child's pipes and wait for its `READY` line.
fn handshake(child: &mut Child) -> Result<(ChildStdin, BufReader<ChildStdout>)> {
    let stdin = child
        .stdin
        .take()
        .ok_or_else(|| Error::Detector("helper stdin unavailable".into()))?;
    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| Error::Detector("helper stdout unavailable".into()))?;
    let mut stdout = BufReader::new(stdout);

    let mut ready = String::new();
    stdout.read_line(&mut ready)?;
    if ready.trim() != "READY" {
        return Err(Error::Detector(format!(
            "helper did not signal ready, got {:?}",
            ready.trim()
        )));
    }
    Ok((stdin, stdout))
}

/// Runs the landmark model in a child process and exchanges frames over its stdio.
pub struct SubprocessDetector {
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
    min_confidence: f32,
}

impl SubprocessDetector {
    /// Spawn `argv[0] argv[1..]` and wait for its `READY` line.
    pub fn spawn(argv: &[String], min_confidence: f32) -> Result<Self> {
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| Error::Detector("empty detector command".into()))?;

        log::info!("starting hand detector: {}", argv.join(" "));
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| Error::Detector(format!("spawn {program}: {e}")))?;

        let (stdin, stdout) = match handshake(&mut child) {
            Ok(pipes) => pipes,
            Err(e) => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(e);
            }
        };
        log::info!("hand detector ready");

        Ok(Self {
            child,
            stdin,
            stdout,
            min_confidence,
        })
    }
}

impl HandDetector for SubprocessDetector {
    fn detect(&mut self, rgb: &RgbImage) -> Result<Option<HandLandmarks>> {
        let (width, height) = rgb.dimensions();

        self.stdin.write_all(&width.to_le_bytes())?;
        self.stdin.write_all(&height.to_le_bytes())?;
        self.stdin.write_all(&3u32.to_le_bytes())?;
        self.stdin.write_all(rgb.as_raw())?;
        self.stdin.flush()?;

        let mut line = String::new();
        if self.stdout.read_line(&mut line)? == 0 {
            return Err(Error::Detector("helper closed its output".into()));
        }

        let hand = parse_reply(&line, self.min_confidence)?;
        if let Some(h) = &hand {
            log::trace!(
                "hand {} ({:.2}) index tip ({:.3},{:.3})",
                h.handedness,
                h.score,
                h.index_tip().x,
                h.index_tip().y
            );
        }
        Ok(hand)
    }
}

impl Drop for SubprocessDetector {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hand_json(score: f32, count: usize) -> String {
        let pts: Vec<String> = (0..count)
            .map(|i| format!(r#"{{"x":{},"y":0.5,"z":0.0}}"#, i as f32 / 100.0))
            .collect();
        format!(
            r#"{{"handedness":"Right","score":{score},"landmarks":[{}]}}"#,
            pts.join(",")
        )
    }

    #[test]
    fn no_detector_never_finds_hands() {
        let frame = RgbImage::new(8, 8);
        assert!(NoDetector.detect(&frame).unwrap().is_none());
    }

    #[test]
    fn picks_first_confident_hand() {
        let line = format!(r#"{{"hands":[{},{}]}}"#, hand_json(0.4, 21), hand_json(0.9, 21));
        let hand = parse_reply(&line, 0.7).unwrap().unwrap();
        assert_eq!(hand.score, 0.9);
        assert_eq!(hand.handedness, "Right");
        assert!((hand.index_tip().x - 0.08).abs() < 1e-6);
    }

    #[test]
    fn low_confidence_means_no_hand() {
        let line = format!(r#"{{"hands":[{}]}}"#, hand_json(0.5, 21));
        assert!(parse_reply(&line, 0.7).unwrap().is_none());
    }

    #[test]
    fn malformed_hands_are_skipped() {
        let line = format!(r#"{{"hands":[{}]}}"#, hand_json(0.99, 20));
        assert!(parse_reply(&line, 0.7).unwrap().is_none());
    }

    #[test]
    fn helper_error_is_not_fatal() {
        let line = r#"{"hands":[],"error":"model not loaded"}"#;
        assert!(parse_reply(line, 0.7).unwrap().is_none());
    }

    #[test]
    fn garbage_reply_is_a_detector_error() {
        assert!(matches!(parse_reply("oops\n", 0.7), Err(Error::Detector(_))));
    }

    #[test]
    fn empty_command_is_rejected() {
        assert!(matches!(
            SubprocessDetector::spawn(&[], 0.7),
            Err(Error::Detector(_))
        ));
    }

    #[test]
    fn far_off_landmarks_reject_the_hand() {
        let wild = hand_json(0.9, 21).replace(r#"{"x":0.08,"#, r#"{"x":1000000000.0,"#);
        let line = format!(r#"{{"hands":[{wild}]}}"#);
        assert!(parse_reply(&line, 0.7).unwrap().is_none());

        // a fingertip just past the frame edge is still a hand
        let edge = hand_json(0.9, 21).replace(r#"{"x":0.08,"#, r#"{"x":-0.2,"#);
        let line = format!(r#"{{"hands":[{edge}]}}"#);
        let hand = parse_reply(&line, 0.7).unwrap().unwrap();
        assert_eq!(hand.index_tip().x, -0.2);
    }

    /// Run `script` under `sh -c`, with `arg` available as `$0`.
    #[cfg(unix)]
    fn sh_helper(script: &str, arg: &str) -> Result<SubprocessDetector> {
        let argv: Vec<String> = ["sh", "-c", script, arg].map(String::from).to_vec();
        SubprocessDetector::spawn(&argv, 0.7)
    }

    #[cfg(unix)]
    #[test]
    fn helper_receives_header_and_pixels_then_replies() {
        // Echo the three header words back through `handedness`, swallow the pixels.
        let script = r#"echo READY
hdr=$(echo $(dd bs=1 count=12 2>/dev/null | od -An -tu4))
dd bs=1 count=12 of=/dev/null 2>/dev/null
printf "$0\n" "$hdr""#;
        let template = format!(r#"{{"hands":[{}]}}"#, hand_json(0.9, 21))
            .replace(r#""handedness":"Right""#, r#""handedness":"%s""#);

        let mut det = sh_helper(script, &template).unwrap();
        let hand = det.detect(&RgbImage::new(2, 2)).unwrap().unwrap();
        assert_eq!(hand.handedness, "2 2 3");
        assert_eq!(hand.score, 0.9);
    }

    #[cfg(unix)]
    #[test]
    fn helper_without_ready_line_is_rejected() {
        assert!(matches!(
            sh_helper("echo hello", "helper"),
            Err(Error::Detector(msg)) if msg.contains("hello")
        ));
    }

    #[cfg(unix)]
    #[test]
    fn helper_exiting_after_ready_reports_closed_output() {
        let mut det = sh_helper("echo READY; dd bs=1 count=24 of=/dev/null 2>/dev/null", "helper")
            .unwrap();
        assert!(matches!(
            det.detect(&RgbImage::new(2, 2)),
            Err(Error::Detector(msg)) if msg.contains("closed")
        ));
    }
}
