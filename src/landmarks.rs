// Hand keypoints and the finger classifier.
// Input: 21 normalized points per hand (x to the right, y downwards, both in [0,1]).
// Output: which fingers are raised, and the gesture that implies for the canvas.

use crate::error::{Error, Result};

pub const LANDMARK_COUNT: usize = 21;

pub const WRIST: usize = 0;
pub const THUMB_CMC: usize = 1;
pub const THUMB_MCP: usize = 2;
pub const THUMB_IP: usize = 3;
pub const THUMB_TIP: usize = 4;
pub const INDEX_MCP: usize = 5;
pub const INDEX_PIP: usize = 6;
pub const INDEX_DIP: usize = 7;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_DIP: usize = 11;
pub const MIDDLE_TIP: usize = 12;
pub const RING_MCP: usize = 13;
pub const RING_PIP: usize = 14;
pub const RING_DIP: usize = 15;
pub const RING_TIP: usize = 16;
pub const PINKY_MCP: usize = 17;
pub const PINKY_PIP: usize = 18;
pub const PINKY_DIP: usize = 19;
pub const PINKY_TIP: usize = 20;

/// Fingertips in classifier order: thumb, index, middle, ring, pinky.
pub const FINGER_TIPS: [usize; 5] = [THUMB_TIP, INDEX_TIP, MIDDLE_TIP, RING_TIP, PINKY_TIP];

/// Skeleton edges, drawn over the video so you can see what the tracker sees.
pub const HAND_CONNECTIONS: [(usize, usize); 21] = [
    (WRIST, THUMB_CMC), (THUMB_CMC, THUMB_MCP), (THUMB_MCP, THUMB_IP), (THUMB_IP, THUMB_TIP),
    (WRIST, INDEX_MCP), (INDEX_MCP, INDEX_PIP), (INDEX_PIP, INDEX_DIP), (INDEX_DIP, INDEX_TIP),
    (INDEX_MCP, MIDDLE_MCP), (MIDDLE_MCP, MIDDLE_PIP), (MIDDLE_PIP, MIDDLE_DIP), (MIDDLE_DIP, MIDDLE_TIP),
    (MIDDLE_MCP, RING_MCP), (RING_MCP, RING_PIP), (RING_PIP, RING_DIP), (RING_DIP, RING_TIP),
    (RING_MCP, PINKY_MCP), (WRIST, PINKY_MCP), (PINKY_MCP, PINKY_PIP), (PINKY_PIP, PINKY_DIP),
    (PINKY_DIP, PINKY_TIP),
];

/// One tracked keypoint in normalized image coordinates. `z` is relative depth and unused here.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y, z: 0.0 }
    }

    /// Scale to pixel coordinates on a `width` x `height` surface (truncating).
    /// May land outside the surface (drawing clips), but never more than one
    /// surface size away from it.
    pub fn to_pixel(&self, width: u32, height: u32) -> (i32, i32) {
        let x = self.x.clamp(-1.0, 2.0) * width as f32;
        let y = self.y.clamp(-1.0, 2.0) * height as f32;
        (x as i32, y as i32)
    }
}

/// All 21 keypoints of one detected hand.
#[derive(Clone, Debug, PartialEq)]
pub struct HandLandmarks {
    pub points: [Landmark; LANDMARK_COUNT],
    /// Detector confidence in [0,1].
    pub score: f32,
    /// "Left" / "Right" as reported by the detector.
    pub handedness: String,
}

impl HandLandmarks {
    pub fn from_slice(points: &[Landmark]) -> Result<Self> {
        let points: [Landmark; LANDMARK_COUNT] = points.try_into().map_err(|_| {
            Error::InvalidInput(format!(
                "expected {LANDMARK_COUNT} hand landmarks, got {}",
                points.len()
            ))
        })?;
        Ok(Self {
            points,
            score: 1.0,
            handedness: String::new(),
        })
    }

    pub fn index_tip(&self) -> Landmark {
        self.points[INDEX_TIP]
    }

    pub fn fingers(&self) -> FingerStates {
        classify(&self.points)
    }
}

/// Up/down flag per finger: thumb, index, middle, ring, pinky.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FingerStates(pub [bool; 5]);

impl FingerStates {
    pub fn thumb(&self) -> bool { self.0[0] }
    pub fn index(&self) -> bool { self.0[1] }
    pub fn middle(&self) -> bool { self.0[2] }
    pub fn ring(&self) -> bool { self.0[3] }
    pub fn pinky(&self) -> bool { self.0[4] }

    /// The same flags as 0/1, handy for logs.
    pub fn as_bits(&self) -> [u8; 5] {
        self.0.map(u8::from)
    }
}

/// Which fingers are raised.
///
/// The thumb counts as up when its tip is left of the joint two below it (the view
/// is mirrored). The other fingers count as up when the tip is above that joint.
/// Both comparisons are strict, so equal coordinates mean "down".
pub fn fingers_up(points: &[Landmark]) -> Result<FingerStates> {
    let points: &[Landmark; LANDMARK_COUNT] = points.try_into().map_err(|_| {
        Error::InvalidInput(format!(
            "finger classification needs {LANDMARK_COUNT} landmarks, got {}",
            points.len()
        ))
    })?;
    Ok(classify(points))
}

fn classify(points: &[Landmark; LANDMARK_COUNT]) -> FingerStates {
    let mut flags = [false; 5];
    let thumb = FINGER_TIPS[0];
    flags[0] = points[thumb].x < points[thumb - 2].x;
    for (flag, &tip) in flags.iter_mut().zip(FINGER_TIPS.iter()).skip(1) {
        *flag = points[tip].y < points[tip - 2].y;
    }
    FingerStates(flags)
}

/// What the index finger should do to the canvas this frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Gesture {
    /// Index up, middle down.
    Draw,
    /// Index and middle up.
    Erase,
    Idle,
}

impl Gesture {
    pub fn from_fingers(fingers: FingerStates) -> Self {
        match (fingers.index(), fingers.middle()) {
            (true, false) => Gesture::Draw,
            (true, true) => Gesture::Erase,
            _ => Gesture::Idle,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A fist: every tip sits on its reference joint, so nothing is "up".
    fn flat_hand() -> [Landmark; LANDMARK_COUNT] {
        [Landmark::new(0.5, 0.5); LANDMARK_COUNT]
    }

    /// Raise the given fingers (classifier order) on an otherwise flat hand.
    fn hand_with(up: [bool; 5]) -> [Landmark; LANDMARK_COUNT] {
        let mut pts = flat_hand();
        if up[0] {
            pts[THUMB_TIP].x = 0.4;
        }
        for i in 1..5 {
            if up[i] {
                pts[FINGER_TIPS[i]].y = 0.3;
            }
        }
        pts
    }

    #[test]
    fn thumb_left_of_reference_is_up() {
        let mut pts = flat_hand();
        pts[THUMB_TIP].x = 0.49;
        assert!(fingers_up(&pts).unwrap().thumb());

        pts[THUMB_TIP].x = 0.51;
        assert!(!fingers_up(&pts).unwrap().thumb());
    }

    #[test]
    fn thumb_compares_against_mcp_not_ip() {
        let mut pts = flat_hand();
        pts[THUMB_TIP].x = 0.45;
        pts[THUMB_IP].x = 0.40; // tip is right of IP...
        pts[THUMB_MCP].x = 0.50; // ...but left of MCP
        assert!(fingers_up(&pts).unwrap().thumb());
    }

    #[test]
    fn equal_coordinates_count_as_down() {
        assert_eq!(fingers_up(&flat_hand()).unwrap(), FingerStates([false; 5]));
    }

    #[test]
    fn finger_above_pip_is_up() {
        let mut pts = flat_hand();
        pts[RING_TIP].y = 0.2;
        pts[PINKY_TIP].y = 0.7;
        let f = fingers_up(&pts).unwrap();
        assert!(f.ring());
        assert!(!f.pinky());
        assert_eq!(f.as_bits(), [0, 0, 0, 1, 0]);
    }

    #[test]
    fn wrong_length_is_invalid_input() {
        let pts = [Landmark::default(); 20];
        assert!(matches!(fingers_up(&pts), Err(Error::InvalidInput(_))));
        assert!(matches!(
            HandLandmarks::from_slice(&pts),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn gesture_from_index_and_middle() {
        let g = |up| Gesture::from_fingers(fingers_up(&hand_with(up)).unwrap());
        assert_eq!(g([false, true, false, false, false]), Gesture::Draw);
        assert_eq!(g([true, true, false, true, true]), Gesture::Draw);
        assert_eq!(g([false, true, true, false, false]), Gesture::Erase);
        assert_eq!(g([false, false, true, false, false]), Gesture::Idle);
        assert_eq!(g([false; 5]), Gesture::Idle);
    }

    #[test]
    fn to_pixel_truncates() {
        let lm = Landmark::new(0.5, 0.25);
        assert_eq!(lm.to_pixel(640, 480), (320, 120));
        let lm = Landmark::new(0.999, 0.999);
        assert_eq!(lm.to_pixel(640, 480), (639, 479));
    }

    #[test]
    fn to_pixel_stays_near_the_surface() {
        assert_eq!(Landmark::new(1e9, -1e9).to_pixel(640, 480), (1280, -480));
        assert_eq!(Landmark::new(-0.1, 1.1).to_pixel(640, 480), (-64, 528));
        assert_eq!(Landmark::new(f32::NAN, 0.5).to_pixel(640, 480), (0, 240));
    }
}
